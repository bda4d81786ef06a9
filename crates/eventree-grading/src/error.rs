/// Errors from ROC curve construction and AUC integration.
#[derive(Debug, thiserror::Error)]
pub enum GradingError {
    /// Returned when labels and predictions differ in length.
    #[error("got {n_actual} labels but {n_predictions} predictions")]
    LengthMismatch {
        /// Number of ground-truth labels.
        n_actual: usize,
        /// Number of predictions.
        n_predictions: usize,
    },

    /// Returned when no labels are provided.
    #[error("cannot score an empty prediction set")]
    EmptyInput,

    /// Returned when a label is neither 0 nor 1.
    #[error("label at index {index} is {value}, expected 0 or 1")]
    InvalidLabel {
        /// Position of the offending label.
        index: usize,
        /// The offending value.
        value: u8,
    },

    /// Returned when every label belongs to the same class.
    #[error("labels must contain both classes, got {positives} positive and {negatives} negative")]
    SingleClass {
        /// Number of labels equal to 1.
        positives: usize,
        /// Number of labels equal to 0.
        negatives: usize,
    },

    /// Returned when a curve has fewer than two points to integrate.
    #[error("area under a curve needs at least 2 points, got {n_points}")]
    TooFewPoints {
        /// Number of points provided.
        n_points: usize,
    },

    /// Returned when curve coordinates differ in length.
    #[error("curve has {n_xs} x coordinates but {n_ys} y coordinates")]
    CurveLengthMismatch {
        /// Number of x coordinates.
        n_xs: usize,
        /// Number of y coordinates.
        n_ys: usize,
    },

    /// Returned when a prediction is NaN or infinite.
    #[error("prediction at index {index} is not finite: {value}")]
    NonFinitePrediction {
        /// Position of the offending prediction.
        index: usize,
        /// The offending value.
        value: f64,
    },
}
