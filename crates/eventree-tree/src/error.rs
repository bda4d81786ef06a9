use std::path::PathBuf;

/// Errors from feature scoring, tree training, prediction, and persistence.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when the tree count is anything other than one.
    #[error("only single-tree forests are supported, got tree_count = {tree_count}")]
    UnsupportedTreeCount {
        /// The rejected tree count.
        tree_count: usize,
    },

    /// Returned when the frame size is zero.
    #[error("frame_size must be at least 1, got {frame_size}")]
    InvalidFrameSize {
        /// The invalid frame size provided.
        frame_size: usize,
    },

    /// Returned when a frame would not fit in the series even once.
    #[error("frame_size {frame_size} exceeds series length {n_samples}")]
    FrameSizeExceedsSeries {
        /// The configured frame size.
        frame_size: usize,
        /// The number of samples in the series.
        n_samples: usize,
    },

    /// Returned when samples and labels have different lengths.
    #[error("series has {n_samples} samples but {n_labels} labels")]
    LengthMismatch {
        /// The number of samples.
        n_samples: usize,
        /// The number of labels.
        n_labels: usize,
    },

    /// Returned when a label is neither 0 nor 1.
    #[error("label at index {index} is {value}, expected 0 or 1")]
    InvalidLabel {
        /// Zero-based position of the offending label.
        index: usize,
        /// The rejected value.
        value: u8,
    },

    /// Returned when a feature index is outside the frame's feature space.
    #[error("feature {feature} is not supported, feature space has {n_features} features")]
    UnsupportedFeature {
        /// The rejected feature index.
        feature: usize,
        /// The size of the feature space, `2 * frame_size - 1`.
        n_features: usize,
    },

    /// Returned when a frame would read past the end of the series.
    #[error("frame starting at {frame_start} with size {frame_size} overruns {n_samples} samples")]
    FrameOutOfRange {
        /// Start offset of the frame.
        frame_start: usize,
        /// The frame size.
        frame_size: usize,
        /// The number of samples available.
        n_samples: usize,
    },

    /// Returned when a prediction frame has the wrong length.
    #[error("prediction frame has {got} samples, expected {expected}")]
    PredictionFrameMismatch {
        /// The frame size the forest was trained with.
        expected: usize,
        /// The length of the frame supplied.
        got: usize,
    },

    /// Returned when model serialization fails.
    #[error("failed to serialize model")]
    SerializeModel {
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when model deserialization fails.
    #[error("failed to deserialize model from {path}")]
    DeserializeModel {
        /// Path to the model file that could not be deserialized.
        path: PathBuf,
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when writing the model file fails.
    #[error("failed to write model to {path}")]
    WriteModel {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading the model file fails.
    #[error("failed to read model from {path}")]
    ReadModel {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when loading a model with an incompatible format version.
    #[error("incompatible model version in {path}: expected {expected}, found {found}")]
    IncompatibleModelVersion {
        /// The model format version this build expects.
        expected: u32,
        /// The model format version found in the file.
        found: u32,
        /// Path to the model file with the incompatible version.
        path: PathBuf,
    },

    /// Returned when a model file's header disagrees with the forest it holds.
    #[error("model header in {path} records {field} = {recorded}, but the forest has {decoded}")]
    ModelHeaderMismatch {
        /// Path to the inconsistent model file.
        path: PathBuf,
        /// Header field that disagrees.
        field: &'static str,
        /// Value recorded in the header.
        recorded: usize,
        /// Value derived from the decoded forest.
        decoded: usize,
    },
}
