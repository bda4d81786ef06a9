//! Trapezoidal integration of sampled curves.

use crate::error::GradingError;

const ABS_TOLERANCE: f64 = 1e-8;
const REL_TOLERANCE: f64 = 1e-5;

/// Whether `a` and `b` are equal within `1e-8 + 1e-5 * |b|`.
pub(crate) fn fp_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < ABS_TOLERANCE + REL_TOLERANCE * b.abs()
}

/// Area under the curve through `(xs[i], ys[i])` by the trapezoidal rule.
///
/// With `reorder` set, points are first sorted by `x` and then by `y`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`GradingError::CurveLengthMismatch`] | `xs.len() != ys.len()` |
/// | [`GradingError::TooFewPoints`] | fewer than two points |
pub fn auc(xs: &[f64], ys: &[f64], reorder: bool) -> Result<f64, GradingError> {
    if xs.len() != ys.len() {
        return Err(GradingError::CurveLengthMismatch {
            n_xs: xs.len(),
            n_ys: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(GradingError::TooFewPoints { n_points: xs.len() });
    }

    let mut points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    if reorder {
        points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    }
    Ok(trapz(&points))
}

fn trapz(points: &[(f64, f64)]) -> f64 {
    let doubled: f64 = points
        .windows(2)
        .map(|w| (w[1].0 - w[0].0) * (w[1].1 + w[0].1))
        .sum();
    doubled * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_diagonal() {
        let area = auc(&[0.0, 1.0], &[0.0, 1.0], false).unwrap();
        assert!((area - 0.5).abs() < 1e-12);
    }

    #[test]
    fn reorder_sorts_points_before_integrating() {
        let xs = [1.0, 0.0, 0.5];
        let ys = [1.0, 0.0, 1.0];
        let area = auc(&xs, &ys, true).unwrap();
        // (0,0) -> (0.5,1) -> (1,1)
        assert!((area - 0.75).abs() < 1e-12);
    }

    #[test]
    fn unordered_points_integrate_as_given() {
        let area = auc(&[1.0, 0.0], &[1.0, 1.0], false).unwrap();
        assert!((area + 1.0).abs() < 1e-12);
    }

    #[test]
    fn too_few_points() {
        assert!(matches!(
            auc(&[0.5], &[0.5], true),
            Err(GradingError::TooFewPoints { n_points: 1 })
        ));
        assert!(matches!(
            auc(&[0.0, 1.0], &[0.0], true),
            Err(GradingError::CurveLengthMismatch { n_xs: 2, n_ys: 1 })
        ));
    }

    #[test]
    fn tolerance_is_relative_to_second_operand() {
        assert!(fp_eq(1.0, 1.0 + 5e-6));
        assert!(!fp_eq(1.0, 1.0 + 5e-5));
        assert!(fp_eq(0.0, 5e-9));
        assert!(!fp_eq(0.0, 1e-7));
    }
}
