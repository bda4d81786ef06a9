//! ROC-AUC agrees with the pairwise ranking probability on synthetic scores.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use eventree_grading::{auc, roc_auc_score, roc_curve};

// ---------------------------------------------------------------------------
// Helper: coarse-grained scores so ties occur
// ---------------------------------------------------------------------------

fn make_scores(n: usize, seed: u64) -> (Vec<u8>, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut actual = Vec::with_capacity(n);
    let mut predictions = Vec::with_capacity(n);
    for i in 0..n {
        // First two labels fix both classes.
        let label = if i < 2 { i as u8 } else { u8::from(rng.gen_bool(0.4)) };
        let bump = if label == 1 { 10 } else { 0 };
        let bucket: u32 = rng.gen_range(0..40) + bump;
        actual.push(label);
        predictions.push(f64::from(bucket) / 50.0);
    }
    (actual, predictions)
}

/// P(positive outscores negative), counting ties as one half.
fn pairwise_auc(actual: &[u8], predictions: &[f64]) -> f64 {
    let mut wins = 0.0;
    let mut pairs = 0.0;
    for (i, &pos) in predictions.iter().enumerate() {
        if actual[i] != 1 {
            continue;
        }
        for (j, &neg) in predictions.iter().enumerate() {
            if actual[j] != 0 {
                continue;
            }
            pairs += 1.0;
            if pos > neg {
                wins += 1.0;
            } else if pos == neg {
                wins += 0.5;
            }
        }
    }
    wins / pairs
}

// ---------------------------------------------------------------------------
// a) agreement with the rank statistic
// ---------------------------------------------------------------------------

#[test]
fn matches_pairwise_ranking_probability() {
    for seed in [1, 2, 3, 42] {
        let (actual, predictions) = make_scores(300, seed);
        let area = roc_auc_score(&actual, &predictions).unwrap();
        let expected = pairwise_auc(&actual, &predictions);
        assert!(
            (area - expected).abs() < 1e-9,
            "seed {seed}: trapezoid {area} vs pairwise {expected}"
        );
    }
}

#[test]
fn negated_scores_mirror_area() {
    let (actual, predictions) = make_scores(300, 9);
    let negated: Vec<f64> = predictions.iter().map(|p| -p).collect();
    let area = roc_auc_score(&actual, &predictions).unwrap();
    let mirrored = roc_auc_score(&actual, &negated).unwrap();
    assert!((area + mirrored - 1.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// b) curve shape
// ---------------------------------------------------------------------------

#[test]
fn curve_rates_stay_in_unit_interval_and_fall() {
    let (actual, predictions) = make_scores(200, 5);
    let curve = roc_curve(&actual, &predictions).unwrap();
    assert_eq!(curve.fpr[0], 1.0);
    assert_eq!(curve.tpr[0], 1.0);
    for w in curve.fpr.windows(2).zip(curve.tpr.windows(2)) {
        let (f, t) = w;
        assert!(f[1] <= f[0] && t[1] <= t[0]);
        assert!((0.0..=1.0).contains(&f[1]) && (0.0..=1.0).contains(&t[1]));
    }
    for w in curve.thresholds.windows(2) {
        assert!(w[0] < w[1]);
    }
    let area = auc(&curve.fpr, &curve.tpr, true).unwrap();
    assert!((0.5..=1.0).contains(&area), "informative scores gave {area}");
}
