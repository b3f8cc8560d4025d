//! Small statistics helpers shared by the analysis modules.

use crate::domain::StatValue;

/// Population standard deviation (variance over `n`, then square root).
///
/// Returns `None` for an empty slice. A single sample yields exactly 0.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Inverse-variance weighted mean of a set of measurements.
///
/// Weights are `1/σ²` with a floor of `f64::EPSILON` on σ so an exactly-known
/// value cannot zero out the denominator. The combined error is `sqrt(1/Σw)`.
/// Returns `None` for an empty slice; a single measurement comes back
/// unchanged (up to the σ floor).
pub fn weighted_mean(values: &[StatValue]) -> Option<StatValue> {
    if values.is_empty() {
        return None;
    }
    let mut weight_sum = 0.0;
    let mut weighted_values = 0.0;
    for v in values {
        let sigma = v.error.abs().max(f64::EPSILON);
        let w = 1.0 / (sigma * sigma);
        weight_sum += w;
        weighted_values += w * v.value;
    }
    Some(StatValue::new(
        weighted_values / weight_sum,
        (1.0 / weight_sum).sqrt(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_dev_of_constant_samples_is_zero() {
        let sigma = population_std_dev(&[3.0, 3.0, 3.0, 3.0]).unwrap();
        assert_eq!(sigma, 0.0);
    }

    #[test]
    fn std_dev_is_population_not_sample() {
        // Two points a, b: population sigma = |a - b| / 2.
        let sigma = population_std_dev(&[1.0, 5.0]).unwrap();
        assert!((sigma - 2.0).abs() < 1e-15);
    }

    #[test]
    fn std_dev_of_empty_is_none() {
        assert!(population_std_dev(&[]).is_none());
    }

    #[test]
    fn weighted_mean_of_single_value_is_that_value() {
        let m = weighted_mean(&[StatValue::new(150.0, 5.0)]).unwrap();
        assert!((m.value - 150.0).abs() < 1e-12);
        assert!((m.error - 5.0).abs() < 1e-12);
    }

    #[test]
    fn weighted_mean_favors_the_tighter_measurement() {
        let m = weighted_mean(&[StatValue::new(100.0, 1.0), StatValue::new(110.0, 10.0)])
            .unwrap();
        assert!(m.value < 101.0);
        assert!(m.error < 1.0);
    }

    #[test]
    fn weighted_mean_of_empty_is_none() {
        assert!(weighted_mean(&[]).is_none());
    }
}
