//! Summary statistics over a set of samples.
//!
//! Standard deviation is the population form (divide by `n`), matching
//! what the benchmark summaries have always reported.

/// Statistics over one value set
///
/// **Public** - returned from `Stats::from_values`
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    /// Number of samples
    pub count: usize,

    /// Arithmetic mean
    pub mean: f64,

    /// Smallest sample
    pub min: f64,

    /// Largest sample
    pub max: f64,

    /// Population standard deviation
    pub std_dev: f64,
}

impl Stats {
    /// Compute statistics, `None` for an empty set
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let sum: f64 = values.iter().sum();
        let mean = sum / count as f64;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let variance = values
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / count as f64;

        Some(Self {
            count,
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
        })
    }

    /// `[avg, min, max]`, plus `std` when requested
    pub fn to_values(&self, with_std: bool) -> Vec<f64> {
        let mut values = vec![self.mean, self.min, self.max];
        if with_std {
            values.push(self.std_dev);
        }
        values
    }

    /// Human-readable one-liner for logs
    pub fn summary(&self) -> String {
        format!(
            "n={} | avg={:.6} | min={:.6} | max={:.6} | std={:.6}",
            self.count, self.mean, self.min, self.max, self.std_dev
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_one_two_three() {
        let stats = Stats::from_values(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.mean - 2.0).abs() < 1e-9);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert!((stats.std_dev - 0.816_496_58).abs() < 1e-6);
    }

    #[test]
    fn test_stats_single_value() {
        let stats = Stats::from_values(&[4.5]).unwrap();
        assert_eq!(stats.mean, 4.5);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_stats_empty() {
        assert!(Stats::from_values(&[]).is_none());
    }

    #[test]
    fn test_to_values_optional_std() {
        let stats = Stats::from_values(&[1.0, 3.0]).unwrap();
        assert_eq!(stats.to_values(false), vec![2.0, 1.0, 3.0]);
        assert_eq!(stats.to_values(true), vec![2.0, 1.0, 3.0, 1.0]);
    }
}
