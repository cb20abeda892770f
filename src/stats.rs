//! Daily price statistics

use crate::error::{Result, StromprisError};

/// Summary statistics for one day of prices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub min: f64,
    pub median: f64,
    pub average: f64,
    pub max: f64,
}

/// Compute min, median, average and max over `prices`
///
/// The median of an even-length input is the mean of the two middle values.
pub fn daily_stats(prices: &[f64]) -> Result<PriceStats> {
    if prices.is_empty() {
        return Err(StromprisError::validation(
            "prices",
            "Cannot calculate stats for empty price list",
        ));
    }

    let mut sorted = prices.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mid = n / 2;
    let median = if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    };

    Ok(PriceStats {
        min: sorted[0],
        median,
        average: sorted.iter().sum::<f64>() / n as f64,
        max: sorted[n - 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_count() {
        let stats = daily_stats(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(
            stats,
            PriceStats {
                min: 1.0,
                median: 2.5,
                average: 2.5,
                max: 4.0
            }
        );
    }

    #[test]
    fn single_value() {
        let stats = daily_stats(&[5.0]).unwrap();
        assert_eq!(stats.min, 5.0);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.average, 5.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn empty_input_is_a_validation_error() {
        assert!(matches!(
            daily_stats(&[]),
            Err(StromprisError::Validation { .. })
        ));
    }

    #[test]
    fn unsorted_input_with_duplicates_and_negatives() {
        let stats = daily_stats(&[0.3, -0.1, 0.3, 0.9, 0.1]).unwrap();
        assert_eq!(stats.min, -0.1);
        assert_eq!(stats.median, 0.3);
        assert!((stats.average - 0.3).abs() < 1e-12);
        assert_eq!(stats.max, 0.9);
    }
}
