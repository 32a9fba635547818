// =============================================================================
// Exponential Moving Average (EMA) and EMA-50 / EMA-200 trend
// =============================================================================
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The difference form keeps a flat series exactly flat.
//
// The very first EMA value is seeded with the SMA of the first `period` closes.
// =============================================================================

use crate::types::Trend;

/// Look-back settings for [`calculate_ema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmaConfig {
    pub period: usize,
}

impl EmaConfig {
    pub const FAST: EmaConfig = EmaConfig { period: 50 };
    pub const SLOW: EmaConfig = EmaConfig { period: 200 };
}

/// Compute the EMA series for the given `closes` slice.
///
/// Each output element corresponds to a close starting at index `period - 1`,
/// so the series length is `closes.len() - period + 1`.
///
/// # Edge cases
/// - `period == 0` => empty vec (division by zero guard)
/// - `closes.len() < period` => empty vec
/// - A non-finite intermediate value yields an empty vec, so the last
///   element always belongs to the final close.
pub fn calculate_ema(closes: &[f64], config: &EmaConfig) -> Vec<f64> {
    let period = config.period;
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let sma: f64 = closes[..period].iter().sum::<f64>() / period as f64;
    if !sma.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len() - period + 1);
    result.push(sma);

    let mut prev_ema = sma;
    for &close in &closes[period..] {
        let ema = (close - prev_ema) * multiplier + prev_ema;
        if !ema.is_finite() {
            return Vec::new();
        }
        result.push(ema);
        prev_ema = ema;
    }

    result
}

/// Most recent EMA value, or `None` when there is not enough history.
pub fn latest_ema(closes: &[f64], config: &EmaConfig) -> Option<f64> {
    calculate_ema(closes, config).last().copied()
}

/// Classify the trend from the latest fast and slow EMA values.
///
/// Equal values, or a missing side, yield [`Trend::Unknown`].
pub fn trend_from_ema(fast: Option<f64>, slow: Option<f64>) -> Trend {
    match (fast, slow) {
        (Some(f), Some(s)) if f > s => Trend::Up,
        (Some(f), Some(s)) if f < s => Trend::Down,
        _ => Trend::Unknown,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    // ---- calculate_ema ---------------------------------------------------

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], &EmaConfig { period: 5 }).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], &EmaConfig { period: 0 }).is_empty());
    }

    #[test]
    fn ema_insufficient_data() {
        assert!(calculate_ema(&[1.0, 2.0], &EmaConfig { period: 5 }).is_empty());
        assert!(latest_ema(&ascending(49), &EmaConfig::FAST).is_none());
    }

    #[test]
    fn ema_period_equals_length() {
        let ema = calculate_ema(&[2.0, 4.0, 6.0], &EmaConfig { period: 3 });
        assert_eq!(ema.len(), 1);
        assert!((ema[0] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn ema_length_and_seed_for_long_periods() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + (i as f64 * 0.37).sin() * 5.0).collect();
        for config in [EmaConfig::FAST, EmaConfig::SLOW] {
            let ema = calculate_ema(&closes, &config);
            assert_eq!(ema.len(), closes.len() - config.period + 1);
            let sma = closes[..config.period].iter().sum::<f64>() / config.period as f64;
            assert!((ema[0] - sma).abs() < 1e-9);
        }
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of [1..=10]: SMA seed 3.0, multiplier 1/3.
        let closes = ascending(10);
        let ema = calculate_ema(&closes, &EmaConfig { period: 5 });
        assert_eq!(ema.len(), 6);

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        let mut expected_vec = vec![expected];
        for &c in &closes[5..] {
            expected = c * mult + expected * (1.0 - mult);
            expected_vec.push(expected);
        }
        for (a, b) in ema.iter().zip(expected_vec.iter()) {
            assert!((a - b).abs() < 1e-10, "got {a}, expected {b}");
        }
    }

    #[test]
    fn ema_non_finite_step_empties_series() {
        // (-MAX - 2/3 * MAX) overflows on the last step.
        let closes = [0.0, 0.0, f64::MAX, -f64::MAX];
        let config = EmaConfig { period: 2 };
        assert_eq!(calculate_ema(&closes[..3], &config).len(), 2);
        assert!(calculate_ema(&closes, &config).is_empty());
        assert!(latest_ema(&closes, &config).is_none());
    }

    // ---- trend_from_ema --------------------------------------------------

    #[test]
    fn trend_is_total() {
        assert_eq!(trend_from_ema(Some(2.0), Some(1.0)), Trend::Up);
        assert_eq!(trend_from_ema(Some(1.0), Some(2.0)), Trend::Down);
        assert_eq!(trend_from_ema(Some(1.5), Some(1.5)), Trend::Unknown);
        assert_eq!(trend_from_ema(None, Some(1.0)), Trend::Unknown);
        assert_eq!(trend_from_ema(Some(1.0), None), Trend::Unknown);
        assert_eq!(trend_from_ema(None, None), Trend::Unknown);
    }

    #[test]
    fn trend_up_on_rising_series() {
        let closes = ascending(250);
        let fast = latest_ema(&closes, &EmaConfig::FAST);
        let slow = latest_ema(&closes, &EmaConfig::SLOW);
        assert_eq!(trend_from_ema(fast, slow), Trend::Up);
    }

    #[test]
    fn trend_down_on_falling_series() {
        let closes: Vec<f64> = (1..=250).rev().map(|x| x as f64).collect();
        let fast = latest_ema(&closes, &EmaConfig::FAST);
        let slow = latest_ema(&closes, &EmaConfig::SLOW);
        assert_eq!(trend_from_ema(fast, slow), Trend::Down);
    }

    #[test]
    fn trend_unknown_on_flat_series() {
        let closes = vec![100.0; 250];
        let fast = latest_ema(&closes, &EmaConfig::FAST);
        let slow = latest_ema(&closes, &EmaConfig::SLOW);
        assert_eq!(trend_from_ema(fast, slow), Trend::Unknown);
    }
}
