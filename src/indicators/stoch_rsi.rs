// =============================================================================
// Stochastic RSI
// =============================================================================
//
// Applies the stochastic oscillator to the RSI series instead of price:
//
//   raw_t = (RSI_t - min(RSI window)) / (max(RSI window) - min(RSI window)) * 100
//   %K    = SMA(raw, k_smoothing)
//   %D    = SMA(%K, d_smoothing)
//
// A window with no RSI range reads as 0.
// =============================================================================

use serde::Serialize;

use super::rsi::{calculate_rsi, RsiConfig};

/// Settings for [`calculate_stoch_rsi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StochRsiConfig {
    pub rsi_period: usize,
    pub stoch_period: usize,
    pub k_smoothing: usize,
    pub d_smoothing: usize,
}

impl Default for StochRsiConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            stoch_period: 14,
            k_smoothing: 3,
            d_smoothing: 3,
        }
    }
}

impl StochRsiConfig {
    /// Minimum number of closes before the first reading is produced.
    pub fn warm_up(&self) -> usize {
        self.rsi_period + self.stoch_period + self.k_smoothing + self.d_smoothing - 2
    }
}

/// One Stochastic RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StochRsi {
    #[serde(rename = "stochRSI")]
    pub stoch_rsi: f64,
    pub k: f64,
    pub d: f64,
}

/// Compute the Stochastic RSI series.
///
/// An element is emitted once %D is defined, so the series length is
/// `closes.len() - warm_up + 1` (empty for shorter inputs or zero periods).
pub fn calculate_stoch_rsi(closes: &[f64], config: &StochRsiConfig) -> Vec<StochRsi> {
    if config.stoch_period == 0 || config.k_smoothing == 0 || config.d_smoothing == 0 {
        return Vec::new();
    }
    if closes.len() < config.warm_up() {
        return Vec::new();
    }

    let rsi = calculate_rsi(closes, &RsiConfig { period: config.rsi_period });
    if rsi.len() < config.stoch_period {
        return Vec::new();
    }

    let raw: Vec<f64> = rsi
        .windows(config.stoch_period)
        .map(|window| {
            let current = window[window.len() - 1];
            let (lowest, highest) = window
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            let range = highest - lowest;
            if range > 0.0 {
                (current - lowest) / range * 100.0
            } else {
                0.0
            }
        })
        .collect();

    let k = simple_moving_average(&raw, config.k_smoothing);
    let d = simple_moving_average(&k, config.d_smoothing);

    // `d[i]` closes the window ending at `k[i + d_smoothing - 1]`, which in
    // turn ends at `raw[i + d_smoothing + k_smoothing - 2]`.
    let k_offset = config.d_smoothing - 1;
    let raw_offset = k_offset + config.k_smoothing - 1;

    d.iter()
        .enumerate()
        .map(|(i, &d_value)| StochRsi {
            stoch_rsi: raw[i + raw_offset],
            k: k[i + k_offset],
            d: d_value,
        })
        .collect()
}

/// Most recent Stochastic RSI reading, or `None` when there is not enough
/// history.
pub fn latest_stoch_rsi(closes: &[f64], config: &StochRsiConfig) -> Option<StochRsi> {
    calculate_stoch_rsi(closes, config).last().copied()
}

fn simple_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period as f64)
        .collect()
}
