// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the population standard deviation
// of the same window. %B locates the window's last close inside the bands:
//   pb = (close - lower) / (upper - lower)

use serde::Serialize;

/// Window and band-width settings for [`calculate_bollinger`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerConfig {
    pub period: usize,
    pub std_dev_multiplier: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

/// One Bollinger Band reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// %B of the last close; `None` when the bands have zero width.
    pub pb: Option<f64>,
}

/// Compute the rolling Bollinger Band series.
///
/// One band per full window, so the series length is
/// `closes.len() - period + 1`. Returns an empty vec when `period == 0` or
/// there are fewer than `period` closes.
pub fn calculate_bollinger(closes: &[f64], config: &BollingerConfig) -> Vec<BollingerBand> {
    let period = config.period;
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    closes
        .windows(period)
        .map(|window| band_for_window(window, config.std_dev_multiplier))
        .collect()
}

/// Most recent band, or `None` when there is not enough history.
pub fn latest_bollinger(closes: &[f64], config: &BollingerConfig) -> Option<BollingerBand> {
    calculate_bollinger(closes, config).last().copied()
}

fn band_for_window(window: &[f64], num_std: f64) -> BollingerBand {
    let n = window.len() as f64;
    let middle = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    let upper = middle + num_std * std_dev;
    let lower = middle - num_std * std_dev;

    let width = upper - lower;
    let pb = window
        .last()
        .filter(|_| width > 0.0)
        .map(|close| (close - lower) / width)
        .filter(|pb| pb.is_finite());

    BollingerBand {
        upper,
        middle,
        lower,
        pb,
    }
}
