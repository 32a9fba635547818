use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::types::Interval;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV candle. `timestamp` is the candle start in epoch millis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Name of the first non-finite price/volume field, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// Close prices of `candles`, oldest first.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Parameters for one kline fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineRequest {
    pub symbol: String,
    pub interval: Interval,
    pub limit: u32,
}

impl std::fmt::Display for KlineRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}x{}", self.symbol, self.interval, self.limit)
    }
}

// ---------------------------------------------------------------------------
// CandleSource
// ---------------------------------------------------------------------------

/// Anything that can produce a chronologically ordered candle sequence.
///
/// Implementations must return candles oldest first.
pub trait CandleSource: Send + Sync {
    fn fetch_candles<'a>(
        &'a self,
        request: &'a KlineRequest,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Candle>>>;
}
