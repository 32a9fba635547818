// =============================================================================
// Indicator Snapshot — engine + assembler
// =============================================================================
//
// Turns one chronologically ordered candle sequence into a single snapshot of
// the latest RSI(14), Stochastic RSI(14,14,3,3), EMA(50), EMA(200), BB(20,2)
// and EMA trend. Every reading is taken from the same close projection of the
// same slice, so all of them describe the final candle.
// =============================================================================

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::indicators::{
    bollinger, ema, rsi, stoch_rsi, BollingerBand, BollingerConfig, EmaConfig, RsiConfig,
    StochRsi, StochRsiConfig,
};
use crate::market_data::{closes, Candle};
use crate::types::{Interval, Trend};

/// `en-MS` style rendering, e.g. `18/10/2026, 8:05:00 pm`.
const DATE_TIME_FORMAT: &str = "%d/%m/%Y, %-I:%M:%S %P";

// =============================================================================
// Types
// =============================================================================

/// Latest indicator values for one candle sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatestReadings {
    pub rsi14: Option<f64>,
    pub stoch_rsi14: Option<StochRsi>,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,
    pub bb20: Option<BollingerBand>,
    pub trend: Trend,
}

/// The record returned to API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub symbol: String,
    pub interval: Interval,
    pub date_time: Option<String>,
    pub ohlcv: Option<Candle>,
    pub rsi14: Option<f64>,
    pub stoch_rsi14: Option<StochRsi>,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,
    pub bb20: Option<BollingerBand>,
    pub trend: Trend,
}

/// Candle data that violates the finite-number precondition.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    NonFiniteCandle { index: usize, field: &'static str },
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteCandle { index, field } => {
                write!(f, "candle {index} has a non-finite {field} value")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

// =============================================================================
// Engine
// =============================================================================

impl LatestReadings {
    /// Run every indicator over the close prices of `candles`.
    pub fn compute(candles: &[Candle]) -> Self {
        let closes = closes(candles);

        let ema50 = ema::latest_ema(&closes, &EmaConfig::FAST);
        let ema200 = ema::latest_ema(&closes, &EmaConfig::SLOW);

        Self {
            rsi14: rsi::latest_rsi(&closes, &RsiConfig::default()),
            stoch_rsi14: stoch_rsi::latest_stoch_rsi(&closes, &StochRsiConfig::default()),
            ema50,
            ema200,
            bb20: bollinger::latest_bollinger(&closes, &BollingerConfig::default()),
            trend: ema::trend_from_ema(ema50, ema200),
        }
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Combine precomputed readings with the latest candle and request params.
///
/// Performs no indicator math; `readings` must come from the same `candles`.
pub fn assemble(
    symbol: &str,
    interval: Interval,
    candles: &[Candle],
    readings: LatestReadings,
    display_offset: FixedOffset,
) -> Snapshot {
    let latest = candles.last().copied();

    Snapshot {
        symbol: symbol.to_string(),
        interval,
        date_time: format_date_time(latest.map(|c| c.timestamp), display_offset),
        ohlcv: latest,
        rsi14: readings.rsi14,
        stoch_rsi14: readings.stoch_rsi14,
        ema50: readings.ema50,
        ema200: readings.ema200,
        bb20: readings.bb20,
        trend: readings.trend,
    }
}

/// Validate `candles`, compute every indicator and assemble the snapshot.
pub fn compute_snapshot(
    symbol: &str,
    interval: Interval,
    candles: &[Candle],
    display_offset: FixedOffset,
) -> Result<Snapshot, SnapshotError> {
    if let Some((index, field)) = candles
        .iter()
        .enumerate()
        .find_map(|(i, c)| c.non_finite_field().map(|field| (i, field)))
    {
        return Err(SnapshotError::NonFiniteCandle { index, field });
    }

    let readings = LatestReadings::compute(candles);
    Ok(assemble(symbol, interval, candles, readings, display_offset))
}

/// Render an epoch-millis timestamp in `display_offset`.
///
/// Missing or out-of-range timestamps yield `None`.
pub fn format_date_time(timestamp_ms: Option<i64>, display_offset: FixedOffset) -> Option<String> {
    let utc = DateTime::from_timestamp_millis(timestamp_ms?)?;
    Some(
        utc.with_timezone(&display_offset)
            .format(DATE_TIME_FORMAT)
            .to_string(),
    )
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;
    const START_MS: i64 = 1_700_000_000_000;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(START_MS + i as i64 * HOUR_MS, c, c + 1.0, c - 1.0, c, 10.0))
            .collect()
    }

    #[test]
    fn empty_candles_yield_all_absent() {
        let snap = compute_snapshot("BTCUSDT", Interval::Min60, &[], utc()).unwrap();
        assert_eq!(snap.symbol, "BTCUSDT");
        assert_eq!(snap.date_time, None);
        assert_eq!(snap.ohlcv, None);
        assert_eq!(snap.rsi14, None);
        assert_eq!(snap.stoch_rsi14, None);
        assert_eq!(snap.ema50, None);
        assert_eq!(snap.ema200, None);
        assert_eq!(snap.bb20, None);
        assert_eq!(snap.trend, Trend::Unknown);
    }

    #[test]
    fn single_candle_has_ohlcv_only() {
        let candles = candles_from_closes(&[101.0]);
        let snap = compute_snapshot("ETHUSDT", Interval::Day, &candles, utc()).unwrap();
        assert_eq!(snap.ohlcv, Some(candles[0]));
        assert!(snap.date_time.is_some());
        assert_eq!(snap.rsi14, None);
        assert_eq!(snap.stoch_rsi14, None);
        assert_eq!(snap.ema50, None);
        assert_eq!(snap.ema200, None);
        assert_eq!(snap.bb20, None);
        assert_eq!(snap.trend, Trend::Unknown);
    }

    #[test]
    fn rising_closes_trend_up() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + i as f64 * 250.0 / 249.0).collect();
        let candles = candles_from_closes(&closes);
        let snap = compute_snapshot("BTCUSDT", Interval::Min60, &candles, utc()).unwrap();

        assert_eq!(snap.trend, Trend::Up);
        assert!(snap.ema50.unwrap() > snap.ema200.unwrap());
        assert!(snap.rsi14.is_some());
        assert!(snap.stoch_rsi14.is_some());
        assert!(snap.bb20.is_some());
        assert_eq!(snap.ohlcv, candles.last().copied());
    }

    #[test]
    fn partial_history_leaves_slow_ema_absent() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let snap =
            compute_snapshot("BTCUSDT", Interval::Min5, &candles_from_closes(&closes), utc()).unwrap();
        assert!(snap.ema50.is_some());
        assert_eq!(snap.ema200, None);
        assert_eq!(snap.trend, Trend::Unknown);
    }

    #[test]
    fn compute_snapshot_is_idempotent() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + (i as f64 * 0.3).sin() * 7.0).collect();
        let candles = candles_from_closes(&closes);
        let a = compute_snapshot("SOLUSDT", Interval::Min15, &candles, utc()).unwrap();
        let b = compute_snapshot("SOLUSDT", Interval::Min15, &candles, utc()).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn assemble_uses_given_readings() {
        let candles = candles_from_closes(&[1.0, 2.0]);
        let readings = LatestReadings {
            rsi14: Some(55.0),
            trend: Trend::Down,
            ..LatestReadings::default()
        };
        let snap = assemble("XRPUSDT", Interval::Week, &candles, readings, utc());
        assert_eq!(snap.rsi14, Some(55.0));
        assert_eq!(snap.trend, Trend::Down);
        assert_eq!(snap.ohlcv, Some(candles[1]));
    }

    #[test]
    fn non_finite_candle_is_rejected() {
        let mut candles = candles_from_closes(&[1.0, 2.0, 3.0]);
        candles[1].close = f64::NAN;
        let err = compute_snapshot("BTCUSDT", Interval::Min1, &candles, utc()).unwrap_err();
        assert_eq!(err, SnapshotError::NonFiniteCandle { index: 1, field: "close" });
    }

    #[test]
    fn date_time_formatting() {
        // 2023-11-14T22:13:20Z
        assert_eq!(
            format_date_time(Some(START_MS), utc()).as_deref(),
            Some("14/11/2023, 10:13:20 pm")
        );
        let myt = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(
            format_date_time(Some(START_MS), myt).as_deref(),
            Some("15/11/2023, 6:13:20 am")
        );
        assert_eq!(format_date_time(None, utc()), None);
        assert_eq!(format_date_time(Some(i64::MAX), utc()), None);
    }

    #[test]
    fn snapshot_serialises_with_camel_case_keys() {
        let candles = candles_from_closes(&[5.0]);
        let snap = compute_snapshot("BTCUSDT", Interval::Min60, &candles, utc()).unwrap();
        let json = serde_json::to_value(&snap).unwrap();
        for key in [
            "symbol", "interval", "dateTime", "ohlcv", "rsi14", "stochRsi14", "ema50", "ema200",
            "bb20", "trend",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(json["interval"], "60");
        assert_eq!(json["trend"], "Unknown");
        assert!(json["rsi14"].is_null());
        assert_eq!(json["ohlcv"]["close"], 5.0);
    }
}
