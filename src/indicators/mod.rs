// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators that make up a
// snapshot. Each indicator exposes a full-series `calculate_*` function and a
// `latest_*` helper returning `Option<T>`, so insufficient history surfaces as
// an absent value rather than an error.

pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod stoch_rsi;

pub use bollinger::{BollingerBand, BollingerConfig};
pub use ema::EmaConfig;
pub use rsi::RsiConfig;
pub use stoch_rsi::{StochRsi, StochRsiConfig};
