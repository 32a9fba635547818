pub mod candle;

// Re-export for convenient access (e.g. `use crate::market_data::Candle`).
pub use candle::{closes, Candle, CandleSource, KlineRequest};
