// =============================================================================
// Application State
// =============================================================================
//
// Immutable after startup: the service configuration and the candle source.
// Handlers share it through `Arc<AppState>`; every request computes its
// snapshot from scratch.
// =============================================================================

use std::sync::Arc;

use chrono::FixedOffset;

use crate::config::ServiceConfig;
use crate::market_data::CandleSource;

pub struct AppState {
    pub config: ServiceConfig,
    pub candle_source: Arc<dyn CandleSource>,
    display_offset: FixedOffset,
}

impl AppState {
    pub fn new(config: ServiceConfig, candle_source: Arc<dyn CandleSource>) -> Self {
        let display_offset = config.display_offset();
        Self {
            config,
            candle_source,
            display_offset,
        }
    }

    /// Offset used when rendering snapshot `dateTime` values.
    pub fn display_offset(&self) -> FixedOffset {
        self.display_offset
    }
}
