// =============================================================================
// Shared types used across the indicator snapshot service
// =============================================================================

use serde::{Deserialize, Serialize};

/// Kline interval accepted by the candle source.
///
/// Minute intervals are encoded as their minute count; day, week and month
/// use a single letter. The wire representation is exactly that string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1")]
    Min1,
    #[serde(rename = "3")]
    Min3,
    #[serde(rename = "5")]
    Min5,
    #[serde(rename = "15")]
    Min15,
    #[serde(rename = "30")]
    Min30,
    #[serde(rename = "60")]
    Min60,
    #[serde(rename = "120")]
    Min120,
    #[serde(rename = "240")]
    Min240,
    #[serde(rename = "360")]
    Min360,
    #[serde(rename = "720")]
    Min720,
    #[serde(rename = "D")]
    Day,
    #[serde(rename = "W")]
    Week,
    #[serde(rename = "M")]
    Month,
}

impl Interval {
    pub const ALL: [Interval; 13] = [
        Self::Min1,
        Self::Min3,
        Self::Min5,
        Self::Min15,
        Self::Min30,
        Self::Min60,
        Self::Min120,
        Self::Min240,
        Self::Min360,
        Self::Min720,
        Self::Day,
        Self::Week,
        Self::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Min1 => "1",
            Self::Min3 => "3",
            Self::Min5 => "5",
            Self::Min15 => "15",
            Self::Min30 => "30",
            Self::Min60 => "60",
            Self::Min120 => "120",
            Self::Min240 => "240",
            Self::Min360 => "360",
            Self::Min720 => "720",
            Self::Day => "D",
            Self::Week => "W",
            Self::Month => "M",
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::Min60
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "invalid interval '{s}'. Use one of 1,3,5,15,30,60,120,240,360,720,D,W,M"
                )
            })
    }
}

/// Direction derived from the EMA-50 / EMA-200 crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Unknown,
}

impl Default for Trend {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "Up"),
            Self::Down => write!(f, "Down"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_parses_every_wire_value() {
        for interval in Interval::ALL {
            let parsed: Interval = interval.as_str().parse().unwrap();
            assert_eq!(parsed, interval);
        }
    }

    #[test]
    fn interval_rejects_unknown_values() {
        assert!("2".parse::<Interval>().is_err());
        assert!("d".parse::<Interval>().is_err());
        assert!("".parse::<Interval>().is_err());
    }

    #[test]
    fn interval_serialises_as_wire_string() {
        assert_eq!(serde_json::to_string(&Interval::Min60).unwrap(), "\"60\"");
        assert_eq!(serde_json::to_string(&Interval::Week).unwrap(), "\"W\"");
    }

    #[test]
    fn trend_defaults_to_unknown() {
        assert_eq!(Trend::default(), Trend::Unknown);
        assert_eq!(serde_json::to_string(&Trend::Up).unwrap(), "\"Up\"");
    }
}
