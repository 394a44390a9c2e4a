//! Corporate actions: dividends and splits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the action does to holders of the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Cash dividend, paid per held share on the effective tick.
    Dividend { per_share: f64 },
    /// Share split. `ratio` is new-shares-per-old-share: a 2:1 split has
    /// ratio 2.0, a 1:5 reverse split has ratio 0.2.
    Split { ratio: f64 },
}

/// A corporate action, applied exactly once at the first tick whose
/// timestamp is at or after `effective`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporateAction {
    pub symbol: String,
    pub effective: DateTime<Utc>,
    pub kind: ActionKind,
}

impl CorporateAction {
    pub fn dividend(symbol: impl Into<String>, effective: DateTime<Utc>, per_share: f64) -> Self {
        Self {
            symbol: symbol.into(),
            effective,
            kind: ActionKind::Dividend { per_share },
        }
    }

    pub fn split(symbol: impl Into<String>, effective: DateTime<Utc>, ratio: f64) -> Self {
        Self {
            symbol: symbol.into(),
            effective,
            kind: ActionKind::Split { ratio },
        }
    }
}
