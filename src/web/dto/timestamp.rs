//! Wire form of the confirmation time.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// `ConfirmedAt` on the wire.
///
/// Rendered as RFC 3339 when the stored epoch falls in years 0 to 9999,
/// otherwise as the raw epoch seconds. Both forms are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfirmedAt {
    /// RFC 3339 timestamp.
    Time(DateTime<Utc>),
    /// Epoch seconds.
    Epoch(i64),
}

impl ConfirmedAt {
    /// Wire value for stored epoch seconds. `None` when unconfirmed.
    pub fn from_epoch(epoch: i64) -> Option<Self> {
        if epoch == 0 {
            return None;
        }

        let confirmed = DateTime::from_timestamp(epoch, 0)
            .filter(|t| (0..=9999).contains(&t.year()))
            .map_or(Self::Epoch(epoch), Self::Time);
        Some(confirmed)
    }

    /// Epoch seconds to store.
    pub fn epoch(self) -> i64 {
        match self {
            Self::Time(t) => t.timestamp(),
            Self::Epoch(epoch) => epoch,
        }
    }
}
