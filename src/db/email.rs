//! Subscriber entry model.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::{MailError, Result};

/// Message used whenever a page request is out of range.
pub const BATCH_QUERY_ERROR: &str = "page and count fields are required and must be > 0";

/// One subscriber record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailEntry {
    /// Row ID assigned on insert.
    pub id: i64,
    /// Subscriber address, unique across the table.
    pub email: String,
    /// Confirmation time in epoch seconds, 0 when unconfirmed. Any value is kept as given.
    pub confirmed_at: i64,
    /// Whether the subscriber has unsubscribed.
    pub opt_out: bool,
}

impl EmailEntry {
    /// Whether a confirmation time has been recorded.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at != 0
    }
}

impl<'r> FromRow<'r, SqliteRow> for EmailEntry {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            confirmed_at: row.try_get("confirmed_at")?,
            opt_out: row.try_get("opt_out")?,
        })
    }
}

/// Upsert payload: everything but the ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailUpdate {
    /// Subscriber address used as the lookup key.
    pub email: String,
    /// Confirmation time in epoch seconds; 0 means unconfirmed.
    pub confirmed_at: i64,
    /// Opt-out flag.
    pub opt_out: bool,
}

impl EmailUpdate {
    /// Create an update for an unconfirmed, subscribed address.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            confirmed_at: 0,
            opt_out: false,
        }
    }

    /// Set the confirmation time in epoch seconds.
    pub fn with_confirmed_at(mut self, confirmed_at: i64) -> Self {
        self.confirmed_at = confirmed_at;
        self
    }

    /// Set the opt-out flag.
    pub fn with_opt_out(mut self, opt_out: bool) -> Self {
        self.opt_out = opt_out;
        self
    }
}

/// A validated page request over the subscribed entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchQuery {
    page: i64,
    count: i64,
}

impl BatchQuery {
    /// Create a page request. `page` is 1-indexed; both values must be positive.
    pub fn new(page: i64, count: i64) -> Result<Self> {
        if page <= 0 || count <= 0 {
            return Err(MailError::Validation(BATCH_QUERY_ERROR.to_string()));
        }
        // The offset must fit in an i64 for the LIMIT/OFFSET binding.
        if (page - 1).checked_mul(count).is_none() {
            return Err(MailError::Validation(format!(
                "page {page} with count {count} is out of range"
            )));
        }
        Ok(Self { page, count })
    }

    /// 1-indexed page number.
    pub fn page(&self) -> i64 {
        self.page
    }

    /// Maximum number of entries on the page.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.count
    }
}
