//! The subscriber registry shared by the JSON and gRPC adapters.
//!
//! Every operation reports its outcome the same way:
//!
//! - `Ok(Some(entry))` / `Ok(entries)`: success
//! - `Ok(None)`: no entry with that address
//! - `Err(e)`: failure, classified by [`MailError::kind`]
//!
//! Each adapter renders these three cases in its own wire convention.

use std::sync::Arc;

use tracing::debug;

use crate::db::{BatchQuery, Database, EmailEntry, EmailRepository, EmailUpdate};
use crate::{MailError, Result};

/// Registry handle. Cloning is cheap; all clones share one database.
#[derive(Debug, Clone)]
pub struct MailingList {
    db: Arc<Database>,
}

impl MailingList {
    /// Create a registry over an opened database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the underlying database.
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    fn repo(&self) -> EmailRepository<'_> {
        EmailRepository::new(self.db.pool())
    }

    /// Register a new address and return the stored entry.
    pub async fn create(&self, email: &str) -> Result<Option<EmailEntry>> {
        let email = require_email(email)?;
        let entry = self.repo().create(email).await?;
        debug!(id = entry.id, email, "Created entry");
        Ok(Some(entry))
    }

    /// Look up an address.
    pub async fn get(&self, email: &str) -> Result<Option<EmailEntry>> {
        let email = require_email(email)?;
        self.repo().get_by_email(email).await
    }

    /// Insert or overwrite an entry and return the stored result.
    pub async fn update(&self, update: &EmailUpdate) -> Result<Option<EmailEntry>> {
        require_email(&update.email)?;
        let entry = self.repo().upsert(update).await?;
        Ok(Some(entry))
    }

    /// Opt an address out and return the entry as it now stands.
    ///
    /// Unknown addresses yield `Ok(None)`.
    pub async fn delete(&self, email: &str) -> Result<Option<EmailEntry>> {
        let email = require_email(email)?;
        let repo = self.repo();
        if !repo.soft_delete(email).await? {
            debug!(email, "Delete of unknown address ignored");
            return Ok(None);
        }
        repo.get_by_email(email).await
    }

    /// One page of subscribed entries.
    pub async fn batch(&self, page: i64, count: i64) -> Result<Vec<EmailEntry>> {
        let query = BatchQuery::new(page, count)?;
        self.repo().list_page(&query).await
    }

    /// Number of entries that have not opted out.
    pub async fn subscriber_count(&self) -> Result<i64> {
        self.repo().count_subscribed().await
    }
}

/// Presence check on the lookup key.
fn require_email(email: &str) -> Result<&str> {
    if email.trim().is_empty() {
        return Err(MailError::Validation("email is required".to_string()));
    }
    Ok(email)
}
