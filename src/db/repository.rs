//! Email repository.
//!
//! This module provides the create / read / upsert / soft-delete / page
//! operations on the `emails` table.

use sqlx::SqlitePool;

use super::email::{BatchQuery, EmailEntry, EmailUpdate};
use crate::{MailError, Result};

/// Repository for subscriber entries.
pub struct EmailRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EmailRepository<'a> {
    /// Create a new EmailRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new, unconfirmed and subscribed entry.
    ///
    /// Fails with `MailError::Duplicate` when the address already exists.
    pub async fn create(&self, email: &str) -> Result<EmailEntry> {
        sqlx::query("INSERT INTO emails (email, confirmed_at, opt_out) VALUES (?, 0, false)")
            .bind(email)
            .execute(self.pool)
            .await?;

        self.get_by_email(email)
            .await?
            .ok_or_else(|| MailError::NotFound(format!("email {email}")))
    }

    /// Get an entry by address. `Ok(None)` when no row matches.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<EmailEntry>> {
        let entry = sqlx::query_as::<_, EmailEntry>(
            "SELECT id, email, confirmed_at, opt_out FROM emails WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(entry)
    }

    /// Insert or overwrite an entry keyed by address.
    ///
    /// An existing row keeps its ID; only `confirmed_at` and `opt_out` change.
    pub async fn upsert(&self, update: &EmailUpdate) -> Result<EmailEntry> {
        sqlx::query(
            "INSERT INTO emails (email, confirmed_at, opt_out) VALUES (?, ?, ?)
             ON CONFLICT(email) DO UPDATE SET
                 confirmed_at = excluded.confirmed_at,
                 opt_out = excluded.opt_out",
        )
        .bind(&update.email)
        .bind(update.confirmed_at)
        .bind(update.opt_out)
        .execute(self.pool)
        .await?;

        self.get_by_email(&update.email)
            .await?
            .ok_or_else(|| MailError::NotFound(format!("email {}", update.email)))
    }

    /// Mark an entry as opted out.
    ///
    /// Returns false when the address is unknown; that is not an error.
    pub async fn soft_delete(&self, email: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE emails SET opt_out = true WHERE email = ?")
            .bind(email)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List one page of subscribed entries ordered by ID.
    pub async fn list_page(&self, query: &BatchQuery) -> Result<Vec<EmailEntry>> {
        let entries = sqlx::query_as::<_, EmailEntry>(
            "SELECT id, email, confirmed_at, opt_out FROM emails
             WHERE opt_out = false
             ORDER BY id ASC
             LIMIT ? OFFSET ?",
        )
        .bind(query.count())
        .bind(query.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Count entries that have not opted out.
    pub async fn count_subscribed(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emails WHERE opt_out = false")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_email() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        let entry = repo.create("a@example.com").await.unwrap();

        assert_eq!(entry.id, 1);
        assert_eq!(entry.email, "a@example.com");
        assert_eq!(entry.confirmed_at, 0);
        assert!(!entry.opt_out);
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        let original = EmailUpdate::new("a@example.com")
            .with_confirmed_at(1_000);
        let original = repo.upsert(&original).await.unwrap();

        let result = repo.create("a@example.com").await;
        assert!(matches!(result, Err(MailError::Duplicate(_))));

        // Original row is untouched
        let found = repo.get_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found, original);
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        repo.create("a@example.com").await.unwrap();

        let found = repo.get_by_email("a@example.com").await.unwrap();
        assert_eq!(found.unwrap().email, "a@example.com");

        let not_found = repo.get_by_email("nobody@example.com").await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_upsert_creates_missing_entry() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        let update = EmailUpdate::new("new@example.com").with_opt_out(true);
        let entry = repo.upsert(&update).await.unwrap();

        assert_eq!(entry.email, "new@example.com");
        assert!(entry.opt_out);
        assert_eq!(entry.confirmed_at, 0);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_entry() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        repo.create("first@example.com").await.unwrap();
        let created = repo.create("a@example.com").await.unwrap();

        let update = EmailUpdate::new("a@example.com")
            .with_confirmed_at(15_081_998)
            .with_opt_out(true);
        let updated = repo.upsert(&update).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.confirmed_at, 15_081_998);
        assert!(updated.opt_out);
    }

    #[tokio::test]
    async fn test_upsert_timestamp_round_trip() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        for epoch in [907_200_000_i64, -1, 1, i64::MAX, i64::MIN] {
            let email = format!("t{epoch}@example.com");
            let update = EmailUpdate::new(email.as_str()).with_confirmed_at(epoch);
            let stored = repo.upsert(&update).await.unwrap();
            assert_eq!(stored.confirmed_at, epoch);

            let found = repo.get_by_email(&email).await.unwrap().unwrap();
            assert_eq!(found.confirmed_at, epoch);
        }
    }

    #[tokio::test]
    async fn test_soft_delete() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        repo.create("a@example.com").await.unwrap();
        assert!(repo.soft_delete("a@example.com").await.unwrap());

        // Still readable, now opted out
        let found = repo.get_by_email("a@example.com").await.unwrap().unwrap();
        assert!(found.opt_out);

        // Gone from the page view
        let page = repo.list_page(&BatchQuery::new(1, 10).unwrap()).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_soft_delete_unknown_email() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        assert!(!repo.soft_delete("nobody@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_page() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        for i in 1..=5 {
            repo.create(&format!("user{i}@example.com")).await.unwrap();
        }

        let page1 = repo.list_page(&BatchQuery::new(1, 2).unwrap()).await.unwrap();
        let page2 = repo.list_page(&BatchQuery::new(2, 2).unwrap()).await.unwrap();
        let page3 = repo.list_page(&BatchQuery::new(3, 2).unwrap()).await.unwrap();
        let page4 = repo.list_page(&BatchQuery::new(4, 2).unwrap()).await.unwrap();

        let emails = |page: &[EmailEntry]| -> Vec<String> {
            page.iter().map(|e| e.email.clone()).collect()
        };
        assert_eq!(emails(&page1), ["user1@example.com", "user2@example.com"]);
        assert_eq!(emails(&page2), ["user3@example.com", "user4@example.com"]);
        assert_eq!(emails(&page3), ["user5@example.com"]);
        assert!(page4.is_empty());
    }

    #[tokio::test]
    async fn test_list_page_skips_opted_out() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        for i in 1..=4 {
            repo.create(&format!("user{i}@example.com")).await.unwrap();
        }
        repo.soft_delete("user2@example.com").await.unwrap();

        let page = repo.list_page(&BatchQuery::new(1, 2).unwrap()).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|e| e.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[tokio::test]
    async fn test_count_subscribed() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        assert_eq!(repo.count_subscribed().await.unwrap(), 0);

        repo.create("a@example.com").await.unwrap();
        repo.create("b@example.com").await.unwrap();
        repo.soft_delete("a@example.com").await.unwrap();

        assert_eq!(repo.count_subscribed().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_page_keeps_extreme_timestamps() {
        let db = setup_db().await;
        let repo = EmailRepository::new(db.pool());

        repo.create("plain@example.com").await.unwrap();
        repo.upsert(&EmailUpdate::new("far@example.com").with_confirmed_at(10_000_000_000_000))
            .await
            .unwrap();
        repo.upsert(&EmailUpdate::new("min@example.com").with_confirmed_at(i64::MIN))
            .await
            .unwrap();

        let page = repo.list_page(&BatchQuery::new(1, 10).unwrap()).await.unwrap();
        let stamps: Vec<i64> = page.iter().map(|e| e.confirmed_at).collect();
        assert_eq!(stamps, [0, 10_000_000_000_000, i64::MIN]);
    }
}
