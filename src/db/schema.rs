//! Database schema for the mailing list registry.
//!
//! There is a single table and no migration history: the table is created
//! on startup and left alone when it already exists.

/// Name of the subscriber table.
pub const EMAILS_TABLE: &str = "emails";

/// Creates the subscriber table.
///
/// No `IF NOT EXISTS` here; `Database::ensure_schema` treats the resulting
/// "already exists" failure as success.
pub const CREATE_EMAILS_TABLE: &str = r#"
CREATE TABLE emails (
    id            INTEGER PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    confirmed_at  INTEGER NOT NULL DEFAULT 0,  -- epoch seconds, 0 = unconfirmed
    opt_out       INTEGER NOT NULL DEFAULT 0   -- 1 = unsubscribed (soft delete)
)
"#;
