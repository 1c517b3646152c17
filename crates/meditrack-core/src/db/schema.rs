//! SQLite schema definition.

/// Local storage schema.
///
/// The client keeps no records of its own: everything here is a string
/// key/value pair mirroring browser `localStorage` semantics.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Local Storage (key/value)
-- ============================================================================

CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Key holding the signed-in user's identity blob.
pub const IDENTITY_KEY: &str = "user";

/// Prefix for per-medication prescriber snapshots.
pub const PRESCRIBER_KEY_PREFIX: &str = "meditrack-prescriber-";
