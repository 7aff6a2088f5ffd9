//! Reader state database schema.

/// SQL to create the reader state table.
pub const CREATE_READER_STATE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS reader_state (
    key        TEXT PRIMARY KEY NOT NULL,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";
