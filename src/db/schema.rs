//! Database schema and migrations for Materials Hub.
//!
//! Migrations are applied sequentially when the database is opened;
//! the schema_version table tracks which have already run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users table for account management
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    email       TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password    TEXT NOT NULL,           -- Argon2 hash
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    last_login  TEXT,
    is_active   INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX idx_users_email ON users(email);
"#,
    // v2: refresh tokens for session management
    r#"
CREATE TABLE refresh_tokens (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token       TEXT NOT NULL UNIQUE,
    expires_at  TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    revoked_at  TEXT
);

CREATE INDEX idx_refresh_tokens_token ON refresh_tokens(token);
CREATE INDEX idx_refresh_tokens_user_id ON refresh_tokens(user_id);
"#,
    // v3: files table for uploaded material records
    r#"
CREATE TABLE files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT,
    file_name   TEXT NOT NULL,           -- original name, used for downloads
    file_path   TEXT NOT NULL UNIQUE,    -- storage path (uploads/<ts>.<ext>)
    file_url    TEXT NOT NULL,           -- publicly resolvable locator
    file_type   TEXT NOT NULL,           -- declared MIME type
    file_size   INTEGER NOT NULL,
    uploaded_by INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_created_at ON files(created_at);
CREATE INDEX idx_files_uploaded_by ON files(uploaded_by);
"#,
];
