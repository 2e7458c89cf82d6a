//! Diesel table definitions for the PostgreSQL schema.
//!
//! Keep in step with the `movies` table:
//!
//! ```sql
//! CREATE TABLE movies (
//!     id BIGSERIAL PRIMARY KEY,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     title TEXT NOT NULL,
//!     year INTEGER NOT NULL,
//!     runtime_minutes INTEGER NOT NULL,
//!     genres TEXT[] NOT NULL,
//!     version INTEGER NOT NULL DEFAULT 1
//! );
//! ```

diesel::table! {
    /// Movie catalogue.
    movies (id) {
        /// Primary key assigned by the sequence.
        id -> Int8,
        /// Insertion timestamp; never returned to clients.
        created_at -> Timestamptz,
        title -> Text,
        year -> Int4,
        runtime_minutes -> Int4,
        /// Ordered list of distinct genre names.
        genres -> Array<Text>,
        /// Starts at 1 and grows by one per update.
        version -> Int4,
    }
}
