use rusqlite::Connection;

use crate::error::Result;

/// Initialise the watcher schema in `conn`.
///
/// CREATE IF NOT EXISTS throughout, so calling it on every startup is safe.
/// Composite primary keys give both tables set semantics: re-inserting an
/// existing (user, term) or (user, url) pair is a no-op via INSERT OR IGNORE.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tracked_terms (
            user_id     TEXT NOT NULL,
            term        TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            PRIMARY KEY (user_id, term)
        ) STRICT;

        CREATE TABLE IF NOT EXISTS seen_listings (
            user_id      TEXT NOT NULL,
            listing_url  TEXT NOT NULL,
            notified_at  TEXT NOT NULL,
            PRIMARY KEY (user_id, listing_url)
        ) STRICT;
        ",
    )?;
    Ok(())
}
