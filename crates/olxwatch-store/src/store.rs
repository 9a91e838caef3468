use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::Connection;
use tracing::debug;

use olxwatch_core::{RegistryError, SeenStore, TrackedTermRegistry, UserId};

use crate::db::init_db;
use crate::error::Result;

/// Shared handle over a single SQLite connection.
///
/// Cloneable: the Telegram handler path and the scheduler's firing bodies
/// call into it concurrently, serialised by the inner mutex.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Wrap `conn`, running the schema migration first.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn insert_term(&self, user: &UserId, term: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "INSERT OR IGNORE INTO tracked_terms (user_id, term, created_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![user.as_str(), term, Utc::now().to_rfc3339()],
        )?;
        if n > 0 {
            debug!(user = %user, %term, "term added");
        }
        Ok(n > 0)
    }

    fn delete_term(&self, user: &UserId, term: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "DELETE FROM tracked_terms WHERE user_id = ?1 AND term = ?2",
            rusqlite::params![user.as_str(), term],
        )?;
        if n > 0 {
            debug!(user = %user, %term, "term removed");
        }
        Ok(n > 0)
    }

    fn terms_for(&self, user: &UserId) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT term FROM tracked_terms WHERE user_id = ?1 ORDER BY created_at",
        )?;
        let terms = stmt
            .query_map([user.as_str()], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(terms)
    }

    fn distinct_users(&self) -> Result<Vec<UserId>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT DISTINCT user_id FROM tracked_terms ORDER BY user_id")?;
        let users = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .map(UserId::from)
            .collect();
        Ok(users)
    }

    fn seen_exists(&self, user: &UserId, listing_url: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let exists = conn.query_row(
            "SELECT EXISTS(
                 SELECT 1 FROM seen_listings WHERE user_id = ?1 AND listing_url = ?2
             )",
            rusqlite::params![user.as_str(), listing_url],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }

    fn insert_seen(&self, user: &UserId, listing_url: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO seen_listings (user_id, listing_url, notified_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![user.as_str(), listing_url, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl TrackedTermRegistry for SqliteStore {
    fn list_terms(&self, user: &UserId) -> std::result::Result<Vec<String>, RegistryError> {
        Ok(self.terms_for(user)?)
    }

    fn add_term(&self, user: &UserId, term: &str) -> std::result::Result<bool, RegistryError> {
        Ok(self.insert_term(user, term)?)
    }

    fn remove_term(&self, user: &UserId, term: &str) -> std::result::Result<bool, RegistryError> {
        Ok(self.delete_term(user, term)?)
    }

    fn list_all_users(&self) -> std::result::Result<Vec<UserId>, RegistryError> {
        Ok(self.distinct_users()?)
    }
}

impl SeenStore for SqliteStore {
    fn has_seen(
        &self,
        user: &UserId,
        listing_url: &str,
    ) -> std::result::Result<bool, RegistryError> {
        Ok(self.seen_exists(user, listing_url)?)
    }

    fn mark_seen(&self, user: &UserId, listing_url: &str) -> std::result::Result<(), RegistryError> {
        Ok(self.insert_seen(user, listing_url)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn add_term_is_set_insert() {
        let s = store();
        let u = UserId::from("100");
        assert!(s.add_term(&u, "phone").unwrap());
        assert!(!s.add_term(&u, "phone").unwrap());
        assert_eq!(s.list_terms(&u).unwrap(), vec!["phone"]);
    }

    #[test]
    fn remove_term_is_idempotent() {
        let s = store();
        let u = UserId::from("100");
        s.add_term(&u, "laptop").unwrap();
        assert!(s.remove_term(&u, "laptop").unwrap());
        assert!(!s.remove_term(&u, "laptop").unwrap());
        assert!(s.list_terms(&u).unwrap().is_empty());
    }

    #[test]
    fn terms_are_scoped_per_user() {
        let s = store();
        s.add_term(&UserId::from("1"), "phone").unwrap();
        s.add_term(&UserId::from("2"), "tablet").unwrap();
        assert_eq!(s.list_terms(&UserId::from("1")).unwrap(), vec!["phone"]);
        assert_eq!(s.list_terms(&UserId::from("2")).unwrap(), vec!["tablet"]);
    }

    #[test]
    fn list_all_users_is_distinct() {
        let s = store();
        let u1 = UserId::from("1");
        s.add_term(&u1, "phone").unwrap();
        s.add_term(&u1, "laptop").unwrap();
        s.add_term(&UserId::from("2"), "tablet").unwrap();
        let users = s.list_all_users().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.contains(&UserId::from("1")));
        assert!(users.contains(&UserId::from("2")));
    }

    #[test]
    fn seen_set_membership() {
        let s = store();
        let u = UserId::from("100");
        assert!(!s.has_seen(&u, "https://example.com/offer/1").unwrap());
        s.mark_seen(&u, "https://example.com/offer/1").unwrap();
        assert!(s.has_seen(&u, "https://example.com/offer/1").unwrap());
        // Re-marking never fails.
        s.mark_seen(&u, "https://example.com/offer/1").unwrap();
    }

    #[test]
    fn seen_set_is_per_user() {
        let s = store();
        s.mark_seen(&UserId::from("1"), "https://example.com/offer/1")
            .unwrap();
        assert!(!s
            .has_seen(&UserId::from("2"), "https://example.com/offer/1")
            .unwrap());
    }
}
