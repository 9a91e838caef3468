//! `olxwatch-store` — SQLite-backed tracked-term registry and seen-listing
//! store.
//!
//! Both contracts are served by one [`SqliteStore`] handle over a shared
//! connection: the tracked-term table is the durable source of truth the
//! scheduler is rebuilt from on startup, and the seen-listing table is the
//! insert-only duplicate-suppression record.

pub mod db;
pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::SqliteStore;
