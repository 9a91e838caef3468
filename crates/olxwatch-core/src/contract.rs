//! Contracts between the polling core and its collaborators.
//!
//! The scheduler only ever sees these traits; the concrete OLX client,
//! Telegram notifier, and SQLite store plug in behind them.

use async_trait::async_trait;

use crate::error::{DeliveryError, FetchError, RegistryError};
use crate::types::{Listing, UserId};

/// Marketplace search backend.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Current listings matching `term`, in the order the marketplace
    /// returns them (newest first for OLX).
    async fn search(&self, term: &str) -> Result<Vec<Listing>, FetchError>;
}

/// Delivers one message to one recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &UserId, message: &str) -> Result<(), DeliveryError>;
}

/// Durable user → tracked-terms mapping. Set semantics per user.
pub trait TrackedTermRegistry: Send + Sync {
    fn list_terms(&self, user: &UserId) -> Result<Vec<String>, RegistryError>;

    /// Returns `true` when the term was newly added, `false` when the user
    /// already tracked it.
    fn add_term(&self, user: &UserId, term: &str) -> Result<bool, RegistryError>;

    /// Returns `true` when a term was actually removed.
    fn remove_term(&self, user: &UserId, term: &str) -> Result<bool, RegistryError>;

    /// Every user with at least one tracked term, for startup restore.
    fn list_all_users(&self) -> Result<Vec<UserId>, RegistryError>;
}

/// Listings already notified per user. Insert-only; concurrent callers safe.
pub trait SeenStore: Send + Sync {
    fn has_seen(&self, user: &UserId, listing_url: &str) -> Result<bool, RegistryError>;

    fn mark_seen(&self, user: &UserId, listing_url: &str) -> Result<(), RegistryError>;
}
