//! `olxwatch-core` — shared contracts, types, and configuration.
//!
//! The scheduler, the stores, the OLX client, and the Telegram surface all
//! meet at the traits defined here, so every crate except the binary depends
//! only on this one and its own backend.

pub mod config;
pub mod contract;
pub mod error;
pub mod types;

pub use contract::{ListingSource, Notifier, SeenStore, TrackedTermRegistry};
pub use error::{ConfigError, DeliveryError, FetchError, RegistryError};
pub use types::{Listing, UserId};
