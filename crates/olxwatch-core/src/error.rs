use thiserror::Error;

/// The upstream search failed for this cycle.
///
/// Always treated as transient: the caller skips the cycle and the recurring
/// schedule is the retry mechanism.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("search request failed: {0}")]
    Http(String),

    #[error("malformed search response: {0}")]
    Malformed(String),
}

/// A single notification could not be delivered.
///
/// Per-call and non-fatal: one failed delivery never aborts the batch it
/// belongs to.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid recipient id: {0}")]
    BadRecipient(String),

    #[error("send failed: {0}")]
    Send(String),
}

/// The durable term/seen datastore is unavailable or rejected an operation.
///
/// Surfaced to the user-facing caller so an add/remove request is reported
/// as failed instead of silently dropped.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("datastore error: {0}")]
    Datastore(String),
}

/// Configuration could not be loaded or parsed.
#[derive(Debug, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);
