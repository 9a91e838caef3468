use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use olxwatch_core::UserId;

/// Unique key for a recurring poll task, derived from its (user, term) pair.
///
/// Deterministic derivation makes re-scheduling the same pair naturally
/// idempotent and lets cancellation find the job without a separate index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn derive(user: &UserId, term: &str) -> Self {
        Self(format!("{}_{}", user.as_str(), term))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One live recurring poll task.
///
/// `next_run` is the explicit deadline the tick loop checks; it is re-armed
/// to `now + interval` every time the job fires.
#[derive(Debug, Clone)]
pub struct Job {
    pub user_id: UserId,
    pub term: String,
    pub interval: Duration,
    pub next_run: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_is_deterministic() {
        let u = UserId::from("42");
        assert_eq!(JobId::derive(&u, "phone"), JobId::derive(&u, "phone"));
        assert_eq!(JobId::derive(&u, "phone").as_str(), "42_phone");
    }

    #[test]
    fn job_id_differs_per_pair() {
        let u1 = UserId::from("1");
        let u2 = UserId::from("2");
        assert_ne!(JobId::derive(&u1, "phone"), JobId::derive(&u2, "phone"));
        assert_ne!(JobId::derive(&u1, "phone"), JobId::derive(&u1, "laptop"));
    }
}
