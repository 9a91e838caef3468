//! `olxwatch-scheduler` — per-(user, term) polling scheduler with duplicate
//! suppression.
//!
//! # Overview
//!
//! Every tracked (user, term) pair owns one recurring [`Job`] with an
//! explicit next-fire deadline. [`PollScheduler::run`] ticks once a second
//! and dispatches each due job's body (search the marketplace, filter
//! against the seen-set, notify new listings, record them) onto its own
//! tokio task, so a slow upstream call never delays due-detection for other
//! jobs.
//!
//! Job lifecycle (`schedule` / `cancel` / `bulk_restore`) is callable
//! concurrently from request-handling code; all job-map mutations happen
//! under a single mutex.

pub mod engine;
pub mod job;

pub use engine::{notification_text, PollScheduler};
pub use job::{Job, JobId};
