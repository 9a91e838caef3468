use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use olxwatch_core::{
    Listing, ListingSource, Notifier, RegistryError, SeenStore, TrackedTermRegistry, UserId,
};

use crate::job::{Job, JobId};

/// Polling scheduler. Owns one recurring job per tracked (user, term) pair.
///
/// `schedule` and `cancel` are called from the Telegram handler path while
/// the tick loop runs; every mutation of the job map, including due-job
/// dispatch, happens under one mutex. A `cancel` that has returned therefore
/// excludes any later firing of that job (an already-dispatched firing may
/// still complete; accepted race).
pub struct PollScheduler {
    jobs: Mutex<HashMap<JobId, Job>>,
    source: Arc<dyn ListingSource>,
    notifier: Arc<dyn Notifier>,
    seen: Arc<dyn SeenStore>,
}

impl PollScheduler {
    pub fn new(
        source: Arc<dyn ListingSource>,
        notifier: Arc<dyn Notifier>,
        seen: Arc<dyn SeenStore>,
    ) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            source,
            notifier,
            seen,
        }
    }

    /// Register a recurring poll for `(user_id, term)`.
    ///
    /// Idempotent: an already-live job is left untouched. The first firing
    /// happens one full `interval` after this call; nothing is polled
    /// immediately, and no I/O happens here.
    pub fn schedule(&self, user_id: UserId, term: &str, interval: Duration) -> JobId {
        let id = JobId::derive(&user_id, term);
        let mut jobs = self.jobs.lock().unwrap();
        if jobs.contains_key(&id) {
            info!(job_id = %id, "job already scheduled");
            return id;
        }
        jobs.insert(
            id.clone(),
            Job {
                user_id,
                term: term.to_string(),
                interval,
                next_run: Utc::now() + to_chrono(interval),
            },
        );
        info!(job_id = %id, interval_secs = interval.as_secs(), "job scheduled");
        id
    }

    /// Stop future firings of `job_id`. Unknown ids are a logged no-op.
    pub fn cancel(&self, job_id: &JobId) {
        let mut jobs = self.jobs.lock().unwrap();
        if jobs.remove(job_id).is_some() {
            info!(job_id = %job_id, "job cancelled");
        } else {
            info!(job_id = %job_id, "cancel for unknown job ignored");
        }
    }

    /// Rebuild the job set from the durable registry.
    ///
    /// Called once at startup so a restart resumes every tracked term.
    /// Idempotent per job, so it is safe to call with jobs already live.
    /// Returns the number of live jobs afterwards.
    pub fn bulk_restore(
        &self,
        registry: &dyn TrackedTermRegistry,
        interval: Duration,
    ) -> Result<usize, RegistryError> {
        for user in registry.list_all_users()? {
            for term in registry.list_terms(&user)? {
                self.schedule(user.clone(), &term, interval);
            }
        }
        Ok(self.job_count())
    }

    /// Number of live jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// Dispatch every job whose deadline has arrived, re-arming each for its
    /// next interval.
    ///
    /// Returns the spawned firing handles so tests can await completion; the
    /// tick loop drops them. Dispatch happens under the job-map lock:
    /// `tokio::spawn` does not block, and holding the lock keeps firing
    /// starts linearizable with `cancel`.
    pub fn fire_due(&self, now: DateTime<Utc>) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        let mut jobs = self.jobs.lock().unwrap();
        for (id, job) in jobs.iter_mut() {
            if job.next_run > now {
                continue;
            }
            job.next_run = now + to_chrono(job.interval);
            debug!(job_id = %id, term = %job.term, "firing job");

            let source = Arc::clone(&self.source);
            let notifier = Arc::clone(&self.notifier);
            let seen = Arc::clone(&self.seen);
            let job_id = id.clone();
            let user_id = job.user_id.clone();
            let term = job.term.clone();
            handles.push(tokio::spawn(async move {
                run_firing(job_id, user_id, term, source, notifier, seen).await;
            }));
        }
        handles
    }

    /// Drive the tick loop until `shutdown` broadcasts `true`.
    ///
    /// Ticks every second; due-job bodies run on their own tasks, so the
    /// loop itself never waits on network I/O and no job failure can
    /// terminate it.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!("poll scheduler started");
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let _ = self.fire_due(Utc::now());
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("poll scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }
}

/// One poll-filter-notify-record cycle for a single job.
///
/// Failure handling per listing: a failed delivery is logged and NOT marked
/// seen, so the next firing retries it (at-least-once until a send
/// succeeds, at-most-once after). A failed seen-set write after a
/// successful send is logged and may produce one duplicate next firing,
/// preferred over losing the notification entirely.
async fn run_firing(
    job_id: JobId,
    user_id: UserId,
    term: String,
    source: Arc<dyn ListingSource>,
    notifier: Arc<dyn Notifier>,
    seen: Arc<dyn SeenStore>,
) {
    let listings = match source.search(&term).await {
        Ok(listings) => listings,
        Err(e) => {
            // Transient by assumption: the job stays scheduled and the next
            // interval retries.
            warn!(job_id = %job_id, error = %e, "search failed, skipping firing");
            return;
        }
    };

    for listing in &listings {
        match seen.has_seen(&user_id, &listing.url) {
            Ok(true) => continue,
            Ok(false) => {}
            Err(e) => {
                warn!(
                    job_id = %job_id,
                    url = %listing.url,
                    error = %e,
                    "seen-set lookup failed, skipping listing"
                );
                continue;
            }
        }

        match notifier.send(&user_id, &notification_text(listing)).await {
            Ok(()) => {
                info!(job_id = %job_id, url = %listing.url, "notified new listing");
                if let Err(e) = seen.mark_seen(&user_id, &listing.url) {
                    error!(
                        job_id = %job_id,
                        url = %listing.url,
                        error = %e,
                        "failed to record seen listing"
                    );
                }
            }
            Err(e) => {
                warn!(
                    job_id = %job_id,
                    url = %listing.url,
                    error = %e,
                    "notification failed"
                );
            }
        }
    }
}

/// Message body for one newly found listing.
pub fn notification_text(listing: &Listing) -> String {
    let price = listing
        .price_label
        .as_deref()
        .unwrap_or("Price not available");
    format!(
        "🔔 New Product Found!\n\nTitle: {}\nPrice: {}\n{}\n",
        listing.title, price, listing.url
    )
}

fn to_chrono(interval: Duration) -> chrono::Duration {
    chrono::Duration::from_std(interval).unwrap_or_else(|_| chrono::Duration::days(36500))
}
