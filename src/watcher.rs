//! # Subscription watcher: the harvesting pipeline.
//!
//! [`SubscriptionWatcher`] fetches the current subscriptions at a fixed
//! cadence, queries the content available for a moving time window per
//! content type, downloads the audit records behind each new content
//! blob and hands them to a [`Handler`].
//!
//! ## Architecture
//! ```text
//! ticker ──► sweep ──► list subscriptions
//!                          │ one job per content type
//!                          ▼
//!                 try_send to worker inbox (cap 1)
//!                    full? drop + warn (backpressure)
//!                          ▼
//!            ┌──── worker, one per content type ────┐
//!            │ content lister ──► audit fetcher     │
//!            │ (windowed, paginated)  (dedup, fetch)│
//!            └──────────────────┬───────────────────┘
//!                               ▼ fan-in
//!                        output channel ──► Handler
//! ```
//!
//! ## Rules
//! - At most one in-flight sweep per content type; a tick arriving while
//!   the lane is still draining is dropped, not queued.
//! - Progress cursors advance monotonically; a restart resumes from the
//!   persisted state without re-emitting or skipping records.
//! - Upstream failures are scoped to the unit of work they hit and
//!   retried by a later tick; they never cross a channel.
//! - Cancellation propagates through every call and send; the output
//!   channel closes once every worker has drained, which ends the
//!   handler's consume loop and resolves `run`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::client::ActivityApi;
use crate::config::WatcherConfig;
use crate::content_type::ContentType;
use crate::error::WatchError;
use crate::handler::Handler;
use crate::params::parse_content_created;
use crate::resource::{ResourceAudit, ResourceContent, ResourceSubscription};
use crate::state::State;
use crate::window::time_window;

/// One job slot per lane: a second sweep for the same content type is
/// dropped while the first is still draining.
const WORKER_INBOX_CAPACITY: usize = 1;
/// Hand-off depth between the content lister and the audit fetcher of a
/// single worker.
const STAGE_CAPACITY: usize = 1;
/// Fan-in depth between the workers and the handler.
const OUTPUT_CAPACITY: usize = ContentType::ALL.len();

/// Periodically harvests audit records for every active subscription.
pub struct SubscriptionWatcher {
    api: Arc<dyn ActivityApi>,
    config: WatcherConfig,
    state: Arc<dyn State>,
    handler: Arc<dyn Handler>,
}

impl SubscriptionWatcher {
    /// Creates a watcher; fails fast on an invalid configuration.
    pub fn new(
        api: Arc<dyn ActivityApi>,
        config: WatcherConfig,
        state: Arc<dyn State>,
        handler: Arc<dyn Handler>,
    ) -> Result<Self, WatchError> {
        config.validate()?;
        Ok(Self {
            api,
            config,
            state,
            handler,
        })
    }

    /// Runs the pipeline until `shutdown` is cancelled.
    ///
    /// Returns the handler's terminal result; transient upstream
    /// failures are logged and retried on the next tick instead of
    /// surfacing here.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), WatchError> {
        let token = shutdown.child_token();
        let (out_tx, out_rx) = mpsc::channel(OUTPUT_CAPACITY);

        let mut inboxes = HashMap::new();
        let mut workers = JoinSet::new();
        for ct in ContentType::ALL {
            info!("[{ct}] starting worker");
            let (job_tx, job_rx) = mpsc::channel(WORKER_INBOX_CAPACITY);
            inboxes.insert(ct, job_tx);

            let worker = Worker {
                content_type: ct,
                api: Arc::clone(&self.api),
                state: Arc::clone(&self.state),
                look_behind: self.config.look_behind(),
            };
            workers.spawn(worker.run(job_rx, out_tx.clone(), token.clone()));
        }
        // workers hold the only output senders left; the channel closes
        // once every lane has exited
        drop(out_tx);

        let ticker = tokio::spawn(run_ticker(
            Arc::clone(&self.api),
            self.config,
            inboxes,
            token.clone(),
        ));
        let reaper = tokio::spawn(async move { while workers.join_next().await.is_some() {} });

        let result = self.handler.handle(out_rx).await;

        // a handler error tears the pipeline down as well
        token.cancel();
        let _ = ticker.await;
        let _ = reaper.await;
        result.map_err(WatchError::from)
    }
}

/// Owns the sweep cadence and every worker inbox. Dropping the inboxes
/// on cancellation is what lets the workers drain and exit.
async fn run_ticker(
    api: Arc<dyn ActivityApi>,
    config: WatcherConfig,
    inboxes: HashMap<ContentType, mpsc::Sender<ResourceSubscription>>,
    token: CancellationToken,
) {
    let mut ticker = interval(config.ticker_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "watcher started: lookBehindMinutes={} tickerIntervalSeconds={}",
        config.look_behind_minutes, config.ticker_interval_seconds
    );
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => sweep(api.as_ref(), &inboxes, Utc::now(), &token).await,
        }
    }
    for ct in inboxes.keys() {
        info!("[{ct}] closing worker");
    }
}

/// One tick's worth of work: list the subscriptions and offer one job
/// per content type to the owning lane.
async fn sweep(
    api: &dyn ActivityApi,
    inboxes: &HashMap<ContentType, mpsc::Sender<ResourceSubscription>>,
    request_time: DateTime<Utc>,
    token: &CancellationToken,
) {
    debug!("sweep: listing subscriptions");
    let subscriptions = tokio::select! {
        _ = token.cancelled() => return,
        listed = api.subscriptions() => match listed {
            Ok(subscriptions) => subscriptions,
            Err(err) => {
                if !token.is_cancelled() {
                    error!("sweep: listing subscriptions: {err}");
                }
                return;
            }
        },
    };

    for subscription in subscriptions {
        let ct: ContentType = match subscription.content_type.parse() {
            Ok(ct) => ct,
            Err(err) => {
                error!("sweep: mapping content type: {err}");
                continue;
            }
        };
        let Some(inbox) = inboxes.get(&ct) else {
            error!("[{ct}] no worker registered for content type");
            continue;
        };
        let job = ResourceSubscription {
            content_type: ct,
            request_time,
            subscription,
        };
        match inbox.try_send(job) {
            Ok(()) => debug!("[{ct}] sent work"),
            Err(mpsc::error::TrySendError::Full(_)) => warn!("[{ct}] worker is busy, skipping"),
            Err(mpsc::error::TrySendError::Closed(_)) => return,
        }
    }
}

/// A single content-type lane: blocks on its inbox and runs the two
/// chained stages for every accepted sweep.
struct Worker {
    content_type: ContentType,
    api: Arc<dyn ActivityApi>,
    state: Arc<dyn State>,
    look_behind: Duration,
}

impl Worker {
    async fn run(
        self,
        mut inbox: mpsc::Receiver<ResourceSubscription>,
        out: mpsc::Sender<ResourceAudit>,
        token: CancellationToken,
    ) {
        while let Some(job) = inbox.recv().await {
            let (content_tx, content_rx) = mpsc::channel(STAGE_CAPACITY);
            tokio::join!(
                self.list_content(job, content_tx, &token),
                self.fetch_audits(content_rx, &out, &token),
            );
        }
    }

    /// ContentLister stage: walks `(start, end)` windows derived from
    /// the stored cursor until the window reaches the sweep's request
    /// time, streaming every descriptor downstream.
    ///
    /// A content-list failure aborts the sweep without advancing
    /// `lastRequestTime`, so the next tick retries the same window.
    async fn list_content(
        &self,
        job: ResourceSubscription,
        tx: mpsc::Sender<ResourceContent>,
        token: &CancellationToken,
    ) {
        let ct = self.content_type;
        debug!("[{ct}] content: start, requestTime={}", job.request_time);

        let mut end = job.request_time;
        loop {
            let start = self.state.last_request_time(ct);
            let (start, new_end) = time_window(self.look_behind, job.request_time, start, end);
            end = new_end;
            debug!("[{ct}] content: window start={start} end={end}");

            let content = tokio::select! {
                _ = token.cancelled() => return,
                listed = self.api.content(ct, Some(start), Some(end)) => match listed {
                    Ok(content) => content,
                    Err(err) => {
                        if !token.is_cancelled() {
                            error!("[{ct}] content: could not fetch content: {err}");
                        }
                        return;
                    }
                },
            };
            for descriptor in content {
                let resource = ResourceContent {
                    content_type: ct,
                    request_time: job.request_time,
                    content: descriptor,
                };
                tokio::select! {
                    _ = token.cancelled() => return,
                    sent = tx.send(resource) => {
                        if sent.is_err() {
                            return;
                        }
                    }
                }
            }
            self.state.set_last_request_time(ct, end);
            debug!("[{ct}] content: set lastRequestTime={end}");

            if end >= job.request_time {
                break;
            }
        }
        debug!("[{ct}] content: end");
    }

    /// AuditFetcher stage: parses each descriptor's creation time, drops
    /// anything not strictly newer than `lastContentCreated`, then
    /// downloads and emits the record batch.
    ///
    /// The cursor is advanced before the fetch; a descriptor whose fetch
    /// keeps failing is therefore skipped for good once passed. Callers
    /// needing stronger durability wrap the fetch in retries upstream.
    async fn fetch_audits(
        &self,
        mut rx: mpsc::Receiver<ResourceContent>,
        out: &mpsc::Sender<ResourceAudit>,
        token: &CancellationToken,
    ) {
        let ct = self.content_type;
        while let Some(resource) = rx.recv().await {
            let last = self.state.last_content_created(ct);
            let created = match parse_content_created(&resource.content.content_created) {
                Ok(created) => created,
                Err(err) => {
                    error!("[{ct}] audit: could not parse contentCreated: {err}");
                    continue;
                }
            };
            if last.is_some_and(|last| created <= last) {
                debug!("[{ct}] audit: content skipped, created={created}");
                continue;
            }
            self.state.set_last_content_created(ct, created);
            debug!("[{ct}] audit: set lastContentCreated={created}");

            let records = tokio::select! {
                _ = token.cancelled() => return,
                fetched = self.api.audit(&resource.content.content_id) => match fetched {
                    Ok(records) => records,
                    Err(err) => {
                        if !token.is_cancelled() {
                            error!("[{ct}] audit: could not fetch audits: {err}");
                        }
                        continue;
                    }
                },
            };
            for record in records {
                let audit = ResourceAudit {
                    content_type: ct,
                    request_time: resource.request_time,
                    record,
                };
                tokio::select! {
                    _ = token.cancelled() => return,
                    sent = out.send(audit) => {
                        if sent.is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }
}
