// crates/orchestrator/src/module.rs
//! The generic per-kind generation module.
//!
//! One instance exists per content kind; all 18 share this implementation
//! and differ only through [`crate::kinds`] and the per-kind data on
//! [`ContentKind`]. A module owns its saved-jobs cache and its single
//! in-flight slot, emits [`ModuleEvent`]s for its progress indicator and
//! viewer, and can adopt a job the server still reports in flight after a
//! reload.
//!
//! Every state write that happens after an await is guarded by the flight
//! token: the write applies only if the slot still belongs to the loop that
//! scheduled it, so a stale continuation can never clobber a newer job.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::broadcast;

use studio_client::{ClientError, JobClient};
use studio_types::{ContentKind, Job, JobStatus, Signal};

use crate::config::StudioConfig;
use crate::error::GenerateError;
use crate::kinds;
use crate::orchestrator::Orchestrator;
use crate::registry::Handler;
use crate::touch::RecentlyTouched;
use crate::ValidSourceIdIndex;

/// Events a module's UI (progress indicator, saved list, viewer) reacts to.
#[derive(Debug, Clone)]
pub enum ModuleEvent {
    /// A fresh in-flight snapshot; drives the progress indicator.
    Progress { job: Job },
    /// The job finished ready and was added to the saved list. The module's
    /// viewer should open with it.
    Completed { job: Job },
    /// The generation failed; `error` is the user-visible classification.
    Failed { error: GenerateError },
}

/// The single in-flight job, tagged with the token of the loop that owns it.
struct FlightSlot {
    token: u64,
    job: Option<Job>,
}

pub struct GenerationModule {
    kind: ContentKind,
    client: JobClient,
    config: StudioConfig,
    /// Read-through cache of terminal jobs, newest first. Server-owned;
    /// populated on mount, prepended to on completion.
    saved: RwLock<Vec<Job>>,
    in_flight: Mutex<Option<FlightSlot>>,
    next_token: AtomicU64,
    /// Latch so a fast remount can't start a second poll loop for the same
    /// adopted job.
    resuming: AtomicBool,
    /// Optimistic-write guard for saved-list refreshes.
    touched: RecentlyTouched,
    events_tx: broadcast::Sender<ModuleEvent>,
}

impl GenerationModule {
    pub fn new(kind: ContentKind, http: reqwest::Client, config: StudioConfig) -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(64);
        Arc::new(Self {
            kind,
            client: JobClient::new(http, config.api_url.clone(), kind),
            touched: RecentlyTouched::new(config.touch_grace),
            config,
            saved: RwLock::new(Vec::new()),
            in_flight: Mutex::new(None),
            next_token: AtomicU64::new(0),
            resuming: AtomicBool::new(false),
            events_tx,
        })
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ModuleEvent> {
        self.events_tx.subscribe()
    }

    /// Snapshot of the saved-jobs cache.
    pub fn saved_jobs(&self) -> Vec<Job> {
        match self.saved.read() {
            Ok(saved) => saved.clone(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading saved jobs: {e}");
                Vec::new()
            }
        }
    }

    /// Saved jobs whose originating source is still attached to the active
    /// context.
    pub fn visible_jobs(&self, index: &ValidSourceIdIndex) -> Vec<Job> {
        self.saved_jobs()
            .into_iter()
            .filter(|job| index.contains(&job.source_id))
            .collect()
    }

    /// Snapshot of the current in-flight job, if any.
    pub fn in_flight(&self) -> Option<Job> {
        match self.in_flight.lock() {
            Ok(slot) => slot.as_ref().and_then(|s| s.job.clone()),
            Err(e) => {
                tracing::error!("Mutex poisoned reading in-flight slot: {e}");
                None
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        match self.in_flight.lock() {
            Ok(slot) => slot.is_some(),
            Err(_) => false,
        }
    }

    /// The invoke function this module contributes to the handler registry.
    pub fn handler(self: &Arc<Self>) -> Handler {
        let module = Arc::clone(self);
        Arc::new(move |signal| {
            let module = Arc::clone(&module);
            Box::pin(async move { module.invoke(signal).await })
        })
    }

    /// Register with the orchestrator and load (plus possibly resume) this
    /// kind's jobs in the background. The feature module calls this once at
    /// mount; remounting is harmless.
    pub fn mount_on(self: &Arc<Self>, orchestrator: &Orchestrator) {
        orchestrator.register(self.kind, self.handler());
        let module = Arc::clone(self);
        tokio::spawn(async move { module.mount().await });
    }

    /// Load saved jobs from the server; adopt a still-running job if the
    /// server reports one and nothing is tracked locally.
    pub async fn mount(self: &Arc<Self>) {
        match self.client.list_jobs().await {
            Ok(jobs) => {
                if let Some(job) = self.apply_server_jobs(jobs) {
                    self.try_adopt(job);
                }
            }
            Err(e) => {
                // Leave the cache as-is; the next mount will retry.
                tracing::warn!(kind = %self.kind, "failed to load saved jobs: {e}");
            }
        }
    }

    /// Run one generation for one signal: extract → probe → start → poll.
    ///
    /// Every failure is converted to a user-visible [`ModuleEvent::Failed`]
    /// here (except `Busy`, which is a launcher defect, not a generation
    /// outcome). The returned error only feeds the registry's log.
    pub async fn invoke(self: &Arc<Self>, signal: Signal) -> Result<(), GenerateError> {
        let request =
            kinds::build_request(self.kind, &signal, &self.config).map_err(|e| self.surface(e))?;
        kinds::check_precondition(self.kind, &self.config).map_err(|e| self.surface(e))?;

        let token = match self.begin_flight() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(kind = %self.kind, "invoke while busy rejected");
                return Err(e);
            }
        };

        let started = match self.client.start(&request).await {
            Ok(started) => started,
            Err(e) => {
                self.clear_flight(token);
                return Err(self.surface(GenerateError::Start {
                    message: e.to_string(),
                }));
            }
        };

        // Seed the progress slot before the first status fetch lands.
        self.write_progress(
            token,
            Job {
                id: started.job_id.clone(),
                kind: self.kind,
                status: JobStatus::Pending,
                export_status: None,
                source_id: request.source_id.clone(),
                result: None,
                error_message: None,
            },
        );

        self.run_to_terminal(token, &started.job_id).await
    }

    /// Poll an already-started job to its terminal state and apply the
    /// outcome. Shared by `invoke` and the resume path.
    async fn run_to_terminal(
        self: &Arc<Self>,
        token: u64,
        job_id: &str,
    ) -> Result<(), GenerateError> {
        let module = Arc::clone(self);
        let outcome = self
            .client
            .poll(
                job_id,
                &self.config.poll,
                self.kind.max_poll_attempts(),
                Job::is_terminal,
                move |job| module.write_progress(token, job.clone()),
            )
            .await;

        match outcome {
            Ok(job) if job.status == JobStatus::Ready => {
                self.complete(token, job);
                Ok(())
            }
            Ok(job) => {
                self.clear_flight(token);
                let message = job
                    .error_message
                    .unwrap_or_else(|| "the generation service reported an error".into());
                Err(self.surface(GenerateError::JobFailed { message }))
            }
            Err(ClientError::Timeout { attempts, .. }) => {
                self.clear_flight(token);
                Err(self.surface(GenerateError::Timeout { attempts }))
            }
            Err(e) => {
                // poll() only fails with Timeout today; keep the arm total.
                self.clear_flight(token);
                Err(self.surface(GenerateError::JobFailed {
                    message: e.to_string(),
                }))
            }
        }
    }

    /// Adopt a server-side in-flight job: track it and poll it as if
    /// `invoke` had just been called, without starting anything.
    fn try_adopt(self: &Arc<Self>, job: Job) {
        if self.resuming.swap(true, Ordering::SeqCst) {
            tracing::debug!(kind = %self.kind, job_id = %job.id, "resume already active, skipping");
            return;
        }
        let token = match self.begin_flight() {
            Ok(token) => token,
            Err(_) => {
                // A user-initiated generation got there first.
                self.resuming.store(false, Ordering::SeqCst);
                tracing::debug!(kind = %self.kind, job_id = %job.id, "slot taken, not adopting");
                return;
            }
        };

        tracing::info!(kind = %self.kind, job_id = %job.id, "resuming in-flight job from server");
        self.write_progress(token, job.clone());

        let module = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = module.run_to_terminal(token, &job.id).await {
                tracing::warn!(kind = %module.kind, job_id = %job.id, "resumed job failed: {e}");
            }
            module.resuming.store(false, Ordering::SeqCst);
        });
    }

    /// Replace the saved cache from a server listing and return the job to
    /// adopt, if the server reports one still running.
    ///
    /// Terminal filter is per-kind: `ready` always stays; `error` stays only
    /// for kinds that keep failures visible. Locally-completed jobs inside
    /// their touch window survive a listing that doesn't include them yet —
    /// and a listing that still shows such a job in flight must not re-adopt
    /// it, or the finished job gets polled and prepended a second time.
    fn apply_server_jobs(&self, jobs: Vec<Job>) -> Option<Job> {
        let mut adoptable: Option<Job> = None;
        let mut kept: Vec<Job> = Vec::new();

        for job in jobs {
            if job.is_in_flight() {
                if self.touched.is_fresh(&job.id) {
                    tracing::debug!(kind = %self.kind, job_id = %job.id,
                        "listing lags a local completion, not adopting");
                } else if adoptable.is_none() {
                    adoptable = Some(job);
                } else {
                    tracing::warn!(kind = %self.kind, job_id = %job.id,
                        "server reports multiple in-flight jobs; adopting the newest only");
                }
                continue;
            }
            match job.status {
                JobStatus::Ready => kept.push(job),
                JobStatus::Error if self.kind.keeps_failed_jobs() => kept.push(job),
                _ => {}
            }
        }

        let fresh_local: Vec<Job> = self
            .saved_jobs()
            .into_iter()
            .filter(|job| {
                self.touched.is_fresh(&job.id) && kept.iter().all(|k| k.id != job.id)
            })
            .collect();

        let mut merged = fresh_local;
        merged.extend(kept);

        match self.saved.write() {
            Ok(mut saved) => *saved = merged,
            Err(e) => tracing::error!("RwLock poisoned writing saved jobs: {e}"),
        }
        adoptable
    }

    // -- Flight slot ----------------------------------------------------------

    fn begin_flight(&self) -> Result<u64, GenerateError> {
        match self.in_flight.lock() {
            Ok(mut slot) => {
                if slot.is_some() {
                    return Err(GenerateError::Busy { kind: self.kind });
                }
                let token = self.next_token.fetch_add(1, Ordering::SeqCst) + 1;
                *slot = Some(FlightSlot { token, job: None });
                Ok(token)
            }
            Err(e) => {
                tracing::error!("Mutex poisoned beginning flight: {e}");
                Err(GenerateError::Busy { kind: self.kind })
            }
        }
    }

    /// Token-guarded progress write: applies only while the slot still
    /// belongs to `token`.
    fn write_progress(&self, token: u64, job: Job) {
        match self.in_flight.lock() {
            Ok(mut slot) => match slot.as_mut() {
                Some(current) if current.token == token => {
                    current.job = Some(job.clone());
                    self.emit(ModuleEvent::Progress { job });
                }
                _ => {
                    tracing::debug!(kind = %self.kind, token, "stale progress write dropped");
                }
            },
            Err(e) => tracing::error!("Mutex poisoned writing progress: {e}"),
        }
    }

    fn clear_flight(&self, token: u64) {
        if let Ok(mut slot) = self.in_flight.lock() {
            if slot.as_ref().is_some_and(|s| s.token == token) {
                *slot = None;
            }
        }
    }

    fn complete(&self, token: u64, job: Job) {
        self.touched.touch(job.id.clone());
        match self.saved.write() {
            Ok(mut saved) => saved.insert(0, job.clone()),
            Err(e) => tracing::error!("RwLock poisoned prepending saved job: {e}"),
        }
        self.clear_flight(token);
        tracing::info!(kind = %self.kind, job_id = %job.id, "generation ready");
        self.emit(ModuleEvent::Completed { job });
    }

    fn surface(&self, error: GenerateError) -> GenerateError {
        tracing::warn!(kind = %self.kind, "generation error: {error}");
        self.emit(ModuleEvent::Failed {
            error: error.clone(),
        });
        error
    }

    fn emit(&self, event: ModuleEvent) {
        // No subscribers is fine.
        let _ = self.events_tx.send(event);
    }
}
