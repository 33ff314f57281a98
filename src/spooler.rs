use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::driver::pacing::{pacer_for, PageDelay};
use crate::driver::{ExecutionDriver, RunEvent, RunSummary};
use crate::error::{PrintError, Result};
use crate::scheduler::{JobRegistry, PolicyKind, PrintJob};

/// Clears the in-flight flag when the run task ends, including on panic.
struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A print run in flight.
pub struct RunHandle {
    pub run_id: Uuid,
    pub policy: PolicyKind,
    /// The jobs as they were when the run started
    pub jobs: Vec<PrintJob>,
    events: mpsc::Receiver<RunEvent>,
    task: JoinHandle<RunSummary>,
}

impl RunHandle {
    /// Next event in emission order, `None` once the run has finished.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Split into an event stream and the task producing the summary.
    pub fn into_parts(self) -> (ReceiverStream<RunEvent>, JoinHandle<RunSummary>) {
        (ReceiverStream::new(self.events), self.task)
    }

    /// Wait for the run to finish, returning every event and the summary.
    pub async fn collect(mut self) -> Result<(Vec<RunEvent>, RunSummary)> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        let summary = self.task.await.map_err(|e| PrintError::Internal(e.to_string()))?;
        Ok((events, summary))
    }

    /// Wait for the run to finish, discarding events.
    pub async fn finish(self) -> Result<RunSummary> {
        drop(self.events);
        self.task.await.map_err(|e| PrintError::Internal(e.to_string()))
    }
}

/// Entry point for submitting jobs and starting print runs.
///
/// At most one run is in flight at a time. Each run owns a snapshot of the
/// registry, so clearing or adding jobs never disturbs a run in progress.
pub struct PrintSpooler {
    config: SchedulerConfig,
    registry: Arc<RwLock<JobRegistry>>,
    running: Arc<AtomicBool>,
    pacer: Arc<dyn PageDelay>,
}

impl PrintSpooler {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        let pacer = pacer_for(config.page_delay);
        Ok(Self {
            config,
            registry: Arc::new(RwLock::new(JobRegistry::new())),
            running: Arc::new(AtomicBool::new(false)),
            pacer,
        })
    }

    /// Replace the pacing strategy derived from `page_delay`.
    pub fn with_pacer(mut self, pacer: Arc<dyn PageDelay>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn set_policy(&mut self, policy: PolicyKind) {
        self.config.policy = policy;
    }

    pub fn set_time_slice(&mut self, time_slice: u32) -> Result<()> {
        let updated = self.config.clone().with_time_slice(time_slice);
        updated.validate()?;
        self.config = updated;
        Ok(())
    }

    pub async fn add_job(&self, name: &str, total_pages: u32, priority: u32) -> Result<PrintJob> {
        self.registry.write().await.add_job(name, total_pages, priority)
    }

    pub async fn jobs(&self) -> Vec<PrintJob> {
        self.registry.read().await.all_jobs().to_vec()
    }

    pub async fn clear(&self) -> usize {
        self.registry.write().await.clear()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start a run over the current job set with `policy`, or the configured
    /// policy when `None`.
    ///
    /// Every parameter is validated before anything is spawned.
    pub async fn start_run(&self, policy: Option<PolicyKind>) -> Result<RunHandle> {
        let kind = policy.unwrap_or(self.config.policy);
        let scheduling = kind.build(self.config.time_slice)?;
        let jobs = self.registry.read().await.snapshot();

        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!(policy = %kind, "Rejected run start, another run is in flight");
            return Err(PrintError::RunInProgress);
        }
        let guard = RunGuard(self.running.clone());

        let run_id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.config.event_buffer);
        let driver = ExecutionDriver::new(self.pacer.clone());
        let run_jobs = jobs.clone();

        let task = tokio::spawn(async move {
            let _guard = guard;
            driver.run(run_id, run_jobs, scheduling, tx).await
        });

        Ok(RunHandle {
            run_id,
            policy: kind,
            jobs,
            events: rx,
            task,
        })
    }
}
