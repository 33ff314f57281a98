use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::driver::event::{RunEvent, RunSummary};
use crate::driver::pacing::{NoDelay, PageDelay};
use crate::scheduler::{PrintJob, SchedulingPolicy};

/// Forwards events to the observer until it goes away.
///
/// A run always completes, so a dropped receiver only silences the stream.
struct EventSink {
    tx: mpsc::Sender<RunEvent>,
    closed: bool,
}

impl EventSink {
    async fn emit(&mut self, event: RunEvent) {
        if self.closed {
            return;
        }
        if self.tx.send(event).await.is_err() {
            tracing::debug!("Event receiver dropped, continuing run without observer");
            self.closed = true;
        }
    }
}

/// Runs a scheduling policy to completion over a set of jobs it owns.
#[derive(Debug, Clone)]
pub struct ExecutionDriver {
    pacer: Arc<dyn PageDelay>,
}

impl Default for ExecutionDriver {
    fn default() -> Self {
        Self::unpaced()
    }
}

impl ExecutionDriver {
    pub fn new(pacer: Arc<dyn PageDelay>) -> Self {
        Self { pacer }
    }

    /// A driver that never sleeps between pages.
    pub fn unpaced() -> Self {
        Self::new(Arc::new(NoDelay))
    }

    /// Execute every allocation the policy makes, streaming events to `tx`.
    ///
    /// The progress denominator is fixed from `jobs` at the start of the run.
    pub async fn run(
        &self,
        run_id: Uuid,
        mut jobs: Vec<PrintJob>,
        mut policy: Box<dyn SchedulingPolicy>,
        tx: mpsc::Sender<RunEvent>,
    ) -> RunSummary {
        let started = Instant::now();
        let kind = policy.kind();
        let total_pages: u64 = jobs.iter().map(|j| u64::from(j.remaining_pages())).sum();
        let mut sink = EventSink { tx, closed: false };
        let mut pages_printed: u64 = 0;
        let mut allocations: u64 = 0;
        let mut jobs_completed = 0usize;
        let mut started_jobs: HashSet<u64> = HashSet::new();

        tracing::info!(
            run_id = %run_id,
            policy = %kind,
            jobs = jobs.len(),
            total_pages,
            "Print run started"
        );

        while let Some(alloc) = policy.next_allocation(&jobs) {
            allocations += 1;
            let job = &mut jobs[alloc.job_index];

            tracing::debug!(
                run_id = %run_id,
                job_id = job.id(),
                pages = alloc.pages,
                remaining = job.remaining_pages(),
                "Allocating pages"
            );

            if started_jobs.insert(job.id()) {
                sink.emit(RunEvent::JobStarted { job_id: job.id() }).await;
            }

            for _ in 0..alloc.pages {
                let next_page = job.pages_printed() + 1;
                let delay = self.pacer.delay(job, next_page);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                let Some(page_number) = job.print_page() else {
                    break;
                };
                pages_printed += 1;
                sink.emit(RunEvent::PageProgress {
                    job_id: job.id(),
                    page_number,
                    pages_remaining_for_job: job.remaining_pages(),
                })
                .await;
            }

            if job.is_complete() {
                jobs_completed += 1;
                tracing::info!(run_id = %run_id, job_id = job.id(), name = %job.name(), "Job completed");
                sink.emit(RunEvent::JobCompleted { job_id: job.id() }).await;
            }

            sink.emit(RunEvent::Progress {
                pages_printed,
                total_pages,
                fraction: progress_fraction(pages_printed, total_pages),
            })
            .await;
        }

        sink.emit(RunEvent::RunFinished).await;

        let summary = RunSummary {
            run_id,
            policy: kind,
            jobs_completed,
            pages_printed,
            allocations,
            sweeps: policy.sweeps(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        tracing::info!(
            run_id = %run_id,
            policy = %kind,
            jobs_completed,
            pages_printed,
            elapsed_ms = summary.elapsed_ms,
            "Print run finished"
        );

        summary
    }
}

/// Fraction of the run's pages printed so far, in `[0, 1]`.
pub fn progress_fraction(pages_printed: u64, total_pages: u64) -> f64 {
    if total_pages == 0 {
        return 1.0;
    }
    (pages_printed as f64 / total_pages as f64).min(1.0)
}
