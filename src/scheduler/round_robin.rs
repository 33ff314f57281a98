use crate::error::{PrintError, Result};
use crate::scheduler::job::PrintJob;
use crate::scheduler::policy::{Allocation, PolicyKind, SchedulingPolicy};

pub const DEFAULT_TIME_SLICE: u32 = 10;

/// Round-robin scheduling with a time slice measured in pages.
///
/// Sweeps the job list in submission order, giving each unfinished job up to
/// `time_slice` pages per sweep until every job is done.
#[derive(Debug)]
pub struct RoundRobinPolicy {
    time_slice: u32,
    cursor: usize,
    sweeps: u64,
}

impl Default for RoundRobinPolicy {
    fn default() -> Self {
        Self {
            time_slice: DEFAULT_TIME_SLICE,
            cursor: 0,
            sweeps: 0,
        }
    }
}

impl RoundRobinPolicy {
    pub fn new(time_slice: u32) -> Result<Self> {
        if time_slice == 0 {
            return Err(PrintError::InvalidPolicyParameter(
                "time slice must be at least one page".to_string(),
            ));
        }
        Ok(Self {
            time_slice,
            ..Self::default()
        })
    }

    pub fn time_slice(&self) -> u32 {
        self.time_slice
    }
}

impl SchedulingPolicy for RoundRobinPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::RoundRobin
    }

    fn next_allocation(&mut self, jobs: &[PrintJob]) -> Option<Allocation> {
        if jobs.iter().all(PrintJob::is_complete) {
            return None;
        }

        if self.cursor >= jobs.len() {
            self.cursor = 0;
        }

        // At least one job has work left, so this finds it within one lap.
        loop {
            if self.cursor == 0 {
                self.sweeps += 1;
                tracing::debug!(
                    sweep = self.sweeps,
                    time_slice = self.time_slice,
                    "Starting sweep"
                );
            }

            let index = self.cursor;
            self.cursor = (self.cursor + 1) % jobs.len();

            let Some(job) = jobs.get(index) else {
                continue;
            };
            if !job.is_complete() {
                return Some(Allocation {
                    job_index: index,
                    job_id: job.id(),
                    pages: self.time_slice.min(job.remaining_pages()),
                });
            }
        }
    }

    fn sweeps(&self) -> u64 {
        self.sweeps
    }
}
