use serde::Serialize;
use uuid::Uuid;

use crate::scheduler::PolicyKind;

/// Progress notification emitted by the execution driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    JobStarted {
        job_id: u64,
    },
    PageProgress {
        job_id: u64,
        page_number: u32,
        pages_remaining_for_job: u32,
    },
    JobCompleted {
        job_id: u64,
    },
    Progress {
        pages_printed: u64,
        total_pages: u64,
        fraction: f64,
    },
    RunFinished,
}

impl RunEvent {
    pub fn job_id(&self) -> Option<u64> {
        match self {
            RunEvent::JobStarted { job_id }
            | RunEvent::PageProgress { job_id, .. }
            | RunEvent::JobCompleted { job_id } => Some(*job_id),
            RunEvent::Progress { .. } | RunEvent::RunFinished => None,
        }
    }
}

/// Totals for a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub policy: PolicyKind,
    pub jobs_completed: usize,
    pub pages_printed: u64,
    pub allocations: u64,
    pub sweeps: u64,
    pub elapsed_ms: u64,
}
