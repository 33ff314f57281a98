use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::scheduler::PrintJob;

/// Simulated service time for a single page.
pub trait PageDelay: Send + Sync + Debug {
    /// How long printing `page_number` of `job` takes.
    fn delay(&self, job: &PrintJob, page_number: u32) -> Duration;
}

/// Pages print instantly
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl PageDelay for NoDelay {
    fn delay(&self, _job: &PrintJob, _page_number: u32) -> Duration {
        Duration::ZERO
    }
}

/// Every page takes the same amount of time
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    per_page: Duration,
}

impl FixedDelay {
    pub fn new(per_page: Duration) -> Self {
        Self { per_page }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl PageDelay for FixedDelay {
    fn delay(&self, _job: &PrintJob, _page_number: u32) -> Duration {
        self.per_page
    }
}

/// Pick the pacing strategy for a configured per-page delay.
pub fn pacer_for(per_page: Duration) -> Arc<dyn PageDelay> {
    if per_page.is_zero() {
        Arc::new(NoDelay)
    } else {
        Arc::new(FixedDelay::new(per_page))
    }
}
