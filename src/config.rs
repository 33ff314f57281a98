use std::time::Duration;

use crate::error::{PrintError, Result};
use crate::scheduler::round_robin::DEFAULT_TIME_SLICE;
use crate::scheduler::PolicyKind;

/// Simulated service time per page when none is configured.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

const DEFAULT_EVENT_BUFFER: usize = 256;

/// Settings for a print run.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Policy used when a run is started without an explicit choice
    pub policy: PolicyKind,
    /// Maximum pages per job per round-robin sweep
    pub time_slice: u32,
    /// Simulated time to print one page. Zero disables pacing.
    pub page_delay: Duration,
    /// Capacity of the event channel between the driver and its observer
    pub event_buffer: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::RoundRobin,
            time_slice: DEFAULT_TIME_SLICE,
            page_delay: DEFAULT_PAGE_DELAY,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl SchedulerConfig {
    pub fn new(policy: PolicyKind) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn with_time_slice(mut self, time_slice: u32) -> Self {
        self.time_slice = time_slice;
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer;
        self
    }

    /// Check every parameter before a run is allowed to start.
    pub fn validate(&self) -> Result<()> {
        if self.time_slice == 0 {
            return Err(PrintError::InvalidPolicyParameter(
                "time slice must be at least one page".to_string(),
            ));
        }
        if self.event_buffer == 0 {
            return Err(PrintError::InvalidPolicyParameter(
                "event buffer must hold at least one event".to_string(),
            ));
        }
        Ok(())
    }
}
