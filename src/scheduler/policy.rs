use serde::{Deserialize, Serialize};

use crate::error::{PrintError, Result};
use crate::scheduler::job::PrintJob;
use crate::scheduler::priority::PrioritySjnPolicy;
use crate::scheduler::round_robin::RoundRobinPolicy;

/// One scheduling decision: give `pages` pages of work to the job at
/// `job_index` in the run's job list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub job_index: usize,
    pub job_id: u64,
    pub pages: u32,
}

/// Decides which job prints next and for how long.
///
/// Policies never mutate jobs; the execution driver applies each allocation
/// and calls back for the next one until `None` is returned. An instance is
/// meant to serve one run; build a fresh one per run with [`PolicyKind::build`].
pub trait SchedulingPolicy: Send {
    fn kind(&self) -> PolicyKind;

    /// Next allocation given the current job states, or `None` once every job
    /// is complete.
    fn next_allocation(&mut self, jobs: &[PrintJob]) -> Option<Allocation>;

    /// Number of passes over the job list started so far.
    fn sweeps(&self) -> u64 {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    PrioritySjn,
    RoundRobin,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::PrioritySjn => "priority-sjn",
            PolicyKind::RoundRobin => "round-robin",
        }
    }

    /// Build a fresh policy instance. `time_slice` only applies to round-robin
    /// but is validated there at construction.
    pub fn build(self, time_slice: u32) -> Result<Box<dyn SchedulingPolicy>> {
        match self {
            PolicyKind::PrioritySjn => Ok(Box::new(PrioritySjnPolicy::new())),
            PolicyKind::RoundRobin => Ok(Box::new(RoundRobinPolicy::new(time_slice)?)),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "priority-sjn" | "priority" | "sjn" | "priority+sjn" => Ok(PolicyKind::PrioritySjn),
            "round-robin" | "roundrobin" | "rr" => Ok(PolicyKind::RoundRobin),
            other => Err(PrintError::UnknownPolicy(other.to_string())),
        }
    }
}
