use crate::scheduler::job::PrintJob;
use crate::scheduler::policy::{Allocation, PolicyKind, SchedulingPolicy};

/// Non-preemptive priority scheduling with shortest-job-next tie breaking.
///
/// The run order is fixed on the first call: ascending `(priority,
/// total_pages)`, stable for equal keys. Each job gets one allocation covering
/// all of its remaining pages. A job list of a different length starts a new
/// order.
#[derive(Debug, Default)]
pub struct PrioritySjnPolicy {
    order: Option<Vec<usize>>,
    cursor: usize,
}

impl PrioritySjnPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Job indices in run order.
    pub fn run_order(jobs: &[PrintJob]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..jobs.len()).collect();
        // sort_by_key is stable, so submission order survives for equal keys
        order.sort_by_key(|&i| (jobs[i].priority(), jobs[i].total_pages()));
        order
    }
}

impl SchedulingPolicy for PrioritySjnPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::PrioritySjn
    }

    fn next_allocation(&mut self, jobs: &[PrintJob]) -> Option<Allocation> {
        if self.order.as_ref().map_or(true, |o| o.len() != jobs.len()) {
            self.order = Some(Self::run_order(jobs));
            self.cursor = 0;
        }
        let order = self.order.as_deref().unwrap_or_default();

        while let Some(&index) = order.get(self.cursor) {
            let Some(job) = jobs.get(index) else {
                break;
            };
            if !job.is_complete() {
                return Some(Allocation {
                    job_index: index,
                    job_id: job.id(),
                    pages: job.remaining_pages(),
                });
            }
            self.cursor += 1;
        }
        None
    }

    fn sweeps(&self) -> u64 {
        u64::from(self.order.is_some())
    }
}
