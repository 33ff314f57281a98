use crate::error::{PrintError, Result};
use crate::scheduler::job::PrintJob;

const DEFAULT_MAX_JOBS: usize = 10_000;

/// Owns the submitted job set and the sequential id counter.
#[derive(Debug)]
pub struct JobRegistry {
    jobs: Vec<PrintJob>,
    next_id: u64,
    max_jobs: usize,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_JOBS)
    }

    pub fn with_capacity(max_jobs: usize) -> Self {
        Self {
            jobs: Vec::new(),
            next_id: 1,
            max_jobs,
        }
    }

    /// Validate and register a new job. Ids start at 1 and are never reused,
    /// even across [`JobRegistry::clear`]. A rejected job does not consume an id.
    pub fn add_job(&mut self, name: &str, total_pages: u32, priority: u32) -> Result<PrintJob> {
        if self.is_full() {
            return Err(PrintError::InvalidJobDefinition(format!(
                "job registry is full ({} jobs)",
                self.max_jobs
            )));
        }

        let job = PrintJob::new(self.next_id, name, total_pages, priority)?;
        self.next_id += 1;
        self.jobs.push(job.clone());

        tracing::info!(
            job_id = job.id(),
            name = %job.name(),
            pages = job.total_pages(),
            priority = job.priority(),
            "Job submitted"
        );
        Ok(job)
    }

    pub fn get_job(&self, id: u64) -> Option<&PrintJob> {
        self.jobs.iter().find(|j| j.id() == id)
    }

    /// All jobs in submission order
    pub fn all_jobs(&self) -> &[PrintJob] {
        &self.jobs
    }

    /// Fresh copies of every job for a run to own.
    pub fn snapshot(&self) -> Vec<PrintJob> {
        self.jobs.iter().map(PrintJob::reset).collect()
    }

    /// Drop every job. Returns the number removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.jobs.len();
        self.jobs.clear();
        tracing::info!(removed, "Job registry cleared");
        removed
    }

    pub fn total_pages(&self) -> u64 {
        self.jobs.iter().map(|j| u64::from(j.total_pages())).sum()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.jobs.len() >= self.max_jobs
    }
}
