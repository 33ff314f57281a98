use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PrintError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Queued,
    Printing,
    Completed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Printing => write!(f, "printing"),
            JobStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A single print job.
///
/// Every field is fixed at creation except `remaining_pages`, which only
/// moves downwards through [`PrintJob::print_page`]. Fields are private so
/// `remaining_pages <= total_pages` and `total_pages >= 1` always hold.
#[derive(Debug, Clone, Serialize)]
pub struct PrintJob {
    id: u64,
    name: String,
    total_pages: u32,
    priority: u32,
    submitted_at: DateTime<Utc>,
    remaining_pages: u32,
}

impl PrintJob {
    /// Create a job, rejecting empty names and zero page counts.
    pub fn new(id: u64, name: impl Into<String>, total_pages: u32, priority: u32) -> Result<Self> {
        Self::with_submitted_at(id, name, total_pages, priority, Utc::now())
    }

    pub fn with_submitted_at(
        id: u64,
        name: impl Into<String>,
        total_pages: u32,
        priority: u32,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PrintError::InvalidJobDefinition(
                "document name must not be empty".to_string(),
            ));
        }
        if total_pages == 0 {
            return Err(PrintError::InvalidJobDefinition(format!(
                "job '{}' must have at least one page",
                name
            )));
        }

        Ok(Self {
            id,
            name,
            total_pages,
            priority,
            submitted_at,
            remaining_pages: total_pages,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Lower value is higher priority
    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn remaining_pages(&self) -> u32 {
        self.remaining_pages
    }

    pub fn pages_printed(&self) -> u32 {
        self.total_pages - self.remaining_pages
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_pages == 0
    }

    pub fn status(&self) -> JobStatus {
        if self.remaining_pages == 0 {
            JobStatus::Completed
        } else if self.remaining_pages < self.total_pages {
            JobStatus::Printing
        } else {
            JobStatus::Queued
        }
    }

    /// Print the next page. Returns the page number just printed, or `None`
    /// if the job had nothing left.
    pub fn print_page(&mut self) -> Option<u32> {
        if self.remaining_pages == 0 {
            return None;
        }
        self.remaining_pages -= 1;
        Some(self.pages_printed())
    }

    /// A copy of this job with its page counter back at `total_pages`.
    pub fn reset(&self) -> Self {
        Self {
            remaining_pages: self.total_pages,
            ..self.clone()
        }
    }
}

impl std::fmt::Display for PrintJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Job[{}] - {} ({} pages, Priority {})",
            self.id, self.name, self.total_pages, self.priority
        )
    }
}
