//! Execution driver for simulated print runs.
//!
//! The driver turns a policy's allocations into page work and observable
//! events:
//! - **Execution**: applies each allocation to the run's own job copies
//! - **Pacing**: waits a simulated service time before every page
//! - **Progress**: reports the aggregate fraction after every allocation
//!
//! # Components
//!
//! - [`ExecutionDriver`]: runs one policy to completion
//! - [`RunEvent`]: the typed events streamed to observers
//! - [`pacing`]: per-page delay strategies ([`NoDelay`], [`FixedDelay`])
//!
//! # Event Order
//!
//! For every allocation: `JobStarted` (first allocation of a job only), one
//! `PageProgress` per page, `JobCompleted` if the job finished, then
//! `Progress`. A single `RunFinished` closes the stream.

pub mod event;
pub mod executor;
pub mod pacing;

pub use event::{RunEvent, RunSummary};
pub use executor::ExecutionDriver;
pub use pacing::{FixedDelay, NoDelay, PageDelay};
