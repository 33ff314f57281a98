pub mod job;
pub mod policy;
pub mod priority;
pub mod registry;
pub mod round_robin;

pub use job::{JobStatus, PrintJob};
pub use policy::{Allocation, PolicyKind, SchedulingPolicy};
pub use priority::PrioritySjnPolicy;
pub use registry::JobRegistry;
pub use round_robin::RoundRobinPolicy;
