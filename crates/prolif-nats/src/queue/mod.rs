//! Work queues for distributed job processing.

mod job;
mod worker;

pub use job::{Job, JobKind};
pub use worker::{JobMessage, JobQueue};
