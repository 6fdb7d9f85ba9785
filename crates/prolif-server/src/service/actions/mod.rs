//! The action engine: approval lifecycle and adapter dispatch.

mod engine;

pub use engine::{ActionEngine, ActionError, Approver, GrantRequest};
