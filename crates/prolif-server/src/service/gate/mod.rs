//! Billing admission control for session operations.

mod decision;
mod service;

pub use decision::{
    DEFAULT_MIN_CREDITS_TO_START, GateAction, GateConfig, GateDecision, GateDeny, GateDenyCode,
    decide,
};
pub use service::SessionGate;
