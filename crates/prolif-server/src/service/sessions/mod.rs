//! Session lifecycle: gate-checked start/resume/pause through the gateway.

mod lifecycle;

pub use lifecycle::{SessionError, SessionService, StartSessionInput};
