//! The `session-events` pub/sub channel.

mod session_event;

pub use session_event::{
    SESSION_EVENTS_SUBJECT, SessionEvent, SessionEventBus, SessionEventStream,
};
