//! Inbox draining: webhook rows into trigger events and runs.

mod processor;

pub use processor::{InboxOutcome, InboxProcessor, MALFORMED_PAYLOAD_KEY};
