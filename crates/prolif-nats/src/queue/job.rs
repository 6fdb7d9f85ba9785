//! Job definitions for background processing.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The work a queued job carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobKind {
    /// Drain one webhook inbox row into trigger events and runs.
    ProcessInbox { inbox_id: Uuid },

    /// One clock fire of a scheduled or polling trigger.
    ///
    /// `fired_at` is the scheduled fire instant (not enqueue time) so the
    /// derived dedup key is stable across worker restarts and redeliveries.
    FireTrigger {
        trigger_id: Uuid,
        fired_at: Timestamp,
    },

    /// Build (or re-build with `force`) a configuration snapshot.
    BuildSnapshot {
        configuration_id: Uuid,
        force: bool,
    },

    /// Delete terminal inbox rows past retention.
    SweepInbox,
}

impl JobKind {
    /// Returns the queue subject segment for this kind.
    pub fn subject_segment(&self) -> &'static str {
        match self {
            JobKind::ProcessInbox { .. } => "process_inbox",
            JobKind::FireTrigger { .. } => "fire_trigger",
            JobKind::BuildSnapshot { .. } => "build_snapshot",
            JobKind::SweepInbox => "sweep_inbox",
        }
    }

    /// Returns the stable message id used for JetStream duplicate
    /// suppression, when this kind has one.
    ///
    /// Trigger fires are the only kind where the queue itself must dedup:
    /// a re-registered schedule may publish the same fire twice across a
    /// restart. Other kinds rely on database-level idempotency guards.
    pub fn dedup_id(&self) -> Option<String> {
        match self {
            JobKind::FireTrigger {
                trigger_id,
                fired_at,
            } => Some(format!("scheduled:{}:{}", trigger_id, fired_at.as_second())),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.subject_segment())
    }
}

/// A queued background job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub kind: JobKind,
    pub created_at: Timestamp,
}

impl Job {
    /// Creates a new job.
    pub fn new(kind: JobKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            created_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_trigger_dedup_id_is_stable() {
        let trigger_id = Uuid::nil();
        let fired_at: Timestamp = "2026-08-01T12:00:00Z".parse().unwrap();

        let kind = JobKind::FireTrigger {
            trigger_id,
            fired_at,
        };
        let expected = format!("scheduled:{}:{}", trigger_id, fired_at.as_second());

        assert_eq!(kind.dedup_id().as_deref(), Some(expected.as_str()));
        // Same fire instant, same id, regardless of when it is enqueued.
        assert_eq!(kind.dedup_id(), kind.dedup_id());
    }

    #[test]
    fn only_fires_carry_dedup_ids() {
        assert!(
            JobKind::ProcessInbox {
                inbox_id: Uuid::nil()
            }
            .dedup_id()
            .is_none()
        );
        assert!(JobKind::SweepInbox.dedup_id().is_none());
    }

    #[test]
    fn subject_segments() {
        assert_eq!(
            JobKind::BuildSnapshot {
                configuration_id: Uuid::nil(),
                force: false
            }
            .subject_segment(),
            "build_snapshot"
        );
    }
}
