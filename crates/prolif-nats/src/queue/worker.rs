//! Job queue management and worker consumption.

use std::time::Duration;

use async_nats::HeaderMap;
use async_nats::jetstream::{self, AckKind, stream};
use futures::StreamExt;
use tracing::{debug, instrument, warn};

use super::job::Job;
use crate::{Error, Result, TRACING_TARGET_QUEUE};

/// Time a worker has to process one job before redelivery.
const ACK_WAIT: Duration = Duration::from_secs(300);

/// Maximum deliveries per job; the queue's bounded attempt budget.
const MAX_DELIVER: i64 = 3;

/// Window within which duplicate `Nats-Msg-Id` publishes are suppressed.
const DUPLICATE_WINDOW: Duration = Duration::from_secs(600);

/// Job queue backed by a JetStream work-queue stream.
#[derive(Debug, Clone)]
pub struct JobQueue {
    jetstream: jetstream::Context,
    stream_name: String,
    queue_name: String,
}

/// A received job plus its ack handle.
pub struct JobMessage {
    message: jetstream::Message,
    job: Job,
}

impl JobMessage {
    /// The decoded job.
    pub fn job(&self) -> &Job {
        &self.job
    }

    /// How many times this message has been delivered, when known.
    pub fn delivery_attempt(&self) -> Option<u64> {
        self.message.info().ok().map(|info| info.delivered as u64)
    }

    /// Acknowledges the job, removing it from the queue.
    pub async fn ack(&self) -> Result<()> {
        self.message
            .ack()
            .await
            .map_err(|e| Error::operation("job_ack", e.to_string()))
    }

    /// Negatively acknowledges the job for redelivery after `delay`.
    pub async fn nak(&self, delay: Duration) -> Result<()> {
        self.message
            .ack_with(AckKind::Nak(Some(delay)))
            .await
            .map_err(|e| Error::operation("job_nak", e.to_string()))
    }
}

impl JobQueue {
    /// Creates (or attaches to) the work-queue stream for `queue_name`.
    #[instrument(skip(jetstream), target = TRACING_TARGET_QUEUE)]
    pub async fn new(jetstream: &jetstream::Context, queue_name: &str) -> Result<Self> {
        let stream_name = format!("JOBS_{}", queue_name.to_uppercase());

        let stream_config = stream::Config {
            name: stream_name.clone(),
            description: Some(format!("Job queue: {}", queue_name)),
            subjects: vec![format!("jobs.{}.>", queue_name)],
            retention: stream::RetentionPolicy::WorkQueue,
            duplicate_window: DUPLICATE_WINDOW,
            ..Default::default()
        };

        match jetstream.get_stream(&stream_name).await {
            Ok(_) => {
                debug!(
                    target: TRACING_TARGET_QUEUE,
                    stream = %stream_name,
                    "Using existing job stream"
                );
            }
            Err(_) => {
                debug!(
                    target: TRACING_TARGET_QUEUE,
                    stream = %stream_name,
                    queue_name = %queue_name,
                    "Creating new job stream"
                );
                jetstream
                    .create_stream(stream_config)
                    .await
                    .map_err(|e| Error::operation("stream_create", e.to_string()))?;
            }
        }

        Ok(Self {
            jetstream: jetstream.clone(),
            stream_name,
            queue_name: queue_name.to_owned(),
        })
    }

    /// Submits a job to the queue.
    ///
    /// Jobs with a stable dedup id publish with `Nats-Msg-Id`, so repeated
    /// submissions inside the duplicate window collapse to one delivery.
    #[instrument(skip(self, job), target = TRACING_TARGET_QUEUE)]
    pub async fn submit(&self, job: &Job) -> Result<()> {
        let subject = self.subject_for(job);
        let payload = serde_json::to_vec(job)?;

        let ack = match job.kind.dedup_id() {
            Some(dedup_id) => {
                let mut headers = HeaderMap::new();
                headers.insert("Nats-Msg-Id", dedup_id.as_str());
                self.jetstream
                    .publish_with_headers(subject.clone(), headers, payload.into())
                    .await
            }
            None => self.jetstream.publish(subject.clone(), payload.into()).await,
        };

        ack.map_err(|e| Error::delivery_failed(&subject, e.to_string()))?
            .await
            .map_err(|e| Error::operation("job_submit", e.to_string()))?;

        debug!(
            target: TRACING_TARGET_QUEUE,
            job_id = %job.id,
            kind = %job.kind,
            subject = %subject,
            "Submitted job to queue"
        );
        Ok(())
    }

    /// Creates a durable pull consumer shared by all worker processes.
    #[instrument(skip(self), target = TRACING_TARGET_QUEUE)]
    pub async fn create_consumer(
        &self,
        consumer_name: &str,
    ) -> Result<jetstream::consumer::PullConsumer> {
        let consumer_config = jetstream::consumer::pull::Config {
            name: Some(consumer_name.to_owned()),
            durable_name: Some(consumer_name.to_owned()),
            description: Some(format!("{} job consumer", self.queue_name)),
            ack_wait: ACK_WAIT,
            max_deliver: MAX_DELIVER,
            ..Default::default()
        };

        let stream = self
            .jetstream
            .get_stream(&self.stream_name)
            .await
            .map_err(|e| Error::stream_error(&self.stream_name, e.to_string()))?;

        let consumer = stream
            .create_consumer(consumer_config)
            .await
            .map_err(|e| Error::consumer_error(consumer_name, e.to_string()))?;

        debug!(
            target: TRACING_TARGET_QUEUE,
            consumer = %consumer_name,
            stream = %self.stream_name,
            "Created job consumer"
        );
        Ok(consumer)
    }

    /// Fetches the next job, waiting up to `wait` for one to arrive.
    ///
    /// Malformed payloads are acked and dropped: redelivering a message
    /// that cannot deserialize would spin forever.
    pub async fn next_job(
        &self,
        consumer: &jetstream::consumer::PullConsumer,
        wait: Duration,
    ) -> Result<Option<JobMessage>> {
        let mut messages = consumer
            .fetch()
            .max_messages(1)
            .expires(wait)
            .messages()
            .await
            .map_err(|e| Error::operation("job_fetch", e.to_string()))?;

        let Some(message) = messages.next().await else {
            return Ok(None);
        };

        let message = message.map_err(|e| Error::operation("job_receive", e.to_string()))?;

        match serde_json::from_slice::<Job>(&message.payload) {
            Ok(job) => Ok(Some(JobMessage { message, job })),
            Err(e) => {
                warn!(
                    target: TRACING_TARGET_QUEUE,
                    error = %e,
                    "Dropping malformed job payload"
                );
                message.ack().await.ok();
                Ok(None)
            }
        }
    }

    /// Returns the subject a job publishes to.
    fn subject_for(&self, job: &Job) -> String {
        format!("jobs.{}.{}", self.queue_name, job.kind.subject_segment())
    }

    /// Returns the stream name.
    #[inline]
    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    /// Queue handle for unit tests; never touches the network.
    #[cfg(test)]
    pub(crate) fn test_stub() -> Self {
        Self {
            jetstream: jetstream::new(async_nats::Client::new()),
            stream_name: "JOBS_RUNTIME".to_owned(),
            queue_name: "runtime".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::queue::JobKind;

    fn test_queue() -> JobQueue {
        JobQueue {
            jetstream: jetstream::new(async_nats::Client::new()),
            stream_name: "JOBS_RUNTIME".to_owned(),
            queue_name: "runtime".to_owned(),
        }
    }

    #[test]
    fn subject_generation() {
        let queue = test_queue();
        let job = Job::new(JobKind::ProcessInbox {
            inbox_id: Uuid::nil(),
        });
        assert_eq!(queue.subject_for(&job), "jobs.runtime.process_inbox");
    }
}
