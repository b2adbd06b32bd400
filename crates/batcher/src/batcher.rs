//! ActivityBatcher - buffers activity records and flushes them in batches
//!
//! Decouples arrival of individual records from backend transmission
//! cost, bounding both memory (record count) and latency (max delay
//! before a record reaches the backend). A flush fires when the
//! buffer reaches the batch-size threshold or when the batch interval
//! elapses with records still buffered, whichever comes first.
//!
//! Delivery is at-most-once: a batch whose transmission fails is
//! dropped. Callers needing durability wrap the stream client with
//! their own retry layer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use contracts::{
    Activity, BatchingConfig, CapturedEvent, ContractError, EventStreamClient,
    DEFAULT_BATCH_INTERVAL_MS, DEFAULT_BATCH_SIZE,
};

use crate::metrics::BatcherMetrics;
use crate::router::PartitionRouter;

/// Buffer/flush policy
#[derive(Debug, Clone)]
pub struct BatcherConfig {
    /// Records buffered before a size-triggered flush
    pub batch_size: usize,
    /// Maximum delay before a timer-triggered flush
    pub batch_interval: Duration,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_interval: Duration::from_millis(DEFAULT_BATCH_INTERVAL_MS),
        }
    }
}

impl From<&BatchingConfig> for BatcherConfig {
    fn from(config: &BatchingConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            batch_interval: config.interval(),
        }
    }
}

/// What caused a flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    /// Buffer reached the batch-size threshold
    Size,
    /// Batch interval elapsed with records buffered
    Timer,
    /// Explicit drain (shutdown)
    Forced,
}

impl FlushTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Timer => "timer",
            Self::Forced => "forced",
        }
    }
}

/// A snapshot swapped out of the live buffer, awaiting transmission
struct FlushJob {
    events: Vec<CapturedEvent>,
    ticket: u64,
}

/// The single outstanding flush timer
///
/// The generation lets a woken timer task tell whether it is still
/// the live timer or has been superseded by a size-triggered flush.
struct FlushTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Live buffer state; the mutex is only ever held across synchronous
/// sections, never across an await
struct BatchState {
    buffer: Vec<CapturedEvent>,
    timer: Option<FlushTimer>,
    timer_generation: u64,
}

struct Inner<C> {
    client: C,
    config: BatcherConfig,
    router: PartitionRouter,
    state: Mutex<BatchState>,
    metrics: BatcherMetrics,
}

/// Buffers activity records and flushes them in partition-routed batches
///
/// Cheap to clone; all clones share the same buffer. Must be used
/// from within a Tokio runtime (flushes run as spawned tasks).
pub struct ActivityBatcher<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for ActivityBatcher<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: EventStreamClient + Send + Sync + 'static> ActivityBatcher<C> {
    pub fn new(client: C, config: BatcherConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                config,
                router: PartitionRouter::new(),
                state: Mutex::new(BatchState {
                    buffer: Vec::new(),
                    timer: None,
                    timer_generation: 0,
                }),
                metrics: BatcherMetrics::new(),
            }),
        }
    }

    pub fn metrics(&self) -> &BatcherMetrics {
        &self.inner.metrics
    }

    pub fn buffered_len(&self) -> usize {
        self.inner.state.lock().unwrap().buffer.len()
    }

    /// Append an eligible activity record to the buffer
    ///
    /// Never suspends, so the host turn is not delayed. Activities
    /// without an active conversation are silently dropped (selective
    /// logging). Reaching the batch-size threshold triggers a flush
    /// whose transmission runs as a detached task; enqueue returns
    /// without awaiting it.
    #[instrument(
        name = "batcher_enqueue",
        skip(self, activity),
        fields(activity_type = activity.activity_type.as_str())
    )]
    pub fn enqueue(&self, activity: &Activity) {
        if !activity.has_conversation() {
            self.inner.metrics.inc_skipped();
            observability::record_activity_skipped();
            debug!("Activity has no active conversation, not relayed");
            return;
        }

        let event = CapturedEvent::capture(activity);
        self.inner.metrics.inc_enqueued();
        observability::record_activity_captured(activity.activity_type.as_str());

        let job = {
            let mut state = self.inner.state.lock().unwrap();
            state.buffer.push(event);
            let depth = state.buffer.len();
            self.inner.metrics.set_buffered_len(depth);
            observability::record_buffer_depth(depth);

            if depth >= self.inner.config.batch_size {
                self.take_batch(&mut state)
            } else {
                // ensure a flush timer is pending while anything is buffered
                if state.timer.is_none() {
                    state.timer_generation += 1;
                    let generation = state.timer_generation;
                    state.timer = Some(FlushTimer {
                        generation,
                        handle: self.spawn_flush_timer(generation),
                    });
                }
                None
            }
        };

        if let Some(job) = job {
            let batcher = self.clone();
            tokio::spawn(async move {
                batcher.transmit(job, FlushTrigger::Size).await;
            });
        }
    }

    /// Force a drain of the buffer (shutdown path)
    ///
    /// Awaits the transmission and surfaces its error. An empty
    /// buffer is a no-op that still clears any stale timer.
    #[instrument(name = "batcher_flush", skip(self))]
    pub async fn flush(&self) -> Result<(), ContractError> {
        let job = {
            let mut state = self.inner.state.lock().unwrap();
            self.take_batch(&mut state)
        };

        match job {
            Some(job) => self.send_job(job, FlushTrigger::Forced).await,
            None => Ok(()),
        }
    }

    /// Swap the buffer out and reserve the partition ticket
    ///
    /// Runs under the state lock with no suspension point: the
    /// swap-and-reserve must be atomic relative to every other
    /// enqueue/flush so overlapping triggers cannot lose or duplicate
    /// records. Any pending timer is cancelled; a timer task that has
    /// already captured its snapshot removed its own handle first and
    /// can no longer be aborted here.
    fn take_batch(&self, state: &mut BatchState) -> Option<FlushJob> {
        if let Some(timer) = state.timer.take() {
            timer.handle.abort();
        }
        self.take_buffer(state)
    }

    fn take_buffer(&self, state: &mut BatchState) -> Option<FlushJob> {
        if state.buffer.is_empty() {
            return None;
        }
        let events = std::mem::take(&mut state.buffer);
        self.inner.metrics.set_buffered_len(0);
        observability::record_buffer_depth(0);
        let ticket = self.inner.router.advance();
        Some(FlushJob { events, ticket })
    }

    fn spawn_flush_timer(&self, generation: u64) -> JoinHandle<()> {
        let batcher = self.clone();
        let interval = self.inner.config.batch_interval;
        tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            batcher.on_timer_fired(generation).await;
        })
    }

    /// Timer expiry path
    ///
    /// The woken task only proceeds while its generation still matches
    /// the stored timer: a size-triggered flush that won the race has
    /// already taken the buffer and aborted (or is about to abort) the
    /// stale handle. Matching means no abort was issued, so removing
    /// our own handle here makes the snapshot safe to transmit.
    async fn on_timer_fired(&self, generation: u64) {
        let job = {
            let mut state = self.inner.state.lock().unwrap();
            let still_live = state
                .timer
                .as_ref()
                .is_some_and(|timer| timer.generation == generation);
            if still_live {
                state.timer = None;
                self.take_buffer(&mut state)
            } else {
                None
            }
        };

        if let Some(job) = job {
            self.transmit(job, FlushTrigger::Timer).await;
        }
    }

    /// Fire-and-forget wrapper: failures are logged and the batch is
    /// dropped, never propagated into the host pipeline
    async fn transmit(&self, job: FlushJob, trigger: FlushTrigger) {
        let events = job.events.len();
        if let Err(error) = self.send_job(job, trigger).await {
            error!(
                error = %error,
                events,
                trigger = trigger.as_str(),
                "Batch dropped"
            );
        }
    }

    async fn send_job(&self, job: FlushJob, trigger: FlushTrigger) -> Result<(), ContractError> {
        let partition = match self
            .inner
            .router
            .resolve(&self.inner.client, job.ticket)
            .await
        {
            Ok(partition) => partition,
            Err(error) => {
                self.inner.metrics.inc_discovery_failures();
                observability::record_discovery_failure();
                return Err(error);
            }
        };

        let events = job.events.len();
        match self.inner.client.send_batch(&job.events, &partition).await {
            Ok(()) => {
                self.inner.metrics.record_batch_sent(trigger, events);
                observability::record_batch_sent(partition.as_str(), events, trigger.as_str());
                info!(
                    partition = %partition,
                    events,
                    trigger = trigger.as_str(),
                    "Batch sent"
                );
                Ok(())
            }
            Err(error) => {
                self.inner.metrics.inc_send_failures();
                observability::record_send_failure(self.inner.client.name());
                Err(error)
            }
        }
    }
}
