//! Single-class ports: a producer and a consumer sharing one queue or mailbox.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use transport::{Envelope, Mailbox, MailboxSend, MsgQueue, QueueSend};

use crate::codec::PortClass;
use crate::error::{FabricError, FabricResult};
use crate::outcome::SubmitOutcome;

enum Store {
    /// FIFO queue; `on_full` is what a refused push reports.
    Queue {
        queue: Mutex<MsgQueue>,
        on_full: SubmitOutcome,
    },
    Mailbox(Mutex<Mailbox>),
}

struct Shared {
    class: PortClass,
    store: Store,
    counters: Counters,
}

/// Both ends of one port.
pub struct PortPair {
    pub producer: ProducerPort,
    pub consumer: ConsumerPort,
}

impl PortPair {
    /// Queue-backed pair for one of the ordered classes.
    pub fn queued(class: PortClass, queue: MsgQueue) -> FabricResult<Self> {
        let on_full = match class {
            PortClass::Lossless => SubmitOutcome::WouldBlock,
            PortClass::BestEffort => SubmitOutcome::Dropped,
            PortClass::Coalesce => {
                return Err(FabricError::Misconfigured(
                    "coalescing ports are mailbox backed",
                ))
            }
        };
        Ok(Self::from_shared(Shared {
            class,
            store: Store::Queue {
                queue: Mutex::new(queue),
                on_full,
            },
            counters: Counters::default(),
        }))
    }

    /// Latest-wins pair over a mailbox.
    pub fn coalescing(mailbox: Mailbox) -> Self {
        Self::from_shared(Shared {
            class: PortClass::Coalesce,
            store: Store::Mailbox(Mutex::new(mailbox)),
            counters: Counters::default(),
        })
    }

    fn from_shared(shared: Shared) -> Self {
        let shared = Arc::new(shared);
        Self {
            producer: ProducerPort(Arc::clone(&shared)),
            consumer: ConsumerPort(shared),
        }
    }
}

#[derive(Clone)]
pub struct ProducerPort(Arc<Shared>);

impl ProducerPort {
    pub fn try_send(&self, envelope: Envelope, payload: &[u8]) -> FabricResult<SubmitOutcome> {
        let outcome = match &self.0.store {
            Store::Queue { queue, on_full } => match queue.lock().try_push(envelope, payload)? {
                QueueSend::Accepted => SubmitOutcome::Accepted,
                QueueSend::Full => *on_full,
            },
            Store::Mailbox(mailbox) => match mailbox.lock().try_send(payload, Some(envelope))? {
                MailboxSend::Accepted => SubmitOutcome::Accepted,
                MailboxSend::Coalesced => SubmitOutcome::Coalesced,
            },
        };

        self.0.counters.bump(outcome);
        if !outcome.is_delivered() {
            tracing::trace!(
                target: "transport",
                class = ?self.0.class,
                tag = envelope.tag,
                ?outcome,
                "packet not queued"
            );
        }
        Ok(outcome)
    }

    pub fn metrics(&self) -> PortMetricsSnapshot {
        self.0.counters.snapshot()
    }
}

#[derive(Clone)]
pub struct ConsumerPort(Arc<Shared>);

impl ConsumerPort {
    /// Records waiting; a mailbox counts at most one.
    pub fn pending(&self) -> usize {
        match &self.0.store {
            Store::Queue { queue, .. } => queue.lock().len(),
            Store::Mailbox(mailbox) => usize::from(mailbox.lock().has_unread()),
        }
    }

    /// Hands up to `max` records to `f` in arrival order.
    pub fn drain_records<F>(&self, max: usize, mut f: F) -> usize
    where
        F: FnMut(Envelope, &[u8]),
    {
        match &self.0.store {
            Store::Queue { queue, .. } => {
                let mut drained = 0;
                while drained < max {
                    // Lock per record: `f` runs without holding the queue.
                    let Some(record) = queue.lock().pop() else {
                        break;
                    };
                    f(record.envelope, &record.payload);
                    drained += 1;
                }
                drained
            }
            Store::Mailbox(_) if max == 0 => 0,
            Store::Mailbox(mailbox) => match mailbox.lock().take_latest() {
                Some(record) => {
                    f(record.envelope, record.payload);
                    1
                }
                None => 0,
            },
        }
    }

    /// Like [`drain_records`](Self::drain_records), but `f` may refuse a
    /// record by returning `false`. A refused queue record goes back to the
    /// head and draining stops; a refused mailbox payload is gone. Returns
    /// the number of records `f` accepted.
    pub fn forward_records<F>(&self, max: usize, mut f: F) -> usize
    where
        F: FnMut(Envelope, &[u8]) -> bool,
    {
        match &self.0.store {
            Store::Queue { queue, .. } => {
                let mut forwarded = 0;
                while forwarded < max {
                    let Some(record) = queue.lock().pop() else {
                        break;
                    };
                    if !f(record.envelope, &record.payload) {
                        queue.lock().requeue(record);
                        break;
                    }
                    forwarded += 1;
                }
                forwarded
            }
            Store::Mailbox(_) if max == 0 => 0,
            Store::Mailbox(mailbox) => match mailbox.lock().take_latest() {
                Some(record) => usize::from(f(record.envelope, record.payload)),
                None => 0,
            },
        }
    }

    /// Drops everything pending and reports how much went.
    pub fn discard_pending(&self) -> usize {
        match &self.0.store {
            Store::Queue { queue, .. } => queue.lock().clear(),
            Store::Mailbox(mailbox) => usize::from(mailbox.lock().discard()),
        }
    }
}

/// One counter per [`SubmitOutcome`].
#[derive(Default)]
struct Counters([AtomicU32; 4]);

impl Counters {
    fn slot(outcome: SubmitOutcome) -> usize {
        match outcome {
            SubmitOutcome::Accepted => 0,
            SubmitOutcome::Coalesced => 1,
            SubmitOutcome::Dropped => 2,
            SubmitOutcome::WouldBlock => 3,
        }
    }

    fn bump(&self, outcome: SubmitOutcome) {
        self.0[Self::slot(outcome)].fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> PortMetricsSnapshot {
        let read = |outcome| self.0[Self::slot(outcome)].load(Ordering::Relaxed);
        PortMetricsSnapshot {
            accepted: read(SubmitOutcome::Accepted),
            coalesced: read(SubmitOutcome::Coalesced),
            dropped: read(SubmitOutcome::Dropped),
            would_block: read(SubmitOutcome::WouldBlock),
        }
    }
}

/// Submit outcomes seen by a producer so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PortMetricsSnapshot {
    pub accepted: u32,
    pub coalesced: u32,
    pub dropped: u32,
    pub would_block: u32,
}

impl std::ops::Add for PortMetricsSnapshot {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            accepted: self.accepted + rhs.accepted,
            coalesced: self.coalesced + rhs.coalesced,
            dropped: self.dropped + rhs.dropped,
            would_block: self.would_block + rhs.would_block,
        }
    }
}
