//! Bounded FIFO of enveloped payloads.
//!
//! The queue is budgeted in bytes rather than records so that a burst of large
//! payloads (anchor exports, controller snapshots) backs up before a burst of
//! small ones would. Each record is charged [`RECORD_OVERHEAD`] bytes on top of
//! its payload, mirroring the header a framed channel would spend.

use std::collections::VecDeque;

use crate::{Envelope, TransportError, TransportResult};

/// Per-record accounting overhead in bytes.
pub const RECORD_OVERHEAD: usize = 8;

const MIN_CAPACITY: usize = 64;

/// Outcome reported when pushing into the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueSend {
    /// Payload was appended to the tail of the queue.
    Accepted,
    /// Queue budget is exhausted; nothing was written.
    Full,
}

/// Owned record popped from the head of the queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueRecord {
    /// Envelope describing the payload tag/version/flags.
    pub envelope: Envelope,
    /// Archived payload bytes written by the producer.
    pub payload: Vec<u8>,
}

/// FIFO queue bounded by a byte budget.
#[derive(Debug)]
pub struct MsgQueue {
    records: VecDeque<QueueRecord>,
    capacity_bytes: usize,
    used_bytes: usize,
}

impl MsgQueue {
    /// Creates an empty queue that holds at most `capacity_bytes` of records.
    pub fn new(capacity_bytes: usize) -> TransportResult<Self> {
        if capacity_bytes < MIN_CAPACITY {
            return Err(TransportError::InvalidCapacity {
                requested: capacity_bytes,
                minimum: MIN_CAPACITY,
            });
        }
        Ok(Self {
            records: VecDeque::new(),
            capacity_bytes,
            used_bytes: 0,
        })
    }

    /// Byte budget of the queue.
    pub fn capacity(&self) -> usize {
        self.capacity_bytes
    }

    /// Bytes currently charged against the budget.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no record is queued.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a record without blocking.
    ///
    /// A payload that could never fit, even in an empty queue, is an error;
    /// a payload that does not fit right now reports [`QueueSend::Full`].
    pub fn try_push(&mut self, envelope: Envelope, payload: &[u8]) -> TransportResult<QueueSend> {
        let cost = payload.len() + RECORD_OVERHEAD;
        if cost > self.capacity_bytes {
            return Err(TransportError::PayloadTooLarge {
                len: payload.len(),
                capacity: self.capacity_bytes - RECORD_OVERHEAD,
            });
        }
        if self.used_bytes + cost > self.capacity_bytes {
            return Ok(QueueSend::Full);
        }
        self.used_bytes += cost;
        self.records.push_back(QueueRecord {
            envelope,
            payload: payload.to_vec(),
        });
        Ok(QueueSend::Accepted)
    }

    /// Pops the oldest record.
    pub fn pop(&mut self) -> Option<QueueRecord> {
        let record = self.records.pop_front()?;
        self.used_bytes -= record.payload.len() + RECORD_OVERHEAD;
        Some(record)
    }

    /// Puts a popped record back at the head.
    ///
    /// The record is charged again even if that briefly overruns the budget;
    /// pushes report [`QueueSend::Full`] until it drains.
    pub fn requeue(&mut self, record: QueueRecord) {
        self.used_bytes += record.payload.len() + RECORD_OVERHEAD;
        self.records.push_front(record);
    }

    /// Drops every queued record, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let dropped = self.records.len();
        self.records.clear();
        self.used_bytes = 0;
        dropped
    }
}
