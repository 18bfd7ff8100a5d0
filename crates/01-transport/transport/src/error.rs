//! Error handling helpers for the transport crate.
//!
//! The transport layer keeps its error surface small: capacity validation for
//! queues and mailboxes. Full queues are not errors; they are reported through
//! [`crate::QueueSend::Full`].

use std::fmt;

/// Convenience result alias for fallible transport operations.
pub type TransportResult<T, E = TransportError> = Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors surfaced by low-level transport helpers.
pub enum TransportError {
    /// Requested queue or mailbox capacity is below the minimum.
    InvalidCapacity { requested: usize, minimum: usize },
    /// A single payload can never fit in the target buffer.
    PayloadTooLarge { len: usize, capacity: usize },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidCapacity { requested, minimum } => {
                write!(f, "capacity {requested} must be at least {minimum} bytes")
            }
            TransportError::PayloadTooLarge { len, capacity } => {
                write!(
                    f,
                    "payload of {len} bytes exceeds buffer capacity of {capacity} bytes"
                )
            }
        }
    }
}

impl std::error::Error for TransportError {}
