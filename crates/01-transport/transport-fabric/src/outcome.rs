//! Outcome types shared by ports and endpoints.

/// Outcome returned when attempting to submit a packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Packet entered the queue untouched.
    Accepted,
    /// Packet replaced a pending entry in a mailbox.
    Coalesced,
    /// Packet was intentionally dropped per port class.
    Dropped,
    /// Port could not accept without blocking.
    WouldBlock,
}

impl SubmitOutcome {
    /// Returns `true` when the packet will reach the consumer.
    pub fn is_delivered(self) -> bool {
        matches!(self, SubmitOutcome::Accepted | SubmitOutcome::Coalesced)
    }
}
