//! Latest-wins slot used for video and camera frames.
//!
//! Writing over a payload nobody has taken yet reports `Coalesced`; the reader
//! only ever sees the newest frame. Neither side blocks.

use crate::{Envelope, TransportError, TransportResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MailboxSend {
    /// The slot was empty or already taken.
    Accepted,
    /// An untaken payload was replaced.
    Coalesced,
}

/// The newest payload, borrowed until the mailbox is next written.
#[derive(Debug, PartialEq, Eq)]
pub struct MailboxRecord<'a> {
    pub envelope: Envelope,
    pub payload: &'a [u8],
}

#[derive(Debug)]
pub struct Mailbox {
    capacity: usize,
    envelope: Envelope,
    payload: Vec<u8>,
    unread: bool,
}

impl Mailbox {
    /// `default_envelope` is reported until the first write names one.
    pub fn new(payload_capacity: usize, default_envelope: Envelope) -> TransportResult<Self> {
        if payload_capacity == 0 {
            return Err(TransportError::InvalidCapacity {
                requested: 0,
                minimum: 1,
            });
        }
        Ok(Self {
            capacity: payload_capacity,
            envelope: default_envelope,
            payload: Vec::with_capacity(payload_capacity.min(4096)),
            unread: false,
        })
    }

    /// Largest payload a write may carry.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn has_unread(&self) -> bool {
        self.unread
    }

    /// Replaces the slot contents. Oversized payloads are an error and leave
    /// the slot untouched.
    pub fn try_send(
        &mut self,
        payload: &[u8],
        envelope: Option<Envelope>,
    ) -> TransportResult<MailboxSend> {
        if payload.len() > self.capacity {
            return Err(TransportError::PayloadTooLarge {
                len: payload.len(),
                capacity: self.capacity,
            });
        }
        if let Some(env) = envelope {
            self.envelope = env;
        }
        self.payload.clear();
        self.payload.extend_from_slice(payload);

        let coalesced = self.unread;
        self.unread = true;
        if coalesced {
            Ok(MailboxSend::Coalesced)
        } else {
            Ok(MailboxSend::Accepted)
        }
    }

    /// Takes the newest payload if it has not been taken yet.
    pub fn take_latest(&mut self) -> Option<MailboxRecord<'_>> {
        if !self.unread {
            return None;
        }
        self.unread = false;
        Some(MailboxRecord {
            envelope: self.envelope,
            payload: &self.payload,
        })
    }

    /// Forgets any unread payload.
    pub fn discard(&mut self) -> bool {
        std::mem::replace(&mut self.unread, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV: Envelope = Envelope::new(0x09, 1);

    #[test]
    fn second_write_coalesces_and_latest_wins() {
        let mut mailbox = Mailbox::new(16, ENV).unwrap();
        assert_eq!(mailbox.try_send(&[1], None).unwrap(), MailboxSend::Accepted);
        assert_eq!(mailbox.try_send(&[2, 2], None).unwrap(), MailboxSend::Coalesced);
        let record = mailbox.take_latest().unwrap();
        assert_eq!(record.payload, &[2, 2]);
        assert_eq!(record.envelope, ENV);
        assert!(mailbox.take_latest().is_none());
    }

    #[test]
    fn write_after_take_is_accepted() {
        let mut mailbox = Mailbox::new(16, ENV).unwrap();
        mailbox.try_send(&[1], None).unwrap();
        let _ = mailbox.take_latest();
        assert_eq!(mailbox.try_send(&[3], None).unwrap(), MailboxSend::Accepted);
    }

    #[test]
    fn oversized_write_leaves_previous_payload() {
        let mut mailbox = Mailbox::new(2, ENV).unwrap();
        mailbox.try_send(&[7], None).unwrap();
        assert!(mailbox.try_send(&[0; 3], None).is_err());
        assert_eq!(mailbox.take_latest().unwrap().payload, &[7]);
    }
}
