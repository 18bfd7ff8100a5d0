//! Core transport primitives shared by the remoting peers.
//!
//! This crate exposes the foundational pieces that the fabric wires together:
//! * [`Envelope`] – tag/version header carried by every packet.
//! * [`MsgQueue`] – bounded FIFO of enveloped payloads for ordered channels.
//! * [`Mailbox`] – single-slot, latest-wins store for frame traffic.
//! * [`schema`] – the archived V1 wire representation of every packet kind.
//! * [`TransportError`] – lightweight error surface for capacity failures.

mod envelope;
mod error;
mod mailbox;
mod queue;
pub mod schema;

pub use envelope::Envelope;
pub use error::{TransportError, TransportResult};
pub use mailbox::{Mailbox, MailboxRecord, MailboxSend};
pub use queue::{MsgQueue, QueueRecord, QueueSend};
pub use schema::*;
