#![allow(missing_docs)]
//! One remoting connection: the peer transport seam, its packet endpoint and
//! the link status the transport thread writes.
//!
//! A [`Session`] owns a boxed [`PeerTransport`] produced by a [`Connector`].
//! The transport posts asynchronous results through a [`TransportSink`]; the
//! session turns them into [`SessionEvent`]s on the caller's thread when it is
//! polled.

mod link;
mod peer;
mod session;

pub use link::{LinkStatus, TransportEvent, TransportSink};
pub use peer::{Connector, PeerTransport};
pub use session::{validate_sdp, Inbound, Session, SessionEvent, SessionState};
