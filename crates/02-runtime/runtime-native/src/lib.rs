#![deny(missing_docs)]
//! In-process peer transport for native hosts and end-to-end tests.
//!
//! A [`LoopbackNetwork`] joins one server and one client session through a
//! transport thread. Signaling is simulated: the server's offer, the client's
//! answer and one host candidate per side are produced locally, and the link
//! comes up once both descriptions are applied and each side accepted the
//! other's candidate.

mod fabric;
mod network;
mod peer;
mod pump;

pub use network::{LoopbackBuilder, LoopbackNetwork};
pub use peer::LoopbackConnector;
