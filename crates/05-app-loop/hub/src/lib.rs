//! Dispatch core joining a session to the caller's handlers.

#![allow(missing_docs)]

mod handlers;
mod hub;

pub use handlers::{AnchorReplyHandler, AnchorRequestHandler, Handlers, QrHandler};
pub use hub::Hub;
