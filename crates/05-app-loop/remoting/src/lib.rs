//! Caller-facing remoting API.
//!
//! [`ApiFactory`] resolves a requested protocol version to a [`ServerApi`] or
//! [`ClientApi`] table. Tables own their sessions and hand out [`Handle`]s;
//! everything inbound is delivered from `process_messages` on the caller's
//! thread.
//!
//! [`Handle`]: remoting_abi::Handle

#![allow(missing_docs)]

mod api;
mod callbacks;
mod factory;
mod handles;
mod v2;

pub use api::{ClientApi, RemotingApi, ServerApi};
pub use callbacks::{
    AnchorReplyCallback, AnchorRequestCallback, Callback, ConnectionCallbacks, SdpCallback,
    StateCallback,
};
pub use factory::ApiFactory;
pub use session::{Connector, SessionState};
