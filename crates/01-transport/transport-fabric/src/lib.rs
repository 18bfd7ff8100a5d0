#![allow(missing_docs)]
//! Typed ports and endpoint pairs layered over the raw transport queues.
//!
//! A link between a session and its transport thread is built from three port
//! pairs per direction, one per [`PortClass`]. The session side holds an
//! [`EndpointHandle`] that speaks typed items through a [`Codec`]; the transport
//! side holds a [`WorkerEndpoint`] that only moves enveloped bytes.

mod codec;
mod endpoint;
mod error;
mod outcome;
mod port;
mod runtime;

pub use codec::{Codec, Encoded, PortClass};
pub use endpoint::{build_link, EndpointHandle, LinkSpec, WorkerEndpoint};
pub use error::{FabricError, FabricResult};
pub use outcome::SubmitOutcome;
pub use port::{ConsumerPort, PortMetricsSnapshot, PortPair, ProducerPort};
pub use runtime::{TransportEngine, WorkerRuntime};
