//! Errors raised while moving packets across a link.

use thiserror::Error;

use transport::TransportError;

pub type FabricResult<T> = Result<T, FabricError>;

#[derive(Debug, Error)]
pub enum FabricError {
    /// The queue or mailbox under a port refused the record outright.
    #[error("port storage: {0}")]
    Transport(#[from] TransportError),

    /// A payload failed to encode or to validate on decode.
    #[error("codec: {0}")]
    Codec(String),

    /// Link or port parameters that can never work together.
    #[error("link misconfigured: {0}")]
    Misconfigured(&'static str),

    /// The item exists in memory but has no wire form.
    #[error("not sendable: {0}")]
    NotSendable(&'static str),
}

impl FabricError {
    pub fn codec(msg: impl Into<String>) -> Self {
        FabricError::Codec(msg.into())
    }
}
