use std::path::PathBuf;

use remoting_abi::Error;
use thiserror::Error as ThisError;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("cannot open config file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config role is missing or unsupported: {0:?}")]
    Role(Option<String>),

    #[error("config encoder is missing or unsupported: {0:?}")]
    Encoder(Option<String>),

    #[error("config decoder is missing or unsupported: {0:?}")]
    Decoder(Option<String>),

    #[error("config video source is missing or unsupported: {0:?}")]
    VideoSource(Option<String>),

    #[error("config signaling section is missing")]
    SignalingMissing,

    #[error("config signaling ip is missing or invalid: {0:?}")]
    SignalingIp(Option<String>),

    #[error("config signaling port is missing or invalid: {0:?}")]
    SignalingPort(Option<u64>),
}

impl ConfigError {
    /// Boundary code reported for this failure.
    pub fn code(&self) -> Error {
        match self {
            ConfigError::FileOpen { .. } => Error::FileOpen,
            ConfigError::Parse(_) => Error::ConfigParse,
            ConfigError::Role(_) => Error::ConfigUnsupportedOrMissingRole,
            ConfigError::Encoder(_) => Error::ConfigUnsupportedOrMissingEncoder,
            ConfigError::Decoder(_) => Error::ConfigUnsupportedOrMissingDecoder,
            ConfigError::VideoSource(_) => Error::ConfigUnsupportedOrMissingVideoSource,
            ConfigError::SignalingMissing => Error::ConfigSignalingInvalidOrMissing,
            ConfigError::SignalingIp(_) => Error::ConfigSignalingIpInvalidOrMissing,
            ConfigError::SignalingPort(_) => Error::ConfigSignalingPortInvalidOrMissing,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        err.code()
    }
}
