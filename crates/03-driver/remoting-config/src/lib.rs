//! Remoting session configuration.
//!
//! A [`Config`] describes one peer: its role, media pipeline choices, ICE
//! servers, signaling endpoint and render settings. It is either built in code
//! or loaded from the JSON file format shared with the engine bindings
//! ([`Config::load`]). Missing optional sections fall back to documented
//! defaults with a warning; missing required fields fail with a
//! [`ConfigError`] that maps onto the boundary error codes.

mod error;
mod file;
mod model;

pub use error::{ConfigError, ConfigResult};
pub use model::{
    AudioDevice, Config, Decoder, DiagnosticOptions, Encoder, IceServer, RenderConfig, Role,
    SignalingConfig, VideoSource, DEFAULT_CONFIG_FILE, FALLBACK_STUN_URL,
};
