//! Seams to the real-time transport collaborator.

use remoting_abi::{GraphicsApiConfig, IceCandidate, Result, SdpType};
use remoting_config::{Config, Role};
use transport_codecs::PacketCodec;
use transport_fabric::EndpointHandle;

use crate::link::TransportSink;

/// One peer connection as seen by a session.
///
/// Methods return promptly; results that take time (created SDP, gathered
/// candidates, connection changes) are posted through the [`TransportSink`]
/// handed to [`PeerTransport::connect`].
pub trait PeerTransport: Send {
    /// Starts serving the session and returns its packet endpoint.
    fn connect(&mut self, sink: TransportSink) -> Result<EndpointHandle<PacketCodec>>;

    fn create_offer(&mut self) -> Result<()>;

    fn set_remote_description(&mut self, kind: SdpType, sdp: &str) -> Result<()>;

    fn add_ice_candidate(&mut self, candidate: &IceCandidate) -> Result<()>;

    fn add_video_track(&mut self, config: &GraphicsApiConfig) -> Result<()>;

    fn add_audio_track(&mut self) -> Result<()>;

    fn set_audio_track_enabled(&mut self, enabled: bool) -> Result<()>;

    /// Sources the audio track from the local microphone.
    fn enable_microphone_capture(&mut self) -> Result<()>;

    /// Drops the peer connection and its tracks; the endpoint stays valid.
    fn reset(&mut self) -> Result<()>;

    fn close(&mut self);
}

/// Creates peer transports for new sessions.
pub trait Connector: Send + Sync {
    fn create(&self, role: Role, config: &Config) -> Result<Box<dyn PeerTransport>>;
}
