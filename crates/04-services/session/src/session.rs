use std::sync::Arc;

use crossbeam_channel::Receiver;
use remoting_abi::{
    ConnectionState, Error, GraphicsApiConfig, Hello, IceCandidate, Message, Packet, Result,
    SdpType, StatsReport, Version,
};
use remoting_config::{Config, Role};
use smallvec::SmallVec;
use transport_codecs::PacketCodec;
use transport_fabric::{EndpointHandle, SubmitOutcome};

use crate::link::{LinkStatus, TransportEvent, TransportSink};
use crate::peer::{Connector, PeerTransport};

/// Lifecycle of one connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Connected,
    Failed,
    Disconnected,
}

/// Something the caller's handlers should hear about.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    StateChanged(ConnectionState),
    SdpCreated { kind: SdpType, sdp: String },
    LocalIceCandidate(IceCandidate),
}

/// One item produced by [`Session::poll`], in delivery order.
#[derive(Clone, Debug, PartialEq)]
pub enum Inbound {
    Event(SessionEvent),
    Packet(Packet),
}

/// Checks the shape every session description must have.
pub fn validate_sdp(sdp: &str) -> Result<()> {
    if sdp.is_empty() || !sdp.starts_with("v=") {
        return Err(Error::SdpParse);
    }
    Ok(())
}

/// A live connection: transport, packet endpoint and link status.
pub struct Session {
    role: Role,
    config: Config,
    protocol_version: Version,
    gfx: GraphicsApiConfig,
    transport: Box<dyn PeerTransport>,
    endpoint: EndpointHandle<PacketCodec>,
    events: Receiver<TransportEvent>,
    status: Arc<LinkStatus>,
    audio_track: bool,
    camera_track: bool,
    closed: bool,
}

impl Session {
    /// Creates the transport, connects the packet endpoint and adds the
    /// tracks the role starts with.
    pub fn open(
        role: Role,
        config: Config,
        gfx: GraphicsApiConfig,
        protocol_version: Version,
        connector: &dyn Connector,
    ) -> Result<Self> {
        if config.role != role {
            return Err(Error::ConfigUnsupportedOrMissingRole);
        }
        config.validate()?;

        let mut transport = connector.create(role, &config)?;
        let (tx, rx) = crossbeam_channel::unbounded();
        let status = Arc::new(LinkStatus::new());
        let endpoint = transport.connect(TransportSink::new(tx, Arc::clone(&status)))?;

        let mut session = Self {
            role,
            config,
            protocol_version,
            gfx,
            transport,
            endpoint,
            events: rx,
            status,
            audio_track: false,
            camera_track: false,
            closed: false,
        };
        session.add_tracks()?;
        log::debug!(
            "{:?} session opened (protocol {}, audio {})",
            role,
            protocol_version,
            session.audio_track
        );
        Ok(session)
    }

    fn add_tracks(&mut self) -> Result<()> {
        if self.role == Role::Server {
            self.transport.add_video_track(&self.gfx)?;
        }
        if self.camera_track {
            self.transport.add_video_track(&self.gfx)?;
        }
        if self.config.audio_enabled() {
            self.transport.add_audio_track()?;
            self.audio_track = true;
        }
        Ok(())
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn protocol_version(&self) -> Version {
        self.protocol_version
    }

    pub fn status(&self) -> &LinkStatus {
        &self.status
    }

    pub fn state(&self) -> SessionState {
        if self.closed {
            return SessionState::Disconnected;
        }
        match self.status.connection() {
            ConnectionState::Connected => SessionState::Connected,
            ConnectionState::Failed => SessionState::Failed,
            ConnectionState::Disconnected => SessionState::Initializing,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn create_offer(&mut self) -> Result<()> {
        if self.role != Role::Server {
            return Err(Error::InvalidArgument);
        }
        self.transport.create_offer()
    }

    pub fn set_remote_description(&mut self, kind: SdpType, sdp: &str) -> Result<()> {
        validate_sdp(sdp)?;
        let expected = match self.role {
            Role::Server => SdpType::Answer,
            Role::Client => SdpType::Offer,
        };
        if kind != expected {
            return Err(Error::InvalidArgument);
        }
        self.transport.set_remote_description(kind, sdp)
    }

    pub fn add_ice_candidate(&mut self, candidate: &IceCandidate) -> Result<()> {
        if candidate.candidate.is_empty() {
            return Err(Error::SdpParse);
        }
        self.transport.add_ice_candidate(candidate)
    }

    /// Adds the client camera track described by `gfx`.
    pub fn add_camera_track(&mut self, gfx: GraphicsApiConfig) -> Result<()> {
        self.gfx = gfx;
        self.transport.add_video_track(&gfx)?;
        self.camera_track = true;
        Ok(())
    }

    pub fn has_audio_track(&self) -> bool {
        self.audio_track
    }

    pub fn has_camera_track(&self) -> bool {
        self.camera_track
    }

    pub fn set_audio_track_enabled(&mut self, enabled: bool) -> Result<()> {
        if !self.audio_track {
            return Err(Error::AudioTrackNotInitialized);
        }
        self.transport.set_audio_track_enabled(enabled)
    }

    pub fn enable_microphone_capture(&mut self) -> Result<()> {
        if !self.audio_track {
            return Err(Error::AudioTrackNotInitialized);
        }
        self.transport.enable_microphone_capture()
    }

    /// Queues a packet for the peer.
    ///
    /// Success means the packet was accepted into the outbound pipeline; a
    /// best-effort packet dropped on a full port still succeeds.
    pub fn send(&self, packet: &Packet) -> Result<()> {
        if self.closed || self.status.connection() != ConnectionState::Connected {
            return Err(Error::NotConnected);
        }
        if !self.status.data_channel_open() {
            return Err(Error::DataChannelSendNotOpen);
        }
        match self.endpoint.send(packet)? {
            SubmitOutcome::Accepted | SubmitOutcome::Coalesced => Ok(()),
            SubmitOutcome::Dropped => {
                log::trace!("{} dropped on a full best-effort port", packet.label());
                Ok(())
            }
            SubmitOutcome::WouldBlock => Err(Error::DataChannelSend),
        }
    }

    /// Collects transport events, then inbound packets, that arrived before
    /// this call.
    ///
    /// Handshake packets are consumed here. Unknown messages and packets that
    /// fail to decode are skipped.
    pub fn poll(&mut self) -> SmallVec<[Inbound; 8]> {
        let mut out = SmallVec::new();
        if self.closed {
            return out;
        }

        for event in self.events.try_iter().take(self.events.len()).collect::<Vec<_>>() {
            match event {
                TransportEvent::SdpCreated { kind, sdp } => {
                    out.push(Inbound::Event(SessionEvent::SdpCreated { kind, sdp }));
                }
                TransportEvent::LocalIceCandidate(candidate) => {
                    out.push(Inbound::Event(SessionEvent::LocalIceCandidate(candidate)));
                }
                TransportEvent::ConnectionStateChanged(state) => {
                    out.push(Inbound::Event(SessionEvent::StateChanged(state)));
                }
                TransportEvent::DataChannelOpened => self.send_hello(),
                TransportEvent::DataChannelClosed => {
                    log::debug!("{:?} data channel closed", self.role);
                }
            }
        }

        let pending = self.endpoint.pending();
        for decoded in self.endpoint.drain(pending) {
            match decoded {
                Ok(Packet::Hello(hello)) => {
                    if let Some(event) = self.check_hello(hello) {
                        out.push(Inbound::Event(event));
                    }
                }
                Ok(Packet::Message(Message::Unknown(tag))) => {
                    log::debug!("skipping message with unknown tag {tag:#04x}");
                }
                Ok(packet) => out.push(Inbound::Packet(packet)),
                Err(err) => log::warn!("discarding inbound packet: {err}"),
            }
        }
        out
    }

    fn send_hello(&self) {
        let hello = Packet::Hello(Hello {
            protocol_version: self.protocol_version,
        });
        if let Err(err) = self.send(&hello) {
            log::warn!("{:?} could not send hello: {err}", self.role);
        }
    }

    fn check_hello(&self, hello: Hello) -> Option<SessionEvent> {
        let theirs = hello.protocol_version;
        if theirs.is_compatible_with(self.protocol_version) {
            log::debug!("{:?} peer speaks protocol {theirs}", self.role);
            return None;
        }
        log::warn!(
            "{:?} peer protocol {theirs} is incompatible with {}",
            self.role,
            self.protocol_version
        );
        self.status.record_connection(ConnectionState::Failed);
        Some(SessionEvent::StateChanged(ConnectionState::Failed))
    }

    /// Newest coalesced frame, if one arrived since the last take.
    pub fn take_frame(&mut self) -> Option<Packet> {
        match self.endpoint.take_latest()? {
            Ok(packet) => Some(packet),
            Err(err) => {
                log::warn!("discarding undecodable frame: {err}");
                None
            }
        }
    }

    pub fn has_frame(&self) -> bool {
        self.endpoint.has_latest()
    }

    pub fn stats(&self) -> Arc<StatsReport> {
        self.status.stats()
    }

    /// Tears down the peer connection and returns to `Initializing`.
    pub fn reset(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::InvalidHandle);
        }
        self.transport.reset()?;
        let stale = self.endpoint.discard_inbound() + self.events.try_iter().count();
        self.status.clear();
        self.audio_track = false;
        log::debug!("{:?} session reset ({stale} stale items dropped)", self.role);
        self.add_tracks()
    }

    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.transport.close();
        self.closed = true;
        self.endpoint.discard_inbound();
        self.status.clear();
        log::debug!("{:?} session closed", self.role);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
