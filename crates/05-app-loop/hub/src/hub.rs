use anchors::{AnchorRequests, AnchorResponder};
use capabilities::{AudioGate, QrGate, StatsCollector};
use remoting_abi::{
    AnchorReply, AnchorRequest, AudioData, CameraFrame, ConnectionState, CustomMessage, Error,
    GraphicsApiConfig, GraphicsApiFrame, IceCandidate, InputEvent, Message, Packet, QrMessage,
    QrMessageKind, RequestToken, Result, SdpType, SpatialInput, XrPose,
};
use remoting_config::Role;
use session::{Inbound, Session, SessionEvent, SessionState};

use crate::handlers::Handlers;

/// Per-connection dispatch core.
///
/// Owns the session plus the anchor, QR, audio and stats state layered on it,
/// and delivers inbound traffic to the registered handlers when
/// [`Hub::process_messages`] runs.
pub struct Hub {
    session: Session,
    handlers: Handlers,
    anchor_requests: AnchorRequests,
    anchor_responder: AnchorResponder,
    qr: QrGate,
    audio: AudioGate,
    stats: StatsCollector,
}

impl Hub {
    pub fn new(session: Session) -> Self {
        let audio = AudioGate::new(session.has_audio_track());
        let stats = StatsCollector::from_config(session.config());
        Self {
            session,
            handlers: Handlers::new(),
            anchor_requests: AnchorRequests::new(),
            anchor_responder: AnchorResponder::new(),
            qr: QrGate::new(),
            audio,
            stats,
        }
    }

    pub fn role(&self) -> Role {
        self.session.role()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn handlers(&mut self) -> &mut Handlers {
        &mut self.handlers
    }

    pub fn qr(&self) -> &QrGate {
        &self.qr
    }

    pub fn audio(&self) -> &AudioGate {
        &self.audio
    }

    pub fn outstanding_anchor_requests(&self) -> usize {
        self.anchor_requests.outstanding()
    }

    // Signaling

    pub fn create_offer(&mut self) -> Result<()> {
        self.session.create_offer()
    }

    pub fn set_remote_description(&mut self, kind: SdpType, sdp: &str) -> Result<()> {
        self.session.set_remote_description(kind, sdp)
    }

    pub fn add_ice_candidate(&mut self, candidate: &IceCandidate) -> Result<()> {
        self.session.add_ice_candidate(candidate)
    }

    // Dispatch

    /// Delivers everything that arrived before the call, then the newest
    /// coalesced frame when a handler wants it, then any requested stats.
    ///
    /// Never blocks. Items without a handler are discarded; a coalesced
    /// frame without a handler stays available to [`Hub::pull_frame`].
    pub fn process_messages(&mut self) -> Result<()> {
        if self.session.is_closed() {
            return Err(Error::InvalidHandle);
        }
        let inbound = self.session.poll();
        let delivered = inbound.len();
        for item in inbound {
            match item {
                Inbound::Event(event) => self.dispatch_event(event),
                Inbound::Packet(packet) => self.dispatch_packet(packet),
            }
        }

        let wants_frame = match self.role() {
            Role::Client => self.handlers.has_frame_handler(),
            Role::Server => self.handlers.has_camera_frame_handler(),
        };
        if wants_frame {
            if let Some(packet) = self.session.take_frame() {
                self.dispatch_packet(packet);
            }
        }

        let session = &self.session;
        if let Some(report) = self.stats.take(|| session.stats()) {
            match self.handlers.stats() {
                Some(handler) => handler(&report),
                None => log::trace!("stats report without a handler"),
            }
        }
        if delivered > 0 {
            log::trace!("{:?} processed {delivered} inbound items", self.role());
        }
        Ok(())
    }

    fn dispatch_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::StateChanged(state) => {
                log::debug!("{:?} connection {state:?}", self.role());
                if state != ConnectionState::Connected {
                    // Whatever the peer granted or owed leaves with it.
                    self.anchor_requests.clear();
                    self.anchor_responder.clear();
                    self.qr.clear();
                }
                if let Some(handler) = self.handlers.connection_state() {
                    handler(state);
                }
            }
            SessionEvent::SdpCreated { kind, sdp } => {
                if let Some(handler) = self.handlers.sdp_created() {
                    handler(kind, &sdp);
                }
            }
            SessionEvent::LocalIceCandidate(candidate) => {
                if let Some(handler) = self.handlers.local_ice_candidate() {
                    handler(&candidate);
                }
            }
        }
    }

    fn dispatch_packet(&mut self, packet: Packet) {
        let label = packet.label();
        let handled = match packet {
            Packet::Message(Message::Pose(pose)) => {
                self.handlers.view_pose().map(|handler| handler(&pose))
            }
            Packet::Message(Message::InputEvent(event)) => {
                self.handlers.input_event().map(|handler| handler(&event))
            }
            Packet::Message(Message::SpatialInput(input)) => {
                self.handlers.spatial_input().map(|handler| handler(&input))
            }
            Packet::Message(Message::QrMessage(message)) => {
                if self.role() == Role::Server {
                    self.qr.observe(&message);
                }
                self.handlers
                    .qr(message.kind())
                    .map(|handler| handler(&message))
            }
            Packet::Message(Message::None | Message::Unknown(_)) => Some(()),
            Packet::Custom(custom) => self.handlers.custom_message().map(|handler| handler(&custom)),
            Packet::Audio(audio) => self.handlers.audio_data().map(|handler| handler(&audio)),
            Packet::Frame { frame, bandwidth } => {
                self.handlers.frame().map(|handler| handler(&frame, bandwidth))
            }
            Packet::CameraFrame(camera) => {
                self.handlers.camera_frame().map(|handler| handler(&camera))
            }
            Packet::AnchorRequest(token, request) => {
                self.anchor_responder.on_request(token, &request);
                self.handlers
                    .anchor_request(request.op())
                    .map(|handler| handler(&request))
            }
            Packet::AnchorReply(token, reply) => {
                match self.anchor_requests.complete(token, &reply) {
                    Some(token) => self
                        .handlers
                        .anchor_reply(reply.kind())
                        .map(|handler| handler(token, &reply)),
                    None => Some(()),
                }
            }
            Packet::Hello(_) => Some(()),
        };
        if handled.is_none() {
            log::trace!("no handler for {label}; discarded");
        }
    }

    /// Takes the newest frame, or fails with `NoFrame` when none is waiting.
    pub fn pull_frame(&mut self) -> Result<(GraphicsApiFrame, i64)> {
        if self.session.is_closed() {
            return Err(Error::InvalidHandle);
        }
        match self.session.take_frame() {
            Some(Packet::Frame { frame, bandwidth }) => Ok((frame, bandwidth)),
            Some(other) => {
                log::debug!("pull_frame skipped {}", other.label());
                Err(Error::NoFrame)
            }
            None => Err(Error::NoFrame),
        }
    }

    // Pushes

    pub fn push_view_pose(&self, pose: XrPose) -> Result<()> {
        self.session.send(&Packet::Message(Message::Pose(pose)))
    }

    pub fn push_input_event(&self, event: InputEvent) -> Result<()> {
        self.session.send(&Packet::Message(Message::InputEvent(event)))
    }

    pub fn push_spatial_input(&self, input: SpatialInput) -> Result<()> {
        self.session.send(&Packet::Message(Message::SpatialInput(input)))
    }

    pub fn push_custom_message(&self, data: &[u8]) -> Result<()> {
        let message = CustomMessage::new(data.to_vec())?;
        self.session.send(&Packet::Custom(message))
    }

    /// Sends audio on the track; a disabled track swallows the samples.
    pub fn push_audio_data(&self, audio: AudioData) -> Result<()> {
        self.audio.require_track()?;
        if !self.audio.is_enabled() {
            log::trace!("audio track disabled; samples dropped");
            return Ok(());
        }
        self.session.send(&Packet::Audio(audio))
    }

    pub fn push_frame(&self, frame: GraphicsApiFrame, bandwidth: i64) -> Result<()> {
        self.session.send(&Packet::Frame { frame, bandwidth })
    }

    pub fn push_camera_frame(&self, frame: GraphicsApiFrame, extension: &[u8]) -> Result<()> {
        if !self.session.has_camera_track() {
            return Err(Error::VideoTrack);
        }
        self.session.send(&Packet::CameraFrame(CameraFrame {
            frame,
            extension: extension.to_vec(),
        }))
    }

    pub fn init_camera_track(&mut self, gfx: GraphicsApiConfig) -> Result<()> {
        self.session.add_camera_track(gfx)
    }

    pub fn set_audio_track_enabled(&mut self, enabled: bool) -> Result<()> {
        self.audio.set_enabled(enabled)?;
        self.session.set_audio_track_enabled(enabled)
    }

    pub fn enable_microphone_capture(&mut self) -> Result<()> {
        self.audio.require_track()?;
        self.session.enable_microphone_capture()?;
        self.audio.enable_microphone_capture()
    }

    /// Server: sends a QR query or control request.
    pub fn qr_request(&self, kind: QrMessageKind) -> Result<()> {
        let message = self.qr.request(kind)?;
        self.session.send(&Packet::Message(Message::QrMessage(message)))
    }

    /// Client: answers a query or reports a code event.
    pub fn qr_send(&self, message: QrMessage) -> Result<()> {
        self.session.send(&Packet::Message(Message::QrMessage(message)))
    }

    /// Server: sends an anchor request and returns its correlation token.
    pub fn anchor_request(&mut self, request: AnchorRequest) -> Result<RequestToken> {
        let op = request.op();
        let (token, packet) = self.anchor_requests.issue(request);
        self.session.send(&packet)?;
        self.anchor_requests.commit(token, op);
        Ok(token)
    }

    /// Client: answers the oldest matching request, or sends a notification.
    pub fn anchor_respond(&mut self, reply: AnchorReply) -> Result<()> {
        let op = reply.answers();
        let packet = self.anchor_responder.respond(reply)?;
        if let Err(err) = self.session.send(&packet) {
            if let (Some(op), Packet::AnchorReply(token, _)) = (op, &packet) {
                self.anchor_responder.restore(*token, op);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Requests a stats report for the next [`Hub::process_messages`].
    pub fn get_stats(&mut self) -> Result<()> {
        if self.session.is_closed() {
            return Err(Error::InvalidHandle);
        }
        self.stats.request();
        Ok(())
    }

    // Lifecycle

    pub fn reset(&mut self) -> Result<()> {
        self.session.reset()?;
        self.anchor_requests.clear();
        self.anchor_responder.clear();
        self.qr.clear();
        self.audio = AudioGate::new(self.session.has_audio_track());
        Ok(())
    }

    pub fn close(&mut self) {
        self.session.close();
        self.anchor_requests.clear();
        self.anchor_responder.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }
}
