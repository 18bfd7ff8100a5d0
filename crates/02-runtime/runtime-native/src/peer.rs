//! Peer transports handed to sessions.

use std::sync::Arc;

use parking_lot::Mutex;
use remoting_abi::{Error, GraphicsApiConfig, IceCandidate, Result, SdpType};
use remoting_config::{Config, Role};
use session::{Connector, PeerTransport, TransportSink};
use transport_codecs::PacketCodec;
use transport_fabric::{build_link, EndpointHandle, LinkSpec};

use crate::fabric::{host_candidate, Fabric};

/// Creates the server and client ends of one [`LoopbackNetwork`].
///
/// Each role can be attached once at a time; a second session of the same
/// role fails with `PeerConnectionFactory` until the first one closes.
///
/// [`LoopbackNetwork`]: crate::LoopbackNetwork
#[derive(Clone)]
pub struct LoopbackConnector {
    fabric: Arc<Mutex<Fabric>>,
    link: LinkSpec,
}

impl LoopbackConnector {
    pub(crate) fn new(fabric: Arc<Mutex<Fabric>>, link: LinkSpec) -> Self {
        Self { fabric, link }
    }
}

impl Connector for LoopbackConnector {
    fn create(&self, role: Role, config: &Config) -> Result<Box<dyn PeerTransport>> {
        let mut fabric = self.fabric.lock();
        let side = fabric.side_mut(role);
        if side.attached {
            log::warn!("{role:?} side of the loopback is already attached");
            return Err(Error::PeerConnectionFactory);
        }
        side.attached = true;
        side.tracing = config.tracing_enabled();
        Ok(Box::new(LoopbackPeer {
            role,
            fabric: Arc::clone(&self.fabric),
            link: self.link.clone(),
            closed: false,
        }))
    }
}

struct LoopbackPeer {
    role: Role,
    fabric: Arc<Mutex<Fabric>>,
    link: LinkSpec,
    closed: bool,
}

impl LoopbackPeer {
    fn sink(fabric: &mut Fabric, role: Role) -> Result<TransportSink> {
        fabric
            .side_mut(role)
            .sink
            .clone()
            .ok_or(Error::PeerConnection)
    }
}

impl PeerTransport for LoopbackPeer {
    fn connect(&mut self, sink: TransportSink) -> Result<EndpointHandle<PacketCodec>> {
        let (handle, worker) = build_link(PacketCodec, &self.link)?;
        let mut fabric = self.fabric.lock();
        let side = fabric.side_mut(self.role);
        side.worker = Some(worker);
        side.sink = Some(sink);
        Ok(handle)
    }

    fn create_offer(&mut self) -> Result<()> {
        if self.role != Role::Server {
            return Err(Error::PeerConnection);
        }
        let mut fabric = self.fabric.lock();
        let sink = Self::sink(&mut fabric, self.role)?;
        let offer = fabric.offer();
        fabric.server.offered = true;
        sink.sdp_created(SdpType::Offer, offer);
        Ok(())
    }

    fn set_remote_description(&mut self, kind: SdpType, sdp: &str) -> Result<()> {
        let mut fabric = self.fabric.lock();
        let sink = Self::sink(&mut fabric, self.role)?;
        match (self.role, kind) {
            (Role::Client, SdpType::Offer) => {
                fabric.client.remote_applied = true;
                sink.sdp_created(SdpType::Answer, fabric.answer());
                sink.local_ice_candidate(host_candidate(Role::Client));
            }
            (Role::Server, SdpType::Answer) if fabric.server.offered => {
                fabric.server.remote_applied = true;
                sink.local_ice_candidate(host_candidate(Role::Server));
            }
            _ => {
                log::warn!("{:?} cannot apply a remote {kind:?} now", self.role);
                return Err(Error::PeerConnection);
            }
        }
        log::trace!("{:?} applied remote {kind:?} ({} bytes)", self.role, sdp.len());
        fabric.try_link();
        Ok(())
    }

    fn add_ice_candidate(&mut self, candidate: &IceCandidate) -> Result<()> {
        if !candidate.candidate.contains("127.0.0.1") {
            log::debug!("ignoring unreachable candidate {}", candidate.candidate);
            return Ok(());
        }
        let mut fabric = self.fabric.lock();
        fabric.side_mut(self.role).remote_candidate = true;
        fabric.try_link();
        Ok(())
    }

    fn add_video_track(&mut self, config: &GraphicsApiConfig) -> Result<()> {
        if config.width == 0 || config.height == 0 {
            return Err(Error::VideoTrack);
        }
        self.fabric
            .lock()
            .side_mut(self.role)
            .video_tracks
            .push(*config);
        Ok(())
    }

    fn add_audio_track(&mut self) -> Result<()> {
        self.fabric.lock().side_mut(self.role).audio_track = Some(true);
        Ok(())
    }

    fn set_audio_track_enabled(&mut self, enabled: bool) -> Result<()> {
        let mut fabric = self.fabric.lock();
        let track = fabric
            .side_mut(self.role)
            .audio_track
            .as_mut()
            .ok_or(Error::AudioTrack)?;
        *track = enabled;
        Ok(())
    }

    fn enable_microphone_capture(&mut self) -> Result<()> {
        let mut fabric = self.fabric.lock();
        let side = fabric.side_mut(self.role);
        if side.audio_track.is_none() {
            return Err(Error::AudioTrack);
        }
        side.microphone = true;
        fabric.publish_stats();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        let mut fabric = self.fabric.lock();
        fabric.unlink(self.role);
        let side = fabric.side_mut(self.role);
        side.video_tracks.clear();
        side.audio_track = None;
        side.microphone = false;
        if let Some(worker) = &side.worker {
            worker.discard_outbound();
        }
        log::debug!("{:?} loopback peer reset", self.role);
        Ok(())
    }

    fn close(&mut self) {
        if std::mem::replace(&mut self.closed, true) {
            return;
        }
        let mut fabric = self.fabric.lock();
        fabric.unlink(self.role);
        *fabric.side_mut(self.role) = Default::default();
        log::debug!("{:?} loopback peer closed", self.role);
    }
}

impl Drop for LoopbackPeer {
    fn drop(&mut self) {
        self.close();
    }
}
