//! State shared by the two peers and the transport thread.

use std::time::Instant;

use remoting_abi::{
    ConnectionState, GraphicsApiConfig, IceCandidate, Stats, StatsMember, StatsReport, StatsType,
    StatsValue,
};
use remoting_config::Role;
use session::TransportSink;
use transport_fabric::WorkerEndpoint;

/// Packet and byte counts for one direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Counters {
    pub(crate) packets: u64,
    pub(crate) bytes: u64,
}

impl Counters {
    pub(crate) fn record(&mut self, bytes: usize) {
        self.packets += 1;
        self.bytes += bytes as u64;
    }
}

/// One end of the simulated connection.
#[derive(Default)]
pub(crate) struct Side {
    pub(crate) attached: bool,
    pub(crate) tracing: bool,
    pub(crate) worker: Option<WorkerEndpoint>,
    pub(crate) sink: Option<TransportSink>,
    pub(crate) offered: bool,
    pub(crate) remote_applied: bool,
    pub(crate) remote_candidate: bool,
    pub(crate) video_tracks: Vec<GraphicsApiConfig>,
    pub(crate) audio_track: Option<bool>,
    pub(crate) microphone: bool,
    pub(crate) sent: Counters,
    pub(crate) received: Counters,
}

impl Side {
    fn forget_negotiation(&mut self) {
        self.offered = false;
        self.remote_applied = false;
        self.remote_candidate = false;
    }

    fn negotiated(&self) -> bool {
        self.remote_applied && self.remote_candidate && self.sink.is_some()
    }
}

pub(crate) struct Fabric {
    pub(crate) server: Side,
    pub(crate) client: Side,
    pub(crate) linked: bool,
    started: Instant,
    session_id: u64,
}

impl Fabric {
    pub(crate) fn new() -> Self {
        Self {
            server: Side::default(),
            client: Side::default(),
            linked: false,
            started: Instant::now(),
            session_id: 1,
        }
    }

    pub(crate) fn side_mut(&mut self, role: Role) -> &mut Side {
        match role {
            Role::Server => &mut self.server,
            Role::Client => &mut self.client,
        }
    }

    pub(crate) fn peer_mut(&mut self, role: Role) -> &mut Side {
        match role {
            Role::Server => &mut self.client,
            Role::Client => &mut self.server,
        }
    }

    pub(crate) fn offer(&mut self) -> String {
        self.session_id += 1;
        let mut sdp = format!(
            "v=0\r\no=- {} 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n\
             m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r\n",
            self.session_id
        );
        for (index, track) in self.server.video_tracks.iter().enumerate() {
            sdp.push_str(&format!(
                "m=video 9 UDP/TLS/RTP/SAVPF 96\r\na=mid:video{index}\r\na=x-dimensions:{}x{}\r\n",
                track.width, track.height
            ));
        }
        sdp
    }

    pub(crate) fn answer(&self) -> String {
        format!(
            "v=0\r\no=- {} 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n\
             m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r\n",
            self.session_id
        )
    }

    pub(crate) fn timestamp_us(&self) -> i64 {
        i64::try_from(self.started.elapsed().as_micros()).unwrap_or(i64::MAX)
    }

    /// Brings the link up once both sides finished negotiating.
    pub(crate) fn try_link(&mut self) {
        if self.linked || !self.server.negotiated() || !self.client.negotiated() {
            return;
        }
        self.linked = true;
        for side in [&self.server, &self.client] {
            if let Some(sink) = &side.sink {
                sink.connection_state(ConnectionState::Connected);
                sink.data_channel(true);
            }
        }
        self.publish_stats();
        log::debug!("loopback link up");
    }

    /// Takes the link down after `role` reset or closed.
    pub(crate) fn unlink(&mut self, role: Role) {
        let was_linked = std::mem::replace(&mut self.linked, false);
        self.side_mut(role).forget_negotiation();
        let peer = self.peer_mut(role);
        peer.forget_negotiation();
        if let Some(worker) = &peer.worker {
            worker.discard_outbound();
        }
        if was_linked {
            if let Some(sink) = &peer.sink {
                sink.data_channel(false);
                sink.connection_state(ConnectionState::Disconnected);
            }
            log::debug!("loopback link down ({role:?} left)");
        }
    }

    pub(crate) fn publish_stats(&self) {
        let timestamp_us = self.timestamp_us();
        for (label, side) in [("server", &self.server), ("client", &self.client)] {
            if let Some(sink) = &side.sink {
                sink.publish_stats(report(label, side, self.linked, timestamp_us));
            }
        }
    }
}

pub(crate) fn host_candidate(role: Role) -> IceCandidate {
    let port = match role {
        Role::Server => 50_000,
        Role::Client => 50_001,
    };
    IceCandidate::new(
        "0",
        0,
        format!("candidate:1 1 udp 2122260223 127.0.0.1 {port} typ host"),
    )
}

fn report(label: &str, side: &Side, linked: bool, timestamp_us: i64) -> StatsReport {
    let pair_state = if linked { "succeeded" } else { "waiting" };
    let mut stats = vec![
        Stats {
            id: format!("D-{label}"),
            kind: StatsType::DataChannel,
            timestamp_us,
            members: vec![
                StatsMember::new("messagesSent", StatsValue::Uint64(side.sent.packets)),
                StatsMember::new("bytesSent", StatsValue::Uint64(side.sent.bytes)),
                StatsMember::new(
                    "messagesReceived",
                    StatsValue::Uint64(side.received.packets),
                ),
                StatsMember::new("bytesReceived", StatsValue::Uint64(side.received.bytes)),
            ],
        },
        Stats {
            id: format!("CP-{label}"),
            kind: StatsType::CandidatePair,
            timestamp_us,
            members: vec![StatsMember::new(
                "state",
                StatsValue::String(pair_state.to_owned()),
            )],
        },
    ];
    if let Some(enabled) = side.audio_track {
        stats.push(Stats {
            id: format!("A-{label}"),
            kind: StatsType::MediaSource,
            timestamp_us,
            members: vec![
                StatsMember::new("kind", StatsValue::String("audio".to_owned())),
                StatsMember::new("trackEnabled", StatsValue::Bool(enabled)),
                StatsMember::new("microphoneCapture", StatsValue::Bool(side.microphone)),
            ],
        });
    }
    StatsReport { stats }
}
