//! Shared state between a session and the transport thread serving it.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use crossbeam_channel::Sender;
use remoting_abi::{ConnectionState, IceCandidate, SdpType, StatsReport};

/// Notifications a transport posts for the session to deliver.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportEvent {
    SdpCreated { kind: SdpType, sdp: String },
    LocalIceCandidate(IceCandidate),
    ConnectionStateChanged(ConnectionState),
    DataChannelOpened,
    DataChannelClosed,
}

/// Link facts readable from any thread.
///
/// The transport records connection state and channel readiness here as soon
/// as they change; the session gates pushes on these values without waiting
/// for the matching event to be processed.
#[derive(Debug)]
pub struct LinkStatus {
    connection: AtomicU32,
    data_channel_open: AtomicBool,
    stats: ArcSwap<StatsReport>,
}

impl LinkStatus {
    pub fn new() -> Self {
        Self {
            connection: AtomicU32::new(ConnectionState::Disconnected.as_u32()),
            data_channel_open: AtomicBool::new(false),
            stats: ArcSwap::from_pointee(StatsReport::default()),
        }
    }

    pub fn connection(&self) -> ConnectionState {
        ConnectionState::from_u32(self.connection.load(Ordering::Acquire))
            .unwrap_or(ConnectionState::Failed)
    }

    pub fn record_connection(&self, state: ConnectionState) {
        self.connection.store(state.as_u32(), Ordering::Release);
    }

    pub fn data_channel_open(&self) -> bool {
        self.data_channel_open.load(Ordering::Acquire)
    }

    pub fn record_data_channel(&self, open: bool) {
        self.data_channel_open.store(open, Ordering::Release);
    }

    /// Latest report the transport published.
    pub fn stats(&self) -> Arc<StatsReport> {
        self.stats.load_full()
    }

    pub fn publish_stats(&self, report: StatsReport) {
        self.stats.store(Arc::new(report));
    }

    pub(crate) fn clear(&self) {
        self.record_connection(ConnectionState::Disconnected);
        self.record_data_channel(false);
    }
}

impl Default for LinkStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport-side writer for events and link status.
#[derive(Clone)]
pub struct TransportSink {
    events: Sender<TransportEvent>,
    status: Arc<LinkStatus>,
}

impl TransportSink {
    pub fn new(events: Sender<TransportEvent>, status: Arc<LinkStatus>) -> Self {
        Self { events, status }
    }

    pub fn status(&self) -> &LinkStatus {
        &self.status
    }

    pub fn sdp_created(&self, kind: SdpType, sdp: impl Into<String>) {
        self.post(TransportEvent::SdpCreated {
            kind,
            sdp: sdp.into(),
        });
    }

    pub fn local_ice_candidate(&self, candidate: IceCandidate) {
        self.post(TransportEvent::LocalIceCandidate(candidate));
    }

    pub fn connection_state(&self, state: ConnectionState) {
        self.status.record_connection(state);
        self.post(TransportEvent::ConnectionStateChanged(state));
    }

    pub fn data_channel(&self, open: bool) {
        self.status.record_data_channel(open);
        self.post(if open {
            TransportEvent::DataChannelOpened
        } else {
            TransportEvent::DataChannelClosed
        });
    }

    pub fn publish_stats(&self, report: StatsReport) {
        self.status.publish_stats(report);
    }

    fn post(&self, event: TransportEvent) {
        if self.events.send(event).is_err() {
            log::debug!("session dropped; transport event discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_is_recorded_before_the_event_is_read() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let status = Arc::new(LinkStatus::new());
        let sink = TransportSink::new(tx, Arc::clone(&status));

        sink.connection_state(ConnectionState::Connected);
        sink.data_channel(true);
        assert_eq!(status.connection(), ConnectionState::Connected);
        assert!(status.data_channel_open());

        assert_eq!(
            rx.try_recv().unwrap(),
            TransportEvent::ConnectionStateChanged(ConnectionState::Connected)
        );
        assert_eq!(rx.try_recv().unwrap(), TransportEvent::DataChannelOpened);
    }

    #[test]
    fn stats_swap_in_whole_reports() {
        let status = LinkStatus::new();
        assert!(status.stats().is_empty());
        let mut report = StatsReport::default();
        report.stats.push(remoting_abi::Stats {
            id: "T01".into(),
            kind: remoting_abi::StatsType::Transport,
            timestamp_us: 5,
            members: Vec::new(),
        });
        status.publish_stats(report.clone());
        assert_eq!(*status.stats(), report);
    }
}
