use std::sync::Arc;

use hub::Handlers;
use parking_lot::Mutex;
use remoting_abi::{
    AnchorReply, AnchorRequest, ConnectionState, IceCandidate, InputEvent, QrMessage,
    QrMessageKind, RequestToken, SdpType, XrPose,
};

/// Boxed handler receiving a borrowed payload.
pub type Callback<T> = Box<dyn FnMut(&T) + Send>;
pub type StateCallback = Box<dyn FnMut(ConnectionState) + Send>;
pub type SdpCallback = Box<dyn FnMut(SdpType, &str) + Send>;
pub type AnchorReplyCallback = Box<dyn FnMut(RequestToken, &AnchorReply) + Send>;
pub type AnchorRequestCallback = Callback<AnchorRequest>;

/// Connection callbacks supplied to `init`.
///
/// They occupy the same slots as the per-kind connection-state, SDP and ICE
/// handlers, so a later registration replaces them.
#[derive(Default)]
pub struct ConnectionCallbacks {
    pub on_state_changed: Option<StateCallback>,
    pub on_sdp_created: Option<SdpCallback>,
    pub on_local_ice_candidate: Option<Callback<IceCandidate>>,
}

impl ConnectionCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_state_changed<F>(mut self, f: F) -> Self
    where
        F: FnMut(ConnectionState) + Send + 'static,
    {
        self.on_state_changed = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_sdp_created<F>(mut self, f: F) -> Self
    where
        F: FnMut(SdpType, &str) + Send + 'static,
    {
        self.on_sdp_created = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_local_ice_candidate<F>(mut self, f: F) -> Self
    where
        F: FnMut(&IceCandidate) + Send + 'static,
    {
        self.on_local_ice_candidate = Some(Box::new(f));
        self
    }

    pub(crate) fn install(self, handlers: &mut Handlers) {
        if let Some(f) = self.on_state_changed {
            handlers.register_connection_state_handler(f);
        }
        if let Some(f) = self.on_sdp_created {
            handlers.register_sdp_created_handler(f);
        }
        if let Some(f) = self.on_local_ice_candidate {
            handlers.register_local_ice_candidate_handler(f);
        }
    }
}

/// Installs the legacy bulk registration: pose, input and every QR kind.
pub(crate) fn install_message_callbacks(
    handlers: &mut Handlers,
    pose: Callback<XrPose>,
    input: Callback<InputEvent>,
    qr: Callback<QrMessage>,
) {
    handlers.register_view_pose_handler(pose);
    handlers.register_input_event_handler(input);
    let qr = Arc::new(Mutex::new(qr));
    for kind in QrMessageKind::ALL {
        let qr = Arc::clone(&qr);
        handlers.register_qr_handler(*kind, move |message: &QrMessage| {
            let mut handler = qr.lock();
            (*handler)(message)
        });
    }
}
