//! Handler slots, one per message kind.
//!
//! Registering replaces whatever the slot held; unregistering an empty slot
//! is a no-op.

use std::collections::HashMap;

use remoting_abi::{
    AnchorOp, AnchorReply, AnchorReplyKind, AnchorRequest, AudioData, CameraFrame,
    ConnectionState, CustomMessage, GraphicsApiFrame, IceCandidate, InputEvent, QrMessage,
    QrMessageKind, RequestToken, SdpType, SpatialInput, StatsReport, XrPose,
};

pub type QrHandler = Box<dyn FnMut(&QrMessage) + Send>;
pub type AnchorReplyHandler = Box<dyn FnMut(RequestToken, &AnchorReply) + Send>;
pub type AnchorRequestHandler = Box<dyn FnMut(&AnchorRequest) + Send>;

macro_rules! handler_slots {
    ($(
        $(#[$meta:meta])*
        $field:ident($($arg:ty),*) => $register:ident, $unregister:ident;
    )+) => {
        #[derive(Default)]
        pub struct Handlers {
            $($field: Option<Box<dyn FnMut($($arg),*) + Send>>,)+
            qr: HashMap<QrMessageKind, QrHandler>,
            anchor_replies: HashMap<AnchorReplyKind, AnchorReplyHandler>,
            anchor_requests: HashMap<AnchorOp, AnchorRequestHandler>,
        }

        impl Handlers {
            $(
                $(#[$meta])*
                pub fn $register<F>(&mut self, handler: F)
                where
                    F: FnMut($($arg),*) + Send + 'static,
                {
                    if self.$field.replace(Box::new(handler)).is_some() {
                        log::trace!(concat!(stringify!($field), " handler replaced"));
                    }
                }

                pub fn $unregister(&mut self) {
                    self.$field = None;
                }

                #[allow(clippy::type_complexity)]
                pub(crate) fn $field(&mut self) -> Option<&mut Box<dyn FnMut($($arg),*) + Send>> {
                    self.$field.as_mut()
                }
            )+
        }
    };
}

handler_slots! {
    connection_state(ConnectionState)
        => register_connection_state_handler, unregister_connection_state_handler;
    sdp_created(SdpType, &str)
        => register_sdp_created_handler, unregister_sdp_created_handler;
    local_ice_candidate(&IceCandidate)
        => register_local_ice_candidate_handler, unregister_local_ice_candidate_handler;
    view_pose(&XrPose) => register_view_pose_handler, unregister_view_pose_handler;
    input_event(&InputEvent) => register_input_event_handler, unregister_input_event_handler;
    spatial_input(&SpatialInput)
        => register_spatial_input_handler, unregister_spatial_input_handler;
    audio_data(&AudioData) => register_audio_data_handler, unregister_audio_data_handler;
    custom_message(&CustomMessage)
        => register_custom_message_handler, unregister_custom_message_handler;
    stats(&StatsReport) => register_stats_handler, unregister_stats_handler;
    /// Client: rendered frames from the server with the bandwidth estimate.
    frame(&GraphicsApiFrame, i64) => register_frame_handler, unregister_frame_handler;
    /// Server: frames from the client camera track.
    camera_frame(&CameraFrame) => register_camera_frame_handler, unregister_camera_frame_handler;
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_qr_handler<F>(&mut self, kind: QrMessageKind, handler: F)
    where
        F: FnMut(&QrMessage) + Send + 'static,
    {
        self.qr.insert(kind, Box::new(handler));
    }

    pub fn unregister_qr_handler(&mut self, kind: QrMessageKind) {
        self.qr.remove(&kind);
    }

    /// Server: replies and notifications of one kind.
    pub fn register_anchor_reply_handler<F>(&mut self, kind: AnchorReplyKind, handler: F)
    where
        F: FnMut(RequestToken, &AnchorReply) + Send + 'static,
    {
        self.anchor_replies.insert(kind, Box::new(handler));
    }

    pub fn unregister_anchor_reply_handler(&mut self, kind: AnchorReplyKind) {
        self.anchor_replies.remove(&kind);
    }

    /// Client: requests of one operation.
    pub fn register_anchor_request_handler<F>(&mut self, op: AnchorOp, handler: F)
    where
        F: FnMut(&AnchorRequest) + Send + 'static,
    {
        self.anchor_requests.insert(op, Box::new(handler));
    }

    pub fn unregister_anchor_request_handler(&mut self, op: AnchorOp) {
        self.anchor_requests.remove(&op);
    }

    pub fn has_frame_handler(&self) -> bool {
        self.frame.is_some()
    }

    pub fn has_camera_frame_handler(&self) -> bool {
        self.camera_frame.is_some()
    }

    pub(crate) fn qr(&mut self, kind: QrMessageKind) -> Option<&mut QrHandler> {
        self.qr.get_mut(&kind)
    }

    pub(crate) fn anchor_reply(&mut self, kind: AnchorReplyKind) -> Option<&mut AnchorReplyHandler> {
        self.anchor_replies.get_mut(&kind)
    }

    pub(crate) fn anchor_request(&mut self, op: AnchorOp) -> Option<&mut AnchorRequestHandler> {
        self.anchor_requests.get_mut(&op)
    }
}
