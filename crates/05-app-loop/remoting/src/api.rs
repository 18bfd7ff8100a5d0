//! Caller-facing operation tables.
//!
//! [`RemotingApi`] holds what both sides share; [`ServerApi`] and
//! [`ClientApi`] add the side-specific operations. Every call names the
//! connection through its [`Handle`] and fails with `InvalidHandle` once that
//! connection is closed.

use std::path::Path;

use remoting_abi::{
    Anchor, AnchorId, AnchorOp, AnchorReplyKind, AudioData, CustomMessage, GraphicsApiConfig,
    GraphicsApiFrame, Handle, IceCandidate, InputEvent, QrAccessStatus, QrCode, QrMessage,
    QrMessageKind, RequestToken, Result, SpatialInput, StatsReport, Version, XrPose,
};
use remoting_config::Config;
use session::SessionState;

use crate::callbacks::{
    AnchorReplyCallback, AnchorRequestCallback, Callback, ConnectionCallbacks, SdpCallback,
    StateCallback,
};

/// Operations common to both sides.
pub trait RemotingApi: Send {
    /// Protocol version this table was resolved for.
    fn protocol_version(&self) -> Version;

    /// Loads the config file at `config_path` and starts a session.
    fn init(
        &mut self,
        config_path: &Path,
        gfx: GraphicsApiConfig,
        callbacks: ConnectionCallbacks,
    ) -> Result<Handle>;

    /// Starts a session from an in-memory config.
    fn init2(
        &mut self,
        config: Config,
        gfx: GraphicsApiConfig,
        callbacks: ConnectionCallbacks,
    ) -> Result<Handle>;

    /// Current state. No handle, or one never issued, reads as
    /// `Uninitialized`; a closed handle reads as `Disconnected`.
    fn state(&self, handle: Option<Handle>) -> SessionState;

    fn add_ice_candidate(&mut self, handle: Handle, candidate: &IceCandidate) -> Result<()>;

    /// Delivers pending events and messages to the registered handlers.
    fn process_messages(&mut self, handle: Handle) -> Result<()>;

    fn push_custom_message(&mut self, handle: Handle, data: &[u8]) -> Result<()>;
    fn push_audio_data(&mut self, handle: Handle, audio: AudioData) -> Result<()>;
    fn set_audio_track_enabled(&mut self, handle: Handle, enabled: bool) -> Result<()>;

    /// Asks for a stats report, delivered on the next `process_messages`.
    fn get_stats(&mut self, handle: Handle) -> Result<()>;

    fn register_connection_state_handler(
        &mut self,
        handle: Handle,
        handler: StateCallback,
    ) -> Result<()>;
    fn unregister_connection_state_handler(&mut self, handle: Handle) -> Result<()>;
    fn register_sdp_created_handler(&mut self, handle: Handle, handler: SdpCallback)
        -> Result<()>;
    fn unregister_sdp_created_handler(&mut self, handle: Handle) -> Result<()>;
    fn register_local_ice_candidate_handler(
        &mut self,
        handle: Handle,
        handler: Callback<IceCandidate>,
    ) -> Result<()>;
    fn unregister_local_ice_candidate_handler(&mut self, handle: Handle) -> Result<()>;
    fn register_custom_message_handler(
        &mut self,
        handle: Handle,
        handler: Callback<CustomMessage>,
    ) -> Result<()>;
    fn unregister_custom_message_handler(&mut self, handle: Handle) -> Result<()>;
    fn register_audio_data_handler(
        &mut self,
        handle: Handle,
        handler: Callback<AudioData>,
    ) -> Result<()>;
    fn unregister_audio_data_handler(&mut self, handle: Handle) -> Result<()>;
    fn register_stats_handler(
        &mut self,
        handle: Handle,
        handler: Callback<StatsReport>,
    ) -> Result<()>;
    fn unregister_stats_handler(&mut self, handle: Handle) -> Result<()>;
    fn register_qr_handler(
        &mut self,
        handle: Handle,
        kind: QrMessageKind,
        handler: Callback<QrMessage>,
    ) -> Result<()>;
    fn unregister_qr_handler(&mut self, handle: Handle, kind: QrMessageKind) -> Result<()>;

    /// Ends the session; the handle is invalid afterwards.
    fn close(&mut self, handle: Handle) -> Result<()>;
}

/// Rendering side.
pub trait ServerApi: RemotingApi {
    fn create_offer(&mut self, handle: Handle) -> Result<()>;
    fn set_remote_answer(&mut self, handle: Handle, sdp: &str) -> Result<()>;

    /// Sends a rendered frame; its pose timestamp identifies the pose it
    /// was rendered against.
    fn push_frame(&mut self, handle: Handle, frame: GraphicsApiFrame, bandwidth: i64)
        -> Result<()>;

    fn register_view_pose_handler(&mut self, handle: Handle, handler: Callback<XrPose>)
        -> Result<()>;
    fn unregister_view_pose_handler(&mut self, handle: Handle) -> Result<()>;
    fn register_input_event_handler(
        &mut self,
        handle: Handle,
        handler: Callback<InputEvent>,
    ) -> Result<()>;
    fn unregister_input_event_handler(&mut self, handle: Handle) -> Result<()>;
    fn register_spatial_input_handler(
        &mut self,
        handle: Handle,
        handler: Callback<SpatialInput>,
    ) -> Result<()>;
    fn unregister_spatial_input_handler(&mut self, handle: Handle) -> Result<()>;
    fn register_camera_frame_handler(
        &mut self,
        handle: Handle,
        handler: Callback<remoting_abi::CameraFrame>,
    ) -> Result<()>;
    fn unregister_camera_frame_handler(&mut self, handle: Handle) -> Result<()>;

    /// Installs the view-pose, input-event and every QR handler at once.
    fn register_message_callbacks(
        &mut self,
        handle: Handle,
        pose: Callback<XrPose>,
        input: Callback<InputEvent>,
        qr: Callback<QrMessage>,
    ) -> Result<()>;

    fn qr_is_supported(&mut self, handle: Handle) -> Result<()>;
    fn qr_request_access(&mut self, handle: Handle) -> Result<()>;
    /// Fails with `InvalidArgument` until the client granted access.
    fn qr_start(&mut self, handle: Handle) -> Result<()>;
    fn qr_stop(&mut self, handle: Handle) -> Result<()>;

    fn anchor_create_store(&mut self, handle: Handle) -> Result<RequestToken>;
    fn anchor_destroy_store(&mut self, handle: Handle) -> Result<RequestToken>;
    fn anchor_clear_store(&mut self, handle: Handle) -> Result<RequestToken>;
    fn anchor_persist(&mut self, handle: Handle, name: &str, id: AnchorId)
        -> Result<RequestToken>;
    fn anchor_unpersist(&mut self, handle: Handle, name: &str) -> Result<RequestToken>;
    fn anchor_enumerate_persisted_names(&mut self, handle: Handle) -> Result<RequestToken>;
    fn anchor_create_from_persisted_name(
        &mut self,
        handle: Handle,
        name: &str,
    ) -> Result<RequestToken>;
    fn anchor_export(&mut self, handle: Handle) -> Result<RequestToken>;
    fn anchor_import(&mut self, handle: Handle, data: &[u8]) -> Result<RequestToken>;

    /// Replies of `kind`, with the token of the request they complete.
    fn register_anchor_handler(
        &mut self,
        handle: Handle,
        kind: AnchorReplyKind,
        handler: AnchorReplyCallback,
    ) -> Result<()>;
    fn unregister_anchor_handler(&mut self, handle: Handle, kind: AnchorReplyKind)
        -> Result<()>;

    /// Tears down the peer connection and returns to `Initializing`.
    fn reset(&mut self, handle: Handle) -> Result<()>;
}

/// Display side.
pub trait ClientApi: RemotingApi {
    fn set_remote_offer(&mut self, handle: Handle, sdp: &str) -> Result<()>;

    fn push_view_pose(&mut self, handle: Handle, pose: XrPose) -> Result<()>;
    fn push_input_event(&mut self, handle: Handle, event: InputEvent) -> Result<()>;
    fn push_spatial_input(&mut self, handle: Handle, input: SpatialInput) -> Result<()>;

    /// Newest frame, or `NoFrame` right away when none is waiting.
    fn pull_frame(&mut self, handle: Handle) -> Result<(GraphicsApiFrame, i64)>;
    fn register_frame_handler(
        &mut self,
        handle: Handle,
        handler: Box<dyn FnMut(&GraphicsApiFrame, i64) + Send>,
    ) -> Result<()>;
    fn unregister_frame_handler(&mut self, handle: Handle) -> Result<()>;

    fn init_camera_track(&mut self, handle: Handle, gfx: GraphicsApiConfig) -> Result<()>;
    fn push_camera_frame(
        &mut self,
        handle: Handle,
        frame: GraphicsApiFrame,
        extension: &[u8],
    ) -> Result<()>;
    fn enable_microphone_capture(&mut self, handle: Handle) -> Result<()>;

    fn qr_is_supported(&mut self, handle: Handle, supported: bool) -> Result<()>;
    fn qr_request_access(&mut self, handle: Handle, status: QrAccessStatus) -> Result<()>;
    fn qr_added(&mut self, handle: Handle, code: QrCode) -> Result<()>;
    fn qr_updated(&mut self, handle: Handle, code: QrCode) -> Result<()>;
    fn qr_removed(&mut self, handle: Handle, code: QrCode) -> Result<()>;
    fn qr_enumeration_completed(&mut self, handle: Handle) -> Result<()>;

    /// Requests for `op`; answer with the matching response operation.
    fn register_anchor_request_handler(
        &mut self,
        handle: Handle,
        op: AnchorOp,
        handler: AnchorRequestCallback,
    ) -> Result<()>;
    fn unregister_anchor_request_handler(&mut self, handle: Handle, op: AnchorOp) -> Result<()>;

    fn anchor_create_store_response(&mut self, handle: Handle, ok: bool) -> Result<()>;
    fn anchor_destroy_store_response(&mut self, handle: Handle, ok: bool) -> Result<()>;
    fn anchor_clear_store_response(&mut self, handle: Handle, ok: bool) -> Result<()>;
    fn anchor_persisted(&mut self, handle: Handle, id: AnchorId) -> Result<()>;
    fn anchor_unpersisted(&mut self, handle: Handle, ok: bool) -> Result<()>;
    fn anchor_persisted_names_enumerated(&mut self, handle: Handle, names: Vec<String>)
        -> Result<()>;
    fn anchor_created_from_persisted_name(&mut self, handle: Handle, anchor: Anchor)
        -> Result<()>;
    fn anchor_exported(&mut self, handle: Handle, data: Vec<u8>) -> Result<()>;
    fn anchor_imported(&mut self, handle: Handle, anchors: Vec<Anchor>) -> Result<()>;
    fn anchor_added(&mut self, handle: Handle, anchor: Anchor) -> Result<()>;
    fn anchor_updated(&mut self, handle: Handle, anchors: Vec<Anchor>) -> Result<()>;
    fn anchor_deleted(&mut self, handle: Handle, id: AnchorId) -> Result<()>;
}
