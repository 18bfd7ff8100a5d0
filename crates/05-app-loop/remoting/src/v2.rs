//! Operation tables for protocol major 2.

use std::path::Path;
use std::sync::Arc;

use hub::Hub;
use remoting_abi::{
    Anchor, AnchorId, AnchorOp, AnchorReply, AnchorReplyKind, AnchorRequest, AudioData,
    CameraFrame, CustomMessage, Error, GraphicsApiConfig, GraphicsApiFrame, Handle, IceCandidate,
    InputEvent, QrAccessStatus, QrCode, QrMessage, QrMessageKind, RequestToken, Result, SdpType,
    SpatialInput, StatsReport, Version, XrPose,
};
use remoting_config::{Config, Role};
use session::{Connector, Session, SessionState};

use crate::api::{ClientApi, RemotingApi, ServerApi};
use crate::callbacks::{
    install_message_callbacks, AnchorReplyCallback, AnchorRequestCallback, Callback,
    ConnectionCallbacks, SdpCallback, StateCallback,
};
use crate::handles::HandleTable;

/// Session table shared by both sides.
struct Endpoint {
    role: Role,
    version: Version,
    connector: Arc<dyn Connector>,
    hubs: HandleTable<Hub>,
}

impl Endpoint {
    fn new(role: Role, version: Version, connector: Arc<dyn Connector>) -> Self {
        Self {
            role,
            version,
            connector,
            hubs: HandleTable::new(),
        }
    }

    fn open(
        &mut self,
        config: Config,
        gfx: GraphicsApiConfig,
        callbacks: ConnectionCallbacks,
    ) -> Result<Handle> {
        if !self.hubs.is_empty() {
            return Err(Error::AlreadyInitialized);
        }
        let session = Session::open(self.role, config, gfx, self.version, self.connector.as_ref())?;
        let mut hub = Hub::new(session);
        callbacks.install(hub.handlers());
        let handle = self.hubs.insert(hub);
        log::debug!("{:?} {} initialized as {handle}", self.role, self.version);
        Ok(handle)
    }

    fn load(
        &mut self,
        config_path: &Path,
        gfx: GraphicsApiConfig,
        callbacks: ConnectionCallbacks,
    ) -> Result<Handle> {
        let config = Config::load(config_path).map_err(|err| {
            log::warn!("{err}");
            Error::from(err)
        })?;
        self.open(config, gfx, callbacks)
    }

    fn hub(&mut self, handle: Handle) -> Result<&mut Hub> {
        self.hubs.get_mut(handle)
    }

    fn state(&self, handle: Option<Handle>) -> SessionState {
        let Some(handle) = handle else {
            return SessionState::Uninitialized;
        };
        if self.hubs.was_removed(handle) {
            return SessionState::Disconnected;
        }
        self.hubs
            .get(handle)
            .map_or(SessionState::Uninitialized, Hub::state)
    }

    fn close(&mut self, handle: Handle) -> Result<()> {
        let mut hub = self.hubs.remove(handle)?;
        hub.close();
        log::debug!("{:?} {handle} closed", self.role);
        Ok(())
    }
}

/// Server operations for protocol 2.x.
pub(crate) struct ServerV2 {
    endpoint: Endpoint,
}

impl ServerV2 {
    pub(crate) fn new(version: Version, connector: Arc<dyn Connector>) -> Self {
        Self {
            endpoint: Endpoint::new(Role::Server, version, connector),
        }
    }

    fn request(&mut self, handle: Handle, request: AnchorRequest) -> Result<RequestToken> {
        self.endpoint.hub(handle)?.anchor_request(request)
    }
}

/// Client operations for protocol 2.x.
pub(crate) struct ClientV2 {
    endpoint: Endpoint,
}

impl ClientV2 {
    pub(crate) fn new(version: Version, connector: Arc<dyn Connector>) -> Self {
        Self {
            endpoint: Endpoint::new(Role::Client, version, connector),
        }
    }

    fn respond(&mut self, handle: Handle, reply: AnchorReply) -> Result<()> {
        self.endpoint.hub(handle)?.anchor_respond(reply)
    }

    fn qr(&mut self, handle: Handle, message: QrMessage) -> Result<()> {
        self.endpoint.hub(handle)?.qr_send(message)
    }
}

macro_rules! remoting_api {
    ($ty:ty) => {
        impl RemotingApi for $ty {
            fn protocol_version(&self) -> Version {
                self.endpoint.version
            }

            fn init(
                &mut self,
                config_path: &Path,
                gfx: GraphicsApiConfig,
                callbacks: ConnectionCallbacks,
            ) -> Result<Handle> {
                self.endpoint.load(config_path, gfx, callbacks)
            }

            fn init2(
                &mut self,
                config: Config,
                gfx: GraphicsApiConfig,
                callbacks: ConnectionCallbacks,
            ) -> Result<Handle> {
                self.endpoint.open(config, gfx, callbacks)
            }

            fn state(&self, handle: Option<Handle>) -> SessionState {
                self.endpoint.state(handle)
            }

            fn add_ice_candidate(&mut self, handle: Handle, candidate: &IceCandidate) -> Result<()> {
                self.endpoint.hub(handle)?.add_ice_candidate(candidate)
            }

            fn process_messages(&mut self, handle: Handle) -> Result<()> {
                self.endpoint.hub(handle)?.process_messages()
            }

            fn push_custom_message(&mut self, handle: Handle, data: &[u8]) -> Result<()> {
                self.endpoint.hub(handle)?.push_custom_message(data)
            }

            fn push_audio_data(&mut self, handle: Handle, audio: AudioData) -> Result<()> {
                self.endpoint.hub(handle)?.push_audio_data(audio)
            }

            fn set_audio_track_enabled(&mut self, handle: Handle, enabled: bool) -> Result<()> {
                self.endpoint.hub(handle)?.set_audio_track_enabled(enabled)
            }

            fn get_stats(&mut self, handle: Handle) -> Result<()> {
                self.endpoint.hub(handle)?.get_stats()
            }

            fn register_connection_state_handler(
                &mut self,
                handle: Handle,
                handler: StateCallback,
            ) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().register_connection_state_handler(handler);
                Ok(())
            }

            fn unregister_connection_state_handler(&mut self, handle: Handle) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().unregister_connection_state_handler();
                Ok(())
            }

            fn register_sdp_created_handler(
                &mut self,
                handle: Handle,
                handler: SdpCallback,
            ) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().register_sdp_created_handler(handler);
                Ok(())
            }

            fn unregister_sdp_created_handler(&mut self, handle: Handle) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().unregister_sdp_created_handler();
                Ok(())
            }

            fn register_local_ice_candidate_handler(
                &mut self,
                handle: Handle,
                handler: Callback<IceCandidate>,
            ) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().register_local_ice_candidate_handler(handler);
                Ok(())
            }

            fn unregister_local_ice_candidate_handler(&mut self, handle: Handle) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().unregister_local_ice_candidate_handler();
                Ok(())
            }

            fn register_custom_message_handler(
                &mut self,
                handle: Handle,
                handler: Callback<CustomMessage>,
            ) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().register_custom_message_handler(handler);
                Ok(())
            }

            fn unregister_custom_message_handler(&mut self, handle: Handle) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().unregister_custom_message_handler();
                Ok(())
            }

            fn register_audio_data_handler(
                &mut self,
                handle: Handle,
                handler: Callback<AudioData>,
            ) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().register_audio_data_handler(handler);
                Ok(())
            }

            fn unregister_audio_data_handler(&mut self, handle: Handle) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().unregister_audio_data_handler();
                Ok(())
            }

            fn register_stats_handler(
                &mut self,
                handle: Handle,
                handler: Callback<StatsReport>,
            ) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().register_stats_handler(handler);
                Ok(())
            }

            fn unregister_stats_handler(&mut self, handle: Handle) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().unregister_stats_handler();
                Ok(())
            }

            fn register_qr_handler(
                &mut self,
                handle: Handle,
                kind: QrMessageKind,
                handler: Callback<QrMessage>,
            ) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().register_qr_handler(kind, handler);
                Ok(())
            }

            fn unregister_qr_handler(&mut self, handle: Handle, kind: QrMessageKind) -> Result<()> {
                let hub = self.endpoint.hub(handle)?;
                hub.handlers().unregister_qr_handler(kind);
                Ok(())
            }

            fn close(&mut self, handle: Handle) -> Result<()> {
                self.endpoint.close(handle)
            }
        }
    };
}

remoting_api!(ServerV2);
remoting_api!(ClientV2);

impl ServerApi for ServerV2 {
    fn create_offer(&mut self, handle: Handle) -> Result<()> {
        self.endpoint.hub(handle)?.create_offer()
    }

    fn set_remote_answer(&mut self, handle: Handle, sdp: &str) -> Result<()> {
        self.endpoint
            .hub(handle)?
            .set_remote_description(SdpType::Answer, sdp)
    }

    fn push_frame(&mut self, handle: Handle, frame: GraphicsApiFrame, bandwidth: i64) -> Result<()> {
        self.endpoint.hub(handle)?.push_frame(frame, bandwidth)
    }

    fn register_view_pose_handler(&mut self, handle: Handle, handler: Callback<XrPose>) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().register_view_pose_handler(handler);
        Ok(())
    }

    fn unregister_view_pose_handler(&mut self, handle: Handle) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().unregister_view_pose_handler();
        Ok(())
    }

    fn register_input_event_handler(
        &mut self,
        handle: Handle,
        handler: Callback<InputEvent>,
    ) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().register_input_event_handler(handler);
        Ok(())
    }

    fn unregister_input_event_handler(&mut self, handle: Handle) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().unregister_input_event_handler();
        Ok(())
    }

    fn register_spatial_input_handler(
        &mut self,
        handle: Handle,
        handler: Callback<SpatialInput>,
    ) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().register_spatial_input_handler(handler);
        Ok(())
    }

    fn unregister_spatial_input_handler(&mut self, handle: Handle) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().unregister_spatial_input_handler();
        Ok(())
    }

    fn register_camera_frame_handler(
        &mut self,
        handle: Handle,
        handler: Callback<CameraFrame>,
    ) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().register_camera_frame_handler(handler);
        Ok(())
    }

    fn unregister_camera_frame_handler(&mut self, handle: Handle) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().unregister_camera_frame_handler();
        Ok(())
    }

    fn register_message_callbacks(
        &mut self,
        handle: Handle,
        pose: Callback<XrPose>,
        input: Callback<InputEvent>,
        qr: Callback<QrMessage>,
    ) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        install_message_callbacks(hub.handlers(), pose, input, qr);
        Ok(())
    }

    fn qr_is_supported(&mut self, handle: Handle) -> Result<()> {
        self.endpoint
            .hub(handle)?
            .qr_request(QrMessageKind::IsSupported)
    }

    fn qr_request_access(&mut self, handle: Handle) -> Result<()> {
        self.endpoint
            .hub(handle)?
            .qr_request(QrMessageKind::RequestAccess)
    }

    fn qr_start(&mut self, handle: Handle) -> Result<()> {
        self.endpoint.hub(handle)?.qr_request(QrMessageKind::Start)
    }

    fn qr_stop(&mut self, handle: Handle) -> Result<()> {
        self.endpoint.hub(handle)?.qr_request(QrMessageKind::Stop)
    }

    fn anchor_create_store(&mut self, handle: Handle) -> Result<RequestToken> {
        self.request(handle, AnchorRequest::CreateStore)
    }

    fn anchor_destroy_store(&mut self, handle: Handle) -> Result<RequestToken> {
        self.request(handle, AnchorRequest::DestroyStore)
    }

    fn anchor_clear_store(&mut self, handle: Handle) -> Result<RequestToken> {
        self.request(handle, AnchorRequest::ClearStore)
    }

    fn anchor_persist(&mut self, handle: Handle, name: &str, id: AnchorId) -> Result<RequestToken> {
        self.request(
            handle,
            AnchorRequest::Persist {
                name: name.to_owned(),
                id,
            },
        )
    }

    fn anchor_unpersist(&mut self, handle: Handle, name: &str) -> Result<RequestToken> {
        self.request(
            handle,
            AnchorRequest::Unpersist {
                name: name.to_owned(),
            },
        )
    }

    fn anchor_enumerate_persisted_names(&mut self, handle: Handle) -> Result<RequestToken> {
        self.request(handle, AnchorRequest::EnumeratePersistedNames)
    }

    fn anchor_create_from_persisted_name(
        &mut self,
        handle: Handle,
        name: &str,
    ) -> Result<RequestToken> {
        self.request(
            handle,
            AnchorRequest::CreateFromPersistedName {
                name: name.to_owned(),
            },
        )
    }

    fn anchor_export(&mut self, handle: Handle) -> Result<RequestToken> {
        self.request(handle, AnchorRequest::Export)
    }

    fn anchor_import(&mut self, handle: Handle, data: &[u8]) -> Result<RequestToken> {
        self.request(
            handle,
            AnchorRequest::Import {
                data: data.to_vec(),
            },
        )
    }

    fn register_anchor_handler(
        &mut self,
        handle: Handle,
        kind: AnchorReplyKind,
        handler: AnchorReplyCallback,
    ) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().register_anchor_reply_handler(kind, handler);
        Ok(())
    }

    fn unregister_anchor_handler(&mut self, handle: Handle, kind: AnchorReplyKind) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().unregister_anchor_reply_handler(kind);
        Ok(())
    }

    fn reset(&mut self, handle: Handle) -> Result<()> {
        self.endpoint.hub(handle)?.reset()
    }
}

impl ClientApi for ClientV2 {
    fn set_remote_offer(&mut self, handle: Handle, sdp: &str) -> Result<()> {
        self.endpoint
            .hub(handle)?
            .set_remote_description(SdpType::Offer, sdp)
    }

    fn push_view_pose(&mut self, handle: Handle, pose: XrPose) -> Result<()> {
        self.endpoint.hub(handle)?.push_view_pose(pose)
    }

    fn push_input_event(&mut self, handle: Handle, event: InputEvent) -> Result<()> {
        self.endpoint.hub(handle)?.push_input_event(event)
    }

    fn push_spatial_input(&mut self, handle: Handle, input: SpatialInput) -> Result<()> {
        self.endpoint.hub(handle)?.push_spatial_input(input)
    }

    fn pull_frame(&mut self, handle: Handle) -> Result<(GraphicsApiFrame, i64)> {
        self.endpoint.hub(handle)?.pull_frame()
    }

    fn register_frame_handler(
        &mut self,
        handle: Handle,
        handler: Box<dyn FnMut(&GraphicsApiFrame, i64) + Send>,
    ) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().register_frame_handler(handler);
        Ok(())
    }

    fn unregister_frame_handler(&mut self, handle: Handle) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().unregister_frame_handler();
        Ok(())
    }

    fn init_camera_track(&mut self, handle: Handle, gfx: GraphicsApiConfig) -> Result<()> {
        self.endpoint.hub(handle)?.init_camera_track(gfx)
    }

    fn push_camera_frame(
        &mut self,
        handle: Handle,
        frame: GraphicsApiFrame,
        extension: &[u8],
    ) -> Result<()> {
        self.endpoint.hub(handle)?.push_camera_frame(frame, extension)
    }

    fn enable_microphone_capture(&mut self, handle: Handle) -> Result<()> {
        self.endpoint.hub(handle)?.enable_microphone_capture()
    }

    fn qr_is_supported(&mut self, handle: Handle, supported: bool) -> Result<()> {
        self.qr(handle, QrMessage::IsSupported(supported))
    }

    fn qr_request_access(&mut self, handle: Handle, status: QrAccessStatus) -> Result<()> {
        self.qr(handle, QrMessage::RequestAccess(status))
    }

    fn qr_added(&mut self, handle: Handle, code: QrCode) -> Result<()> {
        self.qr(handle, QrMessage::Added(code))
    }

    fn qr_updated(&mut self, handle: Handle, code: QrCode) -> Result<()> {
        self.qr(handle, QrMessage::Updated(code))
    }

    fn qr_removed(&mut self, handle: Handle, code: QrCode) -> Result<()> {
        self.qr(handle, QrMessage::Removed(code))
    }

    fn qr_enumeration_completed(&mut self, handle: Handle) -> Result<()> {
        self.qr(handle, QrMessage::EnumerationCompleted)
    }

    fn register_anchor_request_handler(
        &mut self,
        handle: Handle,
        op: AnchorOp,
        handler: AnchorRequestCallback,
    ) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().register_anchor_request_handler(op, handler);
        Ok(())
    }

    fn unregister_anchor_request_handler(&mut self, handle: Handle, op: AnchorOp) -> Result<()> {
        let hub = self.endpoint.hub(handle)?;
        hub.handlers().unregister_anchor_request_handler(op);
        Ok(())
    }

    fn anchor_create_store_response(&mut self, handle: Handle, ok: bool) -> Result<()> {
        self.respond(handle, AnchorReply::CreateStore(ok))
    }

    fn anchor_destroy_store_response(&mut self, handle: Handle, ok: bool) -> Result<()> {
        self.respond(handle, AnchorReply::DestroyStore(ok))
    }

    fn anchor_clear_store_response(&mut self, handle: Handle, ok: bool) -> Result<()> {
        self.respond(handle, AnchorReply::ClearStore(ok))
    }

    fn anchor_persisted(&mut self, handle: Handle, id: AnchorId) -> Result<()> {
        self.respond(handle, AnchorReply::Persisted(id))
    }

    fn anchor_unpersisted(&mut self, handle: Handle, ok: bool) -> Result<()> {
        self.respond(handle, AnchorReply::Unpersisted(ok))
    }

    fn anchor_persisted_names_enumerated(
        &mut self,
        handle: Handle,
        names: Vec<String>,
    ) -> Result<()> {
        self.respond(handle, AnchorReply::PersistedNamesEnumerated(names))
    }

    fn anchor_created_from_persisted_name(
        &mut self,
        handle: Handle,
        anchor: Anchor,
    ) -> Result<()> {
        self.respond(handle, AnchorReply::CreatedFromPersistedName(anchor))
    }

    fn anchor_exported(&mut self, handle: Handle, data: Vec<u8>) -> Result<()> {
        self.respond(handle, AnchorReply::Exported(data))
    }

    fn anchor_imported(&mut self, handle: Handle, anchors: Vec<Anchor>) -> Result<()> {
        self.respond(handle, AnchorReply::Imported(anchors))
    }

    fn anchor_added(&mut self, handle: Handle, anchor: Anchor) -> Result<()> {
        self.respond(handle, AnchorReply::Added(anchor))
    }

    fn anchor_updated(&mut self, handle: Handle, anchors: Vec<Anchor>) -> Result<()> {
        self.respond(handle, AnchorReply::Updated(anchors))
    }

    fn anchor_deleted(&mut self, handle: Handle, id: AnchorId) -> Result<()> {
        self.respond(handle, AnchorReply::Deleted(id))
    }
}
