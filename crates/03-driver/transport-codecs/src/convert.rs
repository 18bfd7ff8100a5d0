//! Domain ↔ V1 schema conversions.
//!
//! Encoding is infallible. Decoding fails on discriminants this build does not
//! know and on hand poses with the wrong joint count.

use remoting_abi::{
    Anchor, AnchorId, AnchorOp, AnchorReply, AnchorReplyKind, AnchorRequest, AudioData, Axis1D,
    Axis2D, Button, CameraFrame, ControllerData, GestureContext, GraphicsApiFrame, Guid, HandPose,
    HeadPose, InputEvent, InputEventKind, JointAccuracy, JointPose, ManipulationDelta, Matrix4x4,
    NavigationFlags, Pose, PositionAccuracy, QrAccessStatus, QrCode, QrMessage, QrMessageKind,
    QrVersion, Quaternion, RequestToken, SourceFlags, SourceHandedness, SourceKind,
    SourcePoseFlags, SourceStateFlags, SpatialInput, SpatialInputKind, SpatialInteractionSource,
    SpatialInteractionSourcePose, SpatialInteractionSourceProperties,
    SpatialInteractionSourceState, TextureHandle, TrackingState, UnknownDiscriminant, Vector2,
    Vector3, XrPose, HAND_JOINT_COUNT,
};
use transport::schema::*;
use transport_fabric::{FabricError, FabricResult};

fn wire<T>(value: Result<T, UnknownDiscriminant>) -> FabricResult<T> {
    value.map_err(|err| FabricError::codec(err.to_string()))
}

pub(crate) fn encode_xr_pose(pose: &XrPose) -> XrPoseV1 {
    XrPoseV1 {
        timestamp: pose.timestamp,
        view_left: pose.view_left.0,
        view_right: pose.view_right.0,
        proj_left: pose.proj_left.0,
        proj_right: pose.proj_right.0,
    }
}

pub(crate) fn decode_xr_pose(pose: XrPoseV1) -> XrPose {
    XrPose {
        timestamp: pose.timestamp,
        view_left: Matrix4x4(pose.view_left),
        view_right: Matrix4x4(pose.view_right),
        proj_left: Matrix4x4(pose.proj_left),
        proj_right: Matrix4x4(pose.proj_right),
    }
}

fn encode_pose(pose: &Pose) -> PoseV1 {
    PoseV1 {
        position: pose.position.to_array(),
        orientation: pose.orientation.to_array(),
    }
}

fn decode_pose(pose: PoseV1) -> Pose {
    Pose {
        position: Vector3::from_array(pose.position),
        orientation: Quaternion::from_array(pose.orientation),
    }
}

fn encode_head_pose(head: &HeadPose) -> HeadPoseV1 {
    HeadPoseV1 {
        position: head.position.to_array(),
        forward: head.forward.to_array(),
        up: head.up.to_array(),
    }
}

fn decode_head_pose(head: HeadPoseV1) -> HeadPose {
    HeadPose {
        position: Vector3::from_array(head.position),
        forward: Vector3::from_array(head.forward),
        up: Vector3::from_array(head.up),
    }
}

fn encode_hand(hand: &HandPose) -> Vec<JointPoseV1> {
    hand.joints
        .iter()
        .map(|joint| JointPoseV1 {
            orientation: joint.orientation.to_array(),
            position: joint.position.to_array(),
            radius: joint.radius,
            accuracy: joint.accuracy.as_u32(),
        })
        .collect()
}

fn decode_hand(joints: Vec<JointPoseV1>) -> FabricResult<HandPose> {
    if joints.len() != HAND_JOINT_COUNT {
        return Err(FabricError::codec(format!(
            "hand pose carries {} joints (expected {HAND_JOINT_COUNT})",
            joints.len()
        )));
    }
    let mut hand = HandPose::default();
    for (slot, joint) in hand.joints.iter_mut().zip(joints) {
        *slot = JointPose {
            orientation: Quaternion::from_array(joint.orientation),
            position: Vector3::from_array(joint.position),
            radius: joint.radius,
            accuracy: wire(JointAccuracy::from_u32(joint.accuracy))?,
        };
    }
    Ok(hand)
}

fn encode_source(source: &SpatialInteractionSource) -> SourceV1 {
    SourceV1 {
        id: source.id,
        kind: source.kind.as_u32(),
        handedness: source.handedness.as_u32(),
        flags: source.flags.bits(),
    }
}

fn decode_source(source: SourceV1) -> FabricResult<SpatialInteractionSource> {
    Ok(SpatialInteractionSource {
        id: source.id,
        kind: wire(SourceKind::from_u32(source.kind))?,
        handedness: wire(SourceHandedness::from_u32(source.handedness))?,
        flags: SourceFlags(source.flags),
    })
}

fn encode_source_pose(pose: &SpatialInteractionSourcePose) -> SourcePoseV1 {
    SourcePoseV1 {
        grip_orientation: pose.grip_orientation.to_array(),
        pointer_orientation: pose.pointer_orientation.to_array(),
        grip_position: pose.grip_position.to_array(),
        pointer_position: pose.pointer_position.to_array(),
        velocity: pose.velocity.to_array(),
        angular_velocity: pose.angular_velocity.to_array(),
        position_accuracy: pose.position_accuracy.as_u32(),
        flags: pose.flags.bits(),
    }
}

fn decode_source_pose(pose: SourcePoseV1) -> FabricResult<SpatialInteractionSourcePose> {
    Ok(SpatialInteractionSourcePose {
        grip_orientation: Quaternion::from_array(pose.grip_orientation),
        pointer_orientation: Quaternion::from_array(pose.pointer_orientation),
        grip_position: Vector3::from_array(pose.grip_position),
        pointer_position: Vector3::from_array(pose.pointer_position),
        velocity: Vector3::from_array(pose.velocity),
        angular_velocity: Vector3::from_array(pose.angular_velocity),
        position_accuracy: wire(PositionAccuracy::from_u32(pose.position_accuracy))?,
        flags: SourcePoseFlags(pose.flags),
    })
}

fn encode_source_state(state: &SpatialInteractionSourceState) -> SourceStateV1 {
    SourceStateV1 {
        properties: SourcePropertiesV1 {
            source_loss_risk: state.properties.source_loss_risk,
            source_loss_mitigation_direction: state
                .properties
                .source_loss_mitigation_direction
                .to_array(),
            source_pose: encode_source_pose(&state.properties.source_pose),
        },
        source: encode_source(&state.source),
        head_pose: encode_head_pose(&state.head_pose),
        hand_joints: encode_hand(&state.hand_pose),
        select_pressed_amount: state.select_pressed_amount,
        flags: state.flags.bits(),
    }
}

fn decode_source_state(state: SourceStateV1) -> FabricResult<SpatialInteractionSourceState> {
    Ok(SpatialInteractionSourceState {
        properties: SpatialInteractionSourceProperties {
            source_loss_risk: state.properties.source_loss_risk,
            source_loss_mitigation_direction: Vector3::from_array(
                state.properties.source_loss_mitigation_direction,
            ),
            source_pose: decode_source_pose(state.properties.source_pose)?,
        },
        source: decode_source(state.source)?,
        head_pose: decode_head_pose(state.head_pose),
        hand_pose: decode_hand(state.hand_joints)?,
        select_pressed_amount: state.select_pressed_amount,
        flags: SourceStateFlags(state.flags),
    })
}

fn encode_gesture(context: &GestureContext) -> GestureV1 {
    GestureV1 {
        source: encode_source(&context.source),
        source_pose: encode_source_pose(&context.source_pose),
        head_pose: encode_head_pose(&context.head_pose),
    }
}

fn decode_gesture(gesture: GestureV1) -> FabricResult<GestureContext> {
    Ok(GestureContext {
        source: decode_source(gesture.source)?,
        source_pose: decode_source_pose(gesture.source_pose)?,
        head_pose: decode_head_pose(gesture.head_pose),
    })
}

pub(crate) fn encode_input_event(event: &InputEvent) -> InputEventV1 {
    let mut v1 = InputEventV1 {
        kind: event.kind().as_u32(),
        state: event.source_state().map(encode_source_state),
        gesture: event.gesture().map(encode_gesture),
        tap_count: 0,
        delta: [0.0; 3],
        rails_flags: 0,
        normalized_offset: [0.0; 3],
    };
    match event {
        InputEvent::Tapped { tap_count, .. } => v1.tap_count = *tap_count,
        InputEvent::ManipulationUpdated { delta, .. }
        | InputEvent::ManipulationCompleted { delta, .. } => {
            v1.delta = delta.translation.to_array();
        }
        InputEvent::NavigationStarted { rails, .. }
        | InputEvent::NavigationCanceled { rails, .. } => v1.rails_flags = rails.bits(),
        InputEvent::NavigationUpdated {
            rails,
            normalized_offset,
            ..
        }
        | InputEvent::NavigationCompleted {
            rails,
            normalized_offset,
            ..
        } => {
            v1.rails_flags = rails.bits();
            v1.normalized_offset = normalized_offset.to_array();
        }
        _ => {}
    }
    v1
}

pub(crate) fn decode_input_event(event: InputEventV1) -> FabricResult<InputEvent> {
    let kind = wire(InputEventKind::from_u32(event.kind))?;
    let state = || -> FabricResult<SpatialInteractionSourceState> {
        match event.state.clone() {
            Some(state) => decode_source_state(state),
            None => Err(FabricError::codec("source event without source state")),
        }
    };
    let context = || -> FabricResult<GestureContext> {
        match event.gesture.clone() {
            Some(gesture) => decode_gesture(gesture),
            None => Err(FabricError::codec("gesture event without gesture context")),
        }
    };
    let delta = ManipulationDelta {
        translation: Vector3::from_array(event.delta),
    };
    let rails = NavigationFlags(event.rails_flags);
    let normalized_offset = Vector3::from_array(event.normalized_offset);

    Ok(match kind {
        InputEventKind::SourceDetected => InputEvent::SourceDetected(state()?),
        InputEventKind::SourceLost => InputEvent::SourceLost(state()?),
        InputEventKind::SourcePressed => InputEvent::SourcePressed(state()?),
        InputEventKind::SourceUpdated => InputEvent::SourceUpdated(state()?),
        InputEventKind::SourceReleased => InputEvent::SourceReleased(state()?),
        InputEventKind::Selected => InputEvent::Selected(context()?),
        InputEventKind::Tapped => InputEvent::Tapped {
            context: context()?,
            tap_count: event.tap_count,
        },
        InputEventKind::HoldStarted => InputEvent::HoldStarted(context()?),
        InputEventKind::HoldCompleted => InputEvent::HoldCompleted(context()?),
        InputEventKind::HoldCanceled => InputEvent::HoldCanceled(context()?),
        InputEventKind::ManipulationStarted => InputEvent::ManipulationStarted(context()?),
        InputEventKind::ManipulationUpdated => InputEvent::ManipulationUpdated {
            context: context()?,
            delta,
        },
        InputEventKind::ManipulationCompleted => InputEvent::ManipulationCompleted {
            context: context()?,
            delta,
        },
        InputEventKind::ManipulationCanceled => InputEvent::ManipulationCanceled(context()?),
        InputEventKind::NavigationStarted => InputEvent::NavigationStarted {
            context: context()?,
            rails,
        },
        InputEventKind::NavigationUpdated => InputEvent::NavigationUpdated {
            context: context()?,
            rails,
            normalized_offset,
        },
        InputEventKind::NavigationCompleted => InputEvent::NavigationCompleted {
            context: context()?,
            rails,
            normalized_offset,
        },
        InputEventKind::NavigationCanceled => InputEvent::NavigationCanceled {
            context: context()?,
            rails,
        },
    })
}

pub(crate) fn encode_spatial_input(input: &SpatialInput) -> SpatialInputV1 {
    let controller = &input.controller;
    SpatialInputV1 {
        kind: input.kind.as_u32(),
        controller: ControllerDataV1 {
            controller_identifier: controller.controller_identifier,
            handedness: controller.handedness.as_u32(),
            head_pose: encode_head_pose(&controller.head_pose),
            controller_pose: encode_pose(&controller.controller_pose),
            pointer_pose: encode_pose(&controller.pointer_pose),
            hand_joints: encode_hand(&controller.hand_data),
            buttons: controller
                .buttons
                .iter()
                .map(|b| ButtonV1 {
                    identifier: b.identifier,
                    pressed: b.pressed,
                })
                .collect(),
            axis1d: controller
                .axis1d
                .iter()
                .map(|a| Axis1DV1 {
                    identifier: a.identifier,
                    value: a.value,
                })
                .collect(),
            axis2d: controller
                .axis2d
                .iter()
                .map(|a| Axis2DV1 {
                    identifier: a.identifier,
                    value: [a.value.x, a.value.y],
                })
                .collect(),
        },
    }
}

pub(crate) fn decode_spatial_input(input: SpatialInputV1) -> FabricResult<SpatialInput> {
    let c = input.controller;
    let controller = ControllerData {
        controller_identifier: c.controller_identifier,
        handedness: wire(SourceHandedness::from_u32(c.handedness))?,
        head_pose: decode_head_pose(c.head_pose),
        controller_pose: decode_pose(c.controller_pose),
        pointer_pose: decode_pose(c.pointer_pose),
        hand_data: decode_hand(c.hand_joints)?,
        buttons: c
            .buttons
            .into_iter()
            .map(|b| Button {
                identifier: b.identifier,
                pressed: b.pressed,
            })
            .collect(),
        axis1d: c
            .axis1d
            .into_iter()
            .map(|a| Axis1D {
                identifier: a.identifier,
                value: a.value,
            })
            .collect(),
        axis2d: c
            .axis2d
            .into_iter()
            .map(|a| Axis2D {
                identifier: a.identifier,
                value: Vector2 {
                    x: a.value[0],
                    y: a.value[1],
                },
            })
            .collect(),
    };
    Ok(SpatialInput::new(
        wire(SpatialInputKind::from_u32(input.kind))?,
        controller,
    ))
}

fn encode_qr_code(code: &QrCode) -> QrCodeV1 {
    QrCodeV1 {
        id: GuidV1 {
            data1: code.id.data1,
            data2: code.id.data2,
            data3: code.id.data3,
            data4: code.id.data4,
        },
        timestamp: code.timestamp,
        sys_timestamp: code.sys_timestamp,
        physical_side_length: code.physical_side_length,
        version: code.version.as_u32(),
        data: code.data.clone(),
        pose: encode_pose(&code.pose),
    }
}

fn decode_qr_code(code: QrCodeV1) -> FabricResult<QrCode> {
    Ok(QrCode {
        id: Guid {
            data1: code.id.data1,
            data2: code.id.data2,
            data3: code.id.data3,
            data4: code.id.data4,
        },
        timestamp: code.timestamp,
        sys_timestamp: code.sys_timestamp,
        physical_side_length: code.physical_side_length,
        version: wire(QrVersion::from_u32(code.version))?,
        data: code.data,
        pose: decode_pose(code.pose),
    })
}

pub(crate) fn encode_qr_message(message: &QrMessage) -> QrMessageV1 {
    let mut v1 = QrMessageV1 {
        kind: message.kind().as_u32(),
        is_supported: false,
        access_status: 0,
        code: None,
    };
    match message {
        QrMessage::IsSupported(supported) => v1.is_supported = *supported,
        QrMessage::RequestAccess(status) => v1.access_status = status.as_u32(),
        QrMessage::Added(code) | QrMessage::Updated(code) | QrMessage::Removed(code) => {
            v1.code = Some(encode_qr_code(code));
        }
        QrMessage::Start | QrMessage::Stop | QrMessage::EnumerationCompleted => {}
    }
    v1
}

pub(crate) fn decode_qr_message(message: QrMessageV1) -> FabricResult<QrMessage> {
    let code = |code: Option<QrCodeV1>| match code {
        Some(code) => decode_qr_code(code),
        None => Err(FabricError::codec("qr code event without a code")),
    };
    Ok(match wire(QrMessageKind::from_u32(message.kind))? {
        QrMessageKind::IsSupported => QrMessage::IsSupported(message.is_supported),
        QrMessageKind::RequestAccess => {
            QrMessage::RequestAccess(wire(QrAccessStatus::from_u32(message.access_status))?)
        }
        QrMessageKind::Start => QrMessage::Start,
        QrMessageKind::Stop => QrMessage::Stop,
        QrMessageKind::Added => QrMessage::Added(code(message.code)?),
        QrMessageKind::Updated => QrMessage::Updated(code(message.code)?),
        QrMessageKind::Removed => QrMessage::Removed(code(message.code)?),
        QrMessageKind::EnumerationCompleted => QrMessage::EnumerationCompleted,
    })
}

pub(crate) fn encode_audio(audio: &AudioData) -> AudioV1 {
    AudioV1 {
        samples: audio.samples.clone(),
        bits_per_sample: audio.bits_per_sample,
        sample_rate: audio.sample_rate,
        channels: audio.channels,
        samples_per_channel: audio.samples_per_channel,
    }
}

pub(crate) fn decode_audio(audio: AudioV1) -> AudioData {
    AudioData {
        samples: audio.samples,
        bits_per_sample: audio.bits_per_sample,
        sample_rate: audio.sample_rate,
        channels: audio.channels,
        samples_per_channel: audio.samples_per_channel,
    }
}

pub(crate) fn encode_frame(frame: &GraphicsApiFrame, bandwidth: i64) -> FrameV1 {
    FrameV1 {
        pose: encode_xr_pose(&frame.pose),
        texture: frame.texture.0,
        bandwidth,
    }
}

pub(crate) fn decode_frame(frame: FrameV1) -> (GraphicsApiFrame, i64) {
    (
        GraphicsApiFrame::new(decode_xr_pose(frame.pose), TextureHandle(frame.texture)),
        frame.bandwidth,
    )
}

pub(crate) fn encode_camera_frame(camera: &CameraFrame) -> CameraFrameV1 {
    CameraFrameV1 {
        pose: encode_xr_pose(&camera.frame.pose),
        texture: camera.frame.texture.0,
        extension: camera.extension.clone(),
    }
}

pub(crate) fn decode_camera_frame(camera: CameraFrameV1) -> CameraFrame {
    CameraFrame {
        frame: GraphicsApiFrame::new(decode_xr_pose(camera.pose), TextureHandle(camera.texture)),
        extension: camera.extension,
    }
}

fn encode_anchor_id(id: AnchorId) -> AnchorIdV1 {
    AnchorIdV1 {
        first: id.first,
        second: id.second,
    }
}

fn decode_anchor_id(id: AnchorIdV1) -> AnchorId {
    AnchorId::new(id.first, id.second)
}

fn encode_anchor(anchor: &Anchor) -> AnchorV1 {
    AnchorV1 {
        id: encode_anchor_id(anchor.id),
        pose: encode_pose(&anchor.pose),
        tracking_state: anchor.tracking_state.as_u32(),
    }
}

/// Tracking states this build does not know read as `None`.
fn decode_anchor(anchor: AnchorV1) -> Anchor {
    Anchor::new(
        decode_anchor_id(anchor.id),
        decode_pose(anchor.pose),
        TrackingState::from_u32(anchor.tracking_state).unwrap_or(TrackingState::None),
    )
}

pub(crate) fn encode_anchor_request(
    token: RequestToken,
    request: &AnchorRequest,
) -> AnchorRequestV1 {
    let mut v1 = AnchorRequestV1 {
        token: token.0,
        kind: request.op().as_u32(),
        name: String::new(),
        id: None,
        data: Vec::new(),
    };
    match request {
        AnchorRequest::Persist { name, id } => {
            v1.name = name.clone();
            v1.id = Some(encode_anchor_id(*id));
        }
        AnchorRequest::Unpersist { name } | AnchorRequest::CreateFromPersistedName { name } => {
            v1.name = name.clone();
        }
        AnchorRequest::Import { data } => v1.data = data.clone(),
        AnchorRequest::CreateStore
        | AnchorRequest::DestroyStore
        | AnchorRequest::ClearStore
        | AnchorRequest::EnumeratePersistedNames
        | AnchorRequest::Export => {}
    }
    v1
}

pub(crate) fn decode_anchor_request(
    request: AnchorRequestV1,
) -> FabricResult<(RequestToken, AnchorRequest)> {
    let token = RequestToken(request.token);
    let decoded = match wire(AnchorOp::from_u32(request.kind))? {
        AnchorOp::CreateStore => AnchorRequest::CreateStore,
        AnchorOp::DestroyStore => AnchorRequest::DestroyStore,
        AnchorOp::ClearStore => AnchorRequest::ClearStore,
        AnchorOp::Persist => AnchorRequest::Persist {
            name: request.name,
            id: request
                .id
                .map(decode_anchor_id)
                .ok_or_else(|| FabricError::codec("persist request without anchor id"))?,
        },
        AnchorOp::Unpersist => AnchorRequest::Unpersist { name: request.name },
        AnchorOp::EnumeratePersistedNames => AnchorRequest::EnumeratePersistedNames,
        AnchorOp::CreateFromPersistedName => {
            AnchorRequest::CreateFromPersistedName { name: request.name }
        }
        AnchorOp::Export => AnchorRequest::Export,
        AnchorOp::Import => AnchorRequest::Import { data: request.data },
    };
    Ok((token, decoded))
}

pub(crate) fn encode_anchor_reply(token: RequestToken, reply: &AnchorReply) -> AnchorReplyV1 {
    let mut v1 = AnchorReplyV1 {
        token: token.0,
        kind: reply.kind().as_u32(),
        success: true,
        id: None,
        anchors: Vec::new(),
        names: Vec::new(),
        data: Vec::new(),
    };
    match reply {
        AnchorReply::CreateStore(ok)
        | AnchorReply::DestroyStore(ok)
        | AnchorReply::ClearStore(ok)
        | AnchorReply::Unpersisted(ok) => v1.success = *ok,
        AnchorReply::Persisted(id) | AnchorReply::Deleted(id) => {
            v1.id = Some(encode_anchor_id(*id));
        }
        AnchorReply::PersistedNamesEnumerated(names) => v1.names = names.clone(),
        AnchorReply::CreatedFromPersistedName(anchor) | AnchorReply::Added(anchor) => {
            v1.anchors = vec![encode_anchor(anchor)];
        }
        AnchorReply::Exported(data) => v1.data = data.clone(),
        AnchorReply::Imported(anchors) | AnchorReply::Updated(anchors) => {
            v1.anchors = anchors.iter().map(encode_anchor).collect();
        }
    }
    v1
}

pub(crate) fn decode_anchor_reply(
    reply: AnchorReplyV1,
) -> FabricResult<(RequestToken, AnchorReply)> {
    let token = RequestToken(reply.token);
    let id = || {
        reply
            .id
            .clone()
            .map(decode_anchor_id)
            .ok_or_else(|| FabricError::codec("anchor reply without anchor id"))
    };
    let anchors = || -> Vec<Anchor> {
        reply.anchors.iter().cloned().map(decode_anchor).collect()
    };
    let single = || -> FabricResult<Anchor> {
        reply
            .anchors
            .first()
            .cloned()
            .map(decode_anchor)
            .ok_or_else(|| FabricError::codec("anchor reply without anchor"))
    };
    let decoded = match wire(AnchorReplyKind::from_u32(reply.kind))? {
        AnchorReplyKind::CreateStore => AnchorReply::CreateStore(reply.success),
        AnchorReplyKind::DestroyStore => AnchorReply::DestroyStore(reply.success),
        AnchorReplyKind::ClearStore => AnchorReply::ClearStore(reply.success),
        AnchorReplyKind::Persisted => AnchorReply::Persisted(id()?),
        AnchorReplyKind::Unpersisted => AnchorReply::Unpersisted(reply.success),
        AnchorReplyKind::PersistedNamesEnumerated => {
            AnchorReply::PersistedNamesEnumerated(reply.names.clone())
        }
        AnchorReplyKind::CreatedFromPersistedName => {
            AnchorReply::CreatedFromPersistedName(single()?)
        }
        AnchorReplyKind::Exported => AnchorReply::Exported(reply.data.clone()),
        AnchorReplyKind::Imported => AnchorReply::Imported(anchors()),
        AnchorReplyKind::Added => AnchorReply::Added(single()?),
        AnchorReplyKind::Updated => AnchorReply::Updated(anchors()),
        AnchorReplyKind::Deleted => AnchorReply::Deleted(id()?),
    };
    Ok((token, decoded))
}
