//! Transport-visible packet schema frozen for rkyv serialization.
//!
//! `rkyv` expands `Archive` derives into generated archived structs that inherit
//! the module-level `missing_docs` allowance below.
#![allow(missing_docs)]
//!
//! Types in this module define the stable, archived representation of every
//! packet exchanged between peers. Enumerations never appear as Rust enums on
//! the wire: each discriminant travels as a `u32` so independently built peers
//! agree on width regardless of how the domain types evolve. Vectors, quaternions
//! and matrices travel as fixed `f32` arrays (matrices column-major).
//!
//! Any backward-incompatible change must bump [`SCHEMA_VERSION_V1`].

use rkyv::{Archive, Deserialize, Serialize};

/// Schema version for transport-visible packets.
pub const SCHEMA_VERSION_V1: u8 = 1;

/// Envelope tag for stereo view poses.
pub const TAG_POSE: u8 = 0x01;
/// Envelope tag for gesture and interaction input events.
pub const TAG_INPUT_EVENT: u8 = 0x02;
/// Envelope tag for QR capability traffic.
pub const TAG_QR_MESSAGE: u8 = 0x03;
/// Envelope tag for controller spatial input.
pub const TAG_SPATIAL_INPUT: u8 = 0x04;
/// Envelope tag for application-defined custom payloads.
pub const TAG_CUSTOM: u8 = 0x05;
/// Envelope tag for audio buffers.
pub const TAG_AUDIO: u8 = 0x06;
/// Envelope tag for anchor requests.
pub const TAG_ANCHOR_REQUEST: u8 = 0x07;
/// Envelope tag for anchor responses and notifications.
pub const TAG_ANCHOR_REPLY: u8 = 0x08;
/// Envelope tag for rendered video frames.
pub const TAG_FRAME: u8 = 0x09;
/// Envelope tag for client camera frames.
pub const TAG_CAMERA_FRAME: u8 = 0x0A;
/// Envelope tag for the protocol version handshake.
pub const TAG_HELLO: u8 = 0x0F;

/// Column-major 4x4 matrix.
pub type MatrixV1 = [f32; 16];
/// `x, y, z` vector.
pub type Vec3V1 = [f32; 3];
/// `x, y, z, w` quaternion.
pub type QuatV1 = [f32; 4];

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct XrPoseV1 {
    pub timestamp: i64,
    pub view_left: MatrixV1,
    pub view_right: MatrixV1,
    pub proj_left: MatrixV1,
    pub proj_right: MatrixV1,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct PoseV1 {
    pub position: Vec3V1,
    pub orientation: QuatV1,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct HeadPoseV1 {
    pub position: Vec3V1,
    pub forward: Vec3V1,
    pub up: Vec3V1,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct JointPoseV1 {
    pub orientation: QuatV1,
    pub position: Vec3V1,
    pub radius: f32,
    pub accuracy: u32,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct SourceV1 {
    pub id: u32,
    pub kind: u32,
    pub handedness: u32,
    pub flags: u32,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct SourcePoseV1 {
    pub grip_orientation: QuatV1,
    pub pointer_orientation: QuatV1,
    pub grip_position: Vec3V1,
    pub pointer_position: Vec3V1,
    pub velocity: Vec3V1,
    pub angular_velocity: Vec3V1,
    pub position_accuracy: u32,
    pub flags: u32,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct SourcePropertiesV1 {
    pub source_loss_risk: f64,
    pub source_loss_mitigation_direction: Vec3V1,
    pub source_pose: SourcePoseV1,
}

/// Full interaction source snapshot carried by the `Source*` input events.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct SourceStateV1 {
    pub properties: SourcePropertiesV1,
    pub source: SourceV1,
    pub head_pose: HeadPoseV1,
    pub hand_joints: Vec<JointPoseV1>,
    pub select_pressed_amount: f32,
    pub flags: u32,
}

/// Source, pose and head snapshot shared by every gesture event.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct GestureV1 {
    pub source: SourceV1,
    pub source_pose: SourcePoseV1,
    pub head_pose: HeadPoseV1,
}

/// Input event in flattened form.
///
/// `kind` selects which of the optional parts are meaningful: the source
/// events carry `state`, every gesture carries `gesture`, and the counters and
/// offsets are read only by the kinds that define them.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct InputEventV1 {
    pub kind: u32,
    pub state: Option<SourceStateV1>,
    pub gesture: Option<GestureV1>,
    pub tap_count: u32,
    pub delta: Vec3V1,
    pub rails_flags: u32,
    pub normalized_offset: Vec3V1,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct ButtonV1 {
    pub identifier: u32,
    pub pressed: bool,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Axis1DV1 {
    pub identifier: u32,
    pub value: f32,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Axis2DV1 {
    pub identifier: u32,
    pub value: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct ControllerDataV1 {
    pub controller_identifier: u32,
    pub handedness: u32,
    pub head_pose: HeadPoseV1,
    pub controller_pose: PoseV1,
    pub pointer_pose: PoseV1,
    pub hand_joints: Vec<JointPoseV1>,
    pub buttons: Vec<ButtonV1>,
    pub axis1d: Vec<Axis1DV1>,
    pub axis2d: Vec<Axis2DV1>,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct SpatialInputV1 {
    pub kind: u32,
    pub controller: ControllerDataV1,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct GuidV1 {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct QrCodeV1 {
    pub id: GuidV1,
    pub timestamp: i64,
    pub sys_timestamp: i64,
    pub physical_side_length: f32,
    pub version: u32,
    pub data: Vec<u8>,
    pub pose: PoseV1,
}

/// QR capability message; `kind` selects the meaningful field.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct QrMessageV1 {
    pub kind: u32,
    pub is_supported: bool,
    pub access_status: u32,
    pub code: Option<QrCodeV1>,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct CustomV1 {
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct AudioV1 {
    pub samples: Vec<u8>,
    pub bits_per_sample: i32,
    pub sample_rate: i32,
    pub channels: u32,
    pub samples_per_channel: u32,
}

/// Rendered frame descriptor; pixels travel on the media path.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct FrameV1 {
    pub pose: XrPoseV1,
    pub texture: u64,
    pub bandwidth: i64,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct CameraFrameV1 {
    pub pose: XrPoseV1,
    pub texture: u64,
    pub extension: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct HelloV1 {
    pub protocol_version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct AnchorIdV1 {
    pub first: u64,
    pub second: u64,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct AnchorV1 {
    pub id: AnchorIdV1,
    pub pose: PoseV1,
    pub tracking_state: u32,
}

/// Anchor request issued by the rendering side.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct AnchorRequestV1 {
    pub token: u64,
    pub kind: u32,
    pub name: String,
    pub id: Option<AnchorIdV1>,
    pub data: Vec<u8>,
}

/// Anchor response or unsolicited notification.
///
/// Notifications carry token `0`.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct AnchorReplyV1 {
    pub token: u64,
    pub kind: u32,
    pub success: bool,
    pub id: Option<AnchorIdV1>,
    pub anchors: Vec<AnchorV1>,
    pub names: Vec<String>,
    pub data: Vec<u8>,
}
