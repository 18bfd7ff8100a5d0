//! Remoting ABI types shared by both peers and every layer above the codec.
//!
//! This crate defines the protocol boundary between the caller-facing API
//! (layer 05) and the session services (layer 04): the error code set, packed
//! protocol versions, connection handles, and the message shapes exchanged
//! between a rendering server and an XR client.

#![allow(missing_docs)]

#[macro_use]
mod wire;

mod anchor;
mod error;
mod handle;
mod input;
mod math;
mod media;
mod message;
mod qr;
mod signaling;
mod spatial;
mod stats;
mod version;

pub use anchor::{
    Anchor, AnchorId, AnchorOp, AnchorReply, AnchorReplyKind, AnchorRequest, RequestToken,
    TrackingState,
};
pub use error::{Error, Result};
pub use handle::Handle;
pub use input::{
    GestureContext, HandPose, InputEvent, InputEventKind, JointAccuracy, JointPose,
    ManipulationDelta, NavigationFlags, PositionAccuracy, SourceFlags, SourceHandedness,
    SourceKind, SourcePoseFlags, SourceStateFlags, SpatialInteractionSource,
    SpatialInteractionSourcePose, SpatialInteractionSourceProperties,
    SpatialInteractionSourceState, HAND_JOINT_COUNT,
};
pub use math::{HeadPose, Matrix4x4, Pose, Quaternion, Vector2, Vector3, XrPose};
pub use media::{
    AudioData, CameraFrame, GraphicsApiConfig, GraphicsApiFrame, TextureFormat, TextureHandle,
};
pub use message::{CustomMessage, Hello, Message, MessageKind, Packet, MAX_CUSTOM_MESSAGE_LEN};
pub use qr::{Guid, QrAccessStatus, QrCode, QrMessage, QrMessageKind, QrVersion};
pub use signaling::{ConnectionState, IceCandidate, SdpType};
pub use spatial::{Axis1D, Axis2D, Button, ControllerData, SpatialInput, SpatialInputKind};
pub use stats::{Stats, StatsMember, StatsReport, StatsType, StatsValue};
pub use version::Version;
pub use wire::UnknownDiscriminant;
