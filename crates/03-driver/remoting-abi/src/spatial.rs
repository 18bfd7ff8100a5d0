//! Controller-based spatial input.

use crate::input::{HandPose, SourceHandedness};
use crate::math::{HeadPose, Pose, Vector2};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Button {
    pub identifier: u32,
    pub pressed: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Axis1D {
    pub identifier: u32,
    pub value: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Axis2D {
    pub identifier: u32,
    pub value: Vector2,
}

/// Snapshot of one tracked controller or hand.
///
/// Button and axis identifiers are the controller feature kinds of the
/// device that produced the snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerData {
    pub controller_identifier: u32,
    pub handedness: SourceHandedness,
    pub head_pose: HeadPose,
    pub controller_pose: Pose,
    pub pointer_pose: Pose,
    pub hand_data: HandPose,
    pub buttons: Vec<Button>,
    pub axis1d: Vec<Axis1D>,
    pub axis2d: Vec<Axis2D>,
}

impl Default for ControllerData {
    fn default() -> Self {
        Self {
            controller_identifier: 0,
            handedness: SourceHandedness::Unspecified,
            head_pose: HeadPose::default(),
            controller_pose: Pose::default(),
            pointer_pose: Pose::default(),
            hand_data: HandPose::default(),
            buttons: Vec::new(),
            axis1d: Vec::new(),
            axis2d: Vec::new(),
        }
    }
}

wire_enum! {
    pub enum SpatialInputKind {
        SourceDetected = 0,
        SourceLost = 1,
        SourcePressed = 2,
        SourceUpdated = 3,
        SourceReleased = 4,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpatialInput {
    pub kind: SpatialInputKind,
    pub controller: ControllerData,
}

impl SpatialInput {
    pub fn new(kind: SpatialInputKind, controller: ControllerData) -> Self {
        Self { kind, controller }
    }
}
