//! Interaction sources and the gesture/interaction input event.

use crate::math::{HeadPose, Quaternion, Vector3};

/// Number of tracked joints in a [`HandPose`].
pub const HAND_JOINT_COUNT: usize = 26;

wire_enum! {
    pub enum SourceKind {
        Other = 0,
        Hand = 1,
        Voice = 2,
        Controller = 3,
    }
}

wire_enum! {
    pub enum SourceHandedness {
        Unspecified = 0,
        Left = 1,
        Right = 2,
    }
}

wire_enum! {
    pub enum PositionAccuracy {
        High = 0,
        Approximate = 1,
    }
}

wire_enum! {
    pub enum JointAccuracy {
        High = 0,
        Approximate = 1,
    }
}

wire_flags! {
    pub struct SourceFlags {
        const SUPPORTS_TOUCHPAD = 1 << 0;
        const SUPPORTS_THUMBSTICK = 1 << 1;
        const SUPPORTS_POINTING = 1 << 2;
        const SUPPORTS_GRASP = 1 << 3;
        const SUPPORTS_MENU = 1 << 4;
    }
}

wire_flags! {
    pub struct SourcePoseFlags {
        const HAS_GRIP_POSITION = 1 << 0;
        const HAS_GRIP_ORIENTATION = 1 << 1;
        const HAS_POINTER_POSITION = 1 << 2;
        const HAS_POINTER_ORIENTATION = 1 << 3;
        const HAS_VELOCITY = 1 << 4;
        const HAS_ANGULAR_VELOCITY = 1 << 5;
    }
}

wire_flags! {
    pub struct SourceStateFlags {
        const GRASPED = 1 << 0;
        const ANY_PRESSED = 1 << 1;
        const TOUCHPAD_PRESSED = 1 << 2;
        const THUMBSTICK_PRESSED = 1 << 3;
        const SELECT_PRESSED = 1 << 4;
        const MENU_PRESSED = 1 << 5;
        const TOUCHPAD_TOUCHED = 1 << 6;
    }
}

wire_flags! {
    pub struct NavigationFlags {
        const ON_RAILS = 1;
        const NAV_X = 2;
        const NAV_Y = 4;
        const NAV_Z = 8;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialInteractionSource {
    pub id: u32,
    pub kind: SourceKind,
    pub handedness: SourceHandedness,
    pub flags: SourceFlags,
}

impl Default for SpatialInteractionSource {
    fn default() -> Self {
        Self {
            id: 0,
            kind: SourceKind::Other,
            handedness: SourceHandedness::Unspecified,
            flags: SourceFlags::NONE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialInteractionSourcePose {
    pub grip_orientation: Quaternion,
    pub pointer_orientation: Quaternion,
    pub grip_position: Vector3,
    pub pointer_position: Vector3,
    pub velocity: Vector3,
    pub angular_velocity: Vector3,
    pub position_accuracy: PositionAccuracy,
    pub flags: SourcePoseFlags,
}

impl Default for SpatialInteractionSourcePose {
    fn default() -> Self {
        Self {
            grip_orientation: Quaternion::IDENTITY,
            pointer_orientation: Quaternion::IDENTITY,
            grip_position: Vector3::default(),
            pointer_position: Vector3::default(),
            velocity: Vector3::default(),
            angular_velocity: Vector3::default(),
            position_accuracy: PositionAccuracy::High,
            flags: SourcePoseFlags::NONE,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpatialInteractionSourceProperties {
    pub source_loss_risk: f64,
    pub source_loss_mitigation_direction: Vector3,
    pub source_pose: SpatialInteractionSourcePose,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointPose {
    pub orientation: Quaternion,
    pub position: Vector3,
    pub radius: f32,
    pub accuracy: JointAccuracy,
}

impl Default for JointPose {
    fn default() -> Self {
        Self {
            orientation: Quaternion::IDENTITY,
            position: Vector3::default(),
            radius: 0.0,
            accuracy: JointAccuracy::High,
        }
    }
}

/// Joint poses indexed by hand joint kind, palm first.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandPose {
    pub joints: [JointPose; HAND_JOINT_COUNT],
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpatialInteractionSourceState {
    pub properties: SpatialInteractionSourceProperties,
    pub source: SpatialInteractionSource,
    pub head_pose: HeadPose,
    pub hand_pose: HandPose,
    pub select_pressed_amount: f32,
    pub flags: SourceStateFlags,
}

/// Source, pose and head snapshot attached to every gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureContext {
    pub source: SpatialInteractionSource,
    pub source_pose: SpatialInteractionSourcePose,
    pub head_pose: HeadPose,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ManipulationDelta {
    pub translation: Vector3,
}

wire_enum! {
    pub enum InputEventKind {
        SourceDetected = 0,
        SourceLost = 1,
        SourcePressed = 2,
        SourceUpdated = 3,
        SourceReleased = 4,
        Selected = 5,
        Tapped = 6,
        HoldStarted = 7,
        HoldCompleted = 8,
        HoldCanceled = 9,
        ManipulationStarted = 10,
        ManipulationUpdated = 11,
        ManipulationCompleted = 12,
        ManipulationCanceled = 13,
        NavigationStarted = 14,
        NavigationUpdated = 15,
        NavigationCompleted = 16,
        NavigationCanceled = 17,
    }
}

/// Interaction or gesture event reported by the client.
#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum InputEvent {
    SourceDetected(SpatialInteractionSourceState),
    SourceLost(SpatialInteractionSourceState),
    SourcePressed(SpatialInteractionSourceState),
    SourceUpdated(SpatialInteractionSourceState),
    SourceReleased(SpatialInteractionSourceState),
    Selected(GestureContext),
    Tapped {
        context: GestureContext,
        tap_count: u32,
    },
    HoldStarted(GestureContext),
    HoldCompleted(GestureContext),
    HoldCanceled(GestureContext),
    ManipulationStarted(GestureContext),
    ManipulationUpdated {
        context: GestureContext,
        delta: ManipulationDelta,
    },
    ManipulationCompleted {
        context: GestureContext,
        delta: ManipulationDelta,
    },
    ManipulationCanceled(GestureContext),
    NavigationStarted {
        context: GestureContext,
        rails: NavigationFlags,
    },
    NavigationUpdated {
        context: GestureContext,
        rails: NavigationFlags,
        normalized_offset: Vector3,
    },
    NavigationCompleted {
        context: GestureContext,
        rails: NavigationFlags,
        normalized_offset: Vector3,
    },
    NavigationCanceled {
        context: GestureContext,
        rails: NavigationFlags,
    },
}

impl InputEvent {
    pub fn kind(&self) -> InputEventKind {
        match self {
            InputEvent::SourceDetected(_) => InputEventKind::SourceDetected,
            InputEvent::SourceLost(_) => InputEventKind::SourceLost,
            InputEvent::SourcePressed(_) => InputEventKind::SourcePressed,
            InputEvent::SourceUpdated(_) => InputEventKind::SourceUpdated,
            InputEvent::SourceReleased(_) => InputEventKind::SourceReleased,
            InputEvent::Selected(_) => InputEventKind::Selected,
            InputEvent::Tapped { .. } => InputEventKind::Tapped,
            InputEvent::HoldStarted(_) => InputEventKind::HoldStarted,
            InputEvent::HoldCompleted(_) => InputEventKind::HoldCompleted,
            InputEvent::HoldCanceled(_) => InputEventKind::HoldCanceled,
            InputEvent::ManipulationStarted(_) => InputEventKind::ManipulationStarted,
            InputEvent::ManipulationUpdated { .. } => InputEventKind::ManipulationUpdated,
            InputEvent::ManipulationCompleted { .. } => InputEventKind::ManipulationCompleted,
            InputEvent::ManipulationCanceled(_) => InputEventKind::ManipulationCanceled,
            InputEvent::NavigationStarted { .. } => InputEventKind::NavigationStarted,
            InputEvent::NavigationUpdated { .. } => InputEventKind::NavigationUpdated,
            InputEvent::NavigationCompleted { .. } => InputEventKind::NavigationCompleted,
            InputEvent::NavigationCanceled { .. } => InputEventKind::NavigationCanceled,
        }
    }

    /// Source state carried by the `Source*` events.
    pub fn source_state(&self) -> Option<&SpatialInteractionSourceState> {
        match self {
            InputEvent::SourceDetected(state)
            | InputEvent::SourceLost(state)
            | InputEvent::SourcePressed(state)
            | InputEvent::SourceUpdated(state)
            | InputEvent::SourceReleased(state) => Some(state),
            _ => None,
        }
    }

    /// Gesture snapshot carried by every non-source event.
    pub fn gesture(&self) -> Option<&GestureContext> {
        match self {
            InputEvent::Selected(context)
            | InputEvent::HoldStarted(context)
            | InputEvent::HoldCompleted(context)
            | InputEvent::HoldCanceled(context)
            | InputEvent::ManipulationStarted(context)
            | InputEvent::ManipulationCanceled(context)
            | InputEvent::Tapped { context, .. }
            | InputEvent::ManipulationUpdated { context, .. }
            | InputEvent::ManipulationCompleted { context, .. }
            | InputEvent::NavigationStarted { context, .. }
            | InputEvent::NavigationUpdated { context, .. }
            | InputEvent::NavigationCompleted { context, .. }
            | InputEvent::NavigationCanceled { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Originating interaction source; every event embeds one.
    pub fn source(&self) -> &SpatialInteractionSource {
        self.origin().0
    }

    pub fn head_pose(&self) -> &HeadPose {
        self.origin().1
    }

    fn origin(&self) -> (&SpatialInteractionSource, &HeadPose) {
        match self {
            InputEvent::SourceDetected(state)
            | InputEvent::SourceLost(state)
            | InputEvent::SourcePressed(state)
            | InputEvent::SourceUpdated(state)
            | InputEvent::SourceReleased(state) => (&state.source, &state.head_pose),
            InputEvent::Selected(context)
            | InputEvent::HoldStarted(context)
            | InputEvent::HoldCompleted(context)
            | InputEvent::HoldCanceled(context)
            | InputEvent::ManipulationStarted(context)
            | InputEvent::ManipulationCanceled(context)
            | InputEvent::Tapped { context, .. }
            | InputEvent::ManipulationUpdated { context, .. }
            | InputEvent::ManipulationCompleted { context, .. }
            | InputEvent::NavigationStarted { context, .. }
            | InputEvent::NavigationUpdated { context, .. }
            | InputEvent::NavigationCompleted { context, .. }
            | InputEvent::NavigationCanceled { context, .. } => {
                (&context.source, &context.head_pose)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_wire_discriminants() {
        let tapped = InputEvent::Tapped {
            context: GestureContext::default(),
            tap_count: 2,
        };
        assert_eq!(tapped.kind().as_u32(), 6);
        assert_eq!(
            InputEvent::NavigationCanceled {
                context: GestureContext::default(),
                rails: NavigationFlags::ON_RAILS,
            }
            .kind()
            .as_u32(),
            17
        );
        assert_eq!(InputEventKind::ALL.len(), 18);
    }

    #[test]
    fn source_is_found_in_both_shapes() {
        let mut state = SpatialInteractionSourceState::default();
        state.source.id = 7;
        assert_eq!(InputEvent::SourcePressed(state).source().id, 7);

        let mut context = GestureContext::default();
        context.source.id = 9;
        context.head_pose.up = Vector3::new(0.0, 1.0, 0.0);
        let event = InputEvent::HoldStarted(context);
        assert_eq!(event.source().id, 9);
        assert_eq!(event.head_pose().up.y, 1.0);
    }
}
