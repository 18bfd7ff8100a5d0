//! Frame, camera and audio descriptors.
//!
//! Pixel and sample production belongs to the graphics and audio
//! collaborators; the protocol only moves descriptors and opaque handles.

use crate::math::XrPose;

/// Opaque texture reference owned by the graphics collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

wire_enum! {
    pub enum TextureFormat {
        Rgba32 = 0,
    }
}

/// Render target descriptor supplied when a video or camera track is set up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphicsApiConfig {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl Default for GraphicsApiConfig {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 936,
            format: TextureFormat::Rgba32,
        }
    }
}

/// Rendered frame; `pose.timestamp` echoes the pose it was rendered against.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GraphicsApiFrame {
    pub pose: XrPose,
    pub texture: TextureHandle,
}

impl GraphicsApiFrame {
    pub fn new(pose: XrPose, texture: TextureHandle) -> Self {
        Self { pose, texture }
    }

    pub fn timestamp(&self) -> i64 {
        self.pose.timestamp
    }
}

/// Frame pushed by the client's camera together with an extension blob.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CameraFrame {
    pub frame: GraphicsApiFrame,
    pub extension: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AudioData {
    pub samples: Vec<u8>,
    pub bits_per_sample: i32,
    pub sample_rate: i32,
    pub channels: u32,
    pub samples_per_channel: u32,
}
