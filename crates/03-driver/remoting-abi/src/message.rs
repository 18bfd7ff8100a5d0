//! Tagged messages and the packet sum type carried between peers.

use crate::anchor::{AnchorReply, AnchorRequest, RequestToken};
use crate::error::{Error, Result};
use crate::input::InputEvent;
use crate::math::XrPose;
use crate::media::{AudioData, CameraFrame, GraphicsApiFrame};
use crate::qr::QrMessage;
use crate::spatial::SpatialInput;
use crate::version::Version;

/// Largest custom message payload the data channel accepts.
pub const MAX_CUSTOM_MESSAGE_LEN: usize = 16 * 1024;

wire_enum! {
    pub enum MessageKind {
        None = 0,
        Pose = 1,
        InputEvent = 2,
        QrMessage = 3,
        SpatialInput = 4,
    }
}

/// Core message multiplexed over the data channel.
///
/// `Unknown` keeps the raw tag of a message this build does not recognise so
/// consumers can skip it.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    None,
    Pose(XrPose),
    InputEvent(InputEvent),
    QrMessage(QrMessage),
    SpatialInput(SpatialInput),
    Unknown(u32),
}

impl Message {
    /// Known kind of this message; `None` for [`Message::Unknown`].
    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            Message::None => Some(MessageKind::None),
            Message::Pose(_) => Some(MessageKind::Pose),
            Message::InputEvent(_) => Some(MessageKind::InputEvent),
            Message::QrMessage(_) => Some(MessageKind::QrMessage),
            Message::SpatialInput(_) => Some(MessageKind::SpatialInput),
            Message::Unknown(_) => None,
        }
    }
}

/// Application payload, at most [`MAX_CUSTOM_MESSAGE_LEN`] bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomMessage {
    data: Vec<u8>,
}

impl CustomMessage {
    pub fn new(data: Vec<u8>) -> Result<Self> {
        if data.len() > MAX_CUSTOM_MESSAGE_LEN {
            return Err(Error::MessageTooLong);
        }
        Ok(Self { data })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Version handshake sent once the data channel opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hello {
    pub protocol_version: Version,
}

/// Everything that travels between peers.
#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    Message(Message),
    Custom(CustomMessage),
    Audio(AudioData),
    Frame {
        frame: GraphicsApiFrame,
        bandwidth: i64,
    },
    CameraFrame(CameraFrame),
    AnchorRequest(RequestToken, AnchorRequest),
    AnchorReply(RequestToken, AnchorReply),
    Hello(Hello),
}

impl Packet {
    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Packet::Message(Message::None) => "message:none",
            Packet::Message(Message::Pose(_)) => "message:pose",
            Packet::Message(Message::InputEvent(_)) => "message:input",
            Packet::Message(Message::QrMessage(_)) => "message:qr",
            Packet::Message(Message::SpatialInput(_)) => "message:spatial",
            Packet::Message(Message::Unknown(_)) => "message:unknown",
            Packet::Custom(_) => "custom",
            Packet::Audio(_) => "audio",
            Packet::Frame { .. } => "frame",
            Packet::CameraFrame(_) => "camera-frame",
            Packet::AnchorRequest(..) => "anchor-request",
            Packet::AnchorReply(..) => "anchor-reply",
            Packet::Hello(_) => "hello",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_message_limit_is_inclusive() {
        assert!(CustomMessage::new(vec![0; MAX_CUSTOM_MESSAGE_LEN]).is_ok());
        assert_eq!(
            CustomMessage::new(vec![0; MAX_CUSTOM_MESSAGE_LEN + 1]),
            Err(Error::MessageTooLong)
        );
    }

    #[test]
    fn unknown_messages_have_no_kind() {
        assert_eq!(Message::Unknown(0x7F).kind(), None);
        assert_eq!(
            Message::Pose(XrPose::at(1)).kind().map(MessageKind::as_u32),
            Some(1)
        );
    }
}
