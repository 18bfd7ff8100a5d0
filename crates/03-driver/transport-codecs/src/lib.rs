//! Packet codec for the remoting data channel.
//!
//! [`PacketCodec`] maps every [`Packet`] onto an enveloped rkyv payload in the
//! V1 schema from `transport::schema` and picks the port class it travels on:
//! frames and camera frames coalesce, audio is best-effort, everything else is
//! lossless. Unknown envelope tags decode to [`Message::Unknown`] so a newer
//! peer's traffic can be skipped instead of tearing the channel down.

#![allow(missing_docs)]

mod convert;

use remoting_abi::{CameraFrame, CustomMessage, Hello, Message, Packet, Version};
use rkyv::{
    api::high::{to_bytes, HighDeserializer, HighSerializer, HighValidator},
    bytecheck::CheckBytes,
    rancor::Error,
    ser::allocator::ArenaHandle,
    util::AlignedVec,
    Archive, Deserialize, Serialize,
};
use transport::schema::*;
use transport::Envelope;
use transport_fabric::{Codec, Encoded, FabricError, FabricResult, PortClass};

use convert::*;

/// Codec carrying [`Packet`] in both directions.
#[derive(Clone, Copy, Debug, Default)]
pub struct PacketCodec;

impl Codec for PacketCodec {
    type Item = Packet;

    fn encode(&self, packet: &Packet) -> FabricResult<Encoded> {
        let class = port_class(packet);
        let (tag, payload) = match packet {
            Packet::Message(Message::Pose(pose)) => (TAG_POSE, serialize(&encode_xr_pose(pose))?),
            Packet::Message(Message::InputEvent(event)) => {
                (TAG_INPUT_EVENT, serialize(&encode_input_event(event))?)
            }
            Packet::Message(Message::QrMessage(message)) => {
                (TAG_QR_MESSAGE, serialize(&encode_qr_message(message))?)
            }
            Packet::Message(Message::SpatialInput(input)) => {
                (TAG_SPATIAL_INPUT, serialize(&encode_spatial_input(input))?)
            }
            Packet::Message(Message::None) => {
                return Err(FabricError::NotSendable("empty message has no wire form"))
            }
            Packet::Message(Message::Unknown(_)) => {
                return Err(FabricError::NotSendable("unknown message cannot be re-sent"))
            }
            Packet::Custom(custom) => (
                TAG_CUSTOM,
                serialize(&CustomV1 {
                    data: custom.data().to_vec(),
                })?,
            ),
            Packet::Audio(audio) => (TAG_AUDIO, serialize(&encode_audio(audio))?),
            Packet::Frame { frame, bandwidth } => {
                (TAG_FRAME, serialize(&encode_frame(frame, *bandwidth))?)
            }
            Packet::CameraFrame(camera) => {
                (TAG_CAMERA_FRAME, serialize(&encode_camera_frame(camera))?)
            }
            Packet::AnchorRequest(token, request) => (
                TAG_ANCHOR_REQUEST,
                serialize(&encode_anchor_request(*token, request))?,
            ),
            Packet::AnchorReply(token, reply) => (
                TAG_ANCHOR_REPLY,
                serialize(&encode_anchor_reply(*token, reply))?,
            ),
            Packet::Hello(hello) => (
                TAG_HELLO,
                serialize(&HelloV1 {
                    protocol_version: hello.protocol_version.raw(),
                })?,
            ),
        };
        Ok(Encoded::new(
            class,
            Envelope::new(tag, SCHEMA_VERSION_V1),
            payload,
        ))
    }

    fn decode(&self, envelope: Envelope, payload: &[u8]) -> FabricResult<Packet> {
        if !is_known_tag(envelope.tag) {
            return Ok(Packet::Message(Message::Unknown(u32::from(envelope.tag))));
        }
        ensure_version(envelope)?;
        let packet = match envelope.tag {
            TAG_POSE => Packet::Message(Message::Pose(decode_xr_pose(deserialize(payload)?))),
            TAG_INPUT_EVENT => Packet::Message(Message::InputEvent(decode_input_event(
                deserialize(payload)?,
            )?)),
            TAG_QR_MESSAGE => Packet::Message(Message::QrMessage(decode_qr_message(
                deserialize(payload)?,
            )?)),
            TAG_SPATIAL_INPUT => Packet::Message(Message::SpatialInput(decode_spatial_input(
                deserialize(payload)?,
            )?)),
            TAG_CUSTOM => {
                let custom: CustomV1 = deserialize(payload)?;
                let message = CustomMessage::new(custom.data)
                    .map_err(|err| FabricError::codec(format!("custom message: {err}")))?;
                Packet::Custom(message)
            }
            TAG_AUDIO => Packet::Audio(decode_audio(deserialize(payload)?)),
            TAG_FRAME => {
                let (frame, bandwidth) = decode_frame(deserialize(payload)?);
                Packet::Frame { frame, bandwidth }
            }
            TAG_CAMERA_FRAME => {
                let camera: CameraFrame = decode_camera_frame(deserialize(payload)?);
                Packet::CameraFrame(camera)
            }
            TAG_ANCHOR_REQUEST => {
                let (token, request) = decode_anchor_request(deserialize(payload)?)?;
                Packet::AnchorRequest(token, request)
            }
            TAG_ANCHOR_REPLY => {
                let (token, reply) = decode_anchor_reply(deserialize(payload)?)?;
                Packet::AnchorReply(token, reply)
            }
            TAG_HELLO => {
                let hello: HelloV1 = deserialize(payload)?;
                Packet::Hello(Hello {
                    protocol_version: Version::from_raw(hello.protocol_version),
                })
            }
            other => {
                return Err(FabricError::codec(format!("tag {other:#04x} has no decoder")))
            }
        };
        Ok(packet)
    }
}

/// Port class a packet travels on.
pub fn port_class(packet: &Packet) -> PortClass {
    match packet {
        Packet::Frame { .. } | Packet::CameraFrame(_) => PortClass::Coalesce,
        Packet::Audio(_) => PortClass::BestEffort,
        Packet::Message(_)
        | Packet::Custom(_)
        | Packet::AnchorRequest(..)
        | Packet::AnchorReply(..)
        | Packet::Hello(_) => PortClass::Lossless,
    }
}

/// Envelope used to seed the coalescing mailbox before the first frame.
pub fn frame_envelope() -> Envelope {
    Envelope::new(TAG_FRAME, SCHEMA_VERSION_V1)
}

fn is_known_tag(tag: u8) -> bool {
    matches!(
        tag,
        TAG_POSE
            | TAG_INPUT_EVENT
            | TAG_QR_MESSAGE
            | TAG_SPATIAL_INPUT
            | TAG_CUSTOM
            | TAG_AUDIO
            | TAG_ANCHOR_REQUEST
            | TAG_ANCHOR_REPLY
            | TAG_FRAME
            | TAG_CAMERA_FRAME
            | TAG_HELLO
    )
}

fn ensure_version(envelope: Envelope) -> FabricResult<()> {
    if envelope.ver != SCHEMA_VERSION_V1 {
        return Err(FabricError::codec(format!(
            "schema version mismatch: {} vs {}",
            envelope.ver, SCHEMA_VERSION_V1
        )));
    }
    Ok(())
}

fn serialize<T>(value: &T) -> FabricResult<Vec<u8>>
where
    T: Archive,
    T: for<'a> Serialize<HighSerializer<AlignedVec, ArenaHandle<'a>, Error>>,
{
    to_bytes::<Error>(value)
        .map(|aligned| aligned.into_vec())
        .map_err(|err| FabricError::codec(format!("serialize failure: {err}")))
}

/// Validates and deserialises a payload; queue records carry no alignment
/// guarantee so the bytes are copied into an aligned buffer first.
fn deserialize<T>(payload: &[u8]) -> FabricResult<T>
where
    T: Archive,
    T::Archived:
        for<'a> CheckBytes<HighValidator<'a, Error>> + Deserialize<T, HighDeserializer<Error>>,
{
    let mut aligned = AlignedVec::<16>::with_capacity(payload.len());
    aligned.extend_from_slice(payload);
    rkyv::from_bytes::<T, Error>(&aligned)
        .map_err(|err| FabricError::codec(format!("validation failure: {err}")))
}
