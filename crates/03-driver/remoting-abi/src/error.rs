use thiserror::Error as ThisError;
use transport_fabric::FabricError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boundary error codes.
///
/// Discriminants are frozen; success is code `0` and never appears as a
/// variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ThisError)]
#[repr(u32)]
pub enum Error {
    #[error("already initialized")]
    AlreadyInitialized = 1,
    #[error("invalid handle")]
    InvalidHandle = 2,
    #[error("peer connection factory failure")]
    PeerConnectionFactory = 3,
    #[error("peer connection failure")]
    PeerConnection = 4,
    #[error("data channel creation failed")]
    DataChannelCreation = 5,
    #[error("data channel send failed")]
    DataChannelSend = 6,
    #[error("data channel is not open")]
    DataChannelSendNotOpen = 7,
    #[error("adding a track failed")]
    AddTrack = 8,
    #[error("video source failure")]
    VideoSource = 9,
    #[error("video track failure")]
    VideoTrack = 10,
    #[error("starting the event log failed")]
    StartRtcEventLog = 11,
    #[error("config: unsupported or missing role")]
    ConfigUnsupportedOrMissingRole = 12,
    #[error("config: unsupported or missing encoder")]
    ConfigUnsupportedOrMissingEncoder = 13,
    #[error("config: unsupported or missing decoder")]
    ConfigUnsupportedOrMissingDecoder = 14,
    #[error("config: unsupported or missing video source")]
    ConfigUnsupportedOrMissingVideoSource = 15,
    #[error("config: signaling section invalid or missing")]
    ConfigSignalingInvalidOrMissing = 16,
    #[error("config: signaling ip invalid or missing")]
    ConfigSignalingIpInvalidOrMissing = 17,
    #[error("config: signaling port invalid or missing")]
    ConfigSignalingPortInvalidOrMissing = 18,
    #[error("not connected")]
    NotConnected = 19,
    #[error("file could not be opened")]
    FileOpen = 20,
    #[error("config could not be parsed")]
    ConfigParse = 21,
    #[error("session description could not be parsed")]
    SdpParse = 22,
    #[error("no frame available")]
    NoFrame = 23,
    #[error("unsupported version")]
    UnsupportedVersion = 24,
    #[error("invalid argument")]
    InvalidArgument = 25,
    #[error("message too long")]
    MessageTooLong = 26,
    #[error("audio track failure")]
    AudioTrack = 27,
    #[error("audio track not initialized")]
    AudioTrackNotInitialized = 28,
    #[error("unknown error")]
    Unknown = 0xFFFF_FFFF,
}

const ALL: [Error; 29] = [
    Error::AlreadyInitialized,
    Error::InvalidHandle,
    Error::PeerConnectionFactory,
    Error::PeerConnection,
    Error::DataChannelCreation,
    Error::DataChannelSend,
    Error::DataChannelSendNotOpen,
    Error::AddTrack,
    Error::VideoSource,
    Error::VideoTrack,
    Error::StartRtcEventLog,
    Error::ConfigUnsupportedOrMissingRole,
    Error::ConfigUnsupportedOrMissingEncoder,
    Error::ConfigUnsupportedOrMissingDecoder,
    Error::ConfigUnsupportedOrMissingVideoSource,
    Error::ConfigSignalingInvalidOrMissing,
    Error::ConfigSignalingIpInvalidOrMissing,
    Error::ConfigSignalingPortInvalidOrMissing,
    Error::NotConnected,
    Error::FileOpen,
    Error::ConfigParse,
    Error::SdpParse,
    Error::NoFrame,
    Error::UnsupportedVersion,
    Error::InvalidArgument,
    Error::MessageTooLong,
    Error::AudioTrack,
    Error::AudioTrackNotInitialized,
    Error::Unknown,
];

impl Error {
    /// Code reported for success at the boundary.
    pub const NONE_CODE: u32 = 0;

    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Maps a boundary code back to an error.
    ///
    /// `0` is success and yields `None`; codes no variant claims map to
    /// [`Error::Unknown`].
    pub fn from_code(code: u32) -> Option<Self> {
        if code == Self::NONE_CODE {
            return None;
        }
        Some(
            ALL.iter()
                .copied()
                .find(|err| err.code() == code)
                .unwrap_or(Error::Unknown),
        )
    }

    /// Boundary code of an operation result.
    pub fn code_of<T>(result: &Result<T>) -> u32 {
        match result {
            Ok(_) => Self::NONE_CODE,
            Err(err) => err.code(),
        }
    }
}

impl From<FabricError> for Error {
    fn from(err: FabricError) -> Self {
        match err {
            FabricError::Codec(_) | FabricError::Misconfigured(_) => Error::InvalidArgument,
            FabricError::Transport(_) => Error::DataChannelSend,
            FabricError::NotSendable(_) => Error::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transport::TransportError;

    #[test]
    fn codes_are_frozen() {
        assert_eq!(Error::AlreadyInitialized.code(), 1);
        assert_eq!(Error::NotConnected.code(), 19);
        assert_eq!(Error::UnsupportedVersion.code(), 24);
        assert_eq!(Error::AudioTrackNotInitialized.code(), 28);
        assert_eq!(Error::Unknown.code(), 0xFFFF_FFFF);
    }

    #[test]
    fn from_code_round_trips() {
        for err in ALL {
            assert_eq!(Error::from_code(err.code()), Some(err));
        }
        assert_eq!(Error::from_code(0), None);
        assert_eq!(Error::from_code(4242), Some(Error::Unknown));
    }

    #[test]
    fn code_of_reports_success_as_zero() {
        assert_eq!(Error::code_of(&Ok::<_, Error>(())), 0);
        assert_eq!(Error::code_of::<()>(&Err(Error::NoFrame)), 23);
    }

    #[test]
    fn fabric_errors_normalise() {
        assert_eq!(
            Error::from(FabricError::codec("bad payload")),
            Error::InvalidArgument
        );
        let capacity = TransportError::PayloadTooLarge {
            len: 10,
            capacity: 4,
        };
        assert_eq!(
            Error::from(FabricError::from(capacity)),
            Error::DataChannelSend
        );
    }
}
