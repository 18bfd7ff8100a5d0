wire_enum! {
    pub enum ConnectionState {
        Disconnected = 0,
        Connected = 1,
        Failed = 2,
    }
}

wire_enum! {
    pub enum SdpType {
        Offer = 0,
        Answer = 1,
    }
}

/// Connectivity candidate exchanged during signaling; contents are opaque.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IceCandidate {
    pub sdp_mid: String,
    pub mline_index: i32,
    pub candidate: String,
}

impl IceCandidate {
    pub fn new(sdp_mid: impl Into<String>, mline_index: i32, candidate: impl Into<String>) -> Self {
        Self {
            sdp_mid: sdp_mid.into(),
            mline_index,
            candidate: candidate.into(),
        }
    }
}
