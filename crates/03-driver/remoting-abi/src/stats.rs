//! Generic statistics report.
//!
//! The statistic schema is owned by the transport and versioned apart from
//! this protocol, so members are enumerated by name and dynamic value rather
//! than as typed fields.

use serde::Serialize;

wire_enum! {
    #[derive(Serialize)]
    pub enum StatsType {
        Codec = 0,
        InboundRtp = 1,
        OutboundRtp = 2,
        RemoteInboundRtp = 3,
        RemoteOutboundRtp = 4,
        MediaSource = 5,
        Csrc = 6,
        PeerConnection = 7,
        DataChannel = 8,
        Stream = 9,
        Track = 10,
        Transceiver = 11,
        Sender = 12,
        Receiver = 13,
        Transport = 14,
        SctpTransport = 15,
        CandidatePair = 16,
        LocalCandidate = 17,
        RemoteCandidate = 18,
        Certificate = 19,
        IceServer = 20,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatsValue {
    Bool(bool),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Double(f64),
    String(String),
    BoolSequence(Vec<bool>),
    Int32Sequence(Vec<i32>),
    Uint32Sequence(Vec<u32>),
    Int64Sequence(Vec<i64>),
    Uint64Sequence(Vec<u64>),
    DoubleSequence(Vec<f64>),
    StringSequence(Vec<String>),
}

/// Named member; `value` is `None` when the statistic is not defined.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsMember {
    pub name: String,
    pub value: Option<StatsValue>,
}

impl StatsMember {
    pub fn new(name: impl Into<String>, value: StatsValue) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }

    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stats {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: StatsType,
    #[serde(rename = "timestamp")]
    pub timestamp_us: i64,
    pub members: Vec<StatsMember>,
}

impl Stats {
    pub fn member(&self, name: &str) -> Option<&StatsValue> {
        self.members
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.value.as_ref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatsReport {
    pub stats: Vec<Stats>,
}

impl StatsReport {
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn of_kind(&self, kind: StatsType) -> impl Iterator<Item = &Stats> + '_ {
        self.stats.iter().filter(move |s| s.kind == kind)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
