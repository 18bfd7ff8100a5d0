//! QR code detection capability.

use std::fmt;

use crate::math::Pose;

wire_enum! {
    pub enum QrAccessStatus {
        DeniedBySystem = 0,
        NotDeclaredByApp = 1,
        DeniedByUser = 2,
        UserPromptRequired = 3,
        Allowed = 4,
    }
}

impl QrAccessStatus {
    pub const fn permits_start(self) -> bool {
        matches!(self, QrAccessStatus::Allowed)
    }
}

wire_enum! {
    pub enum QrVersion {
        Invalid = 0,
        Qr1 = 1, Qr2 = 2, Qr3 = 3, Qr4 = 4, Qr5 = 5,
        Qr6 = 6, Qr7 = 7, Qr8 = 8, Qr9 = 9, Qr10 = 10,
        Qr11 = 11, Qr12 = 12, Qr13 = 13, Qr14 = 14, Qr15 = 15,
        Qr16 = 16, Qr17 = 17, Qr18 = 18, Qr19 = 19, Qr20 = 20,
        Qr21 = 21, Qr22 = 22, Qr23 = 23, Qr24 = 24, Qr25 = 25,
        Qr26 = 26, Qr27 = 27, Qr28 = 28, Qr29 = 29, Qr30 = 30,
        Qr31 = 31, Qr32 = 32, Qr33 = 33, Qr34 = 34, Qr35 = 35,
        Qr36 = 36, Qr37 = 37, Qr38 = 38, Qr39 = 39, Qr40 = 40,
        MicroM1 = 41,
        MicroM2 = 42,
        MicroM3 = 43,
        MicroM4 = 44,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QrCode {
    pub id: Guid,
    pub timestamp: i64,
    pub sys_timestamp: i64,
    pub physical_side_length: f32,
    pub version: QrVersion,
    pub data: Vec<u8>,
    pub pose: Pose,
}

wire_enum! {
    pub enum QrMessageKind {
        IsSupported = 0,
        RequestAccess = 1,
        Start = 2,
        Stop = 3,
        Added = 4,
        Updated = 5,
        Removed = 6,
        EnumerationCompleted = 7,
    }
}

/// QR traffic in both directions.
///
/// The server sends the query and control kinds with default payloads; the
/// client answers queries with their result and streams code events.
#[derive(Clone, Debug, PartialEq)]
pub enum QrMessage {
    IsSupported(bool),
    RequestAccess(QrAccessStatus),
    Start,
    Stop,
    Added(QrCode),
    Updated(QrCode),
    Removed(QrCode),
    EnumerationCompleted,
}

impl QrMessage {
    pub fn kind(&self) -> QrMessageKind {
        match self {
            QrMessage::IsSupported(_) => QrMessageKind::IsSupported,
            QrMessage::RequestAccess(_) => QrMessageKind::RequestAccess,
            QrMessage::Start => QrMessageKind::Start,
            QrMessage::Stop => QrMessageKind::Stop,
            QrMessage::Added(_) => QrMessageKind::Added,
            QrMessage::Updated(_) => QrMessageKind::Updated,
            QrMessage::Removed(_) => QrMessageKind::Removed,
            QrMessage::EnumerationCompleted => QrMessageKind::EnumerationCompleted,
        }
    }
}
