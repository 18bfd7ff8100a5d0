use std::fmt;

use crate::math::Pose;

/// 128-bit anchor identifier, unique within a store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId {
    pub first: u64,
    pub second: u64,
}

impl AnchorId {
    pub const fn new(first: u64, second: u64) -> Self {
        Self { first, second }
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.first, self.second)
    }
}

wire_enum! {
    pub enum TrackingState {
        None = 0,
        Limited = 1,
        Tracking = 2,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub id: AnchorId,
    pub pose: Pose,
    pub tracking_state: TrackingState,
}

impl Anchor {
    pub fn new(id: AnchorId, pose: Pose, tracking_state: TrackingState) -> Self {
        Self {
            id,
            pose,
            tracking_state,
        }
    }
}

/// Correlates an anchor request with its reply.
///
/// Tokens are issued monotonically per session starting at `1`; token `0`
/// marks unsolicited notifications.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

impl RequestToken {
    pub const NOTIFICATION: RequestToken = RequestToken(0);

    pub const fn is_notification(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req#{}", self.0)
    }
}

wire_enum! {
    /// Anchor operation a request asks the client to perform.
    pub enum AnchorOp {
        CreateStore = 0,
        DestroyStore = 1,
        ClearStore = 2,
        Persist = 3,
        Unpersist = 4,
        EnumeratePersistedNames = 5,
        CreateFromPersistedName = 6,
        Export = 7,
        Import = 8,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnchorRequest {
    CreateStore,
    DestroyStore,
    ClearStore,
    Persist { name: String, id: AnchorId },
    Unpersist { name: String },
    EnumeratePersistedNames,
    CreateFromPersistedName { name: String },
    Export,
    /// Opaque buffer previously produced by an export.
    Import { data: Vec<u8> },
}

impl AnchorRequest {
    pub fn op(&self) -> AnchorOp {
        match self {
            AnchorRequest::CreateStore => AnchorOp::CreateStore,
            AnchorRequest::DestroyStore => AnchorOp::DestroyStore,
            AnchorRequest::ClearStore => AnchorOp::ClearStore,
            AnchorRequest::Persist { .. } => AnchorOp::Persist,
            AnchorRequest::Unpersist { .. } => AnchorOp::Unpersist,
            AnchorRequest::EnumeratePersistedNames => AnchorOp::EnumeratePersistedNames,
            AnchorRequest::CreateFromPersistedName { .. } => AnchorOp::CreateFromPersistedName,
            AnchorRequest::Export => AnchorOp::Export,
            AnchorRequest::Import { .. } => AnchorOp::Import,
        }
    }
}

wire_enum! {
    pub enum AnchorReplyKind {
        CreateStore = 0,
        DestroyStore = 1,
        ClearStore = 2,
        Persisted = 3,
        Unpersisted = 4,
        PersistedNamesEnumerated = 5,
        CreatedFromPersistedName = 6,
        Exported = 7,
        Imported = 8,
        Added = 16,
        Updated = 17,
        Deleted = 18,
    }
}

/// Client answer to a request, or an unsolicited tracking notification.
#[derive(Clone, Debug, PartialEq)]
pub enum AnchorReply {
    CreateStore(bool),
    DestroyStore(bool),
    ClearStore(bool),
    Persisted(AnchorId),
    Unpersisted(bool),
    PersistedNamesEnumerated(Vec<String>),
    CreatedFromPersistedName(Anchor),
    Exported(Vec<u8>),
    Imported(Vec<Anchor>),
    Added(Anchor),
    Updated(Vec<Anchor>),
    Deleted(AnchorId),
}

impl AnchorReply {
    pub fn kind(&self) -> AnchorReplyKind {
        match self {
            AnchorReply::CreateStore(_) => AnchorReplyKind::CreateStore,
            AnchorReply::DestroyStore(_) => AnchorReplyKind::DestroyStore,
            AnchorReply::ClearStore(_) => AnchorReplyKind::ClearStore,
            AnchorReply::Persisted(_) => AnchorReplyKind::Persisted,
            AnchorReply::Unpersisted(_) => AnchorReplyKind::Unpersisted,
            AnchorReply::PersistedNamesEnumerated(_) => AnchorReplyKind::PersistedNamesEnumerated,
            AnchorReply::CreatedFromPersistedName(_) => AnchorReplyKind::CreatedFromPersistedName,
            AnchorReply::Exported(_) => AnchorReplyKind::Exported,
            AnchorReply::Imported(_) => AnchorReplyKind::Imported,
            AnchorReply::Added(_) => AnchorReplyKind::Added,
            AnchorReply::Updated(_) => AnchorReplyKind::Updated,
            AnchorReply::Deleted(_) => AnchorReplyKind::Deleted,
        }
    }

    /// Operation this reply completes; `None` for notifications.
    pub fn answers(&self) -> Option<AnchorOp> {
        match self {
            AnchorReply::CreateStore(_) => Some(AnchorOp::CreateStore),
            AnchorReply::DestroyStore(_) => Some(AnchorOp::DestroyStore),
            AnchorReply::ClearStore(_) => Some(AnchorOp::ClearStore),
            AnchorReply::Persisted(_) => Some(AnchorOp::Persist),
            AnchorReply::Unpersisted(_) => Some(AnchorOp::Unpersist),
            AnchorReply::PersistedNamesEnumerated(_) => Some(AnchorOp::EnumeratePersistedNames),
            AnchorReply::CreatedFromPersistedName(_) => Some(AnchorOp::CreateFromPersistedName),
            AnchorReply::Exported(_) => Some(AnchorOp::Export),
            AnchorReply::Imported(_) => Some(AnchorOp::Import),
            AnchorReply::Added(_) | AnchorReply::Updated(_) | AnchorReply::Deleted(_) => None,
        }
    }
}
