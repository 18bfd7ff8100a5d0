use remoting_abi::{Error, QrAccessStatus, QrMessage, QrMessageKind, Result};

/// Server view of the client's QR capability.
///
/// Query and control requests go out with placeholder payloads; the client's
/// answers are observed here so `Start` can be refused until access resolves
/// to [`QrAccessStatus::Allowed`].
#[derive(Debug, Default)]
pub struct QrGate {
    supported: Option<bool>,
    access: Option<QrAccessStatus>,
}

impl QrGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the request for `kind`, or fails without sending anything.
    pub fn request(&self, kind: QrMessageKind) -> Result<QrMessage> {
        match kind {
            QrMessageKind::IsSupported => Ok(QrMessage::IsSupported(false)),
            QrMessageKind::RequestAccess => {
                Ok(QrMessage::RequestAccess(QrAccessStatus::UserPromptRequired))
            }
            QrMessageKind::Start => {
                self.check_start()?;
                Ok(QrMessage::Start)
            }
            QrMessageKind::Stop => Ok(QrMessage::Stop),
            other => {
                log::warn!("QR {other:?} is not a server request");
                Err(Error::InvalidArgument)
            }
        }
    }

    pub fn check_start(&self) -> Result<()> {
        match self.access {
            Some(status) if status.permits_start() => Ok(()),
            status => {
                log::debug!("QR start refused, access is {status:?}");
                Err(Error::InvalidArgument)
            }
        }
    }

    /// Records the answers carried by a message from the client.
    pub fn observe(&mut self, message: &QrMessage) {
        match message {
            QrMessage::IsSupported(supported) => self.supported = Some(*supported),
            QrMessage::RequestAccess(status) => {
                log::debug!("QR access resolved to {status:?}");
                self.access = Some(*status);
            }
            _ => {}
        }
    }

    pub fn supported(&self) -> Option<bool> {
        self.supported
    }

    pub fn access(&self) -> Option<QrAccessStatus> {
        self.access
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
