use transport::Envelope;

use crate::error::FabricResult;

/// Delivery guarantee a packet travels under. Codecs pick it per tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortClass {
    /// Ordered delivery; a full queue reports `WouldBlock`.
    Lossless,
    /// Ordered delivery; a full queue drops the packet.
    BestEffort,
    /// Latest-wins delivery via mailbox.
    Coalesce,
}

impl PortClass {
    pub const ALL: [PortClass; 3] = [PortClass::Lossless, PortClass::BestEffort, PortClass::Coalesce];
}

/// A typed item after encoding, ready for its port.
pub struct Encoded {
    pub class: PortClass,
    pub envelope: Envelope,
    pub payload: Vec<u8>,
}

impl Encoded {
    pub fn new(class: PortClass, envelope: Envelope, payload: Vec<u8>) -> Self {
        Self {
            class,
            envelope,
            payload,
        }
    }
}

/// Maps typed items onto enveloped payloads and back.
///
/// Both peers of a link share one item type; direction is a property of the
/// link, not of the codec.
pub trait Codec: Clone + Send + Sync + 'static {
    type Item: Send + 'static;

    fn encode(&self, item: &Self::Item) -> FabricResult<Encoded>;
    fn decode(&self, envelope: Envelope, payload: &[u8]) -> FabricResult<Self::Item>;
}
