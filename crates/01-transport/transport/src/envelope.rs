/// Header attached to every payload crossing the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Envelope {
    /// Packet kind, see the `TAG_*` constants in [`crate::schema`].
    pub tag: u8,
    /// Schema version the payload was archived with.
    pub ver: u8,
    /// Reserved for per-packet flags; zero today.
    pub flags: u16,
}

impl Envelope {
    /// Creates an envelope with cleared flags.
    pub const fn new(tag: u8, ver: u8) -> Self {
        Self { tag, ver, flags: 0 }
    }

    /// Packs the envelope into a single word, tag in the high byte.
    pub const fn pack(self) -> u32 {
        ((self.tag as u32) << 24) | ((self.ver as u32) << 16) | self.flags as u32
    }

    /// Inverse of [`Envelope::pack`].
    pub const fn unpack(bits: u32) -> Self {
        Self {
            tag: ((bits >> 24) & 0xFF) as u8,
            ver: ((bits >> 16) & 0xFF) as u8,
            flags: (bits & 0xFFFF) as u16,
        }
    }
}
