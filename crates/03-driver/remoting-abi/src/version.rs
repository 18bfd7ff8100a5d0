use std::fmt;

const MAJOR_SHIFT: u32 = 22;
const MINOR_SHIFT: u32 = 12;
const MINOR_MASK: u32 = 0x3FF;
const PATCH_MASK: u32 = 0xFFF;

/// Packed semantic version: major 10 bits, minor 10 bits, patch 12 bits.
///
/// Packed values compare in semantic order. Majors are incompatible with
/// each other; minor and patch releases only add.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u32);

impl Version {
    pub const INVALID: Version = Version(0);
    /// Newest protocol version this build implements.
    pub const LATEST: Version = Version::new(2, 6, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self((major << MAJOR_SHIFT) | ((minor & MINOR_MASK) << MINOR_SHIFT) | (patch & PATCH_MASK))
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn major(self) -> u32 {
        self.0 >> MAJOR_SHIFT
    }

    pub const fn minor(self) -> u32 {
        (self.0 >> MINOR_SHIFT) & MINOR_MASK
    }

    pub const fn patch(self) -> u32 {
        self.0 & PATCH_MASK
    }

    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }

    /// Two versions interoperate when they share a major.
    pub const fn is_compatible_with(self, other: Version) -> bool {
        self.major() == other.major()
    }

    /// Returns `true` when `self` is newer than `other` ignoring patch level.
    pub const fn is_newer_feature_level(self, other: Version) -> bool {
        self.major() > other.major()
            || (self.major() == other.major() && self.minor() > other.minor())
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.patch())
    }
}
