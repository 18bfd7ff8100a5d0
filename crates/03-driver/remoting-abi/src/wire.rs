//! Fixed-width enumerations.
//!
//! Every enumeration that crosses the peer boundary is `#[repr(u32)]` and
//! travels as its raw discriminant. Decoding an unrecognised discriminant
//! yields an [`UnknownDiscriminant`] value instead of panicking.

use std::fmt;

/// Discriminant that no variant of `kind` claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownDiscriminant {
    pub kind: &'static str,
    pub value: u32,
}

impl fmt::Display for UnknownDiscriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} discriminant {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownDiscriminant {}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u32)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_u32(self) -> u32 {
                self as u32
            }

            pub fn from_u32(value: u32) -> ::std::result::Result<Self, $crate::UnknownDiscriminant> {
                match value {
                    $(v if v == $value => Ok($name::$variant),)+
                    _ => Err($crate::UnknownDiscriminant {
                        kind: stringify!($name),
                        value,
                    }),
                }
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> u32 {
                value as u32
            }
        }

        impl TryFrom<u32> for $name {
            type Error = $crate::UnknownDiscriminant;

            fn try_from(value: u32) -> ::std::result::Result<Self, Self::Error> {
                $name::from_u32(value)
            }
        }
    };
}

/// Declares a `u32` bit set with named flags.
macro_rules! wire_flags {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$fmeta:meta])* const $flag:ident = $value:expr;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        $vis struct $name(pub u32);

        impl $name {
            pub const NONE: $name = $name(0);
            $($(#[$fmeta])* pub const $flag: $name = $name($value);)+

            pub const fn bits(self) -> u32 {
                self.0
            }

            pub const fn contains(self, other: $name) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl ::std::ops::BitOr for $name {
            type Output = $name;

            fn bitor(self, rhs: $name) -> $name {
                $name(self.0 | rhs.0)
            }
        }
    };
}
