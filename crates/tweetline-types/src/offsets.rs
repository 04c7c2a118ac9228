//! Offset newtypes for the two coordinate spaces entity spans live in.
//!
//! `RawOffset` counts Unicode scalar values, the way the server counts. Escape
//! correction stays inside this space. `DisplayOffset` counts UTF-16 code
//! units into the unescaped display text, the unit rich-text renderers index
//! by. The only way from one to the other is the supplementary-character
//! shift in the reconciler; there is no `From` impl between them.
//!
//! Both wrap `i64` so spans that went out of range during correction remain
//! representable and can be rejected at render time instead of panicking.
//! Arithmetic saturates at the `i64` bounds.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Offset in the server's indexing convention (chars).
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOffset(pub i64);

/// Offset in UTF-16 code units into reconciled display text.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayOffset(pub i64);

macro_rules! impl_offset {
    ($T:ident, $tag:literal) => {
        impl $T {
            pub const ZERO: Self = Self(0);

            pub fn get(self) -> i64 {
                self.0
            }

            /// The offset as a slice index, if it is non-negative.
            pub fn to_index(self) -> Option<usize> {
                usize::try_from(self.0).ok()
            }
        }

        impl From<i64> for $T {
            fn from(v: i64) -> Self {
                Self(v)
            }
        }

        impl Add<i64> for $T {
            type Output = Self;

            fn add(self, rhs: i64) -> Self {
                Self(self.0.saturating_add(rhs))
            }
        }

        impl Sub<i64> for $T {
            type Output = Self;

            fn sub(self, rhs: i64) -> Self {
                Self(self.0.saturating_sub(rhs))
            }
        }

        impl Sub for $T {
            type Output = i64;

            fn sub(self, rhs: Self) -> i64 {
                self.0.saturating_sub(rhs.0)
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $tag, self.0)
            }
        }
    };
}

impl_offset!(RawOffset, "raw:");
impl_offset!(DisplayOffset, "display:");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_stays_in_space() {
        let a = RawOffset(10);
        assert_eq!(a - 3, RawOffset(7));
        assert_eq!(a + 2, RawOffset(12));
        assert_eq!(RawOffset(12) - RawOffset(10), 2);
    }

    #[test]
    fn test_arithmetic_saturates() {
        assert_eq!(RawOffset(i64::MAX) + 1, RawOffset(i64::MAX));
        assert_eq!(DisplayOffset(i64::MIN) - 1, DisplayOffset(i64::MIN));
        assert_eq!(RawOffset(i64::MIN) - RawOffset(1), i64::MIN);
    }

    #[test]
    fn test_to_index_rejects_negative() {
        assert_eq!(DisplayOffset(-1).to_index(), None);
        assert_eq!(DisplayOffset(4).to_index(), Some(4));
    }

    #[test]
    fn test_display_tags_space() {
        assert_eq!(RawOffset(3).to_string(), "raw:3");
        assert_eq!(DisplayOffset(3).to_string(), "display:3");
    }

    #[test]
    fn test_serde_transparent() {
        let off: RawOffset = serde_json::from_str("42").unwrap();
        assert_eq!(off, RawOffset(42));
        assert_eq!(serde_json::to_string(&DisplayOffset(7)).unwrap(), "7");
    }
}
