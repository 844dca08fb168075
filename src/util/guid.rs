//! 128-bit JT object and segment identifiers.

use std::fmt;

/// GUID as stored in JT files: a `u32`, two `u16`s and eight raw bytes.
///
/// The three leading fields follow the file byte order; the trailing
/// eight bytes are stored verbatim.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    /// Size of an encoded GUID in bytes.
    pub const SIZE: usize = 16;

    /// All-ones identifier terminating an element list.
    pub const END_OF_ELEMENTS: Self = Self::new(
        0xffff_ffff, 0xffff, 0xffff, [0xff; 8],
    );

    #[inline]
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self { data1, data2, data3, data4 }
    }

    /// Identifier built from the eleven components used by the JT reference tables.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn from_parts(
        a: u32, b: u16, c: u16,
        d: u8, e: u8, f: u8, g: u8, h: u8, i: u8, j: u8, k: u8,
    ) -> Self {
        Self::new(a, b, c, [d, e, f, g, h, i, j, k])
    }

    #[inline]
    pub fn is_end_of_elements(&self) -> bool {
        *self == Self::END_OF_ELEMENTS
    }
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

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let g = Guid::from_parts(0x10dd1035, 0x2ac8, 0x11d1, 0x9b, 0x6b, 0x00, 0x80, 0xc7, 0xbb, 0x59, 0x97);
        assert_eq!(g.to_string(), "10dd1035-2ac8-11d1-9b6b-0080c7bb5997");
    }

    #[test]
    fn test_end_of_elements() {
        assert!(Guid::END_OF_ELEMENTS.is_end_of_elements());
        assert!(!Guid::default().is_end_of_elements());
        assert_eq!(Guid::END_OF_ELEMENTS.to_string(), "ffffffff-ffff-ffff-ffff-ffffffffffff");
    }
}
