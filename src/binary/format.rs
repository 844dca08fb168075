//! JT file header constants and byte order.

/// Size of the ASCII version string at the start of every JT file.
pub const VERSION_STRING_SIZE: usize = 80;

/// Literal prefix of the version string.
pub const VERSION_MARKER: &str = "Version ";

/// The major version digits must appear before this index.
pub const MAJOR_DIGITS_END: usize = 20;

/// Byte-order flag value for most-significant-byte-first files.
pub const BIG_ENDIAN_FLAG: u8 = 1;

/// First major version with 64-bit TOC offsets, `u8` version fields
/// and the single-table probability context layout.
pub const MODERN_MAJOR: u32 = 10;

/// Byte order of every multi-byte field in a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl ByteOrder {
    /// Interpret the header flag byte.
    #[inline]
    pub const fn from_flag(flag: u8) -> Self {
        if flag == BIG_ENDIAN_FLAG {
            Self::Big
        } else {
            Self::Little
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Little => "little-endian",
            Self::Big => "big-endian",
        }
    }
}

/// True for the 10.x generation and later.
#[inline]
pub const fn is_modern(major: u32) -> bool {
    major >= MODERN_MAJOR
}

/// Extract the major version from an 80-byte version string.
///
/// Returns `None` when the marker or the digits are missing.
pub fn parse_major_version(header: &str) -> Option<u32> {
    let rest = header.strip_prefix(VERSION_MARKER)?;
    let window = MAJOR_DIGITS_END - VERSION_MARKER.len();
    let digits: String = rest
        .chars()
        .take(window)
        .skip_while(|c| *c == ' ')
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
