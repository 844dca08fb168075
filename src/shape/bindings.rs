//! Per-vertex attribute bindings and quantization settings.

use std::io::{Read, Seek};

use crate::binary::JtReader;
use crate::util::Result;

/// Which per-vertex arrays a shape carries, and their component counts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VertexBindings(pub u64);

impl VertexBindings {
    pub const VERTEX_2: u64 = 1;
    pub const VERTEX_3: u64 = 1 << 1;
    pub const VERTEX_4: u64 = 1 << 2;
    pub const NORMAL: u64 = 1 << 3;
    pub const COLOUR_3: u64 = 1 << 4;
    pub const COLOUR_4: u64 = 1 << 5;
    pub const VERTEX_FLAG: u64 = 1 << 6;
    /// First texture coordinate bit; each unit owns four bits for 1..=4 components.
    pub const TEXCOORD_SHIFT: u32 = 8;
    pub const TEXCOORD_UNITS: usize = 8;
    pub const AUXILIARY_FIELDS: u64 = 1 << 63;

    #[inline]
    fn has(self, bit: u64) -> bool {
        self.0 & bit != 0
    }

    /// Components per vertex coordinate; 0 when no coordinates are bound.
    pub fn vertex_components(self) -> u8 {
        if self.has(Self::VERTEX_4) {
            4
        } else if self.has(Self::VERTEX_3) {
            3
        } else if self.has(Self::VERTEX_2) {
            2
        } else {
            0
        }
    }

    pub fn has_normals(self) -> bool {
        self.has(Self::NORMAL)
    }

    pub fn colour_components(self) -> u8 {
        if self.has(Self::COLOUR_4) {
            4
        } else if self.has(Self::COLOUR_3) {
            3
        } else {
            0
        }
    }

    pub fn has_vertex_flags(self) -> bool {
        self.has(Self::VERTEX_FLAG)
    }

    /// Components of texture coordinate unit `unit` (0..8); 0 when unbound.
    pub fn texcoord_components(self, unit: usize) -> u8 {
        if unit >= Self::TEXCOORD_UNITS {
            return 0;
        }
        let nibble = (self.0 >> (Self::TEXCOORD_SHIFT as usize + unit * 4)) & 0xf;
        match nibble {
            0 => 0,
            n => (64 - n.leading_zeros()) as u8,
        }
    }

    /// Number of bound texture coordinate units.
    pub fn texcoord_units(self) -> usize {
        (0..Self::TEXCOORD_UNITS).filter(|&u| self.texcoord_components(u) > 0).count()
    }

    pub fn has_auxiliary_fields(self) -> bool {
        self.has(Self::AUXILIARY_FIELDS)
    }
}

impl std::fmt::Debug for VertexBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexBindings")
            .field("raw", &format_args!("{:#x}", self.0))
            .field("vertex", &self.vertex_components())
            .field("normals", &self.has_normals())
            .field("colour", &self.colour_components())
            .field("texcoord_units", &self.texcoord_units())
            .finish()
    }
}

/// Lossy quantization settings stored with JT 8/9 vertex shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct QuantizationParams {
    pub bits_per_vertex: u8,
    pub normal_bits_factor: u8,
    pub bits_per_texcoord: u8,
    pub bits_per_colour: u8,
}

impl QuantizationParams {
    pub fn read<R: Read + Seek>(reader: &mut JtReader<R>) -> Result<Self> {
        Ok(Self {
            bits_per_vertex: reader.read_u8()?,
            normal_bits_factor: reader.read_u8()?,
            bits_per_texcoord: reader.read_u8()?,
            bits_per_colour: reader.read_u8()?,
        })
    }

    /// Bits per normal component, derived from the stored factor.
    pub fn bits_per_normal(&self) -> u32 {
        6 + 2 * u32::from(self.normal_bits_factor)
    }
}

/// Vertex arrays present in the file but not decoded.
///
/// These are reported as not supported yet; their absence from a decoded
/// shape does not mean the data is corrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct UndecodedArrays {
    pub vertices: bool,
    pub normals: bool,
    pub colours: bool,
    pub texcoord_units: usize,
    pub vertex_flags: bool,
    pub auxiliary_fields: bool,
}

impl UndecodedArrays {
    pub fn from_bindings(bindings: VertexBindings) -> Self {
        Self {
            vertices: bindings.vertex_components() > 0,
            normals: bindings.has_normals(),
            colours: bindings.colour_components() > 0,
            texcoord_units: bindings.texcoord_units(),
            vertex_flags: bindings.has_vertex_flags(),
            auxiliary_fields: bindings.has_auxiliary_fields(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_accessors() {
        let b = VertexBindings(
            VertexBindings::VERTEX_3
                | VertexBindings::NORMAL
                | VertexBindings::COLOUR_4
                | (1 << 9)          // unit 0: 2 components
                | (1 << 22)         // unit 3: 3 components
                | VertexBindings::AUXILIARY_FIELDS,
        );
        assert_eq!(b.vertex_components(), 3);
        assert!(b.has_normals());
        assert_eq!(b.colour_components(), 4);
        assert!(!b.has_vertex_flags());
        assert_eq!(b.texcoord_components(0), 2);
        assert_eq!(b.texcoord_components(1), 0);
        assert_eq!(b.texcoord_components(3), 3);
        assert_eq!(b.texcoord_components(8), 0);
        assert_eq!(b.texcoord_units(), 2);
        assert!(b.has_auxiliary_fields());
    }

    #[test]
    fn test_undecoded_arrays() {
        assert!(UndecodedArrays::from_bindings(VertexBindings(0)).is_empty());

        let u = UndecodedArrays::from_bindings(VertexBindings(
            VertexBindings::VERTEX_3 | VertexBindings::VERTEX_FLAG,
        ));
        assert!(u.vertices);
        assert!(u.vertex_flags);
        assert!(!u.normals);
        assert_eq!(u.texcoord_units, 0);
    }

    #[test]
    fn test_normal_bits() {
        let q = QuantizationParams { normal_bits_factor: 3, ..Default::default() };
        assert_eq!(q.bits_per_normal(), 12);
    }
}
