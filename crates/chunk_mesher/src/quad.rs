//! Merged quads and their packed 64-bit encoding.
//!
//! # Packed layout (version 1)
//!
//! | bits   | field    | range                               |
//! |--------|----------|-------------------------------------|
//! | 0-5    | x        | 0-63                                |
//! | 6-11   | y        | 0-63                                |
//! | 12-17  | z        | 0-63                                |
//! | 18-23  | width    | 1-62, extent along the column axis  |
//! | 24-29  | height   | 1-62, extent along the row axis     |
//! | 30-31  | reserved | 0                                   |
//! | 32-60  | material | 0 to 2^29 - 1                       |
//! | 61-63  | face     | 0-5                                 |
//!
//! `(x, y, z)` is the quad's minimum corner on the face plane: the coordinate
//! along the face axis is the plane itself, the other two are the rectangle
//! origin. Fields are range-checked on encode; nothing is truncated. Decoding
//! into a [`Quad`] also rejects planes and rectangles that touch the halo.

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

use crate::core::{Face, MaterialId, CS, INNER_MAX, INNER_MIN};

/// Version of the packed quad layout described in the module docs.
pub const PACKED_QUAD_VERSION: u32 = 1;

const COORD_MASK: u64 = 0x3F;
const Y_SHIFT: u32 = 6;
const Z_SHIFT: u32 = 12;
const WIDTH_SHIFT: u32 = 18;
const HEIGHT_SHIFT: u32 = 24;
const MATERIAL_SHIFT: u32 = 32;
const MATERIAL_BITS: u32 = 29;
const FACE_SHIFT: u32 = 61;

/// Largest material id representable in a packed quad.
pub const MAX_PACKED_MATERIAL: u32 = (1 << MATERIAL_BITS) - 1;
/// Largest base coordinate representable in a packed quad.
pub const MAX_PACKED_COORD: u32 = COORD_MASK as u32;

/// Packed quad encode/decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuadError {
    #[error("material {0} does not fit the packed material field")]
    MaterialOutOfRange(u32),
    #[error("base coordinate {0} outside the chunk")]
    CoordinateOutOfRange(u32),
    #[error("extent {0} outside 1..=62")]
    ExtentOutOfRange(u32),
    #[error("invalid face tag {0}")]
    InvalidFace(u8),
}

/// A merged, axis-aligned rectangle of same-material faces.
///
/// All coordinates are padded grid coordinates. `plane` is the face plane along
/// the face axis (one past the voxel for positive faces); rows and columns
/// follow the face's [`FaceFrame`](crate::core::FaceFrame).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quad {
    pub face: Face,
    pub plane: u8,
    pub row_start: u8,
    pub row_end: u8,
    pub col_start: u8,
    pub col_end: u8,
    pub material: MaterialId,
}

impl Quad {
    /// Extent along the column axis. Zero if `col_end <= col_start`.
    #[inline]
    pub fn width(&self) -> u32 {
        self.col_end.saturating_sub(self.col_start) as u32
    }

    /// Extent along the row axis. Zero if `row_end <= row_start`.
    #[inline]
    pub fn height(&self) -> u32 {
        self.row_end.saturating_sub(self.row_start) as u32
    }

    /// Number of voxel faces covered.
    #[inline]
    pub fn area(&self) -> u32 {
        self.width() * self.height()
    }

    /// Minimum corner on the face plane, as (x, y, z).
    pub fn base(&self) -> [u32; 3] {
        let frame = self.face.frame();
        let mut base = [0; 3];
        base[frame.axis] = self.plane as u32;
        base[frame.row_axis] = self.row_start as u32;
        base[frame.col_axis] = self.col_start as u32;
        base
    }

    /// Grid coordinates of every voxel whose face this quad covers.
    pub fn voxels(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let frame = self.face.frame();
        let layer = frame.layer(self.plane as usize);
        (self.row_start..self.row_end).flat_map(move |row| {
            (self.col_start..self.col_end)
                .map(move |col| frame.voxel(layer, row as usize, col as usize))
        })
    }

    /// Encode into the packed layout, face tag included.
    pub fn pack(&self) -> Result<PackedQuad, QuadError> {
        let [x, y, z] = self.base();
        PackedQuad::new(x, y, z, self.width(), self.height(), self.material as u32)
            .map(|packed| packed.with_face(self.face))
    }

    /// Decode a raw packed value.
    pub fn unpack(raw: u64) -> Result<Quad, QuadError> {
        Quad::try_from(PackedQuad(raw))
    }
}

/// A quad in the packed 64-bit layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct PackedQuad(pub u64);

impl PackedQuad {
    /// Pack a quad without its face tag.
    ///
    /// Rejects coordinates above 63, extents outside `1..=CS` and materials
    /// above [`MAX_PACKED_MATERIAL`].
    pub fn new(x: u32, y: u32, z: u32, width: u32, height: u32, material: u32) -> Result<Self, QuadError> {
        for c in [x, y, z] {
            if c > MAX_PACKED_COORD {
                return Err(QuadError::CoordinateOutOfRange(c));
            }
        }
        for e in [width, height] {
            if e == 0 || e as usize > CS {
                return Err(QuadError::ExtentOutOfRange(e));
            }
        }
        if material > MAX_PACKED_MATERIAL {
            return Err(QuadError::MaterialOutOfRange(material));
        }
        Ok(Self::pack_fields(x, y, z, width, height, material))
    }

    /// Pack fields already known to be in range.
    #[inline]
    pub(crate) const fn pack_fields(x: u32, y: u32, z: u32, width: u32, height: u32, material: u32) -> Self {
        Self(
            ((material as u64) << MATERIAL_SHIFT)
                | ((height as u64) << HEIGHT_SHIFT)
                | ((width as u64) << WIDTH_SHIFT)
                | ((z as u64) << Z_SHIFT)
                | ((y as u64) << Y_SHIFT)
                | x as u64,
        )
    }

    /// Set the face tag in the top 3 bits.
    #[inline]
    pub fn with_face(self, face: Face) -> Self {
        Self(self.without_face().0 | ((face.index() as u64) << FACE_SHIFT))
    }

    /// The same quad with the face tag cleared.
    #[inline]
    pub fn without_face(self) -> Self {
        Self(self.0 & !(0b111 << FACE_SHIFT))
    }

    #[inline]
    pub fn x(self) -> u32 {
        (self.0 & COORD_MASK) as u32
    }

    #[inline]
    pub fn y(self) -> u32 {
        ((self.0 >> Y_SHIFT) & COORD_MASK) as u32
    }

    #[inline]
    pub fn z(self) -> u32 {
        ((self.0 >> Z_SHIFT) & COORD_MASK) as u32
    }

    #[inline]
    pub fn width(self) -> u32 {
        ((self.0 >> WIDTH_SHIFT) & COORD_MASK) as u32
    }

    #[inline]
    pub fn height(self) -> u32 {
        ((self.0 >> HEIGHT_SHIFT) & COORD_MASK) as u32
    }

    #[inline]
    pub fn material(self) -> u32 {
        ((self.0 >> MATERIAL_SHIFT) & MAX_PACKED_MATERIAL as u64) as u32
    }

    /// Raw 3-bit face tag.
    #[inline]
    pub fn face_tag(self) -> u8 {
        (self.0 >> FACE_SHIFT) as u8
    }

    pub fn face(self) -> Result<Face, QuadError> {
        let tag = self.face_tag();
        Face::from_index(tag as usize).ok_or(QuadError::InvalidFace(tag))
    }
}

impl TryFrom<PackedQuad> for Quad {
    type Error = QuadError;

    fn try_from(packed: PackedQuad) -> Result<Self, Self::Error> {
        let face = packed.face()?;
        let material = packed.material();
        let material = MaterialId::try_from(material).map_err(|_| QuadError::MaterialOutOfRange(material))?;

        let (width, height) = (packed.width(), packed.height());
        for e in [width, height] {
            if e == 0 || e as usize > CS {
                return Err(QuadError::ExtentOutOfRange(e));
            }
        }

        let frame = face.frame();
        let base = [packed.x(), packed.y(), packed.z()];

        // Faces of logical voxels only: the plane must come from a layer in
        // INNER_MIN..INNER_MAX and the rectangle must stay off the halo.
        let plane = base[frame.axis];
        let first_plane = frame.plane(INNER_MIN) as u32;
        let last_plane = frame.plane(INNER_MAX - 1) as u32;
        if plane < first_plane || plane > last_plane {
            return Err(QuadError::CoordinateOutOfRange(plane));
        }

        let row_start = base[frame.row_axis];
        let col_start = base[frame.col_axis];
        for start in [row_start, col_start] {
            if start < INNER_MIN as u32 {
                return Err(QuadError::CoordinateOutOfRange(start));
            }
        }
        for end in [row_start + height, col_start + width] {
            if end > INNER_MAX as u32 {
                return Err(QuadError::CoordinateOutOfRange(end));
            }
        }

        Ok(Quad {
            face,
            plane: plane as u8,
            row_start: row_start as u8,
            row_end: (row_start + height) as u8,
            col_start: col_start as u8,
            col_end: (col_start + width) as u8,
            material,
        })
    }
}
