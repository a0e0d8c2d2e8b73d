//! Greedy rectangle merging.
//!
//! The greedy merge combines adjacent visible faces with the same material
//! into larger rectangles. Both implementations follow one rule, so they
//! produce the same rectangles in the same order:
//!
//! 1. take the next unclaimed visible cell, row-major, columns ascending
//! 2. grow the width along the row while the material matches
//! 3. grow the height while the whole span of the next row matches
//! 4. claim the rectangle and continue after it in the same row
//!
//! - [`scan`]: per-cell walk over a material mask
//! - [`binary`]: the same walk on 64-bit row words

pub mod binary;
pub mod scan;

pub use binary::{greedy_merge_rows, PlaneRows};
pub use scan::greedy_merge_mask;

use crate::core::{Face, MaterialId};
use crate::quad::{PackedQuad, Quad};

/// One merged rectangle inside a plane.
///
/// `row` and `col` are padded grid coordinates of the minimum corner;
/// `width` runs along columns, `height` along rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
    pub material: MaterialId,
}

impl Rect {
    /// Place the rectangle on the plane of `layer` for `face`.
    pub fn to_quad(self, face: Face, layer: usize) -> Quad {
        Quad {
            face,
            plane: face.frame().plane(layer) as u8,
            row_start: self.row as u8,
            row_end: (self.row + self.height) as u8,
            col_start: self.col as u8,
            col_end: (self.col + self.width) as u8,
            material: self.material,
        }
    }

    /// Packed form without the face tag.
    pub(crate) fn to_packed(self, face: Face, layer: usize) -> PackedQuad {
        let frame = face.frame();
        let [x, y, z] = frame.voxel(frame.plane(layer), self.row, self.col);
        PackedQuad::pack_fields(
            x as u32,
            y as u32,
            z as u32,
            self.width as u32,
            self.height as u32,
            self.material as u32,
        )
    }
}
