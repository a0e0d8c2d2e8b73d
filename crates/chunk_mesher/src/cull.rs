//! Face culling.
//!
//! A face is visible if the voxel is solid AND the neighbor one step along the
//! outward normal is empty. Neighbors may lie in the halo; a solid halo voxel
//! hides the face.
//!
//! Two forms are provided:
//! - [`build_face_mask`] scans one plane voxel by voxel into a material mask
//! - [`cull_faces`] works on whole columns, 64 voxels per bitwise operation

use crate::convert::column_index;
use crate::core::{Face, MaterialId, CS, CS_P2, INNER_MAX, INNER_MIN, LOGICAL_BITS, MATERIAL_EMPTY};
use crate::grid::VoxelGrid;

/// Fill a `CS × CS` mask with the visible faces of one plane.
///
/// `mask[(row - 1) * CS + (col - 1)]` holds the voxel material where the face
/// is visible, `MATERIAL_EMPTY` elsewhere. Rows and columns follow the face's
/// frame.
///
/// # Arguments
/// * `grid` - Input grid
/// * `face` - Face direction
/// * `layer` - Voxel layer along the face axis, in `INNER_MIN..INNER_MAX`
/// * `mask` - Destination, `CS * CS` cells
///
/// Returns the number of visible faces written.
pub fn build_face_mask(grid: VoxelGrid<'_>, face: Face, layer: usize, mask: &mut [MaterialId]) -> usize {
    debug_assert_eq!(mask.len(), CS * CS);
    let frame = face.frame();
    let mut visible = 0;

    for (r, cells) in mask.chunks_exact_mut(CS).enumerate() {
        let row = r + INNER_MIN;
        for (c, cell) in cells.iter_mut().enumerate() {
            let col = c + INNER_MIN;
            let material = grid.get_at(frame.voxel(layer, row, col));
            *cell = if material != MATERIAL_EMPTY
                && grid.get_at(frame.neighbor(layer, row, col)) == MATERIAL_EMPTY
            {
                visible += 1;
                material
            } else {
                MATERIAL_EMPTY
            };
        }
    }

    visible
}

/// Per-face visibility bitmasks for every (x, y) column.
///
/// `masks[face * CS_P2 + x + y * CS_P]`, bit `z` set if the face of voxel
/// (x, y, z) is visible. Only logical bits (1..=62) of logical columns are
/// ever set.
#[derive(Clone)]
pub struct FaceMasks {
    masks: Box<[u64]>,
}

impl FaceMasks {
    pub fn new() -> Self {
        Self {
            masks: vec![0u64; 6 * CS_P2].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn get(&self, face: Face, x: usize, y: usize) -> u64 {
        self.masks[face.index() * CS_P2 + column_index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, face: Face, x: usize, y: usize, mask: u64) {
        self.masks[face.index() * CS_P2 + column_index(x, y)] = mask;
    }

    /// Visible faces in one direction.
    pub fn face_count(&self, face: Face) -> usize {
        let start = face.index() * CS_P2;
        self.masks[start..start + CS_P2]
            .iter()
            .map(|m| m.count_ones() as usize)
            .sum()
    }

    /// Visible faces in all directions.
    pub fn total_faces(&self) -> usize {
        self.masks.iter().map(|m| m.count_ones() as usize).sum()
    }

    pub fn clear(&mut self) {
        self.masks.fill(0);
    }
}

impl Default for FaceMasks {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate face masks from column occupancy masks.
///
/// For X/Y neighbors we compare with the adjacent column; for Z neighbors we
/// shift the column itself. The current column is restricted to its logical
/// bits, while neighbors keep their halo bits so a solid halo culls.
///
/// # Arguments
/// * `opaque` - `CS_P²` occupancy masks, see [`crate::convert`]
/// * `masks` - Output, cleared first
pub fn cull_faces(opaque: &[u64], masks: &mut FaceMasks) {
    debug_assert_eq!(opaque.len(), CS_P2);
    masks.clear();

    for y in INNER_MIN..INNER_MAX {
        for x in INNER_MIN..INNER_MAX {
            let full = opaque[column_index(x, y)];
            let column = full & LOGICAL_BITS;

            // Skip empty columns
            if column == 0 {
                continue;
            }

            masks.set(Face::PosX, x, y, column & !opaque[column_index(x + 1, y)]);
            masks.set(Face::NegX, x, y, column & !opaque[column_index(x - 1, y)]);
            masks.set(Face::PosY, x, y, column & !opaque[column_index(x, y + 1)]);
            masks.set(Face::NegY, x, y, column & !opaque[column_index(x, y - 1)]);

            // full >> 1 moves z + 1 onto bit z
            masks.set(Face::PosZ, x, y, column & !(full >> 1));
            masks.set(Face::NegZ, x, y, column & !(full << 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{build_opaque_masks, relayout_zxy};
    use crate::core::CS_P3;
    use crate::grid::VoxelChunk;

    fn bitwise(chunk: &VoxelChunk) -> FaceMasks {
        let mut zxy = vec![0u8; CS_P3];
        let mut opaque = vec![0u64; CS_P2];
        relayout_zxy(chunk.grid(), &mut zxy);
        build_opaque_masks(&zxy, &mut opaque);

        let mut masks = FaceMasks::new();
        cull_faces(&opaque, &mut masks);
        masks
    }

    fn scan_counts(chunk: &VoxelChunk) -> [usize; 6] {
        let mut mask = vec![0u8; CS * CS];
        let mut counts = [0; 6];
        for face in Face::ALL {
            for layer in INNER_MIN..INNER_MAX {
                counts[face.index()] += build_face_mask(chunk.grid(), face, layer, &mut mask);
            }
        }
        counts
    }

    #[test]
    fn single_voxel_six_faces() {
        let mut chunk = VoxelChunk::new();
        chunk.set(32, 32, 32, 1).unwrap();

        assert_eq!(bitwise(&chunk).total_faces(), 6);
        assert_eq!(scan_counts(&chunk), [1; 6]);
    }

    #[test]
    fn adjacent_voxels_share_face() {
        for offset in [[1, 0, 0], [0, 1, 0], [0, 0, 1]] {
            let mut chunk = VoxelChunk::new();
            chunk.set(32, 32, 32, 1).unwrap();
            chunk.set(32 + offset[0], 32 + offset[1], 32 + offset[2], 2).unwrap();

            // Two voxels: 12 faces - 2 hidden = 10
            assert_eq!(bitwise(&chunk).total_faces(), 10, "offset {:?}", offset);
            assert_eq!(scan_counts(&chunk).iter().sum::<usize>(), 10);
        }
    }

    #[test]
    fn cube_3x3x3_interior_hidden() {
        let mut chunk = VoxelChunk::new();
        chunk.fill_box([31, 31, 31], [34, 34, 34], 1).unwrap();

        // 9 faces per side
        assert_eq!(bitwise(&chunk).total_faces(), 54);
        assert_eq!(scan_counts(&chunk), [9; 6]);
    }

    #[test]
    fn empty_chunk_no_faces() {
        let chunk = VoxelChunk::new();
        assert_eq!(bitwise(&chunk).total_faces(), 0);
        assert_eq!(scan_counts(&chunk), [0; 6]);
    }

    #[test]
    fn boundary_voxel_is_exposed() {
        let mut chunk = VoxelChunk::new();
        chunk.set(1, 32, 62, 1).unwrap();

        let masks = bitwise(&chunk);
        assert_eq!(masks.total_faces(), 6);
        assert_eq!(masks.get(Face::NegX, 1, 32), 1 << 62);
        assert_eq!(masks.get(Face::PosZ, 1, 32), 1 << 62);
    }

    #[test]
    fn solid_halo_culls() {
        let mut chunk = VoxelChunk::new();
        chunk.set(1, 32, 62, 1).unwrap();
        chunk.set(0, 32, 62, 5).unwrap();
        chunk.set(1, 32, 63, 5).unwrap();

        let masks = bitwise(&chunk);
        assert_eq!(masks.get(Face::NegX, 1, 32), 0);
        assert_eq!(masks.get(Face::PosZ, 1, 32), 0);
        assert_eq!(masks.total_faces(), 4);

        let counts = scan_counts(&chunk);
        assert_eq!(counts[Face::NegX.index()], 0);
        assert_eq!(counts[Face::PosZ.index()], 0);
        assert_eq!(counts.iter().sum::<usize>(), 4);
    }

    #[test]
    fn halo_voxels_are_never_meshed() {
        let mut chunk = VoxelChunk::new();
        chunk.set(0, 10, 10, 3).unwrap();
        chunk.set(10, 63, 10, 3).unwrap();
        chunk.set(10, 10, 0, 3).unwrap();

        assert_eq!(bitwise(&chunk).total_faces(), 0);
        assert_eq!(scan_counts(&chunk), [0; 6]);
    }

    #[test]
    fn face_direction_counts() {
        let mut chunk = VoxelChunk::new();
        // Slab on Y = 32, x and z in 20..30
        chunk.fill_box([20, 32, 20], [30, 33, 30], 1).unwrap();

        let masks = bitwise(&chunk);
        assert_eq!(masks.face_count(Face::PosY), 100);
        assert_eq!(masks.face_count(Face::NegY), 100);
        assert_eq!(masks.face_count(Face::PosX), 10);
        assert_eq!(masks.face_count(Face::NegX), 10);
        assert_eq!(masks.face_count(Face::PosZ), 10);
        assert_eq!(masks.face_count(Face::NegZ), 10);
        assert_eq!(scan_counts(&chunk), [10, 10, 100, 100, 10, 10]);
    }

    #[test]
    fn face_mask_holds_material() {
        let mut chunk = VoxelChunk::new();
        chunk.set(4, 5, 6, 9).unwrap();

        // +Y: rows = x, columns = z
        let mut mask = vec![0u8; CS * CS];
        let visible = build_face_mask(chunk.grid(), Face::PosY, 5, &mut mask);
        assert_eq!(visible, 1);
        assert_eq!(mask[(4 - 1) * CS + (6 - 1)], 9);
    }

    #[test]
    fn mixed_materials_do_not_cull_differently() {
        let mut chunk = VoxelChunk::new();
        chunk.set(10, 10, 10, 1).unwrap();
        chunk.set(11, 10, 10, 200).unwrap();

        let counts = scan_counts(&chunk);
        assert_eq!(counts[Face::PosX.index()], 1);
        assert_eq!(counts[Face::NegX.index()], 1);
    }
}
