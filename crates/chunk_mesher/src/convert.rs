//! Column-major re-layout for the bit-parallel mesher.
//!
//! The input grid is X-fastest. The bit-parallel path wants every (x, y)
//! column contiguous along Z so a column can be read as 64 bytes and folded
//! into one `u64` occupancy mask:
//!
//! - re-laid-out voxels: `index = z + x * 64 + y * 64²`
//! - opaque masks: `masks[x + y * 64]`, bit `z` set iff the voxel is solid

use crate::core::{MaterialId, CS_P, CS_P2, CS_P3, MATERIAL_EMPTY};
use crate::grid::{voxel_index, VoxelGrid};

/// Linear index of a voxel in the column-major (ZXY) layout.
#[inline]
pub const fn zxy_index(x: usize, y: usize, z: usize) -> usize {
    z + x * CS_P + y * CS_P2
}

/// Index of the (x, y) column in an opaque mask array.
#[inline]
pub const fn column_index(x: usize, y: usize) -> usize {
    x + y * CS_P
}

/// Copy `grid` into ZXY order.
///
/// # Arguments
/// * `grid` - Validated input grid
/// * `out` - Destination, exactly `CS_P³` bytes
pub fn relayout_zxy(grid: VoxelGrid<'_>, out: &mut [MaterialId]) {
    debug_assert_eq!(out.len(), CS_P3);
    let src = grid.as_slice();

    for y in 0..CS_P {
        for x in 0..CS_P {
            let column = &mut out[zxy_index(x, y, 0)..zxy_index(x, y, 0) + CS_P];
            for (z, dst) in column.iter_mut().enumerate() {
                *dst = src[voxel_index(x, y, z)];
            }
        }
    }
}

/// Fold each ZXY column into a solid-occupancy bitmask.
///
/// Halo voxels are included: bit 0 and bit 63 reflect the halo at z = 0 and
/// z = 63, and the columns at x or y = 0 / 63 are the halo columns.
pub fn build_opaque_masks(zxy: &[MaterialId], masks: &mut [u64]) {
    debug_assert_eq!(zxy.len(), CS_P3);
    debug_assert_eq!(masks.len(), CS_P2);

    for (mask, column) in masks.iter_mut().zip(zxy.chunks_exact(CS_P)) {
        let mut bits = 0u64;
        for (z, &material) in column.iter().enumerate() {
            if material != MATERIAL_EMPTY {
                bits |= 1u64 << z;
            }
        }
        *mask = bits;
    }
}
