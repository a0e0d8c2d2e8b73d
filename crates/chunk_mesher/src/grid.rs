//! Input voxel grids.
//!
//! The mesher consumes a flat buffer of `CS_P³` material bytes laid out as
//! `index = x + y * 64 + z * 64²`. Coordinates 0 and 63 on every axis form a
//! one-voxel halo that is read for neighbor culling but never meshed.

use thiserror::Error;

use crate::core::{MaterialId, CS_P, CS_P2, CS_P3, MATERIAL_EMPTY};

/// Grid ingestion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("voxel buffer must hold {expected} bytes (got {actual})")]
    InvalidLength { expected: usize, actual: usize },
    #[error("voxel ({x}, {y}, {z}) out of range 0..64")]
    OutOfBounds { x: usize, y: usize, z: usize },
}

/// Linear index of a voxel in the input layout (X fastest).
#[inline]
pub const fn voxel_index(x: usize, y: usize, z: usize) -> usize {
    x + y * CS_P + z * CS_P2
}

/// Validated, read-only view over a padded 64³ material buffer.
#[derive(Clone, Copy, Debug)]
pub struct VoxelGrid<'a> {
    voxels: &'a [u8],
}

impl<'a> VoxelGrid<'a> {
    /// Wrap a buffer, rejecting anything that is not exactly `CS_P³` bytes.
    pub fn new(voxels: &'a [u8]) -> Result<Self, GridError> {
        if voxels.len() != CS_P3 {
            return Err(GridError::InvalidLength {
                expected: CS_P3,
                actual: voxels.len(),
            });
        }
        Ok(Self { voxels })
    }

    /// Linear index of a padded coordinate, see [`voxel_index`].
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        voxel_index(x, y, z)
    }

    /// Material at a padded coordinate.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> MaterialId {
        self.voxels[voxel_index(x, y, z)]
    }

    #[inline]
    pub fn get_at(&self, p: [usize; 3]) -> MaterialId {
        self.get(p[0], p[1], p[2])
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.voxels
    }

    /// True if no voxel in the buffer (halo included) is solid.
    pub fn is_empty(&self) -> bool {
        self.voxels.iter().all(|&m| m == MATERIAL_EMPTY)
    }

    /// Count solid voxels, halo included.
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|&&m| m != MATERIAL_EMPTY).count()
    }
}

/// Owned, heap-allocated 64³ voxel buffer for building mesher input.
#[derive(Clone, PartialEq, Eq)]
pub struct VoxelChunk {
    voxels: Box<[u8]>,
}

impl std::fmt::Debug for VoxelChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelChunk")
            .field("solid", &self.grid().solid_count())
            .finish()
    }
}

impl VoxelChunk {
    /// Create an all-air chunk.
    pub fn new() -> Self {
        Self {
            voxels: vec![MATERIAL_EMPTY; CS_P3].into_boxed_slice(),
        }
    }

    /// Take ownership of an existing buffer in the input layout.
    pub fn from_vec(voxels: Vec<u8>) -> Result<Self, GridError> {
        VoxelGrid::new(&voxels)?;
        Ok(Self {
            voxels: voxels.into_boxed_slice(),
        })
    }

    #[inline]
    fn check(x: usize, y: usize, z: usize) -> Result<usize, GridError> {
        if x >= CS_P || y >= CS_P || z >= CS_P {
            return Err(GridError::OutOfBounds { x, y, z });
        }
        Ok(voxel_index(x, y, z))
    }

    /// Set the material at a padded coordinate (halo included).
    pub fn set(&mut self, x: usize, y: usize, z: usize, material: MaterialId) -> Result<(), GridError> {
        let idx = Self::check(x, y, z)?;
        self.voxels[idx] = material;
        Ok(())
    }

    /// Material at a padded coordinate.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Result<MaterialId, GridError> {
        let idx = Self::check(x, y, z)?;
        Ok(self.voxels[idx])
    }

    /// Make a voxel empty.
    pub fn clear(&mut self, x: usize, y: usize, z: usize) -> Result<(), GridError> {
        self.set(x, y, z, MATERIAL_EMPTY)
    }

    /// Fill the half-open box `[min, max)` with one material.
    pub fn fill_box(&mut self, min: [usize; 3], max: [usize; 3], material: MaterialId) -> Result<(), GridError> {
        if max.iter().any(|&m| m > CS_P) {
            return Err(GridError::OutOfBounds { x: max[0], y: max[1], z: max[2] });
        }
        if min[0] >= max[0] {
            return Ok(());
        }
        for z in min[2]..max[2] {
            for y in min[1]..max[1] {
                let row = voxel_index(0, y, z);
                self.voxels[row + min[0]..row + max[0]].fill(material);
            }
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.voxels
    }

    pub fn grid(&self) -> VoxelGrid<'_> {
        VoxelGrid { voxels: &self.voxels }
    }
}

impl Default for VoxelChunk {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let short = vec![0u8; CS_P3 - 1];
        assert_eq!(
            VoxelGrid::new(&short).unwrap_err(),
            GridError::InvalidLength { expected: CS_P3, actual: CS_P3 - 1 }
        );
        assert!(VoxelGrid::new(&[]).is_err());
        assert!(VoxelChunk::from_vec(vec![0u8; CS_P3 + 1]).is_err());
    }

    #[test]
    fn index_layout_is_x_fastest() {
        assert_eq!(voxel_index(1, 0, 0), 1);
        assert_eq!(voxel_index(0, 1, 0), 64);
        assert_eq!(voxel_index(0, 0, 1), 4096);

        let chunk = VoxelChunk::new();
        assert_eq!(chunk.grid().index(3, 2, 1), 3 + 2 * 64 + 4096);
    }

    #[test]
    fn chunk_set_get() {
        let mut chunk = VoxelChunk::new();
        chunk.set(10, 20, 30, 42).unwrap();

        assert_eq!(chunk.get(10, 20, 30).unwrap(), 42);
        assert_eq!(chunk.grid().get(10, 20, 30), 42);
        assert_eq!(chunk.as_slice()[voxel_index(10, 20, 30)], 42);
        assert_eq!(chunk.get(10, 20, 31).unwrap(), MATERIAL_EMPTY);
    }

    #[test]
    fn chunk_out_of_bounds() {
        let mut chunk = VoxelChunk::new();
        assert_eq!(
            chunk.set(64, 0, 0, 1),
            Err(GridError::OutOfBounds { x: 64, y: 0, z: 0 })
        );
        assert!(chunk.get(0, 0, 99).is_err());
        assert!(chunk.fill_box([0, 0, 0], [65, 1, 1], 1).is_err());
    }

    #[test]
    fn chunk_clear() {
        let mut chunk = VoxelChunk::new();
        chunk.set(1, 2, 3, 5).unwrap();
        chunk.clear(1, 2, 3).unwrap();
        assert!(chunk.grid().is_empty());
    }

    #[test]
    fn fill_box_counts() {
        let mut chunk = VoxelChunk::new();
        chunk.fill_box([10, 20, 5], [12, 23, 6], 7).unwrap();

        let grid = chunk.grid();
        assert_eq!(grid.solid_count(), 2 * 3);
        assert_eq!(grid.get(11, 22, 5), 7);
        assert_eq!(grid.get(12, 22, 5), 0);
        assert!(!grid.is_empty());
    }

    #[test]
    fn from_vec_round_trips_buffer() {
        let mut raw = vec![0u8; CS_P3];
        raw[voxel_index(3, 4, 5)] = 9;
        let chunk = VoxelChunk::from_vec(raw).unwrap();
        assert_eq!(chunk.get(3, 4, 5).unwrap(), 9);
    }
}
