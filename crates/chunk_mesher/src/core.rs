//! Core type definitions for the chunk mesher.

use thiserror::Error;

/// Material identifier, one byte per voxel.
pub type MaterialId = u8;

/// Reserved material value for empty (air) voxels.
pub const MATERIAL_EMPTY: MaterialId = 0;

/// Chunk size with 1-voxel padding (64).
/// The padding allows neighbor lookups without bounds checks.
pub const CS_P: usize = 64;
/// Logical (meshed) chunk size (62).
pub const CS: usize = 62;
/// Slice size (CS_P × CS_P = 4096).
pub const CS_P2: usize = CS_P * CS_P;
/// Total voxels (CS_P³ = 262144).
pub const CS_P3: usize = CS_P * CS_P * CS_P;

/// First logical coordinate along every axis.
pub const INNER_MIN: usize = 1;
/// Exclusive upper bound of the logical region.
pub const INNER_MAX: usize = CS_P - 1;

/// Bits 1..=62 of a column mask: the logical region without the halo.
pub const LOGICAL_BITS: u64 = !(1u64 | (1u64 << (CS_P - 1)));

/// Default edge length of one voxel in world units.
pub const DEFAULT_VOXEL_SIZE: f32 = 0.5;

/// One of the six axis-aligned face directions.
///
/// The discriminant is the direction tag stored in packed quads and in the
/// per-vertex tags of expanded geometry. Output is always produced in this
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    /// All faces in output order (+X, -X, +Y, -Y, +Z, -Z).
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Face for a direction tag, `None` for tags above 5.
    pub fn from_index(index: usize) -> Option<Face> {
        Face::ALL.get(index).copied()
    }

    /// Axis perpendicular to the face (0 = X, 1 = Y, 2 = Z).
    #[inline]
    pub const fn axis(self) -> usize {
        self as usize / 2
    }

    /// Whether the outward normal points along the positive axis.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self as usize % 2 == 0
    }

    /// Outward unit normal.
    pub fn normal(self) -> [f32; 3] {
        let mut normal = [0.0; 3];
        normal[self.axis()] = if self.is_positive() { 1.0 } else { -1.0 };
        normal
    }

    /// Axis frame used to slice, merge and emit this face.
    pub const fn frame(self) -> FaceFrame {
        let (row_axis, col_axis) = match self.axis() {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        FaceFrame {
            axis: self.axis(),
            row_axis,
            col_axis,
            positive: self.is_positive(),
        }
    }
}

/// Axis mapping for one face direction.
///
/// A face is processed as a stack of planes (layers) along `axis`. Each plane
/// is a 2D mask whose rows run along `row_axis` and whose columns run along
/// `col_axis`; rectangles grow along columns first (width), then rows (height).
///
/// | face | rows | columns |
/// |------|------|---------|
/// | ±X   | y    | z       |
/// | ±Y   | x    | z       |
/// | ±Z   | x    | y       |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceFrame {
    pub axis: usize,
    pub row_axis: usize,
    pub col_axis: usize,
    pub positive: bool,
}

impl FaceFrame {
    /// Grid coordinates of the voxel at (layer, row, col).
    #[inline]
    pub fn voxel(&self, layer: usize, row: usize, col: usize) -> [usize; 3] {
        let mut p = [0; 3];
        p[self.axis] = layer;
        p[self.row_axis] = row;
        p[self.col_axis] = col;
        p
    }

    /// Grid coordinates of the neighbor one step along the outward normal.
    ///
    /// `layer` must lie in the logical range so the neighbor stays inside
    /// the padded grid.
    #[inline]
    pub fn neighbor(&self, layer: usize, row: usize, col: usize) -> [usize; 3] {
        let outward = if self.positive { layer + 1 } else { layer - 1 };
        self.voxel(outward, row, col)
    }

    /// Coordinate of the face plane for voxels in `layer`.
    #[inline]
    pub fn plane(&self, layer: usize) -> usize {
        if self.positive {
            layer + 1
        } else {
            layer
        }
    }

    /// Voxel layer whose faces lie on `plane`.
    #[inline]
    pub fn layer(&self, plane: usize) -> usize {
        if self.positive {
            plane - 1
        } else {
            plane
        }
    }

    /// Right-handed tangent pair: `tangents.0 × tangents.1` is the positive
    /// axis direction.
    #[inline]
    pub fn tangents(&self) -> (usize, usize) {
        ((self.axis + 1) % 3, (self.axis + 2) % 3)
    }
}

/// Expanded mesh geometry.
///
/// Every quad owns four fresh vertices; vertices are not shared between
/// quads.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshOutput {
    /// Vertex positions (3 floats per vertex).
    pub positions: Vec<f32>,
    /// Triangle indices (6 per quad).
    pub indices: Vec<u32>,
    /// Per-vertex `(material, face)` tags (2 floats per vertex).
    pub tags: Vec<f32>,
}

impl MeshOutput {
    /// Pre-allocate capacity for an estimated quad count.
    pub fn with_capacity(estimated_quads: usize) -> Self {
        let verts = estimated_quads * 4;
        Self {
            positions: Vec::with_capacity(verts * 3),
            indices: Vec::with_capacity(estimated_quads * 6),
            tags: Vec::with_capacity(verts * 2),
        }
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Clear all mesh data, keeping allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.indices.clear();
        self.tags.clear();
    }

    /// Position data as raw bytes for GPU upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Index data as raw bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Tag data as raw bytes for GPU upload.
    pub fn tag_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tags)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("voxel_size must be finite and > 0 (got {0})")]
    InvalidVoxelSize(f32),
    #[error("origin must be finite (got {0:?})")]
    NonFiniteOrigin([f32; 3]),
}

/// World-space placement of expanded geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshConfig {
    /// Edge length of one voxel in world units.
    pub voxel_size: f32,
    /// World position of grid coordinate (0, 0, 0).
    pub origin: [f32; 3],
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            voxel_size: DEFAULT_VOXEL_SIZE,
            origin: [0.0; 3],
        }
    }
}

impl MeshConfig {
    /// One world unit per voxel.
    pub fn unit() -> Self {
        Self {
            voxel_size: 1.0,
            ..Self::default()
        }
    }

    pub fn with_origin(mut self, origin: [f32; 3]) -> Self {
        self.origin = origin;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.voxel_size.is_finite() || self.voxel_size <= 0.0 {
            return Err(ConfigError::InvalidVoxelSize(self.voxel_size));
        }
        if self.origin.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::NonFiniteOrigin(self.origin));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_constants() {
        assert_eq!(CS_P, 64);
        assert_eq!(CS, 62);
        assert_eq!(CS_P2, 64 * 64);
        assert_eq!(CS_P3, 64 * 64 * 64);
        assert_eq!(INNER_MAX - INNER_MIN, CS);
    }

    #[test]
    fn logical_bits_exclude_halo() {
        assert_eq!(LOGICAL_BITS & 1, 0);
        assert_eq!(LOGICAL_BITS >> 63, 0);
        assert_eq!(LOGICAL_BITS.count_ones() as usize, CS);
    }

    #[test]
    fn face_order_and_axes() {
        for (i, face) in Face::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
            assert_eq!(Face::from_index(i), Some(*face));
        }
        assert_eq!(Face::from_index(6), None);
        assert_eq!(Face::NegY.axis(), 1);
        assert!(Face::PosZ.is_positive());
        assert!(!Face::NegX.is_positive());
        assert_eq!(Face::NegZ.normal(), [0.0, 0.0, -1.0]);
    }

    #[test]
    fn frame_axes_are_distinct() {
        for face in Face::ALL {
            let f = face.frame();
            let mut axes = [f.axis, f.row_axis, f.col_axis];
            axes.sort();
            assert_eq!(axes, [0, 1, 2], "{:?}", face);
        }
    }

    #[test]
    fn frame_voxel_and_neighbor() {
        let f = Face::PosY.frame();
        assert_eq!(f.voxel(5, 10, 20), [10, 5, 20]);
        assert_eq!(f.neighbor(5, 10, 20), [10, 6, 20]);

        let f = Face::NegZ.frame();
        assert_eq!(f.voxel(5, 10, 20), [10, 20, 5]);
        assert_eq!(f.neighbor(5, 10, 20), [10, 20, 4]);
    }

    #[test]
    fn frame_plane_layer_inverse() {
        for face in Face::ALL {
            let f = face.frame();
            for layer in INNER_MIN..INNER_MAX {
                assert_eq!(f.layer(f.plane(layer)), layer);
            }
        }
        assert_eq!(Face::PosX.frame().plane(3), 4);
        assert_eq!(Face::NegX.frame().plane(3), 3);
    }

    #[test]
    fn mesh_output_counts() {
        let mut mesh = MeshOutput::default();
        assert!(mesh.is_empty());

        mesh.positions.extend_from_slice(&[0.0; 12]);
        mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
        mesh.tags.extend_from_slice(&[0.0; 8]);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.quad_count(), 1);
        assert_eq!(mesh.position_bytes().len(), 48);
        assert_eq!(mesh.index_bytes().len(), 24);

        mesh.clear();
        assert!(mesh.is_empty());
    }

    #[test]
    fn config_validation() {
        assert!(MeshConfig::default().validate().is_ok());
        assert_eq!(MeshConfig::default().voxel_size, 0.5);
        assert_eq!(MeshConfig::unit().voxel_size, 1.0);

        let bad = MeshConfig { voxel_size: 0.0, ..MeshConfig::default() };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidVoxelSize(0.0)));

        let bad = MeshConfig::default().with_origin([f32::NAN, 0.0, 0.0]);
        assert!(matches!(bad.validate(), Err(ConfigError::NonFiniteOrigin(_))));
    }
}
