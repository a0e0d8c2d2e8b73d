//! Greedy meshing for 64³ voxel chunks.
//!
//! A chunk is a padded 64³ grid of material bytes: coordinates 1..=62 are
//! meshed, the one-voxel halo around them is only read to cull faces. Visible
//! faces are merged into maximal same-material rectangles by one of two
//! strategies with identical output:
//!
//! - scan: per-plane material masks, expanded to vertex/index/tag arrays
//! - bit-parallel: 64-bit column and row words, emitted as packed `u64` quads
//!
//! # Example
//!
//! ```
//! use chunk_mesher::{mesh_chunk_quads, scan_quads, BinaryScratch, Quad, ScanScratch, VoxelChunk};
//!
//! let mut chunk = VoxelChunk::new();
//! chunk.fill_box([10, 20, 5], [12, 23, 6], 7).unwrap();
//!
//! let mut scan = ScanScratch::new();
//! let mut binary = BinaryScratch::new();
//!
//! let quads = scan_quads(chunk.as_slice(), &mut scan);
//! let packed = mesh_chunk_quads(chunk.as_slice(), &mut binary);
//!
//! assert_eq!(quads.len(), 6);
//! for (quad, &raw) in quads.iter().zip(packed) {
//!     assert_eq!(Quad::unpack(raw), Ok(*quad));
//! }
//! ```

pub mod core;
pub mod grid;
pub mod quad;
pub mod convert;
pub mod cull;
pub mod merge;
pub mod expand;
pub mod scratch;
pub mod mesh;

// Re-export primary types
pub use crate::core::{
    ConfigError,
    Face,
    FaceFrame,
    MaterialId,
    MeshConfig,
    MeshOutput,
    // Constants
    CS_P, CS, CS_P2, CS_P3,
    MATERIAL_EMPTY, DEFAULT_VOXEL_SIZE,
};
pub use crate::grid::{voxel_index, GridError, VoxelChunk, VoxelGrid};
pub use crate::quad::{PackedQuad, Quad, QuadError, PACKED_QUAD_VERSION};
pub use crate::scratch::{BinaryScratch, ScanScratch};

// Re-export main entry points
pub use crate::mesh::{mesh_chunk, mesh_chunk_quads, scan_quads, MeshStats};
pub use crate::expand::{expand_packed_quads, expand_quads};
