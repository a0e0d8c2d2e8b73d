//! Main meshing pipelines.
//!
//! Scan pipeline ([`scan_quads`], [`mesh_chunk`]):
//! 1. Per face and plane, build a material mask of visible faces
//! 2. Greedy merge the mask into quads
//! 3. Expand quads to vertex arrays
//!
//! Bit-parallel pipeline ([`mesh_chunk_quads`]):
//! 1. Re-layout to ZXY and build column occupancy masks
//! 2. Bitwise face culling
//! 3. Greedy merge on row words, packing each quad into a `u64`
//!
//! A buffer that is not exactly `CS_P³` bytes yields an empty result.

use crate::convert::{build_opaque_masks, relayout_zxy, zxy_index};
use crate::core::{Face, MeshConfig, MeshOutput, CS_P, INNER_MAX, INNER_MIN};
use crate::cull::{build_face_mask, cull_faces, FaceMasks};
use crate::expand::expand_quads;
use crate::grid::VoxelGrid;
use crate::merge::{greedy_merge_mask, greedy_merge_rows};
use crate::quad::{PackedQuad, Quad, QuadError};
use crate::scratch::{BinaryScratch, ScanScratch};

/// Merge a grid into quads with the scan strategy.
///
/// Quads are ordered by face (+X, -X, +Y, -Y, +Z, -Z), then plane, then
/// row-major within the plane.
///
/// # Arguments
/// * `voxels` - `CS_P³` material bytes, X fastest
/// * `scratch` - Caller-owned working memory; holds the result
pub fn scan_quads<'s>(voxels: &[u8], scratch: &'s mut ScanScratch) -> &'s [Quad] {
    scratch.clear();
    if let Ok(grid) = VoxelGrid::new(voxels) {
        collect_scan_quads(grid, scratch);
    }

    log::trace!(target: "perf", "mesher_scan quads={}", scratch.quads.len());
    &scratch.quads
}

fn collect_scan_quads(grid: VoxelGrid<'_>, scratch: &mut ScanScratch) {
    // Early exit for empty chunks
    if grid.is_empty() {
        return;
    }

    let ScanScratch { mask, quads, .. } = scratch;
    for face in Face::ALL {
        for layer in INNER_MIN..INNER_MAX {
            if build_face_mask(grid, face, layer, mask) == 0 {
                continue;
            }
            greedy_merge_mask(mask, |rect| quads.push(rect.to_quad(face, layer)));
        }
    }
}

/// Mesh a grid into expanded geometry (positions, indices, tags).
///
/// # Arguments
/// * `voxels` - `CS_P³` material bytes, X fastest
/// * `scratch` - Caller-owned working memory; holds the result
/// * `config` - Voxel size and world origin
///
/// # Example
/// ```
/// use chunk_mesher::{mesh_chunk, MeshConfig, ScanScratch, VoxelChunk};
///
/// let mut chunk = VoxelChunk::new();
/// chunk.set(32, 32, 32, 1).unwrap();
///
/// let mut scratch = ScanScratch::new();
/// let mesh = mesh_chunk(chunk.as_slice(), &mut scratch, &MeshConfig::default());
/// assert_eq!(mesh.triangle_count(), 12); // 6 faces × 2 triangles
/// ```
pub fn mesh_chunk<'s>(voxels: &[u8], scratch: &'s mut ScanScratch, config: &MeshConfig) -> &'s MeshOutput {
    scratch.clear();
    if let Ok(grid) = VoxelGrid::new(voxels) {
        collect_scan_quads(grid, scratch);
        expand_quads(&scratch.quads, config, &mut scratch.mesh);
    }

    log::trace!(
        target: "perf",
        "mesher_scan_mesh quads={} vertices={}",
        scratch.quads.len(),
        scratch.mesh.vertex_count()
    );
    &scratch.mesh
}

/// Mesh a grid into packed quads with the bit-parallel strategy.
///
/// Produces the same quads in the same order as [`scan_quads`], each packed
/// as described in [`crate::quad`].
///
/// # Arguments
/// * `voxels` - `CS_P³` material bytes, X fastest
/// * `scratch` - Caller-owned working memory; holds the result
pub fn mesh_chunk_quads<'s>(voxels: &[u8], scratch: &'s mut BinaryScratch) -> &'s [u64] {
    scratch.clear();
    if let Ok(grid) = VoxelGrid::new(voxels) {
        collect_binary_quads(grid, scratch);
    }

    log::trace!(target: "perf", "mesher_binary quads={}", scratch.quads.len());
    &scratch.quads
}

fn collect_binary_quads(grid: VoxelGrid<'_>, scratch: &mut BinaryScratch) {
    // Step 1: column masks
    relayout_zxy(grid, &mut scratch.voxels);
    build_opaque_masks(&scratch.voxels, &mut scratch.opaque);

    // Early exit for empty chunks
    if scratch.opaque.iter().all(|&m| m == 0) {
        return;
    }

    // Step 2: face culling
    cull_faces(&scratch.opaque, &mut scratch.face_masks);

    // Step 3: greedy merge per face
    for face in Face::ALL {
        merge_face(face, scratch);
    }

    let BinaryScratch { face_quads, quads, .. } = scratch;
    quads.reserve(face_quads.iter().map(Vec::len).sum());
    for face in Face::ALL {
        quads.extend(
            face_quads[face.index()]
                .iter()
                .map(|&q| PackedQuad(q).with_face(face).0),
        );
    }
}

/// Merge every plane of one face into `face_quads[face]`.
fn merge_face(face: Face, scratch: &mut BinaryScratch) {
    let BinaryScratch {
        voxels,
        face_masks,
        transposed,
        plane,
        face_quads,
        ..
    } = scratch;
    let voxels = &**voxels;
    let frame = face.frame();
    let out = &mut face_quads[face.index()];

    if frame.axis == 2 {
        transpose_z_face(face_masks, face, transposed);
    }

    for layer in INNER_MIN..INNER_MAX {
        plane.clear();
        for row in INNER_MIN..INNER_MAX {
            plane.rows[row] = match frame.axis {
                // X faces: layer = x, rows = y, columns = z
                0 => face_masks.get(face, layer, row),
                // Y faces: layer = y, rows = x, columns = z
                1 => face_masks.get(face, row, layer),
                // Z faces: layer = z, rows = x, columns = y
                _ => transposed[layer * CS_P + row],
            };
        }
        if plane.is_empty() {
            continue;
        }

        greedy_merge_rows(
            plane,
            |row, col| {
                let [x, y, z] = frame.voxel(layer, row, col);
                voxels[zxy_index(x, y, z)]
            },
            |rect| out.push(rect.to_packed(face, layer).0),
        );
    }
}

/// Regroup a Z face's column masks by plane: `out[z * CS_P + x]`, bit `y`.
fn transpose_z_face(masks: &FaceMasks, face: Face, out: &mut [u64]) {
    out.fill(0);
    for y in INNER_MIN..INNER_MAX {
        for x in INNER_MIN..INNER_MAX {
            let mut bits = masks.get(face, x, y);
            while bits != 0 {
                let z = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                out[z * CS_P + x] |= 1 << y;
            }
        }
    }
}

/// Statistics about a mesh result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshStats {
    /// Total number of quads generated
    pub quad_count: usize,
    /// Quads per face direction
    pub quads_per_face: [usize; 6],
    /// Visible voxel faces covered by the quads
    pub face_count: usize,
    /// Merge efficiency (1.0 = perfect merging, 0.0 = no merging)
    pub merge_efficiency: f32,
}

impl MeshStats {
    pub fn from_quads(quads: &[Quad]) -> Self {
        let mut stats = MeshStats::default();
        for quad in quads {
            stats.quads_per_face[quad.face.index()] += 1;
            stats.face_count += quad.area() as usize;
        }
        stats.quad_count = quads.len();
        stats.merge_efficiency = if stats.face_count > 0 {
            1.0 - (stats.quad_count as f32 / stats.face_count as f32)
        } else {
            0.0
        };
        stats
    }

    /// Statistics for packed quads; fails on the first undecodable value.
    pub fn from_packed(packed: &[u64]) -> Result<Self, QuadError> {
        let quads = packed
            .iter()
            .map(|&raw| Quad::unpack(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_quads(&quads))
    }
}
