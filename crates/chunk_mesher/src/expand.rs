//! Quad expansion to vertex arrays.
//!
//! Every quad becomes 4 fresh vertices, 6 indices (two triangles) and one
//! `(material, face)` tag per vertex. Corners are ordered so that
//! `cross(v1 - v0, v2 - v0)` points along the face's outward normal for both
//! triangles `(0, 1, 2)` and `(0, 2, 3)`.

use crate::core::{MeshConfig, MeshOutput};
use crate::quad::{Quad, QuadError};

/// Triangle order within a quad.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Grid-space corners of a quad, in winding order.
///
/// Corners walk the right-handed tangent pair `(u, v)` of the face axis:
/// `(0,0) (1,0) (1,1) (0,1)` for positive faces and the mirrored
/// `(0,0) (0,1) (1,1) (1,0)` for negative ones.
pub fn quad_corners(quad: &Quad) -> [[u32; 3]; 4] {
    let frame = quad.face.frame();
    let base = quad.base();

    let mut extent = [0u32; 3];
    extent[frame.row_axis] = quad.height();
    extent[frame.col_axis] = quad.width();

    let (u, v) = frame.tangents();
    let corner = |du: bool, dv: bool| {
        let mut p = base;
        if du {
            p[u] += extent[u];
        }
        if dv {
            p[v] += extent[v];
        }
        p
    };

    if frame.positive {
        [corner(false, false), corner(true, false), corner(true, true), corner(false, true)]
    } else {
        [corner(false, false), corner(false, true), corner(true, true), corner(true, false)]
    }
}

/// Append one quad to `output`.
///
/// # Arguments
/// * `quad` - Quad to emit
/// * `config` - Voxel size and world origin
/// * `output` - Mesh being built; indices continue its vertex list
pub fn emit_quad(quad: &Quad, config: &MeshConfig, output: &mut MeshOutput) {
    let base_vertex = output.vertex_count() as u32;
    let tag = [quad.material as f32, quad.face.index() as f32];

    for corner in quad_corners(quad) {
        for axis in 0..3 {
            output
                .positions
                .push(config.origin[axis] + corner[axis] as f32 * config.voxel_size);
        }
        output.tags.extend_from_slice(&tag);
    }

    output
        .indices
        .extend(QUAD_INDICES.iter().map(|i| base_vertex + i));
}

/// Append a list of quads to `output`.
pub fn expand_quads(quads: &[Quad], config: &MeshConfig, output: &mut MeshOutput) {
    output.positions.reserve(quads.len() * 12);
    output.indices.reserve(quads.len() * 6);
    output.tags.reserve(quads.len() * 8);

    for quad in quads {
        emit_quad(quad, config, output);
    }
}

/// Decode packed quads and append their geometry to `output`.
///
/// On the first undecodable value the error is returned and `output` is left
/// as it was before the call.
pub fn expand_packed_quads(packed: &[u64], config: &MeshConfig, output: &mut MeshOutput) -> Result<(), QuadError> {
    let (positions, indices, tags) = (output.positions.len(), output.indices.len(), output.tags.len());

    for &raw in packed {
        match Quad::unpack(raw) {
            Ok(quad) => emit_quad(&quad, config, output),
            Err(err) => {
                output.positions.truncate(positions);
                output.indices.truncate(indices);
                output.tags.truncate(tags);
                return Err(err);
            }
        }
    }
    Ok(())
}
