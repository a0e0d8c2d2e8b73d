//! WASM bindings for the chunk mesher.
//!
//! Provides JavaScript-accessible functions for meshing 64³ voxel chunks.
//! Each JS thread keeps its own mesher scratch, so repeated calls do not
//! reallocate working memory.

use std::cell::RefCell;

use chunk_mesher::{
    expand_packed_quads, mesh_chunk_quads as mesh_packed, scan_quads, BinaryScratch, ConfigError,
    MeshConfig, MeshOutput, MeshStats, QuadError, ScanScratch, VoxelGrid, PACKED_QUAD_VERSION,
};
use wasm_bindgen::prelude::*;

thread_local! {
    static SCAN_SCRATCH: RefCell<ScanScratch> = RefCell::new(ScanScratch::new());
    static BINARY_SCRATCH: RefCell<BinaryScratch> = RefCell::new(BinaryScratch::new());
}

/// Mesh result returned to JavaScript.
///
/// Contains vertex data ready for use with Three.js BufferGeometry. Tags hold
/// `(material, face)` per vertex; normals follow from the face index.
#[wasm_bindgen]
pub struct MeshResult {
    positions: Vec<f32>,
    indices: Vec<u32>,
    tags: Vec<f32>,
}

#[wasm_bindgen]
impl MeshResult {
    /// Get vertex positions (3 floats per vertex).
    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> Vec<f32> {
        self.positions.clone()
    }

    /// Get triangle indices.
    #[wasm_bindgen(getter)]
    pub fn indices(&self) -> Vec<u32> {
        self.indices.clone()
    }

    /// Get per-vertex `(material, face)` tags (2 floats per vertex).
    #[wasm_bindgen(getter)]
    pub fn tags(&self) -> Vec<f32> {
        self.tags.clone()
    }

    /// Number of vertices in the mesh.
    #[wasm_bindgen(getter)]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles in the mesh.
    #[wasm_bindgen(getter)]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh is empty (no geometry).
    #[wasm_bindgen(getter)]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl From<&MeshOutput> for MeshResult {
    fn from(output: &MeshOutput) -> Self {
        Self {
            positions: output.positions.clone(),
            indices: output.indices.clone(),
            tags: output.tags.clone(),
        }
    }
}

impl From<MeshOutput> for MeshResult {
    fn from(output: MeshOutput) -> Self {
        Self {
            positions: output.positions,
            indices: output.indices,
            tags: output.tags,
        }
    }
}

/// Mesh a 64³ chunk with the default voxel size (0.5) at the origin.
///
/// # Arguments
/// * `voxels` - 262144 material bytes (0 = empty), X-major order
///
/// # Example (JavaScript)
/// ```javascript
/// const voxels = new Uint8Array(64 * 64 * 64);
/// voxels[32 + 32 * 64 + 32 * 4096] = 1;
/// const result = mesh_chunk(voxels);
/// ```
#[wasm_bindgen]
pub fn mesh_chunk(voxels: &[u8]) -> MeshResult {
    mesh_with_config(voxels, &MeshConfig::default(), "mesh_chunk")
}

/// Mesh a 64³ chunk with an explicit voxel size and world origin.
///
/// Throws if the voxel size is not positive or any value is not finite.
#[wasm_bindgen]
pub fn mesh_chunk_with_config(
    voxels: &[u8],
    voxel_size: f32,
    origin_x: f32,
    origin_y: f32,
    origin_z: f32,
) -> Result<MeshResult, JsValue> {
    let config = config_from(voxel_size, origin_x, origin_y, origin_z).map_err(to_js_error)?;
    Ok(mesh_with_config(voxels, &config, "mesh_chunk_with_config"))
}

/// Mesh a 64³ chunk into packed 64-bit quads (bit-parallel path).
///
/// Returned as a `BigUint64Array`; see `packed_quad_version` for the layout.
#[wasm_bindgen]
pub fn mesh_chunk_quads(voxels: &[u8]) -> Vec<u64> {
    report_invalid(voxels, "mesh_chunk_quads");
    BINARY_SCRATCH.with(|scratch| mesh_packed(voxels, &mut scratch.borrow_mut()).to_vec())
}

/// Expand packed quads (as returned by `mesh_chunk_quads`) into geometry.
///
/// Throws on an invalid voxel size or an undecodable quad.
#[wasm_bindgen]
pub fn expand_quads(
    packed: &[u64],
    voxel_size: f32,
    origin_x: f32,
    origin_y: f32,
    origin_z: f32,
) -> Result<MeshResult, JsValue> {
    let config = config_from(voxel_size, origin_x, origin_y, origin_z).map_err(to_js_error)?;
    expand_with_config(packed, &config).map_err(to_js_error)
}

/// Version of the packed quad layout.
#[wasm_bindgen]
pub fn packed_quad_version() -> u32 {
    PACKED_QUAD_VERSION
}

/// Mesh statistics for debugging.
#[wasm_bindgen]
pub struct ChunkStats {
    quad_count: usize,
    face_count: usize,
    merge_efficiency: f32,
    quads_per_face: [usize; 6],
}

#[wasm_bindgen]
impl ChunkStats {
    #[wasm_bindgen(getter)]
    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    #[wasm_bindgen(getter)]
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    #[wasm_bindgen(getter)]
    pub fn merge_efficiency(&self) -> f32 {
        self.merge_efficiency
    }

    /// Quad counts as [+X, -X, +Y, -Y, +Z, -Z].
    #[wasm_bindgen(getter)]
    pub fn quads_per_face(&self) -> Vec<usize> {
        self.quads_per_face.to_vec()
    }
}

impl From<MeshStats> for ChunkStats {
    fn from(stats: MeshStats) -> Self {
        Self {
            quad_count: stats.quad_count,
            face_count: stats.face_count,
            merge_efficiency: stats.merge_efficiency,
            quads_per_face: stats.quads_per_face,
        }
    }
}

/// Merge statistics for a chunk, without building geometry.
#[wasm_bindgen]
pub fn mesh_chunk_stats(voxels: &[u8]) -> ChunkStats {
    report_invalid(voxels, "mesh_chunk_stats");
    SCAN_SCRATCH.with(|scratch| {
        let mut scratch = scratch.borrow_mut();
        MeshStats::from_quads(scan_quads(voxels, &mut scratch)).into()
    })
}

/// Mesh a chunk and return `[MeshResult, ChunkStats]`.
#[wasm_bindgen]
pub fn mesh_chunk_with_stats(voxels: &[u8]) -> js_sys::Array {
    let mesh = mesh_with_config(voxels, &MeshConfig::default(), "mesh_chunk_with_stats");
    let stats = SCAN_SCRATCH.with(|scratch| ChunkStats::from(MeshStats::from_quads(scratch.borrow().quads())));

    let result = js_sys::Array::new();
    result.push(&JsValue::from(mesh));
    result.push(&JsValue::from(stats));
    result
}

fn mesh_with_config(voxels: &[u8], config: &MeshConfig, context: &str) -> MeshResult {
    report_invalid(voxels, context);
    SCAN_SCRATCH.with(|scratch| {
        let mut scratch = scratch.borrow_mut();
        chunk_mesher::mesh_chunk(voxels, &mut scratch, config).into()
    })
}

fn expand_with_config(packed: &[u64], config: &MeshConfig) -> Result<MeshResult, QuadError> {
    let mut output = MeshOutput::with_capacity(packed.len());
    expand_packed_quads(packed, config, &mut output)?;
    Ok(output.into())
}

fn config_from(voxel_size: f32, origin_x: f32, origin_y: f32, origin_z: f32) -> Result<MeshConfig, ConfigError> {
    let config = MeshConfig {
        voxel_size,
        origin: [origin_x, origin_y, origin_z],
    };
    config.validate()?;
    Ok(config)
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Log rejected buffers; the mesher itself silently returns nothing.
fn report_invalid(voxels: &[u8], context: &str) {
    if let Some(message) = invalid_message(voxels, context) {
        log(&message);
    }
}

fn invalid_message(voxels: &[u8], context: &str) -> Option<String> {
    VoxelGrid::new(voxels).err().map(|err| format!("{context}: {err}"))
}

// Logging support

thread_local! {
    static LOG_ENABLED: std::cell::Cell<bool> = std::cell::Cell::new(false);
}

/// Enable or disable console logging.
#[wasm_bindgen]
pub fn set_log_enabled(enabled: bool) {
    LOG_ENABLED.with(|flag| flag.set(enabled));
}

fn log(message: &str) {
    if LOG_ENABLED.with(|enabled| enabled.get()) {
        web_sys::console::log_1(&message.into());
    }
}

/// Get the version of the mesher library.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
