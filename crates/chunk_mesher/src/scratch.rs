//! Reusable per-caller working memory.
//!
//! Each meshing call resets the scratch it is given and leaves its results
//! inside it, so a thread that keeps one scratch value alive meshes without
//! reallocating. Scratch values are never shared between threads; give each
//! worker its own.

use crate::core::{MaterialId, MeshOutput, CS, CS_P2, CS_P3};
use crate::cull::FaceMasks;
use crate::merge::PlaneRows;
use crate::quad::Quad;

/// Working memory for the scan pipeline.
#[derive(Clone)]
pub struct ScanScratch {
    /// One plane's face mask, `CS × CS`.
    pub(crate) mask: Vec<MaterialId>,
    pub(crate) quads: Vec<Quad>,
    pub(crate) mesh: MeshOutput,
}

impl ScanScratch {
    pub fn new() -> Self {
        Self {
            mask: vec![0; CS * CS],
            quads: Vec::new(),
            mesh: MeshOutput::default(),
        }
    }

    /// Reset outputs, keeping allocations.
    pub fn clear(&mut self) {
        self.quads.clear();
        self.mesh.clear();
    }

    /// Quads from the last call.
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Geometry from the last [`mesh_chunk`](crate::mesh::mesh_chunk) call.
    pub fn mesh(&self) -> &MeshOutput {
        &self.mesh
    }
}

impl Default for ScanScratch {
    fn default() -> Self {
        Self::new()
    }
}

/// Working memory for the bit-parallel pipeline.
#[derive(Clone)]
pub struct BinaryScratch {
    /// Input re-laid-out as ZXY.
    pub(crate) voxels: Box<[MaterialId]>,
    /// Occupancy mask per (x, y) column.
    pub(crate) opaque: Box<[u64]>,
    pub(crate) face_masks: FaceMasks,
    /// Z-face masks regrouped by plane: `[z * CS_P + x]`, bit `y`.
    pub(crate) transposed: Box<[u64]>,
    pub(crate) plane: PlaneRows,
    pub(crate) face_quads: [Vec<u64>; 6],
    pub(crate) quads: Vec<u64>,
}

impl BinaryScratch {
    pub fn new() -> Self {
        Self {
            voxels: vec![0; CS_P3].into_boxed_slice(),
            opaque: vec![0; CS_P2].into_boxed_slice(),
            face_masks: FaceMasks::new(),
            transposed: vec![0; CS_P2].into_boxed_slice(),
            plane: PlaneRows::new(),
            face_quads: Default::default(),
            quads: Vec::new(),
        }
    }

    /// Reset outputs, keeping allocations.
    pub fn clear(&mut self) {
        for quads in &mut self.face_quads {
            quads.clear();
        }
        self.quads.clear();
    }

    /// Packed quads from the last call.
    pub fn quads(&self) -> &[u64] {
        &self.quads
    }
}

impl Default for BinaryScratch {
    fn default() -> Self {
        Self::new()
    }
}
