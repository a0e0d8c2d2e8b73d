//! Meshing many chunks in parallel with one scratch per worker gives the
//! same results as meshing them one by one.

use chunk_mesher::{mesh_chunk, mesh_chunk_quads, BinaryScratch, MeshConfig, ScanScratch, VoxelChunk, CS_P};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Rolling terrain with a few random blocks floating above it.
fn terrain_chunk(seed: u64) -> VoxelChunk {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut chunk = VoxelChunk::new();

    for z in 1..CS_P - 1 {
        for x in 1..CS_P - 1 {
            let height = rng.gen_range(8..24);
            let material = if height > 20 { 2 } else { 1 };
            chunk.fill_box([x, 1, z], [x + 1, height, z + 1], material).unwrap();
        }
    }
    for _ in 0..20 {
        let min = [rng.gen_range(1..50), rng.gen_range(30..50), rng.gen_range(1..50)];
        let max = [min[0] + rng.gen_range(1..10), min[1] + rng.gen_range(1..10), min[2] + rng.gen_range(1..10)];
        chunk.fill_box(min, max, rng.gen_range(3..6)).unwrap();
    }
    chunk
}

#[test]
fn parallel_packed_matches_sequential() {
    let chunks: Vec<VoxelChunk> = (0..16).map(terrain_chunk).collect();

    let sequential: Vec<Vec<u64>> = {
        let mut scratch = BinaryScratch::new();
        chunks
            .iter()
            .map(|chunk| mesh_chunk_quads(chunk.as_slice(), &mut scratch).to_vec())
            .collect()
    };

    let parallel: Vec<Vec<u64>> = chunks
        .par_iter()
        .map_init(BinaryScratch::new, |scratch, chunk| {
            mesh_chunk_quads(chunk.as_slice(), scratch).to_vec()
        })
        .collect();

    assert_eq!(sequential, parallel);
    assert!(sequential.iter().all(|quads| !quads.is_empty()));
}

#[test]
fn parallel_meshes_match_sequential() {
    let chunks: Vec<VoxelChunk> = (100..108).map(terrain_chunk).collect();
    let config = MeshConfig::default();

    let sequential: Vec<_> = {
        let mut scratch = ScanScratch::new();
        chunks
            .iter()
            .map(|chunk| mesh_chunk(chunk.as_slice(), &mut scratch, &config).clone())
            .collect()
    };

    let parallel: Vec<_> = chunks
        .par_iter()
        .map_init(ScanScratch::new, |scratch, chunk| {
            mesh_chunk(chunk.as_slice(), scratch, &config).clone()
        })
        .collect();

    assert_eq!(sequential, parallel);
}
