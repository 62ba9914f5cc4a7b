//! CPU-side geometry for the mesh and its point-cloud twin.

use std::f32::consts::{PI, TAU};

/// Interleaved-free vertex data ready for `bufferData`.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// xyz per vertex
    pub positions: Vec<f32>,
    /// xyz per vertex, unit length
    pub normals: Vec<f32>,
    /// one value in [0, 1) per vertex, used to jitter point sizes
    pub seeds: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Cheap integer hash to a float in [0, 1).
fn seed(i: u32) -> f32 {
    let mut x = i.wrapping_mul(0x9E37_79B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    (x >> 8) as f32 / (1u32 << 24) as f32
}

/// UV sphere with `segments` around and `rings` pole to pole. The seam column
/// is duplicated so every quad has its own vertices.
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let count = ((segments + 1) * (rings + 1)) as usize;
    let mut mesh = MeshData {
        positions: Vec::with_capacity(count * 3),
        normals: Vec::with_capacity(count * 3),
        seeds: Vec::with_capacity(count),
        indices: Vec::with_capacity((segments * rings * 6) as usize),
    };

    for r in 0..=rings {
        let theta = r as f32 / rings as f32 * PI;
        let (st, ct) = theta.sin_cos();
        for s in 0..=segments {
            let phi = s as f32 / segments as f32 * TAU;
            let (sp, cp) = phi.sin_cos();
            let n = [st * cp, ct, st * sp];
            mesh.normals.extend_from_slice(&n);
            mesh.positions.extend(n.iter().map(|c| c * radius));
            mesh.seeds.push(seed(r * (segments + 1) + s));
        }
    }

    let stride = segments + 1;
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            mesh.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    mesh
}
