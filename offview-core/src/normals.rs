/// Per-vertex normals and face centroids derived from triangle topology
use nalgebra::{Point3, Vector3};

use crate::model::Vertex;

/// Accumulated normals shorter than this are left as zero vectors.
pub const NORMAL_EPSILON: f32 = 1e-4;

/// Unnormalized face normal `(b - a) x (c - a)`. Its length is twice the triangle area.
pub fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    (b - a).cross(&(c - a))
}

/// Smooth vertex normals for an indexed triangle list.
///
/// Face normals are summed without normalizing first, so larger triangles
/// weigh more. Each vertex's `incident_faces` counter is recomputed along the
/// way. A vertex whose summed normal is shorter than [`NORMAL_EPSILON`]
/// (unreferenced, or surrounded by cancelling faces) gets exactly zero.
pub fn vertex_normals(vertices: &mut [Vertex], indices: &[u32]) -> Vec<Vector3<f32>> {
    let mut normals = vec![Vector3::zeros(); vertices.len()];
    for vertex in vertices.iter_mut() {
        vertex.incident_faces = 0;
    }

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let n = face_normal(
            &vertices[a].position,
            &vertices[b].position,
            &vertices[c].position,
        );
        for i in [a, b, c] {
            normals[i] += n;
            vertices[i].incident_faces += 1;
        }
    }

    for normal in &mut normals {
        let length = normal.norm();
        *normal = if length >= NORMAL_EPSILON {
            *normal / length
        } else {
            Vector3::zeros()
        };
    }
    normals
}

/// Per-vertex mean of the centroids of the triangles that use the vertex.
///
/// A vertex used by no triangle gets its own position.
pub fn face_centroids(vertices: &[Vertex], indices: &[u32]) -> Vec<Point3<f32>> {
    let mut sums = vec![Vector3::zeros(); vertices.len()];
    let mut counts = vec![0u32; vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let centroid = (vertices[a].position.coords
            + vertices[b].position.coords
            + vertices[c].position.coords)
            / 3.0;
        for i in [a, b, c] {
            sums[i] += centroid;
            counts[i] += 1;
        }
    }

    vertices
        .iter()
        .zip(sums.iter().zip(&counts))
        .map(|(vertex, (sum, &count))| match count {
            0 => vertex.position,
            n => Point3::from(sum / n as f32),
        })
        .collect()
}
