/// Render-ready buffers and the model matrix
///
/// Everything here is a pure function of the mesh's current state; call it
/// again after any explosion change to get fresh buffers.
use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Vector3};
use std::mem::{offset_of, size_of};

use crate::bounds::BoundingInfo;
use crate::mesh::Mesh;
use crate::transform::Transform;

/// Interleaved vertex as uploaded to a GPU or fed to a rasterizer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub face_centroid: [f32; 3],
}

/// One attribute of [`RenderVertex`], for describing the buffer layout to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub location: u32,
    pub offset: usize,
    pub components: usize,
}

pub const VERTEX_STRIDE: usize = size_of::<RenderVertex>();

pub const VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        name: "position",
        location: 0,
        offset: offset_of!(RenderVertex, position),
        components: 3,
    },
    VertexAttribute {
        name: "normal",
        location: 1,
        offset: offset_of!(RenderVertex, normal),
        components: 3,
    },
    VertexAttribute {
        name: "face_centroid",
        location: 2,
        offset: offset_of!(RenderVertex, face_centroid),
        components: 3,
    },
];

/// Vertex and index buffers ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffers {
    pub vertices: Vec<RenderVertex>,
    pub indices: Vec<u32>,
}

impl RenderBuffers {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// One render vertex per model vertex, in model order.
pub fn render_vertices(mesh: &Mesh) -> Vec<RenderVertex> {
    mesh.model()
        .positions()
        .zip(mesh.normals())
        .zip(mesh.face_centroids())
        .map(|((position, normal), centroid)| RenderVertex {
            position: position.into(),
            normal: (*normal).into(),
            face_centroid: (*centroid).into(),
        })
        .collect()
}

pub fn render_buffers(mesh: &Mesh) -> RenderBuffers {
    RenderBuffers {
        vertices: render_vertices(mesh),
        indices: mesh.indices().to_vec(),
    }
}

/// `translate(-centroid) * scale(1 / radius) * rotate(degrees, axis)`.
///
/// Point-like bounds are not scaled and a zero axis does not rotate.
pub fn model_matrix(bounds: &BoundingInfo, degrees: f32, axis: &Vector3<f32>) -> Matrix4<f32> {
    Transform::translation_matrix(&-bounds.centroid.coords)
        * Transform::scale_matrix(bounds.fit_scale())
        * Transform::rotation_about(degrees, axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use nalgebra::Point3;

    #[test]
    fn test_layout() {
        assert_eq!(VERTEX_STRIDE, 36);
        let offsets: Vec<_> = VERTEX_ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
    }

    #[test]
    fn test_buffers_follow_mesh() {
        let mut mesh = Mesh::new(Model::cube(2.0));
        let buffers = render_buffers(&mesh);
        assert_eq!(buffers.vertices.len(), mesh.vertex_count());
        assert_eq!(buffers.indices, mesh.indices());
        assert_eq!(buffers.vertex_bytes().len(), mesh.vertex_count() * VERTEX_STRIDE);
        assert_eq!(buffers.index_bytes().len(), mesh.indices().len() * 4);
        assert_eq!(buffers.vertices[6].position, [1.0, 1.0, 1.0]);

        mesh.initialize_explosion();
        mesh.set_explode_factor(1.0);
        let exploded = render_buffers(&mesh);
        assert_ne!(exploded.vertices, buffers.vertices);
        assert_eq!(exploded.indices, buffers.indices);
    }

    #[test]
    fn test_model_matrix_unit_cube() {
        let bounds = BoundingInfo::from_extents(Model::cube(1.0).extents());
        let m = model_matrix(&bounds, 0.0, &Vector3::x());
        let p = Transform::apply(&m, &Point3::new(0.5, 0.0, 0.0));
        assert!((p - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_model_matrix_composition_order() {
        let bounds = BoundingInfo {
            centroid: Point3::new(1.0, 2.0, 3.0),
            radius: 2.0,
        };
        let m = model_matrix(&bounds, 90.0, &Vector3::z());
        // Rotate, then scale by 1/2, then translate by -centroid.
        let p = Transform::apply(&m, &Point3::new(2.0, 0.0, 0.0));
        assert!((p - Point3::new(-1.0, -1.0, -3.0)).norm() < 1e-5);
    }
}
