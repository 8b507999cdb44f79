/// Processed mesh: model plus everything derived from it for rendering
use nalgebra::{Point3, Vector3};
use std::fmt;
use std::path::Path;

use crate::bounds::BoundingInfo;
use crate::error::LoadError;
use crate::explosion::Explosion;
use crate::model::{Extents, Model, ModelId};
use crate::normals;
use crate::triangulate;

/// A loaded model with its index buffer, normals, face centroids and bounds.
///
/// Owns the explosion state for its model, so the position snapshot lives
/// and dies with the mesh. A clone carries a new [`ModelId`].
#[derive(Debug, Clone)]
pub struct Mesh {
    pub(crate) model: Model,
    indices: Vec<u32>,
    pub(crate) normals: Vec<Vector3<f32>>,
    pub(crate) face_centroids: Vec<Point3<f32>>,
    bounds: BoundingInfo,
    pub(crate) explosion: Explosion,
}

impl Mesh {
    pub fn new(model: Model) -> Self {
        let indices = triangulate::triangulate(model.polygons());
        let bounds = BoundingInfo::from_extents(model.extents());

        let mut mesh = Self {
            model,
            indices,
            normals: Vec::new(),
            face_centroids: Vec::new(),
            bounds,
            explosion: Explosion::default(),
        };
        mesh.refresh_derived();

        tracing::info!(
            "{}: {} vertices, {} triangles, radius {:.4}",
            mesh.id(),
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.bounds.radius
        );
        mesh
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Model::load(path).map(Self::new)
    }

    /// Recompute normals and face centroids from the current positions.
    pub(crate) fn refresh_derived(&mut self) {
        self.normals = normals::vertex_normals(self.model.vertices_mut(), &self.indices);
        self.face_centroids = normals::face_centroids(self.model.vertices(), &self.indices);
    }

    pub fn id(&self) -> ModelId {
        self.model.id()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Triangle list, three indices per triangle.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn face_centroids(&self) -> &[Point3<f32>] {
        &self.face_centroids
    }

    /// Bounds of the positions as loaded. Explosion does not move them.
    pub fn bounds(&self) -> &BoundingInfo {
        &self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.model.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn stats(&self) -> MeshStats {
        MeshStats {
            vertices: self.vertex_count(),
            polygons: self.model.polygon_count(),
            triangles: self.triangle_count(),
            extents: *self.model.extents(),
            bounds: self.bounds,
        }
    }
}

/// Summary numbers for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStats {
    pub vertices: usize,
    pub polygons: usize,
    pub triangles: usize,
    pub extents: Extents,
    pub bounds: BoundingInfo,
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = (self.extents.min, self.extents.max);
        writeln!(f, "vertices:  {}", self.vertices)?;
        writeln!(f, "polygons:  {}", self.polygons)?;
        writeln!(f, "triangles: {}", self.triangles)?;
        writeln!(
            f,
            "extents:   [{:.4}, {:.4}, {:.4}] .. [{:.4}, {:.4}, {:.4}]",
            min.x, min.y, min.z, max.x, max.y, max.z
        )?;
        let c = self.bounds.centroid;
        write!(
            f,
            "bounds:    center ({:.4}, {:.4}, {:.4}), radius {:.4}",
            c.x, c.y, c.z, self.bounds.radius
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::off::parse_off;

    const TETRA: &str = include_str!("../../models/tetrahedron.off");

    #[test]
    fn test_tetrahedron_scenario() {
        let mesh = Mesh::new(parse_off(TETRA).unwrap());
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices().len(), 12);
        assert_eq!(mesh.triangle_count(), 4);

        // Each vertex normal points away from the solid's vertex mean.
        let center = mesh.model().positions().map(|p| p.coords).sum::<Vector3<f32>>() / 4.0;
        for (p, n) in mesh.model().positions().zip(mesh.normals()) {
            assert!((n.norm() - 1.0).abs() < 1e-5);
            assert!(n.dot(&(p.coords - center)) > 0.0);
        }
        assert!(mesh.model().vertices().iter().all(|v| v.incident_faces == 3));
    }

    #[test]
    fn test_clone_is_a_new_mesh() {
        let mut mesh = Mesh::new(Model::cube(1.0));
        mesh.initialize_explosion();
        let copy = mesh.clone();
        assert_ne!(copy.id(), mesh.id());
        assert_eq!(copy.explosion_state(), mesh.explosion_state());
        assert_eq!(copy.indices(), mesh.indices());
    }

    #[test]
    fn test_index_buffer_invariants() {
        let mesh = Mesh::new(Model::cube(3.0));
        assert_eq!(mesh.indices().len() % 3, 0);
        assert!(mesh
            .indices()
            .iter()
            .all(|&i| (i as usize) < mesh.vertex_count()));
        assert_eq!(mesh.normals().len(), mesh.vertex_count());
        assert_eq!(mesh.face_centroids().len(), mesh.vertex_count());
    }

    #[test]
    fn test_stats() {
        let stats = Mesh::new(Model::cube(1.0)).stats();
        assert_eq!(stats.vertices, 8);
        assert_eq!(stats.polygons, 6);
        assert_eq!(stats.triangles, 12);
        assert!(stats.to_string().contains("triangles: 12"));
    }

    #[test]
    fn test_octahedron_normals_match_positions() {
        let mesh = Mesh::new(parse_off(include_str!("../../models/octahedron.off")).unwrap());
        assert_eq!(mesh.triangle_count(), 8);
        for (p, n) in mesh.model().positions().zip(mesh.normals()) {
            assert!((n - p.coords).norm() < 1e-5, "{n:?} vs {p:?}");
        }
        assert_eq!(mesh.bounds().centroid, Point3::origin());
        assert_eq!(mesh.bounds().radius, 1.0);
    }

    #[test]
    fn test_point_cloud_has_no_triangles() {
        let mesh = Mesh::new(parse_off("OFF\n2 0 0\n0 0 0\n1 1 1\n").unwrap());
        assert!(mesh.indices().is_empty());
        assert!(mesh.normals().iter().all(|n| *n == Vector3::zeros()));
        assert_eq!(mesh.face_centroids()[1], Point3::new(1.0, 1.0, 1.0));
    }
}
