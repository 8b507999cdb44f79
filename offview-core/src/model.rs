/// Polygon-soup model as loaded from an OFF file
use nalgebra::Point3;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::LoadError;
use crate::off;

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

/// Stable handle issued once per model. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u64);

impl ModelId {
    fn next() -> Self {
        Self(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model#{}", self.0)
    }
}

/// A model vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    /// Number of triangles referencing this vertex, filled in by the normal pass.
    pub incident_faces: u32,
}

impl Vertex {
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            incident_faces: 0,
        }
    }
}

/// An ordered loop of at least three vertex indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    indices: Vec<u32>,
}

impl Polygon {
    pub(crate) fn new(indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() >= 3);
        Self { indices }
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Axis-aligned extents of the vertex positions at load time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
    /// Largest of the three axis ranges.
    pub extent: f32,
}

impl Extents {
    /// Single scan over the given points. Empty input yields zero extents at the origin.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f32>>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self {
                min: Point3::origin(),
                max: Point3::origin(),
                extent: 0.0,
            };
        };

        let (min, max) = points.fold((*first, *first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
        let extent = (max - min).max();

        Self { min, max, extent }
    }
}

/// Vertices, polygons and extents of a loaded mesh.
///
/// A clone is a new model and gets its own [`ModelId`].
#[derive(Debug)]
pub struct Model {
    id: ModelId,
    vertices: Vec<Vertex>,
    polygons: Vec<Polygon>,
    extents: Extents,
}

impl Clone for Model {
    fn clone(&self) -> Self {
        Self {
            id: ModelId::next(),
            vertices: self.vertices.clone(),
            polygons: self.polygons.clone(),
            extents: self.extents,
        }
    }
}

impl Model {
    /// Read and parse an OFF file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = off::parse_off(&text).map_err(|source| LoadError::Format {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            "Loaded {} from {}: {} vertices, {} polygons",
            model.id,
            path.display(),
            model.vertex_count(),
            model.polygon_count()
        );
        Ok(model)
    }

    /// Polygons must already be validated against the vertex count.
    pub(crate) fn from_parts(vertices: Vec<Vertex>, polygons: Vec<Polygon>) -> Self {
        let extents = Extents::from_points(vertices.iter().map(|v| &v.position));
        Self {
            id: ModelId::next(),
            vertices,
            polygons,
            extents,
        }
    }

    /// Axis-aligned cube centered at the origin, one quad per side, wound outward.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corners = [
            (-h, -h, -h),
            (h, -h, -h),
            (h, h, -h),
            (-h, h, -h),
            (-h, -h, h),
            (h, -h, h),
            (h, h, h),
            (-h, h, h),
        ];
        let vertices = corners
            .iter()
            .map(|&(x, y, z)| Vertex::new(Point3::new(x, y, z)))
            .collect();

        let sides: [[u32; 4]; 6] = [
            [4, 5, 6, 7], // +Z
            [0, 3, 2, 1], // -Z
            [1, 2, 6, 5], // +X
            [0, 4, 7, 3], // -X
            [3, 7, 6, 2], // +Y
            [0, 1, 5, 4], // -Y
        ];
        let polygons = sides.iter().map(|s| Polygon::new(s.to_vec())).collect();

        Self::from_parts(vertices, polygons)
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn positions(&self) -> impl Iterator<Item = Point3<f32>> + '_ {
        self.vertices.iter().map(|v| v.position)
    }
}
