/// View-fitting bounds derived from model extents
use nalgebra::Point3;

use crate::model::Extents;

/// Center and radius used to fit a mesh into the unit view volume.
///
/// This is an approximation. The center is the middle of the axis-aligned
/// box, not the vertex mean, and the radius is half the longest box side, so
/// it under-covers the box corners and may over-cover thin meshes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingInfo {
    pub centroid: Point3<f32>,
    pub radius: f32,
}

impl BoundingInfo {
    pub fn from_extents(extents: &Extents) -> Self {
        Self {
            centroid: Point3::from((extents.min.coords + extents.max.coords) / 2.0),
            radius: extents.extent / 2.0,
        }
    }

    /// Factor that maps the radius to 1. Degenerate (point-like) bounds keep scale 1.
    pub fn fit_scale(&self) -> f32 {
        if self.radius > f32::EPSILON {
            1.0 / self.radius
        } else {
            1.0
        }
    }
}
