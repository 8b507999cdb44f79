/// Fan triangulation of convex polygons
///
/// Every polygon `v[0..n)` becomes `(v[0], v[i], v[i+1])` for `i` in `1..n-1`.
/// Convexity and planarity are assumed, not checked: a concave polygon still
/// yields `n - 2` valid triangles, they just cover the wrong area. Use
/// [`validate_polygons`] to find such polygons.
use nalgebra::Vector3;

use crate::model::{Model, Polygon};

/// Triangles of one polygon, fanned from its first vertex.
pub fn fan(polygon: &Polygon) -> impl Iterator<Item = [u32; 3]> + '_ {
    let v = polygon.indices();
    (1..v.len().saturating_sub(1)).map(move |i| [v[0], v[i], v[i + 1]])
}

/// Flat index buffer for all polygons, three indices per triangle.
pub fn triangulate(polygons: &[Polygon]) -> Vec<u32> {
    let mut indices = Vec::with_capacity(triangle_count(polygons) * 3);
    for polygon in polygons {
        for triangle in fan(polygon) {
            indices.extend_from_slice(&triangle);
        }
    }
    indices
}

pub fn triangle_count(polygons: &[Polygon]) -> usize {
    polygons.iter().map(|p| p.len().saturating_sub(2)).sum()
}

/// A polygon that fan triangulation will not represent faithfully.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonIssue {
    pub polygon: usize,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    /// Vertices are collinear or coincident.
    ZeroArea,
    /// Largest distance of a vertex from the polygon's best-fit plane.
    NonPlanar { deviation: f32 },
    NonConvex,
}

/// Report polygons that are degenerate, non-planar or non-convex.
///
/// `tolerance` is an absolute distance in model units; every check compares
/// a distance against it, so results do not depend on the mesh's scale.
/// Triangles are always planar and convex, so only polygons with four or more
/// sides can be flagged for anything but zero area.
pub fn validate_polygons(model: &Model, tolerance: f32) -> Vec<PolygonIssue> {
    let vertices = model.vertices();
    let mut issues = Vec::new();

    for (index, polygon) in model.polygons().iter().enumerate() {
        let points: Vec<Vector3<f32>> = polygon
            .indices()
            .iter()
            .map(|&i| vertices[i as usize].position.coords)
            .collect();

        // Twice the area over the perimeter is about the polygon's width.
        let n = points.len();
        let perimeter: f32 = (0..n).map(|i| (points[(i + 1) % n] - points[i]).norm()).sum();
        let newell = newell_normal(&points);
        if newell.norm() <= tolerance * perimeter {
            issues.push(PolygonIssue {
                polygon: index,
                kind: IssueKind::ZeroArea,
            });
            continue;
        }
        let normal = newell.normalize();

        let center = points.iter().sum::<Vector3<f32>>() / points.len() as f32;
        let deviation = points
            .iter()
            .map(|p| normal.dot(&(p - center)).abs())
            .fold(0.0f32, f32::max);
        if deviation > tolerance {
            issues.push(PolygonIssue {
                polygon: index,
                kind: IssueKind::NonPlanar { deviation },
            });
        }

        // Signed distance of `next` from the line through `prev` and `cur`.
        let concave = (0..n).any(|i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            let edge = cur - prev;
            let length = edge.norm();
            length > 0.0 && edge.cross(&(next - cur)).dot(&normal) / length < -tolerance
        });
        if concave {
            issues.push(PolygonIssue {
                polygon: index,
                kind: IssueKind::NonConvex,
            });
        }
    }

    if !issues.is_empty() {
        tracing::warn!(
            "{}: {} polygon issue(s) found by validation",
            model.id(),
            issues.len()
        );
    }
    issues
}

/// Area-weighted normal of a closed loop, robust for slightly non-planar input.
fn newell_normal(points: &[Vector3<f32>]) -> Vector3<f32> {
    let n = points.len();
    (0..n).fold(Vector3::zeros(), |acc, i| {
        acc + points[i].cross(&points[(i + 1) % n])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::off::parse_off;

    fn polygon(n: u32) -> Polygon {
        Polygon::new((0..n).collect())
    }

    #[test]
    fn test_fan_yields_n_minus_two_triangles() {
        for n in 3..=9 {
            let triangles: Vec<_> = fan(&polygon(n)).collect();
            assert_eq!(triangles.len(), n as usize - 2);
            for (i, t) in triangles.iter().enumerate() {
                let i = i as u32;
                assert_eq!(*t, [0, i + 1, i + 2]);
            }
        }
    }

    #[test]
    fn test_fan_uses_polygon_order() {
        let p = Polygon::new(vec![7, 3, 9, 1]);
        let triangles: Vec<_> = fan(&p).collect();
        assert_eq!(triangles, vec![[7, 3, 9], [7, 9, 1]]);
    }

    #[test]
    fn test_index_buffer_is_valid() {
        let model = Model::cube(2.0);
        let indices = triangulate(model.polygons());
        assert_eq!(indices.len() % 3, 0);
        assert_eq!(indices.len(), triangle_count(model.polygons()) * 3);
        assert_eq!(triangle_count(model.polygons()), 12);
        assert!(indices.iter().all(|&i| (i as usize) < model.vertex_count()));
    }

    #[test]
    fn test_mixed_arity() {
        let polygons = vec![polygon(3), polygon(5), polygon(4)];
        assert_eq!(triangulate(&polygons).len(), (1 + 3 + 2) * 3);
    }

    #[test]
    fn test_cube_is_valid() {
        assert!(validate_polygons(&Model::cube(1.0), 1e-5).is_empty());
    }

    #[test]
    fn test_detects_concave_quad() {
        // Arrowhead: vertex 2 points inward.
        let model = parse_off("OFF\n4 1 0\n0 0 0\n2 0 0\n1 0.5 0\n1 2 0\n4 0 1 2 3\n").unwrap();
        let issues = validate_polygons(&model, 1e-5);
        assert_eq!(
            issues,
            vec![PolygonIssue {
                polygon: 0,
                kind: IssueKind::NonConvex
            }]
        );
    }

    #[test]
    fn test_detects_non_planar_quad() {
        let model = parse_off("OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0.5\n0 1 0\n4 0 1 2 3\n").unwrap();
        let issues = validate_polygons(&model, 1e-3);
        assert_eq!(issues.len(), 1);
        match issues[0].kind {
            IssueKind::NonPlanar { deviation } => assert!(deviation > 0.1),
            ref other => panic!("unexpected issue {other:?}"),
        }
    }

    #[test]
    fn test_concavity_is_scale_independent() {
        // The arrowhead from above, shrunk a thousandfold.
        let model = parse_off(
            "OFF\n4 1 0\n0 0 0\n0.002 0 0\n0.001 0.0005 0\n0.001 0.002 0\n4 0 1 2 3\n",
        )
        .unwrap();
        let issues = validate_polygons(&model, 1e-5);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::NonConvex);
    }

    #[test]
    fn test_small_triangle_is_not_zero_area() {
        let model = parse_off("OFF\n3 1 0\n0 0 0\n1e-4 0 0\n0 1e-4 0\n3 0 1 2\n").unwrap();
        assert!(validate_polygons(&model, 1e-7).is_empty());
    }

    #[test]
    fn test_long_sliver_is_zero_area() {
        let model = parse_off("OFF\n3 1 0\n0 0 0\n1000 0 0\n500 1e-6 0\n3 0 1 2\n").unwrap();
        let issues = validate_polygons(&model, 1e-5);
        assert_eq!(issues[0].kind, IssueKind::ZeroArea);
    }

    #[test]
    fn test_detects_zero_area() {
        let model = parse_off("OFF\n3 1 0\n0 0 0\n1 0 0\n2 0 0\n3 0 1 2\n").unwrap();
        let issues = validate_polygons(&model, 1e-5);
        assert_eq!(issues[0].kind, IssueKind::ZeroArea);
    }
}
