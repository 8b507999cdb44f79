/// Fixed perspective camera for the terminal view
use nalgebra::{Matrix4, Point3, Vector3};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 0.5;

pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera three units out on +Z looking at the origin, sized for a `width` x `height` cell grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 3.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: width as f32 * CELL_ASPECT / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Map a point through `mvp` to `(column, row, depth)`, or `None` when it
    /// lies behind the camera or outside the near/far range. Columns and rows
    /// may fall off screen; the rasterizer clips those. Depth is normalized
    /// device z in `[-1, 1]`.
    pub fn project_to_screen(
        mvp: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = mvp * point.to_homogeneous();
        if clip.w < 1e-6 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
        Some((screen_x, screen_y, ndc.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_accounts_for_cells() {
        let camera = Camera::new(80, 20);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(80, 40);
        let mvp = camera.view_projection();
        let (x, y, depth) = Camera::project_to_screen(&mvp, &Point3::origin(), 80, 40).unwrap();
        assert!((x - 40.0).abs() < 1e-3);
        assert!((y - 20.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_behind_camera_is_clipped() {
        let camera = Camera::new(80, 40);
        let mvp = camera.view_projection();
        assert!(Camera::project_to_screen(&mvp, &Point3::new(0.0, 0.0, 10.0), 80, 40).is_none());
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = Camera::new(80, 40);
        let mvp = camera.view_projection();
        let (_, _, near) = Camera::project_to_screen(&mvp, &Point3::new(0.0, 0.0, 1.0), 80, 40).unwrap();
        let (_, _, far) = Camera::project_to_screen(&mvp, &Point3::new(0.0, 0.0, -1.0), 80, 40).unwrap();
        assert!(near < far);
    }
}
