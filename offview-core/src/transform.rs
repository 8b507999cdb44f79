/// 3D transformation matrices and auto-rotation state
use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// Axes shorter than this are rejected as rotation axes.
pub const MIN_AXIS_LENGTH: f32 = 0.001;

/// Preset rotation axes, cycled by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPreset {
    X,
    Y,
    Z,
}

impl AxisPreset {
    pub fn vector(self) -> Vector3<f32> {
        match self {
            AxisPreset::X => Vector3::x(),
            AxisPreset::Y => Vector3::y(),
            AxisPreset::Z => Vector3::z(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            AxisPreset::X => AxisPreset::Y,
            AxisPreset::Y => AxisPreset::Z,
            AxisPreset::Z => AxisPreset::X,
        }
    }
}

/// Rotation about a single axis, advanced over time when enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Current angle in degrees, kept in `[0, 360)`.
    pub angle: f32,
    axis: Unit<Vector3<f32>>,
    /// Degrees per second.
    pub speed: f32,
    pub enabled: bool,
}

impl Spin {
    pub fn new(axis: Vector3<f32>, speed: f32) -> Self {
        Self {
            angle: 0.0,
            axis: Unit::try_new(axis, MIN_AXIS_LENGTH).unwrap_or_else(Vector3::x_axis),
            speed,
            enabled: true,
        }
    }

    pub fn axis(&self) -> Vector3<f32> {
        self.axis.into_inner()
    }

    /// Use a custom axis. Returns false and keeps the old axis if it is too short.
    pub fn set_axis(&mut self, axis: Vector3<f32>) -> bool {
        match Unit::try_new(axis, MIN_AXIS_LENGTH) {
            Some(axis) => {
                self.axis = axis;
                true
            }
            None => false,
        }
    }

    pub fn set_preset(&mut self, preset: AxisPreset) {
        self.axis = Unit::new_unchecked(preset.vector());
    }

    /// Advance by `dt` seconds if enabled.
    pub fn update(&mut self, dt: f32) {
        if self.enabled {
            self.angle = (self.angle + self.speed * dt).rem_euclid(360.0);
        }
    }
}

impl Default for Spin {
    fn default() -> Self {
        Self::new(Vector3::x(), 30.0)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation by `degrees` about `axis`. A degenerate axis gives the identity.
    pub fn rotation_about(degrees: f32, axis: &Vector3<f32>) -> Matrix4<f32> {
        match Unit::try_new(*axis, f32::EPSILON) {
            Some(axis) => Matrix4::from_axis_angle(&axis, degrees.to_radians()),
            None => Matrix4::identity(),
        }
    }

    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    pub fn scale_matrix(factor: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(factor)
    }

    pub fn apply(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Point3<f32> {
        matrix.transform_point(point)
    }
}
