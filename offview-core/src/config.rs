/// Viewer configuration
///
/// Loaded from a RON file, for example:
///
/// ```ron
/// (
///     auto_rotate: true,
///     rotation_speed: 45.0,
///     rotation_axis: (0.0, 1.0, 0.0),
///     explode_speed: 0.5,
/// )
/// ```
///
/// Missing fields take their defaults.
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::animation::ExplodeAnimation;
use crate::error::ConfigError;
use crate::transform::{Spin, MIN_AXIS_LENGTH};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Rotate the model continuously
    pub auto_rotate: bool,
    /// Degrees per second
    pub rotation_speed: f32,
    /// Initial rotation axis, normalized on use
    pub rotation_axis: [f32; 3],
    /// Explode animation speed in factor units per second
    pub explode_speed: f32,
    /// Shade by depth instead of lighting
    pub depth_coloring: bool,
    /// Frame rate cap for interactive front ends
    pub target_fps: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            rotation_speed: 30.0,
            rotation_axis: [1.0, 0.0, 0.0],
            explode_speed: 1.0,
            depth_coloring: false,
            target_fps: 30,
        }
    }
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        tracing::debug!("Loaded viewer config from {}", path.display());
        Ok(config)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> String {
        // Serializing plain numbers and bools cannot fail.
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if Vector3::from(self.rotation_axis).norm() <= MIN_AXIS_LENGTH {
            return Err(ConfigError::InvalidAxis(self.rotation_axis));
        }
        if !(self.explode_speed.is_finite() && self.explode_speed > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "explode_speed",
                value: self.explode_speed,
            });
        }
        if !self.rotation_speed.is_finite() || self.rotation_speed < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "rotation_speed",
                value: self.rotation_speed,
            });
        }
        if self.target_fps == 0 {
            return Err(ConfigError::NonPositive {
                field: "target_fps",
                value: 0.0,
            });
        }
        Ok(())
    }

    pub fn spin(&self) -> Spin {
        let mut spin = Spin::new(Vector3::from(self.rotation_axis), self.rotation_speed);
        spin.enabled = self.auto_rotate;
        spin
    }

    pub fn explode_animation(&self) -> ExplodeAnimation {
        ExplodeAnimation::new(self.explode_speed)
    }
}
