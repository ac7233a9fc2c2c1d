//! Renderer construction parameters
use nalgebra::Vector3;

use crate::error::SceneError;

/// Everything fixed when a [`Renderer`](crate::Renderer) is built.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Field of view in degrees.
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    /// Camera movement in world units per second.
    pub speed: f64,
    /// Direction of the single light used for flat shading.
    pub light_direction: Vector3<f64>,
    /// Where the mesh origin is placed in the world.
    pub model_translation: Vector3<f64>,
}

impl RendererConfig {
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let fail = |msg: String| Err(SceneError::InvalidConfig(msg));

        if self.screen_width == 0 || self.screen_height == 0 {
            return fail(format!(
                "screen must be non-empty, got {}x{}",
                self.screen_width, self.screen_height
            ));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return fail(format!("fov must be in (0, 180) degrees, got {}", self.fov));
        }
        if !(self.near > 0.0) {
            return fail(format!("near plane must be positive, got {}", self.near));
        }
        if !(self.far > self.near) {
            return fail(format!(
                "far plane ({}) must lie beyond near plane ({})",
                self.far, self.near
            ));
        }
        if !(self.speed >= 0.0) {
            return fail(format!("speed must not be negative, got {}", self.speed));
        }
        if !(self.light_direction.norm() > 0.0) {
            return fail("light direction must be non-zero".to_string());
        }
        Ok(())
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            fov: 90.0,
            near: 0.1,
            far: 1000.0,
            speed: 10.0,
            light_direction: Vector3::new(1.0, 1.0, -1.0),
            model_translation: Vector3::new(0.0, 0.0, 5.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RendererConfig::default().validate().is_ok());
        assert!(RendererConfig::new(80, 24).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            RendererConfig { screen_width: 0, ..RendererConfig::default() },
            RendererConfig { fov: 180.0, ..RendererConfig::default() },
            RendererConfig { fov: f64::NAN, ..RendererConfig::default() },
            RendererConfig { near: 0.0, ..RendererConfig::default() },
            RendererConfig { far: 0.05, ..RendererConfig::default() },
            RendererConfig { speed: -1.0, ..RendererConfig::default() },
            RendererConfig { light_direction: Vector3::zeros(), ..RendererConfig::default() },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(SceneError::InvalidConfig(_))),
                "accepted {config:?}"
            );
        }
    }
}
