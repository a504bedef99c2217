//! Orbit camera and projection for viewing the terrain

use crate::core::types::{DMat4, DVec3};

/// Camera orbiting a target point at a fixed distance
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point the camera looks at
    pub target: DVec3,
    /// Distance from the target
    pub distance: f64,
    /// Rotation around the Y axis in radians
    yaw: f64,
    /// Elevation above the XZ plane in radians
    pitch: f64,
    /// Radians per pixel of mouse drag
    pub sensitivity: f64,
}

impl OrbitCamera {
    const MIN_DISTANCE: f64 = 1.1;
    const MAX_DISTANCE: f64 = 50.0;
    const PITCH_LIMIT: f64 = 1.5;

    /// Create a new camera
    pub fn new(target: DVec3, distance: f64) -> Self {
        Self {
            target,
            distance: distance.clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE),
            yaw: std::f64::consts::FRAC_PI_4,
            pitch: 0.6,
            sensitivity: 0.005,
        }
    }

    /// World position of the eye
    pub fn position(&self) -> DVec3 {
        let horizontal = self.distance * self.pitch.cos();
        self.target + DVec3::new(
            horizontal * self.yaw.cos(),
            self.distance * self.pitch.sin(),
            horizontal * self.yaw.sin(),
        )
    }

    /// View matrix (world to camera space)
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.position(), self.target, DVec3::Y)
    }

    /// Rotate by a mouse drag delta in pixels
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Move towards (positive) or away from (negative) the target
    pub fn zoom(&mut self, amount: f64) {
        self.distance = (self.distance * (1.0 - amount * 0.1)).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    /// Current yaw in radians
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Current pitch in radians
    pub fn pitch(&self) -> f64 {
        self.pitch
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(DVec3::ZERO, 2.0)
    }
}

/// Projection kinds the demo can switch between
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    #[default]
    Perspective,
    Orthographic,
}

/// Projection parameters
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub kind: ProjectionKind,
    /// Aspect ratio (width / height)
    pub aspect: f64,
    /// Vertical field of view for perspective, in radians
    pub fov_y: f64,
    pub near: f64,
    pub far: f64,
}

impl Projection {
    pub fn new(kind: ProjectionKind, width: u32, height: u32) -> Self {
        let mut projection = Self {
            kind,
            aspect: 1.0,
            fov_y: std::f64::consts::FRAC_PI_4,
            near: 1.0,
            far: 100.0,
        };
        projection.set_viewport(width, height);
        projection
    }

    /// Update aspect ratio (call on window resize)
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f64 / height.max(1) as f64;
    }

    /// Projection matrix (camera to clip space)
    pub fn matrix(&self) -> DMat4 {
        match self.kind {
            ProjectionKind::Perspective => {
                DMat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
            }
            // 2x2 view volume, independent of the window aspect
            ProjectionKind::Orthographic => {
                DMat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, self.near, self.far)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_matrix_moves_target_in_front() {
        let camera = OrbitCamera::default();
        let target_in_view = camera.view_matrix().transform_point3(camera.target);

        // Right-handed view space looks down -Z
        assert!(target_in_view.x.abs() < 1e-9);
        assert!(target_in_view.y.abs() < 1e-9);
        assert!((target_in_view.z + camera.distance).abs() < 1e-9);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = OrbitCamera::default();
        camera.rotate(0.0, 10_000.0);
        assert_eq!(camera.pitch(), 1.5);
        camera.rotate(0.0, -100_000.0);
        assert_eq!(camera.pitch(), -1.5);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = OrbitCamera::default();
        for _ in 0..100 {
            camera.zoom(1.0);
        }
        assert!(camera.distance >= 1.1);

        for _ in 0..100 {
            camera.zoom(-1.0);
        }
        assert!(camera.distance <= 50.0);
    }

    #[test]
    fn test_projection_kinds_differ() {
        let perspective = Projection::new(ProjectionKind::Perspective, 800, 600);
        let orthographic = Projection::new(ProjectionKind::Orthographic, 800, 600);

        assert!((perspective.aspect - 800.0 / 600.0).abs() < 1e-12);
        assert_ne!(perspective.matrix(), orthographic.matrix());
        // Orthographic keeps w = 1
        let p = orthographic.matrix() * glam::DVec4::new(0.5, 0.5, -2.0, 1.0);
        assert_eq!(p.w, 1.0);
    }

    #[test]
    fn test_zero_height_viewport() {
        let projection = Projection::new(ProjectionKind::Perspective, 640, 0);
        assert!(projection.aspect.is_finite());
    }
}
