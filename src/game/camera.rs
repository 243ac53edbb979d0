//! Orbiting view camera.
//!
//! Yaw/pitch angles around a fixed target, same scheme as a first-person
//! look camera but with the eye pushed back along the view direction. Also
//! owns the projection math and the screen-to-world ray used for picking.

use cgmath::{
    perspective, Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3, Vector4,
};

/// Pitch is clamped just short of the poles so the up vector never
/// degenerates.
const PITCH_LIMIT_DEG: f32 = 89.0;
const MIN_DISTANCE: f32 = 4.0;
const MAX_DISTANCE: f32 = 30.0;

/// OpenGL clip space is z in [-1, 1]; wgpu wants [0, 1]. Left-multiplying the
/// projection by this matrix remaps the depth range.
#[rustfmt::skip]
const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Camera orbiting the cube's center.
pub struct OrbitCamera {
    /// Rotation around the world Y axis, radians.
    pub yaw: f32,
    /// Elevation above the horizontal plane, radians.
    pub pitch: f32,
    /// Eye distance from the target.
    pub distance: f32,
    /// Point the camera looks at.
    pub target: Point3<f32>,
    /// Vertical field of view, degrees.
    pub fov_deg: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    /// Starting view: above and to the side, three faces visible.
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.5,
            distance: 10.0,
            target: Point3::new(0.0, 0.0, 0.0),
            fov_deg: 45.0,
        }
    }

    /// World-space eye position.
    pub fn position(&self) -> Point3<f32> {
        let offset = Vector3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        );
        self.target + offset
    }

    /// Unit vector from the eye toward the target.
    pub fn view_dir(&self) -> Vector3<f32> {
        (self.target - self.position()).normalize()
    }

    /// Rotates the view by pointer deltas, in radians per pixel-scaled unit.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        let limit = PITCH_LIMIT_DEG.to_radians();
        self.pitch = (self.pitch + delta_pitch).clamp(-limit, limit);
    }

    /// Moves the eye toward or away from the target.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position(), self.target, Vector3::unit_y())
    }

    pub fn proj_matrix(&self, aspect: f32) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(Deg(self.fov_deg), aspect, 0.1, 100.0)
    }

    pub fn view_proj(&self, aspect: f32) -> Matrix4<f32> {
        self.proj_matrix(aspect) * self.view_matrix()
    }

    /// Camera-frame right and up vectors, re-orthogonalized against the view
    /// direction so drag deltas map onto clean world directions.
    pub fn basis(&self) -> (Vector3<f32>, Vector3<f32>) {
        let forward = self.view_dir();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward).normalize();
        (right, up)
    }

    /// Unprojects a window-space pixel into a world-space ray from the eye.
    ///
    /// `px`/`py` are physical pixels with the origin at the top-left, as
    /// winit reports cursor positions.
    pub fn screen_ray(
        &self,
        px: f64,
        py: f64,
        width: u32,
        height: u32,
    ) -> (Point3<f32>, Vector3<f32>) {
        // Pixel -> normalized device coordinates, flipping y.
        let ndc_x = (2.0 * px as f32 / width.max(1) as f32) - 1.0;
        let ndc_y = 1.0 - (2.0 * py as f32 / height.max(1) as f32);

        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let inverse = self
            .view_proj(aspect)
            .invert()
            .unwrap_or_else(Matrix4::identity);

        let near = inverse * Vector4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inverse * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        let origin = Point3::new(near.x, near.y, near.z);
        let direction = (far - near).normalize();
        (origin, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let mut camera = OrbitCamera::new();
        camera.orbit(0.0, 10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.orbit(0.0, -20.0);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut camera = OrbitCamera::new();
        camera.zoom(100.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
        camera.zoom(-100.0);
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn eye_sits_at_the_configured_distance() {
        let camera = OrbitCamera::new();
        let offset = camera.position() - camera.target;
        assert!((offset.magnitude() - camera.distance).abs() < 1e-4);
    }

    #[test]
    fn basis_is_orthonormal() {
        let camera = OrbitCamera::new();
        let (right, up) = camera.basis();
        let forward = camera.view_dir();
        assert!(right.dot(up).abs() < 1e-5);
        assert!(right.dot(forward).abs() < 1e-5);
        assert!(up.dot(forward).abs() < 1e-5);
        assert!((right.magnitude() - 1.0).abs() < 1e-5);
        assert!((up.magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn center_pixel_ray_points_at_the_target() {
        let camera = OrbitCamera::new();
        let (origin, direction) = camera.screen_ray(640.0, 400.0, 1280, 800);
        let to_target = (camera.target - origin).normalize();
        assert!(
            direction.dot(to_target) > 0.999,
            "center ray should pass through the orbit target"
        );
    }
}
