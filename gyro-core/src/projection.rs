/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Height / width of one terminal cell
pub const CELL_ASPECT: f32 = 2.0;

/// Perspective camera looking at the gyroscope
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera for a viewport of `width` x `height` terminal cells
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 10.0),
            target: Point3::new(0.0, 0.0, 7.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: 60f32.to_radians(),
            aspect: Self::cell_aspect(width, height),
            near: 1.0,
            far: 60.0,
        }
    }

    fn cell_aspect(width: u32, height: u32) -> f32 {
        width.max(1) as f32 / (height.max(1) as f32 * CELL_ASPECT)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = Self::cell_aspect(width, height);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Project a point already in eye space to screen space.
    ///
    /// Returns `(x, y, depth)` with depth in normalised device units, or
    /// `None` when the point lies outside the near/far range.
    pub fn project(&self, point: &Point3<f32>, width: u32, height: u32) -> Option<(f32, f32, f32)> {
        let clip = self.projection_matrix() * Vector4::new(point.x, point.y, point.z, 1.0);

        // Behind the eye or too close to it
        if clip.w < 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(80, 20);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::default();
        let eye = camera.view_matrix().transform_point(&camera.position);
        assert!(eye.coords.norm() < 1e-5);
        let target = camera.view_matrix().transform_point(&camera.target);
        assert!(target.z < 0.0);
    }

    #[test]
    fn test_project_centre_and_clipping() {
        let camera = Camera::new(80, 24);
        let (x, y, depth) = camera.project(&Point3::new(0.0, 0.0, -10.0), 80, 24).unwrap();
        assert!((x - 40.0).abs() < 1e-4);
        assert!((y - 12.0).abs() < 1e-4);
        assert!(depth > -1.0 && depth < 1.0);

        // Behind the eye, inside the near plane and beyond the far plane
        assert!(camera.project(&Point3::new(0.0, 0.0, 5.0), 80, 24).is_none());
        assert!(camera.project(&Point3::new(0.0, 0.0, -0.5), 80, 24).is_none());
        assert!(camera.project(&Point3::new(0.0, 0.0, -100.0), 80, 24).is_none());
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = Camera::default();
        let near = camera.project(&Point3::new(0.0, 0.0, -5.0), 80, 24).unwrap().2;
        let far = camera.project(&Point3::new(0.0, 0.0, -15.0), 80, 24).unwrap().2;
        assert!(near < far);
    }
}
