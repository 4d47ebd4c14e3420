//! # Scene Camera
//!
//! Perspective camera used both to derive the camera-aligned ground axes and
//! to project object centres to pixel coordinates.
//!
//! ## Coordinate System
//! World space is right-handed with +Z up. Screen space has its origin at the
//! top-left pixel, x to the right and y down; depth is the distance along the
//! viewing axis.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Mat4, Mat4Ext, Point3, Vec3};
use crate::render::PixelCoords;

/// 3D perspective camera
///
/// Orientation is given by a look-at target and an up vector. Moving the
/// camera with [`Camera::translate`] moves the target too, so orientation is
/// preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 0, 1])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera looking at the origin with +Z up
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the image
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::z(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space, keeping the target
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Configure camera to look at a specific point with custom up vector
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Move the camera rigidly by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.target += offset;
        log::trace!("Camera translated by {:?} to {:?}", offset, self.position);
    }

    /// Update camera aspect ratio for a new output resolution
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Unit viewing direction
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Unit camera-space +X axis in world space
    pub fn right(&self) -> Vec3 {
        self.forward().cross(&self.up).normalize()
    }

    /// Unit camera-space -X axis in world space
    pub fn left(&self) -> Vec3 {
        -self.right()
    }

    /// Unit camera-space +Y axis in world space
    ///
    /// Orthogonal to [`Camera::forward`] even when `up` is not.
    pub fn up_axis(&self) -> Vec3 {
        self.right().cross(&self.forward())
    }

    /// World-to-camera view matrix
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection matrix
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined projection: P × X × V
    ///
    /// - P = Perspective projection matrix
    /// - X = Y-up to Y-down screen flip
    /// - V = View matrix (world to camera space)
    ///
    /// The resulting clip-space `w` is the view depth of the point.
    pub fn get_view_projection_matrix(&self) -> Mat4 {
        self.get_projection_matrix() * Mat4::screen_space_flip() * self.get_view_matrix()
    }

    /// Project a world point to normalized device coordinates
    ///
    /// Returns `(ndc, depth)`; `ndc.x` and `ndc.y` are in `[-1, 1]` for points
    /// inside the frame, with y growing downwards. Points at or behind the
    /// camera plane yield `None`.
    pub fn project_to_ndc(&self, point: &Vec3) -> Option<(Vec3, f32)> {
        let clip = self.get_view_projection_matrix() * Point3::from(*point).to_homogeneous();
        let depth = clip.w;
        if depth <= f32::EPSILON {
            return None;
        }
        Some((clip.xyz() / depth, depth))
    }

    /// Project a world point to pixel coordinates for a `width` × `height` image
    ///
    /// Points behind the camera project to the image centre with a
    /// non-positive depth.
    pub fn project_to_pixel(&self, point: &Vec3, width: u32, height: u32) -> PixelCoords {
        match self.project_to_ndc(point) {
            Some((ndc, depth)) => PixelCoords {
                x: ((ndc.x + 1.0) * 0.5 * width as f32).round() as i32,
                y: ((ndc.y + 1.0) * 0.5 * height as f32).round() as i32,
                depth,
            },
            None => PixelCoords {
                x: (width / 2) as i32,
                y: (height / 2) as i32,
                depth: (point - self.position).dot(&self.forward()),
            },
        }
    }

    /// Whether `point` lies in front of the camera and inside the frame
    pub fn is_in_frame(&self, point: &Vec3) -> bool {
        self.is_in_frame_with_margin(point, 0.0)
    }

    /// Whether `point` lies inside the frame with `margin` world units to spare
    ///
    /// The margin is measured at the point's depth, so the accepted region
    /// shrinks by its projected size on every side of the image.
    pub fn is_in_frame_with_margin(&self, point: &Vec3, margin: f32) -> bool {
        let Some((ndc, depth)) = self.project_to_ndc(point) else {
            return false;
        };
        if depth < self.near {
            return false;
        }

        let focal = 1.0 / (self.fov * 0.5).tan();
        let margin_x = margin * focal / (self.aspect * depth);
        let margin_y = margin * focal / depth;
        ndc.x.abs() + margin_x <= 1.0 && ndc.y.abs() + margin_y <= 1.0
    }

    /// Focal length in pixels for an image `height` pixels tall
    pub fn focal_length_px(&self, height: u32) -> f32 {
        (height as f32 * 0.5) / (self.fov * 0.5).tan()
    }
}

impl Default for Camera {
    /// Three-quarter view of the ground plane from the front right
    ///
    /// # Default Configuration
    /// - Position: (7.36, -6.93, 4.96)
    /// - Target: origin
    /// - Up: +Z
    /// - FOV: 37.85 degrees vertical (49.13 horizontal at 4:3)
    /// - Aspect: 4:3, matching the default 320x240 output
    fn default() -> Self {
        Self::perspective(Vec3::new(7.36, -6.93, 4.96), 37.85, 4.0 / 3.0, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn overhead_camera() -> Camera {
        // Looking straight along +Y from y = -10, level with the ground.
        let mut camera = Camera::perspective(Vec3::new(0.0, -10.0, 0.0), 90.0, 1.0, 0.1, 100.0);
        camera.look_at(Vec3::zeros(), Vec3::z());
        camera
    }

    #[test]
    fn test_axes_are_orthonormal() {
        let camera = Camera::default();
        let (f, r, u) = (camera.forward(), camera.right(), camera.up_axis());

        assert_relative_eq!(f.magnitude(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(r.magnitude(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(u.magnitude(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(f.dot(&r), 0.0, epsilon = EPSILON);
        assert_relative_eq!(f.dot(&u), 0.0, epsilon = EPSILON);
        assert_relative_eq!(camera.left(), -r, epsilon = EPSILON);
        assert!(u.z > 0.0);
    }

    #[test]
    fn test_target_projects_to_image_centre() {
        let camera = overhead_camera();
        let pixel = camera.project_to_pixel(&Vec3::zeros(), 200, 100);

        assert_eq!((pixel.x, pixel.y), (100, 50));
        assert_relative_eq!(pixel.depth, 10.0, epsilon = EPSILON);
    }

    #[test]
    fn test_screen_axes_follow_image_convention() {
        let camera = overhead_camera();

        // +X world is to the camera's right, +Z world is up (smaller pixel y).
        let right = camera.project_to_pixel(&Vec3::new(1.0, 0.0, 0.0), 200, 200);
        let above = camera.project_to_pixel(&Vec3::new(0.0, 0.0, 1.0), 200, 200);
        assert!(right.x > 100);
        assert_eq!(right.y, 100);
        assert!(above.y < 100);
        assert_eq!(above.x, 100);
    }

    #[test]
    fn test_frame_check() {
        let camera = overhead_camera();
        assert!(camera.is_in_frame(&Vec3::zeros()));
        assert!(!camera.is_in_frame(&Vec3::new(50.0, 0.0, 0.0)));
        assert!(!camera.is_in_frame(&Vec3::new(0.0, -20.0, 0.0)));
    }

    #[test]
    fn test_frame_margin_shrinks_accepted_region() {
        // 90 degree square frustum: the frame edge at depth 10 is 10 units off axis.
        let camera = overhead_camera();
        let near_edge = Vec3::new(9.8, 0.0, 0.0);

        assert!(camera.is_in_frame(&near_edge));
        assert!(camera.is_in_frame_with_margin(&near_edge, 0.1));
        assert!(!camera.is_in_frame_with_margin(&near_edge, 0.4));
        assert!(camera.is_in_frame_with_margin(&Vec3::zeros(), 0.4));
    }

    #[test]
    fn test_translate_preserves_orientation() {
        let mut camera = Camera::default();
        let forward = camera.forward();
        camera.translate(Vec3::new(0.3, -0.2, 0.1));
        assert_relative_eq!(camera.forward(), forward, epsilon = EPSILON);
    }
}
