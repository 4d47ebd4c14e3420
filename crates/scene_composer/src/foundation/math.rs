//! Math utilities and types
//!
//! Provides the vector and matrix types used for scene geometry. The world is
//! right-handed with +Z up; the ground plane is z = 0.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix4,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Tolerance below which a vector is treated as zero length
    pub const LENGTH_EPSILON: f32 = 1e-6;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Component of `v` along `normal`
    ///
    /// `normal` does not need to be unit length.
    pub fn project_onto(v: &Vec3, normal: &Vec3) -> Vec3 {
        let denom = normal.magnitude_squared();
        if denom < constants::LENGTH_EPSILON {
            return Vec3::zeros();
        }
        normal * (v.dot(normal) / denom)
    }

    /// `v` with its component along `normal` removed
    pub fn reject_from(v: &Vec3, normal: &Vec3) -> Vec3 {
        v - project_onto(v, normal)
    }

    /// Normalize, returning `None` for degenerate vectors
    pub fn try_normalize(v: &Vec3) -> Option<Vec3> {
        v.try_normalize(constants::LENGTH_EPSILON)
    }
}

/// Extension trait for Mat4 with camera matrix constructors
pub trait Mat4Ext {
    /// Create a perspective projection matrix
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Flip from Y-up view space into Y-down, Z-forward screen space
    fn screen_space_flip() -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // P = [a⁻¹/tan(φ/2)    0              0                    0           ]
        //     [0               1/tan(φ/2)     0                    0           ]
        //     [0               0              f/(f-n)              -nf/(f-n)   ]
        //     [0               0              1                    0           ]
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();

        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);               // depth mapped to [0,1]
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0;                              // w = view depth

        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,  // Negative forward for right-handed
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }

    fn screen_space_flip() -> Mat4 {
        // X stays right, Y becomes down, Z becomes into the screen
        Mat4::new(
            1.0,  0.0,  0.0, 0.0,
            0.0, -1.0,  0.0, 0.0,
            0.0,  0.0, -1.0, 0.0,
            0.0,  0.0,  0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_reject_from_removes_normal_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let normal = Vec3::new(0.0, 0.0, 2.0);

        let rejected = utils::reject_from(&v, &normal);
        assert_relative_eq!(rejected, Vec3::new(1.0, 2.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(utils::project_onto(&v, &normal), Vec3::new(0.0, 0.0, 3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_degenerate_normal_projects_to_zero() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(utils::project_onto(&v, &Vec3::zeros()), Vec3::zeros());
        assert!(utils::try_normalize(&Vec3::zeros()).is_none());
    }

    #[test]
    fn test_look_at_maps_target_onto_negative_z() {
        let eye = Vec3::new(0.0, -5.0, 0.0);
        let view = Mat4::look_at(eye, Vec3::zeros(), Vec3::z());

        let target_view = view.transform_point(&Point3::origin());
        assert_relative_eq!(target_view.coords, Vec3::new(0.0, 0.0, -5.0), epsilon = EPSILON);
    }

    #[test]
    fn test_degree_conversion() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI, epsilon = EPSILON);
        assert_relative_eq!(utils::rad_to_deg(constants::PI), 180.0, epsilon = 1e-4);
    }
}
