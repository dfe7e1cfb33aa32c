//! Position, Euler rotation, and scale for placing meshes in the world.

use crate::math::{mat4::Mat4, vec3::Vec3};

/// World placement of a mesh.
///
/// Rotation is Euler angles in radians (x=pitch, y=yaw, z=roll), applied in
/// Z-Y-X order after scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn rotate(&mut self, delta: Vec3) -> &mut Self {
        self.rotation = self.rotation + delta;
        self
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position = self.position + delta;
        self
    }

    /// World matrix: `Translation * Rx * Ry * Rz * Scale`.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Inverse transpose of the rotation+scale part, for transforming
    /// normals under non-uniform scale.
    pub fn normal_matrix(&self) -> Mat4 {
        let rotation_scale = Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z);

        rotation_scale
            .inverse()
            .unwrap_or(Mat4::identity())
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform::default().to_matrix(), Mat4::identity());
    }

    #[test]
    fn translation_moves_points() {
        let t = Transform::at(Vec3::new(1.0, 2.0, 3.0));
        let p = t.to_matrix().transform_point(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn normal_matrix_undoes_nonuniform_scale() {
        let mut t = Transform::new();
        t.scale = Vec3::new(2.0, 1.0, 1.0);
        // A normal on a plane tilted 45 degrees in xy stays unit-ish after
        // renormalizing, and must not simply be scaled like a position.
        let n = t
            .normal_matrix()
            .transform_direction(Vec3::new(1.0, 1.0, 0.0).normalize())
            .normalize();
        // Stretching geometry along x squashes normals toward y.
        assert!(n.y > n.x);
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-5);
    }
}
