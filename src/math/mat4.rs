//! 4x4 transformation matrix, column-vector convention.
//!
//! Vectors multiply on the right (`Mat4 * Vec4`), translation lives in the
//! last column, and transforms chain right-to-left: `A * B * v` applies B
//! first, then A.

use std::ops::Mul;

use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Left-handed perspective projection.
    ///
    /// After this transform, view-space z ends up in the w component, which
    /// the rasterizer interpolates as reciprocal depth.
    pub fn perspective_lh(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let t = near * (fov_y / 2.0).tan();
        let r = t * aspect_ratio;
        let a = (far + near) / (near - far);
        let b = -2.0 * far * near / (far - near);
        Mat4::new([
            [near / r, 0.0, 0.0, 0.0],
            [0.0, near / t, 0.0, 0.0],
            [0.0, 0.0, a, b],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Left-handed view matrix looking from `eye` toward `target`.
    pub fn look_at_lh(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - eye).normalize();
        let right = up.cross(forward).normalize();
        let up = forward.cross(right);

        Self::new([
            [right.x, right.y, right.z, -right.dot(eye)],
            [up.x, up.y, up.z, -up.dot(eye)],
            [forward.x, forward.y, forward.z, -forward.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn transpose(&self) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (r, row) in self.data.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                out[c][r] = v;
            }
        }
        Mat4::new(out)
    }

    /// Inverse via Gauss-Jordan elimination with partial pivoting.
    /// Returns `None` for a singular matrix.
    pub fn inverse(&self) -> Option<Mat4> {
        let mut a = self.data;
        let mut inv = Mat4::identity().data;

        for col in 0..4 {
            // Pick the largest pivot in this column for stability.
            let mut pivot = col;
            for row in col + 1..4 {
                if a[row][col].abs() > a[pivot][col].abs() {
                    pivot = row;
                }
            }
            if a[pivot][col].abs() < f32::EPSILON {
                return None;
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let scale = 1.0 / a[col][col];
            for k in 0..4 {
                a[col][k] *= scale;
                inv[col][k] *= scale;
            }

            for row in 0..4 {
                if row == col {
                    continue;
                }
                let factor = a[row][col];
                for k in 0..4 {
                    a[row][k] -= factor * a[col][k];
                    inv[row][k] -= factor * inv[col][k];
                }
            }
        }

        Some(Mat4::new(inv))
    }

    /// Project a homogeneous point: transform, then divide x/y/z by w.
    ///
    /// The original w is preserved in the result so the caller can carry it
    /// into reciprocal-depth interpolation.
    pub fn project(&self, v: Vec4) -> Vec4 {
        let clip = *self * v;
        if clip.w != 0.0 {
            Vec4::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w, clip.w)
        } else {
            clip
        }
    }

    /// Transform a point (w=1), discarding the resulting w.
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from(v)).to_vec3()
    }

    /// Transform a direction (w=0). Used with the inverse-transpose to carry
    /// normals through non-uniform scale.
    pub fn transform_direction(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(v, 0.0)).to_vec3()
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for row in 0..4 {
            for col in 0..4 {
                result[row][col] = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let m = &self.data;
        Vec4::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3] * v.w,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3] * v.w,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3] * v.w,
            m[3][0] * v.x + m[3][1] * v.y + m[3][2] * v.z + m[3][3] * v.w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inverse_of_identity_is_identity() {
        assert_eq!(Mat4::identity().inverse().unwrap(), Mat4::identity());
    }

    #[test]
    fn inverse_undoes_transform() {
        let m = Mat4::translation(1.0, -2.0, 3.0)
            * Mat4::rotation_y(0.7)
            * Mat4::scaling(2.0, 2.0, 2.0);
        let inv = m.inverse().unwrap();
        let p = Vec3::new(4.0, 5.0, 6.0);
        let back = inv.transform_point(m.transform_point(p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-4);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-4);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-4);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Mat4::scaling(1.0, 0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn project_preserves_view_depth_in_w() {
        let proj = Mat4::perspective_lh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let p = proj.project(Vec4::point(0.0, 0.0, 5.0));
        assert_relative_eq!(p.w, 5.0, epsilon = 1e-5);
    }
}
