//! Per-vertex directional lighting.

use crate::math::vec3::Vec3;

/// A single directional light with separate ambient and diffuse terms.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    /// Direction the light travels, normalized.
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, ambient: Vec3, diffuse: Vec3) -> Self {
        Self {
            direction: direction.normalize(),
            ambient,
            diffuse,
        }
    }

    /// Lambertian intensity for a unit surface normal, in `[0, 1]`.
    #[inline]
    pub fn intensity(&self, normal: Vec3) -> f32 {
        normal.dot(-self.direction).max(0.0)
    }

    /// Combined ambient + diffuse light color for a unit surface normal.
    /// Used by the textured paths, where the material tint lives in the
    /// texture itself.
    #[inline]
    pub fn shade(&self, normal: Vec3) -> Vec3 {
        self.ambient + self.diffuse * self.intensity(normal)
    }

    /// Combined light color modulated by material reflectance. Used by the
    /// untextured paths.
    #[inline]
    pub fn shade_material(&self, normal: Vec3, ambient: Vec3, diffuse: Vec3) -> Vec3 {
        self.ambient.mul_elem(ambient) + self.diffuse.mul_elem(diffuse) * self.intensity(normal)
    }
}

impl Default for DirectionalLight {
    /// Key light from the upper-left front, soft ambient fill.
    fn default() -> Self {
        Self::new(
            Vec3::new(-0.5, -0.5, 1.0),
            Vec3::new(0.2, 0.2, 0.2),
            Vec3::new(0.8, 0.8, 0.8),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn facing_away_gets_ambient_only() {
        let light = DirectionalLight::new(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.2, 0.2, 0.2),
            Vec3::new(0.8, 0.8, 0.8),
        );
        let shade = light.shade(Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(shade.x, 0.2);
        assert_relative_eq!(shade.y, 0.2);
    }

    #[test]
    fn facing_light_gets_full_diffuse() {
        let light = DirectionalLight::new(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.2, 0.2, 0.2),
            Vec3::new(0.8, 0.8, 0.8),
        );
        let shade = light.shade(Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(shade.x, 1.0);
    }

    #[test]
    fn material_reflectance_scales_terms() {
        let light = DirectionalLight::new(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::ONE,
            Vec3::ONE,
        );
        let shade = light.shade_material(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.1, 0.1, 0.1),
            Vec3::new(0.5, 0.5, 0.5),
        );
        assert_relative_eq!(shade.x, 0.6);
    }
}
