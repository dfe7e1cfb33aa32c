//! Slot-table texture and material storage.
//!
//! Textures and materials live in fixed-size slot tables addressed by `i32`
//! ids; `-1` is the universal "nothing bound" sentinel. Lookups with an
//! invalid id return `None` and the pipeline falls back to the default
//! material. Textures are shared between materials, so deleting a material
//! never frees its texture.

use crate::colors;
use crate::math::vec3::Vec3;
use crate::texture::Texture;

pub const MAX_TEXTURES: usize = 128;
pub const MAX_MATERIALS: usize = 128;

/// Id value meaning "no texture / no material".
pub const INVALID_ID: i32 = -1;

/// Surface parameters in the MTL model.
#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    /// Id into the texture table, or [`INVALID_ID`] for untextured.
    pub texture_id: i32,
    /// Solid color used by the material-color render mode.
    pub color: u32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec3::new(0.1, 0.1, 0.1),
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            shininess: 32.0,
            texture_id: INVALID_ID,
            color: colors::WHITE,
        }
    }
}

/// Fixed-capacity slot tables for textures and materials.
pub struct MaterialManager {
    textures: Vec<Option<Texture>>,
    materials: Vec<Option<Material>>,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            textures: (0..MAX_TEXTURES).map(|_| None).collect(),
            materials: (0..MAX_MATERIALS).map(|_| None).collect(),
        }
    }

    /// Store a texture in the first free slot. Returns its id, or
    /// [`INVALID_ID`] when the table is full (the texture is dropped).
    pub fn create_texture(&mut self, texture: Texture) -> i32 {
        match self.textures.iter_mut().position(|slot| slot.is_none()) {
            Some(i) => {
                self.textures[i] = Some(texture);
                i as i32
            }
            None => INVALID_ID,
        }
    }

    pub fn delete_texture(&mut self, id: i32) {
        if let Some(slot) = id_to_index(id, MAX_TEXTURES).map(|i| &mut self.textures[i]) {
            *slot = None;
        }
    }

    pub fn texture(&self, id: i32) -> Option<&Texture> {
        id_to_index(id, MAX_TEXTURES).and_then(|i| self.textures[i].as_ref())
    }

    /// Create a named material with default MTL values. Returns its id, or
    /// [`INVALID_ID`] when the table is full.
    pub fn create_material(&mut self, name: &str) -> i32 {
        match self.materials.iter_mut().position(|slot| slot.is_none()) {
            Some(i) => {
                self.materials[i] = Some(Material {
                    name: name.to_string(),
                    ..Material::default()
                });
                i as i32
            }
            None => INVALID_ID,
        }
    }

    pub fn delete_material(&mut self, id: i32) {
        if let Some(slot) = id_to_index(id, MAX_MATERIALS).map(|i| &mut self.materials[i]) {
            *slot = None;
        }
    }

    pub fn material(&self, id: i32) -> Option<&Material> {
        id_to_index(id, MAX_MATERIALS).and_then(|i| self.materials[i].as_ref())
    }

    pub fn material_mut(&mut self, id: i32) -> Option<&mut Material> {
        id_to_index(id, MAX_MATERIALS).and_then(move |i| self.materials[i].as_mut())
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn id_to_index(id: i32, max: usize) -> Option<usize> {
    if id >= 0 && (id as usize) < max {
        Some(id as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_ids_return_none() {
        let mgr = MaterialManager::new();
        assert!(mgr.material(INVALID_ID).is_none());
        assert!(mgr.material(0).is_none());
        assert!(mgr.texture(9999).is_none());
    }

    #[test]
    fn ids_are_reused_after_delete() {
        let mut mgr = MaterialManager::new();
        let a = mgr.create_material("a");
        let b = mgr.create_material("b");
        assert_ne!(a, b);
        mgr.delete_material(a);
        let c = mgr.create_material("c");
        assert_eq!(c, a);
    }

    #[test]
    fn full_table_returns_sentinel() {
        let mut mgr = MaterialManager::new();
        for i in 0..MAX_MATERIALS {
            assert_eq!(mgr.create_material(&format!("m{i}")), i as i32);
        }
        assert_eq!(mgr.create_material("overflow"), INVALID_ID);
    }

    #[test]
    fn default_material_matches_contract() {
        let m = Material::default();
        assert_eq!(m.ambient, Vec3::new(0.1, 0.1, 0.1));
        assert_eq!(m.diffuse, Vec3::ONE);
        assert_eq!(m.shininess, 32.0);
        assert_eq!(m.texture_id, INVALID_ID);
    }
}
