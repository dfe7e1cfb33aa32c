//! Meshes: a shared vertex buffer plus material-bound index ranges.
//!
//! OBJ files load through `tobj`; their MTL materials and diffuse textures
//! are registered with the [`MaterialManager`] so submeshes can reference
//! them by id at draw time.

use std::fmt;
use std::path::Path;

use crate::colors;
use crate::material::{MaterialManager, INVALID_ID};
use crate::math::{Vec2, Vec3};
use crate::texture::Texture;
use crate::transform::Transform;
use crate::vertex::Vertex;

/// An index range drawn with one material.
#[derive(Clone, Debug)]
pub struct Submesh {
    pub indices: Vec<u32>,
    /// Material table id, or [`INVALID_ID`] for the default material.
    pub material_id: i32,
}

pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub submeshes: Vec<Submesh>,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, submeshes: Vec<Submesh>) -> Self {
        Self {
            vertices,
            submeshes,
            transform: Transform::default(),
        }
    }

    /// Unit cube centered on the origin, 12 triangles in one submesh.
    pub fn cube() -> Self {
        let corners = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ];
        let vertices = corners
            .iter()
            .map(|&position| Vertex {
                position,
                normal: Vec3::ZERO,
                texcoord: Vec2::ZERO,
                color: colors::WHITE,
            })
            .collect();

        // Wound so face normals point outward.
        #[rustfmt::skip]
        let indices = vec![
            4, 5, 6,  6, 7, 4, // +z
            1, 0, 3,  3, 2, 1, // -z
            1, 2, 6,  6, 5, 1, // +x
            4, 7, 3,  3, 0, 4, // -x
            3, 7, 6,  6, 2, 3, // +y
            0, 1, 5,  5, 4, 0, // -y
        ];

        let mut mesh = Self::new(
            vertices,
            vec![Submesh {
                indices,
                material_id: INVALID_ID,
            }],
        );
        mesh.recalculate_normals();
        mesh
    }

    /// Load every model in an OBJ file into a single mesh (one submesh per
    /// OBJ object), registering its MTL materials and diffuse textures with
    /// `materials`.
    pub fn from_obj<P: AsRef<Path>>(
        path: P,
        materials: &mut MaterialManager,
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let (models, mtl) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;
        let obj_dir = path.parent().unwrap_or_else(|| Path::new("."));

        // Registered ids, indexed by the OBJ file's material order.
        let mut material_ids = Vec::new();
        if let Ok(mtl_materials) = mtl {
            for mat in &mtl_materials {
                material_ids.push(register_material(materials, mat, obj_dir)?);
            }
        }

        let mut vertices = Vec::new();
        let mut submeshes = Vec::new();
        for model in &models {
            let base = vertices.len() as u32;
            let m = &model.mesh;
            for i in 0..m.positions.len() / 3 {
                let normal = if m.normals.len() >= (i + 1) * 3 {
                    Vec3::new(m.normals[3 * i], m.normals[3 * i + 1], m.normals[3 * i + 2])
                } else {
                    Vec3::ZERO
                };
                // OBJ texcoords are bottom-left origin; flip v for top-left
                // texture addressing.
                let texcoord = if m.texcoords.len() >= (i + 1) * 2 {
                    Vec2::new(m.texcoords[2 * i], 1.0 - m.texcoords[2 * i + 1])
                } else {
                    Vec2::ZERO
                };
                vertices.push(Vertex {
                    position: Vec3::new(
                        m.positions[3 * i],
                        m.positions[3 * i + 1],
                        m.positions[3 * i + 2],
                    ),
                    normal,
                    texcoord,
                    color: colors::WHITE,
                });
            }
            submeshes.push(Submesh {
                indices: m.indices.iter().map(|&i| base + i).collect(),
                material_id: m
                    .material_id
                    .and_then(|i| material_ids.get(i).copied())
                    .unwrap_or(INVALID_ID),
            });
        }

        Ok(Self::new(vertices, submeshes))
    }

    /// Replace vertex normals with area-weighted face normals.
    pub fn recalculate_normals(&mut self) {
        for v in self.vertices.iter_mut() {
            v.normal = Vec3::ZERO;
        }
        for submesh in &self.submeshes {
            for tri in submesh.indices.chunks_exact(3) {
                let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
                let ab = self.vertices[b].position - self.vertices[a].position;
                let ac = self.vertices[c].position - self.vertices[a].position;
                // Cross product length carries the area weighting.
                let face = ab.cross(ac);
                for &i in &[a, b, c] {
                    self.vertices[i].normal = self.vertices[i].normal + face;
                }
            }
        }
        for v in self.vertices.iter_mut() {
            if v.normal.magnitude() > 1e-12 {
                v.normal = v.normal.normalize();
            }
        }
    }
}

fn register_material(
    materials: &mut MaterialManager,
    mat: &tobj::Material,
    obj_dir: &Path,
) -> Result<i32, LoadError> {
    let id = materials.create_material(&mat.name);
    let Some(slot) = materials.material_mut(id) else {
        return Ok(INVALID_ID);
    };
    if let Some(ka) = mat.ambient {
        slot.ambient = Vec3::new(ka[0], ka[1], ka[2]);
    }
    if let Some(kd) = mat.diffuse {
        slot.diffuse = Vec3::new(kd[0], kd[1], kd[2]);
    }
    if let Some(ks) = mat.specular {
        slot.specular = Vec3::new(ks[0], ks[1], ks[2]);
    }
    if let Some(ns) = mat.shininess {
        slot.shininess = ns;
    }
    if let Some(map) = &mat.diffuse_texture {
        let texture = Texture::from_file(obj_dir.join(map))?;
        let texture_id = materials.create_texture(texture);
        if let Some(slot) = materials.material_mut(id) {
            slot.texture_id = texture_id;
        }
    }
    Ok(id)
}

#[derive(Debug)]
pub enum LoadError {
    Obj(tobj::LoadError),
    Image(image::ImageError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Obj(e) => write!(f, "failed to load OBJ: {e}"),
            LoadError::Image(e) => write!(f, "failed to load texture: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Obj(e) => Some(e),
            LoadError::Image(e) => Some(e),
        }
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Obj(e)
    }
}

impl From<image::ImageError> for LoadError {
    fn from(e: image::ImageError) -> Self {
        LoadError::Image(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cube_has_twelve_triangles() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.submeshes.len(), 1);
        assert_eq!(cube.submeshes[0].indices.len(), 36);
        assert_eq!(cube.submeshes[0].material_id, INVALID_ID);
    }

    #[test]
    fn cube_normals_point_outward() {
        let cube = Mesh::cube();
        for v in &cube.vertices {
            assert_relative_eq!(v.normal.magnitude(), 1.0, epsilon = 1e-5);
            // Corner normals average the three adjoining faces, so they point
            // away from the center.
            assert!(v.normal.dot(v.position) > 0.0);
        }
    }

    #[test]
    fn missing_obj_reports_error() {
        let mut materials = MaterialManager::new();
        let result = Mesh::from_obj("no/such/file.obj", &mut materials);
        assert!(matches!(result, Err(LoadError::Obj(_))));
    }
}
