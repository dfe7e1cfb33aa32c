//! The software rendering pipeline.
//!
//! [`RenderContext`] owns the framebuffer, the material tables, and the
//! current matrix state. `draw_indexed` runs the full per-triangle sequence:
//! view/world transform, back-face cull, per-vertex lighting, frustum
//! clipping, fan triangulation, perspective projection, viewport mapping,
//! and rasterizer dispatch.

use crate::clipping::{Frustum, Polygon};
use crate::colors;
use crate::framebuffer::Framebuffer;
use crate::interpolate::{Attribute, FragmentAttribute};
use crate::light::DirectionalLight;
use crate::material::{Material, MaterialManager};
use crate::math::{Mat4, Vec3, Vec4};
use crate::mesh::Mesh;
use crate::projection::Projection;
use crate::raster::{
    fill_triangle, fill_triangle_shaded, FragmentShader, SampleMode, ScreenVertex, ShadedVertex,
    ShadingMode,
};
use crate::transform::Transform;
use crate::vertex::Vertex;

/// Wireframe lines sit slightly in front of coplanar filled geometry.
const WIREFRAME_DEPTH_BIAS: f32 = 0.0001;

/// What `draw_indexed` produces for each surviving triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Lit fill, textured when the bound material has a texture.
    Fill,
    /// Unlit fill with the material's solid color.
    MaterialColor,
    /// Depth-tested edge lines in the material's solid color.
    Wireframe,
    /// Vertex normals remapped to colors, for debugging shading.
    Normals,
}

pub struct RenderContext {
    pub framebuffer: Framebuffer,
    pub materials: MaterialManager,
    pub light: DirectionalLight,
    pub shading: ShadingMode,
    pub sampling: SampleMode,
    pub cull_face: bool,
    pub render_mode: RenderMode,
    projection: Projection,
    projection_matrix: Mat4,
    frustum: Frustum,
    view_matrix: Mat4,
    world_matrix: Mat4,
    material_id: i32,
    fragment_shader: Option<Box<dyn FragmentShader>>,
}

impl RenderContext {
    pub fn new(width: u32, height: u32, projection: Projection) -> Self {
        Self {
            framebuffer: Framebuffer::new(width, height),
            materials: MaterialManager::new(),
            light: DirectionalLight::default(),
            shading: ShadingMode::Gouraud,
            sampling: SampleMode::Nearest,
            cull_face: true,
            render_mode: RenderMode::Fill,
            projection_matrix: projection.matrix(),
            frustum: projection.frustum(),
            projection,
            view_matrix: Mat4::identity(),
            world_matrix: Mat4::identity(),
            material_id: crate::material::INVALID_ID,
            fragment_shader: None,
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Resizing keeps the frustum and projection matrix in sync with the new
    /// aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.framebuffer.resize(width, height);
        self.projection
            .set_aspect_ratio(width as f32 / height as f32);
        self.projection_matrix = self.projection.matrix();
        self.frustum = self.projection.frustum();
    }

    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.view_matrix = view;
    }

    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.view_matrix = Mat4::look_at_lh(eye, target, up);
    }

    pub fn set_world_matrix(&mut self, world: Mat4) {
        self.world_matrix = world;
    }

    pub fn bind_material(&mut self, material_id: i32) {
        self.material_id = material_id;
    }

    /// Install a custom fragment shader; `None` restores the specialized
    /// paths. Shaded fragments receive `[texcoord, color]`, both
    /// perspective-corrected.
    pub fn set_fragment_shader(&mut self, shader: Option<Box<dyn FragmentShader>>) {
        self.fragment_shader = shader;
    }

    pub fn begin_frame(&mut self, clear_color: u32) {
        self.framebuffer.clear(clear_color);
        self.framebuffer.clear_depth();
    }

    /// Draw every submesh of `mesh` with its bound material, using the
    /// mesh's transform as the world matrix.
    pub fn draw_mesh(&mut self, mesh: &Mesh) {
        self.set_world_matrix(mesh.transform.to_matrix());
        for submesh in &mesh.submeshes {
            self.bind_material(submesh.material_id);
            self.draw_indexed(&mesh.vertices, &submesh.indices);
        }
        self.bind_material(crate::material::INVALID_ID);
    }

    /// Draw `indices` as a triangle list over `vertices`. Out-of-range
    /// indices and trailing partial triangles are skipped.
    pub fn draw_indexed(&mut self, vertices: &[Vertex], indices: &[u32]) {
        let material = self
            .materials
            .material(self.material_id)
            .cloned()
            .unwrap_or_default();
        let textured = self.materials.texture(material.texture_id).is_some();

        let transform = self.view_matrix * self.world_matrix;
        let normal_matrix = match transform.inverse() {
            Some(inv) => inv.transpose(),
            None => Mat4::identity(),
        };

        let half_w = self.framebuffer.width() as f32 / 2.0;
        let half_h = self.framebuffer.height() as f32 / 2.0;

        for tri in indices.chunks_exact(3) {
            let fetched = (
                vertices.get(tri[0] as usize),
                vertices.get(tri[1] as usize),
                vertices.get(tri[2] as usize),
            );
            let (Some(&a), Some(&b), Some(&c)) = fetched else {
                continue;
            };
            let mut verts = [a, b, c];

            for v in verts.iter_mut() {
                v.position = transform.transform_point(v.position);
            }

            let edge1 = verts[1].position - verts[0].position;
            let edge2 = verts[2].position - verts[0].position;
            let face_normal = edge1.cross(edge2).normalize();

            if self.cull_face {
                let view_dir = verts[0].position.normalize();
                if face_normal.dot(view_dir) > 0.0 {
                    continue;
                }
            }

            self.shade_vertices(&mut verts, face_normal, &material, textured, &normal_matrix);

            // Clip in view space; the polygon can grow up to the clipper's
            // vertex cap before fan triangulation.
            let polygon = self
                .frustum
                .clip_polygon(Polygon::from_triangle(verts[0], verts[1], verts[2]));
            if polygon.is_degenerate() {
                continue;
            }

            let projected: Vec<ScreenVertex> = polygon
                .vertices()
                .iter()
                .map(|v| {
                    let p = self.projection_matrix.project(Vec4::from(v.position));
                    ScreenVertex {
                        x: -p.x * half_w + half_w,
                        y: -p.y * half_h + half_h,
                        w: p.w,
                        uv: v.texcoord,
                        color: v.color,
                    }
                })
                .collect();

            for i in 1..projected.len() - 1 {
                self.emit_triangle(projected[0], projected[i], projected[i + 1], &material);
            }
        }
    }

    fn shade_vertices(
        &self,
        verts: &mut [Vertex; 3],
        face_normal: Vec3,
        material: &Material,
        textured: bool,
        normal_matrix: &Mat4,
    ) {
        match self.render_mode {
            RenderMode::Fill => {
                if self.shading == ShadingMode::Gouraud {
                    for v in verts.iter_mut() {
                        let n = normal_matrix.transform_direction(v.normal).normalize();
                        v.color = self.light_color(n, material, textured);
                    }
                } else {
                    let color = self.light_color(face_normal, material, textured);
                    for v in verts.iter_mut() {
                        v.color = color;
                    }
                }
            }
            RenderMode::MaterialColor | RenderMode::Wireframe => {
                for v in verts.iter_mut() {
                    v.color = material.color;
                }
            }
            RenderMode::Normals => {
                for v in verts.iter_mut() {
                    v.color = colors::pack_rgb((v.normal + Vec3::ONE) * 0.5);
                }
            }
        }
    }

    fn light_color(&self, normal: Vec3, material: &Material, textured: bool) -> u32 {
        // Textured surfaces carry their tint in the texture; untextured ones
        // take it from the material reflectance.
        let shade = if textured {
            self.light.shade(normal)
        } else {
            self.light
                .shade_material(normal, material.ambient, material.diffuse)
        };
        colors::pack_rgb(shade)
    }

    fn emit_triangle(
        &mut self,
        v0: ScreenVertex,
        v1: ScreenVertex,
        v2: ScreenVertex,
        material: &Material,
    ) {
        match self.render_mode {
            RenderMode::Wireframe => {
                for (a, b) in [(v0, v1), (v1, v2), (v2, v0)] {
                    draw_line_depth(
                        &mut self.framebuffer,
                        a.x as i32,
                        a.y as i32,
                        a.w,
                        b.x as i32,
                        b.y as i32,
                        b.w,
                        material.color,
                    );
                }
            }
            RenderMode::MaterialColor => {
                fill_triangle(
                    &mut self.framebuffer,
                    v0,
                    v1,
                    v2,
                    ShadingMode::Flat,
                    self.sampling,
                    None,
                );
            }
            RenderMode::Normals => {
                fill_triangle(
                    &mut self.framebuffer,
                    v0,
                    v1,
                    v2,
                    ShadingMode::Gouraud,
                    self.sampling,
                    None,
                );
            }
            RenderMode::Fill => {
                if let Some(shader) = &self.fragment_shader {
                    let shaded = |v: ScreenVertex| ShadedVertex {
                        x: v.x,
                        y: v.y,
                        w: v.w,
                        attributes: vec![
                            FragmentAttribute::perspective(Attribute::Vec2(v.uv)),
                            FragmentAttribute::perspective(Attribute::Color(v.color)),
                        ],
                    };
                    fill_triangle_shaded(
                        &mut self.framebuffer,
                        shaded(v0),
                        shaded(v1),
                        shaded(v2),
                        shader.as_ref(),
                    );
                } else {
                    fill_triangle(
                        &mut self.framebuffer,
                        v0,
                        v1,
                        v2,
                        self.shading,
                        self.sampling,
                        self.materials.texture(material.texture_id),
                    );
                }
            }
        }
    }
}

/// Bresenham line with linear 1/w interpolation so wireframes depth-test
/// against filled geometry.
#[allow(clippy::too_many_arguments)]
fn draw_line_depth(
    fb: &mut Framebuffer,
    x0: i32,
    y0: i32,
    w0: f32,
    x1: i32,
    y1: i32,
    w1: f32,
    color: u32,
) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let steps = dx.max(dy);

    let inv_w0 = 1.0 / w0 + WIREFRAME_DEPTH_BIAS;
    let inv_w1 = 1.0 / w1 + WIREFRAME_DEPTH_BIAS;
    if steps == 0 {
        fb.set_pixel_with_depth(x0, y0, inv_w0, color);
        return;
    }

    let step_x = if x0 < x1 { 1 } else { -1 };
    let step_y = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (x0, y0);
    let mut step = 0;

    loop {
        let t = step as f32 / steps as f32;
        fb.set_pixel_with_depth(x, y, inv_w0 + t * (inv_w1 - inv_w0), color);

        if x == x1 && y == y1 {
            break;
        }
        step += 1;

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += step_x;
        }
        if e2 < dx {
            err += dx;
            y += step_y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::texture::Texture;
    use approx::assert_relative_eq;

    fn context() -> RenderContext {
        let mut ctx = RenderContext::new(64, 64, Projection::from_degrees(60.0, 1.0, 0.1, 100.0));
        ctx.look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        ctx.begin_frame(colors::BACKGROUND);
        ctx
    }

    fn facing_triangle() -> Vec<Vertex> {
        [
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
        ]
        .iter()
        .map(|&position| Vertex {
            position,
            normal: Vec3::new(0.0, 0.0, 1.0),
            texcoord: Vec2::ZERO,
            color: colors::WHITE,
        })
        .collect()
    }

    fn covered_pixels(fb: &Framebuffer) -> usize {
        let mut n = 0;
        for y in 0..fb.height() as i32 {
            for x in 0..fb.width() as i32 {
                if fb.pixel(x, y) != Some(colors::BACKGROUND) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn cube_renders_to_center_of_screen() {
        let mut ctx = context();
        let cube = Mesh::cube();
        ctx.draw_mesh(&cube);

        assert_ne!(ctx.framebuffer.pixel(32, 32), Some(colors::BACKGROUND));
        // The cube face toward the camera sits at view-space w = 4.
        assert_relative_eq!(ctx.framebuffer.depth_at(32, 32).unwrap(), 0.25, epsilon = 1e-4);
    }

    #[test]
    fn back_faces_are_culled() {
        let verts = facing_triangle();

        let mut front = context();
        front.draw_indexed(&verts, &[0, 1, 2]);
        assert!(covered_pixels(&front.framebuffer) > 0);

        let mut back = context();
        back.draw_indexed(&verts, &[0, 2, 1]);
        assert_eq!(covered_pixels(&back.framebuffer), 0);
    }

    #[test]
    fn culling_can_be_disabled() {
        let verts = facing_triangle();
        let mut ctx = context();
        ctx.cull_face = false;
        ctx.draw_indexed(&verts, &[0, 2, 1]);
        assert!(covered_pixels(&ctx.framebuffer) > 0);
    }

    #[test]
    fn geometry_behind_camera_is_clipped_away() {
        let mut ctx = context();
        let mut cube = Mesh::cube();
        // Push the cube behind the near plane entirely.
        cube.transform.position = Vec3::new(0.0, 0.0, 50.0);
        ctx.draw_mesh(&cube);
        assert_eq!(covered_pixels(&ctx.framebuffer), 0);
    }

    #[test]
    fn out_of_range_indices_are_skipped() {
        let verts = facing_triangle();
        let mut ctx = context();
        ctx.draw_indexed(&verts, &[0, 1, 99]);
        assert_eq!(covered_pixels(&ctx.framebuffer), 0);
    }

    #[test]
    fn wireframe_writes_edges_not_interior() {
        let verts = facing_triangle();
        let mut ctx = context();
        ctx.render_mode = RenderMode::Wireframe;
        ctx.draw_indexed(&verts, &[0, 1, 2]);

        let edge_pixels = covered_pixels(&ctx.framebuffer);
        assert!(edge_pixels > 0);

        let mut filled = context();
        filled.draw_indexed(&verts, &[0, 1, 2]);
        assert!(edge_pixels < covered_pixels(&filled.framebuffer));
    }

    #[test]
    fn material_color_mode_uses_material_color() {
        let mut ctx = context();
        ctx.render_mode = RenderMode::MaterialColor;
        let id = ctx.materials.create_material("flat-red");
        if let Some(mat) = ctx.materials.material_mut(id) {
            mat.color = colors::RED;
        }
        ctx.bind_material(id);
        ctx.draw_indexed(&facing_triangle(), &[0, 1, 2]);
        assert_eq!(ctx.framebuffer.pixel(32, 32), Some(colors::RED));
    }

    #[test]
    fn custom_shader_overrides_fill() {
        let mut ctx = context();
        ctx.set_fragment_shader(Some(Box::new(|_: &[Attribute], _: f32| colors::BLUE)));
        ctx.draw_indexed(&facing_triangle(), &[0, 1, 2]);
        assert_eq!(ctx.framebuffer.pixel(32, 32), Some(colors::BLUE));
    }

    #[test]
    fn textured_material_samples_texture() {
        let mut ctx = context();
        // Solid green 1x1 texture.
        let tex_id = ctx
            .materials
            .create_texture(Texture::from_rgba8(1, 1, vec![0, 255, 0, 255]));
        let mat_id = ctx.materials.create_material("green");
        if let Some(mat) = ctx.materials.material_mut(mat_id) {
            mat.texture_id = tex_id;
        }
        ctx.bind_material(mat_id);
        ctx.draw_indexed(&facing_triangle(), &[0, 1, 2]);

        let c = ctx.framebuffer.pixel(32, 32).unwrap();
        assert_eq!(colors::red(c), 0);
        assert!(colors::green(c) > 0);
    }
}
