//! Demo binary: a spinning lit cube with free camera movement.
//!
//! Controls: WASD + Space/LShift to move, 1-4 to switch render modes,
//! G toggles flat/gouraud shading, B toggles bilinear sampling, Escape quits.

use sdl2::keyboard::Keycode;

use rastly::prelude::*;

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
const CAMERA_SPEED: f32 = 5.0;

#[derive(Default)]
struct MovementKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl MovementKeys {
    fn set(&mut self, code: Keycode, pressed: bool) {
        match code {
            Keycode::W => self.forward = pressed,
            Keycode::S => self.backward = pressed,
            Keycode::A => self.left = pressed,
            Keycode::D => self.right = pressed,
            Keycode::Space => self.up = pressed,
            Keycode::LShift => self.down = pressed,
            _ => {}
        }
    }
}

fn apply_mode_key(ctx: &mut RenderContext, code: Keycode) {
    match code {
        Keycode::Num1 => ctx.render_mode = RenderMode::Fill,
        Keycode::Num2 => ctx.render_mode = RenderMode::MaterialColor,
        Keycode::Num3 => ctx.render_mode = RenderMode::Wireframe,
        Keycode::Num4 => ctx.render_mode = RenderMode::Normals,
        Keycode::G => {
            ctx.shading = match ctx.shading {
                ShadingMode::Flat => ShadingMode::Gouraud,
                ShadingMode::Gouraud => ShadingMode::Flat,
            }
        }
        Keycode::B => {
            ctx.sampling = match ctx.sampling {
                SampleMode::Nearest => SampleMode::Bilinear,
                SampleMode::Bilinear => SampleMode::Nearest,
            }
        }
        _ => {}
    }
}

fn main() -> Result<(), String> {
    let mut window = Window::new("rastly", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut ctx = RenderContext::new(
        WINDOW_WIDTH,
        WINDOW_HEIGHT,
        Projection::from_degrees(70.0, WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32, 0.1, 100.0),
    );

    let mut cube = Mesh::cube();
    let mut camera_position = Vec3::new(0.0, 0.0, 5.0);
    let mut movement = MovementKeys::default();
    let mut limiter = FrameLimiter::new(&window);

    let mut fps_timer = 0.0f32;
    let mut frames = 0u32;

    'running: loop {
        for event in window.poll_events() {
            match event {
                WindowEvent::Quit => break 'running,
                WindowEvent::Resize(w, h) => {
                    ctx.resize(w, h);
                    window.resize(w, h)?;
                }
                WindowEvent::KeyDown(code) => {
                    movement.set(code, true);
                    apply_mode_key(&mut ctx, code);
                }
                WindowEvent::KeyUp(code) => movement.set(code, false),
            }
        }

        let delta = limiter.wait_and_get_delta(&window) as f32 / 1000.0;

        let step = CAMERA_SPEED * delta;
        if movement.forward {
            camera_position.z -= step;
        }
        if movement.backward {
            camera_position.z += step;
        }
        if movement.left {
            camera_position.x -= step;
        }
        if movement.right {
            camera_position.x += step;
        }
        if movement.up {
            camera_position.y += step;
        }
        if movement.down {
            camera_position.y -= step;
        }

        cube.transform.rotate(Vec3::new(0.1 * delta, 0.5 * delta, 0.0));

        ctx.look_at(
            camera_position,
            camera_position + Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        ctx.begin_frame(colors::BACKGROUND);
        ctx.draw_mesh(&cube);

        window.present(ctx.framebuffer.as_bytes())?;

        frames += 1;
        fps_timer += delta;
        if fps_timer >= 1.0 {
            window.set_title(&format!("rastly - fps: {frames}"));
            fps_timer = 0.0;
            frames = 0;
        }
    }

    Ok(())
}
