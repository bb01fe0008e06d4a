mod camera;
mod config;
mod framebuffer;
mod light;
mod material;
mod mesh;
mod rasterizer;
mod renderer;
mod scene;
mod texture;
mod transform;
mod vertex;

use std::path::Path;
use std::time::Instant;

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::camera::{Camera, CameraMovement};
use crate::light::flicker;
use crate::material::MaterialRegistry;
use crate::mesh::MeshLibrary;
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::texture::TextureRegistry;

/// 清屏色 (0.74, 0.72, 0.70)，暖灰底
const BACKGROUND: u32 = 0xFFBCB7B2;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1);
    let config = config::load_config(config_path.as_deref())?;

    let meshes = MeshLibrary::load_scene_meshes();
    let textures = TextureRegistry::load_scene_textures(Path::new(&config.texture_dir));
    let materials = MaterialRegistry::define_materials();
    let scene = Scene::build(&config.page_fan);

    let mut window = Window::new(
        "静物：蜡烛与书 按P/O切换投影 F2截图",
        config.width,
        config.height,
        WindowOptions::default(),
    )?;
    window.set_target_fps(60);

    let render_width = config.width * config.ssaa.max(1);
    let render_height = config.height * config.ssaa.max(1);
    let camera = Camera::new(config.width as f32 / config.height as f32);
    let mut renderer = Renderer::new(camera, render_width, render_height);

    let start_time = Instant::now();
    let mut last_frame = Instant::now();
    let mut last_mouse: Option<(f32, f32)> = None;
    let mut screenshot_count = 0u32;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let delta_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        // 键盘：WASD平移，Q/E升降，P/O切换投影
        if window.is_key_down(Key::W) {
            renderer.camera.process_keyboard(CameraMovement::Forward, delta_time);
        }
        if window.is_key_down(Key::S) {
            renderer.camera.process_keyboard(CameraMovement::Backward, delta_time);
        }
        if window.is_key_down(Key::A) {
            renderer.camera.process_keyboard(CameraMovement::Left, delta_time);
        }
        if window.is_key_down(Key::D) {
            renderer.camera.process_keyboard(CameraMovement::Right, delta_time);
        }
        if window.is_key_down(Key::Q) {
            renderer.camera.process_keyboard(CameraMovement::Up, delta_time);
        }
        if window.is_key_down(Key::E) {
            renderer.camera.process_keyboard(CameraMovement::Down, delta_time);
        }
        if window.is_key_pressed(Key::P, KeyRepeat::No) {
            renderer.camera.use_perspective();
        }
        if window.is_key_pressed(Key::O, KeyRepeat::No) {
            renderer.camera.use_orthographic();
        }

        // 鼠标视角：第一帧只记录位置，避免开场跳视角
        if let Some((x, y)) = window.get_mouse_pos(MouseMode::Pass) {
            if let Some((last_x, last_y)) = last_mouse {
                // y取反：屏幕坐标向下增长，俯仰向上为正
                renderer.camera.process_mouse_movement(x - last_x, last_y - y);
            }
            last_mouse = Some((x, y));
        }
        if let Some((_, scroll_y)) = window.get_scroll_wheel() {
            renderer.camera.process_scroll(scroll_y);
        }

        let elapsed = start_time.elapsed().as_secs_f32();
        renderer
            .lighting
            .apply_flicker(flicker(elapsed), scene.flame_position());

        renderer.framebuffer.clear(BACKGROUND);
        for draw in scene.static_draws() {
            renderer.render_draw_call(draw, &meshes, &textures, &materials);
        }
        // 火苗和光晕必须最后画，半透明光晕不写深度
        for draw in &scene.dynamic_draws(elapsed) {
            renderer.render_draw_call(draw, &meshes, &textures, &materials);
        }

        let downsampled;
        let frame = if config.ssaa > 1 {
            downsampled = renderer.framebuffer.ssaa(config.ssaa);
            &downsampled
        } else {
            &renderer.framebuffer
        };

        if window.is_key_pressed(Key::F2, KeyRepeat::No) {
            let path = format!("screenshot_{:03}.png", screenshot_count);
            // 截图失败不中断渲染循环
            match frame.save_to_image(&path) {
                Ok(()) => {
                    println!("已保存截图: {}", path);
                    screenshot_count += 1;
                }
                Err(e) => eprintln!("截图保存失败: {}", e),
            }
        }

        window.update_with_buffer(&frame.data, config.width, config.height)?;
    }

    Ok(())
}
