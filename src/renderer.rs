pub mod clip;
pub mod fragment_shader;
pub mod vertex_shader;

use cgmath::{
    InnerSpace, Matrix, Matrix4 as Mat4, SquareMatrix, Vector2 as Vec2, Vector3 as Vec3,
};

use crate::camera::Camera;
use crate::framebuffer::FrameBuffer;
use crate::light::Lighting;
use crate::material::{Material, MaterialRegistry};
use crate::mesh::{MeshKind, MeshLibrary};
use crate::rasterizer;
use crate::texture::{Texture, TextureRegistry};
use crate::transform::{self, TransformParams};
use crate::vertex::{ClipSpaceVertex, RasterPoint, RasterTriangle};

use self::clip::{Clipper, SimpleClipper};
use self::fragment_shader::{BlinnPhongShader, FragmentData, FragmentShader, UnlitShader};
use self::vertex_shader::{DefaultVertexShader, VertexShader, VertexShaderUniforms};

pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// 混合模式：不透明正常写入，半透明只混色不写深度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Opaque,
    AlphaBlend,
}

/// 一次绘制的表面来源：贴图（带UV平铺）或纯色
#[derive(Debug, Clone)]
pub enum Surface {
    Textured { tag: &'static str, uv_scale: Vec2<f32> },
    Color { rgb: Vec3<f32>, alpha: f32 },
}

/// 声明式的绘制描述：网格 + 变换参数 + 表面 + 材质。
/// 场景脚本生成一串这样的描述，渲染器按顺序执行。
#[derive(Debug, Clone)]
pub struct DrawCall {
    pub mesh: MeshKind,
    pub transform: TransformParams,
    pub surface: Surface,
    pub material_tag: &'static str,
    pub lit: bool,
    pub blend: BlendMode,
}

pub struct Renderer {
    pub camera: Camera,
    pub framebuffer: FrameBuffer,
    pub viewport: Viewport,
    pub lighting: Lighting,
}

impl Renderer {
    pub fn new(camera: Camera, w: usize, h: usize) -> Self {
        let framebuffer = FrameBuffer::new(w, h);
        Self {
            camera,
            framebuffer,
            viewport: Viewport {
                x: 0,
                y: 0,
                w: w as i32,
                h: h as i32,
            },
            lighting: Lighting::still_life(),
        }
    }

    /// 完整渲染管线：剔除 → 顶点着色 → 裁剪 → 视口变换 → 光栅化着色
    pub fn render_draw_call(
        &mut self,
        draw: &DrawCall,
        meshes: &MeshLibrary,
        textures: &TextureRegistry,
        materials: &MaterialRegistry,
    ) {
        // 统一运算矩阵
        let model = transform::build_model_matrix(&draw.transform);
        // 零缩放时模型矩阵不可逆，退回单位阵而不是崩溃
        let normal_matrix = model.invert().unwrap_or_else(Mat4::identity).transpose();
        let view_matrix = self.camera.get_view_mat();
        let proj_matrix = self.camera.get_projection_mat();
        let mvp_matrix = proj_matrix * view_matrix * model;

        let material = materials.lookup(draw.material_tag);
        // 贴图查不到时退回无纹理着色（原注册表里没有"槽位0"这种哨兵）
        let (texture, uv_scale, flat_color, alpha) = match &draw.surface {
            Surface::Textured { tag, uv_scale } => (textures.lookup(tag), *uv_scale, None, 1.0),
            Surface::Color { rgb, alpha } => (None, Vec2::new(1.0, 1.0), Some(*rgb), *alpha),
        };

        // 初始化本次绘制所使用的模块
        let vertex_shader = DefaultVertexShader;
        let clipper = SimpleClipper;
        let fragment_shader: Box<dyn FragmentShader> = if draw.lit {
            Box::new(BlinnPhongShader {
                lighting: self.lighting,
            })
        } else {
            Box::new(UnlitShader)
        };

        let uniforms = VertexShaderUniforms {
            model_matrix: &model,
            mvp_matrix: &mvp_matrix,
            normal_matrix: &normal_matrix,
            uv_scale,
        };

        for triangle in meshes.get(draw.mesh) {
            // 管线阶段 1: 背面剔除
            let world_pos =
                (uniforms.model_matrix * triangle.vertices[0].pos.extend(1.0)).truncate();
            let view_dir = (self.camera.eye() - world_pos).normalize();
            let tri_normal = (uniforms.normal_matrix * triangle.normal.extend(0.0)).truncate();
            if view_dir.dot(tri_normal) <= 0.0 {
                continue;
            }

            // 管线阶段 2: 顶点着色
            let clip_space_triangle = vertex_shader.shade_triangle(triangle, &uniforms);

            // 管线阶段 3: 裁剪
            let clipped_triangles = clipper.clip_triangle(&clip_space_triangle);

            for clipped_triangle_verts in clipped_triangles {
                // 阶段 4: 屏幕映射
                let raster_triangle = self.viewport_transform(&clipped_triangle_verts);

                // 阶段 5: 光栅化和像素着色
                self.rasterize_triangle(
                    &raster_triangle,
                    texture,
                    &material,
                    flat_color,
                    alpha,
                    draw.blend,
                    &*fragment_shader,
                );
            }
        }
    }

    // 视口变换
    fn viewport_transform(&self, clip_triangle: &[ClipSpaceVertex; 3]) -> RasterTriangle {
        let raster_vertices = clip_triangle.map(|clip_v| {
            // 透视除法
            let ndc_pos = clip_v.position / clip_v.position.w;

            // 转换到屏幕空间
            let screen_x =
                (ndc_pos.x + 1.0) * 0.5 * self.viewport.w as f32 + self.viewport.x as f32;
            let screen_y = self.viewport.h as f32
                - (ndc_pos.y + 1.0) * 0.5 * self.viewport.h as f32
                + self.viewport.y as f32;

            RasterPoint {
                pos: Vec2::new(screen_x, screen_y),
                z: (ndc_pos.z + 1.0) * 0.5,
                // 继承其他属性
                world_pos: clip_v.world_pos,
                normal: clip_v.normal,
                uv: clip_v.uv,
                color: clip_v.color,
            }
        });

        RasterTriangle {
            vertices: raster_vertices,
        }
    }

    // 逐像素光栅化
    #[allow(clippy::too_many_arguments)]
    fn rasterize_triangle(
        &mut self,
        triangle: &RasterTriangle,
        texture: Option<&Texture>,
        material: &Material,
        flat_color: Option<Vec3<f32>>,
        alpha: f32,
        blend: BlendMode,
        shader: &dyn FragmentShader,
    ) {
        let points = &triangle.vertices;
        let screen = [points[0].pos, points[1].pos, points[2].pos];

        let Some((min_x, min_y, max_x, max_y)) = rasterizer::get_clamped_box(
            &screen,
            self.framebuffer.width,
            self.framebuffer.height,
        ) else {
            return;
        };

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !rasterizer::is_inside_triangle(&screen, &p) {
                    continue;
                }
                let Some(bary) = rasterizer::get_barycentric_coords(&screen, &p) else {
                    continue;
                };

                // 插值所有属性
                let interpolated_depth = rasterizer::interpolate_depth(points, bary);
                let interpolated_normal = rasterizer::interpolate_normal(points, bary);
                let interpolated_uv = rasterizer::interpolate_uv(points, bary);
                let interpolated_world_pos = rasterizer::interpolate_world_pos(points, bary);
                // 纯色绘制直接用给定颜色，否则用顶点颜色插值
                let interpolated_color =
                    flat_color.unwrap_or_else(|| rasterizer::interpolate_color(points, bary));

                let fragment_data = FragmentData {
                    world_pos: interpolated_world_pos,
                    normal: interpolated_normal,
                    uv: interpolated_uv,
                    color: interpolated_color,
                    texture,
                    material,
                    camera_pos: self.camera.eye(),
                };

                let final_color_vec = shader.shade(fragment_data);

                // 转换为 u32 颜色格式
                let color = 0xFF000000
                    | (((final_color_vec.x * 255.0) as u32) << 16)
                    | (((final_color_vec.y * 255.0) as u32) << 8)
                    | ((final_color_vec.z * 255.0) as u32);

                match blend {
                    BlendMode::Opaque => {
                        self.framebuffer.put_pixel(x, y, color, interpolated_depth);
                    }
                    BlendMode::AlphaBlend => {
                        self.framebuffer
                            .blend_pixel(x, y, color, alpha, interpolated_depth);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glow_style_draw_does_not_disturb_depth_buffer() {
        let camera = Camera::new(1.0);
        let mut renderer = Renderer::new(camera, 64, 64);
        renderer.framebuffer.clear(0xFF000000);
        let meshes = MeshLibrary::load_scene_meshes();
        let textures = TextureRegistry::empty();
        let materials = MaterialRegistry::define_materials();

        // 相机前方的半透明球
        let glow = DrawCall {
            mesh: MeshKind::Sphere,
            transform: TransformParams::upright(
                Vec3::new(2.0, 2.0, 2.0),
                Vec3::new(0.0, 9.0, 10.0),
            ),
            surface: Surface::Color {
                rgb: Vec3::new(1.0, 0.9, 0.7),
                alpha: 0.3,
            },
            material_tag: "flame",
            lit: false,
            blend: BlendMode::AlphaBlend,
        };
        let depth_before = renderer.framebuffer.depth.clone();
        renderer.render_draw_call(&glow, &meshes, &textures, &materials);
        // 混合绘制只改颜色，深度缓冲必须原样
        assert_eq!(renderer.framebuffer.depth, depth_before);
        assert!(renderer.framebuffer.data.iter().any(|&c| c != 0xFF000000));
    }

    #[test]
    fn opaque_draw_writes_color_and_depth() {
        let camera = Camera::new(1.0);
        let mut renderer = Renderer::new(camera, 64, 64);
        renderer.framebuffer.clear(0xFF000000);
        let meshes = MeshLibrary::load_scene_meshes();
        let textures = TextureRegistry::empty();
        let materials = MaterialRegistry::define_materials();

        let draw = DrawCall {
            mesh: MeshKind::Box,
            transform: TransformParams::upright(
                Vec3::new(6.0, 6.0, 6.0),
                Vec3::new(0.0, 9.0, 10.0),
            ),
            surface: Surface::Color {
                rgb: Vec3::new(1.0, 0.0, 0.0),
                alpha: 1.0,
            },
            material_tag: "metal",
            lit: false,
            blend: BlendMode::Opaque,
        };
        renderer.render_draw_call(&draw, &meshes, &textures, &materials);
        assert!(renderer.framebuffer.depth.iter().any(|&d| d < 1.0));
    }
}
