use cgmath::{Deg, InnerSpace, Matrix4 as Mat4, Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4};

use crate::config::PageFanConfig;
use crate::light::{flicker, glow_pulse};
use crate::mesh::MeshKind;
use crate::renderer::{BlendMode, DrawCall, Surface};
use crate::transform::TransformParams;

/// 打开的书的单层页片参数，由page_fan_layers算出
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayer {
    pub offset: Vec3<f32>,
    pub rotation_x_deg: f32,
    pub yaw_deg: f32,
}

/// 书页扇形展开：中间拱起最高，两端渐平并带微小扭转。
/// normalized取值[-1,1]（n为偶数时中间层略偏负），拱高按|normalized|^1.5衰减。
pub fn page_fan_layers(fan: &PageFanConfig) -> Vec<PageLayer> {
    let n = fan.num_page_layers;
    let mut layers = Vec::with_capacity(n);
    let base_y = -0.02 * fan.scale_factor;
    let half = n as f32 / 2.0;
    for i in 0..n {
        let y_offset = base_y + i as f32 * (fan.page_thickness * 0.8);
        let subtle_wave = 0.002 * (i as f32 * 0.5).sin();

        let normalized = (i as f32 - half) / half;
        let smooth_curve = normalized.abs().powf(1.5);
        let arch_amplitude = 0.10 * fan.scale_factor * (1.0 - smooth_curve);

        let x_offset = -0.01 * normalized;
        let page_yaw = normalized * 0.12;

        layers.push(PageLayer {
            offset: Vec3::new(x_offset, y_offset + subtle_wave, 0.0),
            rotation_x_deg: -arch_amplitude * 0.5,
            yaw_deg: fan.base_rotation_y + page_yaw,
        });
    }
    layers
}

fn textured(
    mesh: MeshKind,
    transform: TransformParams,
    tag: &'static str,
    uv_scale: Vec2<f32>,
    material_tag: &'static str,
) -> DrawCall {
    DrawCall {
        mesh,
        transform,
        surface: Surface::Textured { tag, uv_scale },
        material_tag,
        lit: true,
        blend: BlendMode::Opaque,
    }
}

fn colored(
    mesh: MeshKind,
    transform: TransformParams,
    rgb: Vec3<f32>,
    material_tag: &'static str,
) -> DrawCall {
    DrawCall {
        mesh,
        transform,
        surface: Surface::Color { rgb, alpha: 1.0 },
        material_tag,
        lit: true,
        blend: BlendMode::Opaque,
    }
}

/// 整张静物场景：桌子、烛台、打开的书、钢笔、墨水瓶、合上的书。
/// 所有不透明物体在build时就固定下来，火苗和光晕随时间变所以单独生成。
pub struct Scene {
    static_draws: Vec<DrawCall>,
    flame_position: Vec3<f32>,
}

impl Scene {
    pub fn build(fan: &PageFanConfig) -> Self {
        let mut draws = Vec::new();

        // 桌面
        draws.push(textured(
            MeshKind::Box,
            TransformParams::upright(Vec3::new(22.0, 0.4, 12.0), Vec3::new(0.0, -0.3, 0.0)),
            "wood",
            Vec2::new(8.0, 8.0),
            "cement",
        ));

        let candle_offset = Vec3::new(-3.5, 0.0, -3.0);
        let flame_position = Self::push_candle_group(&mut draws, candle_offset);

        Self::push_book_setup(&mut draws, fan);
        Self::push_closed_book(&mut draws);

        Self {
            static_draws: draws,
            flame_position,
        }
    }

    /// 烛台从下往上叠：底座、杆、球饰、上杆、倒扣的杯、杯沿、蜡烛、烛芯。
    /// 返回火苗位置（烛芯正上方），光照和动态绘制都要用。
    fn push_candle_group(draws: &mut Vec<DrawCall>, offset: Vec3<f32>) -> Vec3<f32> {
        let mut current_y = 0.0;

        draws.push(textured(
            MeshKind::TaperedCylinder,
            TransformParams::upright(Vec3::new(1.6, 0.6, 1.6), offset + Vec3::new(0.0, current_y, 0.0)),
            "metal",
            Vec2::new(4.0, 2.0),
            "metal",
        ));
        current_y += 0.6;

        draws.push(textured(
            MeshKind::Cylinder,
            TransformParams::upright(Vec3::new(0.3, 1.0, 0.3), offset + Vec3::new(0.0, current_y, 0.0)),
            "metal",
            Vec2::new(2.5, 0.5),
            "metal",
        ));
        current_y += 1.0;

        draws.push(textured(
            MeshKind::Sphere,
            TransformParams::upright(Vec3::new(0.45, 0.25, 0.45), offset + Vec3::new(0.0, current_y, 0.0)),
            "metal",
            Vec2::new(2.5, 0.5),
            "metal",
        ));
        current_y += 0.15;

        draws.push(textured(
            MeshKind::Cylinder,
            TransformParams::upright(Vec3::new(0.3, 0.8, 0.3), offset + Vec3::new(0.0, current_y, 0.0)),
            "metal",
            Vec2::new(2.5, 0.5),
            "metal",
        ));
        current_y += 0.8;

        // 杯是倒过来的锥台，绕X转180度
        draws.push(textured(
            MeshKind::TaperedCylinder,
            TransformParams::new(
                Vec3::new(1.2, 1.0, 1.2),
                Vec3::new(180.0, 0.0, 0.0),
                offset + Vec3::new(0.0, current_y + 0.7, 0.0),
            ),
            "metal",
            Vec2::new(2.5, 0.5),
            "metal",
        ));

        draws.push(textured(
            MeshKind::Cylinder,
            TransformParams::upright(Vec3::new(1.2, 0.2, 1.2), offset + Vec3::new(0.0, current_y + 0.7, 0.0)),
            "metal",
            Vec2::new(2.5, 0.5),
            "metal",
        ));
        current_y += 1.0;

        draws.push(textured(
            MeshKind::Cylinder,
            TransformParams::upright(Vec3::new(0.9, 2.0, 0.9), offset + Vec3::new(0.0, current_y - 0.2, 0.0)),
            "candle",
            Vec2::new(1.0, 0.8),
            "candle",
        ));

        draws.push(colored(
            MeshKind::Cylinder,
            TransformParams::upright(Vec3::new(0.04, 0.05, 0.04), offset + Vec3::new(0.0, current_y + 1.8, 0.0)),
            Vec3::new(0.05, 0.05, 0.05),
            "candle",
        ));

        offset + Vec3::new(0.0, current_y + 2.0, 0.0)
    }

    /// 桌布、打开的书（封面+扇形书页+中缝）、钢笔、墨水瓶、垫底的纸
    fn push_book_setup(draws: &mut Vec<DrawCall>, fan: &PageFanConfig) {
        draws.push(textured(
            MeshKind::Box,
            TransformParams::upright(Vec3::new(16.0, 0.02, 10.0), Vec3::new(0.0, -0.1, 0.0)),
            "cloth",
            Vec2::new(4.0, 4.0),
            "cloth",
        ));

        let book_position = Vec3::new(
            fan.book_position[0],
            fan.book_position[1],
            fan.book_position[2],
        );
        let sf = fan.scale_factor;

        let cover_width = 4.6 * sf;
        let cover_depth = 3.0 * sf;
        let cover_thickness = 0.25 * sf;
        let page_width = 4.3 * sf;

        // 下封面
        draws.push(textured(
            MeshKind::Box,
            TransformParams::new(
                Vec3::new(cover_width, cover_thickness * 0.95, cover_depth),
                Vec3::new(0.0, fan.base_rotation_y, 0.0),
                book_position,
            ),
            "book",
            Vec2::new(2.0, 1.5),
            "wood",
        ));

        for layer in page_fan_layers(fan) {
            draws.push(textured(
                MeshKind::Box,
                TransformParams::new(
                    Vec3::new(page_width, fan.page_thickness, cover_depth - 0.08),
                    Vec3::new(layer.rotation_x_deg, layer.yaw_deg, 0.0),
                    book_position + layer.offset,
                ),
                "page",
                Vec2::new(1.0, 1.0),
                "paper",
            ));
        }

        // 书页中缝：外层深色条加一条更暗的内条
        let total_height = fan.num_page_layers as f32 * (fan.page_thickness * 0.8);
        let divider_center_y = (-0.02 * sf) + total_height * 0.5;
        let divider_height = total_height * 1.05;
        let divider_thickness = 0.05 * sf;
        let divider_depth = cover_depth - 0.02;

        draws.push(colored(
            MeshKind::Box,
            TransformParams::new(
                Vec3::new(divider_thickness, divider_height, divider_depth),
                Vec3::new(0.0, fan.base_rotation_y, 0.0),
                book_position + Vec3::new(0.0, divider_center_y, 0.0),
            ),
            Vec3::new(0.11, 0.09, 0.08),
            "wood",
        ));
        draws.push(colored(
            MeshKind::Box,
            TransformParams::new(
                Vec3::new(divider_thickness * 0.9, divider_height * 0.95, divider_depth - 0.01),
                Vec3::new(0.0, fan.base_rotation_y, 0.0),
                book_position
                    + Vec3::new(0.0, divider_center_y - fan.page_thickness * 0.02, 0.0),
            ),
            Vec3::new(0.07, 0.06, 0.055),
            "wood",
        ));

        Self::push_pen(draws, fan, book_position, cover_width);
        Self::push_inkpot(draws, book_position, sf, cover_width);

        // 书下面垫的纸
        draws.push(textured(
            MeshKind::Box,
            TransformParams::new(
                Vec3::new(4.75, 0.01, 3.15) * (sf * 1.05),
                Vec3::new(0.0, fan.base_rotation_y + 8.0, 0.0),
                book_position + Vec3::new(-0.04, -0.27, 0.12),
            ),
            "page",
            Vec2::new(1.5, 1.5),
            "paper",
        ));
    }

    /// 钢笔平放在书旁：锥台笔身加白色锥形笔尖，笔尖沿笔身朝向延长
    fn push_pen(
        draws: &mut Vec<DrawCall>,
        fan: &PageFanConfig,
        book_position: Vec3<f32>,
        cover_width: f32,
    ) {
        let sf = fan.scale_factor;
        let pen_scale = 1.7;

        let length = 0.45 * sf * pen_scale;
        let r_rear = 0.025f32 * sf * pen_scale;
        let r_front = 0.015f32 * sf * pen_scale;
        let tip_len = 0.06 * sf * pen_scale * 2.6;
        let tip_radius = (r_front * 0.25).max(0.0005);

        let rot_y = fan.base_rotation_y + 10.0;
        let yaw_rad = rot_y.to_radians();
        let dir = Vec3::new(yaw_rad.sin(), 0.0, yaw_rad.cos()).normalize();

        let center = book_position
            + Vec3::new(
                cover_width * 0.5 + 0.85,
                -0.20 + r_rear.max(r_front) + 0.002,
                0.50 * sf,
            );

        draws.push(textured(
            MeshKind::TaperedCylinder,
            TransformParams::new(
                Vec3::new(r_rear, r_front, length),
                Vec3::new(0.0, rot_y, 0.0),
                center,
            ),
            "pen",
            Vec2::new(1.0, 1.0),
            "metal",
        ));

        let front = center + dir * (length * 0.5 + 0.003);
        let tip_pos = front + dir * (tip_len * 0.5 + 0.003);
        draws.push(colored(
            MeshKind::Cone,
            TransformParams::new(
                Vec3::new(tip_radius, tip_radius, tip_len),
                Vec3::new(0.0, rot_y, 0.0),
                tip_pos,
            ),
            Vec3::new(1.0, 1.0, 1.0),
            "metal",
        ));
    }

    /// 墨水瓶：扁球瓶身、短圆柱瓶颈、深色瓶盖
    fn push_inkpot(
        draws: &mut Vec<DrawCall>,
        book_position: Vec3<f32>,
        sf: f32,
        cover_width: f32,
    ) {
        let ink_scale = 1.5;
        let s = sf * ink_scale;
        let pos = book_position + Vec3::new(cover_width * 0.5 + 0.95, -0.30, -2.8 * sf);

        draws.push(textured(
            MeshKind::Sphere,
            TransformParams::upright(
                Vec3::new(0.4, 0.45, 0.4) * s,
                pos + Vec3::new(0.0, 0.25 * s, 0.0),
            ),
            "inkpot",
            Vec2::new(1.0, 1.0),
            "metal",
        ));
        draws.push(textured(
            MeshKind::Cylinder,
            TransformParams::upright(
                Vec3::new(0.18, 0.2, 0.18) * s,
                pos + Vec3::new(0.0, 0.5 * s, 0.0),
            ),
            "inkpot",
            Vec2::new(1.0, 1.0),
            "metal",
        ));
        draws.push(colored(
            MeshKind::Cylinder,
            TransformParams::upright(
                Vec3::new(0.22, 0.08, 0.22) * s,
                pos + Vec3::new(0.0, 0.6 * s, 0.0),
            ),
            Vec3::new(0.08, 0.08, 0.08),
            "metal",
        ));
    }

    /// 桌角合上的书：上下封面夹一摞书页，书脊单独一块贴在旋转后的一侧
    fn push_closed_book(draws: &mut Vec<DrawCall>) {
        let s = 1.25;
        let rot_y = 110.0;

        let cover_width = 4.5 * s;
        let cover_depth = 3.0 * s;
        let cover_thickness = 0.08 * s;
        let pages_height = 0.5 * s;

        let pos = Vec3::new(6.0, 0.1, -1.8);

        draws.push(textured(
            MeshKind::Box,
            TransformParams::new(
                Vec3::new(cover_width, cover_thickness, cover_depth),
                Vec3::new(0.0, rot_y, 0.0),
                pos,
            ),
            "book",
            Vec2::new(2.2, 1.8),
            "wood",
        ));

        draws.push(textured(
            MeshKind::Box,
            TransformParams::new(
                Vec3::new(cover_width * 0.96, pages_height, cover_depth * 0.94),
                Vec3::new(0.0, rot_y, 0.0),
                pos + Vec3::new(0.0, cover_thickness * 0.5 + pages_height * 0.5, 0.0),
            ),
            "page",
            Vec2::new(2.5, 2.5),
            "wood",
        ));

        // 书脊位置按书的朝向把局部偏移旋到世界系
        let spine_thickness = 0.09 * s;
        let spine_height = pages_height + cover_thickness + 0.03;
        let local_offset = Vec4::new(
            0.0,
            cover_thickness * 0.5 + pages_height * 0.5,
            -cover_depth * 0.5 - spine_thickness * 0.5 + 0.10,
            1.0,
        );
        let world_offset = Mat4::from_angle_y(Deg(rot_y)) * local_offset;
        draws.push(textured(
            MeshKind::Box,
            TransformParams::new(
                Vec3::new(cover_width * 0.985, spine_height, spine_thickness),
                Vec3::new(0.0, rot_y, 0.0),
                pos + Vec3::new(world_offset.x, world_offset.y, world_offset.z),
            ),
            "book",
            Vec2::new(1.0, 1.0),
            "wood",
        ));

        draws.push(textured(
            MeshKind::Box,
            TransformParams::new(
                Vec3::new(cover_width, cover_thickness, cover_depth),
                Vec3::new(0.0, rot_y, 0.0),
                pos + Vec3::new(0.0, cover_thickness + pages_height, 0.0),
            ),
            "book",
            Vec2::new(2.2, 1.8),
            "wood",
        ));
    }

    pub fn static_draws(&self) -> &[DrawCall] {
        &self.static_draws
    }

    pub fn flame_position(&self) -> Vec3<f32> {
        self.flame_position
    }

    /// 火苗和光晕每帧重算：核心随闪烁变亮度，光晕随脉动变大小、
    /// 半透明混合且必须在所有不透明物体之后画
    pub fn dynamic_draws(&self, elapsed: f32) -> Vec<DrawCall> {
        let flicker = flicker(elapsed);
        let pulse = glow_pulse(elapsed);

        let core = DrawCall {
            mesh: MeshKind::Sphere,
            transform: TransformParams::upright(Vec3::new(0.05, 0.25, 0.05), self.flame_position),
            surface: Surface::Color {
                rgb: Vec3::new(1.2, 0.95, 0.45) * flicker,
                alpha: 1.0,
            },
            material_tag: "flame",
            lit: false,
            blend: BlendMode::Opaque,
        };

        let glow = DrawCall {
            mesh: MeshKind::Sphere,
            transform: TransformParams::upright(
                Vec3::new(0.12, 0.40, 0.12) * pulse,
                self.flame_position + Vec3::new(0.0, 0.05, 0.0),
            ),
            surface: Surface::Color {
                rgb: Vec3::new(1.0, 0.9, 0.7),
                alpha: 0.3 * (0.9 + 0.1 * flicker),
            },
            material_tag: "flame",
            lit: false,
            blend: BlendMode::AlphaBlend,
        };

        vec![core, glow]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageFanConfig;

    #[test]
    fn page_fan_edge_layers_are_flat() {
        let fan = PageFanConfig::default();
        let layers = page_fan_layers(&fan);
        assert_eq!(layers.len(), 25);
        // i=0时normalized=-1，拱高精确为0
        assert_eq!(layers[0].rotation_x_deg, 0.0);
        // 末层normalized=(24-12.5)/12.5=0.92，拱高接近0
        assert!(layers[24].rotation_x_deg.abs() < 0.01);
    }

    #[test]
    fn page_fan_middle_layer_has_max_arch_and_near_zero_twist() {
        let fan = PageFanConfig::default();
        let layers = page_fan_layers(&fan);
        let max_arch = 0.10 * fan.scale_factor * 0.5;
        let mid = layers[12];
        assert!((-mid.rotation_x_deg - max_arch).abs() < 0.005);
        assert!((mid.yaw_deg - fan.base_rotation_y).abs() < 0.01);
    }

    #[test]
    fn page_fan_zero_layers_is_empty() {
        let fan = PageFanConfig {
            num_page_layers: 0,
            ..PageFanConfig::default()
        };
        assert!(page_fan_layers(&fan).is_empty());
    }

    #[test]
    fn scene_has_expected_static_draw_count() {
        let fan = PageFanConfig::default();
        let scene = Scene::build(&fan);
        // 桌子1 + 烛台8 + 桌布1 + 封面1 + 书页25 + 中缝2 + 钢笔2 + 墨水瓶3 + 纸1 + 合书4
        assert_eq!(scene.static_draws().len(), 23 + fan.num_page_layers);
    }

    #[test]
    fn all_static_draws_are_opaque() {
        let scene = Scene::build(&PageFanConfig::default());
        assert!(scene
            .static_draws()
            .iter()
            .all(|d| d.blend == BlendMode::Opaque));
    }

    #[test]
    fn flame_sits_above_the_wick() {
        let scene = Scene::build(&PageFanConfig::default());
        let flame = scene.flame_position();
        assert!((flame.x - -3.5).abs() < 1e-6);
        assert!((flame.y - 5.55).abs() < 1e-5);
        assert!((flame.z - -3.0).abs() < 1e-6);
    }

    #[test]
    fn glow_is_blended_and_drawn_after_core() {
        let scene = Scene::build(&PageFanConfig::default());
        let dynamic = scene.dynamic_draws(1.25);
        assert_eq!(dynamic.len(), 2);
        assert_eq!(dynamic[0].blend, BlendMode::Opaque);
        assert_eq!(dynamic[1].blend, BlendMode::AlphaBlend);
        assert!(!dynamic[0].lit && !dynamic[1].lit);
    }
}
