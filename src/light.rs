use cgmath::{InnerSpace, Vector3 as Vec3};

/// 方向光（模拟自上而下的柔和环境照明）
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub direction: Vec3<f32>,
    pub ambient: Vec3<f32>,
    pub diffuse: Vec3<f32>,
    pub specular: Vec3<f32>,
    pub active: bool,
}

/// 点光源，0号槽位是每帧更新的烛光
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3<f32>,
    pub ambient: Vec3<f32>,
    pub diffuse: Vec3<f32>,
    pub specular: Vec3<f32>,
    pub active: bool,
}

/// 整个场景的光照配置：一盏方向光加两盏点光
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    pub directional: DirectionalLight,
    pub point_lights: [PointLight; 2],
    pub use_lighting: bool,
}

/// 烛光基础漫反射色，闪烁系数在它上面做调制
const FLAME_BASE_DIFFUSE: Vec3<f32> = Vec3::new(0.95, 0.60, 0.25);
const FLAME_BASE_AMBIENT: Vec3<f32> = Vec3::new(0.07, 0.04, 0.02);
const FLAME_BASE_SPECULAR: Vec3<f32> = Vec3::new(1.0, 0.8, 0.5);

impl Lighting {
    /// 场景初始化时推送一次的固定光照参数。
    /// 方向光和1号点光之后不再改动，0号点光每帧由闪烁动画覆写。
    pub fn still_life() -> Self {
        Self {
            directional: DirectionalLight {
                direction: Vec3::new(-0.2, -1.0, -0.3).normalize(),
                ambient: Vec3::new(0.12, 0.12, 0.12),
                diffuse: Vec3::new(0.55, 0.52, 0.48),
                specular: Vec3::new(0.4, 0.4, 0.4),
                active: true,
            },
            point_lights: [
                // 0号：暖色烛光
                PointLight {
                    position: Vec3::new(0.0, 3.0, 0.0),
                    ambient: Vec3::new(0.06, 0.03, 0.02),
                    diffuse: FLAME_BASE_DIFFUSE,
                    specular: FLAME_BASE_SPECULAR,
                    active: true,
                },
                // 1号：左后方冷色补光，避免死黑阴影
                PointLight {
                    position: Vec3::new(-4.0, 5.0, -2.0),
                    ambient: Vec3::new(0.03, 0.03, 0.05),
                    diffuse: Vec3::new(0.35, 0.45, 0.6),
                    specular: Vec3::new(0.35, 0.35, 0.4),
                    active: true,
                },
            ],
            use_lighting: true,
        }
    }

    /// 每帧调用：火焰位置跟随布局、颜色按闪烁系数调制。
    /// 只动0号点光，其余光源保持初始值。
    pub fn apply_flicker(&mut self, flicker: f32, flame_pos: Vec3<f32>) {
        let light = &mut self.point_lights[0];
        light.position = flame_pos;
        light.diffuse = FLAME_BASE_DIFFUSE * flicker;
        light.ambient = FLAME_BASE_AMBIENT * (0.6 + 0.4 * flicker);
        light.specular = FLAME_BASE_SPECULAR * flicker;
        light.active = true;
    }
}

/// 烛光强度随时间的确定性波动。
/// 振幅0.12+0.03，所以取值范围始终在[0.77, 1.07]之内。
pub fn flicker(elapsed: f32) -> f32 {
    0.92 + 0.12 * (elapsed * 12.0).sin() + 0.03 * (elapsed * 37.0).sin()
}

/// 光晕球体的独立脉动系数
pub fn glow_pulse(elapsed: f32) -> f32 {
    1.0 + 0.08 * (elapsed * 8.0).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flicker_at_zero_is_base_value() {
        assert!((flicker(0.0) - 0.92).abs() < 1e-6);
    }

    #[test]
    fn flicker_is_bounded_for_sampled_times() {
        for i in 0..10_000 {
            let t = i as f32 * 0.013;
            let f = flicker(t);
            assert!((0.77..=1.07).contains(&f), "flicker({t}) = {f}");
        }
    }

    #[test]
    fn flicker_is_deterministic() {
        assert_eq!(flicker(3.7), flicker(3.7));
    }

    #[test]
    fn glow_pulse_is_bounded() {
        for i in 0..10_000 {
            let t = i as f32 * 0.017;
            let g = glow_pulse(t);
            assert!((0.92..=1.08).contains(&g), "glow_pulse({t}) = {g}");
        }
    }

    #[test]
    fn apply_flicker_only_touches_point_light_zero() {
        let mut lighting = Lighting::still_life();
        let before = lighting;
        let flame_pos = Vec3::new(-3.5, 5.55, -3.0);
        lighting.apply_flicker(1.0, flame_pos);

        // flicker=1.0 时颜色应等于基础值
        assert_eq!(lighting.point_lights[0].position, flame_pos);
        assert_eq!(lighting.point_lights[0].diffuse, FLAME_BASE_DIFFUSE);
        assert_eq!(lighting.point_lights[0].specular, FLAME_BASE_SPECULAR);

        // 方向光和1号点光保持不变
        assert_eq!(
            lighting.directional.diffuse,
            before.directional.diffuse
        );
        assert_eq!(
            lighting.point_lights[1].position,
            before.point_lights[1].position
        );
        assert_eq!(
            lighting.point_lights[1].diffuse,
            before.point_lights[1].diffuse
        );
    }

    #[test]
    fn apply_flicker_scales_ambient_with_damped_factor() {
        let mut lighting = Lighting::still_life();
        lighting.apply_flicker(0.77, Vec3::new(0.0, 0.0, 0.0));
        let expected = FLAME_BASE_AMBIENT * (0.6 + 0.4 * 0.77);
        let got = lighting.point_lights[0].ambient;
        assert!((got.x - expected.x).abs() < 1e-6);
        assert!((got.y - expected.y).abs() < 1e-6);
        assert!((got.z - expected.z).abs() < 1e-6);
    }
}
