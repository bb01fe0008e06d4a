use cgmath::{ElementWise, InnerSpace, Vector2 as Vec2, Vector3 as Vec3};

use crate::light::{DirectionalLight, Lighting, PointLight};
use crate::material::Material;
use crate::texture::Texture;

#[derive(Debug)]
pub struct FragmentData<'a> {
    pub world_pos: Vec3<f32>,
    pub normal: Vec3<f32>,
    pub uv: Vec2<f32>,
    pub color: Vec3<f32>, // 顶点颜色插值结果
    pub texture: Option<&'a Texture>,
    pub material: &'a Material,
    pub camera_pos: Vec3<f32>,
}

// 定义 Shader 的通用行为
pub trait FragmentShader {
    // 输入插值后的片元数据，输出最终的颜色 (0.0 ~ 1.0 范围的 Vec3)
    fn shade(&self, data: FragmentData) -> Vec3<f32>;
}

fn clamp_color(mut c: Vec3<f32>) -> Vec3<f32> {
    c.x = c.x.clamp(0.0, 1.0);
    c.y = c.y.clamp(0.0, 1.0);
    c.z = c.z.clamp(0.0, 1.0);
    c
}

/// 经典Blinn-Phong：一盏方向光加两盏点光的完整光照
pub struct BlinnPhongShader {
    pub lighting: Lighting,
}

impl BlinnPhongShader {
    /// 单个光照方向的漫反射+高光贡献（环境光由调用方累加）
    fn shade_direction(
        light_dir: Vec3<f32>,
        diffuse_color: Vec3<f32>,
        specular_color: Vec3<f32>,
        data: &FragmentData,
        base_color: Vec3<f32>,
    ) -> Vec3<f32> {
        // 漫反射分量 (Diffuse)
        let diff = data.normal.dot(-light_dir).max(0.0);
        let diffuse = diffuse_color
            .mul_element_wise(data.material.diffuse)
            .mul_element_wise(base_color)
            * diff;

        // 高光分量 (Specular)，半程向量
        let view_dir = (data.camera_pos - data.world_pos).normalize();
        let half_dir = (-light_dir + view_dir).normalize();
        let spec = data.normal.dot(half_dir).max(0.0).powf(data.material.shininess);
        let specular = specular_color.mul_element_wise(data.material.specular) * spec;

        diffuse + specular
    }

    fn directional_contribution(
        light: &DirectionalLight,
        data: &FragmentData,
        base_color: Vec3<f32>,
    ) -> Vec3<f32> {
        if !light.active {
            return Vec3::new(0.0, 0.0, 0.0);
        }
        let ambient = light.ambient.mul_element_wise(base_color);
        ambient
            + Self::shade_direction(
                light.direction.normalize(),
                light.diffuse,
                light.specular,
                data,
                base_color,
            )
    }

    fn point_contribution(
        light: &PointLight,
        data: &FragmentData,
        base_color: Vec3<f32>,
    ) -> Vec3<f32> {
        if !light.active {
            return Vec3::new(0.0, 0.0, 0.0);
        }
        let offset = data.world_pos - light.position;
        let distance = offset.magnitude();
        // 标准的二次衰减系数
        let attenuation = 1.0 / (1.0 + 0.09 * distance + 0.032 * distance * distance);

        let light_dir = if distance > 1e-6 {
            offset / distance
        } else {
            Vec3::new(0.0, -1.0, 0.0)
        };

        let ambient = light.ambient.mul_element_wise(base_color);
        (ambient + Self::shade_direction(light_dir, light.diffuse, light.specular, data, base_color))
            * attenuation
    }
}

impl FragmentShader for BlinnPhongShader {
    fn shade(&self, data: FragmentData) -> Vec3<f32> {
        // 优先使用纹理颜色作为基础色
        let mut base_color = data.color;
        if let Some(tex) = data.texture {
            base_color = tex.sample(data.uv);
        }

        if !self.lighting.use_lighting {
            return clamp_color(base_color);
        }

        let mut final_color =
            Self::directional_contribution(&self.lighting.directional, &data, base_color);
        for point in &self.lighting.point_lights {
            final_color += Self::point_contribution(point, &data, base_color);
        }

        clamp_color(final_color)
    }
}

/// 不参与光照的纯色着色，蜡烛芯、火焰、光晕这类自发光物体用
pub struct UnlitShader;

impl FragmentShader for UnlitShader {
    fn shade(&self, data: FragmentData) -> Vec3<f32> {
        let mut base_color = data.color;
        if let Some(tex) = data.texture {
            base_color = tex.sample(data.uv);
        }
        clamp_color(base_color)
    }
}
