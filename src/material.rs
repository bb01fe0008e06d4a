use cgmath::Vector3 as Vec3;

/// 物体表面材质：漫反射色、高光色、反光度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub tag: &'static str,
    pub diffuse: Vec3<f32>,
    pub specular: Vec3<f32>,
    pub shininess: f32,
}

impl Material {
    fn new(tag: &'static str, diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            tag,
            diffuse: Vec3::new(diffuse[0], diffuse[1], diffuse[2]),
            specular: Vec3::new(specular[0], specular[1], specular[2]),
            shininess,
        }
    }

    /// 查不到材质名时的保底材质，保证任何绘制都拿得到材质
    pub fn fallback() -> Self {
        Self::new("default", [0.8, 0.8, 0.8], [0.2, 0.2, 0.2], 8.0)
    }
}

/// 场景用到的固定材质表，初始化一次之后只读
pub struct MaterialRegistry {
    materials: Vec<Material>,
}

impl MaterialRegistry {
    /// 场景的五种固定材质，数值都是调好的字面量
    pub fn define_materials() -> Self {
        let materials = vec![
            Material::new("metal", [0.7, 0.68, 0.6], [0.95, 0.92, 0.85], 64.0),
            // 木桌
            Material::new("wood", [0.45, 0.3, 0.15], [0.05, 0.05, 0.05], 8.0),
            // 蜡烛（蜡质）
            Material::new("candle", [0.95, 0.92, 0.85], [0.2, 0.2, 0.2], 12.0),
            // 火焰（偏亮、略带高光）
            Material::new("flame", [1.0, 0.7, 0.25], [0.9, 0.6, 0.2], 16.0),
            // 水泥地面/桌面
            Material::new("cement", [0.6, 0.6, 0.6], [0.3, 0.3, 0.3], 16.0),
        ];
        Self { materials }
    }

    /// 按名字查材质，查不到时静默退回默认材质，永远不会失败
    pub fn lookup(&self, tag: &str) -> Material {
        self.materials
            .iter()
            .find(|m| m.tag == tag)
            .copied()
            .unwrap_or_else(Material::fallback)
    }
}
