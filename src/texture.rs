use cgmath::{Vector2 as Vec2, Vector3 as Vec3};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
}

impl Texture {
    /// 纯白占位纹理
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0xFFFFFFFF; width * height],
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        let mut data = Vec::with_capacity((width * height) as usize);

        for y in 0..height {
            for x in 0..width {
                let pixel = img.get_pixel(x, y);
                let color = ((pixel[3] as u32) << 24)
                    | ((pixel[0] as u32) << 16)
                    | ((pixel[1] as u32) << 8)
                    | (pixel[2] as u32);
                data.push(color);
            }
        }
        Ok(Texture {
            width: width as usize,
            height: height as usize,
            data,
        })
    }

    /// 按UV采样，小数部分取余实现重复平铺
    pub fn sample(&self, uv: Vec2<f32>) -> Vec3<f32> {
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);

        let x = (u * self.width as f32) as usize;
        let y = ((1.0 - v) * self.height as f32) as usize; // 翻转V轴，UV(0,0)对应纹理左下角

        // 防止坐标越界
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);

        self.get_pixel_color(x, y)
    }

    fn get_pixel_color(&self, x: usize, y: usize) -> Vec3<f32> {
        let color = self.data[y * self.width + x];
        Vec3::new(
            ((color >> 16) & 0xFF) as f32 / 255.0,
            ((color >> 8) & 0xFF) as f32 / 255.0,
            (color & 0xFF) as f32 / 255.0,
        )
    }
}

/// 场景要加载的8张纹理，按标签索引
const SCENE_TEXTURE_MANIFEST: [(&str, &str); 8] = [
    ("wood", "wood.jpg"),
    ("metal", "metal.jpg"),
    ("candle", "candle.jpg"),
    ("book", "book.jpg"),
    ("page", "page.jpg"),
    ("pen", "pen.jpg"),
    ("inkpot", "inkpot.png"),
    ("cloth", "cloth.jpg"),
];

/// 标签到纹理的映射表。初始化时加载一次，之后只读。
/// 查不到标签时返回None，由调用方退回无纹理着色。
pub struct TextureRegistry {
    textures: HashMap<String, Texture>,
}

impl TextureRegistry {
    pub fn empty() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    /// 加载场景的全部纹理。单张加载失败只打日志并跳过，场景继续渲染。
    pub fn load_scene_textures(texture_dir: &Path) -> Self {
        let mut registry = Self::empty();
        for (tag, filename) in SCENE_TEXTURE_MANIFEST {
            registry.load(&texture_dir.join(filename), tag);
        }
        registry
    }

    pub fn load(&mut self, path: &Path, tag: &str) {
        match Texture::from_file(path) {
            Ok(texture) => {
                println!(
                    "成功加载纹理: {} ({}x{})",
                    path.display(),
                    texture.width,
                    texture.height
                );
                self.textures.insert(tag.to_string(), texture);
            }
            Err(e) => {
                eprintln!("纹理加载失败: {}: {}", path.display(), e);
            }
        }
    }

    pub fn lookup(&self, tag: &str) -> Option<&Texture> {
        self.textures.get(tag)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_texture_samples_white() {
        let tex = Texture::new(4, 4);
        let c = tex.sample(Vec2::new(0.5, 0.5));
        assert_eq!(c, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn sample_wraps_uv_outside_unit_range() {
        let mut tex = Texture::new(2, 2);
        // 左下角像素涂成红色（V轴翻转后是data的最后一行第一个）
        tex.data[2] = 0xFFFF0000;
        let direct = tex.sample(Vec2::new(0.1, 0.1));
        let wrapped = tex.sample(Vec2::new(2.1, -1.9));
        assert_eq!(direct, wrapped);
        assert_eq!(direct, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn registry_lookup_missing_tag_returns_none() {
        let registry = TextureRegistry::empty();
        assert!(registry.lookup("wood").is_none());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_load_failure_is_non_fatal() {
        let mut registry = TextureRegistry::empty();
        registry.load(Path::new("does/not/exist.png"), "ghost");
        assert!(registry.lookup("ghost").is_none());
    }
}
