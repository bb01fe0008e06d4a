use serde::Deserialize;
use std::fs::File;
use std::path::Path;

/// 打开的书的页扇参数，原始值都是调好的常量，允许从配置覆盖
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PageFanConfig {
    pub num_page_layers: usize,
    pub page_thickness: f32,
    pub scale_factor: f32,
    pub base_rotation_y: f32,
    pub book_position: [f32; 3],
}

impl Default for PageFanConfig {
    fn default() -> Self {
        Self {
            num_page_layers: 25,
            // 0.025 * 1.4（书的整体缩放）
            page_thickness: 0.035,
            scale_factor: 1.4,
            base_rotation_y: 4.5,
            book_position: [-2.0, 0.20, 2.1],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: usize,
    pub height: usize,
    /// 超采样倍数，1表示直接按窗口分辨率渲染
    pub ssaa: usize,
    pub texture_dir: String,
    pub page_fan: PageFanConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            ssaa: 1,
            texture_dir: "textures".to_string(),
            page_fan: PageFanConfig::default(),
        }
    }
}

/// 从命令行参数指定的json读取配置。
/// 没有给参数时用内置默认值；给了参数但读不了就报错退出。
pub fn load_config(path: Option<&str>) -> Result<SceneConfig, Box<dyn std::error::Error>> {
    match path {
        None => {
            println!("未指定配置文件，使用内置默认配置");
            Ok(SceneConfig::default())
        }
        Some(p) => {
            let file = File::open(Path::new(p))?;
            let config: SceneConfig = serde_json::from_reader(file)?;
            println!("成功读取配置: {}", p);
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_fan_matches_scene_literals() {
        let fan = PageFanConfig::default();
        assert_eq!(fan.num_page_layers, 25);
        assert!((fan.page_thickness - 0.035).abs() < 1e-6);
        assert!((fan.scale_factor - 1.4).abs() < 1e-6);
        assert!((fan.base_rotation_y - 4.5).abs() < 1e-6);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: SceneConfig =
            serde_json::from_str(r#"{"width": 640, "height": 480}"#).unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.ssaa, 1);
        assert_eq!(config.page_fan.num_page_layers, 25);
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.width, 1000);
        assert_eq!(config.height, 800);
    }

    #[test]
    fn unreadable_config_path_is_an_error() {
        assert!(load_config(Some("no/such/config.json")).is_err());
    }
}
