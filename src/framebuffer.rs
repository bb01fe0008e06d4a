use rayon::prelude::*;

/// 背景（清屏后）的归一化深度值
const BACKGROUND_DEPTH: f32 = 1.0;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
    pub depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            data: vec![0; width * height],
            depth: vec![BACKGROUND_DEPTH; width * height],
        }
    }

    pub fn clear(&mut self, color: u32) {
        self.data.fill(color);
        self.depth.fill(BACKGROUND_DEPTH);
    }

    /// 不透明写入：深度测试通过才写颜色，同时写深度
    pub fn put_pixel(&mut self, x: usize, y: usize, color: u32, depth: f32) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if depth < self.depth[idx] {
                self.data[idx] = color;
                self.depth[idx] = depth;
            }
        }
    }

    /// 半透明写入：深度测试照常，但不写深度，颜色按alpha混合。
    /// 光晕绘制走这里，保证它永远不会遮挡后画的不透明物体深度。
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: u32, alpha: f32, depth: f32) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if depth < self.depth[idx] {
                let dst = self.data[idx];
                let a = alpha.clamp(0.0, 1.0);
                let mix = |s: u32, d: u32| -> u32 {
                    (s as f32 * a + d as f32 * (1.0 - a)) as u32
                };
                let r = mix((color >> 16) & 0xFF, (dst >> 16) & 0xFF);
                let g = mix((color >> 8) & 0xFF, (dst >> 8) & 0xFF);
                let b = mix(color & 0xFF, dst & 0xFF);
                self.data[idx] = 0xFF000000 | (r << 16) | (g << 8) | b;
                // 深度保持原值
            }
        }
    }

    /// 超采样降分辨率：每个输出像素取 factor*factor 区域的平均色
    pub fn ssaa(&self, factor: usize) -> Self {
        let new_width = self.width / factor;
        let new_height = self.height / factor;
        let mut new_data = vec![0u32; new_width * new_height];

        new_data
            .par_chunks_mut(new_width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    let mut r = 0u32;
                    let mut g = 0u32;
                    let mut b = 0u32;
                    let count = (factor * factor) as u32;

                    for dy in 0..factor {
                        for dx in 0..factor {
                            let src_x = x * factor + dx;
                            let src_y = y * factor + dy;
                            let color = self.data[src_y * self.width + src_x];
                            r += (color >> 16) & 0xFF;
                            g += (color >> 8) & 0xFF;
                            b += color & 0xFF;
                        }
                    }

                    *out = 0xFF000000
                        | ((r / count) << 16)
                        | ((g / count) << 8)
                        | (b / count);
                }
            });

        Self {
            width: new_width,
            height: new_height,
            data: new_data,
            depth: vec![BACKGROUND_DEPTH; new_width * new_height],
        }
    }

    pub fn save_to_image(&self, filepath: &str) -> Result<(), image::ImageError> {
        use image::{ImageBuffer, Rgba};

        let mut img = ImageBuffer::new(self.width as u32, self.height as u32);

        for y in 0..self.height {
            for x in 0..self.width {
                let color = self.data[y * self.width + x];
                let r = ((color >> 16) & 0xFF) as u8;
                let g = ((color >> 8) & 0xFF) as u8;
                let b = (color & 0xFF) as u8;

                img.put_pixel(x as u32, y as u32, Rgba([r, g, b, 255]));
            }
        }

        img.save(filepath)
    }
}
