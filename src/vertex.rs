use cgmath::{InnerSpace, Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4};

/// 带属性的模型空间顶点（位置、颜色、法线、UV）
#[derive(Debug, Clone, Copy)]
pub struct ColoredVertex {
    pub pos: Vec3<f32>,
    pub color: Vec3<f32>,
    pub normal: Vec3<f32>,
    pub uv: Vec2<f32>,
}

impl ColoredVertex {
    pub fn new(pos: Vec3<f32>, normal: Vec3<f32>, uv: Vec2<f32>) -> Self {
        Self {
            pos,
            // 默认白色，最终颜色由纹理/材质决定
            color: Vec3::new(1.0, 1.0, 1.0),
            normal,
            uv,
        }
    }
}

/// 顶点着色后的裁剪空间顶点
#[derive(Debug, Clone, Copy)]
pub struct ClipSpaceVertex {
    pub position: Vec4<f32>,
    pub world_pos: Vec3<f32>,
    pub normal: Vec3<f32>,
    pub uv: Vec2<f32>,
    pub color: Vec3<f32>,
}

/// 光栅化阶段的屏幕空间点（带深度和插值属性）
#[derive(Debug, Clone, Copy)]
pub struct RasterPoint {
    pub pos: Vec2<f32>,
    pub z: f32,
    pub world_pos: Vec3<f32>,
    pub normal: Vec3<f32>,
    pub uv: Vec2<f32>,
    pub color: Vec3<f32>,
}

#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [ColoredVertex; 3],
    pub normal: Vec3<f32>,
}

impl Triangle {
    fn compute_normal(v0: &ColoredVertex, v1: &ColoredVertex, v2: &ColoredVertex) -> Vec3<f32> {
        let edge1 = v1.pos - v0.pos;
        let edge2 = v2.pos - v0.pos;
        edge1.cross(edge2).normalize()
    }

    pub fn new(v0: ColoredVertex, v1: ColoredVertex, v2: ColoredVertex) -> Self {
        let normal = Self::compute_normal(&v0, &v1, &v2);
        Self {
            vertices: [v0, v1, v2],
            normal,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RasterTriangle {
    pub vertices: [RasterPoint; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_normal_faces_up_for_ccw_xz_plane() {
        let v = |x: f32, z: f32| {
            ColoredVertex::new(
                Vec3::new(x, 0.0, z),
                Vec3::new(0.0, 1.0, 0.0),
                Vec2::new(0.0, 0.0),
            )
        };
        // XZ平面上逆时针（从+Y看）排列的三角形
        let tri = Triangle::new(v(0.0, 0.0), v(0.0, 1.0), v(1.0, 0.0));
        assert!(tri.normal.y > 0.99);
    }
}
