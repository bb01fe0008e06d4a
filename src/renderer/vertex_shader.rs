use crate::vertex::{ClipSpaceVertex, Triangle};
use cgmath::{InnerSpace, Matrix4 as Mat4, Vector2 as Vec2};

pub struct VertexShaderUniforms<'a> {
    pub model_matrix: &'a Mat4<f32>,
    pub mvp_matrix: &'a Mat4<f32>,
    pub normal_matrix: &'a Mat4<f32>,
    /// 每次绘制的UV平铺倍数
    pub uv_scale: Vec2<f32>,
}

pub trait VertexShader {
    // 接收一个模型空间的三角形和uniforms
    // 返回一个裁剪空间的三角形
    fn shade_triangle(
        &self,
        triangle: &Triangle,
        uniforms: &VertexShaderUniforms,
    ) -> [ClipSpaceVertex; 3];
}

pub struct DefaultVertexShader;

impl VertexShader for DefaultVertexShader {
    fn shade_triangle(
        &self,
        triangle: &Triangle,
        uniforms: &VertexShaderUniforms,
    ) -> [ClipSpaceVertex; 3] {
        triangle.vertices.map(|v| ClipSpaceVertex {
            position: *uniforms.mvp_matrix * v.pos.extend(1.0),
            world_pos: (*uniforms.model_matrix * v.pos.extend(1.0)).truncate(),
            normal: (*uniforms.normal_matrix * v.normal.extend(0.0))
                .truncate()
                .normalize(),
            uv: Vec2::new(v.uv.x * uniforms.uv_scale.x, v.uv.y * uniforms.uv_scale.y),
            color: v.color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::ColoredVertex;
    use cgmath::{SquareMatrix, Vector3 as Vec3};

    #[test]
    fn uv_scale_multiplies_vertex_uv() {
        let tri = Triangle::new(
            ColoredVertex::new(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec2::new(1.0, 1.0),
            ),
            ColoredVertex::new(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec2::new(0.5, 0.25),
            ),
            ColoredVertex::new(
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec2::new(0.0, 0.0),
            ),
        );
        let identity = Mat4::identity();
        let uniforms = VertexShaderUniforms {
            model_matrix: &identity,
            mvp_matrix: &identity,
            normal_matrix: &identity,
            uv_scale: Vec2::new(4.0, 2.0),
        };
        let out = DefaultVertexShader.shade_triangle(&tri, &uniforms);
        assert_eq!(out[0].uv, Vec2::new(4.0, 2.0));
        assert_eq!(out[1].uv, Vec2::new(2.0, 0.5));
    }
}
