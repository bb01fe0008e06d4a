use crate::vertex::ClipSpaceVertex;

pub trait Clipper {
    // 接收一个裁剪空间的三角形
    // 返回裁剪后剩下的零个或一个三角形
    fn clip_triangle(&self, triangle: &[ClipSpaceVertex; 3]) -> Vec<[ClipSpaceVertex; 3]>;
}

// 只做"整体丢弃"的简单裁剪器：三个顶点全在相机后面才剔除
pub struct SimpleClipper;

impl Clipper for SimpleClipper {
    fn clip_triangle(&self, triangle: &[ClipSpaceVertex; 3]) -> Vec<[ClipSpaceVertex; 3]> {
        let v0_w = triangle[0].position.w;
        let v1_w = triangle[1].position.w;
        let v2_w = triangle[2].position.w;

        if v0_w < 0.0 && v1_w < 0.0 && v2_w < 0.0 {
            vec![]
        } else {
            vec![*triangle]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4};

    fn vertex_with_w(w: f32) -> ClipSpaceVertex {
        ClipSpaceVertex {
            position: Vec4::new(0.0, 0.0, 0.0, w),
            world_pos: Vec3::new(0.0, 0.0, 0.0),
            normal: Vec3::new(0.0, 1.0, 0.0),
            uv: Vec2::new(0.0, 0.0),
            color: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn triangle_fully_behind_camera_is_discarded() {
        let tri = [vertex_with_w(-1.0), vertex_with_w(-2.0), vertex_with_w(-0.5)];
        assert!(SimpleClipper.clip_triangle(&tri).is_empty());
    }

    #[test]
    fn triangle_in_front_is_kept() {
        let tri = [vertex_with_w(1.0), vertex_with_w(2.0), vertex_with_w(0.5)];
        assert_eq!(SimpleClipper.clip_triangle(&tri).len(), 1);
    }
}
