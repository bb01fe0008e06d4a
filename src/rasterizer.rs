use crate::vertex::RasterPoint;
use cgmath::{Vector2 as Vec2, Vector3 as Vec3, dot};

pub fn get_barycentric_coords(
    vertices: &[Vec2<f32>; 3],
    p: &Vec2<f32>,
) -> Option<(f32, f32, f32)> {
    let v0 = vertices[1] - vertices[0];
    let v1 = vertices[2] - vertices[0];
    let v2 = *p - vertices[0];

    let d00 = dot(v0, v0);
    let d01 = dot(v0, v1);
    let d11 = dot(v1, v1);
    let d20 = dot(v2, v0);
    let d21 = dot(v2, v1);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < 1e-6 {
        return None; // 三角形面积为零，无法计算重心坐标
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    let u = 1.0 - v - w;

    Some((u, v, w))
}

pub fn interpolate_depth(points: &[RasterPoint; 3], bary: (f32, f32, f32)) -> f32 {
    let (u, v, w) = bary;
    points[0].z * u + points[1].z * v + points[2].z * w
}

pub fn interpolate_color(points: &[RasterPoint; 3], bary: (f32, f32, f32)) -> Vec3<f32> {
    let (u, v, w) = bary;
    points[0].color * u + points[1].color * v + points[2].color * w
}

pub fn interpolate_normal(points: &[RasterPoint; 3], bary: (f32, f32, f32)) -> Vec3<f32> {
    let (u, v, w) = bary;
    points[0].normal * u + points[1].normal * v + points[2].normal * w
}

pub fn interpolate_uv(points: &[RasterPoint; 3], bary: (f32, f32, f32)) -> Vec2<f32> {
    let (u, v, w) = bary;
    points[0].uv * u + points[1].uv * v + points[2].uv * w
}

pub fn interpolate_world_pos(points: &[RasterPoint; 3], bary: (f32, f32, f32)) -> Vec3<f32> {
    let (u, v, w) = bary;
    points[0].world_pos * u + points[1].world_pos * v + points[2].world_pos * w
}

/// 包围盒，裁到帧缓冲范围内，避免离屏三角形白白遍历
pub fn get_clamped_box(
    vertices: &[Vec2<f32>; 3],
    width: usize,
    height: usize,
) -> Option<(usize, usize, usize, usize)> {
    let mut min_x = vertices[0].x;
    let mut max_x = vertices[0].x;
    let mut min_y = vertices[0].y;
    let mut max_y = vertices[0].y;

    for v in vertices.iter().skip(1) {
        min_x = min_x.min(v.x);
        max_x = max_x.max(v.x);
        min_y = min_y.min(v.y);
        max_y = max_y.max(v.y);
    }

    if max_x < 0.0 || max_y < 0.0 || min_x >= width as f32 || min_y >= height as f32 {
        return None; // 完全在屏幕外
    }

    let min_x = (min_x.floor().max(0.0)) as usize;
    let min_y = (min_y.floor().max(0.0)) as usize;
    let max_x = (max_x.ceil() as usize).min(width - 1);
    let max_y = (max_y.ceil() as usize).min(height - 1);

    Some((min_x, min_y, max_x, max_y))
}

pub fn is_inside_triangle(vertices: &[Vec2<f32>; 3], p: &Vec2<f32>) -> bool {
    let v0 = vertices[1] - vertices[0];
    let v1 = vertices[2] - vertices[1];
    let v2 = vertices[0] - vertices[2];

    let p0 = *p - vertices[0];
    let p1 = *p - vertices[1];
    let p2 = *p - vertices[2];

    let cross0 = v0.x * p0.y - v0.y * p0.x;
    let cross1 = v1.x * p1.y - v1.y * p1.x;
    let cross2 = v2.x * p2.y - v2.y * p2.x;

    (cross0 >= 0.0 && cross1 >= 0.0 && cross2 >= 0.0)
        || (cross0 <= 0.0 && cross1 <= 0.0 && cross2 <= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barycentric_at_vertices() {
        let tri = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        let (u, v, w) = get_barycentric_coords(&tri, &Vec2::new(0.0, 0.0)).unwrap();
        assert!((u - 1.0).abs() < 1e-5 && v.abs() < 1e-5 && w.abs() < 1e-5);

        let (u, v, w) = get_barycentric_coords(&tri, &Vec2::new(10.0, 0.0)).unwrap();
        assert!(u.abs() < 1e-5 && (v - 1.0).abs() < 1e-5 && w.abs() < 1e-5);
    }

    #[test]
    fn degenerate_triangle_has_no_barycentric() {
        let tri = [
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(10.0, 10.0),
        ];
        assert!(get_barycentric_coords(&tri, &Vec2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn clamped_box_rejects_offscreen_triangle() {
        let tri = [
            Vec2::new(-30.0, -30.0),
            Vec2::new(-20.0, -30.0),
            Vec2::new(-30.0, -20.0),
        ];
        assert!(get_clamped_box(&tri, 100, 100).is_none());
    }

    #[test]
    fn clamped_box_clips_to_framebuffer() {
        let tri = [
            Vec2::new(-5.0, 50.0),
            Vec2::new(150.0, 50.0),
            Vec2::new(50.0, 150.0),
        ];
        let (min_x, min_y, max_x, max_y) = get_clamped_box(&tri, 100, 100).unwrap();
        assert_eq!((min_x, min_y), (0, 50));
        assert_eq!((max_x, max_y), (99, 99));
    }

    #[test]
    fn inside_test_accepts_centroid() {
        let tri = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(is_inside_triangle(&tri, &Vec2::new(2.0, 2.0)));
        assert!(!is_inside_triangle(&tri, &Vec2::new(9.0, 9.0)));
    }
}
