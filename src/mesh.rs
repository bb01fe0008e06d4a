use cgmath::{InnerSpace, Vector2 as Vec2, Vector3 as Vec3};
use std::f32::consts::PI;

use crate::vertex::{ColoredVertex, Triangle};

/// 场景绘制用到的五种基础网格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Box,
    Cylinder,
    TaperedCylinder,
    Cone,
    Sphere,
}

const CYLINDER_SEGMENTS: usize = 36;
const CONE_SEGMENTS: usize = 36;
const SPHERE_SECTORS: usize = 24;
const SPHERE_STACKS: usize = 16;

/// 场景初始化时生成一次的网格库，之后只读
pub struct MeshLibrary {
    box_mesh: Vec<Triangle>,
    cylinder: Vec<Triangle>,
    tapered_cylinder: Vec<Triangle>,
    cone: Vec<Triangle>,
    sphere: Vec<Triangle>,
}

impl MeshLibrary {
    pub fn load_scene_meshes() -> Self {
        let library = Self {
            box_mesh: build_box(),
            cylinder: build_cylinder(CYLINDER_SEGMENTS),
            tapered_cylinder: build_tapered_cylinder(CYLINDER_SEGMENTS),
            cone: build_cone(CONE_SEGMENTS),
            sphere: build_sphere(SPHERE_SECTORS, SPHERE_STACKS),
        };
        let total = library.box_mesh.len()
            + library.cylinder.len()
            + library.tapered_cylinder.len()
            + library.cone.len()
            + library.sphere.len();
        println!("基础网格生成完成，三角形总数：{}", total);
        library
    }

    pub fn get(&self, kind: MeshKind) -> &[Triangle] {
        match kind {
            MeshKind::Box => &self.box_mesh,
            MeshKind::Cylinder => &self.cylinder,
            MeshKind::TaperedCylinder => &self.tapered_cylinder,
            MeshKind::Cone => &self.cone,
            MeshKind::Sphere => &self.sphere,
        }
    }
}

/// 四个顶点按逆时针（从外侧看）拆成两个三角形
fn push_quad(
    triangles: &mut Vec<Triangle>,
    v0: ColoredVertex,
    v1: ColoredVertex,
    v2: ColoredVertex,
    v3: ColoredVertex,
) {
    triangles.push(Triangle::new(v0, v1, v2));
    triangles.push(Triangle::new(v0, v2, v3));
}

/// 以原点为中心、边长为1的立方体，缩放参数即物体尺寸
fn build_box() -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(12);
    let h = 0.5;

    // 每个面：四个角（从外侧看逆时针）+ 面法线
    let faces: [([Vec3<f32>; 4], Vec3<f32>); 6] = [
        // +Z 前面
        (
            [
                Vec3::new(-h, -h, h),
                Vec3::new(h, -h, h),
                Vec3::new(h, h, h),
                Vec3::new(-h, h, h),
            ],
            Vec3::new(0.0, 0.0, 1.0),
        ),
        // -Z 后面
        (
            [
                Vec3::new(h, -h, -h),
                Vec3::new(-h, -h, -h),
                Vec3::new(-h, h, -h),
                Vec3::new(h, h, -h),
            ],
            Vec3::new(0.0, 0.0, -1.0),
        ),
        // +X 右面
        (
            [
                Vec3::new(h, -h, h),
                Vec3::new(h, -h, -h),
                Vec3::new(h, h, -h),
                Vec3::new(h, h, h),
            ],
            Vec3::new(1.0, 0.0, 0.0),
        ),
        // -X 左面
        (
            [
                Vec3::new(-h, -h, -h),
                Vec3::new(-h, -h, h),
                Vec3::new(-h, h, h),
                Vec3::new(-h, h, -h),
            ],
            Vec3::new(-1.0, 0.0, 0.0),
        ),
        // +Y 顶面
        (
            [
                Vec3::new(-h, h, h),
                Vec3::new(h, h, h),
                Vec3::new(h, h, -h),
                Vec3::new(-h, h, -h),
            ],
            Vec3::new(0.0, 1.0, 0.0),
        ),
        // -Y 底面
        (
            [
                Vec3::new(-h, -h, -h),
                Vec3::new(h, -h, -h),
                Vec3::new(h, -h, h),
                Vec3::new(-h, -h, h),
            ],
            Vec3::new(0.0, -1.0, 0.0),
        ),
    ];

    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    for (corners, normal) in faces {
        let verts: [ColoredVertex; 4] = std::array::from_fn(|i| {
            ColoredVertex::new(corners[i], normal, uvs[i])
        });
        push_quad(&mut triangles, verts[0], verts[1], verts[2], verts[3]);
    }
    triangles
}

/// 侧面一圈的环形顶点：半径r、高度y，法线沿侧面倾斜方向
fn ring_vertex(theta: f32, radius: f32, y: f32, normal_y: f32, v: f32) -> ColoredVertex {
    let normal = Vec3::new(theta.cos(), normal_y, theta.sin()).normalize();
    ColoredVertex::new(
        Vec3::new(radius * theta.cos(), y, radius * theta.sin()),
        normal,
        Vec2::new(theta / (2.0 * PI), v),
    )
}

fn cap_vertex(theta: f32, radius: f32, y: f32, normal: Vec3<f32>) -> ColoredVertex {
    ColoredVertex::new(
        Vec3::new(radius * theta.cos(), y, radius * theta.sin()),
        normal,
        Vec2::new(theta.cos() * 0.5 + 0.5, theta.sin() * 0.5 + 0.5),
    )
}

fn cap_center(y: f32, normal: Vec3<f32>) -> ColoredVertex {
    ColoredVertex::new(Vec3::new(0.0, y, 0.0), normal, Vec2::new(0.5, 0.5))
}

/// 底半径和顶半径可以不同的圆柱体，底面在y=0，顶面在y=1
fn build_frustum_cylinder(
    segments: usize,
    bottom_radius: f32,
    top_radius: f32,
) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(segments * 4);
    // 侧面法线的Y分量由锥度决定
    let slope = bottom_radius - top_radius;
    let up = Vec3::new(0.0, 1.0, 0.0);
    let down = Vec3::new(0.0, -1.0, 0.0);

    for i in 0..segments {
        let t0 = 2.0 * PI * i as f32 / segments as f32;
        let t1 = 2.0 * PI * (i + 1) as f32 / segments as f32;

        // 侧面
        push_quad(
            &mut triangles,
            ring_vertex(t0, bottom_radius, 0.0, slope, 0.0),
            ring_vertex(t0, top_radius, 1.0, slope, 1.0),
            ring_vertex(t1, top_radius, 1.0, slope, 1.0),
            ring_vertex(t1, bottom_radius, 0.0, slope, 0.0),
        );

        // 顶盖
        if top_radius > 0.0 {
            triangles.push(Triangle::new(
                cap_center(1.0, up),
                cap_vertex(t1, top_radius, 1.0, up),
                cap_vertex(t0, top_radius, 1.0, up),
            ));
        }

        // 底盖
        triangles.push(Triangle::new(
            cap_center(0.0, down),
            cap_vertex(t0, bottom_radius, 0.0, down),
            cap_vertex(t1, bottom_radius, 0.0, down),
        ));
    }
    triangles
}

fn build_cylinder(segments: usize) -> Vec<Triangle> {
    build_frustum_cylinder(segments, 1.0, 1.0)
}

/// 上细下粗的锥台，顶半径是底半径的一半
fn build_tapered_cylinder(segments: usize) -> Vec<Triangle> {
    build_frustum_cylinder(segments, 1.0, 0.5)
}

/// 圆锥：底面半径1在y=0，锥尖在y=1
fn build_cone(segments: usize) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(segments * 2);
    let down = Vec3::new(0.0, -1.0, 0.0);

    for i in 0..segments {
        let t0 = 2.0 * PI * i as f32 / segments as f32;
        let t1 = 2.0 * PI * (i + 1) as f32 / segments as f32;
        let mid = (t0 + t1) * 0.5;

        // 侧面三角形，锥尖法线取扇区中间方向
        let apex = ColoredVertex::new(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(mid.cos(), 1.0, mid.sin()).normalize(),
            Vec2::new(mid / (2.0 * PI), 1.0),
        );
        triangles.push(Triangle::new(
            ring_vertex(t0, 1.0, 0.0, 1.0, 0.0),
            apex,
            ring_vertex(t1, 1.0, 0.0, 1.0, 0.0),
        ));

        // 底盖
        triangles.push(Triangle::new(
            cap_center(0.0, down),
            cap_vertex(t0, 1.0, 0.0, down),
            cap_vertex(t1, 1.0, 0.0, down),
        ));
    }
    triangles
}

/// 单位球，经纬切分
fn build_sphere(sectors: usize, stacks: usize) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(sectors * stacks * 2);

    let vertex_at = |theta: f32, phi: f32| {
        let pos = Vec3::new(phi.cos() * theta.cos(), phi.sin(), phi.cos() * theta.sin());
        ColoredVertex::new(
            pos,
            pos.normalize(),
            Vec2::new(theta / (2.0 * PI), phi / PI + 0.5),
        )
    };

    for j in 0..stacks {
        // 纬度从南极到北极
        let phi0 = -PI / 2.0 + PI * j as f32 / stacks as f32;
        let phi1 = -PI / 2.0 + PI * (j + 1) as f32 / stacks as f32;

        for i in 0..sectors {
            let t0 = 2.0 * PI * i as f32 / sectors as f32;
            let t1 = 2.0 * PI * (i + 1) as f32 / sectors as f32;

            let v00 = vertex_at(t0, phi0);
            let v01 = vertex_at(t0, phi1);
            let v11 = vertex_at(t1, phi1);
            let v10 = vertex_at(t1, phi0);

            // 两极处退化的三角形直接跳过
            if j != 0 {
                triangles.push(Triangle::new(v00, v01, v10));
            }
            if j != stacks - 1 {
                triangles.push(Triangle::new(v10, v01, v11));
            }
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn box_has_twelve_triangles() {
        assert_eq!(build_box().len(), 12);
    }

    #[test]
    fn cylinder_triangle_count_matches_segments() {
        // 每段：侧面2个 + 顶盖1个 + 底盖1个
        assert_eq!(build_cylinder(8).len(), 8 * 4);
    }

    #[test]
    fn sphere_skips_degenerate_pole_triangles() {
        let n = build_sphere(8, 4).len();
        assert_eq!(n, 8 * 4 * 2 - 8 * 2);
    }

    #[test]
    fn sphere_vertices_lie_on_unit_sphere() {
        for tri in build_sphere(12, 6) {
            for v in tri.vertices {
                assert!((v.pos.magnitude() - 1.0).abs() < 1e-4);
                // 单位球上法线就是位置方向
                assert!(v.normal.dot(v.pos) > 0.999);
            }
        }
    }

    #[test]
    fn box_face_normals_point_outward() {
        for tri in build_box() {
            let center = (tri.vertices[0].pos + tri.vertices[1].pos + tri.vertices[2].pos) / 3.0;
            // 几何法线（由顶点顺序决定）应与从中心指向外的方向一致
            assert!(tri.normal.dot(center.normalize()) > 0.0);
        }
    }

    #[test]
    fn cylinder_stays_in_unit_bounds() {
        for tri in build_cylinder(16) {
            for v in tri.vertices {
                assert!(v.pos.y >= 0.0 && v.pos.y <= 1.0);
                assert!((v.pos.x * v.pos.x + v.pos.z * v.pos.z).sqrt() <= 1.0 + 1e-5);
            }
        }
    }
}
