use cgmath::{Deg, Matrix4 as Mat4, Vector3 as Vec3};

/// 一次绘制所需的全部变换参数，角度单位为度
#[derive(Debug, Clone, Copy)]
pub struct TransformParams {
    pub scale: Vec3<f32>,
    pub rotation_deg: Vec3<f32>,
    pub position: Vec3<f32>,
}

impl TransformParams {
    pub fn new(scale: Vec3<f32>, rotation_deg: Vec3<f32>, position: Vec3<f32>) -> Self {
        Self {
            scale,
            rotation_deg,
            position,
        }
    }

    /// 无旋转的快捷构造，场景里大部分物体用它
    pub fn upright(scale: Vec3<f32>, position: Vec3<f32>) -> Self {
        Self::new(scale, Vec3::new(0.0, 0.0, 0.0), position)
    }
}

/// 组合出物体到世界的变换矩阵。
/// 顺序固定：平移 * Z旋转 * Y旋转 * X旋转 * 缩放（点先缩放、再依次绕X/Y/Z旋转、最后平移）。
/// 所有绘制都必须走这一个函数，否则非均匀缩放下画面会不一致。
/// 零缩放或负缩放不做校验，退化几何由调用方自己负责。
pub fn build_model_matrix(params: &TransformParams) -> Mat4<f32> {
    let scale = Mat4::from_nonuniform_scale(params.scale.x, params.scale.y, params.scale.z);
    let rotation_x = Mat4::from_angle_x(Deg(params.rotation_deg.x));
    let rotation_y = Mat4::from_angle_y(Deg(params.rotation_deg.y));
    let rotation_z = Mat4::from_angle_z(Deg(params.rotation_deg.z));
    let translation = Mat4::from_translation(params.position);

    translation * rotation_z * rotation_y * rotation_x * scale
}
