use cgmath::{Deg, InnerSpace, Matrix4 as Mat4, Point3, Rad, Vector3 as Vec3};

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;
const ORTHO_NEAR: f32 = 0.1;
const ORTHO_FAR: f32 = 500.0;
const ORTHO_SIZE: f32 = 5.0; // 数值越小正交视图放得越大

const DEFAULT_ZOOM: f32 = 80.0;
const DEFAULT_SPEED: f32 = 20.0;
const MOUSE_SENSITIVITY: f32 = 0.1;
const MIN_SPEED: f32 = 1.0;
const MAX_SPEED: f32 = 100.0;
const PITCH_LIMIT: f32 = 89.0;

/// 键盘对应的移动方向
#[derive(Debug, Clone, Copy)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

/// 手写的透视投影矩阵（列主序）
#[rustfmt::skip]
fn perspective_mat(fovy: Rad<f32>, aspect: f32, near: f32, far: f32) -> Mat4<f32> {
    let tan_half_fovy = (fovy.0 / 2.0).tan();
    let a = 1.0 / (aspect * tan_half_fovy);
    let b = 1.0 / tan_half_fovy;
    let c = -(far + near) / (far - near);
    let d = -2.0 * far * near / (far - near);

    Mat4::new(
        a,    0.0,   0.0,   0.0,
        0.0,  b,     0.0,   0.0,
        0.0,  0.0,   c,    -1.0,
        0.0,  0.0,   d,     0.0,
    )
}

/// 手写的正交投影矩阵（列主序）
#[rustfmt::skip]
fn orthographic_mat(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4<f32> {
    let a = 2.0 / (right - left);
    let b = 2.0 / (top - bottom);
    let c = -2.0 / (far - near);
    let tx = -(right + left) / (right - left);
    let ty = -(top + bottom) / (top - bottom);
    let tz = -(far + near) / (far - near);

    Mat4::new(
        a,    0.0,  0.0,  0.0,
        0.0,  b,    0.0,  0.0,
        0.0,  0.0,  c,    0.0,
        tx,   ty,   tz,   1.0,
    )
}

/// 自由飞行相机：WASD平移、QE升降、鼠标转向、滚轮调速。
/// 场景脚本只消费它每帧给出的视图矩阵和投影矩阵。
pub struct Camera {
    position: Vec3<f32>,
    front: Vec3<f32>,
    up: Vec3<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
    movement_speed: f32,
    zoom: f32,
    aspect: f32,
    projection_mode: ProjectionMode,
}

impl Camera {
    /// 默认的透视视角：稍微俯视整张桌子
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 9.0, 18.0),
            front: Vec3::new(0.0, -0.8, -3.0).normalize(),
            up: Vec3::new(0.0, 1.0, 0.0),
            yaw: Deg(0.0),
            pitch: Deg(0.0),
            movement_speed: DEFAULT_SPEED,
            zoom: DEFAULT_ZOOM,
            aspect,
            projection_mode: ProjectionMode::Perspective,
        };
        camera.sync_angles_from_front();
        camera
    }

    pub fn eye(&self) -> Vec3<f32> {
        self.position
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.projection_mode
    }

    /// 由front向量反推偏航角和俯仰角，保证后续鼠标控制从当前朝向继续
    fn sync_angles_from_front(&mut self) {
        let f = self.front;
        self.pitch = Deg::from(Rad(f.y.asin()));
        self.yaw = Deg::from(Rad(f.z.atan2(f.x)));
    }

    fn update_front_from_angles(&mut self) {
        let yaw = Rad::from(self.yaw).0;
        let pitch = Rad::from(self.pitch).0;
        self.front = Vec3::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        )
        .normalize();
    }

    /// 切换到透视投影并重置到默认视角
    pub fn use_perspective(&mut self) {
        self.projection_mode = ProjectionMode::Perspective;
        self.position = Vec3::new(0.0, 9.0, 18.0);
        self.front = Vec3::new(0.0, -0.8, -3.0).normalize();
        self.up = Vec3::new(0.0, 1.0, 0.0);
        self.sync_angles_from_front();
    }

    /// 切换到正交投影：相机拉近、稍微俯视，排除透视畸变
    pub fn use_orthographic(&mut self) {
        self.projection_mode = ProjectionMode::Orthographic;
        self.position = Vec3::new(0.0, 5.0, 10.0);
        self.front = Vec3::new(0.0, -0.3, -1.0).normalize();
        self.up = Vec3::new(0.0, 1.0, 0.0);
        self.sync_angles_from_front();
    }

    pub fn process_keyboard(&mut self, movement: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let right = self.front.cross(self.up).normalize();
        match movement {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= right * velocity,
            CameraMovement::Right => self.position += right * velocity,
            CameraMovement::Up => self.position += self.up * velocity,
            CameraMovement::Down => self.position -= self.up * velocity,
        }
    }

    /// 鼠标相对位移转为偏航/俯仰，俯仰限制在±89度防止翻转
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += Deg(x_offset * MOUSE_SENSITIVITY);
        self.pitch += Deg(y_offset * MOUSE_SENSITIVITY);
        self.pitch.0 = self.pitch.0.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_front_from_angles();
    }

    /// 滚轮调节移动速度，始终限制在[1, 100]
    pub fn process_scroll(&mut self, y_offset: f32) {
        self.movement_speed = (self.movement_speed + y_offset).clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn get_view_mat(&self) -> Mat4<f32> {
        let eye = Point3::new(self.position.x, self.position.y, self.position.z);
        let center = eye + self.front;
        Mat4::look_at_rh(eye, center, self.up)
    }

    pub fn get_projection_mat(&self) -> Mat4<f32> {
        match self.projection_mode {
            ProjectionMode::Perspective => perspective_mat(
                Rad::from(Deg(self.zoom)),
                self.aspect,
                NEAR_PLANE,
                FAR_PLANE,
            ),
            ProjectionMode::Orthographic => orthographic_mat(
                -ORTHO_SIZE * self.aspect,
                ORTHO_SIZE * self.aspect,
                -ORTHO_SIZE,
                ORTHO_SIZE,
                ORTHO_NEAR,
                ORTHO_FAR,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_speed_is_clamped_to_valid_range() {
        let mut camera = Camera::new(1.0);
        for _ in 0..500 {
            camera.process_scroll(10.0);
        }
        assert_eq!(camera.movement_speed(), 100.0);
        for _ in 0..500 {
            camera.process_scroll(-10.0);
        }
        assert_eq!(camera.movement_speed(), 1.0);
    }

    #[test]
    fn perspective_reset_restores_default_pose() {
        let mut camera = Camera::new(1.25);
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        camera.process_mouse_movement(200.0, -50.0);
        camera.use_perspective();
        assert_eq!(camera.eye(), Vec3::new(0.0, 9.0, 18.0));
        assert_eq!(camera.projection_mode(), ProjectionMode::Perspective);
        let expected_front = Vec3::new(0.0, -0.8, -3.0).normalize();
        assert!((camera.front - expected_front).magnitude() < 1e-5);
    }

    #[test]
    fn orthographic_reset_restores_flat_view_pose() {
        let mut camera = Camera::new(1.25);
        camera.use_orthographic();
        assert_eq!(camera.eye(), Vec3::new(0.0, 5.0, 10.0));
        assert_eq!(camera.projection_mode(), ProjectionMode::Orthographic);
        let expected_front = Vec3::new(0.0, -0.3, -1.0).normalize();
        assert!((camera.front - expected_front).magnitude() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped_to_avoid_flip() {
        let mut camera = Camera::new(1.0);
        camera.process_mouse_movement(0.0, 1e6);
        // 仰视到顶也不会超过89度，front的y分量小于1
        assert!(camera.front.y < 1.0);
        assert!(camera.front.y > 0.99);
    }

    #[test]
    fn mouse_movement_keeps_front_normalized() {
        let mut camera = Camera::new(1.0);
        camera.process_mouse_movement(123.0, 45.0);
        assert!((camera.front.magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn forward_moves_along_front() {
        let mut camera = Camera::new(1.0);
        let before = camera.eye();
        camera.process_keyboard(CameraMovement::Forward, 0.1);
        let moved = camera.eye() - before;
        assert!(moved.dot(camera.front) > 0.0);
    }
}
