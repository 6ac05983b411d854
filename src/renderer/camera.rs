use glam::{Mat4, Vec3};

/// First-person perspective camera defined by eye position and view
/// angles.
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Heading around the vertical axis, in radians. Zero looks down +X.
    pub yaw: f32,
    /// Elevation above the horizon, in radians. Callers keep this just
    /// short of straight up or down so the view basis stays well defined.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and eye position.
///
/// Field order and padding mirror the `voxen::camera` shader module.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position in xyz; w is reserved.
    pub eye: [f32; 4],
}

impl Camera {
    /// Create a camera at `eye` looking along +X with engine defaults.
    #[must_use]
    pub fn new(eye: Vec3) -> Self {
        Self {
            eye,
            yaw: 0.0,
            pitch: 0.0,
            fovy: 65.0,
            znear: 0.125,
            zfar: 512.0,
        }
    }

    /// Unit view direction derived from yaw and pitch.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch)
    }

    /// Build the combined view-projection matrix for the given aspect
    /// ratio (width / height).
    #[must_use]
    pub fn build_matrix(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.eye + self.forward(), Vec3::Y);
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        let proj =
            Mat4::perspective_rh(self.fovy.to_radians(), aspect, self.znear, self.zfar);
        proj * view
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0; 4],
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera, aspect: f32) {
        self.view_proj = camera.build_matrix(aspect).to_cols_array_2d();
        let eye = camera.eye;
        self.eye = [eye.x, eye.y, eye.z, 0.0];
    }
}

#[cfg(test)]
mod tests {
    use super::{Camera, CameraUniform};
    use glam::{Vec3, Vec4};

    #[test]
    fn uniform_matches_shader_struct_size() {
        // mat4x4<f32> + vec4<f32>
        assert_eq!(size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn zero_angles_look_down_positive_x() {
        let camera = Camera::new(Vec3::ZERO);
        let forward = camera.forward();
        assert!((forward - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn positive_pitch_looks_up() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.pitch = std::f32::consts::FRAC_PI_4;
        let forward = camera.forward();
        assert!(forward.y > 0.0);
        assert!((forward.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn point_ahead_projects_to_clip_center() {
        let camera = Camera::new(Vec3::ZERO);
        let clip = camera.build_matrix(1.0) * Vec4::new(5.0, 0.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-4);
        assert!(clip.y.abs() < 1e-4);
        assert!(clip.w > 0.0);
    }

    #[test]
    fn uniform_tracks_camera_eye() {
        let mut uniform = CameraUniform::new();
        let mut camera = Camera::new(Vec3::new(8.0, 24.0, -3.0));
        camera.yaw = 1.0;
        uniform.update_view_proj(&camera, 1.6);
        assert_eq!(uniform.eye, [8.0, 24.0, -3.0, 0.0]);
    }
}
