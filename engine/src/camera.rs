//! Orthographic scene camera and the orbit controller that steers it.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::{Mat4, Vec2, Vec3};

use crate::raycast::Ray;

/// Frustum half height before zoom is applied; the width follows the aspect ratio.
pub const FRUSTUM_HALF_HEIGHT: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub zoom: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthoCamera {
    pub fn new(position: Vec3, target: Vec3, aspect: f32, zoom: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            aspect: aspect.max(1e-3),
            zoom: zoom.max(1e-3),
            near: 1.0,
            far: 1000.0,
        }
    }

    /// Recomputes the frustum for a new viewport aspect (window resize).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect.max(1e-3);
    }

    /// (left, right, bottom, top) after zoom.
    pub fn frustum(&self) -> (f32, f32, f32, f32) {
        let hh = FRUSTUM_HALF_HEIGHT / self.zoom;
        let hw = self.aspect * FRUSTUM_HALF_HEIGHT / self.zoom;
        (-hw, hw, -hh, hh)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        let (l, r, b, t) = self.frustum();
        Mat4::orthographic_rh(l, r, b, t, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// World-space ray through a point given in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }

    /// Projects a world point to NDC; `z` is the depth in 0..1 (near..far).
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitConfig {
    pub damping_factor: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub rotate_speed: f32,
    pub zoom_step: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            min_zoom: 10.0,
            max_zoom: 200.0,
            min_polar: FRAC_PI_4,
            max_polar: FRAC_PI_2,
            rotate_speed: 1.0,
            zoom_step: 0.95,
        }
    }
}

/// Damped orbit controller: rotate around the target, dolly via zoom, pan in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControls {
    pub config: OrbitConfig,
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
}

impl OrbitControls {
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            config,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Pointer drag of `dx`, `dy` pixels on a viewport `viewport_height` pixels tall.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.delta_theta -= TAU * dx / h * self.config.rotate_speed;
        self.delta_phi -= TAU * dy / h * self.config.rotate_speed;
    }

    /// Wheel steps; positive zooms in.
    pub fn dolly(&mut self, camera: &mut OrthoCamera, steps: f32) {
        let factor = self.config.zoom_step.powf(-steps);
        camera.zoom = (camera.zoom * factor).clamp(self.config.min_zoom, self.config.max_zoom);
    }

    /// Screen-space pan by `dx`, `dy` pixels in a viewport of `viewport` pixels.
    pub fn pan(&mut self, camera: &OrthoCamera, dx: f32, dy: f32, viewport: Vec2) {
        let (l, r, b, t) = camera.frustum();
        let world_dx = dx * (r - l) / viewport.x.max(1.0);
        let world_dy = dy * (t - b) / viewport.y.max(1.0);
        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        self.pan_offset += -right * world_dx + up * world_dy;
    }

    /// Applies one damped step of pending motion to `camera`. Returns true when it moved.
    pub fn update(&mut self, camera: &mut OrthoCamera) -> bool {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let k = self.config.damping_factor;
        theta += self.delta_theta * k;
        phi += self.delta_phi * k;
        phi = phi.clamp(
            self.config.min_polar.max(1e-4),
            self.config.max_polar.min(std::f32::consts::PI - 1e-4),
        );

        let pan = self.pan_offset * k;
        camera.target += pan;
        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let new_position = camera.target + new_offset;
        let moved = (new_position - camera.position).length_squared() > 1e-10;
        camera.position = new_position;

        self.delta_theta *= 1.0 - k;
        self.delta_phi *= 1.0 - k;
        self.pan_offset *= 1.0 - k;
        moved
    }
}
