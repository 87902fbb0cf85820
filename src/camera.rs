//! Perspective camera and viewport primitives.
//!
//! The engine never renders; the camera exists for the projection math the
//! scaler, raycaster and overlay layer depend on. Cameras sit on the +Z axis
//! looking at the origin, matching the site's content/HUD camera setup.

use crate::types::Orientation;
use glam::{Mat4, Vec3, Vec4};

/// Client dimensions of the canvas the scene is presented on, in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Converts client coordinates (origin top-left, Y down) to normalised
    /// device coordinates (origin centre, Y up).
    pub fn client_to_ndc(&self, client_x: f32, client_y: f32) -> glam::Vec2 {
        glam::Vec2::new(
            (client_x / self.width) * 2.0 - 1.0,
            -(client_y / self.height) * 2.0 + 1.0,
        )
    }

    /// Converts normalised device coordinates to client pixel coordinates.
    pub fn ndc_to_client(&self, ndc_x: f32, ndc_y: f32) -> glam::Vec2 {
        glam::Vec2::new(
            (ndc_x + 1.0) * 0.5 * self.width,
            (1.0 - (ndc_y + 1.0) * 0.5) * self.height,
        )
    }
}

/// A perspective camera positioned on the +Z axis, looking at the origin.
#[derive(Copy, Clone, Debug)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32, distance: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near,
            far,
            position: Vec3::new(0.0, 0.0, distance),
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Unprojects a point in normalised device coordinates (z in `[0, 1]`
    /// selecting a depth within the frustum) back into world space.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        let inverse = self.view_projection().inverse();
        let clip = Vec4::new(ndc.x, ndc.y, ndc.z, 1.0);
        let world = inverse * clip;
        world.truncate() / world.w
    }

    /// Projects a world-space point into normalised device coordinates.
    pub fn project(&self, world: Vec3) -> Vec3 {
        let clip = self.view_projection() * world.extend(1.0);
        clip.truncate() / clip.w
    }

    /// Intersects the camera ray through the given NDC point with the
    /// `z = 0` world plane (the content focal plane).
    pub fn ndc_to_focal_plane(&self, ndc_x: f32, ndc_y: f32) -> Vec3 {
        let unprojected = self.unproject(Vec3::new(ndc_x, ndc_y, 0.5));
        let dir = (unprojected - self.position).normalize();
        let distance = -self.position.z / dir.z;
        self.position + dir * distance
    }
}
