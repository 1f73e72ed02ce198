use crate::math::{Ray, Vec3};

// ray(0.5, 0.5) looks along the view direction; v = 1 is the top of the viewport.
pub struct Camera {
    origin: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    half_width: f32,
    half_height: f32,
}

impl Camera {
    pub fn look_at(origin: Vec3, target: Vec3, vup: Vec3, vfov_deg: f32, aspect: f32) -> Self {
        let forward = (target - origin).normalized();
        let right = forward.cross(vup).normalized();
        let up = right.cross(forward);

        let half_height = (vfov_deg.to_radians() * 0.5).tan();
        let half_width = aspect * half_height;

        Self {
            origin,
            right,
            up,
            forward,
            half_width,
            half_height,
        }
    }

    pub fn ray(&self, u: f32, v: f32) -> Ray {
        let x = (2.0 * u - 1.0) * self.half_width;
        let y = (2.0 * v - 1.0) * self.half_height;
        Ray {
            origin: self.origin,
            direction: (self.forward + self.right * x + self.up * y).normalized(),
        }
    }
}
