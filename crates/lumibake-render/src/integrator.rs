use crate::math::{Ray, Vec3, RAY_EPSILON};
use crate::sampler::Rng;
use crate::scene::Scene;

// DirectOnly stops at the first surface; IndirectOnly drops what that surface
// (or the background behind it) contributes on its own, so the two sum to
// Full for matching sample streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingMode {
    Full,
    DirectOnly,
    IndirectOnly,
}

pub fn radiance(
    ray: &Ray,
    scene: &Scene,
    rng: &mut Rng,
    bounces: u32,
    mode: LightingMode,
) -> Vec3 {
    let mut current_ray = *ray;
    let mut throughput = Vec3::new(1.0, 1.0, 1.0);
    let mut color = Vec3::zero();

    for depth in 0..bounces.max(1) {
        if let Some(hit) = scene.hit(&current_ray) {
            let first_surface = depth == 0;
            if !(mode == LightingMode::IndirectOnly && first_surface) {
                color = color + throughput.mul_elem(hit.emission);
            }
            if mode == LightingMode::DirectOnly {
                return color;
            }

            let direction = random_in_hemisphere(hit.normal, rng);
            current_ray = Ray {
                origin: hit.point + hit.normal * RAY_EPSILON,
                direction,
            };
            throughput = throughput.mul_elem(hit.albedo);
        } else {
            if !(mode == LightingMode::IndirectOnly && depth == 0) {
                color = color + throughput.mul_elem(scene.environment_radiance(&current_ray));
            }
            return color;
        }
    }

    color
}

fn random_in_hemisphere(normal: Vec3, rng: &mut Rng) -> Vec3 {
    let mut dir = random_unit_vector(rng);
    if dir.dot(normal) < 0.0 {
        dir = dir * -1.0;
    }
    (normal + dir).normalized()
}

fn random_unit_vector(rng: &mut Rng) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.next_f32() * 2.0 - 1.0,
            rng.next_f32() * 2.0 - 1.0,
            rng.next_f32() * 2.0 - 1.0,
        );
        if p.dot(p) < 1.0 {
            return p.normalized();
        }
    }
}
