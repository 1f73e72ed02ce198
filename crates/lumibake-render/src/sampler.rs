//! Deterministic sample streams keyed by output coordinates, not threads.

use crate::math::Vec3;
use std::f32::consts::TAU;

pub fn hash_seed(seed: u64, x: u32, y: u32, sample: u32) -> u64 {
    let mut v = seed ^ ((x as u64) << 32) ^ ((y as u64) << 16) ^ sample as u64;
    v = v.wrapping_add(0x9e3779b97f4a7c15);
    v = (v ^ (v >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    v = (v ^ (v >> 27)).wrapping_mul(0x94d049bb133111eb);
    v ^ (v >> 31)
}

pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0xdeadbeefcafebabe } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        (self.state >> 32) as u32
    }

    pub fn next_f32(&mut self) -> f32 {
        let value = self.next_u32();
        value as f32 / u32::MAX as f32
    }

    pub fn next_2d(&mut self) -> (f32, f32) {
        let a = self.next_f32();
        let b = self.next_f32();
        (a, b)
    }
}

pub fn square_to_uniform_sphere(sample: (f32, f32)) -> Vec3 {
    let z = 1.0 - 2.0 * sample.0;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = TAU * sample.1;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

pub fn square_to_uniform_hemisphere(sample: (f32, f32)) -> Vec3 {
    let z = sample.0;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = TAU * sample.1;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}
