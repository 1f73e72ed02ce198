//! Low-order spherical harmonics accumulation.
//!
//! `L1` keeps raw direction moments `[v, v*x, v*y, v*z]`; `L2` evaluates the
//! real SH basis, nine bands `[Y00, Y1*x, Y1*y, Y1*z, xy, yz, 3z^2-1, xz, x^2-y^2]`.

use lumibake_render::math::Vec3;

pub const MAX_BANDS: usize = 9;

// Bands past the active order stay zero.
pub type Bands = [Vec3; MAX_BANDS];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShOrder {
    L1,
    L2,
}

impl ShOrder {
    pub fn band_count(self) -> usize {
        match self {
            ShOrder::L1 => 4,
            ShOrder::L2 => 9,
        }
    }
}

// Real SH constants up to l = 2.
const Y0: f32 = 0.282_095;
const Y1: f32 = 0.488_603;
const Y2: f32 = 1.092_548;
const Y2_ZZ: f32 = 0.315_392;
const Y2_XY: f32 = 0.546_274;

pub fn basis(order: ShOrder, dir: Vec3) -> [f32; MAX_BANDS] {
    let mut out = [0.0; MAX_BANDS];
    match order {
        ShOrder::L1 => {
            out[0] = 1.0;
            out[1] = dir.x;
            out[2] = dir.y;
            out[3] = dir.z;
        }
        ShOrder::L2 => {
            out[0] = Y0;
            out[1] = Y1 * dir.x;
            out[2] = Y1 * dir.y;
            out[3] = Y1 * dir.z;
            out[4] = Y2 * dir.x * dir.y;
            out[5] = Y2 * dir.y * dir.z;
            out[6] = Y2_ZZ * (3.0 * dir.z * dir.z - 1.0);
            out[7] = Y2 * dir.x * dir.z;
            out[8] = Y2_XY * (dir.x * dir.x - dir.y * dir.y);
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct ShAccumulator {
    order: ShOrder,
    sums: Bands,
    samples: u32,
}

impl ShAccumulator {
    pub fn new(order: ShOrder) -> Self {
        Self {
            order,
            sums: [Vec3::zero(); MAX_BANDS],
            samples: 0,
        }
    }

    pub fn add(&mut self, value: Vec3, dir: Vec3) {
        let basis = basis(self.order, dir);
        for (sum, weight) in self.sums.iter_mut().zip(basis) {
            *sum = *sum + value * weight;
        }
        self.samples += 1;
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn means(&self) -> Bands {
        if self.samples == 0 {
            return [Vec3::zero(); MAX_BANDS];
        }
        let scale = 1.0 / self.samples as f32;
        let mut out = self.sums;
        for band in &mut out {
            *band = *band * scale;
        }
        out
    }
}

// Directional bands become componentwise ratios of the DC band; a zero or
// otherwise non-finite quotient becomes zero.
pub fn normalize_bands(bands: &mut Bands, count: usize) {
    let dc = bands[0];
    for band in bands[1..count].iter_mut() {
        *band = Vec3::new(
            finite_ratio(band.x, dc.x),
            finite_ratio(band.y, dc.y),
            finite_ratio(band.z, dc.z),
        );
    }
}

fn finite_ratio(numerator: f32, denominator: f32) -> f32 {
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}
