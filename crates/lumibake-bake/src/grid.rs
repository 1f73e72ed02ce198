use anyhow::{ensure, Result};
use lumibake_render::math::Vec3;

// Probes sit at cell centers of the box, half a cell inside its walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeGrid {
    pub count: [u32; 3],
    pub center: Vec3,
    pub scale: Vec3,
}

impl ProbeGrid {
    pub fn new(count: [u32; 3], center: Vec3, scale: Vec3) -> Result<ProbeGrid> {
        ensure!(
            count.iter().all(|&c| c > 0),
            "probe counts must be at least 1, got {:?}",
            count
        );
        ensure!(center.is_finite(), "grid center must be finite");
        ensure!(
            scale.is_finite() && scale.x > 0.0 && scale.y > 0.0 && scale.z > 0.0,
            "grid scale must be positive, got ({}, {}, {})",
            scale.x,
            scale.y,
            scale.z
        );
        Ok(ProbeGrid {
            count,
            center,
            scale,
        })
    }

    fn lower_corner(&self) -> Vec3 {
        self.center - self.scale * 0.5
    }

    fn increment(&self) -> Vec3 {
        Vec3::new(
            self.scale.x / self.count[0] as f32,
            self.scale.y / self.count[1] as f32,
            self.scale.z / self.count[2] as f32,
        )
    }

    pub fn origin(&self, coord: [u32; 3]) -> Vec3 {
        let increment = self.increment();
        self.lower_corner()
            + Vec3::new(
                increment.x * (coord[0] as f32 + 0.5),
                increment.y * (coord[1] as f32 + 0.5),
                increment.z * (coord[2] as f32 + 0.5),
            )
    }

    pub fn probe_count(&self) -> u64 {
        self.count.iter().map(|&c| c as u64).product()
    }
}
