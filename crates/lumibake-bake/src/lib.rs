//! Baking passes that turn a scene into lightmap and probe EXRs.

pub mod sh;
pub mod targets;
pub mod grid;
pub mod progress;
pub mod lightmap;
pub mod volume;
pub mod cubemap;

pub use cubemap::{bake_cubemap_slice, CubemapOpts};
pub use grid::ProbeGrid;
pub use lightmap::bake_lightmap;
pub use progress::CancelFlag;
pub use sh::ShOrder;
pub use targets::TargetMaps;
pub use volume::bake_volume;

use lumibake_render::integrator::LightingMode;

#[derive(Debug, Clone)]
pub struct BakeOpts {
    pub spp: u32,
    pub bounces: u32,
    pub seed: u64,
    pub order: ShOrder,
    pub mode: LightingMode,
    // 0 means the global rayon pool.
    pub threads: usize,
    // Log progress every this many rows; 0 silences the pass.
    pub progress_every: u32,
    pub cancel: CancelFlag,
}

impl Default for BakeOpts {
    fn default() -> Self {
        Self {
            spp: 1024,
            bounces: 6,
            seed: 0x5EED,
            order: ShOrder::L1,
            mode: LightingMode::Full,
            threads: 0,
            progress_every: 64,
            cancel: CancelFlag::new(),
        }
    }
}
