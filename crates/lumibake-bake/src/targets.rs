use anyhow::{ensure, Context, Result};
use lumibake_render::math::Vec3;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct Texel {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Texel {
    // A zero normal marks a texel no geometry maps to.
    pub fn is_active(&self) -> bool {
        self.normal != Vec3::zero()
    }
}

pub struct TargetMaps {
    width: u32,
    height: u32,
    texels: Vec<Texel>,
}

impl TargetMaps {
    // Normals renormalize on load; a zero normal stays zero.
    pub fn load(positions: &Path, normals: &Path) -> Result<TargetMaps> {
        let position_map = image::open(positions)
            .with_context(|| format!("failed to read position map {}", positions.display()))?
            .to_rgb32f();
        let normal_map = image::open(normals)
            .with_context(|| format!("failed to read normal map {}", normals.display()))?
            .to_rgb32f();

        ensure!(
            position_map.dimensions() == normal_map.dimensions(),
            "position map is {:?} but normal map is {:?}",
            position_map.dimensions(),
            normal_map.dimensions()
        );
        let (width, height) = position_map.dimensions();
        ensure!(width > 0 && height > 0, "target maps must not be empty");

        let mut texels = Vec::with_capacity((width * height) as usize);
        for (position, normal) in position_map.pixels().zip(normal_map.pixels()) {
            let position = Vec3::new(position.0[0], position.0[1], position.0[2]);
            let normal = Vec3::new(normal.0[0], normal.0[1], normal.0[2]);
            texels.push(Texel {
                position,
                normal: normal.normalized(),
            });
        }

        Ok(TargetMaps {
            width,
            height,
            texels,
        })
    }

    pub fn from_texels(width: u32, height: u32, texels: Vec<Texel>) -> Result<TargetMaps> {
        ensure!(
            texels.len() == (width as usize) * (height as usize),
            "expected {} texels for a {}x{} map, got {}",
            (width as usize) * (height as usize),
            width,
            height,
            texels.len()
        );
        ensure!(width > 0 && height > 0, "target maps must not be empty");
        Ok(TargetMaps {
            width,
            height,
            texels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texel(&self, x: u32, y: u32) -> &Texel {
        &self.texels[(y * self.width + x) as usize]
    }

    pub fn active_count(&self) -> usize {
        self.texels.iter().filter(|texel| texel.is_active()).count()
    }
}
