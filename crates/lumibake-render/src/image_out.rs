use crate::film::FilmImage;
use anyhow::{anyhow, ensure, Context, Result};
use exr::prelude::*;
use std::path::Path;

pub fn write_exr(path: &Path, image: &FilmImage) -> Result<()> {
    ensure!(
        image.width > 0 && image.height > 0,
        "EXR dimensions must be positive"
    );
    let pixels = image.width as usize * image.height as usize;
    ensure!(
        image.data.len() == pixels * 3,
        "expected RGB buffer with {} floats, got {}",
        pixels * 3,
        image.data.len()
    );

    let mut red = Vec::with_capacity(pixels);
    let mut green = Vec::with_capacity(pixels);
    let mut blue = Vec::with_capacity(pixels);
    for px in image.data.chunks_exact(3) {
        red.push(px[0]);
        green.push(px[1]);
        blue.push(px[2]);
    }

    let mut list = SmallVec::<[AnyChannel<FlatSamples>; 4]>::new();
    for (name, data) in [("R", red), ("G", green), ("B", blue)] {
        let name = Text::new_or_none(name)
            .ok_or_else(|| anyhow!("invalid EXR channel name: {}", name))?;
        list.push(AnyChannel {
            name,
            sample_data: FlatSamples::F32(data),
            quantize_linearly: false,
            sampling: Vec2(1, 1),
        });
    }

    let channels = AnyChannels::sort(list);
    let out = Image::from_channels((image.width as usize, image.height as usize), channels);
    out.write()
        .to_file(path)
        .with_context(|| format!("failed to write EXR to {}", path.display()))?;
    Ok(())
}
