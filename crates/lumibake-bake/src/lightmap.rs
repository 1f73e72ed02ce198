use crate::progress::{with_thread_pool, Progress};
use crate::sh::{self, Bands};
use crate::targets::TargetMaps;
use crate::BakeOpts;
use anyhow::{bail, Result};
use lumibake_render::film::{Film, FilmImage};
use lumibake_render::integrator::radiance;
use lumibake_render::math::{Frame, Ray, Vec3, RAY_EPSILON};
use lumibake_render::sampler::{hash_seed, square_to_uniform_hemisphere, Rng};
use lumibake_render::scene::Scene;
use rayon::prelude::*;

// One strip per band, side by side: band b of texel (x, y) lands at
// (x + b * width, y). Directional bands store ratios of the DC band.
pub fn bake_lightmap(scene: &Scene, targets: &TargetMaps, opts: &BakeOpts) -> Result<FilmImage> {
    let width = targets.width();
    let height = targets.height();
    let bands = opts.order.band_count();
    let spp = opts.spp.max(1);
    let progress = Progress::new("lightmap", height, opts.progress_every);

    let mut texels: Vec<Bands> = vec![[Vec3::zero(); sh::MAX_BANDS]; (width * height) as usize];

    with_thread_pool(opts.threads, || {
        texels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                if opts.cancel.is_cancelled() {
                    return;
                }
                for (x, out) in row.iter_mut().enumerate() {
                    let texel = targets.texel(x as u32, y as u32);
                    if !texel.is_active() {
                        continue;
                    }

                    let frame = Frame::new(texel.normal);
                    let origin = texel.position + texel.normal * RAY_EPSILON;
                    let mut accum = sh::ShAccumulator::new(opts.order);
                    for sample in 0..spp {
                        let mut rng = Rng::new(hash_seed(opts.seed, x as u32, y as u32, sample));
                        let direction = frame.to_world(square_to_uniform_hemisphere(rng.next_2d()));
                        let ray = Ray { origin, direction };
                        let value = radiance(&ray, scene, &mut rng, opts.bounces, opts.mode);
                        accum.add(value, direction);
                    }

                    let mut result = accum.means();
                    sh::normalize_bands(&mut result, bands);
                    *out = result;
                }
                progress.row_done();
            });
    });

    if opts.cancel.is_cancelled() {
        bail!("lightmap bake cancelled");
    }

    let mut film = Film::new(width * bands as u32, height, 1);
    for y in 0..height {
        for x in 0..width {
            let result = &texels[(y * width + x) as usize];
            for band in 0..bands {
                film.put(x + band as u32 * width, y, result[band]);
            }
        }
    }
    Ok(film.develop())
}
