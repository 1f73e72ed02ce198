use crate::grid::ProbeGrid;
use crate::progress::{with_thread_pool, Progress};
use crate::sh::{self, Bands};
use crate::BakeOpts;
use anyhow::{bail, Result};
use lumibake_render::film::{Film, FilmImage};
use lumibake_render::integrator::radiance;
use lumibake_render::math::{Ray, Vec3};
use lumibake_render::sampler::{hash_seed, square_to_uniform_sphere, Rng};
use lumibake_render::scene::Scene;
use rayon::prelude::*;

// One film row per (y, z) pair: probe (x, y, z) band b lands at
// (x + b * nx, y + z * ny). Volume bands keep raw moments, nothing
// is divided out.
pub fn bake_volume(scene: &Scene, grid: &ProbeGrid, opts: &BakeOpts) -> Result<FilmImage> {
    let [nx, ny, nz] = grid.count;
    let bands = opts.order.band_count();
    let spp = opts.spp.max(1);
    let rows = ny * nz;
    let progress = Progress::new("probes", rows, opts.progress_every);

    let mut probes: Vec<Bands> = vec![[Vec3::zero(); sh::MAX_BANDS]; (nx * rows) as usize];

    with_thread_pool(opts.threads, || {
        probes
            .par_chunks_mut(nx as usize)
            .enumerate()
            .for_each(|(row_index, row)| {
                if opts.cancel.is_cancelled() {
                    return;
                }
                let y = row_index as u32 % ny;
                let z = row_index as u32 / ny;
                for (x, out) in row.iter_mut().enumerate() {
                    let origin = grid.origin([x as u32, y, z]);
                    let mut accum = sh::ShAccumulator::new(opts.order);
                    for sample in 0..spp {
                        let mut rng = Rng::new(hash_seed(opts.seed, x as u32, y + z * ny, sample));
                        let direction = square_to_uniform_sphere(rng.next_2d());
                        let ray = Ray { origin, direction };
                        let value = radiance(&ray, scene, &mut rng, opts.bounces, opts.mode);
                        accum.add(value, direction);
                    }
                    *out = accum.means();
                }
                progress.row_done();
            });
    });

    if opts.cancel.is_cancelled() {
        bail!("probe bake cancelled");
    }

    let mut film = Film::new(nx * bands as u32, rows, 1);
    for row_index in 0..rows {
        for x in 0..nx {
            let result = &probes[(row_index * nx + x) as usize];
            for band in 0..bands {
                film.put(x + band as u32 * nx, row_index, result[band]);
            }
        }
    }
    Ok(film.develop())
}
