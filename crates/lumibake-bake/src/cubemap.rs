use crate::grid::ProbeGrid;
use crate::progress::{with_thread_pool, Progress};
use crate::BakeOpts;
use anyhow::{bail, ensure, Result};
use lumibake_render::camera::Camera;
use lumibake_render::film::{Film, FilmImage};
use lumibake_render::integrator::radiance;
use lumibake_render::math::Vec3;
use lumibake_render::sampler::{hash_seed, Rng};
use lumibake_render::scene::Scene;
use rayon::prelude::*;

// View direction and up vector for each face, in atlas order.
const FACES: [(Vec3, Vec3); 6] = [
    (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
    (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
    (Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
    (Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
    (Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
    (Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0)),
];

#[derive(Debug, Clone, Copy)]
pub struct CubemapOpts {
    pub face_size: u32,
    // Faces render at this multiple of their size, then box-filter down.
    pub supersample: u32,
}

impl Default for CubemapOpts {
    fn default() -> Self {
        Self {
            face_size: 16,
            supersample: 1,
        }
    }
}

// Six faces of probe (x, y, z) sit side by side starting at column
// x * face_size * 6; probe rows stack in y.
pub fn bake_cubemap_slice(
    scene: &Scene,
    grid: &ProbeGrid,
    z: u32,
    opts: &BakeOpts,
    cube: &CubemapOpts,
) -> Result<FilmImage> {
    ensure!(
        z < grid.count[2],
        "slice {} outside grid depth {}",
        z,
        grid.count[2]
    );
    ensure!(cube.face_size > 0, "face size must be at least 1");

    let [nx, ny, _] = grid.count;
    let supersample = cube.supersample.max(1);
    let width = nx * cube.face_size * 6;
    let height = ny * cube.face_size;
    let fine_width = width * supersample;
    let fine_height = height * supersample;
    let fine_face = cube.face_size * supersample;
    let spp = opts.spp.max(1);
    let progress = Progress::new("cubemap", fine_height, opts.progress_every);

    let mut pixels: Vec<Vec3> = vec![Vec3::zero(); (fine_width * fine_height) as usize];

    with_thread_pool(opts.threads, || {
        pixels
            .par_chunks_mut(fine_width as usize)
            .enumerate()
            .for_each(|(fy, row)| {
                if opts.cancel.is_cancelled() {
                    return;
                }
                let fy = fy as u32;
                let probe_y = fy / fine_face;
                let v = ((fy % fine_face) as f32 + 0.5) / fine_face as f32;

                for (fx, out) in row.iter_mut().enumerate() {
                    let fx = fx as u32;
                    let face_column = fx / fine_face;
                    let probe_x = face_column / 6;
                    let (face_dir, up) = FACES[(face_column % 6) as usize];

                    let origin = grid.origin([probe_x, probe_y, z]);
                    let camera = Camera::look_at(origin, origin + face_dir, up, 90.0, 1.0);
                    let u = 1.0 - ((fx % fine_face) as f32 + 0.5) / fine_face as f32;

                    let mut color = Vec3::zero();
                    for sample in 0..spp {
                        let mut rng = Rng::new(hash_seed(opts.seed, fx, fy, sample));
                        let ray = camera.ray(u, 1.0 - v);
                        color = color + radiance(&ray, scene, &mut rng, opts.bounces, opts.mode);
                    }
                    *out = color / spp as f32;
                }
                progress.row_done();
            });
    });

    if opts.cancel.is_cancelled() {
        bail!("cubemap bake cancelled");
    }

    let mut film = Film::new(width, height, supersample);
    for fy in 0..fine_height {
        for fx in 0..fine_width {
            film.put(fx, fy, pixels[(fy * fine_width + fx) as usize]);
        }
    }
    Ok(film.develop())
}
