use lumibake_bake::grid::ProbeGrid;
use lumibake_bake::{bake_cubemap_slice, bake_volume, BakeOpts, CubemapOpts, ShOrder};
use lumibake_model::{EnvironmentDef, MaterialDef, SceneFile, SphereDef};
use lumibake_render::math::Vec3;
use lumibake_render::scene::Scene;

fn env_scene(radiance: [f32; 3]) -> Scene {
    let file = SceneFile {
        version: 1,
        spheres: vec![],
        triangles: vec![],
        environment: EnvironmentDef::Constant { radiance },
    };
    Scene::build(&file).unwrap()
}

#[test]
fn grid_origins_sit_at_cell_centers() {
    let grid = ProbeGrid::new(
        [2, 2, 2],
        Vec3::zero(),
        Vec3::new(2.0, 2.0, 2.0),
    )
    .unwrap();

    assert_eq!(grid.origin([0, 0, 0]), Vec3::new(-0.5, -0.5, -0.5));
    assert_eq!(grid.origin([1, 1, 1]), Vec3::new(0.5, 0.5, 0.5));
    assert_eq!(grid.probe_count(), 8);

    let offset = ProbeGrid::new([1, 1, 1], Vec3::new(10.0, 0.0, 0.0), Vec3::new(4.0, 4.0, 4.0))
        .unwrap();
    assert_eq!(offset.origin([0, 0, 0]), Vec3::new(10.0, 0.0, 0.0));
}

#[test]
fn grid_rejects_degenerate_shapes() {
    assert!(ProbeGrid::new([0, 2, 2], Vec3::zero(), Vec3::new(1.0, 1.0, 1.0)).is_err());
    assert!(ProbeGrid::new([2, 2, 2], Vec3::zero(), Vec3::new(0.0, 1.0, 1.0)).is_err());
    assert!(ProbeGrid::new([2, 2, 2], Vec3::zero(), Vec3::new(-1.0, 1.0, 1.0)).is_err());
}

#[test]
fn volume_atlas_tiles_bands_and_slices() {
    let scene = env_scene([1.0, 0.5, 0.25]);
    let grid = ProbeGrid::new([2, 3, 4], Vec3::zero(), Vec3::new(4.0, 4.0, 4.0)).unwrap();
    let opts = BakeOpts {
        spp: 1024,
        progress_every: 0,
        ..BakeOpts::default()
    };

    let image = bake_volume(&scene, &grid, &opts).unwrap();
    assert_eq!(image.width, 2 * 4);
    assert_eq!(image.height, 3 * 4);

    // With nothing but a constant environment the DC band is exact and
    // the directional moments settle near zero.
    for z in 0..4u32 {
        for y in 0..3u32 {
            for x in 0..2u32 {
                let dc = image.pixel(x, y + z * 3);
                assert!((dc[0] - 1.0).abs() < 1e-6);
                assert!((dc[1] - 0.5).abs() < 1e-6);
                assert!((dc[2] - 0.25).abs() < 1e-6);

                for band in 1..4u32 {
                    let moment = image.pixel(x + band * 2, y + z * 3);
                    assert!(moment[0].abs() < 0.1);
                    assert!(moment[1].abs() < 0.1);
                    assert!(moment[2].abs() < 0.1);
                }
            }
        }
    }
}

#[test]
fn volume_l2_uses_nine_strips() {
    let scene = env_scene([1.0, 1.0, 1.0]);
    let grid = ProbeGrid::new([2, 2, 2], Vec3::zero(), Vec3::new(2.0, 2.0, 2.0)).unwrap();
    let opts = BakeOpts {
        spp: 256,
        order: ShOrder::L2,
        progress_every: 0,
        ..BakeOpts::default()
    };

    let image = bake_volume(&scene, &grid, &opts).unwrap();
    assert_eq!(image.width, 2 * 9);
    assert_eq!(image.height, 2 * 2);

    // L2 keeps the SH constant on the DC band instead of a plain mean.
    let dc = image.pixel(0, 0);
    assert!((dc[0] - 0.282_095).abs() < 1e-4);
}

#[test]
fn cubemap_slice_dimensions_and_background() {
    let scene = env_scene([0.3, 0.6, 0.9]);
    let grid = ProbeGrid::new([2, 2, 2], Vec3::zero(), Vec3::new(4.0, 4.0, 4.0)).unwrap();
    let opts = BakeOpts {
        spp: 1,
        progress_every: 0,
        ..BakeOpts::default()
    };
    let cube = CubemapOpts {
        face_size: 4,
        supersample: 2,
    };

    let image = bake_cubemap_slice(&scene, &grid, 1, &opts, &cube).unwrap();
    assert_eq!(image.width, 2 * 4 * 6);
    assert_eq!(image.height, 2 * 4);

    for y in 0..image.height {
        for x in 0..image.width {
            let px = image.pixel(x, y);
            assert!((px[0] - 0.3).abs() < 1e-6);
            assert!((px[1] - 0.6).abs() < 1e-6);
            assert!((px[2] - 0.9).abs() < 1e-6);
        }
    }

    assert!(bake_cubemap_slice(&scene, &grid, 2, &opts, &cube).is_err());
}

#[test]
fn cubemap_faces_look_along_their_axes() {
    // An emissive ball far along +X: only the first face of the atlas
    // can see it.
    let file = SceneFile {
        version: 1,
        spheres: vec![SphereDef {
            center: [10.0, 0.0, 0.0],
            radius: 4.0,
            material: MaterialDef {
                albedo: [0.0, 0.0, 0.0],
                emission: [5.0, 5.0, 5.0],
            },
        }],
        triangles: vec![],
        environment: EnvironmentDef::Off,
    };
    let scene = Scene::build(&file).unwrap();
    let grid = ProbeGrid::new([1, 1, 1], Vec3::zero(), Vec3::new(2.0, 2.0, 2.0)).unwrap();
    let opts = BakeOpts {
        spp: 1,
        bounces: 1,
        progress_every: 0,
        ..BakeOpts::default()
    };
    let cube = CubemapOpts {
        face_size: 4,
        supersample: 1,
    };

    let image = bake_cubemap_slice(&scene, &grid, 0, &opts, &cube).unwrap();

    // Center pixels of face 0 look straight down +X into the ball.
    let center = image.pixel(1, 1);
    assert!((center[0] - 5.0).abs() < 1e-6);

    // Face 1 looks down -X and must stay black.
    for y in 0..4 {
        for x in 4..8 {
            assert_eq!(image.pixel(x, y), [0.0, 0.0, 0.0]);
        }
    }
}
