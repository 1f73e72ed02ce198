use lumibake_bake::targets::{TargetMaps, Texel};
use lumibake_bake::{
    bake_cubemap_slice, bake_lightmap, bake_volume, BakeOpts, CubemapOpts, ProbeGrid, ShOrder,
};
use lumibake_model::{EnvironmentDef, MaterialDef, SceneFile, SphereDef};
use lumibake_render::math::Vec3;
use lumibake_render::scene::Scene;

fn two_texel_maps() -> TargetMaps {
    // Texel 0 faces up from the origin, texel 1 is uncovered.
    TargetMaps::from_texels(
        2,
        1,
        vec![
            Texel {
                position: Vec3::zero(),
                normal: Vec3::new(0.0, 0.0, 1.0),
            },
            Texel {
                position: Vec3::zero(),
                normal: Vec3::zero(),
            },
        ],
    )
    .unwrap()
}

fn lamp_scene() -> Scene {
    let file = SceneFile {
        version: 1,
        spheres: vec![SphereDef {
            center: [0.0, 0.0, 3.0],
            radius: 1.0,
            material: MaterialDef {
                albedo: [0.0, 0.0, 0.0],
                emission: [5.0, 5.0, 5.0],
            },
        }],
        triangles: vec![],
        environment: EnvironmentDef::Off,
    };
    Scene::build(&file).unwrap()
}

#[test]
fn uncovered_texels_stay_black() {
    let targets = two_texel_maps();
    let scene = lamp_scene();
    let opts = BakeOpts {
        spp: 256,
        progress_every: 0,
        ..BakeOpts::default()
    };

    let image = bake_lightmap(&scene, &targets, &opts).unwrap();
    assert_eq!(image.width, 2 * 4);
    assert_eq!(image.height, 1);

    assert!(image.pixel(0, 0)[0] > 0.01);

    for band in 0..4 {
        assert_eq!(image.pixel(1 + band * 2, 0), [0.0, 0.0, 0.0]);
    }
}

#[test]
fn directional_band_points_at_the_lamp() {
    let targets = two_texel_maps();
    let scene = lamp_scene();
    let opts = BakeOpts {
        spp: 1024,
        progress_every: 0,
        ..BakeOpts::default()
    };

    let image = bake_lightmap(&scene, &targets, &opts).unwrap();

    // The lamp sits straight up the texel normal.
    let z_band = image.pixel(0 + 3 * 2, 0);
    assert!(z_band[0] > 0.5);
    let x_band = image.pixel(0 + 2, 0);
    let y_band = image.pixel(0 + 2 * 2, 0);
    assert!(x_band[0].abs() < 0.3);
    assert!(y_band[0].abs() < 0.3);
}

#[test]
fn constant_environment_gives_exact_dc() {
    let targets = two_texel_maps();
    let file = SceneFile {
        version: 1,
        spheres: vec![],
        triangles: vec![],
        environment: EnvironmentDef::Constant {
            radiance: [2.0, 2.0, 2.0],
        },
    };
    let scene = Scene::build(&file).unwrap();
    let opts = BakeOpts {
        spp: 2048,
        progress_every: 0,
        ..BakeOpts::default()
    };

    let image = bake_lightmap(&scene, &targets, &opts).unwrap();

    let dc = image.pixel(0, 0);
    assert!((dc[0] - 2.0).abs() < 1e-6);

    // Uniform hemisphere samples average to z of one half.
    let z_band = image.pixel(0 + 3 * 2, 0);
    assert!((z_band[0] - 0.5).abs() < 0.05);
}

#[test]
fn normalized_moments_stay_bounded() {
    let targets = two_texel_maps();
    let scene = lamp_scene();
    let opts = BakeOpts {
        spp: 512,
        progress_every: 0,
        ..BakeOpts::default()
    };

    let image = bake_lightmap(&scene, &targets, &opts).unwrap();
    for band in 1..4 {
        let px = image.pixel(0 + band * 2, 0);
        for c in px {
            assert!(c.is_finite());
            assert!(c.abs() <= 1.0 + 1e-3);
        }
    }
}

#[test]
fn thread_count_does_not_change_the_result() {
    let targets = TargetMaps::from_texels(
        4,
        4,
        (0..16)
            .map(|i| Texel {
                position: Vec3::new(i as f32 * 0.1, 0.0, 0.0),
                normal: Vec3::new(0.0, 0.0, 1.0),
            })
            .collect(),
    )
    .unwrap();
    let scene = lamp_scene();

    let single = BakeOpts {
        spp: 64,
        threads: 1,
        progress_every: 0,
        ..BakeOpts::default()
    };
    let multi = BakeOpts {
        spp: 64,
        threads: 4,
        progress_every: 0,
        ..BakeOpts::default()
    };

    let a = bake_lightmap(&scene, &targets, &single).unwrap();
    let b = bake_lightmap(&scene, &targets, &multi).unwrap();
    assert_eq!(a, b);

    let grid = ProbeGrid::new([2, 2, 2], Vec3::zero(), Vec3::new(4.0, 4.0, 4.0)).unwrap();
    let a = bake_volume(&scene, &grid, &single).unwrap();
    let b = bake_volume(&scene, &grid, &multi).unwrap();
    assert_eq!(a, b);

    let cube = CubemapOpts {
        face_size: 2,
        supersample: 2,
    };
    let a = bake_cubemap_slice(&scene, &grid, 1, &single, &cube).unwrap();
    let b = bake_cubemap_slice(&scene, &grid, 1, &multi, &cube).unwrap();
    assert_eq!(a, b);
}

#[test]
fn cancelled_bakes_return_errors() {
    let targets = two_texel_maps();
    let scene = lamp_scene();
    let opts = BakeOpts {
        spp: 16,
        progress_every: 0,
        ..BakeOpts::default()
    };
    opts.cancel.cancel();

    assert!(bake_lightmap(&scene, &targets, &opts).is_err());

    let grid = ProbeGrid::new([2, 2, 2], Vec3::zero(), Vec3::new(2.0, 2.0, 2.0)).unwrap();
    assert!(bake_volume(&scene, &grid, &opts).is_err());

    let cube = CubemapOpts {
        face_size: 2,
        supersample: 1,
    };
    assert!(bake_cubemap_slice(&scene, &grid, 0, &opts, &cube).is_err());
}

#[test]
fn l2_order_widens_the_atlas() {
    let targets = two_texel_maps();
    let scene = lamp_scene();
    let opts = BakeOpts {
        spp: 16,
        order: ShOrder::L2,
        progress_every: 0,
        ..BakeOpts::default()
    };

    let image = bake_lightmap(&scene, &targets, &opts).unwrap();
    assert_eq!(image.width, 2 * 9);
    assert_eq!(image.height, 1);
}
