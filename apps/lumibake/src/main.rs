use anyhow::{anyhow, Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lumibake_bake::{
    bake_cubemap_slice, bake_lightmap, bake_volume, BakeOpts, CancelFlag, CubemapOpts, ProbeGrid,
    ShOrder, TargetMaps,
};
use lumibake_model::SceneFile;
use lumibake_render::image_out::write_exr;
use lumibake_render::integrator::LightingMode;
use lumibake_render::math::Vec3;
use lumibake_render::scene::Scene;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "lumibake", version, about = "Lightmap and light probe baking CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Lightmap(LightmapArgs),
    Probes(ProbesArgs),
    Cubemap(CubemapArgs),
}

#[derive(Args, Serialize)]
#[command(about = "Bake a texel lightmap from position and normal maps")]
struct LightmapArgs {
    #[arg(long)]
    scene: PathBuf,

    #[arg(long)]
    positions: PathBuf,

    #[arg(long)]
    normals: PathBuf,

    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,

    #[arg(long, default_value_t = 1024)]
    spp: u32,

    #[arg(long, default_value_t = 6)]
    bounces: u32,

    #[arg(long, value_enum, default_value = "l1")]
    order: OrderArg,

    #[arg(long, conflicts_with = "indirect_only")]
    direct_only: bool,

    #[arg(long)]
    indirect_only: bool,

    #[arg(long, default_value_t = 0)]
    threads: usize,

    #[arg(long, default_value_t = 64)]
    progress_every: u32,

    #[arg(long)]
    force: bool,
}

#[derive(Args, Serialize)]
#[command(about = "Bake a spherical-harmonic probe volume")]
struct ProbesArgs {
    #[arg(long)]
    scene: PathBuf,

    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    #[arg(long, num_args = 3, value_delimiter = ' ', default_value = "100 100 100")]
    probe_count: Vec<u32>,

    #[arg(long, num_args = 3, value_delimiter = ' ', default_value = "100 100 100")]
    scale: Vec<f32>,

    #[arg(
        long,
        num_args = 3,
        value_delimiter = ' ',
        default_value = "0 0 0",
        allow_negative_numbers = true
    )]
    center: Vec<f32>,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 1024)]
    spp: u32,

    #[arg(long, default_value_t = 6)]
    bounces: u32,

    #[arg(long, value_enum, default_value = "l1")]
    order: OrderArg,

    #[arg(long, conflicts_with = "indirect_only")]
    direct_only: bool,

    #[arg(long)]
    indirect_only: bool,

    #[arg(long, default_value_t = 0)]
    threads: usize,

    #[arg(long, default_value_t = 64)]
    progress_every: u32,

    #[arg(long)]
    force: bool,
}

#[derive(Args, Serialize)]
#[command(about = "Render per-probe environment cubemaps, one EXR per grid layer")]
struct CubemapArgs {
    #[arg(long)]
    scene: PathBuf,

    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    #[arg(long, default_value_t = 100)]
    probe_count: u32,

    #[arg(long, num_args = 3, value_delimiter = ' ', default_value = "2 2 2")]
    scale: Vec<f32>,

    #[arg(
        long,
        num_args = 3,
        value_delimiter = ' ',
        default_value = "0 0 0",
        allow_negative_numbers = true
    )]
    center: Vec<f32>,

    #[arg(long, default_value_t = 16)]
    face_size: u32,

    #[arg(long, default_value_t = 1)]
    supersample: u32,

    #[arg(long, default_value_t = 0xDEADCAFE)]
    seed: u64,

    #[arg(long, default_value_t = 1)]
    spp: u32,

    #[arg(long, default_value_t = 6)]
    bounces: u32,

    #[arg(long, conflicts_with = "indirect_only")]
    direct_only: bool,

    #[arg(long)]
    indirect_only: bool,

    #[arg(long, default_value_t = 0)]
    threads: usize,

    #[arg(long, default_value_t = 64)]
    progress_every: u32,

    #[arg(long)]
    force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum OrderArg {
    L1,
    L2,
}

impl From<OrderArg> for ShOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::L1 => ShOrder::L1,
            OrderArg::L2 => ShOrder::L2,
        }
    }
}

#[derive(Serialize)]
struct HostInfo {
    os: String,
    arch: String,
}

#[derive(Serialize)]
struct BakeReceipt<A: Serialize> {
    version: String,
    pass: String,
    started_at_utc: String,
    finished_at_utc: String,
    args: A,
    outputs: Vec<PathBuf>,
    host: HostInfo,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || handler_flag.cancel())
        .context("failed to install ctrl-c handler")?;

    match cli.command {
        Commands::Lightmap(args) => run_lightmap(args, cancel),
        Commands::Probes(args) => run_probes(args, cancel),
        Commands::Cubemap(args) => run_cubemap(args, cancel),
    }
}

fn run_lightmap(args: LightmapArgs, cancel: CancelFlag) -> Result<()> {
    let started_at_utc = now_utc();
    let out_dir = args.out_dir.clone();
    let out_path = out_dir.join(format!("lightmap_{}_{}.exr", args.seed, args.spp));

    if out_path.exists() && !args.force {
        log::info!(
            "{} already exists, skipping (use --force to re-bake)",
            out_path.display()
        );
        return Ok(());
    }

    let scene = load_scene(&args.scene)?;
    let targets = TargetMaps::load(&args.positions, &args.normals)?;
    log::info!(
        "lightmap: {}x{} texels ({} covered), {} primitives, {} spp",
        targets.width(),
        targets.height(),
        targets.active_count(),
        scene.primitive_count(),
        args.spp
    );

    let opts = BakeOpts {
        spp: args.spp,
        bounces: args.bounces,
        seed: args.seed,
        order: args.order.into(),
        mode: lighting_mode(args.direct_only, args.indirect_only),
        threads: args.threads,
        progress_every: args.progress_every,
        cancel,
    };

    let image = bake_lightmap(&scene, &targets, &opts)?;
    ensure_out_dir(&out_dir)?;
    write_exr(&out_path, &image)?;
    log::info!("wrote {}", out_path.display());

    finish_receipt(&out_dir, "lightmap", started_at_utc, args, vec![out_path])
}

fn run_probes(args: ProbesArgs, cancel: CancelFlag) -> Result<()> {
    let started_at_utc = now_utc();
    let out_dir = args.out_dir.clone();
    let out_path = out_dir.join(format!("probes_{}_{}.exr", args.seed, args.spp));

    if out_path.exists() && !args.force {
        log::info!(
            "{} already exists, skipping (use --force to re-bake)",
            out_path.display()
        );
        return Ok(());
    }

    let scene = load_scene(&args.scene)?;
    let grid = ProbeGrid::new(
        triple(&args.probe_count)?,
        Vec3::from_array(triple(&args.center)?),
        Vec3::from_array(triple(&args.scale)?),
    )?;
    log::info!(
        "probes: {}x{}x{} grid ({} probes), {} primitives, {} spp",
        grid.count[0],
        grid.count[1],
        grid.count[2],
        grid.probe_count(),
        scene.primitive_count(),
        args.spp
    );

    let opts = BakeOpts {
        spp: args.spp,
        bounces: args.bounces,
        seed: args.seed,
        order: args.order.into(),
        mode: lighting_mode(args.direct_only, args.indirect_only),
        threads: args.threads,
        progress_every: args.progress_every,
        cancel,
    };

    let image = bake_volume(&scene, &grid, &opts)?;
    ensure_out_dir(&out_dir)?;
    write_exr(&out_path, &image)?;
    log::info!("wrote {}", out_path.display());

    finish_receipt(&out_dir, "probes", started_at_utc, args, vec![out_path])
}

fn run_cubemap(args: CubemapArgs, cancel: CancelFlag) -> Result<()> {
    let started_at_utc = now_utc();
    let out_dir = args.out_dir.clone();
    let layers = args.probe_count;

    let scene = load_scene(&args.scene)?;
    let grid = ProbeGrid::new(
        [layers, layers, layers],
        Vec3::from_array(triple(&args.center)?),
        Vec3::from_array(triple(&args.scale)?),
    )?;
    let cube = CubemapOpts {
        face_size: args.face_size,
        supersample: args.supersample,
    };
    let opts = BakeOpts {
        spp: args.spp,
        bounces: args.bounces,
        seed: args.seed,
        order: ShOrder::L1,
        mode: lighting_mode(args.direct_only, args.indirect_only),
        threads: args.threads,
        progress_every: args.progress_every,
        cancel,
    };

    log::info!(
        "cubemap: {layers} layers of {}px faces, {} primitives, {} spp",
        args.face_size,
        scene.primitive_count(),
        args.spp
    );

    ensure_out_dir(&out_dir)?;
    let mut outputs = Vec::with_capacity(layers as usize);
    let mut skipped = 0u32;
    for z in 0..layers {
        let out_path = out_dir.join(format!("{z}.exr"));
        if out_path.exists() && !args.force {
            skipped += 1;
            outputs.push(out_path);
            continue;
        }
        let image = bake_cubemap_slice(&scene, &grid, z, &opts, &cube)?;
        write_exr(&out_path, &image)?;
        log::info!("wrote layer {}/{layers} to {}", z + 1, out_path.display());
        outputs.push(out_path);
    }
    if skipped == layers {
        log::info!("all {layers} layers already exist, skipping (use --force to re-bake)");
        return Ok(());
    }
    if skipped > 0 {
        log::info!("skipped {skipped} existing layers (use --force to re-bake)");
    }

    finish_receipt(&out_dir, "cubemap", started_at_utc, args, outputs)
}

fn lighting_mode(direct_only: bool, indirect_only: bool) -> LightingMode {
    if direct_only {
        LightingMode::DirectOnly
    } else if indirect_only {
        LightingMode::IndirectOnly
    } else {
        LightingMode::Full
    }
}

fn load_scene(path: &Path) -> Result<Scene> {
    let contents = fs::read_to_string(path)
        .map_err(|err| anyhow!("failed to read scene {:?}: {}", path, err))?;
    let file: SceneFile = serde_json::from_str(&contents)
        .map_err(|err| anyhow!("failed to parse scene {:?}: {}", path, err))?;
    let scene = Scene::build(&file)
        .map_err(|err| anyhow!("invalid scene {:?}: {}", path, err))?;
    Ok(scene)
}

fn triple<T: Copy>(values: &[T]) -> Result<[T; 3]> {
    values
        .try_into()
        .map_err(|_| anyhow!("expected three values, got {}", values.len()))
}

fn ensure_out_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .map_err(|err| anyhow!("failed to create output directory {:?}: {}", dir, err))
}

fn now_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn finish_receipt<A: Serialize>(
    out_dir: &Path,
    pass: &str,
    started_at_utc: String,
    args: A,
    outputs: Vec<PathBuf>,
) -> Result<()> {
    let receipt = BakeReceipt {
        version: env!("CARGO_PKG_VERSION").to_string(),
        pass: pass.to_string(),
        started_at_utc,
        finished_at_utc: now_utc(),
        args,
        outputs,
        host: HostInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        },
    };
    write_json(&out_dir.join(format!("{pass}.json")), &receipt)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    atomic_write(path, &json)
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .map_err(|err| anyhow!("failed to create output directory {:?}: {}", parent, err))?;
    }

    let tmp_path = temp_path(path);
    let mut file = fs::File::create(&tmp_path)
        .map_err(|err| anyhow!("failed to create temp file {:?}: {}", tmp_path, err))?;
    file.write_all(data)
        .map_err(|err| anyhow!("failed to write temp file {:?}: {}", tmp_path, err))?;
    file.sync_all()
        .map_err(|err| anyhow!("failed to sync temp file {:?}: {}", tmp_path, err))?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(anyhow!("failed to replace output {:?}: {}", path, err));
    }

    if let Ok(dir) = fs::File::open(parent) {
        let _ = dir.sync_all();
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("output");
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let pid = std::process::id();
    let tmp_name = format!(".{}.part-{}-{}", file_name, pid, stamp);
    parent.join(tmp_name)
}
