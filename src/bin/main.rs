//! shaped-julia CLI
//!
//! Command-line interface for generating and inspecting shaped Julia sets.

#![allow(clippy::uninlined_format_args, clippy::needless_pass_by_value)]

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use glam::DVec3;
#[cfg(feature = "cli")]
use rand::rngs::StdRng;
#[cfg(feature = "cli")]
use rand::SeedableRng;
#[cfg(feature = "cli")]
use shaped_julia::prelude::*;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use std::sync::Arc;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "shaped-julia")]
#[command(version = shaped_julia::VERSION)]
#[command(about = "Quaternion Julia sets shaped by a signed distance field", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Compute a shaped Julia set and write it as an OBJ mesh
    Generate(GenerateArgs),

    /// Display information about a distance field file
    Info {
        /// Input lattice (.f3d)
        file: PathBuf,
    },

    /// Bake the guided map's rotation components and magnitude to .f3d files
    Inspect {
        /// Distance field (.f3d)
        sdf: PathBuf,
        /// Output path prefix; writes <prefix>_rot_{w,x,y,z}.f3d and <prefix>_mag.f3d
        prefix: PathBuf,
        /// Samples per axis
        #[arg(short, long, default_value = "64")]
        resolution: usize,
        #[command(flatten)]
        map: MapArgs,
        #[command(flatten)]
        shape: ShapeArgs,
    },

    /// Dump a map over a 4D lattice as CSV
    MapCsv {
        /// Output file (.csv)
        output: PathBuf,
        /// Samples per axis
        #[arg(short, long, default_value = "8")]
        resolution: usize,
        /// Lattice extends from -extent to +extent on every axis
        #[arg(long, default_value = "1.0")]
        extent: f64,
        #[command(flatten)]
        map: MapArgs,
    },
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct GenerateArgs {
    /// Distance field (.f3d)
    sdf: PathBuf,
    /// Output mesh (.obj)
    output: PathBuf,
    /// Run parameters as JSON; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Grid cells per axis
    #[arg(short, long)]
    resolution: Option<usize>,
    /// Octree tile digits (0-7), e.g. 5 or 0732
    #[arg(long)]
    octree: Option<String>,
    /// Escape-time iteration budget
    #[arg(long)]
    iterations: Option<u32>,
    /// Escape radius
    #[arg(long)]
    escape_radius: Option<f64>,
    /// Level set to extract
    #[arg(long, allow_negative_numbers = true)]
    iso: Option<f64>,
    /// Maximum cached samples (0 disables the cache)
    #[arg(long)]
    cache_capacity: Option<usize>,
    #[command(flatten)]
    map: MapArgs,
    #[command(flatten)]
    shape: ShapeArgs,
}

/// Where the inner map comes from
#[cfg(feature = "cli")]
#[derive(Args)]
struct MapArgs {
    /// Polynomial / rational map (.json); a random polynomial when omitted
    #[arg(long)]
    map: Option<PathBuf>,
    /// Degree of the random polynomial
    #[arg(long, default_value = "4")]
    degree: usize,
    /// Random roots lie in [-spread, spread]
    #[arg(long, default_value = "0.5")]
    spread: f64,
    /// Seed for the random polynomial
    #[arg(long)]
    seed: Option<u64>,
}

/// Distance-guided map parameters
#[cfg(feature = "cli")]
#[derive(Args)]
struct ShapeArgs {
    /// Radius growth rate
    #[arg(short = 'a', long, allow_negative_numbers = true)]
    fill_level: Option<f64>,
    /// Radius offset
    #[arg(short = 'b', long, allow_negative_numbers = true)]
    fill_offset: Option<f64>,
    /// Blend between the inner map's magnitude (0) and the target radius (1)
    #[arg(long)]
    fit_scale: Option<f64>,
    /// Center of the distance field box
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    offset: Option<Vec<f64>>,
}

#[cfg(feature = "cli")]
impl ShapeArgs {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(a) = self.fill_level {
            config.guided.c = a;
        }
        if let Some(b) = self.fill_offset {
            config.guided.b = b;
        }
        if let Some(f) = self.fit_scale {
            config.guided.fit_scale = f;
        }
        if let Some([x, y, z]) = self.offset.as_deref().and_then(|v| <[f64; 3]>::try_from(v).ok()) {
            config.offset = DVec3::new(x, y, z);
        }
    }
}

#[cfg(feature = "cli")]
fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => cmd_generate(args),
        Commands::Info { file } => cmd_info(&file),
        Commands::Inspect {
            sdf,
            prefix,
            resolution,
            map,
            shape,
        } => cmd_inspect(&sdf, &prefix, resolution, &map, &shape),
        Commands::MapCsv {
            output,
            resolution,
            extent,
            map,
        } => cmd_map_csv(&output, resolution, extent, &map),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI not enabled. Build with --features cli");
    std::process::exit(1);
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shaped_julia=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[cfg(feature = "cli")]
fn load_inner_map(args: &MapArgs) -> shaped_julia::Result<RationalMap> {
    if let Some(path) = &args.map {
        let map = load_map(path)?;
        tracing::info!(
            path = %path.display(),
            degree = map.numerator.degree(),
            rational = map.denominator.is_some(),
            "loaded map"
        );
        return Ok(map);
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let poly = FactoredPolynomial::random(&mut rng, args.degree, args.spread);
    tracing::info!(seed, degree = args.degree, "random polynomial");
    Ok(RationalMap::polynomial(poly))
}

#[cfg(feature = "cli")]
fn cmd_generate(args: GenerateArgs) -> shaped_julia::Result<()> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(r) = args.resolution {
        config.resolution = r;
    }
    if let Some(o) = &args.octree {
        config.octree = Some(o.clone());
    }
    if let Some(n) = args.iterations {
        config.escape.max_iterations = n;
    }
    if let Some(r) = args.escape_radius {
        config.escape.escape_radius = r;
    }
    if let Some(iso) = args.iso {
        config.iso_level = iso;
    }
    if let Some(c) = args.cache_capacity {
        config.cache = CacheConfig::with_capacity(c);
    }
    args.shape.apply(&mut config);

    // Bad digits must fail before anything is loaded or sampled.
    config.validate()?;

    let grid = Arc::new(load_f3d(&args.sdf)?);
    let map = load_inner_map(&args.map)?;

    let start = std::time::Instant::now();
    let out = generate_mesh(grid, map, &config)?;
    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        hit_rate = out.cache_stats.hit_rate(),
        "generation finished"
    );

    export_obj(&out.mesh, &args.output, &ObjConfig::default())?;
    println!(
        "Wrote {} ({} vertices, {} triangles)",
        args.output.display(),
        out.mesh.vertex_count(),
        out.mesh.triangle_count()
    );
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_info(path: &Path) -> shaped_julia::Result<()> {
    let grid = load_f3d(path)?;
    let [nx, ny, nz] = grid.resolution();
    let b = grid.bounds();

    println!("File: {}", path.display());
    println!("Resolution: {}x{}x{} ({} samples)", nx, ny, nz, grid.sample_count());
    println!("Box min: ({}, {}, {})", b.min.x, b.min.y, b.min.z);
    println!("Box max: ({}, {}, {})", b.max.x, b.max.y, b.max.z);
    match grid.value_range() {
        Some((lo, hi)) => println!("Value range: [{}, {}]", lo, hi),
        None => println!("Value range: no finite samples"),
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_inspect(
    sdf: &Path,
    prefix: &Path,
    resolution: usize,
    map_args: &MapArgs,
    shape: &ShapeArgs,
) -> shaped_julia::Result<()> {
    let mut config = RunConfig::default();
    shape.apply(&mut config);

    let grid = Arc::new(load_f3d(sdf)?);
    let inner = load_inner_map(map_args)?;
    let distance = shaped_julia::pipeline::distance_field(grid, &config);
    let guided = Arc::new(DistanceGuidedMap::new(inner, distance, config.guided));

    let bounds = config.field_box();
    let res = [resolution; 3];
    let with_suffix = |suffix: &str| {
        let mut name = prefix.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    };

    for component in Component::ALL {
        let field = RotationComponentField::new(Arc::clone(&guided), component);
        let lattice = bake_lattice(&field, bounds, res)?;
        let path = with_suffix(&format!("_rot_{}.f3d", component.name()));
        save_f3d(&lattice, &path)?;
        println!("Wrote {}", path.display());
    }

    let lattice = bake_lattice(&MagnitudeField::new(guided), bounds, res)?;
    let path = with_suffix("_mag.f3d");
    save_f3d(&lattice, &path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_map_csv(
    output: &Path,
    resolution: usize,
    extent: f64,
    map_args: &MapArgs,
) -> shaped_julia::Result<()> {
    let map = load_inner_map(map_args)?;
    let sampling = MapSampling {
        min: Quaternion::new(-extent, -extent, -extent, -extent),
        max: Quaternion::new(extent, extent, extent, extent),
        resolution: [resolution; 4],
    };
    write_map_csv(&map, &sampling, output)?;
    println!("Wrote {} ({} samples)", output.display(), sampling.sample_count());
    Ok(())
}
