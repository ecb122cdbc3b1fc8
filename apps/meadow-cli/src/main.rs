use anyhow::Context;
use clap::{Parser, Subcommand};
use meadow_heightfield::{HeightField, TerrainMesh, WaterMesh};
use meadow_scene::{Scene, SceneConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meadow-cli", about = "CLI for the meadow terrain toolkit")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Sample the terrain height at a world position
    Sample {
        /// Grayscale height-map image
        #[arg(long)]
        height_map: PathBuf,
        #[arg(long)]
        x: f32,
        #[arg(long)]
        z: f32,
        /// World size of one height-map texel
        #[arg(long, default_value = "1.0")]
        spacing: f32,
        #[arg(long, default_value = "250.0")]
        height_scale: f32,
    },
    /// Build the terrain and water meshes and print their stats
    Mesh {
        /// Grayscale height-map image
        #[arg(long)]
        height_map: PathBuf,
        /// Use every res-th texel
        #[arg(long, default_value = "2")]
        res: u32,
        #[arg(long, default_value = "1.0")]
        spacing: f32,
        #[arg(long, default_value = "250.0")]
        height_scale: f32,
    },
    /// Generate the per-cell instance buffer for a foliage field
    Generate {
        /// Grayscale height-map image
        #[arg(long)]
        height_map: PathBuf,
        /// Scene config YAML; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// Animation clock value to generate at
        #[arg(long, default_value = "0.0")]
        time: f32,
        /// Cells to mark collected, as x,y pairs (repeatable)
        #[arg(long = "collect", value_name = "X,Y")]
        collect: Vec<String>,
        /// Write the raw instance bytes here for a renderer to consume
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print stats as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("meadow-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", meadow_common::crate_info());
            println!("heightfield: {}", meadow_heightfield::crate_info());
            println!("instances: {}", meadow_instances::crate_info());
            println!("scene: {}", meadow_scene::crate_info());
        }
        Commands::Sample {
            height_map,
            x,
            z,
            spacing,
            height_scale,
        } => {
            let field = load_field(&height_map)?;
            let point = field.sample(x / spacing, z / spacing);
            let surface = field.surface_height(x, z, spacing, height_scale);
            println!("point sample: {point:.6}");
            println!("surface height: {surface:.3}");
        }
        Commands::Mesh {
            height_map,
            res,
            spacing,
            height_scale,
        } => {
            let field = load_field(&height_map)?;
            let mesh = TerrainMesh::build(&field, res, spacing, height_scale, true)?;
            let extent = field.width().max(field.height()) as f32 * spacing;
            let level = meadow_heightfield::WATER_LEVEL_FRACTION * height_scale;
            let water = WaterMesh::build(extent, level, 10.0);
            println!(
                "terrain: {} vertices, {} triangles",
                mesh.vertices.len(),
                mesh.triangle_count()
            );
            println!(
                "water: {} vertices, {} triangles at level {:.2}",
                water.vertices.len(),
                water.triangle_count(),
                water.level
            );
        }
        Commands::Generate {
            height_map,
            config,
            width,
            height,
            time,
            collect,
            out,
            json,
        } => {
            let mut scene_config = match config {
                Some(path) => SceneConfig::from_yaml_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => SceneConfig::default(),
            };
            if let Some(width) = width {
                scene_config.grid.width = width;
            }
            if let Some(height) = height {
                scene_config.grid.height = height;
            }

            let field = load_field(&height_map)?;
            let mut scene = Scene::from_config(&scene_config, field);
            for pair in &collect {
                let (x, y) = parse_cell(pair)?;
                if !scene.collect(x, y) {
                    tracing::warn!(x, y, "cell outside the grid, not collected");
                }
            }
            scene.advance(time);

            let instances = scene.instances()?;
            if let Some(path) = &out {
                std::fs::write(path, bytemuck::cast_slice(&instances))
                    .with_context(|| format!("writing {}", path.display()))?;
            }

            let summary = scene.summary();
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "grid": { "width": summary.width, "height": summary.height },
                        "instances": instances.len(),
                        "collected": summary.collected,
                        "clock": summary.clock,
                        "bytes": instances.len() * std::mem::size_of::<meadow_common::InstanceRaw>(),
                        "out": out.as_ref().map(|p| p.display().to_string()),
                    })
                );
            } else {
                println!("{summary}");
                println!("generated {} instance records", instances.len());
                if let Some(path) = out {
                    println!("wrote {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn load_field(path: &Path) -> anyhow::Result<HeightField> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(HeightField::from_bytes(&bytes)?)
}

/// Parse an "x,y" cell argument.
fn parse_cell(pair: &str) -> anyhow::Result<(u32, u32)> {
    let (x, y) = pair
        .split_once(',')
        .with_context(|| format!("expected X,Y but got {pair:?}"))?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}
