use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use glbview_assets::AssetLoader;
use glbview_common::Viewport;
use glbview_render::DebugTextRenderer;
use glbview_viewer::{LoadStatus, Viewer, ViewerConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glbview-cli", about = "Headless tool for GLB viewer models and configuration")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Load a model, fit it to the origin and print a summary
    Inspect {
        /// Path to a .glb or .gltf file
        model: PathBuf,
        /// Uniform scale applied after centering
        #[arg(short, long)]
        scale: Option<f32>,
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the fit report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the default configuration as YAML
    Config,
    /// Write a sample GLB: an off-center box from (-1,-1,-1) to (3,1,1)
    Sample {
        /// Output path
        #[arg(default_value = "models/thixotropic-gel.glb")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("glbview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", glbview_scene::crate_info());
            println!("input: {}", glbview_input::crate_info());
            println!("assets: {}", glbview_assets::crate_info());
            println!("render: {}", glbview_render::crate_info());
            println!("viewer: {}", glbview_viewer::crate_info());
        }
        Commands::Inspect {
            model,
            scale,
            config,
            json,
        } => {
            let mut config = match config {
                Some(path) => ViewerConfig::load(&path)
                    .with_context(|| format!("reading config {}", path.display()))?,
                None => ViewerConfig::default(),
            };
            if let Some(scale) = scale {
                config.fit.scale = scale;
            }
            inspect(&model, &config, json)?;
        }
        Commands::Config => {
            print!("{}", ViewerConfig::default().to_yaml()?);
        }
        Commands::Sample { out } => {
            if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
            let bytes = glbview_assets::sample::box_glb(
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(3.0, 1.0, 1.0),
            );
            std::fs::write(&out, &bytes).with_context(|| format!("writing {}", out.display()))?;
            println!("wrote {} ({} bytes)", out.display(), bytes.len());
        }
    }

    Ok(())
}

fn inspect(model: &Path, config: &ViewerConfig, json: bool) -> anyhow::Result<()> {
    let viewport = Viewport::new(config.window.width, config.window.height);
    let mut viewer = Viewer::bootstrap(viewport, config, DebugTextRenderer::new());

    let handle = viewer.begin_load(&AssetLoader::new(), model);
    let node = handle
        .wait(|progress| tracing::debug!("{progress}"))
        .with_context(|| format!("loading {}", model.display()))?;
    viewer.attach_model(node);

    let fit = match viewer.status() {
        LoadStatus::Loaded { fit, .. } => *fit,
        _ => None,
    };
    let Some(node) = viewer.model() else {
        anyhow::bail!("model was not attached");
    };

    if json {
        let summary = serde_json::json!({
            "name": node.name,
            "nodes": node.node_count(),
            "meshes": node.mesh_count(),
            "triangles": node.triangle_count(),
            "fit": fit,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Model: {}", node.name);
    println!(
        "  nodes={} meshes={} triangles={}",
        node.node_count(),
        node.mesh_count(),
        node.triangle_count()
    );
    match fit {
        Some(fit) => println!(
            "  fit: center ({:.3}, {:.3}, {:.3}) size ({:.3}, {:.3}, {:.3}) -> position ({:.3}, {:.3}, {:.3}) scale {:.3}",
            fit.original_center.x,
            fit.original_center.y,
            fit.original_center.z,
            fit.size.x,
            fit.size.y,
            fit.size.z,
            fit.final_position.x,
            fit.final_position.y,
            fit.final_position.z,
            fit.scale.x
        ),
        None => println!("  fit: skipped (no geometry)"),
    }
    print!("{}", viewer.frame());
    Ok(())
}
