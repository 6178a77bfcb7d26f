//! Scenebake - Bake scene documents into render-ready assets
//!
//! Loads a model and its animation files, prints what was extracted and
//! optionally samples mesh and bone transforms at one frame.

mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Mat4;
use scenebake_assets::{AssetHandle, AssetLoader, Mesh};
use scenebake_core::FRAMES_PER_SECOND;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::settings::Settings;

/// Bone palette size of the skinning shader
const MAX_BONES: usize = 128;

#[derive(Parser, Debug)]
#[command(name = "scenebake")]
#[command(about = "Extract meshes, skins, materials and animation clips from scene documents")]
struct Cli {
    /// Scene document holding the model
    model: Option<PathBuf>,

    /// Animation document to load after the model (repeatable)
    #[arg(long = "animation")]
    animations: Vec<PathBuf>,

    /// Frame to sample every clip at
    #[arg(long)]
    frame: Option<f32>,

    /// Settings file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (settings, origin) = Settings::load(cli.config.as_deref());

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.level(cli.verbose))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;
    origin.log();

    let model = cli
        .model
        .clone()
        .or_else(|| settings.model.clone())
        .context("No model given on the command line or in settings")?;
    let animations = if cli.animations.is_empty() {
        settings.animations.clone()
    } else {
        cli.animations.clone()
    };

    let mut loader = AssetLoader::new(settings.loader.clone());
    loader
        .load(&model)
        .with_context(|| format!("Failed to load {}", model.display()))?;

    for path in &animations {
        match loader.load_animation(path) {
            Ok(clips) => info!("Loaded {} clips from {}", clips.len(), path.display()),
            Err(e) => warn!("Failed to load animation {}: {}", path.display(), e),
        }
    }

    print_meshes(&loader);
    print_clips(&loader);

    if let Some(frame) = cli.frame.or(settings.sample_frame) {
        print_samples(&loader, frame);
    }

    Ok(())
}

fn diffuse_texture<'a>(loader: &'a AssetLoader, mesh: &Mesh) -> Option<&'a str> {
    if mesh.material_name.is_empty() {
        return None;
    }
    let id = loader.material_id(&mesh.material_name).ok()?;
    loader.materials().get(id)?.diffuse_texture.as_deref()
}

fn print_meshes(loader: &AssetLoader) {
    println!("{} meshes", loader.meshes().len());
    for mesh in loader.meshes() {
        println!("  {}", mesh.node_name);
        println!(
            "    material: {}",
            if mesh.material_name.is_empty() {
                "none"
            } else {
                mesh.material_name.as_str()
            }
        );
        println!(
            "    {} vertices, {} indices, {} triangles",
            mesh.vertices.len(),
            mesh.indices.len(),
            mesh.triangle_count()
        );
        println!("    diffuse: {}", diffuse_texture(loader, mesh).unwrap_or("none"));
        if mesh.is_skinned() {
            println!("    {} bones: {}", mesh.bone_count(), mesh.bone_names.join(", "));
        }
    }
}

fn print_clips(loader: &AssetLoader) {
    println!("{} animation clips", loader.clips().len());
    for clip in loader.clips() {
        println!(
            "  {}: frames {}..{} ({:.2}s)",
            clip.name,
            clip.start_frame(),
            clip.end_frame(),
            f64::from(clip.frames.duration()) / FRAMES_PER_SECOND
        );
    }
}

fn print_samples(loader: &AssetLoader, frame: f32) {
    let mut palette = [Mat4::IDENTITY; MAX_BONES];
    for (clip_index, clip) in loader.clips().iter().enumerate() {
        let clip_handle = AssetHandle::new(clip_index);
        println!("{} at frame {}", clip.name, frame);
        if !clip.frames.contains(frame) {
            warn!(
                "Frame {} is outside '{}' ({}..{})",
                frame,
                clip.name,
                clip.start_frame(),
                clip.end_frame()
            );
        }

        for (mesh_index, mesh) in loader.meshes().iter().enumerate() {
            let mesh_handle = AssetHandle::new(mesh_index);
            match loader.sample_mesh_transform(mesh_handle, clip_handle, frame) {
                Ok(transform) => println!(
                    "  {}: translation {}",
                    mesh.node_name,
                    transform.w_axis.truncate()
                ),
                Err(e) => warn!("{}: {}", mesh.node_name, e),
            }
            if !mesh.is_skinned() {
                continue;
            }
            match loader.write_bone_transforms(mesh_handle, clip_handle, frame, &mut palette) {
                Ok(count) => println!("    {} bone transforms", count),
                Err(e) => warn!("{}: {}", mesh.node_name, e),
            }
        }
    }
}
