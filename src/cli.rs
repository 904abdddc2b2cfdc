//! Command-line interface: list and describe nodes, tile image files.

use crate::config;
use crate::core::buffer;
use crate::core::node::{Category, NodeMetadata};
use crate::filters::registry::NodeRegistry;
use crate::texture::{Interpolation, PatternType, TextureDirection, TextureTiler, TilerParams};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "seamweave")]
#[command(author, version, about = "Seamless texture tiles from ordinary images")]
/// Command-line arguments
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all available nodes
    List,
    /// Show ports and parameters of a node
    Info {
        /// Node id, as printed by `list`
        node: String,
    },
    /// Make a seamless tile from an image file
    Tile(TileArgs),
}

/// Arguments of `tile`. Flags override values from `--params`.
#[derive(Args, Debug, Default)]
pub struct TileArgs {
    /// Source image
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the tile
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Also write the 256x256 preview here
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// JSON or TOML parameter file
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    #[arg(long)]
    pub tile_size: Option<u32>,

    #[arg(long)]
    pub overlap: Option<u32>,

    #[arg(long, value_enum)]
    pub pattern: Option<PatternType>,

    #[arg(long, value_enum)]
    pub interpolation: Option<Interpolation>,

    /// Copies per side
    #[arg(long)]
    pub repeat: Option<u32>,

    #[arg(long, value_enum)]
    pub direction: Option<TextureDirection>,

    /// Edge contrast multiplier (1.0 = off)
    #[arg(long)]
    pub detail: Option<f32>,

    #[arg(long)]
    pub edge_padding: Option<u32>,

    /// Percent, 0-100
    #[arg(long)]
    pub edge_blur: Option<f32>,

    /// Percent, 0-100
    #[arg(long)]
    pub edge_fade: Option<f32>,

    #[arg(long)]
    pub color_correction: bool,

    #[arg(long)]
    pub color_strength: Option<f32>,

    /// CLAHE clip limit
    #[arg(long)]
    pub clip_limit: Option<f32>,

    /// Percent, 0-100
    #[arg(long)]
    pub light_equalization: Option<f32>,

    /// Percent, 0-100
    #[arg(long)]
    pub gradient_removal: Option<f32>,
}

impl TileArgs {
    /// Parameter file (or defaults) with every given flag applied on top.
    pub fn resolve_params(&self) -> anyhow::Result<TilerParams> {
        let mut params = match &self.params {
            Some(path) => config::load_params(path)?,
            None => TilerParams::default(),
        };

        macro_rules! apply {
            ($($flag:ident => $field:ident),+ $(,)?) => {
                $(if let Some(value) = self.$flag {
                    params.$field = value;
                })+
            };
        }
        apply!(
            tile_size => tile_size,
            overlap => overlap,
            pattern => pattern_type,
            interpolation => interpolation,
            repeat => repeat_count,
            direction => texture_direction,
            detail => detail_level,
            edge_padding => edge_padding,
            edge_blur => edge_blur,
            edge_fade => edge_fade,
            color_strength => color_correction_strength,
            clip_limit => color_correction_clip_limit,
            light_equalization => light_equalization,
            gradient_removal => gradient_removal,
        );
        if self.color_correction {
            params.color_correction = true;
        }
        Ok(params)
    }
}

/// Run a parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::List => {
            list_nodes(&NodeRegistry::with_builtins());
            Ok(())
        }
        Command::Info { node } => {
            let registry = NodeRegistry::with_builtins();
            let metadata = registry
                .get_metadata(&node)
                .with_context(|| format!("Node not found: {} (use 'list' to see available nodes)", node))?;
            print_info(metadata);
            Ok(())
        }
        Command::Tile(args) => tile(&args),
    }
}

fn list_nodes(registry: &NodeRegistry) {
    println!("Available nodes ({} total):", registry.len());
    for category in Category::all() {
        let ids = registry.nodes_by_category(*category);
        if ids.is_empty() {
            continue;
        }
        println!();
        println!("  {}", category.display_name());
        for id in ids {
            if let Some(metadata) = registry.get_metadata(id) {
                println!("    {:<18} {}", metadata.id, metadata.description);
            }
        }
    }
}

fn print_info(metadata: &NodeMetadata) {
    println!("Node: {}", metadata.name);
    println!("ID: {}", metadata.id);
    println!("Category: {}", metadata.category.display_name());
    println!("Version: {}", metadata.version);
    if !metadata.description.is_empty() {
        println!();
        println!("  {}", metadata.description);
    }

    if !metadata.inputs.is_empty() {
        println!();
        println!("Inputs:");
        for port in &metadata.inputs {
            let optional = if port.optional { " (optional)" } else { "" };
            println!("  {} [{}]{}", port.name, port.port_type, optional);
        }
    }

    if !metadata.outputs.is_empty() {
        println!();
        println!("Outputs:");
        for port in &metadata.outputs {
            println!("  {} [{}]", port.name, port.port_type);
        }
    }

    if !metadata.parameters.is_empty() {
        println!();
        println!("Parameters:");
        for param in &metadata.parameters {
            println!("  {} [{}] = {}", param.name, param.param_type, param.default_value);
            for constraint in &param.constraints {
                println!("    {}", constraint.description());
            }
        }
    }
}

fn tile(args: &TileArgs) -> anyhow::Result<()> {
    let params = args.resolve_params()?;
    let tiler = TextureTiler::new(params)?;

    let image = buffer::load(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    log::info!(
        "Tiling {} ({}x{}) with {} pattern",
        args.input.display(),
        image.width(),
        image.height(),
        tiler.params().pattern_type
    );

    let output = tiler.run(&image)?;
    buffer::save(&output.tile, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Wrote {}", args.output.display());

    if let Some(path) = &args.preview {
        buffer::save(&output.preview, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Wrote preview {}", path.display());
    }
    Ok(())
}
