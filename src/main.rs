//! glyphwidths - precompute glyph advance widths from font asset trees
//!
//! Reads a base assets directory plus optional overlay resource packs and
//! writes one binary glyph width table.

use anyhow::{Context, Result};
use log::{error, info};
use std::path::PathBuf;

use glyphwidths::config::{self, Config};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Check command line arguments
    let args: Vec<String> = std::env::args().skip(1).collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("glyphwidths {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Config file generation mode
    if args.iter().any(|a| a == "--init-config") {
        let force = args.iter().any(|a| a == "--force" || a == "-f");
        let path = Config::write_template(force)?;
        println!("Config file written: {}", path.display());
        return Ok(());
    }

    let mut config = match option_values(&args, "--config")?.last() {
        Some(path) => Config::load_from_file(&PathBuf::from(path))?,
        None => Config::load(),
    };

    // Command line values override the config file
    if let Some(base) = option_values(&args, "--assets")?.last() {
        config.assets.base = base.clone();
    }
    let packs = option_values(&args, "--pack")?;
    if !packs.is_empty() {
        config.assets.overlays = packs;
    }
    if let Some(output) = option_values(&args, "--output")?.last() {
        config.output.path = output.clone();
    }
    if let Some(work_dir) = option_values(&args, "--work-dir")?.last() {
        config.output.work_dir = work_dir.clone();
    }

    let output = config.output_path()?;
    info!(
        "Generating {} from {} with {} overlays",
        output.display(),
        config.assets.base,
        config.assets.overlays.len()
    );
    let table = config
        .pipeline()?
        .run_to_file(&output)
        .with_context(|| format!("Failed to generate {}", output.display()))?;

    println!("{} glyph widths -> {}", table.len(), output.display());
    Ok(())
}

/// Collect the values of `--name value` and `--name=value` occurrences
fn option_values(args: &[String], name: &str) -> Result<Vec<String>> {
    let prefix = format!("{}=", name);
    let mut values = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            values.push(value.to_string());
        } else if arg == name {
            let value = iter
                .next()
                .with_context(|| format!("{} requires a value", name))?;
            values.push(value.clone());
        }
    }
    Ok(values)
}

fn print_help() {
    println!(
        r#"glyphwidths {} - glyph advance width table generator

USAGE:
    glyphwidths [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --config <FILE>         Read settings from FILE
    --assets <DIR>          Base assets directory
    --pack <SOURCE>         Overlay pack (directory, zip or file:// URL);
                            repeat in precedence order, replaces configured packs
    --output <FILE>         Glyph width table to write
    --work-dir <DIR>        Work directory, cleared on start (default: temp dir);
                            must be empty or a previous work dir, apart from inputs
    --init-config           Generate config file template
    -f, --force             Overwrite existing config file

EXAMPLES:
    glyphwidths --assets client/assets --output build/glyph_widths.bin
    glyphwidths --pack packs/base-fix.zip --pack packs/icons
    RUST_LOG=debug glyphwidths --config ci/glyphs.toml

CONFIG FILE:
    ${} or {}
"#,
        env!("CARGO_PKG_VERSION"),
        config::CONFIG_ENV,
        config::default_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/glyphwidths/config.toml".to_string())
    );
}
