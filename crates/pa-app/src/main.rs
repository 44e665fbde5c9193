use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use pa_core::config::RenderConfig;
use pa_export::{
    TextEncoding, convert_image_to_pixel_art, image_to_ascii_ansi, image_to_ascii_grayscale,
    render_ascii_text,
};

pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    run(&cli)
}

/// Charge la config, applique les overrides et écrit chaque sortie demandée.
fn run(cli: &cli::Cli) -> Result<()> {
    let mut config = resolve_config(cli)?;
    cli.apply_overrides(&mut config)?;

    let outputs = cli.outputs();

    if let Some(ref out) = outputs.pixel_art {
        convert_image_to_pixel_art(&cli.image, out, &config.pixel_art)
            .with_context(|| format!("pixel-art vers {}", out.display()))?;
    }
    if let Some(ref out) = outputs.ascii {
        image_to_ascii_grayscale(&cli.image, out, &config.ascii)
            .with_context(|| format!("ASCII gris vers {}", out.display()))?;
    }
    if let Some(ref out) = outputs.ansi {
        image_to_ascii_ansi(&cli.image, out, &config.ascii)
            .with_context(|| format!("ASCII ANSI vers {}", out.display()))?;
    }

    if cli.print {
        let text = render_ascii_text(&cli.image, &config.ascii, TextEncoding::Ansi)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{text}").context("écriture sur stdout")?;
    }

    Ok(())
}

/// Fichier de config par défaut, cherché dans le répertoire courant.
const DEFAULT_CONFIG: &str = "pixascii.toml";

/// An explicit `--config` must exist and load; a missing default one falls back to defaults.
fn resolve_config(cli: &cli::Cli) -> Result<RenderConfig> {
    if let Some(ref path) = cli.config {
        return pa_core::config::load_config(path)
            .with_context(|| format!("chargement de {}", path.display()));
    }

    let path = Path::new(DEFAULT_CONFIG);
    if path.exists() {
        pa_core::config::load_config(path)
            .with_context(|| format!("chargement de {}", path.display()))
    } else {
        log::warn!("Config introuvable : {DEFAULT_CONFIG}. Utilisation des défauts.");
        Ok(RenderConfig::default())
    }
}
