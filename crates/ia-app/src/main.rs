use anyhow::{Context, Result};
use clap::Parser;
use ia_core::palette::PaletteId;
use ia_core::settings::ConvertSettings;

pub mod app;
pub mod cli;
pub mod worker;

fn main() -> Result<()> {
    // 1. Parse CLI
    let cli = cli::Cli::parse();

    // 2. Initialize logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    cli.validate()?;

    // 3. Resolve settings: config file, then CLI overrides
    let mut settings = resolve_settings(&cli)?;
    apply_cli_overrides(&cli, &mut settings);
    settings
        .validate()
        .context("refusing to start with invalid settings")?;

    let export_style = ia_export::ExportStyle::from_options(
        cli.export_font_px,
        cli.export_fg.as_deref(),
        cli.export_bg.as_deref(),
    )?;

    // 4. Headless mode: convert once and exit
    if cli.out.is_some() || cli.png.is_some() {
        return run_headless(&cli, &settings, &export_style);
    }

    // 5. Interactive mode
    let (job_tx, outcome_rx) = worker::spawn_convert_worker();
    let mut app_instance = app::App::new(settings, export_style, job_tx, outcome_rx);
    if let Some(ref path) = cli.image {
        app_instance.load_image(path);
    }

    let terminal = ratatui::init();
    let result = app_instance.run(terminal);

    // Restore the terminal ALWAYS, even on error
    ratatui::restore();

    result
}

/// Load settings from --config if the file exists, defaults otherwise.
fn resolve_settings(cli: &cli::Cli) -> Result<ConvertSettings> {
    if cli.config.exists() {
        Ok(ia_core::settings::load_settings(&cli.config)?)
    } else {
        log::warn!(
            "config not found: {}. Using defaults.",
            cli.config.display()
        );
        Ok(ConvertSettings::default())
    }
}

/// CLI flags win over the config file.
fn apply_cli_overrides(cli: &cli::Cli, settings: &mut ConvertSettings) {
    if let Some(ref name) = cli.palette {
        if let Some(id) = PaletteId::from_name(name) {
            settings.set_palette(id);
        } else {
            log::warn!("unknown palette '{name}', treating it as a literal ramp");
            settings.palette.clone_from(name);
        }
    }
    if let Some(ws) = cli.width_scale {
        settings.width_scale = ws;
    }
    if let Some(hs) = cli.height_scale {
        settings.height_scale = hs;
    }
    if let Some(invert) = cli.invert {
        settings.invert = invert;
    }
    if let Some(b) = cli.brightness {
        settings.brightness = b;
    }
}

/// One-shot conversion: load, convert, write artifacts, no terminal UI.
fn run_headless(
    cli: &cli::Cli,
    settings: &ConvertSettings,
    export_style: &ia_export::ExportStyle,
) -> Result<()> {
    let image_path = cli
        .image
        .as_deref()
        .context("--out/--png require --image")?;
    let image = ia_source::load_image(image_path)?;
    let art = ia_ascii::convert(&image, settings)?;
    log::info!("converted {} to {}x{}", image_path.display(), art.cols(), art.rows());

    if let Some(ref out) = cli.out {
        ia_export::save_text(&art, out)?;
        println!("wrote {}", out.display());
    }
    if let Some(ref png) = cli.png {
        ia_export::export_png(&art, png, export_style)?;
        println!("wrote {}", png.display());
    }
    Ok(())
}
