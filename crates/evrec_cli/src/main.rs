//! evrec - record, replay and inspect window event sessions
//!
//! `run` opens a live window, `record` captures every event into a log,
//! `play` replays a log against a fresh window at the recorded pace.

mod app;
mod config;
mod inspect;

use anyhow::{Context, Result};
use app::DemoApp;
use clap::{Parser, Subcommand, ValueEnum};
use config::{AppConfig, Overrides, Settings};
use evrec_platform_desktop::DesktopEventSource;
use evrec_recorder::{render, save_png, save_tga, EventLog, RenderMode, TestPattern};
use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "evrec")]
#[command(about = "Record, replay and inspect window event sessions")]
#[command(version)]
struct Cli {
    /// Path to evrec.toml (default: ./evrec.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a live window without recording
    Run,

    /// Record a live session into an event log
    Record {
        /// Event log to write (overrides config)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Replay an event log against a new window
    Play {
        /// Event log to read (overrides config)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Playback speed multiplier
        #[arg(short, long)]
        speed: Option<f64>,

        /// Only hand events to the app, without moving or resizing the window
        #[arg(long)]
        no_default_reactions: bool,
    },

    /// Print the records of an event log
    Inspect {
        /// Event log to read (overrides config)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// One JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Write a test-pattern screenshot
    Screenshot {
        /// Output file (default: screenshot directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        #[arg(long, value_enum, default_value_t = ImageFormat::Png)]
        format: ImageFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ImageFormat {
    Png,
    Tga,
}

impl ImageFormat {
    fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Tga => "tga",
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run => {
            let settings = Settings::resolve(config, Overrides::default());
            run_window(&settings, RenderMode::Live)
        }
        Commands::Record { file } => {
            let settings = Settings::resolve(
                config,
                Overrides {
                    log_file: file,
                    ..Default::default()
                },
            );
            settings.ensure_log_dir()?;
            run_window(&settings, RenderMode::Record)
        }
        Commands::Play {
            file,
            speed,
            no_default_reactions,
        } => {
            let settings = Settings::resolve(
                config,
                Overrides {
                    log_file: file,
                    speed,
                    no_default_reactions,
                },
            );
            run_window(&settings, RenderMode::Playback)
        }
        Commands::Inspect { file, json } => {
            let settings = Settings::resolve(
                config,
                Overrides {
                    log_file: file,
                    ..Default::default()
                },
            );
            let log = EventLog::load(&settings.log_file)?;
            inspect::write_log(&log, json, io::stdout().lock())
        }
        Commands::Screenshot {
            output,
            width,
            height,
            format,
        } => {
            let settings = Settings::resolve(config, Overrides::default());
            let width = width.unwrap_or(settings.window.width);
            let height = height.unwrap_or(settings.window.height);
            let path = match output {
                Some(path) => path,
                None => {
                    settings.ensure_screenshot_dir()?;
                    settings
                        .screenshot_dir
                        .join(format!("screenshot.{}", format.extension()))
                }
            };

            let written = match format {
                ImageFormat::Png => save_png(&TestPattern, &path, width, height).map(|_| ()),
                ImageFormat::Tga => save_tga(&TestPattern, &path, width, height),
            };
            written.with_context(|| format!("Failed to write {}", path.display()))
        }
    }
}

/// Open a desktop window and drive the demo app in `mode`
fn run_window(settings: &Settings, mode: RenderMode) -> Result<()> {
    settings.ensure_screenshot_dir()?;

    let mut source =
        DesktopEventSource::new(settings.window.clone()).context("Failed to open window")?;
    let app = RefCell::new(DemoApp::new(
        (settings.window.width, settings.window.height),
        &settings.screenshot_dir,
    ));

    info!("Starting {:?} session", mode);
    render(
        &mut source,
        mode,
        &settings.session(),
        || app.borrow_mut().update_and_draw(),
        |event| app.borrow_mut().handle_event(event),
    )?;

    app.borrow().report();
    Ok(())
}
