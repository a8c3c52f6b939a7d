use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dstretch::assets::{AssetLoader, ConfigSource};
use dstretch::models::{load_params_file, AppConfig, StatsReport};
use dstretch::rendering::{read_png, write_png};
use dstretch::services::{EditSession, FileWatcher, RenderQueue};
use dstretch_core::{ColorSpace, Enhancer, ParameterSet};

#[derive(Parser)]
#[command(name = "dstretch")]
#[command(about = "DStretch - decorrelation stretch and relief enhancement for rock-art photography")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Enhance a PNG image and write the result
    Process {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file (default: dstretch-<timestamp>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Named preset from config.yaml
        #[arg(short, long)]
        preset: Option<String>,

        /// Parameter YAML file (takes precedence over --preset)
        #[arg(long)]
        params: Option<PathBuf>,

        /// Override the stretch colorspace (RGB, LAB, LCH, YRE, LRE, YBK, CRGB)
        #[arg(short, long)]
        colorspace: Option<String>,

        /// Override the stretch amount (0.0 - 2.0)
        #[arg(short, long)]
        stretch: Option<f64>,

        /// Disable the decorrelation stretch
        #[arg(long)]
        no_dstretch: bool,
    },
    /// Print channel statistics and the eigenbasis of an image
    Stats {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Colorspace to analyze in
        #[arg(short, long, default_value = "RGB")]
        colorspace: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-render whenever a parameter file changes
    Watch {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Parameter YAML file to watch
        #[arg(long)]
        params: PathBuf,

        /// Output PNG file, rewritten after each render
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List presets from the active config
    Presets,
    /// List supported colorspaces
    Colorspaces,
    /// Extract the embedded config.yaml for customization
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Process {
            input,
            output,
            preset,
            params,
            colorspace,
            stretch,
            no_dstretch,
        }) => {
            init_tracing("dstretch=info");
            let overrides = Overrides {
                colorspace: colorspace.as_deref().map(ColorSpace::from_code),
                stretch,
                no_dstretch,
            };
            run_process_command(&input, output, preset.as_deref(), params.as_deref(), overrides)
        }
        Some(Commands::Stats {
            input,
            colorspace,
            json,
        }) => {
            init_tracing("dstretch=info");
            run_stats_command(&input, ColorSpace::from_code(&colorspace), json)
        }
        Some(Commands::Watch {
            input,
            params,
            output,
        }) => {
            init_tracing("dstretch=info");
            run_watch_command(input, params, output).await
        }
        Some(Commands::Presets) => {
            init_tracing("dstretch=info");
            run_presets_command();
            Ok(())
        }
        Some(Commands::Colorspaces) => {
            for space in ColorSpace::ALL {
                println!("  {space}");
            }
            Ok(())
        }
        Some(Commands::Init { force }) => {
            init_tracing("dstretch=info");
            run_init_command(force)
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Command-line adjustments applied on top of the preset or parameter file
struct Overrides {
    colorspace: Option<ColorSpace>,
    stretch: Option<f64>,
    no_dstretch: bool,
}

impl Overrides {
    fn apply(&self, mut params: ParameterSet) -> ParameterSet {
        if let Some(space) = self.colorspace {
            params = params.colorspace(space).dstretch(true);
        }
        if let Some(amount) = self.stretch {
            params = params.stretch_amount(amount).dstretch(true);
        }
        if self.no_dstretch {
            params = params.dstretch(false);
        }
        params
    }
}

/// Enhance one image (no worker needed)
fn run_process_command(
    input: &Path,
    output: Option<PathBuf>,
    preset: Option<&str>,
    params_file: Option<&Path>,
    overrides: Overrides,
) -> anyhow::Result<()> {
    let params = match params_file {
        Some(path) => load_params_file(path)?,
        None => AppConfig::load_from_assets(&AssetLoader::from_env()).resolve_params(preset)?,
    };
    let params = overrides.apply(params);

    let image = read_png(input)?;
    let started = std::time::Instant::now();
    let enhanced = Enhancer::new(params).process(&image)?;
    tracing::info!(
        width = image.width(),
        height = image.height(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Enhanced image"
    );

    let output = output.unwrap_or_else(default_output_name);
    write_png(&output, &enhanced)?;
    println!(
        "Enhanced {} -> {} ({}x{})",
        input.display(),
        output.display(),
        enhanced.width(),
        enhanced.height()
    );

    Ok(())
}

fn default_output_name() -> PathBuf {
    PathBuf::from(format!(
        "dstretch-{}.png",
        chrono::Utc::now().timestamp_millis()
    ))
}

fn run_stats_command(input: &Path, colorspace: ColorSpace, json: bool) -> anyhow::Result<()> {
    let image = read_png(input)?;
    let report = StatsReport::from_image(&image, colorspace);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Watch a parameter file and re-render on every change
async fn run_watch_command(input: PathBuf, params_path: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let config = AppConfig::load_from_assets(&AssetLoader::from_env());
    let source = Arc::new(read_png(&input)?);
    tracing::info!(
        input = %input.display(),
        width = source.width(),
        height = source.height(),
        "Loaded source image"
    );

    let (queue, mut outcomes) = RenderQueue::spawn(source, config.processing_delay());
    let watcher = FileWatcher::new(std::slice::from_ref(&params_path));
    if !watcher.is_active() {
        anyhow::bail!("Could not watch {}", params_path.display());
    }
    let mut changes = watcher.subscribe();

    let mut session = EditSession::new(load_params_file(&params_path)?, config.history_limit);
    queue.submit(session.current().clone());
    println!(
        "Watching {} (Ctrl-C to stop), writing {}",
        params_path.display(),
        output.display()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping");
                break;
            }
            change = changes.recv() => {
                match change {
                    Ok(event) => {
                        tracing::debug!(paths = ?event.paths, "Parameter file changed");
                        match session.reload_from_file(&params_path) {
                            Ok(true) => {
                                queue.submit(session.current().clone());
                            }
                            Ok(false) => tracing::debug!("Parameters unchanged, skipping render"),
                            Err(e) => tracing::warn!(error = %e, "Ignoring invalid parameter file"),
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::debug!(skipped = n, "Missed file events, reloading");
                        if let Ok(true) = session.reload_from_file(&params_path) {
                            queue.submit(session.current().clone());
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
            outcome = outcomes.recv() => {
                let Some(outcome) = outcome else { break };
                if outcome.id != queue.latest_id() {
                    tracing::debug!(id = outcome.id, "Discarding stale render");
                    continue;
                }
                match outcome.result {
                    Ok(image) => {
                        write_png(&output, &image)?;
                        println!(
                            "Rendered {} in {} ms",
                            output.display(),
                            outcome.elapsed.as_millis()
                        );
                    }
                    Err(e) => tracing::error!(error = %e, "Render failed"),
                }
            }
        }
    }

    queue.shutdown().await;
    Ok(())
}

fn run_presets_command() {
    let config = AppConfig::load_from_assets(&AssetLoader::from_env());
    println!("Presets:");
    for (name, preset) in &config.presets {
        let marker = if config.default_preset.as_deref() == Some(name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("  {name:<10} {}{marker}", preset.description);
    }
}

/// Extract the embedded config to the filesystem
fn run_init_command(force: bool) -> anyhow::Result<()> {
    let report = AssetLoader::from_env().init(force)?;

    for f in &report.written {
        println!("  + {f}");
    }
    if !report.skipped.is_empty() {
        println!("Skipped existing files (use --force to overwrite):");
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let loader = AssetLoader::from_env();

    println!("DStretch v{VERSION}");
    println!("Decorrelation stretch for rock-art photography\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE = {}",
        loader
            .config_file()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );

    let source = match loader.config_source() {
        ConfigSource::Embedded => "embedded".to_string(),
        ConfigSource::File(path) => path.display().to_string(),
        ConfigSource::Missing(_) => "embedded (file not found)".to_string(),
    };
    println!("\nConfig:  {source}");

    println!("\nCommands:");
    println!("  dstretch process      Enhance a PNG image");
    println!("  dstretch stats        Show channel statistics and eigenbasis");
    println!("  dstretch watch        Re-render on parameter file changes");
    println!("  dstretch presets      List presets");
    println!("  dstretch colorspaces  List colorspaces");
    println!("  dstretch init         Extract embedded config.yaml");
    println!("\nRun 'dstretch --help' for more details.");
}
