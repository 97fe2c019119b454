use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dashgrid::common::config::{Config, config_file};
use dashgrid::common::log;
use dashgrid::layout_engine::LayoutEngine;
use dashgrid::replay::{self, Record};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Grid layout engine for personalizable dashboards")]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Check the configuration file and exit.
    #[arg(long)]
    validate: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration to the config path.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the seed dashboard with pixel sizes.
    Seed {
        #[arg(long)]
        json: bool,
    },
    /// Print span extents, snap points and resize bounds for a container width.
    Geometry {
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Apply a file of inputs to a fresh engine and print the resulting layout.
    Run {
        inputs: PathBuf,
        /// Record the session so it can be replayed later. Overwrites the file
        /// if it exists.
        #[arg(long)]
        record: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Rebuild a layout from a recording and print it.
    Replay {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct GeometryReport {
    container_width: f64,
    column_width: f64,
    snap_points: dashgrid::layout_engine::SnapPoints,
    resize_bounds: dashgrid::layout_engine::ResizeBounds,
}

fn main() {
    let opt = Cli::parse();
    log::init_logging();

    if let Err(err) = run(opt) {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

fn run(opt: Cli) -> anyhow::Result<()> {
    let config_path = opt.config.clone().or_else(config_file);

    if opt.validate {
        let Some(path) = config_path.as_deref() else {
            bail!("No config path: pass --config or set a home directory");
        };
        let issues = Config::read(path)?.validate();
        if issues.is_empty() {
            println!("Config validation passed");
            return Ok(());
        }
        for issue in issues {
            eprintln!("{}", issue);
        }
        process::exit(1);
    }

    if let Some(Commands::Init { force }) = &opt.command {
        let Some(path) = config_path.as_deref() else {
            bail!("No config path: pass --config or set a home directory");
        };
        if path.exists() && !force {
            bail!("{} already exists; pass --force to overwrite", path.display());
        }
        Config::default().save(path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = load_config(config_path.as_deref())?;

    match opt.command {
        None => print(&LayoutEngine::new(&config).descriptors(), false),
        Some(Commands::Seed { json }) => print(&LayoutEngine::new(&config).descriptors(), json),
        Some(Commands::Geometry { width, json }) => {
            let engine = LayoutEngine::new(&config);
            if let Some(width) = width {
                engine.container_width().set(width);
            }
            let geometry = engine.geometry();
            let report = GeometryReport {
                container_width: geometry.container_width(),
                column_width: geometry.column_width(),
                snap_points: geometry.snap_points(),
                resize_bounds: geometry.resize_bounds(),
            };
            print(&report, json)
        }
        Some(Commands::Run { inputs, record, json }) => {
            let inputs = replay::read_inputs(&inputs)?;
            let mut recorder = Record::new(record.as_deref())?;
            recorder.start(&config)?;
            let mut engine = LayoutEngine::new(&config);
            for input in inputs {
                recorder.on_input(&input)?;
                let _ = input.apply(&mut engine);
            }
            if let Some(path) = &record {
                info!(path = %path.display(), "Recorded session");
            }
            print(&engine.snapshot(), json)
        }
        Some(Commands::Replay { file, json }) => {
            let engine = replay::replay(&file)
                .with_context(|| format!("Replaying {}", file.display()))?;
            print(&engine.snapshot(), json)
        }
        Some(Commands::Init { .. }) => Ok(()),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) if path.exists() => {
            let config = Config::read(path)?;
            let issues = config.validate();
            if !issues.is_empty() {
                bail!("Invalid config {}:\n{}", path.display(), issues.join("\n"));
            }
            Ok(config)
        }
        _ => Ok(Config::default()),
    }
}

fn print(value: &impl Serialize, json: bool) -> anyhow::Result<()> {
    let out = if json {
        serde_json::to_string_pretty(value)?
    } else {
        ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())?
    };
    println!("{out}");
    Ok(())
}
