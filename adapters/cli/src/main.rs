#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays maze rooms against the guide overlay.

mod ascii;
mod layout;
mod layout_transfer;
mod simulation;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use maze_guide_core::GuideConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    ascii::AsciiCanvas,
    layout::RoomLayout,
    simulation::{plan_route, Outcome, Simulation},
};

/// Guides a telekinetic maze guardian through a room.
#[derive(Debug, Parser)]
#[command(name = "maze-guide", version)]
struct Cli {
    /// Increases log verbosity; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Plays the room tick by tick, printing every frame.
    Simulate(SimulateArgs),
    /// Prints the moves leading the guardian to the goal.
    Route(LayoutSource),
    /// Encodes a layout file into a single-line transfer string.
    Encode {
        /// ASCII layout file.
        layout: PathBuf,
    },
    /// Decodes a transfer string back into an ASCII layout.
    Decode {
        /// String produced by `encode`.
        transfer: String,
    },
}

#[derive(Debug, Args)]
struct LayoutSource {
    /// ASCII layout file.
    #[arg(long, required_unless_present = "transfer", conflicts_with = "transfer")]
    layout: Option<PathBuf>,
    /// Layout transfer string.
    #[arg(long)]
    transfer: Option<String>,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    #[command(flatten)]
    source: LayoutSource,
    /// TOML file holding the overlay configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of moves to display, overriding the configuration file.
    #[arg(long)]
    steps: Option<u32>,
    /// Number of ticks simulated before giving up.
    #[arg(long, default_value_t = 200)]
    ticks: u32,
    /// Prints only the final frame.
    #[arg(long)]
    quiet: bool,
}

/// Entry point for the maze guide command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Simulate(args) => simulate(args),
        Commands::Route(source) => {
            let layout = source.load()?;
            let route = plan_route(&layout)?;
            if route.is_empty() {
                bail!("the goal cannot be reached from the guardian's tile");
            }
            let moves: Vec<String> = route
                .upcoming()
                .map(|direction| format!("{direction:?}"))
                .collect();
            println!("{}", moves.join(" "));
            Ok(())
        }
        Commands::Encode { layout } => {
            let layout = read_layout(&layout)?;
            println!("{}", layout.encode()?);
            Ok(())
        }
        Commands::Decode { transfer } => {
            let layout = RoomLayout::decode(&transfer)?;
            println!("{}", layout.to_ascii());
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

impl LayoutSource {
    fn load(&self) -> Result<RoomLayout> {
        match (&self.layout, &self.transfer) {
            (Some(path), _) => read_layout(path),
            (None, Some(transfer)) => Ok(RoomLayout::decode(transfer)?),
            (None, None) => bail!("either --layout or --transfer is required"),
        }
    }
}

fn read_layout(path: &Path) -> Result<RoomLayout> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout {}", path.display()))?;
    RoomLayout::parse(&source).with_context(|| format!("invalid layout {}", path.display()))
}

fn load_config(args: &SimulateArgs) -> Result<GuideConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&source)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => GuideConfig::default(),
    };

    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    config.validate()?;
    Ok(config)
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let config = load_config(&args)?;
    let layout = args.source.load()?;
    info!(
        columns = layout.columns,
        rows = layout.rows,
        walls = layout.walls.len(),
        steps = config.steps,
        "starting simulation"
    );

    let mut simulation = Simulation::new(layout, config)?;
    let mut last_frame = String::new();
    let outcome = simulation.run(args.ticks, |simulation, scene| {
        let mut canvas = AsciiCanvas::new(&simulation.snapshot());
        if let Some(scene) = scene {
            let projector = canvas.projector();
            let _ = scene.draw(&projector, &mut canvas)?;
        }
        last_frame = canvas.finish();
        if !args.quiet {
            println!("tick {}\n{last_frame}\n", simulation.ticks());
        }
        Ok(())
    })?;

    match outcome {
        Outcome::GoalReached { ticks } => {
            if args.quiet {
                println!("{last_frame}");
            }
            println!("guardian reached the goal after {ticks} ticks");
            Ok(())
        }
        Outcome::OutOfTicks { ticks } => {
            warn!(ticks, "tick budget exhausted");
            bail!("guardian did not reach the goal within {ticks} ticks")
        }
    }
}
