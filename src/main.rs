//! `wumpus`: train a Q-table agent on Hunt the Wumpus, or watch a trained one play

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use wumpus_rl::{
    algo::tabular::ValueTable,
    gym::wumpus::{Action, Cave, Observation},
    replay::Autoplay,
    train::{self, TrainingConfig},
    Result,
};

/// Tabular Q-learning for Hunt the Wumpus
#[derive(Parser, Debug)]
#[command(name = "wumpus")]
#[command(version)]
#[command(about = "Tabular Q-learning for Hunt the Wumpus", long_about = None)]
struct Cli {
    /// Cave graph as JSON
    #[arg(long, global = true, default_value = "data/dodecahedron.json")]
    cave: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Learn a value table and save it
    Train(TrainArgs),
    /// Play greedily from a saved value table
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Training config as JSON; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of episodes
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Learning rate
    #[arg(long)]
    alpha: Option<f32>,

    /// Discount factor
    #[arg(long)]
    gamma: Option<f32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the learned table
    #[arg(short, long, default_value = "q_table.json")]
    out: PathBuf,

    /// Where to write the per-episode CSV report
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Value table to play from; a missing file plays at random
    #[arg(short, long, default_value = "q_table.json")]
    table: PathBuf,

    /// Number of episodes
    #[arg(short, long, default_value_t = 1)]
    episodes: u32,

    #[arg(long)]
    seed: Option<u64>,

    /// Pause between steps in the viewer
    #[cfg(feature = "viz")]
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Watch in a terminal UI instead of the log
    #[cfg(feature = "viz")]
    #[arg(long)]
    tui: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    #[cfg(feature = "viz")]
    if let Command::Play(PlayArgs { tui: true, .. }) = cli.command {
        if tui_logger::init_logger(log::LevelFilter::Trace).is_ok() {
            tui_logger::set_default_level(log_level.parse().unwrap_or(log::LevelFilter::Info));
            return;
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

fn run(cli: Cli) -> Result<()> {
    let cave = Cave::from_path(&cli.cave).map_err(|e| {
        error!("Could not load the cave from {}", cli.cave.display());
        e
    })?;
    info!("Loaded a cave of {} rooms from {}", cave.len(), cli.cave.display());
    let cave = Arc::new(cave);

    match cli.command {
        Command::Train(args) => train_table(cave, args),
        Command::Play(args) => play(cave, args),
    }
}

fn train_table(cave: Arc<Cave>, args: TrainArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => TrainingConfig::from_path(path)?,
        None => TrainingConfig::default(),
    };
    if let Some(episodes) = args.episodes {
        config.episodes = episodes;
    }
    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }
    if let Some(gamma) = args.gamma {
        config.gamma = gamma;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let outcome = train::train(cave, &config)?;
    outcome.table.save(&args.out)?;
    if let Some(path) = &args.report {
        outcome.report.write_csv(path, config.window.max(1))?;
    }

    info!(
        "Finished {} episodes, win rate over the last {}: {:.1}%",
        outcome.report.len(),
        config.window,
        outcome.report.win_rate(config.window.max(1)).unwrap_or_default() * 100.0
    );
    Ok(())
}

fn play(cave: Arc<Cave>, args: PlayArgs) -> Result<()> {
    let table = ValueTable::<Observation, Action>::load_or_default(&args.table)?;
    let mut autoplay = Autoplay::new(
        cave,
        Default::default(),
        table,
        args.episodes,
        args.seed,
    )?;

    #[cfg(feature = "viz")]
    if args.tui {
        let delay = std::time::Duration::from_millis(args.delay_ms);
        return Ok(wumpus_rl::viz::App::new(autoplay, delay).run()?);
    }

    autoplay.run();
    Ok(())
}
