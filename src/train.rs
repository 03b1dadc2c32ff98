//! Training entry point: repeated Q-learning episodes against [`HuntTheWumpus`]

use std::{fs, path::Path, sync::Arc};

use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    algo::tabular::{
        q_table::{QTableAgent, QTableAgentConfig},
        ValueTable,
    },
    decay,
    error::{Error, Result},
    exploration::EpsilonGreedy,
    gym::wumpus::{Action, Cave, HuntTheWumpus, Observation, WumpusConfig},
    util,
};

/// Hyperparameters for a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// **Default**: `5000`
    pub episodes: u32,
    /// Learning rate, **default** `0.1`
    pub alpha: f32,
    /// Discount factor, **default** `0.95`
    pub gamma: f32,
    /// Epsilon in the first episode, **default** `1.0`
    pub epsilon_start: f32,
    /// Epsilon in the last episode, **default** `0.05`
    pub epsilon_end: f32,
    /// Seed for both the environment and the agent; `None` draws from system entropy
    pub seed: Option<u64>,
    /// Hard cap on agent steps per episode
    ///
    /// **Default**: `1000`, far beyond the environment's own limit
    pub step_limit: u32,
    /// Log progress every this many episodes, **default** `500`
    pub report_every: u32,
    /// Trailing window for progress averages, **default** `500`
    pub window: usize,
    pub env: WumpusConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 5000,
            alpha: 0.1,
            gamma: 0.95,
            epsilon_start: 1.0,
            epsilon_end: 0.05,
            seed: None,
            step_limit: 1000,
            report_every: 500,
            window: 500,
            env: WumpusConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Read a config from a JSON file; omitted fields keep their defaults
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Build the agent configuration, checking every hyperparameter
    pub fn agent_config(&self) -> Result<QTableAgentConfig<decay::Linear>> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("epsilon_start", self.epsilon_start),
            ("epsilon_end", self.epsilon_end),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }

        Ok(QTableAgentConfig {
            exploration: EpsilonGreedy::new(decay::Linear::new(
                self.epsilon_start,
                self.epsilon_end,
                self.episodes,
            )?),
            alpha: self.alpha,
            gamma: self.gamma,
            step_limit: Some(self.step_limit),
        })
    }
}

/// What happened in one training episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// 1-based episode number
    pub episode: u32,
    pub reward: f32,
    pub steps: u32,
    pub won: bool,
    /// Exploration threshold used throughout the episode
    pub epsilon: f32,
}

#[derive(Serialize)]
struct CsvRow {
    episode: u32,
    reward: f32,
    steps: u32,
    won: bool,
    epsilon: f32,
    avg_reward: f64,
    win_rate: f64,
}

/// Per-episode results of a training run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingReport {
    episodes: Vec<EpisodeSummary>,
}

impl TrainingReport {
    pub fn push(&mut self, summary: EpisodeSummary) {
        self.episodes.push(summary);
    }

    pub fn episodes(&self) -> &[EpisodeSummary] {
        &self.episodes
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn rewards(&self) -> Vec<f64> {
        self.episodes.iter().map(|e| f64::from(e.reward)).collect()
    }

    /// 1.0 for every won episode, 0.0 for every lost one
    pub fn wins(&self) -> Vec<f64> {
        self.episodes
            .iter()
            .map(|e| if e.won { 1.0 } else { 0.0 })
            .collect()
    }

    /// Fraction of the last `window` episodes that were won
    pub fn win_rate(&self, window: usize) -> Option<f64> {
        util::trailing_mean(&self.wins(), window)
    }

    /// Mean reward of the last `window` episodes
    pub fn average_reward(&self, window: usize) -> Option<f64> {
        util::trailing_mean(&self.rewards(), window)
    }

    /// Write one row per episode, with moving averages over `window` episodes
    pub fn write_csv(&self, path: impl AsRef<Path>, window: usize) -> Result<()> {
        let avg_rewards = util::moving_average(&self.rewards(), window);
        let win_rates = util::moving_average(&self.wins(), window);

        let mut wtr = csv::Writer::from_path(path.as_ref())?;
        for ((e, avg_reward), win_rate) in self.episodes.iter().zip(avg_rewards).zip(win_rates) {
            wtr.serialize(CsvRow {
                episode: e.episode,
                reward: e.reward,
                steps: e.steps,
                won: e.won,
                epsilon: e.epsilon,
                avg_reward,
                win_rate,
            })?;
        }
        wtr.flush()?;

        info!("Saved training report to {}", path.as_ref().display());
        Ok(())
    }
}

/// The learned values and the record of how they were learned
pub struct TrainingOutcome {
    pub table: ValueTable<Observation, Action>,
    pub report: TrainingReport,
}

/// Train a Q-table agent on the given cave
///
/// One seed feeds both the environment's and the agent's random source, so a seeded run
/// is reproducible end to end.
pub fn train(cave: Arc<Cave>, config: &TrainingConfig) -> Result<TrainingOutcome> {
    let mut seeds = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let env_rng = StdRng::seed_from_u64(seeds.gen());
    let agent_rng = StdRng::seed_from_u64(seeds.gen());

    let mut env = HuntTheWumpus::with_rng(cave, config.env.clone(), env_rng)?;
    let mut agent: QTableAgent<HuntTheWumpus> =
        QTableAgent::new(config.agent_config()?, agent_rng);
    let mut report = TrainingReport::default();
    let window = config.window.max(1);

    info!(
        "Training for {} episodes (alpha {}, gamma {}, epsilon {} -> {})",
        config.episodes, config.alpha, config.gamma, config.epsilon_start, config.epsilon_end
    );

    for episode in 1..=config.episodes {
        let epsilon = agent.epsilon();
        let stats = agent.go(&mut env);
        let metrics = env.report.take();

        report.push(EpisodeSummary {
            episode,
            reward: stats.reward,
            steps: stats.steps,
            won: metrics["win"] > 0.0,
            epsilon,
        });

        if config.report_every > 0 && episode % config.report_every == 0 {
            info!(
                "Episode {episode}/{} | avg reward(last {window}): {:.3} | win rate(last {window}): {:.1}%",
                config.episodes,
                report.average_reward(window).unwrap_or_default(),
                report.win_rate(window).unwrap_or_default() * 100.0,
            );
        }
    }

    Ok(TrainingOutcome {
        table: agent.into_table(),
        report,
    })
}
