//! Greedy autoplay of a learned value table

use std::sync::Arc;

use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    algo::tabular::{
        q_table::{QTableAgent, QTableAgentConfig},
        ValueTable,
    },
    decay,
    env::{DiscreteActionSpace, Environment, Transition},
    error::{Error, Result},
    exploration::EpsilonGreedy,
    gym::wumpus::{Action, Cave, Event, HuntTheWumpus, Observation, WumpusConfig},
};

/// One step taken during autoplay
pub struct Played {
    pub action: Action,
    pub transition: Transition<Observation, Vec<Event>>,
}

/// Plays a fixed number of episodes, always choosing a highest-valued action
///
/// Ties, including every action of a state the table has never seen, are broken at random.
pub struct Autoplay {
    env: HuntTheWumpus,
    agent: QTableAgent<HuntTheWumpus, decay::Constant>,
    state: Observation,
    episode: u32,
    episodes: u32,
    wins: u32,
}

impl Autoplay {
    pub fn new(
        cave: Arc<Cave>,
        config: WumpusConfig,
        table: ValueTable<Observation, Action>,
        episodes: u32,
        seed: Option<u64>,
    ) -> Result<Self> {
        if episodes == 0 {
            return Err(Error::InvalidParameter(
                "autoplay needs at least one episode".into(),
            ));
        }
        let mut seeds = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut env =
            HuntTheWumpus::with_rng(cave, config, StdRng::seed_from_u64(seeds.gen()))?;
        let agent = QTableAgent::new(
            QTableAgentConfig {
                exploration: EpsilonGreedy::new(decay::Constant::new(0.0)),
                alpha: 0.0,
                gamma: 0.0,
                step_limit: None,
            },
            StdRng::seed_from_u64(seeds.gen()),
        )
        .with_table(table);
        let state = env.reset();

        Ok(Self {
            env,
            agent,
            state,
            episode: 1,
            episodes,
            wins: 0,
        })
    }

    pub fn env(&self) -> &HuntTheWumpus {
        &self.env
    }

    /// 1-based number of the episode being played
    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn episodes(&self) -> u32 {
        self.episodes
    }

    /// Episodes won so far
    pub fn wins(&self) -> u32 {
        self.wins
    }

    /// Whether the last episode has ended
    pub fn is_finished(&self) -> bool {
        self.episode >= self.episodes && !self.env.is_active()
    }

    /// Take one greedy step, or `None` if the current episode is already over
    pub fn step(&mut self) -> Option<Played> {
        if !self.env.is_active() {
            return None;
        }

        let actions = self.env.actions();
        let action = self.agent.greedy(self.state, &actions);
        let transition = self.env.step(action);
        self.state = transition.state;
        if transition.done && self.env.is_won() {
            self.wins += 1;
        }

        Some(Played { action, transition })
    }

    /// Reset for the next episode; `false` once every episode has been played
    pub fn next_episode(&mut self) -> bool {
        if self.episode >= self.episodes {
            return false;
        }
        self.episode += 1;
        self.state = self.env.reset();
        true
    }

    /// Play every remaining episode, logging each step
    ///
    /// **Returns** the number of episodes won
    pub fn run(&mut self) -> u32 {
        loop {
            info!(
                "Episode {}/{} starts in room {}",
                self.episode,
                self.episodes,
                self.env.player_room()
            );
            self.log_surroundings();

            while let Some(played) = self.step() {
                info!(
                    "{} -> room {} | arrows {} | steps {} | reward {:+.2}",
                    played.action,
                    self.env.player_room(),
                    self.env.arrows(),
                    self.env.steps(),
                    played.transition.reward,
                );
                self.log_surroundings();
            }

            let outcome = if self.env.is_won() { "WIN" } else { "LOSE" };
            info!("Episode {}/{} - {outcome}!", self.episode, self.episodes);

            if !self.next_episode() {
                break;
            }
        }

        info!("Won {} of {} episodes", self.wins, self.episodes);
        self.wins
    }

    fn log_surroundings(&self) {
        for message in self.env.percepts().messages() {
            info!("  {message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn autoplay(table: ValueTable<Observation, Action>, episodes: u32) -> Autoplay {
        Autoplay::new(
            Arc::new(Cave::dodecahedron()),
            WumpusConfig::default(),
            table,
            episodes,
            Some(21),
        )
        .unwrap()
    }

    #[test]
    fn plays_every_episode_to_the_end() {
        let mut autoplay = autoplay(ValueTable::new(), 3);
        let wins = autoplay.run();

        assert!(wins <= 3);
        assert_eq!(autoplay.episode(), 3);
        assert!(autoplay.is_finished());
        assert!(autoplay.step().is_none());
        assert!(!autoplay.next_episode());
    }

    #[test]
    fn needs_at_least_one_episode() {
        let result = Autoplay::new(
            Arc::new(Cave::dodecahedron()),
            WumpusConfig::default(),
            ValueTable::new(),
            0,
            None,
        );
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn follows_the_table() {
        let start = autoplay(ValueTable::new(), 1).state;

        let mut table = ValueTable::new();
        table.set(start, Action::Move2, 1.0);
        let mut autoplay = autoplay(table, 1);
        assert_eq!(autoplay.state, start, "Same seed, same start");

        let played = autoplay.step().unwrap();
        assert_eq!(played.action, Action::Move2);
        assert_eq!(autoplay.env().steps(), 1);
    }
}
