//! Hunt the Wumpus on a fixed cave graph
//!
//! The player starts in an empty room carrying a quiver of arrows. Somewhere in the cave
//! are two bats, two pits and the wumpus. Walking into a pit or the wumpus' room ends the
//! game, walking into a bat room gets the player carried off to another empty room.
//! Shooting the wumpus' room wins; a miss may wake it and send it wandering.
//!
//! The agent only sees an [`Observation`]: its room, its arrows, whether the wumpus lives,
//! and what it smells, hears and feels from the neighboring rooms.

use std::{collections::BTreeMap, sync::Arc};

use log::{debug, trace};
use rand::{
    rngs::StdRng,
    seq::{index, SliceRandom},
    Rng, SeedableRng,
};
use rand_distr::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::{
    env::{DiscreteActionSpace, Environment, Report, Transition},
    error::Result,
};

mod cave;
mod state;
mod threat;

pub use cave::{Cave, Room, MAX_NEIGHBORS, MIN_ROOMS};
pub use state::{Action, Command, Observation};
pub use threat::{Percept, Percepts, Threat};

/// Reward shaping
///
/// These values must stay fixed for a stored value table to remain meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    /// Paid for every successful move
    pub movement: f32,
    /// Paid for every arrow fired
    pub shoot: f32,
    /// Paid for a move or shot that cannot be carried out
    pub invalid: f32,
    /// Paid when the player dies
    pub death: f32,
    /// Paid when the wumpus is killed
    pub win: f32,
    /// Paid when the step limit runs out
    pub timeout: f32,
    /// Every losing final step pays at most this much
    pub loss_ceiling: f32,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            movement: -0.01,
            shoot: -0.05,
            invalid: -0.10,
            death: -5.0,
            win: 5.0,
            timeout: -2.0,
            loss_ceiling: -1.0,
        }
    }
}

/// Configuration for [`HuntTheWumpus`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WumpusConfig {
    /// Steps before the episode is lost to a timeout
    ///
    /// **Default**: `50`
    pub max_steps: u32,
    /// Arrows in the quiver at the start of an episode
    ///
    /// **Default**: `5`
    pub arrows: u8,
    /// Chance that a missed shot sends the wumpus to a neighboring room
    ///
    /// **Default**: `0.75`
    pub wumpus_move_probability: f64,
    pub rewards: Rewards,
}

impl Default for WumpusConfig {
    fn default() -> Self {
        Self {
            max_steps: 50,
            arrows: 5,
            wumpus_move_probability: 0.75,
            rewards: Rewards::default(),
        }
    }
}

/// Why an action could not be carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The index is not one of the six actions
    UnknownAction(usize),
    /// The current room has no tunnel in this slot
    NoTunnel(usize),
    /// The quiver is empty
    NoArrows,
}

/// Something that happened during a step, reported alongside the transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Moved { from: Room, to: Room },
    /// A bat carried the player away; `to == from` when there was no empty room to drop into
    BatSnatch { from: Room, to: Room },
    FellIntoPit(Room),
    WalkedIntoWumpus(Room),
    ArrowHit(Room),
    ArrowMissed(Room),
    /// An arrow flew while no wumpus was left to hit
    ArrowWasted(Room),
    WumpusMoved { from: Room, to: Room },
    WumpusAttack,
    Invalid(InvalidReason),
    OutOfArrows,
    Timeout,
}

/// Hunt the Wumpus as a partially observable, stochastic environment
///
/// All randomness, from hazard placement to bat flights and wumpus wandering, is drawn
/// from the `R` this environment owns. Seeding it makes episodes reproducible.
pub struct HuntTheWumpus<R = StdRng> {
    cave: Arc<Cave>,
    config: WumpusConfig,
    wumpus_moves: Bernoulli,
    rng: R,
    threats: BTreeMap<Room, Threat>,
    player: Room,
    arrows: u8,
    steps: u32,
    percepts: Percepts,
    game_over: bool,
    won: bool,
    pub report: Report,
}

impl HuntTheWumpus<StdRng> {
    /// Create an environment seeded from `seed`, or from system entropy when `None`
    pub fn new(cave: Arc<Cave>, config: WumpusConfig, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(cave, config, rng)
    }
}

impl<R: Rng> HuntTheWumpus<R> {
    /// Create an environment drawing from the given random source
    ///
    /// The world is reset once, so every accessor is meaningful straight away.
    pub fn with_rng(cave: Arc<Cave>, config: WumpusConfig, rng: R) -> Result<Self> {
        let wumpus_moves = Bernoulli::new(config.wumpus_move_probability)?;
        let mut env = Self {
            cave,
            wumpus_moves,
            rng,
            threats: BTreeMap::new(),
            player: 1,
            arrows: config.arrows,
            steps: 0,
            percepts: Percepts::default(),
            game_over: false,
            won: false,
            report: Report::new(vec!["reward", "steps", "win"]),
            config,
        };
        env.reset();
        Ok(env)
    }

    pub fn cave(&self) -> &Cave {
        &self.cave
    }

    pub fn config(&self) -> &WumpusConfig {
        &self.config
    }

    pub fn player_room(&self) -> Room {
        self.player
    }

    pub fn arrows(&self) -> u8 {
        self.arrows
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// What the player currently senses; empty once the episode is over
    pub fn percepts(&self) -> &Percepts {
        &self.percepts
    }

    /// The hazard in a room, hidden from the agent but useful for rendering
    pub fn threat_in(&self, room: Room) -> Option<Threat> {
        self.threats.get(&room).copied()
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// The encoded state for the current world
    pub fn observe(&self) -> Observation {
        Observation {
            room: self.player,
            arrows: self.arrows,
            wumpus_alive: self.wumpus_room().is_some(),
            smell: self.percepts.contains(Percept::Smell),
            rustle: self.percepts.contains(Percept::Rustle),
            breeze: self.percepts.contains(Percept::Breeze),
        }
    }

    /// Take the action with the given raw index
    ///
    /// Indices outside `0..=5` are answered with the invalid-action penalty, like any other
    /// action that cannot be carried out.
    pub fn step_index(&mut self, index: usize) -> Transition<Observation, Vec<Event>> {
        if self.game_over {
            return Transition {
                state: self.observe(),
                reward: 0.0,
                done: true,
                info: Vec::new(),
            };
        }

        self.steps += 1;
        let rewards = self.config.rewards;
        let mut events = Vec::new();
        let mut reward = 0.0;

        match Action::from_index(index).map(Action::command) {
            Some(Command::Move(slot)) => match self.cave.neighbor(self.player, slot) {
                Some(room) => {
                    events.push(Event::Moved {
                        from: self.player,
                        to: room,
                    });
                    self.player = room;
                    reward += rewards.movement;
                    reward += self.enter_room(&mut events);
                }
                None => {
                    events.push(Event::Invalid(InvalidReason::NoTunnel(slot)));
                    reward += rewards.invalid;
                }
            },
            // The quiver is checked before the tunnel
            Some(Command::Shoot(_)) if self.arrows == 0 => {
                events.push(Event::Invalid(InvalidReason::NoArrows));
                reward += rewards.invalid;
            }
            Some(Command::Shoot(slot)) => match self.cave.neighbor(self.player, slot) {
                Some(target) => {
                    self.arrows -= 1;
                    reward += rewards.shoot;
                    reward += self.shoot(target, &mut events);
                }
                None => {
                    events.push(Event::Invalid(InvalidReason::NoTunnel(slot)));
                    reward += rewards.invalid;
                }
            },
            None => {
                events.push(Event::Invalid(InvalidReason::UnknownAction(index)));
                reward += rewards.invalid;
            }
        }

        if !self.game_over && self.arrows == 0 && self.wumpus_room().is_some() {
            self.finish(false);
            events.push(Event::OutOfArrows);
            reward += rewards.death;
        }

        if !self.game_over && self.steps >= self.config.max_steps {
            self.finish(false);
            events.push(Event::Timeout);
            reward += rewards.timeout;
        }

        if self.game_over {
            reward = if self.won {
                reward.max(rewards.win)
            } else {
                reward.min(rewards.loss_ceiling)
            };
            self.percepts.clear();
        } else {
            self.update_percepts();
        }

        self.report.entry("steps").and_modify(|x| *x += 1.0);
        self.report
            .entry("reward")
            .and_modify(|x| *x += f64::from(reward));
        if self.won {
            self.report.entry("win").and_modify(|x| *x = 1.0);
        }

        debug!(
            "step {} action {index}: room {} arrows {} reward {reward:+.2} {events:?}",
            self.steps, self.player, self.arrows
        );

        Transition {
            state: self.observe(),
            reward,
            done: self.game_over,
            info: events,
        }
    }

    fn finish(&mut self, won: bool) {
        self.game_over = true;
        self.won = won;
    }

    fn wumpus_room(&self) -> Option<Room> {
        self.threats
            .iter()
            .find_map(|(&room, &threat)| (threat == Threat::Wumpus).then_some(room))
    }

    /// Rooms holding no threat, in ascending order
    fn vacant_rooms(&self) -> impl Iterator<Item = Room> + '_ {
        self.cave
            .rooms()
            .filter(move |room| !self.threats.contains_key(room))
    }

    /// Resolve whatever waits in the room the player just walked into
    ///
    /// **Returns** the reward on top of the move penalty
    fn enter_room(&mut self, events: &mut Vec<Event>) -> f32 {
        let room = self.player;
        match self.threats.get(&room).copied() {
            Some(Threat::Bat) => {
                let vacant = self
                    .vacant_rooms()
                    .filter(|&r| r != room)
                    .collect::<Vec<_>>();
                if let Some(&to) = vacant.choose(&mut self.rng) {
                    self.player = to;
                }
                events.push(Event::BatSnatch {
                    from: room,
                    to: self.player,
                });
                self.update_percepts();
                0.0
            }
            Some(Threat::Pit) => {
                self.finish(false);
                events.push(Event::FellIntoPit(room));
                self.config.rewards.death
            }
            Some(Threat::Wumpus) => {
                self.finish(false);
                events.push(Event::WalkedIntoWumpus(room));
                self.config.rewards.death
            }
            None => 0.0,
        }
    }

    /// Resolve an arrow fired into `target`
    ///
    /// **Returns** the reward on top of the shoot penalty
    fn shoot(&mut self, target: Room, events: &mut Vec<Event>) -> f32 {
        let Some(wumpus) = self.wumpus_room() else {
            events.push(Event::ArrowWasted(target));
            return 0.0;
        };

        if target == wumpus {
            self.threats.remove(&wumpus);
            self.finish(true);
            events.push(Event::ArrowHit(target));
            return self.config.rewards.win;
        }

        events.push(Event::ArrowMissed(target));
        if !self.wumpus_moves.sample(&mut self.rng) {
            return 0.0;
        }

        let neighbors = self.cave.neighbors(wumpus);
        let free = neighbors
            .iter()
            .copied()
            .filter(|r| !self.threats.contains_key(r))
            .collect::<Vec<_>>();
        // Every tunnel blocked by a bat or pit: the wumpus barges in anyway
        let candidates = if free.is_empty() {
            neighbors.to_vec()
        } else {
            free
        };
        let Some(&to) = candidates.choose(&mut self.rng) else {
            return 0.0;
        };

        self.threats.remove(&wumpus);
        self.threats.insert(to, Threat::Wumpus);
        events.push(Event::WumpusMoved { from: wumpus, to });

        if to == self.player {
            self.finish(false);
            events.push(Event::WumpusAttack);
            return self.config.rewards.death;
        }

        0.0
    }

    fn update_percepts(&mut self) {
        self.percepts = Percepts::from_threats(
            self.cave
                .neighbors(self.player)
                .iter()
                .filter_map(|r| self.threats.get(r).copied()),
        );
    }

    /// Place the player and threats by hand
    #[cfg(test)]
    pub(crate) fn arrange(&mut self, player: Room, threats: &[(Room, Threat)]) {
        self.threats = threats.iter().copied().collect();
        self.player = player;
        self.arrows = self.config.arrows;
        self.steps = 0;
        self.game_over = false;
        self.won = false;
        self.update_percepts();
    }
}

impl<R: Rng> Environment for HuntTheWumpus<R> {
    type State = Observation;
    type Action = Action;
    type Info = Vec<Event>;

    fn is_active(&self) -> bool {
        !self.game_over
    }

    fn step(&mut self, action: Self::Action) -> Transition<Self::State, Self::Info> {
        self.step_index(action.index())
    }

    /// Scatter two bats, two pits and the wumpus over distinct rooms, then drop the player
    /// into one of the rooms left empty
    fn reset(&mut self) -> Self::State {
        let rooms = self.cave.rooms().collect::<Vec<_>>();
        let picks = index::sample(&mut self.rng, rooms.len(), Threat::LAYOUT.len() + 1)
            .into_iter()
            .map(|i| rooms[i])
            .collect::<Vec<_>>();

        self.threats = Threat::LAYOUT
            .iter()
            .zip(&picks)
            .map(|(&threat, &room)| (room, threat))
            .collect();
        self.player = picks[Threat::LAYOUT.len()];
        self.arrows = self.config.arrows;
        self.steps = 0;
        self.game_over = false;
        self.won = false;
        self.update_percepts();

        trace!("new cave layout {:?}, player in {}", self.threats, self.player);
        self.observe()
    }
}

impl<R: Rng> DiscreteActionSpace for HuntTheWumpus<R> {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}
