use rand::{rngs::StdRng, seq::SliceRandom, Rng};

use crate::{
    assert_interval,
    decay::{self, Decay},
    env::{DiscreteActionSpace, Environment, Transition},
    exploration::{Choice, EpsilonGreedy},
    memory::Exp,
};

use super::{Hashable, ValueTable};

/// Configuration for the [`QTableAgent`]
pub struct QTableAgentConfig<D: Decay> {
    /// Exploration policy, evaluated once per episode
    ///
    /// **Default**: epsilon falls linearly from `1.0` to `0.05` over 5000 episodes
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate
    ///
    /// **Default**: `0.1`
    pub alpha: f32,
    /// Discount factor
    ///
    /// **Default**: `0.95`
    pub gamma: f32,
    /// Hard cap on steps per episode, on top of whatever the environment enforces
    ///
    /// **Default**: `None`
    pub step_limit: Option<u32>,
}

impl Default for QTableAgentConfig<decay::Linear> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(
                decay::Linear::new(1.0, 0.05, 5000).expect("horizon is nonzero"),
            ),
            alpha: 0.1,
            gamma: 0.95,
            step_limit: None,
        }
    }
}

/// Totals for one episode played by a [`QTableAgent`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpisodeStats {
    pub reward: f32,
    pub steps: u32,
}

/// A simple Q-learning agent that utilizes a Q-table to learn its environment
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
///     - The environment's state and action spaces must both be discrete because a Q value will be recorded for each state action pair
///     - For the same reason, the state and action types must be `Copy`, `Eq`, and `Hash` to be used as keys in a [`ValueTable`]
/// - `D` - The decay strategy for epsilon
/// - `R` - The random source for exploration and tie-breaking
pub struct QTableAgent<E, D = decay::Linear, R = StdRng>
where
    E: Environment + DiscreteActionSpace,
    E::State: Hashable,
    E::Action: Hashable,
    D: Decay,
    R: Rng,
{
    table: ValueTable<E::State, E::Action>,
    exploration: EpsilonGreedy<D>,
    alpha: f32,   // learning rate
    gamma: f32,   // discount factor
    step_limit: Option<u32>,
    episode: u32, // current episode
    rng: R,
}

impl<E, D, R> QTableAgent<E, D, R>
where
    E: Environment + DiscreteActionSpace,
    E::State: Hashable,
    E::Action: Hashable,
    D: Decay,
    R: Rng,
{
    /// Initialize a new `QTableAgent` with an empty table
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(config: QTableAgentConfig<D>, rng: R) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        Self {
            table: ValueTable::new(),
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            step_limit: config.step_limit,
            episode: 0,
            rng,
        }
    }

    /// Start from previously learned values
    pub fn with_table(mut self, table: ValueTable<E::State, E::Action>) -> Self {
        self.table = table;
        self
    }

    pub fn table(&self) -> &ValueTable<E::State, E::Action> {
        &self.table
    }

    pub fn into_table(self) -> ValueTable<E::State, E::Action> {
        self.table
    }

    /// Number of episodes played so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Exploration threshold for the current episode
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.episode)
    }

    /// Choose an action based on the current state and exploration policy
    pub fn act(&mut self, state: E::State, actions: &[E::Action]) -> E::Action {
        match self.exploration.choose(self.episode, &mut self.rng) {
            Choice::Explore => *actions
                .choose(&mut self.rng)
                .expect("There is always at least one action available"),
            Choice::Exploit => self.greedy(state, actions),
        }
    }

    /// Choose a highest-valued action, breaking ties uniformly at random
    pub fn greedy(&mut self, state: E::State, actions: &[E::Action]) -> E::Action {
        *self
            .table
            .best_actions(state, actions)
            .choose(&mut self.rng)
            .expect("There is always at least one action available")
    }

    /// One-step Q-learning update for the experienced transition
    ///
    /// A terminal transition (`next_state` of `None`) has no future value.
    pub fn learn(&mut self, experience: Exp<E>, next_actions: &[E::Action]) {
        let Exp {
            state,
            action,
            next_state,
            reward,
        } = experience;

        let q_value = self.table.get(state, action);
        let future = next_state.map_or(0.0, |s| {
            self.gamma * self.table.max_value(s, next_actions)
        });
        let update = q_value + self.alpha * (reward + future - q_value);

        self.table.set(state, action, update);
    }

    /// Play and learn from one full episode
    pub fn go(&mut self, env: &mut E) -> EpisodeStats {
        let mut stats = EpisodeStats::default();
        let mut next_state = Some(env.reset());
        let mut actions = env.actions();

        while let Some(state) = next_state {
            if self.step_limit.is_some_and(|limit| stats.steps >= limit) {
                break;
            }

            let action = self.act(state, &actions);
            let Transition {
                state: next,
                reward,
                done,
                ..
            } = env.step(action);
            next_state = (!done).then_some(next);
            actions = env.actions();

            self.learn(
                Exp {
                    state,
                    action,
                    next_state,
                    reward,
                },
                &actions,
            );

            stats.reward += reward;
            stats.steps += 1;
        }

        self.episode += 1;
        stats
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use crate::env::tests::MockEnv;

    use super::*;

    fn agent(alpha: f32, gamma: f32, epsilon: f32) -> QTableAgent<MockEnv<4>, decay::Constant> {
        QTableAgent::new(
            QTableAgentConfig {
                exploration: EpsilonGreedy::new(decay::Constant::new(epsilon)),
                alpha,
                gamma,
                step_limit: None,
            },
            StdRng::seed_from_u64(11),
        )
    }

    #[test]
    fn learn_applies_bellman_update() {
        let mut agent = agent(0.5, 0.9, 0.0);
        agent.table.set(1, 0, 2.0);
        agent.table.set(1, 1, 4.0);
        agent.table.set(0, 1, 1.0);

        agent.learn(
            Exp {
                state: 0,
                action: 1,
                next_state: Some(1),
                reward: 0.5,
            },
            &[0, 1],
        );
        // 1.0 + 0.5 * (0.5 + 0.9 * 4.0 - 1.0)
        assert!((agent.table().get(0, 1) - 2.55).abs() < 1e-6);
    }

    #[test]
    fn terminal_update_ignores_future() {
        let mut agent = agent(0.5, 0.9, 0.0);
        agent.table.set(3, 0, 100.0);

        agent.learn(
            Exp {
                state: 2,
                action: 1,
                next_state: None,
                reward: 1.0,
            },
            &[0, 1],
        );
        assert_eq!(agent.table().get(2, 1), 0.5);
    }

    #[test]
    fn greedy_breaks_ties_randomly() {
        let mut agent = agent(0.5, 0.9, 0.0);
        let picks = (0..200)
            .map(|_| agent.greedy(0, &[0, 1]))
            .collect::<Vec<_>>();
        assert!(picks.contains(&0) && picks.contains(&1), "Both tied actions get picked");

        agent.table.set(0, 1, 0.1);
        assert!((0..50).all(|_| agent.greedy(0, &[0, 1]) == 1));
    }

    #[test]
    fn learns_to_walk_the_corridor() {
        let mut env = MockEnv::<4>::new();
        let mut agent: QTableAgent<MockEnv<4>> = QTableAgent::new(
            QTableAgentConfig {
                exploration: EpsilonGreedy::new(decay::Linear::new(1.0, 0.05, 200).unwrap()),
                alpha: 0.5,
                gamma: 0.9,
                step_limit: Some(100),
            },
            StdRng::seed_from_u64(5),
        );

        for _ in 0..200 {
            agent.go(&mut env);
        }

        assert_eq!(agent.episode(), 200);
        assert!((agent.epsilon() - 0.05).abs() < 1e-6);
        assert!(agent.table().get(0, 1) > agent.table().get(0, 0));
        assert!(agent.table().get(2, 1) > 0.9);
        assert_eq!(agent.greedy(0, &[0, 1]), 1);
    }

    #[test]
    fn step_limit_caps_an_episode() {
        let mut env = MockEnv::<4>::new();
        let mut agent = agent(0.5, 0.9, 0.0);
        agent.step_limit = Some(10);
        agent.table.set(0, 0, 1.0);

        let stats = agent.go(&mut env);
        assert_eq!(stats.steps, 10, "Agent stays put until the cap");
        assert_eq!(stats.reward, 0.0);
        assert!(env.is_active());
    }

    #[test]
    #[should_panic]
    fn rejects_learning_rate_above_one() {
        agent(1.5, 0.9, 0.0);
    }
}
