use std::{
    collections::{btree_map::Entry, BTreeMap},
    ops::Index,
};

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Supplementary data describing what happened during a step
    type Info;

    /// Determine if the state is active or terminal
    fn is_active(&self) -> bool;

    /// Update the environment in response to an action taken by an agent, producing a new state and associated reward
    fn step(&mut self, action: Self::Action) -> Transition<Self::State, Self::Info>;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;
}

/// An environment with a finite set of actions
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions for the current state
    ///
    /// The returned vector should never be empty, instead specify an action that represents doing nothing if necessary.
    fn actions(&self) -> Vec<Self::Action>;
}

/// The outcome of a single [`Environment::step`]
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, I> {
    /// The state observed after the step, also reported when the step was terminal
    pub state: S,
    /// The reward received for the step
    pub reward: f32,
    /// Whether the episode has ended
    pub done: bool,
    /// Auxiliary information, not meant for the agent to condition on
    pub info: I,
}

/// Named scalar metrics accumulated by an environment over one episode
#[derive(Debug, Clone, Default)]
pub struct Report {
    keys: Vec<&'static str>,
    data: BTreeMap<&'static str, f64>,
}

impl Report {
    /// Create a report tracking the given keys, all starting at zero
    pub fn new(keys: Vec<&'static str>) -> Self {
        let data = keys.iter().map(|&k| (k, 0.0)).collect();
        Self { keys, data }
    }

    pub fn entry(&mut self, key: &'static str) -> Entry<'_, &'static str, f64> {
        self.data.entry(key)
    }

    /// Take the accumulated values and reset every key to zero
    pub fn take(&mut self) -> BTreeMap<&'static str, f64> {
        let fresh = self.keys.iter().map(|&k| (k, 0.0)).collect();
        std::mem::replace(&mut self.data, fresh)
    }
}

impl Index<&str> for Report {
    type Output = f64;

    fn index(&self, key: &str) -> &Self::Output {
        &self.data[key]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A corridor of `LEN` cells walked from cell zero
    ///
    /// Action `1` steps right and action `0` stays put. Reaching the last cell pays `1.0`,
    /// every other step pays nothing.
    pub struct MockEnv<const LEN: usize = 4> {
        pub pos: usize,
    }

    impl<const LEN: usize> MockEnv<LEN> {
        pub fn new() -> Self {
            Self { pos: 0 }
        }
    }

    impl<const LEN: usize> Environment for MockEnv<LEN> {
        type State = usize;
        type Action = usize;
        type Info = ();

        fn is_active(&self) -> bool {
            self.pos < LEN - 1
        }

        fn step(&mut self, action: Self::Action) -> Transition<Self::State, Self::Info> {
            if action == 1 && self.is_active() {
                self.pos += 1;
            }
            let done = !self.is_active();
            Transition {
                state: self.pos,
                reward: if done { 1.0 } else { 0.0 },
                done,
                info: (),
            }
        }

        fn reset(&mut self) -> Self::State {
            self.pos = 0;
            self.pos
        }
    }

    impl<const LEN: usize> DiscreteActionSpace for MockEnv<LEN> {
        fn actions(&self) -> Vec<Self::Action> {
            vec![0, 1]
        }
    }

    #[test]
    fn report_accumulates_and_resets() {
        let mut report = Report::new(vec!["reward", "steps"]);
        report.entry("steps").and_modify(|x| *x += 1.0);
        report.entry("steps").and_modify(|x| *x += 1.0);
        report.entry("reward").and_modify(|x| *x -= 0.5);

        assert_eq!(report["steps"], 2.0);

        let taken = report.take();
        assert_eq!(taken["reward"], -0.5, "Taken values are returned");
        assert_eq!(report["steps"], 0.0, "Report is cleared after take");
    }

    #[test]
    fn mock_env_terminates_at_end() {
        let mut env = MockEnv::<3>::new();
        assert_eq!(env.reset(), 0);
        assert!(!env.step(1).done);
        let last = env.step(1);
        assert!(last.done);
        assert_eq!(last.reward, 1.0);
    }
}
