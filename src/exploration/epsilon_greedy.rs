use rand::Rng;

use crate::decay::Decay;

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// The exploration threshold for an episode
    pub fn epsilon(&self, episode: u32) -> f32 {
        self.epsilon.evaluate(episode as f32)
    }

    /// Invoke epsilon greedy policy for current episode
    ///
    /// A uniform draw below epsilon explores, anything else exploits.
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        if rng.gen::<f32>() < self.epsilon(episode) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::decay;

    use super::*;

    #[test]
    fn zero_epsilon_always_exploits() {
        let policy = EpsilonGreedy::new(decay::Constant::new(0.0));
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..1000).all(|_| policy.choose(0, &mut rng) == Choice::Exploit));
    }

    #[test]
    fn full_epsilon_always_explores() {
        let policy = EpsilonGreedy::new(decay::Constant::new(1.0));
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..1000).all(|_| policy.choose(0, &mut rng) == Choice::Explore));
    }

    #[test]
    fn epsilon_follows_schedule() {
        let policy = EpsilonGreedy::new(decay::Linear::new(1.0, 0.0, 3).unwrap());
        assert_eq!(policy.epsilon(0), 1.0);
        assert_eq!(policy.epsilon(1), 0.5);
        assert_eq!(policy.epsilon(2), 0.0);

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(policy.choose(2, &mut rng), Choice::Exploit);
    }
}
