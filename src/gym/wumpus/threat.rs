use strum::Display;

/// Occupant of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Threat {
    /// Killable, lethal on entry, may wander when an arrow misses
    Wumpus,
    /// Carries the player off to another empty room
    Bat,
    /// Lethal on entry
    Pit,
}

impl Threat {
    /// Threats placed at the start of every episode, in placement order
    pub const LAYOUT: [Threat; 5] = [
        Threat::Bat,
        Threat::Bat,
        Threat::Pit,
        Threat::Pit,
        Threat::Wumpus,
    ];

    /// What the player senses from a neighboring room holding this threat
    pub fn percept(self) -> Percept {
        match self {
            Threat::Wumpus => Percept::Smell,
            Threat::Bat => Percept::Rustle,
            Threat::Pit => Percept::Breeze,
        }
    }
}

/// A sensory message about an adjacent room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Percept {
    Smell,
    Rustle,
    Breeze,
}

impl Percept {
    pub fn message(self) -> &'static str {
        match self {
            Percept::Smell => "You smell something terrible nearby.",
            Percept::Rustle => "You hear a rustling.",
            Percept::Breeze => "You feel a cold wind blowing from a nearby cavern.",
        }
    }
}

/// Deduplicated percepts for the player's room, kept in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Percepts(Vec<Percept>);

impl Percepts {
    /// Collect the percepts caused by a sequence of threats, ignoring repeats
    pub fn from_threats(threats: impl IntoIterator<Item = Threat>) -> Self {
        let mut percepts = Vec::with_capacity(3);
        for percept in threats.into_iter().map(Threat::percept) {
            if !percepts.contains(&percept) {
                percepts.push(percept);
            }
        }
        Self(percepts)
    }

    pub fn contains(&self, percept: Percept) -> bool {
        self.0.contains(&percept)
    }

    pub fn iter(&self) -> impl Iterator<Item = Percept> + '_ {
        self.0.iter().copied()
    }

    pub fn messages(&self) -> Vec<&'static str> {
        self.iter().map(Percept::message).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percepts_are_deduplicated() {
        let percepts = Percepts::from_threats([Threat::Bat, Threat::Pit, Threat::Bat]);
        assert_eq!(percepts.iter().collect::<Vec<_>>(), [Percept::Rustle, Percept::Breeze]);
        assert!(!percepts.contains(Percept::Smell));
        assert_eq!(
            percepts.messages(),
            ["You hear a rustling.", "You feel a cold wind blowing from a nearby cavern."]
        );
    }

    #[test]
    fn layout_counts() {
        let count = |t| Threat::LAYOUT.iter().filter(|&&x| x == t).count();
        assert_eq!(count(Threat::Wumpus), 1);
        assert_eq!(count(Threat::Bat), 2);
        assert_eq!(count(Threat::Pit), 2);
        assert_eq!(Threat::Wumpus.to_string(), "wumpus");
    }
}
