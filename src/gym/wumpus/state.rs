use std::fmt;

use strum::{FromRepr, VariantArray};

use crate::{
    algo::tabular::TableKey,
    error::{Error, Result},
};

use super::cave::Room;

/// The encoded state, the only part of the world the agent may condition on
///
/// Bat and pit locations and the wumpus' room are deliberately absent, which makes the
/// game partially observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Observation {
    pub room: Room,
    pub arrows: u8,
    pub wumpus_alive: bool,
    pub smell: bool,
    pub rustle: bool,
    pub breeze: bool,
}

impl TableKey for Observation {
    /// Comma-joined fields in the order room, arrows, wumpus alive, smell, rustle, breeze,
    /// with flags written as `0` or `1`
    fn to_key(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.room,
            self.arrows,
            u8::from(self.wumpus_alive),
            u8::from(self.smell),
            u8::from(self.rustle),
            u8::from(self.breeze),
        )
    }

    fn from_key(key: &str) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedKey {
            key: key.to_string(),
            reason,
        };

        let fields = key
            .split(',')
            .map(|f| f.trim().parse::<u8>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| malformed(e.to_string()))?;
        let &[room, arrows, wumpus_alive, smell, rustle, breeze] = fields.as_slice() else {
            return Err(malformed(format!("expected 6 fields, found {}", fields.len())));
        };

        let flag = |v: u8| match v {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(malformed(format!("flag must be 0 or 1, found {v}"))),
        };

        Ok(Self {
            room,
            arrows,
            wumpus_alive: flag(wumpus_alive)?,
            smell: flag(smell)?,
            rustle: flag(rustle)?,
            breeze: flag(breeze)?,
        })
    }
}

/// What an action asks the player to do, and through which tunnel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(usize),
    Shoot(usize),
}

/// The six actions: walk or shoot through tunnel slot 0, 1 or 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, VariantArray, FromRepr)]
#[repr(u8)]
pub enum Action {
    Move0 = 0,
    Move1 = 1,
    Move2 = 2,
    Shoot0 = 3,
    Shoot1 = 4,
    Shoot2 = 5,
}

impl Action {
    pub fn index(self) -> usize {
        self as usize
    }

    /// The action for a raw index, if it is one of `0..=5`
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().and_then(Self::from_repr)
    }

    pub fn command(self) -> Command {
        let index = self.index();
        if index < 3 {
            Command::Move(index)
        } else {
            Command::Shoot(index - 3)
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command() {
            Command::Move(slot) => write!(f, "move through tunnel {slot}"),
            Command::Shoot(slot) => write!(f, "shoot into tunnel {slot}"),
        }
    }
}

impl TableKey for Action {
    fn to_key(&self) -> String {
        self.index().to_string()
    }

    fn from_key(key: &str) -> Result<Self> {
        key.trim()
            .parse::<usize>()
            .ok()
            .and_then(Self::from_index)
            .ok_or_else(|| Error::MalformedKey {
                key: key.to_string(),
                reason: String::from("expected an action index in 0..=5"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_key_format() {
        let obs = Observation {
            room: 3,
            arrows: 5,
            wumpus_alive: true,
            smell: false,
            rustle: true,
            breeze: false,
        };
        assert_eq!(obs.to_key(), "3,5,1,0,1,0");
        assert_eq!(Observation::from_key("3,5,1,0,1,0").unwrap(), obs);
    }

    #[test]
    fn malformed_observation_keys() {
        assert!(Observation::from_key("3,5,1,0,1").is_err());
        assert!(Observation::from_key("3,5,1,0,1,2").is_err());
        assert!(Observation::from_key("a,5,1,0,1,0").is_err());
    }

    #[test]
    fn action_indices() {
        assert_eq!(Action::from_index(0), Some(Action::Move0));
        assert_eq!(Action::from_index(5), Some(Action::Shoot2));
        assert_eq!(Action::from_index(6), None);
        assert_eq!(Action::from_index(300), None);
        assert_eq!(Action::Shoot1.command(), Command::Shoot(1));
        assert_eq!(Action::Move2.command(), Command::Move(2));
        assert_eq!(Action::VARIANTS.len(), 6);
    }

    #[test]
    fn action_keys() {
        assert_eq!(Action::Shoot0.to_key(), "3");
        assert_eq!(Action::from_key("4").unwrap(), Action::Shoot1);
        assert!(Action::from_key("9").is_err());
    }
}
