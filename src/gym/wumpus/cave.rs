use std::{collections::BTreeMap, fs, path::Path};

use crate::error::{Error, Result};

/// Room identifier, numbered from 1
pub type Room = u8;

/// Most tunnels leading out of any room
pub const MAX_NEIGHBORS: usize = 3;

/// Five threats and the player each need a room of their own
pub const MIN_ROOMS: usize = 6;

/// Tunnels of the classic dodecahedral cave, indexed by room - 1
const DODECAHEDRON: [[Room; 3]; 20] = [
    [2, 5, 8],
    [1, 3, 10],
    [2, 4, 12],
    [3, 5, 14],
    [1, 4, 6],
    [5, 7, 15],
    [6, 8, 17],
    [1, 7, 9],
    [8, 10, 18],
    [2, 9, 11],
    [10, 12, 19],
    [3, 11, 13],
    [12, 14, 20],
    [4, 13, 15],
    [6, 14, 16],
    [15, 17, 20],
    [7, 16, 18],
    [9, 17, 19],
    [11, 18, 20],
    [13, 16, 19],
];

/// The static, undirected room graph the game is played on
///
/// Neighbor order is significant: action slot `i` refers to `neighbors(room)[i]`.
/// A cave is loaded once and shared read-only by every environment built on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cave {
    tunnels: Vec<Vec<Room>>,
}

impl Cave {
    /// Build a cave from the neighbor lists of rooms `1..=tunnels.len()`
    pub fn new(tunnels: Vec<Vec<Room>>) -> Result<Self> {
        let cave = Self { tunnels };
        cave.validate()?;
        Ok(cave)
    }

    /// The twenty-room dodecahedron of the classic game
    pub fn dodecahedron() -> Self {
        Self {
            tunnels: DODECAHEDRON.iter().map(|n| n.to_vec()).collect(),
        }
    }

    /// Parse a cave from a JSON object mapping room ids to neighbor lists
    ///
    /// ```json
    /// { "1": [2, 5, 8], "2": [1, 3, 10], ... }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<Room>> = serde_json::from_str(json)?;
        let mut rooms = BTreeMap::new();
        for (key, neighbors) in raw {
            let room = key
                .trim()
                .parse::<Room>()
                .map_err(|e| Error::InvalidCave(format!("room id `{key}`: {e}")))?;
            rooms.insert(room, neighbors);
        }

        for (expected, &room) in (1..).zip(rooms.keys()) {
            if room != expected {
                return Err(Error::InvalidCave(format!(
                    "rooms must be numbered 1..=N without gaps, found {room} where {expected} was expected"
                )));
            }
        }

        Self::new(rooms.into_values().collect())
    }

    /// Read a cave from a JSON file
    ///
    /// A missing file is an error: no game can be set up without its cave.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Number of rooms
    pub fn len(&self) -> usize {
        self.tunnels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tunnels.is_empty()
    }

    /// All room ids in ascending order
    pub fn rooms(&self) -> impl Iterator<Item = Room> {
        1..=self.tunnels.len() as Room
    }

    pub fn contains(&self, room: Room) -> bool {
        room >= 1 && usize::from(room) <= self.tunnels.len()
    }

    /// Ordered neighbors of `room`
    ///
    /// **Panics** if `room` is not part of the cave
    pub fn neighbors(&self, room: Room) -> &[Room] {
        &self.tunnels[usize::from(room) - 1]
    }

    /// The neighbor in tunnel `slot`, if the room has that many tunnels
    pub fn neighbor(&self, room: Room, slot: usize) -> Option<Room> {
        self.neighbors(room).get(slot).copied()
    }

    fn validate(&self) -> Result<()> {
        if self.len() < MIN_ROOMS {
            return Err(Error::InvalidCave(format!(
                "a cave needs at least {MIN_ROOMS} rooms, found {}",
                self.len()
            )));
        }
        if self.len() > usize::from(Room::MAX) {
            return Err(Error::InvalidCave(format!(
                "a cave holds at most {} rooms, found {}",
                Room::MAX,
                self.len()
            )));
        }

        for room in self.rooms() {
            let neighbors = self.neighbors(room);
            if neighbors.len() > MAX_NEIGHBORS {
                return Err(Error::InvalidCave(format!(
                    "room {room} has {} tunnels, at most {MAX_NEIGHBORS} are allowed",
                    neighbors.len()
                )));
            }
            for (i, &n) in neighbors.iter().enumerate() {
                if !self.contains(n) {
                    return Err(Error::InvalidCave(format!(
                        "room {room} leads to unknown room {n}"
                    )));
                }
                if n == room {
                    return Err(Error::InvalidCave(format!("room {room} leads to itself")));
                }
                if neighbors[..i].contains(&n) {
                    return Err(Error::InvalidCave(format!(
                        "room {room} lists room {n} twice"
                    )));
                }
                if !self.neighbors(n).contains(&room) {
                    return Err(Error::InvalidCave(format!(
                        "tunnel {room} -> {n} has no way back"
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(len: Room) -> Vec<Vec<Room>> {
        (1..=len)
            .map(|r| {
                let prev = if r == 1 { len } else { r - 1 };
                let next = if r == len { 1 } else { r + 1 };
                vec![prev, next]
            })
            .collect()
    }

    #[test]
    fn dodecahedron_is_valid() {
        let cave = Cave::dodecahedron();
        assert!(cave.validate().is_ok());
        assert_eq!(cave.len(), 20);
        assert!(cave.rooms().all(|r| cave.neighbors(r).len() == 3));
        let ends = cave.rooms().map(|r| cave.neighbors(r).len()).sum::<usize>();
        assert_eq!(ends / 2, 30, "A dodecahedron has 30 edges");
    }

    #[test]
    fn bundled_map_matches_dodecahedron() {
        let cave = Cave::from_json(include_str!("../../../data/dodecahedron.json")).unwrap();
        assert_eq!(cave, Cave::dodecahedron());
    }

    #[test]
    fn neighbor_slots() {
        let cave = Cave::dodecahedron();
        assert_eq!(cave.neighbor(1, 0), Some(2));
        assert_eq!(cave.neighbor(1, 2), Some(8));
        assert_eq!(cave.neighbor(1, 3), None);

        let ring = Cave::new(ring(8)).unwrap();
        assert_eq!(ring.neighbor(1, 2), None, "Ring rooms have two tunnels");
    }

    #[test]
    fn rejects_one_way_tunnels() {
        let mut tunnels = ring(6);
        tunnels[0].push(4);
        let err = Cave::new(tunnels).unwrap_err();
        assert!(err.to_string().contains("no way back"), "{err}");
    }

    #[test]
    fn rejects_crowded_rooms() {
        let tunnels = vec![
            vec![2, 3, 4, 5],
            vec![1, 3],
            vec![1, 2],
            vec![1, 5, 6],
            vec![1, 4, 6],
            vec![4, 5],
        ];
        assert!(matches!(Cave::new(tunnels), Err(Error::InvalidCave(_))));
    }

    #[test]
    fn rejects_small_caves_and_unknown_rooms() {
        assert!(Cave::new(ring(5)).is_err());

        let mut tunnels = ring(6);
        tunnels[2].push(9);
        assert!(Cave::new(tunnels).is_err());
    }

    #[test]
    fn rejects_gaps_in_room_numbers() {
        let json = r#"{"1": [2], "2": [1], "4": []}"#;
        let err = Cave::from_json(json).unwrap_err();
        assert!(err.to_string().contains("without gaps"), "{err}");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Cave::from_path("does/not/exist.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
