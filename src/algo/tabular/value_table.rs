use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::ErrorKind,
    path::Path,
};

use log::{info, warn};

use crate::error::Result;

use super::Hashable;

/// A state or action that can be written as a string key in a stored [`ValueTable`]
pub trait TableKey: Sized {
    fn to_key(&self) -> String;
    fn from_key(key: &str) -> Result<Self>;
}

/// On-disk layout: state key -> action key -> value
type Store = BTreeMap<String, BTreeMap<String, f32>>;

/// Action-value estimates keyed by (state, action)
///
/// Pairs that were never written read as `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable<S: Hashable, A: Hashable> {
    values: HashMap<(S, A), f32>,
}

impl<S: Hashable, A: Hashable> Default for ValueTable<S, A> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<S: Hashable, A: Hashable> ValueTable<S, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The estimate for a pair, `0.0` if it has never been set
    pub fn get(&self, state: S, action: A) -> f32 {
        self.values.get(&(state, action)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: S, action: A, value: f32) {
        self.values.insert((state, action), value);
    }

    /// Whether the pair has an explicit entry
    pub fn contains(&self, state: S, action: A) -> bool {
        self.values.contains_key(&(state, action))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, A, f32)> + '_ {
        self.values.iter().map(|(&(s, a), &v)| (s, a, v))
    }

    /// Highest estimate among `actions` in `state`, or `0.0` when there are no actions
    pub fn max_value(&self, state: S, actions: &[A]) -> f32 {
        actions
            .iter()
            .map(|&a| self.get(state, a))
            .reduce(f32::max)
            .unwrap_or(0.0)
    }

    /// Every action in `actions` whose estimate in `state` equals the maximum
    pub fn best_actions(&self, state: S, actions: &[A]) -> Vec<A> {
        let max = self.max_value(state, actions);
        actions
            .iter()
            .copied()
            .filter(|&a| self.get(state, a) == max)
            .collect()
    }
}

impl<S, A> ValueTable<S, A>
where
    S: Hashable + TableKey,
    A: Hashable + TableKey,
{
    /// Serialize as a JSON object of objects: `{"<state>": {"<action>": value}}`
    pub fn to_json(&self) -> Result<String> {
        let mut store = Store::new();
        for (&(state, action), &value) in &self.values {
            store
                .entry(state.to_key())
                .or_default()
                .insert(action.to_key(), value);
        }
        Ok(serde_json::to_string_pretty(&store)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let store: Store = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (state_key, row) in store {
            let state = S::from_key(&state_key)?;
            for (action_key, value) in row {
                table.set(state, A::from_key(&action_key)?, value);
            }
        }
        Ok(table)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        info!("Saved value table with {} entries to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a table, falling back to an empty one if the file does not exist
    ///
    /// An empty table makes a greedy policy choose uniformly at random.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "{} not found, every action value defaults to 0.0",
                    path.display()
                );
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}
