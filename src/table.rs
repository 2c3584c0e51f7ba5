use std::{
    collections::HashMap,
    fmt,
    num::ParseIntError,
    str::FromStr,
    sync::{Arc, PoisonError, RwLock},
};

use strum::{Display, EnumIter, FromRepr};
use thiserror::Error;

/// Separator between the fields of a serialized [`StateActionKey`]
pub const KEY_DELIMITER: char = ',';

/// The two moves available to the agent at every decision point
///
/// The discriminants are the action codes used in serialized keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, FromRepr)]
#[strum(serialize_all = "lowercase")]
#[repr(i32)]
pub enum Action {
    Jump = 0,
    Stay = 1,
}

impl Action {
    /// The code this action is stored under in table keys
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// A discretized state paired with the action taken in it
///
/// Serialized as `diffY,speedY,tubeX,action`, which is the format shared with the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateActionKey {
    pub diff_y: i32,
    pub speed_y: i32,
    pub tube_x: i32,
    pub action: Action,
}

impl StateActionKey {
    pub fn new(diff_y: i32, speed_y: i32, tube_x: i32, action: Action) -> Self {
        Self {
            diff_y,
            speed_y,
            tube_x,
            action,
        }
    }
}

impl fmt::Display for StateActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = KEY_DELIMITER;
        write!(
            f,
            "{}{d}{}{d}{}{d}{}",
            self.diff_y,
            self.speed_y,
            self.tube_x,
            self.action.code()
        )
    }
}

/// Why a raw key could not be read as a [`StateActionKey`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),
    #[error("field {index} is not an integer: {source}")]
    Field {
        index: usize,
        #[source]
        source: ParseIntError,
    },
    #[error("unknown action code {0}")]
    UnknownAction(i32),
}

/// The four integer fields of a raw key, with the action left as its raw code
///
/// This is what the aggregator works from: a key with an unrecognized action code is still
/// well formed, it just contributes to neither action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyFields {
    pub diff_y: i32,
    pub speed_y: i32,
    pub tube_x: i32,
    pub action_code: i32,
}

impl KeyFields {
    /// Split a raw key into its four fields
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let parts = raw.split(KEY_DELIMITER).collect::<Vec<_>>();
        let [diff_y, speed_y, tube_x, action_code] = parts[..] else {
            return Err(KeyError::FieldCount(parts.len()));
        };

        let field = |index: usize, text: &str| {
            text.trim()
                .parse::<i32>()
                .map_err(|source| KeyError::Field { index, source })
        };

        Ok(Self {
            diff_y: field(0, diff_y)?,
            speed_y: field(1, speed_y)?,
            tube_x: field(2, tube_x)?,
            action_code: field(3, action_code)?,
        })
    }

    /// The decoded action, if the code is one of the known ones
    pub fn action(&self) -> Option<Action> {
        Action::from_repr(self.action_code)
    }
}

/// Lenient key parsing for aggregation: any malformed key is simply `None`
pub fn parse_key(raw: &str) -> Option<KeyFields> {
    KeyFields::parse(raw).ok()
}

impl FromStr for StateActionKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = KeyFields::parse(s)?;
        let action = fields
            .action()
            .ok_or(KeyError::UnknownAction(fields.action_code))?;
        Ok(Self::new(
            fields.diff_y,
            fields.speed_y,
            fields.tube_x,
            action,
        ))
    }
}

/// An immutable view of the value table, taken once per aggregation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSnapshot(Arc<HashMap<String, f64>>);

impl TableSnapshot {
    pub fn new(map: HashMap<String, f64>) -> Self {
        Self(Arc::new(map))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl From<HashMap<String, f64>> for TableSnapshot {
    fn from(map: HashMap<String, f64>) -> Self {
        Self::new(map)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for TableSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Read-only access to an externally owned value table
///
/// Implementors hand out a snapshot that later writes to the table cannot change.
pub trait ValueTable {
    fn snapshot(&self) -> TableSnapshot;
}

impl ValueTable for TableSnapshot {
    fn snapshot(&self) -> TableSnapshot {
        self.clone()
    }
}

/// Copies the keys and values up front
impl ValueTable for HashMap<String, f64> {
    fn snapshot(&self) -> TableSnapshot {
        TableSnapshot::new(self.clone())
    }
}

/// A value table shared between a learner thread and the renderer
///
/// Writes go through [`SharedTable::update`], which clones the map only while a snapshot of the
/// previous version is still alive, so taking a snapshot never copies.
#[derive(Debug, Clone, Default)]
pub struct SharedTable {
    inner: Arc<RwLock<Arc<HashMap<String, f64>>>>,
}

impl SharedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate the table in place
    pub fn update<R>(&self, f: impl FnOnce(&mut HashMap<String, f64>) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(Arc::make_mut(&mut guard))
    }

    pub fn insert(&self, key: impl Into<String>, value: f64) -> Option<f64> {
        let key = key.into();
        self.update(|map| map.insert(key, value))
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<HashMap<String, f64>> for SharedTable {
    fn from(map: HashMap<String, f64>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(map))),
        }
    }
}

impl ValueTable for SharedTable {
    fn snapshot(&self) -> TableSnapshot {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        TableSnapshot(Arc::clone(&guard))
    }
}
