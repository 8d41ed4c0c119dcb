use bytes::{Bytes, BytesMut};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::trace;

use crate::codec::encode_payload;
use crate::keys::KeySet;
use crate::value::Value;

/// Why a value was not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Key is neither protocol-recognized nor `X_`-prefixed.
    UnknownKey,
    /// Value is an array or object.
    NonScalar,
}

/// Result of a set or remove on [`Variables`].
///
/// A rejection is an ordinary outcome, not an error: one bad variable should
/// not abort a batch of otherwise valid ones.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Stored,
    Removed,
    Rejected(Rejection),
}

impl SetOutcome {
    /// True for `Stored` and `Removed`.
    pub fn is_accepted(self) -> bool {
        !matches!(self, SetOutcome::Rejected(_))
    }
}

/// Ordered key/value store of notification variables.
///
/// Entries keep the position at which their key was first set; overwriting a
/// key replaces the value in place.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    keys: KeySet,
    entries: Vec<(String, String)>,
}

impl Variables {
    /// Empty store over the protocol key set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store over a custom key set.
    pub fn with_key_set(keys: KeySet) -> Self {
        Self {
            keys,
            entries: Vec::new(),
        }
    }

    /// Set or remove a variable.
    ///
    /// `None` removes `key` and always succeeds, whether or not the key is
    /// valid or present. `Some` requires an allowed key.
    pub fn set_variable(&mut self, key: &str, value: Option<Value>) -> SetOutcome {
        let Some(value) = value else {
            self.entries.retain(|(k, _)| k != key);
            return SetOutcome::Removed;
        };

        if !self.keys.allows(key) {
            trace!(key, "rejected unknown variable");
            return SetOutcome::Rejected(Rejection::UnknownKey);
        }

        let text = value.to_text();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = text,
            None => self.entries.push((key.to_string(), text)),
        }
        SetOutcome::Stored
    }

    /// Store `value` under `key`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> SetOutcome {
        self.set_variable(key, Some(value.into()))
    }

    /// Remove `key`.
    pub fn remove(&mut self, key: &str) -> SetOutcome {
        self.set_variable(key, None)
    }

    /// Set from a JSON value. `null` removes; arrays and objects are rejected.
    pub fn set_json(&mut self, key: &str, value: &serde_json::Value) -> SetOutcome {
        if value.is_null() {
            return self.remove(key);
        }
        if !self.keys.allows(key) {
            trace!(key, "rejected unknown variable");
            return SetOutcome::Rejected(Rejection::UnknownKey);
        }
        match Value::try_from(value) {
            Ok(scalar) => self.set_variable(key, Some(scalar)),
            Err(_) => {
                trace!(key, "rejected non-scalar value");
                SetOutcome::Rejected(Rejection::NonScalar)
            }
        }
    }

    /// Remove every variable.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate entries in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Owned copy of the entries in store order.
    pub fn to_vec(&self) -> Vec<(String, String)> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The key set this store validates against.
    pub fn key_set(&self) -> KeySet {
        self.keys
    }

    /// Serialize the store into a fresh payload.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        encode_payload(self.iter(), &mut buf);
        buf.freeze()
    }
}

impl Serialize for Variables {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
