//! Key-value parameter source for event construction.
//!
//! The contract is presence-based: `set_*` assigns the target and returns
//! `true` only when the key is present and usable, so callers can chain
//! fallback keys with short-circuit logic. Numeric values parse on read;
//! an unparseable value counts as absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Assigns typed values out of a configuration store, by key.
pub trait ParamSource {
    /// Assign `target` from `key`. Returns whether the key bound.
    fn set_str(&self, target: &mut String, key: &str) -> bool;

    /// Assign `target` from `key`, parsed as a float. Returns whether the
    /// key bound; on `false` the target is untouched.
    fn set_f64(&self, target: &mut f64, key: &str) -> bool;
}

/// Plain in-memory parameter store.
///
/// Backed by a `BTreeMap` so iteration and serialized form stay
/// deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamMap {
    entries: BTreeMap<String, String>,
}

impl ParamMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ParamSource for ParamMap {
    fn set_str(&self, target: &mut String, key: &str) -> bool {
        match self.entries.get(key) {
            Some(value) => {
                target.clear();
                target.push_str(value);
                true
            }
            None => false,
        }
    }

    fn set_f64(&self, target: &mut f64, key: &str) -> bool {
        match self
            .entries
            .get(key)
            .and_then(|value| value.trim().parse::<f64>().ok())
        {
            Some(value) => {
                *target = value;
                true
            }
            None => false,
        }
    }
}
