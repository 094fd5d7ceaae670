//! Tag environment
//!
//! The mutable key/value state a batchfile builds up. Each key owns a single
//! [`Entry`] that carries its value together with its modifier (incrementing
//! counter or derived pattern) and an optional one-shot override, so removing
//! a key always removes everything attached to it.
//!
//! Keys starting with [`INTERNAL_PREFIX`] live in the environment but are never
//! written to files. The interpreter computes a few of them for every file
//! (see [`SPECIAL_KEYS`]) and clears them again once the file is done.

use std::path::Path;

use indexmap::IndexMap;
use thiserror::Error;

use super::format::IncrementFormat;
use super::pattern::PatternRule;
use crate::tags::TagMap;

/// Marker for keys that are kept out of written tags
pub const INTERNAL_PREFIX: char = '_';

/// Absolute path of the file being processed
pub const ABSPATH_KEY: &str = "_ABSPATH";
/// File name of the file being processed
pub const FILENAME_KEY: &str = "_FILENAME";
/// Name of the folder containing the file being processed
pub const FOLDER_KEY: &str = "_FOLDER";

/// Keys computed per file
pub const SPECIAL_KEYS: [&str; 3] = [ABSPATH_KEY, FILENAME_KEY, FOLDER_KEY];

/// Returns true for keys that are never written to files
#[must_use]
pub fn is_internal(key: &str) -> bool {
    key.starts_with(INTERNAL_PREFIX)
}

/// Errors raised by environment operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("key '{key}' is not set")]
    KeyNotFound { key: String },
    #[error("source key '{source_key}' for '{key}' is not set")]
    MissingSourceKey { key: String, source_key: String },
    #[error("value '{value}' of '{key}' is not an integer")]
    InvalidIncrementValue { key: String, value: String },
}

/// How a key's value changes from file to file
#[derive(Debug, Clone)]
pub enum Modifier {
    /// Value stays as set
    Plain,
    /// Value advances by one after every committed file
    Incrementing(IncrementFormat),
    /// Value is recomputed from another key before every file
    Derived { rule: PatternRule, order: u64 },
}

/// Value a one-shot override replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prior {
    Value(String),
    Absent,
}

/// Everything the environment knows about one key
#[derive(Debug, Clone)]
pub struct Entry {
    /// `None` only for derived keys that have not been evaluated yet
    pub value: Option<String>,
    pub modifier: Modifier,
    pub once: Option<Prior>,
}

impl Entry {
    fn plain(value: String) -> Self {
        Self {
            value: Some(value),
            modifier: Modifier::Plain,
            once: None,
        }
    }
}

/// The tag environment of one batchfile run
#[derive(Debug, Default)]
pub struct Environment {
    entries: IndexMap<String, Entry>,
    next_rule: u64,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|e| e.value.as_deref())
    }

    /// Full entry for a key, including modifiers
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All keys with a value, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, e)| e.value.as_deref().map(|v| (k.as_str(), v)))
    }

    /// Keys and values that get written to files
    #[must_use]
    pub fn external_tags(&self) -> TagMap {
        self.iter()
            .filter(|(k, _)| !is_internal(k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Set a value, keeping any modifier the key already has
    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.get_mut(key) {
            Some(entry) => entry.value = Some(value.to_string()),
            None => {
                self.entries
                    .insert(key.to_string(), Entry::plain(value.to_string()));
            }
        }
    }

    /// Set a value for the next file only.
    ///
    /// The value in place before the first pending override is the one that
    /// gets restored, so repeating `set_once` before a file doesn't lose it.
    pub fn set_once(&mut self, key: &str, value: &str) {
        let prior = match self.get(key) {
            Some(v) => Prior::Value(v.to_string()),
            None => Prior::Absent,
        };
        self.set(key, value);
        if let Some(entry) = self.entries.get_mut(key)
            && entry.once.is_none()
        {
            entry.once = Some(prior);
        }
    }

    /// Remove a key and its modifiers.
    ///
    /// # Errors
    /// Returns `EnvError::KeyNotFound` if the key is not in the environment.
    pub fn unset(&mut self, key: &str) -> Result<(), EnvError> {
        self.entries
            .shift_remove(key)
            .map(|_| ())
            .ok_or_else(|| EnvError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Remove every key
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Start a counter at `initial`, rendered through `format`
    pub fn set_incrementing(&mut self, key: &str, initial: i64, format: IncrementFormat) {
        let value = format.render(initial);
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::plain(String::new()));
        entry.value = Some(value);
        entry.modifier = Modifier::Incrementing(format);
    }

    /// Attach a pattern rule to `key`.
    ///
    /// Rules are evaluated in the order they were first declared; replacing
    /// the rule of a derived key keeps its place.
    pub fn set_pattern(&mut self, key: &str, rule: PatternRule) {
        let next = self.next_rule;
        let entry = self.entries.entry(key.to_string()).or_insert(Entry {
            value: None,
            modifier: Modifier::Plain,
            once: None,
        });
        let order = match entry.modifier {
            Modifier::Derived { order, .. } => order,
            _ => {
                self.next_rule += 1;
                next
            }
        };
        entry.modifier = Modifier::Derived { rule, order };
    }

    /// Insert the per-file internal keys for `path`
    pub fn prepare_file(&mut self, path: &Path) {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let file_name = absolute
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let folder = absolute
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.set(ABSPATH_KEY, &absolute.to_string_lossy());
        self.set(FILENAME_KEY, &file_name);
        self.set(FOLDER_KEY, &folder);
    }

    /// Re-evaluate every derived key against current values.
    ///
    /// Keys under a one-shot override keep the override for this file.
    ///
    /// # Errors
    /// Returns `EnvError::MissingSourceKey` if a rule's source has no value;
    /// rules before it in order have already been applied.
    pub fn derive(&mut self) -> Result<(), EnvError> {
        let mut derived: Vec<(u64, String)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.once.is_none())
            .filter_map(|(k, e)| match &e.modifier {
                Modifier::Derived { order, .. } => Some((*order, k.clone())),
                _ => None,
            })
            .collect();
        derived.sort_unstable();

        for (_, key) in derived {
            let value = {
                let Some(Entry {
                    modifier: Modifier::Derived { rule, .. },
                    ..
                }) = self.entries.get(&key)
                else {
                    continue;
                };
                let source = self
                    .get(rule.source())
                    .ok_or_else(|| EnvError::MissingSourceKey {
                        key: key.clone(),
                        source_key: rule.source().to_string(),
                    })?;
                rule.apply(source)
            };
            if let Some(entry) = self.entries.get_mut(&key) {
                entry.value = Some(value);
            }
        }
        Ok(())
    }

    /// Advance every incrementing key by one.
    ///
    /// Call after [`Environment::revert_once`] so a counter advances from its
    /// own value rather than from a one-shot override.
    ///
    /// # Errors
    /// Returns `EnvError::InvalidIncrementValue` if a value no longer parses
    /// through its format. Keys before it in order have already advanced.
    pub fn advance_increments(&mut self) -> Result<(), EnvError> {
        for (key, entry) in &mut self.entries {
            let Modifier::Incrementing(format) = &entry.modifier else {
                continue;
            };
            let current = entry.value.clone().unwrap_or_default();
            let n = format
                .parse_value(&current)
                .ok_or_else(|| EnvError::InvalidIncrementValue {
                    key: key.clone(),
                    value: current.clone(),
                })?;
            entry.value = Some(format.render(n.saturating_add(1)));
        }
        Ok(())
    }

    /// Restore every key under a one-shot override.
    ///
    /// A key that had no value before the override is removed, unless it
    /// carries a modifier; a derived key goes back to being unevaluated.
    pub fn revert_once(&mut self) {
        self.entries.retain(|_, entry| match entry.once.take() {
            Some(Prior::Value(v)) => {
                entry.value = Some(v);
                true
            }
            Some(Prior::Absent) => {
                entry.value = None;
                !matches!(entry.modifier, Modifier::Plain)
            }
            None => true,
        });
    }

    /// Remove the per-file internal keys
    pub fn clear_special_keys(&mut self) {
        for key in SPECIAL_KEYS {
            self.entries.shift_remove(key);
        }
    }
}
