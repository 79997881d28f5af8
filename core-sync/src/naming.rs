//! # Name Allocation
//!
//! Collision-free directory and file stems.
//!
//! Common file systems compare names case-insensitively and reject a handful
//! of characters, so every stem goes through [`sanitize_stem`] and then a
//! [`NameRegistry`] that hands out `name`, `name 2`, `name 3`, ... with
//! case-insensitive collision checks.
//!
//! One registry covers one scope: the playlist directories of a run, or the
//! track files of one playlist. It is owned by that scope and never shared.

use std::collections::HashMap;

use tracing::warn;

use crate::{Result, SyncError};

/// Characters replaced by a space in every stem
const FORBIDDEN_CHARACTERS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Stem used when a display name leaves nothing usable
pub const UNTITLED_STEM: &str = "Untitled";

/// Replace each forbidden character with a single space
///
/// Replacements are independent: `"a<>b"` becomes `"a  b"`.
pub fn sanitize_stem(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN_CHARACTERS.contains(&c) { ' ' } else { c })
        .collect()
}

/// Sanitized stem for a display name, never empty and never a relative
/// path component such as `..`
pub fn candidate_stem(name: &str) -> String {
    let stem = sanitize_stem(name);
    let trimmed = stem.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        UNTITLED_STEM.to_string()
    } else {
        stem
    }
}

/// Case-insensitive registry of used names
///
/// Each key counts the entries registered under it, so case variants seeded
/// from disk stay reserved until every one of them has been deleted.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    used: HashMap<String, usize>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with names already present in the scope
    ///
    /// Names that differ only by case can coexist on a case-sensitive file
    /// system. They are all kept.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for name in names {
            let name = name.as_ref();
            let count = registry.used.entry(Self::key(name)).or_default();
            if *count > 0 {
                warn!(name, "Name differs from an existing one only by case");
            }
            *count += 1;
        }
        registry
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }

    /// Register and return `candidate`, or `candidate n` for the smallest
    /// `n >= 2` that is still free
    pub fn take(&mut self, candidate: &str) -> String {
        let name = if self.is_used(candidate) {
            (2u64..)
                .map(|n| format!("{} {}", candidate, n))
                .find(|name| !self.is_used(name))
                .unwrap_or_else(|| candidate.to_string())
        } else {
            candidate.to_string()
        };
        self.used.insert(Self::key(&name), 1);
        name
    }

    /// Register `name`, failing if it is already used
    pub fn add(&mut self, name: &str) -> Result<()> {
        if self.is_used(name) {
            return Err(SyncError::NameAlreadyUsed(name.to_string()));
        }
        self.used.insert(Self::key(name), 1);
        Ok(())
    }

    /// Unregister `name`, failing if it is not registered
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let key = Self::key(name);
        match self.used.get_mut(&key) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                self.used.remove(&key);
            }
            None => return Err(SyncError::NameNotFound(name.to_string())),
        }
        Ok(())
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains_key(&Self::key(name))
    }
}
