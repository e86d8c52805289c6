//! Path patterns used by watch rules
//!
//! A pattern containing `*` is a glob (`**` crosses directories, `*` does
//! not). Anything else is a literal prefix. A glob that does not match still
//! gets the prefix check, so `services/api` style paths work either way.

use crate::core::error::DiffError;
use globset::{GlobBuilder, GlobMatcher};
use serde::{Serialize, Serializer};
use std::fmt;

/// Marker that turns a pattern into a glob
const WILDCARD: char = '*';

/// A compiled watch or skip pattern
#[derive(Clone)]
pub struct Pattern {
    raw: String,
    glob: Option<GlobMatcher>,
}

impl Pattern {
    /// Compile a pattern, failing on malformed globs
    pub fn new(raw: impl Into<String>) -> Result<Self, DiffError> {
        let raw = raw.into();
        let glob = if raw.contains(WILDCARD) {
            Some(compile_glob(&raw)?)
        } else {
            None
        };
        Ok(Self { raw, glob })
    }

    /// The pattern as written in the configuration
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_glob(&self) -> bool {
        self.glob.is_some()
    }

    /// Check whether a changed file path satisfies this pattern
    pub fn matches(&self, path: &str) -> bool {
        if let Some(glob) = &self.glob {
            if glob.is_match(path) {
                return true;
            }
        }
        path.starts_with(&self.raw)
    }
}

/// One-shot match of a raw pattern against a path
pub fn matches(pattern: &str, path: &str) -> Result<bool, DiffError> {
    Ok(Pattern::new(pattern)?.matches(path))
}

fn compile_glob(raw: &str) -> Result<GlobMatcher, DiffError> {
    let glob = GlobBuilder::new(raw)
        .literal_separator(true)
        .build()
        .map_err(|e| DiffError::InvalidPattern {
            pattern: raw.to_string(),
            reason: e.to_string(),
        })?;
    Ok(glob.compile_matcher())
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.raw).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
