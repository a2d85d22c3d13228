//! The goal entity.
//!
//! A goal is a short piece of user text plus a store-assigned id. Ids are
//! opaque here; the store adapter decides their shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GoalError, Result};

/// Store-assigned goal identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(String);

impl GoalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated goal text: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalText(String);

impl GoalText {
    /// Trim `raw` and reject absent, empty, or whitespace-only input.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Err(GoalError::InvalidText);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A persisted goal as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub text: String,
}

impl Goal {
    pub fn new(id: GoalId, text: GoalText) -> Self {
        Self { id, text: text.into_inner() }
    }
}
