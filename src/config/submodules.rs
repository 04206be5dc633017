//! Submodule override table
//!
//! Parsed from a single JSON object whose keys are submodule names and whose
//! values are either a replacement URL or an object carrying a URL and a
//! tracking branch:
//!
//! ```json
//! {"libs/foo": "https://mirror/foo.git",
//!  "libs/bar": {"url": "https://mirror/bar.git", "branch": "stable"}}
//! ```
//!
//! The table is either empty or fully parsed; malformed input is rejected as
//! a whole. [`SubmoduleOverrides`] implements `FromStr` and `Display`, and
//! the two round-trip.

use crate::utils::validators::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Replacement for one submodule's committed configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleOverride {
    pub url: String,
    pub branch: Option<String>,
}

impl SubmoduleOverride {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            branch: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

/// Wire form of an override value
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OverrideValue {
    Url(String),
    Detailed {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        branch: Option<String>,
    },
}

impl From<&SubmoduleOverride> for OverrideValue {
    fn from(entry: &SubmoduleOverride) -> Self {
        match &entry.branch {
            None => OverrideValue::Url(entry.url.clone()),
            Some(branch) => OverrideValue::Detailed {
                url: entry.url.clone(),
                branch: Some(branch.clone()),
            },
        }
    }
}

/// Per-submodule URL and branch substitutions, keyed by submodule name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmoduleOverrides {
    entries: BTreeMap<String, SubmoduleOverride>,
}

impl SubmoduleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the configuration value
    ///
    /// Empty or whitespace-only input yields an empty table.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::new());
        }

        let raw: BTreeMap<String, OverrideValue> = serde_json::from_str(input)
            .map_err(|e| ValidationError::InvalidSubmoduleOverride(e.to_string()))?;

        let mut overrides = Self::new();
        for (name, value) in raw {
            let entry = match value {
                OverrideValue::Url(url) => SubmoduleOverride::new(url),
                OverrideValue::Detailed { url, branch } => SubmoduleOverride { url, branch },
            };
            overrides.insert(name, entry)?;
        }

        Ok(overrides)
    }

    /// Add an entry, rejecting empty names and URLs
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        entry: SubmoduleOverride,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidSubmoduleOverride(
                "submodule name cannot be empty".to_string(),
            ));
        }
        if entry.url.trim().is_empty() {
            return Err(ValidationError::InvalidSubmoduleOverride(format!(
                "url for submodule '{}' cannot be empty",
                name
            )));
        }
        let entry = SubmoduleOverride {
            branch: entry.branch.filter(|branch| !branch.trim().is_empty()),
            ..entry
        };
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Look up the override for a submodule
    pub fn get(&self, name: &str) -> Option<&SubmoduleOverride> {
        self.entries.get(name)
    }

    /// Iterate entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SubmoduleOverride)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compact JSON form, empty string for an empty table
    pub fn to_compact_string(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl FromStr for SubmoduleOverrides {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for SubmoduleOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_compact_string())
    }
}

impl Serialize for SubmoduleOverrides {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw: BTreeMap<&String, OverrideValue> = self
            .entries
            .iter()
            .map(|(name, entry)| (name, OverrideValue::from(entry)))
            .collect();
        raw.serialize(serializer)
    }
}
