//! Read-only access to front matter values
//!
//! Writing never goes through YAML (see [`crate::core::upsert`]), but deciding
//! whether a timestamp needs refreshing requires the current value of a key.
//! The block found by [`FrontMatterBlock::locate`] is deserialized with
//! serde_yaml here.

use crate::core::block::FrontMatterBlock;
use crate::error::{MatterTimeError, Result};
use serde_yaml::{Mapping, Value};

/// Parsed front matter of a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    data: Mapping,
}

impl FrontMatter {
    /// Parse the front matter of `content`
    ///
    /// Returns `Ok(None)` when the document has no front matter block. An empty
    /// block parses to an empty mapping.
    pub fn parse(content: &str) -> Result<Option<Self>> {
        let Some(block) = FrontMatterBlock::locate(content) else {
            return Ok(None);
        };

        let value: Value = serde_yaml::from_str(block.inner())
            .map_err(|e| MatterTimeError::malformed_front_matter(e.to_string()))?;

        let data = match value {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            other => {
                return Err(MatterTimeError::malformed_front_matter(format!(
                    "expected a mapping, found {}",
                    type_name(&other)
                )))
            }
        };

        Ok(Some(Self { data }))
    }

    /// Top-level value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Whether `key` is present at the top level
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Whether `key` is missing or holds nothing worth keeping
    pub fn is_blank(&self, key: &str) -> bool {
        match self.get(key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the mapping has no keys
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Render a scalar for display in logs and reports
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
