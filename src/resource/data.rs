//! Mutable resource-state handle passed to resource operations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::schema::{ResourceConfig, ResourceSchema};

/// Identifier plus attribute values of one resource instance.
///
/// An empty identifier means the remote object does not exist; the host
/// drops such records instead of persisting them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

impl ResourceData {
    /// Empty record with no identifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Record carrying only an identifier, as produced by a passthrough import
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Planned record for a create: configuration with defaults applied
    pub fn from_config(schema: &ResourceSchema, config: &ResourceConfig) -> Self {
        Self {
            id: String::new(),
            attributes: schema.resolve(config),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Mark the remote object as gone
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    /// Whether the record refers to an existing remote object
    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Set an attribute; `None` removes it
    pub fn set(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.attributes.insert(key.to_string(), value.to_string());
            }
            None => {
                self.attributes.remove(key);
            }
        }
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}
