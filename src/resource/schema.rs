//! Declarative resource schemas
//!
//! A schema is a static field table: type, mode, force-new flag, default and
//! an optional validation. It drives configuration validation, default
//! resolution and replacement detection.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ValidationError;

/// User-supplied attribute values for one resource
pub type ResourceConfig = BTreeMap<String, String>;

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
}

/// Who supplies an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldMode {
    /// Must be set in configuration
    Required,
    /// May be set in configuration; falls back to the default
    Optional,
    /// Read-only, populated from the remote object
    Computed,
}

/// Constraint applied to a configured value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    StringInSlice {
        allowed: &'static [&'static str],
        ignore_case: bool,
    },
}

impl Validation {
    /// Check `value` for the attribute `field`
    pub fn check(&self, field: &str, value: &str) -> Result<(), ValidationError> {
        match self {
            Validation::StringInSlice {
                allowed,
                ignore_case,
            } => {
                let ok = allowed.iter().any(|candidate| {
                    if *ignore_case {
                        candidate.eq_ignore_ascii_case(value)
                    } else {
                        *candidate == value
                    }
                });
                if ok {
                    Ok(())
                } else {
                    Err(ValidationError::NotInSlice {
                        field: field.to_string(),
                        value: value.to_string(),
                        allowed: allowed.iter().map(|s| s.to_string()).collect(),
                    })
                }
            }
        }
    }

    /// Whether two values are the same under this constraint
    fn equivalent(&self, a: &str, b: &str) -> bool {
        match self {
            Validation::StringInSlice {
                ignore_case: true, ..
            } => a.eq_ignore_ascii_case(b),
            Validation::StringInSlice { .. } => a == b,
        }
    }
}

/// One attribute of a resource
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub mode: FieldMode,
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    pub description: &'static str,
}

impl FieldSchema {
    /// Whether two values of this attribute are considered equal
    pub fn values_equal(&self, a: Option<&str>, b: Option<&str>) -> bool {
        match (a, b, &self.validation) {
            (Some(a), Some(b), Some(validation)) => validation.equivalent(a, b),
            (a, b, _) => a == b,
        }
    }
}

/// Field table of a resource type
#[derive(Debug, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub importable: bool,
    pub fields: &'static [FieldSchema],
}

impl ResourceSchema {
    /// Look up an attribute by name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Attributes that can be set in configuration
    pub fn configurable_fields(&self) -> impl Iterator<Item = &FieldSchema> + '_ {
        self.fields.iter().filter(|f| f.mode != FieldMode::Computed)
    }

    /// Validate user configuration against the field table
    pub fn validate(&self, config: &ResourceConfig) -> Result<(), ValidationError> {
        for (name, value) in config {
            let field = self
                .field(name)
                .ok_or_else(|| ValidationError::UnknownField(name.clone()))?;

            if field.mode == FieldMode::Computed {
                return Err(ValidationError::ComputedField(name.clone()));
            }

            if let Some(validation) = &field.validation {
                validation.check(name, value)?;
            }
        }

        for field in self.fields.iter().filter(|f| f.mode == FieldMode::Required) {
            if !config.contains_key(field.name) {
                return Err(ValidationError::MissingRequired(field.name.to_string()));
            }
        }

        Ok(())
    }

    /// Configuration with defaults filled in for unset optional attributes
    pub fn resolve(&self, config: &ResourceConfig) -> ResourceConfig {
        let mut resolved = config.clone();
        for field in self.configurable_fields() {
            if let Some(default) = field.default {
                resolved
                    .entry(field.name.to_string())
                    .or_insert_with(|| default.to_string());
            }
        }
        resolved
    }
}
