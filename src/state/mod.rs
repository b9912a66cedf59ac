//! Local resource state
//!
//! Stands in for the host framework's state storage: one record per
//! resource address, persisted in SQLite.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::resource::ResourceData;

pub mod storage;

pub use storage::StateStore;

/// A stored resource record
#[derive(Debug, Clone, Serialize)]
pub struct StateEntry {
    /// Resource address (`<type>.<name>`)
    pub address: String,

    /// Resource type name
    pub resource_type: String,

    /// Identifier and attributes
    #[serde(flatten)]
    pub data: ResourceData,

    /// Last time the record was written
    pub updated_at: DateTime<Utc>,
}
