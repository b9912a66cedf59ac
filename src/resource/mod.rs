//! Resource handlers
//!
//! A resource maps the Create / Read / Delete verbs onto control-plane
//! calls. The host owns the state: it hands each operation a mutable
//! [`ResourceData`] and persists whatever the operation leaves in it.

use async_trait::async_trait;

use crate::error::Result;
use crate::provider::ProviderContext;

pub mod data;
pub mod organization;
pub mod plan;
pub mod schema;

pub use data::ResourceData;
pub use organization::OrganizationResource;
pub use plan::Plan;
pub use schema::{FieldMode, FieldSchema, ResourceConfig, ResourceSchema};

/// A managed resource type
#[async_trait]
pub trait Resource: Send + Sync {
    /// Static field table
    fn schema(&self) -> &'static ResourceSchema;

    /// Create the remote object described by `data` and record its identifier
    async fn create(&self, data: &mut ResourceData, meta: &ProviderContext) -> Result<()>;

    /// Refresh `data` from the remote object.
    ///
    /// Clears the identifier when the object no longer exists.
    async fn read(&self, data: &mut ResourceData, meta: &ProviderContext) -> Result<()>;

    /// Destroy the remote object and clear the identifier
    async fn delete(&self, data: &mut ResourceData, meta: &ProviderContext) -> Result<()>;

    /// Adopt an existing remote object by identifier.
    ///
    /// The default is a passthrough: the identifier is accepted as is and a
    /// subsequent `read` fills in the rest.
    async fn import(&self, id: &str, _meta: &ProviderContext) -> Result<ResourceData> {
        Ok(ResourceData::with_id(id))
    }
}

/// Resolve a resource type by name
pub fn lookup(type_name: &str) -> Option<&'static dyn Resource> {
    match type_name {
        organization::TYPE_NAME => Some(&OrganizationResource),
        _ => None,
    }
}

/// Build the state address of a resource instance
pub fn address(type_name: &str, name: &str) -> String {
    format!("{}.{}", type_name, name)
}
