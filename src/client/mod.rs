//! AWS Organizations API client

use async_trait::async_trait;

use crate::error::ApiError;

#[cfg(test)]
pub mod mock;
pub mod models;
pub mod organizations;
pub mod sigv4;

#[cfg(test)]
pub use mock::MockOrganizationsClient;
pub use models::{FeatureSet, Organization};
pub use organizations::OrganizationsClient;
pub use sigv4::Credentials;

/// Result type for raw control-plane calls.
///
/// Kept separate from the crate-wide `Result` so callers can inspect the
/// service error code before wrapping it.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// AWS Organizations control-plane operations used by the organization resource
#[async_trait]
pub trait OrganizationsApi: Send + Sync {
    /// Create an organization with the caller's account as management account
    async fn create_organization(&self, feature_set: FeatureSet) -> ApiResult<Organization>;

    /// Describe the organization the caller's account belongs to.
    ///
    /// Fails with `AWSOrganizationsNotInUseException` when there is none.
    async fn describe_organization(&self) -> ApiResult<Organization>;

    /// Delete the organization. Only possible once all member accounts are removed.
    async fn delete_organization(&self) -> ApiResult<()>;
}
