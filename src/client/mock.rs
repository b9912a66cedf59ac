//! Mock Organizations client for testing
//!
//! Simulates a single account's view of the control plane: at most one
//! organization exists, and each operation mutates it the way the real
//! service would.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::models::{FeatureSet, Organization};
use super::{ApiResult, OrganizationsApi};
use crate::error::{ApiError, NOT_IN_USE_CODE};

/// Mock API client for testing.
///
/// # Example
/// ```ignore
/// let mock = MockOrganizationsClient::new().with_organization(sample_org()).await;
/// let org = mock.describe_organization().await?;
/// ```
#[derive(Default)]
pub struct MockOrganizationsClient {
    /// Organization the caller's account currently belongs to
    organization: Arc<Mutex<Option<Organization>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Feature sets passed to create_organization, in call order
    created_with: Arc<Mutex<Vec<FeatureSet>>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub create_organization: usize,
    pub describe_organization: usize,
    pub delete_organization: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.create_organization + self.describe_organization + self.delete_organization
    }
}

/// A fully populated organization as DescribeOrganization would return it
pub fn sample_organization(id: &str, feature_set: FeatureSet) -> Organization {
    Organization {
        id: id.to_string(),
        arn: Some(format!(
            "arn:aws:organizations::111111111111:organization/{}",
            id
        )),
        feature_set: Some(feature_set.as_str().to_string()),
        master_account_arn: Some(format!(
            "arn:aws:organizations::111111111111:account/{}/111111111111",
            id
        )),
        master_account_email: Some("admin@example.com".to_string()),
        master_account_id: Some("111111111111".to_string()),
        available_policy_types: Vec::new(),
    }
}

/// Service error as the control plane would report it
pub fn service_error(code: &str, message: &str) -> ApiError {
    ApiError::Service {
        code: code.to_string(),
        message: message.to_string(),
        status: 400,
    }
}

impl MockOrganizationsClient {
    /// Create a mock for an account that belongs to no organization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the account already in `organization`.
    pub async fn with_organization(self, organization: Organization) -> Self {
        *self.organization.lock().await = Some(organization);
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Arm a one-shot error on an existing (shared) mock.
    pub async fn fail_next(&self, error: ApiError) {
        *self.error.lock().await = Some(error);
    }

    /// Remove the organization behind the resource's back.
    pub async fn remove_externally(&self) {
        *self.organization.lock().await = None;
    }

    /// Current remote organization, if any.
    pub async fn organization(&self) -> Option<Organization> {
        self.organization.lock().await.clone()
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Feature sets passed to create_organization.
    pub async fn created_with(&self) -> Vec<FeatureSet> {
        self.created_with.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> ApiResult<()> {
        let mut error = self.error.lock().await;
        match error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn not_in_use() -> ApiError {
        service_error(
            NOT_IN_USE_CODE,
            "Your account is not a member of an organization.",
        )
    }
}

#[async_trait]
impl OrganizationsApi for MockOrganizationsClient {
    async fn create_organization(&self, feature_set: FeatureSet) -> ApiResult<Organization> {
        self.call_count.lock().await.create_organization += 1;
        self.created_with.lock().await.push(feature_set);
        self.check_error().await?;

        let mut current = self.organization.lock().await;
        if current.is_some() {
            return Err(service_error(
                "AlreadyInOrganizationException",
                "The AWS account is already a member of an organization.",
            ));
        }

        let created = sample_organization("o-mock0000001", feature_set);
        *current = Some(created.clone());

        // CreateOrganization returns a sparser record than DescribeOrganization
        Ok(Organization {
            master_account_email: None,
            ..created
        })
    }

    async fn describe_organization(&self) -> ApiResult<Organization> {
        self.call_count.lock().await.describe_organization += 1;
        self.check_error().await?;

        self.organization
            .lock()
            .await
            .clone()
            .ok_or_else(Self::not_in_use)
    }

    async fn delete_organization(&self) -> ApiResult<()> {
        self.call_count.lock().await.delete_organization += 1;
        self.check_error().await?;

        let mut current = self.organization.lock().await;
        if current.take().is_none() {
            return Err(Self::not_in_use());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_lifecycle() {
        let mock = MockOrganizationsClient::new();

        assert!(mock.describe_organization().await.unwrap_err().is_not_in_use());

        let created = mock.create_organization(FeatureSet::All).await.unwrap();
        assert_eq!(created.id, "o-mock0000001");

        let described = mock.describe_organization().await.unwrap();
        assert_eq!(described.id, created.id);
        assert!(described.master_account_email.is_some());

        mock.delete_organization().await.unwrap();
        assert!(mock.organization().await.is_none());

        let counts = mock.call_counts().await;
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.describe_organization, 2);
    }

    #[tokio::test]
    async fn test_mock_rejects_second_create() {
        let mock = MockOrganizationsClient::new()
            .with_organization(sample_organization("o-existing01", FeatureSet::All))
            .await;

        let err = mock
            .create_organization(FeatureSet::ConsolidatedBilling)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("AlreadyInOrganizationException"));
    }

    #[tokio::test]
    async fn test_mock_error_is_one_shot() {
        let mock = MockOrganizationsClient::new()
            .with_error(ApiError::Network("Connection refused".to_string()))
            .await;

        assert!(matches!(
            mock.describe_organization().await,
            Err(ApiError::Network(_))
        ));
        assert!(mock.describe_organization().await.unwrap_err().is_not_in_use());
    }
}
