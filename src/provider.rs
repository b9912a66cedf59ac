//! Provider context shared by resource operations

use std::sync::Arc;

use crate::client::{OrganizationsApi, OrganizationsClient};
use crate::config::Config;
use crate::error::Result;

/// Typed dependency container handed to every resource operation.
///
/// Built once per invocation and passed explicitly; the client inside is
/// only ever read.
#[derive(Clone)]
pub struct ProviderContext {
    organizations: Arc<dyn OrganizationsApi>,
}

impl ProviderContext {
    /// Wrap an already constructed client
    pub fn new(organizations: Arc<dyn OrganizationsApi>) -> Self {
        Self { organizations }
    }

    /// Build the HTTP client from resolved configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.credentials()?;
        let client =
            OrganizationsClient::with_endpoint(credentials, &config.region, config.endpoint.clone())?;
        log::debug!("Organizations endpoint: {}", client.endpoint().url);
        Ok(Self::new(Arc::new(client)))
    }

    /// AWS Organizations client
    pub fn organizations(&self) -> &dyn OrganizationsApi {
        self.organizations.as_ref()
    }
}
