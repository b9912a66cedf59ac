//! `aws_organization` resource
//!
//! Maps Create / Read / Delete onto CreateOrganization, DescribeOrganization
//! and DeleteOrganization. An account belongs to at most one organization,
//! so Read and Delete act on "the caller's organization" rather than on the
//! stored identifier.

use async_trait::async_trait;

use super::schema::{FieldMode, FieldSchema, FieldType, ResourceSchema, Validation};
use super::{Resource, ResourceData};
use crate::client::FeatureSet;
use crate::error::{Error, Result, ValidationError};
use crate::provider::ProviderContext;

pub const TYPE_NAME: &str = "aws_organization";

const FEATURE_SET: &str = "feature_set";

const fn computed(name: &'static str, description: &'static str) -> FieldSchema {
    FieldSchema {
        name,
        field_type: FieldType::String,
        mode: FieldMode::Computed,
        force_new: false,
        default: None,
        validation: None,
        description,
    }
}

pub static ORGANIZATION_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: TYPE_NAME,
    importable: true,
    fields: &[
        computed("arn", "ARN of the organization"),
        FieldSchema {
            name: FEATURE_SET,
            field_type: FieldType::String,
            mode: FieldMode::Optional,
            force_new: true,
            default: Some("ALL"),
            validation: Some(Validation::StringInSlice {
                allowed: &FeatureSet::VALUES,
                ignore_case: true,
            }),
            description: "ALL or CONSOLIDATED_BILLING; changing it replaces the organization",
        },
        computed("master_account_arn", "ARN of the management account"),
        computed("master_account_email", "Email of the management account"),
        computed("master_account_id", "ID of the management account"),
    ],
};

/// Handler for the `aws_organization` resource type
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizationResource;

impl OrganizationResource {
    /// Configured feature set, validated before any remote call
    fn feature_set(data: &ResourceData) -> Result<FeatureSet> {
        let raw = data.get(FEATURE_SET).unwrap_or(FeatureSet::default().as_str());
        raw.parse::<FeatureSet>().map_err(|_| {
            Error::from(ValidationError::NotInSlice {
                field: FEATURE_SET.to_string(),
                value: raw.to_string(),
                allowed: FeatureSet::VALUES.iter().map(|s| s.to_string()).collect(),
            })
        })
    }
}

#[async_trait]
impl Resource for OrganizationResource {
    fn schema(&self) -> &'static ResourceSchema {
        &ORGANIZATION_SCHEMA
    }

    async fn create(&self, data: &mut ResourceData, meta: &ProviderContext) -> Result<()> {
        let feature_set = Self::feature_set(data)?;
        log::debug!("Creating Organization: feature_set={}", feature_set);

        let org = meta
            .organizations()
            .create_organization(feature_set)
            .await
            .map_err(Error::CreateOrganization)?;

        data.set_id(org.id);
        log::info!("Organization ID: {}", data.id());

        self.read(data, meta).await
    }

    async fn read(&self, data: &mut ResourceData, meta: &ProviderContext) -> Result<()> {
        log::info!("Reading Organization: {}", data.id());

        let org = match meta.organizations().describe_organization().await {
            Ok(org) => org,
            Err(err) if err.is_not_in_use() => {
                log::warn!(
                    "Organization does not exist, removing from state: {}",
                    data.id()
                );
                data.clear_id();
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        if org.id != data.id() {
            log::warn!(
                "Account belongs to organization {}, state records {}",
                org.id,
                data.id()
            );
        }

        data.set("arn", org.arn.as_deref());
        data.set(FEATURE_SET, org.feature_set.as_deref());
        data.set("master_account_arn", org.master_account_arn.as_deref());
        data.set("master_account_email", org.master_account_email.as_deref());
        data.set("master_account_id", org.master_account_id.as_deref());
        Ok(())
    }

    async fn delete(&self, data: &mut ResourceData, meta: &ProviderContext) -> Result<()> {
        log::info!("Deleting Organization: {}", data.id());

        meta.organizations()
            .delete_organization()
            .await
            .map_err(Error::DeleteOrganization)?;

        data.clear_id();
        Ok(())
    }
}
