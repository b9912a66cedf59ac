//! Organization models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Organization as described by the control plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Organization {
    /// Organization ID (`o-` followed by 10-32 lowercase letters or digits)
    pub id: String,

    /// Organization ARN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    /// Enabled feature set (wire value, e.g. `ALL`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_set: Option<String>,

    /// ARN of the management (master) account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_account_arn: Option<String>,

    /// Email address of the management (master) account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_account_email: Option<String>,

    /// ID of the management (master) account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_account_id: Option<String>,

    /// Policy types available in the organization
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_policy_types: Vec<PolicyTypeSummary>,
}

/// Policy type summary attached to an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyTypeSummary {
    /// Policy type name (e.g. `SERVICE_CONTROL_POLICY`)
    #[serde(rename = "Type")]
    pub policy_type: String,

    /// Status of the policy type (`ENABLED`, `PENDING_ENABLE`, ...)
    pub status: String,
}

/// Feature set of an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureSet {
    /// All features, including policy management
    #[default]
    #[serde(rename = "ALL")]
    All,
    /// Consolidated billing only
    #[serde(rename = "CONSOLIDATED_BILLING")]
    ConsolidatedBilling,
}

impl FeatureSet {
    /// Every accepted feature set, in wire form
    pub const VALUES: [&'static str; 2] = ["ALL", "CONSOLIDATED_BILLING"];

    /// Wire value sent to and returned by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureSet::All => "ALL",
            FeatureSet::ConsolidatedBilling => "CONSOLIDATED_BILLING",
        }
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureSet {
    type Err = String;

    /// Parses either feature set, ignoring letter case
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ALL") {
            Ok(FeatureSet::All)
        } else if s.eq_ignore_ascii_case("CONSOLIDATED_BILLING") {
            Ok(FeatureSet::ConsolidatedBilling)
        } else {
            Err(format!("unknown feature set: {}", s))
        }
    }
}

/// CreateOrganization request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateOrganizationRequest {
    pub feature_set: FeatureSet,
}

/// Response body shared by CreateOrganization and DescribeOrganization
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrganizationResponse {
    pub organization: Organization,
}
