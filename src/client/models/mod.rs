//! AWS Organizations data models
//!
//! Request and response shapes for the JSON 1.1 protocol, plus the
//! `FeatureSet` enum shared with the resource schema.

mod organization;

pub use organization::{CreateOrganizationRequest, FeatureSet, Organization, OrganizationResponse};
