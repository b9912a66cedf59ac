//! Single-resource planning and execution
//!
//! Compares the refreshed prior record with the desired configuration and
//! decides between create, replace, delete and no-op. There is no in-place
//! update: a difference on a force-new attribute replaces the object, and
//! differences on other configurable attributes are not tracked.

use serde::Serialize;

use super::schema::{ResourceConfig, ResourceSchema};
use super::{Resource, ResourceData};
use crate::error::{Error, Result};
use crate::provider::ProviderContext;

/// Planned change for one resource instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Plan {
    /// Remote object matches configuration
    NoOp,
    /// Remote object does not exist yet
    Create,
    /// Force-new attributes changed; delete then create
    Replace { fields: Vec<String> },
    /// Configuration removed; destroy the remote object
    Delete,
}

impl Plan {
    /// Short verb for display
    pub fn verb(&self) -> &'static str {
        match self {
            Plan::NoOp => "no changes",
            Plan::Create => "create",
            Plan::Replace { .. } => "replace",
            Plan::Delete => "destroy",
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Plan::NoOp)
    }
}

/// Decide what to do with a resource instance.
///
/// `prior` is the refreshed state (absent or with an empty id when the
/// object does not exist); `desired` is the user configuration, `None` when
/// the resource should not exist.
pub fn plan(
    schema: &ResourceSchema,
    prior: Option<&ResourceData>,
    desired: Option<&ResourceConfig>,
) -> Plan {
    let prior = prior.filter(|p| p.is_present());

    match (prior, desired) {
        (None, None) => Plan::NoOp,
        (None, Some(_)) => Plan::Create,
        (Some(_), None) => Plan::Delete,
        (Some(prior), Some(desired)) => {
            let desired = schema.resolve(desired);
            let fields: Vec<String> = schema
                .configurable_fields()
                .filter(|field| field.force_new)
                .filter(|field| {
                    !field.values_equal(
                        prior.get(field.name),
                        desired.get(field.name).map(String::as_str),
                    )
                })
                .map(|field| field.name.to_string())
                .collect();

            if fields.is_empty() {
                Plan::NoOp
            } else {
                Plan::Replace { fields }
            }
        }
    }
}

/// Refresh a stored record; the id is cleared if the object is gone
pub async fn refresh<R: Resource + ?Sized>(
    resource: &R,
    state: &mut ResourceData,
    meta: &ProviderContext,
) -> Result<()> {
    if state.is_present() {
        resource.read(state, meta).await?;
    }
    Ok(())
}

/// Carry out a plan, leaving the resulting record in `state`.
///
/// On failure `state` reflects how far execution got: a failed delete keeps
/// the identifier, a failed create after a successful delete leaves the
/// record without one.
pub async fn execute<R: Resource + ?Sized>(
    resource: &R,
    plan: &Plan,
    state: &mut ResourceData,
    desired: Option<&ResourceConfig>,
    meta: &ProviderContext,
) -> Result<()> {
    match plan {
        Plan::NoOp => Ok(()),
        Plan::Delete => resource.delete(state, meta).await,
        Plan::Create => create(resource, state, desired, meta).await,
        Plan::Replace { fields } => {
            log::info!(
                "Replacing {} because {} changed",
                state.id(),
                fields.join(", ")
            );
            resource.delete(state, meta).await?;
            create(resource, state, desired, meta).await
        }
    }
}

async fn create<R: Resource + ?Sized>(
    resource: &R,
    state: &mut ResourceData,
    desired: Option<&ResourceConfig>,
    meta: &ProviderContext,
) -> Result<()> {
    let desired = desired
        .ok_or_else(|| Error::Other("cannot create a resource without configuration".to_string()))?;
    *state = ResourceData::from_config(resource.schema(), desired);
    resource.create(state, meta).await
}
