//! Per-request target headers.

use serde::{Deserialize, Serialize};

pub const ORG_ID_HEADER: &str = "X-Auth-Resource-Org";
pub const SPACE_ID_HEADER: &str = "X-Auth-Resource-Space";
pub const ACCOUNT_ID_HEADER: &str = "X-Auth-Resource-Account";
pub const REGION_HEADER: &str = "X-Region";
pub const RESOURCE_GROUP_HEADER: &str = "X-Auth-Resource-Group";

/// Account/region/resource-group scoping for a single request.
///
/// Serialized into request headers by the REST client. Unset fields produce
/// no header. Owned by the caller and never persisted.
///
/// # Example
///
/// ```
/// use cskit_core::RequestTarget;
///
/// let target = RequestTarget::new()
///     .with_account("acc-123")
///     .with_resource_group("default");
/// assert_eq!(target.headers().len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

impl RequestTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_org(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    pub fn with_space(mut self, space_id: impl Into<String>) -> Self {
        self.space_id = Some(space_id.into());
        self
    }

    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.resource_group = Some(resource_group.into());
        self
    }

    /// Header name/value pairs for every non-empty field.
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        [
            (ORG_ID_HEADER, &self.org_id),
            (SPACE_ID_HEADER, &self.space_id),
            (ACCOUNT_ID_HEADER, &self.account_id),
            (REGION_HEADER, &self.region),
            (RESOURCE_GROUP_HEADER, &self.resource_group),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (name, v))
        })
        .collect()
    }
}
