use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{TenantError, TenantResult};

/// Opaque, immutable tenant identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct TenantId(pub Uuid);

impl TenantId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for TenantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TenantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Canonical identity plus the fields used to personalize prompts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TenantProfile {
    pub id: TenantId,
    pub handle: String,
    pub display_name: String,
    pub bio: Option<String>,
}

impl TenantProfile {
    pub fn new(id: TenantId, handle: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            handle: handle.into(),
            display_name: display_name.into(),
            bio: None,
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    /// Bio with surrounding whitespace removed, `None` when blank
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }
}

/// Exactly one way of naming a tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantSelector {
    Id(TenantId),
    Handle(String),
}

impl TenantSelector {
    /// Builds a selector from the optional request fields.
    ///
    /// Rejects a request that names no tenant, names it twice, or passes a
    /// blank handle. The handle is trimmed.
    pub fn from_parts(id: Option<TenantId>, handle: Option<&str>) -> TenantResult<Self> {
        match (id, handle) {
            (Some(_), Some(_)) => Err(TenantError::Validation(
                "provide either tenantId or tenantHandle, not both".to_string(),
            )),
            (None, None) => Err(TenantError::Validation(
                "one of tenantId or tenantHandle is required".to_string(),
            )),
            (Some(id), None) => Ok(Self::Id(id)),
            (None, Some(handle)) => {
                let handle = handle.trim();
                if handle.is_empty() {
                    Err(TenantError::Validation(
                        "tenantHandle must not be blank".to_string(),
                    ))
                } else {
                    Ok(Self::Handle(handle.to_string()))
                }
            }
        }
    }
}

impl fmt::Display for TenantSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {}", id),
            Self::Handle(handle) => write!(f, "handle '{}'", handle),
        }
    }
}
