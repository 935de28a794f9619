use std::sync::Arc;

use tracing::debug;

use crate::error::{TenantError, TenantResult};
use crate::models::{TenantProfile, TenantSelector};
use crate::repository::TenantRepository;

/// Maps a [`TenantSelector`] to the tenant's profile. Read-only.
#[derive(Clone)]
pub struct TenantResolver {
    repository: Arc<dyn TenantRepository>,
}

impl TenantResolver {
    pub fn new<R: TenantRepository + 'static>(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn resolve(&self, selector: &TenantSelector) -> TenantResult<TenantProfile> {
        let found = match selector {
            TenantSelector::Id(id) => self.repository.get_by_id(*id).await?,
            TenantSelector::Handle(handle) => self.repository.get_by_handle(handle).await?,
        };

        match found {
            Some(profile) => {
                debug!(tenant_id = %profile.id, handle = %profile.handle, "Resolved tenant");
                Ok(profile)
            }
            None => Err(TenantError::NotFound(selector.to_string())),
        }
    }
}
