// Account registration against the remote catalog.
//
// Responsibilities
// - Submit the profile and report acceptance. No retry: a rejected or
//   unreachable submission is handed back to the caller as false.

use std::sync::Arc;

use crate::core::ports::{RegistrationProfile, RemoteCatalog};

pub struct RegisterAccountHandler<TCatalog: RemoteCatalog> {
    catalog: Arc<TCatalog>,
}

impl<TCatalog: RemoteCatalog> RegisterAccountHandler<TCatalog> {
    pub fn new(catalog: Arc<TCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self, profile: RegistrationProfile) -> bool {
        let accepted = self.catalog.submit_registration(&profile).await;
        if accepted {
            tracing::info!(nickname = %profile.nickname, "registration accepted");
        } else {
            tracing::warn!(nickname = %profile.nickname, "registration not accepted");
        }
        accepted
    }
}
