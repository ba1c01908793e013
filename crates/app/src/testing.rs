//! Shared fixture for use-case tests: in-memory stores and real token/password services.

use std::sync::Arc;

use chrono::{Duration, Utc};

use pvz_auth::{
    AccessToken, Argon2PasswordService, DUMMY_EMPLOYEE_ID, DUMMY_MODERATOR_ID, IdentityService, JwtManager,
};
use pvz_core::PvzId;
use pvz_domain::{City, PickupPoint};
use pvz_infra::memory::InMemoryStore;

use crate::{CreatePickupPointRequest, Stores, UseCases};

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub identity: IdentityService,
    pub use_cases: UseCases,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let tokens = Arc::new(JwtManager::new(b"test-secret", "pvz-test", Duration::minutes(5)));
        let passwords = Arc::new(Argon2PasswordService);
        let stores = Stores::from_backend(store.clone());

        Self {
            identity: IdentityService::new(stores.users.clone(), tokens.clone(), passwords.clone()),
            use_cases: UseCases::new(stores, tokens, passwords),
            store,
        }
    }

    pub fn moderator_token(&self) -> AccessToken {
        self.identity.issue_token(DUMMY_MODERATOR_ID).unwrap()
    }

    pub fn client_token(&self) -> AccessToken {
        self.identity.issue_token(DUMMY_EMPLOYEE_ID).unwrap()
    }

    pub async fn pickup_point(&self) -> PickupPoint {
        self.use_cases
            .create_pickup_point
            .execute(
                &self.moderator_token(),
                CreatePickupPointRequest {
                    id: Some(PvzId::new()),
                    city: City::Moscow.name().to_string(),
                    registered_at: Some(Utc::now()),
                },
            )
            .await
            .unwrap()
    }
}
