//! Test utilities for the REST API.

use std::sync::Arc;

use common::{
    auth::JwtAuth,
    rate_limit::{ClientRateLimiter, RateLimitOptions},
    repository::test_repository::TestRepository,
};
use serde_json::{json, Value};

use crate::{
    config::Credentials,
    models::{v1, v2, Record, Status},
    repositories::customer::{CacheOptions, CustomerRepo},
    schema::{V1, V2},
    ServiceState,
};

pub(crate) struct TestContext {
    pub(crate) v1: Arc<TestRepository<Record<v1::Customer>>>,
    pub(crate) v2: Arc<TestRepository<Record<v2::Customer>>>,
    pub(crate) state: ServiceState,
}

impl TestContext {
    pub(crate) fn setup() -> Self {
        Self::with_rate_limit(RateLimitOptions {
            per_day: 0,
            per_hour: 0,
        })
    }

    pub(crate) fn with_rate_limit(rate_limit: RateLimitOptions) -> Self {
        let v1_store: Arc<TestRepository<Record<v1::Customer>>> = Arc::new(TestRepository::new());
        let v2_store: Arc<TestRepository<Record<v2::Customer>>> = Arc::new(TestRepository::new());
        let state = ServiceState {
            v1: CustomerRepo::<V1>::new(v1_store.clone(), CacheOptions::default()),
            v2: CustomerRepo::<V2>::new(v2_store.clone(), CacheOptions::default()),
            auth: JwtAuth::new(b"secret-jwt", chrono::Duration::minutes(15)),
            credentials: Credentials {
                username: "admin".to_string(),
                password: "password".to_string(),
            },
            limiter: ClientRateLimiter::new(rate_limit),
        };
        Self {
            v1: v1_store,
            v2: v2_store,
            state,
        }
    }

    /// Authorization header carrying a freshly issued token.
    pub(crate) fn bearer(&self) -> (&'static str, String) {
        let token = self.state.auth.issue("admin").unwrap();
        ("Authorization", format!("Bearer {}", token))
    }

    pub(crate) async fn add_v1(&self, name: &str) -> String {
        self.state
            .v1
            .add(v1::Customer {
                name: name.to_string(),
                customer_class: v1::CustomerClass::Enduser,
                vat_percentage: 20.0,
                status: Status::Active,
            })
            .await
            .unwrap()
    }
}

pub(crate) fn john_doe() -> Value {
    json!({
        "name": "John Doe",
        "customer_class": "Enduser",
        "vat_percentage": 20,
        "status": "Active"
    })
}
