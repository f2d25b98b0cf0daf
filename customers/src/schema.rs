//! Registry of API generations. Each generation owns its validation and
//! serialization rules and its collection; the repository and handlers are
//! written once and instantiated per generation.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::models::{v1, v2, Validate};

pub trait ApiVersion: Send + Sync + 'static {
    /// Path segment, e.g. `v1`.
    const NAME: &'static str;
    const COLLECTION: &'static str;

    type Customer: Validate
        + Serialize
        + DeserializeOwned
        + Clone
        + Debug
        + PartialEq
        + Unpin
        + Send
        + Sync
        + 'static;

    fn scope() -> String {
        format!("/api/{}/customers", Self::NAME)
    }
}

pub struct V1;

impl ApiVersion for V1 {
    const NAME: &'static str = "v1";
    const COLLECTION: &'static str = "customers_v1";
    type Customer = v1::Customer;
}

pub struct V2;

impl ApiVersion for V2 {
    const NAME: &'static str = "v2";
    const COLLECTION: &'static str = "customers_v2";
    type Customer = v2::Customer;
}
