//! Second API generation. Adds the `Reseller` class and tightens field rules:
//! names must not be blank and VAT is a percentage in `[0, 100]`.

use serde::{Deserialize, Serialize};

use super::{check_vat, Status, Validate};

const MAX_VAT_PERCENTAGE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerClass {
    Enduser,
    Business,
    Reseller,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub customer_class: CustomerClass,
    pub vat_percentage: f64,
    pub status: Status,
}

impl Validate for Customer {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be blank".to_string());
        }
        check_vat(self.vat_percentage, Some(MAX_VAT_PERCENTAGE))
    }
}
