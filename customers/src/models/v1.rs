//! First API generation: the shape published with `/api/v1`.

use serde::{Deserialize, Serialize};

use super::{check_vat, Status, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerClass {
    Enduser,
    Business,
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
        check_vat(self.vat_percentage, None)
    }
}
