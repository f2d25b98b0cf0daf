use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub mod v1;
pub mod v2;

/// Field rules that serde's shape checks cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Active,
    Inactive,
}

/// Stored form of a customer, shared by every API generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<C> {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub customer: C,
}

/// Wire form of a stored customer, with the identifier rendered as hex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerView<C> {
    pub id: String,
    #[serde(flatten)]
    pub customer: C,
}

impl<C> From<Record<C>> for CustomerView<C> {
    fn from(record: Record<C>) -> Self {
        Self {
            id: record.id.to_hex(),
            customer: record.customer,
        }
    }
}

pub(crate) fn check_vat(vat_percentage: f64, max: Option<f64>) -> Result<(), String> {
    if !vat_percentage.is_finite() || vat_percentage < 0.0 {
        return Err(format!(
            "vat_percentage must be a non-negative number, got {}",
            vat_percentage
        ));
    }
    match max {
        Some(max) if vat_percentage > max => Err(format!(
            "vat_percentage must not exceed {}, got {}",
            max, vat_percentage
        )),
        _ => Ok(()),
    }
}
