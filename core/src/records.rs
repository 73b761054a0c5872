//! Row shapes of the source tables.
//!
//! The dashboard never writes these; they exist so fixtures and the demo
//! dataset can be loaded through typed inserts.

use crate::types::{Quarter, Year};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub state: String,
    pub year: Year,
    pub quarter: Quarter,
    pub transaction_type: String,
    pub transaction_count: Option<i64>,
    pub transaction_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDeviceRecord {
    pub user_brand: String,
    pub user_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapUserRecord {
    pub state: String,
    pub registered_users: Option<i64>,
    pub app_opens: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceRecord {
    pub state: String,
    pub year: Year,
    pub insurance_count: Option<i64>,
    pub insurance_amount: Option<f64>,
}

/// Geographic granularity of the ranking and registration tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLevel {
    State,
    District,
    Pincode,
}

impl EntityLevel {
    pub const ALL: [EntityLevel; 3] = [EntityLevel::State, EntityLevel::District, EntityLevel::Pincode];

    pub fn label(self) -> &'static str {
        match self {
            EntityLevel::State    => "State",
            EntityLevel::District => "District",
            EntityLevel::Pincode  => "Pincode",
        }
    }
}

/// One row of `top_{state,district,pincode}_transaction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEntityRecord {
    pub level: EntityLevel,
    pub entity_name: String,
    pub year: Year,
    pub total_amount: Option<f64>,
}

/// One row of `top_user_{state,district,pincode}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub level: EntityLevel,
    pub entity_name: String,
    pub year: Year,
    pub quarter: Quarter,
    pub registered_users: Option<i64>,
}
