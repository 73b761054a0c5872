//! Typed inserts for fixtures and the demo dataset.
//!
//! Rendering passes open the store with `query_only`, so these only work on
//! connections opened through `PulseStore::open` or `in_memory`.

use super::PulseStore;
use crate::{
    error::DashResult,
    records::{
        EntityLevel, InsuranceRecord, MapUserRecord, RegistrationRecord, TopEntityRecord,
        TransactionRecord, UserDeviceRecord,
    },
};
use rusqlite::params;

impl PulseStore {
    pub fn insert_transaction(&self, r: &TransactionRecord) -> DashResult<()> {
        self.conn.execute(
            "INSERT INTO aggregated_transaction (
                state, year, quarter, transaction_type, transaction_count, transaction_amount
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &r.state,
                r.year,
                r.quarter,
                &r.transaction_type,
                r.transaction_count,
                r.transaction_amount,
            ],
        )?;
        Ok(())
    }

    pub fn insert_user_device(&self, r: &UserDeviceRecord) -> DashResult<()> {
        self.conn.execute(
            "INSERT INTO aggregated_user (user_brand, user_count) VALUES (?1, ?2)",
            params![&r.user_brand, r.user_count],
        )?;
        Ok(())
    }

    pub fn insert_map_user(&self, r: &MapUserRecord) -> DashResult<()> {
        self.conn.execute(
            "INSERT INTO map_user (state, registered_users, app_opens) VALUES (?1, ?2, ?3)",
            params![&r.state, r.registered_users, r.app_opens],
        )?;
        Ok(())
    }

    pub fn insert_insurance(&self, r: &InsuranceRecord) -> DashResult<()> {
        self.conn.execute(
            "INSERT INTO aggregated_insurance (state, year, insurance_count, insurance_amount)
             VALUES (?1, ?2, ?3, ?4)",
            params![&r.state, r.year, r.insurance_count, r.insurance_amount],
        )?;
        Ok(())
    }

    pub fn insert_top_entity(&self, r: &TopEntityRecord) -> DashResult<()> {
        let (table, column) = match r.level {
            EntityLevel::State    => ("top_state_transaction", "state"),
            EntityLevel::District => ("top_district_transaction", "district"),
            EntityLevel::Pincode  => ("top_pincode_transaction", "pincode"),
        };
        self.conn.execute(
            &format!("INSERT INTO {table} ({column}, year, transaction_amount) VALUES (?1, ?2, ?3)"),
            params![&r.entity_name, r.year, r.total_amount],
        )?;
        Ok(())
    }

    pub fn insert_registration(&self, r: &RegistrationRecord) -> DashResult<()> {
        let (table, column) = match r.level {
            EntityLevel::State    => ("top_user_state", "state"),
            EntityLevel::District => ("top_user_district", "district"),
            EntityLevel::Pincode  => ("top_user_pincode", "pincode"),
        };
        self.conn.execute(
            &format!(
                "INSERT INTO {table} ({column}, year, quarter, registered_users)
                 VALUES (?1, ?2, ?3, ?4)"
            ),
            params![&r.entity_name, r.year, r.quarter, r.registered_users],
        )?;
        Ok(())
    }

    /// Run `f` inside a single transaction; bulk loads are much faster.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> DashResult<T>) -> DashResult<T> {
        self.conn.execute_batch("BEGIN;")?;
        match f(self) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(value)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(e)
            }
        }
    }
}
