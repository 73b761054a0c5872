//! Deterministic synthetic dataset for demos and integration tests.
//!
//! Same seed, same rows. Volumes are skewed per state (Pareto weights) and
//! grow year over year so every chart has something to rank. A few rows
//! carry null or zero measures on purpose so coercion and positive-only
//! rankings are exercised.

use crate::{
    error::DashResult,
    names::STATE_NAMES,
    records::{
        EntityLevel, InsuranceRecord, MapUserRecord, RegistrationRecord, TopEntityRecord,
        TransactionRecord, UserDeviceRecord,
    },
    rng::DemoRng,
    store::PulseStore,
    types::Year,
};
use serde::Serialize;
use std::collections::BTreeMap;

pub const FIRST_YEAR: Year = 2018;
pub const LAST_YEAR: Year = 2024;

pub const TRANSACTION_TYPES: [&str; 5] = [
    "Recharge & bill payments",
    "Peer-to-peer payments",
    "Merchant payments",
    "Financial Services",
    "Others",
];

pub const BRANDS: [&str; 12] = [
    "Xiaomi", "Samsung", "Vivo", "Oppo", "Realme", "Apple", "Motorola", "OnePlus", "Huawei",
    "Tecno", "Infinix", "Lava",
];

const DISTRICT_SUFFIXES: [&str; 3] = ["north", "central", "south"];

// Stable stream ids; never renumber.
const STREAM_WEIGHTS: u64 = 1;
const STREAM_TRANSACTIONS: u64 = 2;
const STREAM_DEVICES: u64 = 3;
const STREAM_MAP_USERS: u64 = 4;
const STREAM_INSURANCE: u64 = 5;
const STREAM_REGISTRATION: u64 = 6;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DemoSummary {
    pub rows: BTreeMap<String, usize>,
}

impl DemoSummary {
    fn add(&mut self, table: &str, n: usize) {
        *self.rows.entry(table.to_string()).or_insert(0) += n;
    }

    pub fn total(&self) -> usize {
        self.rows.values().sum()
    }
}

/// Fill an empty, migrated store with the demo dataset.
pub fn populate(store: &PulseStore, seed: u64) -> DashResult<DemoSummary> {
    let summary = store.in_transaction(|store| load_all(store, seed))?;
    log::info!(
        "demo dataset loaded: seed={seed} rows={} tables={}",
        summary.total(),
        summary.rows.len()
    );
    Ok(summary)
}

fn load_all(store: &PulseStore, seed: u64) -> DashResult<DemoSummary> {
    let mut summary = DemoSummary::default();

    let mut weight_rng = DemoRng::new(seed, STREAM_WEIGHTS);
    let weights: Vec<f64> = STATE_NAMES
        .iter()
        .map(|_| weight_rng.pareto(1.0, 1.3).min(50.0))
        .collect();

    // ── Transactions ────────────────────────────────────────────────
    let mut rng = DemoRng::new(seed, STREAM_TRANSACTIONS);
    let mut state_year_amount: BTreeMap<(usize, Year), f64> = BTreeMap::new();
    for (si, (slug, _)) in STATE_NAMES.iter().enumerate() {
        for year in FIRST_YEAR..=LAST_YEAR {
            let growth = 1.35f64.powi((year - FIRST_YEAR) as i32);
            for quarter in 1..=4 {
                for (ti, kind) in TRANSACTION_TYPES.iter().enumerate() {
                    let share = [0.22, 0.38, 0.30, 0.04, 0.06][ti];
                    let count = (weights[si] * growth * share * 100_000.0 * rng.range(0.8, 1.2)).round();
                    let ticket = [180.0, 1_900.0, 420.0, 2_600.0, 350.0][ti] * rng.range(0.9, 1.1);
                    let amount = count * ticket;
                    *state_year_amount.entry((si, year)).or_insert(0.0) += amount;
                    store.insert_transaction(&TransactionRecord {
                        state: slug.to_string(),
                        year,
                        quarter,
                        transaction_type: kind.to_string(),
                        transaction_count: Some(count as i64),
                        transaction_amount: Some(amount),
                    })?;
                    summary.add("aggregated_transaction", 1);
                }
            }
        }
    }

    // ── Ranking tables ──────────────────────────────────────────────
    for (&(si, year), &amount) in &state_year_amount {
        let (slug, _) = STATE_NAMES[si];
        store.insert_top_entity(&TopEntityRecord {
            level: EntityLevel::State,
            entity_name: slug.to_string(),
            year,
            total_amount: Some(amount),
        })?;
        summary.add("top_state_transaction", 1);

        for (di, district) in districts_of(si).iter().enumerate() {
            let split = [0.45, 0.35, 0.20][di];
            store.insert_top_entity(&TopEntityRecord {
                level: EntityLevel::District,
                entity_name: district.clone(),
                year,
                total_amount: Some(amount * split),
            })?;
            summary.add("top_district_transaction", 1);
        }
        for (pi, pincode) in pincodes_of(si).iter().enumerate() {
            let split = [0.12, 0.08, 0.05][pi];
            store.insert_top_entity(&TopEntityRecord {
                level: EntityLevel::Pincode,
                entity_name: pincode.clone(),
                year,
                total_amount: Some(amount * split),
            })?;
            summary.add("top_pincode_transaction", 1);
        }
    }

    // ── Devices ─────────────────────────────────────────────────────
    let mut rng = DemoRng::new(seed, STREAM_DEVICES);
    for brand in BRANDS {
        let users = (rng.pareto(2_000_000.0, 1.1).min(400_000_000.0)).round() as i64;
        store.insert_user_device(&UserDeviceRecord {
            user_brand: brand.to_string(),
            user_count: Some(users),
        })?;
        summary.add("aggregated_user", 1);
    }

    // ── Map users ───────────────────────────────────────────────────
    let mut rng = DemoRng::new(seed, STREAM_MAP_USERS);
    for (si, (slug, _)) in STATE_NAMES.iter().enumerate() {
        let registered = (weights[si] * 1_500_000.0 * rng.range(0.8, 1.2)).round() as i64;
        let opens = if rng.chance(0.05) {
            None
        } else {
            Some((registered as f64 * rng.range(20.0, 60.0)).round() as i64)
        };
        store.insert_map_user(&MapUserRecord {
            state: slug.to_string(),
            registered_users: Some(registered),
            app_opens: opens,
        })?;
        summary.add("map_user", 1);
    }

    // ── Insurance ───────────────────────────────────────────────────
    let mut rng = DemoRng::new(seed, STREAM_INSURANCE);
    for (si, (slug, _)) in STATE_NAMES.iter().enumerate() {
        // Insurance launched in 2020.
        for year in 2020..=LAST_YEAR {
            let growth = 1.6f64.powi((year - 2020) as i32);
            let (count, amount) = if rng.chance(0.08) {
                (0, 0.0)
            } else {
                let count = (weights[si] * growth * 2_000.0 * rng.range(0.7, 1.3)).round();
                (count as i64, count * rng.range(350.0, 900.0))
            };
            store.insert_insurance(&InsuranceRecord {
                state: slug.to_string(),
                year,
                insurance_count: Some(count),
                insurance_amount: Some(amount),
            })?;
            summary.add("aggregated_insurance", 1);
        }
    }

    // ── Registrations ───────────────────────────────────────────────
    let mut rng = DemoRng::new(seed, STREAM_REGISTRATION);
    for (si, (slug, _)) in STATE_NAMES.iter().enumerate() {
        let districts = districts_of(si);
        let pincodes = pincodes_of(si);
        for year in FIRST_YEAR..=LAST_YEAR {
            for quarter in 1..=4 {
                let base = weights[si] * 40_000.0 * (1.0 + 0.1 * (year - FIRST_YEAR) as f64);
                let entities = std::iter::once((EntityLevel::State, slug.to_string(), 1.0))
                    .chain(districts.iter().map(|d| (EntityLevel::District, d.clone(), 0.3)))
                    .chain(pincodes.iter().map(|p| (EntityLevel::Pincode, p.clone(), 0.05)));
                for (level, name, scale) in entities {
                    let users = (base * scale * rng.range(0.85, 1.15)).round() as i64;
                    store.insert_registration(&RegistrationRecord {
                        level,
                        entity_name: name,
                        year,
                        quarter,
                        registered_users: Some(users),
                    })?;
                    let table = match level {
                        EntityLevel::State    => "top_user_state",
                        EntityLevel::District => "top_user_district",
                        EntityLevel::Pincode  => "top_user_pincode",
                    };
                    summary.add(table, 1);
                }
            }
        }
    }

    Ok(summary)
}

fn districts_of(state_index: usize) -> Vec<String> {
    let (_, name) = STATE_NAMES[state_index];
    DISTRICT_SUFFIXES
        .iter()
        .map(|suffix| format!("{} {suffix} district", name.to_lowercase()))
        .collect()
}

fn pincodes_of(state_index: usize) -> Vec<String> {
    (0..3)
        .map(|k| format!("{}", 110_001 + state_index * 10_000 + k * 37))
        .collect()
}
