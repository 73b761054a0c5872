//! Query, selection and chart layer of the PhonePe Pulse dashboard.
//!
//! A rendering pass turns a `Selection` into a `RenderedPage`: filter
//! options are read fresh from the aggregate tables, each chart issues one
//! parameterized aggregation query, and results become JSON chart specs.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod demo;
pub mod error;
pub mod filter;
pub mod format;
pub mod names;
pub mod query;
pub mod records;
pub mod rng;
pub mod scenario;
pub mod selection;
pub mod session;
pub mod store;
pub mod table;
pub mod types;
