//! Per-pass request context.
//!
//! A `RenderContext` lives for exactly one rendering pass. It carries the
//! data source, the config and an id for log correlation. Nothing in it
//! survives into the next pass.

use crate::{
    chart::ChartRenderer,
    config::DashConfig,
    error::DashResult,
    filter::{Dimension, Source},
    names::normalize_state_column,
    query::{distinct_query, AggregateQuery, GroupKey, SortOrder},
    table::{Cell, ResultTable},
    types::RequestId,
};
use chrono::{DateTime, Utc};
use std::cell::Cell as Counter;

/// Anything that can answer an aggregate query.
///
/// `PulseStore` is the production implementation; tests supply mocks.
pub trait DataSource {
    fn fetch(&self, query: &AggregateQuery) -> DashResult<ResultTable>;
}

pub struct RenderContext<'a> {
    pub source:     &'a dyn DataSource,
    pub config:     &'a DashConfig,
    pub request_id: RequestId,
    pub started_at: DateTime<Utc>,
    queries:        Counter<usize>,
}

impl<'a> RenderContext<'a> {
    pub fn new(source: &'a dyn DataSource, config: &'a DashConfig) -> Self {
        Self {
            source,
            config,
            request_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            queries: Counter::new(0),
        }
    }

    pub fn renderer(&self) -> ChartRenderer<'a> {
        ChartRenderer::new(self.config)
    }

    /// Number of queries issued so far in this pass.
    pub fn query_count(&self) -> usize {
        self.queries.get()
    }

    pub fn fetch(&self, query: &AggregateQuery) -> DashResult<ResultTable> {
        self.queries.set(self.queries.get() + 1);
        let table = self.source.fetch(query)?;
        log::debug!(
            "[{}] {} -> {} rows",
            short_id(&self.request_id),
            query.label,
            table.len()
        );
        Ok(table)
    }

    /// Fetch and replace state slugs with canonical names in `key`'s column.
    pub fn fetch_normalized(&self, query: &AggregateQuery, key: GroupKey) -> DashResult<ResultTable> {
        let mut table = self.fetch(query)?;
        if key == GroupKey::State {
            normalize_state_column(&mut table, key.column());
        }
        Ok(table)
    }

    /// Distinct values of a filter column. Empty when the table has no
    /// such dimension.
    pub fn distinct(&self, source: Source, dimension: Dimension, order: SortOrder) -> DashResult<Vec<Cell>> {
        let Some(query) = distinct_query(source, dimension, order) else {
            return Ok(Vec::new());
        };
        let table = self.fetch(&query)?;
        Ok(table.rows.into_iter().filter_map(|r| r.into_iter().next()).collect())
    }

    /// Like `distinct`, but a failing lookup yields no options instead of
    /// failing the pass.
    pub fn distinct_or_empty(&self, source: Source, dimension: Dimension, order: SortOrder) -> Vec<Cell> {
        self.distinct(source, dimension, order).unwrap_or_else(|e| {
            log::warn!(
                "[{}] distinct {} on {} failed; filter not offered: {e}",
                short_id(&self.request_id),
                dimension.column(),
                source.table_name()
            );
            Vec::new()
        })
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
