//! Typed filter predicates.
//!
//! RULE: every table declares which filter dimensions it carries.
//! Adding a predicate on a dimension the table does not declare is a
//! no-op, so a filter that cannot apply is dropped the same way in every
//! query instead of failing at execution time.
//!
//! Filter values are always bound as parameters. Table and column names
//! come only from the closed enums below.

use rusqlite::types::{ToSql, ToSqlOutput};
use serde::{Deserialize, Serialize};

/// A column that can appear in a WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    State,
    Year,
    Quarter,
}

impl Dimension {
    pub fn column(self) -> &'static str {
        match self {
            Dimension::State   => "state",
            Dimension::Year    => "year",
            Dimension::Quarter => "quarter",
        }
    }
}

/// Every table the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    AggregatedTransaction,
    AggregatedUser,
    MapUser,
    AggregatedInsurance,
    TopStateTransaction,
    TopDistrictTransaction,
    TopPincodeTransaction,
    TopUserState,
    TopUserDistrict,
    TopUserPincode,
}

impl Source {
    pub const ALL: [Source; 10] = [
        Source::AggregatedTransaction,
        Source::AggregatedUser,
        Source::MapUser,
        Source::AggregatedInsurance,
        Source::TopStateTransaction,
        Source::TopDistrictTransaction,
        Source::TopPincodeTransaction,
        Source::TopUserState,
        Source::TopUserDistrict,
        Source::TopUserPincode,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            Source::AggregatedTransaction  => "aggregated_transaction",
            Source::AggregatedUser         => "aggregated_user",
            Source::MapUser                => "map_user",
            Source::AggregatedInsurance    => "aggregated_insurance",
            Source::TopStateTransaction    => "top_state_transaction",
            Source::TopDistrictTransaction => "top_district_transaction",
            Source::TopPincodeTransaction  => "top_pincode_transaction",
            Source::TopUserState           => "top_user_state",
            Source::TopUserDistrict        => "top_user_district",
            Source::TopUserPincode         => "top_user_pincode",
        }
    }

    /// Filter dimensions this table carries.
    pub fn dimensions(self) -> &'static [Dimension] {
        use Dimension::*;
        match self {
            Source::AggregatedTransaction  => &[State, Year, Quarter],
            Source::AggregatedUser         => &[],
            Source::MapUser                => &[State],
            Source::AggregatedInsurance    => &[State, Year],
            Source::TopStateTransaction    => &[State, Year],
            Source::TopDistrictTransaction => &[Year],
            Source::TopPincodeTransaction  => &[Year],
            Source::TopUserState           => &[State, Year, Quarter],
            Source::TopUserDistrict        => &[Year, Quarter],
            Source::TopUserPincode         => &[Year, Quarter],
        }
    }

    pub fn supports(self, dimension: Dimension) -> bool {
        self.dimensions().contains(&dimension)
    }
}

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl ToSql for FilterValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            FilterValue::Integer(i) => i.to_sql(),
            FilterValue::Text(s)    => s.to_sql(),
        }
    }
}

/// Conjunction of equality filters against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    source:  Source,
    clauses: Vec<(Dimension, FilterValue)>,
}

impl Predicate {
    pub fn for_source(source: Source) -> Self {
        Self { source, clauses: Vec::new() }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Add `dimension = value`. Dropped if the table lacks the dimension,
    /// and a second filter on the same dimension replaces the first.
    pub fn with(mut self, dimension: Dimension, value: impl Into<FilterValue>) -> Self {
        if !self.source.supports(dimension) {
            log::debug!(
                "filter on {} not applicable to {}; omitted",
                dimension.column(),
                self.source.table_name()
            );
            return self;
        }
        let value = value.into();
        match self.clauses.iter_mut().find(|(d, _)| *d == dimension) {
            Some(existing) => existing.1 = value,
            None => self.clauses.push((dimension, value)),
        }
        self
    }

    /// Like `with`, but `None` means "no filter".
    pub fn with_opt<V: Into<FilterValue>>(self, dimension: Dimension, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(dimension, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Dimensions actually applied, in insertion order.
    pub fn dimensions(&self) -> Vec<Dimension> {
        self.clauses.iter().map(|(d, _)| *d).collect()
    }

    /// `" WHERE a = ?1 AND b = ?2"`, or an empty string with no clauses.
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .clauses
            .iter()
            .enumerate()
            .map(|(i, (d, _))| format!("{} = ?{}", d.column(), i + 1))
            .collect();
        format!(" WHERE {}", parts.join(" AND "))
    }

    pub fn params(&self) -> Vec<FilterValue> {
        self.clauses.iter().map(|(_, v)| v.clone()).collect()
    }
}
