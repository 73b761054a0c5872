//! Aggregation query construction.
//!
//! Every chart is backed by exactly one `AggregateQuery`. Queries are plain
//! values: building the same query twice yields equal SQL and equal
//! parameters, so a selection always maps to the same predicates.
//!
//! Ranking ties are broken by the grouping key ascending.

use crate::{
    filter::{Dimension, FilterValue, Predicate, Source},
    types::Year,
};
use serde::{Deserialize, Serialize};

/// A summed metric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    TransactionCount,
    TransactionAmount,
    UserCount,
    RegisteredUsers,
    AppOpens,
    InsuranceCount,
    InsuranceAmount,
}

impl Measure {
    pub fn column(self) -> &'static str {
        match self {
            Measure::TransactionCount  => "transaction_count",
            Measure::TransactionAmount => "transaction_amount",
            Measure::UserCount         => "user_count",
            Measure::RegisteredUsers   => "registered_users",
            Measure::AppOpens          => "app_opens",
            Measure::InsuranceCount    => "insurance_count",
            Measure::InsuranceAmount   => "insurance_amount",
        }
    }

    /// Result column name for the summed measure.
    pub fn alias(self) -> &'static str {
        match self {
            Measure::TransactionCount  => "total_transaction_count",
            Measure::TransactionAmount => "total_transaction_amount",
            Measure::UserCount         => "total_user_count",
            Measure::RegisteredUsers   => "total_registered_users",
            Measure::AppOpens          => "total_app_opens",
            Measure::InsuranceCount    => "total_insurance_count",
            Measure::InsuranceAmount   => "total_insurance_amount",
        }
    }

    /// Nulls sum as zero.
    fn sum_expr(self) -> String {
        format!("SUM(COALESCE({}, 0))", self.column())
    }
}

/// A GROUP BY column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    State,
    Year,
    Quarter,
    TransactionType,
    District,
    Pincode,
    UserBrand,
}

impl GroupKey {
    pub fn column(self) -> &'static str {
        match self {
            GroupKey::State           => "state",
            GroupKey::Year            => "year",
            GroupKey::Quarter         => "quarter",
            GroupKey::TransactionType => "transaction_type",
            GroupKey::District        => "district",
            GroupKey::Pincode         => "pincode",
            GroupKey::UserBrand       => "user_brand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc  => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Row ordering of a grouped query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    /// Grouping keys ascending.
    Keys,
    /// First measure in the given direction, then keys ascending.
    Measure(SortOrder),
}

/// A fully built, parameterized read query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateQuery {
    pub label:  String,
    pub source: Source,
    pub sql:    String,
    pub params: Vec<FilterValue>,
}

/// Incremental builder for `SELECT keys, SUM(measures) ... GROUP BY keys`.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    label:         String,
    source:        Source,
    keys:          Vec<GroupKey>,
    measures:      Vec<Measure>,
    predicate:     Predicate,
    order:         OrderBy,
    positive_only: bool,
    text_keys:     bool,
    limit:         Option<usize>,
}

impl QueryBuilder {
    pub fn new(label: impl Into<String>, source: Source) -> Self {
        Self {
            label: label.into(),
            source,
            keys: Vec::new(),
            measures: Vec::new(),
            predicate: Predicate::for_source(source),
            order: OrderBy::Keys,
            positive_only: false,
            text_keys: false,
            limit: None,
        }
    }

    pub fn group_by(mut self, key: GroupKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn measure(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self
    }

    pub fn measures(mut self, measures: &[Measure]) -> Self {
        self.measures.extend_from_slice(measures);
        self
    }

    /// Replace the predicate. Its source must match the builder's; a
    /// predicate for another table is ignored.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        if predicate.source() == self.source {
            self.predicate = predicate;
        } else {
            log::warn!(
                "query '{}': predicate for {} ignored on {}",
                self.label,
                predicate.source().table_name(),
                self.source.table_name()
            );
        }
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order = order;
        self
    }

    /// Drop groups whose first measure sums to zero or less.
    pub fn positive_only(mut self) -> Self {
        self.positive_only = true;
        self
    }

    /// Return grouping keys as text, whatever their storage type.
    pub fn text_keys(mut self) -> Self {
        self.text_keys = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> AggregateQuery {
        let key_cols: Vec<&str> = self.keys.iter().map(|k| k.column()).collect();

        let mut select: Vec<String> = key_cols
            .iter()
            .map(|c| {
                if self.text_keys {
                    format!("CAST({c} AS TEXT) AS {c}")
                } else {
                    c.to_string()
                }
            })
            .collect();
        select.extend(
            self.measures
                .iter()
                .map(|m| format!("{} AS {}", m.sum_expr(), m.alias())),
        );

        let mut sql = format!(
            "SELECT {} FROM {}{}",
            select.join(", "),
            self.source.table_name(),
            self.predicate.where_clause()
        );
        if !key_cols.is_empty() {
            sql.push_str(&format!(" GROUP BY {}", key_cols.join(", ")));
        }
        if self.positive_only {
            if let Some(first) = self.measures.first() {
                sql.push_str(&format!(" HAVING {} > 0", first.sum_expr()));
            }
        }

        // Text keys shadow their column by alias; order on the stored value
        // so numeric keys keep numeric order.
        let table = self.source.table_name();
        let key_order = key_cols
            .iter()
            .map(|c| {
                if self.text_keys {
                    format!("{table}.{c} ASC")
                } else {
                    format!("{c} ASC")
                }
            })
            .collect::<Vec<_>>();
        let order_terms: Vec<String> = match (self.order, self.measures.first()) {
            (OrderBy::Measure(dir), Some(m)) => std::iter::once(format!("{} {}", m.alias(), dir.sql()))
                .chain(key_order)
                .collect(),
            _ => key_order,
        };
        if !order_terms.is_empty() {
            sql.push_str(&format!(" ORDER BY {}", order_terms.join(", ")));
        }

        let mut params = self.predicate.params();
        if let Some(limit) = self.limit {
            params.push(FilterValue::Integer(limit as i64));
            sql.push_str(&format!(" LIMIT ?{}", params.len()));
        }

        AggregateQuery {
            label: self.label,
            source: self.source,
            sql,
            params,
        }
    }
}

// ── Named query shapes ────────────────────────────────────────────────

/// Measures summed per year, oldest year first.
pub fn trend_query(source: Source, measures: &[Measure], predicate: Predicate) -> AggregateQuery {
    QueryBuilder::new("trend", source)
        .group_by(GroupKey::Year)
        .measures(measures)
        .filter(predicate)
        .order(OrderBy::Keys)
        .build()
}

/// Measures summed per categorical key, key returned as text.
pub fn breakdown_query(
    source:    Source,
    key:       GroupKey,
    measures:  &[Measure],
    predicate: Predicate,
) -> AggregateQuery {
    QueryBuilder::new(format!("breakdown_by_{}", key.column()), source)
        .group_by(key)
        .measures(measures)
        .filter(predicate)
        .text_keys()
        .order(OrderBy::Keys)
        .build()
}

/// Highest `limit` groups by `measure`; `None` returns every group, still ranked.
pub fn ranking_query(
    source:    Source,
    key:       GroupKey,
    measure:   Measure,
    predicate: Predicate,
    limit:     Option<usize>,
) -> AggregateQuery {
    let builder = QueryBuilder::new(format!("top_{}", key.column()), source)
        .group_by(key)
        .measure(measure)
        .filter(predicate)
        .order(OrderBy::Measure(SortOrder::Desc));
    match limit {
        Some(n) => builder.limit(n).build(),
        None => builder.build(),
    }
}

/// Lowest `k` groups with a strictly positive `measure`.
pub fn bottom_k_query(
    source:    Source,
    key:       GroupKey,
    measure:   Measure,
    predicate: Predicate,
    k:         usize,
) -> AggregateQuery {
    QueryBuilder::new(format!("bottom_{}", key.column()), source)
        .group_by(key)
        .measure(measure)
        .filter(predicate)
        .positive_only()
        .order(OrderBy::Measure(SortOrder::Asc))
        .limit(k)
        .build()
}

/// Distinct non-null values of a filter column, or `None` when the table
/// does not carry that dimension.
pub fn distinct_query(source: Source, dimension: Dimension, order: SortOrder) -> Option<AggregateQuery> {
    if !source.supports(dimension) {
        return None;
    }
    let col = dimension.column();
    Some(AggregateQuery {
        label: format!("distinct_{col}"),
        source,
        sql: format!(
            "SELECT DISTINCT {col} FROM {} WHERE {col} IS NOT NULL ORDER BY {col} {}",
            source.table_name(),
            order.sql()
        ),
        params: Vec::new(),
    })
}

// ── Mode dispatch ─────────────────────────────────────────────────────

/// Grouping level of the transaction geography view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayMode {
    Year,
    State,
    District,
    Pincode,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::Year,
        DisplayMode::State,
        DisplayMode::District,
        DisplayMode::Pincode,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Year     => "Year",
            DisplayMode::State    => "State",
            DisplayMode::District => "District",
            DisplayMode::Pincode  => "Pincode",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Table ranked in this mode.
    pub fn ranking_source(self) -> Source {
        match self {
            DisplayMode::Year     => Source::AggregatedTransaction,
            DisplayMode::State    => Source::TopStateTransaction,
            DisplayMode::District => Source::TopDistrictTransaction,
            DisplayMode::Pincode  => Source::TopPincodeTransaction,
        }
    }

    /// Table the yearly trend line reads in this mode.
    pub fn trend_source(self) -> Source {
        match self {
            DisplayMode::Year | DisplayMode::State => Source::AggregatedTransaction,
            DisplayMode::District => Source::TopDistrictTransaction,
            DisplayMode::Pincode  => Source::TopPincodeTransaction,
        }
    }

    pub fn key(self) -> GroupKey {
        match self {
            DisplayMode::Year     => GroupKey::Year,
            DisplayMode::State    => GroupKey::State,
            DisplayMode::District => GroupKey::District,
            DisplayMode::Pincode  => GroupKey::Pincode,
        }
    }
}

/// The query pair behind the transaction geography view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeQueries {
    pub ranking: AggregateQuery,
    pub trend:   AggregateQuery,
}

/// Pick the source table for `mode` and apply the year filter to both
/// queries wherever the table carries a year column.
pub fn mode_queries(mode: DisplayMode, year: Option<Year>, top_n: usize) -> ModeQueries {
    let ranking_source = mode.ranking_source();
    let trend_source = mode.trend_source();

    let ranking = ranking_query(
        ranking_source,
        mode.key(),
        Measure::TransactionAmount,
        Predicate::for_source(ranking_source).with_opt(Dimension::Year, year),
        Some(top_n),
    );
    let trend = trend_query(
        trend_source,
        &[Measure::TransactionAmount],
        Predicate::for_source(trend_source).with_opt(Dimension::Year, year),
    );
    ModeQueries { ranking, trend }
}
