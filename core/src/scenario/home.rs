//! Home page: transaction amount by state on the India map.

use crate::{
    dashboard::PageBuilder,
    error::DashResult,
    filter::{Predicate, Source},
    query::{ranking_query, GroupKey, Measure},
    session::RenderContext,
};

pub fn render(ctx: &RenderContext<'_>, page: &mut PageBuilder) -> DashResult<()> {
    page.title = "PhonePe Pulse - Interactive Analytics Dashboard".to_string();
    page.heading("India State-wise Transaction Amount Overview");

    let source = Source::AggregatedTransaction;
    let query = ranking_query(
        source,
        GroupKey::State,
        Measure::TransactionAmount,
        Predicate::for_source(source),
        None,
    );
    let table = ctx.fetch_normalized(&query, GroupKey::State)?;
    if table.is_empty() {
        page.warning("No transaction data available.");
        return Ok(());
    }

    let chart = ctx.renderer().choropleth(
        &table,
        GroupKey::State.column(),
        Measure::TransactionAmount.alias(),
        "State-wise Transaction Amount",
    );
    page.chart(chart);
    page.table("State totals", table);
    Ok(())
}
