//! Scenario 1: transaction dynamics for one state.
//!
//! Charts: yearly count and amount trend for the state, quarter and
//! transaction-type breakdowns for state + year, and the top states for
//! that year.

use super::{integers, labels};
use crate::{
    chart::ValueText,
    dashboard::PageBuilder,
    error::DashResult,
    filter::{Dimension, Predicate, Source},
    query::{breakdown_query, ranking_query, trend_query, GroupKey, Measure, SortOrder},
    selection::Selection,
    session::RenderContext,
    types::Year,
};

const SOURCE: Source = Source::AggregatedTransaction;

pub fn render(ctx: &RenderContext<'_>, selection: &Selection, page: &mut PageBuilder) -> DashResult<()> {
    let renderer = ctx.renderer();
    let palettes = &ctx.config.palettes;

    let states = labels(&ctx.distinct(SOURCE, Dimension::State, SortOrder::Asc)?);
    let Some(state) = selection.state.resolve_required(&states) else {
        page.warning("No transaction data available.");
        return Ok(());
    };
    page.select("state", "Select a State", states.clone(), state.clone());

    // ── Yearly trend ────────────────────────────────────────────────
    let trend = ctx.fetch(&trend_query(
        SOURCE,
        &[Measure::TransactionCount, Measure::TransactionAmount],
        Predicate::for_source(SOURCE).with(Dimension::State, state.as_str()),
    ))?;
    if trend.is_empty() {
        page.info(format!("No yearly transaction data for {state}."));
    } else {
        page.chart(
            renderer
                .line(&trend, "year", Measure::TransactionCount.alias(), "Transaction Count Over Years")
                .axes("Year", "Transaction Count"),
        );
        page.chart(
            renderer
                .line(&trend, "year", Measure::TransactionAmount.alias(), "Transaction Amount Over Years")
                .axes("Year", "Transaction Amount"),
        );
    }

    let year_options: Vec<Year> = integers(&ctx.distinct(SOURCE, Dimension::Year, SortOrder::Asc)?);
    let Some(year) = selection.year.resolve_required(&year_options) else {
        page.warning("No years available for transaction data.");
        return Ok(());
    };
    page.select(
        "year",
        "Select a Year",
        year_options.iter().map(|y| y.to_string()).collect(),
        year.to_string(),
    );

    let state_year = Predicate::for_source(SOURCE)
        .with(Dimension::State, state.as_str())
        .with(Dimension::Year, year);

    // ── Quarter breakdown ───────────────────────────────────────────
    let quarters = ctx.fetch(&breakdown_query(
        SOURCE,
        GroupKey::Quarter,
        &[Measure::TransactionCount, Measure::TransactionAmount],
        state_year.clone(),
    ))?;
    if quarters.is_empty() {
        page.info(format!("No quarterly data for {state} in {year}."));
    } else {
        page.chart(
            renderer
                .bar(
                    &quarters,
                    "quarter",
                    Measure::TransactionAmount.alias(),
                    "Quarter-wise Transaction Amount",
                    ValueText::Human,
                    &palettes.quarter,
                )
                .axes("Quarter", "Transaction Amount"),
        );
    }

    // ── Category breakdown ──────────────────────────────────────────
    let categories = ctx.fetch(&breakdown_query(
        SOURCE,
        GroupKey::TransactionType,
        &[Measure::TransactionCount, Measure::TransactionAmount],
        state_year,
    ))?;
    if categories.is_empty() {
        page.info(format!("No transaction categories for {state} in {year}."));
    } else {
        let key = GroupKey::TransactionType.column();
        page.chart(renderer.pie(
            categories.pairs(key, Measure::TransactionCount.alias()),
            "Category-wise Count",
            None,
            ValueText::LabelPercent,
            &palettes.quarter,
        ));
        page.chart(renderer.pie(
            categories.pairs(key, Measure::TransactionAmount.alias()),
            "Category Share Amount",
            None,
            ValueText::LabelPercent,
            &palettes.category,
        ));
    }

    // ── Top states for the year ─────────────────────────────────────
    let top = ctx.fetch_normalized(
        &ranking_query(
            SOURCE,
            GroupKey::State,
            Measure::TransactionAmount,
            Predicate::for_source(SOURCE).with(Dimension::Year, year),
            Some(ctx.config.rankings.top_states),
        ),
        GroupKey::State,
    )?;
    if top.is_empty() {
        page.info(format!("No state totals for {year}."));
    } else {
        let title = format!("Top {} States in {year}", top.len());
        page.chart(
            renderer
                .bar(
                    &top,
                    "state",
                    Measure::TransactionAmount.alias(),
                    &title,
                    ValueText::Thousands,
                    &palettes.ranking,
                )
                .axes("State", "Transaction Amount"),
        );
    }
    Ok(())
}
