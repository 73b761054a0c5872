//! Scenario 3: insurance penetration.
//!
//! Trend lines follow the state filter ("All" sums every state). Rankings
//! use the selected year, or the latest year on record when "All".

use super::{integers, labels, with_all};
use crate::{
    chart::{bottom_k_positive, ValueText},
    dashboard::PageBuilder,
    error::DashResult,
    filter::{Dimension, Predicate, Source},
    names::{normalize_state, normalize_state_column},
    query::{bottom_k_query, ranking_query, trend_query, GroupKey, Measure, OrderBy, QueryBuilder, SortOrder},
    selection::Selection,
    session::RenderContext,
};

const SOURCE: Source = Source::AggregatedInsurance;

pub fn render(ctx: &RenderContext<'_>, selection: &Selection, page: &mut PageBuilder) -> DashResult<()> {
    let renderer = ctx.renderer();
    let limits = &ctx.config.rankings;
    let palettes = &ctx.config.palettes;

    let mut preview = ctx.fetch(
        &QueryBuilder::new("insurance_preview", SOURCE)
            .group_by(GroupKey::State)
            .group_by(GroupKey::Year)
            .measures(&[Measure::InsuranceAmount, Measure::InsuranceCount])
            .order(OrderBy::Measure(SortOrder::Desc))
            .limit(limits.preview_rows)
            .build(),
    )?;
    if preview.is_empty() {
        page.warning("No insurance data available.");
        return Ok(());
    }
    normalize_state_column(&mut preview, "state");

    let states = labels(&ctx.distinct(SOURCE, Dimension::State, SortOrder::Asc)?);
    let year_options = integers(&ctx.distinct(SOURCE, Dimension::Year, SortOrder::Asc)?);
    let state = selection.state.resolve_with_all(&states);
    let year = selection.year.resolve_with_all(&year_options);
    page.select("state", "State", with_all(&states), state.display());
    page.select("year", "Year", with_all(&year_options), year.display());

    // ── Trend ───────────────────────────────────────────────────────
    let trend = ctx.fetch(&trend_query(
        SOURCE,
        &[Measure::InsuranceAmount, Measure::InsuranceCount],
        Predicate::for_source(SOURCE).with_opt(Dimension::State, state.value().cloned()),
    ))?;
    let scope = state
        .value()
        .map(|s| normalize_state(s))
        .unwrap_or_else(|| "All states".to_string());
    if trend.is_empty() {
        page.info(format!("No insurance trend for {scope}."));
    } else {
        page.chart(
            renderer
                .line(&trend, "year", Measure::InsuranceAmount.alias(), &format!("Total Insurance Amount - {scope}"))
                .axes("Year", "Amount"),
        );
        page.chart(
            renderer
                .line(&trend, "year", Measure::InsuranceCount.alias(), &format!("Total Insurance Count - {scope}"))
                .axes("Year", "Count"),
        );
    }

    // ── Rankings for one year ───────────────────────────────────────
    let Some(use_year) = year.value().copied().or_else(|| year_options.iter().max().copied()) else {
        page.info("No insurance years on record.");
        return Ok(());
    };
    let by_year = Predicate::for_source(SOURCE).with(Dimension::Year, use_year);

    let top = ctx.fetch_normalized(
        &ranking_query(
            SOURCE,
            GroupKey::State,
            Measure::InsuranceAmount,
            by_year.clone(),
            Some(limits.insurance_top),
        ),
        GroupKey::State,
    )?;
    if top.is_empty() {
        page.info(format!("No insurance amounts for {use_year}."));
    } else {
        page.chart(
            renderer
                .bar(
                    &top,
                    "state",
                    Measure::InsuranceAmount.alias(),
                    &format!("Top {} States by Amount - {use_year}", limits.insurance_top),
                    ValueText::Human,
                    &palettes.insurance,
                )
                .axes("State", "Amount"),
        );
    }

    let bottom = ctx.fetch_normalized(
        &bottom_k_query(
            SOURCE,
            GroupKey::State,
            Measure::InsuranceAmount,
            by_year,
            limits.insurance_bottom,
        ),
        GroupKey::State,
    )?;
    let slices = bottom_k_positive(
        bottom.pairs("state", Measure::InsuranceAmount.alias()),
        limits.insurance_bottom,
    );
    if slices.is_empty() {
        page.info("No data for pie chart (no positive amounts).");
    } else {
        page.chart(
            renderer
                .pie(
                    slices,
                    &format!("Bottom {} States by Amount - {use_year}", limits.insurance_bottom),
                    Some(0.45),
                    ValueText::LabelPercent,
                    &[],
                )
                .color_scale("Aggrnyl"),
        );
    }

    page.table("Show data (preview)", preview);
    Ok(())
}
