//! Scenario 4: transaction amount ranked by year, state, district or pincode.

use super::{integers, with_all};
use crate::{
    chart::ValueText,
    dashboard::PageBuilder,
    error::DashResult,
    filter::{Dimension, Source},
    query::{mode_queries, DisplayMode, Measure, SortOrder},
    selection::Selection,
    session::RenderContext,
};

pub fn render(ctx: &RenderContext<'_>, selection: &Selection, page: &mut PageBuilder) -> DashResult<()> {
    let renderer = ctx.renderer();
    let palette = &ctx.config.palettes.brand;
    let slider = &ctx.config.top_n_slider;

    let mode = selection.mode;
    let year_options = integers(&ctx.distinct(Source::AggregatedTransaction, Dimension::Year, SortOrder::Asc)?);
    let year = selection.year.resolve_with_all(&year_options);
    let top_n = slider.clamp(selection.top_n);

    page.radio(
        "mode",
        "Show top by",
        DisplayMode::ALL.iter().map(|m| m.label().to_string()).collect(),
        mode.label(),
    );
    page.select("year", "Year", with_all(&year_options), year.display());
    page.slider("top_n", "Top Levels", slider.min, slider.max, top_n);

    let queries = mode_queries(mode, year.value().copied(), top_n);
    let ranking = ctx.fetch_normalized(&queries.ranking, mode.key())?;
    if ranking.is_empty() {
        page.warning("No data for selection.");
        return Ok(());
    }

    let key = mode.key().column();
    let amount = Measure::TransactionAmount.alias();
    page.chart(
        renderer
            .bar(
                &ranking,
                key,
                amount,
                &format!("Top {top_n} {}s by Amount", mode.label()),
                ValueText::Human,
                palette,
            )
            .axes(mode.label(), "Amount"),
    );
    page.chart(renderer.pie(
        ranking.pairs(key, amount),
        &format!("Share - Top {top_n}"),
        Some(0.45),
        ValueText::LabelPercent,
        palette,
    ));

    let trend = ctx.fetch(&queries.trend)?;
    if !trend.is_empty() {
        page.chart(
            renderer
                .line(&trend, "year", amount, "Trend - Amount over Years")
                .axes("Year", "Amount"),
        );
    }
    Ok(())
}
