//! Scenario 2: device brands, registered users and app opens.

use crate::{
    chart::{top_n_with_others, ValueText},
    dashboard::PageBuilder,
    error::DashResult,
    filter::{Predicate, Source},
    query::{ranking_query, GroupKey, Measure},
    session::RenderContext,
};

pub fn render(ctx: &RenderContext<'_>, page: &mut PageBuilder) -> DashResult<()> {
    let renderer = ctx.renderer();
    let limits = &ctx.config.rankings;
    let palettes = &ctx.config.palettes;

    // ── Users by brand ──────────────────────────────────────────────
    let brands = ctx.fetch(&ranking_query(
        Source::AggregatedUser,
        GroupKey::UserBrand,
        Measure::UserCount,
        Predicate::for_source(Source::AggregatedUser),
        Some(limits.device_brands),
    ))?;
    if brands.is_empty() {
        page.warning("No user data available.");
    } else {
        let title = format!("Top {} Device Brands by Users", brands.len());
        page.chart(
            renderer
                .horizontal_bar(&brands, "user_brand", Measure::UserCount.alias(), &title, &palettes.device)
                .axes("Total Users", "Brand"),
        );
    }

    // ── Registered users by state ───────────────────────────────────
    let registered = ctx.fetch_normalized(
        &ranking_query(
            Source::MapUser,
            GroupKey::State,
            Measure::RegisteredUsers,
            Predicate::for_source(Source::MapUser),
            Some(limits.registered_users),
        ),
        GroupKey::State,
    )?;
    if registered.is_empty() {
        page.warning("No data available.");
    } else {
        let title = format!("Top {} States by Registered Users", registered.len());
        page.chart(
            renderer
                .horizontal_bar(&registered, "state", Measure::RegisteredUsers.alias(), &title, &[])
                .axes("Registered Users", "State")
                .color_scale("viridis"),
        );
    }

    // ── App opens share ─────────────────────────────────────────────
    let opens = ctx.fetch_normalized(
        &ranking_query(
            Source::MapUser,
            GroupKey::State,
            Measure::AppOpens,
            Predicate::for_source(Source::MapUser),
            None,
        ),
        GroupKey::State,
    )?;
    if opens.is_empty() {
        page.warning("No data available.");
    } else {
        let slices = top_n_with_others(opens.pairs("state", Measure::AppOpens.alias()), limits.app_opens);
        let title = format!("App Opens Share - Top {} States", limits.app_opens);
        page.chart(
            renderer
                .pie(slices, &title, Some(0.45), ValueText::PercentOnly, &palettes.donut)
                .legend_title("State"),
        );
    }
    Ok(())
}
