//! Scenario 5: registered users by state, district and pincode.
//!
//! The year and quarter options come from `top_user_state`. If that lookup
//! fails the filter is simply not offered. Each level's table applies only
//! the filter dimensions it carries.

use super::{integers, with_all};
use crate::{
    chart::{ChartSpec, ValueText},
    dashboard::PageBuilder,
    error::DashResult,
    filter::{Dimension, Predicate, Source},
    query::{ranking_query, GroupKey, Measure, SortOrder},
    records::EntityLevel,
    selection::{Choice, RegistrationFilter, Selection},
    session::RenderContext,
    table::ResultTable,
    types::{Quarter, Year},
};

pub fn render(ctx: &RenderContext<'_>, selection: &Selection, page: &mut PageBuilder) -> DashResult<()> {
    page.radio(
        "filter_by",
        "Filter by",
        RegistrationFilter::ALL.iter().map(|f| f.label().to_string()).collect(),
        selection.filter_by.label(),
    );

    let year_options: Vec<Year> =
        integers(&ctx.distinct_or_empty(Source::TopUserState, Dimension::Year, SortOrder::Desc));
    let quarter_options: Vec<Quarter> =
        integers(&ctx.distinct_or_empty(Source::TopUserState, Dimension::Quarter, SortOrder::Desc));

    let mut year: Choice<Year> = Choice::All;
    let mut quarter: Choice<Quarter> = Choice::All;
    match selection.filter_by {
        RegistrationFilter::Year if !year_options.is_empty() => {
            year = selection.year.resolve_with_all(&year_options);
            page.select("year", "Select Year", with_all(&year_options), year.display());
        }
        RegistrationFilter::Quarter if !quarter_options.is_empty() => {
            quarter = selection.quarter.resolve_with_all(&quarter_options);
            page.select("quarter", "Select Quarter", with_all(&quarter_options), quarter.display());
        }
        _ => {}
    }

    for level in EntityLevel::ALL {
        render_level(ctx, selection, page, level, &year, &quarter)?;
    }
    Ok(())
}

fn level_source(level: EntityLevel) -> (Source, GroupKey) {
    match level {
        EntityLevel::State    => (Source::TopUserState, GroupKey::State),
        EntityLevel::District => (Source::TopUserDistrict, GroupKey::District),
        EntityLevel::Pincode  => (Source::TopUserPincode, GroupKey::Pincode),
    }
}

fn render_level(
    ctx:       &RenderContext<'_>,
    selection: &Selection,
    page:      &mut PageBuilder,
    level:     EntityLevel,
    year:      &Choice<Year>,
    quarter:   &Choice<Quarter>,
) -> DashResult<()> {
    let (source, key) = level_source(level);
    let limit = ctx.config.rankings.registration;
    let name = level.label();

    page.heading(format!("Registered Users - {} wise", name.to_uppercase()));

    let predicate = Predicate::for_source(source)
        .with_opt(Dimension::Year, year.value().copied())
        .with_opt(Dimension::Quarter, quarter.value().copied());
    let table = ctx.fetch_normalized(
        &ranking_query(source, key, Measure::RegisteredUsers, predicate, Some(limit)),
        key,
    )?;
    if table.is_empty() {
        page.warning(format!("No {}-level registration data available.", name.to_lowercase()));
        return Ok(());
    }

    page.chart(level_chart(ctx, level, &table, key, limit));

    let options = table.labels(key.column());
    let chosen = selection.inspect.get(level).resolve_with_all(&options);
    let widget_key = format!("inspect_{}", key.column());
    page.select(
        &widget_key,
        &format!("Inspect {} (select to view details):", name.to_lowercase()),
        with_all(&options),
        chosen.display(),
    );
    if let Some(value) = chosen.value() {
        page.table(format!("{name} detail"), table.rows_matching(key.column(), value));
    }
    Ok(())
}

fn level_chart(
    ctx:   &RenderContext<'_>,
    level: EntityLevel,
    table: &ResultTable,
    key:   GroupKey,
    limit: usize,
) -> ChartSpec {
    let renderer = ctx.renderer();
    let palette = &ctx.config.palettes.brand;
    let users = Measure::RegisteredUsers.alias();
    let col = key.column();
    match level {
        EntityLevel::State => renderer
            .bar(table, col, users, &format!("Top {limit} States by Registered Users"), ValueText::Human, palette)
            .axes("State", "Registered Users"),
        EntityLevel::District => renderer
            .line(table, col, users, &format!("Top {limit} Districts by Registered Users (ranked)"))
            .axes("District", "Registered Users")
            .categorical(),
        EntityLevel::Pincode => renderer.pie(
            table.pairs(col, users),
            &format!("Top {limit} Pincodes by Registered Users"),
            None,
            ValueText::LabelPercent,
            palette,
        ),
    }
}
