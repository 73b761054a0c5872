//! Scenario dispatch.
//!
//! Each scenario module renders into a `PageBuilder` and owns its filter
//! widgets. Empty results become notices; only store failures return `Err`.

pub mod devices;
pub mod geography;
pub mod home;
pub mod insurance;
pub mod registration;
pub mod transactions;

use crate::{
    dashboard::PageBuilder,
    error::DashResult,
    selection::{Scenario, Selection},
    session::RenderContext,
    table::Cell,
    types::Year,
};

pub fn render(ctx: &RenderContext<'_>, selection: &Selection, page: &mut PageBuilder) -> DashResult<()> {
    page.title = "Business Case Study Analysis".to_string();
    page.select(
        "scenario",
        "Choose a Case Study",
        Scenario::ALL.iter().map(|s| s.label()).collect(),
        selection.scenario.label(),
    );
    page.heading(selection.scenario.label());

    match selection.scenario {
        Scenario::TransactionDynamics  => transactions::render(ctx, selection, page),
        Scenario::DeviceDominance      => devices::render(ctx, page),
        Scenario::InsurancePenetration => insurance::render(ctx, selection, page),
        Scenario::TransactionGeography => geography::render(ctx, selection, page),
        Scenario::UserRegistration     => registration::render(ctx, selection, page),
    }
}

/// Option labels from distinct-value cells.
pub(crate) fn labels(cells: &[Cell]) -> Vec<String> {
    cells.iter().map(Cell::to_label).collect()
}

/// Integral option values (years, quarters); other cells are skipped.
pub(crate) fn integers(cells: &[Cell]) -> Vec<Year> {
    cells.iter().filter_map(Cell::as_i64).collect()
}

/// "All" followed by the given options.
pub(crate) fn with_all<T: ToString>(options: &[T]) -> Vec<String> {
    std::iter::once("All".to_string())
        .chain(options.iter().map(|o| o.to_string()))
        .collect()
}
