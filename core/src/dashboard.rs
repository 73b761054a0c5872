//! The dashboard: one selection in, one rendered page out.
//!
//! FLOW (every pass, no reuse between passes):
//!   1. Open a fresh read-only connection.
//!   2. Resolve filter options from the tables and clamp the selection.
//!   3. Issue the scenario's queries, one per chart.
//!   4. Turn each result into a chart spec, or a notice when it is empty.
//!   5. Drop the connection, on success and on error alike.

use crate::{
    chart::ChartSpec,
    config::DashConfig,
    error::DashResult,
    scenario,
    selection::{Page, Selection},
    session::RenderContext,
    store::PulseStore,
    table::ResultTable,
    types::RequestId,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Select,
    Radio,
    Slider { min: usize, max: usize },
}

/// A filter control with the options it offers this pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub key: String,
    pub label: String,
    pub kind: WidgetKind,
    pub options: Vec<String>,
    pub selected: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum Panel {
    Heading { text: String },
    Chart { chart: ChartSpec },
    Notice { level: NoticeLevel, message: String },
    Table { title: String, table: ResultTable },
}

/// Everything one pass produced.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub request_id: RequestId,
    pub rendered_at: String,
    pub page: Page,
    pub title: String,
    pub widgets: Vec<Widget>,
    pub panels: Vec<Panel>,
    pub queries_issued: usize,
}

impl RenderedPage {
    pub fn charts(&self) -> Vec<&ChartSpec> {
        self.panels
            .iter()
            .filter_map(|p| match p {
                Panel::Chart { chart } => Some(chart),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<&str> {
        self.panels
            .iter()
            .filter_map(|p| match p {
                Panel::Notice { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn widget(&self, key: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.key == key)
    }
}

/// Collects widgets and panels while a scenario renders.
#[derive(Debug, Default)]
pub struct PageBuilder {
    pub title: String,
    pub widgets: Vec<Widget>,
    pub panels: Vec<Panel>,
}

impl PageBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn heading(&mut self, text: impl Into<String>) {
        self.panels.push(Panel::Heading { text: text.into() });
    }

    pub fn chart(&mut self, chart: ChartSpec) {
        self.panels.push(Panel::Chart { chart });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.panels.push(Panel::Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        });
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.panels.push(Panel::Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        });
    }

    pub fn table(&mut self, title: impl Into<String>, table: ResultTable) {
        self.panels.push(Panel::Table {
            title: title.into(),
            table,
        });
    }

    pub fn select(&mut self, key: &str, label: &str, options: Vec<String>, selected: impl Into<String>) {
        self.widget(key, label, WidgetKind::Select, options, selected);
    }

    pub fn radio(&mut self, key: &str, label: &str, options: Vec<String>, selected: impl Into<String>) {
        self.widget(key, label, WidgetKind::Radio, options, selected);
    }

    pub fn slider(&mut self, key: &str, label: &str, min: usize, max: usize, value: usize) {
        self.widget(key, label, WidgetKind::Slider { min, max }, Vec::new(), value.to_string());
    }

    fn widget(&mut self, key: &str, label: &str, kind: WidgetKind, options: Vec<String>, selected: impl Into<String>) {
        self.widgets.push(Widget {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            options,
            selected: selected.into(),
        });
    }
}

/// Render `selection` against an already-open source.
///
/// Output panels and widgets depend only on the selection and the data;
/// the request id and timestamp are the only per-pass values.
pub fn render_page(ctx: &RenderContext<'_>, selection: &Selection) -> DashResult<RenderedPage> {
    let mut page = PageBuilder::default();
    match selection.page {
        Page::Home => scenario::home::render(ctx, &mut page)?,
        Page::Analysis => scenario::render(ctx, selection, &mut page)?,
    }
    log::info!(
        "[{}] rendered {:?}/{:?}: {} panels, {} queries",
        ctx.request_id,
        selection.page,
        selection.scenario,
        page.panels.len(),
        ctx.query_count()
    );
    Ok(RenderedPage {
        request_id: ctx.request_id.clone(),
        rendered_at: ctx.started_at.to_rfc3339(),
        page: selection.page,
        title: page.title,
        widgets: page.widgets,
        panels: page.panels,
        queries_issued: ctx.query_count(),
    })
}

/// Dashboard bound to one database path. Each `render` call owns its own
/// connection for the duration of the pass.
pub struct Dashboard {
    db_path: String,
    config: DashConfig,
}

impl Dashboard {
    pub fn new(db_path: impl Into<String>, config: DashConfig) -> Self {
        Self {
            db_path: db_path.into(),
            config,
        }
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    pub fn render(&self, selection: &Selection) -> DashResult<RenderedPage> {
        let store = PulseStore::open_read_only(&self.db_path)?;
        let ctx = RenderContext::new(&store, &self.config);
        render_page(&ctx, selection)
    }
}
