//! Page rendering against an empty store, the demo dataset and a failing
//! source. Every path must end in charts or notices, never a panic.

use pulse_core::{
    chart::{ChartKind, OTHERS_LABEL},
    config::DashConfig,
    dashboard::{render_page, Panel, RenderedPage},
    demo,
    error::{DashError, DashResult},
    names::STATE_NAMES,
    query::{AggregateQuery, DisplayMode},
    records::EntityLevel,
    selection::{Page, RegistrationFilter, Scenario, Selection, SelectionEvent},
    session::{DataSource, RenderContext},
    store::PulseStore,
    table::{Cell, ResultTable},
};
use std::cell::RefCell;

const SEED: u64 = 7;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn empty_store() -> PulseStore {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = PulseStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn demo_store() -> PulseStore {
    let store = empty_store();
    demo::populate(&store, SEED).expect("demo dataset");
    store
}

fn render(source: &dyn DataSource, selection: &Selection) -> DashResult<RenderedPage> {
    let config = DashConfig::default();
    let ctx = RenderContext::new(source, &config);
    render_page(&ctx, selection)
}

fn scenario(s: Scenario) -> Selection {
    Selection::analysis(s, &DashConfig::default())
}

fn with_events(mut selection: Selection, events: Vec<SelectionEvent>) -> Selection {
    let config = DashConfig::default();
    for event in events {
        selection.apply(event, &config);
    }
    selection
}

fn all_pages() -> Vec<Selection> {
    std::iter::once(Selection::new(&DashConfig::default()))
        .chain(Scenario::ALL.into_iter().map(scenario))
        .collect()
}

struct FailingSource;

impl DataSource for FailingSource {
    fn fetch(&self, _query: &AggregateQuery) -> DashResult<ResultTable> {
        Err(DashError::Other(anyhow::anyhow!("store offline")))
    }
}

/// Fails every distinct-value lookup and serves everything else from a
/// real store, recording what it served.
struct NoDistinctSource {
    inner: PulseStore,
    served: RefCell<Vec<AggregateQuery>>,
}

impl DataSource for NoDistinctSource {
    fn fetch(&self, query: &AggregateQuery) -> DashResult<ResultTable> {
        if query.label.starts_with("distinct_") {
            return Err(DashError::Other(anyhow::anyhow!("distinct lookup unavailable")));
        }
        self.served.borrow_mut().push(query.clone());
        self.inner.fetch(query)
    }
}

/// Answers every query with the same fixed table.
struct CannedSource(ResultTable);

impl DataSource for CannedSource {
    fn fetch(&self, _query: &AggregateQuery) -> DashResult<ResultTable> {
        Ok(self.0.clone())
    }
}

// ── Empty store ──────────────────────────────────────────────────────────────

#[test]
fn empty_store_renders_notices_on_every_page() {
    let store = empty_store();
    for selection in all_pages() {
        let page = render(&store, &selection)
            .unwrap_or_else(|e| panic!("{:?}/{:?} failed: {e}", selection.page, selection.scenario));
        assert!(page.charts().is_empty(), "{:?} drew a chart from no data", selection.scenario);
        assert!(!page.notices().is_empty(), "{:?} rendered silently", selection.scenario);
    }
}

#[test]
fn empty_store_notice_texts() {
    let store = empty_store();

    let home = render(&store, &Selection::new(&DashConfig::default())).expect("home");
    assert_eq!(home.notices(), vec!["No transaction data available."]);

    let devices = render(&store, &scenario(Scenario::DeviceDominance)).expect("devices");
    assert_eq!(
        devices.notices(),
        vec!["No user data available.", "No data available.", "No data available."]
    );

    let insurance = render(&store, &scenario(Scenario::InsurancePenetration)).expect("insurance");
    assert_eq!(insurance.notices(), vec!["No insurance data available."]);

    let geography = render(&store, &scenario(Scenario::TransactionGeography)).expect("geography");
    assert_eq!(geography.notices(), vec!["No data for selection."]);

    let registration = render(&store, &scenario(Scenario::UserRegistration)).expect("registration");
    assert_eq!(
        registration.notices(),
        EntityLevel::ALL
            .iter()
            .map(|l| format!("No {}-level registration data available.", l.label().to_lowercase()))
            .collect::<Vec<_>>()
    );
}

// ── Failing source ───────────────────────────────────────────────────────────

#[test]
fn store_failure_fails_the_pass() {
    for selection in all_pages() {
        let result = render(&FailingSource, &selection);
        assert!(result.is_err(), "{:?}/{:?} swallowed a store failure", selection.page, selection.scenario);
    }
}

// ── Home ─────────────────────────────────────────────────────────────────────

#[test]
fn home_map_uses_canonical_state_names() {
    let store = demo_store();
    let page = render(&store, &Selection::new(&DashConfig::default())).expect("home");
    assert_eq!(page.page, Page::Home);

    let charts = page.charts();
    assert_eq!(charts.len(), 1);
    let map = charts[0];
    assert_eq!(map.kind, ChartKind::Choropleth);
    assert!(map.geo.is_some());
    assert_eq!(map.points().len(), STATE_NAMES.len());
    for point in map.points() {
        assert!(
            STATE_NAMES.iter().any(|(_, name)| *name == point.label),
            "non-canonical state label {}",
            point.label
        );
    }
}

#[test]
fn home_map_normalizes_slugs_from_any_source() {
    let source = CannedSource(ResultTable::from_rows(
        &["state", "total_transaction_amount"],
        vec![
            vec![Cell::from("uttar-pradesh"), Cell::from(900.0)],
            vec![Cell::from("jammu-&-kashmir"), Cell::from(40.0)],
            vec![Cell::Null, Cell::Null],
        ],
    ));
    let page = render(&source, &Selection::new(&DashConfig::default())).expect("home");
    let map = page.charts()[0];
    let points: Vec<(&str, f64)> = map.points().iter().map(|p| (p.label.as_str(), p.value)).collect();
    assert_eq!(points, vec![("Uttar Pradesh", 900.0), ("Jammu & Kashmir", 40.0), ("Unknown", 0.0)]);
}

// ── Scenario 1 ───────────────────────────────────────────────────────────────

#[test]
fn transaction_dynamics_draws_six_charts() {
    let store = demo_store();
    let page = render(&store, &scenario(Scenario::TransactionDynamics)).expect("render");
    let charts = page.charts();
    assert_eq!(charts.len(), 6);

    let kinds: Vec<ChartKind> = charts.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![ChartKind::Line, ChartKind::Line, ChartKind::Bar, ChartKind::Pie, ChartKind::Pie, ChartKind::Bar]
    );

    let quarters: Vec<&str> = charts[2].points().iter().map(|p| p.label.as_str()).collect();
    assert_eq!(quarters, vec!["1", "2", "3", "4"]);

    // Defaults resolve to the first state and the earliest year.
    assert_eq!(page.widget("state").map(|w| w.selected.as_str()), Some("andaman-&-nicobar-islands"));
    assert_eq!(page.widget("year").map(|w| w.selected.as_str()), Some("2018"));
    assert_eq!(charts[5].title, "Top 5 States in 2018");
    assert_eq!(charts[5].points().len(), 5);
}

#[test]
fn transaction_dynamics_honours_state_and_year() {
    let store = demo_store();
    let selection = with_events(scenario(Scenario::TransactionDynamics), vec![
        SelectionEvent::SelectState { state: Some("goa".into()) },
        SelectionEvent::SelectYear { year: Some(2022) },
    ]);
    let page = render(&store, &selection).expect("render");
    assert_eq!(page.widget("state").map(|w| w.selected.as_str()), Some("goa"));
    assert_eq!(page.widget("year").map(|w| w.selected.as_str()), Some("2022"));

    let trend = page.charts()[0];
    let years: Vec<&str> = trend.points().iter().map(|p| p.label.as_str()).collect();
    assert_eq!(years, vec!["2018", "2019", "2020", "2021", "2022", "2023", "2024"]);
}

// ── Scenario 2 ───────────────────────────────────────────────────────────────

#[test]
fn device_dominance_folds_small_states_into_others() {
    let store = demo_store();
    let page = render(&store, &scenario(Scenario::DeviceDominance)).expect("render");
    let charts = page.charts();
    assert_eq!(charts.len(), 3);

    assert_eq!(charts[0].kind, ChartKind::HorizontalBar);
    assert_eq!(charts[0].points().len(), demo::BRANDS.len());
    assert_eq!(charts[1].points().len(), 10);

    let donut = charts[2];
    assert_eq!(donut.kind, ChartKind::Pie);
    assert_eq!(donut.hole, Some(0.45));
    assert_eq!(donut.points().len(), 11);
    assert_eq!(donut.points().last().map(|p| p.label.as_str()), Some(OTHERS_LABEL));
}

// ── Scenario 3 ───────────────────────────────────────────────────────────────

#[test]
fn insurance_bottom_pie_holds_only_positive_amounts() {
    let store = demo_store();
    let page = render(&store, &scenario(Scenario::InsurancePenetration)).expect("render");
    let charts = page.charts();
    assert_eq!(charts.len(), 4);
    assert_eq!(charts[2].points().len(), 10);

    let bottom = charts[3];
    assert_eq!(bottom.kind, ChartKind::Pie);
    assert!(!bottom.points().is_empty() && bottom.points().len() <= 5);
    assert!(bottom.points().iter().all(|p| p.value > 0.0));
    assert!(bottom.title.ends_with(&demo::LAST_YEAR.to_string()), "ranking year defaults to the latest");

    assert!(page.panels.iter().any(|p| matches!(
        p,
        Panel::Table { title, .. } if title == "Show data (preview)"
    )));
}

#[test]
fn insurance_trend_follows_state_filter() {
    let store = demo_store();
    let selection = with_events(scenario(Scenario::InsurancePenetration), vec![
        SelectionEvent::SelectState { state: Some("tamil-nadu".into()) },
        SelectionEvent::SelectYear { year: Some(2021) },
    ]);
    let page = render(&store, &selection).expect("render");
    let charts = page.charts();
    assert_eq!(charts[0].title, "Total Insurance Amount - Tamil Nadu");
    assert!(charts[2].title.ends_with("2021"));
}

// ── Scenario 4 ───────────────────────────────────────────────────────────────

#[test]
fn geography_by_year_ranks_every_year() {
    let store = demo_store();
    let page = render(&store, &scenario(Scenario::TransactionGeography)).expect("render");
    let charts = page.charts();
    assert_eq!(charts.len(), 3);
    assert_eq!(charts[0].points().len(), (demo::LAST_YEAR - demo::FIRST_YEAR + 1) as usize);
    assert_eq!(charts[2].kind, ChartKind::Line);
}

#[test]
fn geography_by_district_applies_year_and_top_n() {
    let store = demo_store();
    let selection = with_events(scenario(Scenario::TransactionGeography), vec![
        SelectionEvent::SelectMode { mode: DisplayMode::District },
        SelectionEvent::SelectYear { year: Some(2022) },
        SelectionEvent::SetTopN { top_n: 5 },
    ]);
    let page = render(&store, &selection).expect("render");
    let charts = page.charts();
    assert_eq!(charts[0].title, "Top 5 Districts by Amount");
    assert_eq!(charts[0].points().len(), 5);
    assert!(charts[0].points().iter().all(|p| p.label.ends_with(" district")));

    // A single year on the trend line.
    assert_eq!(charts[2].points().len(), 1);
    assert_eq!(charts[2].points()[0].label, "2022");
}

#[test]
fn geography_stale_year_falls_back_to_all() {
    let store = demo_store();
    let selection = with_events(scenario(Scenario::TransactionGeography), vec![
        SelectionEvent::SelectYear { year: Some(1999) },
    ]);
    let page = render(&store, &selection).expect("render");
    assert_eq!(page.widget("year").map(|w| w.selected.as_str()), Some("All"));
    assert!(!page.charts().is_empty());
}

// ── Scenario 5 ───────────────────────────────────────────────────────────────

#[test]
fn registration_draws_one_chart_per_level() {
    let store = demo_store();
    let page = render(&store, &scenario(Scenario::UserRegistration)).expect("render");
    let kinds: Vec<ChartKind> = page.charts().iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ChartKind::Bar, ChartKind::Line, ChartKind::Pie]);
    assert!(page.charts().iter().all(|c| c.points().len() == 10));
    assert!(page.charts()[1].categorical_x);

    for key in ["inspect_state", "inspect_district", "inspect_pincode"] {
        assert!(page.widget(key).is_some(), "missing {key}");
    }
    assert!(page.widget("year").is_none());
}

#[test]
fn registration_year_filter_offers_years_newest_first() {
    let store = demo_store();
    let selection = with_events(scenario(Scenario::UserRegistration), vec![
        SelectionEvent::FilterBy { filter: RegistrationFilter::Year },
        SelectionEvent::SelectYear { year: Some(2020) },
    ]);
    let page = render(&store, &selection).expect("render");
    let widget = page.widget("year").expect("year widget");
    assert_eq!(widget.options.first().map(String::as_str), Some("All"));
    assert_eq!(widget.options.get(1).map(String::as_str), Some("2024"));
    assert_eq!(widget.options.last().map(String::as_str), Some("2018"));
    assert_eq!(widget.selected, "2020");
    assert!(page.widget("quarter").is_none());
}

#[test]
fn registration_inspect_shows_detail_table() {
    let store = demo_store();
    let first = render(&store, &scenario(Scenario::UserRegistration)).expect("render");
    let top_state = first
        .widget("inspect_state")
        .and_then(|w| w.options.get(1))
        .cloned()
        .expect("at least one state");

    let selection = with_events(scenario(Scenario::UserRegistration), vec![
        SelectionEvent::Inspect { level: EntityLevel::State, value: Some(top_state.clone()) },
    ]);
    let page = render(&store, &selection).expect("render");
    let detail = page
        .panels
        .iter()
        .find_map(|p| match p {
            Panel::Table { title, table } if title == "State detail" => Some(table),
            _ => None,
        })
        .expect("detail table");
    assert_eq!(detail.len(), 1);
    assert_eq!(detail.label(0, "state"), top_state);
}


#[test]
fn registration_quarter_filter_narrows_rankings() {
    let store = demo_store();
    let unfiltered = render(&store, &scenario(Scenario::UserRegistration)).expect("render");

    let selection = with_events(scenario(Scenario::UserRegistration), vec![
        SelectionEvent::FilterBy { filter: RegistrationFilter::Quarter },
        SelectionEvent::SelectQuarter { quarter: Some(3) },
    ]);
    let page = render(&store, &selection).expect("render");
    let widget = page.widget("quarter").expect("quarter widget");
    assert_eq!(widget.options, vec!["All", "4", "3", "2", "1"]);
    assert_eq!(widget.selected, "3");
    assert!(page.widget("year").is_none());

    let before = unfiltered.charts()[0].points().to_vec();
    let after = page.charts()[0].points().to_vec();
    assert_eq!(after.len(), 10);
    assert_ne!(before, after, "quarter filter left the state ranking unchanged");
    assert!(after[0].value < before[0].value, "one quarter cannot outrank all four");
}

#[test]
fn registration_without_filter_options_still_ranks() {
    let source = NoDistinctSource {
        inner: demo_store(),
        served: RefCell::new(Vec::new()),
    };
    let selection = with_events(scenario(Scenario::UserRegistration), vec![
        SelectionEvent::FilterBy { filter: RegistrationFilter::Year },
        SelectionEvent::SelectYear { year: Some(2020) },
    ]);
    let page = render(&source, &selection).expect("lookup failure must not fail the pass");

    assert!(page.widget("year").is_none(), "filter offered without options");
    assert_eq!(page.charts().len(), 3);
    let served = source.served.borrow();
    assert_eq!(served.len(), 3);
    assert!(
        served.iter().all(|q| !q.sql.contains("year = ?")),
        "a year predicate was applied without a year filter on offer"
    );
}
