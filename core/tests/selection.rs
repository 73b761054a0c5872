use pulse_core::{
    config::DashConfig,
    query::DisplayMode,
    records::EntityLevel,
    selection::{Choice, Page, RegistrationFilter, Scenario, Selection, SelectionEvent},
};

fn temp_data_dir(contents: Option<&str>) -> String {
    let dir = std::env::temp_dir().join(format!("pulse-config-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    if let Some(json) = contents {
        std::fs::write(dir.join("dashboard.json"), json).expect("write config");
    }
    dir.to_string_lossy().into_owned()
}

// ── Choice resolution ────────────────────────────────────────────────────────

#[test]
fn offered_value_is_kept() {
    let choice = Choice::Value(2022_i64);
    assert_eq!(choice.resolve_with_all(&[2021, 2022]), Choice::Value(2022));
    assert_eq!(choice.resolve_required(&[2021, 2022]), Some(2022));
}

#[test]
fn stale_value_falls_back() {
    let choice = Choice::Value("ladakh".to_string());
    let options = vec!["goa".to_string(), "kerala".to_string()];
    assert_eq!(choice.resolve_with_all(&options), Choice::All);
    assert_eq!(choice.resolve_required(&options), Some("goa".to_string()));
}

#[test]
fn required_choice_without_options_is_none() {
    assert_eq!(Choice::<i64>::All.resolve_required(&[]), None);
    assert_eq!(Choice::Value(3_i64).resolve_required(&[]), None);
}

#[test]
fn choice_display() {
    assert_eq!(Choice::<i64>::All.display(), "All");
    assert_eq!(Choice::Value(4_i64).display(), "4");
    assert_eq!(Choice::from(None::<i64>), Choice::All);
}

// ── Events ───────────────────────────────────────────────────────────────────

#[test]
fn top_n_is_clamped_to_slider_range() {
    let config = DashConfig::default();
    let mut selection = Selection::new(&config);
    assert_eq!(selection.top_n, 10);

    selection.apply(SelectionEvent::SetTopN { top_n: 99 }, &config);
    assert_eq!(selection.top_n, 25);
    selection.apply(SelectionEvent::SetTopN { top_n: 1 }, &config);
    assert_eq!(selection.top_n, 5);
    selection.apply(SelectionEvent::SetTopN { top_n: 12 }, &config);
    assert_eq!(selection.top_n, 12);
}

#[test]
fn choosing_a_scenario_switches_to_analysis() {
    let config = DashConfig::default();
    let mut selection = Selection::new(&config);
    assert_eq!(selection.page, Page::Home);
    selection.apply(SelectionEvent::ChooseScenario { scenario: Scenario::DeviceDominance }, &config);
    assert_eq!(selection.page, Page::Analysis);
    assert_eq!(selection.scenario, Scenario::DeviceDominance);

    selection.apply(SelectionEvent::Navigate { page: Page::Home }, &config);
    assert_eq!(selection.page, Page::Home);
}

#[test]
fn inspect_is_tracked_per_level() {
    let config = DashConfig::default();
    let mut selection = Selection::analysis(Scenario::UserRegistration, &config);
    selection.apply(
        SelectionEvent::Inspect { level: EntityLevel::District, value: Some("pune".into()) },
        &config,
    );
    assert_eq!(selection.inspect.get(EntityLevel::District), &Choice::Value("pune".to_string()));
    assert_eq!(selection.inspect.get(EntityLevel::State), &Choice::All);
}

#[test]
fn events_deserialize_from_tagged_json() {
    let event: SelectionEvent =
        serde_json::from_str(r#"{"type":"choose_scenario","scenario":"insurance_penetration"}"#).unwrap();
    assert_eq!(event, SelectionEvent::ChooseScenario { scenario: Scenario::InsurancePenetration });

    let event: SelectionEvent = serde_json::from_str(r#"{"type":"select_year","year":null}"#).unwrap();
    assert_eq!(event, SelectionEvent::SelectYear { year: None });

    let event: SelectionEvent = serde_json::from_str(r#"{"type":"select_mode","mode":"District"}"#).unwrap();
    assert_eq!(event, SelectionEvent::SelectMode { mode: DisplayMode::District });

    assert!(serde_json::from_str::<SelectionEvent>(r#"{"type":"launch"}"#).is_err());
}

// ── Labels ───────────────────────────────────────────────────────────────────

#[test]
fn scenario_parses_from_number_or_label() {
    assert_eq!(Scenario::parse("3").unwrap(), Scenario::InsurancePenetration);
    assert_eq!(Scenario::parse("5.").unwrap(), Scenario::UserRegistration);
    for s in Scenario::ALL {
        assert_eq!(Scenario::parse(&s.label()).unwrap(), s);
    }
    assert!(Scenario::parse("6").is_err());
    assert!(Scenario::parse("Insurance").is_err());
}

#[test]
fn registration_filter_parses_case_insensitively() {
    assert_eq!(RegistrationFilter::parse("quarter").unwrap(), RegistrationFilter::Quarter);
    assert_eq!(RegistrationFilter::parse(" None ").unwrap(), RegistrationFilter::None);
    assert!(RegistrationFilter::parse("month").is_err());
}

// ── Config ───────────────────────────────────────────────────────────────────

#[test]
fn missing_config_file_yields_defaults() {
    let dir = temp_data_dir(None);
    let config = DashConfig::load(&dir).expect("load");
    assert_eq!(config.top_n_slider.default, 10);
    assert_eq!(config.rankings.insurance_bottom, 5);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn partial_config_keeps_other_defaults() {
    let dir = temp_data_dir(Some(r#"{ "rankings": { "top_states": 8 } }"#));
    let config = DashConfig::load(&dir).expect("load");
    assert_eq!(config.rankings.top_states, 8);
    assert_eq!(config.rankings.registration, 10);
    assert_eq!(config.top_n_slider.max, 25);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_slider_is_rejected() {
    let dir = temp_data_dir(Some(r#"{ "top_n_slider": { "min": 5, "max": 25, "default": 40 } }"#));
    assert!(DashConfig::load(&dir).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_config_is_rejected() {
    let dir = temp_data_dir(Some("{ not json"));
    assert!(DashConfig::load(&dir).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}
