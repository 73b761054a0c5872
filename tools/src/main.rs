//! pulse-dash: renders PhonePe Pulse dashboard pages as JSON.
//!
//! Usage:
//!   pulse-dash --db pulse.db --page home
//!   pulse-dash --db pulse.db --scenario 4 --mode District --year 2022 --top-n 15
//!   pulse-dash --demo-seed 42 --scenario 3 --pretty
//!   pulse-dash --db pulse.db --ipc-mode
//!
//! In IPC mode each stdin line is a JSON command; each reply is one line of
//! JSON on stdout:
//!   {"type":"select","event":{"type":"choose_scenario","scenario":"user_registration"}}
//!   {"type":"render"}
//!   {"type":"quit"}

use anyhow::{bail, Result};
use pulse_core::{
    config::DashConfig,
    dashboard::{Dashboard, RenderedPage},
    demo,
    error::DashError,
    query::DisplayMode,
    selection::{Page, RegistrationFilter, Scenario, Selection, SelectionEvent},
    store::PulseStore,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Render,
    Select { event: SelectionEvent },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = has_flag(&args, "--ipc-mode");
    let pretty = has_flag(&args, "--pretty");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let demo_seed: Option<u64> = flag_value(&args, "--demo-seed").and_then(|s| s.parse().ok());

    let config = DashConfig::load(data_dir)?;

    // Demo mode keeps this anchor connection open so a shared in-memory
    // database outlives the per-pass connections.
    let (db, _anchor) = match (flag_value(&args, "--db"), demo_seed) {
        (db, Some(seed)) => {
            let path = db.map(str::to_string).unwrap_or_else(|| {
                format!("file:pulse_demo_{}?mode=memory&cache=shared", chrono::Utc::now().timestamp())
            });
            let store = PulseStore::open(&path)?;
            store.migrate()?;
            let summary = demo::populate(&store, seed)?;
            log::info!(
                "demo database {}: {}",
                store.path().unwrap_or(":memory:"),
                serde_json::to_string(&summary.rows)?
            );
            (path, Some(store))
        }
        (Some(db), None) => (db.to_string(), None),
        (None, None) => bail!("--db <path> is required unless --demo-seed is given"),
    };

    let dashboard = Dashboard::new(db, config);
    let mut selection = selection_from_args(&args, dashboard.config())?;

    if ipc_mode {
        run_ipc_loop(&dashboard, &mut selection)?;
    } else {
        let page = dashboard.render(&selection)?;
        println!("{}", to_json(&page, pretty)?);
    }
    Ok(())
}

fn run_ipc_loop(dashboard: &Dashboard, selection: &mut Selection) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Render => {}
            IpcCommand::Select { event } => selection.apply(event, dashboard.config()),
        }

        // Every interaction is a full re-render. A failed pass is reported
        // and the loop keeps serving.
        match dashboard.render(selection) {
            Ok(page) => writeln!(stdout, "{}", to_json(&page, false)?)?,
            Err(e) => {
                log::error!("render failed: {e}");
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn selection_from_args(args: &[String], config: &DashConfig) -> Result<Selection> {
    let mut selection = Selection::new(config);

    if let Some(page) = flag_value(args, "--page") {
        selection.page = match page.to_ascii_lowercase().as_str() {
            "home" => Page::Home,
            "analysis" => Page::Analysis,
            other => bail!("unknown page '{other}' (expected home or analysis)"),
        };
    }
    if let Some(label) = flag_value(args, "--scenario") {
        let scenario = Scenario::parse(label)?;
        selection.apply(SelectionEvent::ChooseScenario { scenario }, config);
    }
    if let Some(state) = flag_value(args, "--state") {
        let state = (!is_all(state)).then(|| state.to_string());
        selection.apply(SelectionEvent::SelectState { state }, config);
    }
    if let Some(year) = flag_value(args, "--year") {
        let year = if is_all(year) { None } else { Some(year.parse()?) };
        selection.apply(SelectionEvent::SelectYear { year }, config);
    }
    if let Some(quarter) = flag_value(args, "--quarter") {
        let quarter = if is_all(quarter) { None } else { Some(quarter.parse()?) };
        selection.apply(SelectionEvent::SelectQuarter { quarter }, config);
    }
    if let Some(label) = flag_value(args, "--mode") {
        let mode = DisplayMode::parse(label)
            .ok_or_else(|| DashError::UnknownMode { label: label.to_string() })?;
        selection.apply(SelectionEvent::SelectMode { mode }, config);
    }
    if let Some(top_n) = flag_value(args, "--top-n") {
        selection.apply(SelectionEvent::SetTopN { top_n: top_n.parse()? }, config);
    }
    if let Some(label) = flag_value(args, "--filter-by") {
        let filter = RegistrationFilter::parse(label)?;
        selection.apply(SelectionEvent::FilterBy { filter }, config);
    }
    Ok(selection)
}

fn to_json(page: &RenderedPage, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(page)?
    } else {
        serde_json::to_string(page)?
    })
}

fn is_all(value: &str) -> bool {
    value.eq_ignore_ascii_case("all")
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
