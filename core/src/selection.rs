//! Filter and selection state.
//!
//! A `Selection` is what the user has picked: page, scenario and filter
//! values. It changes only through `SelectionEvent`s. Values are checked
//! against freshly queried options on every pass (see `Choice::resolve_*`),
//! so a stale pick falls back instead of producing an empty chart.

use crate::{
    config::DashConfig,
    error::{DashError, DashResult},
    query::DisplayMode,
    records::EntityLevel,
    types::{Quarter, Year},
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Analysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    TransactionDynamics,
    DeviceDominance,
    InsurancePenetration,
    TransactionGeography,
    UserRegistration,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::TransactionDynamics,
        Scenario::DeviceDominance,
        Scenario::InsurancePenetration,
        Scenario::TransactionGeography,
        Scenario::UserRegistration,
    ];

    pub fn number(self) -> u8 {
        match self {
            Scenario::TransactionDynamics  => 1,
            Scenario::DeviceDominance      => 2,
            Scenario::InsurancePenetration => 3,
            Scenario::TransactionGeography => 4,
            Scenario::UserRegistration     => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Scenario::TransactionDynamics  => "Decoding Transaction Dynamics on PhonePe",
            Scenario::DeviceDominance      => "Device Dominance and User Engagement",
            Scenario::InsurancePenetration => "Insurance Penetration and Growth Potential",
            Scenario::TransactionGeography => "Transaction Analysis Across States and Districts",
            Scenario::UserRegistration     => "User Registration Analysis",
        }
    }

    /// Selector label, e.g. "1. Decoding Transaction Dynamics on PhonePe".
    pub fn label(self) -> String {
        format!("{}. {}", self.number(), self.title())
    }

    pub fn from_number(n: u8) -> DashResult<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.number() == n)
            .ok_or_else(|| DashError::UnknownScenario { label: n.to_string() })
    }

    /// Accepts "3", "3." or a full selector label.
    pub fn parse(label: &str) -> DashResult<Self> {
        let head: String = label.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
        head.parse::<u8>()
            .ok()
            .and_then(|n| Self::from_number(n).ok())
            .ok_or_else(|| DashError::UnknownScenario { label: label.to_string() })
    }
}

/// Which dimension narrows the registration rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationFilter {
    None,
    Year,
    Quarter,
}

impl RegistrationFilter {
    pub const ALL: [RegistrationFilter; 3] = [
        RegistrationFilter::None,
        RegistrationFilter::Year,
        RegistrationFilter::Quarter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RegistrationFilter::None    => "None",
            RegistrationFilter::Year    => "Year",
            RegistrationFilter::Quarter => "Quarter",
        }
    }

    pub fn parse(label: &str) -> DashResult<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| DashError::UnknownFilterMode { label: label.to_string() })
    }
}

/// "All" or one concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice<T> {
    All,
    Value(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: Clone + PartialEq> Choice<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Choice::All => None,
            Choice::Value(v) => Some(v),
        }
    }

    /// Keep the pick if `options` still contains it, else fall back to All.
    pub fn resolve_with_all(&self, options: &[T]) -> Choice<T> {
        match self {
            Choice::Value(v) if options.contains(v) => Choice::Value(v.clone()),
            Choice::Value(_) => {
                log::warn!("selected value no longer offered; falling back to All");
                Choice::All
            }
            Choice::All => Choice::All,
        }
    }

    /// A concrete value: the pick if offered, else the first option.
    /// `None` only when there are no options at all.
    pub fn resolve_required(&self, options: &[T]) -> Option<T> {
        match self {
            Choice::Value(v) if options.contains(v) => Some(v.clone()),
            _ => options.first().cloned(),
        }
    }
}

impl<T: Display> Choice<T> {
    pub fn display(&self) -> String {
        match self {
            Choice::All => "All".to_string(),
            Choice::Value(v) => v.to_string(),
        }
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Choice::Value(v),
            None => Choice::All,
        }
    }
}

/// Row picked in a registration chart's inspect selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectState {
    pub state: Choice<String>,
    pub district: Choice<String>,
    pub pincode: Choice<String>,
}

impl InspectState {
    pub fn get(&self, level: EntityLevel) -> &Choice<String> {
        match level {
            EntityLevel::State    => &self.state,
            EntityLevel::District => &self.district,
            EntityLevel::Pincode  => &self.pincode,
        }
    }

    fn set(&mut self, level: EntityLevel, value: Choice<String>) {
        match level {
            EntityLevel::State    => self.state = value,
            EntityLevel::District => self.district = value,
            EntityLevel::Pincode  => self.pincode = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub page: Page,
    pub scenario: Scenario,
    pub state: Choice<String>,
    pub year: Choice<Year>,
    pub quarter: Choice<Quarter>,
    pub mode: DisplayMode,
    pub top_n: usize,
    pub filter_by: RegistrationFilter,
    pub inspect: InspectState,
}

impl Selection {
    pub fn new(config: &DashConfig) -> Self {
        Self {
            page: Page::Home,
            scenario: Scenario::TransactionDynamics,
            state: Choice::All,
            year: Choice::All,
            quarter: Choice::All,
            mode: DisplayMode::Year,
            top_n: config.top_n_slider.default,
            filter_by: RegistrationFilter::None,
            inspect: InspectState::default(),
        }
    }

    /// Analysis page showing `scenario`, other fields at defaults.
    pub fn analysis(scenario: Scenario, config: &DashConfig) -> Self {
        Self {
            page: Page::Analysis,
            scenario,
            ..Self::new(config)
        }
    }

    pub fn apply(&mut self, event: SelectionEvent, config: &DashConfig) {
        match event {
            SelectionEvent::Navigate { page } => self.page = page,
            SelectionEvent::ChooseScenario { scenario } => {
                self.page = Page::Analysis;
                self.scenario = scenario;
            }
            SelectionEvent::SelectState { state } => self.state = state.into(),
            SelectionEvent::SelectYear { year } => self.year = year.into(),
            SelectionEvent::SelectQuarter { quarter } => self.quarter = quarter.into(),
            SelectionEvent::SelectMode { mode } => self.mode = mode,
            SelectionEvent::SetTopN { top_n } => {
                let clamped = config.top_n_slider.clamp(top_n);
                if clamped != top_n {
                    log::warn!("top_n {top_n} outside slider range; using {clamped}");
                }
                self.top_n = clamped;
            }
            SelectionEvent::FilterBy { filter } => self.filter_by = filter,
            SelectionEvent::Inspect { level, value } => self.inspect.set(level, value.into()),
        }
    }
}

/// One interactive pick. `None` values mean "All".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionEvent {
    Navigate { page: Page },
    ChooseScenario { scenario: Scenario },
    SelectState { state: Option<String> },
    SelectYear { year: Option<Year> },
    SelectQuarter { quarter: Option<Quarter> },
    SelectMode { mode: DisplayMode },
    SetTopN { top_n: usize },
    FilterBy { filter: RegistrationFilter },
    Inspect { level: EntityLevel, value: Option<String> },
}
