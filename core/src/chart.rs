//! Chart specifications.
//!
//! Result tables become renderer-neutral `ChartSpec` values that serialize
//! to JSON for whatever front end draws them. All label text is computed
//! here, so the same table always yields the same spec.

use crate::{
    config::DashConfig,
    format::{human_format, percent, thousands},
    table::ResultTable,
};
use serde::Serialize;

/// Label of the synthetic remainder slice.
pub const OTHERS_LABEL: &str = "Others";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Choropleth,
    Line,
    Bar,
    HorizontalBar,
    Pie,
}

/// Text attached to each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueText {
    None,
    /// 1.5K, 2.3M, ...
    Human,
    /// 1,234,567
    Thousands,
    /// "label 12.5%"
    LabelPercent,
    /// "12.5%"
    PercentOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<DataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoSpec {
    pub geojson_url: String,
    pub feature_id_key: String,
    pub fit_bounds: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub series: Vec<Series>,
    /// One colour per point for bars and slices, one per series for lines.
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<String>,
    /// Donut hole radius as a fraction of the pie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoSpec>,
    /// X values are categories, not a numeric axis.
    pub categorical_x: bool,
    pub markers: bool,
}

impl ChartSpec {
    fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: None,
            y_label: None,
            series: Vec::new(),
            colors: Vec::new(),
            color_scale: None,
            hole: None,
            legend_title: None,
            geo: None,
            categorical_x: false,
            markers: false,
        }
    }

    pub fn axes(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }

    pub fn color_scale(mut self, scale: impl Into<String>) -> Self {
        self.color_scale = Some(scale.into());
        self
    }

    pub fn legend_title(mut self, title: impl Into<String>) -> Self {
        self.legend_title = Some(title.into());
        self
    }

    pub fn categorical(mut self) -> Self {
        self.categorical_x = true;
        self
    }

    /// Points of the first series, or nothing.
    pub fn points(&self) -> &[DataPoint] {
        self.series.first().map(|s| s.points.as_slice()).unwrap_or(&[])
    }
}

/// Builds chart specs with the configured palettes.
pub struct ChartRenderer<'a> {
    config: &'a DashConfig,
}

impl<'a> ChartRenderer<'a> {
    pub fn new(config: &'a DashConfig) -> Self {
        Self { config }
    }

    /// States shaded by `value`. `location` must already hold canonical names.
    pub fn choropleth(&self, table: &ResultTable, location: &str, value: &str, title: &str) -> ChartSpec {
        let geo = &self.config.geo;
        let mut spec = ChartSpec::new(ChartKind::Choropleth, title)
            .color_scale(geo.color_scale.clone());
        spec.geo = Some(GeoSpec {
            geojson_url: geo.geojson_url.clone(),
            feature_id_key: geo.feature_id_key.clone(),
            fit_bounds: true,
        });
        spec.series.push(series(value, table.pairs(location, value), ValueText::Human));
        spec
    }

    /// Line with square markers in the configured line colour.
    pub fn line(&self, table: &ResultTable, x: &str, y: &str, title: &str) -> ChartSpec {
        let mut spec = ChartSpec::new(ChartKind::Line, title);
        spec.markers = true;
        spec.colors = vec![self.config.palettes.line.clone()];
        spec.series.push(series(y, table.pairs(x, y), ValueText::None));
        spec
    }

    /// Vertical bars in row order, colours cycled from `palette`.
    pub fn bar(
        &self,
        table:   &ResultTable,
        x:       &str,
        y:       &str,
        title:   &str,
        text:    ValueText,
        palette: &[String],
    ) -> ChartSpec {
        let pairs = table.pairs(x, y);
        let mut spec = ChartSpec::new(ChartKind::Bar, title).categorical();
        spec.colors = cycle_colors(palette, pairs.len());
        spec.series.push(series(y, pairs, text));
        spec
    }

    /// Horizontal bars, first row drawn on top.
    pub fn horizontal_bar(
        &self,
        table:   &ResultTable,
        label:   &str,
        value:   &str,
        title:   &str,
        palette: &[String],
    ) -> ChartSpec {
        let pairs = table.pairs(label, value);
        let mut spec = ChartSpec::new(ChartKind::HorizontalBar, title).categorical();
        spec.colors = cycle_colors(palette, pairs.len());
        spec.series.push(series(value, pairs, ValueText::Human));
        spec
    }

    /// Pie, or donut when `hole` is set. Slices keep the given order.
    pub fn pie(
        &self,
        slices:  Vec<(String, f64)>,
        title:   &str,
        hole:    Option<f64>,
        text:    ValueText,
        palette: &[String],
    ) -> ChartSpec {
        let mut spec = ChartSpec::new(ChartKind::Pie, title);
        spec.hole = hole;
        spec.colors = cycle_colors(palette, slices.len());
        spec.series.push(series("share", slices, text));
        spec
    }
}

fn series(name: &str, pairs: Vec<(String, f64)>, text: ValueText) -> Series {
    let total: f64 = pairs.iter().map(|(_, v)| v).sum();
    let points = pairs
        .into_iter()
        .map(|(label, value)| {
            let text = match text {
                ValueText::None         => None,
                ValueText::Human        => Some(human_format(value)),
                ValueText::Thousands    => Some(thousands(value)),
                ValueText::LabelPercent => Some(format!("{label} {}", percent(value, total))),
                ValueText::PercentOnly  => Some(percent(value, total)),
            };
            DataPoint { label, value, text }
        })
        .collect();
    Series {
        name: name.to_string(),
        points,
    }
}

/// Repeat `palette` until it covers `n` items.
pub fn cycle_colors(palette: &[String], n: usize) -> Vec<String> {
    if palette.is_empty() {
        return Vec::new();
    }
    palette.iter().cycle().take(n).cloned().collect()
}

/// Keep the first `n` entries; sum the rest into a trailing "Others" entry
/// when that sum is strictly positive.
pub fn top_n_with_others(entries: Vec<(String, f64)>, n: usize) -> Vec<(String, f64)> {
    let mut entries = entries;
    if entries.len() <= n {
        return entries;
    }
    let rest = entries.split_off(n);
    let others: f64 = rest.iter().map(|(_, v)| v).sum();
    if others > 0.0 {
        entries.push((OTHERS_LABEL.to_string(), others));
    }
    entries
}

/// The `k` smallest strictly positive entries, ascending, ties by label.
pub fn bottom_k_positive(entries: Vec<(String, f64)>, k: usize) -> Vec<(String, f64)> {
    let mut positive: Vec<(String, f64)> = entries
        .into_iter()
        .filter(|(_, v)| *v > 0.0)
        .collect();
    positive.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    positive.truncate(k);
    positive
}
