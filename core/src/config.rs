use serde::{Deserialize, Serialize};
use std::path::Path;

/// How many rows each ranked chart keeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingLimits {
    /// Top states by transaction amount for the selected year.
    pub top_states: usize,
    /// Brands on the device dominance chart.
    pub device_brands: usize,
    /// States on the registered users chart.
    pub registered_users: usize,
    /// Named slices on the app opens donut before "Others".
    pub app_opens: usize,
    pub insurance_top: usize,
    pub insurance_bottom: usize,
    /// Rows per registration chart (state, district, pincode).
    pub registration: usize,
    /// Row cap of the insurance data preview table.
    pub preview_rows: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            top_states: 5,
            device_brands: 20,
            registered_users: 10,
            app_opens: 10,
            insurance_top: 10,
            insurance_bottom: 5,
            registration: 10,
            preview_rows: 200,
        }
    }
}

/// Bounds of the top-N slider on the geography view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self { min: 5, max: 25, default: 10 }
    }
}

impl SliderConfig {
    pub fn clamp(&self, value: usize) -> usize {
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palettes {
    /// Brand colours, cycled across bars and slices.
    pub brand: Vec<String>,
    pub quarter: Vec<String>,
    pub category: Vec<String>,
    pub ranking: Vec<String>,
    pub device: Vec<String>,
    pub donut: Vec<String>,
    pub insurance: Vec<String>,
    /// Single colour for trend lines.
    pub line: String,
}

impl Default for Palettes {
    fn default() -> Self {
        fn v(colors: &[&str]) -> Vec<String> {
            colors.iter().map(|c| c.to_string()).collect()
        }
        Self {
            brand: v(&["#7E57C2", "#5E35B1", "#26C6DA", "#4E79A7", "#59A14F", "#EDC948", "#E15759"]),
            quarter: v(&["#5A31F4", "#7B4DFF", "#A78BFA", "#7E57C2"]),
            category: v(&["#5A31F4", "#7B4DFF", "#A78BFA", "#D8CCFF"]),
            ranking: v(&["#7E57C2", "#5E35B1", "#26C6DA", "#4E79A7", "#59A14F"]),
            device: v(&[
                "#7E57C2", "#5E35B1", "#26C6DA", "#4E79A7", "#59A14F", "#AB47BC", "#8E24AA", "#6A1B9A",
            ]),
            donut: v(&[
                "#7E57C2", "#5E35B1", "#A966A9", "#4E79A7", "#DB55CB", "#AB47BC", "#8E24AA", "#6A1B9A",
                "#EFDFEE", "#4B2C5E", "#500845",
            ]),
            insurance: v(&["#7E57C2", "#26C6DA", "#4E79A7", "#59A14F"]),
            line: "#7E57C2".to_string(),
        }
    }
}

/// Boundary data used by the choropleth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    pub geojson_url: String,
    /// Property path in the GeoJSON that holds the canonical state name.
    pub feature_id_key: String,
    pub color_scale: String,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            geojson_url: "https://gist.githubusercontent.com/jbrobst/56c13bbbf9d97d187fea01ca62ea5112/raw/e388c4cae20aa53cb5090210a42ebb9b765c0a36/india_states.geojson".to_string(),
            feature_id_key: "properties.ST_NM".to_string(),
            color_scale: "Reds".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub rankings: RankingLimits,
    pub top_n_slider: SliderConfig,
    pub palettes: Palettes,
    pub geo: GeoConfig,
}

impl DashConfig {
    /// Load `{data_dir}/dashboard.json`. Missing keys take their defaults;
    /// a missing file yields the full default config.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/dashboard.json");
        if !Path::new(&path).exists() {
            log::info!("{path} not found; using default dashboard config");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let slider = &self.top_n_slider;
        if slider.min == 0 || slider.min > slider.max {
            anyhow::bail!("top_n_slider: need 0 < min <= max, got {}..={}", slider.min, slider.max);
        }
        if !(slider.min..=slider.max).contains(&slider.default) {
            anyhow::bail!(
                "top_n_slider: default {} outside {}..={}",
                slider.default,
                slider.min,
                slider.max
            );
        }
        if self.palettes.brand.is_empty() {
            anyhow::bail!("palettes.brand must not be empty");
        }
        Ok(())
    }
}
