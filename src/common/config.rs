use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::{Deserialize, Serialize};
use strum::VariantNames;
use tracing::info;

use super::collections::HashSet;
use crate::model::{COLUMNS, Catalog, MAX_ROW_SPAN, Widget, WidgetKind};

pub fn config_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("dashgrid").join("config.toml"))
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    /// Seed widgets. Empty means the built-in catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<Widget>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub drag: DragSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct GridSettings {
    /// Height of a single row, in pixels.
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Spacing between cells, both axes.
    #[serde(default = "default_gap")]
    pub gap: f64,
    /// Container width used until the host reports a measurement.
    #[serde(default = "default_container_width")]
    pub initial_container_width: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            row_height: default_row_height(),
            gap: default_gap(),
            initial_container_width: default_container_width(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct DragSettings {
    /// Pointer travel (px) before a press turns into a drag.
    #[serde(default = "default_activation_distance")]
    pub activation_distance: f64,
    /// Prefix that marks drag ids originating in the bank.
    #[serde(default = "default_bank_prefix")]
    pub bank_prefix: String,
    #[serde(default = "default_bank_overlay_width")]
    pub bank_overlay_width: f64,
    #[serde(default = "default_overlay_min_width")]
    pub overlay_min_width: f64,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            activation_distance: default_activation_distance(),
            bank_prefix: default_bank_prefix(),
            bank_overlay_width: default_bank_overlay_width(),
            overlay_min_width: default_overlay_min_width(),
        }
    }
}

fn default_row_height() -> f64 { 80.0 }

fn default_gap() -> f64 { 16.0 }

fn default_container_width() -> f64 { 1200.0 }

fn default_activation_distance() -> f64 { 8.0 }

fn default_bank_prefix() -> String { "bank-".to_string() }

fn default_bank_overlay_width() -> f64 { 250.0 }

fn default_overlay_min_width() -> f64 { 280.0 }

impl Settings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        issues.extend(self.grid.validate());
        issues.extend(self.drag.validate());
        issues
    }
}

impl GridSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(self.row_height > 0.0) {
            issues.push(format!("grid.row_height must be positive, got {}", self.row_height));
        }
        if !(self.gap >= 0.0) {
            issues.push(format!("grid.gap must not be negative, got {}", self.gap));
        }
        let gutters = self.gap * (COLUMNS - 1) as f64;
        if !(self.initial_container_width > gutters) {
            issues.push(format!(
                "grid.initial_container_width ({}) must exceed the total gap width ({})",
                self.initial_container_width, gutters
            ));
        }

        issues
    }
}

impl DragSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(self.activation_distance >= 0.0) {
            issues.push(format!(
                "drag.activation_distance must not be negative, got {}",
                self.activation_distance
            ));
        }
        if self.bank_prefix.is_empty() {
            issues.push("drag.bank_prefix must not be empty".to_string());
        }
        if !(self.bank_overlay_width > 0.0) {
            issues.push("drag.bank_overlay_width must be positive".to_string());
        }
        if !(self.overlay_min_width >= 0.0) {
            issues.push("drag.overlay_min_width must not be negative".to_string());
        }

        issues
    }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        let config = Self::parse(&buf)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;
        Ok(())
    }

    /// The seed catalog this config describes.
    pub fn catalog(&self) -> Catalog {
        if self.catalog.is_empty() {
            Catalog::builtin()
        } else {
            Catalog::new(self.catalog.iter().cloned())
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        issues.extend(self.settings.validate());

        let prefix = self.settings.drag.bank_prefix.as_str();
        let mut seen_ids = HashSet::default();
        for (index, widget) in self.catalog.iter().enumerate() {
            if widget.id.as_str().is_empty() {
                issues.push(format!("Catalog entry {} has an empty id", index));
                continue;
            }
            if !seen_ids.insert(widget.id.as_str()) {
                issues.push(format!("Duplicate catalog id '{}' in entry {}", widget.id, index));
            }
            if !prefix.is_empty() && widget.id.as_str().starts_with(prefix) {
                issues.push(format!(
                    "Catalog id '{}' starts with the bank prefix '{}'",
                    widget.id, prefix
                ));
            }
            if !(1..=COLUMNS).contains(&widget.column_span) {
                issues.push(format!(
                    "Catalog entry '{}' has column_span {} outside 1..={}",
                    widget.id, widget.column_span, COLUMNS
                ));
            }
            if !(1..=MAX_ROW_SPAN).contains(&widget.row_span) {
                issues.push(format!(
                    "Catalog entry '{}' has row_span {} outside 1..={}",
                    widget.id, widget.row_span, MAX_ROW_SPAN
                ));
            }
        }

        issues
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        match toml::from_str::<Config>(buf) {
            Ok(config) => Ok(config),
            Err(e) => {
                let msg = e.to_string();
                match Self::extract_unknown_variant(&msg).and_then(|u| Self::suggest_kind(&u)) {
                    Some(suggestion) => bail!("{msg}\nDid you mean `{suggestion}`?"),
                    None => bail!("{msg}"),
                }
            }
        }
    }

    fn extract_unknown_variant(err: &str) -> Option<String> {
        let needle = "unknown variant `";
        let start = err.find(needle)? + needle.len();
        let rest = &err[start..];
        let end = rest.find('`')?;
        Some(rest[..end].to_string())
    }

    fn suggest_kind(unknown: &str) -> Option<&'static str> {
        let unknown = unknown.to_lowercase();
        let (best, dist) = WidgetKind::VARIANTS
            .iter()
            .map(|cand| (*cand, Self::levenshtein(&unknown, cand)))
            .min_by_key(|(_, dist)| *dist)?;
        let threshold = std::cmp::max(3usize, best.len() / 2);
        (dist <= threshold).then_some(best)
    }

    /// Edit distance between two kind tags, one row at a time.
    fn levenshtein(a: &str, b: &str) -> usize {
        let target: Vec<char> = b.chars().collect();
        let mut prev: Vec<usize> = (0..=target.len()).collect();
        for (i, ca) in a.chars().enumerate() {
            let mut row = Vec::with_capacity(prev.len());
            row.push(i + 1);
            for (j, cb) in target.iter().enumerate() {
                let substitute = prev[j] + usize::from(ca != *cb);
                let delete = prev[j + 1] + 1;
                let insert = row[j] + 1;
                row.push(substitute.min(delete).min(insert));
            }
            prev = row;
        }
        prev[target.len()]
    }
}
