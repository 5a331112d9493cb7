//! Vertical layout model for simulated pages
//!
//! A layout maps element ids to their top edge in document coordinates.
//! Pages are not rendered, so positions come from a layout file or from a
//! stacked estimate (every section `section_height` pixels below the last).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, SyncError};

pub const DEFAULT_SECTION_HEIGHT: f64 = 800.0;

fn default_section_height() -> f64 {
    DEFAULT_SECTION_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Top edge per element id, in pixels
    #[serde(default)]
    pub tops: BTreeMap<String, f64>,

    /// Spacing used by `stacked`
    #[serde(default = "default_section_height")]
    pub section_height: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            tops: BTreeMap::new(),
            section_height: DEFAULT_SECTION_HEIGHT,
        }
    }
}

impl Layout {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SyncError::Layout(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let layout: Layout =
            serde_json::from_str(json).map_err(|e| SyncError::Layout(e.to_string()))?;
        if !layout.section_height.is_finite() || layout.section_height <= 0.0 {
            return Err(SyncError::Layout(format!(
                "section_height must be positive, got {}",
                layout.section_height
            )));
        }
        if let Some((id, top)) = layout.tops.iter().find(|(_, top)| !top.is_finite()) {
            return Err(SyncError::Layout(format!("top of '{}' is not finite: {}", id, top)));
        }
        Ok(layout)
    }

    /// Place `ids` one below the other, `section_height` apart, starting at 0
    pub fn stacked<'a>(ids: impl IntoIterator<Item = &'a str>, section_height: f64) -> Self {
        let tops = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id.to_string(), i as f64 * section_height))
            .collect();
        Self {
            tops,
            section_height,
        }
    }

    pub fn top(&self, id: &str) -> Option<f64> {
        self.tops.get(id).copied()
    }

    pub fn set_top(&mut self, id: impl Into<String>, top: f64) {
        self.tops.insert(id.into(), top);
    }
}
