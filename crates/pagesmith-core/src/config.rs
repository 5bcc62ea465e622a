//! Editor configuration.
//!
//! Every value has a default matching the builder's stock behavior, so an
//! empty JSON object is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;
/// Distance within which an edge or center counts as aligned to a guide.
pub const SNAP_THRESHOLD: f64 = 8.0;
/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;
/// Default page background color.
pub const DEFAULT_PAGE_BACKGROUND: &str = "#485060";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for the canvas, history and responsive layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Grid unit; drags and resizes commit on half of it.
    pub grid_size: f64,
    /// Alignment guide proximity in pixels.
    pub snap_threshold: f64,
    /// A marquee smaller than this in both axes is treated as a click.
    pub marquee_click_threshold: f64,
    /// Number of snapshots kept by the undo history.
    pub history_capacity: usize,
    /// Offset applied to duplicates and inserted blocks.
    pub paste_offset: f64,
    pub desktop_canvas_width: f64,
    pub desktop_canvas_height: f64,
    pub mobile_canvas_width: f64,
    /// Desktop width that mobile projections are scaled from.
    pub mobile_reference_width: f64,
    /// Widest an element may be after the mobile reflow.
    pub mobile_max_element_width: f64,
    pub mobile_margin: f64,
    /// Vertical spacing between stacked elements in the mobile reflow.
    pub mobile_gap: f64,
    /// Floor for the computed page height.
    pub min_page_height: f64,
    pub default_page_background: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            snap_threshold: SNAP_THRESHOLD,
            marquee_click_threshold: 5.0,
            history_capacity: MAX_UNDO_HISTORY,
            paste_offset: 20.0,
            desktop_canvas_width: 1920.0,
            desktop_canvas_height: 1080.0,
            mobile_canvas_width: 390.0,
            mobile_reference_width: 1080.0,
            mobile_max_element_width: 350.0,
            mobile_margin: 20.0,
            mobile_gap: 8.0,
            min_page_height: 900.0,
            default_page_background: DEFAULT_PAGE_BACKGROUND.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Half a grid unit, the granularity of committed geometry.
    pub fn half_grid(&self) -> f64 {
        self.grid_size / 2.0
    }

    /// Smallest width or height a resize may commit.
    pub fn min_element_size(&self) -> f64 {
        self.grid_size * 2.0
    }

    /// Scale applied to desktop geometry when synthesizing a mobile projection.
    pub fn mobile_scale(&self) -> f64 {
        self.mobile_canvas_width / self.mobile_reference_width
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "gridSize",
                reason: format!("must be positive, got {}", self.grid_size),
            });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "historyCapacity",
                reason: "must keep at least one snapshot".to_string(),
            });
        }
        if self.snap_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "snapThreshold",
                reason: format!("must not be negative, got {}", self.snap_threshold),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EditorConfig::from_json(r#"{"gridSize": 10, "historyCapacity": 5}"#).unwrap();
        assert_eq!(config.grid_size, 10.0);
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.snap_threshold, SNAP_THRESHOLD);
        assert_eq!(config.half_grid(), 5.0);
    }

    #[test]
    fn test_rejects_zero_grid() {
        let result = EditorConfig::from_json(r#"{"gridSize": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid { field: "gridSize", .. })));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let result = EditorConfig::from_json(r#"{"historyCapacity": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{"mobileGap": 12}"#).unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.mobile_gap, 12.0);
    }

    #[test]
    fn test_mobile_scale() {
        let config = EditorConfig::default();
        assert!((config.mobile_scale() - 390.0 / 1080.0).abs() < f64::EPSILON);
    }
}
