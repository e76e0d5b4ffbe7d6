//! Editor configuration.

use crate::drag::DragMode;
use crate::geometry::{Constraints, IntersectionPolicy, DEFAULT_MIN_DISTANCE};
use crate::markers::{MARKER_HIT_TOLERANCE, MARKER_RADIUS};
use crate::polygon::{Layout, PolygonError};
use crate::viewport::DEFAULT_VIEW_BOX;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid polygon: {0}")]
    Polygon(#[from] PolygonError),
    #[error("Invalid value for {field}: {value}")]
    InvalidSetting { field: &'static str, value: String },
}

fn check_distance(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSetting { field, value: value.to_string() })
    }
}

/// Settings for the polygon editor.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Minimum vertex-vertex and vertex-edge distance, in view-box units.
    pub min_distance: f64,
    /// Radius of the vertex markers.
    pub marker_radius: f64,
    /// How far from a marker's center a press still grabs it.
    pub hit_tolerance: f64,
    /// Local coordinate rectangle.
    pub view_box: Rect,
    /// Starting layout, restored by reset.
    pub layout: Layout,
    pub drag_mode: DragMode,
    /// Keep dragged vertices inside the view box.
    pub clamp_to_view: bool,
    pub intersection: IntersectionPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_distance: DEFAULT_MIN_DISTANCE,
            marker_radius: MARKER_RADIUS,
            hit_tolerance: MARKER_HIT_TOLERANCE,
            view_box: DEFAULT_VIEW_BOX,
            layout: Layout::default(),
            drag_mode: DragMode::default(),
            clamp_to_view: true,
            intersection: IntersectionPolicy::default(),
        }
    }
}

impl EditorConfig {
    /// Constraints derived from this configuration.
    pub fn constraints(&self) -> Constraints {
        Constraints::with_min_distance(self.min_distance).with_intersection(self.intersection)
    }

    /// Check every setting: distances must be finite and non-negative, the
    /// view box finite with positive size, and the layout must satisfy the
    /// constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_distance("min_distance", self.min_distance)?;
        check_distance("marker_radius", self.marker_radius)?;
        check_distance("hit_tolerance", self.hit_tolerance)?;
        let view_box = self.view_box;
        if !view_box.is_finite() || view_box.width() <= 0.0 || view_box.height() <= 0.0 {
            return Err(ConfigError::InvalidSetting {
                field: "view_box",
                value: format!("{:?}", view_box),
            });
        }
        self.layout.build(&self.constraints())?;
        Ok(())
    }

    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Apply `key=value` overrides from a URL query string or hash.
    ///
    /// Recognized keys: `min_distance`, `drag_mode`, `layout` (`reference` or
    /// `regular`), `intersection` and `clamp`. Unknown keys and unparsable
    /// values are skipped with a warning.
    pub fn apply_query(&mut self, query: &str) {
        let query = query.trim_start_matches(['?', '#']);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let Some((key, value)) = pair.split_once('=') else {
                log::warn!("Ignoring query parameter without value: {}", pair);
                continue;
            };
            let applied = match (key, value) {
                ("min_distance", v) => match v.parse::<f64>() {
                    Ok(d) if d.is_finite() && d >= 0.0 => {
                        self.min_distance = d;
                        true
                    }
                    _ => false,
                },
                ("drag_mode", "offset") => {
                    self.drag_mode = DragMode::Offset;
                    true
                }
                ("drag_mode", "direct") => {
                    self.drag_mode = DragMode::Direct;
                    true
                }
                ("layout", "reference") => {
                    self.layout = Layout::Reference;
                    true
                }
                ("layout", "regular") => {
                    let radius = 0.45 * self.view_box.width().min(self.view_box.height());
                    self.layout = Layout::Regular { center: self.view_box.center(), radius };
                    true
                }
                ("intersection", "proper") => {
                    self.intersection = IntersectionPolicy::Proper;
                    true
                }
                ("intersection", "inclusive") => {
                    self.intersection = IntersectionPolicy::Inclusive;
                    true
                }
                ("clamp", v) => match v.parse::<bool>() {
                    Ok(b) => {
                        self.clamp_to_view = b;
                        true
                    }
                    Err(_) => false,
                },
                _ => false,
            };
            if !applied {
                log::warn!("Ignoring query parameter {}={}", key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "min_distance": 10.0,
            "drag_mode": "direct",
            "layout": { "kind": "regular", "center": { "x": 250.0, "y": 150.0 }, "radius": 120.0 }
        }"#;
        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.min_distance, 10.0);
        assert_eq!(config.drag_mode, DragMode::Direct);
        assert_eq!(
            config.layout,
            Layout::Regular { center: Point::new(250.0, 150.0), radius: 120.0 }
        );
        assert!(config.clamp_to_view);
    }

    #[test]
    fn test_roundtrip() {
        let config = EditorConfig {
            intersection: IntersectionPolicy::Inclusive,
            ..EditorConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_apply_query() {
        let mut config = EditorConfig::default();
        config.apply_query("?min_distance=12.5&drag_mode=direct&layout=regular&clamp=false");
        assert_eq!(config.min_distance, 12.5);
        assert_eq!(config.drag_mode, DragMode::Direct);
        assert_eq!(
            config.layout,
            Layout::Regular { center: Point::new(200.0, 220.0), radius: 180.0 }
        );
        assert!(!config.clamp_to_view);
        assert!(config.layout.build(&config.constraints()).is_ok());
    }

    #[test]
    fn test_apply_query_skips_bad_values() {
        let mut config = EditorConfig::default();
        config.apply_query("#min_distance=-3&drag_mode=sideways&room=abc&intersection=inclusive&flag");
        assert_eq!(config.min_distance, DEFAULT_MIN_DISTANCE);
        assert_eq!(config.drag_mode, DragMode::Offset);
        assert_eq!(config.intersection, IntersectionPolicy::Inclusive);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(EditorConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let json = r#"{ "layout": { "kind": "regular", "center": { "x": 0.0, "y": 0.0 }, "radius": 1.0 } }"#;
        assert!(matches!(EditorConfig::from_json(json), Err(ConfigError::Polygon(_))));
    }

    #[test]
    fn test_inverted_view_box_rejected() {
        let json = r#"{ "view_box": { "x0": 400.0, "y0": 0.0, "x1": 0.0, "y1": 440.0 } }"#;
        assert!(matches!(
            EditorConfig::from_json(json),
            Err(ConfigError::InvalidSetting { field: "view_box", .. })
        ));
    }

    #[test]
    fn test_empty_view_box_rejected() {
        let json = r#"{ "view_box": { "x0": 0.0, "y0": 0.0, "x1": 400.0, "y1": 0.0 } }"#;
        assert!(matches!(
            EditorConfig::from_json(json),
            Err(ConfigError::InvalidSetting { field: "view_box", .. })
        ));
    }

    #[test]
    fn test_negative_distances_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{ "min_distance": -1.0 }"#),
            Err(ConfigError::InvalidSetting { field: "min_distance", .. })
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "hit_tolerance": -10.0 }"#),
            Err(ConfigError::InvalidSetting { field: "hit_tolerance", .. })
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "marker_radius": -6.0 }"#),
            Err(ConfigError::InvalidSetting { field: "marker_radius", .. })
        ));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let result = EditorConfig::load(std::path::Path::new("/nonexistent/decagon.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
