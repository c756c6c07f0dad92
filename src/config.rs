//! Preview configuration.
//!
//! Two surface profiles mirror the two places routes are shown: the full
//! activity view and list thumbnails. Everything has a default; a JSON file
//! only needs the fields it changes, and is merged over the defaults of the
//! profile it names.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::render::{RouteRenderer, RouteStyle};

/// Environment variable overriding the device pixel ratio of every profile.
pub const DPR_ENV: &str = "ROUTE_PREVIEW_DPR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid ROUTE_PREVIEW_DPR value {0:?}: expected a positive number")]
    DevicePixelRatio(String),
}

/// Logical size, density and stroke style of one kind of surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
    pub style: RouteStyle,
}

impl SurfaceConfig {
    pub fn detail() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            device_pixel_ratio: 1.0,
            style: RouteStyle::detail(),
        }
    }

    pub fn preview() -> Self {
        Self {
            width: 160.0,
            height: 100.0,
            device_pixel_ratio: 1.0,
            style: RouteStyle::preview(),
        }
    }

    pub fn renderer(&self) -> RouteRenderer {
        RouteRenderer::new(self.style.clone(), self.device_pixel_ratio)
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::detail()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub detail: SurfaceConfig,
    pub preview: SurfaceConfig,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            detail: SurfaceConfig::detail(),
            preview: SurfaceConfig::preview(),
        }
    }
}

impl PreviewConfig {
    /// Load from an optional JSON file, then apply [`DPR_ENV`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_dpr_override(env::var(DPR_ENV).ok().as_deref())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse `json` merged over [`PreviewConfig::default`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut merged = serde_json::to_value(Self::default())?;
        merge(&mut merged, serde_json::from_str(json)?);
        Ok(serde_json::from_value(merged)?)
    }

    /// Replace the device pixel ratio of both profiles when `value` is set.
    pub fn with_dpr_override(mut self, value: Option<&str>) -> Result<Self, ConfigError> {
        let Some(value) = value else {
            return Ok(self);
        };

        let dpr: f64 = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::DevicePixelRatio(value.to_string()))?;
        if !(dpr.is_finite() && dpr > 0.0) {
            return Err(ConfigError::DevicePixelRatio(value.to_string()));
        }

        self.detail.device_pixel_ratio = dpr;
        self.preview.device_pixel_ratio = dpr;
        Ok(self)
    }
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::LineCap;

    #[test]
    fn test_defaults() {
        let config = PreviewConfig::default();
        assert_eq!(config.detail.style.line_width, 3.0);
        assert_eq!(config.preview.style.line_width, 1.0);
        assert_eq!(config.detail.style.stroke_color, "#7A6FF0");
    }

    #[test]
    fn test_partial_json() {
        let config = PreviewConfig::from_json(
            r#"{"preview": {"width": 90, "style": {"line_cap": "butt"}}}"#,
        )
        .unwrap();
        assert_eq!(config.preview.width, 90.0);
        assert_eq!(config.preview.height, 100.0);
        assert_eq!(config.preview.style.line_width, 1.0);
        assert_eq!(config.preview.style.line_cap, LineCap::Butt);
        assert_eq!(config.detail, SurfaceConfig::detail());
    }

    #[test]
    fn test_style_fields() {
        let style: RouteStyle =
            serde_json::from_str(r##"{"line_cap": "square", "stroke_color": "#000000"}"##).unwrap();
        assert_eq!(style.line_cap, LineCap::Square);
        assert_eq!(style.stroke_color, "#000000");
        assert_eq!(style.line_width, 3.0);
    }

    #[test]
    fn test_dpr_override() {
        let config = PreviewConfig::default()
            .with_dpr_override(Some("2.5"))
            .unwrap();
        assert_eq!(config.detail.device_pixel_ratio, 2.5);
        assert_eq!(config.preview.device_pixel_ratio, 2.5);

        assert!(PreviewConfig::default().with_dpr_override(Some("0")).is_err());
        assert!(PreviewConfig::default().with_dpr_override(Some("fast")).is_err());
        assert_eq!(
            PreviewConfig::default().with_dpr_override(None).unwrap(),
            PreviewConfig::default()
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            PreviewConfig::from_json(r#"{"detail": {"width": "wide"}}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_from_missing_file() {
        let err = PreviewConfig::from_file(Path::new("/nonexistent/preview.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
