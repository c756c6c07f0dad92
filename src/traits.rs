//! Seams between the renderer and its hosts.
//!
//! Hosts implement these for their own surfaces and data models; the
//! crate ships [`PixelCanvas`](crate::canvas::PixelCanvas) and
//! [`SvgSurface`](crate::vector::SvgSurface) as ready-made surfaces.

use serde::{Deserialize, Serialize};

/// A 2D raster target with an immediate-mode path API.
///
/// The logical size is what the host lays the surface out at; the backing
/// buffer may be larger (device pixel ratio). Coordinates passed to path
/// methods go through the current transform.
pub trait DrawingSurface {
    /// Current layout size in logical pixels (width, height).
    fn logical_size(&self) -> (f64, f64);

    /// Resize the physical pixel buffer. Resets the surface contents and
    /// transform.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Replace the current transform.
    ///
    /// Matrix layout: `[a c e; b d f]`, mapping `(x, y)` to
    /// `(a*x + c*y + e, b*x + d*y + f)`.
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64);

    /// Clear a rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Set the stroke color as a CSS hex color (`#rrggbb`).
    fn set_stroke_color(&mut self, color: &str);

    fn set_line_width(&mut self, width: f64);

    fn set_line_cap(&mut self, cap: LineCap);

    fn set_line_join(&mut self, join: LineJoin);

    /// Discard the current path and start a new one.
    fn begin_path(&mut self);

    /// Start a new subpath at (x, y).
    fn move_to(&mut self, x: f64, y: f64);

    /// Extend the current subpath with a straight segment to (x, y).
    fn line_to(&mut self, x: f64, y: f64);

    /// Stroke the current path with the current stroke settings.
    fn stroke(&mut self);
}

/// Something that may carry a route, e.g. a synced activity.
pub trait RouteSource {
    type Id: Clone + std::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Encoded polyline, if the record has a route.
    fn encoded_polyline(&self) -> Option<&str>;
}

/// Shape drawn at the two ends of an open path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Shape drawn where two segments meet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

impl LineCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

impl LineJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}
