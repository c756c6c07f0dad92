//! Fits a route into a pixel area.
//!
//! Plain equirectangular fit: longitude maps to X, latitude to Y (flipped,
//! since latitude grows northward and pixel rows grow downward), one shared
//! scale so the route keeps its aspect ratio, centered with a margin.

use serde::{Deserialize, Serialize};

/// Fraction of the surface the route may occupy along its binding axis.
pub const MARGIN_FACTOR: f64 = 0.9;

/// Smallest axis-aligned box containing every point of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Min/max reduction over `points`; `None` when there are no points.
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (&(lat, lng), rest) = points.split_first()?;
        let mut bounds = Self {
            min_lat: lat,
            max_lat: lat,
            min_lng: lng,
            max_lng: lng,
        };

        for &(lat, lng) in rest {
            bounds.min_lat = bounds.min_lat.min(lat);
            bounds.max_lat = bounds.max_lat.max(lat);
            bounds.min_lng = bounds.min_lng.min(lng);
            bounds.max_lng = bounds.max_lng.max(lng);
        }

        Some(bounds)
    }

    /// Extent in degrees of latitude.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Extent in degrees of longitude.
    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }
}

/// Scale and offsets mapping geographic coordinates into logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Pixels per degree, shared by both axes.
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub bounds: BoundingBox,
}

impl Projection {
    /// Fits `bounds` into a `width` x `height` area.
    ///
    /// An axis with zero extent (a due north-south or east-west route) does
    /// not constrain the scale. When both extents are zero the route is a
    /// single spot and its extent is taken as one degree, which centers it.
    /// The result is finite for any finite, positive `width` and `height`.
    pub fn fit(bounds: BoundingBox, width: f64, height: f64) -> Self {
        let scale_x = axis_scale(width, bounds.lng_span());
        let scale_y = axis_scale(height, bounds.lat_span());

        let mut fitted = scale_x.min(scale_y);
        if !fitted.is_finite() {
            fitted = width.min(height);
        }
        let scale = fitted * MARGIN_FACTOR;

        let route_width = bounds.lng_span() * scale;
        let route_height = bounds.lat_span() * scale;

        Self {
            scale,
            offset_x: (width - route_width) / 2.0,
            offset_y: (height - route_height) / 2.0,
            bounds,
        }
    }

    /// Logical pixel position of a (latitude, longitude) point.
    pub fn project(&self, (lat, lng): (f64, f64)) -> (f64, f64) {
        let x = self.offset_x + (lng - self.bounds.min_lng) * self.scale;
        let y = self.offset_y + (self.bounds.max_lat - lat) * self.scale;
        (x, y)
    }

    /// Size of the projected route in logical pixels.
    pub fn route_size(&self) -> (f64, f64) {
        (
            self.bounds.lng_span() * self.scale,
            self.bounds.lat_span() * self.scale,
        )
    }
}

fn axis_scale(size: f64, span: f64) -> f64 {
    if span > 0.0 {
        size / span
    } else {
        f64::INFINITY
    }
}
