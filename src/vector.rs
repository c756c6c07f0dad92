//! SVG output surface.
//!
//! [`SvgSurface`] turns each `stroke()` into one `<path>` element with the
//! stroke settings that were current at the time. The current transform is
//! applied to coordinates and line widths, so the document is laid out in
//! backing-buffer pixels.

use std::io;
use std::path::Path;

use ::svg::Document;
use ::svg::node::element::Path as PathElement;
use ::svg::node::element::path::Data;
use tracing::debug;

use crate::traits::{DrawingSurface, LineCap, LineJoin};

#[derive(Debug, Clone, PartialEq)]
struct StrokedPath {
    subpaths: Vec<Vec<(f64, f64)>>,
    color: String,
    width: f64,
    cap: LineCap,
    join: LineJoin,
}

impl StrokedPath {
    fn to_element(&self) -> PathElement {
        let mut data = Data::new();
        for subpath in &self.subpaths {
            let mut points = subpath.iter();
            if let Some(&(x, y)) = points.next() {
                data = data.move_to((x as f32, y as f32));
            }
            for &(x, y) in points {
                data = data.line_to((x as f32, y as f32));
            }
        }

        PathElement::new()
            .set("fill", "none")
            .set("stroke", self.color.as_str())
            .set("stroke-width", self.width)
            .set("stroke-linecap", self.cap.as_str())
            .set("stroke-linejoin", self.join.as_str())
            .set("d", data)
    }
}

/// A surface that records strokes as SVG paths.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    logical_size: (f64, f64),
    backing_size: (u32, u32),
    transform: [f64; 6],
    stroke_color: String,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    path: Vec<Vec<(f64, f64)>>,
    strokes: Vec<StrokedPath>,
}

const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            logical_size: (width, height),
            backing_size: (width.max(0.0) as u32, height.max(0.0) as u32),
            transform: IDENTITY,
            stroke_color: "#000000".to_string(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            path: Vec::new(),
            strokes: Vec::new(),
        }
    }

    /// Number of `<path>` elements the document will contain.
    pub fn path_count(&self) -> usize {
        self.strokes.len()
    }

    /// Build the SVG document for the current contents.
    pub fn document(&self) -> Document {
        let (width, height) = self.backing_size;
        self.strokes.iter().fold(
            Document::new()
                .set("width", width)
                .set("height", height)
                .set("viewBox", (0, 0, width, height)),
            |document, stroke| document.add(stroke.to_element()),
        )
    }

    pub fn to_svg_string(&self) -> String {
        self.document().to_string()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        ::svg::save(path, &self.document())
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.transform;
        (a * x + c * y + e, b * x + d * y + f)
    }

    fn scale(&self) -> f64 {
        let [a, b, c, d, _, _] = self.transform;
        (a * d - b * c).abs().sqrt()
    }
}

impl DrawingSurface for SvgSurface {
    fn logical_size(&self) -> (f64, f64) {
        self.logical_size
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        *self = Self {
            logical_size: self.logical_size,
            backing_size: (width, height),
            ..Self::new(0.0, 0.0)
        };
    }

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.transform = [a, b, c, d, e, f];
    }

    /// Paths cannot be partially erased; a rectangle covering the whole
    /// document drops every stroke, smaller ones are ignored.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x0, y0) = self.apply(x, y);
        let (x1, y1) = self.apply(x + width, y + height);
        let (w, h) = (f64::from(self.backing_size.0), f64::from(self.backing_size.1));

        if x0.min(x1) <= 0.0 && y0.min(y1) <= 0.0 && x0.max(x1) >= w && y0.max(y1) >= h {
            self.strokes.clear();
        } else {
            debug!(x, y, width, height, "partial clear ignored on SVG surface");
        }
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.stroke_color = color.to_string();
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let point = self.apply(x, y);
        self.path.push(vec![point]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let point = self.apply(x, y);
        match self.path.last_mut() {
            Some(subpath) => subpath.push(point),
            None => self.path.push(vec![point]),
        }
    }

    fn stroke(&mut self) {
        let subpaths: Vec<_> = self
            .path
            .iter()
            .filter(|subpath| subpath.len() >= 2)
            .cloned()
            .collect();
        if subpaths.is_empty() {
            return;
        }

        self.strokes.push(StrokedPath {
            subpaths,
            color: self.stroke_color.clone(),
            width: self.line_width * self.scale(),
            cap: self.line_cap,
            join: self.line_join,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RouteRenderer, RouteStyle};

    #[test]
    fn test_route_becomes_one_path() {
        let renderer = RouteRenderer::new(RouteStyle::preview(), 2.0);
        let mut surface = SvgSurface::new(160.0, 100.0);
        renderer
            .render("_p~iF~ps|U_ulLnnqC_mqNvxq`@", &mut surface)
            .unwrap();

        assert_eq!(surface.path_count(), 1);
        let svg = surface.to_svg_string();
        assert!(svg.contains("viewBox=\"0 0 320 200\""), "{}", svg);
        assert!(svg.contains("stroke=\"#7A6FF0\""));
        assert!(svg.contains("stroke-width=\"2\""));
        assert!(svg.contains("stroke-linecap=\"round\""));
        assert!(svg.contains("stroke-linejoin=\"round\""));
        assert_eq!(svg.matches("<path").count(), 1);
    }

    #[test]
    fn test_rerender_replaces_previous_route() {
        let renderer = RouteRenderer::default();
        let mut surface = SvgSurface::new(100.0, 100.0);
        renderer.render("_p~iF~ps|U_ulLnnqC", &mut surface).unwrap();
        renderer
            .render("_p~iF~ps|U_ulLnnqC_mqNvxq`@", &mut surface)
            .unwrap();
        assert_eq!(surface.path_count(), 1);
    }

    #[test]
    fn test_partial_clear_keeps_strokes() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(10.0, 10.0);
        surface.stroke();

        surface.clear_rect(0.0, 0.0, 5.0, 5.0);
        assert_eq!(surface.path_count(), 1);
        surface.clear_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(surface.path_count(), 0);
    }

    #[test]
    fn test_transform_applies_to_coordinates() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.set_transform(3.0, 0.0, 0.0, 3.0, 1.0, 2.0);
        surface.begin_path();
        surface.move_to(1.0, 1.0);
        surface.line_to(2.0, 1.0);
        surface.stroke();

        assert_eq!(surface.strokes[0].subpaths[0], vec![(4.0, 5.0), (7.0, 5.0)]);
        assert_eq!(surface.strokes[0].width, 3.0);
    }
}
