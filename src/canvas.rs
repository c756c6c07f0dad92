//! Software raster surface.
//!
//! [`PixelCanvas`] keeps an RGBA buffer and implements [`DrawingSurface`]
//! closely enough to preview routes off-screen: strokes are the union of
//! per-segment capsules, so joins are always round; caps follow the
//! current [`LineCap`]. Coverage is binary (no anti-aliasing) and a path is
//! composited once per stroke, so overlapping segments do not darken.

use std::path::Path;

use image::{ImageFormat, ImageResult, RgbaImage};
use tracing::{debug, warn};

use crate::color::Color;
use crate::render::MAX_BACKING_PIXELS;
use crate::traits::{DrawingSurface, LineCap, LineJoin};

/// Affine transform `[a c e; b d f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Transform {
    const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Length scale of the transform, used for line widths.
    fn scale(&self) -> f64 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

/// How a segment end is shaped.
#[derive(Debug, Clone, Copy, PartialEq)]
enum End {
    Round,
    Flat,
    Extended,
}

impl From<LineCap> for End {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Round => End::Round,
            LineCap::Butt => End::Flat,
            LineCap::Square => End::Extended,
        }
    }
}

/// An off-screen RGBA surface.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    logical_size: (f64, f64),
    image: RgbaImage,
    transform: Transform,
    stroke_color: Color,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    /// Subpaths in device pixels.
    path: Vec<Vec<(f64, f64)>>,
}

impl PixelCanvas {
    /// A transparent canvas laid out at `width` x `height` logical pixels,
    /// with a backing buffer of the same size until the first render. A
    /// size above [`MAX_BACKING_PIXELS`] starts with an empty buffer.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            logical_size: (width, height),
            image: backing_buffer(width.max(0.0) as u32, height.max(0.0) as u32),
            transform: Transform::IDENTITY,
            stroke_color: Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            path: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Color at a backing-buffer pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|pixel| Color::from(*pixel))
    }

    /// Number of pixels that are not fully transparent.
    pub fn painted_pixels(&self) -> usize {
        self.image.pixels().filter(|pixel| pixel.0[3] != 0).count()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Line join requested by the last frame. Joins are always rendered
    /// round.
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    /// Write the backing buffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.image.save_with_format(path, ImageFormat::Png)
    }

    fn stroke_subpath(&self, points: &[(f64, f64)], radius: f64, mask: &mut [bool]) {
        let cap = End::from(self.line_cap);
        let last = points.len() - 2;

        for (index, pair) in points.windows(2).enumerate() {
            let start = if index == 0 { cap } else { End::Round };
            let end = if index == last { cap } else { End::Round };
            self.cover_segment(pair[0], pair[1], radius, start, end, mask);
        }
    }

    fn cover_segment(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        radius: f64,
        start: End,
        end: End,
        mask: &mut [bool],
    ) {
        let width = self.image.width();
        let height = self.image.height();
        let stride = width as usize;
        let reach = radius * std::f64::consts::SQRT_2 + 1.0;

        let min_x = (from.0.min(to.0) - reach).floor().max(0.0) as u32;
        let min_y = (from.1.min(to.1) - reach).floor().max(0.0) as u32;
        let max_x = (from.0.max(to.0) + reach).ceil().min(f64::from(width)) as u32;
        let max_y = (from.1.max(to.1) + reach).ceil().min(f64::from(height)) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                if covers(center, from, to, radius, start, end) {
                    mask[y as usize * stride + x as usize] = true;
                }
            }
        }
    }
}

/// A transparent buffer, or an empty one when `width * height` exceeds
/// [`MAX_BACKING_PIXELS`].
fn backing_buffer(width: u32, height: u32) -> RgbaImage {
    if u64::from(width) * u64::from(height) > MAX_BACKING_PIXELS {
        warn!(width, height, "backing buffer too large, left empty");
        return RgbaImage::new(0, 0);
    }
    RgbaImage::new(width, height)
}

/// Whether `p` lies inside the stroke outline of segment `a`-`b`.
fn covers(p: (f64, f64), a: (f64, f64), b: (f64, f64), r: f64, start: End, end: End) -> bool {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let (px, py) = (p.0 - a.0, p.1 - a.1);

    if len_sq == 0.0 {
        return match (start, end) {
            (End::Round, _) | (_, End::Round) => px * px + py * py <= r * r,
            (End::Extended, _) | (_, End::Extended) => px.abs() <= r && py.abs() <= r,
            _ => false,
        };
    }

    let len = len_sq.sqrt();
    let along = (px * dx + py * dy) / len;
    let across = (px * dy - py * dx).abs() / len;

    if along < 0.0 {
        match start {
            End::Round => px * px + py * py <= r * r,
            End::Extended => along >= -r && across <= r,
            End::Flat => false,
        }
    } else if along > len {
        match end {
            End::Round => {
                let (qx, qy) = (p.0 - b.0, p.1 - b.1);
                qx * qx + qy * qy <= r * r
            }
            End::Extended => along <= len + r && across <= r,
            End::Flat => false,
        }
    } else {
        across <= r
    }
}

impl DrawingSurface for PixelCanvas {
    fn logical_size(&self) -> (f64, f64) {
        self.logical_size
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.image = backing_buffer(width, height);
        self.transform = Transform::IDENTITY;
        self.stroke_color = Color::BLACK;
        self.line_width = 1.0;
        self.line_cap = LineCap::Butt;
        self.line_join = LineJoin::Miter;
        self.path.clear();
    }

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.transform = Transform { a, b, c, d, e, f };
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let corners = [
            self.transform.apply(x, y),
            self.transform.apply(x + width, y),
            self.transform.apply(x, y + height),
            self.transform.apply(x + width, y + height),
        ];
        let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

        let transparent = image::Rgba::from(Color::TRANSPARENT);
        for (px, py, pixel) in self.image.enumerate_pixels_mut() {
            let cx = f64::from(px) + 0.5;
            let cy = f64::from(py) + 0.5;
            if cx >= min_x && cx <= max_x && cy >= min_y && cy <= max_y {
                *pixel = transparent;
            }
        }
    }

    fn set_stroke_color(&mut self, color: &str) {
        match Color::from_hex(color) {
            Some(parsed) => self.stroke_color = parsed,
            None => debug!(color, "ignoring unparseable stroke color"),
        }
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
        self.path.push(vec![self.transform.apply(x, y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let point = self.transform.apply(x, y);
        match self.path.last_mut() {
            Some(subpath) => subpath.push(point),
            None => self.path.push(vec![point]),
        }
    }

    fn stroke(&mut self) {
        let width = self.image.width();
        let height = self.image.height();
        if width == 0 || height == 0 {
            return;
        }

        let radius = self.line_width * self.transform.scale() / 2.0;
        let stride = width as usize;
        let mut mask = vec![false; stride * height as usize];
        for subpath in self.path.iter().filter(|subpath| subpath.len() >= 2) {
            self.stroke_subpath(subpath, radius, &mut mask);
        }

        for (index, covered) in mask.iter().enumerate() {
            if *covered {
                let x = (index % stride) as u32;
                let y = (index / stride) as u32;
                let dst = Color::from(*self.image.get_pixel(x, y));
                self.image
                    .put_pixel(x, y, self.stroke_color.over(dst).into());
            }
        }
    }
}
