//! Route rasterization.
//!
//! Rendering is split in two steps. [`plan_frame`] is pure: it projects a
//! decoded route and produces the full list of [`DrawCommand`]s for one
//! frame. [`Frame::apply`] replays those commands on any
//! [`DrawingSurface`]. [`RouteRenderer`] runs decode, plan and apply in one
//! call, which is what the activity views use.
//!
//! # Frame layout
//!
//! Every frame resizes the backing buffer to `logical * dpr`, installs a
//! uniform `dpr` scale so drawing happens in logical pixels, clears the
//! whole logical area, sets the stroke style and strokes the route as a
//! single path.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::polyline::Polyline;
use crate::projection::Projection;
use crate::traits::{DrawingSurface, LineCap, LineJoin};

/// Route color used by every activity view.
pub const ROUTE_COLOR: &str = "#7A6FF0";

/// Line width of the full-size activity view.
pub const DETAIL_LINE_WIDTH: f64 = 3.0;

/// Line width of list thumbnails.
pub const PREVIEW_LINE_WIDTH: f64 = 1.0;

/// Largest backing buffer a frame may request, in device pixels (8192 x 8192).
pub const MAX_BACKING_PIXELS: u64 = 1 << 26;

/// Stroke settings for a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStyle {
    pub stroke_color: String,
    /// Width in logical pixels.
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self::detail()
    }
}

impl RouteStyle {
    /// Style of the full-size activity view.
    pub fn detail() -> Self {
        Self {
            stroke_color: ROUTE_COLOR.to_string(),
            line_width: DETAIL_LINE_WIDTH,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
        }
    }

    /// Style of the compact thumbnail shown in activity lists.
    pub fn preview() -> Self {
        Self {
            line_width: PREVIEW_LINE_WIDTH,
            ..Self::detail()
        }
    }
}

/// One call on a [`DrawingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetBackingSize { width: u32, height: u32 },
    SetTransform { a: f64, b: f64, c: f64, d: f64, e: f64, f: f64 },
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    SetStrokeColor(String),
    SetLineWidth(f64),
    SetLineCap(LineCap),
    SetLineJoin(LineJoin),
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Stroke,
}

impl DrawCommand {
    /// Dispatch this command to `surface`.
    pub fn apply_to<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        match self {
            DrawCommand::SetBackingSize { width, height } => {
                surface.set_backing_size(*width, *height)
            }
            DrawCommand::SetTransform { a, b, c, d, e, f } => {
                surface.set_transform(*a, *b, *c, *d, *e, *f)
            }
            DrawCommand::ClearRect {
                x,
                y,
                width,
                height,
            } => surface.clear_rect(*x, *y, *width, *height),
            DrawCommand::SetStrokeColor(color) => surface.set_stroke_color(color),
            DrawCommand::SetLineWidth(width) => surface.set_line_width(*width),
            DrawCommand::SetLineCap(cap) => surface.set_line_cap(*cap),
            DrawCommand::SetLineJoin(join) => surface.set_line_join(*join),
            DrawCommand::BeginPath => surface.begin_path(),
            DrawCommand::MoveTo { x, y } => surface.move_to(*x, *y),
            DrawCommand::LineTo { x, y } => surface.line_to(*x, *y),
            DrawCommand::Stroke => surface.stroke(),
        }
    }
}

/// A fully planned frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
    pub projection: Projection,
}

impl Frame {
    /// Replay the frame on `surface`, in order.
    pub fn apply<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        for command in &self.commands {
            command.apply_to(surface);
        }
    }

    /// Logical pixel positions of the route, in route order.
    pub fn path_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::MoveTo { x, y } | DrawCommand::LineTo { x, y } => Some((*x, *y)),
            _ => None,
        })
    }
}

/// Plan the draw commands for `polyline` on a surface of `logical_size`.
///
/// A device pixel ratio that is not finite and positive is treated as 1.
/// A single-point route becomes a zero-length segment so round caps leave a
/// dot.
///
/// # Errors
///
/// [`RenderError::EmptyRoute`] for an empty polyline,
/// [`RenderError::EmptySurface`] when either logical dimension is not a
/// positive finite number and [`RenderError::SurfaceTooLarge`] when the
/// backing buffer would hold more than [`MAX_BACKING_PIXELS`].
pub fn plan_frame(
    polyline: &Polyline,
    logical_size: (f64, f64),
    device_pixel_ratio: f64,
    style: &RouteStyle,
) -> Result<Frame, RenderError> {
    let bounds = polyline.bounds().ok_or(RenderError::EmptyRoute)?;

    let (width, height) = logical_size;
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(RenderError::EmptySurface { width, height });
    }

    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };

    let backing_width = (width * dpr).floor();
    let backing_height = (height * dpr).floor();
    if backing_width * backing_height > MAX_BACKING_PIXELS as f64 {
        return Err(RenderError::SurfaceTooLarge {
            width: backing_width,
            height: backing_height,
        });
    }

    let projection = Projection::fit(bounds, width, height);
    debug!(
        points = polyline.len(),
        scale = projection.scale,
        offset_x = projection.offset_x,
        offset_y = projection.offset_y,
        "planned route frame"
    );

    let mut commands = Vec::with_capacity(polyline.len() + 10);
    commands.push(DrawCommand::SetBackingSize {
        width: backing_width as u32,
        height: backing_height as u32,
    });
    commands.push(DrawCommand::SetTransform {
        a: dpr,
        b: 0.0,
        c: 0.0,
        d: dpr,
        e: 0.0,
        f: 0.0,
    });
    commands.push(DrawCommand::ClearRect {
        x: 0.0,
        y: 0.0,
        width,
        height,
    });
    commands.push(DrawCommand::SetStrokeColor(style.stroke_color.clone()));
    commands.push(DrawCommand::SetLineWidth(style.line_width));
    commands.push(DrawCommand::SetLineCap(style.line_cap));
    commands.push(DrawCommand::SetLineJoin(style.line_join));
    commands.push(DrawCommand::BeginPath);

    let mut projected = polyline.points().iter().map(|&point| projection.project(point));
    if let Some((x, y)) = projected.next() {
        commands.push(DrawCommand::MoveTo { x, y });
        if polyline.len() == 1 {
            commands.push(DrawCommand::LineTo { x, y });
        }
    }
    commands.extend(projected.map(|(x, y)| DrawCommand::LineTo { x, y }));
    commands.push(DrawCommand::Stroke);

    Ok(Frame {
        commands,
        projection,
    })
}

/// Decodes and draws routes with a fixed style.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRenderer {
    style: RouteStyle,
    device_pixel_ratio: f64,
}

impl Default for RouteRenderer {
    fn default() -> Self {
        Self::new(RouteStyle::detail(), 1.0)
    }
}

impl RouteRenderer {
    pub fn new(style: RouteStyle, device_pixel_ratio: f64) -> Self {
        Self {
            style,
            device_pixel_ratio,
        }
    }

    pub fn style(&self) -> &RouteStyle {
        &self.style
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Decode `encoded` and plan a frame for a surface of `logical_size`.
    pub fn plan(&self, encoded: &str, logical_size: (f64, f64)) -> Result<Frame, RenderError> {
        let polyline = Polyline::decode(encoded)?;
        plan_frame(&polyline, logical_size, self.device_pixel_ratio, &self.style)
    }

    /// Decode `encoded` and draw it onto `surface`, replacing its contents.
    ///
    /// On error nothing is drawn and the surface keeps its previous frame;
    /// the failure is logged and returned.
    pub fn render<S: DrawingSurface + ?Sized>(
        &self,
        encoded: &str,
        surface: &mut S,
    ) -> Result<Projection, RenderError> {
        let result = self.plan(encoded, surface.logical_size());
        self.finish(result, surface)
    }

    /// Draw an already decoded route onto `surface`.
    pub fn render_polyline<S: DrawingSurface + ?Sized>(
        &self,
        polyline: &Polyline,
        surface: &mut S,
    ) -> Result<Projection, RenderError> {
        let result = plan_frame(
            polyline,
            surface.logical_size(),
            self.device_pixel_ratio,
            &self.style,
        );
        self.finish(result, surface)
    }

    fn finish<S: DrawingSurface + ?Sized>(
        &self,
        result: Result<Frame, RenderError>,
        surface: &mut S,
    ) -> Result<Projection, RenderError> {
        match result {
            Ok(frame) => {
                frame.apply(surface);
                Ok(frame.projection)
            }
            Err(err) => {
                warn!(error = %err, "route not rendered");
                Err(err)
            }
        }
    }
}

/// A surface that only records the commands it receives.
///
/// Handy for hosts that forward drawing to another API, and for tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandRecorder {
    pub size: (f64, f64),
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: (width, height),
            commands: Vec::new(),
        }
    }
}

impl DrawingSurface for CommandRecorder {
    fn logical_size(&self) -> (f64, f64) {
        self.size
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.commands
            .push(DrawCommand::SetBackingSize { width, height });
    }

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.commands
            .push(DrawCommand::SetTransform { a, b, c, d, e, f });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.commands
            .push(DrawCommand::SetStrokeColor(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::SetLineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.commands.push(DrawCommand::SetLineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.commands.push(DrawCommand::SetLineJoin(join));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}
