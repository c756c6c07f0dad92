//! route-preview
//!
//! Decodes activity routes from the encoded polyline format and draws them,
//! fitted and centered, onto any [`DrawingSurface`].
//!
//! ```
//! use route_preview::{CommandRecorder, RouteRenderer, RouteStyle};
//!
//! let renderer = RouteRenderer::new(RouteStyle::preview(), 2.0);
//! let mut surface = CommandRecorder::new(160.0, 100.0);
//! renderer.render("_p~iF~ps|U_ulLnnqC_mqNvxq`@", &mut surface).unwrap();
//! assert!(!surface.commands.is_empty());
//! ```

pub mod activity;
pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod polyline;
pub mod preview;
pub mod projection;
pub mod render;
pub mod traits;
pub mod vector;

pub use canvas::PixelCanvas;
pub use error::{DecodeError, RenderError};
pub use polyline::{Polyline, decode, encode};
pub use projection::{BoundingBox, Projection};
pub use render::{CommandRecorder, DrawCommand, Frame, RouteRenderer, RouteStyle, plan_frame};
pub use traits::{DrawingSurface, LineCap, LineJoin, RouteSource};
pub use vector::SvgSurface;
