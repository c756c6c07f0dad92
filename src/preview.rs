//! Thumbnails for lists of activities.
//!
//! Each source gets its own surface, so previews render in parallel on the
//! rayon pool. Results come back in input order; one bad route never stops
//! the rest of the batch.

use rayon::prelude::*;
use tracing::info;

use crate::config::SurfaceConfig;
use crate::error::RenderError;
use crate::projection::Projection;
use crate::traits::{DrawingSurface, RouteSource};

/// What happened to one source of a batch.
#[derive(Debug)]
pub enum PreviewOutcome<D> {
    Rendered { surface: D, projection: Projection },
    /// The source has no route.
    Skipped,
    Failed(RenderError),
}

#[derive(Debug)]
pub struct Preview<Id, D> {
    pub id: Id,
    pub outcome: PreviewOutcome<D>,
}

/// Counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rendered: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn of<Id, D>(previews: &[Preview<Id, D>]) -> Self {
        previews
            .iter()
            .fold(Self::default(), |mut summary, preview| {
                match preview.outcome {
                    PreviewOutcome::Rendered { .. } => summary.rendered += 1,
                    PreviewOutcome::Skipped => summary.skipped += 1,
                    PreviewOutcome::Failed(_) => summary.failed += 1,
                }
                summary
            })
    }
}

/// Render every source onto a fresh surface built by `new_surface` with the
/// configured logical size.
pub fn render_batch<S, D, F>(
    sources: &[S],
    config: &SurfaceConfig,
    new_surface: F,
) -> Vec<Preview<S::Id, D>>
where
    S: RouteSource + Sync,
    S::Id: Send,
    D: DrawingSurface + Send,
    F: Fn(f64, f64) -> D + Sync,
{
    let renderer = config.renderer();

    let previews: Vec<_> = sources
        .par_iter()
        .map(|source| {
            let id = source.id().clone();
            let Some(encoded) = source.encoded_polyline() else {
                return Preview {
                    id,
                    outcome: PreviewOutcome::Skipped,
                };
            };

            let mut surface = new_surface(config.width, config.height);
            let outcome = match renderer.render(encoded, &mut surface) {
                Ok(projection) => PreviewOutcome::Rendered {
                    surface,
                    projection,
                },
                Err(error) => PreviewOutcome::Failed(error),
            };
            Preview { id, outcome }
        })
        .collect();

    let summary = BatchSummary::of(&previews);
    info!(
        rendered = summary.rendered,
        skipped = summary.skipped,
        failed = summary.failed,
        "rendered preview batch"
    );
    previews
}
