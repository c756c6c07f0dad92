use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use route_preview::activity::{load_activities, search, sort_chronologically};
use route_preview::config::{PreviewConfig, SurfaceConfig};
use route_preview::preview::{Preview, PreviewOutcome, render_batch};
use route_preview::{PixelCanvas, Polyline, SvgSurface, logging};

#[derive(Parser)]
#[command(author, version, about = "Decode and render activity route previews", long_about = None)]
struct Cli {
    /// JSON file overriding the default surface profiles.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the coordinates of an encoded polyline as JSON.
    Decode { polyline: String },

    /// Render one encoded polyline to an .svg or .png file.
    Render {
        polyline: String,

        #[arg(short, long)]
        out: PathBuf,

        /// Use the thumbnail profile instead of the detail one.
        #[arg(long, default_value_t = false)]
        preview: bool,

        #[arg(long)]
        width: Option<f64>,

        #[arg(long)]
        height: Option<f64>,

        #[arg(long)]
        dpr: Option<f64>,
    },

    /// Render a thumbnail for every activity in a JSON file.
    Batch {
        activities: PathBuf,

        #[arg(short, long)]
        out_dir: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Svg)]
        format: Format,

        /// Only activities whose name or description contains this text,
        /// newest first.
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Png,
}

impl Format {
    fn for_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Ok(Format::Svg),
            Some(ext) if ext.eq_ignore_ascii_case("png") => Ok(Format::Png),
            _ => bail!(
                "cannot tell the output format of {}: use a .svg or .png extension",
                path.display()
            ),
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Png => "png",
        }
    }
}

fn main() -> Result<()> {
    logging::init("info").context("failed to install tracing subscriber")?;

    let cli = Cli::parse();
    let config = PreviewConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Decode { polyline } => {
            let decoded = Polyline::decode(&polyline)?;
            println!("{}", serde_json::to_string_pretty(decoded.points())?);
        }
        Command::Render {
            polyline,
            out,
            preview,
            width,
            height,
            dpr,
        } => {
            let base = if preview { config.preview } else { config.detail };
            let surface = SurfaceConfig {
                width: width.unwrap_or(base.width),
                height: height.unwrap_or(base.height),
                device_pixel_ratio: dpr.unwrap_or(base.device_pixel_ratio),
                ..base
            };
            render_one(&polyline, &surface, &out)?;
        }
        Command::Batch {
            activities,
            out_dir,
            format,
            query,
        } => {
            let mut activities = load_activities(&activities)?;
            match query {
                Some(query) => {
                    activities = search(&activities, &query);
                    info!(query = %query, matches = activities.len(), "filtered activities");
                }
                None => sort_chronologically(&mut activities),
            }
            fs::create_dir_all(&out_dir)
                .with_context(|| format!("cannot create {}", out_dir.display()))?;

            match format {
                Format::Svg => {
                    let previews = render_batch(&activities, &config.preview, SvgSurface::new);
                    write_previews(&previews, &out_dir, format, |surface, path| {
                        surface.save(path).map_err(Into::into)
                    })?;
                }
                Format::Png => {
                    let previews = render_batch(&activities, &config.preview, PixelCanvas::new);
                    write_previews(&previews, &out_dir, format, |surface, path| {
                        surface.save_png(path).map_err(Into::into)
                    })?;
                }
            }
        }
    }

    Ok(())
}

fn render_one(polyline: &str, surface: &SurfaceConfig, out: &Path) -> Result<()> {
    let renderer = surface.renderer();
    match Format::for_path(out)? {
        Format::Svg => {
            let mut svg = SvgSurface::new(surface.width, surface.height);
            renderer.render(polyline, &mut svg)?;
            svg.save(out)
                .with_context(|| format!("cannot write {}", out.display()))?;
        }
        Format::Png => {
            let mut canvas = PixelCanvas::new(surface.width, surface.height);
            renderer.render(polyline, &mut canvas)?;
            canvas
                .save_png(out)
                .with_context(|| format!("cannot write {}", out.display()))?;
        }
    }
    info!(path = %out.display(), "route written");
    Ok(())
}

fn write_previews<D>(
    previews: &[Preview<i64, D>],
    out_dir: &Path,
    format: Format,
    save: impl Fn(&D, &Path) -> Result<()>,
) -> Result<()> {
    for preview in previews {
        match &preview.outcome {
            PreviewOutcome::Rendered { surface, .. } => {
                let path = out_dir.join(format!("{}.{}", preview.id, format.extension()));
                save(surface, &path).with_context(|| format!("cannot write {}", path.display()))?;
            }
            PreviewOutcome::Skipped => info!(activity = preview.id, "no route, skipped"),
            PreviewOutcome::Failed(error) => {
                warn!(activity = preview.id, error = %error, "preview failed")
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert!(Format::for_path(Path::new("route.svg")).unwrap() == Format::Svg);
        assert!(Format::for_path(Path::new("out/ROUTE.PNG")).unwrap() == Format::Png);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        for path in ["route.jpg", "route", "route.svg.gz"] {
            let err = Format::for_path(Path::new(path)).unwrap_err();
            assert!(err.to_string().contains(path), "{}", err);
        }
    }

    #[test]
    fn test_render_refuses_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("route.jpg");

        assert!(render_one("_p~iF~ps|U_ulLnnqC", &SurfaceConfig::detail(), &out).is_err());
        assert!(!out.exists());
    }
}
