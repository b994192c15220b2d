use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{debug, info};

use trellis::draw::{BLUE, GREEN, ORANGE, WHITE};
use trellis::path::parse_absolute;
use trellis::scene::Clip;
use trellis::shape::ArrowSpec;
use trellis::{
    AnimateConfig, AnimationTarget, AttrKey, Attrs, Canvas, CanvasBuilder, Color, Config, Easing,
    ElementConfig, ManualClock, ManualScheduler, Matrix, ShapeType,
};

#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(version, about = "Render a retained-mode scene graph demo to PNG")]
struct Cli {
    /// Where to write the rendered PNG
    #[arg(long, short = 'o', value_name = "PNG")]
    out: PathBuf,

    /// Configuration file (defaults to ~/.config/trellis/config.toml)
    #[arg(long, short = 'c', value_name = "TOML")]
    config: Option<PathBuf>,

    /// Frames to run before writing the image
    #[arg(long, short = 'f', default_value_t = 30)]
    frames: u32,

    /// Canvas width, overriding the configuration
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height, overriding the configuration
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(width) = cli.width {
        config.canvas.width = width;
    }
    if let Some(height) = cli.height {
        config.canvas.height = height;
    }
    config.validate_and_clamp();

    let clock = ManualClock::new();
    let mut canvas = CanvasBuilder::from_config(&config)
        .scheduler(ManualScheduler::new())
        .clock(clock.clone())
        .build()
        .context("Failed to create canvas")?;

    build_demo(&mut canvas).context("Failed to build demo scene")?;

    let interval = config.animation.frame_interval_ms;
    let mut painted = 0;
    for frame in 0..cli.frames {
        clock.advance(interval);
        if let Some(report) = canvas.poll()? {
            debug!("frame {frame}: {:?}", report.kind);
            painted += 1;
        }
    }
    // Flush whatever the last tick left pending.
    if canvas.has_pending_frame() {
        canvas.run_frame()?;
    }

    canvas
        .write_png(&cli.out)
        .with_context(|| format!("Failed to export {}", cli.out.display()))?;
    info!("{painted} of {} frame(s) painted", cli.frames);
    println!("Wrote {}", cli.out.display());
    Ok(())
}

/// Lays out a small scene exercising groups, clipping, arrows, text, and
/// animation, scaled to the canvas size.
fn build_demo(canvas: &mut Canvas) -> Result<(), trellis::SceneError> {
    let (w, h) = (canvas.width() as f64, canvas.height() as f64);
    let root = canvas.root();

    let panel = canvas.add_shape(
        ElementConfig::shape(ShapeType::Rect)
            .name("panel")
            .attr(AttrKey::X, w * 0.05)
            .attr(AttrKey::Y, h * 0.05)
            .attr(AttrKey::Width, w * 0.9)
            .attr(AttrKey::Height, h * 0.9)
            .attr(AttrKey::Radius, 12.0)
            .attr(AttrKey::Fill, Color::from_rgb8(0xf4, 0xf1, 0xea))
            .attr(AttrKey::Stroke, Color::from_rgb8(0x55, 0x55, 0x55))
            .attr(AttrKey::LineWidth, 2.0),
    )?;
    canvas.to_back(panel);

    let clipped = canvas.add_child(
        root,
        ElementConfig::group().name("badge").clip(Clip::new(
            ShapeType::Circle,
            Attrs::new()
                .with(AttrKey::X, w * 0.25)
                .with(AttrKey::Y, h * 0.35)
                .with(AttrKey::R, h * 0.18),
        )),
    )?;
    canvas.add_child(
        clipped,
        ElementConfig::shape(ShapeType::Polygon)
            .attr(
                AttrKey::Points,
                vec![
                    (w * 0.05, h * 0.15),
                    (w * 0.45, h * 0.2),
                    (w * 0.3, h * 0.6),
                ],
            )
            .attr(AttrKey::Fill, ORANGE),
    )?;

    let ball = canvas.add_shape(
        ElementConfig::shape(ShapeType::Circle)
            .id("ball")
            .attr(AttrKey::X, w * 0.2)
            .attr(AttrKey::Y, h * 0.75)
            .attr(AttrKey::R, h * 0.06)
            .attr(AttrKey::Fill, BLUE),
    )?;

    canvas.add_shape(
        ElementConfig::shape(ShapeType::Line)
            .attr(AttrKey::X1, w * 0.55)
            .attr(AttrKey::Y1, h * 0.2)
            .attr(AttrKey::X2, w * 0.85)
            .attr(AttrKey::Y2, h * 0.45)
            .attr(AttrKey::Stroke, Color::from_rgb8(0x33, 0x33, 0x33))
            .attr(AttrKey::LineWidth, 2.0)
            .attr(AttrKey::LineDash, vec![6.0, 3.0])
            .attr(AttrKey::EndArrow, ArrowSpec::Default),
    )?;

    canvas.add_shape(
        ElementConfig::shape(ShapeType::Path)
            .attr(
                AttrKey::Path,
                parse_absolute("M 0 0 C 20 -30 60 -30 80 0 S 140 30 160 0")?,
            )
            .attr(AttrKey::Stroke, GREEN)
            .attr(AttrKey::LineWidth, 3.0)
            .attr(AttrKey::Matrix, Matrix::translation(w * 0.5, h * 0.65)),
    )?;

    canvas.add_shape(
        ElementConfig::shape(ShapeType::Text)
            .attr(AttrKey::X, w * 0.55)
            .attr(AttrKey::Y, h * 0.12)
            .attr(AttrKey::Text, "trellis")
            .attr(AttrKey::FontSize, 20.0)
            .attr(AttrKey::Fill, Color::from_rgb8(0x22, 0x22, 0x22)),
    )?;

    let spinner = canvas.add_shape(
        ElementConfig::shape(ShapeType::Rect)
            .attr(AttrKey::X, w * 0.75 - 15.0)
            .attr(AttrKey::Y, h * 0.75 - 15.0)
            .attr(AttrKey::Width, 30.0)
            .attr(AttrKey::Height, 30.0)
            .attr(AttrKey::Fill, WHITE)
            .attr(AttrKey::Stroke, BLUE),
    )?;

    canvas.animate(
        ball,
        Attrs::new()
            .with(AttrKey::X, w * 0.45)
            .with(AttrKey::Fill, ORANGE),
        AnimateConfig::new(400.0).easing(Easing::CubicInOut),
    );
    let (cx, cy) = (w * 0.75, h * 0.75);
    canvas.animate(
        spinner,
        AnimationTarget::frame(move |t| {
            let spin = Matrix::translation(cx, cy)
                .multiply(&Matrix::rotation(t * PI / 2.0))
                .multiply(&Matrix::translation(-cx, -cy));
            Attrs::new().with(AttrKey::Matrix, spin)
        }),
        600.0,
    );
    Ok(())
}
