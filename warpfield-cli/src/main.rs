//! # Warpfield Renderer
//!
//! Renders a fixed-length starfield warp video to `render/<epoch>.mp4`
//! using warpfield-core and the system ffmpeg as the encode sink.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use warpfield_core::composite::FadeMode;
use warpfield_core::output::{timestamped_output_path, DEFAULT_RENDER_DIR};
use warpfield_core::render::{render, render_single_frame, RenderConfig};
use warpfield_core::sink::FfmpegSink;
use warpfield_core::star::FieldMode;

// ============================================================================
// Options
// ============================================================================

struct CliOptions {
    config: RenderConfig,
    out_dir: PathBuf,
    preview: Option<PathBuf>,
    quiet: bool,
}

impl CliOptions {
    fn from_args(args: &[String]) -> Result<Self> {
        let mut config = RenderConfig::default();
        let mut out_dir = PathBuf::from(DEFAULT_RENDER_DIR);
        let mut preview = None;
        let mut quiet = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--compound" => {
                    config.mode = FieldMode::Compound;
                }
                "--continuous" => {
                    config.mode = FieldMode::ContinuousSpawn;
                }
                "--fade" => {
                    i += 1;
                    let value = args.get(i).context("--fade requires a value")?;
                    config.fade = match value.as_str() {
                        "self" => FadeMode::SelfBlend,
                        "accumulate" => FadeMode::Accumulate,
                        other => bail!("unknown fade mode '{}' (self|accumulate)", other),
                    };
                }
                "--config" => {
                    i += 1;
                    let path = args.get(i).context("--config requires a path")?;
                    config = load_config(Path::new(path))?;
                }
                "--out-dir" => {
                    i += 1;
                    let path = args.get(i).context("--out-dir requires a path")?;
                    out_dir = PathBuf::from(path);
                }
                "--preview" => {
                    i += 1;
                    let path = args.get(i).context("--preview requires a path")?;
                    preview = Some(PathBuf::from(path));
                }
                "--quiet" => {
                    quiet = true;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("unknown argument '{}' (try --help)", other),
            }
            i += 1;
        }

        Ok(Self {
            config,
            out_dir,
            preview,
            quiet,
        })
    }
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn print_usage() {
    println!(
        "Warpfield v{} - starfield warp video renderer\n\n\
         Usage: warpfield [options]\n\n\
         Options:\n\
         \x20 --continuous       continuous-spawn field, constant star speed (default)\n\
         \x20 --compound         full field at start, compounding star speed\n\
         \x20 --fade <mode>      self (faithful no-op, default) | accumulate (real trails)\n\
         \x20 --config <path>    load a full RenderConfig from a JSON file\n\
         \x20 --out-dir <path>   output directory (default: render/)\n\
         \x20 --preview <path>   render one frame to a PNG and exit\n\
         \x20 --quiet            suppress the periodic progress block",
        warpfield_core::VERSION
    );
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warpfield=info")
        .init();

    let args: Vec<String> = std::env::args().collect();
    let options = CliOptions::from_args(&args)?;
    let mut rng = rand::thread_rng();

    if let Some(preview_path) = &options.preview {
        return write_preview(&options.config, &mut rng, preview_path);
    }

    let path = timestamped_output_path(&options.out_dir)
        .with_context(|| format!("failed to prepare {}", options.out_dir.display()))?;

    let config = options.config;
    let mut sink = FfmpegSink::create(&path, config.width, config.height, config.fps)?;

    let quiet = options.quiet;
    let stats = render(&config, &mut rng, &mut sink, |report| {
        if !quiet {
            println!("{}", report);
        }
    })?;

    tracing::info!(
        "{} frames rendered in {:.1}s",
        stats.frames,
        stats.elapsed.as_secs_f64()
    );
    println!("Video saved as {}", path.display());
    Ok(())
}

fn write_preview(config: &RenderConfig, rng: &mut impl rand::Rng, path: &Path) -> Result<()> {
    let frame = render_single_frame(config, rng);
    let (width, height) = (frame.width(), frame.height());
    let img = image::RgbImage::from_raw(width, height, frame.into_data())
        .context("frame buffer did not match canvas size")?;
    img.save(path)
        .with_context(|| format!("failed to write preview {}", path.display()))?;
    println!("Preview saved as {}", path.display());
    Ok(())
}
