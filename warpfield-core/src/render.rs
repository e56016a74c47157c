//! # Render Loop
//!
//! The single-threaded control loop tying the pipeline together. Per
//! frame: step the simulation, rasterize into a fresh buffer, composite,
//! hand the buffer to the sink. Exactly `fps * duration` frames are
//! produced, then the sink is finalized. Any sink failure aborts the
//! run; there is no mid-run recovery.

use crate::composite::{Compositor, FadeMode};
use crate::frame::FrameBuffer;
use crate::progress::{ProgressReport, ProgressReporter};
use crate::raster::Rasterizer;
use crate::sink::{FrameSink, SinkError};
use crate::star::{FieldMode, Starfield};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

// ============================================================================
// Configuration
// ============================================================================

/// Fixed per-run canvas and field parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub duration_secs: u32,
    pub star_target: usize,
    pub mode: FieldMode,
    pub fade: FadeMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 60,
            duration_secs: 60,
            star_target: 1000,
            mode: FieldMode::default(),
            fade: FadeMode::default(),
        }
    }
}

impl RenderConfig {
    pub fn total_frames(&self) -> u64 {
        u64::from(self.fps) * u64::from(self.duration_secs)
    }
}

// ============================================================================
// Run Statistics
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub frames: u64,
    pub elapsed: Duration,
}

// ============================================================================
// Render Loop
// ============================================================================

/// Render the full run into `sink`, invoking `on_progress` for each
/// periodic report (every 60 frames).
pub fn render<R, S, F>(
    config: &RenderConfig,
    rng: &mut R,
    sink: &mut S,
    mut on_progress: F,
) -> Result<RenderStats, SinkError>
where
    R: Rng,
    S: FrameSink,
    F: FnMut(ProgressReport),
{
    let total_frames = config.total_frames();
    let started = Instant::now();

    tracing::info!(
        "render start: {}x{} @ {} fps, {} frames, {} stars, mode {:?}",
        config.width,
        config.height,
        config.fps,
        total_frames,
        config.star_target,
        config.mode
    );

    let mut field = Starfield::new(config.mode, config.star_target, rng);
    let raster = Rasterizer::new(config.width, config.height);
    let mut compositor = Compositor::new(config.fade);
    let reporter = ProgressReporter::new(total_frames);

    for frame_index in 0..total_frames {
        field.step(rng);
        let frame = raster.rasterize(field.stars());
        let frame = compositor.apply(frame);
        sink.write_frame(&frame)?;

        if let Some(report) = reporter.checkpoint(frame_index + 1) {
            on_progress(report);
        }
    }

    sink.finish()?;

    let stats = RenderStats {
        frames: total_frames,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        "render done: {} frames in {:.1}s",
        stats.frames,
        stats.elapsed.as_secs_f64()
    );
    Ok(stats)
}

/// Rasterize and composite a single frame without a sink. Dry-run path
/// for previews.
pub fn render_single_frame<R: Rng>(config: &RenderConfig, rng: &mut R) -> FrameBuffer {
    let mut field = Starfield::new(config.mode, config.star_target, rng);
    field.step(rng);
    let raster = Rasterizer::new(config.width, config.height);
    let mut compositor = Compositor::new(config.fade);
    compositor.apply(raster.rasterize(field.stars()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::buffer_size;
    use crate::sink::MemorySink;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config(mode: FieldMode) -> RenderConfig {
        RenderConfig {
            width: 32,
            height: 32,
            fps: 3,
            duration_secs: 2,
            star_target: 8,
            mode,
            fade: FadeMode::SelfBlend,
        }
    }

    #[test]
    fn delivers_exactly_fps_times_duration_frames() {
        let config = small_config(FieldMode::ContinuousSpawn);
        let mut rng = StdRng::seed_from_u64(7);
        let mut sink = MemorySink::new(config.width, config.height);

        let stats = render(&config, &mut rng, &mut sink, |_| {}).unwrap();

        assert_eq!(stats.frames, 6);
        assert_eq!(sink.frames().len(), 6);
        assert!(sink.finished());
        for frame in sink.frames() {
            assert_eq!(frame.len(), buffer_size(config.width, config.height));
        }
    }

    #[test]
    fn compound_mode_renders_too() {
        let config = small_config(FieldMode::Compound);
        let mut rng = StdRng::seed_from_u64(11);
        let mut sink = MemorySink::new(config.width, config.height);

        let stats = render(&config, &mut rng, &mut sink, |_| {}).unwrap();
        assert_eq!(stats.frames, config.total_frames());
        assert!(sink.finished());
    }

    #[test]
    fn progress_fires_on_sixty_frame_boundaries() {
        let config = RenderConfig {
            fps: 60,
            duration_secs: 2,
            ..small_config(FieldMode::ContinuousSpawn)
        };
        let mut rng = StdRng::seed_from_u64(3);
        let mut sink = MemorySink::new(config.width, config.height);
        let mut reported = Vec::new();

        render(&config, &mut rng, &mut sink, |report| {
            reported.push(report.frames_done);
        })
        .unwrap();

        assert_eq!(reported, vec![60, 120]);
    }

    #[test]
    fn sink_failure_aborts_the_run() {
        let config = small_config(FieldMode::ContinuousSpawn);
        let mut rng = StdRng::seed_from_u64(5);
        // Wrong resolution: the first write must fail and propagate.
        let mut sink = MemorySink::new(1, 1);

        let result = render(&config, &mut rng, &mut sink, |_| {});
        assert!(result.is_err());
        assert!(sink.frames().is_empty());
    }

    #[test]
    fn single_frame_preview_matches_canvas_size() {
        let config = small_config(FieldMode::Compound);
        let mut rng = StdRng::seed_from_u64(9);
        let frame = render_single_frame(&config, &mut rng);
        assert_eq!(frame.width(), 32);
        assert_eq!(frame.height(), 32);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = RenderConfig {
            mode: FieldMode::Compound,
            fade: FadeMode::Accumulate,
            ..RenderConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: RenderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mode, FieldMode::Compound);
        assert_eq!(back.fade, FadeMode::Accumulate);
        assert_eq!(back.total_frames(), config.total_frames());
    }

    #[test]
    fn default_config_matches_the_production_run() {
        let config = RenderConfig::default();
        assert_eq!(config.width, 1920);
        assert_eq!(config.height, 1080);
        assert_eq!(config.fps, 60);
        assert_eq!(config.duration_secs, 60);
        assert_eq!(config.star_target, 1000);
        assert_eq!(config.total_frames(), 3600);
    }
}
