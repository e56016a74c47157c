//! # Frame Compositor
//!
//! Per-frame fade step applied after rasterization, before the sink.
//!
//! The original renderer blended every frame with *itself* at weights
//! 0.9/0.1, which is arithmetically the identity, so the intended motion-blur
//! trail never appeared. [`FadeMode::SelfBlend`] reproduces that output
//! exactly. [`FadeMode::Accumulate`] is the opt-in fix: it keeps a
//! persistent accumulation buffer and blends each frame against the
//! previous output, producing a real exponential-decay trail. Output
//! differs visibly between the two, so Accumulate is never the default.

use crate::frame::FrameBuffer;
use serde::{Deserialize, Serialize};

// ============================================================================
// Fade Mode
// ============================================================================

/// Blend weight of the current frame.
const FRAME_WEIGHT: f32 = 0.9;

/// Blend weight of the second operand (the frame itself, or the retained
/// previous output in Accumulate mode).
const HISTORY_WEIGHT: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeMode {
    /// Blend the frame with itself, weights 0.9/0.1. Identity by
    /// construction; kept for output fidelity with the original.
    SelfBlend,
    /// Blend the frame with the previous composited output:
    /// `out = 0.9 * frame + 0.1 * out_prev`.
    Accumulate,
}

impl Default for FadeMode {
    fn default() -> Self {
        FadeMode::SelfBlend
    }
}

// ============================================================================
// Weighted Blend
// ============================================================================

/// Per-channel weighted sum of two equally sized frames, rounded to the
/// nearest integer and saturated to `[0, 255]`.
pub fn blend_weighted(a: &FrameBuffer, wa: f32, b: &FrameBuffer, wb: f32) -> FrameBuffer {
    debug_assert_eq!(a.width(), b.width());
    debug_assert_eq!(a.height(), b.height());

    let data: Vec<u8> = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&ca, &cb)| {
            (f32::from(ca) * wa + f32::from(cb) * wb)
                .round()
                .clamp(0.0, 255.0) as u8
        })
        .collect();
    FrameBuffer::from_parts(a.width(), a.height(), data)
}

// ============================================================================
// Compositor
// ============================================================================

/// Applies the configured fade to each frame in sequence.
pub struct Compositor {
    mode: FadeMode,
    retained: Option<FrameBuffer>,
}

impl Compositor {
    pub fn new(mode: FadeMode) -> Self {
        Self {
            mode,
            retained: None,
        }
    }

    pub fn mode(&self) -> FadeMode {
        self.mode
    }

    /// Composite one frame and return the buffer to hand to the sink.
    pub fn apply(&mut self, frame: FrameBuffer) -> FrameBuffer {
        match self.mode {
            FadeMode::SelfBlend => blend_weighted(&frame, FRAME_WEIGHT, &frame, HISTORY_WEIGHT),
            FadeMode::Accumulate => {
                let prev = self
                    .retained
                    .take()
                    .unwrap_or_else(|| FrameBuffer::new(frame.width(), frame.height()));
                let out = blend_weighted(&frame, FRAME_WEIGHT, &prev, HISTORY_WEIGHT);
                self.retained = Some(out.clone());
                out
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
