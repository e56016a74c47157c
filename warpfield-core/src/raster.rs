//! # Star Rasterizer
//!
//! Turns particle state into pixels. Each star becomes a short oblique
//! segment: the inner endpoint sits on the star's ray, the outer endpoint
//! is stretched 10% farther out and rotated 0.01 rad, which gives the
//! comet-tail look instead of a plain radial dot.
//!
//! A segment is drawn only when both endpoints are inside the canvas.
//! Stars partially outside are skipped whole, matching the original
//! renderer; the check also guarantees no out-of-range pixel writes.

use crate::frame::FrameBuffer;
use crate::star::Star;

// ============================================================================
// Tail Geometry
// ============================================================================

/// Radius stretch of the outer endpoint relative to the star's distance.
const TAIL_STRETCH: f64 = 1.1;

/// Angular offset of the outer endpoint, in radians.
const TAIL_ANGLE_OFFSET: f64 = 0.01;

/// Stars are drawn opaque white.
pub const STAR_COLOR: [u8; 3] = [255, 255, 255];

// ============================================================================
// Rasterizer
// ============================================================================

/// Rasterizes star populations onto fresh frame buffers.
pub struct Rasterizer {
    width: u32,
    height: u32,
    center_x: f64,
    center_y: f64,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            center_x: f64::from(width) / 2.0,
            center_y: f64::from(height) / 2.0,
        }
    }

    /// Segment endpoints for one star, truncated toward zero like the
    /// original `int()` conversion.
    pub fn endpoints(&self, star: &Star) -> ((i32, i32), (i32, i32)) {
        let x = (self.center_x + star.distance * star.angle.cos()) as i32;
        let y = (self.center_y + star.distance * star.angle.sin()) as i32;

        let tail_angle = star.angle + TAIL_ANGLE_OFFSET;
        let tail_distance = star.distance * TAIL_STRETCH;
        let x2 = (self.center_x + tail_distance * tail_angle.cos()) as i32;
        let y2 = (self.center_y + tail_distance * tail_angle.sin()) as i32;

        ((x, y), (x2, y2))
    }

    /// Draw all stars into a fresh black frame.
    pub fn rasterize(&self, stars: &[Star]) -> FrameBuffer {
        let mut frame = FrameBuffer::new(self.width, self.height);
        for star in stars {
            self.draw_star(&mut frame, star);
        }
        frame
    }

    fn draw_star(&self, frame: &mut FrameBuffer, star: &Star) {
        let ((x, y), (x2, y2)) = self.endpoints(star);
        if frame.contains(x, y) && frame.contains(x2, y2) {
            frame.draw_line(x, y, x2, y2, STAR_COLOR);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn star(angle: f64, distance: f64) -> Star {
        Star {
            angle,
            distance,
            speed: None,
        }
    }

    #[test]
    fn star_outside_canvas_draws_nothing() {
        // Inner endpoint lands at (150, 50) on a 100x100 canvas.
        let raster = Rasterizer::new(100, 100);
        let frame = raster.rasterize(&[star(0.0, 500.0)]);
        assert_eq!(frame.lit_pixels(), 0);
    }

    #[test]
    fn star_with_out_of_bounds_tail_is_skipped_whole() {
        // Inner endpoint (96, 50) is visible, outer endpoint truncates to
        // x = 100 which is outside [0, 100). Nothing may be drawn.
        let raster = Rasterizer::new(100, 100);
        let s = star(0.0, 46.0);
        let ((x, y), (x2, _)) = raster.endpoints(&s);
        assert_eq!((x, y), (96, 50));
        assert_eq!(x2, 100);

        let frame = raster.rasterize(&[s]);
        assert_eq!(frame.lit_pixels(), 0);
    }

    #[test]
    fn near_star_draws_single_pixel_segment() {
        // distance 10 at angle 0: inner (60, 50), outer truncates to the
        // same pixel, so exactly one white pixel appears.
        let raster = Rasterizer::new(100, 100);
        let frame = raster.rasterize(&[star(0.0, 10.0)]);

        assert_eq!(frame.pixel(60, 50), Some(STAR_COLOR));
        assert_eq!(frame.lit_pixels(), 1);
    }

    #[test]
    fn farther_star_draws_a_tail() {
        // distance 40 at angle 0: inner (90, 50), outer (93, 50).
        let raster = Rasterizer::new(100, 100);
        let s = star(0.0, 40.0);
        let (inner, outer) = raster.endpoints(&s);
        assert_eq!(inner, (90, 50));
        assert_eq!(outer, (93, 50));

        let frame = raster.rasterize(&[s]);
        for x in 90..=93 {
            assert_eq!(frame.pixel(x, 50), Some(STAR_COLOR));
        }
        assert_eq!(frame.lit_pixels(), 4);
    }

    #[test]
    fn endpoints_truncate_toward_zero() {
        // Negative coordinates must truncate toward zero, not floor,
        // to match the original integer conversion.
        let raster = Rasterizer::new(10, 10);
        let ((x, y), _) = raster.endpoints(&star(std::f64::consts::PI, 5.5));
        // 5.0 + 5.5 * cos(pi) = -0.5 -> truncates to 0 (still on canvas).
        assert_eq!(x, 0);
        assert_eq!(y, 5);
    }
}
