//! # Frame Buffer
//!
//! Fixed-resolution RGB24 pixel buffer. One buffer is created per video
//! frame, drawn into, and handed to the sink; buffers are never reused
//! across frames, which keeps the black-canvas-per-frame invariant free.

// ============================================================================
// Pixel Layout
// ============================================================================

/// Bytes per pixel (packed RGB, 8 bits per channel).
pub const BYTES_PER_PIXEL: usize = 3;

/// Buffer size in bytes for a given resolution.
pub fn buffer_size(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}

// ============================================================================
// Frame Buffer
// ============================================================================

/// A single RGB24 video frame, implicitly black at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; buffer_size(width, height)],
        }
    }

    /// Wrap existing pixel data. Panics if the length does not match the
    /// resolution; callers construct the data from a sized iteration.
    pub fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), buffer_size(width, height));
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed RGB24 bytes, row-major, top-left origin.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Is the signed coordinate inside `[0, width) x [0, height)`?
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as u32) < self.width && y >= 0 && (y as u32) < self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Write one pixel. Out-of-bounds coordinates are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if !self.contains(x, y) {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        self.data[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&rgb);
    }

    /// Read one pixel, or `None` when out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        if !self.contains(x, y) {
            return None;
        }
        let idx = self.index(x as u32, y as u32);
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Draw a 1-pixel line from `(x0, y0)` to `(x1, y1)` with Bresenham's
    /// algorithm. Each pixel write is bounds-guarded.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, rgb: [u8; 3]) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.put_pixel(x, y, rgb);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Number of pixels that are not pure black.
    pub fn lit_pixels(&self) -> usize {
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .filter(|px| px.iter().any(|&c| c != 0))
            .count()
    }
}

// ============================================================================
// Tests
// ============================================================================
