//! # Warpfield Core
//!
//! CPU starfield simulation and frame rasterization for offline video rendering.

// ============================================================================
// Simulation
// ============================================================================
pub mod star;

// ============================================================================
// Frame Processing
// ============================================================================
pub mod frame;
pub mod raster;
pub mod composite;

// ============================================================================
// Output
// ============================================================================
pub mod sink;
pub mod output;

// ============================================================================
// Run Loop
// ============================================================================
pub mod progress;
pub mod render;

// ============================================================================
// Version
// ============================================================================
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
