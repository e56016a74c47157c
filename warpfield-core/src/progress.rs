//! # Progress Reporting
//!
//! Periodic wall-clock statistics for long renders: elapsed time, a
//! linear extrapolation of the time remaining, the estimated finish
//! timestamp, and percent complete. Pure reporting: no effect on the
//! simulation, and the run loop works the same with reports ignored.

use chrono::{DateTime, Local};
use std::fmt;
use std::time::{Duration, Instant};

/// Frames between reports.
pub const REPORT_INTERVAL: u64 = 60;

// ============================================================================
// Reporter
// ============================================================================

pub struct ProgressReporter {
    started: Instant,
    total_frames: u64,
    interval: u64,
}

impl ProgressReporter {
    pub fn new(total_frames: u64) -> Self {
        Self::with_interval(total_frames, REPORT_INTERVAL)
    }

    pub fn with_interval(total_frames: u64, interval: u64) -> Self {
        Self {
            started: Instant::now(),
            total_frames,
            interval: interval.max(1),
        }
    }

    /// Produce a report when `frames_done` lands on an interval boundary,
    /// `None` otherwise.
    pub fn checkpoint(&self, frames_done: u64) -> Option<ProgressReport> {
        if frames_done == 0 || frames_done % self.interval != 0 {
            return None;
        }

        let elapsed = self.started.elapsed();
        let frames_remaining = self.total_frames.saturating_sub(frames_done);
        let remaining_secs =
            elapsed.as_secs_f64() / frames_done as f64 * frames_remaining as f64;
        let remaining = Duration::from_secs_f64(remaining_secs);
        let finish_at = Local::now() + chrono::Duration::seconds(remaining_secs as i64);
        let percent = frames_done as f64 / self.total_frames as f64 * 100.0;

        Some(ProgressReport {
            frames_done,
            total_frames: self.total_frames,
            elapsed,
            remaining,
            finish_at,
            percent,
        })
    }
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Clone)]
pub struct ProgressReport {
    pub frames_done: u64,
    pub total_frames: u64,
    pub elapsed: Duration,
    pub remaining: Duration,
    pub finish_at: DateTime<Local>,
    pub percent: f64,
}

/// `H:MM:SS`, matching how elapsed/remaining read on a console.
fn format_hms(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frame: {}/{}", self.frames_done, self.total_frames)?;
        writeln!(f, "Time Passed: {}", format_hms(self.elapsed))?;
        writeln!(f, "Time Remaining: {}", format_hms(self.remaining))?;
        writeln!(
            f,
            "Estimated Finish Time: {}",
            self.finish_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "Percentage Complete: {:.2}%", self.percent)?;
        write!(f, "{}", "-".repeat(50))
    }
}

// ============================================================================
// Tests
// ============================================================================
