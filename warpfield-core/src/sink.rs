//! # Video Sink
//!
//! Consumes frame buffers in strict order and serializes them into a
//! video file. The core never touches container or codec details; it
//! only guarantees ordered delivery of correctly sized RGB24 frames.
//!
//! [`FfmpegSink`] spawns the system `ffmpeg` and streams raw frames to
//! its stdin; ffmpeg owns the H.264 encode and MP4 mux. A missing or
//! failing ffmpeg is fatal for the run; there is no retry or partial
//! recovery, and a partially written file is left as-is.

use crate::frame::{buffer_size, FrameBuffer};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Encoder unavailable: {0}")]
    EncoderUnavailable(String),
    #[error("Frame size mismatch: got {got} bytes, expected {expected}")]
    SizeMismatch { got: usize, expected: usize },
    #[error("Frame write failed: {0}")]
    WriteFailed(#[from] std::io::Error),
    #[error("Encoder failed: {0}")]
    EncoderFailed(String),
    #[error("Sink already finished")]
    Finished,
}

// ============================================================================
// Sink Trait
// ============================================================================

/// Ordered consumer of finished frames.
pub trait FrameSink {
    /// Append one frame to the output stream.
    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), SinkError>;

    /// Flush and close the stream. No frames may follow.
    fn finish(&mut self) -> Result<(), SinkError>;
}

// ============================================================================
// FFmpeg Sink
// ============================================================================

/// Streams raw RGB24 frames into a spawned `ffmpeg` process that encodes
/// H.264 into an MP4 container.
pub struct FfmpegSink {
    child: Child,
    stdin: Option<ChildStdin>,
    path: PathBuf,
    frame_bytes: usize,
    frames_written: u64,
}

impl FfmpegSink {
    /// Spawn ffmpeg writing to `path`. Fails before frame 0 if ffmpeg
    /// cannot be started.
    pub fn create(path: &Path, width: u32, height: u32, fps: u32) -> Result<Self, SinkError> {
        let mut command = Command::new("ffmpeg");
        command
            .arg("-v")
            .arg("error")
            .arg("-hide_banner")
            .arg("-y")
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("rgb24")
            .arg("-s")
            .arg(format!("{}x{}", width, height))
            .arg("-r")
            .arg(fps.to_string())
            .arg("-i")
            .arg("-")
            .arg("-an")
            .arg("-c:v")
            .arg("libx264")
            .arg("-pix_fmt")
            .arg("yuv420p")
            .arg(path);

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SinkError::EncoderUnavailable(format!("ffmpeg spawn failed: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SinkError::EncoderUnavailable("ffmpeg stdin unavailable".into()))?;

        tracing::info!(
            "ffmpeg sink opened: {} ({}x{} @ {} fps)",
            path.display(),
            width,
            height,
            fps
        );

        Ok(Self {
            child,
            stdin: Some(stdin),
            path: path.to_path_buf(),
            frame_bytes: buffer_size(width, height),
            frames_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl FrameSink for FfmpegSink {
    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), SinkError> {
        let stdin = self.stdin.as_mut().ok_or(SinkError::Finished)?;
        if frame.data().len() != self.frame_bytes {
            return Err(SinkError::SizeMismatch {
                got: frame.data().len(),
                expected: self.frame_bytes,
            });
        }
        stdin.write_all(frame.data())?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        // Dropping stdin closes the pipe and lets ffmpeg finalize the file.
        let stdin = self.stdin.take().ok_or(SinkError::Finished)?;
        drop(stdin);

        let status = self
            .child
            .wait()
            .map_err(|e| SinkError::EncoderFailed(format!("ffmpeg wait failed: {}", e)))?;
        if !status.success() {
            return Err(SinkError::EncoderFailed(format!(
                "ffmpeg exited with {}",
                status
            )));
        }

        tracing::info!(
            "ffmpeg sink closed: {} frames -> {}",
            self.frames_written,
            self.path.display()
        );
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        // Abnormal teardown: close the pipe and reap the child so an
        // aborted run does not leave a zombie ffmpeg behind.
        if self.stdin.take().is_some() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

// ============================================================================
// Memory Sink
// ============================================================================

/// Retains frame copies in memory. Test double for the render loop.
pub struct MemorySink {
    frame_bytes: usize,
    frames: Vec<Vec<u8>>,
    finished: bool,
}

impl MemorySink {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame_bytes: buffer_size(width, height),
            frames: Vec::new(),
            finished: false,
        }
    }

    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    pub fn finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::Finished);
        }
        if frame.data().len() != self.frame_bytes {
            return Err(SinkError::SizeMismatch {
                got: frame.data().len(),
                expected: self.frame_bytes,
            });
        }
        self.frames.push(frame.data().to_vec());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::Finished);
        }
        self.finished = true;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
