#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use flowtrack_core::error::{FlowTrackError, Result};
use flowtrack_core::frame::Frame;
use flowtrack_core::io::ser::SER_HEADER_SIZE;
use flowtrack_core::point::Point2D;
use flowtrack_core::track::{PointTracker, TrackOutput};
use ndarray::Array2;

/// Smooth two-axis texture, evaluated with the pattern moved by (`dx`, `dy`).
///
/// Values stay within [0.1, 0.9].
pub fn textured_frame(width: usize, height: usize, dx: f32, dy: f32) -> Frame {
    let data = Array2::from_shape_fn((height, width), |(row, col)| {
        let x = col as f32 - dx;
        let y = row as f32 - dy;
        0.5 + 0.2 * (0.35 * x + 0.1 * y).sin() + 0.2 * (0.3 * y - 0.05 * x).cos()
    });
    Frame::new(data)
}

pub fn uniform_frame(width: usize, height: usize, value: f32) -> Frame {
    Frame::new(Array2::from_elem((height, width), value))
}

/// Moves every point by a fixed offset and reports it valid.
pub struct ShiftTracker {
    pub dx: f32,
    pub dy: f32,
}

impl ShiftTracker {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}

impl PointTracker for ShiftTracker {
    fn track(&self, _prev: &Frame, _next: &Frame, points: &[Point2D]) -> Result<TrackOutput> {
        Ok(TrackOutput {
            points: points
                .iter()
                .map(|p| Point2D::new(p.x + self.dx, p.y + self.dy))
                .collect(),
            valid: vec![true; points.len()],
        })
    }
}

type Script = dyn Fn(usize, usize, Point2D) -> (Point2D, bool) + Send + Sync;

/// Answers each point from a script of `(transition, index, point)`.
pub struct ScriptedTracker {
    script: Box<Script>,
    calls: AtomicUsize,
}

impl ScriptedTracker {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(usize, usize, Point2D) -> (Point2D, bool) + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PointTracker for ScriptedTracker {
    fn track(&self, _prev: &Frame, _next: &Frame, points: &[Point2D]) -> Result<TrackOutput> {
        let transition = self.calls.fetch_add(1, Ordering::SeqCst);
        let (points, valid) = points
            .iter()
            .enumerate()
            .map(|(i, &p)| (self.script)(transition, i, p))
            .unzip();
        Ok(TrackOutput { points, valid })
    }
}

/// Rejects every call.
pub struct FailingTracker;

impl PointTracker for FailingTracker {
    fn track(&self, _prev: &Frame, _next: &Frame, _points: &[Point2D]) -> Result<TrackOutput> {
        Err(FlowTrackError::TrackerFailure("scripted failure".into()))
    }
}

/// Returns one point fewer than it was given.
pub struct ShortTracker;

impl PointTracker for ShortTracker {
    fn track(&self, _prev: &Frame, _next: &Frame, points: &[Point2D]) -> Result<TrackOutput> {
        let kept = points.len().saturating_sub(1);
        Ok(TrackOutput {
            points: points[..kept].to_vec(),
            valid: vec![true; kept],
        })
    }
}

/// Build a SER file header.
///
/// `color_id`: 0=MONO, 100=RGB, 101=BGR
pub fn build_ser_header(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer, Instrument, Telescope
    buf.extend_from_slice(&[0u8; 120]);
    // DateTime, DateTimeUTC
    buf.extend_from_slice(&[0u8; 16]);

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Complete mono 8-bit SER file with the given frame data.
pub fn build_ser_with_frames(width: u32, height: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header(width, height, 8, frames.len(), 0);
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Write a SER buffer to a temporary file.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}
