//! SER video reader yielding grayscale frames.

use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array2;

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{FlowTrackError, Result};
use crate::frame::{Frame, FrameMetadata};

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

const COLOR_ID_RGB: i32 = 100;
const COLOR_ID_BGR: i32 = 101;

/// Fields of the 178-byte SER header needed to decode frames.
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
}

impl SerHeader {
    /// Bytes per sample (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_sample(&self) -> usize {
        if self.pixel_depth <= 8 {
            1
        } else {
            2
        }
    }

    /// Samples per pixel (3 for RGB/BGR, 1 otherwise; Bayer data is read raw).
    pub fn planes(&self) -> usize {
        match self.color_id {
            COLOR_ID_RGB | COLOR_ID_BGR => 3,
            _ => 1,
        }
    }

    pub fn frame_byte_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.bytes_per_sample() * self.planes())
    }
}

/// Memory-mapped SER file reader.
pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
    frame_size: usize,
}

impl SerReader {
    /// Open a SER file and validate its header against the file size.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the map is read-only and lives as long as the reader.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(FlowTrackError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }
        if &mmap[0..14] != SER_MAGIC {
            return Err(FlowTrackError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;
        let frame_size = header
            .frame_byte_size()
            .ok_or_else(|| FlowTrackError::InvalidSer("Frame size overflows".into()))?;
        let expected = frame_size
            .checked_mul(header.frame_count as usize)
            .and_then(|n| n.checked_add(SER_HEADER_SIZE))
            .ok_or_else(|| FlowTrackError::InvalidSer("Data size overflows".into()))?;
        if mmap.len() < expected {
            return Err(FlowTrackError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected,
                mmap.len()
            )));
        }

        Ok(Self {
            mmap,
            header,
            frame_size,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Decode frame `index` to grayscale in [0.0, 1.0].
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let total = self.frame_count();
        if index >= total {
            return Err(FlowTrackError::FrameIndexOutOfRange { index, total });
        }
        let offset = SER_HEADER_SIZE + index * self.frame_size;
        let raw = &self.mmap[offset..offset + self.frame_size];

        let h = self.header.height as usize;
        let w = self.header.width as usize;
        let planes = self.header.planes();
        let max_val = ((1u32 << self.header.pixel_depth.clamp(1, 16)) - 1) as f32;

        let data = Array2::from_shape_fn((h, w), |(row, col)| {
            let pixel = (row * w + col) * planes;
            let value = if planes == 1 {
                self.sample(raw, pixel)
            } else {
                let (r, b) = if self.header.color_id == COLOR_ID_BGR {
                    (pixel + 2, pixel)
                } else {
                    (pixel, pixel + 2)
                };
                LUMINANCE_R * self.sample(raw, r)
                    + LUMINANCE_G * self.sample(raw, pixel + 1)
                    + LUMINANCE_B * self.sample(raw, b)
            };
            (value / max_val).clamp(0.0, 1.0)
        });

        let mut frame = Frame::new(data);
        frame.metadata = FrameMetadata {
            frame_index: index,
            timestamp_us: self.read_timestamp(index),
        };
        Ok(frame)
    }

    /// Iterator over all frames.
    pub fn frames(&self) -> impl Iterator<Item = Result<Frame>> + '_ {
        (0..self.frame_count()).map(move |i| self.read_frame(i))
    }

    /// Raw value of the `sample_index`-th sample of a frame.
    fn sample(&self, raw: &[u8], sample_index: usize) -> f32 {
        if self.header.bytes_per_sample() == 1 {
            raw[sample_index] as f32
        } else {
            let i = sample_index * 2;
            let pair = [raw[i], raw[i + 1]];
            if self.header.little_endian {
                u16::from_le_bytes(pair) as f32
            } else {
                u16::from_be_bytes(pair) as f32
            }
        }
    }

    /// Per-frame timestamp from the optional trailer.
    fn read_timestamp(&self, index: usize) -> Option<u64> {
        let trailer = SER_HEADER_SIZE + self.frame_size * self.frame_count();
        let at = trailer + index * 8;
        let bytes = self.mmap.get(at..at + 8)?;
        Some(u64::from_le_bytes(bytes.try_into().ok()?))
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]);

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()?;
    let height = cursor.read_i32::<LittleEndian>()?;
    let pixel_depth = cursor.read_i32::<LittleEndian>()?;
    let frame_count = cursor.read_i32::<LittleEndian>()?;

    if width <= 0 || height <= 0 {
        return Err(FlowTrackError::InvalidDimensions {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        });
    }
    if !(1..=16).contains(&pixel_depth) {
        return Err(FlowTrackError::InvalidSer(format!(
            "Unsupported pixel depth {pixel_depth}"
        )));
    }
    if frame_count < 0 {
        return Err(FlowTrackError::InvalidSer("Negative frame count".into()));
    }

    // Writers disagree on the flag; 0 is treated as little-endian.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width: width as u32,
        height: height as u32,
        pixel_depth: pixel_depth as u32,
        frame_count: frame_count as u32,
    })
}
