//! Sample markers file
//!
//! A project's `markers.work` stores, for every sample slot, the sample length in frames,
//! the trim range, the loop point and up to 64 slices. There are 136 Flex records (128
//! samples plus the eight recorder buffers) followed by 128 Static records, each 784
//! bytes. Like [`crate::Bank`], [`Markers`] keeps the whole file in one buffer and hands out
//! [`SlotMarkers`] views over it.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::block::Block;
use crate::config::CodecOptions;
use crate::enums::SlotKind;
use crate::error::{check_range, OctaError, Result};
use crate::layout::markers;
use crate::{
    FLEX_SLOTS, MARKERS_FILE_SIZE, MARKERS_HEADER, MARKERS_VERSION, MARKER_SLOT_SIZE,
    SAMPLE_SLOTS, SLICES_PER_SLOT,
};

/// Stored loop point meaning "no loop"
pub const LOOP_OFF: u32 = u32::MAX;

/// Sample rate of the device, used for millisecond conversions
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

// =============================================================================
// Slice
// =============================================================================

/// One slice of a sample, in frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slice {
    start: u32,
    end: u32,
    loop_start: Option<u32>,
}

impl Slice {
    /// Validated slice: `start <= end`, and a loop point inside `start..end`
    pub fn new(start: u32, end: u32, loop_start: Option<u32>) -> Result<Self> {
        if end < start {
            return Err(OctaError::InvalidSlice(format!(
                "end {end} is before start {start}"
            )));
        }
        if let Some(point) = loop_start {
            if point < start || point >= end {
                return Err(OctaError::InvalidSlice(format!(
                    "loop point {point} outside {start}..{end}"
                )));
            }
        }
        Ok(Self {
            start,
            end,
            loop_start,
        })
    }

    /// Slice from millisecond positions at `sample_rate`
    pub fn from_ms(start_ms: u32, end_ms: u32, sample_rate: u32) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        Self::new(
            ms_to_frames(start_ms, sample_rate),
            ms_to_frames(end_ms, sample_rate),
            None,
        )
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn loop_start(&self) -> Option<u32> {
        self.loop_start
    }

    /// Start, end and loop point in milliseconds at `sample_rate`
    pub fn to_ms(&self, sample_rate: u32) -> Result<(u32, u32, Option<u32>)> {
        check_sample_rate(sample_rate)?;
        Ok((
            frames_to_ms(self.start, sample_rate),
            frames_to_ms(self.end, sample_rate),
            self.loop_start.map(|p| frames_to_ms(p, sample_rate)),
        ))
    }

    /// An unused slice record is all zeros
    pub fn is_empty(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    fn from_raw(start: u32, end: u32, loop_raw: u32) -> Self {
        // Zeroed records carry loop 0, which means no loop as well
        let loop_start = match loop_raw {
            LOOP_OFF => None,
            0 if start == 0 && end == 0 => None,
            point => Some(point),
        };
        Self {
            start,
            end,
            loop_start,
        }
    }
}

fn check_sample_rate(sample_rate: u32) -> Result<()> {
    if sample_rate == 0 {
        return Err(OctaError::range("sample rate", 0, 1, i32::MAX));
    }
    Ok(())
}

fn frames_to_ms(frames: u32, sample_rate: u32) -> u32 {
    (u64::from(frames) * 1000 / u64::from(sample_rate)) as u32
}

fn ms_to_frames(ms: u32, sample_rate: u32) -> u32 {
    (u64::from(ms) * u64::from(sample_rate) / 1000).min(u64::from(u32::MAX)) as u32
}

// =============================================================================
// Slot markers
// =============================================================================

/// Markers of one sample slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMarkers<B> {
    block: Block<B>,
}

impl<B: AsRef<[u8]>> SlotMarkers<B> {
    pub(crate) fn from_block(block: Block<B>) -> Self {
        Self { block }
    }

    /// View a standalone 784-byte slot record
    pub fn from_bytes(buf: B) -> Result<Self> {
        Ok(Self::from_block(Block::with_len(
            buf,
            "slot markers",
            MARKER_SLOT_SIZE,
        )?))
    }

    /// Sample length in frames
    pub fn sample_length(&self) -> u32 {
        self.block.u32_be(markers::SAMPLE_LENGTH)
    }

    pub fn trim_start(&self) -> u32 {
        self.block.u32_be(markers::TRIM_START)
    }

    pub fn trim_end(&self) -> u32 {
        self.block.u32_be(markers::TRIM_END)
    }

    /// Loop point in frames; `None` when looping is off
    pub fn loop_point(&self) -> Option<u32> {
        match self.block.u32_be(markers::LOOP_POINT) {
            LOOP_OFF => None,
            point => Some(point),
        }
    }

    /// Slice `n` (1-64)
    pub fn slice(&self, n: u8) -> Result<Slice> {
        let at = slice_offset(n)?;
        Ok(Slice::from_raw(
            self.block.u32_be(at),
            self.block.u32_be(at + 4),
            self.block.u32_be(at + 8),
        ))
    }

    /// Every non-empty slice, in slice order
    pub fn slices(&self) -> Vec<Slice> {
        (1..=SLICES_PER_SLOT as u8)
            .filter_map(|n| self.slice(n).ok())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn slice_count(&self) -> usize {
        self.slices().len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.block.as_bytes()
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> SlotMarkers<B> {
    pub fn set_sample_length(&mut self, frames: u32) {
        self.block.set_u32_be(markers::SAMPLE_LENGTH, frames);
    }

    /// Set the trim range; `end` may not precede `start`
    pub fn set_trim(&mut self, start: u32, end: u32) -> Result<()> {
        Slice::new(start, end, None)?;
        self.block.set_u32_be(markers::TRIM_START, start);
        self.block.set_u32_be(markers::TRIM_END, end);
        Ok(())
    }

    pub fn set_loop_point(&mut self, point: Option<u32>) {
        self.block
            .set_u32_be(markers::LOOP_POINT, point.unwrap_or(LOOP_OFF));
    }

    /// Write slice `n` (1-64)
    pub fn set_slice(&mut self, n: u8, slice: Slice) -> Result<()> {
        let at = slice_offset(n)?;
        self.block.set_u32_be(at, slice.start);
        self.block.set_u32_be(at + 4, slice.end);
        self.block
            .set_u32_be(at + 8, slice.loop_start.unwrap_or(LOOP_OFF));
        Ok(())
    }

    /// Zero slice `n`
    pub fn clear_slice(&mut self, n: u8) -> Result<()> {
        let at = slice_offset(n)?;
        self.block.fill(at, markers::SLICE_SIZE, 0);
        Ok(())
    }

    pub fn clear_slices(&mut self) {
        self.block
            .fill(markers::SLICES, SLICES_PER_SLOT * markers::SLICE_SIZE, 0);
    }

    /// Replace every slice with `slices`, numbered from 1
    pub fn set_slices(&mut self, slices: &[Slice]) -> Result<()> {
        check_range(
            "slice count",
            slices.len() as i32,
            0,
            SLICES_PER_SLOT as i32,
        )?;
        self.clear_slices();
        for (n, slice) in (1u8..).zip(slices) {
            self.set_slice(n, *slice)?;
        }
        Ok(())
    }
}

impl SlotMarkers<Vec<u8>> {
    /// Empty standalone slot record
    pub fn new() -> Self {
        Self::from_block(Block::filled(MARKER_SLOT_SIZE, 0))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.block.as_bytes().to_vec()
    }
}

impl Default for SlotMarkers<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

fn slice_offset(n: u8) -> Result<usize> {
    check_range("slice", n.into(), 1, SLICES_PER_SLOT as i32)?;
    Ok(markers::SLICES + usize::from(n - 1) * markers::SLICE_SIZE)
}

// =============================================================================
// Markers file
// =============================================================================

/// A project's markers file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    data: Vec<u8>,
    /// Offset added to the byte sum when computing the checksum
    checksum_base: u16,
}

impl Markers {
    /// Fresh markers file with every slot empty
    pub fn new() -> Self {
        let mut data = vec![0u8; MARKERS_FILE_SIZE];
        data[markers::HEADER..markers::VERSION].copy_from_slice(&MARKERS_HEADER);
        data[markers::VERSION] = MARKERS_VERSION;
        let mut file = Self {
            data,
            checksum_base: 0,
        };
        file.write_checksum();
        file
    }

    /// Decode with default options
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with(data, CodecOptions::default())
    }

    /// Decode a markers file
    ///
    /// The bytes are kept as they are, so an unmodified file encodes back identically.
    pub fn from_bytes_with(data: &[u8], options: CodecOptions) -> Result<Self> {
        validate(data, options)?;
        let stored = stored_checksum(data);
        let base = stored.wrapping_sub(byte_sum(data));
        log::debug!(
            "Decoded markers: {} bytes, version {}, checksum {:#06x}",
            data.len(),
            data[markers::VERSION],
            stored
        );
        Ok(Self {
            data: data.to_vec(),
            checksum_base: base,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes_with(CodecOptions::default())
    }

    pub fn to_bytes_with(&self, options: CodecOptions) -> Vec<u8> {
        let mut out = self.data.clone();
        if options.update_checksum {
            Block::new(&mut out[..]).set_u16_be(markers::CHECKSUM, self.checksum());
        }
        out
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        log::debug!("Loading markers from {}", path.display());
        Self::from_bytes(&data)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_bytes())?;
        log::debug!("Saved markers to {}", path.display());
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn version(&self) -> u8 {
        self.data[markers::VERSION]
    }

    // =========================================================================
    // Slots
    // =========================================================================

    /// Markers of slot `n`: Flex 1-136 (129-136 are recorder buffers), Static 1-128
    pub fn slot(&self, n: u8, kind: SlotKind) -> Result<SlotMarkers<&[u8]>> {
        let at = slot_offset(n, kind)?;
        Ok(SlotMarkers::from_block(Block::new(
            &self.data[at..at + MARKER_SLOT_SIZE],
        )))
    }

    pub fn slot_mut(&mut self, n: u8, kind: SlotKind) -> Result<SlotMarkers<&mut [u8]>> {
        let at = slot_offset(n, kind)?;
        Ok(SlotMarkers::from_block(Block::new(
            &mut self.data[at..at + MARKER_SLOT_SIZE],
        )))
    }

    /// Sample length of slot `n`, in frames
    pub fn sample_length(&self, n: u8, kind: SlotKind) -> Result<u32> {
        Ok(self.slot(n, kind)?.sample_length())
    }

    pub fn set_sample_length(&mut self, n: u8, kind: SlotKind, frames: u32) -> Result<()> {
        self.slot_mut(n, kind)?.set_sample_length(frames);
        log::trace!("Set {kind:?} slot {n} length to {frames} frames");
        Ok(())
    }

    // =========================================================================
    // Checksum
    // =========================================================================

    /// Checksum of the current contents
    pub fn checksum(&self) -> u16 {
        self.checksum_base.wrapping_add(byte_sum(&self.data))
    }

    /// Checksum currently written in the buffer
    pub fn stored_checksum(&self) -> u16 {
        stored_checksum(&self.data)
    }

    fn write_checksum(&mut self) {
        let checksum = self.checksum();
        Block::new(&mut self.data[..]).set_u16_be(markers::CHECKSUM, checksum);
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::new()
    }
}

fn slot_offset(n: u8, kind: SlotKind) -> Result<usize> {
    let (field, count, start) = match kind {
        SlotKind::Flex => ("flex slot", FLEX_SLOTS, markers::FLEX_SLOTS_START),
        SlotKind::Static => ("static slot", SAMPLE_SLOTS, markers::STATIC_SLOTS_START),
    };
    check_range(field, n.into(), 1, count as i32)?;
    Ok(start + usize::from(n - 1) * MARKER_SLOT_SIZE)
}

fn validate(data: &[u8], options: CodecOptions) -> Result<()> {
    if data.len() != MARKERS_FILE_SIZE {
        return Err(OctaError::MalformedMarkers(format!(
            "expected {} bytes, got {}",
            MARKERS_FILE_SIZE,
            data.len()
        )));
    }
    if data[markers::HEADER..markers::VERSION] != MARKERS_HEADER {
        return Err(OctaError::MalformedMarkers("bad header".to_string()));
    }
    let version = data[markers::VERSION];
    if version != MARKERS_VERSION {
        if options.check_version {
            return Err(OctaError::MalformedMarkers(format!(
                "unsupported version {version} (expected {MARKERS_VERSION})"
            )));
        }
        log::warn!("Accepting markers with unexpected version {version}");
    }
    Ok(())
}

fn byte_sum(data: &[u8]) -> u16 {
    data[markers::CHECKSUM_START..markers::CHECKSUM]
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)))
}

fn stored_checksum(data: &[u8]) -> u16 {
    Block::new(data).u16_be(markers::CHECKSUM)
}
