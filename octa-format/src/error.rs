//! Error types for bank decoding and object-model access

use std::io;

use crate::enums::{SlotKind, TrackLayout};

/// Errors that can occur when decoding, encoding or editing Octatrack data
#[derive(Debug, thiserror::Error)]
pub enum OctaError {
    /// Structural decode failure (length, header magic, version, record magic)
    #[error("malformed bank: {0}")]
    MalformedBank(String),

    /// Structural decode failure of a markers file
    #[error("malformed markers file: {0}")]
    MalformedMarkers(String),

    /// Slice whose end or loop point falls outside its range
    #[error("invalid slice: {0}")]
    InvalidSlice(String),

    /// Step number outside the valid range
    #[error("invalid step {0} (must be 1-64)")]
    InvalidStep(u8),

    /// Track number outside 1-8
    #[error("invalid track {0} (must be 1-8)")]
    InvalidTrack(u8),

    /// Scene number outside 1-16
    #[error("invalid scene {0} (must be 1-16)")]
    InvalidScene(u8),

    /// Pattern number outside 1-16
    #[error("invalid pattern {0} (must be 1-16)")]
    InvalidPattern(u8),

    /// Part number outside 1-4
    #[error("invalid part {0} (must be 1-4)")]
    InvalidPart(u8),

    /// Bank number outside 1-16
    #[error("invalid bank {0} (must be 1-16)")]
    InvalidBank(u8),

    /// Value outside a field's domain
    #[error("{field} value {value} out of range ({min}-{max})")]
    RangeError {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    /// Parameter name not defined for the active effect or machine family
    #[error("parameter '{name}' is not defined for {family}")]
    UnsupportedParameter { family: &'static str, name: String },

    /// Standalone record parsed from a slice of the wrong size
    #[error("{record} record must be {expected} bytes, got {actual}")]
    SizeMismatch {
        record: &'static str,
        expected: usize,
        actual: usize,
    },

    /// FX3/FX4 requested under a layout without Neighbor tracks
    #[error("{0:?} layout has no neighbor tracks")]
    NoNeighborTrack(TrackLayout),

    /// Every slot of the requested kind is assigned
    #[error("all 128 {0} sample slots are in use")]
    SlotsExhausted(SlotKind),

    /// Explicit slot request collides with an existing assignment
    #[error("slot {slot} is already assigned to '{path}'")]
    SlotInUse { slot: u8, path: String },

    /// IO error while loading or saving a bank or markers file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, OctaError>;

impl OctaError {
    pub(crate) fn range(field: &'static str, value: impl Into<i32>, min: i32, max: i32) -> Self {
        Self::RangeError {
            field,
            value: value.into(),
            min,
            max,
        }
    }
}

/// Check `value` lies within `min..=max`, naming the field on failure
pub(crate) fn check_range(field: &'static str, value: i32, min: i32, max: i32) -> Result<()> {
    if value < min || value > max {
        return Err(OctaError::range(field, value, min, max));
    }
    Ok(())
}

/// Validate a 1-based track number
pub(crate) fn check_track(track: u8) -> Result<usize> {
    if !(1..=crate::TRACKS_PER_PATTERN as u8).contains(&track) {
        return Err(OctaError::InvalidTrack(track));
    }
    Ok(usize::from(track - 1))
}

/// Validate a 1-based step number
pub(crate) fn check_step(step: u8) -> Result<usize> {
    if !(1..=crate::STEPS_PER_TRACK as u8).contains(&step) {
        return Err(OctaError::InvalidStep(step));
    }
    Ok(usize::from(step - 1))
}

/// Validate a 1-based scene number
pub(crate) fn check_scene(scene: u8) -> Result<usize> {
    if !(1..=crate::SCENES_PER_PART as u8).contains(&scene) {
        return Err(OctaError::InvalidScene(scene));
    }
    Ok(usize::from(scene - 1))
}
