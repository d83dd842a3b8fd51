//! Codec, render and project settings
//!
//! All three structs deserialize from partial TOML or JSON; missing keys take the
//! defaults below.

use serde::{Deserialize, Serialize};

/// Options for decoding and encoding bank files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecOptions {
    /// Recompute the checksum when encoding
    #[serde(default = "default_true")]
    pub update_checksum: bool,
    /// Reject banks whose datatype version is not the supported one
    #[serde(default = "default_true")]
    pub check_version: bool,
}

/// Project-wide fixes applied before a project is written for the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Trig the master track (track 8) on step 1 of patterns that use tracks 1-7
    #[serde(default = "default_true")]
    pub auto_master_trig: bool,
    /// Trig Thru machines on step 1 of patterns with audio activity
    #[serde(default = "default_true")]
    pub auto_thru_trig: bool,
    /// Copy Part 1 scenes into blank scenes of Parts 2-4
    #[serde(default)]
    pub propagate_scenes: bool,
    /// Copy Part 1 machine settings into default tracks of Parts 2-4
    #[serde(default)]
    pub propagate_src: bool,
    #[serde(default)]
    pub propagate_amp: bool,
    #[serde(default)]
    pub propagate_fx: bool,
    #[serde(default)]
    pub propagate_recorder: bool,
}

/// Settings read from the project's text settings file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: f32,
    /// Track 8 acts as master track
    #[serde(default)]
    pub master_track: bool,
    #[serde(default)]
    pub midi_clock_send: bool,
    #[serde(default)]
    pub midi_clock_receive: bool,
    #[serde(default)]
    pub midi_transport_send: bool,
    #[serde(default)]
    pub midi_transport_receive: bool,
}

fn default_true() -> bool {
    true
}

fn default_tempo() -> f32 {
    120.0
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            update_checksum: true,
            check_version: true,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            auto_master_trig: true,
            auto_thru_trig: true,
            propagate_scenes: false,
            propagate_src: false,
            propagate_amp: false,
            propagate_fx: false,
            propagate_recorder: false,
        }
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            tempo: 120.0,
            master_track: false,
            midi_clock_send: false,
            midi_clock_receive: false,
            midi_transport_send: false,
            midi_transport_receive: false,
        }
    }
}

impl ProjectSettings {
    /// Tempo as stored by the device: BPM x 24, rounded
    pub fn tempo_x24(&self) -> u32 {
        (self.tempo * 24.0).round().max(0.0) as u32
    }
}
