//! Octatrack bank and project format
//!
//! Reads, edits and writes the binary bank files of the Elektron Octatrack. A decoded
//! [`Bank`] keeps the file's bytes in a single buffer; patterns, parts, tracks, steps and
//! scenes are typed views over spans of it. Edits are written straight into the buffer,
//! so encoding an unmodified bank reproduces the input byte for byte.
//!
//! # Architecture
//!
//! - [`Bank`] / [`decode`] / [`encode`] - Whole-file codec with checksum upkeep
//! - [`Pattern`] / [`PatternTrack`] / [`Step`] - Sequencer data and parameter locks
//! - [`Part`] / [`AudioPartTrack`] / [`Scene`] - Sound design shared across patterns
//! - [`FxView`] / [`MachineView`] - Typed parameter pages selected by type bytes
//! - [`effective_value`] - Step lock, then scene lock, then part value
//! - [`Markers`] - Sample length, trim, loop and slice data per sample slot
//! - [`Project`] - Sixteen banks, sample slots, markers and render preparation
//!
//! Track, step, scene and slot numbers are 1-based everywhere in the public API.

pub mod bank;
pub mod block;
pub mod codec;
pub mod config;
pub mod enums;
pub mod error;
pub mod export;
pub mod fx;
pub mod layout;
pub mod machine;
pub mod markers;
pub mod page;
pub mod part;
pub mod part_track;
pub mod pattern;
pub mod pattern_track;
pub mod plock;
pub mod project;
pub mod recorder;
pub mod scene;
pub mod slots;
pub mod step;
pub mod trigs;

pub use bank::Bank;
pub use codec::{decode, decode_with, encode, encode_with};
pub use config::{CodecOptions, ProjectSettings, RenderSettings};
pub use enums::{
    FxSlot, FxType, LengthMode, LoopMode, MachineType, NoteLength, PatternScale, QRecMode,
    RateMode, RecTrigMode, RecordingSource, SliceMode, SlotKind, ThruInput, TimestretchMode,
    TrackLayout, TrigCondition, TrigKind,
};
pub use error::{OctaError, Result};
pub use export::{AudioTrackSummary, BankSummary, PartSummary, PatternSummary, TrackSummary};
pub use fx::FxView;
pub use machine::MachineView;
pub use markers::{Markers, Slice, SlotMarkers};
pub use page::{Amp, Cells, CellsMut, Lfo, Locks, Values};
pub use part::Part;
pub use part_track::{AudioPartTrack, AudioPartTrackConfig, MidiPartTrack};
pub use pattern::Pattern;
pub use pattern_track::{
    Audio, AudioPatternTrack, Midi, MidiPatternTrack, PatternTrack, TrackKind,
};
pub use plock::{effective_value, BaseValues, Lockable, Page, Param};
pub use project::Project;
pub use recorder::RecorderSetup;
pub use scene::{Scene, SceneTrack, TrackBinding};
pub use slots::{SampleSlot, SlotTable};
pub use step::{AudioStep, AudioStepConfig, MidiStep, Step};
pub use trigs::{TrigFlags, TrigMask};

// =============================================================================
// Bank file
// =============================================================================

/// Total size of a bank file
pub const BANK_FILE_SIZE: usize = 636113;

/// File header: IFF-style `FORM` chunk followed by the `DPS1BANK` tag
pub const BANK_HEADER: [u8; 21] = *b"FORM\0\0\0\0DPS1BANK\0\0\0\0\0";

/// Datatype version written by current firmware
pub const BANK_VERSION: u8 = 23;

pub const PATTERNS_PER_BANK: usize = 16;
pub const PARTS_PER_BANK: usize = 4;
pub const BANKS_PER_PROJECT: usize = 16;

// =============================================================================
// Markers file
// =============================================================================

/// Total size of a markers file
pub const MARKERS_FILE_SIZE: usize = 26 + (FLEX_SLOTS + SAMPLE_SLOTS) * MARKER_SLOT_SIZE + 2;

/// File header: `FORM` chunk followed by the `DPS1SAMP` tag
pub const MARKERS_HEADER: [u8; 21] = *b"FORM\0\0\0\0DPS1SAMP\0\0\0\0\0";

pub const MARKERS_VERSION: u8 = 4;

/// Per-slot record: length, trim, loop point and 64 slices
pub const MARKER_SLOT_SIZE: usize = 784;
pub const SLICES_PER_SLOT: usize = 64;

// =============================================================================
// Record sizes
// =============================================================================

pub const PATTERN_SIZE: usize = 36588;
pub const PART_SIZE: usize = 6331;
pub const AUDIO_TRACK_SIZE: usize = 2338;
pub const MIDI_TRACK_SIZE: usize = 2232;
pub const SCENE_SIZE: usize = 256;
/// One track's share of a scene: playback, LFO, AMP, FX1, FX2 pages plus two reserved bytes
pub const SCENE_TRACK_SIZE: usize = 32;
pub const RECORDER_SETUP_SIZE: usize = 12;
/// Per-step parameter lock block
pub const PLOCK_SIZE: usize = 32;

// =============================================================================
// Counts
// =============================================================================

pub const STEPS_PER_TRACK: usize = 64;
pub const TRACKS_PER_PATTERN: usize = 8;
pub const SCENES_PER_PART: usize = 16;
/// Slots per sample pool (Flex or Static)
pub const SAMPLE_SLOTS: usize = 128;
/// Flex slots including the eight recorder buffers (129-136)
pub const FLEX_SLOTS: usize = SAMPLE_SLOTS + 8;
