//! Byte offsets of every mapped field
//!
//! Offsets are relative to the start of the enclosing record. Bytes not named here are
//! reserved and are carried through decode/encode untouched.

/// Bank file offsets (absolute)
pub mod bank {
    use crate::{PART_SIZE, PATTERN_SIZE};

    pub const HEADER: usize = 0;
    pub const VERSION: usize = 21;
    pub const PATTERNS: usize = 22;
    pub const PARTS_UNSAVED: usize = PATTERNS + crate::PATTERNS_PER_BANK * PATTERN_SIZE;
    pub const PARTS_SAVED: usize = PARTS_UNSAVED + crate::PARTS_PER_BANK * PART_SIZE;
    pub const PART_SAVED_STATE: usize = PARTS_SAVED + crate::PARTS_PER_BANK * PART_SIZE;
    pub const FLEX_COUNTER: usize = PART_SAVED_STATE + crate::PARTS_PER_BANK;
    pub const PART_NAMES: usize = FLEX_COUNTER + 1;
    pub const PART_NAME_LEN: usize = 7;
    pub const CHECKSUM: usize = PART_NAMES + crate::PARTS_PER_BANK * PART_NAME_LEN;
    /// First byte covered by the checksum
    pub const CHECKSUM_START: usize = 16;
}

/// Pattern record offsets
pub mod pattern {
    use crate::{AUDIO_TRACK_SIZE, MIDI_TRACK_SIZE, TRACKS_PER_PATTERN};

    pub const MAGIC: &[u8; 4] = b"PTRN";
    pub const AUDIO_TRACKS: usize = 8;
    pub const MIDI_TRACKS: usize = AUDIO_TRACKS + TRACKS_PER_PATTERN * AUDIO_TRACK_SIZE;
    pub const TAIL: usize = MIDI_TRACKS + TRACKS_PER_PATTERN * MIDI_TRACK_SIZE;
    pub const MASTER_LENGTH: usize = 36577;
    pub const MASTER_SCALE: usize = 36578;
    pub const PART_ASSIGNMENT: usize = 36581;
}

/// Audio pattern-track offsets
pub mod audio_track {
    pub const MAGIC: &[u8; 4] = b"TRAC";
    pub const TRACK_ID: usize = 8;
    pub const TRIGGER_MASK: usize = 9;
    pub const TRIGLESS_MASK: usize = 17;
    pub const PLOCK_MASK: usize = 25;
    pub const ONESHOT_MASK: usize = 33;
    pub const RECORDER_MASKS: usize = 41;
    pub const SWING_MASK: usize = 73;
    pub const SLIDE_MASK: usize = 81;
    pub const LENGTH: usize = 89;
    pub const SCALE: usize = 90;
    pub const SWING_AMOUNT: usize = 91;
    pub const START_SILENT: usize = 92;
    pub const PLAYS_FREE: usize = 93;
    pub const TRIG_MODE: usize = 94;
    pub const TRIG_QUANT: usize = 95;
    pub const ONESHOT: usize = 96;
    pub const PLOCKS: usize = 98;
    pub const CONDITIONS: usize = 2210;
}

/// MIDI pattern-track offsets
pub mod midi_track {
    pub const MAGIC: &[u8; 4] = b"MTRA";
    pub const TRACK_ID: usize = 8;
    pub const TRIGGER_MASK: usize = 9;
    pub const TRIGLESS_MASK: usize = 17;
    pub const PLOCK_MASK: usize = 25;
    pub const SWING_MASK: usize = 33;
    pub const LENGTH: usize = 49;
    pub const SCALE: usize = 50;
    pub const SWING_AMOUNT: usize = 51;
    pub const START_SILENT: usize = 52;
    pub const PLAYS_FREE: usize = 53;
    pub const TRIG_MODE: usize = 54;
    pub const TRIG_QUANT: usize = 55;
    pub const PLOCKS: usize = 56;
    pub const CONDITIONS: usize = 2104;
}

/// Part record offsets
pub mod part {
    use crate::SCENES_PER_PART;

    pub const MAGIC: &[u8; 4] = b"PART";
    pub const PART_ID: usize = 8;
    pub const FX1_TYPES: usize = 9;
    pub const FX2_TYPES: usize = 17;
    pub const ACTIVE_SCENE_A: usize = 25;
    pub const ACTIVE_SCENE_B: usize = 26;
    /// 8 x [main, cue]
    pub const VOLUMES: usize = 27;
    pub const MACHINE_TYPES: usize = 43;
    /// 8 x 30: one 6-byte page per machine type
    pub const MACHINE_VALUES: usize = 51;
    /// 8 x 24: LFO, AMP, FX1, FX2
    pub const TRACK_VALUES: usize = 291;
    /// 8 x 30, same machine order as the values
    pub const MACHINE_SETUP: usize = 483;
    /// 8 x 5: static, flex, reserved, reserved, recorder
    pub const MACHINE_SLOTS: usize = 723;
    pub const TRACK_SETUP: usize = 763;
    pub const MIDI_VALUES: usize = 1051;
    pub const MIDI_SETUP: usize = 1307;
    pub const RECORDER_SETUP: usize = 1595;
    pub const SCENES: usize = 1691;
    pub const RESERVED_TAIL: usize = SCENES + SCENES_PER_PART * crate::SCENE_SIZE;

    pub const MACHINE_VALUES_STRIDE: usize = 30;
    pub const TRACK_VALUES_STRIDE: usize = 24;
    pub const MACHINE_SLOTS_STRIDE: usize = 5;
    pub const TRACK_SETUP_STRIDE: usize = 36;
    pub const MIDI_VALUES_STRIDE: usize = 32;
    pub const MIDI_SETUP_STRIDE: usize = 36;
}

/// Offsets inside one track's 24-byte track-values block (also used by p-locks and scenes)
pub mod track_values {
    pub const LFO: usize = 0;
    pub const AMP: usize = 6;
    pub const FX1: usize = 12;
    pub const FX2: usize = 18;
}

/// Offsets inside one track's 5-byte slot block
pub mod slots {
    pub const STATIC: usize = 0;
    pub const FLEX: usize = 1;
    pub const RECORDER: usize = 4;
}

/// Offsets inside the 32-byte audio p-lock block
pub mod plock {
    pub const PLAYBACK: usize = 0;
    pub const LFO: usize = 6;
    pub const AMP: usize = 12;
    pub const FX1: usize = 18;
    pub const FX2: usize = 24;
    pub const STATIC_SLOT: usize = 30;
    pub const FLEX_SLOT: usize = 31;
}

/// Offsets inside the 32-byte MIDI value/p-lock block
pub mod midi_plock {
    pub const NOTE: usize = 0;
    pub const VELOCITY: usize = 1;
    pub const LENGTH: usize = 2;
    pub const NOTE2: usize = 3;
    pub const LFO: usize = 6;
    pub const ARP: usize = 12;
    pub const PITCH_BEND: usize = 18;
    pub const AFTERTOUCH: usize = 19;
    pub const CC1: usize = 20;
    pub const CC5: usize = 24;
}

/// Offsets inside the 36-byte MIDI setup block
pub mod midi_setup {
    pub const CHANNEL: usize = 0;
    pub const BANK: usize = 1;
    pub const PROGRAM: usize = 2;
    pub const LFO: usize = 6;
    pub const ARP: usize = 18;
    pub const CC_NUMBERS: usize = 26;
}

/// Offsets inside the 12-byte recorder setup
pub mod recorder {
    pub const IN_AB: usize = 0;
    pub const IN_CD: usize = 1;
    pub const RLEN: usize = 2;
    pub const TRIG: usize = 3;
    pub const SRC3: usize = 4;
    pub const LOOP: usize = 5;
    pub const FIN: usize = 6;
    pub const FOUT: usize = 7;
    pub const AB_GAIN: usize = 8;
    pub const QREC: usize = 9;
    pub const QPL: usize = 10;
    pub const CD_GAIN: usize = 11;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_layout_is_contiguous() {
        assert_eq!(bank::PARTS_UNSAVED, 0x8EED6);
        assert_eq!(bank::FLEX_COUNTER, 0x9B4B2);
        assert_eq!(bank::CHECKSUM, 0x9B4CF);
        assert_eq!(bank::CHECKSUM + 2, crate::BANK_FILE_SIZE);
    }

    #[test]
    fn test_pattern_layout_fits() {
        assert_eq!(pattern::TAIL, 36568);
        assert!(pattern::PART_ASSIGNMENT < crate::PATTERN_SIZE);
        assert_eq!(
            audio_track::CONDITIONS + crate::STEPS_PER_TRACK * 2,
            crate::AUDIO_TRACK_SIZE
        );
        assert_eq!(
            midi_track::CONDITIONS + crate::STEPS_PER_TRACK * 2,
            crate::MIDI_TRACK_SIZE
        );
    }

    #[test]
    fn test_part_layout_fits() {
        assert_eq!(part::TRACK_VALUES, part::MACHINE_VALUES + 8 * part::MACHINE_VALUES_STRIDE);
        assert_eq!(part::MACHINE_SLOTS, part::MACHINE_SETUP + 8 * part::MACHINE_VALUES_STRIDE);
        assert_eq!(part::RECORDER_SETUP, part::MIDI_SETUP + 8 * part::MIDI_SETUP_STRIDE);
        assert_eq!(part::SCENES, part::RECORDER_SETUP + 8 * crate::RECORDER_SETUP_SIZE);
        assert!(part::RESERVED_TAIL <= crate::PART_SIZE);
    }
}

/// Markers file offsets (absolute, plus per-slot record)
pub mod markers {
    use crate::{FLEX_SLOTS, MARKER_SLOT_SIZE, SAMPLE_SLOTS};

    pub const HEADER: usize = 0;
    pub const VERSION: usize = 21;
    pub const FLEX_SLOTS_START: usize = 26;
    pub const STATIC_SLOTS_START: usize = FLEX_SLOTS_START + FLEX_SLOTS * MARKER_SLOT_SIZE;
    pub const CHECKSUM: usize = STATIC_SLOTS_START + SAMPLE_SLOTS * MARKER_SLOT_SIZE;
    /// First byte covered by the checksum
    pub const CHECKSUM_START: usize = 20;

    pub const SAMPLE_LENGTH: usize = 0;
    pub const TRIM_START: usize = 4;
    pub const TRIM_END: usize = 8;
    pub const LOOP_POINT: usize = 12;
    pub const SLICES: usize = 16;
    /// Start, end and loop point, each a big-endian u32
    pub const SLICE_SIZE: usize = 12;
}
