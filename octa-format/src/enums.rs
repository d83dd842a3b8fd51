//! Enumerations for machine, effect, trig and recorder selectors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{OctaError, Result};

/// Declare a `#[repr(u8)]` selector enum with checked raw-byte conversion
macro_rules! byte_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Decode the raw byte, rejecting values with no variant
            pub fn from_u8(value: u8) -> Result<Self> {
                match value {
                    $( $value => Ok(Self::$variant), )+
                    _ => Err(OctaError::range($field, value, 0, i32::from(Self::max_raw()))),
                }
            }

            /// Raw byte stored on disk
            pub const fn as_u8(self) -> u8 {
                self as u8
            }

            fn max_raw() -> u8 {
                let mut max = 0;
                $( if $value > max { max = $value; } )+
                max
            }
        }

        impl TryFrom<u8> for $name {
            type Error = OctaError;

            fn try_from(value: u8) -> Result<Self> {
                Self::from_u8(value)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }
    };
}

byte_enum! {
    /// Playback engine assigned to an audio track
    #[derive(Default)]
    MachineType as "machine type" {
        #[default]
        Static = 0,
        Flex = 1,
        Thru = 2,
        Neighbor = 3,
        Pickup = 4,
    }
}

impl MachineType {
    /// True for the two sample-playback machines
    pub fn is_sampler(self) -> bool {
        matches!(self, Self::Static | Self::Flex)
    }
}

byte_enum! {
    /// Effect type selector for the FX1 and FX2 blocks
    FxType as "fx type" {
        Off = 0,
        Filter = 4,
        Spatializer = 5,
        /// FX2 only
        Delay = 8,
        Eq = 12,
        DjEq = 13,
        Phaser = 16,
        Flanger = 17,
        Chorus = 18,
        CombFilter = 19,
        /// FX2 only
        PlateReverb = 20,
        /// FX2 only
        SpringReverb = 21,
        /// FX2 only
        DarkReverb = 22,
        Compressor = 24,
        Lofi = 25,
    }
}

impl FxType {
    /// Whether this effect can be loaded into `slot`
    pub fn allowed_in(self, slot: FxSlot) -> bool {
        match self {
            Self::Delay | Self::PlateReverb | Self::SpringReverb | Self::DarkReverb => {
                slot == FxSlot::Fx2
            }
            _ => true,
        }
    }

    /// Family name used in error messages and summaries
    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Filter => "filter",
            Self::Spatializer => "spatializer",
            Self::Delay => "delay",
            Self::Eq => "eq",
            Self::DjEq => "dj eq",
            Self::Phaser => "phaser",
            Self::Flanger => "flanger",
            Self::Chorus => "chorus",
            Self::CombFilter => "comb filter",
            Self::PlateReverb => "plate reverb",
            Self::SpringReverb => "spring reverb",
            Self::DarkReverb => "dark reverb",
            Self::Compressor => "compressor",
            Self::Lofi => "lofi",
        }
    }
}

/// One of the two effect blocks on an audio track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FxSlot {
    Fx1,
    Fx2,
}

impl FxSlot {
    /// Slot from its 1-based number
    pub fn from_number(n: u8) -> Result<Self> {
        match n {
            1 => Ok(Self::Fx1),
            2 => Ok(Self::Fx2),
            _ => Err(OctaError::range("fx slot", n, 1, 2)),
        }
    }

    /// Factory effect for this slot
    pub fn default_type(self) -> FxType {
        match self {
            Self::Fx1 => FxType::Filter,
            Self::Fx2 => FxType::Delay,
        }
    }
}

byte_enum! {
    /// Pattern or per-track playback speed multiplier
    #[derive(Default)]
    PatternScale as "scale" {
        X2 = 0,
        X3_2 = 1,
        #[default]
        X1 = 2,
        X3_4 = 3,
        X1_2 = 4,
        X1_4 = 5,
        X1_8 = 6,
    }
}

byte_enum! {
    /// Sample loop behaviour (sampler setup page)
    LoopMode as "loop mode" {
        Off = 0,
        On = 1,
        PingPong = 2,
        Auto = 3,
    }
}

byte_enum! {
    /// Whether START selects slices
    SliceMode as "slice mode" {
        Off = 0,
        On = 1,
    }
}

byte_enum! {
    /// Behaviour of the LEN encoder
    LengthMode as "length mode" {
        Off = 0,
        Time = 1,
    }
}

byte_enum! {
    /// Whether RATE changes pitch or timestretch
    RateMode as "rate mode" {
        Pitch = 0,
        Timestretch = 1,
    }
}

byte_enum! {
    /// Timestretch algorithm
    TimestretchMode as "timestretch mode" {
        Off = 0,
        Auto = 1,
        Normal = 2,
        Beat = 3,
    }
}

byte_enum! {
    /// External input selection for Thru machines
    ThruInput as "thru input" {
        Off = 0,
        APlusB = 1,
        A = 2,
        B = 3,
        AB = 4,
    }
}

byte_enum! {
    /// Recording trigger mode
    RecTrigMode as "recorder trig mode" {
        One = 0,
        One2 = 1,
        Hold = 2,
    }
}

byte_enum! {
    /// Quantization of the recording start
    QRecMode as "qrec" {
        PatternLength = 0,
        Step1 = 1,
        Step2 = 2,
        Step3 = 3,
        Step4 = 4,
        Step6 = 5,
        Step8 = 6,
        Step12 = 7,
        Step16 = 8,
        Step24 = 9,
        Step32 = 10,
        Step48 = 11,
        Step64 = 12,
        Step96 = 13,
        Step128 = 14,
        Step192 = 15,
        Step256 = 16,
        Off = 255,
    }
}

/// Unified recorder source; maps onto the IN_AB, IN_CD and SRC3 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordingSource {
    Off,
    InputAB,
    InputA,
    InputB,
    InputCD,
    InputC,
    InputD,
    /// Internal track 1-8
    Track(u8),
    Main,
}

/// Which trigger mask of a pattern track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrigKind {
    Trigger,
    Trigless,
    Plock,
    Oneshot,
    Swing,
    Slide,
}

/// Sample slot pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    Flex,
    Static,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flex => write!(f, "flex"),
            Self::Static => write!(f, "static"),
        }
    }
}

/// How a Part's eight audio tracks are grouped
///
/// The layout is a way of addressing tracks, not a stored setting: the same Part bytes can
/// be walked under any layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackLayout {
    /// Tracks 1-8 map straight through
    #[default]
    EightTrack,
    /// Tracks 1-7 carry content, track 8 is the master track
    SevenPlusMaster,
    /// Tracks 1-4 sit on physical 1, 3, 5, 7, each followed by a Neighbor track that
    /// supplies two more effects (FX3 and FX4)
    FourPlusNeighbor,
}

impl TrackLayout {
    /// Number of logical tracks
    pub const fn track_count(self) -> u8 {
        match self {
            Self::EightTrack => 8,
            Self::SevenPlusMaster => 7,
            Self::FourPlusNeighbor => 4,
        }
    }

    /// Physical track (1-8) behind logical track `n`
    pub fn physical(self, n: u8) -> Result<u8> {
        if !(1..=self.track_count()).contains(&n) {
            return Err(OctaError::InvalidTrack(n));
        }
        Ok(match self {
            Self::FourPlusNeighbor => 2 * n - 1,
            _ => n,
        })
    }

    /// Physical Neighbor track following logical track `n`, if the layout has one
    pub fn neighbor(self, n: u8) -> Result<Option<u8>> {
        let physical = self.physical(n)?;
        Ok((self == Self::FourPlusNeighbor).then_some(physical + 1))
    }
}

// =============================================================================
// Trig conditions
// =============================================================================

/// Probability percentages in raw order (raw 9 = 1%, raw 29 = 99%)
pub const PROBABILITIES: [u8; 21] = [
    1, 2, 4, 6, 9, 13, 19, 25, 33, 41, 50, 59, 67, 75, 81, 87, 91, 94, 96, 98, 99,
];

const PROBABILITY_BASE: u8 = 9;
const LOOP_BASE: u8 = 30;

/// Highest raw trig condition value
pub const MAX_CONDITION: u8 = 64;

/// Conditional trig setting of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrigCondition {
    #[default]
    None,
    Fill,
    NotFill,
    Pre,
    NotPre,
    Nei,
    NotNei,
    First,
    NotFirst,
    /// Fires with the given percentage, one of [`PROBABILITIES`]
    Probability(u8),
    /// Fires on loop `trigger` of every `reset` loops (1 <= trigger <= reset, 2 <= reset <= 8)
    Loop { trigger: u8, reset: u8 },
}

impl TrigCondition {
    /// Decode the 7-bit condition field
    pub fn from_u8(raw: u8) -> Result<Self> {
        Ok(match raw {
            0 => Self::None,
            1 => Self::Fill,
            2 => Self::NotFill,
            3 => Self::Pre,
            4 => Self::NotPre,
            5 => Self::Nei,
            6 => Self::NotNei,
            7 => Self::First,
            8 => Self::NotFirst,
            9..=29 => Self::Probability(PROBABILITIES[usize::from(raw - PROBABILITY_BASE)]),
            30..=MAX_CONDITION => {
                let mut reset = 2;
                while raw >= loop_base(reset + 1) {
                    reset += 1;
                }
                Self::Loop {
                    trigger: raw - loop_base(reset) + 1,
                    reset,
                }
            }
            _ => return Err(OctaError::range("trig condition", raw, 0, MAX_CONDITION.into())),
        })
    }

    /// Encode to the 7-bit condition field
    pub fn to_u8(self) -> Result<u8> {
        Ok(match self {
            Self::None => 0,
            Self::Fill => 1,
            Self::NotFill => 2,
            Self::Pre => 3,
            Self::NotPre => 4,
            Self::Nei => 5,
            Self::NotNei => 6,
            Self::First => 7,
            Self::NotFirst => 8,
            Self::Probability(pct) => {
                let idx = PROBABILITIES
                    .iter()
                    .position(|&p| p == pct)
                    .ok_or_else(|| OctaError::range("probability", pct, 1, 99))?;
                PROBABILITY_BASE + idx as u8
            }
            Self::Loop { trigger, reset } => {
                if !(2..=8).contains(&reset) {
                    return Err(OctaError::range("loop reset", reset, 2, 8));
                }
                if !(1..=reset).contains(&trigger) {
                    return Err(OctaError::range("loop trigger", trigger, 1, reset.into()));
                }
                loop_base(reset) + trigger - 1
            }
        })
    }

    /// Probability condition closest to `percent` (ties pick the lower value)
    ///
    /// 100% always triggers, which is no condition at all.
    pub fn nearest_probability(percent: u8) -> Result<Self> {
        if !(1..=100).contains(&percent) {
            return Err(OctaError::range("probability", percent, 1, 100));
        }
        if percent == 100 {
            return Ok(Self::None);
        }
        let pct = PROBABILITIES
            .iter()
            .copied()
            .min_by_key(|&p| (p as i16 - percent as i16).abs())
            .unwrap_or(50);
        Ok(Self::Probability(pct))
    }
}

/// First raw value of the loop conditions with the given reset length
const fn loop_base(reset: u8) -> u8 {
    // 2 conditions for reset 2, 3 for reset 3, ...
    LOOP_BASE + (reset - 1) * reset / 2 - 1
}

// =============================================================================
// MIDI note length
// =============================================================================

/// Raw MIDI note length in 24-PPQN ticks (one step = 6 ticks)
///
/// The tick table is taken from observed factory values and has not been confirmed
/// against every firmware version. Raw 127 holds the note until the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteLength(u8);

impl NoteLength {
    pub const THIRTY_SECOND: Self = Self(3);
    pub const SIXTEENTH: Self = Self(6);
    pub const EIGHTH: Self = Self(12);
    pub const QUARTER: Self = Self(24);
    pub const HALF: Self = Self(48);
    pub const WHOLE: Self = Self(96);
    pub const INFINITE: Self = Self(127);

    /// Accept any raw value from the tick table
    pub fn from_u8(raw: u8) -> Result<Self> {
        let valid = raw == 3 || raw == 127 || (raw % 6 == 0 && (6..=126).contains(&raw));
        if !valid {
            return Err(OctaError::range("note length", raw, 3, 127));
        }
        Ok(Self(raw))
    }

    /// Length of `n` sixteenth-note steps (1-21)
    pub fn steps(n: u8) -> Result<Self> {
        if !(1..=21).contains(&n) {
            return Err(OctaError::range("note length steps", n, 1, 21));
        }
        Ok(Self(n * 6))
    }

    pub fn as_u8(self) -> u8 {
        self.0
    }

    pub fn is_infinite(self) -> bool {
        self.0 == 127
    }

    /// Duration in ticks, `None` for the infinite length
    pub fn ticks(self) -> Option<u16> {
        (!self.is_infinite()).then_some(u16::from(self.0))
    }
}

impl Default for NoteLength {
    fn default() -> Self {
        Self::SIXTEENTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_enum_conversion() {
        assert_eq!(MachineType::from_u8(1).unwrap(), MachineType::Flex);
        assert_eq!(FxType::try_from(22).unwrap(), FxType::DarkReverb);
        assert_eq!(u8::from(FxType::Lofi), 25);
        assert!(matches!(
            FxType::from_u8(9),
            Err(OctaError::RangeError { value: 9, .. })
        ));
        assert_eq!(QRecMode::from_u8(255).unwrap(), QRecMode::Off);
        assert_eq!(MachineType::ALL.len(), 5);
    }

    #[test]
    fn test_fx_slot_compatibility() {
        assert!(FxType::Delay.allowed_in(FxSlot::Fx2));
        assert!(!FxType::Delay.allowed_in(FxSlot::Fx1));
        assert!(!FxType::PlateReverb.allowed_in(FxSlot::Fx1));
        assert!(FxType::Filter.allowed_in(FxSlot::Fx1));
        assert!(FxType::Lofi.allowed_in(FxSlot::Fx2));
    }

    #[test]
    fn test_condition_raw_values() {
        assert_eq!(TrigCondition::from_u8(0).unwrap(), TrigCondition::None);
        assert_eq!(TrigCondition::from_u8(8).unwrap(), TrigCondition::NotFirst);
        assert_eq!(TrigCondition::from_u8(19).unwrap(), TrigCondition::Probability(50));
        assert_eq!(
            TrigCondition::from_u8(30).unwrap(),
            TrigCondition::Loop { trigger: 1, reset: 2 }
        );
        assert_eq!(
            TrigCondition::from_u8(34).unwrap(),
            TrigCondition::Loop { trigger: 3, reset: 3 }
        );
        assert_eq!(
            TrigCondition::from_u8(57).unwrap(),
            TrigCondition::Loop { trigger: 1, reset: 8 }
        );
        assert_eq!(
            TrigCondition::from_u8(64).unwrap(),
            TrigCondition::Loop { trigger: 8, reset: 8 }
        );
        assert!(TrigCondition::from_u8(65).is_err());
    }

    #[test]
    fn test_condition_encoding_covers_every_raw_value() {
        for raw in 0..=MAX_CONDITION {
            let cond = TrigCondition::from_u8(raw).unwrap();
            assert_eq!(cond.to_u8().unwrap(), raw, "{cond:?}");
        }
    }

    #[test]
    fn test_condition_rejects_invalid() {
        assert!(TrigCondition::Probability(3).to_u8().is_err());
        assert!(TrigCondition::Loop { trigger: 3, reset: 2 }.to_u8().is_err());
        assert!(TrigCondition::Loop { trigger: 1, reset: 9 }.to_u8().is_err());
    }

    #[test]
    fn test_nearest_probability() {
        assert_eq!(
            TrigCondition::nearest_probability(50).unwrap(),
            TrigCondition::Probability(50)
        );
        assert_eq!(
            TrigCondition::nearest_probability(30).unwrap(),
            TrigCondition::Probability(33)
        );
        assert_eq!(
            TrigCondition::nearest_probability(99).unwrap(),
            TrigCondition::Probability(99)
        );
        assert_eq!(
            TrigCondition::nearest_probability(100).unwrap(),
            TrigCondition::None
        );
        assert!(TrigCondition::nearest_probability(0).is_err());
    }

    #[test]
    fn test_note_length_table() {
        assert_eq!(NoteLength::steps(1).unwrap(), NoteLength::SIXTEENTH);
        assert_eq!(NoteLength::steps(16).unwrap(), NoteLength::WHOLE);
        assert!(NoteLength::from_u8(3).is_ok());
        assert!(NoteLength::from_u8(7).is_err());
        assert_eq!(NoteLength::INFINITE.ticks(), None);
        assert_eq!(NoteLength::QUARTER.ticks(), Some(24));
    }
}
