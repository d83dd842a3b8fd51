//! Track recorder setup
//!
//! Each audio track carries a 12-byte recorder configuration in its Part. The recording
//! source is split across three bytes (external inputs A/B, external inputs C/D and an
//! internal source); [`RecorderSetup::source`] folds them into one [`RecordingSource`].

use crate::block::Block;
use crate::enums::{QRecMode, RecTrigMode, RecordingSource};
use crate::error::{check_range, OctaError, Result};
use crate::layout::recorder as off;
use crate::page::MAX_VALUE;
use crate::{RECORDER_SETUP_SIZE, TRACKS_PER_PATTERN};

/// SRC3 value selecting the main outputs
const SRC3_MAIN: u8 = TRACKS_PER_PATTERN as u8 + 1;

/// Factory recorder bytes
pub const DEFAULT_RECORDER: [u8; RECORDER_SETUP_SIZE] = [
    0,                       // in_ab
    0,                       // in_cd
    16,                      // rlen
    0,                       // trig: one
    SRC3_MAIN,               // src3
    1,                       // loop
    0,                       // fade in
    0,                       // fade out
    64,                      // ab gain
    QRecMode::Off.as_u8(),   // qrec
    QRecMode::Off.as_u8(),   // qpl
    64,                      // cd gain
];

/// Recorder configuration of one audio track
#[derive(Debug)]
pub struct RecorderSetup<B> {
    block: Block<B>,
}

impl<B: AsRef<[u8]>> RecorderSetup<B> {
    pub(crate) fn from_block(block: Block<B>) -> Self {
        Self { block }
    }

    /// Parse a standalone 12-byte record
    pub fn from_bytes(buf: B) -> Result<Self> {
        Ok(Self {
            block: Block::with_len(buf, "recorder setup", RECORDER_SETUP_SIZE)?,
        })
    }

    /// Effective recording source
    ///
    /// External inputs take precedence over SRC3 when more than one byte is set, which
    /// only happens in files not written through [`RecorderSetup::set_source`].
    pub fn source(&self) -> RecordingSource {
        match (self.in_ab(), self.in_cd(), self.src3()) {
            (1, _, _) => RecordingSource::InputAB,
            (2, _, _) => RecordingSource::InputA,
            (3, _, _) => RecordingSource::InputB,
            (_, 1, _) => RecordingSource::InputCD,
            (_, 2, _) => RecordingSource::InputC,
            (_, 3, _) => RecordingSource::InputD,
            (_, _, n @ 1..=8) => RecordingSource::Track(n),
            (_, _, SRC3_MAIN) => RecordingSource::Main,
            _ => RecordingSource::Off,
        }
    }

    pub fn in_ab(&self) -> u8 {
        self.block.u8(off::IN_AB)
    }

    pub fn in_cd(&self) -> u8 {
        self.block.u8(off::IN_CD)
    }

    pub fn src3(&self) -> u8 {
        self.block.u8(off::SRC3)
    }

    /// Recording length in steps
    pub fn length(&self) -> u8 {
        self.block.u8(off::RLEN)
    }

    pub fn trig_mode(&self) -> Result<RecTrigMode> {
        RecTrigMode::from_u8(self.block.u8(off::TRIG))
    }

    pub fn looping(&self) -> bool {
        self.block.u8(off::LOOP) != 0
    }

    pub fn fade_in(&self) -> u8 {
        self.block.u8(off::FIN)
    }

    pub fn fade_out(&self) -> u8 {
        self.block.u8(off::FOUT)
    }

    pub fn ab_gain(&self) -> u8 {
        self.block.u8(off::AB_GAIN)
    }

    pub fn cd_gain(&self) -> u8 {
        self.block.u8(off::CD_GAIN)
    }

    /// Record quantization
    pub fn qrec(&self) -> Result<QRecMode> {
        QRecMode::from_u8(self.block.u8(off::QREC))
    }

    /// Playback quantization
    pub fn qpl(&self) -> Result<QRecMode> {
        QRecMode::from_u8(self.block.u8(off::QPL))
    }

    /// True when every byte still holds its factory value
    pub fn is_default(&self) -> bool {
        self.block.as_bytes() == DEFAULT_RECORDER
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.block.as_bytes()
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> RecorderSetup<B> {
    /// Select the recording source, clearing the two bytes it does not use
    pub fn set_source(&mut self, source: RecordingSource) -> Result<()> {
        let (in_ab, in_cd, src3) = match source {
            RecordingSource::Off => (0, 0, 0),
            RecordingSource::InputAB => (1, 0, 0),
            RecordingSource::InputA => (2, 0, 0),
            RecordingSource::InputB => (3, 0, 0),
            RecordingSource::InputCD => (0, 1, 0),
            RecordingSource::InputC => (0, 2, 0),
            RecordingSource::InputD => (0, 3, 0),
            RecordingSource::Track(n) => {
                if !(1..=TRACKS_PER_PATTERN as u8).contains(&n) {
                    return Err(OctaError::InvalidTrack(n));
                }
                (0, 0, n)
            }
            RecordingSource::Main => (0, 0, SRC3_MAIN),
        };
        self.block.set_u8(off::IN_AB, in_ab);
        self.block.set_u8(off::IN_CD, in_cd);
        self.block.set_u8(off::SRC3, src3);
        Ok(())
    }

    pub fn set_length(&mut self, steps: u8) -> Result<()> {
        check_range("recording length", steps.into(), 1, MAX_VALUE.into())?;
        self.block.set_u8(off::RLEN, steps);
        Ok(())
    }

    pub fn set_trig_mode(&mut self, mode: RecTrigMode) {
        self.block.set_u8(off::TRIG, mode.as_u8());
    }

    pub fn set_looping(&mut self, on: bool) {
        self.block.set_u8(off::LOOP, on.into());
    }

    pub fn set_fade_in(&mut self, value: u8) -> Result<()> {
        self.set_level("fade in", off::FIN, value)
    }

    pub fn set_fade_out(&mut self, value: u8) -> Result<()> {
        self.set_level("fade out", off::FOUT, value)
    }

    pub fn set_ab_gain(&mut self, value: u8) -> Result<()> {
        self.set_level("ab gain", off::AB_GAIN, value)
    }

    pub fn set_cd_gain(&mut self, value: u8) -> Result<()> {
        self.set_level("cd gain", off::CD_GAIN, value)
    }

    pub fn set_qrec(&mut self, mode: QRecMode) {
        self.block.set_u8(off::QREC, mode.as_u8());
    }

    pub fn set_qpl(&mut self, mode: QRecMode) {
        self.block.set_u8(off::QPL, mode.as_u8());
    }

    /// Restore factory values
    pub fn reset(&mut self) {
        self.block.write(0, &DEFAULT_RECORDER);
    }

    fn set_level(&mut self, field: &'static str, offset: usize, value: u8) -> Result<()> {
        check_range(field, value.into(), 0, MAX_VALUE.into())?;
        self.block.set_u8(offset, value);
        Ok(())
    }
}

impl RecorderSetup<Vec<u8>> {
    /// Standalone record with factory values
    pub fn new() -> Self {
        Self {
            block: Block::new(DEFAULT_RECORDER.to_vec()),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.block.as_bytes().to_vec()
    }
}

impl Default for RecorderSetup<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}
