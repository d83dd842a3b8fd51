//! Pattern records
//!
//! A pattern carries the sequencer data for all sixteen tracks plus a few pattern-wide
//! settings, including which of the bank's four Parts it plays through.

use crate::block::Block;
use crate::enums::PatternScale;
use crate::error::{check_range, check_track, OctaError, Result};
use crate::layout::pattern;
use crate::pattern_track::{
    init_record as init_track, Audio, AudioPatternTrack, Midi, MidiPatternTrack, DEFAULT_LENGTH,
};
use crate::{
    AUDIO_TRACK_SIZE, MIDI_TRACK_SIZE, PARTS_PER_BANK, PATTERN_SIZE, STEPS_PER_TRACK,
    TRACKS_PER_PATTERN,
};

/// Write a factory-fresh pattern record into `buf`
pub(crate) fn init_record(buf: &mut [u8]) {
    buf.fill(0);
    buf[..4].copy_from_slice(pattern::MAGIC);
    for t in 0..TRACKS_PER_PATTERN {
        let at = audio_offset(t);
        init_track::<Audio>(&mut buf[at..at + AUDIO_TRACK_SIZE], t);
        let at = midi_offset(t);
        init_track::<Midi>(&mut buf[at..at + MIDI_TRACK_SIZE], t);
    }
    buf[pattern::MASTER_LENGTH] = DEFAULT_LENGTH;
    buf[pattern::MASTER_SCALE] = PatternScale::X1.as_u8();
}

fn audio_offset(idx: usize) -> usize {
    pattern::AUDIO_TRACKS + idx * AUDIO_TRACK_SIZE
}

fn midi_offset(idx: usize) -> usize {
    pattern::MIDI_TRACKS + idx * MIDI_TRACK_SIZE
}

/// One of a bank's sixteen patterns
#[derive(Debug)]
pub struct Pattern<B> {
    block: Block<B>,
}

impl<B: AsRef<[u8]>> Pattern<B> {
    pub(crate) fn from_block(block: Block<B>) -> Self {
        Self { block }
    }

    /// Parse a standalone pattern record, checking size and tag
    pub fn from_bytes(buf: B) -> Result<Self> {
        let block = Block::with_len(buf, "pattern", PATTERN_SIZE)?;
        if block.bytes(0, 4) != pattern::MAGIC {
            return Err(OctaError::MalformedBank("pattern tag mismatch".to_string()));
        }
        Ok(Self { block })
    }

    /// Audio track `n` (1-8)
    pub fn audio_track(&self, n: u8) -> Result<AudioPatternTrack<&[u8]>> {
        let idx = check_track(n)?;
        Ok(AudioPatternTrack::from_block(
            self.block.sub(audio_offset(idx), AUDIO_TRACK_SIZE),
        ))
    }

    /// MIDI track `n` (1-8)
    pub fn midi_track(&self, n: u8) -> Result<MidiPatternTrack<&[u8]>> {
        let idx = check_track(n)?;
        Ok(MidiPatternTrack::from_block(
            self.block.sub(midi_offset(idx), MIDI_TRACK_SIZE),
        ))
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = AudioPatternTrack<&[u8]>> + '_ {
        (0..TRACKS_PER_PATTERN).map(move |idx| {
            AudioPatternTrack::from_block(self.block.sub(audio_offset(idx), AUDIO_TRACK_SIZE))
        })
    }

    pub fn midi_tracks(&self) -> impl Iterator<Item = MidiPatternTrack<&[u8]>> + '_ {
        (0..TRACKS_PER_PATTERN).map(move |idx| {
            MidiPatternTrack::from_block(self.block.sub(midi_offset(idx), MIDI_TRACK_SIZE))
        })
    }

    /// Part the pattern plays through (1-4)
    pub fn part_assignment(&self) -> u8 {
        self.block.u8(pattern::PART_ASSIGNMENT).saturating_add(1)
    }

    /// Pattern length in steps
    pub fn master_length(&self) -> u8 {
        self.block.u8(pattern::MASTER_LENGTH)
    }

    pub fn master_scale(&self) -> Result<PatternScale> {
        PatternScale::from_u8(self.block.u8(pattern::MASTER_SCALE))
    }

    /// True when any audio track has a trig
    pub fn has_audio_activity(&self) -> bool {
        self.audio_tracks().any(|t| !t.active_steps().is_empty())
    }

    /// True when no track carries trigs, locks or conditions
    pub fn is_empty(&self) -> bool {
        self.audio_tracks().all(|t| t.is_empty()) && self.midi_tracks().all(|t| t.is_empty())
    }

    /// Raw record bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.block.as_bytes()
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Pattern<B> {
    pub fn audio_track_mut(&mut self, n: u8) -> Result<AudioPatternTrack<&mut [u8]>> {
        let idx = check_track(n)?;
        Ok(AudioPatternTrack::from_block(
            self.block.sub_mut(audio_offset(idx), AUDIO_TRACK_SIZE),
        ))
    }

    pub fn midi_track_mut(&mut self, n: u8) -> Result<MidiPatternTrack<&mut [u8]>> {
        let idx = check_track(n)?;
        Ok(MidiPatternTrack::from_block(
            self.block.sub_mut(midi_offset(idx), MIDI_TRACK_SIZE),
        ))
    }

    /// Point the pattern at Part `part` (1-4)
    pub fn set_part_assignment(&mut self, part: u8) -> Result<()> {
        if !(1..=PARTS_PER_BANK as u8).contains(&part) {
            return Err(OctaError::InvalidPart(part));
        }
        self.block.set_u8(pattern::PART_ASSIGNMENT, part - 1);
        Ok(())
    }

    pub fn set_master_length(&mut self, length: u8) -> Result<()> {
        check_range("master length", length.into(), 1, STEPS_PER_TRACK as i32)?;
        self.block.set_u8(pattern::MASTER_LENGTH, length);
        Ok(())
    }

    pub fn set_master_scale(&mut self, scale: PatternScale) {
        self.block.set_u8(pattern::MASTER_SCALE, scale.as_u8());
    }

    /// Clear every track's trigs, locks and conditions
    pub fn clear(&mut self) {
        for n in 1..=TRACKS_PER_PATTERN as u8 {
            if let Ok(mut track) = self.audio_track_mut(n) {
                track.clear();
            }
            if let Ok(mut track) = self.midi_track_mut(n) {
                track.clear();
            }
        }
    }
}

impl Pattern<Vec<u8>> {
    /// Standalone pattern with factory values
    pub fn new() -> Self {
        let mut buf = vec![0u8; PATTERN_SIZE];
        init_record(&mut buf);
        Self::from_block(Block::new(buf))
    }

    /// Parse a standalone pattern from a copy of `data`
    pub fn read(data: &[u8]) -> Result<Self> {
        Self::from_bytes(data.to_vec())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.block.as_bytes().to_vec()
    }
}

impl Default for Pattern<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_pattern() {
        let pattern = Pattern::new();
        assert_eq!(&pattern.as_bytes()[..4], b"PTRN");
        assert_eq!(pattern.part_assignment(), 1);
        assert_eq!(pattern.master_length(), 16);
        assert_eq!(pattern.master_scale().unwrap(), PatternScale::X1);
        assert!(pattern.is_empty());
        for (i, track) in pattern.audio_tracks().enumerate() {
            assert_eq!(&track.as_bytes()[..4], b"TRAC");
            assert_eq!(track.number(), i as u8 + 1);
        }
        for track in pattern.midi_tracks() {
            assert_eq!(&track.as_bytes()[..4], b"MTRA");
        }
    }

    #[test]
    fn test_part_assignment_is_one_based() {
        let mut pattern = Pattern::new();
        pattern.set_part_assignment(4).unwrap();
        assert_eq!(pattern.part_assignment(), 4);
        assert_eq!(pattern.as_bytes()[pattern::PART_ASSIGNMENT], 3);
        assert!(matches!(pattern.set_part_assignment(0), Err(OctaError::InvalidPart(0))));
        assert!(matches!(pattern.set_part_assignment(5), Err(OctaError::InvalidPart(5))));
    }

    #[test]
    fn test_track_edits_are_isolated() {
        let mut pattern = Pattern::new();
        pattern.audio_track_mut(8).unwrap().set_active_steps(&[1, 2]).unwrap();
        pattern.midi_track_mut(1).unwrap().set_active_steps(&[3]).unwrap();
        assert!(pattern.audio_track(7).unwrap().active_steps().is_empty());
        assert_eq!(pattern.audio_track(8).unwrap().active_steps(), vec![1, 2]);
        assert_eq!(pattern.midi_track(1).unwrap().active_steps(), vec![3]);
        assert!(pattern.has_audio_activity());
        pattern.clear();
        assert!(pattern.is_empty());
        assert!(!pattern.has_audio_activity());
    }

    #[test]
    fn test_master_settings() {
        let mut pattern = Pattern::new();
        assert!(pattern.set_master_length(0).is_err());
        pattern.set_master_length(64).unwrap();
        pattern.set_master_scale(PatternScale::X2);
        assert_eq!(pattern.master_length(), 64);
        assert_eq!(pattern.master_scale().unwrap(), PatternScale::X2);
    }
}
