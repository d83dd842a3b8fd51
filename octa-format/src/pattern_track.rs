//! Pattern-track views
//!
//! Audio and MIDI pattern tracks share one shape: a four-byte tag, a track id, a set of
//! trigger masks, a few playback settings and 64 p-lock blocks plus 64 condition pairs.
//! The shape is expressed once as [`PatternTrack`], specialised by a [`TrackKind`] marker
//! that supplies the offsets.

use std::fmt;
use std::marker::PhantomData;

use crate::block::{Block, SENTINEL};
use crate::enums::{PatternScale, TrigKind};
use crate::error::{check_range, check_step, check_track, OctaError, Result};
use crate::layout::{audio_track, midi_track};
use crate::step::Step;
use crate::trigs::{TrigMask, MASK_SIZE};
use crate::{AUDIO_TRACK_SIZE, MIDI_TRACK_SIZE, PLOCK_SIZE, STEPS_PER_TRACK};

/// Highest swing amount
pub const MAX_SWING: u8 = 30;

/// Default track length in steps
pub const DEFAULT_LENGTH: u8 = 16;

/// Record layout of one kind of pattern track
pub trait TrackKind: fmt::Debug {
    /// Used in error messages
    const NAME: &'static str;
    const MAGIC: &'static [u8; 4];
    const SIZE: usize;
    /// Trigger masks the track carries and their offsets
    const MASKS: &'static [(TrigKind, usize)];
    const TRACK_ID: usize;
    const LENGTH: usize;
    const SCALE: usize;
    const SWING_AMOUNT: usize;
    const START_SILENT: usize;
    const PLAYS_FREE: usize;
    const TRIG_MODE: usize;
    const TRIG_QUANT: usize;
    const PLOCKS: usize;
    const CONDITIONS: usize;
}

/// Audio track marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audio {}

/// MIDI track marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Midi {}

impl TrackKind for Audio {
    const NAME: &'static str = "audio track";
    const MAGIC: &'static [u8; 4] = audio_track::MAGIC;
    const SIZE: usize = AUDIO_TRACK_SIZE;
    const MASKS: &'static [(TrigKind, usize)] = &[
        (TrigKind::Trigger, audio_track::TRIGGER_MASK),
        (TrigKind::Trigless, audio_track::TRIGLESS_MASK),
        (TrigKind::Plock, audio_track::PLOCK_MASK),
        (TrigKind::Oneshot, audio_track::ONESHOT_MASK),
        (TrigKind::Swing, audio_track::SWING_MASK),
        (TrigKind::Slide, audio_track::SLIDE_MASK),
    ];
    const TRACK_ID: usize = audio_track::TRACK_ID;
    const LENGTH: usize = audio_track::LENGTH;
    const SCALE: usize = audio_track::SCALE;
    const SWING_AMOUNT: usize = audio_track::SWING_AMOUNT;
    const START_SILENT: usize = audio_track::START_SILENT;
    const PLAYS_FREE: usize = audio_track::PLAYS_FREE;
    const TRIG_MODE: usize = audio_track::TRIG_MODE;
    const TRIG_QUANT: usize = audio_track::TRIG_QUANT;
    const PLOCKS: usize = audio_track::PLOCKS;
    const CONDITIONS: usize = audio_track::CONDITIONS;
}

impl TrackKind for Midi {
    const NAME: &'static str = "midi track";
    const MAGIC: &'static [u8; 4] = midi_track::MAGIC;
    const SIZE: usize = MIDI_TRACK_SIZE;
    const MASKS: &'static [(TrigKind, usize)] = &[
        (TrigKind::Trigger, midi_track::TRIGGER_MASK),
        (TrigKind::Trigless, midi_track::TRIGLESS_MASK),
        (TrigKind::Plock, midi_track::PLOCK_MASK),
        (TrigKind::Swing, midi_track::SWING_MASK),
    ];
    const TRACK_ID: usize = midi_track::TRACK_ID;
    const LENGTH: usize = midi_track::LENGTH;
    const SCALE: usize = midi_track::SCALE;
    const SWING_AMOUNT: usize = midi_track::SWING_AMOUNT;
    const START_SILENT: usize = midi_track::START_SILENT;
    const PLAYS_FREE: usize = midi_track::PLAYS_FREE;
    const TRIG_MODE: usize = midi_track::TRIG_MODE;
    const TRIG_QUANT: usize = midi_track::TRIG_QUANT;
    const PLOCKS: usize = midi_track::PLOCKS;
    const CONDITIONS: usize = midi_track::CONDITIONS;
}

/// Write a factory-fresh track record into `buf`
pub(crate) fn init_record<T: TrackKind>(buf: &mut [u8], track_idx: usize) {
    buf.fill(0);
    buf[..4].copy_from_slice(T::MAGIC);
    buf[T::TRACK_ID] = track_idx as u8;
    buf[T::LENGTH] = DEFAULT_LENGTH;
    buf[T::SCALE] = PatternScale::X1.as_u8();
    buf[T::PLOCKS..T::PLOCKS + STEPS_PER_TRACK * PLOCK_SIZE].fill(SENTINEL);
}

/// One track of a pattern
#[derive(Debug)]
pub struct PatternTrack<B, T> {
    block: Block<B>,
    kind: PhantomData<T>,
}

/// Audio track of a pattern
pub type AudioPatternTrack<B> = PatternTrack<B, Audio>;

/// MIDI track of a pattern
pub type MidiPatternTrack<B> = PatternTrack<B, Midi>;

impl<B: AsRef<[u8]>, T: TrackKind> PatternTrack<B, T> {
    pub(crate) fn from_block(block: Block<B>) -> Self {
        Self {
            block,
            kind: PhantomData,
        }
    }

    /// Parse a standalone track record, checking size and tag
    pub fn from_bytes(buf: B) -> Result<Self> {
        let block = Block::with_len(buf, T::NAME, T::SIZE)?;
        if block.bytes(0, 4) != T::MAGIC {
            return Err(OctaError::MalformedBank(format!("{} tag mismatch", T::NAME)));
        }
        Ok(Self::from_block(block))
    }

    /// 1-based track number
    pub fn number(&self) -> u8 {
        self.block.u8(T::TRACK_ID).saturating_add(1)
    }

    fn mask_offset(&self, kind: TrigKind) -> Result<usize> {
        T::MASKS
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, offset)| *offset)
            .ok_or_else(|| OctaError::UnsupportedParameter {
                family: T::NAME,
                name: format!("{kind:?}").to_lowercase(),
            })
    }

    /// One of the track's trigger masks
    pub fn mask(&self, kind: TrigKind) -> Result<TrigMask<&[u8]>> {
        let offset = self.mask_offset(kind)?;
        Ok(TrigMask::from_block(self.block.sub(offset, MASK_SIZE)))
    }

    /// Steps carrying a trig, ascending
    pub fn active_steps(&self) -> Vec<u8> {
        self.mask(TrigKind::Trigger)
            .map(|m| m.active_steps())
            .unwrap_or_default()
    }

    /// Steps carrying a trigless trig, ascending
    pub fn trigless_steps(&self) -> Vec<u8> {
        self.mask(TrigKind::Trigless)
            .map(|m| m.active_steps())
            .unwrap_or_default()
    }

    /// View step `n` (1-64)
    pub fn step(&self, n: u8) -> Result<Step<&[u8], T>> {
        let idx = check_step(n)?;
        Ok(Step::in_track(Block::new(self.block.as_bytes()), idx))
    }

    /// Every step in order
    pub fn steps(&self) -> impl Iterator<Item = Step<&[u8], T>> + '_ {
        (0..STEPS_PER_TRACK).map(move |idx| Step::in_track(Block::new(self.block.as_bytes()), idx))
    }

    /// Number of steps before the track loops (1-64)
    pub fn length(&self) -> u8 {
        self.block.u8(T::LENGTH)
    }

    pub fn scale(&self) -> Result<PatternScale> {
        PatternScale::from_u8(self.block.u8(T::SCALE))
    }

    /// Swing amount (0-30)
    pub fn swing_amount(&self) -> u8 {
        self.block.u8(T::SWING_AMOUNT)
    }

    pub fn start_silent(&self) -> bool {
        self.block.u8(T::START_SILENT) != 0
    }

    pub fn plays_free(&self) -> bool {
        self.block.u8(T::PLAYS_FREE) != 0
    }

    /// Raw trig mode byte
    pub fn trig_mode(&self) -> u8 {
        self.block.u8(T::TRIG_MODE)
    }

    /// Raw trig quantization byte
    pub fn trig_quant(&self) -> u8 {
        self.block.u8(T::TRIG_QUANT)
    }

    /// True when no step has a trig, a lock or a condition
    pub fn is_empty(&self) -> bool {
        T::MASKS
            .iter()
            .all(|(_, offset)| self.block.all(*offset, MASK_SIZE, 0))
            && self.block.all(T::PLOCKS, STEPS_PER_TRACK * PLOCK_SIZE, SENTINEL)
            && self.block.all(T::CONDITIONS, STEPS_PER_TRACK * 2, 0)
    }

    /// Raw record bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.block.as_bytes()
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>, T: TrackKind> PatternTrack<B, T> {
    pub fn mask_mut(&mut self, kind: TrigKind) -> Result<TrigMask<&mut [u8]>> {
        let offset = self.mask_offset(kind)?;
        Ok(TrigMask::from_block(self.block.sub_mut(offset, MASK_SIZE)))
    }

    /// Replace the trig set with exactly `steps`
    pub fn set_active_steps(&mut self, steps: &[u8]) -> Result<()> {
        self.mask_mut(TrigKind::Trigger)?.set_active_steps(steps)
    }

    pub fn set_trigless_steps(&mut self, steps: &[u8]) -> Result<()> {
        self.mask_mut(TrigKind::Trigless)?.set_active_steps(steps)
    }

    pub fn step_mut(&mut self, n: u8) -> Result<Step<&mut [u8], T>> {
        let idx = check_step(n)?;
        Ok(Step::in_track(Block::new(self.block.as_bytes_mut()), idx))
    }

    /// Copy a standalone step into position `n`
    pub fn set_step(&mut self, n: u8, step: &Step<Vec<u8>, T>) -> Result<()> {
        self.step_mut(n)?.copy_from(step);
        Ok(())
    }

    pub fn set_length(&mut self, length: u8) -> Result<()> {
        check_range("track length", length.into(), 1, STEPS_PER_TRACK as i32)?;
        self.block.set_u8(T::LENGTH, length);
        Ok(())
    }

    pub fn set_scale(&mut self, scale: PatternScale) {
        self.block.set_u8(T::SCALE, scale.as_u8());
    }

    pub fn set_swing_amount(&mut self, amount: u8) -> Result<()> {
        check_range("swing amount", amount.into(), 0, MAX_SWING.into())?;
        self.block.set_u8(T::SWING_AMOUNT, amount);
        Ok(())
    }

    pub fn set_start_silent(&mut self, on: bool) {
        self.block.set_u8(T::START_SILENT, on.into());
    }

    pub fn set_plays_free(&mut self, on: bool) {
        self.block.set_u8(T::PLAYS_FREE, on.into());
    }

    pub fn set_trig_mode(&mut self, raw: u8) {
        self.block.set_u8(T::TRIG_MODE, raw);
    }

    pub fn set_trig_quant(&mut self, raw: u8) {
        self.block.set_u8(T::TRIG_QUANT, raw);
    }

    /// Remove every trig, lock and condition, keeping the track settings
    pub fn clear(&mut self) {
        for (_, offset) in T::MASKS {
            self.block.fill(*offset, MASK_SIZE, 0);
        }
        self.block.fill(T::PLOCKS, STEPS_PER_TRACK * PLOCK_SIZE, SENTINEL);
        self.block.fill(T::CONDITIONS, STEPS_PER_TRACK * 2, 0);
    }
}

impl<T: TrackKind> PatternTrack<Vec<u8>, T> {
    /// Fresh standalone record for track `track` (1-8)
    pub fn new(track: u8) -> Result<Self> {
        let idx = check_track(track)?;
        let mut buf = vec![0u8; T::SIZE];
        init_record::<T>(&mut buf, idx);
        Ok(Self::from_block(Block::new(buf)))
    }

    /// Parse a standalone record from a copy of `data`
    pub fn read(data: &[u8]) -> Result<Self> {
        Self::from_bytes(data.to_vec())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.block.as_bytes().to_vec()
    }
}

impl<B: AsRef<[u8]>> PatternTrack<B, Audio> {
    /// Whether the track is in one-shot mode
    pub fn oneshot(&self) -> bool {
        self.block.u8(audio_track::ONESHOT) != 0
    }

    /// Raw recorder trig masks (32 bytes)
    pub fn recorder_masks(&self) -> &[u8] {
        self.block.bytes(audio_track::RECORDER_MASKS, 4 * MASK_SIZE)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> PatternTrack<B, Audio> {
    pub fn set_oneshot(&mut self, on: bool) {
        self.block.set_u8(audio_track::ONESHOT, on.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::TrigCondition;

    #[test]
    fn test_fresh_record() {
        let track = AudioPatternTrack::new(3).unwrap();
        assert_eq!(&track.as_bytes()[..4], b"TRAC");
        assert_eq!(track.number(), 3);
        assert_eq!(track.length(), 16);
        assert_eq!(track.scale().unwrap(), PatternScale::X1);
        assert!(track.is_empty());
        assert!(track.active_steps().is_empty());
    }

    #[test]
    fn test_step_writes_visible_in_masks() {
        let mut track = AudioPatternTrack::new(1).unwrap();
        track.step_mut(5).unwrap().set_trigger(true);
        track.step_mut(1).unwrap().set_trigger(true);
        assert_eq!(track.active_steps(), vec![1, 5]);

        track.set_active_steps(&[9]).unwrap();
        assert!(track.step(9).unwrap().trigger());
        assert!(!track.step(5).unwrap().trigger());
    }

    #[test]
    fn test_step_range() {
        let track = MidiPatternTrack::new(1).unwrap();
        assert!(matches!(track.step(0), Err(OctaError::InvalidStep(0))));
        assert!(matches!(track.step(65), Err(OctaError::InvalidStep(65))));
        assert_eq!(track.steps().count(), 64);
    }

    #[test]
    fn test_midi_has_no_slide_mask() {
        let track = MidiPatternTrack::new(2).unwrap();
        assert!(matches!(
            track.mask(TrigKind::Slide),
            Err(OctaError::UnsupportedParameter { family: "midi track", .. })
        ));
        assert!(track.mask(TrigKind::Swing).is_ok());
    }

    #[test]
    fn test_settings_validate() {
        let mut track = AudioPatternTrack::new(1).unwrap();
        assert!(track.set_length(0).is_err());
        assert!(track.set_length(65).is_err());
        track.set_length(64).unwrap();
        assert!(track.set_swing_amount(31).is_err());
        track.set_swing_amount(30).unwrap();
        track.set_oneshot(true);
        assert!(track.oneshot());
        assert_eq!(track.length(), 64);
    }

    #[test]
    fn test_clear_keeps_settings() {
        let mut track = AudioPatternTrack::new(1).unwrap();
        track.set_length(32).unwrap();
        {
            let mut step = track.step_mut(3).unwrap();
            step.set_trigger(true);
            step.set_volume(Some(90)).unwrap();
            step.set_condition(TrigCondition::Fill).unwrap();
        }
        assert!(!track.is_empty());
        track.clear();
        assert!(track.is_empty());
        assert_eq!(track.length(), 32);
    }

    #[test]
    fn test_standalone_round_trip() {
        let mut track = MidiPatternTrack::new(4).unwrap();
        track.step_mut(7).unwrap().set_note(Some(60)).unwrap();
        let parsed = MidiPatternTrack::read(&track.to_bytes()).unwrap();
        assert_eq!(parsed.step(7).unwrap().note(), Some(60));

        let err = AudioPatternTrack::read(&track.to_bytes()).unwrap_err();
        assert!(matches!(err, OctaError::SizeMismatch { .. }));
    }
}
