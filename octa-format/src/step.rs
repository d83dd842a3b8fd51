//! Step views
//!
//! A step's data is spread over its parent track record: one bit in each trigger mask, a
//! two-byte condition pair and a 32-byte p-lock block. [`Step`] addresses all three in
//! place, so every setter lands in the backing buffer immediately and is visible to the
//! track's bulk accessors such as `active_steps`.
//!
//! A standalone step packs the same data into a 35-byte record: a flag byte, the condition
//! pair and the lock block.

use std::marker::PhantomData;

use crate::block::{Block, SENTINEL};
use crate::enums::{FxSlot, FxType, MachineType, NoteLength, TrigCondition, TrigKind};
use crate::error::{check_range, OctaError, Result};
use crate::fx::FxView;
use crate::layout::{midi_plock, plock};
use crate::machine::MachineView;
use crate::page::{Amp, Lfo, Locks, MAX_VALUE, PAGE_SIZE};
use crate::pattern_track::{Audio, Midi, TrackKind};
use crate::plock::{Lockable, Page, Param};
use crate::trigs::{mask_position, TrigFlags};
use crate::PLOCK_SIZE;

/// Size of a standalone step record
pub const STEP_SIZE: usize = 3 + PLOCK_SIZE;

/// Micro-timing range in 1/384 note units
pub const MICRO_TIMING_RANGE: i8 = 23;

/// Highest repeat (retrig) count
pub const MAX_REPEATS: u8 = 7;

const STANDALONE_FLAGS: usize = 0;
const STANDALONE_COND: usize = 1;
const STANDALONE_PLOCK: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepLayout {
    /// 0-based step inside a pattern-track record
    InTrack(usize),
    Standalone,
}

/// One sequencer step of an audio or MIDI pattern track
#[derive(Debug)]
pub struct Step<B, T> {
    block: Block<B>,
    layout: StepLayout,
    kind: PhantomData<T>,
}

/// Step of an audio track
pub type AudioStep<B> = Step<B, Audio>;

/// Step of a MIDI track
pub type MidiStep<B> = Step<B, Midi>;

impl<B: AsRef<[u8]>, T: TrackKind> Step<B, T> {
    /// View step `idx` (0-based) of a track record
    pub(crate) fn in_track(block: Block<B>, idx: usize) -> Self {
        Self {
            block,
            layout: StepLayout::InTrack(idx),
            kind: PhantomData,
        }
    }

    /// Parse a standalone step record
    pub fn from_bytes(buf: B) -> Result<Self> {
        Ok(Self {
            block: Block::with_len(buf, "step", STEP_SIZE)?,
            layout: StepLayout::Standalone,
            kind: PhantomData,
        })
    }

    fn flag_position(&self, kind: TrigKind) -> Option<(usize, u8)> {
        let mask = T::MASKS.iter().find(|(k, _)| *k == kind)?.1;
        Some(match self.layout {
            StepLayout::InTrack(idx) => {
                let (byte, bit) = mask_position(idx);
                (mask + byte, bit)
            }
            StepLayout::Standalone => (
                STANDALONE_FLAGS,
                TrigFlags::of(kind).bits().trailing_zeros() as u8,
            ),
        })
    }

    fn cond_offset(&self) -> usize {
        match self.layout {
            StepLayout::InTrack(idx) => T::CONDITIONS + 2 * idx,
            StepLayout::Standalone => STANDALONE_COND,
        }
    }

    fn plock_offset(&self) -> usize {
        match self.layout {
            StepLayout::InTrack(idx) => T::PLOCKS + PLOCK_SIZE * idx,
            StepLayout::Standalone => STANDALONE_PLOCK,
        }
    }

    /// 1-based step number, `None` for a standalone step
    pub fn number(&self) -> Option<u8> {
        match self.layout {
            StepLayout::InTrack(idx) => Some(idx as u8 + 1),
            StepLayout::Standalone => None,
        }
    }

    /// State of one trigger mask at this step
    pub fn flag(&self, kind: TrigKind) -> Result<bool> {
        let (offset, bit) = self.flag_position(kind).ok_or_else(|| unsupported::<T>(kind))?;
        Ok(self.block.bit(offset, bit))
    }

    /// Every trigger mask at this step
    pub fn flags(&self) -> TrigFlags {
        T::MASKS
            .iter()
            .filter(|(kind, _)| self.flag(*kind).unwrap_or(false))
            .fold(TrigFlags::empty(), |acc, (kind, _)| acc | TrigFlags::of(*kind))
    }

    /// Whether the step fires a trig
    pub fn trigger(&self) -> bool {
        self.flag(TrigKind::Trigger).unwrap_or(false)
    }

    /// Whether the step is a trigless (lock-only) trig
    pub fn trigless(&self) -> bool {
        self.flag(TrigKind::Trigless).unwrap_or(false)
    }

    pub fn plock_trig(&self) -> bool {
        self.flag(TrigKind::Plock).unwrap_or(false)
    }

    pub fn swing(&self) -> bool {
        self.flag(TrigKind::Swing).unwrap_or(false)
    }

    /// Raw 7-bit trig condition
    pub fn condition_raw(&self) -> u8 {
        self.block.u8(self.cond_offset() + 1) & 0x7F
    }

    pub fn condition(&self) -> Result<TrigCondition> {
        TrigCondition::from_u8(self.condition_raw())
    }

    /// Percentage when the condition is a probability
    pub fn probability(&self) -> Option<u8> {
        match self.condition() {
            Ok(TrigCondition::Probability(pct)) => Some(pct),
            _ => None,
        }
    }

    /// Signed micro-timing offset (-23..=23)
    pub fn micro_timing(&self) -> i8 {
        let off = self.cond_offset();
        let raw = ((self.block.u8(off) & 0x1F) << 1) | (self.block.u8(off + 1) >> 7);
        if raw >= 32 { raw as i8 - 64 } else { raw as i8 }
    }

    /// Repeat count (0-7)
    pub fn repeats(&self) -> u8 {
        self.block.bits(self.cond_offset(), 5, 3)
    }

    /// True when any lock byte is set
    pub fn has_locks(&self) -> bool {
        !self.block.all(self.plock_offset(), PLOCK_SIZE, SENTINEL)
    }

    /// Raw lock byte `index` (0-31) as an option
    fn lock_at(&self, index: usize) -> Option<u8> {
        self.block.lock(self.plock_offset() + index)
    }

    fn locks_page(&self, page_offset: usize) -> Locks<&[u8]> {
        Locks::new(self.block.bytes(self.plock_offset() + page_offset, PAGE_SIZE))
    }

    /// Copy the step into a standalone record
    pub fn to_standalone(&self) -> Step<Vec<u8>, T> {
        let mut out = Step::<Vec<u8>, T>::new();
        out.copy_from(self);
        out
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>, T: TrackKind> Step<B, T> {
    /// Set one trigger mask at this step
    pub fn set_flag(&mut self, kind: TrigKind, on: bool) -> Result<()> {
        let (offset, bit) = self.flag_position(kind).ok_or_else(|| unsupported::<T>(kind))?;
        self.block.set_bit(offset, bit, on);
        Ok(())
    }

    fn set_shared_flag(&mut self, kind: TrigKind, on: bool) {
        if let Some((offset, bit)) = self.flag_position(kind) {
            self.block.set_bit(offset, bit, on);
        }
    }

    pub fn set_trigger(&mut self, on: bool) {
        self.set_shared_flag(TrigKind::Trigger, on);
    }

    pub fn set_trigless(&mut self, on: bool) {
        self.set_shared_flag(TrigKind::Trigless, on);
    }

    pub fn set_plock_trig(&mut self, on: bool) {
        self.set_shared_flag(TrigKind::Plock, on);
    }

    pub fn set_swing(&mut self, on: bool) {
        self.set_shared_flag(TrigKind::Swing, on);
    }

    pub fn set_condition(&mut self, condition: TrigCondition) -> Result<()> {
        let raw = condition.to_u8()?;
        let off = self.cond_offset() + 1;
        self.block.set_bits(off, 0, 7, raw);
        Ok(())
    }

    /// Use the probability condition nearest to `percent` (1-100)
    ///
    /// `None` or 100 clears the condition so the step always triggers.
    pub fn set_probability(&mut self, percent: Option<u8>) -> Result<()> {
        let condition = match percent {
            Some(pct) => TrigCondition::nearest_probability(pct)?,
            None => TrigCondition::None,
        };
        self.set_condition(condition)
    }

    pub fn set_micro_timing(&mut self, offset: i8) -> Result<()> {
        let range = i32::from(MICRO_TIMING_RANGE);
        check_range("micro timing", offset.into(), -range, range)?;
        let raw = (offset as u8) & 0x3F;
        let off = self.cond_offset();
        self.block.set_bits(off, 0, 5, raw >> 1);
        self.block.set_bits(off + 1, 7, 1, raw & 1);
        Ok(())
    }

    pub fn set_repeats(&mut self, count: u8) -> Result<()> {
        check_range("repeats", count.into(), 0, MAX_REPEATS.into())?;
        let off = self.cond_offset();
        self.block.set_bits(off, 5, 3, count);
        Ok(())
    }

    /// Remove every lock on the step, keeping its trigs and condition
    pub fn clear_locks(&mut self) {
        let off = self.plock_offset();
        self.block.fill(off, PLOCK_SIZE, SENTINEL);
    }

    fn set_lock_at(&mut self, index: usize, value: Option<u8>) -> Result<()> {
        if let Some(v) = value {
            check_range("parameter lock", v.into(), 0, MAX_VALUE.into())?;
        }
        let off = self.plock_offset() + index;
        self.block.set_lock(off, value);
        Ok(())
    }

    fn locks_page_mut(&mut self, page_offset: usize) -> Locks<&mut [u8]> {
        let off = self.plock_offset() + page_offset;
        Locks::new(self.block.bytes_mut(off, PAGE_SIZE))
    }

    /// Overwrite this step with the contents of another
    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &Step<C, T>) {
        for (kind, _) in T::MASKS {
            self.set_shared_flag(*kind, other.flag(*kind).unwrap_or(false));
        }
        let (src, dst) = (other.cond_offset(), self.cond_offset());
        self.block.write(dst, other.block.bytes(src, 2));
        let (src, dst) = (other.plock_offset(), self.plock_offset());
        self.block.write(dst, other.block.bytes(src, PLOCK_SIZE));
    }
}

impl<T: TrackKind> Step<Vec<u8>, T> {
    /// Fresh standalone step: no trigs, no condition, nothing locked
    pub fn new() -> Self {
        let mut block = Block::filled(STEP_SIZE, 0);
        block.fill(STANDALONE_PLOCK, PLOCK_SIZE, SENTINEL);
        Self {
            block,
            layout: StepLayout::Standalone,
            kind: PhantomData,
        }
    }

    /// Parse a standalone step from a copy of `data`
    pub fn read(data: &[u8]) -> Result<Self> {
        Step::from_bytes(data.to_vec())
    }

    /// Serialize the standalone record
    pub fn to_bytes(&self) -> Vec<u8> {
        self.block.as_bytes().to_vec()
    }
}

impl<T: TrackKind> Default for Step<Vec<u8>, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TrackKind> PartialEq for Step<Vec<u8>, T> {
    fn eq(&self, other: &Self) -> bool {
        self.block == other.block
    }
}

fn unsupported<T: TrackKind>(kind: TrigKind) -> OctaError {
    OctaError::UnsupportedParameter {
        family: T::NAME,
        name: format!("{kind:?}").to_lowercase(),
    }
}

// =============================================================================
// Audio steps
// =============================================================================

impl<B: AsRef<[u8]>> Step<B, Audio> {
    pub fn oneshot(&self) -> bool {
        self.flag(TrigKind::Oneshot).unwrap_or(false)
    }

    pub fn slide(&self) -> bool {
        self.flag(TrigKind::Slide).unwrap_or(false)
    }

    /// AMP volume lock
    pub fn volume(&self) -> Option<u8> {
        self.lock(Param::VOLUME)
    }

    /// Playback pitch lock (sampler and pickup machines)
    pub fn pitch(&self) -> Option<u8> {
        self.lock(Param::PITCH)
    }

    /// Flex sample lock as a 1-based slot; 129-136 are recorder buffers 1-8
    pub fn sample_lock(&self) -> Option<u8> {
        self.lock_at(plock::FLEX_SLOT).map(|v| v + 1)
    }

    /// Static sample lock as a 1-based slot
    pub fn static_sample_lock(&self) -> Option<u8> {
        self.lock_at(plock::STATIC_SLOT).map(|v| v + 1)
    }

    /// Playback locks interpreted for `machine`
    pub fn playback_locks(&self, machine: MachineType) -> MachineView<Locks<&[u8]>> {
        MachineView::new(machine, self.locks_page(plock::PLAYBACK))
    }

    pub fn lfo_locks(&self) -> Lfo<Locks<&[u8]>> {
        Lfo::new(self.locks_page(plock::LFO))
    }

    pub fn amp_locks(&self) -> Amp<Locks<&[u8]>> {
        Amp::new(self.locks_page(plock::AMP))
    }

    /// Effect locks interpreted for `fx_type`, the type the Part has in `slot`
    pub fn fx_locks(&self, slot: FxSlot, fx_type: FxType) -> FxView<Locks<&[u8]>> {
        FxView::new(fx_type, self.locks_page(fx_page_offset(slot)))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Step<B, Audio> {
    pub fn set_oneshot(&mut self, on: bool) {
        self.set_shared_flag(TrigKind::Oneshot, on);
    }

    pub fn set_slide(&mut self, on: bool) {
        self.set_shared_flag(TrigKind::Slide, on);
    }

    /// Lock or release one parameter
    pub fn set_lock(&mut self, param: Param, value: Option<u8>) -> Result<()> {
        self.set_lock_at(param.lock_offset(), value)
    }

    pub fn set_volume(&mut self, value: Option<u8>) -> Result<()> {
        self.set_lock(Param::VOLUME, value)
    }

    pub fn set_pitch(&mut self, value: Option<u8>) -> Result<()> {
        self.set_lock(Param::PITCH, value)
    }

    /// Lock the flex sample to slot 1-128 or recorder buffer slot 129-136
    pub fn set_sample_lock(&mut self, slot: Option<u8>) -> Result<()> {
        self.set_slot_lock(plock::FLEX_SLOT, slot, crate::FLEX_SLOTS)
    }

    /// Lock the static sample to slot 1-128
    pub fn set_static_sample_lock(&mut self, slot: Option<u8>) -> Result<()> {
        self.set_slot_lock(plock::STATIC_SLOT, slot, crate::SAMPLE_SLOTS)
    }

    fn set_slot_lock(&mut self, index: usize, slot: Option<u8>, max: usize) -> Result<()> {
        if let Some(s) = slot {
            check_range("sample lock", s.into(), 1, max as i32)?;
        }
        let off = self.plock_offset() + index;
        self.block.set_lock(off, slot.map(|s| s - 1));
        Ok(())
    }

    pub fn playback_locks_mut(&mut self, machine: MachineType) -> MachineView<Locks<&mut [u8]>> {
        MachineView::new(machine, self.locks_page_mut(plock::PLAYBACK))
    }

    pub fn lfo_locks_mut(&mut self) -> Lfo<Locks<&mut [u8]>> {
        Lfo::new(self.locks_page_mut(plock::LFO))
    }

    pub fn amp_locks_mut(&mut self) -> Amp<Locks<&mut [u8]>> {
        Amp::new(self.locks_page_mut(plock::AMP))
    }

    pub fn fx_locks_mut(&mut self, slot: FxSlot, fx_type: FxType) -> FxView<Locks<&mut [u8]>> {
        FxView::new(fx_type, self.locks_page_mut(fx_page_offset(slot)))
    }
}

impl<B: AsRef<[u8]>> Lockable for Step<B, Audio> {
    fn lock(&self, param: Param) -> Option<u8> {
        self.lock_at(param.lock_offset())
    }
}

fn fx_page_offset(slot: FxSlot) -> usize {
    match slot {
        FxSlot::Fx1 => Page::Fx1.lock_offset(),
        FxSlot::Fx2 => Page::Fx2.lock_offset(),
    }
}

/// Field values for building a standalone audio step in one go
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioStepConfig {
    pub trigger: bool,
    pub trigless: bool,
    pub oneshot: bool,
    pub swing: bool,
    pub slide: bool,
    pub condition: TrigCondition,
    pub micro_timing: i8,
    pub repeats: u8,
    pub volume: Option<u8>,
    pub pitch: Option<u8>,
    pub sample_lock: Option<u8>,
}

impl Step<Vec<u8>, Audio> {
    /// Build a standalone step, validating every field
    pub fn from_config(config: &AudioStepConfig) -> Result<Self> {
        let mut step = Self::new();
        step.set_trigger(config.trigger);
        step.set_trigless(config.trigless);
        step.set_oneshot(config.oneshot);
        step.set_swing(config.swing);
        step.set_slide(config.slide);
        step.set_condition(config.condition)?;
        step.set_micro_timing(config.micro_timing)?;
        step.set_repeats(config.repeats)?;
        step.set_volume(config.volume)?;
        step.set_pitch(config.pitch)?;
        step.set_sample_lock(config.sample_lock)?;
        Ok(step)
    }
}

// =============================================================================
// MIDI steps
// =============================================================================

impl<B: AsRef<[u8]>> Step<B, Midi> {
    pub fn note(&self) -> Option<u8> {
        self.lock_at(midi_plock::NOTE)
    }

    pub fn velocity(&self) -> Option<u8> {
        self.lock_at(midi_plock::VELOCITY)
    }

    /// Note length lock; `Err` when the locked byte is not a table value
    pub fn length(&self) -> Result<Option<NoteLength>> {
        self.lock_at(midi_plock::LENGTH)
            .map(NoteLength::from_u8)
            .transpose()
    }

    /// Chord note offset `n` (2-4)
    pub fn chord_note(&self, n: u8) -> Result<Option<u8>> {
        check_range("chord note", n.into(), 2, 4)?;
        Ok(self.lock_at(midi_plock::NOTE2 + usize::from(n - 2)))
    }

    pub fn pitch_bend(&self) -> Option<u8> {
        self.lock_at(midi_plock::PITCH_BEND)
    }

    pub fn aftertouch(&self) -> Option<u8> {
        self.lock_at(midi_plock::AFTERTOUCH)
    }

    /// Controller value lock `n` (1-10)
    pub fn cc(&self, n: u8) -> Result<Option<u8>> {
        Ok(self.lock_at(cc_index(n)?))
    }

    pub fn lfo_locks(&self) -> Lfo<Locks<&[u8]>> {
        Lfo::new(self.locks_page(midi_plock::LFO))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Step<B, Midi> {
    pub fn set_note(&mut self, note: Option<u8>) -> Result<()> {
        self.set_lock_at(midi_plock::NOTE, note)
    }

    pub fn set_velocity(&mut self, velocity: Option<u8>) -> Result<()> {
        self.set_lock_at(midi_plock::VELOCITY, velocity)
    }

    pub fn set_length(&mut self, length: Option<NoteLength>) -> Result<()> {
        let off = self.plock_offset() + midi_plock::LENGTH;
        self.block.set_lock(off, length.map(NoteLength::as_u8));
        Ok(())
    }

    pub fn set_chord_note(&mut self, n: u8, offset: Option<u8>) -> Result<()> {
        check_range("chord note", n.into(), 2, 4)?;
        self.set_lock_at(midi_plock::NOTE2 + usize::from(n - 2), offset)
    }

    pub fn set_pitch_bend(&mut self, value: Option<u8>) -> Result<()> {
        self.set_lock_at(midi_plock::PITCH_BEND, value)
    }

    pub fn set_aftertouch(&mut self, value: Option<u8>) -> Result<()> {
        self.set_lock_at(midi_plock::AFTERTOUCH, value)
    }

    pub fn set_cc(&mut self, n: u8, value: Option<u8>) -> Result<()> {
        let index = cc_index(n)?;
        self.set_lock_at(index, value)
    }

    pub fn lfo_locks_mut(&mut self) -> Lfo<Locks<&mut [u8]>> {
        Lfo::new(self.locks_page_mut(midi_plock::LFO))
    }
}

/// Lock index of controller `n` (1-10)
pub(crate) fn cc_index(n: u8) -> Result<usize> {
    check_range("cc", n.into(), 1, 10)?;
    Ok(if n <= 4 {
        midi_plock::CC1 + usize::from(n - 1)
    } else {
        midi_plock::CC5 + usize::from(n - 5)
    })
}
