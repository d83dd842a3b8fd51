//! Part track configuration
//!
//! Inside a Part, one audio track's settings are interleaved with the other seven tracks:
//! effect types live in two 8-byte tables, volumes in a 16-byte table, and so on. An
//! [`AudioPartTrack`] therefore views the whole Part record through a set of per-track
//! offsets. A standalone track packs the same fields into a compact 106-byte record and is
//! viewed through the same type with different offsets.

use crate::block::Block;
use crate::enums::{FxSlot, FxType, LengthMode, LoopMode, MachineType, NoteLength, RecordingSource};
use crate::error::{check_range, check_track, OctaError, Result};
use crate::fx::{self, FxView};
use crate::layout::{midi_plock, midi_setup, part, slots, track_values};
use crate::machine::{self, MachineView, SamplerSetup};
use crate::page::{Amp, Lfo, Values, DEFAULT_AMP, DEFAULT_LFO, MAX_VALUE, PAGE_SIZE};
use crate::plock::{BaseValues, Page, Param};
use crate::recorder::{RecorderSetup, DEFAULT_RECORDER};
use crate::step::cc_index;
use crate::{RECORDER_SETUP_SIZE, SAMPLE_SLOTS};

/// Size of a standalone audio part-track record
pub const AUDIO_PART_TRACK_SIZE: usize = 106;

/// Size of a standalone MIDI part-track record
pub const MIDI_PART_TRACK_SIZE: usize = 68;

/// Factory main and cue volume
pub const DEFAULT_VOLUME: u8 = 108;

const MACHINE_BLOCK: usize = 5 * PAGE_SIZE;
const SLOT_BLOCK: usize = 5;

/// Highest flex slot value; 129-136 address the eight recorder buffers
const MAX_FLEX_SLOT: u8 = crate::FLEX_SLOTS as u8;

/// Where each field of one audio track lives in the backing record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AudioOffsets {
    machine_type: usize,
    fx1: usize,
    fx2: usize,
    volume: usize,
    cue: usize,
    slots: usize,
    machine_values: usize,
    machine_setup: usize,
    track_values: usize,
    recorder: usize,
}

impl AudioOffsets {
    const STANDALONE: Self = Self {
        machine_type: 0,
        fx1: 1,
        fx2: 2,
        volume: 3,
        cue: 4,
        slots: 5,
        machine_values: 10,
        machine_setup: 40,
        track_values: 70,
        recorder: 94,
    };

    fn in_part(t: usize) -> Self {
        Self {
            machine_type: part::MACHINE_TYPES + t,
            fx1: part::FX1_TYPES + t,
            fx2: part::FX2_TYPES + t,
            volume: part::VOLUMES + 2 * t,
            cue: part::VOLUMES + 2 * t + 1,
            slots: part::MACHINE_SLOTS + part::MACHINE_SLOTS_STRIDE * t,
            machine_values: part::MACHINE_VALUES + part::MACHINE_VALUES_STRIDE * t,
            machine_setup: part::MACHINE_SETUP + part::MACHINE_VALUES_STRIDE * t,
            track_values: part::TRACK_VALUES + part::TRACK_VALUES_STRIDE * t,
            recorder: part::RECORDER_SETUP + RECORDER_SETUP_SIZE * t,
        }
    }

    fn fx_type(&self, slot: FxSlot) -> usize {
        match slot {
            FxSlot::Fx1 => self.fx1,
            FxSlot::Fx2 => self.fx2,
        }
    }

    fn fx_page(&self, slot: FxSlot) -> usize {
        self.track_values
            + match slot {
                FxSlot::Fx1 => track_values::FX1,
                FxSlot::Fx2 => track_values::FX2,
            }
    }
}

/// Sound-design configuration of one audio track
#[derive(Debug)]
pub struct AudioPartTrack<B> {
    block: Block<B>,
    at: AudioOffsets,
    track: u8,
}

impl<B: AsRef<[u8]>> AudioPartTrack<B> {
    /// View track `track_idx` (0-based) of a Part record
    pub(crate) fn in_part(block: Block<B>, track_idx: usize) -> Self {
        Self {
            block,
            at: AudioOffsets::in_part(track_idx),
            track: track_idx as u8 + 1,
        }
    }

    /// Parse a standalone record belonging to track `track` (1-8)
    pub fn from_bytes(track: u8, buf: B) -> Result<Self> {
        check_track(track)?;
        Ok(Self {
            block: Block::with_len(buf, "audio part track", AUDIO_PART_TRACK_SIZE)?,
            at: AudioOffsets::STANDALONE,
            track,
        })
    }

    /// 1-based track number
    pub fn number(&self) -> u8 {
        self.track
    }

    pub fn machine_type(&self) -> Result<MachineType> {
        MachineType::from_u8(self.block.u8(self.at.machine_type))
    }

    /// Effect type selected for `slot`
    pub fn fx_type(&self, slot: FxSlot) -> Result<FxType> {
        FxType::from_u8(self.block.u8(self.at.fx_type(slot)))
    }

    /// Typed view of an effect page, bound to the slot's current type
    pub fn fx(&self, slot: FxSlot) -> Result<FxView<Values<&[u8]>>> {
        let fx_type = self.fx_type(slot)?;
        Ok(FxView::new(fx_type, self.values(self.at.fx_page(slot))))
    }

    /// Playback page of the current machine
    pub fn machine(&self) -> Result<MachineView<Values<&[u8]>>> {
        let machine = self.machine_type()?;
        Ok(self.machine_page(machine))
    }

    /// Playback page of any machine; each machine keeps its own values
    pub fn machine_page(&self, machine: MachineType) -> MachineView<Values<&[u8]>> {
        let offset = self.at.machine_values + machine::page_index(machine);
        MachineView::new(machine, self.values(offset))
    }

    /// Setup page of a sampler machine (Static or Flex)
    pub fn sampler_setup(&self, machine: MachineType) -> Result<SamplerSetup<Values<&[u8]>>> {
        let offset = self.setup_offset(machine)?;
        Ok(SamplerSetup::new(self.values(offset)))
    }

    pub fn lfo(&self) -> Lfo<Values<&[u8]>> {
        Lfo::new(self.values(self.at.track_values + track_values::LFO))
    }

    pub fn amp(&self) -> Amp<Values<&[u8]>> {
        Amp::new(self.values(self.at.track_values + track_values::AMP))
    }

    /// Main output volume
    pub fn volume(&self) -> u8 {
        self.block.u8(self.at.volume)
    }

    pub fn cue_volume(&self) -> u8 {
        self.block.u8(self.at.cue)
    }

    /// Static machine sample slot (1-128)
    pub fn static_slot(&self) -> u8 {
        self.block.u8(self.at.slots + slots::STATIC).saturating_add(1)
    }

    /// Flex machine sample slot; 1-128 are samples, 129-136 recorder buffers 1-8
    pub fn flex_slot(&self) -> u8 {
        self.block.u8(self.at.slots + slots::FLEX).saturating_add(1)
    }

    /// Recorder buffer the track records into (1-8)
    pub fn recorder_buffer(&self) -> u8 {
        self.block.u8(self.at.slots + slots::RECORDER).saturating_add(1)
    }

    pub fn recorder(&self) -> RecorderSetup<&[u8]> {
        RecorderSetup::from_block(self.block.sub(self.at.recorder, RECORDER_SETUP_SIZE))
    }

    /// Whether the playback and setup pages of every machine are at factory values
    pub fn src_is_default(&self) -> bool {
        MachineType::ALL.iter().all(|&m| {
            let at = machine::page_index(m);
            self.block.array::<PAGE_SIZE>(self.at.machine_values + at) == machine::default_values(m)
                && self.block.array::<PAGE_SIZE>(self.at.machine_setup + at)
                    == machine::default_setup(m)
        })
    }

    pub fn amp_is_default(&self) -> bool {
        self.amp().into_inner().to_array() == DEFAULT_AMP
    }

    /// Whether both effect types and pages are at factory values
    pub fn fx_is_default(&self) -> bool {
        [FxSlot::Fx1, FxSlot::Fx2].into_iter().all(|slot| {
            let ty = slot.default_type();
            self.block.u8(self.at.fx_type(slot)) == ty.as_u8()
                && self.block.array::<PAGE_SIZE>(self.at.fx_page(slot)) == fx::defaults(ty)
        })
    }

    fn values(&self, offset: usize) -> Values<&[u8]> {
        Values::new(self.block.bytes(offset, PAGE_SIZE))
    }

    fn setup_offset(&self, machine: MachineType) -> Result<usize> {
        if !machine.is_sampler() {
            return Err(OctaError::UnsupportedParameter {
                family: "sampler setup",
                name: format!("{machine:?}").to_lowercase(),
            });
        }
        Ok(self.at.machine_setup + machine::page_index(machine))
    }

    /// Copy the track into a standalone record
    pub fn to_standalone(&self) -> AudioPartTrack<Vec<u8>> {
        let mut out = AudioPartTrack {
            block: Block::filled(AUDIO_PART_TRACK_SIZE, 0),
            at: AudioOffsets::STANDALONE,
            track: self.track,
        };
        out.copy_from(self);
        out
    }
}

impl<B: AsRef<[u8]>> BaseValues for AudioPartTrack<B> {
    fn base_value(&self, param: Param) -> u8 {
        let offset = match param.page() {
            Page::Playback => {
                let machine = self.machine_type().unwrap_or_default();
                self.at.machine_values + machine::page_index(machine)
            }
            Page::Lfo => self.at.track_values + track_values::LFO,
            Page::Amp => self.at.track_values + track_values::AMP,
            Page::Fx1 => self.at.fx_page(FxSlot::Fx1),
            Page::Fx2 => self.at.fx_page(FxSlot::Fx2),
        };
        self.block.u8(offset + param.slot())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> AudioPartTrack<B> {
    pub fn set_machine_type(&mut self, machine: MachineType) {
        self.block.set_u8(self.at.machine_type, machine.as_u8());
    }

    /// Select the effect for `slot` and load that effect's factory parameters
    pub fn set_fx_type(&mut self, slot: FxSlot, fx_type: FxType) -> Result<()> {
        if !fx_type.allowed_in(slot) {
            return Err(OctaError::UnsupportedParameter {
                family: match slot {
                    FxSlot::Fx1 => "fx1",
                    FxSlot::Fx2 => "fx2",
                },
                name: fx_type.name().to_string(),
            });
        }
        self.block.set_u8(self.at.fx_type(slot), fx_type.as_u8());
        let page = self.at.fx_page(slot);
        self.block.write(page, &fx::defaults(fx_type));
        Ok(())
    }

    pub fn fx_mut(&mut self, slot: FxSlot) -> Result<FxView<Values<&mut [u8]>>> {
        let fx_type = self.fx_type(slot)?;
        let offset = self.at.fx_page(slot);
        Ok(FxView::new(fx_type, self.values_mut(offset)))
    }

    pub fn machine_mut(&mut self) -> Result<MachineView<Values<&mut [u8]>>> {
        let machine = self.machine_type()?;
        Ok(self.machine_page_mut(machine))
    }

    pub fn machine_page_mut(&mut self, machine: MachineType) -> MachineView<Values<&mut [u8]>> {
        let offset = self.at.machine_values + machine::page_index(machine);
        MachineView::new(machine, self.values_mut(offset))
    }

    pub fn sampler_setup_mut(
        &mut self,
        machine: MachineType,
    ) -> Result<SamplerSetup<Values<&mut [u8]>>> {
        let offset = self.setup_offset(machine)?;
        Ok(SamplerSetup::new(self.values_mut(offset)))
    }

    pub fn lfo_mut(&mut self) -> Lfo<Values<&mut [u8]>> {
        let offset = self.at.track_values + track_values::LFO;
        Lfo::new(self.values_mut(offset))
    }

    pub fn amp_mut(&mut self) -> Amp<Values<&mut [u8]>> {
        let offset = self.at.track_values + track_values::AMP;
        Amp::new(self.values_mut(offset))
    }

    pub fn set_volume(&mut self, volume: u8) -> Result<()> {
        check_range("volume", volume.into(), 0, MAX_VALUE.into())?;
        self.block.set_u8(self.at.volume, volume);
        Ok(())
    }

    pub fn set_cue_volume(&mut self, volume: u8) -> Result<()> {
        check_range("cue volume", volume.into(), 0, MAX_VALUE.into())?;
        self.block.set_u8(self.at.cue, volume);
        Ok(())
    }

    pub fn set_static_slot(&mut self, slot: u8) -> Result<()> {
        check_range("static slot", slot.into(), 1, SAMPLE_SLOTS as i32)?;
        self.block.set_u8(self.at.slots + slots::STATIC, slot - 1);
        Ok(())
    }

    pub fn set_flex_slot(&mut self, slot: u8) -> Result<()> {
        check_range("flex slot", slot.into(), 1, MAX_FLEX_SLOT.into())?;
        self.block.set_u8(self.at.slots + slots::FLEX, slot - 1);
        Ok(())
    }

    pub fn set_recorder_buffer(&mut self, buffer: u8) -> Result<()> {
        let idx = check_track(buffer)?;
        self.block.set_u8(self.at.slots + slots::RECORDER, idx as u8);
        Ok(())
    }

    pub fn recorder_mut(&mut self) -> RecorderSetup<&mut [u8]> {
        RecorderSetup::from_block(self.block.sub_mut(self.at.recorder, RECORDER_SETUP_SIZE))
    }

    /// Flex settings that suit most one-shot samples: full length, length in time, no loop
    pub fn apply_recommended_flex_defaults(&mut self) -> Result<()> {
        if let MachineView::Flex(mut sampler) = self.machine_page_mut(MachineType::Flex) {
            sampler.set_length(MAX_VALUE)?;
        }
        let mut setup = self.sampler_setup_mut(MachineType::Flex)?;
        setup.set_length_mode(LengthMode::Time)?;
        setup.set_loop_mode(LoopMode::Off)
    }

    /// Turn the track into a Flex machine playing its own recorder buffer
    pub fn configure_as_recorder(&mut self, source: RecordingSource) -> Result<()> {
        self.recorder_mut().set_source(source)?;
        let track = self.track;
        self.set_machine_type(MachineType::Flex);
        self.set_recorder_buffer(track)?;
        self.set_flex_slot(SAMPLE_SLOTS as u8 + track)
    }

    /// Restore every field to its factory value
    pub fn reset(&mut self) {
        let at = self.at;
        self.block.set_u8(at.machine_type, MachineType::Static.as_u8());
        self.block.set_u8(at.fx1, FxSlot::Fx1.default_type().as_u8());
        self.block.set_u8(at.fx2, FxSlot::Fx2.default_type().as_u8());
        self.block.set_u8(at.volume, DEFAULT_VOLUME);
        self.block.set_u8(at.cue, DEFAULT_VOLUME);
        self.block.write(at.slots, &[0, 0, 0, 0, self.track - 1]);
        for &m in MachineType::ALL {
            let page = machine::page_index(m);
            self.block.write(at.machine_values + page, &machine::default_values(m));
            self.block.write(at.machine_setup + page, &machine::default_setup(m));
        }
        self.block.write(at.track_values + track_values::LFO, &DEFAULT_LFO);
        self.block.write(at.track_values + track_values::AMP, &DEFAULT_AMP);
        self.block.write(at.fx_page(FxSlot::Fx1), &fx::defaults(FxSlot::Fx1.default_type()));
        self.block.write(at.fx_page(FxSlot::Fx2), &fx::defaults(FxSlot::Fx2.default_type()));
        self.block.write(at.recorder, &DEFAULT_RECORDER);
    }

    /// Overwrite every field from another track
    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &AudioPartTrack<C>) {
        self.copy_src_from(other);
        self.copy_amp_from(other);
        self.copy_fx_from(other);
        self.copy_recorder_from(other);
        self.block.set_u8(self.at.volume, other.volume());
        self.block.set_u8(self.at.cue, other.cue_volume());
        let src = other.block.bytes(other.at.slots, SLOT_BLOCK);
        self.block.write(self.at.slots, src);
        self.block.write(self.at.track_values + track_values::LFO, other.lfo_bytes());
    }

    /// Copy machine type, playback pages, setup pages and sample slots
    pub fn copy_src_from<C: AsRef<[u8]>>(&mut self, other: &AudioPartTrack<C>) {
        self.block.set_u8(self.at.machine_type, other.block.u8(other.at.machine_type));
        let values = other.block.bytes(other.at.machine_values, MACHINE_BLOCK);
        self.block.write(self.at.machine_values, values);
        let setup = other.block.bytes(other.at.machine_setup, MACHINE_BLOCK);
        self.block.write(self.at.machine_setup, setup);
        for index in [slots::STATIC, slots::FLEX] {
            self.block.set_u8(self.at.slots + index, other.block.u8(other.at.slots + index));
        }
    }

    pub fn copy_amp_from<C: AsRef<[u8]>>(&mut self, other: &AudioPartTrack<C>) {
        let amp = other.block.bytes(other.at.track_values + track_values::AMP, PAGE_SIZE);
        self.block.write(self.at.track_values + track_values::AMP, amp);
    }

    /// Copy both effect types and pages
    pub fn copy_fx_from<C: AsRef<[u8]>>(&mut self, other: &AudioPartTrack<C>) {
        for slot in [FxSlot::Fx1, FxSlot::Fx2] {
            self.block.set_u8(self.at.fx_type(slot), other.block.u8(other.at.fx_type(slot)));
            let page = other.block.bytes(other.at.fx_page(slot), PAGE_SIZE);
            self.block.write(self.at.fx_page(slot), page);
        }
    }

    pub fn copy_recorder_from<C: AsRef<[u8]>>(&mut self, other: &AudioPartTrack<C>) {
        let rec = other.block.bytes(other.at.recorder, RECORDER_SETUP_SIZE);
        self.block.write(self.at.recorder, rec);
    }

    fn values_mut(&mut self, offset: usize) -> Values<&mut [u8]> {
        Values::new(self.block.bytes_mut(offset, PAGE_SIZE))
    }
}

impl<B: AsRef<[u8]>> AudioPartTrack<B> {
    fn lfo_bytes(&self) -> &[u8] {
        self.block.bytes(self.at.track_values + track_values::LFO, PAGE_SIZE)
    }
}

impl AudioPartTrack<Vec<u8>> {
    /// Standalone record for track `track` (1-8) with factory values
    pub fn new(track: u8) -> Result<Self> {
        check_track(track)?;
        let mut out = Self {
            block: Block::filled(AUDIO_PART_TRACK_SIZE, 0),
            at: AudioOffsets::STANDALONE,
            track,
        };
        out.reset();
        Ok(out)
    }

    /// Build a standalone record, validating every field
    pub fn from_config(track: u8, config: &AudioPartTrackConfig) -> Result<Self> {
        let mut out = Self::new(track)?;
        out.set_machine_type(config.machine_type);
        out.set_fx_type(FxSlot::Fx1, config.fx1)?;
        out.set_fx_type(FxSlot::Fx2, config.fx2)?;
        out.set_volume(config.volume)?;
        out.set_cue_volume(config.cue_volume)?;
        out.set_static_slot(config.static_slot)?;
        out.set_flex_slot(config.flex_slot)?;
        Ok(out)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.block.as_bytes().to_vec()
    }
}

impl PartialEq for AudioPartTrack<Vec<u8>> {
    fn eq(&self, other: &Self) -> bool {
        self.track == other.track && self.block == other.block
    }
}

/// Field values for building a standalone audio part track in one go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPartTrackConfig {
    pub machine_type: MachineType,
    pub fx1: FxType,
    pub fx2: FxType,
    pub volume: u8,
    pub cue_volume: u8,
    /// 1-128
    pub static_slot: u8,
    /// 1-136
    pub flex_slot: u8,
}

impl Default for AudioPartTrackConfig {
    fn default() -> Self {
        Self {
            machine_type: MachineType::Static,
            fx1: FxSlot::Fx1.default_type(),
            fx2: FxSlot::Fx2.default_type(),
            volume: DEFAULT_VOLUME,
            cue_volume: DEFAULT_VOLUME,
            static_slot: 1,
            flex_slot: 1,
        }
    }
}

// =============================================================================
// MIDI part tracks
// =============================================================================

/// Highest MIDI channel
pub const MIDI_CHANNELS: u8 = 16;

/// Bank or program byte meaning "don't send"
pub const PROGRAM_OFF: u8 = 128;

/// Factory controller numbers for CC1-CC10
pub const DEFAULT_CC_NUMBERS: [u8; 10] = [7, 1, 2, 10, 71, 72, 73, 74, 75, 76];

/// Factory default note (C3)
pub const DEFAULT_NOTE: u8 = 48;

pub const DEFAULT_VELOCITY: u8 = 100;

/// Chord-note value meaning "no offset"
const CHORD_NONE: u8 = 64;

const MIDI_VALUES: usize = 32;
const MIDI_SETUP: usize = 36;

/// MIDI track configuration: default note values plus channel and controller setup
#[derive(Debug)]
pub struct MidiPartTrack<B> {
    block: Block<B>,
    values: usize,
    setup: usize,
    track: u8,
}

impl<B: AsRef<[u8]>> MidiPartTrack<B> {
    pub(crate) fn in_part(block: Block<B>, track_idx: usize) -> Self {
        Self {
            block,
            values: part::MIDI_VALUES + part::MIDI_VALUES_STRIDE * track_idx,
            setup: part::MIDI_SETUP + part::MIDI_SETUP_STRIDE * track_idx,
            track: track_idx as u8 + 1,
        }
    }

    /// Parse a standalone record belonging to MIDI track `track` (1-8)
    pub fn from_bytes(track: u8, buf: B) -> Result<Self> {
        check_track(track)?;
        Ok(Self {
            block: Block::with_len(buf, "midi part track", MIDI_PART_TRACK_SIZE)?,
            values: 0,
            setup: MIDI_VALUES,
            track,
        })
    }

    pub fn number(&self) -> u8 {
        self.track
    }

    /// MIDI channel (1-16)
    pub fn channel(&self) -> u8 {
        self.block.u8(self.setup + midi_setup::CHANNEL).saturating_add(1)
    }

    /// Bank select, `None` when not sent
    pub fn bank(&self) -> Option<u8> {
        self.off_or(midi_setup::BANK)
    }

    /// Program change, `None` when not sent
    pub fn program(&self) -> Option<u8> {
        self.off_or(midi_setup::PROGRAM)
    }

    pub fn note(&self) -> u8 {
        self.block.u8(self.values + midi_plock::NOTE)
    }

    pub fn velocity(&self) -> u8 {
        self.block.u8(self.values + midi_plock::VELOCITY)
    }

    pub fn length(&self) -> Result<NoteLength> {
        NoteLength::from_u8(self.block.u8(self.values + midi_plock::LENGTH))
    }

    /// Chord note offset `n` (2-4); 64 means no offset
    pub fn chord_note(&self, n: u8) -> Result<u8> {
        check_range("chord note", n.into(), 2, 4)?;
        Ok(self.block.u8(self.values + midi_plock::NOTE2 + usize::from(n - 2)))
    }

    pub fn pitch_bend(&self) -> u8 {
        self.block.u8(self.values + midi_plock::PITCH_BEND)
    }

    pub fn aftertouch(&self) -> u8 {
        self.block.u8(self.values + midi_plock::AFTERTOUCH)
    }

    /// Value sent on controller `n` (1-10)
    pub fn cc(&self, n: u8) -> Result<u8> {
        Ok(self.block.u8(self.values + cc_index(n)?))
    }

    /// Controller number assigned to CC slot `n` (1-10)
    pub fn cc_number(&self, n: u8) -> Result<u8> {
        check_range("cc", n.into(), 1, 10)?;
        Ok(self.block.u8(self.setup + midi_setup::CC_NUMBERS + usize::from(n - 1)))
    }

    pub fn lfo(&self) -> Lfo<Values<&[u8]>> {
        Lfo::new(Values::new(self.block.bytes(self.values + midi_plock::LFO, PAGE_SIZE)))
    }

    fn off_or(&self, index: usize) -> Option<u8> {
        match self.block.u8(self.setup + index) {
            PROGRAM_OFF => None,
            v => Some(v),
        }
    }

    /// Copy the track into a standalone record
    pub fn to_standalone(&self) -> MidiPartTrack<Vec<u8>> {
        let mut buf = Vec::with_capacity(MIDI_PART_TRACK_SIZE);
        buf.extend_from_slice(self.block.bytes(self.values, MIDI_VALUES));
        buf.extend_from_slice(self.block.bytes(self.setup, MIDI_SETUP));
        MidiPartTrack {
            block: Block::new(buf),
            values: 0,
            setup: MIDI_VALUES,
            track: self.track,
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> MidiPartTrack<B> {
    pub fn set_channel(&mut self, channel: u8) -> Result<()> {
        check_range("midi channel", channel.into(), 1, MIDI_CHANNELS.into())?;
        self.block.set_u8(self.setup + midi_setup::CHANNEL, channel - 1);
        Ok(())
    }

    pub fn set_bank(&mut self, bank: Option<u8>) -> Result<()> {
        self.set_off_or("bank", midi_setup::BANK, bank)
    }

    pub fn set_program(&mut self, program: Option<u8>) -> Result<()> {
        self.set_off_or("program", midi_setup::PROGRAM, program)
    }

    pub fn set_note(&mut self, note: u8) -> Result<()> {
        self.set_value("note", midi_plock::NOTE, note)
    }

    pub fn set_velocity(&mut self, velocity: u8) -> Result<()> {
        self.set_value("velocity", midi_plock::VELOCITY, velocity)
    }

    pub fn set_length(&mut self, length: NoteLength) {
        self.block.set_u8(self.values + midi_plock::LENGTH, length.as_u8());
    }

    pub fn set_chord_note(&mut self, n: u8, value: u8) -> Result<()> {
        check_range("chord note", n.into(), 2, 4)?;
        self.set_value("chord note", midi_plock::NOTE2 + usize::from(n - 2), value)
    }

    pub fn set_pitch_bend(&mut self, value: u8) -> Result<()> {
        self.set_value("pitch bend", midi_plock::PITCH_BEND, value)
    }

    pub fn set_aftertouch(&mut self, value: u8) -> Result<()> {
        self.set_value("aftertouch", midi_plock::AFTERTOUCH, value)
    }

    pub fn set_cc(&mut self, n: u8, value: u8) -> Result<()> {
        let index = cc_index(n)?;
        self.set_value("cc value", index, value)
    }

    pub fn set_cc_number(&mut self, n: u8, number: u8) -> Result<()> {
        check_range("cc", n.into(), 1, 10)?;
        check_range("cc number", number.into(), 0, MAX_VALUE.into())?;
        let offset = self.setup + midi_setup::CC_NUMBERS + usize::from(n - 1);
        self.block.set_u8(offset, number);
        Ok(())
    }

    pub fn lfo_mut(&mut self) -> Lfo<Values<&mut [u8]>> {
        let offset = self.values + midi_plock::LFO;
        Lfo::new(Values::new(self.block.bytes_mut(offset, PAGE_SIZE)))
    }

    /// Restore every field to its factory value
    pub fn reset(&mut self) {
        let mut values = [0u8; MIDI_VALUES];
        values[midi_plock::NOTE] = DEFAULT_NOTE;
        values[midi_plock::VELOCITY] = DEFAULT_VELOCITY;
        values[midi_plock::LENGTH] = NoteLength::SIXTEENTH.as_u8();
        values[midi_plock::NOTE2..midi_plock::LFO].fill(CHORD_NONE);
        values[midi_plock::LFO..midi_plock::LFO + PAGE_SIZE].copy_from_slice(&DEFAULT_LFO);
        values[midi_plock::PITCH_BEND] = 64;
        self.block.write(self.values, &values);

        let mut setup = [0u8; MIDI_SETUP];
        setup[midi_setup::CHANNEL] = self.track - 1;
        setup[midi_setup::BANK] = PROGRAM_OFF;
        setup[midi_setup::PROGRAM] = PROGRAM_OFF;
        setup[midi_setup::CC_NUMBERS..].copy_from_slice(&DEFAULT_CC_NUMBERS);
        self.block.write(self.setup, &setup);
    }

    fn set_value(&mut self, field: &'static str, index: usize, value: u8) -> Result<()> {
        check_range(field, value.into(), 0, MAX_VALUE.into())?;
        self.block.set_u8(self.values + index, value);
        Ok(())
    }

    fn set_off_or(&mut self, field: &'static str, index: usize, value: Option<u8>) -> Result<()> {
        if let Some(v) = value {
            check_range(field, v.into(), 0, MAX_VALUE.into())?;
        }
        self.block.set_u8(self.setup + index, value.unwrap_or(PROGRAM_OFF));
        Ok(())
    }
}

impl MidiPartTrack<Vec<u8>> {
    /// Standalone record for MIDI track `track` (1-8) with factory values
    pub fn new(track: u8) -> Result<Self> {
        check_track(track)?;
        let mut out = Self {
            block: Block::filled(MIDI_PART_TRACK_SIZE, 0),
            values: 0,
            setup: MIDI_VALUES,
            track,
        };
        out.reset();
        Ok(out)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.block.as_bytes().to_vec()
    }
}
