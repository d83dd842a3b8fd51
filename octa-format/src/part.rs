//! Part records
//!
//! A Part holds the sound design shared by every pattern that points at it: eight audio
//! track configurations, eight MIDI track configurations and sixteen scenes.

use crate::block::{Block, SENTINEL};
use crate::enums::{FxSlot, FxType, MachineType, TrackLayout};
use crate::error::{check_scene, check_track, OctaError, Result};
use crate::layout::part;
use crate::part_track::{AudioPartTrack, MidiPartTrack};
use crate::scene::{Scene, SceneTrack, TrackBinding};
use crate::{
    PARTS_PER_BANK, PART_SIZE, SCENES_PER_PART, SCENE_SIZE, SCENE_TRACK_SIZE, TRACKS_PER_PATTERN,
};

/// Factory scene assignment of the crossfader's A side (1-based)
pub const DEFAULT_SCENE_A: u8 = 1;

/// Factory scene assignment of the crossfader's B side (1-based)
pub const DEFAULT_SCENE_B: u8 = 9;

/// Write a factory-fresh Part record into `buf`
pub(crate) fn init_record(buf: &mut [u8], part_idx: usize) {
    buf.fill(0);
    buf[..4].copy_from_slice(part::MAGIC);
    buf[part::PART_ID] = part_idx as u8;
    buf[part::ACTIVE_SCENE_A] = DEFAULT_SCENE_A - 1;
    buf[part::ACTIVE_SCENE_B] = DEFAULT_SCENE_B - 1;
    buf[part::SCENES..part::RESERVED_TAIL].fill(SENTINEL);
    for t in 0..TRACKS_PER_PATTERN {
        AudioPartTrack::in_part(Block::new(&mut *buf), t).reset();
        MidiPartTrack::in_part(Block::new(&mut *buf), t).reset();
    }
}

/// One of a bank's four Parts
#[derive(Debug)]
pub struct Part<B> {
    block: Block<B>,
}

impl<B: AsRef<[u8]>> Part<B> {
    pub(crate) fn from_block(block: Block<B>) -> Self {
        Self { block }
    }

    /// Parse a standalone Part record, checking size and tag
    pub fn from_bytes(buf: B) -> Result<Self> {
        let block = Block::with_len(buf, "part", PART_SIZE)?;
        if block.bytes(0, 4) != part::MAGIC {
            return Err(OctaError::MalformedBank("part tag mismatch".to_string()));
        }
        Ok(Self { block })
    }

    /// 1-based Part number
    pub fn part_id(&self) -> u8 {
        self.block.u8(part::PART_ID).saturating_add(1)
    }

    /// Audio track `n` (1-8)
    pub fn audio_track(&self, n: u8) -> Result<AudioPartTrack<&[u8]>> {
        let idx = check_track(n)?;
        Ok(AudioPartTrack::in_part(Block::new(self.block.as_bytes()), idx))
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = AudioPartTrack<&[u8]>> + '_ {
        (0..TRACKS_PER_PATTERN)
            .map(move |idx| AudioPartTrack::in_part(Block::new(self.block.as_bytes()), idx))
    }

    /// Audio track behind logical track `n` of `layout`
    pub fn layout_track(&self, layout: TrackLayout, n: u8) -> Result<AudioPartTrack<&[u8]>> {
        self.audio_track(layout.physical(n)?)
    }

    /// The logical tracks of `layout`, in order
    pub fn layout_tracks(
        &self,
        layout: TrackLayout,
    ) -> impl Iterator<Item = AudioPartTrack<&[u8]>> + '_ {
        (1..=layout.track_count()).filter_map(move |n| self.layout_track(layout, n).ok())
    }

    /// Neighbor track following logical track `n`; `None` unless `layout` has neighbors
    pub fn neighbor_track(
        &self,
        layout: TrackLayout,
        n: u8,
    ) -> Result<Option<AudioPartTrack<&[u8]>>> {
        layout
            .neighbor(n)?
            .map(|physical| self.audio_track(physical))
            .transpose()
    }

    /// FX3 (`Fx1`) or FX4 (`Fx2`) type of logical track `n`, held by its Neighbor track
    pub fn extra_fx_type(&self, layout: TrackLayout, n: u8, slot: FxSlot) -> Result<FxType> {
        let physical = neighbor_of(layout, n)?;
        self.audio_track(physical)?.fx_type(slot)
    }

    /// MIDI track `n` (1-8)
    pub fn midi_track(&self, n: u8) -> Result<MidiPartTrack<&[u8]>> {
        let idx = check_track(n)?;
        Ok(MidiPartTrack::in_part(Block::new(self.block.as_bytes()), idx))
    }

    /// Scene `n` (1-16), bound to the current machine and effect types
    pub fn scene(&self, n: u8) -> Result<Scene<&[u8]>> {
        let idx = check_scene(n)?;
        Ok(Scene::from_block(
            self.block.sub(scene_offset(idx), SCENE_SIZE),
            self.bindings(),
        ))
    }

    pub fn scenes(&self) -> impl Iterator<Item = Scene<&[u8]>> + '_ {
        let bindings = self.bindings();
        (0..SCENES_PER_PART)
            .map(move |idx| Scene::from_block(self.block.sub(scene_offset(idx), SCENE_SIZE), bindings))
    }

    /// Track `track` (1-8) of scene `scene` (1-16)
    pub fn scene_track(&self, scene: u8, track: u8) -> Result<SceneTrack<&[u8]>> {
        check_scene(scene)?;
        let idx = check_track(track)?;
        Ok(SceneTrack::from_block(
            self.block.sub(scene_track_offset(scene, track), SCENE_TRACK_SIZE),
            self.binding(idx),
        ))
    }

    /// Scene on the crossfader's A side (1-16)
    pub fn active_scene_a(&self) -> u8 {
        self.block.u8(part::ACTIVE_SCENE_A).saturating_add(1)
    }

    /// Scene on the crossfader's B side (1-16)
    pub fn active_scene_b(&self) -> u8 {
        self.block.u8(part::ACTIVE_SCENE_B).saturating_add(1)
    }

    /// Machine and effect types of track `idx` (0-based), falling back to factory types
    /// for unknown bytes
    pub(crate) fn binding(&self, idx: usize) -> TrackBinding {
        let fallback = TrackBinding::default();
        TrackBinding {
            machine: MachineType::from_u8(self.block.u8(part::MACHINE_TYPES + idx))
                .unwrap_or(fallback.machine),
            fx1: FxType::from_u8(self.block.u8(part::FX1_TYPES + idx)).unwrap_or(fallback.fx1),
            fx2: FxType::from_u8(self.block.u8(part::FX2_TYPES + idx)).unwrap_or(fallback.fx2),
        }
    }

    fn bindings(&self) -> [TrackBinding; TRACKS_PER_PATTERN] {
        std::array::from_fn(|idx| self.binding(idx))
    }

    /// Raw record bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.block.as_bytes()
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Part<B> {
    pub fn audio_track_mut(&mut self, n: u8) -> Result<AudioPartTrack<&mut [u8]>> {
        let idx = check_track(n)?;
        Ok(AudioPartTrack::in_part(Block::new(self.block.as_bytes_mut()), idx))
    }

    pub fn layout_track_mut(
        &mut self,
        layout: TrackLayout,
        n: u8,
    ) -> Result<AudioPartTrack<&mut [u8]>> {
        self.audio_track_mut(layout.physical(n)?)
    }

    pub fn neighbor_track_mut(
        &mut self,
        layout: TrackLayout,
        n: u8,
    ) -> Result<Option<AudioPartTrack<&mut [u8]>>> {
        match layout.neighbor(n)? {
            Some(physical) => Ok(Some(self.audio_track_mut(physical)?)),
            None => Ok(None),
        }
    }

    pub fn set_extra_fx_type(
        &mut self,
        layout: TrackLayout,
        n: u8,
        slot: FxSlot,
        fx_type: FxType,
    ) -> Result<()> {
        let physical = neighbor_of(layout, n)?;
        self.audio_track_mut(physical)?.set_fx_type(slot, fx_type)
    }

    /// Set every Neighbor track of `layout` to the Neighbor machine
    pub fn apply_layout(&mut self, layout: TrackLayout) -> Result<()> {
        for n in 1..=layout.track_count() {
            if let Some(physical) = layout.neighbor(n)? {
                self.audio_track_mut(physical)?
                    .set_machine_type(MachineType::Neighbor);
            }
        }
        Ok(())
    }

    pub fn midi_track_mut(&mut self, n: u8) -> Result<MidiPartTrack<&mut [u8]>> {
        let idx = check_track(n)?;
        Ok(MidiPartTrack::in_part(Block::new(self.block.as_bytes_mut()), idx))
    }

    pub fn scene_mut(&mut self, n: u8) -> Result<Scene<&mut [u8]>> {
        let idx = check_scene(n)?;
        let bindings = self.bindings();
        Ok(Scene::from_block(
            self.block.sub_mut(scene_offset(idx), SCENE_SIZE),
            bindings,
        ))
    }

    pub fn scene_track_mut(&mut self, scene: u8, track: u8) -> Result<SceneTrack<&mut [u8]>> {
        check_scene(scene)?;
        let idx = check_track(track)?;
        let binding = self.binding(idx);
        Ok(SceneTrack::from_block(
            self.block.sub_mut(scene_track_offset(scene, track), SCENE_TRACK_SIZE),
            binding,
        ))
    }

    pub fn set_active_scene_a(&mut self, scene: u8) -> Result<()> {
        let idx = check_scene(scene)?;
        self.block.set_u8(part::ACTIVE_SCENE_A, idx as u8);
        Ok(())
    }

    pub fn set_active_scene_b(&mut self, scene: u8) -> Result<()> {
        let idx = check_scene(scene)?;
        self.block.set_u8(part::ACTIVE_SCENE_B, idx as u8);
        Ok(())
    }

    /// Overwrite the whole record with another Part's, keeping this Part's id
    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &Part<C>) {
        let id = self.block.u8(part::PART_ID);
        self.block.write(0, other.block.as_bytes());
        self.block.set_u8(part::PART_ID, id);
    }

    /// Restore factory values, keeping this Part's id
    pub fn reset(&mut self) {
        let idx = usize::from(self.block.u8(part::PART_ID));
        init_record(self.block.as_bytes_mut(), idx);
    }
}

impl Part<Vec<u8>> {
    /// Standalone Part `n` (1-4) with factory values
    pub fn new(n: u8) -> Result<Self> {
        if !(1..=PARTS_PER_BANK as u8).contains(&n) {
            return Err(OctaError::InvalidPart(n));
        }
        let mut buf = vec![0u8; PART_SIZE];
        init_record(&mut buf, usize::from(n - 1));
        Ok(Self::from_block(Block::new(buf)))
    }

    /// Parse a standalone Part from a copy of `data`
    pub fn read(data: &[u8]) -> Result<Self> {
        Self::from_bytes(data.to_vec())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.block.as_bytes().to_vec()
    }
}

fn neighbor_of(layout: TrackLayout, n: u8) -> Result<u8> {
    layout
        .neighbor(n)?
        .ok_or(OctaError::NoNeighborTrack(layout))
}

fn scene_offset(idx: usize) -> usize {
    part::SCENES + idx * SCENE_SIZE
}

/// Offset of an already validated (1-based) scene track
fn scene_track_offset(scene: u8, track: u8) -> usize {
    scene_offset(usize::from(scene - 1)) + usize::from(track - 1) * SCENE_TRACK_SIZE
}
