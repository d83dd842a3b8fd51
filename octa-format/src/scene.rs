//! Scenes and scene tracks
//!
//! A scene holds one 32-byte lock block per audio track. Every byte is a lock (255 means
//! the Part value is used). Scenes store no machine or effect types of their own: a scene
//! track reads its playback and FX pages through the types the Part assigns to that track,
//! captured in a [`TrackBinding`] when the view is acquired.

use serde::{Deserialize, Serialize};

use crate::block::{Block, SENTINEL};
use crate::enums::{FxSlot, FxType, MachineType};
use crate::error::{check_range, check_track, Result};
use crate::fx::FxView;
use crate::machine::MachineView;
use crate::page::{Amp, Lfo, Locks, MAX_VALUE, PAGE_SIZE};
use crate::plock::{Lockable, Page, Param};
use crate::{SCENE_SIZE, SCENE_TRACK_SIZE, TRACKS_PER_PATTERN};

/// Machine and effect types a scene track is interpreted through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackBinding {
    pub machine: MachineType,
    pub fx1: FxType,
    pub fx2: FxType,
}

impl TrackBinding {
    pub fn fx(&self, slot: FxSlot) -> FxType {
        match slot {
            FxSlot::Fx1 => self.fx1,
            FxSlot::Fx2 => self.fx2,
        }
    }
}

impl Default for TrackBinding {
    fn default() -> Self {
        Self {
            machine: MachineType::Static,
            fx1: FxSlot::Fx1.default_type(),
            fx2: FxSlot::Fx2.default_type(),
        }
    }
}

/// Lock block of one audio track within a scene
#[derive(Debug)]
pub struct SceneTrack<B> {
    block: Block<B>,
    binding: TrackBinding,
}

impl<B: AsRef<[u8]>> SceneTrack<B> {
    pub(crate) fn from_block(block: Block<B>, binding: TrackBinding) -> Self {
        Self { block, binding }
    }

    /// Parse a standalone 32-byte record, interpreting it through `binding`
    pub fn from_bytes(buf: B, binding: TrackBinding) -> Result<Self> {
        Ok(Self {
            block: Block::with_len(buf, "scene track", SCENE_TRACK_SIZE)?,
            binding,
        })
    }

    /// Types captured when this view was acquired
    pub fn binding(&self) -> TrackBinding {
        self.binding
    }

    /// Playback locks interpreted for the bound machine
    pub fn playback(&self) -> MachineView<Locks<&[u8]>> {
        MachineView::new(self.binding.machine, self.page(Page::Playback))
    }

    pub fn lfo(&self) -> Lfo<Locks<&[u8]>> {
        Lfo::new(self.page(Page::Lfo))
    }

    pub fn amp(&self) -> Amp<Locks<&[u8]>> {
        Amp::new(self.page(Page::Amp))
    }

    /// Effect locks interpreted for the effect bound to `slot`
    pub fn fx(&self, slot: FxSlot) -> FxView<Locks<&[u8]>> {
        FxView::new(self.binding.fx(slot), self.page(fx_page(slot)))
    }

    /// True when nothing is locked
    pub fn is_blank(&self) -> bool {
        Page::ALL
            .iter()
            .all(|&p| self.block.all(p.lock_offset(), PAGE_SIZE, SENTINEL))
    }

    /// Number of locked parameters
    pub fn lock_count(&self) -> usize {
        Page::ALL
            .iter()
            .map(|&p| {
                self.block
                    .bytes(p.lock_offset(), PAGE_SIZE)
                    .iter()
                    .filter(|&&b| b != SENTINEL)
                    .count()
            })
            .sum()
    }

    fn page(&self, page: Page) -> Locks<&[u8]> {
        Locks::new(self.block.bytes(page.lock_offset(), PAGE_SIZE))
    }
}

impl<B: AsRef<[u8]>> Lockable for SceneTrack<B> {
    fn lock(&self, param: Param) -> Option<u8> {
        self.block.lock(param.lock_offset())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> SceneTrack<B> {
    /// Lock or release one parameter
    pub fn set_lock(&mut self, param: Param, value: Option<u8>) -> Result<()> {
        if let Some(v) = value {
            check_range("scene lock", v.into(), 0, MAX_VALUE.into())?;
        }
        self.block.set_lock(param.lock_offset(), value);
        Ok(())
    }

    pub fn playback_mut(&mut self) -> MachineView<Locks<&mut [u8]>> {
        let machine = self.binding.machine;
        MachineView::new(machine, self.page_mut(Page::Playback))
    }

    pub fn lfo_mut(&mut self) -> Lfo<Locks<&mut [u8]>> {
        Lfo::new(self.page_mut(Page::Lfo))
    }

    pub fn amp_mut(&mut self) -> Amp<Locks<&mut [u8]>> {
        Amp::new(self.page_mut(Page::Amp))
    }

    pub fn fx_mut(&mut self, slot: FxSlot) -> FxView<Locks<&mut [u8]>> {
        let fx_type = self.binding.fx(slot);
        FxView::new(fx_type, self.page_mut(fx_page(slot)))
    }

    /// Release every lock, leaving the reserved bytes alone
    pub fn clear(&mut self) {
        for page in Page::ALL {
            self.block.fill(page.lock_offset(), PAGE_SIZE, SENTINEL);
        }
    }

    fn page_mut(&mut self, page: Page) -> Locks<&mut [u8]> {
        Locks::new(self.block.bytes_mut(page.lock_offset(), PAGE_SIZE))
    }
}

impl SceneTrack<Vec<u8>> {
    /// Blank standalone record bound to `binding`
    pub fn new(binding: TrackBinding) -> Self {
        Self {
            block: Block::filled(SCENE_TRACK_SIZE, SENTINEL),
            binding,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.block.as_bytes().to_vec()
    }
}

impl Default for SceneTrack<Vec<u8>> {
    fn default() -> Self {
        Self::new(TrackBinding::default())
    }
}

fn fx_page(slot: FxSlot) -> Page {
    match slot {
        FxSlot::Fx1 => Page::Fx1,
        FxSlot::Fx2 => Page::Fx2,
    }
}

/// One of a Part's 16 scenes
#[derive(Debug)]
pub struct Scene<B> {
    block: Block<B>,
    bindings: [TrackBinding; TRACKS_PER_PATTERN],
}

impl<B: AsRef<[u8]>> Scene<B> {
    pub(crate) fn from_block(block: Block<B>, bindings: [TrackBinding; TRACKS_PER_PATTERN]) -> Self {
        Self { block, bindings }
    }

    /// Parse a standalone 256-byte scene with default bindings
    pub fn from_bytes(buf: B) -> Result<Self> {
        Ok(Self {
            block: Block::with_len(buf, "scene", SCENE_SIZE)?,
            bindings: [TrackBinding::default(); TRACKS_PER_PATTERN],
        })
    }

    /// Lock block of track `n` (1-8)
    pub fn track(&self, n: u8) -> Result<SceneTrack<&[u8]>> {
        let idx = check_track(n)?;
        Ok(SceneTrack::from_block(
            self.block.sub(idx * SCENE_TRACK_SIZE, SCENE_TRACK_SIZE),
            self.bindings[idx],
        ))
    }

    /// All eight tracks in order
    pub fn tracks(&self) -> impl Iterator<Item = SceneTrack<&[u8]>> + '_ {
        (0..TRACKS_PER_PATTERN).map(move |idx| {
            SceneTrack::from_block(
                self.block.sub(idx * SCENE_TRACK_SIZE, SCENE_TRACK_SIZE),
                self.bindings[idx],
            )
        })
    }

    /// True when no track locks anything
    pub fn is_blank(&self) -> bool {
        self.tracks().all(|t| t.is_blank())
    }

    pub fn has_locks(&self) -> bool {
        !self.is_blank()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.block.as_bytes()
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Scene<B> {
    pub fn track_mut(&mut self, n: u8) -> Result<SceneTrack<&mut [u8]>> {
        let idx = check_track(n)?;
        let binding = self.bindings[idx];
        Ok(SceneTrack::from_block(
            self.block.sub_mut(idx * SCENE_TRACK_SIZE, SCENE_TRACK_SIZE),
            binding,
        ))
    }

    /// Release every lock on every track
    pub fn clear_all_locks(&mut self) {
        for idx in 0..TRACKS_PER_PATTERN {
            let binding = self.bindings[idx];
            SceneTrack::from_block(
                self.block.sub_mut(idx * SCENE_TRACK_SIZE, SCENE_TRACK_SIZE),
                binding,
            )
            .clear();
        }
    }

    /// Overwrite this scene's locks with another's
    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &Scene<C>) {
        self.block.write(0, other.block.as_bytes());
    }
}

impl Scene<Vec<u8>> {
    /// Blank standalone scene
    pub fn new() -> Self {
        Self {
            block: Block::filled(SCENE_SIZE, SENTINEL),
            bindings: [TrackBinding::default(); TRACKS_PER_PATTERN],
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.block.as_bytes().to_vec()
    }
}

impl Default for Scene<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plock::{effective_value, BaseValues};
    use crate::OctaError;

    #[test]
    fn test_blank_scene_track() {
        let track = SceneTrack::default();
        assert!(track.is_blank());
        assert_eq!(track.lock(Param::VOLUME), None);
        assert_eq!(track.amp().volume(), None);
        assert_eq!(track.to_bytes(), vec![SENTINEL; SCENE_TRACK_SIZE]);
    }

    #[test]
    fn test_sentinel_symmetry() {
        let mut track = SceneTrack::default();
        track.set_lock(Param::VOLUME, Some(20)).unwrap();
        assert_eq!(track.lock(Param::VOLUME), Some(20));
        assert_eq!(track.lock_count(), 1);
        track.set_lock(Param::VOLUME, None).unwrap();
        assert_eq!(track.to_bytes()[15], SENTINEL);
        assert!(track.set_lock(Param::VOLUME, Some(200)).is_err());
    }

    #[test]
    fn test_fx_follows_binding() {
        let binding = TrackBinding {
            fx2: FxType::SpringReverb,
            ..Default::default()
        };
        let mut track = SceneTrack::new(binding);
        assert!(matches!(track.fx(FxSlot::Fx2), FxView::SpringReverb(_)));
        track.fx_mut(FxSlot::Fx2).set("mix", Some(100)).unwrap();
        assert!(matches!(
            track.fx(FxSlot::Fx2).get("feedback"),
            Err(OctaError::UnsupportedParameter { family: "spring reverb", .. })
        ));
        assert_eq!(track.fx(FxSlot::Fx2).get("mix").unwrap(), Some(100));
    }

    #[test]
    fn test_playback_follows_machine() {
        let binding = TrackBinding {
            machine: MachineType::Pickup,
            ..Default::default()
        };
        let mut track = SceneTrack::new(binding);
        track.playback_mut().set("gain", Some(90)).unwrap();
        assert!(track.playback().get("rate").is_err());
        assert_eq!(track.lock(Param::new(Page::Playback, 4).unwrap()), Some(90));
    }

    #[test]
    fn test_scene_tracks_and_clear() {
        let mut scene = Scene::new();
        assert!(scene.is_blank());
        scene.track_mut(8).unwrap().amp_mut().set_attack(Some(1)).unwrap();
        assert!(scene.has_locks());
        assert_eq!(scene.track(8).unwrap().amp().attack(), Some(1));
        assert!(scene.track(1).unwrap().is_blank());
        assert!(matches!(scene.track(9), Err(OctaError::InvalidTrack(9))));
        scene.clear_all_locks();
        assert!(scene.is_blank());
    }

    #[test]
    fn test_scene_lock_sits_between_step_and_part() {
        struct Part;
        impl BaseValues for Part {
            fn base_value(&self, _: Param) -> u8 {
                10
            }
        }
        let step = SceneTrack::default();
        let mut scene = SceneTrack::default();
        scene.set_lock(Param::VOLUME, Some(20)).unwrap();
        assert_eq!(effective_value(&step, &Part, Some(&scene), Param::VOLUME), 20);
        scene.set_lock(Param::VOLUME, None).unwrap();
        assert_eq!(effective_value(&step, &Part, Some(&scene), Param::VOLUME), 10);
    }
}
