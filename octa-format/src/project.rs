//! Project container
//!
//! A project ties together sixteen banks, the sample slot table, the markers file and the
//! project-wide settings. [`Project::prepare_for_render`] applies the fixes a project needs before the
//! device plays it back as intended.

use crate::bank::Bank;
use crate::config::{ProjectSettings, RenderSettings};
use crate::enums::{MachineType, SlotKind};
use crate::error::{OctaError, Result};
use crate::markers::Markers;
use crate::part::Part;
use crate::slots::{SampleSlot, SlotTable};
use crate::{BANKS_PER_PROJECT, PARTS_PER_BANK, PATTERNS_PER_BANK, SCENES_PER_PART, TRACKS_PER_PATTERN};

/// Track that becomes the master track when enabled
const MASTER_TRACK: u8 = 8;

/// An Octatrack project
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    settings: ProjectSettings,
    render_settings: RenderSettings,
    slots: SlotTable,
    markers: Markers,
    banks: Vec<Bank>,
}

impl Project {
    /// Fresh project with sixteen factory banks
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_uppercase(),
            settings: ProjectSettings::default(),
            render_settings: RenderSettings::default(),
            slots: SlotTable::new(),
            markers: Markers::new(),
            banks: (0..BANKS_PER_PROJECT).map(|_| Bank::new()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ProjectSettings {
        &mut self.settings
    }

    pub fn render_settings(&self) -> &RenderSettings {
        &self.render_settings
    }

    pub fn render_settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.render_settings
    }

    /// Bank `n` (1-16)
    pub fn bank(&self, n: u8) -> Result<&Bank> {
        let idx = check_bank(n)?;
        Ok(&self.banks[idx])
    }

    pub fn bank_mut(&mut self, n: u8) -> Result<&mut Bank> {
        let idx = check_bank(n)?;
        Ok(&mut self.banks[idx])
    }

    /// Replace bank `n` with a decoded one
    pub fn set_bank(&mut self, n: u8, bank: Bank) -> Result<()> {
        let idx = check_bank(n)?;
        self.banks[idx] = bank;
        Ok(())
    }

    pub fn banks(&self) -> impl Iterator<Item = &Bank> {
        self.banks.iter()
    }

    /// Sample markers (`markers.work`)
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn markers_mut(&mut self) -> &mut Markers {
        &mut self.markers
    }

    /// Replace the markers with a decoded file
    pub fn set_markers(&mut self, markers: Markers) {
        self.markers = markers;
    }

    // =========================================================================
    // Sample slots
    // =========================================================================

    /// Assign a sample to a slot, returning the 1-based slot number
    ///
    /// Adding a Flex sample refreshes the flex counter of every bank. A non-zero `frames`
    /// is recorded as the slot's sample length in the markers. A path that is already
    /// assigned returns its slot and leaves the markers alone.
    pub fn add_sample(
        &mut self,
        path: &str,
        kind: SlotKind,
        slot: Option<u8>,
        frames: u32,
    ) -> Result<u8> {
        if let Some(existing) = self.slots.slot(path, kind) {
            return Ok(existing);
        }
        let slot = self.slots.add(path, kind, slot)?;
        if frames > 0 {
            self.markers.set_sample_length(slot, kind, frames)?;
        }
        if kind == SlotKind::Flex {
            self.update_flex_count()?;
        }
        Ok(slot)
    }

    /// Slot already holding `path`
    pub fn sample_slot(&self, path: &str, kind: SlotKind) -> Option<u8> {
        self.slots.slot(path, kind)
    }

    pub fn sample_path(&self, slot: u8, kind: SlotKind) -> Option<&str> {
        self.slots.path(slot, kind)
    }

    pub fn sample_count(&self, kind: SlotKind) -> usize {
        self.slots.count(kind)
    }

    /// All assignments of `kind`, in slot order
    pub fn samples(&self, kind: SlotKind) -> Vec<SampleSlot> {
        self.slots.entries(kind)
    }

    fn update_flex_count(&mut self) -> Result<()> {
        let count = self.slots.count(SlotKind::Flex) as u8;
        for bank in &mut self.banks {
            bank.set_flex_count(count)?;
        }
        Ok(())
    }

    // =========================================================================
    // Render preparation
    // =========================================================================

    /// Apply the enabled [`RenderSettings`] fixes to every bank
    pub fn prepare_for_render(&mut self) -> Result<()> {
        let render = self.render_settings;
        let master = self.settings.master_track && render.auto_master_trig;

        for (i, bank) in self.banks.iter_mut().enumerate() {
            if master {
                add_master_trigs(bank)?;
            }
            if render.auto_thru_trig {
                add_thru_trigs(bank)?;
            }
            if render.propagate_scenes
                || render.propagate_src
                || render.propagate_amp
                || render.propagate_fx
                || render.propagate_recorder
            {
                propagate_part_one(bank, &render)?;
            }
            log::debug!("Prepared bank {} for render", i + 1);
        }

        log::info!(
            "Prepared project '{}' for render (master trig: {}, thru trig: {})",
            self.name,
            master,
            render.auto_thru_trig
        );
        Ok(())
    }
}

fn check_bank(n: u8) -> Result<usize> {
    if !(1..=BANKS_PER_PROJECT as u8).contains(&n) {
        return Err(OctaError::InvalidBank(n));
    }
    Ok(usize::from(n - 1))
}

/// Trig step 1 of the master track in every pattern where tracks 1-7 play
fn add_master_trigs(bank: &mut Bank) -> Result<()> {
    for n in 1..=PATTERNS_PER_BANK as u8 {
        let mut pattern = bank.pattern_mut(n)?;
        let feeds_master = pattern
            .audio_tracks()
            .take(usize::from(MASTER_TRACK) - 1)
            .any(|t| !t.active_steps().is_empty());
        if feeds_master {
            pattern
                .audio_track_mut(MASTER_TRACK)?
                .step_mut(1)?
                .set_trigger(true);
        }
    }
    Ok(())
}

/// Trig step 1 of Thru tracks in every pattern with audio activity
fn add_thru_trigs(bank: &mut Bank) -> Result<()> {
    for n in 1..=PATTERNS_PER_BANK as u8 {
        let pattern = bank.pattern(n)?;
        if !pattern.has_audio_activity() {
            continue;
        }
        let part = bank.part(pattern.part_assignment())?;
        let thru: Vec<u8> = part
            .audio_tracks()
            .filter(|t| matches!(t.machine_type(), Ok(MachineType::Thru)))
            .map(|t| t.number())
            .collect();

        let mut pattern = bank.pattern_mut(n)?;
        for track in thru {
            pattern.audio_track_mut(track)?.step_mut(1)?.set_trigger(true);
        }
    }
    Ok(())
}

/// Copy Part 1 settings into Parts 2-4 wherever the target is untouched
fn propagate_part_one(bank: &mut Bank, render: &RenderSettings) -> Result<()> {
    let source = Part::read(bank.part(1)?.as_bytes())?;

    for target in 2..=PARTS_PER_BANK as u8 {
        let mut part = bank.part_mut(target)?;

        if render.propagate_scenes {
            for s in 1..=SCENES_PER_PART as u8 {
                let scene = source.scene(s)?;
                if scene.is_blank() {
                    continue;
                }
                let mut dest = part.scene_mut(s)?;
                if dest.is_blank() {
                    dest.copy_from(&scene);
                }
            }
        }

        for t in 1..=TRACKS_PER_PATTERN as u8 {
            let from = source.audio_track(t)?;
            let mut to = part.audio_track_mut(t)?;
            if render.propagate_src && to.src_is_default() {
                to.copy_src_from(&from);
            }
            if render.propagate_amp && to.amp_is_default() {
                to.copy_amp_from(&from);
            }
            if render.propagate_fx && to.fx_is_default() {
                to.copy_fx_from(&from);
            }
            if render.propagate_recorder && to.recorder().is_default() {
                to.copy_recorder_from(&from);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{FxSlot, FxType};

    #[test]
    fn test_new_project() {
        let project = Project::new("demo");
        assert_eq!(project.name(), "DEMO");
        assert_eq!(project.banks().count(), 16);
        assert!(project.bank(16).is_ok());
        assert!(matches!(project.bank(0), Err(OctaError::InvalidBank(0))));
        assert!(matches!(project.bank(17), Err(OctaError::InvalidBank(17))));
    }

    #[test]
    fn test_flex_samples_update_bank_counters() {
        let mut project = Project::new("demo");
        assert_eq!(project.add_sample("kick.wav", SlotKind::Flex, None, 0).unwrap(), 1);
        assert_eq!(project.add_sample("snare.wav", SlotKind::Flex, None, 0).unwrap(), 2);
        assert_eq!(project.add_sample("pad.wav", SlotKind::Static, None, 0).unwrap(), 1);
        for bank in project.banks() {
            assert_eq!(bank.flex_count(), 2);
        }
        assert_eq!(project.sample_slot("snare.wav", SlotKind::Flex), Some(2));
        assert_eq!(project.sample_count(SlotKind::Static), 1);
    }

    #[test]
    fn test_sample_length_lands_in_markers() {
        let mut project = Project::new("demo");
        project.add_sample("loop.wav", SlotKind::Flex, Some(12), 88200).unwrap();
        project.add_sample("hit.wav", SlotKind::Static, None, 4410).unwrap();
        project.add_sample("silent.wav", SlotKind::Static, None, 0).unwrap();
        let markers = project.markers();
        assert_eq!(markers.sample_length(12, SlotKind::Flex).unwrap(), 88200);
        assert_eq!(markers.sample_length(1, SlotKind::Static).unwrap(), 4410);
        assert_eq!(markers.sample_length(2, SlotKind::Static).unwrap(), 0);
        assert_eq!(markers.sample_length(1, SlotKind::Flex).unwrap(), 0);

        // Re-adding a known path keeps the recorded length
        assert_eq!(project.add_sample("loop.wav", SlotKind::Flex, None, 1).unwrap(), 12);
        assert_eq!(project.markers().sample_length(12, SlotKind::Flex).unwrap(), 88200);
    }

    #[test]
    fn test_master_trig_requires_master_track() {
        let mut project = Project::new("demo");
        project
            .bank_mut(1)
            .unwrap()
            .pattern_mut(1)
            .unwrap()
            .audio_track_mut(2)
            .unwrap()
            .set_active_steps(&[5])
            .unwrap();

        project.prepare_for_render().unwrap();
        let bank = project.bank(1).unwrap();
        assert!(bank.pattern(1).unwrap().audio_track(8).unwrap().active_steps().is_empty());

        project.settings_mut().master_track = true;
        project.prepare_for_render().unwrap();
        let bank = project.bank(1).unwrap();
        assert_eq!(bank.pattern(1).unwrap().audio_track(8).unwrap().active_steps(), vec![1]);
        assert!(bank.pattern(2).unwrap().audio_track(8).unwrap().active_steps().is_empty());
    }

    #[test]
    fn test_thru_tracks_get_step_one() {
        let mut project = Project::new("demo");
        let bank = project.bank_mut(3).unwrap();
        bank.part_mut(2)
            .unwrap()
            .audio_track_mut(4)
            .unwrap()
            .set_machine_type(MachineType::Thru);
        {
            let mut pattern = bank.pattern_mut(1).unwrap();
            pattern.set_part_assignment(2).unwrap();
            pattern.audio_track_mut(1).unwrap().set_active_steps(&[9]).unwrap();
        }
        // Silent pattern on the same part stays silent
        bank.pattern_mut(2).unwrap().set_part_assignment(2).unwrap();

        project.prepare_for_render().unwrap();
        let bank = project.bank(3).unwrap();
        assert_eq!(bank.pattern(1).unwrap().audio_track(4).unwrap().active_steps(), vec![1]);
        assert!(bank.pattern(2).unwrap().audio_track(4).unwrap().active_steps().is_empty());
    }

    #[test]
    fn test_propagation_respects_edited_targets() {
        let mut project = Project::new("demo");
        *project.render_settings_mut() = RenderSettings {
            propagate_scenes: true,
            propagate_fx: true,
            ..Default::default()
        };

        let bank = project.bank_mut(1).unwrap();
        {
            let mut part = bank.part_mut(1).unwrap();
            part.audio_track_mut(1)
                .unwrap()
                .set_fx_type(FxSlot::Fx1, FxType::Lofi)
                .unwrap();
            part.scene_track_mut(1, 1)
                .unwrap()
                .amp_mut()
                .set_volume(Some(30))
                .unwrap();
        }
        bank.part_mut(3)
            .unwrap()
            .audio_track_mut(1)
            .unwrap()
            .set_fx_type(FxSlot::Fx1, FxType::Chorus)
            .unwrap();

        project.prepare_for_render().unwrap();
        let bank = project.bank(1).unwrap();
        let fx1 = |p: u8| {
            bank.part(p).unwrap().audio_track(1).unwrap().fx_type(FxSlot::Fx1).unwrap()
        };
        assert_eq!(fx1(2), FxType::Lofi);
        assert_eq!(fx1(3), FxType::Chorus);
        assert_eq!(fx1(4), FxType::Lofi);
        for p in 2..=4 {
            assert!(!bank.part(p).unwrap().scene(1).unwrap().is_blank());
            assert!(bank.part(p).unwrap().scene(2).unwrap().is_blank());
        }
    }
}
