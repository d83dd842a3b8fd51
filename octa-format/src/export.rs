//! Serializable summaries
//!
//! Plain serde trees describing what a bank contains. They are read-only snapshots for
//! inspection and diffing; nothing decodes them back into a bank.

use serde::Serialize;

use crate::bank::Bank;
use crate::enums::{FxSlot, FxType, MachineType, PatternScale};
use crate::part::Part;
use crate::pattern::Pattern;
use crate::pattern_track::{PatternTrack, TrackKind};
use crate::{PARTS_PER_BANK, SCENES_PER_PART};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankSummary {
    pub version: u8,
    pub flex_count: u8,
    pub checksum: u16,
    pub part_names: Vec<String>,
    pub patterns: Vec<PatternSummary>,
    pub parts: Vec<PartSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternSummary {
    pub part: u8,
    pub length: u8,
    pub scale: Option<PatternScale>,
    /// Only tracks with trigs or locks are listed
    pub audio_tracks: Vec<TrackSummary>,
    pub midi_tracks: Vec<TrackSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub track: u8,
    pub length: u8,
    pub active_steps: Vec<u8>,
    pub trigless_steps: Vec<u8>,
    /// Steps carrying at least one parameter lock
    pub locked_steps: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartSummary {
    pub part: u8,
    pub active_scene_a: u8,
    pub active_scene_b: u8,
    pub audio_tracks: Vec<AudioTrackSummary>,
    pub midi_channels: Vec<u8>,
    /// Scenes (1-16) that lock at least one parameter
    pub scenes_in_use: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioTrackSummary {
    pub track: u8,
    pub machine: Option<MachineType>,
    pub fx1: Option<FxType>,
    pub fx2: Option<FxType>,
    pub volume: u8,
    pub static_slot: u8,
    pub flex_slot: u8,
}

impl Bank {
    pub fn summary(&self) -> BankSummary {
        BankSummary {
            version: self.as_bytes()[crate::layout::bank::VERSION],
            flex_count: self.flex_count(),
            checksum: self.stored_checksum(),
            part_names: (1..=PARTS_PER_BANK as u8)
                .filter_map(|n| self.part_name(n).ok())
                .collect(),
            patterns: self.patterns().map(|p| p.summary()).collect(),
            parts: self.parts().map(|p| p.summary()).collect(),
        }
    }
}

impl<B: AsRef<[u8]>> Pattern<B> {
    pub fn summary(&self) -> PatternSummary {
        PatternSummary {
            part: self.part_assignment(),
            length: self.master_length(),
            scale: self.master_scale().ok(),
            audio_tracks: self
                .audio_tracks()
                .filter(|t| !t.is_empty())
                .map(|t| track_summary(&t))
                .collect(),
            midi_tracks: self
                .midi_tracks()
                .filter(|t| !t.is_empty())
                .map(|t| track_summary(&t))
                .collect(),
        }
    }
}

fn track_summary<B: AsRef<[u8]>, T: TrackKind>(track: &PatternTrack<B, T>) -> TrackSummary {
    TrackSummary {
        track: track.number(),
        length: track.length(),
        active_steps: track.active_steps(),
        trigless_steps: track.trigless_steps(),
        locked_steps: track
            .steps()
            .filter(|s| s.has_locks())
            .filter_map(|s| s.number())
            .collect(),
    }
}

impl<B: AsRef<[u8]>> Part<B> {
    pub fn summary(&self) -> PartSummary {
        PartSummary {
            part: self.part_id(),
            active_scene_a: self.active_scene_a(),
            active_scene_b: self.active_scene_b(),
            audio_tracks: self
                .audio_tracks()
                .map(|t| AudioTrackSummary {
                    track: t.number(),
                    machine: t.machine_type().ok(),
                    fx1: t.fx_type(FxSlot::Fx1).ok(),
                    fx2: t.fx_type(FxSlot::Fx2).ok(),
                    volume: t.volume(),
                    static_slot: t.static_slot(),
                    flex_slot: t.flex_slot(),
                })
                .collect(),
            midi_channels: (1..=crate::TRACKS_PER_PATTERN as u8)
                .filter_map(|n| self.midi_track(n).ok())
                .map(|t| t.channel())
                .collect(),
            scenes_in_use: (1..=SCENES_PER_PART as u8)
                .filter(|&n| self.scene(n).map(|s| s.has_locks()).unwrap_or(false))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_bank_summary() {
        let summary = Bank::new().summary();
        assert_eq!(summary.version, 23);
        assert_eq!(summary.part_names, vec!["ONE", "TWO", "THREE", "FOUR"]);
        assert_eq!(summary.patterns.len(), 16);
        assert!(summary.patterns.iter().all(|p| p.audio_tracks.is_empty()));
        assert_eq!(summary.parts[0].audio_tracks[0].machine, Some(MachineType::Static));
        assert_eq!(summary.parts[0].audio_tracks[0].fx2, Some(FxType::Delay));
        assert!(summary.parts[3].scenes_in_use.is_empty());
    }

    #[test]
    fn test_pattern_summary_lists_active_tracks() {
        let mut pattern = Pattern::new();
        {
            let mut track = pattern.audio_track_mut(3).unwrap();
            track.set_active_steps(&[1, 5]).unwrap();
            track.step_mut(5).unwrap().set_volume(Some(90)).unwrap();
        }
        let summary = pattern.summary();
        assert_eq!(summary.audio_tracks.len(), 1);
        let track = &summary.audio_tracks[0];
        assert_eq!(track.track, 3);
        assert_eq!(track.active_steps, vec![1, 5]);
        assert_eq!(track.locked_steps, vec![5]);
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let json = serde_json::to_value(Bank::new().summary()).unwrap();
        assert_eq!(json["flex_count"], 0);
        assert_eq!(json["parts"][1]["part"], 2);
        assert_eq!(json["parts"][0]["audio_tracks"][0]["fx1"], "Filter");
        assert_eq!(json["patterns"][0]["length"], 16);
    }
}
