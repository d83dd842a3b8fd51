//! Markers file codec: round trips, checksum upkeep and slot edits through a project.

use octa_format::layout::markers;
use octa_format::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random bytes with a valid header and version
fn noisy_markers_bytes(seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bytes = vec![0u8; MARKERS_FILE_SIZE];
    rng.fill(&mut bytes[..]);
    bytes[..markers::VERSION].copy_from_slice(&MARKERS_HEADER);
    bytes[markers::VERSION] = MARKERS_VERSION;
    bytes
}

#[test]
fn test_unmodified_markers_round_trip_byte_identically() {
    for seed in [5, 6] {
        let bytes = noisy_markers_bytes(seed);
        let decoded = Markers::from_bytes(&bytes).unwrap();
        // Reads over arbitrary data must not write
        for n in 1..=FLEX_SLOTS as u8 {
            let slot = decoded.slot(n, SlotKind::Flex).unwrap();
            let _ = slot.slices();
            let _ = slot.loop_point();
        }
        assert_eq!(decoded.to_bytes(), bytes, "seed {seed}");
    }
}

#[test]
fn test_slot_edit_touches_record_and_checksum_only() {
    let original = Markers::from_bytes(&noisy_markers_bytes(9)).unwrap();
    let mut edited = original.clone();
    {
        let mut slot = edited.slot_mut(3, SlotKind::Static).unwrap();
        slot.set_trim(0, 96_000).unwrap();
        slot.set_slice(1, Slice::new(0, 48_000, Some(24_000)).unwrap())
            .unwrap();
    }

    let slot_start = markers::STATIC_SLOTS_START + 2 * MARKER_SLOT_SIZE;
    let before = original.to_bytes();
    let after = edited.to_bytes();
    for (i, (a, b)) in before.iter().zip(&after).enumerate() {
        let in_slot = (slot_start..slot_start + MARKER_SLOT_SIZE).contains(&i);
        let in_checksum = i >= markers::CHECKSUM;
        if a != b {
            assert!(in_slot || in_checksum, "byte {i} changed");
        }
    }

    let round = Markers::from_bytes(&after).unwrap();
    assert_eq!(round.stored_checksum(), round.checksum());
    let slot = round.slot(3, SlotKind::Static).unwrap();
    assert_eq!(slot.trim_end(), 96_000);
    assert_eq!(
        slot.slice(1).unwrap(),
        Slice::new(0, 48_000, Some(24_000)).unwrap()
    );
}

#[test]
fn test_recorder_buffer_slots_are_addressable() {
    let mut file = Markers::new();
    for n in 129..=136 {
        file.set_sample_length(n, SlotKind::Flex, u32::from(n) * 100)
            .unwrap();
    }
    let decoded = Markers::from_bytes(&file.to_bytes()).unwrap();
    assert_eq!(decoded.sample_length(129, SlotKind::Flex).unwrap(), 12_900);
    assert_eq!(decoded.sample_length(136, SlotKind::Flex).unwrap(), 13_600);
    assert!(decoded.sample_length(129, SlotKind::Static).is_err());
}

#[test]
fn test_project_markers_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("markers.work");

    let mut project = Project::new("disk");
    let slot = project
        .add_sample("break.wav", SlotKind::Flex, None, 176_400)
        .unwrap();
    project
        .markers_mut()
        .slot_mut(slot, SlotKind::Flex)
        .unwrap()
        .set_slices(&[
            Slice::from_ms(0, 500, 44_100).unwrap(),
            Slice::from_ms(500, 1000, 44_100).unwrap(),
        ])
        .unwrap();
    project.markers().save(&path).unwrap();

    let loaded = Markers::load(&path).unwrap();
    assert_eq!(loaded.as_bytes(), project.markers().to_bytes().as_slice());
    let slot = loaded.slot(1, SlotKind::Flex).unwrap();
    assert_eq!(slot.sample_length(), 176_400);
    assert_eq!(slot.slice_count(), 2);
    assert_eq!(slot.slice(2).unwrap().start(), 22_050);

    assert!(matches!(
        Markers::load(dir.path().join("missing.work")),
        Err(OctaError::Io(_))
    ));
}
