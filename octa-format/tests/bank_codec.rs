//! Whole-file codec tests: round trips, checksum upkeep and malformed input.

use octa_format::layout::{bank, part, pattern};
use octa_format::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random bytes everywhere, with just enough structure to pass validation
fn noisy_bank_bytes(seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bytes = vec![0u8; BANK_FILE_SIZE];
    rng.fill(&mut bytes[..]);

    bytes[..bank::VERSION].copy_from_slice(&BANK_HEADER);
    bytes[bank::VERSION] = BANK_VERSION;
    for i in 0..PATTERNS_PER_BANK {
        let at = bank::PATTERNS + i * PATTERN_SIZE;
        bytes[at..at + 4].copy_from_slice(pattern::MAGIC);
    }
    for start in [bank::PARTS_UNSAVED, bank::PARTS_SAVED] {
        for i in 0..PARTS_PER_BANK {
            let at = start + i * PART_SIZE;
            bytes[at..at + 4].copy_from_slice(part::MAGIC);
        }
    }
    bytes
}

#[test]
fn test_unmodified_bank_round_trips_byte_identically() {
    for seed in [1, 2, 3] {
        let bytes = noisy_bank_bytes(seed);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(encode(&decoded), bytes, "seed {seed}");
    }
}

#[test]
fn test_re_encoding_is_idempotent() {
    let bytes = noisy_bank_bytes(7);
    let once = encode(&decode(&bytes).unwrap());
    let twice = encode(&decode(&once).unwrap());
    assert_eq!(once, twice);
}

#[test]
fn test_reads_do_not_disturb_bytes() {
    let bytes = noisy_bank_bytes(11);
    let decoded = decode(&bytes).unwrap();
    // Walk every view; none of this may write
    let _ = decoded.summary();
    for pattern in decoded.patterns() {
        for track in pattern.audio_tracks() {
            for step in track.steps() {
                let _ = step.sample_lock();
                let _ = step.condition();
            }
        }
    }
    assert_eq!(encode(&decoded), bytes);
}

#[test]
fn test_random_edits_touch_only_their_bytes() {
    let mut rng = StdRng::seed_from_u64(42);
    let original = Bank::new();
    let mut edited = original.clone();

    let pattern_n = rng.random_range(1..=16u8);
    let track_n = rng.random_range(1..=8u8);
    let step_n = rng.random_range(1..=64u8);
    let volume = rng.random_range(0..=127u8);
    edited
        .pattern_mut(pattern_n)
        .unwrap()
        .audio_track_mut(track_n)
        .unwrap()
        .step_mut(step_n)
        .unwrap()
        .set_volume(Some(volume))
        .unwrap();

    let before = original.as_bytes();
    let after = edited.as_bytes();
    let changed: Vec<usize> = (0..BANK_FILE_SIZE).filter(|&i| before[i] != after[i]).collect();
    assert_eq!(changed.len(), 1);

    let round = decode(&encode(&edited)).unwrap();
    let step_volume = round
        .pattern(pattern_n)
        .unwrap()
        .audio_track(track_n)
        .unwrap()
        .step(step_n)
        .unwrap()
        .volume();
    assert_eq!(step_volume, Some(volume));
}

#[test]
fn test_checksum_follows_edits() {
    let mut bank = Bank::new();
    bank.set_part_name(2, "BASS").unwrap();
    let bytes = encode(&bank);
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.stored_checksum(), decoded.checksum());
    assert_eq!(decoded.part_name(2).unwrap(), "BASS");
}

#[test]
fn test_malformed_input_is_rejected() {
    let good = encode(&Bank::new());

    let short = &good[..good.len() - 1];
    assert!(matches!(decode(short), Err(OctaError::MalformedBank(_))));

    let mut long = good.clone();
    long.push(0);
    assert!(matches!(decode(&long), Err(OctaError::MalformedBank(_))));

    let mut bad_header = good.clone();
    bad_header[8] = b'X';
    assert!(matches!(decode(&bad_header), Err(OctaError::MalformedBank(_))));

    let mut bad_part = good.clone();
    bad_part[bank::PARTS_UNSAVED + 3 * PART_SIZE + 1] = b'?';
    assert!(matches!(decode(&bad_part), Err(OctaError::MalformedBank(_))));
}

#[test]
fn test_save_and_load_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank01.work");

    let mut bank = Bank::new();
    bank.pattern_mut(5)
        .unwrap()
        .audio_track_mut(2)
        .unwrap()
        .set_active_steps(&[1, 9, 17, 25])
        .unwrap();
    bank.save(&path).unwrap();

    let loaded = Bank::load(&path).unwrap();
    assert_eq!(loaded.as_bytes(), bank.as_bytes());
    assert_eq!(
        loaded.pattern(5).unwrap().audio_track(2).unwrap().active_steps(),
        vec![1, 9, 17, 25]
    );

    let missing = Bank::load(dir.path().join("nope.work"));
    assert!(matches!(missing, Err(OctaError::Io(_))));
}

#[test]
fn test_codec_options_from_toml() {
    let options: CodecOptions = toml::from_str(
        r#"
        update_checksum = false
        check_version = false
        "#,
    )
    .unwrap();

    let mut bytes = encode(&Bank::new());
    bytes[bank::VERSION] = 24;
    let mut decoded = Bank::from_bytes_with(&bytes, options).unwrap();
    decoded.set_flex_count(3).unwrap();
    let out = decoded.to_bytes_with(options);
    assert_eq!(out[bank::CHECKSUM..], bytes[bank::CHECKSUM..]);
    assert_eq!(out[bank::FLEX_COUNTER], 3);
}
