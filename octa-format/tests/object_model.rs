//! Object model behaviour observed through a whole bank: lock resolution, view
//! coherence, effect variants and sample slot indexing.

use octa_format::*;

#[test]
fn test_step_then_scene_then_part() {
    let mut bank = Bank::new();
    {
        let mut part = bank.part_mut(1).unwrap();
        part.audio_track_mut(3).unwrap().amp_mut().set_volume(90).unwrap();
        part.scene_track_mut(2, 3)
            .unwrap()
            .set_lock(Param::VOLUME, Some(60))
            .unwrap();
    }
    bank.pattern_mut(1)
        .unwrap()
        .audio_track_mut(3)
        .unwrap()
        .step_mut(4)
        .unwrap()
        .set_volume(Some(20))
        .unwrap();

    let part = bank.part(1).unwrap();
    let base = part.audio_track(3).unwrap();
    let scene = part.scene_track(2, 3).unwrap();
    let quiet_scene = part.scene_track(5, 3).unwrap();
    let pattern = bank.pattern(1).unwrap();
    let track = pattern.audio_track(3).unwrap();
    let locked = track.step(4).unwrap();
    let plain = track.step(5).unwrap();

    assert_eq!(effective_value(&locked, &base, Some(&scene), Param::VOLUME), 20);
    assert_eq!(effective_value(&plain, &base, Some(&scene), Param::VOLUME), 60);
    assert_eq!(effective_value(&plain, &base, Some(&quiet_scene), Param::VOLUME), 90);
    assert_eq!(effective_value(&plain, &base, None, Param::VOLUME), 90);
}

#[test]
fn test_unlocked_reads_none_and_clearing_restores_sentinel() {
    let mut bank = Bank::new();
    let mut pattern = bank.pattern_mut(2).unwrap();
    let mut track = pattern.audio_track_mut(1).unwrap();
    let mut step = track.step_mut(1).unwrap();

    assert_eq!(step.volume(), None);
    step.set_volume(Some(0)).unwrap();
    assert_eq!(step.volume(), Some(0));
    step.set_volume(None).unwrap();
    assert_eq!(step.volume(), None);
    assert!(!step.has_locks());

    assert!(step.set_volume(Some(128)).is_err());
    assert_eq!(step.volume(), None);
}

#[test]
fn test_step_trigger_is_immediately_visible_to_bulk_reads() {
    let mut bank = Bank::new();
    let mut pattern = bank.pattern_mut(1).unwrap();
    let mut track = pattern.audio_track_mut(6).unwrap();

    track.step_mut(3).unwrap().set_trigger(true);
    track.step_mut(12).unwrap().set_trigger(true);
    assert_eq!(track.active_steps(), vec![3, 12]);

    track.set_active_steps(&[1, 64]).unwrap();
    assert!(track.step(1).unwrap().trigger());
    assert!(!track.step(3).unwrap().trigger());
    assert!(track.step(64).unwrap().trigger());

    assert!(matches!(track.step(0), Err(OctaError::InvalidStep(0))));
    assert!(matches!(track.step(65), Err(OctaError::InvalidStep(65))));
    assert!(matches!(
        track.set_active_steps(&[65]),
        Err(OctaError::InvalidStep(65))
    ));
    assert_eq!(track.active_steps(), vec![1, 64]);
}

#[test]
fn test_allocated_slot_round_trips_through_sample_lock() {
    let mut project = Project::new("slots");
    project.add_sample("a.wav", SlotKind::Flex, None, 0).unwrap();
    let slot = project.add_sample("b.wav", SlotKind::Flex, Some(128), 0).unwrap();
    assert_eq!(slot, 128);

    let bank = project.bank_mut(1).unwrap();
    {
        let mut pattern = bank.pattern_mut(1).unwrap();
        let mut track = pattern.audio_track_mut(1).unwrap();
        let mut step = track.step_mut(1).unwrap();
        step.set_sample_lock(Some(slot)).unwrap();
        assert_eq!(step.sample_lock(), Some(128));
        assert!(matches!(
            step.set_sample_lock(Some(0)),
            Err(OctaError::RangeError { .. })
        ));
        assert!(matches!(
            step.set_sample_lock(Some(137)),
            Err(OctaError::RangeError { .. })
        ));
        assert_eq!(step.sample_lock(), Some(128));
    }
    {
        let mut part = bank.part_mut(1).unwrap();
        let mut machine = part.audio_track_mut(1).unwrap();
        machine.set_flex_slot(slot).unwrap();
        assert_eq!(machine.flex_slot(), 128);
    }

    let decoded = decode(&encode(bank)).unwrap();
    let step_lock = decoded
        .pattern(1)
        .unwrap()
        .audio_track(1)
        .unwrap()
        .step(1)
        .unwrap()
        .sample_lock();
    assert_eq!(step_lock, Some(128));
}

#[test]
fn test_effect_views_follow_the_type_at_acquisition() {
    let mut bank = Bank::new();
    let mut part = bank.part_mut(1).unwrap();
    let mut track = part.audio_track_mut(2).unwrap();

    let FxView::Filter(filter) = track.fx(FxSlot::Fx1).unwrap() else {
        panic!("factory FX1 should be a filter");
    };
    assert_eq!(filter.width(), 127);

    track.set_fx_type(FxSlot::Fx1, FxType::Lofi).unwrap();
    let view = track.fx(FxSlot::Fx1).unwrap();
    assert_eq!(view.fx_type(), FxType::Lofi);
    assert!(matches!(
        view.get("width"),
        Err(OctaError::UnsupportedParameter { family: "lofi", .. })
    ));

    track.set_fx_type(FxSlot::Fx2, FxType::Off).unwrap();
    let off = track.fx(FxSlot::Fx2).unwrap();
    assert!(off.values().is_empty());
    assert!(off.get("time").is_err());

    assert!(matches!(
        track.set_fx_type(FxSlot::Fx1, FxType::Delay),
        Err(OctaError::UnsupportedParameter { .. })
    ));
}

#[test]
fn test_scene_fx_uses_part_type() {
    let mut bank = Bank::new();
    let mut part = bank.part_mut(2).unwrap();
    part.audio_track_mut(4)
        .unwrap()
        .set_fx_type(FxSlot::Fx2, FxType::PlateReverb)
        .unwrap();

    let mut scene_track = part.scene_track_mut(1, 4).unwrap();
    assert_eq!(scene_track.binding().fx(FxSlot::Fx2), FxType::PlateReverb);
    scene_track
        .fx_mut(FxSlot::Fx2)
        .set("mix", Some(100))
        .unwrap();
    assert!(scene_track.fx_mut(FxSlot::Fx2).set("feedback", Some(1)).is_err());
    assert_eq!(scene_track.fx(FxSlot::Fx2).get("mix").unwrap(), Some(100));
    assert_eq!(scene_track.lock_count(), 1);
}

#[test]
fn test_pattern_part_reference_is_shared() {
    let mut bank = Bank::new();
    for n in [1, 2, 3] {
        bank.pattern_mut(n).unwrap().set_part_assignment(2).unwrap();
    }
    bank.part_mut(2)
        .unwrap()
        .audio_track_mut(1)
        .unwrap()
        .set_machine_type(MachineType::Pickup);

    for n in [1, 2, 3] {
        let part_n = bank.pattern(n).unwrap().part_assignment();
        let machine = bank.part(part_n).unwrap().audio_track(1).unwrap().machine_type();
        assert_eq!(machine.unwrap(), MachineType::Pickup);
    }
    assert_eq!(bank.pattern(4).unwrap().part_assignment(), 1);
}

#[test]
fn test_standalone_step_copies_into_track() {
    let mut step = AudioStep::new();
    step.set_trigger(true);
    step.set_volume(Some(44)).unwrap();
    step.set_condition(TrigCondition::Fill).unwrap();

    let mut pattern = Pattern::new();
    let mut track = pattern.audio_track_mut(5).unwrap();
    track.set_step(9, &step).unwrap();

    let placed = track.step(9).unwrap();
    assert!(placed.trigger());
    assert_eq!(placed.volume(), Some(44));
    assert_eq!(placed.condition().unwrap(), TrigCondition::Fill);
    assert_eq!(track.active_steps(), vec![9]);
    assert_eq!(placed.to_standalone(), step);
}

#[test]
fn test_render_settings_from_toml() {
    let render: RenderSettings = toml::from_str(
        r#"
        auto_thru_trig = false
        propagate_amp = true
        "#,
    )
    .unwrap();
    assert!(!render.auto_thru_trig);
    assert!(render.propagate_amp);
    assert!(render.auto_master_trig);
}
