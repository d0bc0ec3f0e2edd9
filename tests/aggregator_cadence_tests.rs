// tests/aggregator_cadence_tests.rs
//
// Emission cadence, reset, and bounds-violation laws for the aggregator:
// - classification emits on tick % N == 0 (tick > 0)
// - the potential variants emit on (tick - 1) % N == 0 (tick > 0)
// - exactly one emission per window, never more, never less
// - the accumulator is zero immediately after any emission
// - the unset variant never emits and never accumulates
// - input bounds violations fail the tick and leave the accumulator unchanged

use rewardcore::{
    EmitResult, InputKind, MemorySink, NoopSink, RewardAggregator, RewardConfig, RewardVariant,
    TickError, TickInputs,
};

fn agg(variant: RewardVariant, window_len: u64) -> RewardAggregator {
    let cfg = RewardConfig {
        window_len,
        label_space: 4,
        variant,
    };
    RewardAggregator::new(cfg).expect("valid config")
}

#[test]
fn classification_emits_exactly_on_window_multiples() {
    let mut a = agg(RewardVariant::ClassificationAccuracy, 10);
    let mut sink = MemorySink::new();

    let agent = [0.9, 0.0, 0.0, 0.0];
    let target = [0.0];

    for tick in 1..=35u64 {
        a.on_tick(tick, TickInputs::new(&agent, &target), &mut sink)
            .unwrap();
    }

    let ticks: Vec<u64> = sink.emissions.iter().map(|(t, _)| *t).collect();
    assert_eq!(ticks, vec![10, 20, 30]);
}

#[test]
fn potential_variants_emit_on_tick_minus_one_multiples() {
    let agent = [1.0, 2.0, 3.0];
    let target = [0.0; 8];

    for variant in [
        RewardVariant::SphericalPotential,
        RewardVariant::GridworldPotential,
    ] {
        let mut a = agg(variant, 10);
        let mut sink = MemorySink::new();
        for tick in 1..=35u64 {
            a.on_tick(tick, TickInputs::new(&agent, &target), &mut sink)
                .unwrap();
        }
        let ticks: Vec<u64> = sink.emissions.iter().map(|(t, _)| *t).collect();
        assert_eq!(ticks, vec![1, 11, 21, 31], "variant {}", variant.as_str());
    }

    // Planar needs the event flag.
    let mut a = agg(RewardVariant::PlanarPotential, 10);
    let mut sink = MemorySink::new();
    for tick in 1..=35u64 {
        a.on_tick(tick, TickInputs::with_event(&agent, &target, 0.0), &mut sink)
            .unwrap();
    }
    let ticks: Vec<u64> = sink.emissions.iter().map(|(t, _)| *t).collect();
    assert_eq!(ticks, vec![1, 11, 21, 31]);
}

#[test]
fn tick_zero_never_emits() {
    let agent = [0.9, 0.0, 0.0, 0.0];
    let target = [0.0; 8];

    let mut a = agg(RewardVariant::ClassificationAccuracy, 10);
    let r = a
        .on_tick(0, TickInputs::new(&agent, &target), &mut NoopSink)
        .unwrap();
    assert_eq!(r, EmitResult::NoEmission);

    let mut a = agg(RewardVariant::SphericalPotential, 10);
    let r = a
        .on_tick(0, TickInputs::new(&[0.0, 8.0, 0.0], &target), &mut NoopSink)
        .unwrap();
    assert_eq!(r, EmitResult::NoEmission);
    // The tick-0 contribution still lands in the accumulator.
    assert!((a.accumulator() - 1.0).abs() < 1e-6);
}

#[test]
fn accumulator_is_zero_after_every_emission() {
    let mut a = agg(RewardVariant::SphericalPotential, 5);
    let mut sink = NoopSink;
    let agent = [0.0, 8.0, 0.0];

    for tick in 1..=26u64 {
        let r = a
            .on_tick(tick, TickInputs::new(&agent, &[]), &mut sink)
            .unwrap();
        if r.value().is_some() {
            assert_eq!(a.accumulator(), 0.0, "tick {tick}");
        }
    }
}

#[test]
fn full_windows_emit_window_length_at_anchor() {
    // At the anchor every tick contributes exactly 1, so every full window
    // after the first emits exactly window_len.
    let mut a = agg(RewardVariant::SphericalPotential, 5);
    let mut sink = MemorySink::new();
    let agent = [0.0, 8.0, 0.0];

    for tick in 1..=21u64 {
        a.on_tick(tick, TickInputs::new(&agent, &[]), &mut sink)
            .unwrap();
    }

    // First boundary at tick 1 covers only tick 1; later windows cover 5.
    let values: Vec<f32> = sink.emissions.iter().map(|(_, v)| *v).collect();
    assert_eq!(values.len(), 5);
    assert!((values[0] - 1.0).abs() < 1e-5);
    for v in &values[1..] {
        assert!((v - 5.0).abs() < 1e-5);
    }
}

#[test]
fn unset_variant_never_emits_and_notices_every_tick() {
    let mut a = agg(RewardVariant::Unset, 10);
    let mut sink = MemorySink::new();

    for tick in 0..=50u64 {
        let r = a.on_tick(tick, TickInputs::new(&[], &[]), &mut sink).unwrap();
        assert_eq!(r, EmitResult::NoEmission);
    }

    assert_eq!(a.accumulator(), 0.0);
    assert_eq!(a.output(), 0.0);
    assert!(sink.emissions.is_empty());
    assert_eq!(sink.notices.len(), 51);
}

#[test]
fn short_agent_vector_fails_and_preserves_accumulator() {
    let mut a = agg(RewardVariant::ClassificationAccuracy, 10);
    let mut sink = NoopSink;

    let agent = [0.9, 0.0, 0.0, 0.0];
    let target = [0.0];
    a.on_tick(1, TickInputs::new(&agent, &target), &mut sink)
        .unwrap();
    let before = a.accumulator();
    assert_eq!(before, 1.0);

    // label_space is 4; a 2-element agent buffer is a caller bug.
    let err = a
        .on_tick(2, TickInputs::new(&agent[..2], &target), &mut sink)
        .unwrap_err();
    assert_eq!(
        err,
        TickError::InputTooShort {
            variant: RewardVariant::ClassificationAccuracy,
            input: InputKind::Agent,
            required: 4,
            actual: 2,
        }
    );
    assert_eq!(a.accumulator(), before);
}

#[test]
fn short_target_vector_fails_gridworld() {
    let mut a = agg(RewardVariant::GridworldPotential, 10);
    let target = [0.0; 4];
    let err = a
        .on_tick(1, TickInputs::new(&[], &target), &mut NoopSink)
        .unwrap_err();
    assert_eq!(
        err,
        TickError::InputTooShort {
            variant: RewardVariant::GridworldPotential,
            input: InputKind::Target,
            required: 8,
            actual: 4,
        }
    );
}

#[test]
fn planar_without_event_flag_fails() {
    let mut a = agg(RewardVariant::PlanarPotential, 10);
    let agent = [0.0, 0.0];
    let target = [1.0, 1.0];
    let err = a
        .on_tick(1, TickInputs::new(&agent, &target), &mut NoopSink)
        .unwrap_err();
    assert_eq!(
        err,
        TickError::MissingEvent {
            variant: RewardVariant::PlanarPotential
        }
    );
    assert_eq!(a.accumulator(), 0.0);
}
