//! Statistical tests for the flicker process and randint

mod common;
use common::*;

use block_lights::flicker::{CHANGE_ONE_IN, STOP_FLASHING_ONE_IN};
use block_lights::{FlickerState, FlickerStateMachine, MinStdRand, randint};

#[test]
fn randint_is_exactly_uniform_over_full_cycles() {
    let mut rng = CountingByte(0);
    let mut counts = [0u32; 5];

    // 255 accepted draws per 256-value cycle, 51 per result
    for _ in 0..25_500 {
        let v = randint(&mut rng, 1, 5);
        assert!((1..=5).contains(&v));
        counts[(v - 1) as usize] += 1;
    }

    assert_eq!(counts, [5100; 5]);
}

#[test]
fn steady_dwell_averages_five_hours() {
    let mut rng = MinStdRand::new(12_345);
    let mut machine = FlickerStateMachine::new();

    let mut previous = machine.state();
    let mut dwell = 0u64;
    let mut episodes = Vec::new();

    for _ in 0..1_000_000 {
        let state = machine.update(&mut rng).unwrap();
        dwell += 1;
        if state != previous {
            if previous != FlickerState::Flashing {
                episodes.push(dwell);
            }
            dwell = 0;
            previous = state;
        }
    }

    assert!(episodes.len() >= 20, "only {} changes", episodes.len());
    let mean = episodes.iter().sum::<u64>() as f64 / episodes.len() as f64;
    let expected = CHANGE_ONE_IN as f64;
    assert!(
        (mean - expected).abs() < expected * 0.5,
        "mean dwell {} over {} episodes",
        mean,
        episodes.len()
    );
}

#[test]
fn flashing_dwell_averages_one_hundred_seconds() {
    let mut rng = MinStdRand::new(7);
    let mut total = 0u64;
    let episodes = 2_000;

    for _ in 0..episodes {
        let mut machine = FlickerStateMachine::from_raw(FlickerState::Flashing as u8);
        loop {
            total += 1;
            if machine.update(&mut rng).unwrap() != FlickerState::Flashing {
                break;
            }
        }
    }

    let mean = total as f64 / episodes as f64;
    let expected = STOP_FLASHING_ONE_IN as f64;
    assert!((mean - expected).abs() < 15.0, "mean flashing dwell {}", mean);
}

#[test]
fn flashing_only_ever_falls_back_to_off() {
    let mut rng = MinStdRand::new(99);

    for _ in 0..10_000 {
        let mut machine = FlickerStateMachine::from_raw(FlickerState::Flashing as u8);
        let state = machine.update(&mut rng).unwrap();
        assert_ne!(state, FlickerState::On);
    }

    let mut machine = FlickerStateMachine::new();
    let mut previous = machine.state();
    for _ in 0..1_000_000 {
        let state = machine.update(&mut rng).unwrap();
        if previous == FlickerState::Flashing && state != FlickerState::Flashing {
            assert_eq!(state, FlickerState::Off);
        }
        previous = state;
    }
}

#[test]
fn corrupted_state_resets_to_off() {
    let mut rng = MinStdRand::new(1);
    let mut machine = FlickerStateMachine::from_raw(0xA5);

    let err = machine.update(&mut rng).unwrap_err();
    assert_eq!(err.raw, 0xA5);
    assert_eq!(machine.state(), FlickerState::Off);
    assert_eq!(machine.raw(), FlickerState::Off as u8);

    assert!(machine.update(&mut rng).is_ok());
}
