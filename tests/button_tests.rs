//! Integration tests for ButtonController timing

use block_lights::{ButtonController, ButtonPressState, PressKind};

/// Simulates one press held for `hold_ms` with 1 ms polls, collecting reported presses.
fn hold(button: &mut ButtonController, hold_ms: u32) -> Vec<PressKind> {
    let mut presses = Vec::new();
    button.on_rising_edge();
    for _ in 0..hold_ms {
        presses.extend(button.poll(true, 1));
    }
    for _ in 0..10 {
        presses.extend(button.poll(false, 1));
    }
    presses
}

#[test]
fn half_second_hold_is_one_short_press() {
    let mut button = ButtonController::new(1000, 1);
    assert_eq!(hold(&mut button, 500), vec![PressKind::Short]);
    assert_eq!(button.state(), ButtonPressState::Up);
}

#[test]
fn long_hold_is_one_long_press_and_no_short() {
    let mut button = ButtonController::new(1000, 1);
    assert_eq!(hold(&mut button, 1200), vec![PressKind::Long]);
    assert_eq!(button.state(), ButtonPressState::Up);
}

#[test]
fn long_press_reported_while_still_held() {
    let mut button = ButtonController::new(1000, 1);
    button.on_rising_edge();

    for _ in 0..999 {
        assert_eq!(button.poll(true, 1), None);
    }
    assert_eq!(button.poll(true, 1), Some(PressKind::Long));
    assert_eq!(button.state(), ButtonPressState::DownHandled);
    assert!(!button.is_measuring());
}

#[test]
fn bounce_below_minimum_is_dropped() {
    let mut button = ButtonController::new(1000, 20);
    assert!(hold(&mut button, 5).is_empty());
    assert_eq!(hold(&mut button, 50), vec![PressKind::Short]);
}

#[test]
fn edges_during_press_are_ignored() {
    let mut button = ButtonController::new(1000, 1);
    button.on_rising_edge();
    for _ in 0..600 {
        button.poll(true, 1);
    }
    // A bounce edge must not restart the measurement
    button.on_rising_edge();
    assert_eq!(button.held_ms(), 600);

    let mut presses = Vec::new();
    for _ in 0..400 {
        presses.extend(button.poll(true, 1));
    }
    assert_eq!(presses, vec![PressKind::Long]);
}

#[test]
fn consecutive_presses_are_classified_independently() {
    let mut button = ButtonController::new(1000, 1);
    let mut presses = hold(&mut button, 1500);
    presses.extend(hold(&mut button, 200));
    presses.extend(hold(&mut button, 300));
    assert_eq!(presses, vec![PressKind::Long, PressKind::Short, PressKind::Short]);
}
