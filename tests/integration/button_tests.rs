//! Integration tests: scripted pin → ButtonManager → press handler.

use plugcore::adapters::log_sink::LogPressHandler;
use plugcore::drivers::button::{ButtonManager, ClassifierState, Polarity, PressEvent};

use crate::mock_hw::{ButtonRig, EventLog, ManualClock, ScriptedPin};

#[test]
fn short_press_with_pull_up() {
    let mut rig = ButtonRig::new(true);
    assert_eq!(rig.button.polarity(), Polarity::ActiveLow);

    rig.tick_at(0);
    rig.hold(100, 400, 20);

    assert_eq!(rig.events(), vec![PressEvent::Short]);
}

#[test]
fn short_press_active_high() {
    let mut rig = ButtonRig::new(false);
    assert_eq!(rig.button.polarity(), Polarity::ActiveHigh);

    rig.hold(0, 150, 10);

    assert_eq!(rig.events(), vec![PressEvent::Short]);
}

#[test]
fn is_pressed_follows_polarity() {
    let mut rig = ButtonRig::new(true);
    assert!(!rig.button.is_pressed());
    rig.press();
    assert!(rig.button.is_pressed());
    rig.pin.set_high(true);
    assert!(!rig.button.is_pressed());
}

#[test]
fn long_press_fires_once_while_held() {
    let mut rig = ButtonRig::new(true);
    rig.press();
    rig.tick_at(1000);
    rig.tick_at(2900);
    assert!(rig.events().is_empty());

    rig.tick_at(3000);
    assert_eq!(rig.events(), vec![PressEvent::Long]);
    assert_eq!(rig.button.state(), ClassifierState::LongNotified);

    // Keep holding, then release: nothing more.
    rig.tick_at(6000);
    rig.release();
    rig.tick_at(6020);
    assert_eq!(rig.events(), vec![PressEvent::Long]);
    assert_eq!(rig.button.state(), ClassifierState::Idle);
}

#[test]
fn coarse_cadence_still_reports_long() {
    let mut rig = ButtonRig::new(true);
    rig.press();
    rig.tick_at(0);
    rig.release();
    rig.tick_at(2500);
    assert_eq!(rig.events(), vec![PressEvent::Long]);
}

#[test]
fn consecutive_cycles_each_fire_once() {
    let mut rig = ButtonRig::new(true);
    rig.hold(0, 200, 20);
    rig.tick_at(300);
    rig.hold(400, 2600, 100);
    rig.tick_at(2700);
    rig.hold(3000, 3050, 10);

    assert_eq!(
        rig.events(),
        vec![PressEvent::Short, PressEvent::Long, PressEvent::Short]
    );
}

#[test]
fn no_handler_does_not_fault() {
    let pin = ScriptedPin::new(true);
    let clock = ManualClock::default();
    let mut button = ButtonManager::new(pin.clone(), clock.clone(), true);

    for cycle in 0..3u32 {
        let base = cycle * 5000;
        pin.set_high(false);
        clock.set(base);
        button.tick();
        clock.set(base + 2500);
        button.tick();
        pin.set_high(true);
        clock.set(base + 2600);
        button.tick();
    }
    assert_eq!(button.state(), ClassifierState::Idle);
}

#[test]
fn handler_can_be_replaced() {
    let mut rig = ButtonRig::new(true);
    rig.hold(0, 100, 10);

    let second = EventLog::default();
    rig.button.on_press(second.handler());
    rig.hold(1000, 1100, 10);

    assert_eq!(rig.events(), vec![PressEvent::Short]);
    assert_eq!(second.events(), vec![PressEvent::Short]);
}

#[test]
fn cleared_handler_drops_events() {
    let mut rig = ButtonRig::new(true);
    rig.button.clear_handler();
    rig.hold(0, 100, 10);
    assert!(rig.events().is_empty());
    assert_eq!(rig.button.state(), ClassifierState::Idle);
}

#[test]
fn read_failure_does_not_fabricate_release() {
    let mut rig = ButtonRig::new(true);
    rig.press();
    rig.tick_at(0);

    rig.pin.set_failing(true);
    rig.tick_at(100);
    rig.tick_at(200);
    assert!(rig.events().is_empty());
    assert_eq!(rig.button.state(), ClassifierState::Pressed);

    rig.pin.set_failing(false);
    rig.release();
    rig.tick_at(300);
    assert_eq!(rig.events(), vec![PressEvent::Short]);
}

#[test]
fn custom_long_press_threshold() {
    let pin = ScriptedPin::new(true);
    let clock = ManualClock::default();
    let log = EventLog::default();
    let mut button = ButtonManager::new(pin.clone(), clock.clone(), true).with_long_press_ms(500);
    button.on_press(log.handler());

    pin.set_high(false);
    button.tick();
    clock.set(500);
    button.tick();
    assert_eq!(log.events(), vec![PressEvent::Long]);
}

#[test]
fn log_handler_accepts_events() {
    let pin = ScriptedPin::new(true);
    let clock = ManualClock::default();
    let mut button = ButtonManager::new(pin.clone(), clock.clone(), true);
    button.on_press(LogPressHandler::new());

    pin.set_high(false);
    button.tick();
    pin.set_high(true);
    clock.set(50);
    button.tick();
    assert_eq!(button.state(), ClassifierState::Idle);
}
