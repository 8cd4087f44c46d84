//! Shared test infrastructure for block-lights integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use block_lights::{
    Config, DebugSink, DigitalInput, Hardware, LightBank, LightController, LightStates, NO_BACKUP,
    PersistenceStore, RandomSource, Signals,
};

// ============================================================================
// Mock Light Bank
// ============================================================================

/// Light bank that records every vector written to it
#[derive(Default)]
pub struct MockLights {
    pub current: LightStates,
    pub writes: Vec<LightStates>,
    pub edit_indicator: bool,
}

impl LightBank for MockLights {
    fn write(&mut self, lights: &LightStates) {
        self.current = *lights;
        self.writes.push(*lights);
    }

    fn set_edit_indicator(&mut self, on: bool) {
        self.edit_indicator = on;
    }
}

// ============================================================================
// Mock Inputs
// ============================================================================

/// Digital input whose level the test controls through a shared cell
#[derive(Clone, Default)]
pub struct MockInput {
    level: Rc<Cell<bool>>,
}

impl MockInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, level: bool) {
        self.level.set(level);
    }
}

impl DigitalInput for MockInput {
    fn read(&mut self) -> bool {
        self.level.get()
    }
}

// ============================================================================
// Mock Persistence
// ============================================================================

/// In-memory backup store that remembers every write
pub struct MockStore {
    pub value: u32,
    pub writes: Vec<u32>,
}

impl MockStore {
    pub fn empty() -> Self {
        Self {
            value: NO_BACKUP,
            writes: Vec::new(),
        }
    }

    pub fn with_backup(value: u32) -> Self {
        Self {
            value,
            writes: Vec::new(),
        }
    }
}

impl PersistenceStore for MockStore {
    fn read(&mut self) -> u32 {
        self.value
    }

    fn write(&mut self, timestamp: u32) {
        self.value = timestamp;
        self.writes.push(timestamp);
    }
}

// ============================================================================
// Mock Debug Sink
// ============================================================================

/// Debug sink collecting lines, shared so tests can inspect it after handing it over
#[derive(Clone, Default)]
pub struct MockDebug {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MockDebug {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|line| line.contains(needle))
    }
}

impl DebugSink for MockDebug {
    fn write_str(&mut self, text: &str) {
        self.lines.borrow_mut().push(String::from(text));
    }
}

// ============================================================================
// Deterministic Generators
// ============================================================================

/// Cycles through every byte value in order
pub struct CountingByte(pub u32);

impl RandomSource for CountingByte {
    const MAX: u32 = 255;

    fn next_u32(&mut self) -> u32 {
        let v = self.0 % 256;
        self.0 += 1;
        v
    }
}

/// Always returns the same draw; `Constant(MAX_DRAW)` never opens a probability gate
pub struct Constant(pub u32);

pub const MAX_DRAW: u32 = 2_000_000_000;

impl RandomSource for Constant {
    const MAX: u32 = u32::MAX - 1;

    fn next_u32(&mut self) -> u32 {
        self.0
    }
}

// ============================================================================
// Controller Fixture
// ============================================================================

pub type TestController<'s> =
    LightController<'s, MockLights, MockInput, MockInput, MockStore, Constant, MockDebug>;

/// Handles the test keeps after the mocks move into the controller
pub struct Handles {
    pub switch: MockInput,
    pub button: MockInput,
    pub debug: MockDebug,
}

pub fn controller<'s>(config: Config, signals: &'s Signals, store: MockStore) -> (TestController<'s>, Handles) {
    let handles = Handles {
        switch: MockInput::new(),
        button: MockInput::new(),
        debug: MockDebug::default(),
    };
    let hw = Hardware {
        lights: MockLights::default(),
        switch: handles.switch.clone(),
        button: handles.button.clone(),
        store,
        debug: handles.debug.clone(),
    };
    let controller = LightController::new(config, signals, hw, Constant(MAX_DRAW)).unwrap();
    (controller, handles)
}

/// Posts `n` timer ticks and runs one poll
pub fn run_ticks(controller: &mut TestController<'_>, signals: &Signals, n: u32) {
    for _ in 0..n {
        signals.ticks.post();
    }
    controller.poll(0);
}

/// Holds the button for `hold_ms`, polling once per millisecond, then releases it
pub fn press(controller: &mut TestController<'_>, signals: &Signals, handles: &Handles, hold_ms: u32) {
    handles.button.set(true);
    signals.button_edge.post();
    controller.poll(0);
    for _ in 0..hold_ms {
        controller.poll(1);
    }
    handles.button.set(false);
    controller.poll(1);
}
