//! Simulated board for host tests.

use crate::action::Action;
use crate::button::Button;
use crate::hal::{Clock, Gpio, InputMode, PinState, Power};
use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicU32, Ordering::SeqCst};

const PINS: usize = 16;

/// Clock, pins and power in one place, driven by the test.
pub(crate) struct MockBoard {
    now: Cell<u32>,
    levels: RefCell<[PinState; PINS]>,
    modes: RefCell<[Option<InputMode>; PINS]>,
    armed: RefCell<[bool; PINS]>,
    low_power_entries: Cell<u32>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0),
            levels: RefCell::new([PinState::Low; PINS]),
            modes: RefCell::new([None; PINS]),
            armed: RefCell::new([false; PINS]),
            low_power_entries: Cell::new(0),
        }
    }

    pub fn set_time(&self, now: u32) {
        self.now.set(now);
    }

    pub fn set_level(&self, pin: u8, level: PinState) {
        self.levels.borrow_mut()[pin as usize] = level;
    }

    pub fn mode(&self, pin: u8) -> Option<InputMode> {
        self.modes.borrow()[pin as usize]
    }

    pub fn is_armed(&self, pin: u8) -> bool {
        self.armed.borrow()[pin as usize]
    }

    pub fn low_power_entries(&self) -> u32 {
        self.low_power_entries.get()
    }

    /// Drive `pin` high at `at` and run the button's edge handler.
    pub fn press(&self, button: &Button, at: u32) {
        self.set_time(at);
        self.set_level(button.pin(), PinState::High);
        button.on_edge(self);
    }

    /// Drive `pin` low at `at` and run the button's edge handler.
    pub fn release(&self, button: &Button, at: u32) {
        self.set_time(at);
        self.set_level(button.pin(), PinState::Low);
        button.on_edge(self);
    }
}

impl Clock for MockBoard {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

impl Gpio for MockBoard {
    fn configure(&self, pin: u8, mode: InputMode) {
        self.modes.borrow_mut()[pin as usize] = Some(mode);
    }

    fn read(&self, pin: u8) -> PinState {
        self.levels.borrow()[pin as usize]
    }

    fn enable_edge_interrupt(&self, pin: u8) {
        self.armed.borrow_mut()[pin as usize] = true;
    }

    fn disable_edge_interrupt(&self, pin: u8) {
        self.armed.borrow_mut()[pin as usize] = false;
    }
}

impl Power for MockBoard {
    fn enter_low_power_mode(&self) {
        self.low_power_entries.set(self.low_power_entries.get() + 1);
    }
}

/// Action counting its invocations.
#[derive(Debug, Default)]
pub(crate) struct Counter(AtomicU32);

impl Counter {
    pub fn leak() -> &'static Counter {
        Box::leak(Box::new(Counter::default()))
    }

    pub fn count(&self) -> u32 {
        self.0.load(SeqCst)
    }
}

impl Action for Counter {
    fn invoke(&self) {
        self.0.fetch_add(1, SeqCst);
    }
}

pub(crate) fn leak_button(pin: u8) -> &'static Button {
    Box::leak(Box::new(Button::new(pin, InputMode::PullUp)))
}
