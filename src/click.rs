//! Click records and logical button states.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering::SeqCst};

/// Logical state of a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ButtonState {
    Released = 0,
    Pressed = 1,
    /// Nothing sampled yet.
    #[default]
    Unknown = 2,
    /// Reserved for a dropped or ambiguous transition. Never produced.
    Lost = 3,
}

impl From<u8> for ButtonState {
    fn from(raw: u8) -> Self {
        match raw {
            0 => ButtonState::Released,
            1 => ButtonState::Pressed,
            3 => ButtonState::Lost,
            _ => ButtonState::Unknown,
        }
    }
}

/// One completed press-release cycle.
///
/// The all-zero value doubles as "nothing available" when reading from an
/// empty [`ClickBuffer`](crate::ClickBuffer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClickEvent {
    /// Press time in milliseconds.
    pub timestamp: u32,
    /// Release time minus press time in milliseconds.
    pub duration: u32,
    /// The partner button was pressed within the coordination window.
    pub simultaneous: bool,
}

impl ClickEvent {
    pub const fn empty() -> Self {
        Self {
            timestamp: 0,
            duration: 0,
            simultaneous: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.timestamp == 0 && self.duration == 0 && !self.simultaneous
    }
}

/// [`ClickEvent`] stored field by field in atomics.
///
/// Each field is individually atomic; a reader racing a writer can observe a
/// mix of old and new fields. Callers that care detect this themselves, see
/// [`ClickBuffer::pop`](crate::ClickBuffer::pop).
#[derive(Debug)]
pub(crate) struct AtomicClick {
    timestamp: AtomicU32,
    duration: AtomicU32,
    simultaneous: AtomicBool,
}

impl AtomicClick {
    pub const fn new() -> Self {
        Self {
            timestamp: AtomicU32::new(0),
            duration: AtomicU32::new(0),
            simultaneous: AtomicBool::new(false),
        }
    }

    pub fn load(&self) -> ClickEvent {
        ClickEvent {
            timestamp: self.timestamp.load(SeqCst),
            duration: self.duration.load(SeqCst),
            simultaneous: self.simultaneous.load(SeqCst),
        }
    }

    pub fn store(&self, click: ClickEvent) {
        self.timestamp.store(click.timestamp, SeqCst);
        self.duration.store(click.duration, SeqCst);
        self.simultaneous.store(click.simultaneous, SeqCst);
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp.load(SeqCst)
    }

    pub fn set_timestamp(&self, timestamp: u32) {
        self.timestamp.store(timestamp, SeqCst);
    }

    pub fn clear(&self) {
        self.store(ClickEvent::empty());
    }
}

/// [`ButtonState`] shared between interrupt and polling context.
#[derive(Debug)]
#[repr(transparent)]
pub(crate) struct AtomicButtonState(AtomicU8);

impl AtomicButtonState {
    pub const fn new() -> Self {
        AtomicButtonState(AtomicU8::new(ButtonState::Unknown as u8))
    }

    pub fn get(&self) -> ButtonState {
        ButtonState::from(self.0.load(SeqCst))
    }

    pub fn set(&self, state: ButtonState) {
        self.0.store(state as u8, SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_through_its_raw_value() {
        for state in [
            ButtonState::Released,
            ButtonState::Pressed,
            ButtonState::Unknown,
            ButtonState::Lost,
        ] {
            assert_eq!(ButtonState::from(state as u8), state);
        }
    }

    #[test]
    fn unexpected_raw_state_reads_as_unknown() {
        assert_eq!(ButtonState::from(42), ButtonState::Unknown);
    }

    #[test]
    fn atomic_state_starts_unknown() {
        let state = AtomicButtonState::new();
        assert_eq!(state.get(), ButtonState::Unknown);
        state.set(ButtonState::Pressed);
        assert_eq!(state.get(), ButtonState::Pressed);
    }

    #[test]
    fn default_click_is_the_empty_sentinel() {
        assert!(ClickEvent::default().is_empty());
        assert_eq!(ClickEvent::default(), ClickEvent::empty());
    }

    #[test]
    fn click_with_any_field_set_is_not_empty() {
        let pressed_at_boot = ClickEvent {
            timestamp: 0,
            duration: 120,
            simultaneous: false,
        };
        assert!(!pressed_at_boot.is_empty());
    }

    #[test]
    fn atomic_click_stores_and_clears() {
        let cell = AtomicClick::new();
        let click = ClickEvent {
            timestamp: 10,
            duration: 20,
            simultaneous: true,
        };
        cell.store(click);
        assert_eq!(cell.load(), click);
        assert_eq!(cell.timestamp(), 10);

        cell.clear();
        assert!(cell.load().is_empty());
    }
}
