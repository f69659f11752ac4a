//! Routing of pin-change interrupts to the button that owns the pin.
//!
//! The platform keeps one `Registry` in a `static` and forwards every edge
//! interrupt to [`Registry::dispatch`]:
//!
//! ```text
//!   [ EXTI / PCINT ISR ] --pin--> Registry::dispatch
//!                                     |
//!                    +----------------+----------------+
//!                    |                                 |
//!           EdgeHandler::Click                 EdgeHandler::Wake
//!           Button::on_edge                    Button::on_wake_edge
//! ```
//!
//! Handlers are swapped with interrupts disabled, so an edge never observes a
//! half-updated table.

use crate::button::Button;
use crate::config::MAX_EDGE_HANDLERS;
use crate::error::Error;
use crate::hal::{Clock, Gpio};
use core::cell::RefCell;
use critical_section::{CriticalSection, Mutex};
use heapless::Vec;

/// Handler bound to a specific button.
#[derive(Clone, Copy)]
pub enum EdgeHandler {
    /// Normal operation: record presses and releases.
    Click(&'static Button),
    /// Armed by [`Button::sleep`]: record the edge, then restore `Click`.
    Wake(&'static Button),
}

impl EdgeHandler {
    pub fn button(&self) -> &'static Button {
        match self {
            EdgeHandler::Click(button) | EdgeHandler::Wake(button) => button,
        }
    }

    pub fn is_wake(&self) -> bool {
        matches!(self, EdgeHandler::Wake(_))
    }
}

impl core::fmt::Debug for EdgeHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EdgeHandler::Click(button) => write!(f, "Click(pin {})", button.pin()),
            EdgeHandler::Wake(button) => write!(f, "Wake(pin {})", button.pin()),
        }
    }
}

/// Table of up to `N` pin to handler routes.
pub struct Registry<const N: usize = MAX_EDGE_HANDLERS> {
    handlers: Mutex<RefCell<Vec<(u8, EdgeHandler), N>>>,
}

impl<const N: usize> Default for Registry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Registry<N> {
    pub const fn new() -> Self {
        Self {
            handlers: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Route `pin` to `handler`, replacing any previous route.
    pub fn attach(&self, pin: u8, handler: EdgeHandler) -> Result<(), Error> {
        critical_section::with(|cs| self.attach_in(cs, pin, handler))
    }

    /// Remove the route of `pin`, returning the handler it had.
    pub fn detach(&self, pin: u8) -> Option<EdgeHandler> {
        critical_section::with(|cs| self.detach_in(cs, pin))
    }

    /// Current handler of `pin`.
    pub fn handler(&self, pin: u8) -> Option<EdgeHandler> {
        critical_section::with(|cs| {
            self.handlers
                .borrow_ref(cs)
                .iter()
                .find(|(p, _)| *p == pin)
                .map(|(_, handler)| *handler)
        })
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.handlers.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the handler routed to `pin`. Call from the edge interrupt.
    ///
    /// Returns `false` for pins without a route.
    pub fn dispatch<H>(&self, pin: u8, hal: &H) -> bool
    where
        H: Clock + Gpio,
    {
        match self.handler(pin) {
            Some(EdgeHandler::Click(button)) => {
                button.on_edge(hal);
                true
            }
            Some(EdgeHandler::Wake(button)) => {
                button.on_wake_edge(self, hal);
                true
            }
            None => false,
        }
    }

    pub(crate) fn attach_in(
        &self,
        cs: CriticalSection<'_>,
        pin: u8,
        handler: EdgeHandler,
    ) -> Result<(), Error> {
        let mut handlers = self.handlers.borrow_ref_mut(cs);
        if let Some(route) = handlers.iter_mut().find(|(p, _)| *p == pin) {
            route.1 = handler;
            return Ok(());
        }
        handlers
            .push((pin, handler))
            .map_err(|_| Error::RegistryFull { pin })
    }

    pub(crate) fn detach_in(&self, cs: CriticalSection<'_>, pin: u8) -> Option<EdgeHandler> {
        let mut handlers = self.handlers.borrow_ref_mut(cs);
        let index = handlers.iter().position(|(p, _)| *p == pin)?;
        Some(handlers.swap_remove(index).1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{leak_button, MockBoard};
    use crate::ButtonState;
    use crate::PinState;

    #[test]
    fn attach_routes_pin_to_handler() {
        let registry: Registry<4> = Registry::new();
        let button = leak_button(2);
        registry.attach(2, EdgeHandler::Click(button)).unwrap();

        let handler = registry.handler(2).unwrap();
        assert!(!handler.is_wake());
        assert_eq!(handler.button().pin(), 2);
        assert!(registry.handler(3).is_none());
    }

    #[test]
    fn attach_replaces_existing_route() {
        let registry: Registry<4> = Registry::new();
        let button = leak_button(2);
        registry.attach(2, EdgeHandler::Click(button)).unwrap();
        registry.attach(2, EdgeHandler::Wake(button)).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.handler(2).unwrap().is_wake());
    }

    #[test]
    fn attach_fails_when_table_is_full() {
        let registry: Registry<2> = Registry::new();
        registry.attach(2, EdgeHandler::Click(leak_button(2))).unwrap();
        registry.attach(3, EdgeHandler::Click(leak_button(3))).unwrap();

        let result = registry.attach(4, EdgeHandler::Click(leak_button(4)));
        assert_eq!(result, Err(Error::RegistryFull { pin: 4 }));
    }

    #[test]
    fn detach_frees_the_slot() {
        let registry: Registry<1> = Registry::new();
        registry.attach(2, EdgeHandler::Click(leak_button(2))).unwrap();

        assert!(registry.detach(2).is_some());
        assert!(registry.detach(2).is_none());
        assert!(registry.is_empty());
        registry.attach(3, EdgeHandler::Click(leak_button(3))).unwrap();
    }

    #[test]
    fn dispatch_runs_the_click_handler() {
        let board = MockBoard::new();
        let registry: Registry<4> = Registry::new();
        let button = leak_button(2);
        registry.attach(2, EdgeHandler::Click(button)).unwrap();

        board.set_level(2, PinState::High);
        assert!(registry.dispatch(2, &board));
        assert_eq!(button.state(), ButtonState::Pressed);
    }

    #[test]
    fn dispatch_ignores_unrouted_pins() {
        let board = MockBoard::new();
        let registry: Registry<4> = Registry::new();
        assert!(!registry.dispatch(7, &board));
    }
}
