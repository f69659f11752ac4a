//! User callbacks attached to a button.

use core::cell::Cell;
use critical_section::Mutex;

/// Something to run when a button event fires.
///
/// Implemented for every `Fn() + Sync`, so plain functions work directly:
///
/// ```
/// use click_buttons::{Button, InputMode};
///
/// static BUTTON: Button = Button::new(2, InputMode::PullUp);
///
/// fn on_click() {}
///
/// BUTTON.attach_click_action(&on_click);
/// ```
///
/// Stateful actions implement the trait on their own type.
pub trait Action: Sync {
    fn invoke(&self);
}

impl<F> Action for F
where
    F: Fn() + Sync,
{
    fn invoke(&self) {
        self()
    }
}

/// Optional action, swappable at runtime from either execution context.
pub(crate) struct ActionSlot(Mutex<Cell<Option<&'static dyn Action>>>);

impl ActionSlot {
    pub const fn new() -> Self {
        ActionSlot(Mutex::new(Cell::new(None)))
    }

    pub fn set(&self, action: Option<&'static dyn Action>) {
        critical_section::with(|cs| self.0.borrow(cs).set(action));
    }

    pub fn get(&self) -> Option<&'static dyn Action> {
        critical_section::with(|cs| self.0.borrow(cs).get())
    }

    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }

    /// Run the action outside of the critical section, if one is attached.
    pub fn invoke(&self) -> bool {
        match self.get() {
            Some(action) => {
                action.invoke();
                true
            }
            None => false,
        }
    }
}
