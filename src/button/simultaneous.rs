//! Pairing of two buttons for simultaneous-click detection.
//!
//! Both buttons of a pair know each other and the shared action, so whichever
//! is pressed second notices the match. Only the coordinator owner (the one
//! on the larger pin) runs the action, once per physical event.

use super::Button;
use crate::action::Action;
use crate::config::SIMULTANEOUS_CLICK_MS;
use crate::log::{debug, warning};
use core::ptr;
use core::sync::atomic::Ordering::SeqCst;

impl Button {
    /// Run `action` when this button and `partner` are pressed within
    /// [`SIMULTANEOUS_CLICK_MS`] of each other.
    ///
    /// Pairs both buttons; calling it on either one of them is enough.
    pub fn attach_simultaneous_click_action(
        &'static self,
        action: &'static dyn Action,
        partner: &'static Button,
    ) {
        if ptr::eq(self, partner) {
            warning!("Button: pin {} cannot pair with itself", self.pin);
            return;
        }

        let owner = self.pin >= partner.pin;
        self.pair_with(action, partner, owner);
        partner.pair_with(action, self, !owner);
    }

    fn pair_with(&self, action: &'static dyn Action, partner: &'static Button, owner: bool) {
        self.simultaneous_click_action.set(Some(action));
        critical_section::with(|cs| self.partner.borrow(cs).set(Some(partner)));
        self.coordinator_owner.store(owner, SeqCst);
    }

    pub fn partner(&self) -> Option<&'static Button> {
        critical_section::with(|cs| self.partner.borrow(cs).get())
    }

    /// Whether this button runs the shared simultaneous action of its pair.
    pub fn is_coordinator_owner(&self) -> bool {
        self.coordinator_owner.load(SeqCst)
    }

    /// The click in progress will be marked simultaneous when it completes.
    pub fn has_pending_simultaneous_click(&self) -> bool {
        self.pending_simultaneous.load(SeqCst)
    }

    /// Called on a press edge, after the press timestamp is recorded.
    pub(super) fn check_simultaneous_click(&self) {
        if self.has_pending_simultaneous_click() || !self.simultaneous_click_action.is_set() {
            return;
        }
        let Some(partner) = self.partner() else {
            return;
        };
        if !partner.is_pressed() {
            return;
        }

        let gap = distance(
            self.current_click.timestamp(),
            partner.current_click.timestamp(),
        );
        if gap < SIMULTANEOUS_CLICK_MS {
            self.confirm_simultaneous_click();
            partner.confirm_simultaneous_click();
            debug!("Button: pins {} and {} pressed together", self.pin, partner.pin);
        }
    }

    fn confirm_simultaneous_click(&self) {
        self.pending_simultaneous.store(true, SeqCst);
    }

    /// Owner side of a simultaneous click: drop the partner's copy of the
    /// event and run the shared action.
    pub(super) fn fire_simultaneous_click(&self) {
        let Some(action) = self.simultaneous_click_action.get() else {
            return;
        };
        if let Some(partner) = self.partner() {
            partner.wipe_clicks();
        }
        action.invoke();
    }
}

/// Distance between two wrapping millisecond timestamps.
fn distance(a: u32, b: u32) -> u32 {
    a.wrapping_sub(b).min(b.wrapping_sub(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{leak_button, Counter, MockBoard};

    fn pair() -> (&'static Button, &'static Button, &'static Counter) {
        let a = leak_button(2);
        let b = leak_button(3);
        let action = Counter::leak();
        a.attach_simultaneous_click_action(action, b);
        (a, b, action)
    }

    #[test]
    fn pairing_links_both_buttons() {
        let (a, b, _) = pair();
        assert!(ptr::eq(a.partner().unwrap(), b));
        assert!(ptr::eq(b.partner().unwrap(), a));
    }

    #[test]
    fn larger_pin_owns_the_action() {
        let (a, b, _) = pair();
        assert!(!a.is_coordinator_owner());
        assert!(b.is_coordinator_owner());
    }

    #[test]
    fn ownership_does_not_depend_on_call_order() {
        let a = leak_button(2);
        let b = leak_button(3);
        b.attach_simultaneous_click_action(Counter::leak(), a);
        assert!(!a.is_coordinator_owner());
        assert!(b.is_coordinator_owner());
    }

    #[test]
    fn pairing_with_itself_is_ignored() {
        let a = leak_button(2);
        a.attach_simultaneous_click_action(Counter::leak(), a);
        assert!(a.partner().is_none());
    }

    #[test]
    fn presses_inside_window_mark_both_clicks() {
        let board = MockBoard::new();
        let (a, b, _) = pair();

        board.press(a, 1_000);
        assert!(!a.has_pending_simultaneous_click());
        board.press(b, 1_400);
        assert!(a.has_pending_simultaneous_click());
        assert!(b.has_pending_simultaneous_click());

        board.release(a, 1_600);
        board.release(b, 1_700);
        assert!(a.take_click().simultaneous);
        assert!(b.take_click().simultaneous);
        assert!(!a.has_pending_simultaneous_click());
        assert!(!b.has_pending_simultaneous_click());
    }

    #[test]
    fn presses_outside_window_stay_independent() {
        let board = MockBoard::new();
        let (a, b, _) = pair();

        board.press(a, 1_000);
        board.press(b, 2_000);
        board.release(a, 2_100);
        board.release(b, 2_200);

        assert!(!a.take_click().simultaneous);
        assert!(!b.take_click().simultaneous);
    }

    #[test]
    fn released_partner_does_not_match() {
        let board = MockBoard::new();
        let (a, b, _) = pair();

        board.press(a, 1_000);
        board.release(a, 1_100);
        board.press(b, 1_200);

        assert!(!b.has_pending_simultaneous_click());
    }

    #[test]
    fn unpaired_button_never_matches() {
        let board = MockBoard::new();
        let a = leak_button(2);
        let b = leak_button(3);

        board.press(a, 1_000);
        board.press(b, 1_010);

        assert!(!a.has_pending_simultaneous_click());
        assert!(!b.has_pending_simultaneous_click());
    }

    #[test]
    fn window_is_measured_across_clock_wrap_around() {
        assert_eq!(distance(u32::MAX - 9, 10), 20);
        assert_eq!(distance(10, u32::MAX - 9), 20);
        assert_eq!(distance(500, 500), 0);
    }
}
