//! Polling-side consumer of recorded clicks.

use super::Button;
use crate::config::LONG_CLICK_MS;
use crate::hal::Clock;

impl Button {
    /// Drain completed clicks into their actions and fire the long-click
    /// action while the button is held.
    ///
    /// Call once per main-loop cycle, never from an interrupt.
    ///
    /// - A short click runs the click action.
    /// - A simultaneous click runs the shared action on the coordinator owner
    ///   only, which also discards the partner's copy of the click. The other
    ///   button consumes its copy silently.
    /// - A click that lasted [`LONG_CLICK_MS`] or more runs nothing; it was
    ///   already reported through the long-click action while held.
    /// - An all-zero click ends the cycle; the remaining clicks are handled
    ///   on the next call.
    /// - While the current press is at or past [`LONG_CLICK_MS`], buffered
    ///   clicks wait and the long-click action runs once per call, until
    ///   release.
    pub fn execute_actions<C: Clock>(&self, clock: &C) {
        while self.clicks.available() > 0
            && self.current_click_duration(clock) < LONG_CLICK_MS
        {
            let click = self.clicks.pop();
            // Empty: the buffer was wiped between the check and the pop, or a
            // torn read. The rest waits for the next call.
            if click.is_empty() {
                break;
            }
            if click.duration >= LONG_CLICK_MS {
                continue;
            }

            if click.simultaneous {
                if self.is_coordinator_owner() {
                    self.fire_simultaneous_click();
                }
            } else {
                self.click_action.invoke();
            }
        }

        if self.is_pressed() && self.current_click_duration(clock) >= LONG_CLICK_MS {
            self.long_click_action.invoke();
        }
    }
}
