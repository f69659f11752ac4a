//! Crate-wide constants and compile-time configuration.
//!
//! All timing parameters and table sizes live here so they can be tuned
//! in one place.

// Click buffer

/// Number of slots in each button's click ring buffer.
///
/// One slot always stays free to tell a full buffer from an empty one, so at
/// most `CLICK_BUFFER_SIZE - 1` clicks wait unread at any time.
pub const CLICK_BUFFER_SIZE: usize = 10;

// Timing (milliseconds)

/// Minimum press duration to count as a click.
///
/// Reserved for debouncing; the click state machine does not consult it.
pub const CLICK_DEBOUNCE_MS: u32 = 50;

/// Press duration at which a held button starts firing its long-click action.
pub const LONG_CLICK_MS: u32 = 1500;

/// Maximum distance between the presses of two paired buttons for them to
/// count as one simultaneous click.
pub const SIMULTANEOUS_CLICK_MS: u32 = 1000;

// Interrupt dispatch

/// Default number of pins an edge handler [`Registry`](crate::Registry) can
/// route.
pub const MAX_EDGE_HANDLERS: usize = 8;
