//! Unified error type for click-buttons.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

use core::fmt;

/// Errors raised while wiring buttons to the edge handler registry.
///
/// Click detection itself never fails; only the fixed-size handler table can
/// run out of room or be asked about a pin it does not route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Every slot of the registry is taken by other pins.
    RegistryFull {
        /// Pin that could not be routed.
        pin: u8,
    },

    /// No edge handler is attached for the pin, `begin` was never called.
    NotAttached {
        /// Pin without a handler.
        pin: u8,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RegistryFull { pin } => {
                write!(f, "no free edge handler slot for pin {}", pin)
            }
            Error::NotAttached { pin } => write!(f, "no edge handler attached to pin {}", pin),
        }
    }
}
