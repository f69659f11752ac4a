//! Hardware seams the button core needs from the host platform.
//!
//! The crate never touches registers itself. A board support layer
//! implements these traits on top of its HAL and calls
//! [`Registry::dispatch`](crate::Registry::dispatch) from the pin-change
//! interrupt.

pub use embedded_hal::digital::PinState;

/// Input configuration of a button pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    /// Internal pull-up resistor enabled.
    PullUp,
    /// Internal pull-down resistor enabled.
    PullDown,
}

/// Monotonic millisecond clock.
///
/// The counter wraps at `u32::MAX`; the core only ever subtracts
/// timestamps with wrapping arithmetic.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<F> Clock for F
where
    F: Fn() -> u32,
{
    fn now_ms(&self) -> u32 {
        self()
    }
}

/// Pin I/O and edge-interrupt arming.
///
/// Methods take `&self` because the same adapter is used from the polling
/// loop and from interrupt context.
pub trait Gpio {
    /// Put `pin` into input mode with the given pull resistor.
    fn configure(&self, pin: u8, mode: InputMode);

    /// Sample the current level of `pin`.
    fn read(&self, pin: u8) -> PinState;

    /// Arm the interrupt for both edges of `pin`.
    fn enable_edge_interrupt(&self, pin: u8);

    /// Disarm the interrupt of `pin`.
    fn disable_edge_interrupt(&self, pin: u8);
}

/// Low-power mode entry.
pub trait Power {
    /// Halt the core until the next interrupt.
    fn enter_low_power_mode(&self);
}

/// [`Power`] adapter sleeping with the Cortex-M `WFI` instruction.
#[cfg(feature = "cortex-m")]
#[derive(Clone, Copy, Debug, Default)]
pub struct WaitForInterrupt;

#[cfg(feature = "cortex-m")]
impl Power for WaitForInterrupt {
    fn enter_low_power_mode(&self) {
        cortex_m::asm::wfi();
    }
}
