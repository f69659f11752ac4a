//! Interrupt-driven button clicks for single-core microcontrollers.
//!
//! Turns raw edge interrupts on input pins into click, long-click and
//! simultaneous-click actions, plus wake-up from a low-power mode.
//!
//! ```text
//!   [ pin edge ] -> Registry::dispatch -> Button::on_edge -> ClickBuffer
//!                                                                |
//!   [ main loop ] -> Button::execute_actions <-------------------+
//!                        |
//!                   click / long click / simultaneous click actions
//! ```
//!
//! The pure logic builds on the host; run `cargo test` to exercise it
//! against the simulated board in the test suite. On target, implement
//! [`Clock`], [`Gpio`] and [`Power`] for the board and forward the pin-change
//! interrupt to [`Registry::dispatch`].
//!
//! Features:
//! - `defmt` - log through `defmt` and derive `defmt::Format`
//! - `cortex-m` - single-core critical section and the [`WaitForInterrupt`]
//!   power adapter

#![cfg_attr(not(test), no_std)]

// ═══════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;

mod action;
mod buffer;
mod button;
mod click;
mod error;
mod hal;
mod log;
mod power;
mod registry;

#[cfg(test)]
mod mock;

// ═══════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use action::Action;
pub use buffer::ClickBuffer;
pub use button::Button;
pub use click::{ButtonState, ClickEvent};
pub use error::Error;
pub use hal::{Clock, Gpio, InputMode, PinState, Power};
pub use power::PowerState;
pub use registry::{EdgeHandler, Registry};

#[cfg(feature = "cortex-m")]
pub use hal::WaitForInterrupt;
