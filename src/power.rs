//! Sleep and wake-up through a button.
//!
//! A sleeping button keeps recording edges, but its pin routes to a wake
//! handler instead of the normal one. The first edge after [`Button::sleep`]
//! restores normal routing and runs the awake routine:
//!
//! ```text
//!   Awake --sleep()--> Sleeping --edge--> [transition, restore Click] --> Awake
//!                                                                  |
//!                                                            awake routine
//! ```

use crate::action::Action;
use crate::button::Button;
use crate::error::Error;
use crate::hal::{Clock, Gpio, Power};
use crate::log::{info, warning};
use crate::registry::{EdgeHandler, Registry};
use core::sync::atomic::Ordering::SeqCst;

/// Power state of a button's wake routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Edges route to the normal click handler.
    Awake,
    /// Edges route to the wake handler.
    Sleeping,
}

impl Button {
    /// Run `action` from the wake handler, right after normal routing is
    /// restored.
    ///
    /// Runs in interrupt context; keep it short.
    pub fn attach_awake_routine(&self, action: &'static dyn Action) {
        self.awake_routine.set(Some(action));
    }

    pub fn power_state(&self) -> PowerState {
        if self.is_sleeping() {
            PowerState::Sleeping
        } else {
            PowerState::Awake
        }
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping.load(SeqCst)
    }

    /// Route the next edge of this button's pin to the wake handler.
    ///
    /// The button must have been started with [`Button::begin`]. Entering the
    /// low-power mode is left to the caller, see
    /// [`Button::sleep_until_woken`].
    pub fn sleep<G, const N: usize>(
        &'static self,
        registry: &Registry<N>,
        gpio: &G,
    ) -> Result<(), Error>
    where
        G: Gpio,
    {
        let pin = self.pin();
        critical_section::with(|cs| -> Result<(), Error> {
            if registry.detach_in(cs, pin).is_none() {
                return Err(Error::NotAttached { pin });
            }
            gpio.disable_edge_interrupt(pin);
            registry.attach_in(cs, pin, EdgeHandler::Wake(self))?;
            // A pending edge may fire as soon as the pin is armed.
            self.sleeping.store(true, SeqCst);
            gpio.enable_edge_interrupt(pin);
            Ok(())
        })?;

        info!("Power: pin {} armed for wake-up", pin);
        Ok(())
    }

    /// [`Button::sleep`], then enter the low-power mode.
    ///
    /// Returns once the core is running again.
    pub fn sleep_until_woken<H, const N: usize>(
        &'static self,
        registry: &Registry<N>,
        hal: &H,
    ) -> Result<(), Error>
    where
        H: Gpio + Power,
    {
        self.sleep(registry, hal)?;
        hal.enter_low_power_mode();
        Ok(())
    }

    /// Wake handler: record the edge, put the normal handler back, then run
    /// the awake routine.
    pub fn on_wake_edge<H, const N: usize>(&'static self, registry: &Registry<N>, hal: &H)
    where
        H: Clock + Gpio,
    {
        self.on_edge(hal);

        let pin = self.pin();
        let restored = critical_section::with(|cs| {
            hal.disable_edge_interrupt(pin);
            registry.detach_in(cs, pin);
            hal.configure(pin, self.mode());
            let restored = registry.attach_in(cs, pin, EdgeHandler::Click(self));
            hal.enable_edge_interrupt(pin);
            restored
        });
        if restored.is_err() {
            warning!("Power: pin {} lost its click handler on wake-up", pin);
        }

        self.sleeping.store(false, SeqCst);
        info!("Power: woken by pin {}", pin);
        self.awake_routine.invoke();
    }
}
