//! Per-button click state machine.
//!
//! A [`Button`] is shared between two execution contexts:
//!
//! - **Interrupt context** runs [`Button::on_edge`] on every level change of
//!   the pin. It timestamps presses, finalizes clicks on release and pushes
//!   them into the click buffer. It never runs user actions.
//! - **Polling context** runs [`Button::execute_actions`] once per main-loop
//!   cycle. It drains the click buffer and runs the attached actions.
//!
//! State written by the interrupt lives in atomics; configuration written
//! rarely (actions, partner) lives behind `critical_section::Mutex`.
//!
//! ## Usage
//!
//! ```
//! use click_buttons::{Button, InputMode, Registry};
//!
//! static BUTTON: Button = Button::new(2, InputMode::PullUp);
//! static REGISTRY: Registry = Registry::new();
//!
//! fn on_click() {}
//!
//! BUTTON.attach_click_action(&on_click);
//! // BUTTON.begin(&REGISTRY, &board)?;
//! // loop { BUTTON.execute_actions(&board); }
//! ```

mod dispatch;
mod simultaneous;

use crate::action::{Action, ActionSlot};
use crate::buffer::ClickBuffer;
use crate::click::{AtomicButtonState, AtomicClick, ButtonState, ClickEvent};
use crate::config::CLICK_BUFFER_SIZE;
use crate::error::Error;
use crate::hal::{Clock, Gpio, InputMode, PinState};
use crate::log::info;
use crate::registry::{EdgeHandler, Registry};
use core::cell::Cell;
use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering::SeqCst};
use critical_section::Mutex;

/// A push button wired to one interrupt-capable input pin.
///
/// Meant to live in a `static` for the whole program; partner and edge
/// handler routes refer to it by `&'static` reference.
pub struct Button {
    pin: u8,
    mode: InputMode,

    state: AtomicButtonState,
    last_state: AtomicButtonState,

    /// Press in progress. Only meaningful while `state` is `Pressed`.
    current_click: AtomicClick,
    last_click: AtomicClick,
    clicks: ClickBuffer<CLICK_BUFFER_SIZE>,
    clicks_count: AtomicU32,

    partner: Mutex<Cell<Option<&'static Button>>>,
    coordinator_owner: AtomicBool,
    pending_simultaneous: AtomicBool,

    pub(crate) sleeping: AtomicBool,

    click_action: ActionSlot,
    long_click_action: ActionSlot,
    simultaneous_click_action: ActionSlot,
    pub(crate) awake_routine: ActionSlot,
}

impl Button {
    pub const fn new(pin: u8, mode: InputMode) -> Self {
        Self {
            pin,
            mode,
            state: AtomicButtonState::new(),
            last_state: AtomicButtonState::new(),
            current_click: AtomicClick::new(),
            last_click: AtomicClick::new(),
            clicks: ClickBuffer::new(),
            clicks_count: AtomicU32::new(0),
            partner: Mutex::new(Cell::new(None)),
            coordinator_owner: AtomicBool::new(false),
            pending_simultaneous: AtomicBool::new(false),
            sleeping: AtomicBool::new(false),
            click_action: ActionSlot::new(),
            long_click_action: ActionSlot::new(),
            simultaneous_click_action: ActionSlot::new(),
            awake_routine: ActionSlot::new(),
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Configure the pin, seed the state from one synchronous read and start
    /// routing its edges to this button.
    pub fn begin<H, const N: usize>(
        &'static self,
        registry: &Registry<N>,
        hal: &H,
    ) -> Result<(), Error>
    where
        H: Clock + Gpio,
    {
        hal.configure(self.pin, self.mode);
        let state = state_for(hal.read(self.pin));
        self.state.set(state);
        if state == ButtonState::Pressed {
            self.current_click.set_timestamp(hal.now_ms());
        }

        critical_section::with(|cs| -> Result<(), Error> {
            hal.disable_edge_interrupt(self.pin);
            registry.attach_in(cs, self.pin, EdgeHandler::Click(self))?;
            hal.enable_edge_interrupt(self.pin);
            Ok(())
        })?;

        info!("Button: pin {} ready, {}", self.pin, state);
        Ok(())
    }

    // ════════════════════════════════════════════════════════════════════
    // Interrupt context
    // ════════════════════════════════════════════════════════════════════

    /// Edge interrupt handler: sample the clock and the pin, then advance the
    /// state machine.
    pub fn on_edge<H>(&self, hal: &H)
    where
        H: Clock + Gpio,
    {
        let now = hal.now_ms();
        let level = hal.read(self.pin);
        self.transition(now, level);
    }

    /// Advance the state machine with a level sampled at `now`.
    ///
    /// A high level is a press. A press starts a new click and checks the
    /// partner for a simultaneous press; anything else completes the click.
    pub fn transition(&self, now: u32, level: PinState) {
        self.last_state.set(self.state.get());
        let state = state_for(level);
        self.state.set(state);

        if state == ButtonState::Pressed {
            self.current_click.set_timestamp(now);
            self.check_simultaneous_click();
        } else {
            self.finalize_click(now);
        }
    }

    fn finalize_click(&self, now: u32) {
        let timestamp = self.current_click.timestamp();
        let click = ClickEvent {
            timestamp,
            duration: now.wrapping_sub(timestamp),
            simultaneous: self.pending_simultaneous.load(SeqCst),
        };

        self.clicks.push(click);
        self.last_click.store(click);
        self.current_click.clear();
        self.pending_simultaneous.store(false, SeqCst);
        self.clicks_count.fetch_add(1, SeqCst);
    }

    // ════════════════════════════════════════════════════════════════════
    // State queries
    // ════════════════════════════════════════════════════════════════════

    pub fn state(&self) -> ButtonState {
        self.state.get()
    }

    pub fn last_state(&self) -> ButtonState {
        self.last_state.get()
    }

    pub fn is_pressed(&self) -> bool {
        self.state() == ButtonState::Pressed
    }

    pub fn is_released(&self) -> bool {
        self.state() == ButtonState::Released
    }

    /// Total number of completed clicks since construction.
    pub fn clicks_count(&self) -> u32 {
        self.clicks_count.load(SeqCst)
    }

    /// Press time of the click in progress, 0 when there is none.
    pub fn current_click_timestamp(&self) -> u32 {
        self.current_click.timestamp()
    }

    /// How long the button has been held so far, 0 when it is not pressed.
    pub fn current_click_duration<C: Clock>(&self, clock: &C) -> u32 {
        if self.is_pressed() {
            clock.now_ms().wrapping_sub(self.current_click.timestamp())
        } else {
            0
        }
    }

    /// Most recently completed click, kept after it leaves the buffer.
    pub fn last_click(&self) -> ClickEvent {
        self.last_click.load()
    }

    pub fn last_click_timestamp(&self) -> u32 {
        self.last_click().timestamp
    }

    pub fn last_click_duration(&self) -> u32 {
        self.last_click().duration
    }

    /// Time since the last release, 0 while the button is not released.
    pub fn release_duration<C: Clock>(&self, clock: &C) -> u32 {
        if !self.is_released() {
            return 0;
        }
        let last = self.last_click();
        clock
            .now_ms()
            .wrapping_sub(last.timestamp.wrapping_add(last.duration))
    }

    // ════════════════════════════════════════════════════════════════════
    // Click buffer
    // ════════════════════════════════════════════════════════════════════

    /// Completed clicks not yet consumed.
    pub fn available_clicks(&self) -> usize {
        self.clicks.available()
    }

    /// Consume the oldest unread click, or the empty click if there is none.
    pub fn take_click(&self) -> ClickEvent {
        self.clicks.pop()
    }

    /// Drop every unread click.
    pub fn wipe_clicks(&self) {
        self.clicks.reset();
    }

    /// Slot of the oldest click the buffer still holds. Moves only when a
    /// push wraps onto it, so it shows where overflows last dropped data.
    pub fn oldest_click_slot(&self) -> usize {
        self.clicks.oldest_index()
    }

    // ════════════════════════════════════════════════════════════════════
    // Actions
    // ════════════════════════════════════════════════════════════════════

    /// Run `action` for every short click.
    pub fn attach_click_action(&self, action: &'static dyn Action) {
        self.click_action.set(Some(action));
    }

    /// Run `action` on every dispatch cycle while the button is held past the
    /// long-click threshold.
    pub fn attach_long_click_action(&self, action: &'static dyn Action) {
        self.long_click_action.set(Some(action));
    }
}

fn state_for(level: PinState) -> ButtonState {
    match level {
        PinState::High => ButtonState::Pressed,
        PinState::Low => ButtonState::Released,
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("pin", &self.pin)
            .field("mode", &self.mode)
            .field("state", &self.state())
            .field("available_clicks", &self.available_clicks())
            .field("clicks_count", &self.clicks_count())
            .finish()
    }
}
