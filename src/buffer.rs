//! Fixed-size ring buffer of completed clicks.
//!
//! Written from the edge interrupt, drained from the polling loop. Neither
//! side ever blocks: a full buffer drops its oldest unread click to make room
//! for the new one.
//!
//! Indices:
//!   - `write` - next slot to fill
//!   - `read`  - next slot to consume
//!   - `old`   - oldest slot still holding retained data
//!   - `new`   - most recently filled slot (diagnostics only)
//!
//! The interrupt side owns `write`, `old` and `new`. The polling side owns
//! `read`, except on overflow, where the interrupt side bumps it past the
//! dropped click. Both sides move `read` with compare-and-swap, so a `pop`
//! that raced an overflow retries instead of returning a half-overwritten
//! slot.

use crate::click::{AtomicClick, ClickEvent};
use crate::log::warning;
use core::sync::atomic::{AtomicUsize, Ordering::SeqCst};

/// Lock-free single-producer single-consumer click store with `N` slots.
///
/// One slot is kept free, so at most `N - 1` clicks are unread at a time.
/// `N` must be at least 2.
#[derive(Debug)]
pub struct ClickBuffer<const N: usize> {
    slots: [AtomicClick; N],
    write: AtomicUsize,
    read: AtomicUsize,
    old: AtomicUsize,
    new: AtomicUsize,
}

impl<const N: usize> Default for ClickBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ClickBuffer<N> {
    pub const fn new() -> Self {
        #[allow(clippy::declare_interior_mutable_const)]
        const EMPTY: AtomicClick = AtomicClick::new();
        Self {
            slots: [EMPTY; N],
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
            old: AtomicUsize::new(0),
            new: AtomicUsize::new(0),
        }
    }

    /// Maximum number of unread clicks the buffer retains.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Store a click, dropping the oldest unread one if the buffer is full.
    ///
    /// Interrupt context only.
    pub fn push(&self, click: ClickEvent) {
        let write = self.write.load(SeqCst);
        self.slots[write].store(click);
        self.new.store(write, SeqCst);

        let next = (write + 1) % N;
        if next == self.old.load(SeqCst) {
            self.old.store((next + 1) % N, SeqCst);
        }
        if self
            .read
            .compare_exchange(next, (next + 1) % N, SeqCst, SeqCst)
            .is_ok()
        {
            warning!("click buffer overflow, dropped click in slot {}", next);
        }
        self.write.store(next, SeqCst);
    }

    /// Number of unread clicks.
    pub fn available(&self) -> usize {
        let write = self.write.load(SeqCst);
        let read = self.read.load(SeqCst);
        (write + N - read) % N
    }

    pub fn is_empty(&self) -> bool {
        self.available() == 0
    }

    /// Take the next unread click.
    ///
    /// Returns [`ClickEvent::empty`] and leaves every index untouched when
    /// nothing is available.
    pub fn pop(&self) -> ClickEvent {
        loop {
            let read = self.read.load(SeqCst);
            if read == self.write.load(SeqCst) {
                return ClickEvent::empty();
            }
            let click = self.slots[read].load();
            if self
                .read
                .compare_exchange(read, (read + 1) % N, SeqCst, SeqCst)
                .is_ok()
            {
                return click;
            }
        }
    }

    /// Discard every unread click.
    pub fn reset(&self) {
        self.write.store(0, SeqCst);
        self.read.store(0, SeqCst);
        self.old.store(0, SeqCst);
        self.new.store(0, SeqCst);
    }

    pub fn write_index(&self) -> usize {
        self.write.load(SeqCst)
    }

    pub fn read_index(&self) -> usize {
        self.read.load(SeqCst)
    }

    pub fn oldest_index(&self) -> usize {
        self.old.load(SeqCst)
    }

    pub fn newest_index(&self) -> usize {
        self.new.load(SeqCst)
    }
}
