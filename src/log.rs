//! Logging shims.
//!
//! Forward to `defmt` when the `defmt` feature is enabled and expand to
//! nothing otherwise, so host builds carry no logging backend. The warning
//! shim is `warning!`, since `warn` is taken by the lint attribute.

macro_rules! debug {
    ( $($arg:tt)+ ) => (
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)+);
    );
}

macro_rules! info {
    ( $($arg:tt)+ ) => (
        #[cfg(feature = "defmt")]
        defmt::info!($($arg)+);
    );
}

macro_rules! warning {
    ( $($arg:tt)+ ) => (
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)+);
    );
}

pub(crate) use debug;
pub(crate) use info;
pub(crate) use warning;
