//! Injected dependencies that the store must not hard-wire.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
