//! Core run bookkeeping

pub mod round;

pub use round::RoundClock;
