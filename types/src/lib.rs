//! Common types for the keno payout engine.
//!
//! Everything here is plain data: the execution layer owns all mutation and randomness.

pub mod keno;
