//! Keno domain types.
//!
//! Defines selection/draw/paytable/configuration/tier/lifetime types and constants used by the
//! execution layer and clients.

mod config;
mod constants;
mod error;
mod lifetime;
mod paytable;
mod selection;
mod tier;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use lifetime::*;
pub use paytable::*;
pub use selection::*;
pub use tier::*;

#[cfg(test)]
mod tests;
