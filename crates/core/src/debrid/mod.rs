//! Debrid conversion: magnet to direct-playable URL.
//!
//! The [`ConversionCoordinator`] owns caching and coalescing; providers
//! such as [`RealDebridClient`] only speak their REST API.

mod config;
mod coordinator;
mod real_debrid;
mod types;

pub use config::DebridConfig;
pub use coordinator::{has_account, ConversionCoordinator, NO_ACCOUNT};
pub use real_debrid::RealDebridClient;
pub use types::*;
