//! API wrapper module

#[cfg(feature = "cli")]
pub mod cli;
