//! Encforge - encoder/prober toolchain resolution
//!
//! This library crate exposes the CLI's configuration and wiring for
//! integration testing.

pub mod config;
pub mod toolchain;
