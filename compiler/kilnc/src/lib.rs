//! The Kiln driver.
//!
//! Loads a JSON declaration manifest into a declaration table and runs the
//! conformance synthesizer and the metadata planner over it. The `kiln`
//! binary is a thin shell over the commands in [`commands`].

pub mod commands;
mod error;
pub mod manifest;
mod options;
pub mod tracing_setup;

pub use error::DriverError;
pub use options::{parse_options, Options};
