//! CLI module
//!
//! Command-line interface for inspecting captured SMP responses.
//!
//! # Commands
//!
//! - `decode` - Decode a payload as a hash or status response
//! - `probe` - Resolve a payload to a file length or digest
//! - `verify` - Check a hash response against a local file
//! - `algorithms` - List known hash algorithms

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, PayloadInput};
pub use runner::Runner;
