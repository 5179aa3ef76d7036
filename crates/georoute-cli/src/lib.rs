//! Georoute CLI library.
//!
//! Argument parsing helpers, terminal styling and output formatting shared by
//! the `georoute-cli` binary and its tests.

pub mod args;
pub mod output;
pub mod terminal;
