//! Subcommand handlers dispatched from `main.rs`.

pub mod route;
pub mod trace;
