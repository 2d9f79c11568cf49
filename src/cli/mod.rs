//! CLI interface module
//!
//! Defines the command-line argument structure

pub mod args;

pub use args::*;
