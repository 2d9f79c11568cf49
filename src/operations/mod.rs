//! Operations module
//!
//! Coordinates manifest-driven fetch runs

pub mod run;

pub use run::*;
