//! Roadwatch core library
//!
//! Configuration and logging shared by the `roadwatch` binary.

pub mod colored_logger;
pub mod config;
