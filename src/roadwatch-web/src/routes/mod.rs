//! HTTP route handlers

pub mod detect;

pub use detect::*;
