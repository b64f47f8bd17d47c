//! Utility functions and helpers.

pub mod http;
pub mod log;
pub mod parse;

pub use parse::{parse_count, parse_percentage};
