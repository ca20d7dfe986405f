//! CLI command handlers

pub mod commands;

pub use commands::{compile, generate, sheets};
