//! Core types and definitions for MATHPOP.
//!
//! This crate defines the vocabulary shared across all other crates:
//! questions, operand ranges, difficulty tables, answer targets, commands,
//! events and state snapshots. It has no dependency on any runtime or
//! presentation framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

pub use config::ConfigError;
