//! Criba CLI - Command-line interface for the Criba filter compiler.
//!
//! This crate provides the `criba` tool, which compiles JSON filter
//! requests into SQL `WHERE` fragments and checks them for errors.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
