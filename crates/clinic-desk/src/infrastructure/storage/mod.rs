//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the optional TOML configuration file,
//! supplies defaults for anything it leaves out, and writes a starter file
//! for `clinic-desk init-config`.

pub mod config;
