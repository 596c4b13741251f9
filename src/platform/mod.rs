// LogcatLens - platform/mod.rs
//
// Platform abstraction layer: config directories, config.toml, file I/O.
// Dependencies: standard library, directories crate, core value types.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
