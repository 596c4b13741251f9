// LogcatLens - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: app, platform, or any file I/O.

pub mod converter;
pub mod detect;
pub mod filter;
pub mod marks;
pub mod model;
pub mod serializer;
