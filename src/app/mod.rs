// LogcatLens - app/mod.rs
//
// Application layer: session state, live feed, filter history.
// Dependencies: core layer, platform file I/O.

pub mod feed;
pub mod history;
pub mod session;
