// IssueTag - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories, arboard, toml.
// Must NOT depend on: core, app.

pub mod clipboard;
pub mod config;
