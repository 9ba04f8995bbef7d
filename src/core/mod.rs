// IssueTag - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, regex, serde.
// Must NOT depend on: app, platform, or perform any I/O.

pub mod compose;
pub mod extractor;
pub mod model;
