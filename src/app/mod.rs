// IssueTag - app/mod.rs
//
// Application layer: profile persistence, state management, watch loop.
// Dependencies: core layer, platform traits.

pub mod profile_store;
pub mod state;
pub mod watch;
