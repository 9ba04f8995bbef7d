// IssueTag - core/model.rs
//
// Core data types shared across layers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Boilerplate framing stored under a profile name.
///
/// This is the on-disk value shape in `profiles.json`; the name is the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileText {
    /// Text placed before the tagged issues.
    #[serde(default)]
    pub pretext: String,

    /// Text placed after the tagged issues.
    #[serde(default)]
    pub posttext: String,
}

impl ProfileText {
    pub fn new(pretext: impl Into<String>, posttext: impl Into<String>) -> Self {
        Self {
            pretext: pretext.into(),
            posttext: posttext.into(),
        }
    }
}

/// All stored profiles keyed by name, in name order.
pub type ProfileMap = BTreeMap<String, ProfileText>;

/// A profile together with its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub text: ProfileText,
}
