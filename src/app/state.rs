// IssueTag - app/state.rs
//
// Application state: the loaded profiles and the current selection.
// Passed explicitly to whatever front end drives it; there are no globals.

use crate::app::profile_store::ProfileStore;
use crate::core::compose::compose;
use crate::core::extractor::{Extraction, IssueExtractor};
use crate::core::model::{Profile, ProfileMap};
use crate::util::error::ProfileStoreError;

/// Output of one convert action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// What the extractor found.
    pub extraction: Extraction,
    /// Final text: pretext, tagged issues, posttext.
    pub output: String,
    /// Profile whose framing was applied, if any.
    pub profile: Option<String>,
}

impl Conversion {
    /// True when the input contained at least one issue.
    pub fn has_issues(&self) -> bool {
        !self.extraction.is_empty()
    }
}

/// Top-level application state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// All stored profiles, refreshed after every store change.
    pub profiles: ProfileMap,

    /// Name of the selected profile (None = no framing).
    pub selected: Option<String>,
}

impl AppState {
    /// Load profiles and pre-select the last used one if it still exists.
    pub fn load(store: &ProfileStore) -> Result<Self, ProfileStoreError> {
        let profiles = store.load_all()?;
        let selected = match store.get_last_used()? {
            Some(name) if profiles.contains_key(&name) => Some(name),
            Some(name) => {
                tracing::warn!(profile = %name, "Last used profile no longer exists");
                None
            }
            None => None,
        };

        tracing::debug!(
            profiles = profiles.len(),
            selected = ?selected,
            "Application state loaded"
        );

        Ok(Self { profiles, selected })
    }

    /// The selected profile, if any.
    pub fn selected_profile(&self) -> Option<Profile> {
        let name = self.selected.as_ref()?;
        self.profiles.get(name).map(|text| Profile {
            name: name.clone(),
            text: text.clone(),
        })
    }

    /// Select a profile and remember it for the next start.
    pub fn select(&mut self, store: &ProfileStore, name: &str) -> Result<(), ProfileStoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileStoreError::EmptyName);
        }
        if !self.profiles.contains_key(name) {
            return Err(ProfileStoreError::NotFound {
                name: name.to_string(),
            });
        }
        store.set_last_used(name)?;
        self.selected = Some(name.to_string());
        Ok(())
    }

    /// Convert without any profile framing for this session only.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Save a profile through the store and refresh the in-memory copy.
    pub fn save_profile(
        &mut self,
        store: &ProfileStore,
        name: &str,
        pretext: &str,
        posttext: &str,
    ) -> Result<bool, ProfileStoreError> {
        let replaced = store.save(name, pretext, posttext)?;
        self.profiles = store.load_all()?;
        Ok(replaced)
    }

    /// Delete a profile through the store; a deleted selection is cleared.
    pub fn delete_profile(
        &mut self,
        store: &ProfileStore,
        name: &str,
    ) -> Result<(), ProfileStoreError> {
        store.delete(name)?;
        self.profiles = store.load_all()?;
        if self
            .selected
            .as_ref()
            .is_some_and(|s| !self.profiles.contains_key(s))
        {
            self.selected = None;
        }
        Ok(())
    }

    /// Extract issues from `input` and frame them with the selected profile.
    pub fn convert(&self, extractor: &IssueExtractor, input: &str) -> Conversion {
        let extraction = extractor.extract_issues(input);
        let tagged = extraction.render();
        let profile = self.selected_profile();
        let text = profile.as_ref().map(|p| &p.text);

        let output = compose(
            text.map(|t| t.pretext.as_str()),
            &tagged,
            text.map(|t| t.posttext.as_str()),
        );

        Conversion {
            extraction,
            output,
            profile: profile.map(|p| p.name),
        }
    }
}
