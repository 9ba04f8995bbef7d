// IssueTag - app/profile_store.rs
//
// Persistence for named (pretext, posttext) profiles and the last-used
// profile name.
//
// Design principles:
// - The whole mapping lives in one JSON file, read fully on load and
//   rewritten fully on every change. No partial updates, no locking:
//   a single user runs a single process.
// - Writes are atomic (write→temp, rename→final) so a crash mid-save
//   never corrupts the previous good store.
// - A missing file is an empty store (first run). A malformed file is an
//   error: overwriting it would silently discard the user's profiles.
// - The last-used name is a plain-text file of its own so it can change
//   without touching the profile mapping.

use crate::core::model::{Profile, ProfileMap, ProfileText};
use crate::util::constants;
use crate::util::error::ProfileStoreError;
use std::io;
use std::path::{Path, PathBuf};

/// File-backed profile store rooted in a data directory.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    profiles_path: PathBuf,
    last_used_path: PathBuf,
}

impl ProfileStore {
    /// Store using the standard file names inside `data_dir`.
    ///
    /// Nothing is created until the first write.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            profiles_path: data_dir.join(constants::PROFILES_FILE_NAME),
            last_used_path: data_dir.join(constants::LAST_PROFILE_FILE_NAME),
        }
    }

    pub fn profiles_path(&self) -> &Path {
        &self.profiles_path
    }

    pub fn last_used_path(&self) -> &Path {
        &self.last_used_path
    }

    /// Load every stored profile. A missing store is empty.
    pub fn load_all(&self) -> Result<ProfileMap, ProfileStoreError> {
        let path = &self.profiles_path;

        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No profile store yet; starting empty");
                return Ok(ProfileMap::new());
            }
            Err(e) => return Err(io_error(path, "stat", e)),
        };

        if metadata.len() > constants::MAX_PROFILE_STORE_SIZE {
            return Err(ProfileStoreError::FileTooLarge {
                path: path.clone(),
                size: metadata.len(),
                max_size: constants::MAX_PROFILE_STORE_SIZE,
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| io_error(path, "read", e))?;

        // An empty file is what an interrupted first save leaves behind on
        // some filesystems; treat it like a missing store.
        if content.trim().is_empty() {
            return Ok(ProfileMap::new());
        }

        let profiles: ProfileMap =
            serde_json::from_str(&content).map_err(|e| ProfileStoreError::Json {
                path: path.clone(),
                source: e,
            })?;

        tracing::debug!(count = profiles.len(), "Profiles loaded");
        Ok(profiles)
    }

    /// Load a single profile by name.
    pub fn get(&self, name: &str) -> Result<Profile, ProfileStoreError> {
        let name = validate_name(name)?;
        let mut profiles = self.load_all()?;
        let text = profiles
            .remove(name)
            .ok_or_else(|| ProfileStoreError::NotFound {
                name: name.to_string(),
            })?;
        Ok(Profile {
            name: name.to_string(),
            text,
        })
    }

    /// Insert or overwrite a profile and persist the full mapping.
    ///
    /// Returns true when an existing profile was replaced.
    pub fn save(
        &self,
        name: &str,
        pretext: &str,
        posttext: &str,
    ) -> Result<bool, ProfileStoreError> {
        let name = validate_name(name)?;
        let mut profiles = self.load_all()?;
        let replaced = profiles
            .insert(name.to_string(), ProfileText::new(pretext, posttext))
            .is_some();
        self.write_all(&profiles)?;

        tracing::info!(profile = name, replaced, "Profile saved");
        Ok(replaced)
    }

    /// Remove a profile and persist. Unknown names are reported, not ignored.
    ///
    /// Deleting the last-used profile also clears the last-used marker.
    pub fn delete(&self, name: &str) -> Result<(), ProfileStoreError> {
        let name = validate_name(name)?;
        let mut profiles = self.load_all()?;
        if profiles.remove(name).is_none() {
            return Err(ProfileStoreError::NotFound {
                name: name.to_string(),
            });
        }
        // Read before writing so a failure here leaves the store untouched.
        let was_last_used = self.get_last_used()?.as_deref() == Some(name);
        self.write_all(&profiles)?;

        if was_last_used {
            self.clear_last_used()?;
        }

        tracing::info!(profile = name, "Profile deleted");
        Ok(())
    }

    /// Record `name` as the profile to pre-select at next startup.
    pub fn set_last_used(&self, name: &str) -> Result<(), ProfileStoreError> {
        let name = validate_name(name)?;
        write_atomic(&self.last_used_path, name.as_bytes())?;
        tracing::debug!(profile = name, "Last used profile recorded");
        Ok(())
    }

    /// The last-used profile name, if one was recorded.
    pub fn get_last_used(&self) -> Result<Option<String>, ProfileStoreError> {
        match std::fs::read_to_string(&self.last_used_path) {
            Ok(content) => {
                let name = content.trim();
                Ok((!name.is_empty()).then(|| name.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&self.last_used_path, "read", e)),
        }
    }

    /// Forget the last-used profile.
    pub fn clear_last_used(&self) -> Result<(), ProfileStoreError> {
        match std::fs::remove_file(&self.last_used_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&self.last_used_path, "remove", e)),
        }
    }

    fn write_all(&self, profiles: &ProfileMap) -> Result<(), ProfileStoreError> {
        let json =
            serde_json::to_string_pretty(profiles).map_err(|e| ProfileStoreError::Json {
                path: self.profiles_path.clone(),
                source: e,
            })?;
        write_atomic(&self.profiles_path, json.as_bytes())
    }
}

/// Trim and check a profile name.
fn validate_name(name: &str) -> Result<&str, ProfileStoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProfileStoreError::EmptyName);
    }
    let length = name.chars().count();
    if length > constants::MAX_PROFILE_NAME_LEN {
        return Err(ProfileStoreError::NameTooLong {
            length,
            max_length: constants::MAX_PROFILE_NAME_LEN,
        });
    }
    Ok(name)
}

/// Write `bytes` to `path` atomically (write temp → rename), creating parent
/// directories as needed.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ProfileStoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, "create directory", e))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    std::fs::write(&tmp, bytes).map_err(|e| io_error(&tmp, "write", e))?;

    std::fs::rename(&tmp, path).map_err(|e| {
        // Clean up the temp file on failure; ignore any secondary error.
        let _ = std::fs::remove_file(&tmp);
        io_error(path, "rename", e)
    })?;

    tracing::debug!(path = %path.display(), "Store file written");
    Ok(())
}

fn io_error(path: &Path, operation: &'static str, source: io::Error) -> ProfileStoreError {
    ProfileStoreError::Io {
        path: path.to_path_buf(),
        operation,
        source,
    }
}

// =============================================================================
// Unit tests
// =============================================================================
