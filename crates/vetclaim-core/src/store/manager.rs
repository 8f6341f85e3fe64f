use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::crypto;
use crate::models::UserProfile;

const PLAIN_EXT: &str = "json";
const SEALED_EXT: &str = "sealed";

/// A profile document with the time it was last written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProfile {
    pub profile: UserProfile,
    pub saved_at: DateTime<Utc>,
}

impl StoredProfile {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            saved_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.saved_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// One JSON document per user under `<data_dir>/profiles/`.
///
/// With a passphrase, documents are sealed and written as `<id>.sealed`;
/// without one they are plain `<id>.json`.
pub struct ProfileStore {
    profiles_dir: PathBuf,
    passphrase: Option<String>,
}

impl ProfileStore {
    pub fn new(data_dir: &Path) -> Result<Self> {
        let profiles_dir = data_dir.join("profiles");
        std::fs::create_dir_all(&profiles_dir)
            .with_context(|| format!("Failed to create profile directory: {}", profiles_dir.display()))?;
        Ok(Self {
            profiles_dir,
            passphrase: None,
        })
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    pub fn is_sealing(&self) -> bool {
        self.passphrase.is_some()
    }

    fn check_user_id(user_id: &str) -> Result<()> {
        let ok = !user_id.is_empty()
            && !user_id.starts_with('.')
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'));
        if !ok {
            bail!("Invalid user id: {:?}", user_id);
        }
        Ok(())
    }

    fn profile_path(&self, user_id: &str, ext: &str) -> PathBuf {
        self.profiles_dir.join(format!("{}.{}", user_id, ext))
    }

    /// Whether the user's document exists sealed on disk.
    pub fn is_sealed(&self, user_id: &str) -> bool {
        self.profile_path(user_id, SEALED_EXT).exists()
    }

    pub fn exists(&self, user_id: &str) -> bool {
        self.is_sealed(user_id) || self.profile_path(user_id, PLAIN_EXT).exists()
    }

    pub fn load(&self, user_id: &str) -> Result<Option<StoredProfile>> {
        Self::check_user_id(user_id)?;

        let sealed_path = self.profile_path(user_id, SEALED_EXT);
        let plain_path = self.profile_path(user_id, PLAIN_EXT);

        let contents = if sealed_path.exists() {
            let Some(passphrase) = self.passphrase.as_deref() else {
                bail!("Profile '{}' is sealed; a passphrase is required", user_id);
            };
            let bytes = std::fs::read(&sealed_path)
                .with_context(|| format!("Failed to read profile: {}", user_id))?;
            crypto::unseal(&bytes, passphrase)
                .with_context(|| format!("Failed to unseal profile: {}", user_id))?
        } else if plain_path.exists() {
            std::fs::read(&plain_path).with_context(|| format!("Failed to read profile: {}", user_id))?
        } else {
            return Ok(None);
        };

        let mut stored: StoredProfile = serde_json::from_slice(&contents)
            .with_context(|| format!("Failed to parse profile: {}", user_id))?;
        let reassigned = stored.profile.dedupe_record_ids();
        if reassigned > 0 {
            warn!(user_id, reassigned, "Profile had duplicate record ids");
        }
        debug!(user_id, age = %stored.age_display(), "Loaded profile");
        Ok(Some(stored))
    }

    pub fn load_or_create(&self, user_id: &str, create: impl FnOnce() -> UserProfile) -> Result<UserProfile> {
        match self.load(user_id)? {
            Some(stored) => Ok(stored.profile),
            None => {
                let mut profile = create();
                profile.id = user_id.to_string();
                self.save(&profile)?;
                Ok(profile)
            }
        }
    }

    /// Write the profile, replacing any previous document in one rename.
    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        Self::check_user_id(&profile.id)?;

        let stored = StoredProfile::new(profile.clone());
        let json = serde_json::to_vec_pretty(&stored)?;

        let (bytes, ext, stale_ext) = match self.passphrase.as_deref() {
            Some(passphrase) => (crypto::seal(&json, passphrase)?, SEALED_EXT, PLAIN_EXT),
            None => {
                if self.is_sealed(&profile.id) {
                    warn!(user_id = %profile.id, "Replacing sealed profile with plain JSON");
                }
                (json, PLAIN_EXT, SEALED_EXT)
            }
        };

        let path = self.profile_path(&profile.id, ext);
        // The temp file is deleted when dropped on any error path
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", profile.id))
            .suffix(".tmp")
            .tempfile_in(&self.profiles_dir)
            .with_context(|| format!("Failed to create temp file for profile: {}", profile.id))?;
        tmp.write_all(&bytes)
            .with_context(|| format!("Failed to write profile: {}", profile.id))?;
        tmp.persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace profile: {}", profile.id))?;

        let stale = self.profile_path(&profile.id, stale_ext);
        if stale.exists() {
            std::fs::remove_file(&stale)
                .with_context(|| format!("Failed to remove old profile file: {}", stale.display()))?;
        }

        debug!(user_id = %profile.id, sealed = self.is_sealing(), "Saved profile");
        Ok(())
    }

    /// Load, edit and save in one step. The edit's error aborts without writing.
    pub fn update<R>(
        &self,
        user_id: &str,
        edit: impl FnOnce(&mut UserProfile) -> Result<R>,
    ) -> Result<R> {
        let Some(stored) = self.load(user_id)? else {
            bail!("No profile for user '{}'. Run `vetclaim profile init` first.", user_id);
        };
        let mut profile = stored.profile;
        let out = edit(&mut profile)?;
        profile.touch();
        self.save(&profile)?;
        Ok(out)
    }

    /// Returns false if there was nothing to delete.
    pub fn delete(&self, user_id: &str) -> Result<bool> {
        Self::check_user_id(user_id)?;
        let mut removed = false;
        for ext in [PLAIN_EXT, SEALED_EXT] {
            let path = self.profile_path(user_id, ext);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to delete profile: {}", user_id))?;
                removed = true;
            }
        }
        Ok(removed)
    }

    pub fn list_users(&self) -> Result<Vec<String>> {
        let mut users = Vec::new();
        let entries = std::fs::read_dir(&self.profiles_dir)
            .with_context(|| format!("Failed to list {}", self.profiles_dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            let is_profile = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some(PLAIN_EXT) | Some(SEALED_EXT)
            );
            let stem = path.file_stem().and_then(|s| s.to_str());
            if let (true, Some(stem)) = (is_profile, stem) {
                if !stem.starts_with('.') {
                    users.push(stem.to_string());
                }
            }
        }
        users.sort();
        users.dedup();
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::new(dir.path()).expect("store");
        (dir, store)
    }

    #[test]
    fn test_stored_profile_age_display() {
        let mut stored = StoredProfile::new(UserProfile::default());
        assert_eq!(stored.age_display(), "just now");
        stored.saved_at = Utc::now() - Duration::minutes(90);
        assert_eq!(stored.age_display(), "2h ago");
        stored.saved_at = Utc::now() - Duration::days(3);
        assert_eq!(stored.age_display(), "3d ago");
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = store();
        let mut profile = UserProfile::new("u-1", "jdoe", "j@example.com");
        profile.add_disability("Tinnitus", 10).expect("add");
        store.save(&profile).expect("save");

        let loaded = store.load("u-1").expect("load").expect("present");
        assert_eq!(loaded.profile, profile);
        assert!(store.load("missing").expect("load").is_none());
    }

    #[test]
    fn test_save_replaces_previous_document() {
        let (dir, store) = store();
        let mut profile = UserProfile::new("u-1", "jdoe", "j@example.com");
        store.save(&profile).expect("save");
        profile.email = "new@example.com".into();
        store.save(&profile).expect("save again");

        let loaded = store.load("u-1").expect("load").expect("present");
        assert_eq!(loaded.profile.email, "new@example.com");

        // No temp files left behind
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("profiles"))
            .expect("read dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    fn temp_files(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir.join("profiles"))
            .expect("read dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_failed_replace_leaves_no_temp_file() {
        let (dir, store) = store();
        // A directory where the document should go makes the final rename fail
        std::fs::create_dir(dir.path().join("profiles").join("u-1.json")).expect("mkdir");

        let profile = UserProfile::new("u-1", "jdoe", "j@example.com");
        assert!(store.save(&profile).is_err());
        assert!(temp_files(dir.path()).is_empty());
    }

    #[test]
    fn test_concurrent_saves_do_not_share_a_temp_file() {
        let (dir, store) = store();
        std::thread::scope(|scope| {
            for n in 0..4 {
                let store = &store;
                scope.spawn(move || {
                    for i in 0..10 {
                        let mut profile = UserProfile::new("u-1", "jdoe", "j@example.com");
                        profile.email = format!("{}-{}@example.com", n, i);
                        store.save(&profile).expect("concurrent save");
                    }
                });
            }
        });

        let loaded = store.load("u-1").expect("load").expect("present");
        assert!(loaded.profile.email.ends_with("@example.com"));
        assert!(temp_files(dir.path()).is_empty());
    }

    #[test]
    fn test_load_reassigns_colliding_record_ids() {
        let (dir, store) = store();
        let document = r#"{
            "profile": {
                "id": "u-1",
                "disabilities": [
                    {"id": 1700000000000.123, "name": "Tinnitus", "rating": 10},
                    {"id": 1700000000000.877, "name": "PTSD", "rating": 50}
                ]
            },
            "saved_at": "2024-01-01T00:00:00Z"
        }"#;
        std::fs::write(dir.path().join("profiles").join("u-1.json"), document).expect("write");

        let id = store
            .update("u-1", |p| {
                let ptsd = p.disabilities[1].id;
                assert_ne!(ptsd, p.disabilities[0].id);
                p.remove_disability(ptsd)?;
                Ok(ptsd)
            })
            .expect("update");
        let loaded = store.load("u-1").expect("load").expect("present");
        let names: Vec<&str> = loaded.profile.disabilities.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Tinnitus"]);
        assert!(loaded.profile.disabilities.iter().all(|d| d.id != id));
    }

    #[test]
    fn test_update_and_delete() {
        let (_dir, store) = store();
        assert!(store.update("u-2", |_| Ok(())).is_err());

        store
            .load_or_create("u-2", || UserProfile::new("ignored", "vet", "v@example.com"))
            .expect("create");
        let id = store
            .update("u-2", |p| Ok(p.add_disability("PTSD", 70)?))
            .expect("update");
        let loaded = store.load("u-2").expect("load").expect("present");
        assert_eq!(loaded.profile.id, "u-2");
        assert_eq!(loaded.profile.disabilities[0].id, id);

        // A failing edit leaves the document untouched
        assert!(store.update("u-2", |p| Ok(p.add_disability("", 10)?)).is_err());
        let loaded = store.load("u-2").expect("load").expect("present");
        assert_eq!(loaded.profile.disabilities.len(), 1);

        assert!(store.delete("u-2").expect("delete"));
        assert!(!store.delete("u-2").expect("delete again"));
    }

    #[test]
    fn test_list_users() {
        let (_dir, store) = store();
        for id in ["b-user", "a-user"] {
            store.save(&UserProfile::new(id, id, "")).expect("save");
        }
        assert_eq!(store.list_users().expect("list"), vec!["a-user", "b-user"]);
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let (_dir, store) = store();
        assert!(store.load("../etc/passwd").is_err());
        assert!(store.save(&UserProfile::new("a/b", "x", "")).is_err());
        assert!(store.load("").is_err());
    }

    #[test]
    fn test_sealed_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sealed = ProfileStore::new(dir.path()).expect("store").with_passphrase("hunter2");
        let profile = UserProfile::new("u-3", "vet", "v@example.com");
        sealed.save(&profile).expect("save sealed");
        assert!(sealed.is_sealed("u-3"));

        let loaded = sealed.load("u-3").expect("load").expect("present");
        assert_eq!(loaded.profile.email, "v@example.com");

        let raw = std::fs::read(dir.path().join("profiles").join("u-3.sealed")).expect("read raw");
        assert!(!String::from_utf8_lossy(&raw).contains("v@example.com"));
    }

    #[test]
    fn test_sealed_needs_right_passphrase() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = UserProfile::new("u-4", "vet", "v@example.com");
        ProfileStore::new(dir.path())
            .expect("store")
            .with_passphrase("right")
            .save(&profile)
            .expect("save");

        let wrong = ProfileStore::new(dir.path()).expect("store").with_passphrase("wrong");
        assert!(wrong.load("u-4").is_err());

        let none = ProfileStore::new(dir.path()).expect("store");
        assert!(none.load("u-4").is_err());
    }

    #[test]
    fn test_sealing_removes_plain_copy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = UserProfile::new("u-5", "vet", "");
        ProfileStore::new(dir.path()).expect("store").save(&profile).expect("save plain");
        let sealed = ProfileStore::new(dir.path()).expect("store").with_passphrase("pw");
        sealed.save(&profile).expect("save sealed");
        assert!(!dir.path().join("profiles").join("u-5.json").exists());
        assert_eq!(sealed.list_users().expect("list"), vec!["u-5"]);
    }
}
