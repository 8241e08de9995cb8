//! Connection profiles: load/save simple JSON mapping of profile name -> { url, interval }
//! Stored under XDG config dir: $XDG_CONFIG_HOME/sysdash/profiles.json
//! (fallback ~/.config/sysdash/profiles.json)

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProfileEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub version: u32,
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("sysdash")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sysdash")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

// A missing or unreadable file is treated as empty.
pub fn load_profiles() -> ProfilesFile {
    let path = profiles_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p)?;
    fs::write(path, data)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveProfile {
    /// Use the provided runtime inputs (not persisted). (url, interval)
    Direct(String, Option<u32>),
    /// Loaded from existing profile entry (url, interval)
    Loaded(String, Option<u32>),
    /// Should prompt user to select among profile names
    PromptSelect(Vec<String>),
    /// Should prompt user to create a new profile (name)
    PromptCreate(String),
    /// No profile could be resolved (e.g., missing arguments)
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub interval: Option<u32>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        match (self.profile_name, self.url) {
            // Only profile name given -> try load; an explicit interval wins
            (Some(name), None) => match pf.profiles.get(&name) {
                Some(entry) => {
                    ResolveProfile::Loaded(entry.url.clone(), self.interval.or(entry.interval))
                }
                None => ResolveProfile::PromptCreate(name),
            },
            // URL provided -> direct (maybe later saved by caller)
            (_, Some(u)) => ResolveProfile::Direct(u, self.interval),
            // Nothing provided -> maybe prompt select if profiles exist
            (None, None) => {
                if pf.profiles.is_empty() {
                    ResolveProfile::None
                } else {
                    ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect())
                }
            }
        }
    }
}
