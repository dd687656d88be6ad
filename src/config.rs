// src/config.rs - Tracker settings, loaded from JSON
use crate::device::DevicePolicy;
use crate::mapper::MappingRules;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_FILE: &str = "tracker.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub rules: MappingRules,
    pub policy: DevicePolicy,
    /// Starting values for the "hands" / "arms" toggles when the host has no
    /// parameters of its own.
    pub default_hands: bool,
    pub default_arms: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            rules: MappingRules::default(),
            policy: DevicePolicy::AllowPauseResume,
            default_hands: true,
            default_arms: true,
        }
    }
}

impl TrackerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Invalid tracker config {}", path.display()))?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// `explicit` if given, else the platform config file if it exists,
    /// else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "handtracker", "hand_tracker")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{BonePolicy, TipPolicy};

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hand_tracker_{}_{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: TrackerConfig = serde_json::from_str(
            r#"{ "rules": { "tip_policy": "none" }, "default_arms": false }"#,
        )
        .unwrap();

        assert_eq!(config.rules.tip_policy, TipPolicy::None);
        assert_eq!(config.rules.bone_policy, BonePolicy::SkipThumbMetacarpal);
        assert_eq!(config.policy, DevicePolicy::AllowPauseResume);
        assert!(config.default_hands);
        assert!(!config.default_arms);
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_file("ok.json", r#"{ "rules": { "bone_policy": "without_metacarpal" } }"#);
        let config = TrackerConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.rules.bone_policy, BonePolicy::WithoutMetacarpal);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let path = temp_file("bad.json", "{ rules: ");
        let err = TrackerConfig::resolve(Some(path.as_path())).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("Invalid tracker config"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("hand_tracker_definitely_missing.json");
        assert!(TrackerConfig::load(&path).is_err());
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = TrackerConfig {
            rules: MappingRules::centers(),
            ..TrackerConfig::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains("\"elbow_to_wrist\""));
        assert_eq!(serde_json::from_str::<TrackerConfig>(&text).unwrap(), config);
    }
}
