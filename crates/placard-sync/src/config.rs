//! # Engine Configuration
//!
//! Configuration management for the sync engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PLACARD_ENABLED=false                                              │
//! │     PLACARD_SYNC_ON_FOREGROUND=false                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/placard/engine.toml (Linux)                              │
//! │     ~/Library/Application Support/io.placard.sdk/engine.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     enabled = true, sync_on_foreground = true                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # engine.toml
//! [engine]
//! enabled = true
//! sync_on_foreground = true
//!
//! [session]
//! tracking_enabled = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Engine Settings
// =============================================================================

/// Sync behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Master switch. When false, `sync()` is a no-op and no listener is
    /// ever notified.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Run one sync cycle on every foreground transition.
    #[serde(default = "default_true")]
    pub sync_on_foreground: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            enabled: true,
            sync_on_foreground: true,
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// Engagement-session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Track foreground/background engagement sessions.
    #[serde(default = "default_true")]
    pub tracking_enabled: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            tracking_enabled: true,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete engine configuration.
///
/// ## Example Config File
/// ```toml
/// [engine]
/// enabled = true
/// sync_on_foreground = true
///
/// [session]
/// tracking_enabled = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacardConfig {
    /// Sync behavior settings.
    #[serde(default)]
    pub engine: EngineSettings,

    /// Engagement-session settings.
    #[serde(default)]
    pub session: SessionSettings,
}

impl PlacardConfig {
    /// Creates a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (engine.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(enabled) = std::env::var("PLACARD_ENABLED") {
            if let Ok(v) = enabled.parse::<bool>() {
                debug!(enabled = v, "Overriding enabled flag from environment");
                self.engine.enabled = v;
            }
        }

        if let Ok(sync_fg) = std::env::var("PLACARD_SYNC_ON_FOREGROUND") {
            if let Ok(v) = sync_fg.parse::<bool>() {
                self.engine.sync_on_foreground = v;
            }
        }

        if let Ok(tracking) = std::env::var("PLACARD_SESSION_TRACKING") {
            if let Ok(v) = tracking.parse::<bool>() {
                self.session.tracking_enabled = v;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "placard", "sdk")
            .map(|dirs| dirs.config_dir().join("engine.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns true if the engine should sync at all.
    pub fn is_enabled(&self) -> bool {
        self.engine.enabled
    }

    /// Returns true if a foreground transition should trigger a sync cycle.
    pub fn sync_on_foreground(&self) -> bool {
        self.engine.enabled && self.engine.sync_on_foreground
    }

    /// Returns true if engagement sessions should be tracked.
    pub fn session_tracking_enabled(&self) -> bool {
        self.session.tracking_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlacardConfig::default();
        assert!(config.is_enabled());
        assert!(config.sync_on_foreground());
        assert!(config.session_tracking_enabled());
    }

    #[test]
    fn test_disabled_engine_suppresses_foreground_sync() {
        let mut config = PlacardConfig::default();
        config.engine.enabled = false;
        assert!(!config.sync_on_foreground());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = PlacardConfig::default();
        config.engine.sync_on_foreground = false;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[engine]"));
        assert!(toml_str.contains("[session]"));

        let parsed: PlacardConfig = toml::from_str(&toml_str).unwrap();
        assert!(parsed.engine.enabled);
        assert!(!parsed.engine.sync_on_foreground);
    }

    #[test]
    fn test_contradictory_flags_load_and_gate_via_accessor() {
        // enabled=false with sync_on_foreground=true is not a rejected
        // config; the accessor gates the foreground sync instead.
        let parsed: PlacardConfig =
            toml::from_str("[engine]\nenabled = false\nsync_on_foreground = true\n").unwrap();
        assert!(!parsed.is_enabled());
        assert!(!parsed.sync_on_foreground());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: PlacardConfig = toml::from_str("[engine]\nenabled = false\n").unwrap();
        assert!(!parsed.engine.enabled);
        assert!(parsed.engine.sync_on_foreground);
        assert!(parsed.session.tracking_enabled);
    }
}
