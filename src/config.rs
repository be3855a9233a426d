//! Launcher gesture configuration
//!
//! Loaded once from `config.toml`:
//!
//! ```toml
//! [gestures]
//! swipe_distance = 100.0
//! double_tap_window_ms = 300
//!
//! [bindings]
//! swipe_up = "show_app_list"
//! double_tap = "lock_screen"
//!
//! [policy]
//! settings_lock = true
//!
//! [commands]
//! lock_screen = "loginctl lock-session"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::actions::{ActionBinding, CommandTable, DispatchPolicy};
use crate::error::{Error, Result};
use crate::input::GestureConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default)]
    pub gestures: GestureConfig,

    #[serde(default = "ActionBinding::launcher_defaults")]
    pub bindings: ActionBinding,

    #[serde(default)]
    pub policy: DispatchPolicy,

    #[serde(default)]
    pub commands: CommandTable,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            gestures: GestureConfig::default(),
            bindings: ActionBinding::launcher_defaults(),
            policy: DispatchPolicy::default(),
            commands: CommandTable::default(),
        }
    }
}

impl LauncherConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
            .join("launcher-gestures/config.toml")
    }

    /// Load config from `path`, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::from_toml(&contents).map_err(|e| match e {
                    Error::ConfigParse { source, .. } => Error::ConfigParse {
                        path: path.to_path_buf(),
                        source,
                    },
                    other => other,
                })?;
                tracing::info!("Loaded gesture config from {:?}", path);
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(source) => Err(Error::ConfigRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|source| Error::ConfigParse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject thresholds and command names that cannot work
    pub fn validate(&self) -> Result<()> {
        let g = &self.gestures;
        if !(g.swipe_distance.is_finite() && g.swipe_distance >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "swipe_distance must be a non-negative number, got {}",
                g.swipe_distance
            )));
        }
        if !(g.swipe_velocity.is_finite() && g.swipe_velocity >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "swipe_velocity must be a non-negative number, got {}",
                g.swipe_velocity
            )));
        }
        if !(g.jitter_tolerance.is_finite() && g.jitter_tolerance >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "jitter_tolerance must be a non-negative number, got {}",
                g.jitter_tolerance
            )));
        }
        if g.double_tap_window_ms == 0 {
            return Err(Error::InvalidConfig("double_tap_window_ms must be positive".into()));
        }

        let unknown = self.commands.unknown_actions();
        if !unknown.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "unknown actions in [commands]: {}",
                unknown.join(", ")
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::input::GestureEvent;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LauncherConfig::from_toml("").unwrap();
        assert_eq!(config, LauncherConfig::default());
        assert_eq!(config.bindings.lookup(GestureEvent::LongPress), Some(Action::OpenSettings));
    }

    #[test]
    fn test_full_config() {
        let config = LauncherConfig::from_toml(
            r#"
            [gestures]
            swipe_distance = 80.0
            double_tap_window_ms = 250

            [bindings]
            swipe_left = "show_recents"
            triple_tap = "take_screen_shot"

            [policy]
            settings_lock = true

            [commands]
            show_recents = "echo recents"
            "#,
        )
        .unwrap();

        assert_eq!(config.gestures.swipe_distance, 80.0);
        assert_eq!(config.gestures.double_tap_window_ms, 250);
        // Unset thresholds keep their defaults
        assert_eq!(config.gestures.long_press_delay_ms, 500);
        assert_eq!(config.bindings.lookup(GestureEvent::SwipeLeft), Some(Action::ShowRecents));
        assert_eq!(config.bindings.lookup(GestureEvent::TripleTap), Some(Action::TakeScreenShot));
        // An explicit [bindings] table replaces the defaults
        assert_eq!(config.bindings.lookup(GestureEvent::SwipeUp), None);
        assert!(config.policy.settings_lock);
        assert_eq!(config.commands.command_for(Action::ShowRecents), Some("echo recents"));
    }

    #[test]
    fn test_rejects_unknown_action() {
        let err = LauncherConfig::from_toml(
            r#"
            [bindings]
            swipe_up = "open_app"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));

        let err = LauncherConfig::from_toml(
            r#"
            [commands]
            launch_rocket = "true"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        let err = LauncherConfig::from_toml("[gestures]\nswipe_velocity = -1.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        let err = LauncherConfig::from_toml("[gestures]\ndouble_tap_window_ms = 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rendered_config_reloads() {
        let mut config = LauncherConfig::default();
        config.policy.settings_lock = true;
        config.commands.actions.insert("lock_screen".into(), "loginctl lock-session".into());
        let rendered = config.to_toml().unwrap();
        assert_eq!(LauncherConfig::from_toml(&rendered).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("launcher-gestures-test-missing/config.toml");
        assert_eq!(LauncherConfig::load(&path).unwrap(), LauncherConfig::default());
    }
}
