use crate::alert::DEFAULT_ALERT_DURATION;
use crate::gateway::{TagGateway, DEFAULT_TAG_BINARY};
use anyhow::Result;
use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tag: TagToolConfig,
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagToolConfig {
    /// Path to the `tag` executable
    pub binary: PathBuf,
    /// Extra arguments placed before the mode flag (for wrapper scripts)
    #[serde(default)]
    pub leading_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// How long a tag change notice stays visible
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    /// Neighbouring files decoded ahead of navigation
    #[serde(default = "default_preload_count")]
    pub preload_count: usize,
}

fn default_preload_count() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeybindingsConfig {
    pub next: String,
    pub prev: String,
    pub add: String,
    pub remove: String,
    pub quit: String,
    pub open_dir: String,
    pub edit_working: String,
    pub edit_image: String,
    pub refresh: String,
}

impl Default for TagToolConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_TAG_BINARY),
            leading_args: Vec::new(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_ALERT_DURATION.as_millis() as u64,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
            quality: 90,
            preload_count: default_preload_count(),
        }
    }
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            next: "l".to_string(),
            prev: "h".to_string(),
            add: "k".to_string(),
            remove: "j".to_string(),
            quit: "q".to_string(),
            open_dir: "o".to_string(),
            edit_working: "w".to_string(),
            edit_image: "e".to_string(),
            refresh: "r".to_string(),
        }
    }
}

impl KeybindingsConfig {
    /// Parse a keybinding string into a KeyCode
    pub fn parse_key(s: &str) -> Option<KeyCode> {
        let s = s.trim();

        // Single character
        if s.chars().count() == 1 {
            if let Some(ch) = s.chars().next() {
                return Some(KeyCode::Char(ch));
            }
        }

        // Named keys (case insensitive)
        match s.to_lowercase().as_str() {
            "enter" | "return" => Some(KeyCode::Enter),
            "esc" | "escape" => Some(KeyCode::Esc),
            "tab" => Some(KeyCode::Tab),
            "backtab" | "shift+tab" | "s-tab" => Some(KeyCode::BackTab),
            "space" => Some(KeyCode::Char(' ')),
            "backspace" => Some(KeyCode::Backspace),
            "delete" | "del" => Some(KeyCode::Delete),
            "home" => Some(KeyCode::Home),
            "end" => Some(KeyCode::End),
            "pageup" | "pgup" => Some(KeyCode::PageUp),
            "pagedown" | "pgdn" => Some(KeyCode::PageDown),
            "up" | "arrow_up" => Some(KeyCode::Up),
            "down" | "arrow_down" => Some(KeyCode::Down),
            "left" | "arrow_left" => Some(KeyCode::Left),
            "right" | "arrow_right" => Some(KeyCode::Right),
            f if f.len() > 1 && f.starts_with('f') => f[1..]
                .parse::<u8>()
                .ok()
                .filter(|n| (1..=12).contains(n))
                .map(KeyCode::F),
            _ => None,
        }
    }

    /// Check if a KeyCode matches a keybinding
    pub fn matches(&self, key: KeyCode, binding: &str) -> bool {
        Self::parse_key(binding) == Some(key)
    }
}

impl Config {
    /// Return the path to the configuration file.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tagdeck", "tagdeck")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Load config from file, creating default if missing or corrupt.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            let data = fs::read_to_string(&path)?;
            match toml::from_str::<Config>(&data) {
                Ok(config) => Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config at {}: {}",
                        path.display(),
                        e
                    );
                    eprintln!("Using default configuration.");
                    tracing::warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
                    Ok(Config::default())
                }
            }
        } else {
            // Create default config.
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save config to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = toml::to_string_pretty(self)?;
        fs::write(&path, data)?;

        Ok(())
    }

    /// Build the tag gateway described by the `[tag]` section.
    pub fn gateway(&self) -> TagGateway {
        TagGateway::new(&self.tag.binary).with_leading_args(self.tag.leading_args.iter())
    }

    pub fn alert_duration(&self) -> Duration {
        Duration::from_millis(self.alert.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named_and_single_keys() {
        assert_eq!(KeybindingsConfig::parse_key("l"), Some(KeyCode::Char('l')));
        assert_eq!(KeybindingsConfig::parse_key(" Enter "), Some(KeyCode::Enter));
        assert_eq!(KeybindingsConfig::parse_key("PgDn"), Some(KeyCode::PageDown));
        assert_eq!(KeybindingsConfig::parse_key("f5"), Some(KeyCode::F(5)));
        assert_eq!(KeybindingsConfig::parse_key("f13"), None);
        assert_eq!(KeybindingsConfig::parse_key("é"), Some(KeyCode::Char('é')));
        assert_eq!(KeybindingsConfig::parse_key("nope"), None);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [tag]
            binary = "/opt/homebrew/bin/tag"

            [alert]
            duration_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(config.tag.binary, PathBuf::from("/opt/homebrew/bin/tag"));
        assert!(config.tag.leading_args.is_empty());
        assert_eq!(config.alert_duration(), Duration::from_millis(1500));
        assert_eq!(config.keybindings.open_dir, "o");
        assert_eq!(config.preview.preload_count, 1);
    }

    #[test]
    fn default_config_serializes() {
        let data = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(data.contains("/usr/local/bin/tag"));
        let back: Config = toml::from_str(&data).unwrap();
        assert_eq!(back.alert.duration_ms, 3000);
    }

    #[test]
    fn gateway_uses_configured_binary() {
        let mut config = Config::default();
        config.tag.binary = PathBuf::from("/bin/tagger");
        assert_eq!(config.gateway().program(), std::path::Path::new("/bin/tagger"));
    }
}
