use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use thiserror::Error;

use crate::switcher::Direction;
use crate::theme::{ColorsToml, Theme};

pub const DEFAULT_IDLE_TIMEOUT_SECS: f64 = 3.0;
const DEFAULT_FORWARD_KEYS: [&str; 2] = ["ctrl+right", "f12"];
const DEFAULT_BACKWARD_KEYS: [&str; 2] = ["ctrl+left", "f11"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid key binding '{0}'")]
    InvalidKey(String),
    #[error("idle timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),
    #[error("invalid color '{value}' for colors.{key}")]
    InvalidColor { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Parses specs such as `ctrl+right`, `alt+n`, `f12` or `shift+tab`.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidKey(spec.to_string());
        let mut parts: Vec<&str> = spec.split('+').map(str::trim).collect();
        let key = parts.pop().filter(|key| !key.is_empty()).ok_or_else(invalid)?;

        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" | "meta" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return Err(invalid()),
            };
        }

        let code = match key.to_ascii_lowercase().as_str() {
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "space" => KeyCode::Char(' '),
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            lower => {
                if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                    if !(1..=12).contains(&n) {
                        return Err(invalid());
                    }
                    KeyCode::F(n)
                } else {
                    let mut chars = key.chars();
                    match (chars.next(), chars.next()) {
                        (Some(ch), None) => KeyCode::Char(ch),
                        _ => return Err(invalid()),
                    }
                }
            }
        };

        // Terminals report Shift+Tab as BackTab.
        if code == KeyCode::Tab && modifiers.contains(KeyModifiers::SHIFT) {
            return Ok(Self {
                code: KeyCode::BackTab,
                modifiers: modifiers - KeyModifiers::SHIFT,
            });
        }
        Ok(Self { code, modifiers })
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        match (self.code, key.code) {
            // The character already carries shift; terminals disagree on also reporting it.
            (KeyCode::Char(want), KeyCode::Char(got)) => {
                want == got && strip_shift(self.modifiers) == strip_shift(key.modifiers)
            }
            (KeyCode::BackTab, KeyCode::BackTab) => {
                strip_shift(self.modifiers) == strip_shift(key.modifiers)
            }
            (want, got) => want == got && self.modifiers == key.modifiers,
        }
    }
}

fn strip_shift(modifiers: KeyModifiers) -> KeyModifiers {
    modifiers - KeyModifiers::SHIFT
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(ch) => write!(f, "{ch}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            KeyCode::BackTab => f.write_str("Shift+Tab"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Everything read from `bufswitch.toml` at startup: trigger keys, the idle timeout
/// and the display colors.
#[derive(Debug, Clone)]
pub struct SwitcherConfig {
    pub idle_timeout: Duration,
    pub forward_keys: Vec<KeyBinding>,
    pub backward_keys: Vec<KeyBinding>,
    pub theme: Theme,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs_f64(DEFAULT_IDLE_TIMEOUT_SECS),
            forward_keys: parse_keys(&DEFAULT_FORWARD_KEYS).unwrap_or_default(),
            backward_keys: parse_keys(&DEFAULT_BACKWARD_KEYS).unwrap_or_default(),
            theme: Theme::default(),
        }
    }
}

impl SwitcherConfig {
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path_ref = path.as_ref();
        match Self::load(path_ref) {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                tracing::warn!(path = %path_ref.display(), "{err}. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: ConfigToml = toml::from_str(s)?;
        let defaults = Self::default();
        let section = cfg.switcher;

        let idle_timeout = match section.idle_timeout_secs {
            Some(secs) if secs.is_finite() && secs > 0.0 => Duration::from_secs_f64(secs),
            Some(secs) => return Err(ConfigError::InvalidTimeout(secs)),
            None => defaults.idle_timeout,
        };
        let forward_keys = match section.forward_keys {
            Some(specs) => parse_keys(&specs)?,
            None => defaults.forward_keys,
        };
        let backward_keys = match section.backward_keys {
            Some(specs) => parse_keys(&specs)?,
            None => defaults.backward_keys,
        };

        let theme = defaults.theme.with_overrides(cfg.colors)?;

        Ok(Self {
            idle_timeout,
            forward_keys,
            backward_keys,
            theme,
        })
    }

    pub fn direction_for(&self, key: &KeyEvent) -> Option<Direction> {
        if self.forward_keys.iter().any(|binding| binding.matches(key)) {
            Some(Direction::Forward)
        } else if self.backward_keys.iter().any(|binding| binding.matches(key)) {
            Some(Direction::Backward)
        } else {
            None
        }
    }

    pub fn key_hint(&self) -> String {
        let first = |keys: &[KeyBinding]| {
            keys.first()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string())
        };
        format!(
            "{}/{} switch buffer",
            first(&self.forward_keys),
            first(&self.backward_keys)
        )
    }
}

fn parse_keys<S: AsRef<str>>(specs: &[S]) -> Result<Vec<KeyBinding>, ConfigError> {
    specs
        .iter()
        .map(|spec| KeyBinding::parse(spec.as_ref()))
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct ConfigToml {
    #[serde(default)]
    switcher: SwitcherToml,
    #[serde(default)]
    colors: ColorsToml,
}

#[derive(Debug, Default, Deserialize)]
struct SwitcherToml {
    idle_timeout_secs: Option<f64>,
    forward_keys: Option<Vec<String>>,
    backward_keys: Option<Vec<String>>,
}
