use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Tunable locomotion parameters. Read-only once a player is built.
///
/// Loaded from a RON file; any field left out takes its default:
/// ```ron
/// (
///     speed: 10.0,
///     jump_force: 150.0,
///     double_jump: true,
/// )
/// ```
///
/// `fall_speed` is added to the velocity once per fixed tick, so the same
/// value falls faster at a higher tick rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Constant forward run speed (units/s).
    pub speed: f32,
    /// Lateral speed at full dash-axis deflection (units/s).
    pub dash_speed: f32,
    /// Downward speed gained per fixed tick (units/s). Also the `g` in the
    /// jump impulse.
    pub fall_speed: f32,
    /// Jump impulse is `sqrt(2 * jump_force * fall_speed)`.
    pub jump_force: f32,
    /// Longest time (s) the jump button can sustain the ascent.
    pub jump_time: f32,
    /// Grace window (s) after leaving the ground during which a jump is still honoured.
    pub coyote_time: f32,
    /// Leave the jump gate open after a jump so a second one can fire mid-air.
    pub double_jump: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            dash_speed: 6.0,
            fall_speed: 0.6,
            jump_force: 125.0,
            jump_time: 0.35,
            coyote_time: 0.12,
            double_jump: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    /// A field holds a value the movement code cannot work with.
    Invalid { field: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read movement config: {}", e),
            Self::Parse(e) => write!(f, "failed to parse movement config: {}", e),
            Self::Invalid { field, value } => {
                write!(f, "movement config field '{}' must be a finite non-negative number, got {}", field, value)
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        Self::Parse(e)
    }
}

impl MovementConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_ron_str(&text)?;
        info!(path = %path.display(), "loaded movement config");
        Ok(config)
    }

    /// Load `path` if given, falling back to defaults when it is missing or bad.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::from_file(path).unwrap_or_else(|e| {
                warn!(path = %path.display(), "{}. Falling back to defaults", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("speed", self.speed),
            ("dash_speed", self.dash_speed),
            ("fall_speed", self.fall_speed),
            ("jump_force", self.jump_force),
            ("jump_time", self.jump_time),
            ("coyote_time", self.coyote_time),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        Ok(())
    }

    /// Upward speed applied on jump entry.
    pub fn jump_impulse(&self) -> f32 {
        (2.0 * self.jump_force * self.fall_speed).sqrt()
    }

    pub fn to_ron_string(&self) -> String {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .unwrap_or_else(|_| format!("{:?}", self))
    }
}
