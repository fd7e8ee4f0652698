//! Layered configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML file,
//! `DAS_TOOL__SECTION__KEY` environment variables. CLI flags are applied on
//! top by the binary. Out-of-range values are clamped rather than rejected.
//!
//! ```toml
//! [simulation]
//! speed_ms = 500
//! user_load = 70
//!
//! [planning]
//! todo_delay_ms = 5000
//! verify_delay_ms = 8000
//!
//! [log]
//! file = "das-tool.log"
//! level = "debug"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DAS_TOOL";

/// Simulation speed bounds and step, in milliseconds.
pub const SPEED_MIN_MS: u64 = 100;
pub const SPEED_MAX_MS: u64 = 2000;
pub const SPEED_STEP_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Tick period while simulating.
    pub speed_ms: u64,
    pub user_load: u8,
    pub data_complexity: u8,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            speed_ms: 1000,
            user_load: 50,
            data_complexity: 50,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningSettings {
    pub todo_delay_ms: u64,
    pub verify_delay_ms: u64,
}

impl Default for PlanningSettings {
    fn default() -> Self {
        Self {
            todo_delay_ms: 5000,
            verify_delay_ms: 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeTravelSettings {
    pub playback_ms: u64,
}

impl Default for TimeTravelSettings {
    fn default() -> Self {
        Self { playback_ms: 2000 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// File the transcript recognizer reads utterances from, one per line.
    /// Speech input is unsupported when unset.
    pub transcript_file: Option<PathBuf>,
}

/// Theme selection.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Auto,
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Event poll timeout for the main loop.
    pub poll_ms: u64,
    pub theme: ThemeChoice,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            poll_ms: 100,
            theme: ThemeChoice::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log file used while the terminal UI owns the screen.
    pub file: PathBuf,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("das-tool.log"),
            level: "info".to_string(),
        }
    }
}

/// Complete application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: SimulationSettings,
    pub planning: PlanningSettings,
    pub time_travel: TimeTravelSettings,
    pub speech: SpeechSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Load defaults, then `path` (if any), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Settings::load`], reading environment variables from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(path) = path {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            builder = builder.add_source(File::from(path));
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(env);

        let settings: Settings = builder
            .add_source(environment)
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        Ok(settings.validated())
    }

    /// Clamp every value into its usable range.
    pub fn validated(mut self) -> Self {
        self.simulation.speed_ms = clamp_speed(self.simulation.speed_ms);
        self.simulation.user_load = self.simulation.user_load.min(100);
        self.simulation.data_complexity = self.simulation.data_complexity.min(100);
        self.time_travel.playback_ms = self.time_travel.playback_ms.max(1);
        self.ui.poll_ms = self.ui.poll_ms.clamp(10, 1000);
        if self.log.level.trim().is_empty() {
            self.log.level = LogSettings::default().level;
        }
        self
    }

    pub fn simulation_speed(&self) -> Duration {
        Duration::from_millis(self.simulation.speed_ms)
    }

    pub fn todo_delay(&self) -> Duration {
        Duration::from_millis(self.planning.todo_delay_ms)
    }

    pub fn verify_delay(&self) -> Duration {
        Duration::from_millis(self.planning.verify_delay_ms)
    }

    pub fn playback_period(&self) -> Duration {
        Duration::from_millis(self.time_travel.playback_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.ui.poll_ms)
    }
}

/// Clamp a simulation speed to the slider range and snap it to the step.
pub fn clamp_speed(ms: u64) -> u64 {
    let snapped = (ms.saturating_add(SPEED_STEP_MS / 2) / SPEED_STEP_MS) * SPEED_STEP_MS;
    snapped.clamp(SPEED_MIN_MS, SPEED_MAX_MS)
}
