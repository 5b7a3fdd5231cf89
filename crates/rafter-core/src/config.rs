use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::{env, fmt, str::FromStr};

use crate::error::{ConfigError, ParseEnumError};
use crate::messages::Messages;

/// Environment variable that overrides the configured done ratio mode.
pub const DONE_RATIO_ENV: &str = "RAFTER_DONE_RATIO";

/// How a work package's progress (`done_ratio`) is maintained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoneRatioMode {
    /// Entered directly on the work package.
    #[default]
    Field,
    /// Derived from the status.
    Status,
    /// Progress tracking is off.
    Disabled,
}

impl DoneRatioMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Status => "status",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for DoneRatioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoneRatioMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "field" => Ok(Self::Field),
            "status" => Ok(Self::Status),
            "disabled" => Ok(Self::Disabled),
            _ => Err(ParseEnumError {
                expected: "done ratio mode",
                got: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkPackageConfig {
    #[serde(default)]
    pub done_ratio: DoneRatioMode,
}

/// Contents of `.rafter/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub work_packages: WorkPackageConfig,
    /// Message template overrides keyed by message key.
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

/// Settings a contract reads during one validation pass.
///
/// Passed into contracts explicitly; nothing here is process-global.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub work_package_done_ratio: DoneRatioMode,
}

impl Settings {
    #[must_use]
    pub const fn with_done_ratio(mode: DoneRatioMode) -> Self {
        Self {
            work_package_done_ratio: mode,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub settings: Settings,
    pub messages: Messages,
}

/// Load `.rafter/config.toml` below `project_root`.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig, ConfigError> {
    let path = project_root.join(".rafter/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    toml::from_str::<ProjectConfig>(&content).map_err(|source| ConfigError::Parse { path, source })
}

/// Resolve settings and messages for `project_root`.
///
/// The `RAFTER_DONE_RATIO` environment variable overrides the file.
///
/// # Errors
///
/// Fails if the config file is unreadable or invalid, or if the env
/// override is not a known done ratio mode.
pub fn resolve_config(project_root: &Path) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)
        .with_context(|| format!("loading config under {}", project_root.display()))?;

    let env_mode = env::var(DONE_RATIO_ENV).ok();
    let mode = resolve_done_ratio(project.work_packages.done_ratio, env_mode)?;

    for key in project.messages.keys() {
        if !Messages::is_known_key(key) {
            tracing::warn!(key = %key, "ignoring override for unknown message key");
        }
    }

    Ok(EffectiveConfig {
        settings: Settings::with_done_ratio(mode),
        messages: Messages::with_overrides(project.messages),
    })
}

fn resolve_done_ratio(
    file_mode: DoneRatioMode,
    env_mode: Option<String>,
) -> Result<DoneRatioMode, ConfigError> {
    match env_mode.as_deref().map(str::trim) {
        None | Some("") => Ok(file_mode),
        Some(raw) => raw
            .parse()
            .map_err(|source| ConfigError::DoneRatioMode {
                origin: DONE_RATIO_ENV,
                source,
            }),
    }
}
