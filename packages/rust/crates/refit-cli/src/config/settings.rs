//! Runtime settings loader for refit.
//!
//! Loads and merges:
//! - System defaults: `<REFIT_PROJECT_ROOT>/.refit/settings.yaml`
//! - User overrides:  `<config home>/refit/settings.yaml`
//!
//! Merge precedence is user over system. Missing or malformed files are
//! ignored with a warning.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

use refit_core::{DispatchConfig, EditConfig};
use refit_search::SearchConfig;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = ".refit/settings.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "refit/settings.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";

/// Environment variable holding the API key when none is configured.
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

static CONFIG_HOME_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// Merged settings file content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefitSettings {
    /// `model:` section.
    #[serde(default)]
    pub model: ModelSettings,
    /// `dispatch:` section.
    #[serde(default)]
    pub dispatch: DispatchSettings,
    /// `edit:` section.
    #[serde(default)]
    pub edit: EditSettings,
    /// `search:` section.
    #[serde(default)]
    pub search: SearchSettings,
}

/// Model selection and transport.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelSettings {
    /// Registry code name, e.g. `gemini-2.0-flash`.
    pub name: Option<String>,
    /// Variable the API key is read from.
    pub api_key_env: Option<String>,
    /// REST endpoint override.
    pub endpoint: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Batching knobs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatchSettings {
    /// Most blocks per model call.
    pub max_blocks_per_call: Option<usize>,
    /// Output-token expansion factor of the batch budget.
    pub output_expansion_factor: Option<usize>,
}

/// File limits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditSettings {
    /// Largest file read for editing, in bytes.
    pub max_file_size: Option<u64>,
}

/// Search settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSettings {
    /// Lines of context around each match.
    pub context_lines: Option<usize>,
}

impl RefitSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            model: self.model.merge(overlay.model),
            dispatch: self.dispatch.merge(overlay.dispatch),
            edit: EditSettings {
                max_file_size: overlay.edit.max_file_size.or(self.edit.max_file_size),
            },
            search: SearchSettings {
                context_lines: overlay.search.context_lines.or(self.search.context_lines),
            },
        }
    }

    /// Dispatch configuration with defaults for unset keys.
    #[must_use]
    pub fn dispatch_config(&self) -> DispatchConfig {
        let defaults = DispatchConfig::default();
        DispatchConfig {
            max_blocks_per_call: self
                .dispatch
                .max_blocks_per_call
                .unwrap_or(defaults.max_blocks_per_call),
            output_expansion_factor: self
                .dispatch
                .output_expansion_factor
                .unwrap_or(defaults.output_expansion_factor),
        }
    }

    /// Edit configuration with defaults for unset keys.
    #[must_use]
    pub fn edit_config(&self) -> EditConfig {
        let defaults = EditConfig::default();
        EditConfig {
            max_file_size: self.edit.max_file_size.unwrap_or(defaults.max_file_size),
        }
    }

    /// Search configuration with defaults for unset keys.
    #[must_use]
    pub fn search_config(&self) -> SearchConfig {
        let defaults = SearchConfig::default();
        SearchConfig {
            context_lines: self.search.context_lines.unwrap_or(defaults.context_lines),
        }
    }

    /// Variable the API key is read from.
    #[must_use]
    pub fn api_key_env(&self) -> &str {
        self.model
            .api_key_env
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_KEY_ENV)
    }
}

impl ModelSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            name: overlay.name.or(self.name),
            api_key_env: overlay.api_key_env.or(self.api_key_env),
            endpoint: overlay.endpoint.or(self.endpoint),
            timeout_secs: overlay.timeout_secs.or(self.timeout_secs),
        }
    }
}

impl DispatchSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            max_blocks_per_call: overlay.max_blocks_per_call.or(self.max_blocks_per_call),
            output_expansion_factor: overlay
                .output_expansion_factor
                .or(self.output_expansion_factor),
        }
    }
}

/// Load merged settings (user overrides system).
pub fn load_settings() -> RefitSettings {
    let (system_path, user_path) = settings_paths();
    load_settings_from_paths(&system_path, &user_path)
}

/// `(system, user)` settings file locations.
#[doc(hidden)]
pub fn settings_paths() -> (PathBuf, PathBuf) {
    let root = project_root();
    let system_path = root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let user_path = resolve_config_home(&root).join(DEFAULT_USER_SETTINGS_RELATIVE_PATH);
    (system_path, user_path)
}

/// Merge two explicit settings files.
#[doc(hidden)]
pub fn load_settings_from_paths(system: &Path, user: &Path) -> RefitSettings {
    load_one(system).merge(load_one(user))
}

fn load_one(path: &Path) -> RefitSettings {
    if !path.exists() {
        return RefitSettings::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return RefitSettings::default();
        }
    };
    match serde_yaml::from_str::<RefitSettings>(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            RefitSettings::default()
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn project_root() -> PathBuf {
    non_empty_env("REFIT_PROJECT_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Set config-home override (used by CLI `--conf`).
///
/// The path can be absolute, or relative to the project root.
pub fn set_config_home_override(path: impl Into<PathBuf>) {
    let path = path.into();
    if path.as_os_str().is_empty() {
        return;
    }
    if CONFIG_HOME_OVERRIDE.set(path.clone()).is_err()
        && let Some(current) = CONFIG_HOME_OVERRIDE.get()
        && current != &path
    {
        tracing::warn!(
            current = %current.display(),
            ignored = %path.display(),
            "config home override already set; ignoring subsequent value"
        );
    }
}

fn resolve_config_home(project_root: &Path) -> PathBuf {
    if let Some(path) = CONFIG_HOME_OVERRIDE.get() {
        return absolutize(project_root, path.clone());
    }
    if let Some(xdg) = non_empty_env("XDG_CONFIG_HOME") {
        return absolutize(project_root, PathBuf::from(xdg));
    }
    match non_empty_env("HOME") {
        Some(home) => PathBuf::from(home).join(DEFAULT_CONFIG_HOME_RELATIVE_PATH),
        None => project_root.join(DEFAULT_CONFIG_HOME_RELATIVE_PATH),
    }
}

fn absolutize(project_root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}
