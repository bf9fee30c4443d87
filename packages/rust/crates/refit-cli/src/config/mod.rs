//! Config namespace: YAML settings loading.

mod settings;

pub use settings::{
    DEFAULT_API_KEY_ENV, DispatchSettings, EditSettings, ModelSettings, RefitSettings,
    SearchSettings, load_settings, load_settings_from_paths, set_config_home_override,
    settings_paths,
};
