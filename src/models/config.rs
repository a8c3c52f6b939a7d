use crate::assets::AssetLoader;
use crate::error::AppError;
use dstretch_core::ParameterSet;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Named parameter presets
    #[serde(default)]
    pub presets: BTreeMap<String, Preset>,

    /// Preset used when none is requested
    #[serde(default)]
    pub default_preset: Option<String>,

    /// Debounce between a parameter change and the re-render
    #[serde(default = "default_processing_delay")]
    pub processing_delay_ms: u64,

    /// Undo/redo depth of an edit session
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_processing_delay() -> u64 {
    150
}

fn default_history_limit() -> usize {
    20
}

/// A named parameter set
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Preset {
    /// One-line description for listings
    #[serde(default)]
    pub description: String,

    /// Parameters; omitted fields keep their neutral default
    #[serde(default)]
    pub params: ParameterSet,
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        presets = config.presets.len(),
                        default_preset = ?config.default_preset,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Debounce delay as a Duration
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    /// Look up a preset by name (case-sensitive)
    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    /// Resolve the starting parameters for a run
    ///
    /// An explicit preset name must exist. Without one, the configured
    /// default preset is used if it exists, and neutral parameters otherwise.
    pub fn resolve_params(&self, preset: Option<&str>) -> Result<ParameterSet, AppError> {
        match preset {
            Some(name) => self
                .preset(name)
                .map(|p| p.params.clamped())
                .ok_or_else(|| AppError::UnknownPreset(name.to_string())),
            None => Ok(self
                .default_preset
                .as_deref()
                .and_then(|name| {
                    let preset = self.preset(name);
                    if preset.is_none() {
                        tracing::warn!(preset = name, "Default preset not found, using neutral parameters");
                    }
                    preset
                })
                .map(|p| p.params.clamped())
                .unwrap_or_default()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut presets = BTreeMap::new();
        presets.insert(
            "neutral".to_string(),
            Preset {
                description: "No enhancement".to_string(),
                params: ParameterSet::default(),
            },
        );

        Self {
            presets,
            default_preset: None,
            processing_delay_ms: default_processing_delay(),
            history_limit: default_history_limit(),
        }
    }
}

/// Parse a standalone parameter YAML document
pub fn parse_params(yaml: &str) -> Result<ParameterSet, AppError> {
    let params: ParameterSet =
        serde_yaml::from_str(yaml).map_err(|e| AppError::Params(e.to_string()))?;
    Ok(params.clamped())
}

/// Read and parse a parameter YAML file
pub fn load_params_file(path: &Path) -> Result<ParameterSet, AppError> {
    let content = std::fs::read_to_string(path)?;
    parse_params(&content)
}
