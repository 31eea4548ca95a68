//! Configuration types and parsing for sqltest.yml

use crate::error::{CoreError, CoreResult};
use crate::model::{to_flow, Model, TestParams};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Prefix marking a source URL as the name of an environment variable
pub const URL_INDIRECTION_PREFIX: char = '$';

/// Connection definition for the data under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Display name of the source
    pub name: String,

    /// Connection URL, or `$VAR` to read it from the environment
    pub url: String,

    /// Engine-specific connection options
    #[serde(default, alias = "options", skip_serializing_if = "TestParams::is_empty")]
    pub kwargs: TestParams,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kwargs: TestParams::new(),
        }
    }

    /// Whether the URL is an environment variable reference
    pub fn is_indirect(&self) -> bool {
        self.url.starts_with(URL_INDIRECTION_PREFIX)
    }

    /// Resolve the connection URL against the process environment.
    pub fn resolve_url(&self) -> CoreResult<String> {
        self.resolve_url_with(|key| std::env::var(key).ok())
    }

    /// Resolve the connection URL using a custom key lookup.
    pub fn resolve_url_with<F>(&self, lookup: F) -> CoreResult<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        match self.url.strip_prefix(URL_INDIRECTION_PREFIX) {
            Some(key) => lookup(key).ok_or_else(|| CoreError::UnresolvedUrl {
                key: key.to_string(),
            }),
            None => Ok(self.url.clone()),
        }
    }
}

/// A fully loaded sqltest configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub source: Source,

    /// Models in configuration order. Names are not deduplicated.
    pub models: Vec<Model>,
}

/// `models_dir` accepts one directory or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModelsDir {
    One(String),
    Many(Vec<String>),
}

impl ModelsDir {
    fn into_vec(self) -> Vec<String> {
        match self {
            ModelsDir::One(dir) => vec![dir],
            ModelsDir::Many(dirs) => dirs,
        }
    }
}

impl Config {
    pub fn new(source: Source, models: Vec<Model>) -> Self {
        Self { source, models }
    }

    /// Load configuration from a YAML file.
    ///
    /// Relative `models_dir` entries are resolved against the file's directory.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_yaml_str(&content, base_dir)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(yaml: &str, base_dir: &Path) -> CoreResult<Self> {
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| CoreError::ConfigParseError {
            message: e.to_string(),
        })?;
        Self::from_value(&value, base_dir)
    }

    /// Build configuration from an already-parsed YAML document.
    ///
    /// Explicit `models` entries come first, followed by the models discovered
    /// under each `models_dir`.
    pub fn from_value(value: &Value, base_dir: &Path) -> CoreResult<Self> {
        if !value.is_mapping() {
            return Err(CoreError::ConfigInvalid {
                message: format!("expected a mapping at the top level, found {}", to_flow(value)),
            });
        }

        let source_value = value.get("source").ok_or_else(|| CoreError::ConfigInvalid {
            message: "missing required 'source' section".to_string(),
        })?;
        let source: Source =
            serde_yaml::from_value(source_value.clone()).map_err(|e| CoreError::ConfigInvalid {
                message: format!("invalid 'source' section: {e}"),
            })?;

        let mut models = match value.get("models") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(Model::from_value)
                .collect::<CoreResult<Vec<_>>>()?,
            Some(other) => {
                return Err(CoreError::ConfigInvalid {
                    message: format!("'models' must be a list, found {}", to_flow(other)),
                })
            }
        };

        let models_dirs = match value.get("models_dir") {
            None | Some(Value::Null) => Vec::new(),
            Some(dirs) => serde_yaml::from_value::<ModelsDir>(dirs.clone())
                .map_err(|_| CoreError::ConfigInvalid {
                    message: format!(
                        "'models_dir' must be a path or a list of paths, found {}",
                        to_flow(dirs)
                    ),
                })?
                .into_vec(),
        };
        for dir in models_dirs {
            models.extend(discover_models(&base_dir.join(dir))?);
        }

        log::debug!(
            "Loaded {} model(s) for source '{}'",
            models.len(),
            source.name
        );
        Ok(Self { source, models })
    }

    /// Select a model by name (case-insensitive, first match wins)
    pub fn select_model(&self, name: &str) -> CoreResult<&Model> {
        self.models
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::ModelNotFound {
                name: name.to_string(),
            })
    }
}

/// Recursively discover model definitions (one model per `.yml`/`.yaml` file).
///
/// Entries are visited in sorted path order. A missing directory yields no
/// models; an unreadable file is skipped with a warning.
pub fn discover_models(dir: &Path) -> CoreResult<Vec<Model>> {
    let mut models = Vec::new();
    if !dir.is_dir() {
        log::warn!("Models directory {} does not exist", dir.display());
        return Ok(models);
    }
    discover_models_recursive(dir, &mut models)?;
    Ok(models)
}

fn discover_models_recursive(dir: &Path, models: &mut Vec<Model>) -> CoreResult<()> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            discover_models_recursive(&path, models)?;
            continue;
        }
        if !path.extension().is_some_and(|e| e == "yml" || e == "yaml") {
            continue;
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Cannot read {}: {}", path.display(), e);
                continue;
            }
        };
        let value: Value =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), e),
            })?;
        models.push(Model::from_value(&value)?);
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
