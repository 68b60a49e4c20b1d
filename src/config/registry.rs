// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The process-wide name->variable directory.
//!
//! One registry instance is created at startup and passed by reference
//! to whatever needs settings; there is no hidden global. Names are
//! unique across the registry irrespective of the stored type, and a
//! lookup under the wrong type is "not found for this type" - never a
//! reinterpretation.

use super::variable::{ConfigVariable, TypedConfigVariable};
use crate::logging::{Level, Logger, Record};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Registration name violates `^[A-Za-z0-9._]+$`; fatal to that
    /// registration attempt only
    #[error("invalid config variable name '{name}'")]
    InvalidName { name: String },

    /// Name already registered under an incompatible type
    #[error("config variable '{name}' holds a {stored}, not a {requested}")]
    TypeMismatch {
        name: String,
        stored: &'static str,
        requested: &'static str,
    },

    #[error("failed to access config file '{path}': {detail}")]
    Io { path: PathBuf, detail: String },

    #[error("failed to parse config text: {detail}")]
    Parse { detail: String },
}

/// Validate a config variable name: non-empty, ASCII alphanumerics,
/// dots and underscores only
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

/// Name-keyed store of type-erased settings with
/// lookup-or-create-with-default semantics.
pub struct ConfigRegistry {
    variables: RwLock<HashMap<String, Arc<dyn ConfigVariable>>>,
    diagnostics: Option<Arc<Logger>>,
}

impl ConfigRegistry {
    /// Create an empty registry with no diagnostic channel
    pub fn new() -> Self {
        Self {
            variables: RwLock::new(HashMap::new()),
            diagnostics: None,
        }
    }

    /// Create an empty registry reporting failures to `diagnostics`.
    ///
    /// The handle is also passed to every variable the registry
    /// creates, so conversion failures surface on the same channel.
    pub fn with_diagnostics(diagnostics: Arc<Logger>) -> Self {
        Self {
            variables: RwLock::new(HashMap::new()),
            diagnostics: Some(diagnostics),
        }
    }

    /// Find or register a variable.
    ///
    /// - name registered under T: the existing instance is returned and
    ///   `default_value`/`description` are ignored;
    /// - name registered under another type: `TypeMismatch` - the
    ///   stored variable is untouched;
    /// - name absent and valid: a new variable holding `default_value`
    ///   is registered and returned;
    /// - name absent and invalid: `InvalidName` - the registry is
    ///   unchanged.
    pub fn lookup_or_create<T>(
        &self,
        name: &str,
        default_value: T,
        description: &str,
    ) -> Result<Arc<TypedConfigVariable<T>>, ConfigError>
    where
        T: Clone + Display + FromStr + Send + Sync + 'static,
    {
        {
            let variables = self.variables.read().unwrap();
            if let Some(existing) = variables.get(name) {
                return self.downcast_existing(name, existing);
            }
        }
        if !is_valid_name(name) {
            self.report(
                Level::Error,
                format!("rejected config variable name '{}'", name),
            );
            return Err(ConfigError::InvalidName {
                name: name.to_string(),
            });
        }
        let mut variables = self.variables.write().unwrap();
        // Re-check under the write lock: a racing creator may have won
        if let Some(existing) = variables.get(name) {
            return self.downcast_existing(name, existing);
        }
        let variable = Arc::new(TypedConfigVariable::with_diagnostics(
            name,
            default_value,
            description,
            self.diagnostics.clone(),
        ));
        variables.insert(
            name.to_string(),
            Arc::clone(&variable) as Arc<dyn ConfigVariable>,
        );
        Ok(variable)
    }

    /// Pure lookup; never creates.
    ///
    /// `None` both when the name is absent and when it is registered
    /// under an incompatible type.
    pub fn lookup<T>(&self, name: &str) -> Option<Arc<TypedConfigVariable<T>>>
    where
        T: Clone + Display + FromStr + Send + Sync + 'static,
    {
        let variables = self.variables.read().unwrap();
        let existing = variables.get(name)?;
        Arc::clone(existing)
            .as_any_arc()
            .downcast::<TypedConfigVariable<T>>()
            .ok()
    }

    /// Whether any variable is registered under `name` (of any type)
    pub fn contains(&self, name: &str) -> bool {
        self.variables.read().unwrap().contains_key(name)
    }

    /// Number of registered variables
    pub fn len(&self) -> usize {
        self.variables.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.read().unwrap().is_empty()
    }

    /// Serialize all variables to pretty JSON (sorted by name, so
    /// emitted files are deterministic)
    pub fn to_json(&self) -> String {
        let variables = self.variables.read().unwrap();
        let values: BTreeMap<&str, String> = variables
            .iter()
            .map(|(name, variable)| (name.as_str(), variable.to_string_value()))
            .collect();
        serde_json::to_string_pretty(&values).unwrap_or_else(|_| "{}".to_string())
    }

    /// Write all variables to a file as pretty JSON
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Load variable values from a JSON5 file (comments and trailing
    /// commas welcome). Returns the number of values applied.
    pub fn load_from_file(&self, path: &Path) -> Result<usize, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        self.apply(&content)
    }

    /// Apply a JSON5 object of name->string-value to existing
    /// variables. A file carries no type information, so unknown names
    /// are reported and skipped rather than registered, and a value
    /// the variable cannot parse leaves the stored value unchanged.
    pub fn apply(&self, content: &str) -> Result<usize, ConfigError> {
        let values: HashMap<String, String> =
            json5::from_str(content).map_err(|e| ConfigError::Parse {
                detail: e.to_string(),
            })?;
        let mut applied = 0;
        for (name, text) in &values {
            match self.get_erased(name) {
                Some(variable) => {
                    // Parse failures are reported by the variable itself
                    if variable.from_string_value(text) {
                        applied += 1;
                    }
                }
                None => {
                    self.report(
                        Level::Warn,
                        format!("config text sets unknown variable '{}'", name),
                    );
                }
            }
        }
        Ok(applied)
    }

    fn get_erased(&self, name: &str) -> Option<Arc<dyn ConfigVariable>> {
        self.variables.read().unwrap().get(name).cloned()
    }

    fn downcast_existing<T>(
        &self,
        name: &str,
        existing: &Arc<dyn ConfigVariable>,
    ) -> Result<Arc<TypedConfigVariable<T>>, ConfigError>
    where
        T: Clone + Display + FromStr + Send + Sync + 'static,
    {
        let stored = existing.type_name();
        Arc::clone(existing)
            .as_any_arc()
            .downcast::<TypedConfigVariable<T>>()
            .map_err(|_| {
                self.report(
                    Level::Error,
                    format!(
                        "config variable '{}' requested as {} but holds a {}",
                        name,
                        std::any::type_name::<T>(),
                        stored
                    ),
                );
                ConfigError::TypeMismatch {
                    name: name.to_string(),
                    stored,
                    requested: std::any::type_name::<T>(),
                }
            })
    }

    fn report(&self, level: Level, message: String) {
        if let Some(logger) = &self.diagnostics {
            let record = Record::capture(level, file!(), line!()).with_message(message);
            logger.log(level, &record);
        }
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}
