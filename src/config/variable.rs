// SPDX-License-Identifier: Apache-2.0 OR MIT
// Type-erased config variables and their typed concrete holder

use crate::logging::{Level, Logger, Record};
use std::any::Any;
use std::fmt::{Display, Write};
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// Type-erased named setting with a string-serialization contract.
///
/// The concrete type behind this trait is always
/// [`TypedConfigVariable<T>`]; `as_any_arc` is the safe-downcast hook
/// the registry uses to detect a stored-type mismatch instead of
/// reinterpreting.
pub trait ConfigVariable: Send + Sync {
    /// Variable name (immutable after creation)
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Runtime name of the stored value type, for mismatch diagnostics
    fn type_name(&self) -> &'static str;

    /// Serialize the current value to text.
    ///
    /// Returns an empty string (and reports through the diagnostic
    /// channel) if the value cannot be rendered.
    fn to_string_value(&self) -> String;

    /// Parse `text` and replace the stored value.
    ///
    /// On parse failure the stored value is left unchanged and false is
    /// returned; a malformed value is never partially applied.
    fn from_string_value(&self, text: &str) -> bool;

    /// Safe-downcast hook
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Concrete holder of a value of type T.
///
/// T supplies the string conversion both ways through `Display` and
/// `FromStr`, covering integers, floats, booleans, strings, and
/// [`Level`] alike. Conversion failures are reported through the
/// diagnostic channel: an optional logger handle injected by the
/// registry that created the variable.
pub struct TypedConfigVariable<T> {
    name: String,
    description: String,
    value: RwLock<T>,
    diagnostics: Option<Arc<Logger>>,
}

impl<T> TypedConfigVariable<T>
where
    T: Clone + Display + FromStr + Send + Sync + 'static,
{
    /// Create a standalone variable (no diagnostic channel)
    pub fn new(name: impl Into<String>, default_value: T, description: impl Into<String>) -> Self {
        Self::with_diagnostics(name, default_value, description, None)
    }

    pub(crate) fn with_diagnostics(
        name: impl Into<String>,
        default_value: T,
        description: impl Into<String>,
        diagnostics: Option<Arc<Logger>>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value: RwLock::new(default_value),
            diagnostics,
        }
    }

    /// Get a copy of the current value
    pub fn value(&self) -> T {
        self.value.read().unwrap().clone()
    }

    /// Replace the current value
    pub fn set_value(&self, value: T) {
        *self.value.write().unwrap() = value;
    }

    fn report(&self, message: String) {
        if let Some(logger) = &self.diagnostics {
            let record = Record::capture(Level::Error, file!(), line!()).with_message(message);
            logger.error(&record);
        }
    }
}

impl<T> ConfigVariable for TypedConfigVariable<T>
where
    T: Clone + Display + FromStr + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn to_string_value(&self) -> String {
        let value = self.value.read().unwrap();
        let mut text = String::new();
        if write!(text, "{}", *value).is_err() {
            drop(value);
            self.report(format!(
                "config variable '{}': failed to render {} value as text",
                self.name,
                std::any::type_name::<T>()
            ));
            return String::new();
        }
        text
    }

    fn from_string_value(&self, text: &str) -> bool {
        match text.parse::<T>() {
            Ok(parsed) => {
                *self.value.write().unwrap() = parsed;
                true
            }
            Err(_) => {
                self.report(format!(
                    "config variable '{}': cannot parse '{}' as {}",
                    self.name,
                    text,
                    std::any::type_name::<T>()
                ));
                false
            }
        }
    }

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
