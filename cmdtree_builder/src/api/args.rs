use std::collections::BTreeMap;
use thiserror::Error;

use crate::api::Flag;
use crate::model::{Primitive, TypeMismatch, Value};

/// A failure to read a flag value out of [`Args`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArgsError {
    /// No flag of this name was registered on the dispatched command.
    #[error("no argument named '{0}'.")]
    Missing(String),
    /// The flag holds a different type than the one requested.
    #[error("argument '{name}': {source}")]
    Mismatch {
        /// The flag name.
        name: String,
        /// The underlying mismatch.
        source: TypeMismatch,
    },
}

/// The flag values handed to a command's run handler.
///
/// Every flag registered on the dispatched command is present: either with its default, or with the value parsed from the Cli.
/// Flags of ancestor commands are not included.
///
/// ### Example
/// ```
/// # use cmdtree_builder as cmdtree;
/// use cmdtree::{Args, Value};
///
/// let mut args = Args::default();
/// args.set("port", 8080).unwrap();
/// args.set("port", 9090).unwrap();
/// assert!(args.set("port", "not-an-int").is_err());
///
/// assert_eq!(args.value::<i32>("port").unwrap(), 9090);
/// assert_eq!(args.get("port"), Some(&Value::Int(9090)));
/// assert!(args.value::<i32>("host").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: BTreeMap<String, Value>,
}

impl Args {
    /// Seed with the defaults of `flags`.
    pub(crate) fn seeded(flags: &[Flag]) -> Self {
        Self {
            values: flags
                .iter()
                .map(|flag| (flag.name().to_string(), flag.default_value().clone()))
                .collect(),
        }
    }

    /// Overwrite with a value already coerced to the flag's type.
    pub(crate) fn capture(&mut self, name: &str, value: Value) {
        debug_assert!(self
            .values
            .get(name)
            .map_or(true, |current| current.value_type() == value.value_type()));
        self.values.insert(name.to_string(), value);
    }

    /// The value of the flag `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The value of the flag `name`, read as `T`.
    pub fn value<T: Primitive>(&self, name: &str) -> Result<T, ArgsError> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ArgsError::Missing(name.to_string()))?;
        value.get().map_err(|source| ArgsError::Mismatch {
            name: name.to_string(),
            source,
        })
    }

    /// Set the flag `name`.
    /// An existing entry may only be reassigned a value of the same type.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<(), TypeMismatch> {
        let name = name.into();
        let value = value.into();

        if let Some(current) = self.values.get(&name) {
            if current.value_type() != value.value_type() {
                return Err(TypeMismatch {
                    held: current.value_type(),
                    requested: value.value_type(),
                });
            }
        }

        self.values.insert(name, value);
        Ok(())
    }

    /// Whether the flag `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The number of flags present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no flags are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate the flags in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for Args {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
