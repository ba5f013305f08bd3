use crate::model::{Value, ValueType};
use crate::parser::FlagParameter;

/// A named, typed option of a [`Command`](crate::Command).
///
/// The type of the flag is taken from its default value.
/// The default is never modified by parsing; every dispatch starts from it afresh.
///
/// ### Example
/// ```
/// # use cmdtree_builder as cmdtree;
/// use cmdtree::{Flag, ValueType};
///
/// let flag = Flag::new("port", 8080)
///     .short('p')
///     .help("The port to listen on.");
///
/// assert_eq!(flag.name(), "port");
/// assert_eq!(flag.shorthand(), Some('p'));
/// assert_eq!(flag.value_type(), ValueType::Int);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    name: String,
    short: Option<char>,
    help: Option<String>,
    default: Value,
}

impl Flag {
    /// Create a flag from its name and default value.
    pub fn new(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            short: None,
            help: None,
            default: default.into(),
        }
    }

    /// Set the single character alias, used as `-c`.
    /// If repeated, only the final shorthand will apply.
    pub fn short(mut self, short: char) -> Self {
        self.short.replace(short);
        self
    }

    /// Document the flag.
    /// If repeated, only the final help message will apply.
    pub fn help(mut self, message: impl Into<String>) -> Self {
        self.help.replace(message.into());
        self
    }

    /// The name, used as `--name`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The single character alias, if any.
    pub fn shorthand(&self) -> Option<char> {
        self.short
    }

    /// The help message, if any.
    pub fn help_message(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The default value.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// The type of the flag, as resolved from its default value.
    pub fn value_type(&self) -> ValueType {
        self.default.value_type()
    }

    /// Whether `key` names this flag, by either its name or its shorthand.
    pub(crate) fn answers_to(&self, key: &str) -> bool {
        if self.name == key {
            return true;
        }

        let mut chars = key.chars();
        match (self.short, chars.next(), chars.next()) {
            (Some(short), Some(c), None) => short == c,
            _ => false,
        }
    }
}

impl From<&Flag> for FlagParameter {
    fn from(value: &Flag) -> Self {
        let default = match &value.default {
            // An empty text default is no default at all, as far as the help message goes.
            Value::Text(text) if text.is_empty() => None,
            Value::Text(text) => Some(format!("\"{text}\"")),
            other => Some(other.to_string()),
        };

        FlagParameter::new(
            value.name.clone(),
            value.short,
            value.value_type(),
            value.help.clone(),
            default,
        )
    }
}
