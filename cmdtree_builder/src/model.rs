use thiserror::Error;

/// The type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// `i32`.
    Int,
    /// `f32`.
    Float,
    /// `f64`.
    Double,
    /// `bool`.
    Bool,
    /// `String`.
    Text,
}

impl ValueType {
    /// The stable name of this type, as shown in help messages.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::Bool => "bool",
            ValueType::Text => "string",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A flag value: precisely one of int, float, double, bool, or text.
///
/// ### Example
/// ```
/// # use cmdtree_builder as cmdtree;
/// use cmdtree::{Value, ValueType};
///
/// let value = Value::from(8080);
/// assert!(value.is_int());
/// assert_eq!(value.value_type(), ValueType::Int);
/// assert_eq!(value.type_name(), "int");
/// assert_eq!(value.as_int(), Ok(8080));
/// assert!(value.as_bool().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer value.
    Int(i32),
    /// A single precision floating point value.
    Float(f32),
    /// A double precision floating point value.
    Double(f64),
    /// A boolean value.
    Bool(bool),
    /// A text value.
    Text(String),
}

/// Reading or assigning a [`Value`] as a variant it does not hold.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("type mismatch: value holds {held}, not {requested}.")]
pub struct TypeMismatch {
    /// The type the value holds.
    pub held: ValueType,
    /// The type that was asked for.
    pub requested: ValueType,
}

/// A token which cannot be coerced into the type of its target value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot convert '{token}' to {value_type}.")]
pub struct InvalidConversion {
    /// The offending token.
    pub token: String,
    /// The type the token was coerced towards.
    pub value_type: ValueType,
}

/// Behaviour binding a Rust type to its [`Value`] variant.
pub trait Primitive: Sized {
    /// The variant which holds this type.
    const VALUE_TYPE: ValueType;

    /// Wrap into a [`Value`].
    fn into_value(self) -> Value;

    /// Read out of a [`Value`], if it holds this type.
    fn from_value(value: &Value) -> Option<Self>;
}

impl Primitive for i32 {
    const VALUE_TYPE: ValueType = ValueType::Int;

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(inner) => Some(*inner),
            _ => None,
        }
    }
}

impl Primitive for f32 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(inner) => Some(*inner),
            _ => None,
        }
    }
}

impl Primitive for f64 {
    const VALUE_TYPE: ValueType = ValueType::Double;

    fn into_value(self) -> Value {
        Value::Double(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Double(inner) => Some(*inner),
            _ => None,
        }
    }
}

impl Primitive for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(inner) => Some(*inner),
            _ => None,
        }
    }
}

impl Primitive for String {
    const VALUE_TYPE: ValueType = ValueType::Text;

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(inner) => Some(inner.clone()),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        value.into_value()
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        value.into_value()
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        value.into_value()
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        value.into_value()
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        value.into_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(inner) => write!(f, "{inner}"),
            Value::Float(inner) => write!(f, "{inner}"),
            Value::Double(inner) => write!(f, "{inner}"),
            Value::Bool(inner) => write!(f, "{inner}"),
            Value::Text(inner) => write!(f, "{inner}"),
        }
    }
}

/// Recognize the boolean literals `true`/`1` and `false`/`0` (case-insensitive).
pub(crate) fn parse_bool(token: &str) -> Option<bool> {
    if token.eq_ignore_ascii_case("true") || token == "1" {
        Some(true)
    } else if token.eq_ignore_ascii_case("false") || token == "0" {
        Some(false)
    } else {
        None
    }
}

impl Value {
    /// The type tag of the active variant.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::Bool(_) => ValueType::Bool,
            Value::Text(_) => ValueType::Text,
        }
    }

    /// The stable name of the active variant's type (ex: `"int"`).
    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    /// Whether this holds an int.
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Whether this holds a float.
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Whether this holds a double.
    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    /// Whether this holds a bool.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Whether this holds text.
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Read the value as `T`.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::Value;
    ///
    /// let value = Value::from("config.yaml");
    /// assert_eq!(value.get::<String>().unwrap(), "config.yaml");
    /// assert!(value.get::<i32>().is_err());
    /// ```
    pub fn get<T: Primitive>(&self) -> Result<T, TypeMismatch> {
        T::from_value(self).ok_or(TypeMismatch {
            held: self.value_type(),
            requested: T::VALUE_TYPE,
        })
    }

    /// Read the value as an int.
    pub fn as_int(&self) -> Result<i32, TypeMismatch> {
        self.get()
    }

    /// Read the value as a float.
    pub fn as_float(&self) -> Result<f32, TypeMismatch> {
        self.get()
    }

    /// Read the value as a double.
    pub fn as_double(&self) -> Result<f64, TypeMismatch> {
        self.get()
    }

    /// Read the value as a bool.
    pub fn as_bool(&self) -> Result<bool, TypeMismatch> {
        self.get()
    }

    /// Borrow the value as text.
    pub fn as_text(&self) -> Result<&str, TypeMismatch> {
        match self {
            Value::Text(inner) => Ok(inner.as_str()),
            _ => Err(TypeMismatch {
                held: self.value_type(),
                requested: ValueType::Text,
            }),
        }
    }

    /// Reassign in place.
    /// The new value must be of the same type as the one held.
    pub fn assign<T: Primitive>(&mut self, value: T) -> Result<(), TypeMismatch> {
        if self.value_type() != T::VALUE_TYPE {
            return Err(TypeMismatch {
                held: self.value_type(),
                requested: T::VALUE_TYPE,
            });
        }

        *self = value.into_value();
        Ok(())
    }

    /// Coerce a textual token into a new value of the same type as this one.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::Value;
    ///
    /// let port = Value::from(8080);
    /// assert_eq!(port.coerce("9090").unwrap(), Value::Int(9090));
    /// assert!(port.coerce("abc").is_err());
    ///
    /// let verbose = Value::from(false);
    /// assert_eq!(verbose.coerce("TRUE").unwrap(), Value::Bool(true));
    /// ```
    pub fn coerce(&self, token: &str) -> Result<Value, InvalidConversion> {
        let invalid = || InvalidConversion {
            token: token.to_string(),
            value_type: self.value_type(),
        };

        match self {
            Value::Int(_) => token.parse::<i32>().map(Value::Int).map_err(|_| invalid()),
            // Only finite numbers; `parse` would also take "nan" and "inf".
            Value::Float(_) => match token.parse::<f32>() {
                Ok(value) if value.is_finite() => Ok(Value::Float(value)),
                _ => Err(invalid()),
            },
            Value::Double(_) => match token.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Value::Double(value)),
                _ => Err(invalid()),
            },
            Value::Bool(_) => parse_bool(token).map(Value::Bool).ok_or_else(invalid),
            Value::Text(_) => Ok(Value::Text(token.to_string())),
        }
    }
}
