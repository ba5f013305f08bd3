//! Builder module for `cmdtree`.
//! See [documentation root](https://docs.rs/cmdtree/latest/cmdtree/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod matcher;
mod model;
mod parser;

pub use api::*;
pub use model::{InvalidConversion, Primitive, TypeMismatch, Value, ValueType};
pub use parser::{ConfigError, GeneralParser, ParseError};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
