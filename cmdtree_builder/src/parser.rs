mod base;
mod interface;
mod middleware;
mod printer;

pub(crate) use self::base::{resolve, Action, Failure};
pub use self::base::{ConfigError, ParseError};
pub(crate) use self::interface::*;
pub use self::middleware::GeneralParser;
pub(crate) use self::printer::*;
