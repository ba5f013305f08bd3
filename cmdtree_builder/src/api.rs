mod args;
mod core;
mod flag;

pub use self::args::*;
pub use self::core::*;
pub use self::flag::*;
