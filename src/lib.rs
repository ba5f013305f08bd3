//! `cmdtree` is a command tree parser for Rust.
//!
//! A Cli program is configured as a tree of [`Command`]s.
//! Each command is invoked by its name, carries its own set of typed [`Flag`]s, and may have a run handler.
//! Parsing walks the input tokens down the tree, collecting the flags of each command along the way, and invokes the handler of the command it ends on.
//! `cmdtree` attempts to prioritize the following design concerns:
//! * *Sub-command paradigm*:
//! Related programs are collected into a single Cli by nesting commands (ex: `tool remote add`).
//! * *Typed flags*:
//! A flag's type is taken from its default value (one of `i32`, `f32`, `f64`, `bool`, or `String`).
//! Handlers read flag values back out by type; the user never calls any `&str -> T` conversion function directly.
//! * *Detailed yet basic UX*:
//! Every command gets `--help`/`-h` and a `help` sub-command.
//! Errors point out the offending token.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/server.rs")]
//! ```
//!
//! This generates the following Cli program:
//! ```console
//! $ server -h
//! usage: server [-h] [-c CONFIG] [-p PORT] [COMMAND]
//!
//! An example server.
//!
//! commands:
//!  help                     Show the help message of a command.
//!  serve                    Start serving requests.
//!  version                  Show the version information.
//!
//! flags:
//!  -h, --help               Show this help message and exit.
//!  -c CONFIG, --config CONFIG
//!                           The config file. (default: "config.yaml")   string
//!  ...
//!
//! $ server --port 9090
//! Loaded 'config.yaml', ready to serve on port 9090.
//!
//! $ server serve -p=9090 --verbose
//! Serving on port 9090 (verbose: true).
//!
//! $ server --port abc
//! Parse error: invalid value for flag 'port': cannot convert 'abc' to int.
//! server --port abc
//!               ^
//! ```
//!
//! # Flags
//! Flags are given in any of the following forms:
//! * `--name value` or `--name=value`.
//! * `-n value` or `-n=value`, where `n` is the flag's shorthand.
//!
//! A separate value token is only taken when it does not itself start with `-`.
//! Values that do (ex: negative numbers) must use the `=` form: `--offset=-1`.
//!
//! Boolean flags may be given without any value, in which case they are set to `true`.
//! Like every other flag, they take a following token which does not start with `-` as their value, so it must be a boolean literal (`true`, `false`, `1`, `0`).
//! To set one right before a subcommand, use the `=` form (`--verbose=true serve`).
//!
//! Every dispatch starts from the flag defaults; a handler sees only the flags of its own command.
//!
//! # Sub-commands
//! The first bare word of a command's tokens names the child command that takes over the remaining tokens.
//! The word `help` instead prints the help of the child it precedes.
//!
//! ```no_run
#![doc = include_str!("../demos/remote.rs")]
//! ```
//!
//! # Exit codes
//! [`GeneralParser::execute`] and [`GeneralParser::parse`] return the exit code:
//! * the value returned by the dispatched handler,
//! * `0` after printing help, or printing the usage of a command without a handler,
//! * `-1` when the tokens cannot be parsed.
//!
//! # Features
//! * `unit_test`: exposes [`Command::test_args`], to check the [`Args`] a command tree produces without invoking any handler.
//! * `tracing_debug`: emits `tracing` debug events for every dispatch decision.
pub use cmdtree_builder::*;
