use thiserror::Error;

use crate::api::{Args, Command};
use crate::constant::*;
use crate::matcher::*;
use crate::model::{InvalidConversion, Value};
use crate::parser::ErrorContext;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A problem with how the command tree was put together.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

/// A problem with the tokens handed to the command tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// There were no tokens at all, not even the program name.
    #[error("Parse error: empty input.")]
    EmptyInput,
    /// A flag token which names no flag of the current command.
    #[error("Parse error: unknown flag '{0}'.")]
    UnknownFlag(String),
    /// A bare word which names no subcommand of the current command.
    #[error("Parse error: unknown command '{0}'.")]
    UnknownCommand(String),
    /// A flag value which cannot be coerced into the flag's type.
    #[error("Parse error: invalid value for flag '{flag}': {source}")]
    InvalidFlagValue {
        /// The flag name.
        flag: String,
        /// The underlying conversion failure.
        source: InvalidConversion,
    },
    /// A non-boolean flag given without any value.
    #[error("Parse error: flag '{0}' requires a value.")]
    MissingFlagValue(String),
}

/// What a dispatch decided to do.
#[derive(Debug)]
pub(crate) enum Action<'c, 'a> {
    PrintHelp(&'c Command<'a>),
    PrintUsage(&'c Command<'a>),
    Run(&'c Command<'a>, Args),
}

/// A dispatch which could not complete, along with the command whose turn it was.
#[derive(Debug)]
pub(crate) struct Failure<'c, 'a> {
    pub(crate) node: &'c Command<'a>,
    pub(crate) error: ParseError,
    pub(crate) context: Option<ErrorContext>,
}

// (token index, column within the token, error)
type Rejection = (usize, usize, ParseError);

/// Route `tokens` through the command tree.
///
/// `tokens[start]` is the name `node` was invoked by; everything after it belongs to `node`'s turn.
/// The first bare word naming a child hands the remaining tokens over to that child, and `node`'s turn ends.
pub(crate) fn resolve<'c, 'a>(
    node: &'c Command<'a>,
    tokens: &[&str],
    start: usize,
) -> Result<Action<'c, 'a>, Failure<'c, 'a>> {
    if tokens.len() <= start {
        return Err(Failure {
            node,
            error: ParseError::EmptyInput,
            context: None,
        });
    }

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Dispatching '{}' with {:?}.", node.path(), &tokens[start + 1..]);
    }

    // Each dispatch starts over from the registered defaults.
    let mut args = Args::seeded(node.flags());
    let mut index = start + 1;

    while index < tokens.len() {
        match Token::classify(tokens[index]) {
            Token::HelpRequest => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Help requested at token {index} for '{}'.", node.path());
                }

                return Ok(Action::PrintHelp(node));
            }
            Token::Flag {
                prefix,
                key,
                inline,
            } => match capture(node, &mut args, tokens, index, prefix, key, inline) {
                Ok(consumed) => index += consumed,
                Err(rejection) => return fail(node, tokens, rejection),
            },
            Token::Word(HELP_NAME) => return help_target(node, tokens, index),
            Token::Word(word) => match node.find_command(word) {
                Some(child) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Descending from '{}' into '{word}'.", node.path());
                    }

                    return resolve(child, tokens, index);
                }
                None => {
                    return fail(
                        node,
                        tokens,
                        (index, 0, ParseError::UnknownCommand(word.to_string())),
                    )
                }
            },
        }
    }

    if node.is_runnable() {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Running '{}' with {args:?}.", node.path());
        }

        Ok(Action::Run(node, args))
    } else {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("'{}' has nothing to run.", node.path());
        }

        Ok(Action::PrintUsage(node))
    }
}

/// Capture the flag at `tokens[index]`, returning how many tokens it consumed.
fn capture(
    node: &Command,
    args: &mut Args,
    tokens: &[&str],
    index: usize,
    prefix: Prefix,
    key: &str,
    inline: Option<&str>,
) -> Result<usize, Rejection> {
    let flag = node.find_flag(key).ok_or_else(|| {
        (
            index,
            0,
            ParseError::UnknownFlag(format!("{}{key}", prefix.as_str())),
        )
    })?;
    let default = flag.default_value();
    let invalid = |source| ParseError::InvalidFlagValue {
        flag: flag.name().to_string(),
        source,
    };

    let (value, consumed) = match inline {
        Some(token) => {
            // Point just past the '='.
            let column = prefix.len() + key.chars().count() + 1;
            let value = default
                .coerce(token)
                .map_err(|source| (index, column, invalid(source)))?;
            (value, 1)
        }
        None => match tokens.get(index + 1) {
            Some(next) if is_value_candidate(next) => {
                let value = default
                    .coerce(next)
                    .map_err(|source| (index + 1, 0, invalid(source)))?;
                (value, 2)
            }
            _ if default.is_bool() => (Value::Bool(true), 1),
            _ => {
                return Err((
                    index,
                    0,
                    ParseError::MissingFlagValue(flag.name().to_string()),
                ))
            }
        },
    };

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Captured '{}' as {value:?}.", flag.name());
    }

    args.capture(flag.name(), value);
    Ok(consumed)
}

/// Handle the `help` pseudo-command at `tokens[index]`.
fn help_target<'c, 'a>(
    node: &'c Command<'a>,
    tokens: &[&str],
    index: usize,
) -> Result<Action<'c, 'a>, Failure<'c, 'a>> {
    match tokens.get(index + 1) {
        None => Ok(Action::PrintHelp(node)),
        Some(name) => match node.find_command(name) {
            Some(child) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Help requested for '{}'.", child.path());
                }

                Ok(Action::PrintHelp(child))
            }
            None => fail(
                node,
                tokens,
                (index + 1, 0, ParseError::UnknownCommand(name.to_string())),
            ),
        },
    }
}

fn fail<'c, 'a>(
    node: &'c Command<'a>,
    tokens: &[&str],
    rejection: Rejection,
) -> Result<Action<'c, 'a>, Failure<'c, 'a>> {
    let (index, column, error) = rejection;

    // A help request at or after the failure still wins.
    if tokens[index..].iter().any(|token| is_help_request(token)) {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Suppressing '{error}' in favour of help for '{}'.", node.path());
        }

        return Ok(Action::PrintHelp(node));
    }

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Failing '{}' at token {index}: {error}", node.path());
    }

    Err(Failure {
        node,
        error,
        context: Some(ErrorContext::new(tokens, index, column)),
    })
}
