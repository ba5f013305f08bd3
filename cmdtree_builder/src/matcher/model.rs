use crate::constant::*;

const LONG_PREFIX: &str = "--";
const SHORT_PREFIX: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prefix {
    Long,
    Short,
}

impl Prefix {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Prefix::Long => LONG_PREFIX,
            Prefix::Short => SHORT_PREFIX,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.as_str().len()
    }
}

/// A single Cli token, classified without any knowledge of the command it is fed to.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Token<'t> {
    /// Precisely `--help` or `-h`.
    HelpRequest,
    /// `--key`, `--key=value`, `-k`, or `-k=value`.
    Flag {
        prefix: Prefix,
        key: &'t str,
        inline: Option<&'t str>,
    },
    /// Anything without a `-` prefix.
    Word(&'t str),
}

impl<'t> Token<'t> {
    pub(crate) fn classify(token: &'t str) -> Self {
        if is_help_request(token) {
            return Token::HelpRequest;
        }

        let (prefix, body) = if let Some(body) = token.strip_prefix(LONG_PREFIX) {
            (Prefix::Long, body)
        } else if let Some(body) = token.strip_prefix(SHORT_PREFIX) {
            (Prefix::Short, body)
        } else {
            return Token::Word(token);
        };

        // Only the first '=' separates; the rest belong to the value.
        match body.split_once('=') {
            Some((key, value)) => Token::Flag {
                prefix,
                key,
                inline: Some(value),
            },
            None => Token::Flag {
                prefix,
                key: body,
                inline: None,
            },
        }
    }
}

pub(crate) fn is_help_request(token: &str) -> bool {
    token == format!("{LONG_PREFIX}{HELP_NAME}") || token == format!("{SHORT_PREFIX}{HELP_SHORT}")
}

/// Whether a token could be taken as the separate value of a preceding flag.
pub(crate) fn is_value_candidate(token: &str) -> bool {
    !token.starts_with(SHORT_PREFIX)
}
