use crate::parser::{ErrorContext, ParseError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

// We'll target 95% of the total width, to ensure the renderer doesn't literally use the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

// Used when the terminal width cannot be detected.
const FALLBACK_MIDDLE_WIDTH: usize = 60;

pub(crate) const PADDING_WIDTH: usize = 3;

/// Lays out rows of `left | middle | right` text, wrapping the middle column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnRenderer {
    indent: usize,
    left: usize,
    middle: usize,
}

impl ColumnRenderer {
    /// Produce a renderer whose middle column is as wide as its widest entry, but narrowed to the terminal when it is known.
    pub(crate) fn fit(
        indent: usize,
        left: usize,
        middle: usize,
        right: usize,
        total_width: Option<usize>,
    ) -> Self {
        let mut fixed = indent + left + PADDING_WIDTH;

        if right > 0 {
            fixed += PADDING_WIDTH + right;
        }

        let limit = match total_width {
            Some(total) => ((total as f64 * TARGET_TOTAL_FACTOR) as usize).saturating_sub(fixed),
            None => FALLBACK_MIDDLE_WIDTH,
        };
        let fitted = std::cmp::max(std::cmp::min(middle, limit.max(MINIMUM_MIDDLE_WIDTH)), 1);

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Columns {fixed} with middle {middle} against total {total_width:?}.  Selecting middle: {fitted}.");
        }

        Self {
            indent,
            left,
            middle: fitted,
        }
    }

    pub(crate) fn render(&self, left: &str, middle: &str, right: &str) -> Vec<String> {
        let indent = self.indent;
        let left_width = self.left;
        let middle_width = self.middle;
        let padding = " ".repeat(PADDING_WIDTH);
        let mut parts = wrap(middle, middle_width).into_iter();
        let first = parts.next().unwrap_or_default();

        let head = if right.is_empty() {
            format!("{:indent$}{left:left_width$}{padding}{first}", "")
        } else {
            format!("{:indent$}{left:left_width$}{padding}{first:middle_width$}{padding}{right}", "")
        };
        let mut out = vec![head.trim_end().to_string()];

        for part in parts {
            out.push(format!("{:indent$}{:left_width$}{padding}{part}", "", ""));
        }

        out
    }
}

/// Break `paragraph` into lines of at most `width` characters, hyphenating words that cannot fit on any line.
pub(crate) fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        let word_width = word.chars().count();
        let current_width = current.chars().count();

        if !current.is_empty() && current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if word_width <= width || width < 2 {
            current.push_str(word);
        } else {
            let chars: Vec<char> = word.chars().collect();
            let mut pieces = chars.chunks(width - 1).peekable();

            while let Some(piece) = pieces.next() {
                let piece: String = piece.iter().collect();

                if pieces.peek().is_some() {
                    lines.push(format!("{piece}-"));
                } else {
                    current = piece;
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, error: ParseError);
    fn print_error_context(&self, error_context: ErrorContext);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: ParseError) {
        eprintln!("{error}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}
