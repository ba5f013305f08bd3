use terminal_size::{terminal_size, Width};

use crate::constant::*;
use crate::model::ValueType;
use crate::parser::interface::UserInterface;
use crate::parser::ColumnRenderer;

const MAIN_INDENT: usize = 1;

pub(crate) fn terminal_width() -> Option<usize> {
    if let Some((Width(terminal_width), _)) = terminal_size() {
        Some(terminal_width as usize)
    } else {
        None
    }
}

pub(crate) struct FlagParameter {
    name: String,
    short: Option<char>,
    value_type: ValueType,
    help: Option<String>,
    default: Option<String>,
}

impl FlagParameter {
    pub(crate) fn new(
        name: String,
        short: Option<char>,
        value_type: ValueType,
        help: Option<String>,
        default: Option<String>,
    ) -> Self {
        Self {
            name,
            short,
            value_type,
            help,
            default,
        }
    }

    fn placeholder(&self) -> Option<String> {
        match self.value_type {
            // Booleans are switched on by their mere presence.
            ValueType::Bool => None,
            _ => Some(self.name.to_ascii_uppercase().replace('-', "_")),
        }
    }

    fn synopsis(&self) -> String {
        match (self.short, self.placeholder()) {
            (Some(short), Some(placeholder)) => format!("[-{short} {placeholder}]"),
            (Some(short), None) => format!("[-{short}]"),
            (None, Some(placeholder)) => format!("[--{} {placeholder}]", self.name),
            (None, None) => format!("[--{}]", self.name),
        }
    }

    fn grammar(&self) -> String {
        let value = self
            .placeholder()
            .map(|placeholder| format!(" {placeholder}"))
            .unwrap_or_default();

        match self.short {
            // Ex: "-f FLAG, --flag FLAG"
            Some(short) => format!("-{short}{value}, --{}{value}", self.name),
            None => format!("--{}{value}", self.name),
        }
    }

    fn description(&self) -> String {
        match (&self.help, &self.default) {
            (Some(help), Some(default)) => format!("{help} (default: {default})"),
            (Some(help), None) => help.clone(),
            (None, Some(default)) => format!("(default: {default})"),
            (None, None) => String::default(),
        }
    }
}

pub(crate) struct CommandParameter {
    name: String,
    about: Option<String>,
}

impl CommandParameter {
    pub(crate) fn new(name: String, about: Option<String>) -> Self {
        Self { name, about }
    }
}

pub(crate) struct Printer {
    program: String,
    about: Option<String>,
    description: Option<String>,
    flags: Vec<FlagParameter>,
    commands: Vec<CommandParameter>,
    terminal_width: Option<usize>,
}

impl Printer {
    pub(crate) fn new(
        program: String,
        about: Option<String>,
        description: Option<String>,
        flags: Vec<FlagParameter>,
        commands: Vec<CommandParameter>,
    ) -> Self {
        Self {
            program,
            about,
            description,
            flags,
            commands,
            terminal_width: None,
        }
    }

    pub(crate) fn terminal_width(mut self, terminal_width: Option<usize>) -> Self {
        self.terminal_width = terminal_width;
        self
    }

    /// The synopsis, commands and flags.
    pub(crate) fn usage_lines(&self) -> Vec<String> {
        self.render(false)
    }

    /// The usage, plus descriptions and the subcommand footer.
    pub(crate) fn help_lines(&self) -> Vec<String> {
        self.render(true)
    }

    pub(crate) fn print_usage(&self, user_interface: &(impl UserInterface + ?Sized)) {
        for line in self.usage_lines() {
            user_interface.print(line);
        }
    }

    pub(crate) fn print_help(&self, user_interface: &(impl UserInterface + ?Sized)) {
        for line in self.help_lines() {
            user_interface.print(line);
        }
    }

    fn render(&self, detailed: bool) -> Vec<String> {
        let mut summary = vec![format!("[-{HELP_SHORT}]")];
        let mut flag_rows = vec![(
            format!("-{HELP_SHORT}, --{HELP_NAME}"),
            HELP_MESSAGE.to_string(),
            String::default(),
        )];

        for flag in &self.flags {
            summary.push(flag.synopsis());
            flag_rows.push((
                flag.grammar(),
                flag.description(),
                flag.value_type.name().to_string(),
            ));
        }

        if !self.commands.is_empty() {
            summary.push("[COMMAND]".to_string());
        }

        let command_rows: Vec<(String, String)> = self
            .commands
            .iter()
            .map(|command| (command.name.clone(), command.about.clone().unwrap_or_default()))
            .collect();

        let left_column_width = flag_rows
            .iter()
            .map(|(left, _, _)| text_width(left))
            .chain(command_rows.iter().map(|(left, _)| text_width(left)))
            .max()
            .unwrap_or_default();
        let middle_column_width = flag_rows
            .iter()
            .map(|(_, middle, _)| text_width(middle))
            .chain(command_rows.iter().map(|(_, middle)| text_width(middle)))
            .max()
            .unwrap_or_default();
        let right_column_width = flag_rows
            .iter()
            .map(|(_, _, right)| text_width(right))
            .max()
            .unwrap_or_default();
        let column_renderer = ColumnRenderer::fit(
            MAIN_INDENT,
            left_column_width,
            middle_column_width,
            right_column_width,
            self.terminal_width,
        );

        let mut lines = vec![format!(
            "usage: {p} {s}",
            p = self.program,
            s = summary.join(" ")
        )];

        if detailed {
            for paragraph in [&self.about, &self.description].into_iter().flatten() {
                lines.push(String::default());
                lines.push(paragraph.clone());
            }
        }

        if !command_rows.is_empty() {
            lines.push(String::default());
            lines.push("commands:".to_string());

            for (name, about) in &command_rows {
                lines.extend(column_renderer.render(name, about, ""));
            }
        }

        lines.push(String::default());
        lines.push("flags:".to_string());

        for (left, middle, right) in &flag_rows {
            lines.extend(column_renderer.render(left, middle, right));
        }

        if detailed && !self.commands.is_empty() {
            lines.push(String::default());
            lines.push(format!(
                "Use \"{} [COMMAND] --{HELP_NAME}\" for more information about a command.",
                self.program
            ));
        }

        lines
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}

/// The tokens of a failed parse, with a caret under the offending position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    tokens: Vec<String>,
    index: usize,
    column: usize,
}

impl ErrorContext {
    /// Point at `column` (in characters) of the token at `index`.
    pub(crate) fn new(tokens: &[&str], index: usize, column: usize) -> Self {
        Self {
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
            index,
            column,
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let projection = self.tokens.join(" ");
        // The +1 accounts for the space joining each token.
        let offset = self
            .tokens
            .iter()
            .take(self.index)
            .map(|token| text_width(token) + 1)
            .sum::<usize>()
            + self.column;

        write!(
            f,
            "{projection}\n{:width$}^",
            "",
            width = std::cmp::min(offset, text_width(&projection))
        )
    }
}
