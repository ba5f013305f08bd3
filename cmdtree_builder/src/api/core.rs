use std::collections::BTreeMap;

use crate::api::{Args, Flag};
use crate::constant::*;
use crate::parser::{
    terminal_width, CommandParameter, ConfigError, ConsoleInterface, FlagParameter,
    GeneralParser, Printer, UserInterface,
};

#[cfg(feature = "unit_test")]
use crate::parser::{resolve, Action, ParseError};

type Handler<'a> = Box<dyn Fn(&Args) -> i32 + 'a>;

/// A node of the command tree.
///
/// A command has a name (the token it is invoked by), a set of [`Flag`]s, child commands, and optionally a run handler.
/// Children are moved into their parent, so a command can belong to at most one parent.
///
/// ### Example
/// ```
/// # use cmdtree_builder as cmdtree;
/// use cmdtree::{Command, Flag};
/// use std::cell::Cell;
///
/// let port = Cell::new(0);
/// let parser = Command::new("server")
///     .add_flag(Flag::new("port", 8080).short('p'))
///     .add_command(Command::new("version").run(|_| 0))
///     .run(|args| {
///         port.set(args.value::<i32>("port").unwrap());
///         0
///     })
///     .build();
///
/// assert_eq!(parser.execute(&["server", "-p", "9090"]), 0);
/// assert_eq!(port.get(), 9090);
/// ```
pub struct Command<'a> {
    name: String,
    about: Option<String>,
    description: Option<String>,
    handler: Option<Handler<'a>>,
    flags: Vec<Flag>,
    commands: BTreeMap<String, Command<'a>>,
    // The full path of the parent, informational only.
    parent: Option<String>,
    implicit: bool,
    deferred_error: Option<ConfigError>,
}

impl<'a> std::fmt::Debug for Command<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("path", &self.path())
            .field("flags", &self.flags)
            .field("commands", &self.commands.keys().collect::<Vec<&String>>())
            .field("runnable", &self.is_runnable())
            .finish()
    }
}

impl<'a> Command<'a> {
    /// Create a command invoked by `name`.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::Command;
    ///
    /// let parser = Command::new("program")
    ///     .build();
    ///
    /// // Without a run handler, the usage is printed.
    /// assert_eq!(parser.execute(&["program"]), 0);
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            description: None,
            handler: None,
            flags: Vec::default(),
            commands: BTreeMap::default(),
            parent: None,
            implicit: false,
            deferred_error: None,
        }
    }

    /// Document the command with a short summary, shown in the command list of its parent.
    /// If repeated, only the final message will apply.
    pub fn about(mut self, message: impl Into<String>) -> Self {
        self.about.replace(message.into());
        self
    }

    /// Document the command in full sentence/paragraph format, shown in its own help.
    /// If repeated, only the final message will apply.
    pub fn description(mut self, message: impl Into<String>) -> Self {
        self.description.replace(message.into());
        self
    }

    /// Set the run handler, invoked with the parsed [`Args`] when dispatch ends on this command.
    /// The value it returns becomes the exit code.
    /// If repeated, only the final handler will apply.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::Command;
    ///
    /// let parser = Command::new("program")
    ///     .run(|_| 7)
    ///     .build();
    ///
    /// assert_eq!(parser.execute(&["program"]), 7);
    /// ```
    pub fn run(mut self, handler: impl Fn(&Args) -> i32 + 'a) -> Self {
        self.handler.replace(Box::new(handler));
        self
    }

    /// Register a flag on this command.
    ///
    /// Flag names and shorthands share a single namespace per command, and must be unique within it.
    /// The help flag (`--help`/`-h`) is reserved.
    /// Problems are reported when the parser is built.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::{Command, Flag};
    ///
    /// let result = Command::new("program")
    ///     .add_flag(Flag::new("port", 8080).short('p'))
    ///     .add_flag(Flag::new("path", "").short('p'))
    ///     .build_parser();
    ///
    /// assert!(result.is_err());
    /// ```
    pub fn add_flag(mut self, flag: Flag) -> Self {
        if let Some(message) = self.flag_problem(&flag) {
            self.defer(message);
        } else {
            self.flags.push(flag);
        }

        self
    }

    fn flag_problem(&self, flag: &Flag) -> Option<String> {
        let name = flag.name();

        if !valid_name(name) || name.contains('=') {
            return Some(format!("Invalid flag name '{name}'."));
        }

        if let Some(short) = flag.shorthand() {
            if short == '-' || short == '=' || short.is_whitespace() {
                return Some(format!("Invalid short flag '{short}'."));
            }
        }

        if name == HELP_NAME || flag.shorthand() == Some(HELP_SHORT) {
            return Some(format!(
                "Cannot register the reserved flag '--{HELP_NAME}'/'-{HELP_SHORT}'."
            ));
        }

        if self.find_flag(name).is_some() {
            return Some(format!(
                "Cannot duplicate the flag '{name}' on command '{}'.",
                self.name
            ));
        }

        match flag.shorthand() {
            Some(short) if self.find_flag(&short.to_string()).is_some() => Some(format!(
                "Cannot duplicate the short flag '-{short}' on command '{}'.",
                self.name
            )),
            _ => None,
        }
    }

    /// Attach `command` as a child of this command, invoked by its name.
    ///
    /// Attaching a child guarantees that both the child and this command have a `help` subcommand.
    /// A child whose name is already taken is reported when the parser is built, except that the implicit `help` may be replaced.
    /// The word `help` always asks for help, so an authored `help` child only describes that, and may not have a run handler.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::Command;
    ///
    /// let tool = Command::new("tool")
    ///     .add_command(Command::new("remote")
    ///         .add_command(Command::new("add").run(|_| 0)));
    ///
    /// let remote = tool.find_command("remote").unwrap();
    /// assert_eq!(remote.find_command("add").unwrap().path(), "tool remote add");
    /// assert!(remote.find_command("help").is_some());
    /// assert!(tool.find_command("help").is_some());
    /// ```
    pub fn add_command(mut self, mut command: Command<'a>) -> Self {
        if !valid_name(&command.name) {
            self.defer(format!("Invalid command name '{}'.", command.name));
            return self;
        }

        if command.name == HELP_NAME && command.is_runnable() {
            self.defer(format!(
                "Cannot run the command '{HELP_NAME}' under '{}'; it is reserved for help.",
                self.name
            ));
            return self;
        }

        if let Some(existing) = self.commands.get(&command.name) {
            if !existing.implicit {
                self.defer(format!(
                    "Cannot duplicate the command '{}' under '{}'.",
                    command.name, self.name
                ));
                return self;
            }
        }

        command.ensure_help();
        command.adopt(self.path());
        self.commands.insert(command.name.clone(), command);
        self.ensure_help();
        self
    }

    fn ensure_help(&mut self) {
        if !self.commands.contains_key(HELP_NAME) {
            let mut help = Command::new(HELP_NAME).about(HELP_COMMAND_MESSAGE);
            help.implicit = true;
            help.parent.replace(self.path());
            self.commands.insert(HELP_NAME.to_string(), help);
        }
    }

    fn adopt(&mut self, parent: String) {
        self.parent.replace(parent);
        let path = self.path();

        for command in self.commands.values_mut() {
            command.adopt(path.clone());
        }
    }

    fn defer(&mut self, message: String) {
        // Only the first problem is reported.
        if self.deferred_error.is_none() {
            self.deferred_error.replace(ConfigError(message));
        }
    }

    /// The name this command is invoked by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The names from the root down to this command, space separated (ex: `tool remote add`).
    pub fn path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{parent} {}", self.name),
            None => self.name.clone(),
        }
    }

    /// The flags registered on this command, in registration order.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// The child commands, in name order.
    pub fn commands(&self) -> impl Iterator<Item = &Command<'a>> {
        self.commands.values()
    }

    /// Find a flag of this command by either its name or its shorthand.
    pub fn find_flag(&self, key: &str) -> Option<&Flag> {
        self.flags.iter().find(|flag| flag.answers_to(key))
    }

    /// Find a direct child of this command by name.
    pub fn find_command(&self, name: &str) -> Option<&Command<'a>> {
        self.commands.get(name)
    }

    /// The usage text of this command.
    pub fn usage(&self) -> String {
        Printer::from(self)
            .terminal_width(terminal_width())
            .usage_lines()
            .join("\n")
    }

    /// The help text of this command.
    pub fn help(&self) -> String {
        Printer::from(self)
            .terminal_width(terminal_width())
            .help_lines()
            .join("\n")
    }

    pub(crate) fn is_runnable(&self) -> bool {
        self.handler.is_some()
    }

    pub(crate) fn invoke(&self, args: &Args) -> Option<i32> {
        self.handler.as_ref().map(|handler| handler(args))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(error) = &self.deferred_error {
            return Err(error.clone());
        }

        self.commands.values().try_for_each(Command::validate)
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
        terminal_width: Option<usize>,
    ) -> Result<GeneralParser<'a>, ConfigError> {
        self.validate()?;
        Ok(GeneralParser::new(self, user_interface, terminal_width))
    }

    /// Build the command tree into a parser, as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated flag name) anywhere in the tree.
    pub fn build_parser(self) -> Result<GeneralParser<'a>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()), terminal_width())
    }

    /// Build the command tree into a parser.
    /// This finalizes the configuration and checks for errors (ex: a repeated flag name) anywhere in the tree.
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser<'a> {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }

    /// Dispatch `tokens` without invoking any handler, returning the arguments the dispatched handler would receive.
    ///
    /// As with [`GeneralParser::execute`], `tokens[0]` is the name of this command.
    /// Returns `Ok(None)` when the dispatch would print help or usage instead.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::{Command, Flag};
    ///
    /// let command = Command::new("program")
    ///     .add_flag(Flag::new("verbose", false))
    ///     .run(|_| unreachable!());
    ///
    /// let args = command.test_args(&["program", "--verbose"]).unwrap().unwrap();
    /// assert!(args.value::<bool>("verbose").unwrap());
    /// ```
    #[cfg(feature = "unit_test")]
    pub fn test_args(&self, tokens: &[&str]) -> Result<Option<Args>, ParseError> {
        match resolve(self, tokens, 0) {
            Ok(Action::Run(_, args)) => Ok(Some(args)),
            Ok(_) => Ok(None),
            Err(failure) => Err(failure.error),
        }
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('-') && !name.contains(char::is_whitespace)
}

impl<'a> From<&Command<'a>> for Printer {
    fn from(value: &Command<'a>) -> Self {
        Printer::new(
            value.path(),
            value.about.clone(),
            value.description.clone(),
            value.flags.iter().map(FlagParameter::from).collect(),
            value
                .commands
                .values()
                .map(|command| CommandParameter::new(command.name.clone(), command.about.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_contains;
    use rstest::rstest;

    fn assert_config_error(command: Command, expected: &str) {
        let result = command.validate();
        assert_matches!(result, Err(ConfigError(message)) => {
            assert_contains!(message, expected);
        });
    }

    fn names(command: &Command) -> Vec<String> {
        command
            .commands()
            .map(|command| command.name().to_string())
            .collect()
    }

    #[test]
    fn new() {
        // Execute
        let command = Command::new("program");

        // Verify
        assert_eq!(command.name(), "program");
        assert_eq!(command.path(), "program");
        assert!(command.flags().is_empty());
        assert_eq!(command.commands().count(), 0);
        assert!(!command.is_runnable());
        assert_eq!(command.invoke(&Args::default()), None);
        command.validate().unwrap();
    }

    #[test]
    fn run() {
        let command = Command::new("program")
            .run(|_| 1)
            .run(|args| args.len() as i32 + 2);
        assert!(command.is_runnable());
        assert_eq!(command.invoke(&Args::default()), Some(2));
    }

    #[test]
    fn add_flag() {
        // Execute
        let command = Command::new("program")
            .add_flag(Flag::new("port", 8080).short('p'))
            .add_flag(Flag::new("config", ""));

        // Verify
        command.validate().unwrap();
        let flags: Vec<&str> = command.flags().iter().map(Flag::name).collect();
        assert_eq!(flags, vec!["port", "config"]);
        assert_eq!(command.find_flag("port").unwrap().name(), "port");
        assert_eq!(command.find_flag("p").unwrap().name(), "port");
        assert_eq!(command.find_flag("config").unwrap().name(), "config");
        assert_eq!(command.find_flag("c"), None);
        assert_eq!(command.find_flag("bogus"), None);
    }

    #[rstest]
    #[case(Flag::new("port", 1), "Cannot duplicate the flag 'port' on command 'program'.")]
    #[case(Flag::new("other", 1).short('p'), "Cannot duplicate the short flag '-p' on command 'program'.")]
    #[case(Flag::new("p", 1), "Cannot duplicate the flag 'p' on command 'program'.")]
    #[case(Flag::new("x", 1).short('v'), "Cannot duplicate the short flag '-v' on command 'program'.")]
    #[case(Flag::new("help", 1), "Cannot register the reserved flag '--help'/'-h'.")]
    #[case(Flag::new("hint", 1).short('h'), "Cannot register the reserved flag '--help'/'-h'.")]
    #[case(Flag::new("", 1), "Invalid flag name ''.")]
    #[case(Flag::new("-port", 1), "Invalid flag name '-port'.")]
    #[case(Flag::new("a=b", 1), "Invalid flag name 'a=b'.")]
    #[case(Flag::new("a b", 1), "Invalid flag name 'a b'.")]
    #[case(Flag::new("dash", 1).short('-'), "Invalid short flag '-'.")]
    #[case(Flag::new("equals", 1).short('='), "Invalid short flag '='.")]
    fn add_flag_invalid(#[case] flag: Flag, #[case] expected: &str) {
        // Setup
        let command = Command::new("program")
            .add_flag(Flag::new("port", 8080).short('p'))
            .add_flag(Flag::new("v", false));

        // Execute
        let command = command.add_flag(flag);

        // Verify
        assert_eq!(command.flags().len(), 2);
        assert_config_error(command, expected);
    }

    #[test]
    fn first_error_kept() {
        let command = Command::new("program")
            .add_flag(Flag::new("help", false))
            .add_flag(Flag::new("", false));
        assert_config_error(command, "reserved");
    }

    #[test]
    fn add_command() {
        // Execute
        let command = Command::new("server")
            .add_command(Command::new("version").about("Print the version."))
            .add_command(Command::new("serve"));

        // Verify
        command.validate().unwrap();
        assert_eq!(names(&command), vec!["help", "serve", "version"]);
        let version = command.find_command("version").unwrap();
        assert_eq!(version.path(), "server version");
        assert_eq!(names(version), vec!["help"]);
        assert_eq!(version.find_command("help").unwrap().path(), "server version help");
        assert_eq!(command.find_command("help").unwrap().path(), "server help");
        assert_eq!(command.find_command("nope").map(Command::name), None);
    }

    #[test]
    fn add_command_nested_later() {
        // Setup
        let remote = Command::new("remote").add_command(Command::new("add"));
        assert_eq!(remote.find_command("add").unwrap().path(), "remote add");

        // Execute
        let tool = Command::new("tool").add_command(remote);

        // Verify
        let remote = tool.find_command("remote").unwrap();
        assert_eq!(remote.path(), "tool remote");
        assert_eq!(remote.find_command("add").unwrap().path(), "tool remote add");
        assert_eq!(
            remote
                .find_command("add")
                .unwrap()
                .find_command("help")
                .unwrap()
                .path(),
            "tool remote add help"
        );
        assert_eq!(remote.find_command("help").unwrap().path(), "tool remote help");
    }

    #[test]
    fn help_implicit() {
        // Setup
        let command = Command::new("server").add_command(Command::new("serve"));

        // Execute
        let help = command.find_command("help").unwrap();

        // Verify
        assert!(help.implicit);
        assert!(!help.is_runnable());
        assert_eq!(help.about.as_deref(), Some(HELP_COMMAND_MESSAGE));
        // The implicit help has no help of its own.
        assert_eq!(help.commands().count(), 0);
    }

    #[test]
    fn help_replaced() {
        // Execute
        let command = Command::new("server")
            .add_command(Command::new("serve"))
            .add_command(Command::new("help").about("Custom help."));

        // Verify
        command.validate().unwrap();
        let help = command.find_command("help").unwrap();
        assert!(!help.implicit);
        assert_eq!(help.about.as_deref(), Some("Custom help."));
        assert!(!help.is_runnable());
    }

    #[test]
    fn help_with_handler() {
        // Setup
        let command = Command::new("server")
            .add_command(Command::new("serve"))
            .add_command(Command::new("help").run(|_| 5));

        // Execute & verify
        assert_config_error(command, "reserved for help");
    }

    #[test]
    fn help_authored_first() {
        // Execute
        let command = Command::new("server")
            .add_command(Command::new("help").about("Custom help."))
            .add_command(Command::new("serve"));

        // Verify
        command.validate().unwrap();
        let help = command.find_command("help").unwrap();
        assert!(!help.implicit);
        assert_eq!(help.about.as_deref(), Some("Custom help."));
    }

    #[test]
    fn help_authored_twice() {
        let command = Command::new("server")
            .add_command(Command::new("help"))
            .add_command(Command::new("help"));
        assert_config_error(command, "Cannot duplicate the command 'help' under 'server'.");
    }

    #[test]
    fn add_command_duplicate() {
        // Execute
        let command = Command::new("server")
            .add_command(Command::new("serve").about("first"))
            .add_command(Command::new("serve").about("second"));

        // Verify
        assert_eq!(
            command.find_command("serve").unwrap().about.as_deref(),
            Some("first")
        );
        assert_config_error(command, "Cannot duplicate the command 'serve' under 'server'.");
    }

    #[rstest]
    #[case("")]
    #[case("-serve")]
    #[case("two words")]
    fn add_command_invalid(#[case] name: &str) {
        let command = Command::new("server").add_command(Command::new(name));
        assert_eq!(command.commands().count(), 0);
        assert_config_error(command, &format!("Invalid command name '{name}'."));
    }

    #[test]
    fn validate_nested() {
        // Setup
        let command = Command::new("tool").add_command(
            Command::new("remote")
                .add_command(Command::new("add").add_flag(Flag::new("name", "").short('h'))),
        );

        // Execute
        let result = command.build_parser();

        // Verify
        assert_matches!(result, Err(ConfigError(message)) => {
            assert_contains!(message, "reserved");
        });
    }

    #[test]
    fn build_parser() {
        let command = Command::new("tool").add_command(Command::new("remote"));
        let parser = command.build_parser().unwrap();
        assert_eq!(parser.root().path(), "tool");
    }

    #[test]
    fn usage_help_repeatable() {
        // Setup
        let command = Command::new("server")
            .about("Serve things.")
            .add_flag(Flag::new("port", 8080).short('p'))
            .add_command(Command::new("serve"));

        // Execute
        let usage = command.usage();
        let help = command.help();

        // Verify
        assert_eq!(usage, command.usage());
        assert_eq!(help, command.help());
        assert_contains!(usage, "usage: server [-h] [-p PORT] [COMMAND]");
        assert!(!usage.contains("Serve things."));
        assert_contains!(help, "Serve things.");
        assert_contains!(help, "Use \"server [COMMAND] --help\"");
        command.validate().unwrap();
        assert_eq!(command.flags().len(), 1);
        assert_eq!(names(&command), vec!["help", "serve"]);
    }

    #[test]
    fn debug() {
        let command = Command::new("server")
            .add_command(Command::new("serve"))
            .run(|_| 0);
        let text = format!("{command:?}");
        assert_contains!(text, "path: \"server\"");
        assert_contains!(text, "runnable: true");
    }

    #[cfg(feature = "unit_test")]
    #[test]
    fn test_args() {
        // Setup
        let command = Command::new("server")
            .add_flag(Flag::new("port", 8080))
            .run(|_| unreachable!())
            .add_command(Command::new("serve").add_flag(Flag::new("verbose", false)).run(|_| unreachable!()));

        // Execute
        let root = command.test_args(&["server", "--port", "1"]).unwrap().unwrap();
        let child = command.test_args(&["server", "serve", "--verbose"]).unwrap().unwrap();
        let help = command.test_args(&["server", "--help"]).unwrap();
        let error = command.test_args(&["server", "--bogus"]).unwrap_err();

        // Verify
        assert_eq!(root.value::<i32>("port").unwrap(), 1);
        assert!(child.value::<bool>("verbose").unwrap());
        assert_eq!(help, None);
        assert_eq!(error, ParseError::UnknownFlag("--bogus".to_string()));
    }
}
