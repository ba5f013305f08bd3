use std::env;

use crate::api::Command;
use crate::constant::*;
use crate::parser::{resolve, Action, Failure, ParseError, Printer, UserInterface};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The configured command tree, ready to dispatch.
/// Built via `Command::build` or `Command::build_parser`.
pub struct GeneralParser<'a> {
    root: Command<'a>,
    user_interface: Box<dyn UserInterface>,
    terminal_width: Option<usize>,
}

impl<'a> std::fmt::Debug for GeneralParser<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneralParser")
            .field("root", &self.root)
            .field("terminal_width", &self.terminal_width)
            .finish_non_exhaustive()
    }
}

impl<'a> GeneralParser<'a> {
    pub(crate) fn new(
        root: Command<'a>,
        user_interface: Box<dyn UserInterface>,
        terminal_width: Option<usize>,
    ) -> Self {
        Self {
            root,
            user_interface,
            terminal_width,
        }
    }

    /// The root of the command tree.
    pub fn root(&self) -> &Command<'a> {
        &self.root
    }

    /// Dispatch the input tokens through the command tree, returning the exit code.
    ///
    /// `tokens[0]` is the name the program was invoked by (conventionally `argv[0]`), and is otherwise ignored.
    /// Tokens are scanned left to right on behalf of the current command, starting at the root:
    /// 1. `--help` or `-h` prints the help of the current command and returns `0`.
    /// 2. A flag (`--name`, `--name=value`, `-n`, `-n=value`) is captured into the current command's arguments.
    /// A separate value token is only taken when it doesn't itself start with `-`.
    /// 3. The bare word `help` prints the help of the child it is followed by (or of the current command, if it is last), returning `0`.
    /// 4. Any other bare word must name a child command, which takes over the remaining tokens.
    ///
    /// Once the tokens are exhausted, the current command's run handler is invoked and its value returned.
    /// A command without a handler prints its usage and returns `0`.
    ///
    /// If at any point the parser encounters an error (ex: unknown flag, unknown command, un-capturable value, etc), it reports it and returns `-1`.
    /// No handler is invoked in this case.
    pub fn execute(&self, tokens: &[&str]) -> i32 {
        let exit_code = match resolve(&self.root, tokens, 0) {
            Ok(Action::PrintHelp(node)) => {
                self.printer(node).print_help(&*self.user_interface);
                EXIT_SUCCESS
            }
            Ok(Action::PrintUsage(node)) => {
                self.printer(node).print_usage(&*self.user_interface);
                EXIT_SUCCESS
            }
            Ok(Action::Run(node, args)) => match node.invoke(&args) {
                Some(exit_code) => exit_code,
                None => unreachable!("internal error - only runnable commands resolve to Run"),
            },
            Err(Failure {
                node,
                error,
                context,
            }) => {
                let show_usage = matches!(
                    error,
                    ParseError::EmptyInput | ParseError::UnknownCommand(_)
                );
                self.user_interface.print_error(error);

                if let Some(context) = context {
                    self.user_interface.print_error_context(context);
                }

                if show_usage {
                    self.printer(node).print_usage(&*self.user_interface);
                }

                EXIT_FAILURE
            }
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Dispatch of {tokens:?} exited with {exit_code}.");
        }

        exit_code
    }

    /// Dispatch the process' Cli arguments through the command tree, returning the exit code.
    /// See [`GeneralParser::execute`] for details.
    ///
    /// ### Example
    /// ```no_run
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::Command;
    ///
    /// let parser = Command::new("program").run(|_| 0).build();
    /// std::process::exit(parser.parse());
    /// ```
    pub fn parse(&self) -> i32 {
        let command_input: Vec<String> = env::args().collect();
        self.execute(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        )
    }

    fn printer(&self, node: &Command) -> Printer {
        Printer::from(node).terminal_width(self.terminal_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Flag;
    use crate::parser::util::InMemoryInterface;
    use crate::parser::ErrorContext;
    use crate::test::assert_contains;
    use rand::{thread_rng, Rng};
    use std::cell::{Cell, RefCell};

    fn build<'a>(command: Command<'a>, interface: &InMemoryInterface) -> GeneralParser<'a> {
        command
            .build_with_interface(Box::new(interface.clone()), Some(120))
            .unwrap()
    }

    #[test]
    fn execute_run() {
        // Setup
        let port = Cell::new(0);
        let interface = InMemoryInterface::default();
        let parser = build(
            Command::new("server")
                .add_flag(Flag::new("port", 8080).short('p'))
                .run(|args| {
                    port.set(args.value::<i32>("port").unwrap());
                    0
                }),
            &interface,
        );

        // Execute
        let exit_code = parser.execute(&["server", "-p", "9090"]);

        // Verify
        assert_eq!(exit_code, 0);
        assert_eq!(port.get(), 9090);
        assert_eq!(interface.consume(), (None, None, None));
    }

    #[test]
    fn execute_exit_code_passthrough() {
        // Setup
        let code: i32 = thread_rng().gen();
        let interface = InMemoryInterface::default();
        let parser = build(Command::new("program").run(move |_| code), &interface);

        // Execute
        let exit_code = parser.execute(&["program"]);

        // Verify
        assert_eq!(exit_code, code);
    }

    #[test]
    fn execute_child_only() {
        // Setup
        let invoked = RefCell::new(Vec::default());
        let interface = InMemoryInterface::default();
        let parser = build(
            Command::new("server")
                .run(|_| {
                    invoked.borrow_mut().push("server");
                    0
                })
                .add_command(Command::new("version").run(|_| {
                    invoked.borrow_mut().push("version");
                    3
                })),
            &interface,
        );

        // Execute
        let exit_code = parser.execute(&["server", "version"]);

        // Verify
        assert_eq!(exit_code, 3);
        assert_eq!(*invoked.borrow(), vec!["version"]);
    }

    #[test]
    fn execute_help() {
        // Setup
        let invoked = Cell::new(false);
        let interface = InMemoryInterface::default();
        let parser = build(
            Command::new("server")
                .about("Serve things.")
                .run(|_| {
                    invoked.set(true);
                    0
                })
                .add_command(Command::new("version").about("Print the version.")),
            &interface,
        );

        // Execute
        let exit_code = parser.execute(&["server", "--help"]);

        // Verify
        assert_eq!(exit_code, 0);
        assert!(!invoked.get());
        let message = interface.consume_message();
        assert_eq!(
            message,
            r#"usage: server [-h] [COMMAND]

Serve things.

commands:
 help         Show the help message of a command.
 version      Print the version.

flags:
 -h, --help   Show this help message and exit.

Use "server [COMMAND] --help" for more information about a command."#
        );
    }

    #[test]
    fn execute_help_child() {
        // Setup
        let invoked = Cell::new(false);
        let interface = InMemoryInterface::default();
        let parser = build(
            Command::new("server").add_command(
                Command::new("serve")
                    .description("Start serving requests.")
                    .add_flag(Flag::new("port", 80).help("The port."))
                    .run(|_| {
                        invoked.set(true);
                        0
                    }),
            ),
            &interface,
        );

        // Execute
        let by_word = parser.execute(&["server", "help", "serve"]);
        let by_word_message = interface.consume_message();
        let by_flag = parser.execute(&["server", "serve", "--help"]);
        let by_flag_message = interface.consume_message();

        // Verify
        assert_eq!(by_word, 0);
        assert_eq!(by_flag, 0);
        assert!(!invoked.get());
        assert_eq!(by_word_message, by_flag_message);
        assert_eq!(
            by_word_message,
            r#"usage: server serve [-h] [--port PORT] [COMMAND]

Start serving requests.

commands:
 help          Show the help message of a command.

flags:
 -h, --help    Show this help message and exit.
 --port PORT   The port. (default: 80)               int

Use "server serve [COMMAND] --help" for more information about a command."#
        );
    }

    #[test]
    fn execute_usage() {
        // Setup
        let interface = InMemoryInterface::default();
        let parser = build(
            Command::new("tool")
                .about("--this is not in the usage--")
                .add_command(Command::new("remote").run(|_| 0)),
            &interface,
        );

        // Execute
        let exit_code = parser.execute(&["tool"]);

        // Verify
        assert_eq!(exit_code, 0);
        let message = interface.consume_message();
        assert_eq!(
            message,
            r#"usage: tool [-h] [COMMAND]

commands:
 help         Show the help message of a command.
 remote

flags:
 -h, --help   Show this help message and exit."#
        );
    }

    #[test]
    fn execute_empty() {
        // Setup
        let invoked = Cell::new(false);
        let interface = InMemoryInterface::default();
        let parser = build(
            Command::new("program").run(|_| {
                invoked.set(true);
                0
            }),
            &interface,
        );

        // Execute
        let exit_code = parser.execute(&[]);

        // Verify
        assert_eq!(exit_code, -1);
        assert!(!invoked.get());
        let (message, error, error_context) = interface.consume();
        let message = message.unwrap();
        assert_contains!(message, "usage: program [-h]");
        assert_eq!(error.unwrap(), "Parse error: empty input.");
        assert_eq!(error_context, None);
    }

    #[test]
    fn execute_unknown_command() {
        // Setup
        let invoked = Cell::new(false);
        let interface = InMemoryInterface::default();
        let parser = build(
            Command::new("server")
                .run(|_| {
                    invoked.set(true);
                    0
                })
                .add_command(Command::new("serve").run(|_| 0)),
            &interface,
        );

        // Execute
        let exit_code = parser.execute(&["server", "unknown-sub"]);

        // Verify
        assert_eq!(exit_code, -1);
        assert!(!invoked.get());
        let (message, error, error_context) = interface.consume();
        let message = message.unwrap();
        assert_contains!(message, "usage: server [-h] [COMMAND]");
        assert_eq!(error.unwrap(), "Parse error: unknown command 'unknown-sub'.");
        assert_eq!(
            error_context.unwrap(),
            ErrorContext::new(&["server", "unknown-sub"], 1, 0)
        );
    }

    #[test]
    fn execute_unknown_flag() {
        // Setup
        let invoked = Cell::new(false);
        let interface = InMemoryInterface::default();
        let parser = build(
            Command::new("server").run(|_| {
                invoked.set(true);
                0
            }),
            &interface,
        );

        // Execute
        let exit_code = parser.execute(&["server", "--bogus"]);

        // Verify
        assert_eq!(exit_code, -1);
        assert!(!invoked.get());
        let (message, error, error_context) = interface.consume();
        assert_eq!(message, None);
        assert_eq!(error.unwrap(), "Parse error: unknown flag '--bogus'.");
        assert_eq!(
            error_context.unwrap().to_string(),
            r#"server --bogus
       ^"#
        );
    }

    #[test]
    fn execute_invalid_value() {
        // Setup
        let invoked = Cell::new(false);
        let interface = InMemoryInterface::default();
        let parser = build(
            Command::new("server")
                .add_flag(Flag::new("port", 8080))
                .run(|_| {
                    invoked.set(true);
                    0
                }),
            &interface,
        );

        // Execute
        let exit_code = parser.execute(&["server", "--port=abc"]);

        // Verify
        assert_eq!(exit_code, -1);
        assert!(!invoked.get());
        let (message, error, error_context) = interface.consume();
        assert_eq!(message, None);
        assert_eq!(
            error.unwrap(),
            "Parse error: invalid value for flag 'port': cannot convert 'abc' to int."
        );
        assert_eq!(
            error_context.unwrap().to_string(),
            r#"server --port=abc
              ^"#
        );
    }

    #[test]
    fn execute_repeatable() {
        // Setup
        let ports = RefCell::new(Vec::default());
        let interface = InMemoryInterface::default();
        let parser = build(
            Command::new("server")
                .add_flag(Flag::new("port", 8080))
                .run(|args| {
                    ports.borrow_mut().push(args.value::<i32>("port").unwrap());
                    0
                }),
            &interface,
        );

        // Execute
        parser.execute(&["server", "--port", "1"]);
        parser.execute(&["server"]);
        parser.execute(&["server", "--help"]);
        interface.consume_message();
        parser.execute(&["server"]);

        // Verify
        assert_eq!(*ports.borrow(), vec![1, 8080, 8080]);
    }

    #[test]
    fn root() {
        let interface = InMemoryInterface::default();
        let parser = build(Command::new("program"), &interface);
        assert_eq!(parser.root().name(), "program");
    }
}
