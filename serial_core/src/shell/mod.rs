//! Front-end tying the line reader, the dispatcher and a diagnostic sink together.

use core::fmt::{self, Write};

use crate::command::{Command, CommandTree, NodeId};
use crate::dispatcher::{self, DispatchError, Outcome};
use crate::printer;
use crate::reader::{LineReader, ReadError};
use crate::tokenizer::Delimiters;

/// Default line buffer capacity in bytes.
pub const DEFAULT_LINE_LEN: usize = 64;

/// What a handler sees while it runs.
///
/// Output written here goes to the shell's sink. The tree is available so that
/// a `help` command can list its siblings.
pub struct Context<'a, 'o> {
    tree: &'a CommandTree<'a>,
    command: NodeId,
    out: &'o mut dyn fmt::Write,
}

impl<'a, 'o> Context<'a, 'o> {
    pub fn new(tree: &'a CommandTree<'a>, command: NodeId, out: &'o mut dyn fmt::Write) -> Self {
        Self { tree, command, out }
    }

    pub fn tree(&self) -> &'a CommandTree<'a> {
        self.tree
    }

    /// The command being executed.
    pub fn command(&self) -> Command<'a> {
        Command::from_parts(self.tree, self.command)
    }

    pub fn out(&mut self) -> &mut dyn fmt::Write {
        &mut *self.out
    }

    pub fn list_commands(&mut self) -> fmt::Result {
        printer::list_commands(&mut *self.out, self.tree.roots())
    }

    pub fn list_all_commands(&mut self) -> fmt::Result {
        printer::list_all_commands(&mut *self.out, self.tree.roots())
    }
}

impl fmt::Write for Context<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.out.write_str(s)
    }
}

/// Failure while turning input bytes into an executed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError<'l> {
    Read(ReadError),
    Dispatch(DispatchError<'l>),
}

impl fmt::Display for LineError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::Read(e) => fmt::Display::fmt(e, f),
            LineError::Dispatch(e) => fmt::Display::fmt(e, f),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LineError<'_> {}

impl From<ReadError> for LineError<'_> {
    fn from(e: ReadError) -> Self {
        LineError::Read(e)
    }
}

impl<'l> From<DispatchError<'l>> for LineError<'l> {
    fn from(e: DispatchError<'l>) -> Self {
        LineError::Dispatch(e)
    }
}

/// A command console over a static tree.
///
/// Bytes are fed with [`read_byte`](Self::read_byte); each completed line is
/// resolved and either runs one handler or writes one diagnostic to `W`.
///
/// # Type Parameters
/// - `W`: diagnostic and handler output sink.
/// - `N`: line buffer capacity in bytes.
pub struct SerialCommands<'t, W: fmt::Write, const N: usize = DEFAULT_LINE_LEN> {
    tree: &'t CommandTree<'t>,
    delimiters: Delimiters,
    reader: LineReader<N>,
    out: W,
}

impl<'t, W: fmt::Write, const N: usize> SerialCommands<'t, W, N> {
    pub fn new(tree: &'t CommandTree<'t>, out: W) -> Self {
        Self::with_delimiters(tree, out, Delimiters::DEFAULT)
    }

    pub fn with_delimiters(tree: &'t CommandTree<'t>, out: W, delimiters: Delimiters) -> Self {
        Self {
            tree,
            delimiters,
            reader: LineReader::new(delimiters.termination),
            out,
        }
    }

    pub fn tree(&self) -> &'t CommandTree<'t> {
        self.tree
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Feeds one input byte; parses the line when the byte completes it.
    ///
    /// `Ok(None)` means the line is still being collected. Errors have already
    /// been reported to the sink when they are returned.
    pub fn read_byte(&mut self, byte: u8) -> Result<Option<Outcome>, LineError<'_>> {
        match self.reader.feed(byte) {
            Ok(None) => Ok(None),
            Ok(Some(line)) => {
                let result = dispatcher::dispatch(self.tree, self.delimiters, line, &mut self.out);
                if let Err(err) = &result {
                    let _ = dispatcher::report(&mut self.out, self.tree, err);
                }
                result.map(Some).map_err(LineError::Dispatch)
            }
            Err(err) => {
                let _ = writeln!(self.out, "{}", err);
                Err(LineError::Read(err))
            }
        }
    }

    /// Feeds a chunk of input. Returns how many commands were executed.
    pub fn read_bytes(&mut self, bytes: &[u8]) -> usize {
        let mut executed = 0;
        for &b in bytes {
            if let Ok(Some(Outcome::Executed(_))) = self.read_byte(b) {
                executed += 1;
            }
        }
        executed
    }

    /// Parses one complete line, reporting any error to the sink.
    pub fn parse_line<'l>(&mut self, line: &'l str) -> Result<Outcome, DispatchError<'l>> {
        let result = dispatcher::dispatch(self.tree, self.delimiters, line, &mut self.out);
        if let Err(err) = &result {
            let _ = dispatcher::report(&mut self.out, self.tree, err);
        }
        result
    }

    pub fn list_commands(&mut self) -> fmt::Result {
        printer::list_commands(&mut self.out, self.tree.roots())
    }

    pub fn list_all_commands(&mut self) -> fmt::Result {
        printer::list_all_commands(&mut self.out, self.tree.roots())
    }

    /// Prints `cmd`'s signature, e.g. for usage hints in handlers.
    pub fn print_command(&mut self, cmd: Command<'_>) -> fmt::Result {
        printer::write_command(&mut self.out, cmd)
    }
}

// ==================== TESTS =======================

#[cfg(test)]
mod shell_tests {
    use super::*;
    use crate::arg::{ArgConstraint, Args};
    use crate::command::builder::CommandDef;
    use crate::command::TreeBuilder;
    use heapless::String;

    fn led(ctx: &mut Context<'_, '_>, args: &Args<'_>) {
        let _ = writeln!(ctx, "led={}", args.int(0).unwrap_or(-1));
    }

    fn help(ctx: &mut Context<'_, '_>, _: &Args<'_>) {
        let _ = ctx.list_all_commands();
    }

    fn whoami(ctx: &mut Context<'_, '_>, _: &Args<'_>) {
        let cmd = ctx.command();
        let _ = writeln!(ctx.out(), "{} (depth {})", cmd.path(), cmd.depth());
    }

    static STATE: [ArgConstraint<'static>; 1] = [ArgConstraint::int().range(0, 1).named("state")];

    fn build() -> TreeBuilder<'static, 8> {
        let mut b = TreeBuilder::new();
        b.root(CommandDef::new("help").description("Print commands").handler(help)).unwrap();
        let set = b.root(CommandDef::new("set").description("Settings")).unwrap();
        b.child(set, CommandDef::new("led").description("Switch led").args(&STATE).handler(led))
            .unwrap();
        b.child(set, CommandDef::new("whoami").handler(whoami)).unwrap();
        b
    }

    #[test]
    fn test_bytes_run_commands() {
        let b = build();
        let tree = b.tree();
        let mut shell: SerialCommands<'_, String<256>> = SerialCommands::new(&tree, String::new());
        let executed = shell.read_bytes(b"set led 1\r\nset led 0\n");
        assert_eq!(executed, 2);
        assert_eq!(shell.out().as_str(), "led=1\nled=0\n");
    }

    #[test]
    fn test_diagnostics_are_written_once() {
        let b = build();
        let tree = b.tree();
        let mut shell: SerialCommands<'_, String<256>> = SerialCommands::new(&tree, String::new());
        assert_eq!(shell.read_bytes(b"set led 2\n"), 0);
        assert_eq!(
            shell.out().as_str(),
            "ERROR: Argument out of range 1 (0 - 1)\nset led <state>\n"
        );
    }

    #[test]
    fn test_unknown_command_diagnostic() {
        let b = build();
        let tree = b.tree();
        let mut shell: SerialCommands<'_, String<256>> = SerialCommands::new(&tree, String::new());
        assert!(matches!(
            shell.parse_line("set lamp 1"),
            Err(DispatchError::CommandNotFound { token: "lamp", .. })
        ));
        assert_eq!(shell.out().as_str(), "ERROR: Command does not exist \"lamp\"\n");
    }

    #[test]
    fn test_read_byte_reports_line_state() {
        let b = build();
        let tree = b.tree();
        let mut shell: SerialCommands<'_, String<256>> = SerialCommands::new(&tree, String::new());
        for &byte in b"hx" {
            assert_eq!(shell.read_byte(byte), Ok(None));
        }
        assert_eq!(
            shell.read_byte(b'\n'),
            Err(LineError::Dispatch(DispatchError::CommandNotFound { token: "hx", parent: None }))
        );
        assert_eq!(shell.read_byte(b'\n'), Ok(None));
        assert_eq!(shell.out().as_str(), "ERROR: Command does not exist \"hx\"\n");
        shell.out().clear();
        for &byte in b"help" {
            let _ = shell.read_byte(byte);
        }
        let help = tree.find_path(&["help"]).unwrap().id();
        assert_eq!(shell.read_byte(b'\r'), Ok(Some(Outcome::Executed(help))));
    }

    #[test]
    fn test_overflow_is_reported() {
        let b = build();
        let tree = b.tree();
        let mut shell: SerialCommands<'_, String<256>, 8> =
            SerialCommands::new(&tree, String::new());
        assert_eq!(shell.read_bytes(b"set led 1 and more\nhelp\n"), 1);
        assert!(shell.out().as_str().starts_with("ERROR: Buffer overflow\n"));
    }

    #[test]
    fn test_help_lists_everything() {
        let b = build();
        let tree = b.tree();
        let mut shell: SerialCommands<'_, String<256>> = SerialCommands::new(&tree, String::new());
        shell.parse_line("help").unwrap();
        assert_eq!(
            shell.into_inner().as_str(),
            "help - Print commands\n\
             set - Settings\n\
             set led <state> - Switch led\n\
             set whoami - \n"
        );
    }

    #[test]
    fn test_handler_context_knows_its_command() {
        let b = build();
        let tree = b.tree();
        let mut shell: SerialCommands<'_, String<256>> = SerialCommands::new(&tree, String::new());
        shell.parse_line("s w").unwrap();
        assert_eq!(shell.out().as_str(), "set whoami (depth 1)\n");
    }

    #[test]
    fn test_custom_delimiters() {
        let b = build();
        let tree = b.tree();
        let delimiters = Delimiters::DEFAULT
            .with_delimiter(|c| c == ',')
            .with_termination(|c| c == ';');
        let mut shell: SerialCommands<'_, String<256>> =
            SerialCommands::with_delimiters(&tree, String::new(), delimiters);
        assert_eq!(shell.read_bytes(b"set,led,1;"), 1);
        assert_eq!(shell.out().as_str(), "led=1\n");
    }

    #[test]
    fn test_root_listing_and_print_command() {
        let b = build();
        let tree = b.tree();
        let mut shell: SerialCommands<'_, String<256>> = SerialCommands::new(&tree, String::new());
        shell.list_commands().unwrap();
        let led = tree.find_path(&["set", "led"]).unwrap();
        shell.print_command(led).unwrap();
        assert_eq!(
            shell.out().as_str(),
            "help - Print commands\nset - Settings\nset led <state>"
        );
    }
}
