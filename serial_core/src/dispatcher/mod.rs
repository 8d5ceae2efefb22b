//! Line resolution and handler dispatch.
//!
//! Resolution walks the tree top-down, one token at a time:
//! the token names a command among the current siblings, the command's declared
//! arguments are consumed and validated, then either its children become the
//! next sibling set or, for a leaf, the line must be exhausted before the
//! handler runs. The first problem aborts the line; nothing is executed
//! partially.

pub mod error;

pub use error::DispatchError;

use core::fmt;

use crate::arg::Args;
use crate::arg::parse::coerce;
use crate::command::{Command, CommandTree, NodeId};
use crate::shell::Context;
use crate::tokenizer::{Delimiters, Tokenizer};

/// Result of resolving a line, before anything is executed.
#[derive(Debug, PartialEq)]
pub enum Resolution<'a, 'l> {
    /// The line held no tokens.
    Empty,

    /// The line ended on a command that has children.
    Incomplete(Command<'a>),

    /// A leaf with all of its path's arguments.
    Leaf(Command<'a>, Args<'l>),
}

/// What a successful [`dispatch`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Blank line; nothing to do.
    Empty,

    /// The line stopped at a command group; nothing was run.
    Incomplete(NodeId),

    /// The leaf was resolved and its handler, if it has one, was called.
    Executed(NodeId),
}

/// Resolves the tokens left in `tokens` against `tree`.
pub fn resolve<'a, 'l>(
    tree: &'a CommandTree<'a>,
    tokens: &mut Tokenizer<'l>,
) -> Result<Resolution<'a, 'l>, DispatchError<'l>> {
    let mut siblings = tree.roots();
    let mut current: Option<Command<'a>> = None;
    let mut args = Args::new();

    loop {
        let Some(token) = tokens.next_token() else {
            return Ok(match current {
                Some(cmd) => Resolution::Incomplete(cmd),
                None => Resolution::Empty,
            });
        };

        let cmd = siblings.lookup(token).ok_or(DispatchError::CommandNotFound {
            token,
            parent: current.map(|c| c.id()),
        })?;
        let command = cmd.id();

        for constraint in cmd.args() {
            let token = tokens
                .next_token()
                .ok_or(DispatchError::NotEnoughArguments { command })?;
            let index = args.len() + 1;

            let value = coerce(token, constraint)
                .ok_or(DispatchError::ArgumentParseFailure { command, index })?;
            if !constraint.is_in_range(&value) {
                return Err(DispatchError::ArgumentOutOfRange {
                    command,
                    index,
                    range: constraint.bounds(),
                });
            }
            args.push(value)
                .map_err(|_| DispatchError::ArgumentCapacity { command })?;
        }

        if cmd.is_leaf() {
            if tokens.next_token().is_some() {
                return Err(DispatchError::TooManyArguments { command });
            }
            return Ok(Resolution::Leaf(cmd, args));
        }

        siblings = cmd.children();
        current = Some(cmd);
    }
}

/// Tokenizes and resolves `line`, then calls the leaf handler.
///
/// The handler gets a [`Context`] writing to `out`. Diagnostics are not written
/// here; see [`report`].
pub fn dispatch<'l>(
    tree: &CommandTree<'_>,
    delimiters: Delimiters,
    line: &'l str,
    out: &mut dyn fmt::Write,
) -> Result<Outcome, DispatchError<'l>> {
    let mut tokens = Tokenizer::new(line, delimiters);
    match resolve(tree, &mut tokens)? {
        Resolution::Empty => Ok(Outcome::Empty),
        Resolution::Incomplete(cmd) => Ok(Outcome::Incomplete(cmd.id())),
        Resolution::Leaf(cmd, args) => {
            if let Some(handler) = cmd.handler() {
                let mut ctx = Context::new(tree, cmd.id(), out);
                handler(&mut ctx, &args);
            }
            Ok(Outcome::Executed(cmd.id()))
        }
    }
}

/// Writes the diagnostic for `err`: the message, then the offending command's
/// signature when there is one.
pub fn report<W: fmt::Write + ?Sized>(
    out: &mut W,
    tree: &CommandTree<'_>,
    err: &DispatchError<'_>,
) -> fmt::Result {
    writeln!(out, "{}", err)?;
    if let Some(cmd) = err.command().and_then(|id| tree.get(id)) {
        writeln!(out, "{}", cmd.signature())?;
    }
    Ok(())
}

// ==================== TESTS =======================
