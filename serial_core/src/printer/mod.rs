//! Help listings.
//!
//! Each command is printed as its full signature followed by ` - ` and its
//! description, for example `set led <state> - Turn the led on or off`.

use core::fmt;

use crate::command::{Command, Siblings};

/// Writes the command's signature (parent names and args included).
pub fn write_command<W: fmt::Write + ?Sized>(out: &mut W, cmd: Command<'_>) -> fmt::Result {
    write!(out, "{}", cmd.signature())
}

pub fn write_description<W: fmt::Write + ?Sized>(out: &mut W, cmd: Command<'_>) -> fmt::Result {
    out.write_str(cmd.description())
}

/// One line per command of this level.
pub fn list_commands<W: fmt::Write + ?Sized>(out: &mut W, siblings: Siblings<'_>) -> fmt::Result {
    for cmd in siblings {
        write_line(out, cmd)?;
    }
    Ok(())
}

/// Depth-first listing of this level and everything below it.
pub fn list_all_commands<W: fmt::Write + ?Sized>(
    out: &mut W,
    siblings: Siblings<'_>,
) -> fmt::Result {
    for cmd in siblings {
        write_line(out, cmd)?;
        list_all_commands(out, cmd.children())?;
    }
    Ok(())
}

fn write_line<W: fmt::Write + ?Sized>(out: &mut W, cmd: Command<'_>) -> fmt::Result {
    write_command(out, cmd)?;
    out.write_str(" - ")?;
    write_description(out, cmd)?;
    out.write_str("\n")
}

// ==================== TESTS =======================
