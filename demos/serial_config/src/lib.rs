#![no_std]

/// Longest accepted input line, in bytes.
pub const LINE_BUFFER_LEN: usize = 64;

pub const PROMPT: &str = "> ";

pub const BANNER: &str = "serial console demo, type `help` for the command list";
