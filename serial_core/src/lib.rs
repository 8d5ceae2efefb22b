#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # serial_core
//!
//! A static, allocation-free command interpreter for serial consoles.
//!
//! Commands form a tree fixed at build time (see `serial_macros::command_tree!`
//! or [`TreeBuilder`]). A line such as `set led 1` is tokenized, walked down the
//! tree one token at a time, each declared argument is coerced to its type and
//! range-checked, and the handler of the reached leaf is invoked with every
//! argument collected along the path.
//!
//! ## Layout
//! - [`tokenizer`]: splits a line on predicate-defined delimiters and quotes.
//! - [`arg`]: argument types, constraints, values and coercion.
//! - [`command`]: the immutable descriptor tree and prefix lookup.
//! - [`dispatcher`]: the resolution state machine and its errors.
//! - [`printer`]: help listings.
//! - [`reader`]: byte-at-a-time line assembly.
//! - [`shell`]: [`SerialCommands`], tying all of the above to an output sink.

// lets `::serial_core::...` paths emitted by `command_tree!` resolve in unit tests
extern crate self as serial_core;

pub mod arg;
pub mod command;
pub mod dispatcher;
pub mod printer;
pub mod reader;
pub mod shell;
pub mod tokenizer;

pub use arg::{ArgConstraint, ArgType, Args, MAX_ARGS, Range, Value};
pub use command::builder::CommandDef;
pub use command::{
    BuildError, Command, CommandNode, CommandTree, Handler, NodeId, Siblings, TreeBuilder,
};
pub use dispatcher::{DispatchError, Outcome, Resolution, dispatch, report, resolve};
pub use reader::{LineReader, ReadError};
pub use shell::{Context, LineError, SerialCommands};
pub use tokenizer::{Delimiters, Tokenizer, tokenize};
