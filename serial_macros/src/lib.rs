extern crate proc_macro;

mod treegen;

use proc_macro::TokenStream;
use treegen::command_tree_impl;

/// Builds a `static` command tree for `serial_core`.
///
/// See the `treegen` module for the input grammar.
#[proc_macro]
pub fn command_tree(input: TokenStream) -> TokenStream {
    command_tree_impl(input)
}
