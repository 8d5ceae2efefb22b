//! # Command Tree Macro
//!
//! Turns a nested command description into a `static` arena that
//! `serial_core::CommandTree` can walk without any runtime setup.
//!
//! ## Macro Input Format
//! ```text
//! command_tree! {
//!     mod commands;
//!     help() -> uc::help : "List commands";
//!     set() : "Settings" {
//!         led(int[0..=1] "state") -> uc::led : "Switch the led";
//!         gain(float[-10..=10]) -> uc::gain;
//!     }
//!     say(string "text") -> uc::say;
//! }
//! ```
//! - A name is an identifier or a string literal (for names that are not valid
//!   identifiers, e.g. `"led-on"`).
//! - Argument types: `int`, `float`, `string`. Numeric types take an optional
//!   inclusive `[min..=max]` range; any type takes an optional display name.
//! - `-> path` names the handler, `: "..."` the description. Both are optional.
//! - A node ends with `;` or with a `{ ... }` block of children.
//!
//! ## Generated Module
//! - `NODES`: the arena, in pre-order (a parent always precedes its children).
//! - `TREE`: `CommandTree` over `NODES`; `tree()` returns it.
//! - `NUM_COMMANDS`, `MAX_PATH_ARGS`.

use proc_macro::TokenStream;
use proc_macro2::{Literal, Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Ident, LitInt, LitStr, Result, Token, braced, bracketed, parenthesized};

/// Arguments allowed along one command path; mirrors `serial_core::MAX_ARGS`.
const MAX_ARGS: usize = 16;

/// Parsed macro input: `mod <ident>;` followed by the top-level commands.
struct TreeMacroInput {
    mod_ident: Ident,
    roots: Vec<NodeDef>,
}

/// One command with its children.
struct NodeDef {
    name: LitStr,
    args: Vec<ArgDef>,
    handler: Option<syn::Path>,
    description: Option<LitStr>,
    children: Vec<NodeDef>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ArgKind {
    Int,
    Float,
    String,
}

struct ArgDef {
    kind: ArgKind,
    range: Option<(i32, i32, Span)>,
    name: Option<LitStr>,
}

impl Parse for TreeMacroInput {
    fn parse(input: ParseStream) -> Result<Self> {
        // Expect: `mod <ident>;`
        input.parse::<Token![mod]>()?;
        let mod_ident: Ident = input.parse()?;
        input.parse::<Token![;]>()?;

        let roots = parse_nodes(input)?;
        Ok(TreeMacroInput { mod_ident, roots })
    }
}

fn parse_nodes(input: ParseStream) -> Result<Vec<NodeDef>> {
    let mut nodes = Vec::new();
    while !input.is_empty() {
        nodes.push(input.parse()?);
    }
    Ok(nodes)
}

impl Parse for NodeDef {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = if input.peek(LitStr) {
            input.parse::<LitStr>()?
        } else {
            let ident = Ident::parse_any(input)?;
            LitStr::new(&ident.unraw().to_string(), ident.span())
        };

        let content;
        parenthesized!(content in input);
        let args: Punctuated<ArgDef, Token![,]> =
            content.parse_terminated(ArgDef::parse, Token![,])?;

        let handler = if input.peek(Token![->]) {
            input.parse::<Token![->]>()?;
            Some(input.parse::<syn::Path>()?)
        } else {
            None
        };

        let description = if input.peek(Token![:]) {
            input.parse::<Token![:]>()?;
            Some(input.parse::<LitStr>()?)
        } else {
            None
        };

        let children = if input.peek(syn::token::Brace) {
            let body;
            braced!(body in input);
            parse_nodes(&body)?
        } else {
            input.parse::<Token![;]>()?;
            Vec::new()
        };

        Ok(NodeDef {
            name,
            args: args.into_iter().collect(),
            handler,
            description,
            children,
        })
    }
}

impl Parse for ArgDef {
    fn parse(input: ParseStream) -> Result<Self> {
        let ty = Ident::parse_any(input)?;
        let kind = match ty.to_string().as_str() {
            "int" => ArgKind::Int,
            "float" => ArgKind::Float,
            "string" => ArgKind::String,
            other => {
                return Err(syn::Error::new(
                    ty.span(),
                    format!(
                        "unknown argument type `{}`, expected `int`, `float` or `string`",
                        other
                    ),
                ));
            }
        };

        let range = if input.peek(syn::token::Bracket) {
            let content;
            let bracket = bracketed!(content in input);
            let minimum = parse_bound(&content)?;
            content.parse::<Token![..=]>()?;
            let maximum = parse_bound(&content)?;
            if kind == ArgKind::String {
                return Err(syn::Error::new(
                    bracket.span.join(),
                    "a `string` argument cannot have a range",
                ));
            }
            Some((minimum, maximum, bracket.span.join()))
        } else {
            None
        };

        let name = if input.peek(LitStr) { Some(input.parse::<LitStr>()?) } else { None };

        Ok(ArgDef { kind, range, name })
    }
}

/// Optionally negative integer literal that fits an `i32`.
fn parse_bound(input: ParseStream) -> Result<i32> {
    let negative = if input.peek(Token![-]) {
        input.parse::<Token![-]>()?;
        true
    } else {
        false
    };
    let lit: LitInt = input.parse()?;
    let magnitude: i64 = lit.base10_parse()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value)
        .map_err(|_| syn::Error::new(lit.span(), "range bound does not fit in an i32"))
}

/// A node after flattening, with arena links resolved.
struct FlatNode<'d> {
    def: &'d NodeDef,
    parent: Option<usize>,
    first_child: Option<usize>,
    next_sibling: Option<usize>,
}

/// Appends `defs` and their descendants in pre-order; returns the first id.
fn flatten<'d>(
    defs: &'d [NodeDef],
    parent: Option<usize>,
    inherited_args: usize,
    flat: &mut Vec<FlatNode<'d>>,
    max_path_args: &mut usize,
) -> Result<Option<usize>> {
    let mut first = None;
    let mut prev: Option<usize> = None;

    for (i, def) in defs.iter().enumerate() {
        let name = def.name.value();
        if name.is_empty() {
            return Err(syn::Error::new(def.name.span(), "command name cannot be empty"));
        }
        if defs[..i].iter().any(|d| d.name.value() == name) {
            return Err(syn::Error::new(def.name.span(), format!("duplicate command `{}`", name)));
        }
        for arg in &def.args {
            if let Some((minimum, maximum, span)) = arg.range {
                if minimum > maximum {
                    return Err(syn::Error::new(span, "range minimum is greater than its maximum"));
                }
            }
        }
        let path_args = inherited_args + def.args.len();
        if path_args > MAX_ARGS {
            return Err(syn::Error::new(
                def.name.span(),
                format!(
                    "`{}` takes {} arguments along its path, at most {} are allowed",
                    name, path_args, MAX_ARGS
                ),
            ));
        }
        *max_path_args = (*max_path_args).max(path_args);

        let id = flat.len();
        if id > u16::MAX as usize {
            return Err(syn::Error::new(def.name.span(), "too many commands"));
        }
        flat.push(FlatNode { def, parent, first_child: None, next_sibling: None });
        match prev {
            Some(p) => flat[p].next_sibling = Some(id),
            None => first = Some(id),
        }
        prev = Some(id);

        let first_child = flatten(&def.children, Some(id), path_args, flat, max_path_args)?;
        flat[id].first_child = first_child;
    }
    Ok(first)
}

fn node_id(id: Option<usize>) -> TokenStream2 {
    match id {
        Some(id) => {
            let id = Literal::u16_unsuffixed(id as u16);
            quote! { ::core::option::Option::Some(::serial_core::NodeId(#id)) }
        }
        None => quote! { ::core::option::Option::None },
    }
}

fn bound_literal(value: i32) -> TokenStream2 {
    let magnitude = Literal::u32_unsuffixed(value.unsigned_abs());
    if value < 0 { quote! { -#magnitude } } else { quote! { #magnitude } }
}

fn arg_constraint(arg: &ArgDef) -> TokenStream2 {
    let mut expr = match arg.kind {
        ArgKind::Int => quote! { ::serial_core::ArgConstraint::int() },
        ArgKind::Float => quote! { ::serial_core::ArgConstraint::float() },
        ArgKind::String => quote! { ::serial_core::ArgConstraint::string() },
    };
    if let Some((minimum, maximum, _)) = arg.range {
        let minimum = bound_literal(minimum);
        let maximum = bound_literal(maximum);
        expr = quote! { #expr.range(#minimum, #maximum) };
    }
    if let Some(name) = &arg.name {
        expr = quote! { #expr.named(#name) };
    }
    expr
}

/// Expands the macro input into the generated module.
pub fn expand(input: TokenStream2) -> Result<TokenStream2> {
    let TreeMacroInput { mod_ident, roots } = syn::parse2(input)?;

    let mut flat = Vec::new();
    let mut max_path_args = 0;
    let first_root = flatten(&roots, None, 0, &mut flat, &mut max_path_args)?;

    let mut arg_tables: Vec<TokenStream2> = Vec::new();
    let mut node_inits: Vec<TokenStream2> = Vec::new();

    for (id, node) in flat.iter().enumerate() {
        let def = node.def;
        let name = &def.name;
        let description =
            def.description.clone().unwrap_or_else(|| LitStr::new("", Span::call_site()));

        let args = if def.args.is_empty() {
            quote! { &[] }
        } else {
            let table = format_ident!("__ARGS_{}", id);
            let count = def.args.len();
            let constraints = def.args.iter().map(arg_constraint);
            arg_tables.push(quote! {
                static #table: [::serial_core::ArgConstraint<'static>; #count] =
                    [ #( #constraints ),* ];
            });
            quote! { &#table }
        };

        let handler = match &def.handler {
            Some(path) => quote! { ::core::option::Option::Some(#path as ::serial_core::Handler) },
            None => quote! { ::core::option::Option::None },
        };

        let parent = node_id(node.parent);
        let first_child = node_id(node.first_child);
        let next_sibling = node_id(node.next_sibling);

        node_inits.push(quote! {
            ::serial_core::CommandNode {
                name: #name,
                description: #description,
                args: #args,
                handler: #handler,
                parent: #parent,
                first_child: #first_child,
                next_sibling: #next_sibling,
            }
        });
    }

    let num_commands = Literal::usize_unsuffixed(flat.len());
    let max_path_args = Literal::usize_unsuffixed(max_path_args);
    let first_root = node_id(first_root);

    Ok(quote! {
        pub mod #mod_ident {
            #[allow(unused_imports)]
            use super::*;

            /// Number of commands in the tree, at every level.
            pub const NUM_COMMANDS: usize = #num_commands;

            /// Largest number of arguments collected along one path.
            pub const MAX_PATH_ARGS: usize = #max_path_args;

            const _: () = assert!(MAX_PATH_ARGS <= ::serial_core::MAX_ARGS);

            #( #arg_tables )*

            pub static NODES: [::serial_core::CommandNode<'static>; NUM_COMMANDS] =
                [ #( #node_inits ),* ];

            pub static TREE: ::serial_core::CommandTree<'static> =
                ::serial_core::CommandTree::new(&NODES, #first_root);

            pub fn tree() -> &'static ::serial_core::CommandTree<'static> {
                &TREE
            }
        }
    })
}

/// Generate a static command tree module.
pub fn command_tree_impl(input: TokenStream) -> TokenStream {
    match expand(input.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

// ==================== TESTS =======================
