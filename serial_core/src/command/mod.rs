//! Immutable command descriptor tree.
//!
//! Nodes live in one flat arena and refer to each other by [`NodeId`]. Children
//! are chained through `first_child` / `next_sibling`, which lets both the
//! `command_tree!` macro (a `static` arena) and [`TreeBuilder`] (a heapless arena)
//! produce the same representation. `parent` is only ever followed to print the
//! full command path; resolution walks downwards.

pub mod builder;

pub use builder::{BuildError, TreeBuilder};

use core::fmt;

use crate::arg::{ArgConstraint, Args};
use crate::shell::Context;

/// Handler invoked for a resolved leaf command.
pub type Handler = fn(&mut Context<'_, '_>, &Args<'_>);

/// Position of a node in its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeId(pub u16);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One command descriptor as stored in the arena.
#[derive(Clone, Copy)]
pub struct CommandNode<'t> {
    pub name: &'t str,
    pub description: &'t str,
    pub args: &'t [ArgConstraint<'t>],
    pub handler: Option<Handler>,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

impl fmt::Debug for CommandNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("args", &self.args.len())
            .field("handler", &self.handler.is_some())
            .field("parent", &self.parent)
            .field("first_child", &self.first_child)
            .field("next_sibling", &self.next_sibling)
            .finish()
    }
}

/// A complete command hierarchy over a borrowed arena.
#[derive(Clone, Copy, Debug)]
pub struct CommandTree<'t> {
    nodes: &'t [CommandNode<'t>],
    first_root: Option<NodeId>,
}

impl<'t> CommandTree<'t> {
    /// Wraps an arena. Links must stay inside `nodes`; the macro and the builder
    /// guarantee that.
    pub const fn new(nodes: &'t [CommandNode<'t>], first_root: Option<NodeId>) -> Self {
        Self { nodes, first_root }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level commands.
    pub fn roots(&self) -> Siblings<'_> {
        Siblings { tree: self, next: self.first_root }
    }

    pub fn get(&self, id: NodeId) -> Option<Command<'_>> {
        (id.index() < self.nodes.len()).then_some(Command { tree: self, id })
    }

    /// Exact-name lookup along a path of names, e.g. `["set", "led"]`.
    pub fn find_path(&self, path: &[&str]) -> Option<Command<'_>> {
        let mut siblings = self.roots();
        let mut found = None;
        for name in path {
            let cmd = siblings.find(|c| c.name() == *name)?;
            siblings = cmd.children();
            found = Some(cmd);
        }
        found
    }

    fn node(&self, id: NodeId) -> &'t CommandNode<'t> {
        &self.nodes[id.index()]
    }
}

/// Handle to one command of a tree.
#[derive(Clone, Copy)]
pub struct Command<'a> {
    tree: &'a CommandTree<'a>,
    id: NodeId,
}

impl<'a> Command<'a> {
    /// Caller guarantees `id` is in bounds for `tree`.
    pub(crate) fn from_parts(tree: &'a CommandTree<'a>, id: NodeId) -> Self {
        Command { tree, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a CommandTree<'a> {
        self.tree
    }

    pub fn name(&self) -> &'a str {
        self.tree.node(self.id).name
    }

    pub fn description(&self) -> &'a str {
        self.tree.node(self.id).description
    }

    pub fn args(&self) -> &'a [ArgConstraint<'a>] {
        self.tree.node(self.id).args
    }

    pub fn handler(&self) -> Option<Handler> {
        self.tree.node(self.id).handler
    }

    pub fn children(&self) -> Siblings<'a> {
        Siblings { tree: self.tree, next: self.tree.node(self.id).first_child }
    }

    pub fn is_leaf(&self) -> bool {
        self.tree.node(self.id).first_child.is_none()
    }

    pub fn has_parent(&self) -> bool {
        self.tree.node(self.id).parent.is_some()
    }

    pub fn parent(&self) -> Option<Command<'a>> {
        self.tree
            .node(self.id)
            .parent
            .map(|id| Command { tree: self.tree, id })
    }

    /// Number of levels above this command.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = self.parent();
        while let Some(cmd) = cur {
            depth += 1;
            cur = cmd.parent();
        }
        depth
    }

    /// Space-separated names from the root down to this command.
    pub fn path(&self) -> CommandPath<'a> {
        CommandPath(*self)
    }

    /// Full usage line: every level's name followed by its `<arg>` placeholders.
    pub fn signature(&self) -> Signature<'a> {
        Signature(*self)
    }
}

impl fmt::Debug for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

impl PartialEq for Command<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree.nodes, other.tree.nodes) && self.id == other.id
    }
}

/// Display adapter for [`Command::path`].
pub struct CommandPath<'a>(Command<'a>);

impl fmt::Display for CommandPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.0.parent() {
            write!(f, "{} ", parent.path())?;
        }
        f.write_str(self.0.name())
    }
}

/// Display adapter for [`Command::signature`].
pub struct Signature<'a>(Command<'a>);

impl fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.0.parent() {
            write!(f, "{} ", parent.signature())?;
        }
        f.write_str(self.0.name())?;
        for arg in self.0.args() {
            write!(f, " <{}>", arg.display_name())?;
        }
        Ok(())
    }
}

/// One level of the tree: the roots, or the children of a command.
#[derive(Clone, Copy)]
pub struct Siblings<'a> {
    tree: &'a CommandTree<'a>,
    next: Option<NodeId>,
}

impl<'a> Siblings<'a> {
    pub fn is_empty(&self) -> bool {
        self.next.is_none()
    }

    /// Resolves `token` against this level.
    ///
    /// An exact name wins immediately. Otherwise the token must be a prefix of
    /// exactly one sibling; no match and an ambiguous prefix both yield `None`.
    pub fn lookup(self, token: &str) -> Option<Command<'a>> {
        let mut candidate = None;
        let mut prefix_matches = 0usize;
        for cmd in self {
            let name = cmd.name();
            if name == token {
                return Some(cmd);
            }
            if name.starts_with(token) {
                prefix_matches += 1;
                candidate = Some(cmd);
            }
        }
        if prefix_matches == 1 { candidate } else { None }
    }
}

impl<'a> Iterator for Siblings<'a> {
    type Item = Command<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.node(id).next_sibling;
        Some(Command { tree: self.tree, id })
    }
}

/// Resolves `token` against `siblings`; see [`Siblings::lookup`].
pub fn find_command<'a>(token: &str, siblings: Siblings<'a>) -> Option<Command<'a>> {
    siblings.lookup(token)
}

// ==================== TESTS =======================
