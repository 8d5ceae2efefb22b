use core::fmt;
use heapless::Vec;

use super::{CommandNode, CommandTree, Handler, NodeId};
use crate::arg::{ArgConstraint, MAX_ARGS};

/// Everything the builder needs to know about one command.
#[derive(Clone, Copy)]
pub struct CommandDef<'t> {
    pub name: &'t str,
    pub description: &'t str,
    pub args: &'t [ArgConstraint<'t>],
    pub handler: Option<Handler>,
}

impl<'t> CommandDef<'t> {
    pub const fn new(name: &'t str) -> Self {
        Self { name, description: "", args: &[], handler: None }
    }

    pub const fn description(mut self, description: &'t str) -> Self {
        self.description = description;
        self
    }

    pub const fn args(mut self, args: &'t [ArgConstraint<'t>]) -> Self {
        self.args = args;
        self
    }

    pub const fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }
}

/// Reasons a command cannot be added to a [`TreeBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuildError {
    /// The arena already holds `N` commands.
    Full,

    /// Command names must be non-empty.
    EmptyName,

    /// A sibling with the same name exists; the new one could never be reached.
    DuplicateName,

    /// The parent id does not refer to a node of this builder.
    UnknownParent,

    /// The path down to this command declares more than `MAX_ARGS` arguments.
    TooManyArguments { declared: usize },

    /// An argument range with `minimum > maximum`.
    InvalidRange { index: usize },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Full => f.write_str("command arena is full"),
            BuildError::EmptyName => f.write_str("command name is empty"),
            BuildError::DuplicateName => f.write_str("duplicate command name"),
            BuildError::UnknownParent => f.write_str("unknown parent command"),
            BuildError::TooManyArguments { declared } => {
                write!(f, "{} arguments declared along path (max {})", declared, MAX_ARGS)
            }
            BuildError::InvalidRange { index } => write!(f, "argument {} has min > max", index + 1),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}

/// Builds a [`CommandTree`] at runtime into a fixed-capacity arena.
///
/// ```ignore
/// let mut b = TreeBuilder::<4>::new();
/// let set = b.root(CommandDef::new("set").description("Settings"))?;
/// b.child(set, CommandDef::new("led").args(&LED_ARGS).handler(set_led))?;
/// let tree = b.tree();
/// ```
pub struct TreeBuilder<'t, const N: usize> {
    nodes: Vec<CommandNode<'t>, N>,
    first_root: Option<NodeId>,
}

impl<'t, const N: usize> Default for TreeBuilder<'t, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t, const N: usize> TreeBuilder<'t, N> {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), first_root: None }
    }

    /// Adds a top-level command.
    pub fn root(&mut self, def: CommandDef<'t>) -> Result<NodeId, BuildError> {
        self.insert(None, def)
    }

    /// Adds `def` as the last child of `parent`.
    pub fn child(&mut self, parent: NodeId, def: CommandDef<'t>) -> Result<NodeId, BuildError> {
        if parent.index() >= self.nodes.len() {
            return Err(BuildError::UnknownParent);
        }
        self.insert(Some(parent), def)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrows the arena as a finished tree.
    pub fn tree(&self) -> CommandTree<'_> {
        CommandTree::new(&self.nodes, self.first_root)
    }

    fn insert(
        &mut self,
        parent: Option<NodeId>,
        def: CommandDef<'t>,
    ) -> Result<NodeId, BuildError> {
        if def.name.is_empty() {
            return Err(BuildError::EmptyName);
        }
        if let Some(index) = def.args.iter().position(|a| {
            a.range.is_some_and(|r| r.minimum > r.maximum)
        }) {
            return Err(BuildError::InvalidRange { index });
        }

        let declared = self.path_args(parent) + def.args.len();
        if declared > MAX_ARGS {
            return Err(BuildError::TooManyArguments { declared });
        }

        let first = match parent {
            Some(p) => self.nodes[p.index()].first_child,
            None => self.first_root,
        };
        let mut last = None;
        let mut cur = first;
        while let Some(id) = cur {
            let node = &self.nodes[id.index()];
            if node.name == def.name {
                return Err(BuildError::DuplicateName);
            }
            last = Some(id);
            cur = node.next_sibling;
        }

        let id = NodeId(self.nodes.len() as u16);
        self.nodes
            .push(CommandNode {
                name: def.name,
                description: def.description,
                args: def.args,
                handler: def.handler,
                parent,
                first_child: None,
                next_sibling: None,
            })
            .map_err(|_| BuildError::Full)?;

        match (last, parent) {
            (Some(prev), _) => self.nodes[prev.index()].next_sibling = Some(id),
            (None, Some(p)) => self.nodes[p.index()].first_child = Some(id),
            (None, None) => self.first_root = Some(id),
        }
        Ok(id)
    }

    /// Arguments declared from the root down to and including `node`.
    fn path_args(&self, mut node: Option<NodeId>) -> usize {
        let mut total = 0;
        while let Some(id) = node {
            let n = &self.nodes[id.index()];
            total += n.args.len();
            node = n.parent;
        }
        total
    }
}

// ==================== TESTS =======================

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::arg::{Args, ArgType};
    use crate::shell::Context;

    fn noop(_: &mut Context<'_, '_>, _: &Args<'_>) {}

    static ONE_INT: [ArgConstraint<'static>; 1] = [ArgConstraint::new(ArgType::Int)];
    static EIGHT_INTS: [ArgConstraint<'static>; 8] = [ArgConstraint::new(ArgType::Int); 8];
    static BAD_RANGE: [ArgConstraint<'static>; 2] =
        [ArgConstraint::new(ArgType::Int), ArgConstraint::new(ArgType::Int).range(5, 1)];

    #[test]
    fn test_builds_linked_tree() {
        let mut b = TreeBuilder::<8>::new();
        let set = b.root(CommandDef::new("set").description("Settings")).unwrap();
        b.root(CommandDef::new("status").handler(noop)).unwrap();
        b.child(set, CommandDef::new("led").args(&ONE_INT).handler(noop)).unwrap();
        b.child(set, CommandDef::new("gain").args(&ONE_INT)).unwrap();

        let tree = b.tree();
        let roots: heapless::Vec<&str, 4> = tree.roots().map(|c| c.name()).collect();
        assert_eq!(roots.as_slice(), &["set", "status"]);

        let set = tree.find_path(&["set"]).unwrap();
        let kids: heapless::Vec<&str, 4> = set.children().map(|c| c.name()).collect();
        assert_eq!(kids.as_slice(), &["led", "gain"]);

        let led = tree.find_path(&["set", "led"]).unwrap();
        assert_eq!(led.parent().unwrap().name(), "set");
        assert!(led.handler().is_some());
        assert_eq!(set.description(), "Settings");
    }

    #[test]
    fn test_rejects_full_arena() {
        let mut b = TreeBuilder::<1>::new();
        b.root(CommandDef::new("a")).unwrap();
        assert_eq!(b.root(CommandDef::new("b")), Err(BuildError::Full));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_rejects_empty_and_duplicate_names() {
        let mut b = TreeBuilder::<4>::new();
        assert_eq!(b.root(CommandDef::new("")), Err(BuildError::EmptyName));
        let a = b.root(CommandDef::new("a")).unwrap();
        assert_eq!(b.root(CommandDef::new("a")), Err(BuildError::DuplicateName));
        // Same name on a different level is fine.
        assert!(b.child(a, CommandDef::new("a")).is_ok());
    }

    #[test]
    fn test_rejects_unknown_parent() {
        let mut b = TreeBuilder::<4>::new();
        assert_eq!(b.child(NodeId(3), CommandDef::new("x")), Err(BuildError::UnknownParent));
    }

    #[test]
    fn test_rejects_argument_overflow_along_path() {
        let mut b = TreeBuilder::<4>::new();
        let top = b.root(CommandDef::new("top").args(&EIGHT_INTS)).unwrap();
        let mid = b.child(top, CommandDef::new("mid").args(&EIGHT_INTS)).unwrap();
        assert_eq!(
            b.child(mid, CommandDef::new("leaf").args(&ONE_INT)),
            Err(BuildError::TooManyArguments { declared: 17 })
        );
        assert!(b.child(mid, CommandDef::new("leaf")).is_ok());
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut b = TreeBuilder::<2>::new();
        assert_eq!(
            b.root(CommandDef::new("x").args(&BAD_RANGE)),
            Err(BuildError::InvalidRange { index: 1 })
        );
    }
}
