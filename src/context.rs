/*!
Per-command contexts, arranged in a tree that mirrors the subcommand chain.

Contexts live in a [`ContextTree`] arena and refer to their parents by
[`ContextId`]. A context never refers to its children, so the tree has no
cycles and no shared ownership. The tree also owns the sources of outside
information that options consult during finalize: the [`Environment`] and the
[`Platform`].
 */

use std::fmt;

use joinery::JoinableIterator;

use crate::env::{Environment, Platform, ProcessEnvironment, envvar_segment};

/// A handle to one context in a [`ContextTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

#[derive(Debug, Clone)]
struct Node {
    command_name: String,
    auto_envvar_prefix: Option<String>,
    parent: Option<ContextId>,
}

pub struct ContextTree {
    nodes: Vec<Node>,
    environment: Box<dyn Environment>,
    platform: Platform,
}

impl fmt::Debug for ContextTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextTree")
            .field("nodes", &self.nodes)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl Default for ContextTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextTree {
    /// A tree that reads the process environment and uses the host platform's
    /// conventions.
    pub fn new() -> Self {
        Self::with_environment(ProcessEnvironment)
    }

    pub fn with_environment(environment: impl Environment + 'static) -> Self {
        Self {
            nodes: Vec::new(),
            environment: Box::new(environment),
            platform: Platform::host(),
        }
    }

    /// Override the platform, which controls how list-valued environment
    /// variables are split.
    #[must_use]
    pub fn with_platform(self, platform: Platform) -> Self {
        Self { platform, ..self }
    }

    fn add(&mut self, command_name: String, parent: Option<ContextId>) -> ContextId {
        let id = ContextId(self.nodes.len());
        self.nodes.push(Node {
            command_name,
            auto_envvar_prefix: None,
            parent,
        });
        id
    }

    /// Add the context for a top-level command.
    pub fn add_root(&mut self, command_name: impl Into<String>) -> ContextId {
        self.add(command_name.into(), None)
    }

    /// Add the context for a subcommand invoked from `parent`.
    pub fn add_child(&mut self, parent: ContextId, command_name: impl Into<String>) -> ContextId {
        self.add(command_name.into(), Some(parent))
    }

    /// Declare an auto-envvar prefix for a context. Options in this context
    /// and its descendants that don't declare an explicit envvar can be read
    /// from `PREFIX_OPTION`.
    pub fn set_auto_envvar_prefix(&mut self, id: ContextId, prefix: impl Into<String>) {
        self.nodes[id.0].auto_envvar_prefix = Some(prefix.into());
    }

    #[must_use]
    pub fn context(&self, id: ContextId) -> Context<'_> {
        Context { tree: self, id }
    }

    pub fn environment(&self) -> &dyn Environment {
        &*self.environment
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }
}

/// A borrowed view of one context in a [`ContextTree`].
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    tree: &'a ContextTree,
    id: ContextId,
}

impl<'a> Context<'a> {
    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id.0]
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ContextId {
        self.id
    }

    #[must_use]
    pub fn command_name(&self) -> &'a str {
        &self.node().command_name
    }

    #[must_use]
    pub fn parent(&self) -> Option<Context<'a>> {
        self.node().parent.map(|id| self.tree.context(id))
    }

    /// This context, followed by its parent, its grandparent, and so on.
    pub fn ancestors(&self) -> impl Iterator<Item = Context<'a>> {
        std::iter::successors(Some(*self), Context::parent)
    }

    /// The command names from the root down to this context, like
    /// `["git", "remote", "add"]`
    pub fn command_path(&self) -> Vec<&'a str> {
        let mut path: Vec<&'a str> = self
            .ancestors()
            .map(|context| context.command_name())
            .collect();
        path.reverse();
        path
    }

    /// The auto-envvar prefix declared on this context itself, if any.
    #[must_use]
    pub fn declared_auto_envvar_prefix(&self) -> Option<&'a str> {
        self.node().auto_envvar_prefix.as_deref()
    }

    /**
    The auto-envvar prefix in effect for this context.

    If this context declares a prefix, that's it. Otherwise it's the nearest
    ancestor's prefix, followed by the names of each command between that
    ancestor and this one, joined with `_` and upper-cased. For a command
    `cmd1` under a root with the prefix `C`, that's `C_CMD1`. If no ancestor
    declares a prefix, there is none.
     */
    #[must_use]
    pub fn auto_envvar_prefix(&self) -> Option<String> {
        let mut segments = Vec::new();

        for context in self.ancestors() {
            if let Some(prefix) = context.declared_auto_envvar_prefix() {
                let prefix = std::iter::once(prefix.to_owned())
                    .chain(segments.into_iter().rev())
                    .join_with('_')
                    .to_string();

                tracing::trace!(
                    command = self.command_name(),
                    prefix = %prefix,
                    "derived auto-envvar prefix"
                );

                return Some(prefix);
            }

            segments.push(envvar_segment(context.command_name()));
        }

        None
    }

    pub fn environment(&self) -> &'a dyn Environment {
        self.tree.environment()
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.tree.platform
    }
}
