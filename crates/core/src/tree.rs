//! Arena-backed forest of plan lines.
//!
//! Nodes are stored in pre-order, parents own their children through id
//! lists, and the `parent` back-reference is a plain index that is only used
//! to jump upwards. After construction the only mutable field is `expanded`.

use crate::plan::ChangeType;

/// Index of a node inside its [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// What a line of the plan represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `# <address> will be ...` header.
    Resource,
    /// A line opening a nested block (`~ tags {`, `+ resource "t" "n" {`).
    Block,
    /// A single key/value or list element line.
    Attribute,
    /// `# (...)` annotations such as hidden-attribute tallies.
    Comment,
    /// `}` or `]` closing the preceding block.
    ClosingBrace,
    /// Blank line between drift and planned changes.
    Separator,
    /// Trailing `Plan: ...` line.
    Summary,
    /// Whole-plan decode failure.
    Error,
}

/// One line of the rendered plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub text: String,
    pub kind: NodeKind,
    pub change_type: ChangeType,
    pub depth: usize,
    pub expanded: bool,
    pub toggleable: bool,
    pub previous_address: Option<String>,
    pub action_reason: Option<String>,
    pub is_drifted: bool,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl TreeNode {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether the user can expand or collapse this node.
    pub fn can_toggle(&self) -> bool {
        self.toggleable && self.has_children()
    }
}

/// A node under construction. The builder assembles candidate subtrees of
/// drafts, decides which to keep, and commits the survivors into a [`Forest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDraft {
    pub text: String,
    pub kind: NodeKind,
    pub change_type: ChangeType,
    pub toggleable: bool,
    pub expanded: bool,
    pub previous_address: Option<String>,
    pub action_reason: Option<String>,
    pub is_drifted: bool,
    pub children: Vec<NodeDraft>,
}

impl NodeDraft {
    pub fn new(kind: NodeKind, change_type: ChangeType, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            change_type,
            toggleable: kind == NodeKind::Block,
            expanded: false,
            previous_address: None,
            action_reason: None,
            is_drifted: false,
            children: Vec::new(),
        }
    }

    pub fn attribute(change_type: ChangeType, text: impl Into<String>) -> Self {
        Self::new(NodeKind::Attribute, change_type, text)
    }

    pub fn block(change_type: ChangeType, text: impl Into<String>, children: Vec<Self>) -> Self {
        Self::new(NodeKind::Block, change_type, text).with_children(children)
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Comment, ChangeType::NoOp, text)
    }

    pub fn closing(text: &str) -> Self {
        Self::new(NodeKind::ClosingBrace, ChangeType::NoOp, text)
    }

    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// True for lines that represent an actual change rather than scaffolding.
    pub fn is_change(&self) -> bool {
        matches!(self.kind, NodeKind::Attribute | NodeKind::Block)
    }
}

/// The ordered set of root nodes built from one plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl Forest {
    /// Commit a list of root drafts, assigning depths and parent links.
    pub fn from_drafts(drafts: Vec<NodeDraft>) -> Self {
        let mut forest = Self::default();
        for draft in drafts {
            let id = forest.commit(draft, None, 0);
            forest.roots.push(id);
        }
        forest
    }

    fn commit(&mut self, draft: NodeDraft, parent: Option<NodeId>, depth: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            text: draft.text,
            kind: draft.kind,
            change_type: draft.change_type,
            depth,
            expanded: draft.expanded,
            toggleable: draft.toggleable,
            previous_address: draft.previous_address,
            action_reason: draft.action_reason,
            is_drifted: draft.is_drifted,
            children: Vec::with_capacity(draft.children.len()),
            parent,
        });
        for child in draft.children {
            let child_id = self.commit(child, Some(id), depth + 1);
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Node by id. Ids are only handed out by this forest, so lookups are total.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// All nodes in pre-order, regardless of expansion.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Flatten the nodes reachable through expanded ancestors only.
    pub fn visible(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &root in &self.roots {
            self.push_visible(root, &mut out);
        }
        out
    }

    fn push_visible(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        let node = self.node(id);
        if node.expanded {
            for &child in &node.children {
                self.push_visible(child, out);
            }
        }
    }

    /// Walk from `id`'s parent up to its root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, move |p| self.node(*p).parent)
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.ancestors(id).all(|a| self.node(a).expanded)
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        self.nodes[id.0].expanded = expanded;
    }

    /// Expand `id` and every descendant that has children.
    pub fn expand_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = &mut self.nodes[next.0];
            if node.has_children() {
                node.expanded = true;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Collapse every descendant of `id`, leaving `id` itself expanded.
    pub fn collapse_descendants(&mut self, id: NodeId) {
        let mut stack: Vec<NodeId> = self.node(id).children.clone();
        while let Some(next) = stack.pop() {
            let node = &mut self.nodes[next.0];
            node.expanded = false;
            stack.extend(node.children.iter().copied());
        }
        self.nodes[id.0].expanded = true;
    }

    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            if node.has_children() {
                node.expanded = true;
            }
        }
    }

    /// Collapse everything below the roots; roots with children stay expanded.
    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            if node.has_children() {
                node.expanded = node.parent.is_none();
            }
        }
    }
}
