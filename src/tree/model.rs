use std::fmt;
use std::ops::{Index, IndexMut};

/// Synthetic node identity: the node's line index at parse time.
///
/// Not derived from content; two nodes with the same name still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// A single line of tree text, decoded.
///
/// `prefix` and `connector` are kept verbatim so the line can be re-emitted
/// without reformatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub depth: usize,
    pub is_directory: bool,
    pub is_active: bool,
    pub prefix: String,
    pub connector: String,
    pub children: Vec<NodeId>,
    /// Back-reference into the owning forest; `None` for roots.
    pub parent: Option<NodeId>,
}

/// An ordered collection of trees backed by a single node table.
///
/// Nodes are appended in document order, so iterating `nodes` is a pre-order
/// walk of the whole forest.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Forest {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Append a node under `parent` (or as a new root) and return its id.
    ///
    /// Callers must append in document order; the id is the next table slot.
    pub fn push(
        &mut self,
        parent: Option<NodeId>,
        name: String,
        depth: usize,
        is_directory: bool,
        prefix: String,
        connector: String,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            id,
            name,
            depth,
            is_directory,
            is_active: true,
            prefix,
            connector,
            children: Vec::new(),
            parent,
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Ids of every node strictly below `id`, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self[id].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self[next].children.iter().rev().copied());
        }
        out
    }

    /// Ancestor chain of `id`, nearest parent first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            forest: self,
            next: self[id].parent,
        }
    }

    /// Set `id` and its whole subtree to `active`.
    pub fn set_subtree_active(&mut self, id: NodeId, active: bool) {
        self[id].is_active = active;
        for d in self.descendants(id) {
            self[d].is_active = active;
        }
    }

    /// Slash-joined names from the root down to `id`.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut parts: Vec<&str> = self.ancestors(id).map(|a| a.name.as_str()).collect();
        parts.reverse();
        parts.push(self[id].name.as_str());
        parts.join("/")
    }

    /// Resolve a slash-joined name path (as produced by [`Forest::path_of`]).
    ///
    /// Matching is exact per segment; the first matching sibling wins.
    pub fn find_by_path(&self, path: &str) -> Option<NodeId> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut current = *self.roots.iter().find(|r| self[**r].name == first)?;
        for segment in segments {
            current = *self[current]
                .children
                .iter()
                .find(|c| self[**c].name == segment)?;
        }
        Some(current)
    }

    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_active).count()
    }
}

impl Index<NodeId> for Forest {
    type Output = TreeNode;

    fn index(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Forest {
    fn index_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }
}

pub struct Ancestors<'a> {
    forest: &'a Forest,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.forest[self.next?];
        self.next = node.parent;
        Some(node)
    }
}
