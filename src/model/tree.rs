//! The abstract half of a tiled screen: an ordered tree of tiles owned by the
//! active layout engine. Leaves may hold one occupant client; interior nodes
//! only subdivide space. The driver mirrors this tree onto the host's live
//! tiles and never owns it.

use slotmap::SlotMap;

use crate::geometry::{LayoutDirection, Size};
use crate::model::client::ClientId;

slotmap::new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    layout: LayoutDirection,
    client: Option<ClientId>,
    requested_size: Option<Size>,
}

#[derive(Debug, Clone)]
pub struct LayoutTree {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for LayoutTree {
    fn default() -> Self { Self::new() }
}

impl LayoutTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::default());
        LayoutTree { nodes, root }
    }

    pub fn root(&self) -> NodeId { self.root }

    pub fn contains(&self, node: NodeId) -> bool { self.nodes.contains_key(node) }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn layout(&self, node: NodeId) -> LayoutDirection {
        self.nodes.get(node).map(|n| n.layout).unwrap_or_default()
    }

    pub fn set_layout(&mut self, node: NodeId, layout: LayoutDirection) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.layout = layout;
        }
    }

    pub fn client(&self, node: NodeId) -> Option<ClientId> {
        self.nodes.get(node).and_then(|n| n.client)
    }

    pub fn set_client(&mut self, node: NodeId, client: ClientId) {
        let Some(n) = self.nodes.get_mut(node) else { return };
        debug_assert!(n.children.is_empty(), "occupants live on leaves");
        n.client = Some(client);
    }

    pub fn take_client(&mut self, node: NodeId) -> Option<ClientId> {
        self.nodes.get_mut(node).and_then(|n| n.client.take())
    }

    pub fn requested_size(&self, node: NodeId) -> Option<Size> {
        self.nodes.get(node).and_then(|n| n.requested_size)
    }

    pub fn set_requested_size(&mut self, node: NodeId, size: Option<Size>) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.requested_size = size;
        }
    }

    /// Appends a fresh empty leaf under `parent`.
    pub fn add_child(&mut self, parent: NodeId) -> NodeId {
        let index = self.children(parent).len();
        self.add_child_at(parent, index)
    }

    pub fn add_child_at(&mut self, parent: NodeId, index: usize) -> NodeId {
        debug_assert!(self.nodes.contains_key(parent), "parent must be in the tree");
        let child = self.nodes.insert(Node {
            parent: Some(parent),
            ..Node::default()
        });
        if let Some(p) = self.nodes.get_mut(parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, child);
        }
        child
    }

    /// Detaches `node` from its parent and drops it with its whole subtree.
    /// The root cannot be removed; it outlives every reconfiguration.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root || !self.nodes.contains_key(node) {
            return;
        }
        if let Some(parent) = self.parent(node)
            && let Some(p) = self.nodes.get_mut(parent)
        {
            p.children.retain(|&c| c != node);
        }
        for id in self.descendants(node) {
            self.nodes.remove(id);
        }
    }

    /// Moves every child of `from` to the end of `to`'s child list.
    pub fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        if from == to {
            return;
        }
        let moved = match self.nodes.get_mut(from) {
            Some(n) => std::mem::take(&mut n.children),
            None => return,
        };
        for &child in &moved {
            if let Some(c) = self.nodes.get_mut(child) {
                c.parent = Some(to);
            }
        }
        if let Some(t) = self.nodes.get_mut(to) {
            t.children.extend(moved);
        }
    }

    /// `node` plus everything below it, preorder.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if !self.nodes.contains_key(id) {
                continue;
            }
            out.push(id);
            stack.extend(self.children(id).iter().copied());
        }
        out
    }

    /// Skips occupant-less wrappers with exactly one child. Chains like these
    /// appear when engines keep structural scaffolding above a lone subtree.
    pub fn descend_single_chain(&self, mut node: NodeId) -> NodeId {
        while self.client(node).is_none() && self.children(node).len() == 1 {
            node = self.children(node)[0];
        }
        node
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ { self.nodes.keys() }

    pub fn draw(&self) -> String {
        let mut out = String::new();
        let _ = ascii_tree::write_tree(&mut out, &self.draw_node(self.root));
        out
    }

    fn draw_node(&self, node: NodeId) -> ascii_tree::Tree {
        let label = match (self.client(node), self.children(node).is_empty()) {
            (Some(client), _) => format!("{node:?} {client:?}"),
            (None, true) => format!("{node:?} empty"),
            (None, false) => format!("{node:?} {:?}", self.layout(node)),
        };
        let children = self.children(node);
        if children.is_empty() {
            ascii_tree::Tree::Leaf(vec![label])
        } else {
            ascii_tree::Tree::Node(
                label,
                children.iter().map(|&c| self.draw_node(c)).collect(),
            )
        }
    }
}
