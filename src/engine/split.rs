//! Splitting engine: every client gets its own leaf, placement hints split or
//! nest relative to existing leaves, and per-group ratios survive live
//! resizes. Structure edits made on the live tree are adopted wholesale, so
//! this engine declares its tiles mutable.

use slotmap::SecondaryMap;
use tracing::debug;

use crate::common::collections::{HashMap, VecDeque};
use crate::engine::{
    EngineCapabilities, EngineConfig, EngineError, InsertionPoint, LayoutEngine,
};
use crate::geometry::{Direction, LayoutDirection, Orientation, Size};
use crate::model::client::ClientId;
use crate::model::tree::{LayoutTree, NodeId};

pub struct SplitEngine {
    config: EngineConfig,
    tree: LayoutTree,
    /// Share of the parent's extent along the parent's axis, normalized per
    /// sibling group by `build_layout`.
    ratios: SecondaryMap<NodeId, f64>,
    client_nodes: HashMap<ClientId, NodeId>,
}

impl SplitEngine {
    pub fn new(config: EngineConfig) -> Self {
        SplitEngine {
            config,
            tree: LayoutTree::new(),
            ratios: SecondaryMap::new(),
            client_nodes: HashMap::default(),
        }
    }

    fn descend_to_leaf(&self, mut node: NodeId) -> NodeId {
        while let Some(&first) = self.tree.children(node).first() {
            node = first;
        }
        node
    }

    fn insert_root_leaf(&mut self, client: ClientId, index: usize) {
        let root = self.tree.root();
        let count = self.tree.children(root).len();
        let scale = count as f64 / (count + 1) as f64;
        for child in self.tree.children(root).to_vec() {
            if let Some(r) = self.ratios.get_mut(child) {
                *r *= scale;
            }
        }
        let leaf = self.tree.add_child_at(root, index);
        self.tree.set_client(leaf, client);
        self.ratios.insert(leaf, 1.0 / (count + 1) as f64);
        self.client_nodes.insert(client, leaf);
    }

    /// Pulls a client's leaf out of the tree, collapsing any wrapper the
    /// removal leaves behind. Returns false for clients we do not manage.
    fn detach(&mut self, client: ClientId) -> bool {
        let Some(node) = self.client_nodes.remove(&client) else {
            return false;
        };
        if node == self.tree.root() {
            self.tree.take_client(node);
            return true;
        }
        let parent = self.tree.parent(node);
        let freed = self.ratios.get(node).copied().unwrap_or(0.0);
        self.tree.remove(node);
        if let Some(parent) = parent {
            if freed > 0.0 && freed < 1.0 {
                for child in self.tree.children(parent).to_vec() {
                    if let Some(r) = self.ratios.get_mut(child) {
                        *r /= 1.0 - freed;
                    }
                }
            }
            self.collapse_wrapper(parent);
        }
        true
    }

    /// A group left with a single member is spliced into its own place.
    fn collapse_wrapper(&mut self, node: NodeId) {
        let children = self.tree.children(node).to_vec();
        if children.len() != 1 {
            return;
        }
        let only = children[0];
        let layout = self.tree.layout(only);
        let client = self.tree.take_client(only);
        let size = self.tree.requested_size(only);
        self.tree.reparent_children(only, node);
        self.tree.remove(only);
        self.ratios.remove(only);
        self.tree.set_layout(node, layout);
        self.tree.set_requested_size(node, size);
        if let Some(c) = client {
            self.tree.set_client(node, c);
            self.client_nodes.insert(c, node);
        }
    }

    /// The target leaf becomes a container holding its old occupant and the
    /// new client side by side along `orientation`.
    fn nest_in_target(
        &mut self,
        target: NodeId,
        client: ClientId,
        orientation: Orientation,
        before: bool,
    ) {
        let occupant = self.tree.take_client(target);
        self.tree.set_layout(target, LayoutDirection::from(orientation));
        let first = self.tree.add_child(target);
        let second = self.tree.add_child(target);
        let (new_node, old_node) = if before { (first, second) } else { (second, first) };
        if let Some(c) = occupant {
            self.tree.set_client(old_node, c);
            self.client_nodes.insert(c, old_node);
        }
        self.tree.set_client(new_node, client);
        self.client_nodes.insert(client, new_node);
        self.ratios.insert(first, 0.5);
        self.ratios.insert(second, 0.5);
    }

    /// Repairs the invariants the driver's structural grafts can disturb:
    /// occupied interior nodes, floating interiors, ratio-less children, and
    /// bookkeeping for nodes pruned from under us.
    fn normalize(&mut self) {
        let occupied_interior: Vec<(NodeId, ClientId)> = self
            .tree
            .nodes()
            .filter(|&n| !self.tree.children(n).is_empty())
            .filter_map(|n| self.tree.client(n).map(|c| (n, c)))
            .collect();
        for (node, client) in occupied_interior {
            self.tree.take_client(node);
            let leaf = self.tree.add_child_at(node, 0);
            self.tree.set_client(leaf, client);
            self.client_nodes.insert(client, leaf);
            let children = self.tree.children(node).to_vec();
            let even = 1.0 / children.len() as f64;
            for child in children {
                self.ratios.insert(child, even);
            }
        }

        // preorder so a parent's axis is settled before its children pick
        // the perpendicular one
        let floating_interiors: Vec<NodeId> = self
            .tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&n| {
                !self.tree.children(n).is_empty() && self.tree.layout(n).orientation().is_none()
            })
            .collect();
        for node in floating_interiors {
            let orientation = self
                .tree
                .parent(node)
                .and_then(|p| self.tree.layout(p).orientation())
                .map(Orientation::flipped)
                .unwrap_or(Orientation::Horizontal);
            self.tree.set_layout(node, LayoutDirection::from(orientation));
        }

        let tree = &self.tree;
        self.client_nodes.retain(|_, node| tree.contains(*node));
        self.ratios.retain(|node, _| tree.contains(node));

        self.normalize_ratios();
    }

    fn normalize_ratios(&mut self) {
        let interiors: Vec<NodeId> = self
            .tree
            .nodes()
            .filter(|&n| !self.tree.children(n).is_empty())
            .collect();
        for node in interiors {
            let children = self.tree.children(node).to_vec();
            let known: Vec<f64> =
                children.iter().filter_map(|&c| self.ratios.get(c).copied()).collect();
            let fill = if known.is_empty() {
                1.0 / children.len() as f64
            } else {
                known.iter().sum::<f64>() / known.len() as f64
            };
            let mut total = 0.0;
            for &child in &children {
                let r = self.ratios.get(child).copied().unwrap_or(fill);
                self.ratios.insert(child, r);
                total += r;
            }
            if total > 0.0 {
                for &child in &children {
                    if let Some(r) = self.ratios.get_mut(child) {
                        *r /= total;
                    }
                }
            }
        }
    }

    /// Writes each node's share of the root size back into the tree,
    /// top-down, so the driver can re-apply custom sizing after it builds
    /// live structure.
    fn emit_sizes(&mut self) {
        let root = self.tree.root();
        let Some(size) = self.tree.requested_size(root) else {
            return;
        };
        let mut queue: VecDeque<(NodeId, Size)> = VecDeque::from([(root, size)]);
        while let Some((node, size)) = queue.pop_front() {
            self.tree.set_requested_size(node, Some(size));
            let children = self.tree.children(node).to_vec();
            if children.is_empty() {
                continue;
            }
            let orientation =
                self.tree.layout(node).orientation().unwrap_or(Orientation::Horizontal);
            let weights: Vec<f64> =
                children.iter().map(|&c| self.ratios.get(c).copied().unwrap_or(0.0)).collect();
            let total: f64 = weights.iter().sum();
            let even = 1.0 / children.len() as f64;
            for (&child, weight) in children.iter().zip(weights) {
                let fraction = if total > 0.0 { weight / total } else { even };
                let child_size = match orientation {
                    Orientation::Horizontal => Size::new(size.width * fraction, size.height),
                    Orientation::Vertical => Size::new(size.width, size.height * fraction),
                };
                queue.push_back((child, child_size));
            }
        }
    }
}

impl LayoutEngine for SplitEngine {
    fn add_client(&mut self, client: ClientId) -> Result<(), EngineError> {
        if self.client_nodes.contains_key(&client) {
            debug!(?client, "client already managed");
            return Ok(());
        }
        let root = self.tree.root();
        if self.tree.children(root).is_empty() && self.tree.client(root).is_none() {
            self.tree.set_client(root, client);
            self.client_nodes.insert(client, root);
            self.ratios.insert(root, 1.0);
            return Ok(());
        }
        if self.tree.layout(root).orientation().is_none() {
            self.tree.set_layout(root, LayoutDirection::Horizontal);
        }
        if let Some(existing) = self.tree.take_client(root) {
            let keep = self.tree.add_child(root);
            self.tree.set_client(keep, existing);
            self.client_nodes.insert(existing, keep);
            self.ratios.insert(keep, 1.0);
        }
        let index = match self.config.insertion_point {
            InsertionPoint::Left => 0,
            InsertionPoint::Right | InsertionPoint::Active => self.tree.children(root).len(),
        };
        self.insert_root_leaf(client, index);
        Ok(())
    }

    fn remove_client(&mut self, client: ClientId) -> Result<(), EngineError> {
        if self.detach(client) {
            Ok(())
        } else {
            Err(EngineError::UnknownClient(client))
        }
    }

    fn put_client_in_tile(
        &mut self,
        client: ClientId,
        tile: NodeId,
        direction: Option<Direction>,
    ) -> Result<(), EngineError> {
        if !self.tree.contains(tile) {
            return Err(EngineError::UnknownTile(tile));
        }
        self.detach(client);
        let target = if self.tree.contains(tile) {
            tile
        } else {
            debug!(?tile, "placement target collapsed away; using the root");
            self.tree.root()
        };
        let target = self.descend_to_leaf(target);

        let direction = direction.unwrap_or(Direction::Right);
        let orientation = direction.orientation();
        let before = matches!(direction, Direction::Left | Direction::Up);

        if self.tree.client(target).is_none() && self.tree.children(target).is_empty() {
            self.tree.set_client(target, client);
            self.client_nodes.insert(client, target);
            if self.ratios.get(target).is_none() {
                self.ratios.insert(target, 1.0);
            }
            return Ok(());
        }

        match self.tree.parent(target) {
            Some(parent) if self.tree.layout(parent).orientation() == Some(orientation) => {
                let siblings = self.tree.children(parent);
                let position = siblings.iter().position(|&c| c == target).unwrap_or(0);
                let index = if before { position } else { position + 1 };
                let leaf = self.tree.add_child_at(parent, index);
                self.tree.set_client(leaf, client);
                let share = self
                    .ratios
                    .get(target)
                    .copied()
                    .unwrap_or(1.0 / self.tree.children(parent).len() as f64)
                    / 2.0;
                self.ratios.insert(target, share);
                self.ratios.insert(leaf, share);
                self.client_nodes.insert(client, leaf);
            }
            _ => self.nest_in_target(target, client, orientation, before),
        }
        Ok(())
    }

    fn build_layout(&mut self) -> Result<(), EngineError> {
        self.normalize();
        self.emit_sizes();
        Ok(())
    }

    fn regenerate_layout(&mut self) -> Result<(), EngineError> {
        self.normalize();
        let interiors: Vec<NodeId> = self
            .tree
            .nodes()
            .filter(|&n| !self.tree.children(n).is_empty())
            .collect();
        for node in interiors {
            let children = self.tree.children(node).to_vec();
            let orientation =
                self.tree.layout(node).orientation().unwrap_or(Orientation::Horizontal);
            let extents: Option<Vec<f64>> = children
                .iter()
                .map(|&c| self.tree.requested_size(c).map(|s| s.along(orientation)))
                .collect();
            let Some(extents) = extents else { continue };
            let total: f64 = extents.iter().sum();
            if total <= 0.0 {
                continue;
            }
            for (&child, extent) in children.iter().zip(extents) {
                self.ratios.insert(child, extent / total);
            }
        }
        Ok(())
    }

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities::TRANSLATE_ROTATION | EngineCapabilities::TILES_MUTABLE
    }

    fn config(&self) -> &EngineConfig { &self.config }

    fn tree(&self) -> &LayoutTree { &self.tree }

    fn tree_mut(&mut self) -> &mut LayoutTree { &mut self.tree }

    fn untracked_clients(&self) -> Vec<ClientId> { Vec::new() }
}
