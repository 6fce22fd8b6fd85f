//! Monocle engine: one client fills the screen, everyone else waits
//! unplaced. The placed client is the head of an ordered list; placement
//! requests promote clients to the head.

use tracing::debug;

use crate::engine::{
    EngineCapabilities, EngineConfig, EngineError, InsertionPoint, LayoutEngine,
};
use crate::geometry::Direction;
use crate::model::client::ClientId;
use crate::model::tree::{LayoutTree, NodeId};

pub struct MonocleEngine {
    config: EngineConfig,
    tree: LayoutTree,
    order: Vec<ClientId>,
}

impl MonocleEngine {
    pub fn new(config: EngineConfig) -> Self {
        MonocleEngine { config, tree: LayoutTree::new(), order: Vec::new() }
    }

    fn sync_root(&mut self) {
        let root = self.tree.root();
        self.tree.take_client(root);
        if let Some(&head) = self.order.first() {
            self.tree.set_client(root, head);
        }
    }
}

impl LayoutEngine for MonocleEngine {
    fn add_client(&mut self, client: ClientId) -> Result<(), EngineError> {
        if self.order.contains(&client) {
            debug!(?client, "client already managed");
            return Ok(());
        }
        match self.config.insertion_point {
            InsertionPoint::Left => self.order.insert(0, client),
            InsertionPoint::Right | InsertionPoint::Active => self.order.push(client),
        }
        self.sync_root();
        Ok(())
    }

    fn remove_client(&mut self, client: ClientId) -> Result<(), EngineError> {
        let Some(position) = self.order.iter().position(|&c| c == client) else {
            return Err(EngineError::UnknownClient(client));
        };
        self.order.remove(position);
        self.sync_root();
        Ok(())
    }

    fn put_client_in_tile(
        &mut self,
        client: ClientId,
        tile: NodeId,
        _direction: Option<Direction>,
    ) -> Result<(), EngineError> {
        if !self.tree.contains(tile) {
            return Err(EngineError::UnknownTile(tile));
        }
        if let Some(position) = self.order.iter().position(|&c| c == client) {
            self.order.remove(position);
        }
        self.order.insert(0, client);
        debug!(?client, "promoted to the head");
        self.sync_root();
        Ok(())
    }

    fn build_layout(&mut self) -> Result<(), EngineError> {
        let root = self.tree.root();
        for child in self.tree.children(root).to_vec() {
            self.tree.remove(child);
        }
        self.sync_root();
        Ok(())
    }

    fn regenerate_layout(&mut self) -> Result<(), EngineError> { Ok(()) }

    fn capabilities(&self) -> EngineCapabilities { EngineCapabilities::empty() }

    fn config(&self) -> &EngineConfig { &self.config }

    fn tree(&self) -> &LayoutTree { &self.tree }

    fn tree_mut(&mut self) -> &mut LayoutTree { &mut self.tree }

    fn untracked_clients(&self) -> Vec<ClientId> {
        self.order.iter().skip(1).copied().collect()
    }
}
