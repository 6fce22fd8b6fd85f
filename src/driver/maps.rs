//! Identity maps tying the abstract tree to live objects. Both maps are
//! injective in both directions by construction; every association goes
//! through a choke point that refuses collisions instead of clobbering.

use std::hash::Hash;

use slotmap::SlotMap;

use crate::common::collections::HashMap;
use crate::model::client::{Client, ClientId};
use crate::model::tree::NodeId;

/// NodeId <-> live tile id, one-to-one.
pub struct TileMap<T> {
    to_tile: HashMap<NodeId, T>,
    to_node: HashMap<T, NodeId>,
}

impl<T> Default for TileMap<T> {
    fn default() -> Self {
        TileMap { to_tile: HashMap::default(), to_node: HashMap::default() }
    }
}

impl<T: Copy + Eq + Hash> TileMap<T> {
    /// Associates a node with a tile. Returns false without touching the map
    /// when either side is already bound.
    pub fn insert(&mut self, node: NodeId, tile: T) -> bool {
        if self.to_tile.contains_key(&node) || self.to_node.contains_key(&tile) {
            return false;
        }
        self.to_tile.insert(node, tile);
        self.to_node.insert(tile, node);
        true
    }

    pub fn get_tile(&self, node: NodeId) -> Option<T> { self.to_tile.get(&node).copied() }

    pub fn get_node(&self, tile: T) -> Option<NodeId> { self.to_node.get(&tile).copied() }

    pub fn remove_by_node(&mut self, node: NodeId) -> Option<T> {
        let tile = self.to_tile.remove(&node)?;
        self.to_node.remove(&tile);
        Some(tile)
    }

    pub fn remove_by_tile(&mut self, tile: T) -> Option<NodeId> {
        let node = self.to_node.remove(&tile)?;
        self.to_tile.remove(&node);
        Some(node)
    }

    pub fn clear(&mut self) {
        self.to_tile.clear();
        self.to_node.clear();
    }

    pub fn len(&self) -> usize { self.to_tile.len() }

    pub fn is_empty(&self) -> bool { self.to_tile.is_empty() }
}

/// Window id <-> Client record. One Client per live window for as long as
/// the window stays tracked.
pub struct ClientMap<W> {
    clients: SlotMap<ClientId, Client<W>>,
    by_window: HashMap<W, ClientId>,
}

impl<W> Default for ClientMap<W> {
    fn default() -> Self {
        ClientMap { clients: SlotMap::with_key(), by_window: HashMap::default() }
    }
}

impl<W: Copy + Eq + Hash> ClientMap<W> {
    /// Returns the window's client, minting one on first sight.
    pub fn track(&mut self, window: W) -> ClientId {
        if let Some(&client) = self.by_window.get(&window) {
            return client;
        }
        let client = self.clients.insert(Client::new(window));
        self.by_window.insert(window, client);
        client
    }

    pub fn client_for(&self, window: W) -> Option<ClientId> {
        self.by_window.get(&window).copied()
    }

    pub fn window_for(&self, client: ClientId) -> Option<W> {
        self.clients.get(client).map(|c| c.window)
    }

    pub fn get(&self, client: ClientId) -> Option<&Client<W>> { self.clients.get(client) }

    pub fn get_mut(&mut self, client: ClientId) -> Option<&mut Client<W>> {
        self.clients.get_mut(client)
    }

    pub fn remove(&mut self, client: ClientId) -> Option<Client<W>> {
        let record = self.clients.remove(client)?;
        self.by_window.remove(&record.window);
        Some(record)
    }

    pub fn remove_by_window(&mut self, window: W) -> Option<ClientId> {
        let client = self.by_window.remove(&window)?;
        self.clients.remove(client);
        Some(client)
    }

    pub fn contains_window(&self, window: W) -> bool { self.by_window.contains_key(&window) }

    /// Clients in slot order, which matches insertion order while no
    /// removals have happened in between.
    pub fn clients(&self) -> impl Iterator<Item = ClientId> + '_ { self.clients.keys() }

    pub fn len(&self) -> usize { self.clients.len() }

    pub fn is_empty(&self) -> bool { self.clients.is_empty() }
}
