//! Reconciliation driver. One driver per screen keeps the live tile tree in
//! sync with the active engine's abstract tree: full destructive rebuilds
//! after placement changes, incremental size/structure pulls when the live
//! side changes shape under us. Nothing here is fatal; every failed step is
//! logged and the driver stays ready for the next signal.

pub mod maps;

use tracing::{debug, error, warn};

use crate::common::collections::VecDeque;
use crate::common::config::Settings;
use crate::engine::{
    EngineCapabilities, EngineConfig, EngineKind, EngineType, InsertionPoint, LayoutEngine,
};
use crate::geometry::{Direction, Orientation, Point};
use crate::host::Host;
use crate::model::client::ClientId;
use crate::model::tree::NodeId;
use maps::{ClientMap, TileMap};

pub struct TilingDriver<H: Host> {
    screen: H::ScreenId,
    engine: EngineKind,
    engine_type: EngineType,
    tiles: TileMap<H::TileId>,
    clients: ClientMap<H::WindowId>,
    /// Live windows we know about but do not manage right now: removed from
    /// tiling, or left unplaced by the engine.
    untracked: Vec<H::WindowId>,
    settings: Settings,
}

impl<H: Host> TilingDriver<H> {
    pub fn new(screen: H::ScreenId, settings: Settings) -> Self {
        let engine_type = settings.engine;
        let engine = EngineKind::new(engine_type, settings.engine_config());
        TilingDriver {
            screen,
            engine,
            engine_type,
            tiles: TileMap::default(),
            clients: ClientMap::default(),
            untracked: Vec::new(),
            settings,
        }
    }

    pub fn screen(&self) -> H::ScreenId { self.screen }

    pub fn engine_type(&self) -> EngineType { self.engine_type }

    pub fn engine_config(&self) -> EngineConfig { *self.engine.config() }

    pub fn is_tracked(&self, window: H::WindowId) -> bool {
        self.clients.contains_window(window)
    }

    pub fn untracked_windows(&self) -> &[H::WindowId] { &self.untracked }

    /// Screen position the window was last tiled at, if it ever was.
    pub fn last_tiled_location(&self, window: H::WindowId) -> Option<Point> {
        let client = self.clients.client_for(window)?;
        self.clients.get(client)?.last_tiled_location
    }

    pub fn draw_tree(&self) -> String { self.engine.tree().draw() }

    /// Starts managing a window. Placement goes next to the active window
    /// when configured and resolvable, otherwise wherever the engine puts
    /// new clients by default.
    pub fn add_window(&mut self, host: &mut H, window: H::WindowId) {
        if self.clients.contains_window(window) {
            debug!(?window, "window already tracked");
            return;
        }
        let client = self.clients.track(window);
        debug!(?window, class = %host.window_resource_class(window), "tracking new window");
        if !self.place_at_active(host, client) {
            if let Err(err) = self.engine.add_client(client) {
                warn!(?window, %err, "engine refused the new client");
            }
        }
        self.recompute(host);
    }

    /// Stops managing a window. The window stays alive on the host side,
    /// untiled and remembered as untracked.
    pub fn remove_window(&mut self, host: &mut H, window: H::WindowId) {
        let Some(client) = self.clients.remove_by_window(window) else {
            debug!(?window, "window was not tracked");
            return;
        };
        host.set_window_tile(window, None);
        self.untracked.push(window);
        if let Err(err) = self.engine.remove_client(client) {
            warn!(?window, %err, "engine did not know the removed client");
        }
        self.recompute(host);
    }

    /// Places a window relative to a specific live tile. The tile must be
    /// one we registered; otherwise nothing is mutated.
    pub fn put_window_in_tile(
        &mut self,
        host: &mut H,
        window: H::WindowId,
        tile: H::TileId,
        direction: Option<Direction>,
    ) {
        let Some(node) = self.tiles.get_node(tile) else {
            error!(
                ?window,
                ?tile,
                geometry = ?host.tile_geometry(tile),
                "live tile is not registered"
            );
            return;
        };
        let client = self.clients.track(window);
        let direction = direction.map(|d| self.translate_direction(d));
        if let Err(err) = self.engine.put_client_in_tile(client, node, direction) {
            warn!(?window, %err, "engine placement failed");
        }
        self.recompute(host);
    }

    /// Swaps the abstract engine, carrying every tracked client over in
    /// stable order. Clients the new engine refuses stay tracked anyway.
    pub fn switch_engine(&mut self, host: &mut H, engine: EngineKind) {
        self.engine_type = engine.engine_type();
        self.engine = engine;
        let clients: Vec<ClientId> = self.clients.clients().collect();
        for client in clients {
            if let Err(err) = self.engine.add_client(client) {
                warn!(?client, %err, "client did not survive the engine switch");
            }
        }
        if let Err(err) = self.engine.build_layout() {
            warn!(%err, "engine layout failed after the switch");
        }
        self.build_layout(host);
    }

    /// Full destructive rebuild of the live tree from the abstract tree.
    pub fn build_layout(&mut self, host: &mut H) {
        let Some(root_tile) = host.root_tile(self.screen) else {
            debug!(screen = ?self.screen, "screen has no tiling surface");
            return;
        };

        // tear down whatever we built last time
        for child in host.tile_children(root_tile) {
            host.remove_tile(child);
        }
        self.tiles.clear();

        // recompute the untracked list: windows without a client stay on it
        // and stay untiled, the rest is whatever the engine currently leaves
        // unplaced
        self.untracked.retain(|&w| !self.clients.contains_window(w));
        for &window in &self.untracked {
            host.set_window_tile(window, None);
        }
        for client in self.engine.untracked_clients() {
            if let Some(window) = self.clients.window_for(client) {
                host.set_window_tile(window, None);
                if !self.untracked.contains(&window) {
                    self.untracked.push(window);
                }
            }
        }

        let tree = self.engine.tree();
        let effective_root = tree.descend_single_chain(tree.root());

        if self.settings.maximize_single
            && tree.children(effective_root).is_empty()
            && let Some(client) = tree.client(effective_root)
        {
            let Some(window) = self.clients.window_for(client) else {
                error!(?client, "placed client has no window; aborting the rebuild");
                return;
            };
            host.set_window_tile(window, None);
            make_visible(host, window);
            host.set_window_maximized(window, true);
            return;
        }

        // lockstep walk: every queue entry pairs an abstract node with the
        // live tile it owns
        let mut queue: VecDeque<(NodeId, H::TileId)> = VecDeque::new();
        self.tiles.insert(effective_root, root_tile);
        queue.push_back((effective_root, root_tile));
        while let Some((node, live)) = queue.pop_front() {
            host.set_tile_layout(live, tree.layout(node));
            let children = tree.children(node);
            match children.len() {
                0 => {}
                1 => {
                    // collapse: the only child takes over this very live tile
                    let child = children[0];
                    self.tiles.remove_by_node(node);
                    self.tiles.insert(child, live);
                    queue.push_back((child, live));
                    continue;
                }
                n => {
                    let orientation =
                        tree.layout(node).orientation().unwrap_or(Orientation::Horizontal);
                    if host.tile_children(live).is_empty() {
                        host.split_tile(live, orientation);
                    }
                    // the host produces child i by splitting child i-1
                    let mut count = host.tile_children(live).len();
                    while count < n {
                        match host.tile_children(live).last() {
                            Some(&last) => host.split_tile(last, orientation),
                            None => break,
                        }
                        let now = host.tile_children(live).len();
                        if now == count {
                            break;
                        }
                        count = now;
                    }
                    let live_children = host.tile_children(live);
                    if live_children.len() != n {
                        error!(
                            expected = n,
                            got = live_children.len(),
                            "host did not produce the requested children; aborting the rebuild"
                        );
                        return;
                    }
                    let slices = host.tile_geometry(live).split_evenly(orientation, n);
                    for (&tile, slice) in live_children.iter().zip(&slices) {
                        host.set_tile_geometry(tile, *slice);
                    }
                    for (&child, &tile) in children.iter().zip(&live_children) {
                        if !self.tiles.insert(child, tile) {
                            error!(?child, "abstract node mapped twice; aborting the rebuild");
                            return;
                        }
                        queue.push_back((child, tile));
                    }
                }
            }
            if let Some(client) = tree.client(node) {
                let Some(window) = self.clients.window_for(client) else {
                    error!(?client, "occupant has no tracked window; aborting the rebuild");
                    return;
                };
                make_visible(host, window);
                host.set_window_maximized(window, false);
                host.set_window_tile(window, Some(live));
                let center = host.tile_geometry(live).center();
                if let Some(record) = self.clients.get_mut(client) {
                    record.last_tiled_location = Some(center);
                }
            }
        }

        self.fix_sizing(host);
    }

    /// Pulls the live tree's current shape and sizes back into the abstract
    /// tree without rebuilding anything on the live side.
    pub fn regenerate_layout(&mut self, host: &mut H) {
        let Some(root_tile) = host.root_tile(self.screen) else {
            debug!(screen = ?self.screen, "screen has no tiling surface");
            return;
        };
        let mutable = self.engine.capabilities().contains(EngineCapabilities::TILES_MUTABLE);
        let mut queue: VecDeque<H::TileId> = VecDeque::from([root_tile]);
        while let Some(live) = queue.pop_front() {
            let Some(node) = self.tiles.get_node(live) else {
                error!(tile = ?live, "live tile is not registered; skipping its subtree");
                continue;
            };
            let geometry = host.tile_geometry(live);
            self.engine.tree_mut().set_requested_size(node, Some(geometry.size()));
            if mutable {
                self.sync_structure(host, node, live);
            }
            queue.extend(host.tile_children(live));
        }
        if let Err(err) = self.engine.regenerate_layout() {
            warn!(%err, "engine size regeneration failed");
        }
        if let Err(err) = self.engine.build_layout() {
            warn!(%err, "engine layout failed");
        }
    }

    /// Abstract structure follows the live side: children whose live tile
    /// vanished are dropped, live children we never placed are adopted.
    fn sync_structure(&mut self, host: &mut H, node: NodeId, live: H::TileId) {
        let live_children = host.tile_children(live);
        let stale: Vec<NodeId> = self
            .engine
            .tree()
            .children(node)
            .iter()
            .copied()
            .filter(|&child| {
                self.tiles.get_tile(child).map(|t| !live_children.contains(&t)).unwrap_or(true)
            })
            .collect();
        for child in stale {
            debug!(?child, "dropping abstract node whose live tile vanished");
            for n in self.engine.tree().descendants(child) {
                self.tiles.remove_by_node(n);
            }
            self.engine.tree_mut().remove(child);
        }
        for tile in live_children {
            if self.tiles.get_node(tile).is_none() {
                let child = self.engine.tree_mut().add_child(node);
                self.tiles.insert(child, tile);
                debug!(?child, ?tile, "adopted live tile into the abstract tree");
            }
        }
    }

    fn place_at_active(&mut self, host: &mut H, client: ClientId) -> bool {
        if self.engine.config().insertion_point != InsertionPoint::Active {
            return false;
        }
        let Some(active) = host.active_window() else { return false };
        let Some(active_client) = self.clients.client_for(active) else { return false };
        if active_client == client {
            return false;
        }
        let Some(tile) = host.window_tile(active) else { return false };
        let Some(node) = self.tiles.get_node(tile) else { return false };
        match self.engine.put_client_in_tile(client, node, None) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "active-position insert failed; using default placement");
                false
            }
        }
    }

    fn translate_direction(&self, direction: Direction) -> Direction {
        let rotates =
            self.engine.capabilities().contains(EngineCapabilities::TRANSLATE_ROTATION);
        if rotates && self.engine.config().rotate_layout {
            direction.rotated_cw()
        } else {
            direction
        }
    }

    fn recompute(&mut self, host: &mut H) {
        if let Err(err) = self.engine.build_layout() {
            warn!(%err, "engine layout failed");
        }
        self.build_layout(host);
    }

    /// Re-applies requested sizes on top of the even distribution the
    /// rebuild left behind. Groups with any size-less child stay even.
    fn fix_sizing(&self, host: &mut H) {
        let tree = self.engine.tree();
        for node in tree.descendants(tree.root()) {
            let children = tree.children(node);
            if children.len() < 2 {
                continue;
            }
            let Some(live) = self.tiles.get_tile(node) else { continue };
            let orientation = tree.layout(node).orientation().unwrap_or(Orientation::Horizontal);
            let extents: Option<Vec<f64>> = children
                .iter()
                .map(|&c| tree.requested_size(c).map(|s| s.along(orientation)))
                .collect();
            let Some(extents) = extents else { continue };
            if extents.iter().sum::<f64>() <= 0.0 {
                continue;
            }
            let slices = host.tile_geometry(live).split_weighted(orientation, &extents);
            for (&child, slice) in children.iter().zip(&slices) {
                if let Some(live_child) = self.tiles.get_tile(child) {
                    host.set_tile_geometry(live_child, *slice);
                }
            }
        }
    }
}

/// Lifts a window out of any state that would keep it off screen.
fn make_visible<H: Host>(host: &mut H, window: H::WindowId) {
    if host.window_minimized(window) {
        host.set_window_minimized(window, false);
    }
    if host.window_fullscreen(window) {
        host.set_window_fullscreen(window, false);
    }
}
