//! In-memory host used by the unit tests. Close enough to the real thing to
//! drive reconciliation end to end: the split sibling quirk, recursive tile
//! removal, and best-tile hit-testing all behave like the live system.

use crate::common::collections::BTreeMap;
use crate::geometry::{Direction, LayoutDirection, Orientation, Point, Rect};
use crate::host::Host;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct ScreenHandle(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct TileHandle(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct WindowHandle(u32);

struct ScreenRecord {
    frame: Rect,
    root: Option<TileHandle>,
}

struct TileRecord {
    screen: ScreenHandle,
    parent: Option<TileHandle>,
    children: Vec<TileHandle>,
    frame: Rect,
    layout: LayoutDirection,
}

struct WindowRecord {
    screen: ScreenHandle,
    frame: Rect,
    tile: Option<TileHandle>,
    minimized: bool,
    fullscreen: bool,
    maximized: bool,
    class: String,
}

pub(crate) struct FakeHost {
    screens: BTreeMap<ScreenHandle, ScreenRecord>,
    tiles: BTreeMap<TileHandle, TileRecord>,
    windows: BTreeMap<WindowHandle, WindowRecord>,
    active: Option<WindowHandle>,
    padding: f64,
    next_id: u32,
}

impl FakeHost {
    pub(crate) fn new() -> FakeHost {
        FakeHost {
            screens: BTreeMap::new(),
            tiles: BTreeMap::new(),
            windows: BTreeMap::new(),
            active: None,
            padding: 0.0,
            next_id: 0,
        }
    }

    fn mint(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn add_screen(&mut self, frame: Rect) -> ScreenHandle {
        let screen = ScreenHandle(self.mint());
        let root = TileHandle(self.mint());
        self.tiles.insert(root, TileRecord {
            screen,
            parent: None,
            children: Vec::new(),
            frame,
            layout: LayoutDirection::Floating,
        });
        self.screens.insert(screen, ScreenRecord { frame, root: Some(root) });
        screen
    }

    pub(crate) fn open_window(&mut self, screen: ScreenHandle) -> WindowHandle {
        let window = WindowHandle(self.mint());
        let base = self.screens[&screen].frame;
        self.windows.insert(window, WindowRecord {
            screen,
            frame: Rect::new(base.x + 20.0, base.y + 20.0, 400.0, 300.0),
            tile: None,
            minimized: false,
            fullscreen: false,
            maximized: false,
            class: format!("window-{}", window.0),
        });
        window
    }

    pub(crate) fn remove_screen(&mut self, screen: ScreenHandle) {
        let Some(record) = self.screens.remove(&screen) else { return };
        if let Some(root) = record.root {
            self.remove_tile(root);
        }
    }

    pub(crate) fn set_padding(&mut self, padding: f64) { self.padding = padding; }

    pub(crate) fn window_maximized(&self, window: WindowHandle) -> bool {
        self.windows[&window].maximized
    }

    fn sync_tile_windows(&mut self, tile: TileHandle) {
        let Some(frame) = self.tiles.get(&tile).map(|t| t.frame) else { return };
        for window in self.windows.values_mut() {
            if window.tile == Some(tile) {
                window.frame = frame;
            }
        }
    }
}

impl Host for FakeHost {
    type ScreenId = ScreenHandle;
    type TileId = TileHandle;
    type WindowId = WindowHandle;

    fn screens(&self) -> Vec<ScreenHandle> { self.screens.keys().copied().collect() }

    fn root_tile(&self, screen: ScreenHandle) -> Option<TileHandle> {
        self.screens.get(&screen).and_then(|s| s.root)
    }

    fn active_window(&self) -> Option<WindowHandle> { self.active }

    fn activate_window(&mut self, window: WindowHandle) { self.active = Some(window); }

    fn tile_at(&self, screen: ScreenHandle, point: Point) -> Option<TileHandle> {
        let record = self.screens.get(&screen)?;
        if !record.frame.contains(point) {
            return None;
        }
        let mut current = record.root?;
        loop {
            let children = &self.tiles[&current].children;
            if children.is_empty() {
                return Some(current);
            }
            let contained =
                children.iter().copied().find(|c| self.tiles[c].frame.contains(point));
            current = contained.or_else(|| {
                children.iter().copied().min_by(|a, b| {
                    let da = distance_squared(self.tiles[a].frame.center(), point);
                    let db = distance_squared(self.tiles[b].frame.center(), point);
                    da.total_cmp(&db)
                })
            })?;
        }
    }

    fn tile_children(&self, tile: TileHandle) -> Vec<TileHandle> {
        self.tiles.get(&tile).map(|t| t.children.clone()).unwrap_or_default()
    }

    fn tile_parent(&self, tile: TileHandle) -> Option<TileHandle> {
        self.tiles.get(&tile).and_then(|t| t.parent)
    }

    fn tile_geometry(&self, tile: TileHandle) -> Rect { self.tiles[&tile].frame }

    fn set_tile_geometry(&mut self, tile: TileHandle, rect: Rect) {
        let Some(record) = self.tiles.get_mut(&tile) else { return };
        record.frame = rect;
        self.sync_tile_windows(tile);
    }

    fn resize_tile(&mut self, tile: TileHandle, edge: Direction, delta: f64) {
        let Some(record) = self.tiles.get(&tile) else { return };
        let Some(parent) = record.parent else { return };
        let frame = record.frame;
        let siblings = self.tiles[&parent].children.clone();
        let Some(position) = siblings.iter().position(|&c| c == tile) else { return };
        let neighbor = match edge {
            Direction::Right | Direction::Down => siblings.get(position + 1).copied(),
            Direction::Left | Direction::Up => {
                position.checked_sub(1).and_then(|i| siblings.get(i).copied())
            }
        };
        let Some(neighbor) = neighbor else { return };
        let mut a = frame;
        let mut b = self.tiles[&neighbor].frame;
        match edge {
            Direction::Right => {
                a.width += delta;
                b.x += delta;
                b.width -= delta;
            }
            Direction::Down => {
                a.height += delta;
                b.y += delta;
                b.height -= delta;
            }
            Direction::Left => {
                a.x -= delta;
                a.width += delta;
                b.width -= delta;
            }
            Direction::Up => {
                a.y -= delta;
                a.height += delta;
                b.height -= delta;
            }
        }
        self.tiles.get_mut(&tile).unwrap().frame = a;
        self.tiles.get_mut(&neighbor).unwrap().frame = b;
        self.sync_tile_windows(tile);
        self.sync_tile_windows(neighbor);
    }

    fn tile_padding(&self, _tile: TileHandle) -> f64 { self.padding }

    fn tile_layout(&self, tile: TileHandle) -> LayoutDirection { self.tiles[&tile].layout }

    fn set_tile_layout(&mut self, tile: TileHandle, layout: LayoutDirection) {
        if let Some(record) = self.tiles.get_mut(&tile) {
            record.layout = layout;
        }
    }

    fn split_tile(&mut self, tile: TileHandle, orientation: Orientation) {
        let Some(record) = self.tiles.get(&tile) else { return };
        let screen = record.screen;
        let frame = record.frame;
        let parent = record.parent;
        let has_children = !record.children.is_empty();
        let sibling_insert = match parent {
            Some(p) => self.tiles[&p].layout.orientation() == Some(orientation) || has_children,
            None => false,
        };
        let halves = frame.split_evenly(orientation, 2);
        if sibling_insert {
            let Some(parent) = parent else { return };
            let sibling = TileHandle(self.mint());
            self.tiles.insert(sibling, TileRecord {
                screen,
                parent: Some(parent),
                children: Vec::new(),
                frame: halves[1],
                layout: LayoutDirection::Floating,
            });
            let children = &mut self.tiles.get_mut(&parent).unwrap().children;
            let index =
                children.iter().position(|&c| c == tile).map(|p| p + 1).unwrap_or(children.len());
            children.insert(index, sibling);
            self.tiles.get_mut(&tile).unwrap().frame = halves[0];
            self.sync_tile_windows(tile);
        } else if !has_children {
            let first = TileHandle(self.mint());
            let second = TileHandle(self.mint());
            for (handle, half) in [(first, halves[0]), (second, halves[1])] {
                self.tiles.insert(handle, TileRecord {
                    screen,
                    parent: Some(tile),
                    children: Vec::new(),
                    frame: half,
                    layout: LayoutDirection::Floating,
                });
            }
            let record = self.tiles.get_mut(&tile).unwrap();
            record.children = vec![first, second];
            record.layout = LayoutDirection::from(orientation);
        }
    }

    fn remove_tile(&mut self, tile: TileHandle) {
        if !self.tiles.contains_key(&tile) {
            return;
        }
        let mut doomed = vec![tile];
        let mut index = 0;
        while index < doomed.len() {
            let current = doomed[index];
            index += 1;
            doomed.extend(self.tiles[&current].children.iter().copied());
        }
        if let Some(parent) = self.tiles[&tile].parent {
            self.tiles.get_mut(&parent).unwrap().children.retain(|&c| c != tile);
        } else {
            let screen = self.tiles[&tile].screen;
            if let Some(record) = self.screens.get_mut(&screen) {
                if record.root == Some(tile) {
                    record.root = None;
                }
            }
        }
        for handle in doomed {
            self.tiles.remove(&handle);
            for window in self.windows.values_mut() {
                if window.tile == Some(handle) {
                    window.tile = None;
                }
            }
        }
    }

    fn window_frame(&self, window: WindowHandle) -> Rect { self.windows[&window].frame }

    fn window_screen(&self, window: WindowHandle) -> ScreenHandle {
        self.windows[&window].screen
    }

    fn window_tile(&self, window: WindowHandle) -> Option<TileHandle> {
        self.windows.get(&window).and_then(|w| w.tile)
    }

    fn set_window_tile(&mut self, window: WindowHandle, tile: Option<TileHandle>) {
        let frame = tile.and_then(|t| self.tiles.get(&t)).map(|t| t.frame);
        let Some(record) = self.windows.get_mut(&window) else { return };
        record.tile = tile;
        if let Some(frame) = frame {
            record.frame = frame;
        }
    }

    fn window_minimized(&self, window: WindowHandle) -> bool {
        self.windows[&window].minimized
    }

    fn set_window_minimized(&mut self, window: WindowHandle, minimized: bool) {
        if let Some(record) = self.windows.get_mut(&window) {
            record.minimized = minimized;
        }
    }

    fn window_fullscreen(&self, window: WindowHandle) -> bool {
        self.windows[&window].fullscreen
    }

    fn set_window_fullscreen(&mut self, window: WindowHandle, fullscreen: bool) {
        if let Some(record) = self.windows.get_mut(&window) {
            record.fullscreen = fullscreen;
        }
    }

    fn set_window_maximized(&mut self, window: WindowHandle, maximized: bool) {
        let Some(record) = self.windows.get_mut(&window) else { return };
        record.maximized = maximized;
        if maximized {
            let frame = self.screens[&record.screen].frame;
            record.frame = frame;
        }
    }

    fn window_resource_class(&self, window: WindowHandle) -> String {
        self.windows[&window].class.clone()
    }

    fn windows_in_tile(&self, tile: TileHandle) -> Vec<WindowHandle> {
        self.windows
            .iter()
            .filter(|(_, w)| w.tile == Some(tile))
            .map(|(&id, _)| id)
            .collect()
    }
}

fn distance_squared(a: Point, b: Point) -> f64 { (a.x - b.x).powi(2) + (a.y - b.y).powi(2) }

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn screen_host() -> (FakeHost, ScreenHandle) {
        let mut host = FakeHost::new();
        let screen = host.add_screen(Rect::new(0.0, 0.0, 1000.0, 600.0));
        (host, screen)
    }

    #[test]
    fn splitting_a_childless_root_gives_two_children() {
        let (mut host, screen) = screen_host();
        let root = host.root_tile(screen).unwrap();
        host.split_tile(root, Orientation::Horizontal);
        let children = host.tile_children(root);
        assert_eq!(children.len(), 2);
        assert_eq!(host.tile_geometry(children[0]), Rect::new(0.0, 0.0, 500.0, 600.0));
        assert_eq!(host.tile_geometry(children[1]), Rect::new(500.0, 0.0, 500.0, 600.0));
        assert_eq!(host.tile_layout(root), LayoutDirection::Horizontal);
    }

    #[test]
    fn splitting_a_child_along_the_parent_axis_inserts_the_next_sibling() {
        let (mut host, screen) = screen_host();
        let root = host.root_tile(screen).unwrap();
        host.split_tile(root, Orientation::Horizontal);
        let first = host.tile_children(root)[0];
        host.split_tile(first, Orientation::Horizontal);
        let children = host.tile_children(root);
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], first);
        assert_eq!(host.tile_geometry(first).width, 250.0);
        assert_eq!(host.tile_geometry(children[1]).width, 250.0);
        assert_eq!(host.tile_geometry(children[2]).width, 500.0);
    }

    #[test]
    fn splitting_across_the_parent_axis_nests() {
        let (mut host, screen) = screen_host();
        let root = host.root_tile(screen).unwrap();
        host.split_tile(root, Orientation::Horizontal);
        let second = host.tile_children(root)[1];
        host.split_tile(second, Orientation::Vertical);
        assert_eq!(host.tile_children(root).len(), 2);
        let nested = host.tile_children(second);
        assert_eq!(nested.len(), 2);
        assert_eq!(host.tile_layout(second), LayoutDirection::Vertical);
        assert_eq!(host.tile_geometry(nested[1]), Rect::new(500.0, 300.0, 500.0, 300.0));
        assert_eq!(host.tile_parent(nested[0]), Some(second));
        assert_eq!(host.tile_parent(root), None);
    }

    #[test]
    fn removing_a_tile_drops_the_subtree_and_assignments() {
        let (mut host, screen) = screen_host();
        let root = host.root_tile(screen).unwrap();
        host.split_tile(root, Orientation::Horizontal);
        let second = host.tile_children(root)[1];
        host.split_tile(second, Orientation::Vertical);
        let nested = host.tile_children(second)[0];
        let window = host.open_window(screen);
        host.set_window_tile(window, Some(nested));

        host.remove_tile(second);

        assert_eq!(host.tile_children(root).len(), 1);
        assert_eq!(host.window_tile(window), None);
        assert!(host.tile_at(screen, Point::new(900.0, 300.0)).is_some());
    }

    #[test]
    fn hit_testing_descends_and_snaps_to_the_nearest_child() {
        let (mut host, screen) = screen_host();
        let root = host.root_tile(screen).unwrap();
        host.split_tile(root, Orientation::Horizontal);
        let children = host.tile_children(root);
        assert_eq!(host.tile_at(screen, Point::new(250.0, 300.0)), Some(children[0]));
        // boundary points belong to the right-hand tile
        assert_eq!(host.tile_at(screen, Point::new(500.0, 300.0)), Some(children[1]));
        assert_eq!(host.tile_at(screen, Point::new(1200.0, 300.0)), None);

        // shrink the right child so a gap opens, then probe inside the gap
        host.set_tile_geometry(children[1], Rect::new(600.0, 0.0, 400.0, 600.0));
        assert_eq!(host.tile_at(screen, Point::new(580.0, 300.0)), Some(children[1]));
    }

    #[test]
    fn resizing_moves_the_shared_edge() {
        let (mut host, screen) = screen_host();
        let root = host.root_tile(screen).unwrap();
        host.split_tile(root, Orientation::Horizontal);
        let children = host.tile_children(root);
        host.resize_tile(children[0], Direction::Right, 100.0);
        assert_eq!(host.tile_geometry(children[0]).width, 600.0);
        assert_eq!(host.tile_geometry(children[1]), Rect::new(600.0, 0.0, 400.0, 600.0));
    }
}
