//! The live windowing system contract. Everything the driver knows about
//! screens, tiles, and windows goes through this trait, so reconciliation
//! logic stays testable against an in-memory implementation.

#[cfg(test)]
pub(crate) mod fake;

use std::fmt;
use std::hash::Hash;

use crate::geometry::{Direction, LayoutDirection, Orientation, Point, Rect};

/// The host owns the visible tile tree and the actual windows; we only hold
/// ids into it. Implementations are expected to be cheap to query, and all
/// mutation here is fire-and-forget: failures surface later as structural
/// signals, not return values.
pub trait Host {
    type ScreenId: Copy + Eq + Hash + fmt::Debug;
    type TileId: Copy + Eq + Hash + fmt::Debug;
    type WindowId: Copy + Eq + Hash + fmt::Debug;

    fn screens(&self) -> Vec<Self::ScreenId>;

    /// The root of a screen's tile tree. `None` while the screen has no
    /// tiling surface (e.g. during teardown).
    fn root_tile(&self, screen: Self::ScreenId) -> Option<Self::TileId>;

    fn active_window(&self) -> Option<Self::WindowId>;

    fn activate_window(&mut self, window: Self::WindowId);

    /// Best tile for a position, in screen-absolute coordinates. Points in
    /// the padding between tiles resolve to the nearest tile; points outside
    /// the screen resolve to `None`.
    fn tile_at(&self, screen: Self::ScreenId, point: Point) -> Option<Self::TileId>;

    fn tile_children(&self, tile: Self::TileId) -> Vec<Self::TileId>;

    fn tile_parent(&self, tile: Self::TileId) -> Option<Self::TileId>;

    /// Absolute geometry of the tile's content area.
    fn tile_geometry(&self, tile: Self::TileId) -> Rect;

    fn set_tile_geometry(&mut self, tile: Self::TileId, rect: Rect);

    /// Grows or shrinks the tile by moving one edge. The neighbor on that
    /// edge absorbs the difference.
    fn resize_tile(&mut self, tile: Self::TileId, edge: Direction, delta: f64);

    /// Gap between this tile's content and its neighbors.
    fn tile_padding(&self, tile: Self::TileId) -> f64;

    fn tile_layout(&self, tile: Self::TileId) -> LayoutDirection;

    fn set_tile_layout(&mut self, tile: Self::TileId, layout: LayoutDirection);

    /// Splits the tile along `orientation`, with the host's idiosyncratic
    /// sibling convention: when the tile sits under a parent whose layout
    /// runs along `orientation` (or the tile already has children of its
    /// own), a new sibling is inserted directly after it and the tile's
    /// extent halves. Otherwise the tile gains two children splitting its
    /// area. Producing child `i` of a tile therefore means splitting child
    /// `i - 1`, not the parent.
    fn split_tile(&mut self, tile: Self::TileId, orientation: Orientation);

    /// Destroys the tile and its whole subtree. Windows assigned to any
    /// destroyed tile lose their assignment but stay alive.
    fn remove_tile(&mut self, tile: Self::TileId);

    fn window_frame(&self, window: Self::WindowId) -> Rect;

    fn window_screen(&self, window: Self::WindowId) -> Self::ScreenId;

    fn window_tile(&self, window: Self::WindowId) -> Option<Self::TileId>;

    /// Assigns the window to a tile, or floats it with `None`.
    fn set_window_tile(&mut self, window: Self::WindowId, tile: Option<Self::TileId>);

    fn window_minimized(&self, window: Self::WindowId) -> bool;

    fn set_window_minimized(&mut self, window: Self::WindowId, minimized: bool);

    fn window_fullscreen(&self, window: Self::WindowId) -> bool;

    fn set_window_fullscreen(&mut self, window: Self::WindowId, fullscreen: bool);

    fn set_window_maximized(&mut self, window: Self::WindowId, maximized: bool);

    /// Identifying string for diagnostics only; never used for matching.
    fn window_resource_class(&self, window: Self::WindowId) -> String;

    /// Windows assigned to the tile, in the order the host reports them.
    fn windows_in_tile(&self, tile: Self::TileId) -> Vec<Self::WindowId>;
}
