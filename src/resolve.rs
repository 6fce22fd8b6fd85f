//! Directional probes. Focus, insert, and resize commands all start the same
//! way: take the window's frame, step just past its edge on the requested
//! side, and ask the host which tile lives there.

use crate::geometry::{Direction, Point, Rect};
use crate::host::Host;

/// Distance past the window edge a probe lands at, before tile padding is
/// added on top.
pub const PROBE_MARGIN: f64 = 1.0;

/// A point `PROBE_MARGIN + padding` outside the frame on the given side,
/// centered along the other axis.
pub fn probe_point(frame: Rect, direction: Direction, padding: f64) -> Point {
    let offset = PROBE_MARGIN + padding;
    match direction {
        Direction::Left => Point::new(frame.x - offset, frame.mid_y()),
        Direction::Right => Point::new(frame.max_x() + offset, frame.mid_y()),
        Direction::Up => Point::new(frame.mid_x(), frame.y - offset),
        Direction::Down => Point::new(frame.mid_x(), frame.max_y() + offset),
    }
}

/// Probes from a window toward `direction` and resolves the live tile under
/// the probe point. `None` when the window is not tiled (padding is
/// tile-scoped) or nothing lies on that side.
pub fn neighbor_probe<H: Host>(
    host: &H,
    window: H::WindowId,
    direction: Direction,
) -> Option<(Point, H::TileId)> {
    let tile = host.window_tile(window)?;
    let padding = host.tile_padding(tile);
    let point = probe_point(host.window_frame(window), direction, padding);
    let neighbor = host.tile_at(host.window_screen(window), point)?;
    Some((point, neighbor))
}

/// Which side of `rect` the point leans toward: the dominant normalized
/// offset from the center picks the axis, its sign the direction.
pub fn insert_direction(rect: Rect, point: Point) -> Direction {
    let center = rect.center();
    let dx = if rect.width > 0.0 { (point.x - center.x) / rect.width } else { 0.0 };
    let dy = if rect.height > 0.0 { (point.y - center.y) / rect.height } else { 0.0 };
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 { Direction::Right } else { Direction::Left }
    } else if dy >= 0.0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// Follows single-child live tiles down to the first leaf or branching
/// point.
pub fn descend_live_chain<H: Host>(host: &H, mut tile: H::TileId) -> H::TileId {
    loop {
        let children = host.tile_children(tile);
        if children.len() != 1 {
            return tile;
        }
        tile = children[0];
    }
}
