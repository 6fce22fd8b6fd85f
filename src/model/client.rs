use crate::geometry::Point;

slotmap::new_key_type! {
    /// Engine-facing identity of a tracked window. Engines only ever see
    /// these; live window handles stay on the driver side of the fence.
    pub struct ClientId;
}

/// Tracking record for one live window while it participates in tiling.
#[derive(Debug, Clone)]
pub struct Client<W> {
    pub window: W,
    /// Center of the tile this client last occupied, in live coordinates.
    /// Written on every rebuild so collaborators can reason about where a
    /// window was even after the live tile is gone.
    pub last_tiled_location: Option<Point>,
}

impl<W> Client<W> {
    pub fn new(window: W) -> Self {
        Client {
            window,
            last_tiled_location: None,
        }
    }
}
