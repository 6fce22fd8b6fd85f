//! The engine side of the tiling contract. Engines own the abstract tile
//! tree and decide placement policy; the driver owns everything live. The
//! two only meet through [`LayoutEngine`].

pub mod monocle;
pub mod split;

use bitflags::bitflags;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::geometry::Direction;
use crate::model::client::ClientId;
use crate::model::tree::{LayoutTree, NodeId};

pub use monocle::MonocleEngine;
pub use split::SplitEngine;

bitflags! {
    /// What the driver may assume about the active engine.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EngineCapabilities: u8 {
        /// Directional hints are translated a quarter turn clockwise before
        /// the engine sees them, when the rotation toggle is on.
        const TRANSLATE_ROTATION = 1 << 0;
        /// The driver may graft and prune abstract tiles to mirror edits the
        /// user makes directly on the live tree.
        const TILES_MUTABLE = 1 << 1;
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("client {0:?} is not managed by this engine")]
    UnknownClient(ClientId),
    #[error("tile {0:?} is not part of this engine's tree")]
    UnknownTile(NodeId),
}

/// Config-facing engine selector.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EngineType {
    #[default]
    Split,
    Monocle,
}

/// Where an engine's default placement puts a new client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionPoint {
    Left,
    #[default]
    Right,
    /// Place next to the currently active window. The driver resolves the
    /// active tile and turns this into a targeted placement.
    Active,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub insertion_point: InsertionPoint,
    pub rotate_layout: bool,
}

#[enum_dispatch]
pub trait LayoutEngine {
    /// Adopts a client using the engine's default placement.
    fn add_client(&mut self, client: ClientId) -> Result<(), EngineError>;

    /// Forgets a client and releases its spot in the tree.
    fn remove_client(&mut self, client: ClientId) -> Result<(), EngineError>;

    /// Places a client relative to an existing abstract tile. A direction
    /// hint picks the side; without one the engine chooses.
    fn put_client_in_tile(
        &mut self,
        client: ClientId,
        tile: NodeId,
        direction: Option<Direction>,
    ) -> Result<(), EngineError>;

    /// Recomputes the abstract tree from the engine's internal state.
    fn build_layout(&mut self) -> Result<(), EngineError>;

    /// Absorbs sizes (and, for mutable engines, structure) pushed into the
    /// tree from the live side.
    fn regenerate_layout(&mut self) -> Result<(), EngineError>;

    fn capabilities(&self) -> EngineCapabilities;

    fn config(&self) -> &EngineConfig;

    fn tree(&self) -> &LayoutTree;

    fn tree_mut(&mut self) -> &mut LayoutTree;

    /// Clients the engine currently leaves unplaced. The driver reports their
    /// windows as untracked after each rebuild.
    fn untracked_clients(&self) -> Vec<ClientId>;
}

#[enum_dispatch(LayoutEngine)]
pub enum EngineKind {
    Split(SplitEngine),
    Monocle(MonocleEngine),
}

impl EngineKind {
    pub fn new(engine_type: EngineType, config: EngineConfig) -> EngineKind {
        match engine_type {
            EngineType::Split => SplitEngine::new(config).into(),
            EngineType::Monocle => MonocleEngine::new(config).into(),
        }
    }

    pub fn engine_type(&self) -> EngineType {
        match self {
            EngineKind::Split(_) => EngineType::Split,
            EngineKind::Monocle(_) => EngineType::Monocle,
        }
    }
}
