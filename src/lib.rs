pub mod common;
pub mod controller;
pub mod driver;
pub mod engine;
pub mod geometry;
pub mod host;
pub mod model;
pub mod resolve;

pub use controller::{Command, Controller, Event};
pub use driver::TilingDriver;
pub use engine::{
    EngineCapabilities, EngineConfig, EngineError, EngineKind, EngineType, InsertionPoint,
    LayoutEngine,
};
pub use geometry::{Direction, LayoutDirection, Orientation, Point, Rect, Size};
pub use host::Host;
