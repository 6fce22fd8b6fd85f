pub mod client;
pub mod tree;

pub use client::{Client, ClientId};
pub use tree::{LayoutTree, NodeId};
