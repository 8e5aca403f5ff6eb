pub mod camera;
mod component;
pub mod painters;
mod palette;
mod pick;
mod render;
pub mod shaper;
mod state;
pub mod surface;
mod types;

pub use component::{ForceGraphCanvas, ForceGraphHandle};
pub use types::{GraphData, GraphLink, GraphNode, LinkEndpoint, LinkObject, NodeId, NodeObject, RawGraphData, RawLink};
