pub mod common;
pub mod community;
pub mod louvain;

pub use common::{GraphView, NodeId};
pub use community::{weakly_connected_components, WccResult};
pub use louvain::{louvain, modularity, LouvainConfig, LouvainResult};
