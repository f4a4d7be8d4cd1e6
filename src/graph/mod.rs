mod vertex_pool;
mod wall_graph;

pub use vertex_pool::{VertexIndex, VertexPool};
pub use wall_graph::WallGraph;
