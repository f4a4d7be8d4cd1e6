/// Which detection strategies the room detector may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Grid flood-fill first, planar face walk when it finds nothing.
    #[default]
    Auto,
    OrthogonalOnly,
    GeneralOnly,
}

/// The strategy that actually produced a room list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    Orthogonal,
    General,
}

/// Parameters controlling room detection. All lengths are in centimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    /// Endpoints closer than this share a graph vertex.
    pub graph_merge_epsilon: f64,
    /// Axis-classification and gap-closing tolerance of the grid fallback.
    pub grid_merge_epsilon: f64,
    /// Walls shorter than this contribute no edge.
    pub min_wall_length: f64,
    /// Polygons with a smaller area are discarded as degenerate.
    pub min_room_area: f64,
    /// Cell size of the grid fallback raster.
    pub grid_step: f64,
    /// The grid fallback declines layouts needing more cells than this.
    pub max_grid_cells: usize,
    /// Split walls at T-junctions and crossings before the face walk.
    pub split_junctions: bool,
    pub strategy: Strategy,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            graph_merge_epsilon: 0.5,
            grid_merge_epsilon: 1.0,
            min_wall_length: 1.0,
            min_room_area: 1e-2,
            grid_step: 1.0,
            max_grid_cells: 4_000_000,
            split_junctions: true,
            strategy: Strategy::Auto,
        }
    }
}

impl DetectionConfig {
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_grid_step(mut self, grid_step: f64) -> Self {
        self.grid_step = grid_step;
        self
    }

    #[must_use]
    pub fn with_max_grid_cells(mut self, max_grid_cells: usize) -> Self {
        self.max_grid_cells = max_grid_cells;
        self
    }

    #[must_use]
    pub fn with_split_junctions(mut self, split_junctions: bool) -> Self {
        self.split_junctions = split_junctions;
        self
    }

    #[must_use]
    pub fn with_merge_epsilons(mut self, graph: f64, grid: f64) -> Self {
        self.graph_merge_epsilon = graph;
        self.grid_merge_epsilon = grid;
        self
    }
}
