//! Procedural floor generation from room templates, split into coherent submodules.

pub mod mapping;
pub mod model;
pub mod pathfinding;
pub mod spanning;

mod entrances;
mod generator;
mod placement;

pub use generator::FloorGenerator;
pub use mapping::{EMPTY_CODE, ENTRANCE_CODE, TerrainMapping, UNKNOWN_CODE, WALL_CODE};
pub use model::{Corridor, Floor, FloorConfig, PlacedRoom};
pub use pathfinding::{path_cost, shortest_path};
pub use spanning::minimum_spanning_tree;

use crate::error::GenerationError;
use crate::rng::DungeonRng;
use crate::template::Template;

pub fn generate_floor(
    seed: u64,
    config: FloorConfig,
    templates: &[Template],
) -> Result<Floor, GenerationError> {
    FloorGenerator::new(config, templates).generate(&mut DungeonRng::new(seed))
}
