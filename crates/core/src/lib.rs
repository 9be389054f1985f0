pub mod error;
pub mod mapgen;
pub mod rng;
pub mod template;
pub mod terrain;
pub mod types;
pub mod view;

pub use error::{DirectionError, GenerationError, TemplateError, ViewError};
pub use mapgen::{Floor, FloorConfig, FloorGenerator, generate_floor};
pub use rng::DungeonRng;
pub use template::Template;
pub use terrain::{TerrainCatalog, TerrainKind};
pub use types::*;
pub use view::{DISPLAY_RADIUS, FOV_RADIUS, View};
