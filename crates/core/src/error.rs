//! Error taxonomy for template parsing, floor generation, and view operations.
//! Blocked moves and unreachable corridors are not errors and never appear here.

use thiserror::Error;

use crate::types::Pos;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template '{template}' has an empty grid")]
    EmptyGrid { template: String },

    #[error("template '{template}' has no definition for the symbol {symbol:?}")]
    UnknownSymbol { template: String, symbol: char },

    #[error("template '{template}': {definition:?} isn't a valid terrain definition")]
    UnknownTerrain { template: String, definition: String },

    #[error("template '{template}': option '{option}' expects an integer, got {value:?}")]
    InvalidNumber { template: String, option: String, value: String },

    #[error("template '{template}': {line:?} isn't valid configuration for a template")]
    InvalidLine { template: String, line: String },

    #[error("template '{template}': {lower} must not exceed {upper} ({min} > {max})")]
    InvertedRange {
        template: String,
        lower: &'static str,
        upper: &'static str,
        min: u32,
        max: u32,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] TemplateError),

    #[error("floor size {height}x{width} is too small, both sides must be at least 3")]
    FloorTooSmall { height: usize, width: usize },

    #[error("too many terrain kinds to encode on one floor (limit is {limit})")]
    TooManyTerrains { limit: usize },

    #[error("no space to fit template '{template}'")]
    Placement { template: String },

    #[error(
        "template '{template}' should have at least {minimum} entrances, but there are only {found}"
    )]
    EntranceCount { template: String, found: usize, minimum: u32 },
}

impl GenerationError {
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GenerationError::Configuration(_)
                | GenerationError::FloorTooSmall { .. }
                | GenerationError::TooManyTerrains { .. }
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("the player has already been placed")]
    PlayerAlreadyPlaced,

    #[error("no player has been placed yet")]
    NoPlayer,

    #[error("the floor has no empty cell to place the player on")]
    NoEmptyCell,

    #[error("position {pos:?} is outside the floor")]
    OutOfBounds { pos: Pos },

    #[error("position {pos:?} is not an empty cell")]
    NotEmpty { pos: Pos },

    #[error("position {pos:?} is already occupied")]
    Occupied { pos: Pos },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid direction code {code}, expected 0 to 7")]
pub struct DirectionError {
    pub code: u8,
}
