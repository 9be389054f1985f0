use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::types::{PLAYER_GLYPH, Pos};

new_key_type! {
    pub struct OccupantId;
}

/// Anything standing on a cell: the player or another creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub pos: Pos,
    pub glyph: char,
}

impl Occupant {
    pub fn player(pos: Pos) -> Self {
        Self { pos, glyph: PLAYER_GLYPH }
    }
}

/// A transient effect drawn over terrain but under occupants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Pos,
    pub glyph: char,
}
