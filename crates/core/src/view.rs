//! Player-facing view of a generated floor: placement, movement, field of
//! view, remembered glyphs and the rendered map text.

mod occupant;
mod visibility;

use std::collections::BTreeMap;

use slotmap::SlotMap;

pub use occupant::{Cloud, Occupant, OccupantId};
pub use visibility::compute_fov;

use crate::error::ViewError;
use crate::mapgen::{EMPTY_CODE, Floor, WALL_CODE};
use crate::rng::DungeonRng;
use crate::types::{BLANK_GLYPH, Direction, Pos};

/// Cells farther than this from the player are never shown.
pub const DISPLAY_RADIUS: i32 = 14;
/// Cells farther than this from the player are never currently visible.
pub const FOV_RADIUS: i32 = 7;

/// Spawn spots at least this far from any wall are preferred.
const PREFERRED_WALL_DISTANCE: f64 = 2.0;

pub struct View {
    floor: Floor,
    player: Option<Occupant>,
    occupants: SlotMap<OccupantId, Occupant>,
    clouds: BTreeMap<Pos, Cloud>,
    display_mask: Vec<bool>,
    visible: Vec<bool>,
    memory: Vec<char>,
    rendered: String,
    display_origin: Pos,
}

impl View {
    pub fn new(floor: Floor) -> Self {
        let cells = floor.width * floor.height;
        Self {
            floor,
            player: None,
            occupants: SlotMap::with_key(),
            clouds: BTreeMap::new(),
            display_mask: vec![false; cells],
            visible: vec![false; cells],
            memory: vec![BLANK_GLYPH; cells],
            rendered: String::new(),
            display_origin: Pos::default(),
        }
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn player(&self) -> Option<Pos> {
        self.player.map(|player| player.pos)
    }

    /// Text produced by the last [`View::refresh`].
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Floor position of the first character of the rendered text.
    pub fn display_origin(&self) -> Pos {
        self.display_origin
    }

    /// Places the player on a random empty cell, preferring cells at least two
    /// cells away from every wall.
    pub fn place_player_randomly(&mut self, rng: &mut DungeonRng) -> Result<Pos, ViewError> {
        if self.player.is_some() {
            return Err(ViewError::PlayerAlreadyPlaced);
        }
        let empty = self.floor.cells_with_code(EMPTY_CODE);
        if empty.is_empty() {
            return Err(ViewError::NoEmptyCell);
        }

        let preferred: Vec<Pos> = empty
            .iter()
            .copied()
            .filter(|pos| {
                self.floor
                    .distance_to_nearest_wall(*pos)
                    .is_none_or(|distance| distance >= PREFERRED_WALL_DISTANCE)
            })
            .collect();
        let fallback = preferred.is_empty();
        let pool = if fallback { &empty } else { &preferred };
        let pos = *rng.choose(pool).ok_or(ViewError::NoEmptyCell)?;

        tracing::info!(y = pos.y, x = pos.x, fallback, candidates = pool.len(), "placed player");
        self.player = Some(Occupant::player(pos));
        Ok(pos)
    }

    pub fn place_player(&mut self, pos: Pos) -> Result<(), ViewError> {
        if self.player.is_some() {
            return Err(ViewError::PlayerAlreadyPlaced);
        }
        if !self.floor.in_bounds(pos) {
            return Err(ViewError::OutOfBounds { pos });
        }
        if !self.floor.is_empty_cell(pos) {
            return Err(ViewError::NotEmpty { pos });
        }
        self.player = Some(Occupant::player(pos));
        Ok(())
    }

    /// Moves the player one step. Returns `false` and changes nothing when the
    /// target is off the floor or not an empty cell.
    pub fn move_player(&mut self, direction: Direction) -> Result<bool, ViewError> {
        let player = self.player.as_mut().ok_or(ViewError::NoPlayer)?;
        let target = direction.step(player.pos);
        if !self.floor.is_empty_cell(target) {
            tracing::debug!(?direction, y = target.y, x = target.x, "move blocked");
            return Ok(false);
        }
        player.pos = target;
        Ok(true)
    }

    pub fn add_occupant(&mut self, pos: Pos, glyph: char) -> Result<OccupantId, ViewError> {
        if !self.floor.in_bounds(pos) {
            return Err(ViewError::OutOfBounds { pos });
        }
        if self.occupant_at(pos).is_some() {
            return Err(ViewError::Occupied { pos });
        }
        Ok(self.occupants.insert(Occupant { pos, glyph }))
    }

    pub fn remove_occupant(&mut self, id: OccupantId) -> Option<Occupant> {
        self.occupants.remove(id)
    }

    pub fn occupant_at(&self, pos: Pos) -> Option<&Occupant> {
        self.occupants.values().find(|occupant| occupant.pos == pos)
    }

    /// Covers `pos` with a cloud, returning the cloud it replaced.
    pub fn add_cloud(&mut self, pos: Pos, glyph: char) -> Result<Option<Cloud>, ViewError> {
        if !self.floor.in_bounds(pos) {
            return Err(ViewError::OutOfBounds { pos });
        }
        Ok(self.clouds.insert(pos, Cloud { pos, glyph }))
    }

    pub fn remove_cloud(&mut self, pos: Pos) -> Option<Cloud> {
        self.clouds.remove(&pos)
    }

    pub fn memory_at(&self, pos: Pos) -> Option<char> {
        self.floor.in_bounds(pos).then(|| self.memory[self.floor.index(pos)])
    }

    pub fn is_visible(&self, pos: Pos) -> bool {
        self.floor.in_bounds(pos) && self.visible[self.floor.index(pos)]
    }

    pub fn is_displayed(&self, pos: Pos) -> bool {
        self.floor.in_bounds(pos) && self.display_mask[self.floor.index(pos)]
    }

    /// Recomputes sight around the player, updates memory for every visible
    /// displayed cell and renders the display rectangle.
    pub fn refresh(&mut self, all_seeing: bool) -> Result<&str, ViewError> {
        let origin = self.player().ok_or(ViewError::NoPlayer)?;
        let (width, height) = (self.floor.width, self.floor.height);
        let display_squared = i64::from(DISPLAY_RADIUS * DISPLAY_RADIUS);

        self.visible = if all_seeing {
            vec![true; width * height]
        } else {
            compute_fov(&self.floor.codes, width, height, origin, FOV_RADIUS, |code| {
                code == WALL_CODE
            })
        };

        for y in 0..height {
            for x in 0..width {
                let pos = Pos::new(y as i32, x as i32);
                let index = y * width + x;
                let displayed = pos.distance_squared(origin) <= display_squared;
                self.display_mask[index] = displayed;
                if displayed && self.visible[index] {
                    let glyph = self.glyph_for(pos);
                    self.memory[index] = glyph;
                }
            }
        }

        self.render(origin);
        Ok(&self.rendered)
    }

    fn glyph_for(&self, pos: Pos) -> char {
        if let Some(player) = self.player.filter(|player| player.pos == pos) {
            return player.glyph;
        }
        if let Some(occupant) = self.occupant_at(pos) {
            return occupant.glyph;
        }
        if let Some(cloud) = self.clouds.get(&pos) {
            return cloud.glyph;
        }
        self.floor.glyph_at(pos)
    }

    fn render(&mut self, origin: Pos) {
        let max_y = self.floor.height as i32 - 1;
        let max_x = self.floor.width as i32 - 1;
        let top = (origin.y - DISPLAY_RADIUS).max(0);
        let bottom = (origin.y + DISPLAY_RADIUS).min(max_y);
        let left = (origin.x - DISPLAY_RADIUS).max(0);
        let right = (origin.x + DISPLAY_RADIUS).min(max_x);

        let mut rows: Vec<String> = (top..=bottom)
            .map(|y| {
                (left..=right)
                    .map(|x| {
                        let index = self.floor.index(Pos::new(y, x));
                        if self.display_mask[index] { self.memory[index] } else { BLANK_GLYPH }
                    })
                    .collect()
            })
            .collect();
        while rows.last().is_some_and(|row| row.chars().all(|glyph| glyph == BLANK_GLYPH)) {
            rows.pop();
        }

        self.display_origin = Pos::new(top, left);
        self.rendered = rows.join("\n");
    }
}
