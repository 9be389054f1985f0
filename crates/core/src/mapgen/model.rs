//! Public data models for generated floors and the rooms and corridors they are made of.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::TemplateError;
use crate::terrain::TerrainKind;
use crate::types::Pos;

use super::mapping::{EMPTY_CODE, TerrainMapping, UNKNOWN_CODE, WALL_CODE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorConfig {
    pub height: usize,
    pub width: usize,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self { height: 30, width: 60 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedRoom {
    pub template: String,
    pub offset: Pos,
    pub height: usize,
    pub width: usize,
}

impl PlacedRoom {
    pub fn bottom(&self) -> i32 {
        self.offset.y + self.height as i32 - 1
    }

    pub fn right(&self) -> i32 {
        self.offset.x + self.width as i32 - 1
    }

    pub fn center(&self) -> Pos {
        Pos {
            y: self.offset.y + (self.height / 2) as i32,
            x: self.offset.x + (self.width / 2) as i32,
        }
    }

    pub fn overlaps(&self, other: &PlacedRoom) -> bool {
        self.offset.x <= other.right()
            && self.right() >= other.offset.x
            && self.offset.y <= other.bottom()
            && self.bottom() >= other.offset.y
    }
}

/// One carved spanning-tree edge. `path` runs from `from` to `to` inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub from: Pos,
    pub to: Pos,
    pub path: Vec<Pos>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub height: usize,
    pub width: usize,
    pub codes: Vec<u8>,
    pub mapping: TerrainMapping,
    pub rooms: Vec<PlacedRoom>,
    pub entrances: Vec<Pos>,
    pub corridors: Vec<Corridor>,
    /// Spanning-tree edges no path was found for.
    pub unreachable: Vec<(Pos, Pos)>,
}

impl Floor {
    /// Builds a floor straight from a picture using the standard glyphs
    /// (`#`, `.`, `+`, ` `). Short rows are padded with ` `.
    pub fn from_rows(rows: &[&str]) -> Result<Self, TemplateError> {
        let mapping = TerrainMapping::new();
        let height = rows.len();
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(TemplateError::EmptyGrid { template: "floor".into() });
        }

        let mut codes = vec![UNKNOWN_CODE; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                let kind = match symbol {
                    '#' => TerrainKind::wall(),
                    '.' => TerrainKind::empty(),
                    '+' => TerrainKind::entrance(),
                    ' ' => TerrainKind::unknown(),
                    _ => {
                        return Err(TemplateError::UnknownSymbol {
                            template: "floor".into(),
                            symbol,
                        });
                    }
                };
                codes[y * width + x] = mapping.code_of(&kind).unwrap_or(UNKNOWN_CODE);
            }
        }

        Ok(Self {
            height,
            width,
            codes,
            mapping,
            rooms: Vec::new(),
            entrances: Vec::new(),
            corridors: Vec::new(),
            unreachable: Vec::new(),
        })
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }

    pub fn code_at(&self, pos: Pos) -> Option<u8> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.codes[self.index(pos)])
    }

    pub fn glyph_at(&self, pos: Pos) -> char {
        self.code_at(pos).map_or(' ', |code| self.mapping.glyph(code))
    }

    pub fn is_empty_cell(&self, pos: Pos) -> bool {
        self.code_at(pos) == Some(EMPTY_CODE)
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.code_at(pos) == Some(WALL_CODE)
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 }))
    }

    pub fn cells_with_code(&self, code: u8) -> Vec<Pos> {
        self.positions().filter(|pos| self.codes[self.index(*pos)] == code).collect()
    }

    /// Euclidean distance to the closest wall cell, `None` on a floor without walls.
    pub fn distance_to_nearest_wall(&self, pos: Pos) -> Option<f64> {
        self.positions()
            .filter(|candidate| self.is_wall(*candidate))
            .map(|wall| pos.distance_squared(wall))
            .min()
            .map(|squared| (squared as f64).sqrt())
    }

    /// The whole floor as text, one row per line.
    pub fn to_text(&self) -> String {
        self.codes
            .chunks(self.width)
            .map(|row| row.iter().map(|code| self.mapping.glyph(*code)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(&self.codes);

        bytes.extend((self.mapping.len() as u32).to_le_bytes());
        for code in 0..self.mapping.len() {
            let glyph = self.mapping.glyph(code as u8);
            bytes.extend((glyph as u32).to_le_bytes());
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend(room.offset.y.to_le_bytes());
            bytes.extend(room.offset.x.to_le_bytes());
        }

        bytes.extend((self.entrances.len() as u32).to_le_bytes());
        for entrance in &self.entrances {
            bytes.extend(entrance.y.to_le_bytes());
            bytes.extend(entrance.x.to_le_bytes());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
