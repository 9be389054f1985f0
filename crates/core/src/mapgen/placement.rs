//! Free-space search for template instances and stamping of their terrain codes.

use crate::error::{GenerationError, TemplateError};
use crate::rng::DungeonRng;
use crate::template::Template;
use crate::types::Pos;

use super::mapping::{TerrainMapping, WALL_CODE};

/// Cells already claimed by a room, seeded with the outer border so rooms
/// never touch the edge of the floor.
pub(super) struct Occupancy {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Occupancy {
    pub(super) fn with_border(width: usize, height: usize) -> Self {
        let mut cells = vec![false; width * height];
        for x in 0..width {
            cells[x] = true;
            cells[(height - 1) * width + x] = true;
        }
        for y in 0..height {
            cells[y * width] = true;
            cells[y * width + (width - 1)] = true;
        }
        Self { width, height, cells }
    }

    /// Every top-left offset where a `footprint_height` x `footprint_width`
    /// block overlaps no claimed cell, in row-major order.
    pub(super) fn free_offsets(&self, footprint_height: usize, footprint_width: usize) -> Vec<Pos> {
        if footprint_height > self.height || footprint_width > self.width {
            return Vec::new();
        }

        let stride = self.width + 1;
        let mut claimed = vec![0_u32; (self.height + 1) * stride];
        for y in 0..self.height {
            for x in 0..self.width {
                claimed[(y + 1) * stride + (x + 1)] = u32::from(self.cells[y * self.width + x])
                    + claimed[y * stride + (x + 1)]
                    + claimed[(y + 1) * stride + x]
                    - claimed[y * stride + x];
            }
        }

        let mut offsets = Vec::new();
        for y in 0..=(self.height - footprint_height) {
            for x in 0..=(self.width - footprint_width) {
                let bottom = y + footprint_height;
                let right = x + footprint_width;
                let inside = claimed[bottom * stride + right] + claimed[y * stride + x]
                    - claimed[y * stride + right]
                    - claimed[bottom * stride + x];
                if inside == 0 {
                    offsets.push(Pos { y: y as i32, x: x as i32 });
                }
            }
        }
        offsets
    }

    pub(super) fn claim(&mut self, offset: Pos, footprint_height: usize, footprint_width: usize) {
        let top = offset.y as usize;
        let left = offset.x as usize;
        for y in top..(top + footprint_height) {
            for x in left..(left + footprint_width) {
                self.cells[y * self.width + x] = true;
            }
        }
    }
}

/// A template with each glyph turned into the codes it may become.
pub(super) struct CompiledTemplate<'a> {
    pub(super) template: &'a Template,
    choices: Vec<Vec<u8>>,
    pub(super) fallback_code: u8,
}

impl<'a> CompiledTemplate<'a> {
    pub(super) fn compile(
        template: &'a Template,
        mapping: &mut TerrainMapping,
    ) -> Result<Self, GenerationError> {
        let mut choices = Vec::with_capacity(template.height() * template.width());
        for symbol in template.rows.iter().flatten() {
            let kind = template.symbols.get(symbol).ok_or_else(|| TemplateError::UnknownSymbol {
                template: template.name.clone(),
                symbol: *symbol,
            })?;
            let mut codes = Vec::new();
            for member in kind.members() {
                codes.push(mapping.insert(member)?);
            }
            choices.push(codes);
        }
        let fallback_code = match template.fallback_entrance.members().first() {
            Some(member) => mapping.insert(member)?,
            None => WALL_CODE,
        };
        Ok(Self { template, choices, fallback_code })
    }

    pub(super) fn height(&self) -> usize {
        self.template.height()
    }

    pub(super) fn width(&self) -> usize {
        self.template.width()
    }

    /// Resolves union cells, row-major, into one concrete code each.
    pub(super) fn instantiate(&self, rng: &mut DungeonRng) -> Vec<u8> {
        self.choices
            .iter()
            .map(|codes| match codes.as_slice() {
                [single] => *single,
                many => many[rng.index(many.len())],
            })
            .collect()
    }
}

pub(super) fn stamp(
    codes: &mut [u8],
    floor_width: usize,
    offset: Pos,
    instance: &[u8],
    instance_width: usize,
) {
    for (row_index, row) in instance.chunks(instance_width).enumerate() {
        let start = (offset.y as usize + row_index) * floor_width + offset.x as usize;
        codes[start..start + instance_width].copy_from_slice(row);
    }
}
