//! Room templates: a glyph grid, the terrain each glyph stands for, and placement limits.
//!
//! The text form is the grid, a blank line, then one option per line:
//!
//! ```text
//! #####
//! #...+
//! #####
//!
//! min_on_floor 1
//! max_on_floor 3
//! ~ wall | 1.mine.huge_rock
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::terrain::{TerrainCatalog, TerrainKind};

const MIN_ON_FLOOR: &str = "min_on_floor";
const MAX_ON_FLOOR: &str = "max_on_floor";
const MIN_ENTRANCES: &str = "min_entrances";
const MAX_ENTRANCES: &str = "max_entrances";
const NO_ENTRANCE: &str = "no_entrance";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub rows: Vec<Vec<char>>,
    pub symbols: BTreeMap<char, TerrainKind>,
    pub min_instances: u32,
    pub max_instances: u32,
    pub min_entrances: u32,
    pub max_entrances: u32,
    /// Terrain an excess entrance is recolored to.
    pub fallback_entrance: TerrainKind,
}

pub fn standard_symbols() -> BTreeMap<char, TerrainKind> {
    BTreeMap::from([
        ('#', TerrainKind::wall()),
        ('.', TerrainKind::empty()),
        ('+', TerrainKind::entrance()),
        (' ', TerrainKind::unknown()),
    ])
}

impl Template {
    pub fn parse(
        name: impl Into<String>,
        text: &str,
        terrains: &TerrainCatalog,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        let text = text.replace("\r\n", "\n");
        let (grid, options) = match text.split_once("\n\n") {
            Some((grid, options)) => (grid, options),
            None => (text.as_str(), ""),
        };

        let mut rows: Vec<Vec<char>> =
            grid.trim_end_matches('\n').lines().map(|row| row.chars().collect()).collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(TemplateError::EmptyGrid { template: name });
        }
        for row in &mut rows {
            row.resize(width, ' ');
        }

        let mut symbols = standard_symbols();
        let mut min_instances = 1;
        let mut max_instances = None;
        let mut min_entrances = 1;
        let mut max_entrances = 1;
        let mut fallback_entrance = TerrainKind::wall();

        for line in options.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((head, rest)) = line.split_once(' ') else {
                return Err(TemplateError::InvalidLine { template: name, line: line.to_string() });
            };
            match head {
                MIN_ON_FLOOR => min_instances = parse_number(&name, head, rest)?,
                MAX_ON_FLOOR => max_instances = Some(parse_number(&name, head, rest)?),
                MIN_ENTRANCES => min_entrances = parse_number(&name, head, rest)?,
                MAX_ENTRANCES => max_entrances = parse_number(&name, head, rest)?,
                NO_ENTRANCE => fallback_entrance = parse_terrain(&name, rest, terrains)?,
                _ => {
                    let mut glyphs = head.chars();
                    match (glyphs.next(), glyphs.next()) {
                        (Some(symbol), None) => {
                            symbols.insert(symbol, parse_terrain(&name, rest, terrains)?);
                        }
                        _ => {
                            return Err(TemplateError::InvalidLine {
                                template: name,
                                line: line.to_string(),
                            });
                        }
                    }
                }
            }
        }

        let template = Self {
            rows,
            symbols,
            min_instances,
            max_instances: max_instances.unwrap_or(min_instances),
            min_entrances,
            max_entrances,
            fallback_entrance,
            name,
        };
        template.validate()?;
        Ok(template)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Checks the grid against the symbol table and the numeric ranges.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.width() == 0 {
            return Err(TemplateError::EmptyGrid { template: self.name.clone() });
        }
        let (min_instances, max_instances) = (self.min_instances, self.max_instances);
        check_range(&self.name, MIN_ON_FLOOR, MAX_ON_FLOOR, min_instances, max_instances)?;
        check_range(
            &self.name,
            MIN_ENTRANCES,
            MAX_ENTRANCES,
            self.min_entrances,
            self.max_entrances,
        )?;
        for row in &self.rows {
            for symbol in row {
                if !self.symbols.contains_key(symbol) {
                    return Err(TemplateError::UnknownSymbol {
                        template: self.name.clone(),
                        symbol: *symbol,
                    });
                }
            }
        }
        Ok(())
    }
}

fn parse_number(template: &str, option: &str, value: &str) -> Result<u32, TemplateError> {
    value.trim().parse().map_err(|_| TemplateError::InvalidNumber {
        template: template.to_string(),
        option: option.to_string(),
        value: value.trim().to_string(),
    })
}

fn parse_terrain(
    template: &str,
    definition: &str,
    terrains: &TerrainCatalog,
) -> Result<TerrainKind, TemplateError> {
    terrains.parse_definition(definition).ok_or_else(|| TemplateError::UnknownTerrain {
        template: template.to_string(),
        definition: definition.trim().to_string(),
    })
}

fn check_range(
    template: &str,
    lower: &'static str,
    upper: &'static str,
    min: u32,
    max: u32,
) -> Result<(), TemplateError> {
    if min > max {
        return Err(TemplateError::InvertedRange {
            template: template.to_string(),
            lower,
            upper,
            min,
            max,
        });
    }
    Ok(())
}
