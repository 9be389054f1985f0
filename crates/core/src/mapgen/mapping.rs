//! Floor-wide terrain codes shared by every template stamped onto one floor.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::template::Template;
use crate::terrain::TerrainKind;

pub const WALL_CODE: u8 = 0;
pub const EMPTY_CODE: u8 = 1;
pub const ENTRANCE_CODE: u8 = 2;
pub const UNKNOWN_CODE: u8 = 3;

const CODE_LIMIT: usize = u8::MAX as usize + 1;

/// Code `n` stands for `kinds[n]`. Only concrete kinds get a code, union
/// members are registered individually.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainMapping {
    kinds: Vec<TerrainKind>,
}

impl Default for TerrainMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainMapping {
    pub fn new() -> Self {
        Self {
            kinds: vec![
                TerrainKind::wall(),
                TerrainKind::empty(),
                TerrainKind::entrance(),
                TerrainKind::unknown(),
            ],
        }
    }

    pub fn build(templates: &[Template]) -> Result<Self, GenerationError> {
        let mut mapping = Self::new();
        for template in templates {
            for kind in template.symbols.values().chain([&template.fallback_entrance]) {
                for member in kind.members() {
                    mapping.insert(member)?;
                }
            }
        }
        tracing::debug!(codes = mapping.len(), "built terrain mapping");
        Ok(mapping)
    }

    pub fn insert(&mut self, kind: &TerrainKind) -> Result<u8, GenerationError> {
        debug_assert!(!kind.is_union());
        if let Some(code) = self.code_of(kind) {
            return Ok(code);
        }
        if self.kinds.len() >= CODE_LIMIT {
            return Err(GenerationError::TooManyTerrains { limit: CODE_LIMIT });
        }
        self.kinds.push(kind.clone());
        Ok((self.kinds.len() - 1) as u8)
    }

    pub fn code_of(&self, kind: &TerrainKind) -> Option<u8> {
        self.kinds.iter().position(|known| known == kind).map(|index| index as u8)
    }

    pub fn kind(&self, code: u8) -> Option<&TerrainKind> {
        self.kinds.get(usize::from(code))
    }

    pub fn glyph(&self, code: u8) -> char {
        self.kind(code).and_then(TerrainKind::glyph).unwrap_or(' ')
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
