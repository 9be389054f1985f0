//! Terrain kinds and the registry templates resolve their symbol definitions against.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const WALL: &str = "wall";
pub const EMPTY: &str = "empty";
pub const ENTRANCE: &str = "entrance";
pub const UNKNOWN: &str = "unknown";

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Named { name: String, glyph: char },
    /// One of several kinds, picked when a template instance is stamped.
    Union(Vec<TerrainKind>),
}

impl TerrainKind {
    pub fn named(name: impl Into<String>, glyph: char) -> Self {
        TerrainKind::Named { name: name.into(), glyph }
    }

    pub fn wall() -> Self {
        Self::named(WALL, '#')
    }

    pub fn empty() -> Self {
        Self::named(EMPTY, '.')
    }

    pub fn entrance() -> Self {
        Self::named(ENTRANCE, '+')
    }

    pub fn unknown() -> Self {
        Self::named(UNKNOWN, ' ')
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            TerrainKind::Named { name, .. } => Some(name),
            TerrainKind::Union(_) => None,
        }
    }

    pub fn glyph(&self) -> Option<char> {
        match self {
            TerrainKind::Named { glyph, .. } => Some(*glyph),
            TerrainKind::Union(_) => None,
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self, TerrainKind::Union(_))
    }

    /// Concrete kinds this terrain can become, in declaration order.
    pub fn members(&self) -> Vec<&TerrainKind> {
        match self {
            TerrainKind::Named { .. } => vec![self],
            TerrainKind::Union(kinds) => kinds.iter().flat_map(TerrainKind::members).collect(),
        }
    }
}

/// Named terrains addressable from template definitions, either by a bare
/// standard name or by the dotted path an external terrain was registered under.
#[derive(Clone, Debug)]
pub struct TerrainCatalog {
    kinds: BTreeMap<String, TerrainKind>,
}

impl Default for TerrainCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainCatalog {
    pub fn new() -> Self {
        let mut kinds = BTreeMap::new();
        let standard = [
            TerrainKind::wall(),
            TerrainKind::empty(),
            TerrainKind::entrance(),
            TerrainKind::unknown(),
        ];
        for kind in standard {
            if let Some(name) = kind.name() {
                kinds.insert(name.to_string(), kind.clone());
            }
        }
        Self { kinds }
    }

    pub fn register(&mut self, path: impl Into<String>, glyph: char) -> TerrainKind {
        let path = path.into();
        let kind = TerrainKind::named(path.clone(), glyph);
        self.kinds.insert(path, kind.clone());
        kind
    }

    pub fn get(&self, name: &str) -> Option<&TerrainKind> {
        self.kinds.get(name)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Parses `wall`, `1.mine.huge_rock` or `wall | 1.mine.huge_rock`.
    pub fn parse_definition(&self, definition: &str) -> Option<TerrainKind> {
        if definition.contains('|') {
            let kinds = definition
                .split('|')
                .map(|part| self.get(part.trim()).cloned())
                .collect::<Option<Vec<_>>>()?;
            return Some(TerrainKind::Union(kinds));
        }
        self.get(definition.trim()).cloned()
    }
}
