//! Shared plumbing for the `delve` and `fuzz` binaries: run configuration,
//! template directories, terrain flags and the JSON floor summary.

use std::collections::BTreeMap;
use std::fs;
use std::io::stderr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use delve_core::mapgen::{Floor, FloorConfig, PlacedRoom};
use delve_core::{Direction, Pos, TerrainCatalog, Template};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_SEED: u64 = 42;
pub const TEMPLATE_EXTENSION: &str = "txt";

/// Optional TOML run configuration. Command-line flags win over file values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub seed: Option<u64>,
    pub height: Option<usize>,
    pub width: Option<usize>,
    /// Directory of `*.txt` templates.
    pub templates: Option<PathBuf>,
    /// External terrains, dotted path to a one-character glyph.
    #[serde(default)]
    pub terrains: BTreeMap<String, String>,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn terrain_entries(&self) -> Result<Vec<(String, char)>> {
        self.terrains
            .iter()
            .map(|(path, glyph)| -> Result<(String, char)> {
                Ok((path.clone(), single_glyph(glyph)?))
            })
            .collect()
    }

    /// Floor size with `height` and `width` falling back to this file, then to the default.
    pub fn floor_config(&self, height: Option<usize>, width: Option<usize>) -> FloorConfig {
        let default = FloorConfig::default();
        FloorConfig {
            height: height.or(self.height).unwrap_or(default.height),
            width: width.or(self.width).unwrap_or(default.width),
        }
    }
}

fn single_glyph(text: &str) -> Result<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(glyph), None) => Ok(glyph),
        _ => bail!("terrain glyph must be exactly one character, got {text:?}"),
    }
}

/// Parses a `--terrain path=glyph` flag.
pub fn parse_terrain_flag(flag: &str) -> Result<(String, char)> {
    let (path, glyph) =
        flag.split_once('=').ok_or_else(|| anyhow!("expected path=glyph, got {flag:?}"))?;
    let path = path.trim();
    if path.is_empty() {
        bail!("terrain path is empty in {flag:?}");
    }
    Ok((path.to_string(), single_glyph(glyph)?))
}

/// Parses a walk given as direction digits, e.g. `"0026"`.
pub fn parse_walk(codes: &str) -> Result<Vec<Direction>> {
    codes
        .chars()
        .map(|code| -> Result<Direction> {
            let digit = code
                .to_digit(10)
                .ok_or_else(|| anyhow!("walk step {code:?} is not a direction digit"))?;
            Ok(Direction::try_from(digit as u8)?)
        })
        .collect()
}

/// Loads every `*.txt` file in `dir`, sorted by file name. Each template is
/// named after its file stem.
pub fn load_templates(dir: &Path, terrains: &TerrainCatalog) -> Result<Vec<Template>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read template directory: {}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut templates = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| anyhow!("template file name is not valid UTF-8: {}", path.display()))?;
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template: {}", path.display()))?;
        let template = Template::parse(name, &text, terrains)
            .with_context(|| format!("Failed to parse template: {}", path.display()))?;
        tracing::debug!(template = name, path = %path.display(), "loaded template");
        templates.push(template);
    }
    Ok(templates)
}

const BUILTIN_TEMPLATES: [(&str, &str); 4] = [
    (
        "hall",
        "#########\n#.......#\n+.......+\n#.......#\n####+####\n\nmax_on_floor 2\nmax_entrances 3",
    ),
    ("closet", "#####\n#...#\n#...+\n#####\n\nmin_on_floor 0\nmax_on_floor 3"),
    (
        "pool",
        "#######\n#.~~~.#\n#.~~~.+\n#.....#\n#######\n\n\
         min_on_floor 0\nmax_on_floor 1\n~ empty | water",
    ),
    (
        "shrine",
        "#######\n#.....#\n#..#..#\n+.....+\n###+###\n\nmax_entrances 2\nno_entrance empty",
    ),
];

/// Templates used when no directory is given. Registers the `water` terrain they need.
pub fn builtin_templates(terrains: &mut TerrainCatalog) -> Result<Vec<Template>> {
    terrains.register("water", '~');
    BUILTIN_TEMPLATES
        .iter()
        .map(|(name, text)| {
            Template::parse(*name, text, terrains)
                .with_context(|| format!("Failed to parse built-in template: {name}"))
        })
        .collect()
}

/// Machine-readable description of a generated floor and the player on it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FloorSummary {
    pub seed: u64,
    pub height: usize,
    pub width: usize,
    pub fingerprint: String,
    pub rooms: Vec<PlacedRoom>,
    pub entrances: Vec<Pos>,
    pub corridors: usize,
    pub unreachable: Vec<(Pos, Pos)>,
    pub player: Option<Pos>,
    pub map: Vec<String>,
}

impl FloorSummary {
    pub fn new(seed: u64, floor: &Floor, player: Option<Pos>) -> Self {
        Self {
            seed,
            height: floor.height,
            width: floor.width,
            fingerprint: format!("{:016x}", floor.fingerprint()),
            rooms: floor.rooms.clone(),
            entrances: floor.entrances.clone(),
            corridors: floor.corridors.len(),
            unreachable: floor.unreachable.clone(),
            player,
            map: floor.to_text().lines().map(str::to_string).collect(),
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` and defaulting to warnings.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn terrain_flags_need_a_path_and_one_glyph() {
        assert_eq!(
            parse_terrain_flag("dungeon.lava=~").expect("valid flag"),
            ("dungeon.lava".to_string(), '~')
        );
        assert!(parse_terrain_flag("dungeon.lava").is_err());
        assert!(parse_terrain_flag("=~").is_err());
        assert!(parse_terrain_flag("lava=").is_err());
        assert!(parse_terrain_flag("lava=~~").is_err());
    }

    #[test]
    fn walk_digits_map_to_directions() {
        assert_eq!(
            parse_walk("062").expect("valid walk"),
            vec![Direction::East, Direction::North, Direction::South]
        );
        assert!(parse_walk("").expect("empty walk").is_empty());
        assert!(parse_walk("8").is_err());
        assert!(parse_walk("0x").is_err());
    }

    #[test]
    fn builtin_templates_parse_and_generate() {
        let mut terrains = TerrainCatalog::new();
        let templates = builtin_templates(&mut terrains).expect("built-ins parse");
        assert_eq!(templates.len(), BUILTIN_TEMPLATES.len());
        assert!(terrains.get("water").is_some());

        let floor = delve_core::generate_floor(DEFAULT_SEED, FloorConfig::default(), &templates)
            .expect("built-ins fit the default floor");
        let summary = FloorSummary::new(DEFAULT_SEED, &floor, None);
        assert_eq!(summary.map.len(), floor.height);
        assert_eq!(summary.rooms.len(), floor.rooms.len());
        assert_eq!(summary.fingerprint.len(), 16);
    }

    #[test]
    fn config_values_fill_in_missing_flags() {
        let config = RunConfig { height: Some(20), width: Some(50), ..RunConfig::default() };
        assert_eq!(config.floor_config(None, Some(70)), FloorConfig { height: 20, width: 70 });
        assert_eq!(RunConfig::default().floor_config(None, None), FloorConfig::default());
    }

    proptest! {
        #[test]
        fn walks_accept_exactly_the_compass_digits(walk in "[0-9]{0,24}") {
            let parsed = parse_walk(&walk);
            if walk.contains(['8', '9']) {
                prop_assert!(parsed.is_err());
            } else {
                let directions = parsed.expect("compass digits only");
                prop_assert_eq!(directions.len(), walk.len());
                let codes: String =
                    directions.iter().map(|d| char::from(b'0' + d.code())).collect();
                prop_assert_eq!(codes, walk);
            }
        }
    }
}
