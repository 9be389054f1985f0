use std::fs;
use std::path::Path;

use delve_core::{DungeonRng, FloorConfig, FloorGenerator, TerrainCatalog, TerrainKind};
use delve_tools::{RunConfig, load_templates};

#[test]
fn test_templates_load_sorted_by_file_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("b_vault.txt"), "#####\n#...+\n#####\n").expect("write");
    fs::write(dir.path().join("a_hall.txt"), "#####\n+...+\n#####\n\nmax_entrances 2\n")
        .expect("write");
    fs::write(dir.path().join("notes.md"), "not a template").expect("write");
    fs::create_dir(dir.path().join("nested.txt")).expect("mkdir");

    let templates = load_templates(dir.path(), &TerrainCatalog::new()).expect("templates load");
    let names: Vec<&str> = templates.iter().map(|template| template.name.as_str()).collect();
    assert_eq!(names, ["a_hall", "b_vault"]);
    assert_eq!(templates[0].max_entrances, 2);

    let floor = FloorGenerator::new(FloorConfig { height: 12, width: 20 }, &templates)
        .generate(&mut DungeonRng::new(3))
        .expect("two small rooms fit");
    assert_eq!(floor.rooms.len(), 2);
}

#[test]
fn test_template_errors_name_the_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("broken.txt"), "###\n#?+\n###\n").expect("write");

    let error = load_templates(dir.path(), &TerrainCatalog::new()).expect_err("unknown glyph");
    assert!(format!("{error:#}").contains("broken.txt"), "{error:#}");
}

#[test]
fn test_external_terrains_resolve_in_templates() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("lava.txt"), "#####\n#~~.+\n#####\n\n~ mine.lava\n")
        .expect("write");

    assert!(load_templates(dir.path(), &TerrainCatalog::new()).is_err());

    let mut terrains = TerrainCatalog::new();
    terrains.register("mine.lava", '^');
    let templates = load_templates(dir.path(), &terrains).expect("lava is registered");
    assert_eq!(templates[0].symbols.get(&'~'), Some(&TerrainKind::named("mine.lava", '^')));
}

#[test]
fn test_run_config_reads_toml() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("run.toml");
    fs::write(
        &path,
        "seed = 7\nheight = 20\ntemplates = \"rooms\"\n\n[terrains]\n\"mine.lava\" = \"^\"\n",
    )
    .expect("write");

    let config = RunConfig::load(&path).expect("valid config");
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.floor_config(None, None), FloorConfig { height: 20, width: 60 });
    assert_eq!(config.templates.as_deref(), Some(Path::new("rooms")));
    let terrains = config.terrain_entries().expect("one glyph each");
    assert_eq!(terrains, vec![("mine.lava".to_string(), '^')]);
}

#[test]
fn test_run_config_rejects_unknown_keys_and_long_glyphs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let typo = dir.path().join("typo.toml");
    fs::write(&typo, "sead = 7\n").expect("write");
    assert!(RunConfig::load(&typo).is_err());

    let glyphs = dir.path().join("glyphs.toml");
    fs::write(&glyphs, "[terrains]\nlava = \"^^\"\n").expect("write");
    let config = RunConfig::load(&glyphs).expect("syntactically valid");
    assert!(config.terrain_entries().is_err());

    assert!(RunConfig::load(&dir.path().join("missing.toml")).is_err());
}
