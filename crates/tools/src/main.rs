use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use delve_core::{DungeonRng, FloorGenerator, TerrainCatalog, View};
use delve_tools::{
    DEFAULT_SEED, FloorSummary, RunConfig, builtin_templates, init_tracing, load_templates,
    parse_terrain_flag, parse_walk,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory of `*.txt` room templates (built-in templates when omitted)
    #[arg(short, long)]
    templates: Option<PathBuf>,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long)]
    width: Option<usize>,
    /// External terrain as `path=glyph`, may be repeated
    #[arg(long = "terrain", value_name = "PATH=GLYPH")]
    terrains: Vec<String>,
    /// TOML run configuration; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Direction digits to walk (0=E 1=SE 2=S 3=SW 4=W 5=NW 6=N 7=NE)
    #[arg(short, long, default_value = "")]
    walk: String,
    /// Treat every cell as visible
    #[arg(long)]
    all_seeing: bool,
    /// Print the whole floor instead of the player's view
    #[arg(long)]
    full: bool,
    /// Print a JSON summary of the floor
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let run_config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let seed = args.seed.or(run_config.seed).unwrap_or(DEFAULT_SEED);
    let floor_config = run_config.floor_config(args.height, args.width);
    let walk = parse_walk(&args.walk)?;

    let mut terrains = TerrainCatalog::new();
    for (path, glyph) in run_config.terrain_entries()? {
        terrains.register(path, glyph);
    }
    for flag in &args.terrains {
        let (path, glyph) = parse_terrain_flag(flag)?;
        terrains.register(path, glyph);
    }

    let templates = match args.templates.as_ref().or(run_config.templates.as_ref()) {
        Some(dir) => load_templates(dir, &terrains)?,
        None => builtin_templates(&mut terrains)?,
    };

    let mut rng = DungeonRng::new(seed);
    let floor = FloorGenerator::new(floor_config, &templates)
        .generate(&mut rng)
        .with_context(|| format!("Failed to generate a floor for seed {seed}"))?;

    let mut view = View::new(floor);
    view.place_player_randomly(&mut rng).context("Failed to place the player")?;
    view.refresh(args.all_seeing)?;
    for direction in walk {
        if !view.move_player(direction)? {
            tracing::info!(?direction, "move blocked");
        }
        view.refresh(args.all_seeing)?;
    }

    if args.json {
        let summary = FloorSummary::new(seed, view.floor(), view.player());
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if args.full {
        println!("{}", view.floor().to_text());
    } else {
        println!("{}", view.rendered());
    }

    Ok(())
}
