use anyhow::{Context, Result, ensure};
use clap::Parser;
use delve_core::types::BLANK_GLYPH;
use delve_core::{Direction, DungeonRng, FloorConfig, FloorGenerator, TerrainCatalog, View};
use delve_tools::{builtin_templates, init_tracing};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to run, starting at `seed`
    #[arg(short, long, default_value_t = 20)]
    runs: u64,
    #[arg(long, default_value_t = 500)]
    steps: u32,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn fuzz_seed(seed: u64, steps: u32) -> Result<()> {
    let mut terrains = TerrainCatalog::new();
    let templates = builtin_templates(&mut terrains)?;
    let mut dungeon_rng = DungeonRng::new(seed);
    let floor = FloorGenerator::new(FloorConfig::default(), &templates)
        .generate(&mut dungeon_rng)
        .with_context(|| format!("generation failed for seed {seed}"))?;

    let mut view = View::new(floor);
    view.place_player_randomly(&mut dungeon_rng)?;
    let mut walk_rng = ChaCha8Rng::seed_from_u64(seed);
    let mut written = vec![false; view.floor().width * view.floor().height];

    for step in 0..steps {
        let direction = choose(&mut walk_rng, &Direction::ALL);
        let before = view.player();
        let moved = view.move_player(direction)?;
        let rendered = view.refresh(false)?;

        // Invariants
        ensure!(
            !rendered.lines().last().is_some_and(|line| line.trim().is_empty()),
            "seed {seed} step {step}: rendered map ends with a blank row"
        );
        let pos = view.player().context("player vanished")?;
        ensure!(
            view.floor().is_empty_cell(pos),
            "seed {seed} step {step}: player stands on {:?}",
            view.floor().glyph_at(pos)
        );
        ensure!(moved || before == Some(pos), "seed {seed} step {step}: blocked move relocated");
        for (index, cell) in view.floor().positions().enumerate() {
            let remembered = view.memory_at(cell).unwrap_or(BLANK_GLYPH) != BLANK_GLYPH;
            ensure!(
                remembered || !written[index],
                "seed {seed} step {step}: memory at {cell:?} reverted to blank"
            );
            written[index] |= remembered;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    println!(
        "Starting fuzz harness on seeds {}..{} for {} steps each...",
        args.seed,
        args.seed + args.runs,
        args.steps
    );
    for seed in args.seed..args.seed + args.runs {
        fuzz_seed(seed, args.steps)?;
    }
    println!("Fuzzing completed successfully.");
    Ok(())
}
