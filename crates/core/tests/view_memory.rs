use delve_core::{Direction, DungeonRng, Floor, FloorConfig, FloorGenerator, Pos, Template, View};

const TWO_ROOMS: [&str; 7] = [
    "##########################",
    "#.....#############......#",
    "#......................#.#",
    "#.....#############......#",
    "#.....#############......#",
    "##########################",
    "                          ",
];

fn memory_snapshot(view: &View) -> Vec<(Pos, char, bool)> {
    view.floor()
        .positions()
        .map(|pos| (pos, view.memory_at(pos).unwrap_or(' '), view.is_visible(pos)))
        .collect()
}

fn assert_memory_kept(before: &[(Pos, char, bool)], view: &View) {
    for (pos, remembered, _) in before {
        if *remembered != ' ' && !view.is_visible(*pos) {
            assert_eq!(
                view.memory_at(*pos),
                Some(*remembered),
                "memory at {pos:?} changed while out of sight"
            );
        }
    }
}

#[test]
fn test_memory_persists_after_walking_away() {
    let floor = Floor::from_rows(&TWO_ROOMS).expect("standard glyphs");
    let mut view = View::new(floor);
    view.place_player(Pos::new(2, 2)).expect("empty cell");
    view.refresh(false).expect("player placed");
    assert_eq!(view.memory_at(Pos::new(1, 1)), Some('.'));
    assert_eq!(view.memory_at(Pos::new(2, 2)), Some('@'));

    for _ in 0..15 {
        let before = memory_snapshot(&view);
        assert_eq!(view.move_player(Direction::East), Ok(true));
        view.refresh(false).expect("player placed");
        assert_memory_kept(&before, &view);
    }

    assert_eq!(view.player(), Some(Pos::new(2, 17)));
    assert!(!view.is_visible(Pos::new(1, 1)));
    assert_eq!(view.memory_at(Pos::new(1, 1)), Some('.'), "first room is still remembered");
    assert_eq!(view.memory_at(Pos::new(2, 2)), Some('.'), "old player cell was overwritten");
}

#[test]
fn test_stale_occupant_glyph_stays_remembered() {
    let floor = Floor::from_rows(&TWO_ROOMS).expect("standard glyphs");
    let mut view = View::new(floor);
    view.place_player(Pos::new(2, 20)).expect("empty cell");
    let goblin = view.add_occupant(Pos::new(2, 16), 'g').expect("free cell");
    view.refresh(false).expect("player placed");
    assert_eq!(view.memory_at(Pos::new(2, 16)), Some('g'));

    view.remove_occupant(goblin).expect("goblin exists");
    for direction in [Direction::NorthEast, Direction::East, Direction::East, Direction::East] {
        assert_eq!(view.move_player(direction), Ok(true));
    }
    view.refresh(false).expect("player placed");
    assert_eq!(view.player(), Some(Pos::new(1, 24)));
    assert!(!view.is_visible(Pos::new(2, 16)));
    assert_eq!(view.memory_at(Pos::new(2, 16)), Some('g'));
}

#[test]
fn test_blocked_move_leaves_render_unchanged() {
    let floor = Floor::from_rows(&TWO_ROOMS).expect("standard glyphs");
    let mut view = View::new(floor);
    view.place_player(Pos::new(1, 1)).expect("empty cell");
    let before = view.refresh(false).expect("player placed").to_owned();

    for direction in [Direction::North, Direction::West, Direction::NorthWest] {
        assert_eq!(view.move_player(direction), Ok(false));
        assert_eq!(view.player(), Some(Pos::new(1, 1)));
        assert_eq!(view.refresh(false).expect("player placed"), before);
    }
}

#[test]
fn test_memory_is_monotonic_on_a_random_walk() {
    let templates = vec![
        Template::parse(
            "room",
            "#######\n#.....#\n+.....+\n#.....#\n###+###\n\nmax_entrances 3",
            &Default::default(),
        )
        .expect("parses"),
    ];
    let mut rng = DungeonRng::new(5150);
    let floor = FloorGenerator::new(FloorConfig { height: 30, width: 60 }, &templates)
        .generate(&mut rng)
        .expect("fits");
    let mut view = View::new(floor);
    view.place_player_randomly(&mut rng).expect("floor has empty cells");
    view.refresh(false).expect("player placed");

    for _ in 0..200 {
        let before = memory_snapshot(&view);
        let direction = Direction::ALL[rng.index(Direction::ALL.len())];
        view.move_player(direction).expect("player placed");
        let rendered = view.refresh(false).expect("player placed").to_owned();

        assert_memory_kept(&before, &view);
        assert!(!rendered.lines().last().is_some_and(|line| line.trim().is_empty()));
        let pos = view.player().expect("player placed");
        assert!(view.floor().is_empty_cell(pos));
    }
}
