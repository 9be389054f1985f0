//! Lowest-cost grid paths over the 8-neighbourhood, used to carve corridors.
//! Diagonal steps cost more than straight ones so corridors prefer straight runs.

use std::collections::BTreeSet;

use crate::types::Pos;

/// Step costs in tenths: 1.0 straight, 1.4 diagonal.
pub const STRAIGHT_COST: u32 = 10;
pub const DIAGONAL_COST: u32 = 14;

const STEPS: [(i32, i32, u32); 8] = [
    (0, 1, STRAIGHT_COST),
    (0, -1, STRAIGHT_COST),
    (1, 0, STRAIGHT_COST),
    (-1, 0, STRAIGHT_COST),
    (1, 1, DIAGONAL_COST),
    (-1, -1, DIAGONAL_COST),
    (1, -1, DIAGONAL_COST),
    (-1, 1, DIAGONAL_COST),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    cost: u32,
    y: i32,
    x: i32,
}

/// Dijkstra from `start` to `end`, both inclusive. An empty path means `end`
/// cannot be reached. Corridor carving passes a predicate that blocks nothing.
pub fn shortest_path(
    width: usize,
    height: usize,
    start: Pos,
    end: Pos,
    is_blocked: impl Fn(Pos) -> bool,
) -> Vec<Pos> {
    let in_bounds = |pos: Pos| {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < width && (pos.y as usize) < height
    };
    if !in_bounds(start) || !in_bounds(end) {
        return Vec::new();
    }
    let index = |pos: Pos| (pos.y as usize) * width + (pos.x as usize);

    let mut best = vec![u32::MAX; width * height];
    let mut came_from: Vec<Option<Pos>> = vec![None; width * height];
    let mut open = BTreeSet::from([OpenNode { cost: 0, y: start.y, x: start.x }]);
    best[index(start)] = 0;

    let mut reached = false;
    while let Some(node) = open.pop_first() {
        let current = Pos { y: node.y, x: node.x };
        if current == end {
            reached = true;
            break;
        }
        if node.cost > best[index(current)] {
            continue;
        }
        for (dy, dx, step_cost) in STEPS {
            let next = current.offset(dy, dx);
            if !in_bounds(next) || is_blocked(next) {
                continue;
            }
            let cost = node.cost + step_cost;
            if cost < best[index(next)] {
                best[index(next)] = cost;
                came_from[index(next)] = Some(current);
                open.insert(OpenNode { cost, y: next.y, x: next.x });
            }
        }
    }

    if !reached {
        return Vec::new();
    }
    let mut path = vec![end];
    let mut current = end;
    while let Some(previous) = came_from[index(current)] {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

pub fn path_cost(path: &[Pos]) -> f64 {
    let tenths: u32 = path
        .windows(2)
        .map(|pair| {
            let diagonal = pair[0].x != pair[1].x && pair[0].y != pair[1].y;
            if diagonal { DIAGONAL_COST } else { STRAIGHT_COST }
        })
        .sum();
    f64::from(tenths) / 10.0
}
