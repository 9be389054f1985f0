//! Field of view over a grid of terrain codes.
//!
//! Shadowcasting finds the candidate cells octant by octant, then every
//! candidate must also have an unobstructed digital line back to the origin.
//! The second pass stops sight from slipping past wall corners.

use crate::types::Pos;

fn transform_octant(orig: Pos, x: i32, y: i32, oct: u8) -> Pos {
    match oct {
        0 => Pos { y: orig.y - y, x: orig.x + x },
        1 => Pos { y: orig.y - x, x: orig.x + y },
        2 => Pos { y: orig.y - x, x: orig.x - y },
        3 => Pos { y: orig.y - y, x: orig.x - x },
        4 => Pos { y: orig.y + y, x: orig.x - x },
        5 => Pos { y: orig.y + x, x: orig.x - y },
        6 => Pos { y: orig.y + x, x: orig.x + y },
        7 => Pos { y: orig.y + y, x: orig.x + x },
        _ => orig,
    }
}

/// Cells visible from `origin` within Euclidean `radius` on a `width` x
/// `height` grid of terrain codes, as a row-major mask. Cells outside the
/// grid count as opaque. The origin is always visible, and every other
/// visible cell has a clear digital line to it.
pub fn compute_fov(
    codes: &[u8],
    width: usize,
    height: usize,
    origin: Pos,
    radius: i32,
    is_opaque: impl Fn(u8) -> bool,
) -> Vec<bool> {
    let mut scan = ShadowScan {
        codes,
        width,
        height,
        origin,
        radius: radius.max(0),
        is_opaque,
        visible: vec![false; width * height],
    };
    if !scan.in_bounds(origin) {
        return scan.visible;
    }
    let origin_index = scan.index(origin);
    scan.visible[origin_index] = true;
    for octant in 0..8 {
        scan.scan_octant(1, Slope::new(1, 1), Slope::new(0, 1), octant);
    }

    let reach = scan.radius;
    for y in (origin.y - reach).max(0)..=(origin.y + reach).min(height as i32 - 1) {
        for x in (origin.x - reach).max(0)..=(origin.x + reach).min(width as i32 - 1) {
            let pos = Pos::new(y, x);
            let index = scan.index(pos);
            if scan.visible[index] && pos != origin && !scan.has_direct_line_of_sight(pos) {
                scan.visible[index] = false;
            }
        }
    }
    scan.visible
}

#[derive(Clone, Copy)]
struct Slope {
    y: i32,
    x: i32,
}

impl Slope {
    fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    fn greater_or_equal(&self, other: &Slope) -> bool {
        self.y * other.x >= other.y * self.x
    }

    fn greater_than(&self, other: &Slope) -> bool {
        self.y * other.x > other.y * self.x
    }
}

struct ShadowScan<'a, F> {
    codes: &'a [u8],
    width: usize,
    height: usize,
    origin: Pos,
    radius: i32,
    is_opaque: F,
    visible: Vec<bool>,
}

impl<F: Fn(u8) -> bool> ShadowScan<'_, F> {
    fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }

    fn blocks_sight(&self, pos: Pos) -> bool {
        !self.in_bounds(pos) || (self.is_opaque)(self.codes[self.index(pos)])
    }

    /// Steps a digital line from the origin to `target` and fails on the first
    /// opaque cell strictly between them. Diagonal steps are taken when both
    /// axes are exactly balanced.
    fn has_direct_line_of_sight(&self, target: Pos) -> bool {
        let dx = target.x - self.origin.x;
        let dy = target.y - self.origin.y;
        let (sx, sy) = (dx.signum(), dy.signum());
        let (total_x, total_y) = (dx.abs(), dy.abs());
        let (mut x, mut y) = (self.origin.x, self.origin.y);
        let (mut step_x, mut step_y) = (0, 0);

        while step_x < total_x || step_y < total_y {
            let lhs = (1 + 2 * step_x) * total_y;
            let rhs = (1 + 2 * step_y) * total_x;
            if lhs == rhs {
                x += sx;
                y += sy;
                step_x += 1;
                step_y += 1;
            } else if lhs < rhs {
                x += sx;
                step_x += 1;
            } else {
                y += sy;
                step_y += 1;
            }
            if x == target.x && y == target.y {
                break;
            }
            if self.blocks_sight(Pos::new(y, x)) {
                return false;
            }
        }
        true
    }

    /// Scans row `dist` of one octant between the `start` and `end` slopes,
    /// recursing outward. An opaque run splits the wedge: the part above it
    /// continues in a recursive call, the part behind it is dropped.
    fn scan_octant(&mut self, dist: i32, start: Slope, end: Slope, oct: u8) {
        if dist > self.radius {
            return;
        }
        let radius_squared = self.radius * self.radius;
        let mut blocked = false;
        let mut cur_start = start;
        for y in (0..=dist).rev() {
            let top = Slope::new(2 * y + 1, 2 * dist - 1);
            let bot = Slope::new(2 * y - 1, 2 * dist + 1);
            if cur_start.greater_or_equal(&bot) && top.greater_than(&end) {
                let p = transform_octant(self.origin, dist, y, oct);
                if dist * dist + y * y <= radius_squared && self.in_bounds(p) {
                    let index = self.index(p);
                    self.visible[index] = true;
                }
                if self.blocks_sight(p) {
                    if !blocked {
                        self.scan_octant(dist + 1, cur_start, top, oct);
                        blocked = true;
                    }
                    cur_start = bot;
                } else if blocked {
                    blocked = false;
                }
            }
        }
        if !blocked {
            self.scan_octant(dist + 1, cur_start, end, oct);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const OPEN: u8 = 1;
    const WALL: u8 = 0;

    fn opaque(code: u8) -> bool {
        code == WALL
    }

    fn draw_mask(visible: &[bool], width: usize) -> String {
        visible
            .chunks(width)
            .map(|row| row.iter().map(|v| if *v { 'v' } else { '.' }).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn open_grid_mask_is_the_euclidean_disc() {
        let size = 17;
        let codes = vec![OPEN; size * size];
        let origin = Pos::new(8, 8);
        for radius in [0, 1, 3, 7] {
            let visible = compute_fov(&codes, size, size, origin, radius, opaque);
            for y in 0..size {
                for x in 0..size {
                    let pos = Pos::new(y as i32, x as i32);
                    let expected = pos.distance_squared(origin) <= i64::from(radius * radius);
                    assert_eq!(
                        visible[y * size + x],
                        expected,
                        "radius {radius}, cell {pos:?}\n{}",
                        draw_mask(&visible, size)
                    );
                }
            }
        }
    }

    #[test]
    fn adjacent_wall_hides_cells_directly_behind_it() {
        let size = 11;
        let mut codes = vec![OPEN; size * size];
        codes[5 * size + 6] = WALL;
        let visible = compute_fov(&codes, size, size, Pos::new(5, 5), 7, opaque);

        assert!(visible[5 * size + 6], "the wall itself is seen");
        for x in 7..size {
            assert!(!visible[5 * size + x], "cell (5, {x}) is behind the wall");
        }
        assert!(visible[5 * size + 2], "the opposite side stays open");
    }

    #[test]
    fn corridor_wall_occludes_tiles_behind_it() {
        let size = 11;
        let mut codes = vec![WALL; size * size];
        for x in 1..10 {
            codes[5 * size + x] = OPEN;
        }
        codes[5 * size + 6] = WALL;
        let visible = compute_fov(&codes, size, size, Pos::new(5, 3), 10, opaque);

        assert!(visible[5 * size + 5]);
        assert!(visible[5 * size + 6]);
        assert!(!visible[5 * size + 7], "tile directly behind corridor wall should be occluded");
    }

    #[test]
    fn sight_does_not_leave_a_closed_room() {
        let size = 20;
        let mut codes = vec![OPEN; size * size];
        for y in 4..=10 {
            for x in 4..=10 {
                if y == 4 || y == 10 || x == 4 || x == 10 {
                    codes[y * size + x] = WALL;
                }
            }
        }
        for py in 5..10 {
            for px in 5..10 {
                let visible = compute_fov(&codes, size, size, Pos::new(py, px), 15, opaque);
                for y in 0..size {
                    for x in 0..size {
                        let outside = !(4..=10).contains(&y) || !(4..=10).contains(&x);
                        assert!(
                            !(outside && visible[y * size + x]),
                            "light leaked to ({y}, {x}) from ({py}, {px})\n{}",
                            draw_mask(&visible, size)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_scans_are_identical_and_leave_input_untouched() {
        let size = 15;
        let mut codes = vec![OPEN; size * size];
        codes[7 * size + 9] = WALL;
        codes[8 * size + 9] = WALL;
        let snapshot = codes.clone();

        let first = compute_fov(&codes, size, size, Pos::new(7, 7), 7, opaque);
        let second = compute_fov(&codes, size, size, Pos::new(7, 7), 7, opaque);
        assert_eq!(first, second);
        assert_eq!(codes, snapshot);
    }

    #[test]
    fn origin_on_the_grid_edge_is_still_visible() {
        let codes = vec![OPEN; 4 * 4];
        let visible = compute_fov(&codes, 4, 4, Pos::new(0, 0), 2, opaque);
        assert!(visible[0]);
        assert!(visible[1] && visible[4] && visible[5]);
        assert!(!compute_fov(&codes, 4, 4, Pos::new(9, 9), 2, opaque).iter().any(|v| *v));
    }

    proptest! {
        #[test]
        fn scans_are_pure_for_random_walls(
            walls in proptest::collection::vec(any::<bool>(), 12 * 12),
            oy in 0_i32..12,
            ox in 0_i32..12,
            radius in 0_i32..9,
        ) {
            let codes: Vec<u8> = walls.iter().map(|wall| if *wall { WALL } else { OPEN }).collect();
            let origin = Pos::new(oy, ox);
            let first = compute_fov(&codes, 12, 12, origin, radius, opaque);
            let second = compute_fov(&codes, 12, 12, origin, radius, opaque);
            prop_assert_eq!(&first, &second);
            prop_assert!(first[(oy as usize) * 12 + ox as usize]);
            for (index, seen) in first.iter().enumerate() {
                let pos = Pos::new((index / 12) as i32, (index % 12) as i32);
                prop_assert!(!seen || pos.distance_squared(origin) <= i64::from(radius * radius));
            }
        }
    }
}
