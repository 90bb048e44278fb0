#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-step pathfinding for enemies chasing the player.
//!
//! A breadth-first search over floor tiles finds the first step of a
//! shortest path. Tiles held by other agents are obstacles, except for the
//! destination itself, which stays enterable so that stepping onto it can be
//! treated as an attack. When the search cannot reach the destination a
//! greedy single-axis step is attempted instead, so every call terminates
//! with a legal position.

use std::collections::VecDeque;

use delve_core::{Direction, Grid, Position};

/// Expansion order used by the search. Fixed so tie-breaking is reproducible.
const EXPANSION_ORDER: [Direction; 4] = [
    Direction::East,
    Direction::West,
    Direction::South,
    Direction::North,
];

/// Computes the tile an agent at `from` should occupy next to approach `to`.
///
/// Returns `from` when already at the destination or when every candidate
/// step is blocked. The result is either `from` or one of its cardinal
/// neighbours and is never a wall.
#[must_use]
pub fn next_step(grid: &Grid, occupied: &[Position], from: Position, to: Position) -> Position {
    if from == to || !grid.contains(from) {
        return from;
    }

    let obstacles = Obstacles {
        grid,
        occupied,
        destination: to,
    };

    search(&obstacles, from, to).unwrap_or_else(|| greedy_step(&obstacles, from, to))
}

struct Obstacles<'a> {
    grid: &'a Grid,
    occupied: &'a [Position],
    destination: Position,
}

impl Obstacles<'_> {
    fn is_blocked(&self, position: Position) -> bool {
        if !self.grid.is_floor(position) {
            return true;
        }
        position != self.destination && self.occupied.contains(&position)
    }
}

fn search(obstacles: &Obstacles<'_>, from: Position, to: Position) -> Option<Position> {
    let grid = obstacles.grid;
    let width = usize::try_from(grid.columns()).ok()?;
    let height = usize::try_from(grid.rows()).ok()?;
    let cell_count = width.checked_mul(height)?;

    let mut visited = vec![false; cell_count];
    let mut parents: Vec<Option<Position>> = vec![None; cell_count];
    let mut queue = VecDeque::new();

    visited[index(width, from)?] = true;
    queue.push_back(from);

    let mut found = false;
    while let Some(current) = queue.pop_front() {
        if current == to {
            found = true;
            break;
        }

        for direction in EXPANSION_ORDER {
            let Some(neighbor) = current.step(direction) else {
                continue;
            };
            if !grid.contains(neighbor) {
                continue;
            }

            let neighbor_index = index(width, neighbor)?;
            if visited[neighbor_index] || obstacles.is_blocked(neighbor) {
                continue;
            }

            visited[neighbor_index] = true;
            parents[neighbor_index] = Some(current);
            queue.push_back(neighbor);
        }
    }

    if !found {
        return None;
    }

    let mut step = to;
    loop {
        let parent = parents[index(width, step)?]?;
        if parent == from {
            return Some(step);
        }
        step = parent;
    }
}

fn greedy_step(obstacles: &Obstacles<'_>, from: Position, to: Position) -> Position {
    let horizontal = if to.x() > from.x() {
        Some(Direction::East)
    } else if to.x() < from.x() {
        Some(Direction::West)
    } else {
        None
    };
    let vertical = if to.y() > from.y() {
        Some(Direction::South)
    } else if to.y() < from.y() {
        Some(Direction::North)
    } else {
        None
    };

    let order = if from.x().abs_diff(to.x()) >= from.y().abs_diff(to.y()) {
        [horizontal, vertical]
    } else {
        [vertical, horizontal]
    };

    order
        .into_iter()
        .flatten()
        .filter_map(|direction| from.step(direction))
        .find(|candidate| !obstacles.is_blocked(*candidate))
        .unwrap_or(from)
}

fn index(width: usize, position: Position) -> Option<usize> {
    let column = usize::try_from(position.x()).ok()?;
    let row = usize::try_from(position.y()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(layout: &str) -> Grid {
        Grid::parse(layout).expect("layout parses")
    }

    #[test]
    fn stays_put_at_destination() {
        let grid = grid("###\n#.#\n###");
        let here = Position::new(1, 1);
        assert_eq!(next_step(&grid, &[], here, here), here);
    }

    #[test]
    fn follows_corridor_around_wall() {
        let grid = grid(
            "
            #####
            #...#
            #.#.#
            #.#.#
            #####
            ",
        );

        let step = next_step(&grid, &[], Position::new(1, 3), Position::new(3, 3));
        assert_eq!(step, Position::new(1, 2));
    }

    #[test]
    fn ties_prefer_horizontal_expansion() {
        let grid = grid(
            "
            ####
            #..#
            #..#
            ####
            ",
        );

        let step = next_step(&grid, &[], Position::new(1, 1), Position::new(2, 2));
        assert_eq!(step, Position::new(2, 1));
    }

    #[test]
    fn occupied_destination_remains_enterable() {
        let grid = grid("####\n#..#\n####");
        let from = Position::new(1, 1);
        let to = Position::new(2, 1);
        assert_eq!(next_step(&grid, &[to], from, to), to);
    }

    #[test]
    fn routes_around_occupied_tiles() {
        let grid = grid(
            "
            #####
            #...#
            #...#
            #####
            ",
        );
        let blocker = Position::new(2, 1);

        let step = next_step(&grid, &[blocker], Position::new(1, 1), Position::new(3, 1));
        assert_eq!(step, Position::new(1, 2));
    }

    #[test]
    fn greedy_fallback_prefers_larger_axis() {
        // The destination is sealed off by a wall, so no path exists.
        let grid = grid(
            "
            #######
            #...#.#
            #...###
            #######
            ",
        );

        let step = next_step(&grid, &[], Position::new(1, 1), Position::new(5, 1));
        assert_eq!(step, Position::new(2, 1));
    }

    #[test]
    fn greedy_fallback_tries_second_axis_when_first_is_blocked() {
        let grid = grid(
            "
            #######
            #.#...#
            #...###
            #####.#
            #######
            ",
        );
        // Moving east from (1, 1) hits a wall; stepping south is still open.
        let step = next_step(&grid, &[], Position::new(1, 1), Position::new(5, 3));
        assert_eq!(step, Position::new(1, 2));
    }

    #[test]
    fn fully_blocked_agent_stays_in_place() {
        let grid = grid(
            "
            #####
            #.#.#
            #####
            ",
        );
        let from = Position::new(1, 1);
        assert_eq!(next_step(&grid, &[], from, Position::new(3, 1)), from);
    }

    #[test]
    fn out_of_bounds_origin_is_returned_unchanged() {
        let grid = grid("###\n#.#\n###");
        let from = Position::new(7, 7);
        assert_eq!(next_step(&grid, &[], from, Position::new(1, 1)), from);
    }
}
