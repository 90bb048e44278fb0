#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Room-and-corridor dungeon generator.
//!
//! Rooms are sampled as non-overlapping rectangles that keep a one tile
//! margin from the grid border. Every room after the first is joined to its
//! predecessor with an L-shaped corridor, which keeps all carved floor
//! connected to the first room.

use delve_core::{Grid, IntRange, Position, RandomSource, RoomLayout, TileKind};
use log::debug;

/// Upper bound on candidate rectangles sampled for a single map.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 256;

const COIN: IntRange = IntRange::new(0, 1);

/// Axis-aligned rectangle carved into the grid during generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl Room {
    /// Creates a room anchored at its upper-left tile.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Tile used as the corridor anchor and the player spawn.
    #[must_use]
    pub const fn center(&self) -> Position {
        Position::new(
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    /// Reports whether the two rooms share at least one tile.
    ///
    /// Rooms whose edges merely touch do not intersect.
    #[must_use]
    pub const fn intersects(&self, other: &Room) -> bool {
        !(self.x.saturating_add(self.width) <= other.x
            || other.x.saturating_add(other.width) <= self.x
            || self.y.saturating_add(self.height) <= other.y
            || other.y.saturating_add(other.height) <= self.y)
    }

    fn carve(&self, grid: &mut Grid) {
        for y in self.y..self.y.saturating_add(self.height) {
            for x in self.x..self.x.saturating_add(self.width) {
                let _ = grid.carve(Position::new(x, y));
            }
        }
    }
}

/// Shape of the corridor joining two consecutive rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorridorShape {
    /// Horizontal leg along the previous room's row, then a vertical leg.
    HorizontalFirst,
    /// Vertical leg along the previous room's column, then a horizontal leg.
    VerticalFirst,
}

/// Result of a single generation pass.
#[derive(Clone, Debug)]
pub struct GeneratedMap {
    /// Carved tile layout.
    pub grid: Grid,
    /// Tile where the player starts.
    pub spawn: Position,
    /// Number of rooms that were placed.
    pub rooms_placed: usize,
}

/// Generator that lays out rooms according to a [`RoomLayout`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RoomGenerator {
    layout: RoomLayout,
}

impl RoomGenerator {
    /// Creates a generator using the provided size ranges.
    #[must_use]
    pub const fn new(layout: RoomLayout) -> Self {
        Self { layout }
    }

    /// Produces a new map of `columns` by `rows` tiles.
    ///
    /// The returned spawn is always a floor tile unless the grid is too
    /// small to have an interior, in which case `(1, 1)` is reported.
    pub fn generate(
        &self,
        columns: u32,
        rows: u32,
        rng: &mut dyn RandomSource,
    ) -> GeneratedMap {
        let mut grid = Grid::filled(columns, rows, TileKind::Wall);
        let target = usize::try_from(rng.roll(self.layout.room_count)).unwrap_or(0);
        let mut rooms: Vec<Room> = Vec::with_capacity(target);

        let mut attempts = 0;
        while rooms.len() < target && attempts < MAX_PLACEMENT_ATTEMPTS {
            attempts += 1;

            let Some(candidate) = self.sample_room(columns, rows, rng) else {
                continue;
            };

            if rooms.iter().any(|placed| placed.intersects(&candidate)) {
                continue;
            }

            candidate.carve(&mut grid);
            if let Some(previous) = rooms.last() {
                let shape = if rng.roll(COIN) == 0 {
                    CorridorShape::HorizontalFirst
                } else {
                    CorridorShape::VerticalFirst
                };
                carve_corridor(&mut grid, previous.center(), candidate.center(), shape);
            }
            rooms.push(candidate);
        }

        if !grid.has_floor() {
            debug!("no floor carved after {attempts} attempts; opening the interior");
            grid.open_interior();
        }

        let spawn = match rooms.first() {
            Some(room) => room.center(),
            None => pick_free_floor(&grid, rng, |_| false).unwrap_or(Position::new(1, 1)),
        };

        debug!(
            "generated {columns}x{rows} map with {} of {target} rooms, spawn at ({}, {})",
            rooms.len(),
            spawn.x(),
            spawn.y()
        );

        GeneratedMap {
            grid,
            spawn,
            rooms_placed: rooms.len(),
        }
    }

    fn sample_room(&self, columns: u32, rows: u32, rng: &mut dyn RandomSource) -> Option<Room> {
        let width = rng.roll(self.layout.room_width);
        let height = rng.roll(self.layout.room_height);
        if width == 0 || height == 0 {
            return None;
        }

        let max_x = columns.checked_sub(width)?.checked_sub(1)?;
        let max_y = rows.checked_sub(height)?.checked_sub(1)?;
        if max_x < 1 || max_y < 1 {
            return None;
        }

        let x = rng.roll(IntRange::new(1, max_x));
        let y = rng.roll(IntRange::new(1, max_y));
        Some(Room::new(x, y, width, height))
    }
}

/// Carves an L-shaped, one tile wide corridor between two points.
pub fn carve_corridor(grid: &mut Grid, from: Position, to: Position, shape: CorridorShape) {
    match shape {
        CorridorShape::HorizontalFirst => {
            carve_horizontal(grid, from.x(), to.x(), from.y());
            carve_vertical(grid, from.y(), to.y(), to.x());
        }
        CorridorShape::VerticalFirst => {
            carve_vertical(grid, from.y(), to.y(), from.x());
            carve_horizontal(grid, from.x(), to.x(), to.y());
        }
    }
}

/// Picks a uniformly random floor tile for which `is_taken` returns `false`.
pub fn pick_free_floor<F>(grid: &Grid, rng: &mut dyn RandomSource, is_taken: F) -> Option<Position>
where
    F: Fn(Position) -> bool,
{
    let candidates: Vec<Position> = grid
        .floor_positions()
        .filter(|position| !is_taken(*position))
        .collect();
    let last = u32::try_from(candidates.len().checked_sub(1)?).ok()?;
    let index = usize::try_from(rng.roll(IntRange::new(0, last))).ok()?;
    candidates.get(index).copied()
}

fn carve_horizontal(grid: &mut Grid, x1: u32, x2: u32, y: u32) {
    for x in x1.min(x2)..=x1.max(x2) {
        let _ = grid.carve(Position::new(x, y));
    }
}

fn carve_vertical(grid: &mut Grid, y1: u32, y2: u32, x: u32) {
    for y in y1.min(y2)..=y1.max(y2) {
        let _ = grid.carve(Position::new(x, y));
    }
}
