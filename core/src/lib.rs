#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Delve engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate raw input into
//! [`Command`] values, the world executes those commands via its `apply`
//! entry point and reports what happened as [`Event`] values. Systems such as
//! the room generator and the pathfinder operate on the [`Grid`] and
//! [`Position`] types defined here and never mutate world state directly.

mod random;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use random::{RandomSource, SeededRandom};

#[cfg(any(test, feature = "scripted_random"))]
pub use random::ScriptedRandom;

/// Upper bound applied to the player's health at the end of every turn.
///
/// This ceiling is independent of the configured maximum health.
pub const HEALTH_CEILING: i32 = 999;

/// Inclusive range of unsigned integers used for every random roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntRange {
    min: u32,
    max: u32,
}

impl IntRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Creates a range that only contains `value`.
    #[must_use]
    pub const fn exactly(value: u32) -> Self {
        Self::new(value, value)
    }

    /// Smallest value contained in the range.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Largest value contained in the range.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Reports whether `value` lies within the range.
    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }

    /// Reports whether the lower bound exceeds the upper bound.
    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

/// Cardinal movement directions available to the player and enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row of the tile.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the neighbouring position in `direction`.
    ///
    /// Yields `None` when the step would leave the non-negative quadrant.
    /// The upper bounds are checked by [`Grid::contains`].
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::North => self.y.checked_sub(1).map(|y| Self::new(self.x, y)),
            Direction::East => self.x.checked_add(1).map(|x| Self::new(x, self.y)),
            Direction::South => self.y.checked_add(1).map(|y| Self::new(self.x, y)),
            Direction::West => self.x.checked_sub(1).map(|x| Self::new(x, self.y)),
        }
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }
}

/// Kinds of tile that compose the dungeon grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Solid rock; never traversable.
    Wall,
    /// Open ground that agents may occupy.
    Floor,
}

/// Fixed-size tile matrix stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
}

impl Grid {
    /// Creates a grid where every tile has the provided kind.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, kind: TileKind) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tiles: vec![kind; capacity],
        }
    }

    /// Parses a grid from rows of `#` (wall) and `.` (floor) characters.
    ///
    /// Blank lines and surrounding whitespace are ignored. All rows must
    /// share the same width.
    pub fn parse(layout: &str) -> Result<Self, GridLayoutError> {
        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = lines.first() else {
            return Err(GridLayoutError::Empty);
        };
        let width = first.chars().count();

        let mut tiles = Vec::with_capacity(width * lines.len());
        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != width {
                return Err(GridLayoutError::RaggedRow { row });
            }

            for (column, glyph) in line.chars().enumerate() {
                let kind = match glyph {
                    '#' => TileKind::Wall,
                    '.' => TileKind::Floor,
                    other => {
                        return Err(GridLayoutError::UnknownGlyph {
                            glyph: other,
                            column,
                            row,
                        })
                    }
                };
                tiles.push(kind);
            }
        }

        let columns = u32::try_from(width).map_err(|_| GridLayoutError::TooLarge)?;
        let rows = u32::try_from(lines.len()).map_err(|_| GridLayoutError::TooLarge)?;
        Ok(Self {
            columns,
            rows,
            tiles,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x < self.columns && position.y < self.rows
    }

    /// Kind of the tile at `position`, or `None` when out of bounds.
    #[must_use]
    pub fn tile(&self, position: Position) -> Option<TileKind> {
        self.index(position)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether `position` is an in-bounds floor tile.
    #[must_use]
    pub fn is_floor(&self, position: Position) -> bool {
        self.tile(position) == Some(TileKind::Floor)
    }

    /// Overwrites the tile at `position`. Out-of-bounds writes are ignored.
    ///
    /// Returns whether the write landed inside the grid.
    pub fn set(&mut self, position: Position, kind: TileKind) -> bool {
        match self.index(position).and_then(|index| self.tiles.get_mut(index)) {
            Some(slot) => {
                *slot = kind;
                true
            }
            None => false,
        }
    }

    /// Turns the tile at `position` into floor, clipping to the grid bounds.
    pub fn carve(&mut self, position: Position) -> bool {
        self.set(position, TileKind::Floor)
    }

    /// Reports whether any floor tile exists.
    #[must_use]
    pub fn has_floor(&self) -> bool {
        self.tiles.iter().any(|tile| *tile == TileKind::Floor)
    }

    /// Iterates over every floor tile in row-major order.
    pub fn floor_positions(&self) -> impl Iterator<Item = Position> + '_ {
        let columns = self.columns;
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == TileKind::Floor)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(Position::new(index % columns, index / columns))
            })
    }

    /// Opens every tile except the outer border as floor.
    pub fn open_interior(&mut self) {
        for y in 1..self.rows.saturating_sub(1) {
            for x in 1..self.columns.saturating_sub(1) {
                let _ = self.carve(Position::new(x, y));
            }
        }
    }

    /// Tiles of a single row, or `None` when `y` is out of bounds.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[TileKind]> {
        if y >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let start = usize::try_from(y).ok()?.checked_mul(width)?;
        self.tiles.get(start..start.checked_add(width)?)
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let row = usize::try_from(position.y).ok()?;
        let column = usize::try_from(position.x).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

/// Reasons a textual grid layout could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridLayoutError {
    /// The layout contained no rows.
    #[error("grid layout is empty")]
    Empty,
    /// A row's width differed from the first row.
    #[error("grid layout row {row} has a different width than the first row")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
    },
    /// A character other than `#` or `.` was found.
    #[error("unknown glyph '{glyph}' at column {column}, row {row}")]
    UnknownGlyph {
        /// Character that failed to parse.
        glyph: char,
        /// Column of the character.
        column: usize,
        /// Row of the character.
        row: usize,
    },
    /// The layout dimensions do not fit into grid coordinates.
    #[error("grid layout exceeds the supported dimensions")]
    TooLarge,
}

/// Commands that express all permissible session inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player step, attack or pick up in a direction.
    Move {
        /// Direction of the attempted step.
        direction: Direction,
    },
    /// Requests that the session end immediately.
    Quit,
    /// Input that did not map to any command. Never consumes a turn.
    Unrecognized,
}

/// Unique identifier assigned to an enemy. Equal to its registry index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// How an enemy attack against the player was triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackKind {
    /// The enemy planned to step onto the player's tile.
    Intent,
    /// The enemy ended resolution on the player's tile.
    Contact,
}

/// Reasons a command was rejected without consuming a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// The requested step would leave the grid.
    OutOfBounds,
    /// The input did not map to a command.
    UnrecognizedInput,
    /// The session already ended.
    SessionOver,
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndCause {
    /// The player's health dropped to zero or below.
    PlayerDied,
    /// The player asked to quit.
    Quit,
}

/// Lifecycle of a session as observed by adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// The session is waiting for the next command.
    Active,
    /// The session finished and accepts no further turns.
    Ended(EndCause),
}

impl SessionStatus {
    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::Ended(_))
    }
}

/// Events reported by the world after processing a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The command was rejected and no turn elapsed.
    CommandRejected {
        /// Why the command was rejected.
        reason: RejectionReason,
    },
    /// The player walked into a wall. The turn still elapses.
    WallBumped {
        /// Wall tile the player tried to enter.
        at: Position,
    },
    /// The player moved between two tiles.
    PlayerMoved {
        /// Tile the player occupied before moving.
        from: Position,
        /// Tile the player occupies after moving.
        to: Position,
    },
    /// The player struck an enemy.
    EnemyDamaged {
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Damage dealt by the strike.
        damage: u32,
        /// Hit points the enemy has left.
        remaining: i32,
    },
    /// An enemy died as a result of a player attack.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Tile the enemy occupied.
        at: Position,
        /// Score awarded for the kill.
        score_awarded: u32,
    },
    /// The player drank a potion.
    PotionConsumed {
        /// Tile the potion lay on.
        at: Position,
        /// Amount rolled for the heal before capping.
        rolled: u32,
        /// Health actually restored after capping at the maximum.
        healed: u32,
    },
    /// An enemy advanced one tile toward the player.
    EnemyAdvanced {
        /// Enemy that moved.
        enemy: EnemyId,
        /// Tile the enemy occupied before moving.
        from: Position,
        /// Tile the enemy occupies after moving.
        to: Position,
    },
    /// An enemy stayed in place because its intended tile was unavailable.
    EnemyHeld {
        /// Enemy that stayed.
        enemy: EnemyId,
        /// Tile the enemy intended to enter.
        intended: Position,
    },
    /// An enemy hit the player.
    PlayerAttacked {
        /// Enemy that attacked.
        enemy: EnemyId,
        /// Damage dealt to the player.
        damage: u32,
        /// What triggered the attack.
        kind: AttackKind,
    },
    /// A full turn finished.
    TurnCompleted {
        /// Value of the turn counter after the turn.
        turn: u32,
    },
    /// The session ended.
    SessionEnded {
        /// Why the session ended.
        cause: EndCause,
        /// Score at the moment the session ended.
        final_score: u32,
        /// Whether the final score beats the stored high score.
        new_high_score: bool,
    },
}

/// Preset difficulty levels selectable before the session starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Fewer, weaker enemies and plenty of potions.
    Easy,
    /// The default balance.
    #[default]
    Normal,
    /// Many strong enemies and few potions.
    Hard,
}

impl Difficulty {
    /// Every difficulty in menu order.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Named configuration record applied to map population and combat.
    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile::EASY,
            Self::Normal => DifficultyProfile::NORMAL,
            Self::Hard => DifficultyProfile::HARD,
        }
    }

    /// Human readable label shown in the HUD.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
        }
    }
}

/// Tuning ranges selected by a [`Difficulty`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Number of enemies placed on each generated map.
    pub enemy_count: IntRange,
    /// Starting hit points of each enemy.
    pub enemy_health: IntRange,
    /// Damage dealt by each individual enemy attack.
    pub enemy_attack: IntRange,
    /// Number of potions placed on each generated map.
    pub potion_count: IntRange,
}

impl DifficultyProfile {
    /// Profile used by [`Difficulty::Easy`].
    pub const EASY: Self = Self {
        enemy_count: IntRange::new(2, 4),
        enemy_health: IntRange::new(3, 5),
        enemy_attack: IntRange::new(1, 2),
        potion_count: IntRange::new(5, 7),
    };

    /// Profile used by [`Difficulty::Normal`].
    pub const NORMAL: Self = Self {
        enemy_count: IntRange::new(3, 6),
        enemy_health: IntRange::new(4, 8),
        enemy_attack: IntRange::new(2, 3),
        potion_count: IntRange::new(3, 5),
    };

    /// Profile used by [`Difficulty::Hard`].
    pub const HARD: Self = Self {
        enemy_count: IntRange::new(5, 8),
        enemy_health: IntRange::new(6, 12),
        enemy_attack: IntRange::new(3, 5),
        potion_count: IntRange::new(1, 3),
    };
}

/// Size ranges steering the room generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomLayout {
    /// Number of rooms the generator attempts to place.
    pub room_count: IntRange,
    /// Width of each room in tiles.
    pub room_width: IntRange,
    /// Height of each room in tiles.
    pub room_height: IntRange,
}

impl Default for RoomLayout {
    fn default() -> Self {
        Self {
            room_count: IntRange::new(3, 6),
            room_width: IntRange::new(3, 8),
            room_height: IntRange::new(3, 5),
        }
    }
}

/// Session-wide settings fixed before the first map is generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Number of tile columns in the grid.
    pub columns: u32,
    /// Number of tile rows in the grid.
    pub rows: u32,
    /// Maximum health the player may heal up to.
    pub player_max_health: i32,
    /// Damage dealt by each player attack.
    pub player_attack: u32,
    /// Health restored by a potion before capping.
    pub potion_heal: IntRange,
    /// Score awarded per enemy kill.
    pub kill_score: u32,
    /// Room generator ranges.
    pub rooms: RoomLayout,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 10,
            player_max_health: 20,
            player_attack: 4,
            potion_heal: IntRange::new(6, 10),
            kill_score: 10,
            rooms: RoomLayout::default(),
        }
    }
}

impl SessionConfig {
    /// Checks that the configuration can always produce a playable map.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ranges = [
            ("potion_heal", self.potion_heal),
            ("rooms.room_count", self.rooms.room_count),
            ("rooms.room_width", self.rooms.room_width),
            ("rooms.room_height", self.rooms.room_height),
        ];
        for (name, range) in ranges {
            if range.is_inverted() {
                return Err(ConfigError::InvertedRange {
                    name,
                    min: range.min(),
                    max: range.max(),
                });
            }
        }

        if self.rooms.room_width.min() == 0 || self.rooms.room_height.min() == 0 {
            return Err(ConfigError::EmptyRoom);
        }

        let required_columns = self.rooms.room_width.max().saturating_add(2);
        let required_rows = self.rooms.room_height.max().saturating_add(2);
        if self.columns < required_columns || self.rows < required_rows {
            return Err(ConfigError::GridTooSmall {
                columns: self.columns,
                rows: self.rows,
                required_columns,
                required_rows,
            });
        }

        if self.player_max_health <= 0 || self.player_max_health > HEALTH_CEILING {
            return Err(ConfigError::InvalidMaxHealth {
                value: self.player_max_health,
            });
        }

        Ok(())
    }
}

/// Reasons a [`SessionConfig`] was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A range's lower bound exceeds its upper bound.
    #[error("range `{name}` is inverted ({min} > {max})")]
    InvertedRange {
        /// Name of the offending setting.
        name: &'static str,
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
    /// Rooms could be generated with a zero-length side.
    #[error("rooms must be at least one tile wide and tall")]
    EmptyRoom,
    /// The grid cannot fit the largest room plus its margin.
    #[error(
        "grid {columns}x{rows} cannot fit the largest room; need at least {required_columns}x{required_rows}"
    )]
    GridTooSmall {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
        /// Minimum column count for the room ranges.
        required_columns: u32,
        /// Minimum row count for the room ranges.
        required_rows: u32,
    },
    /// Maximum health must be positive and below the health ceiling.
    #[error("player_max_health must lie in 1..=999 (got {value})")]
    InvalidMaxHealth {
        /// Configured maximum health.
        value: i32,
    },
}

/// Player state captured for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Tile the player occupies.
    pub position: Position,
    /// Current health. May be zero or negative once the session ended.
    pub health: i32,
    /// Maximum health reachable through healing.
    pub max_health: i32,
}

/// Read-only snapshot of everything an adapter needs to draw a frame.
#[derive(Clone, Debug)]
pub struct SessionSnapshot<'a> {
    /// Tile layout of the current map.
    pub grid: &'a Grid,
    /// Player state.
    pub player: PlayerSnapshot,
    /// Positions of live enemies in registry order.
    pub enemies: Vec<Position>,
    /// Positions of remaining potions.
    pub items: Vec<Position>,
    /// Score accumulated this session.
    pub score: u32,
    /// Number of turns elapsed.
    pub turns: u32,
    /// Best score recorded before this session started.
    pub high_score: u32,
    /// Difficulty chosen for the session.
    pub difficulty: Difficulty,
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, Difficulty, Direction, Grid, GridLayoutError, IntRange, Position,
        SessionConfig, TileKind,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_saturates_at_the_edge_of_the_plane() {
        let corner = Position::new(0, 0);
        let far = Position::new(u32::MAX, u32::MAX);
        assert_eq!(corner.manhattan_distance(far), u32::MAX);
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = Position::new(1, 1);
        let destination = Position::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_refuses_to_underflow() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.step(Direction::North), None);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::East), Some(Position::new(1, 0)));
        assert_eq!(origin.step(Direction::South), Some(Position::new(0, 1)));
    }

    #[test]
    fn parse_reads_walls_and_floors() {
        let grid = Grid::parse(
            "
            ####
            #..#
            ####
            ",
        )
        .expect("layout parses");

        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.tile(Position::new(1, 1)), Some(TileKind::Floor));
        assert_eq!(grid.tile(Position::new(0, 1)), Some(TileKind::Wall));
        assert_eq!(grid.tile(Position::new(4, 1)), None);
        assert_eq!(
            grid.floor_positions().collect::<Vec<_>>(),
            vec![Position::new(1, 1), Position::new(2, 1)]
        );
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let error = Grid::parse("###\n##").expect_err("ragged layout must fail");
        assert_eq!(error, GridLayoutError::RaggedRow { row: 1 });
    }

    #[test]
    fn carve_clips_to_bounds() {
        let mut grid = Grid::filled(3, 3, TileKind::Wall);
        assert!(grid.carve(Position::new(2, 2)));
        assert!(!grid.carve(Position::new(3, 0)));
        assert!(grid.is_floor(Position::new(2, 2)));
        assert!(!grid.is_floor(Position::new(3, 0)));
    }

    #[test]
    fn open_interior_keeps_border() {
        let mut grid = Grid::filled(4, 4, TileKind::Wall);
        grid.open_interior();

        assert_eq!(grid.floor_positions().count(), 4);
        assert!(grid.is_floor(Position::new(1, 1)));
        assert!(!grid.is_floor(Position::new(0, 1)));
        assert!(!grid.is_floor(Position::new(3, 3)));
    }

    #[test]
    fn row_exposes_single_line() {
        let grid = Grid::parse("#.\n.#").expect("layout parses");
        assert_eq!(grid.row(1), Some(&[TileKind::Floor, TileKind::Wall][..]));
        assert_eq!(grid.row(2), None);
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn config_rejects_grid_smaller_than_largest_room() {
        let config = SessionConfig {
            columns: 9,
            ..SessionConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooSmall {
                required_columns: 10,
                ..
            })
        ));
    }

    #[test]
    fn config_rejects_inverted_ranges() {
        let config = SessionConfig {
            potion_heal: IntRange::new(10, 6),
            ..SessionConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedRange {
                name: "potion_heal",
                min: 10,
                max: 6,
            })
        );
    }

    #[test]
    fn hard_profile_is_harsher_than_easy() {
        let easy = Difficulty::Easy.profile();
        let hard = Difficulty::Hard.profile();
        assert!(hard.enemy_count.min() > easy.enemy_count.max());
        assert!(hard.potion_count.max() < easy.potion_count.min());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn session_config_round_trips_through_bincode() {
        assert_round_trip(&SessionConfig::default());
    }

    #[test]
    fn difficulty_round_trips_through_bincode() {
        for difficulty in Difficulty::ALL {
            assert_round_trip(&difficulty);
        }
    }
}
