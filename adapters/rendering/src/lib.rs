#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text presentation contracts for Delve adapters.
//!
//! Everything here is a pure function of core types: frames are produced
//! from a [`SessionSnapshot`], raw input lines are translated into
//! [`Command`] values and [`Event`] values are turned into player-facing
//! messages.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use delve_core::{
    AttackKind, Command, Difficulty, Direction, EndCause, Event, Position, RejectionReason,
    SessionSnapshot, TileKind,
};

/// Title line printed at the top of every frame.
pub const TITLE: &str = "=== Delve ===";

/// Key bindings reminder printed below the title.
pub const CONTROLS: &str = "Controls: w=up a=left s=down d=right    q=quit";

/// Goal reminder printed below the controls.
pub const OBJECTIVE: &str =
    "Objective: survive, kill enemies for score, pick potions '!' to heal.";

/// Prompt shown before reading a move.
pub const MOVE_PROMPT: &str = "Enter move (w/a/s/d) or q to quit: ";

/// Prompt shown before reading the difficulty choice.
pub const DIFFICULTY_PROMPT: &str = "Choose difficulty: 1) Easy  2) Normal  3) Hard  : ";

/// Line printed once the session loop exits.
pub const FAREWELL: &str = "Thanks for playing!";

const WALL_GLYPH: char = '#';
const FLOOR_GLYPH: char = '.';
const POTION_GLYPH: char = '!';
const ENEMY_GLYPH: char = 'E';
const PLAYER_GLYPH: char = '@';

/// Renders the complete text frame for the provided snapshot.
///
/// Layers are drawn in order tiles, potions, enemies, player, so later
/// layers hide earlier ones on shared tiles.
#[must_use]
pub fn render_frame(snapshot: &SessionSnapshot<'_>) -> String {
    let mut frame = String::new();
    for line in [TITLE, CONTROLS, OBJECTIVE] {
        frame.push_str(line);
        frame.push('\n');
    }
    frame.push('\n');

    frame.push_str(&hud_line(snapshot));
    frame.push_str("\n\n");

    for row in map_rows(snapshot) {
        frame.push_str(&row);
        frame.push('\n');
    }
    frame.push('\n');
    frame
}

/// Writes a rendered frame to `out` and flushes it.
pub fn write_frame<W: Write>(out: &mut W, snapshot: &SessionSnapshot<'_>) -> AnyResult<()> {
    out.write_all(render_frame(snapshot).as_bytes())
        .context("failed to write frame")?;
    out.flush().context("failed to flush frame")
}

/// Status line summarising difficulty, health, score, turns and record.
#[must_use]
pub fn hud_line(snapshot: &SessionSnapshot<'_>) -> String {
    format!(
        "Diff: {}    HP: {}/{}    Score: {}    Turns: {}    High: {}",
        snapshot.difficulty.label(),
        snapshot.player.health,
        snapshot.player.max_health,
        snapshot.score,
        snapshot.turns,
        snapshot.high_score
    )
}

fn map_rows(snapshot: &SessionSnapshot<'_>) -> Vec<String> {
    let grid = snapshot.grid;
    let mut canvas: Vec<Vec<char>> = (0..grid.rows())
        .map(|y| {
            grid.row(y)
                .unwrap_or_default()
                .iter()
                .map(|tile| match tile {
                    TileKind::Wall => WALL_GLYPH,
                    TileKind::Floor => FLOOR_GLYPH,
                })
                .collect()
        })
        .collect();

    let mut paint = |position: Position, glyph: char| {
        let cell = usize::try_from(position.y())
            .ok()
            .zip(usize::try_from(position.x()).ok())
            .and_then(|(y, x)| canvas.get_mut(y)?.get_mut(x));
        if let Some(cell) = cell {
            *cell = glyph;
        }
    };

    for item in &snapshot.items {
        paint(*item, POTION_GLYPH);
    }
    for enemy in &snapshot.enemies {
        paint(*enemy, ENEMY_GLYPH);
    }
    paint(snapshot.player.position, PLAYER_GLYPH);

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect()
}

/// Translates one line of player input into a command.
///
/// Only the first non-whitespace character matters and case is ignored.
#[must_use]
pub fn parse_command(input: &str) -> Command {
    let Some(key) = input.trim_start().chars().next() else {
        return Command::Unrecognized;
    };

    match key.to_ascii_lowercase() {
        'w' => Command::Move {
            direction: Direction::North,
        },
        'a' => Command::Move {
            direction: Direction::West,
        },
        's' => Command::Move {
            direction: Direction::South,
        },
        'd' => Command::Move {
            direction: Direction::East,
        },
        'q' => Command::Quit,
        _ => Command::Unrecognized,
    }
}

/// Interprets the answer to [`DIFFICULTY_PROMPT`].
///
/// `1` selects Easy, `3` selects Hard and anything else selects Normal.
#[must_use]
pub fn parse_difficulty(input: &str) -> Difficulty {
    match input.trim().parse::<i64>() {
        Ok(1) => Difficulty::Easy,
        Ok(3) => Difficulty::Hard,
        _ => Difficulty::Normal,
    }
}

/// Closing lines printed under the final frame when the player dies.
///
/// The turn count shares the first line with the score. A record is
/// announced on the second line, otherwise the standing high score is shown.
#[must_use]
pub fn death_report(snapshot: &SessionSnapshot<'_>, new_high_score: bool) -> String {
    let summary = format!(
        "You died! Final score: {}   Turns: {}",
        snapshot.score, snapshot.turns
    );
    if new_high_score {
        format!("{summary}\nNew high score!")
    } else {
        format!("{summary}\nHigh score: {}", snapshot.high_score)
    }
}

/// Player-facing message for an event, if it warrants one.
///
/// Movement and turn bookkeeping are visible on the map and stay silent.
#[must_use]
pub fn describe(event: &Event) -> Option<String> {
    let message = match event {
        Event::CommandRejected { reason } => match reason {
            RejectionReason::OutOfBounds => "Cannot move out of bounds.".to_owned(),
            RejectionReason::UnrecognizedInput => "Unknown input. Use w/a/s/d.".to_owned(),
            RejectionReason::SessionOver => "The session has already ended.".to_owned(),
        },
        Event::WallBumped { .. } => "Bumped into a wall.".to_owned(),
        Event::EnemyDamaged {
            damage, remaining, ..
        } => {
            if *remaining > 0 {
                format!("You attack the enemy for {damage} damage!\nEnemy HP left: {remaining}")
            } else {
                format!("You attack the enemy for {damage} damage!")
            }
        }
        Event::EnemyKilled { score_awarded, .. } => {
            format!("Enemy defeated! +{score_awarded} score.")
        }
        Event::PotionConsumed { rolled, healed, .. } => {
            format!("Picked up a potion! Healed {healed} HP (+{rolled} roll, capped).")
        }
        Event::PlayerAttacked { damage, kind, .. } => match kind {
            AttackKind::Intent => format!("An enemy attacks you for {damage} damage!"),
            AttackKind::Contact => {
                format!("An enemy hits you for {damage} damage (bumped into you)!")
            }
        },
        Event::SessionEnded {
            cause,
            final_score,
            new_high_score,
        } => {
            let mut message = match cause {
                EndCause::PlayerDied => format!("You died! Final score: {final_score}"),
                EndCause::Quit => format!("Quitting. Final score: {final_score}"),
            };
            if *new_high_score {
                message.push_str("\nNew high score!");
            }
            message
        }
        Event::PlayerMoved { .. }
        | Event::EnemyAdvanced { .. }
        | Event::EnemyHeld { .. }
        | Event::TurnCompleted { .. } => return None,
    };

    Some(message)
}
