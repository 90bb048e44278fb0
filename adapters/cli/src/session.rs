//! Interactive turn loop connecting terminal IO to the world.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use delve_core::{EndCause, Event, RandomSource};
use delve_persistence::HighScoreStore;
use delve_rendering::{death_report, describe, parse_command, write_frame, MOVE_PROMPT};
use delve_world::{apply, query, World};
use log::warn;

/// Plays `world` until it ends or `input` closes.
///
/// A new record is written to `store` once, right after the session ends.
/// Failing to write it is reported as a warning line and never aborts.
pub(crate) fn run<R: BufRead, W: Write>(
    world: &mut World,
    rng: &mut dyn RandomSource,
    store: &mut dyn HighScoreStore,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let mut events = Vec::new();
    let mut line = String::new();

    loop {
        write_frame(output, &query::snapshot(world))?;
        write!(output, "{MOVE_PROMPT}").context("failed to write prompt")?;
        output.flush().context("failed to flush prompt")?;

        line.clear();
        let read = input.read_line(&mut line).context("failed to read move")?;
        if read == 0 {
            writeln!(output).context("failed to write to output")?;
            return Ok(());
        }

        events.clear();
        apply(world, parse_command(&line), rng, &mut events);

        let mut ending = None;
        for event in &events {
            if let Event::SessionEnded {
                cause,
                final_score,
                new_high_score,
            } = *event
            {
                ending = Some((event, cause, final_score, new_high_score));
                continue;
            }
            if let Some(message) = describe(event) {
                writeln!(output, "{message}").context("failed to write message")?;
            }
        }

        let Some((event, cause, final_score, new_high_score)) = ending else {
            continue;
        };

        let closing = match cause {
            EndCause::PlayerDied => {
                let snapshot = query::snapshot(world);
                write_frame(output, &snapshot)?;
                Some(death_report(&snapshot, new_high_score))
            }
            EndCause::Quit => describe(event),
        };
        if let Some(message) = closing {
            writeln!(output, "{message}").context("failed to write message")?;
        }

        if new_high_score {
            if let Err(error) = store.save(final_score) {
                warn!("{error}");
                writeln!(output, "Warning: could not write high score")
                    .context("failed to write message")?;
            }
        }
        return Ok(());
    }
}
