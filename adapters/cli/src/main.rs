#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Delve session in the terminal.

mod session;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use delve_core::{Difficulty, SeededRandom, SessionConfig};
use delve_persistence::{load_or_default, FileHighScoreStore, DEFAULT_HIGH_SCORE_FILE};
use delve_rendering::{parse_difficulty, DIFFICULTY_PROMPT, FAREWELL};
use delve_world::World;
use log::info;
use serde::Deserialize;

/// Command-line arguments accepted by the Delve binary.
#[derive(Debug, Parser)]
#[command(name = "delve", version, about = "Turn-based dungeon crawler for the terminal")]
struct CliArgs {
    /// Difficulty preset; prompts interactively when omitted.
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Seed for map generation and combat rolls; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// File holding the best score across sessions.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,
    /// TOML file overriding session settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

/// Contents of the optional `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    difficulty: Option<Difficulty>,
    seed: Option<u64>,
    session: SessionConfig,
}

/// Entry point for the Delve command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();
    let file = match args.config.as_deref() {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };
    file.session
        .validate()
        .context("session configuration is invalid")?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let chosen = args.difficulty.map(Difficulty::from).or(file.difficulty);
    let Some(difficulty) = resolve_difficulty(chosen, &mut input, &mut output)? else {
        return Ok(());
    };

    let seed = args.seed.or(file.seed).unwrap_or_else(rand::random);
    info!("using seed {seed}");

    let mut store = FileHighScoreStore::new(&args.high_score_file);
    let high_score = load_or_default(&store);
    let mut rng = SeededRandom::from_seed(seed);
    let mut world = World::new(file.session, difficulty, high_score, &mut rng)
        .context("failed to create the session")?;

    writeln!(output, "High score saved in {}\n", store.path().display())
        .context("failed to write to stdout")?;

    session::run(&mut world, &mut rng, &mut store, &mut input, &mut output)?;

    writeln!(output, "{FAREWELL}").context("failed to write to stdout")?;
    Ok(())
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Returns the difficulty to play, prompting when none was preselected.
///
/// `None` means the input closed before an answer arrived.
fn resolve_difficulty<R: BufRead, W: Write>(
    chosen: Option<Difficulty>,
    input: &mut R,
    output: &mut W,
) -> Result<Option<Difficulty>> {
    if let Some(difficulty) = chosen {
        return Ok(Some(difficulty));
    }

    write!(output, "{DIFFICULTY_PROMPT}").context("failed to write prompt")?;
    output.flush().context("failed to flush prompt")?;

    let mut answer = String::new();
    let read = input
        .read_line(&mut answer)
        .context("failed to read difficulty")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(parse_difficulty(&answer)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_into_arguments() {
        let args = CliArgs::try_parse_from([
            "delve",
            "--difficulty",
            "hard",
            "--seed",
            "42",
            "--high-score-file",
            "scores.txt",
        ])
        .expect("flags are valid");

        assert_eq!(args.difficulty, Some(DifficultyArg::Hard));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.high_score_file, PathBuf::from("scores.txt"));
        assert_eq!(args.config, None);
    }

    #[test]
    fn high_score_file_has_a_default() {
        let args = CliArgs::try_parse_from(["delve"]).expect("no flags are required");
        assert_eq!(args.high_score_file, PathBuf::from(DEFAULT_HIGH_SCORE_FILE));
        assert_eq!(args.difficulty, None);
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        assert!(CliArgs::try_parse_from(["delve", "--difficulty", "nightmare"]).is_err());
    }

    #[test]
    fn config_file_overrides_selected_fields() {
        let file: ConfigFile = toml::from_str(
            r#"
            difficulty = "easy"
            seed = 7

            [session]
            columns = 30
            rows = 12
            kill_score = 15

            [session.potion_heal]
            min = 2
            max = 4
            "#,
        )
        .expect("config parses");

        assert_eq!(file.difficulty, Some(Difficulty::Easy));
        assert_eq!(file.seed, Some(7));
        assert_eq!(file.session.columns, 30);
        assert_eq!(file.session.rows, 12);
        assert_eq!(file.session.kill_score, 15);
        assert_eq!(file.session.potion_heal.max(), 4);
        assert_eq!(
            file.session.player_max_health,
            SessionConfig::default().player_max_health
        );
        assert!(file.session.validate().is_ok());
    }

    #[test]
    fn config_file_rejects_unknown_keys() {
        let parsed: std::result::Result<ConfigFile, _> = toml::from_str("[session]\nlives = 3\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_config_file_reports_its_path() {
        let path = std::env::temp_dir().join("delve-no-such-config.toml");
        let error = load_config_file(&path).expect_err("file does not exist");
        assert!(format!("{error}").contains("delve-no-such-config.toml"));
    }

    #[test]
    fn difficulty_prompt_reads_one_answer() {
        let mut input = io::Cursor::new("3\nw\n");
        let mut output = Vec::new();

        let difficulty =
            resolve_difficulty(None, &mut input, &mut output).expect("in-memory io never fails");

        assert_eq!(difficulty, Some(Difficulty::Hard));
        assert_eq!(
            String::from_utf8(output).expect("prompt is utf-8"),
            DIFFICULTY_PROMPT
        );
    }

    #[test]
    fn preselected_difficulty_skips_prompt() {
        let mut input = io::Cursor::new("");
        let mut output = Vec::new();

        let difficulty = resolve_difficulty(Some(Difficulty::Easy), &mut input, &mut output)
            .expect("in-memory io never fails");

        assert_eq!(difficulty, Some(Difficulty::Easy));
        assert!(output.is_empty());
    }

    #[test]
    fn closed_input_yields_no_difficulty() {
        let mut input = io::Cursor::new("");
        let mut output = Vec::new();

        let difficulty =
            resolve_difficulty(None, &mut input, &mut output).expect("in-memory io never fails");

        assert_eq!(difficulty, None);
    }
}
