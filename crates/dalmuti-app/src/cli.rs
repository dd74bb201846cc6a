use std::time::Duration;

use clap::Parser;
use dalmuti_bot::BotDifficulty;

use crate::controller::GameSettings;
use crate::scheduler::DEFAULT_DELAY;

/// Console table for the Dalmuti shedding game.
#[derive(Debug, Clone, Parser)]
#[command(name = "dalmuti", author, version, about = "Play Dalmuti against computer opponents")]
pub struct Cli {
    /// Seats at the table, including yours (4-8).
    #[arg(short, long, default_value_t = 4)]
    pub players: usize,

    /// Computer strength: easy, medium (normal) or hard. Falls back to
    /// DALMUTI_BOT_DIFFICULTY, then easy.
    #[arg(short, long, value_name = "LEVEL")]
    pub difficulty: Option<BotDifficulty>,

    /// Seed for the shuffle and computer choices.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Pause before each computer turn.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DELAY.as_millis() as u64)]
    pub delay_ms: u64,

    /// Log filter used when RUST_LOG is unset (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Let a computer take your seat and watch the round.
    #[arg(long)]
    pub auto: bool,
}

impl Cli {
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            player_count: self.players,
            difficulty: self.difficulty.unwrap_or_else(BotDifficulty::from_env),
            seed: self.seed,
            all_computer: self.auto,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Command list printed for `help`.
pub const HELP: &str = "\
play <i>..  (p)  play the cards at those hand indices
pass        (x)  pass this trick
hint        (h)  list the legal plays
restart     (r)  deal a new round
quit        (q)  leave the table";

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(Vec<usize>),
    Pass,
    Hint,
    Help,
    Restart,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err("type 'help' for commands".to_string());
        };
        match head.to_ascii_lowercase().as_str() {
            "play" | "p" => {
                let indices = words
                    .map(|word| {
                        word.parse::<usize>()
                            .map_err(|_| format!("'{word}' is not a card index"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if indices.is_empty() {
                    return Err("choose at least one card index".to_string());
                }
                Ok(Command::Play(indices))
            }
            "pass" | "x" => Ok(Command::Pass),
            "hint" | "h" => Ok(Command::Hint),
            "help" | "?" => Ok(Command::Help),
            "restart" | "r" => Ok(Command::Restart),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use dalmuti_bot::BotDifficulty;

    #[test]
    fn defaults_match_the_table_setup() {
        let cli = Cli::parse_from(["dalmuti"]);
        assert_eq!(cli.players, 4);
        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.delay_ms, 1000);
        assert!(!cli.settings().all_computer);
    }

    #[test]
    fn flags_feed_settings() {
        let cli = Cli::parse_from([
            "dalmuti", "--players", "6", "--difficulty", "normal", "--seed", "42", "--auto",
        ]);
        let settings = cli.settings();
        assert_eq!(settings.player_count, 6);
        assert_eq!(settings.difficulty, BotDifficulty::Medium);
        assert_eq!(settings.seed, Some(42));
        assert!(settings.all_computer);
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        assert!(Cli::try_parse_from(["dalmuti", "--difficulty", "brutal"]).is_err());
    }

    #[test]
    fn commands_parse() {
        assert_eq!(Command::parse("p 0 3"), Ok(Command::Play(vec![0, 3])));
        assert_eq!(Command::parse("  PASS "), Ok(Command::Pass));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert_eq!(Command::parse("h"), Ok(Command::Hint));
        assert_eq!(Command::parse("help"), Ok(Command::Help));
        assert_eq!(Command::parse("?"), Ok(Command::Help));
        assert!(Command::parse("play").is_err());
        assert!(Command::parse("play one").is_err());
        assert!(Command::parse("").is_err());
    }
}
