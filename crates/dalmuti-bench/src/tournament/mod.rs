mod rotation;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use dalmuti_bot::{BotAction, BotDifficulty, HeuristicPolicy, Policy, PolicyContext};
use dalmuti_core::game::game_state::GameState;
use dalmuti_core::model::deck::SetupError;
use dalmuti_core::model::player::{Controller, Player, PlayerId};
use dalmuti_core::model::rank::{Rank, title_for_place};
use dalmuti_core::model::round::PlayError;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{AgentConfig, BenchmarkConfig, ResolvedOutputs};

pub use rotation::seating_for_game;

/// Upper bound on turns in one game; a legal game ends far sooner.
const MAX_TURNS_PER_GAME: u32 = 5_000;

/// Plays every configured game between computer agents and records where
/// each seat finished.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    logging_enabled: bool,
}

pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

impl TournamentRunner {
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = config
            .agents
            .iter()
            .map(AgentBlueprint::from_config)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
        })
    }

    /// Runs the tournament, streaming one JSONL row per seat per game.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(&self.config.agents);
        let mut rows_written = 0usize;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let outcome = self.play_game(game_index, game_seed)?;
            analytics.record_game(&outcome)?;
            rows_written += write_game_rows(&mut writer, &self.config.run_id, game_index, game_seed, &outcome)?;
        }

        writer.flush()?;

        let summary = analytics.finalize(self.config.games.players);
        summary.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    /// Plays one game to completion with agents seated by rotation.
    pub fn play_game(&self, game_index: usize, game_seed: u64) -> Result<GameOutcome, RunnerError> {
        let players = self.config.games.players;
        let seating = seating_for_game(game_index, players, self.agents.len());

        let roster = seating
            .iter()
            .enumerate()
            .map(|(seat, &agent)| {
                Player::new(PlayerId(seat), self.agents[agent].name.clone(), Controller::Computer)
            })
            .collect();
        let mut game = GameState::with_players(roster, game_seed)?;

        let mut seats: Vec<SeatState> = seating
            .iter()
            .enumerate()
            .map(|(seat, &agent)| SeatState::new(&self.agents[agent], game_seed, seat))
            .collect();

        while !game.is_finished() {
            let turn = game.round().turn_number();
            if turn >= MAX_TURNS_PER_GAME {
                return Err(RunnerError::Stalled { game_index, turns: turn });
            }

            let seat_index = game.round().current_player_index();
            let action = {
                let ctx = PolicyContext::for_current(game.round());
                let seat = &mut seats[seat_index];
                let start = Instant::now();
                let action = seat.policy.choose_action(&ctx);
                seat.record_decision(start.elapsed().as_secs_f64() * 1000.0);
                action
            };

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "dalmuti_bench::turn",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    game_index = game_index as u32,
                    seat = seat_index as u32,
                    agent = %seats[seat_index].agent_name,
                    action = %describe(&action),
                    revolution = game.round().is_revolution()
                );
            }

            let round = game.round_mut();
            match &action {
                BotAction::Play { indices, .. } => {
                    let outcome = round
                        .play_turn(indices)
                        .map_err(|source| RunnerError::Play { game_index, source })?;
                    if outcome.revolution_toggled {
                        seats[seat_index].revolutions += 1;
                    }
                }
                BotAction::Pass => {
                    round
                        .pass_turn()
                        .map_err(|source| RunnerError::Play { game_index, source })?;
                }
            }
        }

        let round = game.round();
        let seat_results = seats
            .into_iter()
            .enumerate()
            .map(|(seat, state)| {
                let finish_rank = round.players()[seat].finish_rank().unwrap_or(players as u8);
                SeatResult {
                    seat,
                    agent_name: state.agent_name,
                    difficulty: state.difficulty,
                    finish_rank,
                    revolutions: state.revolutions,
                    decisions: state.decisions,
                    avg_ms_per_decision: if state.decisions == 0 {
                        0.0
                    } else {
                        state.total_ms / state.decisions as f64
                    },
                }
            })
            .collect();

        Ok(GameOutcome {
            turns: round.turn_number(),
            seat_results,
        })
    }
}

fn describe(action: &BotAction) -> String {
    match action {
        BotAction::Play { cards, .. } => cards
            .iter()
            .map(Rank::to_string)
            .collect::<Vec<_>>()
            .join(","),
        BotAction::Pass => "pass".to_string(),
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_rows(
    writer: &mut BufWriter<File>,
    run_id: &str,
    game_index: usize,
    game_seed: u64,
    outcome: &GameOutcome,
) -> Result<usize, RunnerError> {
    let game_id = format!("G{game_index:05}");
    let seating: Vec<String> = outcome
        .seat_results
        .iter()
        .map(|seat| seat.agent_name.clone())
        .collect();

    for seat in &outcome.seat_results {
        let row = GameLogRow {
            run_id: run_id.to_string(),
            game_id: game_id.clone(),
            game_index,
            game_seed,
            seat: seat.seat,
            bot: seat.agent_name.clone(),
            difficulty: seat.difficulty.as_str(),
            seating: seating.clone(),
            finish_rank: seat.finish_rank,
            title: title_for_place(seat.finish_rank, seating.len()),
            revolutions: seat.revolutions,
            turns: outcome.turns,
            decisions: seat.decisions,
            speed_ms_turn: seat.avg_ms_per_decision,
        };
        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
    }

    Ok(outcome.seat_results.len())
}

#[derive(Debug, Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    game_seed: u64,
    seat: usize,
    bot: String,
    difficulty: &'static str,
    seating: Vec<String>,
    finish_rank: u8,
    title: &'static str,
    revolutions: u32,
    turns: u32,
    decisions: u32,
    speed_ms_turn: f64,
}

#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub turns: u32,
    pub seat_results: Vec<SeatResult>,
}

#[derive(Debug, Clone)]
pub struct SeatResult {
    pub seat: usize,
    pub agent_name: String,
    pub difficulty: BotDifficulty,
    pub finish_rank: u8,
    pub revolutions: u32,
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
}

#[derive(Debug, Clone)]
struct AgentBlueprint {
    name: String,
    difficulty: BotDifficulty,
}

impl AgentBlueprint {
    fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let difficulty = config
            .difficulty()
            .map_err(|message| AgentError::InvalidParam {
                name: config.name.clone(),
                message,
            })?;
        Ok(Self {
            name: config.name.clone(),
            difficulty,
        })
    }
}

struct SeatState {
    agent_name: String,
    difficulty: BotDifficulty,
    policy: Box<dyn Policy>,
    revolutions: u32,
    decisions: u32,
    total_ms: f64,
}

impl SeatState {
    fn new(agent: &AgentBlueprint, game_seed: u64, seat: usize) -> Self {
        let seed = game_seed ^ (seat as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Self {
            agent_name: agent.name.clone(),
            difficulty: agent.difficulty,
            policy: Box::new(HeuristicPolicy::with_seed(agent.difficulty, seed)),
            revolutions: 0,
            decisions: 0,
            total_ms: 0.0,
        }
    }

    fn record_decision(&mut self, elapsed_ms: f64) {
        self.decisions += 1;
        self.total_ms += elapsed_ms;
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("table setup failed: {0}")]
    Setup(#[from] SetupError),
    #[error("game {game_index}: computer move rejected: {source}")]
    Play {
        game_index: usize,
        #[source]
        source: PlayError,
    },
    #[error("game {game_index} did not finish after {turns} turns")]
    Stalled { game_index: usize, turns: u32 },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid parameter for agent '{name}': {message}")]
    InvalidParam { name: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(agents: &[(&str, &str)], players: usize) -> BenchmarkConfig {
        let agents_yaml: String = agents
            .iter()
            .map(|(name, difficulty)| {
                format!("  - name: \"{name}\"\n    params:\n      difficulty: \"{difficulty}\"\n")
            })
            .collect();
        let yaml = format!(
            "run_id: \"unit\"\ngames:\n  seed: 9\n  count: 3\n  players: {players}\nagents:\n{agents_yaml}outputs:\n  jsonl: \"games.jsonl\"\n  summary_md: \"summary.md\"\n"
        );
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("yaml");
        cfg.validate().expect("valid");
        cfg
    }

    #[test]
    fn every_game_assigns_each_place_once() {
        let cfg = config(&[("easy", "easy"), ("hard", "hard")], 6);
        let outputs = cfg.resolved_outputs();
        let runner = TournamentRunner::new(cfg, outputs).unwrap();
        for game_index in 0..4 {
            let outcome = runner.play_game(game_index, 1000 + game_index as u64).unwrap();
            let mut places: Vec<u8> = outcome.seat_results.iter().map(|s| s.finish_rank).collect();
            places.sort_unstable();
            assert_eq!(places, vec![1, 2, 3, 4, 5, 6]);
            assert!(outcome.turns > 0);
        }
    }

    #[test]
    fn same_seed_same_outcome() {
        let cfg = config(&[("a", "easy"), ("b", "medium"), ("c", "hard")], 5);
        let outputs = cfg.resolved_outputs();
        let runner = TournamentRunner::new(cfg, outputs).unwrap();
        let first = runner.play_game(2, 77).unwrap();
        let second = runner.play_game(2, 77).unwrap();
        let ranks = |outcome: &GameOutcome| {
            outcome
                .seat_results
                .iter()
                .map(|s| (s.agent_name.clone(), s.finish_rank, s.revolutions))
                .collect::<Vec<_>>()
        };
        assert_eq!(ranks(&first), ranks(&second));
        assert_eq!(first.turns, second.turns);
    }

    #[test]
    fn seating_follows_rotation() {
        let cfg = config(&[("a", "easy"), ("b", "hard")], 4);
        let outputs = cfg.resolved_outputs();
        let runner = TournamentRunner::new(cfg, outputs).unwrap();
        let outcome = runner.play_game(1, 5).unwrap();
        let names: Vec<&str> = outcome.seat_results.iter().map(|s| s.agent_name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "b", "a"]);
        assert_eq!(outcome.seat_results[0].difficulty, BotDifficulty::Hard);
    }
}
