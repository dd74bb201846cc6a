use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::AgentConfig;
use crate::tournament::GameOutcome;

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates finishing places per agent across the tournament.
pub struct AnalyticsCollector {
    agents: HashMap<String, AgentAccumulator>,
    agent_order: Vec<String>,
    games: usize,
}

impl AnalyticsCollector {
    pub fn new(configs: &[AgentConfig]) -> Self {
        let agents = configs
            .iter()
            .map(|agent| (agent.name.clone(), AgentAccumulator::default()))
            .collect();
        Self {
            agents,
            agent_order: configs.iter().map(|agent| agent.name.clone()).collect(),
            games: 0,
        }
    }

    pub fn record_game(&mut self, outcome: &GameOutcome) -> Result<(), AnalyticsError> {
        self.games += 1;
        for seat in &outcome.seat_results {
            let acc = self
                .agents
                .get_mut(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;
            acc.places.push(f64::from(seat.finish_rank));
            if seat.finish_rank == 1 {
                acc.first_places += 1;
            }
            acc.revolutions += seat.revolutions;
            acc.decisions += u64::from(seat.decisions);
            acc.total_ms += seat.avg_ms_per_decision * f64::from(seat.decisions);
        }
        Ok(())
    }

    pub fn finalize(mut self, players: usize) -> AnalyticsSummary {
        let agents = self
            .agent_order
            .iter()
            .filter_map(|name| {
                self.agents
                    .remove(name)
                    .map(|acc| acc.into_report(name.clone()))
            })
            .collect();
        AnalyticsSummary {
            games: self.games,
            players,
            agents,
        }
    }
}

#[derive(Default)]
struct AgentAccumulator {
    places: Vec<f64>,
    first_places: u32,
    revolutions: u32,
    decisions: u64,
    total_ms: f64,
}

impl AgentAccumulator {
    fn into_report(self, name: String) -> AgentReport {
        let seats_played = self.places.len();
        let mean_rank = mean(&self.places);
        AgentReport {
            name,
            seats_played,
            mean_rank,
            ci95: confidence_interval(&self.places),
            first_place_rate: if seats_played == 0 {
                0.0
            } else {
                f64::from(self.first_places) / seats_played as f64
            },
            revolutions: self.revolutions,
            average_ms_per_decision: if self.decisions == 0 {
                0.0
            } else {
                self.total_ms / self.decisions as f64
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub games: usize,
    pub players: usize,
    pub agents: Vec<AgentReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    /// One entry per seat occupied; an agent may hold several seats a game.
    pub seats_played: usize,
    pub mean_rank: f64,
    pub ci95: (f64, f64),
    pub first_place_rate: f64,
    pub revolutions: u32,
    pub average_ms_per_decision: f64,
}

impl AnalyticsSummary {
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Tournament Summary\n\n");
        let _ = writeln!(
            out,
            "{} games at {} seats. Lower mean finishing rank is better.\n",
            self.games, self.players
        );
        out.push_str("| Agent | Seats | Mean rank | 95% CI | First place | Revolutions | Avg ms/decision |\n");
        out.push_str("|-------|-------|-----------|--------|-------------|-------------|-----------------|\n");
        for agent in &self.agents {
            let _ = writeln!(
                out,
                "| {name} | {seats} | {mean:.3} | [{low:.3}, {high:.3}] | {first:.1}% | {revs} | {ms:.3} |",
                name = agent.name,
                seats = agent.seats_played,
                mean = agent.mean_rank,
                low = agent.ci95.0,
                high = agent.ci95.1,
                first = agent.first_place_rate * 100.0,
                revs = agent.revolutions,
                ms = agent.average_ms_per_decision,
            );
        }
        out
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|source| AnalyticsError::Io {
            context: "writing summary markdown",
            source,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Normal-approximation interval around the mean.
fn confidence_interval(values: &[f64]) -> (f64, f64) {
    let center = mean(values);
    if values.len() < 2 {
        return (center, center);
    }
    let variance = values
        .iter()
        .map(|value| (value - center).powi(2))
        .sum::<f64>()
        / (values.len() as f64 - 1.0);
    let std_error = (variance / values.len() as f64).sqrt();
    let margin = z_score(CONFIDENCE_LEVEL) * std_error;
    (center - margin, center + margin)
}

fn z_score(level: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.inverse_cdf(0.5 + level / 2.0),
        Err(_) => 1.96,
    }
}
