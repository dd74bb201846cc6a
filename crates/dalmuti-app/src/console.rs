use std::fmt::Write;

use dalmuti_bot::BotAction;
use dalmuti_core::game::serialization::RoundSnapshot;
use dalmuti_core::model::rank::title_for_place;
use dalmuti_core::model::round::FinishedPlayer;
use dalmuti_core::model::trick::format_cards;

use crate::controller::AutoplayStep;

/// Text table for the viewer: seats, pile, and the viewer's indexed hand.
pub fn render_table(snapshot: &RoundSnapshot) -> String {
    let mut out = String::new();
    let seats = snapshot.players.len();
    let _ = writeln!(out);
    for player in &snapshot.players {
        let marker = if player.id == snapshot.current_player && !snapshot.round_finished {
            ">"
        } else {
            " "
        };
        let status = match player.finish_rank {
            Some(rank) => format!("out, place {rank} ({})", title_for_place(rank, seats)),
            None if snapshot.passed_players.contains(&player.id) => {
                format!("{} cards, passed", player.cards)
            }
            None => format!("{} cards", player.cards),
        };
        let _ = writeln!(out, "{marker} {:<12} {status}", player.name);
    }

    match &snapshot.last_played {
        Some(play) => {
            let _ = writeln!(out, "Pile: {} by {}", format_cards(&play.cards), play.player);
        }
        None => {
            let _ = writeln!(out, "Pile: empty, any group may lead");
        }
    }
    if snapshot.revolution {
        let _ = writeln!(out, "Revolution! Higher numbers win.");
    }

    if !snapshot.hand.is_empty() {
        let indices: Vec<String> = (0..snapshot.hand.len()).map(|idx| format!("{idx:>2}")).collect();
        let cards: Vec<String> = snapshot.hand.iter().map(|card| format!("{card:>2}")).collect();
        let _ = writeln!(out, "Index: {}", indices.join(" "));
        let _ = writeln!(out, "Hand:  {}", cards.join(" "));
    }
    out
}

pub fn describe_step(snapshot: &RoundSnapshot, step: &AutoplayStep) -> String {
    let name = snapshot
        .players
        .get(step.player.index())
        .map(|player| player.name.as_str())
        .unwrap_or("?");
    match &step.action {
        BotAction::Play { cards, .. } => format!("{name} plays {}", format_cards(cards)),
        BotAction::Pass => format!("{name} passes"),
    }
}

pub fn render_results(snapshot: &RoundSnapshot, order: &[FinishedPlayer]) -> String {
    let mut out = String::from("\nFinal ranking\n");
    for entry in order {
        let name = snapshot
            .players
            .get(entry.player.index())
            .map(|player| player.name.as_str())
            .unwrap_or("?");
        let title = title_for_place(entry.rank, snapshot.players.len());
        let _ = writeln!(out, "{:>2}. {name} ({title})", entry.rank);
    }
    out
}
