use std::sync::Arc;
use std::time::Duration;

use dalmuti_app::{GameController, GameSettings, SharedController, TurnScheduler};
use dalmuti_bot::BotDifficulty;
use dalmuti_core::model::player::PlayerId;
use parking_lot::Mutex;

fn table(seed: u64, players: usize) -> SharedController {
    let settings = GameSettings {
        player_count: players,
        difficulty: BotDifficulty::Easy,
        seed: Some(seed),
        all_computer: false,
    };
    Arc::new(Mutex::new(GameController::start_game(settings).unwrap()))
}

/// The human always takes the weakest legal group, or passes.
fn human_move(controller: &SharedController) {
    let mut guard = controller.lock();
    match guard.legal_plays().pop() {
        Some(cards) => {
            let indices = guard
                .round()
                .current_player()
                .hand()
                .indices_of(&cards)
                .unwrap();
            guard.play_turn(&indices).unwrap();
        }
        None => {
            guard.pass_turn().unwrap();
        }
    }
}

#[tokio::test(start_paused = true)]
async fn human_and_computers_finish_a_round() {
    for (seed, players) in [(1_u64, 4_usize), (2, 6), (3, 8)] {
        let controller = table(seed, players);
        let scheduler = TurnScheduler::new(Arc::clone(&controller), Duration::from_millis(1000));

        let mut steps = 0;
        while controller.lock().round_finished().is_none() {
            steps += 1;
            assert!(steps < 5_000, "seed {seed} did not finish");
            if controller.lock().is_human_turn() {
                human_move(&controller);
            } else {
                scheduler.spawn().await.unwrap();
            }
        }

        let guard = controller.lock();
        let order = guard.round_finished().unwrap();
        assert_eq!(order.len(), players);
        let places: Vec<u8> = order.iter().map(|entry| entry.rank).collect();
        assert_eq!(places, (1..=players as u8).collect::<Vec<_>>());
        let last = order.last().unwrap().player;
        assert_eq!(
            guard.round().cards_in_hands(),
            guard.round().players()[last.index()].hand().len()
        );
    }
}

#[test]
fn snapshot_hides_other_hands() {
    let controller = table(11, 5);
    let guard = controller.lock();
    let snapshot = guard.snapshot(PlayerId(0));
    assert_eq!(snapshot.hand.len(), snapshot.players[0].cards);
    let json = guard.snapshot_json(PlayerId(0)).unwrap();
    assert!(json.contains("\"viewer\""));
    assert!(json.contains("\"current_player\""));
}
