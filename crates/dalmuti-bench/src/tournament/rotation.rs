/// Agent index for every seat in game `game_index`: seat `s` gets agent
/// `(s + game_index) % agent_count`, so over enough games every agent sits in
/// every position.
pub fn seating_for_game(game_index: usize, players: usize, agent_count: usize) -> Vec<usize> {
    if agent_count == 0 {
        return Vec::new();
    }
    (0..players)
        .map(|seat| (seat + game_index) % agent_count)
        .collect()
}
