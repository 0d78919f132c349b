use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use common::games::tictactoe::{Cell, Game, Mark, Move, MoveRejection, winning_combination};
use common::{GameId, log};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    InvalidArgument(String),
    NotFound(String),
    FailedPrecondition(String),
}

impl StoreError {
    pub(crate) fn game_not_found() -> Self {
        StoreError::NotFound("Game not found".to_string())
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidArgument(message) => write!(f, "invalid argument: {}", message),
            StoreError::NotFound(message) => write!(f, "not found: {}", message),
            StoreError::FailedPrecondition(message) => write!(f, "failed precondition: {}", message),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<MoveRejection> for StoreError {
    fn from(rejection: MoveRejection) -> Self {
        StoreError::FailedPrecondition(rejection.to_string())
    }
}

#[derive(Debug)]
struct GameStoreState {
    games: HashMap<GameId, Game>,
    next_game_id: u64,
}

/// All games behind one lock. Every operation holds it from lookup to the
/// last mutation, so callers only ever see whole moves.
#[derive(Debug, Clone)]
pub struct GameStore {
    state: Arc<Mutex<GameStoreState>>,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(GameStoreState {
                games: HashMap::new(),
                next_game_id: 1,
            })),
        }
    }

    pub async fn create_game(&self) -> Game {
        let mut state = self.state.lock().await;

        let game_id = GameId::new(state.next_game_id);
        state.next_game_id += 1;

        let game = Game::new(game_id);
        state.games.insert(game_id, game.clone());
        let games_stored = state.games.len();
        drop(state);

        log!("Created game {} ({} games stored)", game_id, games_stored);
        game
    }

    pub async fn get_game(&self, game_id: GameId) -> Result<Game, StoreError> {
        let state = self.state.lock().await;

        state
            .games
            .get(&game_id)
            .cloned()
            .ok_or_else(StoreError::game_not_found)
    }

    /// Validation order: cell range, game existence, then the game's own
    /// checks (occupied, finished, turn). The first failure is returned and
    /// nothing is mutated.
    pub async fn make_move(&self, game_id: GameId, mark: Mark, cell: i32) -> Result<Game, StoreError> {
        let cell = Cell::try_from(cell)
            .map_err(|_| StoreError::InvalidArgument("Move's cell is invalid".to_string()))?;

        let game = {
            let mut state = self.state.lock().await;
            apply_move(&mut state, game_id, Move::new(mark, cell))?
        };

        if let Some(outcome) = describe_outcome(&game) {
            log!("{}", outcome);
        }

        Ok(game)
    }
}

fn apply_move(state: &mut GameStoreState, game_id: GameId, mv: Move) -> Result<Game, StoreError> {
    let game = state
        .games
        .get_mut(&game_id)
        .ok_or_else(StoreError::game_not_found)?;

    game.make_move(mv)?;
    Ok(game.clone())
}

fn board_symbol(mark: Mark) -> char {
    match mark {
        Mark::Cross => 'X',
        Mark::Nought => 'O',
        Mark::None => '.',
    }
}

/// Final result and board of a finished game, `None` while it is still running.
fn describe_outcome(game: &Game) -> Option<String> {
    if !game.is_finished {
        return None;
    }

    let board: Vec<String> = game
        .board()
        .chunks(3)
        .map(|row| row.iter().copied().map(board_symbol).collect())
        .collect();
    let board = board.join("/");

    Some(match winning_combination(&game.moves) {
        Some((winner, line)) => format!(
            "Game {} won by {} with cells {}-{}-{} [{}]",
            game.id, winner, line[0], line[1], line[2], board
        ),
        None => format!("Game {} ended in a draw [{}]", game.id, board),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use tokio::task::JoinSet;

    async fn play(store: &GameStore, game_id: GameId, moves: &[(Mark, i32)]) -> Game {
        let mut last = None;
        for &(mark, cell) in moves {
            last = Some(store.make_move(game_id, mark, cell).await.unwrap());
        }
        last.unwrap()
    }

    #[tokio::test]
    async fn test_create_game_assigns_sequential_ids() {
        let store = GameStore::new();

        let first = store.create_game().await;
        let second = store.create_game().await;

        assert_eq!(first.id, GameId::new(1));
        assert_eq!(second.id, GameId::new(2));
        assert_eq!(first.turn, Mark::Cross);
        assert!(first.moves.is_empty());
        assert!(!first.is_finished);
        assert_eq!(store.get_game(second.id).await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_get_game_unknown_id_is_not_found() {
        let store = GameStore::new();

        let result = store.get_game(GameId::new(999)).await;

        assert_eq!(result, Err(StoreError::NotFound("Game not found".to_string())));
    }

    #[tokio::test]
    async fn test_get_game_is_idempotent() {
        let store = GameStore::new();
        let game = store.create_game().await;
        store.make_move(game.id, Mark::Cross, 5).await.unwrap();

        let first = store.get_game(game.id).await.unwrap();
        let second = store.get_game(game.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.moves.len(), 1);
    }

    #[tokio::test]
    async fn test_accepted_move_updates_stored_game() {
        let store = GameStore::new();
        let game = store.create_game().await;

        let updated = store.make_move(game.id, Mark::Cross, 5).await.unwrap();

        assert_eq!(updated.turn, Mark::Nought);
        assert_eq!(updated.moves, vec![Move::new(Mark::Cross, Cell::try_from(5).unwrap())]);
        assert_eq!(store.get_game(game.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_occupied_cell_is_failed_precondition() {
        let store = GameStore::new();
        let game = store.create_game().await;
        let after_first = store.make_move(game.id, Mark::Cross, 5).await.unwrap();

        let result = store.make_move(game.id, Mark::Nought, 5).await;

        assert_eq!(result, Err(StoreError::FailedPrecondition("Move's cell occupied".to_string())));
        assert_eq!(store.get_game(game.id).await.unwrap(), after_first);
    }

    #[tokio::test]
    async fn test_invalid_cell_rejected_before_anything_else() {
        let store = GameStore::new();
        let game = store.create_game().await;

        for cell in [0, 10, -3] {
            let result = store.make_move(game.id, Mark::Cross, cell).await;
            assert_eq!(result, Err(StoreError::InvalidArgument("Move's cell is invalid".to_string())));
        }
        let missing = store.make_move(GameId::new(42), Mark::Nought, 0).await;
        assert!(matches!(missing, Err(StoreError::InvalidArgument(_))));

        assert!(store.get_game(game.id).await.unwrap().moves.is_empty());
    }

    #[tokio::test]
    async fn test_move_on_unknown_game_is_not_found() {
        let store = GameStore::new();

        let result = store.make_move(GameId::new(7), Mark::Cross, 1).await;

        assert_eq!(result, Err(StoreError::game_not_found()));
    }

    #[tokio::test]
    async fn test_wrong_turn_is_failed_precondition() {
        let store = GameStore::new();
        let game = store.create_game().await;

        let result = store.make_move(game.id, Mark::Nought, 1).await;

        assert_eq!(
            result,
            Err(StoreError::FailedPrecondition("It is not the player's turn".to_string()))
        );
    }

    #[tokio::test]
    async fn test_top_row_wins_for_cross() {
        let store = GameStore::new();
        let game = store.create_game().await;

        let finished = play(
            &store,
            game.id,
            &[(Mark::Cross, 1), (Mark::Nought, 4), (Mark::Cross, 2), (Mark::Nought, 5), (Mark::Cross, 3)],
        )
        .await;

        assert!(finished.is_finished);
        assert_eq!(finished.winner, Some(Mark::Cross));

        let result = store.make_move(game.id, Mark::Nought, 9).await;
        assert_eq!(
            result,
            Err(StoreError::FailedPrecondition("Game is already finished".to_string()))
        );
    }

    #[tokio::test]
    async fn test_nine_moves_without_line_is_draw() {
        let store = GameStore::new();
        let game = store.create_game().await;
        let cells = [1, 2, 3, 5, 4, 6, 8, 7, 9];
        let moves: Vec<(Mark, i32)> = cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| (if i % 2 == 0 { Mark::Cross } else { Mark::Nought }, cell))
            .collect();

        let finished = play(&store, game.id, &moves).await;

        assert!(finished.is_finished);
        assert_eq!(finished.winner, None);
        assert_eq!(finished.moves.len(), 9);
    }

    #[test]
    fn test_apply_move_updates_state_or_reports_missing() {
        let mut state = GameStoreState { games: HashMap::new(), next_game_id: 2 };
        state.games.insert(GameId::new(1), Game::new(GameId::new(1)));
        let mv = Move::new(Mark::Cross, Cell::try_from(5).unwrap());

        let game = apply_move(&mut state, GameId::new(1), mv).unwrap();

        assert_eq!(state.games[&GameId::new(1)], game);
        assert_eq!(apply_move(&mut state, GameId::new(9), mv), Err(StoreError::game_not_found()));
    }

    #[tokio::test]
    async fn test_store_unlocked_when_game_finishes() {
        let store = GameStore::new();
        let game = store.create_game().await;

        play(
            &store,
            game.id,
            &[(Mark::Cross, 1), (Mark::Nought, 4), (Mark::Cross, 2), (Mark::Nought, 5), (Mark::Cross, 3)],
        )
        .await;

        assert!(store.state.try_lock().is_ok());
    }

    #[test]
    fn test_describe_outcome_for_win_draw_and_running_game() {
        let mut game = Game::new(GameId::new(4));
        for (mark, cell) in [(Mark::Cross, 1), (Mark::Nought, 4), (Mark::Cross, 2), (Mark::Nought, 5)] {
            game.make_move(Move::new(mark, Cell::try_from(cell).unwrap())).unwrap();
        }
        assert_eq!(describe_outcome(&game), None);

        game.make_move(Move::new(Mark::Cross, Cell::try_from(3).unwrap())).unwrap();
        assert_eq!(
            describe_outcome(&game).unwrap(),
            "Game 4 won by CROSS with cells 1-2-3 [XXX/OO./...]"
        );

        let mut draw = Game::new(GameId::new(5));
        for (i, cell) in [1, 2, 3, 5, 4, 6, 8, 7, 9].into_iter().enumerate() {
            let mark = if i % 2 == 0 { Mark::Cross } else { Mark::Nought };
            draw.make_move(Move::new(mark, Cell::try_from(cell).unwrap())).unwrap();
        }
        assert_eq!(describe_outcome(&draw).unwrap(), "Game 5 ended in a draw [XOX/XOO/OXX]");
    }

    #[tokio::test]
    async fn test_games_are_independent() {
        let store = GameStore::new();
        let first = store.create_game().await;
        let second = store.create_game().await;

        store.make_move(first.id, Mark::Cross, 5).await.unwrap();
        store.make_move(second.id, Mark::Cross, 5).await.unwrap();

        assert_eq!(store.get_game(first.id).await.unwrap().moves.len(), 1);
        assert_eq!(store.get_game(second.id).await.unwrap().moves.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_moves_accept_one_per_turn() {
        let store = GameStore::new();
        let game = store.create_game().await;

        let mut tasks = JoinSet::new();
        for cell in 1..=9 {
            let store = store.clone();
            tasks.spawn(async move { store.make_move(game.id, Mark::Cross, cell).await });
        }

        let mut accepted = 0;
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                Ok(_) => accepted += 1,
                Err(error) => assert!(matches!(error, StoreError::FailedPrecondition(_))),
            }
        }

        assert_eq!(accepted, 1);
        let stored = store.get_game(game.id).await.unwrap();
        assert_eq!(stored.moves.len(), 1);
        assert_eq!(stored.turn, Mark::Nought);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_players_keep_invariants() {
        let store = GameStore::new();
        let game = store.create_game().await;

        let mut tasks = JoinSet::new();
        for mark in [Mark::Cross, Mark::Nought] {
            let store = store.clone();
            tasks.spawn(async move {
                let mut cells: Vec<i32> = (1..=9).collect();
                cells.shuffle(&mut rand::rng());
                while !store.get_game(game.id).await.unwrap().is_finished {
                    for &cell in &cells {
                        let _ = store.make_move(game.id, mark, cell).await;
                    }
                    tokio::task::yield_now().await;
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        let stored = store.get_game(game.id).await.unwrap();
        assert!(stored.moves.len() <= 9);
        let mut cells: Vec<_> = stored.moves.iter().map(|m| m.cell).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), stored.moves.len());
        for (n, m) in stored.moves.iter().enumerate() {
            let expected = if n % 2 == 0 { Mark::Cross } else { Mark::Nought };
            assert_eq!(m.mark, expected);
        }
        assert!(stored.is_finished);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_yield_unique_ids() {
        let store = GameStore::new();

        let mut tasks = JoinSet::new();
        for _ in 0..32 {
            let store = store.clone();
            tasks.spawn(async move { store.create_game().await.id });
        }
        let mut ids = Vec::new();
        while let Some(result) = tasks.join_next().await {
            ids.push(result.unwrap().value());
        }

        ids.sort();
        assert_eq!(ids, (1..=32).collect::<Vec<u64>>());
    }
}
