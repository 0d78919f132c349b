mod game;
mod types;
mod win_detector;

pub use game::{BOARD_SIZE, Game, MoveRejection};
pub use types::{Cell, Mark, Move};
pub use win_detector::{WINNING_COMBINATIONS, determine_winner, winning_combination};
