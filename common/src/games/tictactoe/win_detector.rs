use super::types::{Cell, Mark, Move};

const fn line(a: u8, b: u8, c: u8) -> [Cell; 3] {
    [Cell::from_valid(a), Cell::from_valid(b), Cell::from_valid(c)]
}

/// Rows, then columns, then diagonals.
pub const WINNING_COMBINATIONS: [[Cell; 3]; 8] = [
    line(1, 2, 3),
    line(4, 5, 6),
    line(7, 8, 9),
    line(1, 4, 7),
    line(2, 5, 8),
    line(3, 6, 9),
    line(1, 5, 9),
    line(3, 5, 7),
];

pub fn determine_winner(moves: &[Move]) -> Option<Mark> {
    winning_combination(moves).map(|(mark, _)| mark)
}

/// First combination fully owned by one mark. Cross is checked before nought
/// for each combination.
pub fn winning_combination(moves: &[Move]) -> Option<(Mark, [Cell; 3])> {
    let cross = played_cells(moves, Mark::Cross);
    let nought = played_cells(moves, Mark::Nought);

    for combination in WINNING_COMBINATIONS {
        if owns_all(&cross, &combination) {
            return Some((Mark::Cross, combination));
        }
        if owns_all(&nought, &combination) {
            return Some((Mark::Nought, combination));
        }
    }

    None
}

fn played_cells(moves: &[Move], mark: Mark) -> [bool; Cell::MAX as usize + 1] {
    let mut played = [false; Cell::MAX as usize + 1];
    for m in moves.iter().filter(|m| m.mark == mark) {
        played[m.cell.value() as usize] = true;
    }
    played
}

fn owns_all(played: &[bool], combination: &[Cell; 3]) -> bool {
    combination.iter().all(|cell| played[cell.value() as usize])
}
