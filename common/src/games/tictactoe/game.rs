use std::fmt;

use crate::GameId;
use crate::proto;
use super::types::{Cell, Mark, Move};
use super::win_detector::determine_winner;

pub const BOARD_SIZE: usize = 9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveRejection {
    CellOccupied,
    GameFinished,
    NotPlayersTurn,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            MoveRejection::CellOccupied => "Move's cell occupied",
            MoveRejection::GameFinished => "Game is already finished",
            MoveRejection::NotPlayersTurn => "It is not the player's turn",
        };
        write!(f, "{}", message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    pub id: GameId,
    pub turn: Mark,
    pub moves: Vec<Move>,
    pub is_finished: bool,
    pub winner: Option<Mark>,
}

impl Game {
    pub fn new(id: GameId) -> Self {
        Self {
            id,
            turn: Mark::Cross,
            moves: Vec::with_capacity(BOARD_SIZE),
            is_finished: false,
            winner: None,
        }
    }

    pub fn is_cell_occupied(&self, cell: Cell) -> bool {
        self.moves.iter().any(|m| m.cell == cell)
    }

    /// Checks run in order: occupied cell, finished game, wrong turn. A
    /// rejected move leaves the game untouched.
    pub fn make_move(&mut self, mv: Move) -> Result<(), MoveRejection> {
        if self.is_cell_occupied(mv.cell) {
            return Err(MoveRejection::CellOccupied);
        }

        if self.is_finished {
            return Err(MoveRejection::GameFinished);
        }

        if mv.mark != self.turn {
            return Err(MoveRejection::NotPlayersTurn);
        }

        self.moves.push(mv);
        let winner = determine_winner(&self.moves);
        self.turn = self.turn.opponent();

        if let Some(winner) = winner {
            self.is_finished = true;
            self.winner = Some(winner);
        }
        if self.moves.len() == BOARD_SIZE {
            self.is_finished = true;
        }

        Ok(())
    }

    /// Marks indexed by `cell - 1`.
    pub fn board(&self) -> [Mark; BOARD_SIZE] {
        let mut board = [Mark::None; BOARD_SIZE];
        for m in &self.moves {
            board[m.cell.value() as usize - 1] = m.mark;
        }
        board
    }

    pub fn to_proto(&self) -> proto::Game {
        proto::Game {
            id: self.id.to_proto(),
            is_finished: self.is_finished,
            winner: self.winner.unwrap_or(Mark::None).to_proto(),
            turn: self.turn.to_proto(),
            moves: self.moves.iter().map(Move::to_proto).collect(),
        }
    }
}
