use std::fmt;

use crate::proto;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mark {
    #[default]
    None,
    Cross,
    Nought,
}

impl Mark {
    /// Unknown wire values are treated as `None`, which never matches a turn.
    pub fn from_proto(value: i32) -> Self {
        match proto::Mark::try_from(value) {
            Ok(proto::Mark::Cross) => Mark::Cross,
            Ok(proto::Mark::Nought) => Mark::Nought,
            Ok(proto::Mark::None) | Err(_) => Mark::None,
        }
    }

    pub fn to_proto(&self) -> i32 {
        match self {
            Mark::None => proto::Mark::None as i32,
            Mark::Cross => proto::Mark::Cross as i32,
            Mark::Nought => proto::Mark::Nought as i32,
        }
    }

    pub fn opponent(&self) -> Mark {
        match self {
            Mark::Cross => Mark::Nought,
            Mark::Nought => Mark::Cross,
            Mark::None => Mark::None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mark::None => "NONE",
            Mark::Cross => "CROSS",
            Mark::Nought => "NOUGHT",
        };
        write!(f, "{}", name)
    }
}

/// Board position numbered row by row:
///
/// ```text
/// 1 2 3
/// 4 5 6
/// 7 8 9
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell(u8);

impl Cell {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    pub(super) const fn from_valid(value: u8) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for Cell {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(cell) if (Self::MIN..=Self::MAX).contains(&cell) => Ok(Cell(cell)),
            _ => Err(format!("Cell {} is outside 1..9", value)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub mark: Mark,
    pub cell: Cell,
}

impl Move {
    pub fn new(mark: Mark, cell: Cell) -> Self {
        Self { mark, cell }
    }

    pub fn to_proto(&self) -> proto::Move {
        proto::Move {
            mark: self.mark.to_proto(),
            cell: self.cell.value() as i32,
        }
    }
}
