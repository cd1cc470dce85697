//! Grid geometry, moves, and elimination causes.
use crate::string_pool::InternedStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};

/// Board coordinate. Boards are small; `i8` covers the largest supported
/// grid with room for out-of-bounds heads on either side.
pub type Coordinate = i8;

/// Side length of the small standard board.
pub const BOARD_SIZE_SMALL: Coordinate = 7;
/// Side length of the medium standard board.
pub const BOARD_SIZE_MEDIUM: Coordinate = 11;
/// Side length of the large standard board.
pub const BOARD_SIZE_LARGE: Coordinate = 19;

/// Most snakes that fixed start positions can seat.
pub const MAX_SNAKES: usize = 8;

/// Token identifying a snake. Interned, so equality is a pointer compare in
/// the common case.
pub type SnakeId = InternedStr;

/// A cell on the board. `(0, 0)` is the bottom-left corner; `x` grows to the
/// right and `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    /// x position
    pub x: Coordinate,
    /// y position
    pub y: Coordinate,
}

impl Point {
    /// the cell directly above this one
    pub fn up(self) -> Point {
        Point {
            x: self.x,
            y: self.y + 1,
        }
    }

    /// the cell directly below this one
    pub fn down(self) -> Point {
        Point {
            x: self.x,
            y: self.y - 1,
        }
    }

    /// the cell directly to the left of this one
    pub fn left(self) -> Point {
        Point {
            x: self.x - 1,
            y: self.y,
        }
    }

    /// the cell directly to the right of this one
    pub fn right(self) -> Point {
        Point {
            x: self.x + 1,
            y: self.y,
        }
    }

    /// The cell one step in the given direction. `Move::Unknown` goes
    /// nowhere.
    pub fn moved(self, mv: Move) -> Point {
        match mv {
            Move::Up => self.up(),
            Move::Down => self.down(),
            Move::Left => self.left(),
            Move::Right => self.right(),
            Move::Unknown => self,
        }
    }

    /// This point taken modulo the board dimensions, components wrapping
    /// independently.
    pub fn wrapped(self, width: Coordinate, height: Coordinate) -> Point {
        Point {
            x: self.x.rem_euclid(width),
            y: self.y.rem_euclid(height),
        }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A direction chosen by a snake for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    #[allow(missing_docs)]
    Up,
    #[allow(missing_docs)]
    Down,
    #[allow(missing_docs)]
    Left,
    #[allow(missing_docs)]
    Right,
    /// No move reported by the snake.
    Unknown,
}

impl Move {
    /// the four cardinal directions, excluding the `Unknown` sentinel
    pub const fn all() -> [Move; 4] {
        [Move::Up, Move::Down, Move::Left, Move::Right]
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
            Move::Unknown => "unknown",
        })
    }
}

impl<'de> Deserialize<'de> for Move {
    // any direction the engine does not recognize is the Unknown sentinel
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "up" => Move::Up,
            "down" => Move::Down,
            "left" => Move::Left,
            "right" => Move::Right,
            _ => Move::Unknown,
        })
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Up => write!(f, "up"),
            Move::Down => write!(f, "down"),
            Move::Left => write!(f, "left"),
            Move::Right => write!(f, "right"),
            Move::Unknown => write!(f, "unknown"),
        }
    }
}

/// How and by whom a snake was removed from play. `NotEliminated` marks a
/// snake that is still in play; every other value is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EliminatedCause {
    /// still in play
    NotEliminated,
    /// head landed on another snake's body
    Collision {
        /// the snake whose body was hit
        by: SnakeId,
    },
    /// head landed on its own body
    SelfCollision,
    /// health reached zero
    OutOfHealth,
    /// lost (or drew) a head-to-head encounter
    HeadToHeadCollision {
        /// the snake it collided with
        by: SnakeId,
    },
    /// some body piece left the board
    OutOfBounds,
    /// a squad mate was eliminated and elimination is shared
    BySquad,
}

impl EliminatedCause {
    /// whether this cause removes the snake from play
    pub fn is_eliminated(&self) -> bool {
        !matches!(self, EliminatedCause::NotEliminated)
    }

    /// The other snake responsible, for the causes that name one.
    pub fn eliminated_by(&self) -> Option<&SnakeId> {
        match self {
            EliminatedCause::Collision { by } => Some(by),
            EliminatedCause::HeadToHeadCollision { by } => Some(by),
            _ => None,
        }
    }
}

impl Default for EliminatedCause {
    fn default() -> Self {
        EliminatedCause::NotEliminated
    }
}

impl Display for EliminatedCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EliminatedCause::NotEliminated => write!(f, "not eliminated"),
            EliminatedCause::Collision { by } => write!(f, "collision by '{}'", by),
            EliminatedCause::SelfCollision => write!(f, "self collision"),
            EliminatedCause::OutOfHealth => write!(f, "out of health"),
            EliminatedCause::HeadToHeadCollision { by } => {
                write!(f, "head-to-head collision by '{}'", by)
            }
            EliminatedCause::OutOfBounds => write!(f, "out of bounds"),
            EliminatedCause::BySquad => write!(f, "by squad"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_steps() {
        let p = Point { x: 3, y: 4 };
        assert_eq!(p.up(), Point { x: 3, y: 5 });
        assert_eq!(p.down(), Point { x: 3, y: 3 });
        assert_eq!(p.left(), Point { x: 2, y: 4 });
        assert_eq!(p.right(), Point { x: 4, y: 4 });
        assert_eq!(p.moved(Move::Unknown), p);
    }

    #[test]
    fn test_point_wraps_on_both_axes() {
        let left_edge = Point { x: -1, y: 3 };
        assert_eq!(left_edge.wrapped(11, 11), Point { x: 10, y: 3 });

        let top_edge = Point { x: 3, y: 11 };
        assert_eq!(top_edge.wrapped(11, 11), Point { x: 3, y: 0 });
    }

    #[test]
    fn test_move_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Move::Down).unwrap(), "\"down\"");
        assert_eq!(serde_json::from_str::<Move>("\"left\"").unwrap(), Move::Left);
    }

    #[test]
    fn test_unrecognized_move_parses_as_unknown() {
        assert_eq!(
            serde_json::from_str::<Move>("\"sideways\"").unwrap(),
            Move::Unknown
        );
    }

    #[test]
    fn test_eliminated_by() {
        let cause = EliminatedCause::OutOfBounds;
        assert!(cause.is_eliminated());
        assert_eq!(cause.eliminated_by(), None);
        assert!(!EliminatedCause::NotEliminated.is_eliminated());
    }
}
