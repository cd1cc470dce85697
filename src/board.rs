//! Board snapshots, the snakes on them, and the per-game bundles handed to
//! agents.
use crate::string_pool::InternedStr;
use crate::types::{Coordinate, EliminatedCause, Point, SnakeId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::{self, Display};

/// One snake. The body is ordered head first; the same cell may appear more
/// than once, notably a doubled tail on the turn a snake grows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snake {
    /// interned identifier, stable for the whole game
    pub id: SnakeId,
    /// body cells, head at the front
    pub body: VecDeque<Point>,
    /// remaining health
    pub health: i32,
    /// terminal once set to anything but `NotEliminated`
    pub eliminated_cause: EliminatedCause,
    /// display name
    pub name: InternedStr,
    /// last reported latency, in milliseconds, as reported on the wire
    pub latency: InternedStr,
    /// last shout
    pub shout: InternedStr,
    /// squad label; empty outside squad games
    pub squad: InternedStr,
}

impl Snake {
    /// whether this snake has been removed from play
    pub fn is_eliminated(&self) -> bool {
        self.eliminated_cause.is_eliminated()
    }

    /// whether health has run out
    pub fn is_out_of_health(&self) -> bool {
        self.health <= 0
    }

    /// the head cell, if the body is non-empty
    pub fn head(&self) -> Option<Point> {
        self.body.front().copied()
    }

    /// body length
    pub fn length(&self) -> usize {
        self.body.len()
    }

    /// Grows by one segment by doubling the tail cell. No-op on an empty
    /// body.
    pub fn grow(&mut self) {
        if let Some(tail) = self.body.back().copied() {
            self.body.push_back(tail);
        }
    }

    /// Advances the body one step: the new head is prepended and the tail
    /// cell dropped, leaving the length unchanged.
    pub fn advance_to(&mut self, new_head: Point) {
        self.body.push_front(new_head);
        self.body.pop_back();
    }
}

/// Rectangular hazard border used by royale. A cell is hazardous iff it
/// lies outside the inset rectangle
/// `[depth_left, width - depth_right) x [depth_bottom, height - depth_top)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HazardBorder {
    /// hazardous columns on the left edge
    pub depth_left: Coordinate,
    /// hazardous columns on the right edge
    pub depth_right: Coordinate,
    /// hazardous rows on the top edge
    pub depth_top: Coordinate,
    /// hazardous rows on the bottom edge
    pub depth_bottom: Coordinate,
}

impl HazardBorder {
    /// whether the border covers nothing at all
    pub fn is_clear(&self) -> bool {
        *self == HazardBorder::default()
    }

    /// whether the given in-bounds cell falls outside the safe inset
    pub fn is_hazard(&self, p: Point, width: Coordinate, height: Coordinate) -> bool {
        p.x < self.depth_left
            || p.x >= width - self.depth_right
            || p.y < self.depth_bottom
            || p.y >= height - self.depth_top
    }
}

/// One immutable-by-convention snapshot of a game. Produced by placement
/// and then afresh by every turn transition; the engine never mutates a
/// published state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardState {
    /// board width
    pub width: Coordinate,
    /// board height
    pub height: Coordinate,
    /// food cells; duplicates are forbidden
    pub food: Vec<Point>,
    /// snakes in seating order; the order is stable for the whole game
    pub snakes: Vec<Snake>,
    /// explicit hazard cells (wrapped mode)
    pub hazards: Vec<Point>,
    /// hazard border descriptor (royale)
    pub hazard_border: HazardBorder,
}

impl BoardState {
    /// the snake with the given id, if seated on this board
    pub fn snake(&self, id: &SnakeId) -> Option<&Snake> {
        self.snakes.iter().find(|s| &s.id == id)
    }

    /// mutable access to the snake with the given id
    pub fn snake_mut(&mut self, id: &SnakeId) -> Option<&mut Snake> {
        self.snakes.iter_mut().find(|s| &s.id == id)
    }

    /// snakes still in play
    pub fn alive_snakes(&self) -> impl Iterator<Item = &Snake> {
        self.snakes.iter().filter(|s| !s.is_eliminated())
    }

    /// how many snakes are still in play
    pub fn alive_count(&self) -> usize {
        self.alive_snakes().count()
    }

    /// whether the cell is hazardous under either hazard representation
    pub fn is_hazard(&self, p: Point) -> bool {
        self.hazards.contains(&p) || self.hazard_border.is_hazard(p, self.width, self.height)
    }
}

impl Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for i in 0..self.height {
            let y = self.height - i - 1;
            for x in 0..self.width {
                let position = Point { x, y };
                if self.food.contains(&position) {
                    write!(f, "f")?;
                } else if self
                    .alive_snakes()
                    .any(|s| s.head() == Some(position))
                {
                    write!(f, "H")?;
                } else if self.alive_snakes().any(|s| s.body.contains(&position)) {
                    write!(f, "s")?;
                } else if self.is_hazard(position) {
                    write!(f, "x")?;
                } else {
                    write!(f, ".")?;
                }
                write!(f, " ")?;
            }
            writeln!(f)?;
        }
        for snake in self.snakes.iter() {
            write!(
                f,
                "({} health: {} eliminated: {}) ",
                snake.id, snake.health, snake.eliminated_cause
            )?;
        }
        Ok(())
    }
}

/// Name and version of the rule variant in play.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RulesetInfo {
    /// wire name of the variant
    pub name: InternedStr,
    /// engine version string
    pub version: InternedStr,
}

/// Per-game metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameInfo {
    /// game identifier
    pub id: InternedStr,
    /// variant in play
    pub ruleset: RulesetInfo,
    /// per-request timeout in milliseconds, enforced by transport adapters
    pub timeout: i32,
}

/// Everything an agent sees on one request: game metadata, the turn, the
/// board, and a copy of the addressed snake.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameState {
    /// game metadata
    pub game: GameInfo,
    /// current turn number
    pub turn: i32,
    /// the full board
    pub board: BoardState,
    /// the snake this request is addressed to
    pub you: Snake,
}

/// Cosmetic registration data returned by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customization {
    /// API version the agent speaks
    #[serde(default = "default_apiversion")]
    pub apiversion: String,
    /// author handle
    #[serde(default)]
    pub author: String,
    /// display color
    #[serde(default = "default_color")]
    pub color: String,
    /// head style
    #[serde(default = "default_style")]
    pub head: String,
    /// tail style
    #[serde(default = "default_style")]
    pub tail: String,
    /// agent version string
    #[serde(default)]
    pub version: String,
}

fn default_apiversion() -> String {
    "1".to_owned()
}

fn default_color() -> String {
    "#888888".to_owned()
}

fn default_style() -> String {
    "default".to_owned()
}

impl Default for Customization {
    fn default() -> Self {
        Customization {
            apiversion: default_apiversion(),
            author: String::new(),
            color: default_color(),
            head: default_style(),
            tail: default_style(),
            version: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string_pool::StringPool;

    fn p(x: Coordinate, y: Coordinate) -> Point {
        Point { x, y }
    }

    #[test]
    fn test_grow_doubles_tail() {
        let mut snake = Snake {
            body: VecDeque::from(vec![p(1, 1), p(1, 2), p(1, 3)]),
            ..Snake::default()
        };
        snake.grow();
        assert_eq!(
            snake.body,
            VecDeque::from(vec![p(1, 1), p(1, 2), p(1, 3), p(1, 3)])
        );
    }

    #[test]
    fn test_advance_keeps_length() {
        let mut snake = Snake {
            body: VecDeque::from(vec![p(1, 1), p(1, 2), p(1, 3)]),
            ..Snake::default()
        };
        snake.advance_to(p(1, 0));
        assert_eq!(snake.body, VecDeque::from(vec![p(1, 0), p(1, 1), p(1, 2)]));
    }

    #[test]
    fn test_hazard_border_inset() {
        let border = HazardBorder {
            depth_left: 1,
            depth_right: 0,
            depth_top: 0,
            depth_bottom: 0,
        };
        assert!(border.is_hazard(p(0, 3), 7, 7));
        assert!(!border.is_hazard(p(1, 3), 7, 7));
        assert!(!border.is_hazard(p(6, 6), 7, 7));
    }

    #[test]
    fn test_board_hazard_uses_both_representations() {
        let board = BoardState {
            width: 7,
            height: 7,
            hazards: vec![p(3, 3)],
            hazard_border: HazardBorder {
                depth_top: 1,
                ..HazardBorder::default()
            },
            ..BoardState::default()
        };
        assert!(board.is_hazard(p(3, 3)));
        assert!(board.is_hazard(p(2, 6)));
        assert!(!board.is_hazard(p(2, 5)));
    }

    #[test]
    fn test_display_marks_cells() {
        let pool = StringPool::new();
        let board = BoardState {
            width: 3,
            height: 3,
            food: vec![p(0, 0)],
            snakes: vec![Snake {
                id: pool.add("one"),
                body: VecDeque::from(vec![p(1, 1), p(1, 2)]),
                health: 80,
                ..Snake::default()
            }],
            ..BoardState::default()
        };
        let rendered = format!("{}", board);
        assert!(rendered.contains('f'));
        assert!(rendered.contains('H'));
        assert!(rendered.contains('s'));
        assert!(rendered.contains("health: 80"));
    }

    #[test]
    fn test_customization_defaults() {
        let c = Customization::default();
        assert_eq!(c.apiversion, "1");
        assert_eq!(c.color, "#888888");
        assert_eq!(c.head, "default");
        assert_eq!(c.tail, "default");
        assert!(c.author.is_empty());
    }

    #[test]
    fn test_customization_parse_fills_defaults() {
        let c: Customization = serde_json::from_str("{\"author\":\"me\"}").unwrap();
        assert_eq!(c.author, "me");
        assert_eq!(c.apiversion, "1");
        assert_eq!(c.tail, "default");
    }
}
