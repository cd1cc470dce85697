#![allow(missing_docs)]
//! Types matching the battlesnake wire representation, and the conversions
//! between them and the core model.
//!
//! Wire values use plain owned strings and 32-bit coordinates; converting
//! into the core model interns every label through a [`StringPool`] and
//! range-checks coordinates. Snake `length` and `head` are derived fields:
//! they are filled in when serializing and re-derived from the body when
//! parsing. Eliminated snakes are omitted from serialized boards.
use crate::board::{BoardState, GameInfo, GameState, RulesetInfo, Snake};
use crate::errors::RulesError;
use crate::string_pool::StringPool;
use crate::types::{Coordinate, Point};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Struct that matches the `position` object from the wire representation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn from_point(p: Point) -> Self {
        Position {
            x: i32::from(p.x),
            y: i32::from(p.y),
        }
    }

    pub fn to_point(self) -> Result<Point, RulesError> {
        let x = Coordinate::try_from(self.x)
            .map_err(|_| RulesError::InvalidWireData(format!("x coordinate {} out of range", self.x)))?;
        let y = Coordinate::try_from(self.y)
            .map_err(|_| RulesError::InvalidWireData(format!("y coordinate {} out of range", self.y)))?;
        Ok(Point { x, y })
    }
}

/// Struct that matches the `battlesnake` object from the wire
/// representation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Battlesnake {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latency: String,
    pub health: i32,
    pub body: Vec<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i32>,
    #[serde(default)]
    pub shout: String,
    #[serde(default)]
    pub squad: String,
}

impl Battlesnake {
    /// Serializes a snake regardless of its elimination state. Used for the
    /// `you` field, which keeps addressing a snake after it is gone.
    pub fn from_snake_raw(snake: &Snake) -> Self {
        Battlesnake {
            id: snake.id.as_str().to_owned(),
            name: snake.name.as_str().to_owned(),
            latency: snake.latency.as_str().to_owned(),
            health: snake.health,
            body: snake.body.iter().map(|&p| Position::from_point(p)).collect(),
            head: snake.head().map(Position::from_point),
            length: Some(snake.length() as i32),
            shout: snake.shout.as_str().to_owned(),
            squad: snake.squad.as_str().to_owned(),
        }
    }

    /// Returns `None` for eliminated snakes, which are omitted on the wire.
    pub fn from_snake(snake: &Snake) -> Option<Self> {
        if snake.is_eliminated() {
            return None;
        }
        Some(Self::from_snake_raw(snake))
    }

    pub fn to_snake(&self, pool: &StringPool) -> Result<Snake, RulesError> {
        let body = self
            .body
            .iter()
            .map(|p| p.to_point())
            .collect::<Result<VecDeque<_>, _>>()?;
        Ok(Snake {
            id: pool.add(&self.id),
            body,
            health: self.health,
            name: pool.add(&self.name),
            latency: pool.add(&self.latency),
            shout: pool.add(&self.shout),
            squad: pool.add(&self.squad),
            ..Snake::default()
        })
    }
}

/// Struct that matches the `board` object from the wire representation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub food: Vec<Position>,
    pub snakes: Vec<Battlesnake>,
    pub hazards: Vec<Position>,
}

impl Board {
    pub fn from_state(state: &BoardState) -> Self {
        let mut hazards: Vec<Position> = state
            .hazards
            .iter()
            .map(|&p| Position::from_point(p))
            .collect();
        if !state.hazard_border.is_clear() {
            // materialize the border into explicit cells for the wire
            for y in 0..state.height {
                for x in 0..state.width {
                    let p = Point { x, y };
                    if state.hazard_border.is_hazard(p, state.width, state.height)
                        && !state.hazards.contains(&p)
                    {
                        hazards.push(Position::from_point(p));
                    }
                }
            }
        }

        Board {
            width: i32::from(state.width),
            height: i32::from(state.height),
            food: state.food.iter().map(|&p| Position::from_point(p)).collect(),
            snakes: state.snakes.iter().filter_map(Battlesnake::from_snake).collect(),
            hazards,
        }
    }

    pub fn to_state(&self, pool: &StringPool) -> Result<BoardState, RulesError> {
        let width = Coordinate::try_from(self.width)
            .map_err(|_| RulesError::InvalidWireData(format!("board width {} out of range", self.width)))?;
        let height = Coordinate::try_from(self.height).map_err(|_| {
            RulesError::InvalidWireData(format!("board height {} out of range", self.height))
        })?;

        Ok(BoardState {
            width,
            height,
            food: self
                .food
                .iter()
                .map(|p| p.to_point())
                .collect::<Result<_, _>>()?,
            snakes: self
                .snakes
                .iter()
                .map(|s| s.to_snake(pool))
                .collect::<Result<_, _>>()?,
            hazards: self
                .hazards
                .iter()
                .map(|p| p.to_point())
                .collect::<Result<_, _>>()?,
            ..BoardState::default()
        })
    }
}

/// Struct that matches the `ruleset` object from the wire representation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

impl Ruleset {
    pub fn from_info(info: &RulesetInfo) -> Self {
        Ruleset {
            name: info.name.as_str().to_owned(),
            version: info.version.as_str().to_owned(),
        }
    }

    pub fn to_info(&self, pool: &StringPool) -> RulesetInfo {
        RulesetInfo {
            name: pool.add(&self.name),
            version: pool.add(&self.version),
        }
    }
}

/// Struct that matches the nested `game` object from the wire
/// representation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NestedGame {
    pub id: String,
    pub ruleset: Ruleset,
    pub timeout: i32,
}

impl NestedGame {
    pub fn from_info(info: &GameInfo) -> Self {
        NestedGame {
            id: info.id.as_str().to_owned(),
            ruleset: Ruleset::from_info(&info.ruleset),
            timeout: info.timeout,
        }
    }

    pub fn to_info(&self, pool: &StringPool) -> GameInfo {
        GameInfo {
            id: pool.add(&self.id),
            ruleset: self.ruleset.to_info(pool),
            timeout: self.timeout,
        }
    }
}

/// Root object sent to agents on start, move, and end requests.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub game: NestedGame,
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}

impl Game {
    pub fn from_game_state(state: &GameState) -> Self {
        Game {
            game: NestedGame::from_info(&state.game),
            turn: state.turn,
            board: Board::from_state(&state.board),
            you: Battlesnake::from_snake_raw(&state.you),
        }
    }

    pub fn to_game_state(&self, pool: &StringPool) -> Result<GameState, RulesError> {
        Ok(GameState {
            game: self.game.to_info(pool),
            turn: self.turn,
            board: self.board.to_state(pool)?,
            you: self.you.to_snake(pool)?,
        })
    }

    /// Parses a full game state from json, interning labels through `pool`.
    pub fn parse(json: &str, pool: &StringPool) -> Result<GameState, RulesError> {
        let game: Game = serde_json::from_str(json)?;
        game.to_game_state(pool)
    }

    /// Serializes a game state to json.
    pub fn to_json(state: &GameState) -> Result<String, RulesError> {
        Ok(serde_json::to_string(&Self::from_game_state(state))?)
    }
}
