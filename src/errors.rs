//! Error taxonomy for placement, turn transitions, and wire parsing.
//!
//! Any error aborts the transition that produced it; no partial board state
//! is ever published.
use crate::types::SnakeId;
use thiserror::Error;

/// Everything that can go wrong inside the rules engine.
#[derive(Debug, Error)]
pub enum RulesError {
    /// placement asked to seat more snakes than fixed positions exist
    #[error("too many snakes for fixed start positions: {0}")]
    TooManySnakes(usize),

    /// random placement exhausted its candidate cells
    #[error("not enough space to place snake")]
    NoRoomForSnake,

    /// fixed placement could not find a free diagonal or center cell
    #[error("not enough space to place food")]
    NoRoomForFood,

    /// a non-eliminated snake has no entry in the move table
    #[error("move not provided for snake '{0}'")]
    NoMoveFound(SnakeId),

    /// a non-eliminated snake has an empty body
    #[error("snake is length zero: '{0}'")]
    ZeroLengthSnake(SnakeId),

    /// squad processing found an eliminator id that names no snake
    #[error("invalid eliminated-by id '{by_id}' on snake '{id}'")]
    InvalidEliminatedById {
        /// the snake carrying the bad tag
        id: SnakeId,
        /// the unknown eliminator
        by_id: SnakeId,
    },

    /// wire input is not valid json or has the wrong shape
    #[error("malformed game json: {0}")]
    Json(#[from] serde_json::Error),

    /// wire input parsed but holds values the engine cannot represent
    #[error("invalid wire data: {0}")]
    InvalidWireData(String),
}
