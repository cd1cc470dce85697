#![deny(
    warnings,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! Rules engine for [battlesnake](https://docs.battlesnake.com/) style games.
//!
//! The engine is a pure state-transition pipeline: placement produces a
//! [`board::BoardState`], and each turn a ruleset folds the snakes' chosen
//! moves into the next state through five phases (move, health, feed,
//! spawn, eliminate). Six variants share that pipeline and layer their own
//! tail phase on top: standard, solo, constrictor, royale, squad, and
//! wrapped.
//!
//! ```
//! use battlesnake_rules::rules::{ruleset_for_name, Config, SnakeMoves};
//! use battlesnake_rules::string_pool::StringPool;
//! use battlesnake_rules::types::Move;
//!
//! let pool = StringPool::new();
//! let ids = vec![pool.add("one"), pool.add("two")];
//!
//! let mut rules = ruleset_for_name("standard", Config::default()).unwrap();
//! let board = rules.create_initial_board_state(11, 11, &ids).unwrap();
//!
//! let mut moves = SnakeMoves::default();
//! for id in &ids {
//!     moves.insert(id.clone(), Move::Up);
//! }
//! let next = rules.create_next_board_state(&board, &moves, 1).unwrap();
//! assert_eq!(next.snakes.len(), 2);
//! assert!(!rules.is_game_over(&next));
//! ```

pub mod board;
pub mod errors;
pub mod player;
pub mod rules;
pub mod string_pool;
pub mod types;
pub mod wire_representation;
