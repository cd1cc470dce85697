//! Rule variants and the shared turn pipeline.
//!
//! Every variant drives the same five-phase pipeline (move, health, feed,
//! spawn, eliminate) implemented by [`StandardRuleset`], then layers its own
//! deterministic tail phase. Variants contain a standard ruleset and
//! delegate to it; there is no inheritance anywhere.
use crate::board::BoardState;
use crate::errors::RulesError;
use crate::types::{Coordinate, Move, SnakeId};
use fxhash::FxHashMap;

pub mod constrictor;
pub mod royale;
pub mod solo;
pub mod squad;
pub mod standard;
pub mod wrapped;

pub use constrictor::ConstrictorRuleset;
pub use royale::{RoyaleConfig, RoyaleRuleset};
pub use solo::SoloRuleset;
pub use squad::{SquadConfig, SquadRuleset};
pub use standard::StandardRuleset;
pub use wrapped::WrappedRuleset;

/// Tunables shared by every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// percent chance in `[0, 100]` of spawning one food on a turn that
    /// already meets the food minimum
    pub food_spawn_chance: i32,
    /// food count below which spawning tops the board back up
    pub minimum_food: usize,
    /// health granted at placement and restored by feeding
    pub snake_max_health: i32,
    /// body length at placement (cells start stacked)
    pub snake_start_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            food_spawn_chance: 15,
            minimum_food: 1,
            snake_max_health: 100,
            snake_start_size: 3,
        }
    }
}

/// Moves chosen for one turn, keyed by snake id. Eliminated snakes need no
/// entry; a missing entry for a live snake fails the transition.
pub type SnakeMoves = FxHashMap<SnakeId, Move>;

/// A rule variant. Implementations own their random source, so the state
/// transitions take `&mut self`; everything else about them is a pure
/// function of the inputs.
pub trait Ruleset: std::fmt::Debug {
    /// wire name of this variant
    fn name(&self) -> &str;

    /// Seats the given snakes on a fresh `width` x `height` board and seeds
    /// the first food.
    fn create_initial_board_state(
        &mut self,
        width: Coordinate,
        height: Coordinate,
        snake_ids: &[SnakeId],
    ) -> Result<BoardState, RulesError>;

    /// Produces the board for `turn` from the previous board and the moves
    /// chosen for this turn. On error no state is published.
    fn create_next_board_state(
        &mut self,
        prev: &BoardState,
        moves: &SnakeMoves,
        turn: i32,
    ) -> Result<BoardState, RulesError>;

    /// whether the game has ended on the given board
    fn is_game_over(&self, state: &BoardState) -> bool;
}

/// Selects a ruleset by its wire name. Royale and squad use their default
/// sub-configurations; construct those variants directly to tune them.
pub fn ruleset_for_name(name: &str, config: Config) -> Option<Box<dyn Ruleset>> {
    match name {
        "standard" => Some(Box::new(StandardRuleset::new(config))),
        "solo" => Some(Box::new(SoloRuleset::new(config))),
        "constrictor" => Some(Box::new(ConstrictorRuleset::new(config))),
        "royale" => Some(Box::new(RoyaleRuleset::new(config, RoyaleConfig::default()))),
        "squad" => Some(Box::new(SquadRuleset::new(config, SquadConfig::default()))),
        "wrapped" => Some(Box::new(WrappedRuleset::new(config))),
        _ => None,
    }
}
