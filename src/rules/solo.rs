//! Solo variant: a single snake plays until it is gone.
use super::standard::StandardRuleset;
use super::{Config, Ruleset, SnakeMoves};
use crate::board::BoardState;
use crate::errors::RulesError;
use crate::types::{Coordinate, SnakeId};
use rand::rngs::SmallRng;

/// The standard pipeline with the termination predicate flipped: the game
/// is over only when no snakes remain in play.
#[derive(Debug, Clone)]
pub struct SoloRuleset {
    standard: StandardRuleset,
}

impl SoloRuleset {
    /// solo rules with an entropy-seeded random source
    pub fn new(config: Config) -> Self {
        SoloRuleset {
            standard: StandardRuleset::new(config),
        }
    }

    /// solo rules drawing randomness from the given generator
    pub fn with_rng(config: Config, rng: SmallRng) -> Self {
        SoloRuleset {
            standard: StandardRuleset::with_rng(config, rng),
        }
    }
}

impl Ruleset for SoloRuleset {
    fn name(&self) -> &str {
        "solo"
    }

    fn create_initial_board_state(
        &mut self,
        width: Coordinate,
        height: Coordinate,
        snake_ids: &[SnakeId],
    ) -> Result<BoardState, RulesError> {
        self.standard
            .create_initial_board_state(width, height, snake_ids)
    }

    fn create_next_board_state(
        &mut self,
        prev: &BoardState,
        moves: &SnakeMoves,
        turn: i32,
    ) -> Result<BoardState, RulesError> {
        self.standard.create_next_board_state(prev, moves, turn)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        state.alive_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::super::standard::tests::{board_7x7, no_food_config, test_snake};
    use super::*;
    use crate::string_pool::StringPool;
    use rand::SeedableRng;

    #[test]
    fn test_one_live_snake_keeps_the_game_running() {
        let pool = StringPool::new();
        let rules = SoloRuleset::with_rng(no_food_config(), SmallRng::seed_from_u64(1));

        let running = board_7x7(vec![test_snake(&pool, "one", &[(1, 1)], 100)], &[]);
        assert!(!rules.is_game_over(&running));
    }

    #[test]
    fn test_game_over_once_the_snake_is_gone() {
        let pool = StringPool::new();
        let rules = SoloRuleset::with_rng(no_food_config(), SmallRng::seed_from_u64(1));

        let mut snake = test_snake(&pool, "one", &[(1, 1)], 0);
        snake.eliminated_cause = crate::types::EliminatedCause::OutOfHealth;
        let finished = board_7x7(vec![snake], &[]);
        assert!(rules.is_game_over(&finished));
    }
}
