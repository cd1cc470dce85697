//! Wrapped variant: the board is a torus, so heads wrap instead of leaving
//! the board.
use super::standard::StandardRuleset;
use super::{Config, Ruleset, SnakeMoves};
use crate::board::BoardState;
use crate::errors::RulesError;
use crate::types::{Coordinate, SnakeId};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// The standard pipeline with toroidal head placement. `OutOfBounds` is
/// unreachable here. Hazards are carried as an explicit cell set; no growth
/// schedule is applied to them.
#[derive(Debug, Clone)]
pub struct WrappedRuleset {
    standard: StandardRuleset,
}

impl WrappedRuleset {
    /// wrapped rules with an entropy-seeded random source
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// wrapped rules drawing randomness from the given generator
    pub fn with_rng(config: Config, rng: SmallRng) -> Self {
        let mut standard = StandardRuleset::with_rng(config, rng);
        standard.wrapped = true;
        WrappedRuleset { standard }
    }
}

impl Ruleset for WrappedRuleset {
    fn name(&self) -> &str {
        "wrapped"
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
        self.standard.is_game_over(state)
    }
}

#[cfg(test)]
mod tests {
    use super::super::standard::tests::{board_7x7, moves_of, no_food_config, p, test_snake};
    use super::*;
    use crate::string_pool::StringPool;
    use crate::types::Move;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn rules() -> WrappedRuleset {
        WrappedRuleset::with_rng(no_food_config(), SmallRng::seed_from_u64(9))
    }

    #[test]
    fn test_head_wraps_across_the_left_edge() {
        let pool = StringPool::new();
        let one = test_snake(&pool, "one", &[(0, 3), (1, 3), (2, 3)], 100);
        let moves = moves_of(&[(&one, Move::Left)]);
        let board = board_7x7(vec![one], &[]);

        let next = rules().create_next_board_state(&board, &moves, 1).unwrap();

        assert_eq!(
            next.snakes[0].body,
            VecDeque::from(vec![p(6, 3), p(0, 3), p(1, 3)])
        );
        assert!(!next.snakes[0].is_eliminated());
    }

    #[test]
    fn test_head_wraps_across_the_top_edge() {
        let pool = StringPool::new();
        let one = test_snake(&pool, "one", &[(3, 6), (3, 5), (3, 4)], 100);
        let moves = moves_of(&[(&one, Move::Up)]);
        let board = board_7x7(vec![one], &[]);

        let next = rules().create_next_board_state(&board, &moves, 1).unwrap();

        assert_eq!(next.snakes[0].body[0], p(3, 0));
        assert!(!next.snakes[0].is_eliminated());
    }

    #[test]
    fn test_wrapping_can_still_feed() {
        let pool = StringPool::new();
        let one = test_snake(&pool, "one", &[(6, 2), (5, 2), (4, 2)], 50);
        let moves = moves_of(&[(&one, Move::Right)]);
        let board = board_7x7(vec![one], &[(0, 2)]);

        let next = rules().create_next_board_state(&board, &moves, 1).unwrap();

        assert_eq!(next.snakes[0].body[0], p(0, 2));
        assert_eq!(next.snakes[0].health, 100);
        assert_eq!(next.snakes[0].length(), 4);
        assert!(next.food.is_empty());
    }
}
