//! Constrictor variant: no food, no starving, bodies only ever grow.
use super::standard::StandardRuleset;
use super::{Config, Ruleset, SnakeMoves};
use crate::board::BoardState;
use crate::errors::RulesError;
use crate::types::{Coordinate, SnakeId};
use rand::rngs::SmallRng;

/// The standard pipeline followed by the constrictor overlay: food is
/// cleared, health is pinned at the maximum, and every snake whose tail has
/// separated from its penultimate cell grows back by one, so the tail never
/// actually advances.
#[derive(Debug, Clone)]
pub struct ConstrictorRuleset {
    standard: StandardRuleset,
}

impl ConstrictorRuleset {
    /// constrictor rules with an entropy-seeded random source
    pub fn new(config: Config) -> Self {
        ConstrictorRuleset {
            standard: StandardRuleset::new(config),
        }
    }

    /// constrictor rules drawing randomness from the given generator
    pub fn with_rng(config: Config, rng: SmallRng) -> Self {
        ConstrictorRuleset {
            standard: StandardRuleset::with_rng(config, rng),
        }
    }

    fn apply_constrictor_rules(&self, state: &mut BoardState) {
        state.food.clear();

        let max_health = self.standard.config.snake_max_health;
        for snake in state.snakes.iter_mut().filter(|s| !s.is_eliminated()) {
            snake.health = max_health;

            if snake.length() < 2 {
                snake.grow();
                continue;
            }
            let tail = snake.body[snake.body.len() - 1];
            let sub_tail = snake.body[snake.body.len() - 2];
            if tail != sub_tail {
                snake.grow();
            }
        }
    }
}

impl Ruleset for ConstrictorRuleset {
    fn name(&self) -> &str {
        "constrictor"
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
        let mut next = self.standard.create_next_board_state(prev, moves, turn)?;
        self.apply_constrictor_rules(&mut next);
        Ok(next)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        self.standard.is_game_over(state)
    }
}
