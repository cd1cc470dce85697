//! Royale variant: a hazard border creeps inward and drains any snake whose
//! head lingers outside the safe inset.
use super::standard::StandardRuleset;
use super::{Config, Ruleset, SnakeMoves};
use crate::board::{BoardState, HazardBorder};
use crate::errors::RulesError;
use crate::types::{Coordinate, EliminatedCause, SnakeId};
use rand::rngs::SmallRng;
use rand::Rng;

/// Royale tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoyaleConfig {
    /// a side of the inset shrinks every this-many turns
    pub shrink_every_n_turns: i32,
    /// Total health lost per turn spent with the head in hazard, counting
    /// the regular per-turn decrement.
    pub extra_damage_per_turn: i32,
}

impl Default for RoyaleConfig {
    fn default() -> Self {
        RoyaleConfig {
            shrink_every_n_turns: 25,
            extra_damage_per_turn: 15,
        }
    }
}

/// Inclusive safe rectangle derived from the hazard border descriptor.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: Coordinate,
    max_x: Coordinate,
    min_y: Coordinate,
    max_y: Coordinate,
}

/// The standard pipeline followed by the royale overlay: hazard damage for
/// heads outside the inset, then a periodic one-cell shrink of a random
/// side.
#[derive(Debug, Clone)]
pub struct RoyaleRuleset {
    standard: StandardRuleset,
    royale_config: RoyaleConfig,
}

impl RoyaleRuleset {
    /// royale rules with an entropy-seeded random source
    pub fn new(config: Config, royale_config: RoyaleConfig) -> Self {
        RoyaleRuleset {
            standard: StandardRuleset::new(config),
            royale_config,
        }
    }

    /// royale rules drawing randomness from the given generator
    pub fn with_rng(config: Config, royale_config: RoyaleConfig, rng: SmallRng) -> Self {
        RoyaleRuleset {
            standard: StandardRuleset::with_rng(config, rng),
            royale_config,
        }
    }

    fn find_bounds(state: &BoardState) -> Bounds {
        let border = state.hazard_border;
        Bounds {
            min_x: border.depth_left,
            max_x: state.width - border.depth_right - 1,
            min_y: border.depth_bottom,
            max_y: state.height - border.depth_top - 1,
        }
    }

    fn damage_out_of_bounds(&self, bounds: Bounds, state: &mut BoardState) {
        let max_health = self.standard.config.snake_max_health;
        for snake in state.snakes.iter_mut().filter(|s| !s.is_eliminated()) {
            let head = match snake.body.front() {
                Some(&p) => p,
                None => continue,
            };

            let in_bounds = head.x >= bounds.min_x
                && head.x <= bounds.max_x
                && head.y >= bounds.min_y
                && head.y <= bounds.max_y;
            if in_bounds {
                continue;
            }

            if snake.health != max_health {
                // Health at max means food was eaten this turn, which
                // shields the snake. The standard phase already took one
                // point, so the hazard accounts for the rest.
                snake.health -= self.royale_config.extra_damage_per_turn - 1;
            }
            if snake.is_out_of_health() {
                snake.health = 0;
                snake.eliminated_cause = EliminatedCause::OutOfHealth;
            }
        }
    }

    fn maybe_shrink_bounds(&mut self, turn: i32, bounds: &mut Bounds) -> bool {
        if turn <= 0 || turn % self.royale_config.shrink_every_n_turns != 0 {
            return false;
        }
        if bounds.max_x < bounds.min_x || bounds.max_y < bounds.min_y {
            return false;
        }

        match self.standard.rng.gen_range(0..4) {
            0 => bounds.min_x += 1,
            1 => bounds.max_x -= 1,
            2 => bounds.min_y += 1,
            _ => bounds.max_y -= 1,
        }
        true
    }

    fn fill_hazard_border(bounds: Bounds, state: &mut BoardState) {
        state.hazard_border = HazardBorder {
            depth_left: bounds.min_x,
            depth_right: state.width - bounds.max_x - 1,
            depth_bottom: bounds.min_y,
            depth_top: state.height - bounds.max_y - 1,
        };
    }
}

impl Ruleset for RoyaleRuleset {
    fn name(&self) -> &str {
        "royale"
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

        let mut bounds = Self::find_bounds(&next);
        self.damage_out_of_bounds(bounds, &mut next);
        if self.maybe_shrink_bounds(turn, &mut bounds) {
            Self::fill_hazard_border(bounds, &mut next);
        }

        Ok(next)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        self.standard.is_game_over(state)
    }
}

#[cfg(test)]
mod tests {
    use super::super::standard::tests::{board_7x7, moves_of, no_food_config, test_snake};
    use super::*;
    use crate::board::HazardBorder;
    use crate::string_pool::StringPool;
    use crate::types::Move;
    use rand::SeedableRng;

    fn rules(royale_config: RoyaleConfig) -> RoyaleRuleset {
        RoyaleRuleset::with_rng(no_food_config(), royale_config, SmallRng::seed_from_u64(3))
    }

    fn left_border_board(snakes: Vec<crate::board::Snake>) -> BoardState {
        BoardState {
            hazard_border: HazardBorder {
                depth_left: 1,
                ..HazardBorder::default()
            },
            ..board_7x7(snakes, &[])
        }
    }

    #[test]
    fn test_head_outside_inset_takes_hazard_damage() {
        let pool = StringPool::new();
        let one = test_snake(&pool, "one", &[(0, 1), (0, 2), (0, 3)], 100);
        let moves = moves_of(&[(&one, Move::Down)]);
        let board = left_border_board(vec![one]);

        let next = rules(RoyaleConfig::default())
            .create_next_board_state(&board, &moves, 1)
            .unwrap();

        assert_eq!(next.snakes[0].health, 85);
    }

    #[test]
    fn test_head_inside_inset_loses_one_point() {
        let pool = StringPool::new();
        let one = test_snake(&pool, "one", &[(1, 1), (1, 2), (1, 3)], 100);
        let moves = moves_of(&[(&one, Move::Down)]);
        let board = left_border_board(vec![one]);

        let next = rules(RoyaleConfig::default())
            .create_next_board_state(&board, &moves, 1)
            .unwrap();

        assert_eq!(next.snakes[0].health, 99);
    }

    #[test]
    fn test_feeding_in_hazard_shields_the_snake() {
        let pool = StringPool::new();
        let one = test_snake(&pool, "one", &[(0, 1), (0, 2), (0, 3)], 50);
        let moves = moves_of(&[(&one, Move::Down)]);
        let mut board = left_border_board(vec![one]);
        board.food.push(crate::types::Point { x: 0, y: 0 });

        let next = rules(RoyaleConfig::default())
            .create_next_board_state(&board, &moves, 1)
            .unwrap();

        assert_eq!(next.snakes[0].health, 100);
    }

    #[test]
    fn test_hazard_drains_to_elimination() {
        let pool = StringPool::new();
        let one = test_snake(&pool, "one", &[(0, 1), (0, 2), (0, 3)], 10);
        let moves = moves_of(&[(&one, Move::Down)]);
        let board = left_border_board(vec![one]);

        let next = rules(RoyaleConfig::default())
            .create_next_board_state(&board, &moves, 1)
            .unwrap();

        assert_eq!(next.snakes[0].health, 0);
        assert_eq!(next.snakes[0].eliminated_cause, EliminatedCause::OutOfHealth);
    }

    #[test]
    fn test_border_shrinks_on_schedule() {
        let pool = StringPool::new();
        let one = test_snake(&pool, "one", &[(3, 3), (3, 4), (3, 5)], 100);
        let moves = moves_of(&[(&one, Move::Down)]);
        let board = board_7x7(vec![one], &[]);

        let depth_sum = |b: &HazardBorder| {
            i32::from(b.depth_left)
                + i32::from(b.depth_right)
                + i32::from(b.depth_top)
                + i32::from(b.depth_bottom)
        };

        let mut rules = rules(RoyaleConfig {
            shrink_every_n_turns: 1,
            ..RoyaleConfig::default()
        });

        // any of the four sides may shrink, but exactly one does per turn
        let next = rules.create_next_board_state(&board, &moves, 1).unwrap();
        assert_eq!(depth_sum(&next.hazard_border), 1);
    }

    #[test]
    fn test_no_shrink_off_schedule_or_on_turn_zero() {
        let pool = StringPool::new();
        let one = test_snake(&pool, "one", &[(3, 3), (3, 4), (3, 5)], 100);
        let moves = moves_of(&[(&one, Move::Down)]);
        let board = board_7x7(vec![one], &[]);

        let mut on_schedule = rules(RoyaleConfig {
            shrink_every_n_turns: 25,
            ..RoyaleConfig::default()
        });
        let next = on_schedule.create_next_board_state(&board, &moves, 1).unwrap();
        assert!(next.hazard_border.is_clear());

        let mut every_turn = rules(RoyaleConfig {
            shrink_every_n_turns: 1,
            ..RoyaleConfig::default()
        });
        let next = every_turn.create_next_board_state(&board, &moves, 0).unwrap();
        assert!(next.hazard_border.is_clear());
    }

    #[test]
    fn test_new_border_does_not_damage_on_the_same_turn() {
        let pool = StringPool::new();
        let one = test_snake(&pool, "one", &[(1, 1), (1, 2), (1, 3)], 100);
        let moves = moves_of(&[(&one, Move::Down)]);
        let board = board_7x7(vec![one], &[]);

        // repeat: the shrinking side is random, the health outcome is not
        for seed in 0..20 {
            let mut rules = RoyaleRuleset::with_rng(
                no_food_config(),
                RoyaleConfig {
                    shrink_every_n_turns: 1,
                    ..RoyaleConfig::default()
                },
                SmallRng::seed_from_u64(seed),
            );
            let next = rules.create_next_board_state(&board, &moves, 1).unwrap();
            assert_eq!(next.snakes[0].health, 99);
        }
    }
}
