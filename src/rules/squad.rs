//! Squad variant: snakes with matching squad labels fight as a team.
use super::standard::StandardRuleset;
use super::{Config, Ruleset, SnakeMoves};
use crate::board::BoardState;
use crate::errors::RulesError;
use crate::string_pool::InternedStr;
use crate::types::{Coordinate, EliminatedCause, SnakeId};
use fxhash::FxHashMap;
use itertools::Itertools;
use rand::rngs::SmallRng;

/// Squad tunables. All sharing is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquadConfig {
    /// body collisions between squad mates are forgiven
    pub allow_body_collisions: bool,
    /// losing any squad mate eliminates the whole squad
    pub shared_elimination: bool,
    /// every squad mate enjoys the squad's best health
    pub shared_health: bool,
    /// every squad mate grows to the squad's best length
    pub shared_length: bool,
}

impl Default for SquadConfig {
    fn default() -> Self {
        SquadConfig {
            allow_body_collisions: true,
            shared_elimination: true,
            shared_health: true,
            shared_length: true,
        }
    }
}

/// The standard pipeline followed by the squad overlay: same-squad body
/// collisions are untagged, then the configured attributes are shared
/// between squad mates.
#[derive(Debug, Clone)]
pub struct SquadRuleset {
    standard: StandardRuleset,
    squad_config: SquadConfig,
}

impl SquadRuleset {
    /// squad rules with an entropy-seeded random source
    pub fn new(config: Config, squad_config: SquadConfig) -> Self {
        SquadRuleset {
            standard: StandardRuleset::new(config),
            squad_config,
        }
    }

    /// squad rules drawing randomness from the given generator
    pub fn with_rng(config: Config, squad_config: SquadConfig, rng: SmallRng) -> Self {
        SquadRuleset {
            standard: StandardRuleset::with_rng(config, rng),
            squad_config,
        }
    }

    fn resurrect_squad_body_collisions(&self, state: &mut BoardState) -> Result<(), RulesError> {
        if !self.squad_config.allow_body_collisions {
            return Ok(());
        }

        let squads: FxHashMap<SnakeId, InternedStr> = state
            .snakes
            .iter()
            .map(|s| (s.id.clone(), s.squad.clone()))
            .collect();

        for snake in state.snakes.iter_mut() {
            let by = match &snake.eliminated_cause {
                EliminatedCause::Collision { by } => by.clone(),
                _ => continue,
            };
            let eliminator_squad =
                squads
                    .get(&by)
                    .ok_or_else(|| RulesError::InvalidEliminatedById {
                        id: snake.id.clone(),
                        by_id: by.clone(),
                    })?;
            if &snake.squad != eliminator_squad {
                continue;
            }
            snake.eliminated_cause = EliminatedCause::NotEliminated;
        }
        Ok(())
    }

    // Each ordered pair is visited once, reading whatever state earlier
    // pairs produced, so shares cascade within a single pass.
    fn share_squad_attributes(&self, state: &mut BoardState) {
        let config = self.squad_config;
        if !config.shared_elimination && !config.shared_health && !config.shared_length {
            return;
        }

        for i in 0..state.snakes.len() {
            // eliminated snakes are frozen; they can donate but not receive
            if state.snakes[i].is_eliminated() {
                continue;
            }
            for j in 0..state.snakes.len() {
                if i == j || state.snakes[i].squad != state.snakes[j].squad {
                    continue;
                }

                let other_health = state.snakes[j].health;
                let other_length = state.snakes[j].length();
                let other_eliminated = state.snakes[j].is_eliminated();

                let snake = &mut state.snakes[i];
                if config.shared_health {
                    snake.health = snake.health.max(other_health);
                }
                if config.shared_length {
                    while snake.length() < other_length {
                        snake.grow();
                    }
                }
                if config.shared_elimination && !snake.is_eliminated() && other_eliminated {
                    snake.eliminated_cause = EliminatedCause::BySquad;
                }
            }
        }
    }
}

impl Ruleset for SquadRuleset {
    fn name(&self) -> &str {
        "squad"
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

        self.resurrect_squad_body_collisions(&mut next)?;
        self.share_squad_attributes(&mut next);

        Ok(next)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        state
            .alive_snakes()
            .map(|s| s.squad.clone())
            .unique()
            .count()
            <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::super::standard::tests::{board_7x7, moves_of, no_food_config, test_snake};
    use super::*;
    use crate::board::Snake;
    use crate::string_pool::StringPool;
    use crate::types::Move;
    use rand::SeedableRng;

    fn rules(squad_config: SquadConfig) -> SquadRuleset {
        SquadRuleset::with_rng(no_food_config(), squad_config, SmallRng::seed_from_u64(21))
    }

    fn squad_snake(
        pool: &StringPool,
        id: &str,
        squad: &str,
        cells: &[(i8, i8)],
        health: i32,
    ) -> Snake {
        Snake {
            squad: pool.add(squad),
            ..test_snake(pool, id, cells, health)
        }
    }

    fn no_sharing() -> SquadConfig {
        SquadConfig {
            allow_body_collisions: true,
            shared_elimination: false,
            shared_health: false,
            shared_length: false,
        }
    }

    #[test]
    fn test_same_squad_body_collision_is_forgiven() {
        let pool = StringPool::new();
        let one = squad_snake(&pool, "one", "red", &[(2, 3), (2, 4), (2, 5)], 100);
        let two = squad_snake(&pool, "two", "red", &[(1, 2), (2, 2), (3, 2), (3, 3)], 100);
        let moves = moves_of(&[(&one, Move::Down), (&two, Move::Left)]);
        let board = board_7x7(vec![one, two], &[]);

        let next = rules(no_sharing())
            .create_next_board_state(&board, &moves, 1)
            .unwrap();

        assert_eq!(
            next.snakes[0].eliminated_cause,
            EliminatedCause::NotEliminated
        );
    }

    #[test]
    fn test_cross_squad_body_collision_stands() {
        let pool = StringPool::new();
        let one = squad_snake(&pool, "one", "red", &[(2, 3), (2, 4), (2, 5)], 100);
        let two = squad_snake(&pool, "two", "blue", &[(1, 2), (2, 2), (3, 2), (3, 3)], 100);
        let moves = moves_of(&[(&one, Move::Down), (&two, Move::Left)]);
        let board = board_7x7(vec![one, two], &[]);

        let next = rules(no_sharing())
            .create_next_board_state(&board, &moves, 1)
            .unwrap();

        let two_id = next.snakes[1].id.clone();
        assert_eq!(
            next.snakes[0].eliminated_cause,
            EliminatedCause::Collision { by: two_id }
        );
    }

    #[test]
    fn test_unknown_eliminator_fails_the_turn() {
        let pool = StringPool::new();
        let mut one = squad_snake(&pool, "one", "red", &[(2, 2), (2, 3), (2, 4)], 100);
        one.eliminated_cause = EliminatedCause::Collision {
            by: pool.add("nobody"),
        };
        let two = squad_snake(&pool, "two", "red", &[(5, 5), (5, 4), (5, 3)], 100);
        let moves = moves_of(&[(&two, Move::Down)]);
        let board = board_7x7(vec![one, two], &[]);

        let err = rules(no_sharing())
            .create_next_board_state(&board, &moves, 1)
            .unwrap_err();
        assert!(matches!(err, RulesError::InvalidEliminatedById { .. }));
    }

    #[test]
    fn test_shared_health_and_length() {
        let pool = StringPool::new();
        let one = squad_snake(&pool, "one", "red", &[(1, 1), (1, 2), (1, 3)], 30);
        let two = squad_snake(
            &pool,
            "two",
            "red",
            &[(5, 5), (5, 4), (5, 3), (4, 3), (4, 4)],
            90,
        );
        let moves = moves_of(&[(&one, Move::Down), (&two, Move::Up)]);
        let board = board_7x7(vec![one, two], &[]);

        let next = rules(SquadConfig::default())
            .create_next_board_state(&board, &moves, 1)
            .unwrap();

        assert_eq!(next.snakes[0].health, 89);
        assert_eq!(next.snakes[1].health, 89);
        assert_eq!(next.snakes[0].length(), 5);
        assert_eq!(next.snakes[1].length(), 5);
    }

    #[test]
    fn test_shared_elimination_takes_the_squad_down() {
        let pool = StringPool::new();
        let one = squad_snake(&pool, "one", "red", &[(0, 1), (0, 2), (0, 3)], 100);
        let two = squad_snake(&pool, "two", "red", &[(5, 5), (5, 4), (5, 3)], 100);
        let moves = moves_of(&[(&one, Move::Left), (&two, Move::Up)]);
        let board = board_7x7(vec![one, two], &[]);

        let config = SquadConfig {
            shared_health: false,
            shared_length: false,
            ..SquadConfig::default()
        };
        let next = rules(config)
            .create_next_board_state(&board, &moves, 1)
            .unwrap();

        assert_eq!(next.snakes[0].eliminated_cause, EliminatedCause::OutOfBounds);
        assert_eq!(next.snakes[1].eliminated_cause, EliminatedCause::BySquad);
    }

    #[test]
    fn test_game_over_counts_squads_not_snakes() {
        let pool = StringPool::new();
        let rules = rules(SquadConfig::default());

        let same_squad = board_7x7(
            vec![
                squad_snake(&pool, "one", "red", &[(1, 1)], 100),
                squad_snake(&pool, "two", "red", &[(5, 5)], 100),
            ],
            &[],
        );
        assert!(rules.is_game_over(&same_squad));

        let two_squads = board_7x7(
            vec![
                squad_snake(&pool, "one", "red", &[(1, 1)], 100),
                squad_snake(&pool, "two", "blue", &[(5, 5)], 100),
            ],
            &[],
        );
        assert!(!rules.is_game_over(&two_squads));
    }
}
