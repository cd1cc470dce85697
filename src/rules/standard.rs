//! The standard ruleset: initial placement and the five-phase turn
//! pipeline every other variant builds on.
use super::{Config, Ruleset, SnakeMoves};
use crate::board::{BoardState, Snake};
use crate::errors::RulesError;
use crate::types::{
    Coordinate, EliminatedCause, Move, Point, SnakeId, BOARD_SIZE_LARGE, BOARD_SIZE_MEDIUM,
    BOARD_SIZE_SMALL, MAX_SNAKES,
};
use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use tracing::instrument;

/// The standard rules. Owns the random source used for placement and food
/// spawning; variants embed one of these and run their overlay after its
/// pipeline.
#[derive(Debug, Clone)]
pub struct StandardRuleset {
    pub(crate) config: Config,
    pub(crate) wrapped: bool,
    pub(crate) rng: SmallRng,
}

impl StandardRuleset {
    /// standard rules with an entropy-seeded random source
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Standard rules drawing randomness from the given generator. Tests
    /// use this to make placement and spawning deterministic.
    pub fn with_rng(config: Config, rng: SmallRng) -> Self {
        StandardRuleset {
            config,
            wrapped: false,
            rng,
        }
    }

    fn is_known_board_size(state: &BoardState) -> bool {
        let (w, h) = (state.width, state.height);
        w == h && (w == BOARD_SIZE_SMALL || w == BOARD_SIZE_MEDIUM || w == BOARD_SIZE_LARGE)
    }

    fn place_snakes_fixed(&mut self, state: &mut BoardState) -> Result<(), RulesError> {
        let left = 1;
        let mid = (state.width - 1) / 2;
        let right = state.width - 2;

        let mut anchors = [
            Point { x: left, y: left },
            Point { x: left, y: mid },
            Point { x: left, y: right },
            Point { x: mid, y: left },
            Point { x: mid, y: right },
            Point { x: right, y: left },
            Point { x: right, y: mid },
            Point { x: right, y: right },
        ];

        if state.snakes.len() > MAX_SNAKES {
            return Err(RulesError::TooManySnakes(state.snakes.len()));
        }
        anchors.shuffle(&mut self.rng);

        let start_size = self.config.snake_start_size;
        for (snake, anchor) in state.snakes.iter_mut().zip(anchors.iter()) {
            snake.body = std::iter::repeat(*anchor).take(start_size).collect();
        }
        Ok(())
    }

    fn place_snakes_randomly(
        &mut self,
        state: &mut BoardState,
        unoccupied: &mut Vec<Point>,
    ) -> Result<(), RulesError> {
        let start_size = self.config.snake_start_size;
        for snake in state.snakes.iter_mut() {
            if unoccupied.is_empty() {
                return Err(RulesError::NoRoomForSnake);
            }
            let ri = self.rng.gen_range(0..unoccupied.len());
            let p = unoccupied.swap_remove(ri);
            snake.body = std::iter::repeat(p).take(start_size).collect();
        }
        Ok(())
    }

    // One food diagonally adjacent to each snake, then one in the center.
    fn place_food_fixed(&mut self, state: &mut BoardState) -> Result<(), RulesError> {
        let mut food_cells: FxHashSet<Point> = FxHashSet::default();

        for snake in &state.snakes {
            let head = match snake.body.front() {
                Some(p) => *p,
                None => continue,
            };
            let candidates = [
                Point {
                    x: head.x - 1,
                    y: head.y - 1,
                },
                Point {
                    x: head.x - 1,
                    y: head.y + 1,
                },
                Point {
                    x: head.x + 1,
                    y: head.y - 1,
                },
                Point {
                    x: head.x + 1,
                    y: head.y + 1,
                },
            ];
            let available = candidates
                .iter()
                .copied()
                .filter(|p| !food_cells.contains(p))
                .collect_vec();
            if available.is_empty() {
                return Err(RulesError::NoRoomForFood);
            }
            let placed = available[self.rng.gen_range(0..available.len())];
            state.food.push(placed);
            food_cells.insert(placed);
        }

        let center = Point {
            x: (state.width - 1) / 2,
            y: (state.height - 1) / 2,
        };
        if food_cells.contains(&center) {
            return Err(RulesError::NoRoomForFood);
        }
        state.food.push(center);
        Ok(())
    }

    fn place_food_randomly(&mut self, state: &mut BoardState, unoccupied: &mut Vec<Point>) {
        let count = state.snakes.len();
        self.spawn_food(state, count, unoccupied);
    }

    fn spawn_food(&mut self, state: &mut BoardState, count: usize, unoccupied: &mut Vec<Point>) {
        for _ in 0..count {
            if unoccupied.is_empty() {
                return;
            }
            let ri = self.rng.gen_range(0..unoccupied.len());
            state.food.push(unoccupied.swap_remove(ri));
        }
    }

    /// Cells free of live snake bodies, scanned bottom row first. With
    /// `exclude_possible_moves` the four cells around each live head are
    /// treated as occupied too.
    fn unoccupied_points(
        state: &BoardState,
        exclude_possible_moves: bool,
        filter: impl Fn(&Point) -> bool,
    ) -> Vec<Point> {
        let mut occupied: FxHashSet<Point> = FxHashSet::default();
        for snake in state.snakes.iter().filter(|s| !s.is_eliminated()) {
            occupied.extend(snake.body.iter().copied());
            if exclude_possible_moves {
                if let Some(&head) = snake.body.front() {
                    occupied.extend([head.up(), head.down(), head.left(), head.right()]);
                }
            }
        }

        let mut unoccupied = Vec::new();
        for y in 0..state.height {
            for x in 0..state.width {
                let p = Point { x, y };
                if occupied.contains(&p) {
                    continue;
                }
                if !filter(&p) {
                    continue;
                }
                unoccupied.push(p);
            }
        }
        unoccupied
    }

    fn even_unoccupied_points(state: &BoardState) -> Vec<Point> {
        Self::unoccupied_points(state, false, |p| (p.x + p.y) % 2 == 0)
    }

    fn check_snakes_for_move(state: &BoardState, moves: &SnakeMoves) -> Result<(), RulesError> {
        for snake in state.snakes.iter().filter(|s| !s.is_eliminated()) {
            if snake.body.is_empty() {
                return Err(RulesError::ZeroLengthSnake(snake.id.clone()));
            }
            if !moves.contains_key(&snake.id) {
                return Err(RulesError::NoMoveFound(snake.id.clone()));
            }
        }
        Ok(())
    }

    fn move_snakes(&self, state: &mut BoardState, moves: &SnakeMoves) -> Result<(), RulesError> {
        Self::check_snakes_for_move(state, moves)?;

        let wrapped = self.wrapped;
        let (width, height) = (state.width, state.height);
        for snake in state.snakes.iter_mut().filter(|s| !s.is_eliminated()) {
            let mv = match moves.get(&snake.id) {
                Some(&mv) => mv,
                None => return Err(RulesError::NoMoveFound(snake.id.clone())),
            };
            let head = match snake.body.front() {
                Some(&p) => p,
                None => return Err(RulesError::ZeroLengthSnake(snake.id.clone())),
            };

            let mut new_head = match mv {
                Move::Up | Move::Down | Move::Left | Move::Right => head.moved(mv),
                Move::Unknown => {
                    // Reconstruct the previous direction from the neck,
                    // defaulting to up when there is none to read.
                    let mut inferred = head.up();
                    if let Some(&neck) = snake.body.get(1) {
                        for dir in Move::all() {
                            if neck.moved(dir) == head {
                                inferred = head.moved(dir);
                            }
                        }
                    }
                    inferred
                }
            };

            if wrapped {
                new_head = new_head.wrapped(width, height);
            }
            snake.advance_to(new_head);
        }
        Ok(())
    }

    fn reduce_snake_health(state: &mut BoardState) {
        for snake in state.snakes.iter_mut().filter(|s| !s.is_eliminated()) {
            snake.health -= 1;
        }
    }

    fn maybe_feed_snakes(&self, state: &mut BoardState) {
        let max_health = self.config.snake_max_health;
        let mut i = 0;
        while i < state.food.len() {
            let food = state.food[i];
            let mut eaten = false;
            for snake in state.snakes.iter_mut() {
                if snake.is_eliminated() || snake.body.is_empty() {
                    continue;
                }
                if snake.body[0] == food {
                    snake.grow();
                    snake.health = max_health;
                    eaten = true;
                }
            }
            if eaten {
                // swap-and-pop, then rescan the index the tail landed on
                state.food.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    fn maybe_spawn_food(&mut self, state: &mut BoardState) {
        let current = state.food.len();
        if current < self.config.minimum_food {
            let needed = self.config.minimum_food - current;
            let mut unoccupied = Self::unoccupied_points(state, false, |_| true);
            self.spawn_food(state, needed, &mut unoccupied);
        } else if self.config.food_spawn_chance > 0
            && self.rng.gen_range(0..100) < self.config.food_spawn_chance
        {
            let mut unoccupied = Self::unoccupied_points(state, false, |_| true);
            self.spawn_food(state, 1, &mut unoccupied);
        }
    }

    fn maybe_eliminate_snakes(&self, state: &mut BoardState) -> Result<(), RulesError> {
        // Length-descending scan order for the collision sub-phase; the
        // sort is stable so ties keep board order.
        let mut by_length: Vec<usize> = (0..state.snakes.len()).collect();
        by_length.sort_by_key(|&i| Reverse(state.snakes[i].length()));

        // Sub-phase A mutates immediately: snakes out of health or bounds
        // can neither cause nor suffer collision eliminations below.
        Self::eliminate_out_of_health_or_bounds(state)?;

        let eliminations = Self::find_collision_eliminations(state, &by_length);
        for snake in state.snakes.iter_mut() {
            if let Some(cause) = eliminations.get(&snake.id) {
                snake.eliminated_cause = cause.clone();
            }
        }
        Ok(())
    }

    fn eliminate_out_of_health_or_bounds(state: &mut BoardState) -> Result<(), RulesError> {
        let (width, height) = (state.width, state.height);
        for snake in state.snakes.iter_mut().filter(|s| !s.is_eliminated()) {
            if snake.body.is_empty() {
                return Err(RulesError::ZeroLengthSnake(snake.id.clone()));
            }
            if snake.is_out_of_health() {
                snake.eliminated_cause = EliminatedCause::OutOfHealth;
                continue;
            }
            let out_of_bounds = snake
                .body
                .iter()
                .any(|p| p.x < 0 || p.x >= width || p.y < 0 || p.y >= height);
            if out_of_bounds {
                snake.eliminated_cause = EliminatedCause::OutOfBounds;
            }
        }
        Ok(())
    }

    // Sub-phase B: collects at most one tag per snake into a side table,
    // applied atomically by the caller.
    fn find_collision_eliminations(
        state: &BoardState,
        by_length: &[usize],
    ) -> FxHashMap<SnakeId, EliminatedCause> {
        let mut result = FxHashMap::default();

        for snake in state.snakes.iter().filter(|s| !s.is_eliminated()) {
            if Self::has_body_collided(snake, snake) {
                result.insert(snake.id.clone(), EliminatedCause::SelfCollision);
                continue;
            }

            let mut body_collided = false;
            for &oi in by_length {
                let other = &state.snakes[oi];
                if other.is_eliminated() || other.id == snake.id {
                    continue;
                }
                if Self::has_body_collided(snake, other) {
                    result.insert(
                        snake.id.clone(),
                        EliminatedCause::Collision {
                            by: other.id.clone(),
                        },
                    );
                    body_collided = true;
                    break;
                }
            }
            if body_collided {
                continue;
            }

            for &oi in by_length {
                let other = &state.snakes[oi];
                if other.is_eliminated() || other.id == snake.id {
                    continue;
                }
                if Self::has_lost_head_to_head(snake, other) {
                    result.insert(
                        snake.id.clone(),
                        EliminatedCause::HeadToHeadCollision {
                            by: other.id.clone(),
                        },
                    );
                    break;
                }
            }
        }

        result
    }

    fn has_body_collided(snake: &Snake, other: &Snake) -> bool {
        let head = match snake.body.front() {
            Some(&p) => p,
            None => return false,
        };
        other.body.iter().skip(1).any(|&p| p == head)
    }

    fn has_lost_head_to_head(snake: &Snake, other: &Snake) -> bool {
        match (snake.body.front(), other.body.front()) {
            (Some(a), Some(b)) => a == b && snake.length() <= other.length(),
            _ => false,
        }
    }
}

impl Ruleset for StandardRuleset {
    fn name(&self) -> &str {
        if self.wrapped {
            "wrapped"
        } else {
            "standard"
        }
    }

    fn create_initial_board_state(
        &mut self,
        width: Coordinate,
        height: Coordinate,
        snake_ids: &[SnakeId],
    ) -> Result<BoardState, RulesError> {
        let snakes = snake_ids
            .iter()
            .map(|id| Snake {
                id: id.clone(),
                health: self.config.snake_max_health,
                ..Snake::default()
            })
            .collect();
        let mut state = BoardState {
            width,
            height,
            snakes,
            ..BoardState::default()
        };

        if Self::is_known_board_size(&state) {
            self.place_snakes_fixed(&mut state)?;
            self.place_food_fixed(&mut state)?;
        } else {
            let mut unoccupied = Self::even_unoccupied_points(&state);
            self.place_snakes_randomly(&mut state, &mut unoccupied)?;
            self.place_food_randomly(&mut state, &mut unoccupied);
        }

        Ok(state)
    }

    #[instrument(level = "trace", skip_all)]
    fn create_next_board_state(
        &mut self,
        prev: &BoardState,
        moves: &SnakeMoves,
        _turn: i32,
    ) -> Result<BoardState, RulesError> {
        let mut next = prev.clone();

        self.move_snakes(&mut next, moves)?;
        Self::reduce_snake_health(&mut next);
        self.maybe_feed_snakes(&mut next);
        self.maybe_spawn_food(&mut next);
        self.maybe_eliminate_snakes(&mut next)?;

        Ok(next)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        state.alive_count() <= 1
    }
}
