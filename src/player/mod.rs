//! The agent boundary and a local game orchestrator.
//!
//! An [`Agent`] is anything that can answer the four battlesnake calls.
//! [`GamePlayer`] seats registered agents on a board, collects a move from
//! each live snake every turn, and steps the chosen ruleset until its
//! termination predicate fires. Requests are issued sequentially; parallel
//! dispatch and timeouts belong to network adapters, which sit outside the
//! engine.
use crate::board::{BoardState, Customization, GameInfo, GameState, RulesetInfo};
use crate::errors::RulesError;
use crate::rules::{Ruleset, SnakeMoves};
use crate::string_pool::StringPool;
use crate::types::{Coordinate, Move, SnakeId, BOARD_SIZE_MEDIUM};
use rand::rngs::SmallRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Reply to a move request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MoveResponse {
    /// the chosen direction
    #[serde(rename = "move")]
    pub mv: Move,
    /// optional taunt, recorded on the snake
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shout: String,
}

impl Default for MoveResponse {
    fn default() -> Self {
        MoveResponse {
            mv: Move::Unknown,
            shout: String::new(),
        }
    }
}

/// One participant in a game. The engine never validates timing; a remote
/// implementation must enforce its own timeout before answering.
pub trait Agent: std::fmt::Debug {
    /// cosmetic registration data
    fn customization(&self) -> Customization {
        Customization::default()
    }

    /// notification that a game this agent is seated in has started
    fn start(&mut self, _game: &GameState) {}

    /// notification that the game has ended
    fn end(&mut self, _game: &GameState) {}

    /// the agent's move for the presented state
    fn make_move(&mut self, game: &GameState) -> MoveResponse;
}

/// Agent that picks a uniformly random cardinal move, avoiding only an
/// immediate reversal onto its own neck.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: SmallRng,
}

impl RandomAgent {
    /// a random agent seeded from entropy
    pub fn new() -> Self {
        RandomAgent {
            rng: SmallRng::from_entropy(),
        }
    }

    /// a random agent drawing from the given generator
    pub fn with_rng(rng: SmallRng) -> Self {
        RandomAgent { rng }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn make_move(&mut self, game: &GameState) -> MoveResponse {
        let head = game.you.head();
        let neck = game.you.body.get(1).copied();

        let mv = Move::all()
            .iter()
            .copied()
            .filter(|mv| match (head, neck) {
                (Some(h), Some(n)) => h.moved(*mv) != n,
                _ => true,
            })
            .choose(&mut self.rng)
            .unwrap_or(Move::Up);

        MoveResponse {
            mv,
            shout: String::new(),
        }
    }
}

#[derive(Debug)]
struct RegisteredAgent {
    id: String,
    name: String,
    squad: String,
    agent: Box<dyn Agent>,
}

/// Plays one game: placement, per-turn move collection, and termination.
/// Registration order is seating order, which the engine keeps stable for
/// the whole game.
#[derive(Debug)]
pub struct GamePlayer {
    pool: Arc<StringPool>,
    game_id: String,
    timeout: i32,
    width: Coordinate,
    height: Coordinate,
    players: Vec<RegisteredAgent>,
    ruleset: Box<dyn Ruleset>,
    winners: Vec<SnakeId>,
}

impl GamePlayer {
    /// A player over the given ruleset with its own string pool, a medium
    /// board, and the default timeout.
    pub fn new(ruleset: Box<dyn Ruleset>) -> Self {
        Self::with_pool(ruleset, Arc::new(StringPool::new()))
    }

    /// A player interning through a shared pool, for hosts running many
    /// games.
    pub fn with_pool(ruleset: Box<dyn Ruleset>, pool: Arc<StringPool>) -> Self {
        GamePlayer {
            pool,
            game_id: "local-game".to_owned(),
            timeout: 500,
            width: BOARD_SIZE_MEDIUM,
            height: BOARD_SIZE_MEDIUM,
            players: Vec::new(),
            ruleset,
            winners: Vec::new(),
        }
    }

    /// sets the game id reported to agents
    pub fn set_game_id(&mut self, game_id: &str) {
        self.game_id = game_id.to_owned();
    }

    /// sets the board dimensions used at placement
    pub fn set_board_size(&mut self, width: Coordinate, height: Coordinate) {
        self.width = width;
        self.height = height;
    }

    /// Seats another agent. An empty `name` falls back to the id; `squad`
    /// is only meaningful under squad rules.
    pub fn add_agent(&mut self, id: &str, name: &str, squad: &str, agent: Box<dyn Agent>) {
        self.players.push(RegisteredAgent {
            id: id.to_owned(),
            name: if name.is_empty() {
                id.to_owned()
            } else {
                name.to_owned()
            },
            squad: squad.to_owned(),
            agent,
        });
    }

    /// The snakes that were still in play when the game ended. Empty until
    /// `play` completes, and empty after a fully drawn game.
    pub fn winners(&self) -> &[SnakeId] {
        &self.winners
    }

    fn game_state_for(&self, game: &GameInfo, turn: i32, board: &BoardState, seat: usize) -> GameState {
        GameState {
            game: game.clone(),
            turn,
            board: board.clone(),
            you: board.snakes[seat].clone(),
        }
    }

    /// Runs the game to completion. Returns the final board; `winners`
    /// holds the surviving snake ids afterwards.
    pub fn play(&mut self) -> Result<BoardState, RulesError> {
        let ids: Vec<SnakeId> = self.players.iter().map(|p| self.pool.add(&p.id)).collect();
        let mut board = self
            .ruleset
            .create_initial_board_state(self.width, self.height, &ids)?;
        for (snake, player) in board.snakes.iter_mut().zip(self.players.iter()) {
            snake.name = self.pool.add(&player.name);
            snake.squad = self.pool.add(&player.squad);
        }

        let game_info = GameInfo {
            id: self.pool.add(&self.game_id),
            ruleset: RulesetInfo {
                name: self.pool.add(self.ruleset.name()),
                version: self.pool.add("v0.0.1"),
            },
            timeout: self.timeout,
        };

        let mut turn = 0;
        for seat in 0..self.players.len() {
            let state = self.game_state_for(&game_info, turn, &board, seat);
            self.players[seat].agent.start(&state);
        }

        loop {
            let mut moves = SnakeMoves::default();
            let mut responses = Vec::new();
            for seat in 0..self.players.len() {
                if board.snakes[seat].is_eliminated() {
                    continue;
                }
                let state = self.game_state_for(&game_info, turn, &board, seat);
                let started = Instant::now();
                let response = self.players[seat].agent.make_move(&state);
                let latency = started.elapsed().as_millis();

                moves.insert(board.snakes[seat].id.clone(), response.mv);
                responses.push((seat, response, latency));
            }

            board = self.ruleset.create_next_board_state(&board, &moves, turn + 1)?;
            turn += 1;

            for (seat, response, latency) in responses {
                let snake = &mut board.snakes[seat];
                snake.latency = self.pool.add(&latency.to_string());
                if !response.shout.is_empty() {
                    snake.shout = self.pool.add(&response.shout);
                }
            }

            debug!(turn, alive = board.alive_count(), "turn complete");
            if self.ruleset.is_game_over(&board) {
                break;
            }
        }

        self.winners = board
            .snakes
            .iter()
            .filter(|s| !s.is_eliminated())
            .map(|s| s.id.clone())
            .collect();

        for seat in 0..self.players.len() {
            let state = self.game_state_for(&game_info, turn, &board, seat);
            self.players[seat].agent.end(&state);
        }

        Ok(board)
    }
}
