//! Turn engine: runs rounds of conversion and movement on a board.

use crate::board::{Board, Standings};
use crate::goal::goal_location;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rps_core::{ArenaConfig, Location, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument, trace};

/// A running arena: the board plus the round loop state.
///
/// Every randomized decision draws from one seeded `ChaCha8Rng`, so two games built from the same
/// config play out identically.
pub struct Game {
    board: Board,
    config: ArenaConfig,
    rng: ChaCha8Rng,
    round: u64,
    paused: bool,
    initialized: bool,
}

/// Outcome of one round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u64,
    /// Players that captured at least one neighbor
    pub conversions: usize,
    /// Players whose kind was overwritten
    pub converted: usize,
    pub moves: usize,
    pub holds: usize,
    pub standings: Standings,
}

impl Game {
    /// Create an empty, uninitialized game.
    pub fn new(config: ArenaConfig) -> Result<Self> {
        config.validate()?;
        let board = Board::from_config(&config)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(Self {
            board,
            config,
            rng,
            round: 0,
            paused: false,
            initialized: false,
        })
    }

    /// Wrap an already populated board; its bounds replace the configured ones.
    pub fn from_board(board: Board, config: ArenaConfig) -> Result<Self> {
        let config = ArenaConfig {
            max_x: board.max_x,
            max_y: board.max_y,
            ..config
        };
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(Self {
            board,
            config,
            rng,
            round: 0,
            paused: false,
            initialized: true,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_over(&self) -> bool {
        self.board.is_over()
    }

    /// Flip the pause flag, returning the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        debug!(event = "pause_toggled", paused = self.paused, round = self.round);
        self.paused
    }

    /// Start over with `population` freshly seeded players.
    #[instrument(skip(self), fields(max_x = self.board.max_x, max_y = self.board.max_y))]
    pub fn new_game(&mut self, population: usize) -> Result<()> {
        self.board.seed(population, &mut self.rng)?;
        self.round = 0;
        self.initialized = true;

        let standings = self.board.standings();
        info!(
            event = "game_started",
            population = population,
            rock = standings.rock,
            paper = standings.paper,
            scissors = standings.scissors,
            "New game started"
        );

        Ok(())
    }

    /// Seed the configured population if no game has been started yet.
    pub fn ensure_initialized(&mut self) -> Result<()> {
        if !self.initialized {
            self.new_game(self.config.population)?;
        }
        Ok(())
    }

    /// Update the bounds. Stranded players stay until [`Game::prune_out_of_bounds`].
    pub fn resize(&mut self, max_x: i32, max_y: i32) -> Result<()> {
        self.board.resize(max_x, max_y)?;
        self.config.max_x = max_x;
        self.config.max_y = max_y;
        Ok(())
    }

    pub fn prune_out_of_bounds(&mut self) -> usize {
        self.board.prune_out_of_bounds()
    }

    /// Handle one timer tick: play a round unless paused.
    pub fn tick(&mut self) -> Result<Option<RoundReport>> {
        if self.paused {
            return Ok(None);
        }

        self.ensure_initialized()?;
        Ok(Some(self.take_turn()))
    }

    /// Play one full round: conversion, then movement, then reset.
    pub fn take_turn(&mut self) -> RoundReport {
        let was_over = self.board.is_over();
        self.round += 1;

        // Players that have used up their turn this round, keyed by where they stand now.
        let mut acted: HashSet<Location> = HashSet::with_capacity(self.board.len());

        let (conversions, converted) = self.convert_players(&mut acted);
        let (moves, holds) = self.move_players(&mut acted);

        let report = RoundReport {
            round: self.round,
            conversions,
            converted,
            moves,
            holds,
            standings: self.board.standings(),
        };

        debug!(
            event = "round_complete",
            round = report.round,
            conversions = report.conversions,
            converted = report.converted,
            moves = report.moves,
            holds = report.holds,
            rock = report.standings.rock,
            paper = report.standings.paper,
            scissors = report.standings.scissors,
            "Round complete"
        );

        if !was_over && self.board.is_over() {
            info!(
                event = "game_over",
                round = self.round,
                winner = ?self.board.winner(),
                population = self.board.len(),
                "Game over"
            );
        }

        report
    }

    /// Every player next to weaker neighbors turns them into its own kind.
    ///
    /// A single pass in row-major order: earlier conversions change who is weaker for players
    /// visited later, and converted players do not act again this round.
    fn convert_players(&mut self, acted: &mut HashSet<Location>) -> (usize, usize) {
        let mut conversions = 0;
        let mut converted = 0;

        for loc in self.board.locations() {
            if acted.contains(&loc) {
                continue;
            }

            let Some(attacker) = self.board.get(loc).copied() else {
                continue;
            };

            let weaker = self.board.weaker_neighbors(loc);
            if weaker.is_empty() {
                continue;
            }

            acted.insert(loc);
            conversions += 1;

            for victim in weaker {
                trace!(
                    event = "conversion",
                    round = self.round,
                    attacker = %loc,
                    victim = %victim,
                    kind = %attacker.kind,
                    "Player converted"
                );
                self.board.convert(victim, attacker.kind);
                acted.insert(victim);
                converted += 1;
            }
        }

        (conversions, converted)
    }

    /// Every player that has not acted steps toward its goal, in row-major order.
    ///
    /// Placement falls back from the goal cell to its horizontal component, then its vertical
    /// component; occupied cells are never taken.
    fn move_players(&mut self, acted: &mut HashSet<Location>) -> (usize, usize) {
        let mut moves = 0;
        let mut holds = 0;

        for loc in self.board.locations() {
            if acted.contains(&loc) || !self.board.is_occupied(loc) {
                continue;
            }

            let goal = goal_location(&self.board, loc, &self.config, &mut self.rng);
            let destination = self.place(loc, goal.target);

            // Marked where it lands, so a player stepping onto a cell later in the walk stays done.
            acted.insert(destination);

            if destination == loc {
                holds += 1;
            } else {
                moves += 1;
            }

            trace!(
                event = "movement",
                round = self.round,
                from = %loc,
                goal = %goal.target,
                to = %destination,
                intent = ?goal.intent,
                "Player moved"
            );
        }

        (moves, holds)
    }

    /// Move the player at `from` to the first free cell among the goal and its axis fallbacks.
    fn place(&mut self, from: Location, goal: Location) -> Location {
        let candidates = [
            Some(goal),
            (goal.x != from.x).then(|| Location::new(goal.x, from.y)),
            (goal.y != from.y).then(|| Location::new(from.x, goal.y)),
        ];

        for candidate in candidates.into_iter().flatten() {
            if self.board.move_player(from, candidate) {
                return candidate;
            }
        }

        from
    }
}
