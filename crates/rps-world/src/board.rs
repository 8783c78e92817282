//! Sparse bounded board holding the players.

use rand::Rng;
use rps_core::{cell_count, validate_bounds, ArenaConfig, Error, Kind, Location, Player, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Random draws tried before falling back to a scan for an empty cell
const RANDOM_PLACEMENT_ATTEMPTS: usize = 100;

/// A bounded arena with at most one player per cell.
///
/// Players are keyed by [`Location`], whose ordering is row-major, so every iteration over the
/// board visits players in the same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub max_x: i32,
    pub max_y: i32,
    players: BTreeMap<Location, Player>,
}

impl Board {
    pub fn new(max_x: i32, max_y: i32) -> Result<Self> {
        validate_bounds(max_x, max_y)?;
        Ok(Self {
            max_x,
            max_y,
            players: BTreeMap::new(),
        })
    }

    /// Create an empty board from arena configuration
    pub fn from_config(config: &ArenaConfig) -> Result<Self> {
        Self::new(config.max_x, config.max_y)
    }

    /// Number of cells inside the current bounds
    pub fn capacity(&self) -> usize {
        cell_count(self.max_x, self.max_y)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn in_bounds(&self, loc: Location) -> bool {
        loc.within(self.max_x, self.max_y)
    }

    pub fn get(&self, loc: Location) -> Option<&Player> {
        self.players.get(&loc)
    }

    pub fn is_occupied(&self, loc: Location) -> bool {
        self.players.contains_key(&loc)
    }

    /// Put a player on a cell, returning whoever was there before.
    pub fn place(&mut self, loc: Location, player: Player) -> Option<Player> {
        self.players.insert(loc, player)
    }

    /// Move the player at `from` onto `to` if `to` is free. Never displaces anyone.
    pub fn move_player(&mut self, from: Location, to: Location) -> bool {
        if from == to || self.is_occupied(to) {
            return false;
        }

        match self.players.remove(&from) {
            Some(player) => {
                self.players.insert(to, player);
                true
            }
            None => false,
        }
    }

    /// Overwrite the kind of the player at `loc` in place.
    pub fn convert(&mut self, loc: Location, kind: Kind) {
        if let Some(player) = self.players.get_mut(&loc) {
            player.kind = kind;
        }
    }

    /// Iterate occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Location, &Player)> + '_ {
        self.players.iter().map(|(loc, player)| (*loc, player))
    }

    /// Snapshot of the occupied locations in row-major order.
    pub fn locations(&self) -> Vec<Location> {
        self.players.keys().copied().collect()
    }

    pub fn count_of_kind(&self, kind: Kind) -> usize {
        self.players.values().filter(|p| p.kind == kind).count()
    }

    pub fn standings(&self) -> Standings {
        let mut standings = Standings::default();
        for player in self.players.values() {
            match player.kind {
                Kind::Rock => standings.rock += 1,
                Kind::Paper => standings.paper += 1,
                Kind::Scissors => standings.scissors += 1,
            }
        }
        standings
    }

    /// An empty board, or one where every player shares a kind, is finished.
    pub fn is_over(&self) -> bool {
        let mut kinds = self.players.values().map(|p| p.kind);
        match kinds.next() {
            None => true,
            Some(first) => kinds.all(|kind| kind == first),
        }
    }

    /// The surviving kind once the game is over on a non-empty board
    pub fn winner(&self) -> Option<Kind> {
        if !self.is_over() {
            return None;
        }
        self.players.values().next().map(|p| p.kind)
    }

    /// The Moore neighborhood of `loc`, clipped to the board.
    pub fn neighborhood(&self, loc: Location) -> Vec<Location> {
        let mut neighbors = Vec::with_capacity(8);

        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }

                let neighbor = Location::new(loc.x + dx, loc.y + dy);
                if self.in_bounds(neighbor) {
                    neighbors.push(neighbor);
                }
            }
        }

        neighbors
    }

    /// Occupied neighbors that the player at `loc` defeats.
    pub fn weaker_neighbors(&self, loc: Location) -> Vec<Location> {
        let Some(player) = self.get(loc) else {
            return Vec::new();
        };

        self.neighborhood(loc)
            .into_iter()
            .filter(|n| matches!(self.get(*n), Some(other) if player.defeats(Some(other))))
            .collect()
    }

    /// Closest player of a different kind by relative distance.
    ///
    /// With `require_weaker` only players that the occupant of `loc` defeats are considered.
    /// Ties go to the candidate that comes first in row-major order.
    pub fn nearest_enemy(&self, loc: Location, require_weaker: bool) -> Option<Location> {
        let player = self.get(loc)?;
        let mut closest: Option<(i64, Location)> = None;

        for (candidate, other) in self.iter() {
            if other.kind == player.kind {
                continue;
            }
            if require_weaker && !player.defeats(Some(other)) {
                continue;
            }

            let distance = loc.relative_distance(&candidate);
            match closest {
                Some((best, _)) if best <= distance => {}
                _ => closest = Some((distance, candidate)),
            }
        }

        closest.map(|(_, candidate)| candidate)
    }

    /// A uniformly random cell inside the bounds
    pub fn random_location<R: Rng + ?Sized>(&self, rng: &mut R) -> Location {
        let x = rng.gen_range(0..=self.max_x);
        let y = rng.gen_range(0..=self.max_y);
        Location::new(x, y)
    }

    /// A uniformly random free cell inside the bounds.
    ///
    /// Fails with [`Error::BoardFull`] when no cell is free.
    pub fn random_empty_location<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Location> {
        for _ in 0..RANDOM_PLACEMENT_ATTEMPTS {
            let loc = self.random_location(rng);
            if !self.is_occupied(loc) {
                return Ok(loc);
            }
        }

        // Crowded board: pick among the remaining free cells directly.
        let free: Vec<Location> = (0..=self.max_y)
            .flat_map(|y| (0..=self.max_x).map(move |x| Location::new(x, y)))
            .filter(|loc| !self.is_occupied(*loc))
            .collect();

        if free.is_empty() {
            return Err(Error::BoardFull {
                requested: self.len() + 1,
                capacity: self.capacity(),
            });
        }

        Ok(free[rng.gen_range(0..free.len())])
    }

    /// Clear the board and place `count` players of random kinds on distinct random cells.
    #[instrument(skip(self, rng), fields(max_x = self.max_x, max_y = self.max_y))]
    pub fn seed<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<()> {
        if count > self.capacity() {
            return Err(Error::BoardFull {
                requested: count,
                capacity: self.capacity(),
            });
        }

        self.players.clear();

        for _ in 0..count {
            let loc = self.random_empty_location(rng)?;
            self.players.insert(loc, Player::random(rng));
        }

        debug!(event = "board_seeded", population = count, "Board seeded");
        Ok(())
    }

    /// Change the bounds. Players left outside stay until [`Board::prune_out_of_bounds`].
    pub fn resize(&mut self, max_x: i32, max_y: i32) -> Result<()> {
        validate_bounds(max_x, max_y)?;
        self.max_x = max_x;
        self.max_y = max_y;
        Ok(())
    }

    /// Remove every player outside the current bounds, returning how many were removed.
    pub fn prune_out_of_bounds(&mut self) -> usize {
        let (max_x, max_y) = (self.max_x, self.max_y);
        let before = self.players.len();
        self.players.retain(|loc, _| loc.within(max_x, max_y));
        let removed = before - self.players.len();

        if removed > 0 {
            debug!(event = "board_pruned", removed = removed, "Removed out-of-bounds players");
        }

        removed
    }
}

/// Per-kind head counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub rock: usize,
    pub paper: usize,
    pub scissors: usize,
}

impl Standings {
    pub fn get(&self, kind: Kind) -> usize {
        match kind {
            Kind::Rock => self.rock,
            Kind::Paper => self.paper,
            Kind::Scissors => self.scissors,
        }
    }

    pub fn total(&self) -> usize {
        self.rock + self.paper + self.scissors
    }
}
