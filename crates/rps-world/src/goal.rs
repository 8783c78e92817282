//! Goal selection: where a player wants to step this round.

use crate::board::Board;
use rand::Rng;
use rps_core::{ArenaConfig, Location};
use serde::{Deserialize, Serialize};

/// Why a goal was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// No other kind left anywhere
    Wander,
    /// Nothing on the board this player can capture
    Hold,
    /// Step toward a capturable enemy
    Pursue,
    /// Step away from a threat
    Flee,
    /// Fleeing was impossible; a random step that does not close in on the threat
    Cornered,
}

/// The cell a player will try to reach, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub target: Location,
    pub intent: Intent,
}

impl Goal {
    fn new(target: Location, intent: Intent) -> Self {
        Self { target, intent }
    }
}

/// Pick the goal for the player at `loc`.
///
/// The nearest enemy of any kind decides between chasing and fleeing, unless it is farther than
/// `far_threat_distance`, in which case the nearest capturable enemy is chased instead.
pub fn goal_location<R: Rng + ?Sized>(
    board: &Board,
    loc: Location,
    config: &ArenaConfig,
    rng: &mut R,
) -> Goal {
    let Some(player) = board.get(loc) else {
        return Goal::new(loc, Intent::Hold);
    };

    let Some(mut enemy) = board.nearest_enemy(loc, false) else {
        return Goal::new(random_goal_location(board, loc, rng), Intent::Wander);
    };

    let Some(prey) = board.nearest_enemy(loc, true) else {
        return Goal::new(loc, Intent::Hold);
    };

    if loc.relative_distance(&enemy) > config.far_threat_distance {
        enemy = prey;
    }

    if player.defeats(board.get(enemy)) {
        return Goal::new(loc.step_toward(&enemy), Intent::Pursue);
    }

    let goal = flee_location(board, loc, enemy, config.flee_nudge_odds, rng);
    if goal != loc {
        return Goal::new(goal, Intent::Flee);
    }

    let wander = random_goal_location(board, loc, rng);
    if wander.relative_distance(&enemy) >= loc.relative_distance(&enemy) {
        Goal::new(wander, Intent::Cornered)
    } else {
        Goal::new(loc, Intent::Cornered)
    }
}

/// One step away from `enemy` on each axis, clamped to the board.
///
/// A fleeing player left on the enemy's row or column may sidestep off it.
fn flee_location<R: Rng + ?Sized>(
    board: &Board,
    loc: Location,
    enemy: Location,
    nudge_odds: u32,
    rng: &mut R,
) -> Location {
    let mut goal = Location::new(
        step_away(loc.x, enemy.x, board.max_x),
        step_away(loc.y, enemy.y, board.max_y),
    );

    if goal.x == enemy.x {
        goal.x = sidestep(goal.x, board.max_x, nudge_odds, rng);
    }

    if goal.y == enemy.y {
        goal.y = sidestep(goal.y, board.max_y, nudge_odds, rng);
    }

    goal
}

fn step_away(from: i32, threat: i32, max: i32) -> i32 {
    if from < threat && from > 0 {
        from - 1
    } else if from > threat && from < max {
        from + 1
    } else {
        from
    }
}

/// 1 in `odds` to move down an axis, 1 in `odds` to move up it, never past an edge.
fn sidestep<R: Rng + ?Sized>(coord: i32, max: i32, odds: u32, rng: &mut R) -> i32 {
    match rng.gen_range(0..odds) {
        0 if coord > 0 => coord - 1,
        1 if coord < max => coord + 1,
        _ => coord,
    }
}

/// One step toward a uniformly random cell of the board.
pub fn random_goal_location<R: Rng + ?Sized>(board: &Board, loc: Location, rng: &mut R) -> Location {
    let target = board.random_location(rng);
    loc.step_toward(&target)
}
