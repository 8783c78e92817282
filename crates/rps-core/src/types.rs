//! Core type definitions for the simulation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A cell coordinate on the arena.
///
/// Locations are ordered row-major (by `y`, then by `x`). Every traversal of the board and
/// every nearest-enemy tie-break uses this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Product of the per-axis distances, each floored at 1.
    ///
    /// Only meaningful as a ranking key: it is not a metric, and cells on the same row or
    /// column never collapse to zero. Computed in `i64` so any two cells of a valid board rank.
    pub fn relative_distance(&self, other: &Location) -> i64 {
        let dx = (i64::from(self.x) - i64::from(other.x)).abs().max(1);
        let dy = (i64::from(self.y) - i64::from(other.y)).abs().max(1);
        dx.saturating_mul(dy)
    }

    /// One step toward `target`, independently on each axis.
    pub fn step_toward(&self, target: &Location) -> Self {
        Self {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }

    pub fn within(&self, max_x: i32, max_y: i32) -> bool {
        (0..=max_x).contains(&self.x) && (0..=max_y).contains(&self.y)
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// The three player kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    Rock,
    Paper,
    Scissors,
}

impl Kind {
    pub fn all() -> [Kind; 3] {
        [Kind::Rock, Kind::Paper, Kind::Scissors]
    }

    /// Draw a kind uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => Kind::Rock,
            1 => Kind::Paper,
            _ => Kind::Scissors,
        }
    }

    /// Rock beats scissors, scissors beats paper, paper beats rock.
    pub fn beats(self, other: Kind) -> bool {
        matches!(
            (self, other),
            (Kind::Rock, Kind::Scissors) | (Kind::Scissors, Kind::Paper) | (Kind::Paper, Kind::Rock)
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Rock => "Rock",
            Kind::Paper => "Paper",
            Kind::Scissors => "Scissors",
        }
    }

    /// Grid symbol used by the text view.
    pub fn symbol(self) -> char {
        match self {
            Kind::Rock => 'R',
            Kind::Paper => 'P',
            Kind::Scissors => 'S',
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single agent on the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub kind: Kind,
}

impl Player {
    pub fn new(kind: Kind) -> Self {
        Self { kind }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(Kind::random(rng))
    }

    /// Whether this player captures `other`. An empty cell counts as defeated.
    pub fn defeats(&self, other: Option<&Player>) -> bool {
        match other {
            None => true,
            Some(other) => self.kind.beats(other.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_relative_distance() {
        let origin = Location::new(0, 0);
        assert_eq!(origin.relative_distance(&Location::new(0, 5)), 5);
        assert_eq!(origin.relative_distance(&Location::new(3, 0)), 3);
        assert_eq!(Location::new(1, 1).relative_distance(&Location::new(4, 5)), 12);
        assert_eq!(Location::new(4, 5).relative_distance(&Location::new(1, 1)), 12);
    }

    #[test]
    fn test_relative_distance_spans_large_boards() {
        let origin = Location::new(0, 0);
        assert_eq!(
            origin.relative_distance(&Location::new(70_000, 70_000)),
            4_900_000_000
        );
        let far = Location::new(i32::MAX, i32::MAX);
        assert!(origin.relative_distance(&far) > 4_900_000_000);
        assert_eq!(
            Location::new(i32::MIN, i32::MIN).relative_distance(&far),
            i64::MAX
        );
    }

    #[test]
    fn test_location_order_is_row_major() {
        let mut locations = vec![
            Location::new(2, 1),
            Location::new(0, 2),
            Location::new(5, 0),
            Location::new(1, 1),
        ];
        locations.sort();
        assert_eq!(
            locations,
            vec![
                Location::new(5, 0),
                Location::new(1, 1),
                Location::new(2, 1),
                Location::new(0, 2),
            ]
        );
    }

    #[test]
    fn test_step_toward() {
        let loc = Location::new(3, 3);
        assert_eq!(loc.step_toward(&Location::new(7, 0)), Location::new(4, 2));
        assert_eq!(loc.step_toward(&Location::new(3, 9)), Location::new(3, 4));
        assert_eq!(loc.step_toward(&loc), loc);
    }

    #[test]
    fn test_domination_table() {
        for attacker in Kind::all() {
            for defender in Kind::all() {
                let expected = matches!(
                    (attacker, defender),
                    (Kind::Rock, Kind::Scissors)
                        | (Kind::Scissors, Kind::Paper)
                        | (Kind::Paper, Kind::Rock)
                );
                let player = Player::new(attacker);
                assert_eq!(
                    player.defeats(Some(&Player::new(defender))),
                    expected,
                    "{attacker} vs {defender}"
                );
            }
        }
    }

    #[test]
    fn test_defeats_empty_cell() {
        for kind in Kind::all() {
            assert!(Player::new(kind).defeats(None));
        }
    }

    #[test]
    fn test_random_kind_covers_all() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(Kind::random(&mut rng));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Location::new(4, 9).to_string(), "4,9");
        assert_eq!(Kind::Scissors.to_string(), "Scissors");
    }
}
