//! Arena simulation engine.
//!
//! This module implements the bounded 2D board where rock, paper and scissors players convert
//! and chase each other, one round at a time.

pub mod board;
pub mod goal;
pub mod game;
pub mod view;

pub use board::{Board, Standings};
pub use game::{Game, RoundReport};
pub use goal::{Goal, Intent};
