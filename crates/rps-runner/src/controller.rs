//! Translates user commands into game operations.

use rps_core::{Error, Result, RunnerConfig, Speed};
use rps_world::{view, Game, RoundReport};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// A user command read from the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewGame,
    TogglePause,
    ToggleHelp,
    Faster,
    Slower,
    Resize { max_x: i32, max_y: i32 },
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        // A bare space pauses, like the space bar.
        if !line.is_empty() && line.trim().is_empty() {
            return Ok(Command::TogglePause);
        }

        let mut words = line.split_whitespace();
        let command = match words.next().map(str::to_lowercase).as_deref() {
            Some("n") | Some("new") => Command::NewGame,
            Some("p") | Some("pause") | Some("space") => Command::TogglePause,
            Some("h") | Some("help") => Command::ToggleHelp,
            Some(">") | Some("right") | Some("faster") => Command::Faster,
            Some("<") | Some("left") | Some("slower") => Command::Slower,
            Some("q") | Some("quit") | Some("esc") => Command::Quit,
            Some("resize") => {
                let mut next_number = || -> Result<i32> {
                    words
                        .next()
                        .and_then(|w| w.parse().ok())
                        .ok_or_else(|| Error::InvalidState(format!("usage: resize W H, got {line:?}")))
                };
                let max_x = next_number()?;
                let max_y = next_number()?;
                Command::Resize { max_x, max_y }
            }
            _ => return Err(Error::InvalidState(format!("unknown command {line:?}"))),
        };

        Ok(command)
    }
}

/// What the driver has to do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Redraw,
    SpeedChanged(Speed),
    Quit,
}

/// Owns the game and the presentation state around it.
pub struct Controller {
    game: Game,
    speed: Speed,
    show_help: bool,
    population: usize,
    min_extent: i32,
}

impl Controller {
    pub fn new(config: &RunnerConfig) -> Result<Self> {
        let game = Game::new(config.arena.clone())?;

        Ok(Self {
            game,
            speed: config.speed,
            show_help: false,
            population: config.arena.population,
            min_extent: config.min_extent,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn apply(&mut self, command: Command) -> Result<Outcome> {
        debug!(command = ?command, "Applying command");

        let outcome = match command {
            Command::NewGame => {
                self.game.new_game(self.population)?;
                Outcome::Redraw
            }
            Command::TogglePause => {
                self.game.toggle_pause();
                Outcome::Redraw
            }
            Command::ToggleHelp => {
                self.show_help = !self.show_help;
                Outcome::Redraw
            }
            Command::Faster => self.change_speed(self.speed.faster()),
            Command::Slower => self.change_speed(self.speed.slower()),
            Command::Resize { max_x, max_y } => {
                self.game.resize(max_x, max_y)?;
                let removed = self.game.prune_out_of_bounds();
                info!(
                    event = "arena_resized",
                    max_x = max_x,
                    max_y = max_y,
                    removed = removed,
                    "Arena resized"
                );
                Outcome::Redraw
            }
            Command::Quit => Outcome::Quit,
        };

        Ok(outcome)
    }

    fn change_speed(&mut self, speed: Speed) -> Outcome {
        if speed != self.speed {
            info!(event = "speed_changed", from = %self.speed, to = %speed, "Speed changed");
        }
        self.speed = speed;
        Outcome::SpeedChanged(speed)
    }

    /// Play a round for a timer tick; nothing happens while paused.
    pub fn on_tick(&mut self) -> Result<Option<RoundReport>> {
        self.check_viewport()?;
        self.game.tick()
    }

    fn check_viewport(&self) -> Result<()> {
        let board = self.game.board();
        if board.max_x < self.min_extent || board.max_y < self.min_extent {
            return Err(Error::ViewportTooSmall {
                max_x: board.max_x,
                max_y: board.max_y,
                min: self.min_extent,
            });
        }
        Ok(())
    }

    /// The text to show right now. Seeds the first game if needed; a failed seed is shown, not
    /// returned.
    pub fn frame(&mut self) -> String {
        if self.show_help {
            return view::render_help().to_string();
        }

        if self.check_viewport().is_err() {
            return "view port too small.\n".to_string();
        }

        if let Err(e) = self.game.ensure_initialized() {
            warn!(event = "seed_failed", error = %e, "Could not start a game");
            return format!(
                "arena too small for {} players.\n",
                self.game.config().population
            );
        }

        view::render_frame(self.game.board(), self.speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_core::ArenaConfig;

    fn controller() -> Controller {
        let config = RunnerConfig {
            arena: ArenaConfig {
                max_x: 12,
                max_y: 8,
                population: 20,
                seed: 17,
                ..Default::default()
            },
            ..Default::default()
        };
        Controller::new(&config).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("n".parse::<Command>().unwrap(), Command::NewGame);
        assert_eq!("P".parse::<Command>().unwrap(), Command::TogglePause);
        assert_eq!(" ".parse::<Command>().unwrap(), Command::TogglePause);
        assert_eq!("right".parse::<Command>().unwrap(), Command::Faster);
        assert_eq!("<".parse::<Command>().unwrap(), Command::Slower);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!(
            "resize 20 10".parse::<Command>().unwrap(),
            Command::Resize { max_x: 20, max_y: 10 }
        );
        assert!("resize 20".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }

    #[test]
    fn test_speed_commands_saturate() {
        let mut controller = controller();
        assert_eq!(controller.speed(), Speed::Normal);

        for _ in 0..10 {
            controller.apply(Command::Faster).unwrap();
        }
        assert_eq!(controller.speed(), Speed::Lightning);

        let outcome = controller.apply(Command::Slower).unwrap();
        assert_eq!(outcome, Outcome::SpeedChanged(Speed::Fast));
    }

    #[test]
    fn test_pause_blocks_rounds() {
        let mut controller = controller();
        assert!(controller.on_tick().unwrap().is_some());

        controller.apply(Command::TogglePause).unwrap();
        assert!(controller.on_tick().unwrap().is_none());
        assert_eq!(controller.game().round(), 1);

        controller.apply(Command::TogglePause).unwrap();
        assert!(controller.on_tick().unwrap().is_some());
        assert_eq!(controller.game().round(), 2);
    }

    #[test]
    fn test_new_game_uses_configured_population() {
        let mut controller = controller();
        controller.apply(Command::NewGame).unwrap();
        assert_eq!(controller.game().board().len(), 20);
        assert_eq!(controller.game().round(), 0);
    }

    #[test]
    fn test_resize_prunes() {
        let mut controller = controller();
        controller.apply(Command::NewGame).unwrap();
        controller
            .apply(Command::Resize { max_x: 5, max_y: 5 })
            .unwrap();

        let board = controller.game().board();
        assert!(board.iter().all(|(loc, _)| board.in_bounds(loc)));
        assert!(controller
            .apply(Command::Resize { max_x: -1, max_y: 5 })
            .is_err());
    }

    #[test]
    fn test_small_viewport() {
        let mut controller = controller();
        controller
            .apply(Command::Resize { max_x: 3, max_y: 8 })
            .unwrap();

        assert_eq!(controller.frame(), "view port too small.\n");
        assert!(matches!(
            controller.on_tick(),
            Err(Error::ViewportTooSmall { min: 5, .. })
        ));
    }

    #[test]
    fn test_resize_below_population_before_first_frame() {
        let config = RunnerConfig {
            arena: ArenaConfig {
                max_x: 3,
                max_y: 18,
                population: 40,
                seed: 4,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut controller = Controller::new(&config).unwrap();
        assert_eq!(controller.frame(), "view port too small.\n");

        // 36 cells cannot hold 40 players.
        controller
            .apply(Command::Resize { max_x: 5, max_y: 5 })
            .unwrap();
        assert_eq!(controller.frame(), "arena too small for 40 players.\n");
        assert!(matches!(
            controller.on_tick(),
            Err(Error::BoardFull {
                requested: 40,
                capacity: 36
            })
        ));
        assert!(!controller.game().is_initialized());

        // Growing the arena again lets the game start.
        controller
            .apply(Command::Resize { max_x: 9, max_y: 9 })
            .unwrap();
        assert!(controller.frame().starts_with("SCOREBOARD"));
        assert_eq!(controller.game().board().len(), 40);
    }

    #[test]
    fn test_help_overlay() {
        let mut controller = controller();
        controller.apply(Command::ToggleHelp).unwrap();
        assert!(controller.frame().starts_with("HELP / ABOUT"));

        controller.apply(Command::ToggleHelp).unwrap();
        assert!(controller.frame().starts_with("SCOREBOARD"));
    }
}
