//! Plain-text rendering of the arena, scoreboard and footer.

use crate::board::Board;
use rps_core::{Kind, Location, Speed};

/// Shown on the scoreboard for a kind with no players left
const DEAD_MARK: &str = "x";

const HELP_TEXT: &str = "\
HELP / ABOUT

RPS Arena is a zero player game. The game plays itself. You watch.

[commands]
n             start a new game
p / space     pause or unpause
h             toggle help
q             quit
< / left      slow down game
> / right     speed up game
resize W H    change the arena bounds
";

/// Bordered grid, two characters per cell, one symbol per kind.
pub fn render_arena(board: &Board) -> String {
    let width = (board.max_x + 1) as usize;
    let border = format!("+{}+\n", "-".repeat(width * 2));

    let mut out = String::with_capacity((width * 2 + 3) * (board.max_y as usize + 3));
    out.push_str(&border);

    for y in 0..=board.max_y {
        out.push('|');
        for x in 0..=board.max_x {
            match board.get(Location::new(x, y)) {
                Some(player) => {
                    out.push(player.kind.symbol());
                    out.push(' ');
                }
                None => out.push_str("  "),
            }
        }
        out.push_str("|\n");
    }

    out.push_str(&border);
    out
}

/// One line per kind, longest first; a kind with no players shows a dead mark.
pub fn render_scoreboard(board: &Board) -> String {
    let standings = board.standings();

    let mut lines: Vec<(usize, String)> = Kind::all()
        .into_iter()
        .map(|kind| {
            let count = standings.get(kind);
            let bar = if count == 0 {
                DEAD_MARK.to_string()
            } else {
                kind.symbol().to_string().repeat(count)
            };
            let label = format!("{}:", kind.name().to_uppercase());
            (count, format!("{label:<10}{bar} ({count})"))
        })
        .collect();

    lines.sort_by(|a, b| b.0.cmp(&a.0));

    let mut out = String::from("SCOREBOARD\n");
    for (_, line) in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Win message when the game is over, otherwise the speed and a help hint.
pub fn render_footer(board: &Board, speed: Speed) -> String {
    if board.is_over() {
        return match board.winner() {
            Some(kind) => format!("{kind} wins. Press \"n\" to play again."),
            None => "Nobody is left. Press \"n\" to play again.".to_string(),
        };
    }

    format!("[ speed = {speed} ]   RPS Arena. Press \"h\" for help.")
}

pub fn render_help() -> &'static str {
    HELP_TEXT
}

/// Scoreboard, arena and footer stacked into one frame.
pub fn render_frame(board: &Board, speed: Speed) -> String {
    let mut frame = render_scoreboard(board);
    frame.push('\n');
    frame.push_str(&render_arena(board));
    frame.push_str(&render_footer(board, speed));
    frame.push('\n');
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_core::Player;

    fn board_with(max_x: i32, max_y: i32, players: &[(i32, i32, Kind)]) -> Board {
        let mut board = Board::new(max_x, max_y).unwrap();
        for &(x, y, kind) in players {
            board.place(Location::new(x, y), Player::new(kind));
        }
        board
    }

    #[test]
    fn test_render_arena() {
        let board = board_with(2, 1, &[(0, 0, Kind::Rock), (2, 1, Kind::Scissors)]);
        let arena = render_arena(&board);
        assert_eq!(arena, "+------+\n|R     |\n|    S |\n+------+\n");
    }

    #[test]
    fn test_render_arena_skips_stranded_players() {
        let mut board = board_with(3, 3, &[(3, 3, Kind::Paper)]);
        board.resize(1, 1).unwrap();
        assert!(!render_arena(&board).contains('P'));
    }

    #[test]
    fn test_scoreboard_orders_and_marks_dead() {
        let board = board_with(
            4,
            4,
            &[(0, 0, Kind::Paper), (1, 0, Kind::Paper), (2, 0, Kind::Rock)],
        );
        let scoreboard = render_scoreboard(&board);
        let lines: Vec<&str> = scoreboard.lines().collect();

        assert_eq!(lines[0], "SCOREBOARD");
        assert!(lines[1].starts_with("PAPER:"));
        assert!(lines[1].contains("PP (2)"));
        assert!(lines[2].starts_with("ROCK:"));
        assert!(lines[3].starts_with("SCISSORS:"));
        assert!(lines[3].contains("x (0)"));
    }

    #[test]
    fn test_footer() {
        let running = board_with(4, 4, &[(0, 0, Kind::Paper), (3, 3, Kind::Rock)]);
        assert_eq!(
            render_footer(&running, Speed::Fast),
            "[ speed = fast ]   RPS Arena. Press \"h\" for help."
        );

        let won = board_with(4, 4, &[(0, 0, Kind::Rock), (3, 3, Kind::Rock)]);
        assert_eq!(
            render_footer(&won, Speed::Fast),
            "Rock wins. Press \"n\" to play again."
        );
    }

    #[test]
    fn test_frame_contains_all_parts() {
        let board = board_with(4, 4, &[(0, 0, Kind::Paper), (3, 3, Kind::Rock)]);
        let frame = render_frame(&board, Speed::Normal);
        assert!(frame.starts_with("SCOREBOARD"));
        assert!(frame.contains("+----------+"));
        assert!(frame.contains("speed = normal"));
        assert!(render_help().contains("start a new game"));
    }
}
