//! Line-oriented text protocol for driving the engine.
//!
//! The protocol follows the GTP framing conventions: one command per
//! line, an optional numeric id, responses prefixed with `=` on success
//! and `?` on failure, each response terminated by a blank line. It is
//! meant to be scripted or wired up to a front end over stdin/stdout.
//!
//! ## Supported Commands
//!
//! - `name` - Return engine name
//! - `version` - Return engine version
//! - `protocol_version` - Return protocol version (1)
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the program
//! - `new_game <2|4>` - Start a fresh game with that many seats
//! - `show` - Render the current board as ASCII
//! - `move <x> <y>` - Move the current player's pawn to (x, y)
//! - `wall <x> <y> <h|v>` - Place a wall anchored at (x, y)
//! - `valid_moves` - List the current player's legal moves
//! - `genmove [difficulty]` - Search and play a move for the current player
//! - `forfeit <index>` - Remove a player from the game
//!
//! ## Example
//!
//! ```ignore
//! use quoridor_engine::protocol::ProtocolEngine;
//! let mut engine = ProtocolEngine::new();
//! engine.run();
//! ```

use std::io::{self, BufRead, Write};

use crate::rules::valid_moves;
use crate::state::{GameState, Move, PlayerId, apply_move, create_game, forfeit};
use crate::strategy::{Difficulty, Strategy};

/// The list of known protocol commands.
const KNOWN_COMMANDS: &[&str] = &[
    "forfeit",
    "genmove",
    "known_command",
    "list_commands",
    "move",
    "name",
    "new_game",
    "protocol_version",
    "quit",
    "show",
    "valid_moves",
    "version",
    "wall",
];

/// Protocol engine state.
pub struct ProtocolEngine {
    /// Current game, if one has been started.
    game: Option<GameState>,
    /// Default strength for `genmove` without an argument.
    difficulty: Difficulty,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolEngine {
    /// Create a new protocol engine with default settings.
    pub fn new() -> Self {
        Self::with_difficulty(Difficulty::default())
    }

    /// Create a new protocol engine with a default `genmove` strength.
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            game: None,
            difficulty,
        }
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse optional command ID
            let (id, command_line) = Self::parse_id(line);

            // Parse command and arguments
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            // Execute command
            let (success, message) = self.execute(&command, args);

            // Format and send response
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(stdout, "\n{prefix}{id_str} {message}\n").unwrap();
            stdout.flush().unwrap();

            // Quit if requested
            if command == "quit" {
                break;
            }
        }
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let mut chars = trimmed.char_indices();

        if let Some((_, c)) = chars.next()
            && c.is_ascii_digit()
        {
            let end = chars
                .find(|(_, c)| !c.is_ascii_digit())
                .map(|(i, _)| i)
                .unwrap_or(trimmed.len());

            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }

        (None, trimmed)
    }

    fn game_mut(&mut self) -> Result<&mut GameState, String> {
        self.game
            .as_mut()
            .ok_or_else(|| "no game in progress, use new_game".to_string())
    }

    /// Execute a protocol command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "quoridor-engine".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => {
                let commands = KNOWN_COMMANDS.join("\n");
                (true, commands)
            }

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "new_game" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let count = match args[0].parse::<usize>() {
                    Ok(n) => n,
                    Err(_) => return (false, "invalid player count".to_string()),
                };
                let ids: Vec<PlayerId> = (1..=count as u32).map(PlayerId).collect();
                match create_game(&ids, count) {
                    Ok(game) => {
                        self.game = Some(game);
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "show" => match self.game_mut() {
                Ok(game) => (true, format!("\n{game}")),
                Err(e) => (false, e),
            },

            "move" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let (x, y) = match (args[0].parse::<u8>(), args[1].parse::<u8>()) {
                    (Ok(x), Ok(y)) => (x, y),
                    _ => return (false, "invalid coordinates".to_string()),
                };
                let to = match crate::board::Pos::new(x, y) {
                    Some(p) => p,
                    None => return (false, "coordinates off the board".to_string()),
                };
                let game = match self.game_mut() {
                    Ok(g) => g,
                    Err(e) => return (false, e),
                };
                let mover = game.current_player();
                let mv = Move::Pawn {
                    player: mover.id,
                    from: mover.pos,
                    to,
                };
                match apply_move(game, &mv) {
                    Ok(next) => {
                        let done = finish_line(&next);
                        *game = next;
                        (true, done.trim().to_string())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "wall" => {
                if args.len() < 3 {
                    return (false, "missing arguments".to_string());
                }
                let (x, y) = match (args[0].parse::<u8>(), args[1].parse::<u8>()) {
                    (Ok(x), Ok(y)) => (x, y),
                    _ => return (false, "invalid coordinates".to_string()),
                };
                let orientation = match args[2].to_lowercase().as_str() {
                    "h" => crate::board::Orientation::Horizontal,
                    "v" => crate::board::Orientation::Vertical,
                    _ => return (false, "orientation must be h or v".to_string()),
                };
                let game = match self.game_mut() {
                    Ok(g) => g,
                    Err(e) => return (false, e),
                };
                let mv = Move::Wall {
                    player: game.current_player().id,
                    pos: crate::board::Pos { x, y },
                    orientation,
                };
                match apply_move(game, &mv) {
                    Ok(next) => {
                        *game = next;
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "valid_moves" => {
                let game = match self.game_mut() {
                    Ok(g) => g,
                    Err(e) => return (false, e),
                };
                let player = game.current_player().id;
                match valid_moves(game, player) {
                    Ok(moves) => {
                        let lines: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                        (true, lines.join("\n"))
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                let difficulty = match args.first() {
                    Some(arg) => match arg.parse::<Difficulty>() {
                        Ok(d) => d,
                        Err(e) => return (false, e),
                    },
                    None => self.difficulty,
                };
                let game = match self.game_mut() {
                    Ok(g) => g,
                    Err(e) => return (false, e),
                };
                let player = game.current_player().id;
                let mv = match Strategy::for_difficulty(difficulty).select(game, player) {
                    Ok(mv) => mv,
                    Err(e) => return (false, e.to_string()),
                };
                match apply_move(game, &mv) {
                    Ok(next) => {
                        let done = finish_line(&next);
                        *game = next;
                        (true, format!("{mv}{done}"))
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "forfeit" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let id = match args[0].parse::<u32>() {
                    Ok(n) => PlayerId(n),
                    Err(_) => return (false, "invalid player".to_string()),
                };
                let game = match self.game_mut() {
                    Ok(g) => g,
                    Err(e) => return (false, e),
                };
                match forfeit(game, id) {
                    Ok(next) => {
                        let done = finish_line(&next);
                        *game = next;
                        (true, done.trim().to_string())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

/// A trailing winner announcement when the game just ended.
fn finish_line(game: &GameState) -> String {
    match game.winner {
        Some(winner) => format!(" winner {winner}"),
        None => String::new(),
    }
}
