use serde::{Deserialize, Serialize};

pub const CELL_EMPTY: u8 = 0;
pub const CELL_TOP_MAN: u8 = 1;
pub const CELL_TOP_KING: u8 = 2;
pub const CELL_BOTTOM_MAN: u8 = 3;
pub const CELL_BOTTOM_KING: u8 = 4;

pub const HIGHLIGHT_NONE: u8 = 0;
pub const HIGHLIGHT_SELECTED: u8 = 1;
pub const HIGHLIGHT_OCCUPIABLE: u8 = 2;
pub const HIGHLIGHT_OCCUPIABLE_BY_JUMP: u8 = 3;

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// Contract: 64 rank-major cells holding `CELL_*` codes.
    pub board: Vec<u8>,
    /// Contract: 64 rank-major cells holding `HIGHLIGHT_*` codes.
    pub highlights: Vec<u8>,
    /// Indices (0..=63) of the pieces allowed to move this turn.
    pub movable: Vec<u8>,
    /// Contract:
    /// - Committed action: indices (0..=63) of every space it changed,
    ///   ascending.
    /// - Ignored action: empty.
    pub changed: Vec<u8>,
    /// CRC32 of `board`; compare against the last drawn state to skip
    /// redundant redraws.
    pub checksum: u32,
    /// `game::SIDE_*` code of the side to move.
    pub side_to_move: u8,
    pub captured_top: u8,
    pub captured_bottom: u8,
    pub is_game_over: bool,
    /// Current turn's action log, oldest line first.
    pub log: Vec<String>,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// Contract:
    /// - `game::SIDE_*` code of the winner.
    /// - 0 while the game is still running.
    pub winner: u8,
    pub loser: u8,
    pub captured_top: u8,
    pub captured_bottom: u8,
}

/// Engine notification in wire form, drained through `take_events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEventView {
    GameStarted,
    BoardChanged { changed: Vec<u8> },
    TurnAction { description: String },
    CaptureCountChanged { side: u8, count: u8 },
    GameOver { winner: u8, loser: u8 },
}

/// Per-player setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    /// AI players move through `do_ai_turn` instead of taps.
    #[serde(default)]
    pub ai: bool,
}

/// Game setup accepted when a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub top: PlayerConfig,
    pub bottom: PlayerConfig,
    /// Contract: `game::SIDE_*` code of the side that moves first.
    #[serde(default = "default_first_move")]
    pub first_move: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            top: PlayerConfig {
                name: "Top".to_string(),
                ai: false,
            },
            bottom: PlayerConfig {
                name: "Bottom".to_string(),
                ai: false,
            },
            first_move: default_first_move(),
        }
    }
}

fn default_first_move() -> u8 {
    crate::game::SIDE_BOTTOM
}
