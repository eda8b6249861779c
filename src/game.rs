use std::time::Duration;

use rand::RngCore;
use web_time::Instant;

use crate::board::{Board, Highlight, PIECES_PER_SIDE, Side};
use crate::coord::Coordinate;
use crate::navigator::{self, MoveKind, Path};
use crate::types::{GameConfig, GameEventView, GameResult, GameState};

pub const SIDE_TOP: u8 = 1;
pub const SIDE_BOTTOM: u8 = 2;

pub fn side_code(side: Side) -> u8 {
    match side {
        Side::Top => SIDE_TOP,
        Side::Bottom => SIDE_BOTTOM,
    }
}

pub fn side_from_code(code: u8) -> Option<Side> {
    match code {
        SIDE_TOP => Some(Side::Top),
        SIDE_BOTTOM => Some(Side::Bottom),
        _ => None,
    }
}

/// Strategy seam for AI turns: pick one of the offered paths by index.
pub trait MoveSelector: Send + Sync {
    fn select_path(&self, paths: &[Path], rng: &mut dyn RngCore) -> Option<usize>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub side: Side,
    pub ai: bool,
}

/// Player inputs accepted by `Game::submit`. Illegal inputs are silent
/// no-ops rather than errors; taps on a board are cheap to ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Select(Coordinate),
    Deselect(Coordinate),
    Move(Coordinate),
}

/// Engine notifications, drained by the caller after each action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted,
    BoardChanged { changed: Vec<Coordinate> },
    TurnAction { description: String },
    CaptureCountChanged { side: Side, count: usize },
    GameOver { winner: Side, loser: Side },
}

impl From<&GameEvent> for GameEventView {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::GameStarted => GameEventView::GameStarted,
            GameEvent::BoardChanged { changed } => GameEventView::BoardChanged {
                changed: changed.iter().map(|c| c.index() as u8).collect(),
            },
            GameEvent::TurnAction { description } => GameEventView::TurnAction {
                description: description.clone(),
            },
            GameEvent::CaptureCountChanged { side, count } => {
                GameEventView::CaptureCountChanged {
                    side: side_code(*side),
                    count: *count as u8,
                }
            }
            GameEvent::GameOver { winner, loser } => GameEventView::GameOver {
                winner: side_code(*winner),
                loser: side_code(*loser),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Side,
    pub loser: Side,
}

/// The live selection: the selected square and the paths on offer from
/// it. `continuation` marks the committed phase of a multi-jump, where
/// the only inputs are the next hop or stopping where the piece stands.
#[derive(Debug, Clone)]
pub struct Selection {
    pub coordinate: Coordinate,
    pub paths: Vec<Path>,
    pub continuation: bool,
}

/// One turn of play, from first selection to commit.
#[derive(Debug, Clone)]
pub struct Turn {
    pub side: Side,
    pub start_board: Board,
    pub end_board: Option<Board>,
    pub log: Vec<String>,
    pub captures: Vec<Coordinate>,
    started: Instant,
    pub elapsed: Option<Duration>,
}

impl Turn {
    fn begin(side: Side, start_board: Board) -> Self {
        Self {
            side,
            start_board,
            end_board: None,
            log: Vec::new(),
            captures: Vec::new(),
            started: Instant::now(),
            elapsed: None,
        }
    }

    fn finish(&mut self, end_board: Board) {
        self.end_board = Some(end_board);
        self.elapsed = Some(self.started.elapsed());
    }
}

pub struct Game {
    board: Board,
    top: Player,
    bottom: Player,
    side_to_move: Side,
    selection: Option<Selection>,
    current_turn: Turn,
    timeline: Vec<Turn>,
    events: Vec<GameEvent>,
    outcome: Option<GameOutcome>,
    /// Spaces changed by the latest submitted action, every commit
    /// it caused included.
    pub changed: Vec<Coordinate>,
    evaluator: Box<dyn MoveSelector>,
}

impl Game {
    pub fn new(config: GameConfig, evaluator: Box<dyn MoveSelector>) -> Result<Self, String> {
        let first = side_from_code(config.first_move)
            .ok_or_else(|| "first_move must be 1 (top) or 2 (bottom)".to_string())?;
        let board = navigator::mark_playable(first, &Board::new());
        let current_turn = Turn::begin(first, board.clone());
        Ok(Self {
            board,
            top: Player {
                name: config.top.name,
                side: Side::Top,
                ai: config.top.ai,
            },
            bottom: Player {
                name: config.bottom.name,
                side: Side::Bottom,
                ai: config.bottom.ai,
            },
            side_to_move: first,
            selection: None,
            current_turn,
            timeline: Vec::new(),
            events: vec![GameEvent::GameStarted],
            outcome: None,
            changed: Vec::new(),
            evaluator,
        })
    }

    pub fn new_with_random_selector(config: GameConfig) -> Result<Self, String> {
        Self::new(config, Box::new(crate::ai::RandomSelector))
    }

    /// Submits one player action and settles its consequences.
    pub fn submit(&mut self, action: Action) {
        if self.outcome.is_some() {
            return;
        }
        self.changed.clear();
        match action {
            Action::Select(coordinate) => self.handle_select(coordinate),
            Action::Deselect(coordinate) => self.handle_deselect(coordinate),
            Action::Move(coordinate) => self.handle_move(coordinate),
        }
    }

    /// Plays one full turn for the side to move using the configured
    /// selector, chaining through any offered continuations.
    pub fn do_ai_turn(&mut self, rng: &mut dyn RngCore) -> Result<(), String> {
        if self.outcome.is_some() {
            return Err("game is already over".to_string());
        }
        let side = self.side_to_move;
        if !self.player(side).ai {
            return Err("current player is not an AI".to_string());
        }

        let mut origins = Vec::new();
        let mut options = Vec::new();
        for piece in self.board.pieces(side) {
            for path in navigator::paths(&navigator::moves(&piece, &self.board)) {
                origins.push(piece.coordinate);
                options.push(path);
            }
        }
        if options.is_empty() {
            return Err("AI has no legal moves".to_string());
        }

        let selected = self
            .evaluator
            .select_path(&options, rng)
            .ok_or_else(|| "AI could not select a path".to_string())?;
        if selected >= options.len() {
            return Err("AI selected an out-of-range path".to_string());
        }
        let origin = origins[selected];
        let target = options[selected]
            .landing()
            .ok_or_else(|| "AI selected a path with no landing".to_string())?;

        self.submit(Action::Select(origin));
        self.submit(Action::Move(target));

        // Keep hopping while the engine offers continuations; a selector
        // that answers `None` stops where the piece stands.
        for _ in 0..PIECES_PER_SIDE {
            let Some(selection) = self.selection.as_ref().filter(|s| s.continuation) else {
                break;
            };
            let coordinate = selection.coordinate;
            let paths = selection.paths.clone();
            match self.evaluator.select_path(&paths, rng) {
                Some(index) if index < paths.len() => match paths[index].landing() {
                    Some(target) => self.submit(Action::Move(target)),
                    None => break,
                },
                _ => {
                    self.submit(Action::Deselect(coordinate));
                    break;
                }
            }
        }
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn timeline(&self) -> &[Turn] {
        &self.timeline
    }

    /// Landing squares of the currently offered paths.
    pub fn get_legal_targets(&self) -> Vec<Coordinate> {
        let mut targets = Vec::new();
        if let Some(selection) = &self.selection {
            for landing in selection.paths.iter().filter_map(Path::landing) {
                if !targets.contains(&landing) {
                    targets.push(landing);
                }
            }
        }
        targets
    }

    /// Pieces `side` has taken from its opponent so far.
    pub fn captured_count(&self, side: Side) -> usize {
        PIECES_PER_SIDE.saturating_sub(self.board.pieces(side.opposite()).len())
    }

    /// Hands over every event recorded since the last drain.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn to_game_state(&self) -> GameState {
        GameState {
            board: self.board.cells().to_vec(),
            highlights: self.board.highlight_cells().to_vec(),
            movable: self
                .board
                .spaces()
                .filter_map(|space| space.piece)
                .filter(|piece| piece.can_move)
                .map(|piece| piece.coordinate.index() as u8)
                .collect(),
            changed: self.changed.iter().map(|c| c.index() as u8).collect(),
            checksum: self.board.checksum(),
            side_to_move: side_code(self.side_to_move),
            captured_top: self.captured_count(Side::Top) as u8,
            captured_bottom: self.captured_count(Side::Bottom) as u8,
            is_game_over: self.outcome.is_some(),
            log: self.current_turn.log.clone(),
        }
    }

    pub fn to_game_result(&self) -> GameResult {
        GameResult {
            winner: self.outcome.map_or(0, |o| side_code(o.winner)),
            loser: self.outcome.map_or(0, |o| side_code(o.loser)),
            captured_top: self.captured_count(Side::Top) as u8,
            captured_bottom: self.captured_count(Side::Bottom) as u8,
        }
    }

    fn handle_select(&mut self, coordinate: Coordinate) {
        if self
            .selection
            .as_ref()
            .is_some_and(|selection| selection.continuation)
        {
            return;
        }
        let Some(piece) = self.board.piece(coordinate) else {
            return;
        };
        if piece.side != self.side_to_move {
            return;
        }

        // An immobile piece may still be picked up and put back; it
        // simply offers no targets.
        let paths = navigator::paths(&navigator::moves(&piece, &self.board));

        let mut next = self.board.clone();
        next.clear_occupiable();
        next.select(coordinate);
        for path in &paths {
            if let Some(landing) = path.landing() {
                let highlight = if path.is_jumps() {
                    Highlight::OccupiableByJump
                } else {
                    Highlight::Occupiable
                };
                next.set_highlight(landing, highlight);
            }
        }

        let name = self.player(piece.side).name.clone();
        self.log_action(format!("{name} selected {coordinate}"));
        self.selection = Some(Selection {
            coordinate,
            paths,
            continuation: false,
        });
        self.commit(next);
    }

    fn handle_deselect(&mut self, coordinate: Coordinate) {
        let Some(selection) = self.selection.take() else {
            return;
        };
        if selection.coordinate != coordinate {
            self.selection = Some(selection);
            return;
        }

        let name = self.player(self.side_to_move).name.clone();
        if selection.continuation {
            // A jump already landed; stopping here commits the turn.
            self.log_action(format!("{name} stopped at {coordinate}"));
            self.end_turn(self.board.clone());
            return;
        }

        let mut next = self.board.clone();
        next.clear_selection();
        next.clear_occupiable();
        self.log_action(format!("{name} deselected {coordinate}"));
        self.commit(next);
    }

    fn handle_move(&mut self, target: Coordinate) {
        let Some(selection) = self.selection.take() else {
            return;
        };
        let Some(path) = selection
            .paths
            .iter()
            .find(|path| path.landing() == Some(target))
            .cloned()
        else {
            self.selection = Some(selection);
            return;
        };

        let side = self.side_to_move;
        let name = self.player(side).name.clone();
        let mut next = self.board.clone();
        let mut current = selection.coordinate;
        let mut jumped = false;
        let mut promoted = false;
        for &mv in path.moves() {
            let Some(landing) = mv.landing() else {
                break;
            };
            let was_king = next.piece(current).is_some_and(|piece| piece.king);
            let Some(moved) = next.move_piece(current, landing) else {
                break;
            };
            match mv.kind {
                MoveKind::Step => {
                    self.log_action(format!("{name} moved {current} to {landing}"));
                }
                MoveKind::Jump { captured } => {
                    next.remove_piece(captured);
                    jumped = true;
                    self.current_turn.captures.push(captured);
                    self.log_action(format!(
                        "{name} jumped {current} to {landing}, capturing {captured}"
                    ));
                    let count = PIECES_PER_SIDE.saturating_sub(next.pieces(side.opposite()).len());
                    self.events
                        .push(GameEvent::CaptureCountChanged { side, count });
                }
            }
            if moved.king && !was_king {
                promoted = true;
                self.log_action(format!("{name} was crowned at {landing}"));
            }
            current = landing;
        }

        // A further jump keeps the turn alive; crowning never does.
        if jumped
            && !promoted
            && let Some(piece) = next.piece(current)
        {
            let continuations = navigator::paths(&navigator::jump_moves(&piece, &next));
            if !continuations.is_empty() {
                next.clear_occupiable();
                next.select(current);
                for path in &continuations {
                    if let Some(landing) = path.landing() {
                        next.set_highlight(landing, Highlight::OccupiableByJump);
                    }
                }
                self.selection = Some(Selection {
                    coordinate: current,
                    paths: continuations,
                    continuation: true,
                });
                self.commit(next);
                return;
            }
        }

        self.end_turn(next);
    }

    fn end_turn(&mut self, mut next: Board) {
        next.clear_selection();
        next.clear_occupiable();
        next.clear_can_move();
        self.selection = None;
        self.commit(next);
        self.current_turn.finish(self.board.clone());
        self.timeline.push(self.current_turn.clone());
        self.side_to_move = self.side_to_move.opposite();
        self.begin_turn();
    }

    fn begin_turn(&mut self) {
        let side = self.side_to_move;
        // A side with nothing on the board, or nothing able to move,
        // has lost.
        if self.board.pieces(side).is_empty() || !navigator::side_can_move(side, &self.board) {
            let outcome = GameOutcome {
                winner: side.opposite(),
                loser: side,
            };
            self.outcome = Some(outcome);
            self.events.push(GameEvent::GameOver {
                winner: outcome.winner,
                loser: outcome.loser,
            });
            return;
        }
        self.commit(navigator::mark_playable(side, &self.board));
        self.current_turn = Turn::begin(side, self.board.clone());
    }

    fn commit(&mut self, next: Board) {
        let changed = self.board.diff(&next);
        self.board = next;
        if changed.is_empty() {
            return;
        }
        self.events.push(GameEvent::BoardChanged {
            changed: changed.clone(),
        });
        // A turn-ending move commits twice (the move, then the next
        // side's markings); the snapshot diff unions every commit of
        // the submitted action.
        self.changed.extend(changed);
        self.changed.sort_unstable_by_key(|c| c.index());
        self.changed.dedup();
    }

    fn log_action(&mut self, description: String) {
        self.current_turn.log.push(description.clone());
        self.events.push(GameEvent::TurnAction { description });
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, side_to_move: Side) {
        self.board = board;
        self.side_to_move = side_to_move;
        self.selection = None;
        self.outcome = None;
        self.changed.clear();
        self.events.clear();
        self.begin_turn();
    }
}
