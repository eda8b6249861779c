use crate::coord::{BOARD_SIZE, Coordinate};

pub const PIECES_PER_SIDE: usize = 12;
const BACK_ROWS: u8 = 3;

/// Owning side of a piece. Top plays down the board, Bottom plays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    /// Rank a man of this side must reach to become a king.
    pub fn promotion_rank(self) -> u8 {
        match self {
            Side::Top => BOARD_SIZE as u8 - 1,
            Side::Bottom => 0,
        }
    }
}

/// A single checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub coordinate: Coordinate,
    pub side: Side,
    pub king: bool,
    /// Set at turn start on pieces that have at least one legal move,
    /// cleared when the turn ends.
    pub can_move: bool,
}

impl Piece {
    pub fn new(coordinate: Coordinate, side: Side) -> Self {
        Self {
            coordinate,
            side,
            king: false,
            can_move: false,
        }
    }
}

/// Display hint carried by a space. A space shows at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Selected,
    Occupiable,
    OccupiableByJump,
}

/// One cell of the 8x8 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Space {
    pub coordinate: Coordinate,
    pub playable: bool,
    pub piece: Option<Piece>,
    pub highlight: Highlight,
}

impl Space {
    fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            playable: coordinate.playable(),
            piece: None,
            highlight: Highlight::None,
        }
    }
}

/// Full board state. A plain value: committed actions build the next
/// snapshot from a clone of the current one, and equal snapshots
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    spaces: [[Space; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Fresh game board: twelve men per side on the playable squares of
    /// each side's three back rows.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for rank in 0..BACK_ROWS {
            for file in 0..BOARD_SIZE as u8 {
                let coordinate = Coordinate::new(file, rank);
                if coordinate.playable() {
                    board.set_piece(coordinate, Side::Top, false);
                }
            }
        }
        for rank in BOARD_SIZE as u8 - BACK_ROWS..BOARD_SIZE as u8 {
            for file in 0..BOARD_SIZE as u8 {
                let coordinate = Coordinate::new(file, rank);
                if coordinate.playable() {
                    board.set_piece(coordinate, Side::Bottom, false);
                }
            }
        }
        board
    }

    /// Board with no pieces on it; the starting point for building
    /// arbitrary positions.
    pub fn empty() -> Self {
        let mut spaces = [[Space::new(Coordinate { file: 0, rank: 0 }); BOARD_SIZE]; BOARD_SIZE];
        for (rank, row) in spaces.iter_mut().enumerate() {
            for (file, space) in row.iter_mut().enumerate() {
                *space = Space::new(Coordinate::new(file as u8, rank as u8));
            }
        }
        Self { spaces }
    }

    pub fn space(&self, coordinate: Coordinate) -> &Space {
        &self.spaces[coordinate.rank as usize][coordinate.file as usize]
    }

    pub fn piece(&self, coordinate: Coordinate) -> Option<Piece> {
        self.space(coordinate).piece
    }

    /// Places a new piece, replacing any occupant.
    pub fn set_piece(&mut self, coordinate: Coordinate, side: Side, king: bool) {
        self.space_mut(coordinate).piece = Some(Piece {
            coordinate,
            side,
            king,
            can_move: false,
        });
    }

    pub fn remove_piece(&mut self, coordinate: Coordinate) -> Option<Piece> {
        self.space_mut(coordinate).piece.take()
    }

    /// Relocates the occupant of `from`, updating its stored coordinate.
    /// A man arriving on its promotion rank becomes a king here. Returns
    /// the piece as it stands after the move.
    pub fn move_piece(&mut self, from: Coordinate, to: Coordinate) -> Option<Piece> {
        let mut piece = self.remove_piece(from)?;
        piece.coordinate = to;
        if !piece.king && to.rank == piece.side.promotion_rank() {
            piece.king = true;
        }
        self.space_mut(to).piece = Some(piece);
        Some(piece)
    }

    /// Marks `coordinate` as the selected space. Any previous selection
    /// is cleared first, so at most one space is ever selected.
    pub fn select(&mut self, coordinate: Coordinate) {
        self.clear_selection();
        self.space_mut(coordinate).highlight = Highlight::Selected;
    }

    pub fn selected(&self) -> Option<Coordinate> {
        self.spaces()
            .find(|space| space.highlight == Highlight::Selected)
            .map(|space| space.coordinate)
    }

    pub fn set_highlight(&mut self, coordinate: Coordinate, highlight: Highlight) {
        self.space_mut(coordinate).highlight = highlight;
    }

    pub fn clear_selection(&mut self) {
        for space in self.spaces_mut() {
            if space.highlight == Highlight::Selected {
                space.highlight = Highlight::None;
            }
        }
    }

    pub fn clear_occupiable(&mut self) {
        for space in self.spaces_mut() {
            if matches!(
                space.highlight,
                Highlight::Occupiable | Highlight::OccupiableByJump
            ) {
                space.highlight = Highlight::None;
            }
        }
    }

    pub fn set_can_move(&mut self, coordinate: Coordinate, can_move: bool) {
        if let Some(piece) = &mut self.space_mut(coordinate).piece {
            piece.can_move = can_move;
        }
    }

    pub fn clear_can_move(&mut self) {
        for space in self.spaces_mut() {
            if let Some(piece) = &mut space.piece {
                piece.can_move = false;
            }
        }
    }

    pub fn pieces(&self, side: Side) -> Vec<Piece> {
        self.spaces()
            .filter_map(|space| space.piece)
            .filter(|piece| piece.side == side)
            .collect()
    }

    /// Coordinates whose spaces differ between the two snapshots, piece
    /// and highlight layers included. A display aid; gameplay never
    /// consults it.
    pub fn diff(&self, other: &Board) -> Vec<Coordinate> {
        self.spaces()
            .zip(other.spaces())
            .filter(|(ours, theirs)| ours != theirs)
            .map(|(ours, _)| ours.coordinate)
            .collect()
    }

    /// Piece layer as 64 rank-major cells using the `types::CELL_*` codes.
    pub fn cells(&self) -> [u8; BOARD_SIZE * BOARD_SIZE] {
        let mut cells = [0u8; BOARD_SIZE * BOARD_SIZE];
        for space in self.spaces() {
            cells[space.coordinate.index()] = cell_code(space.piece);
        }
        cells
    }

    /// Highlight layer as 64 rank-major cells using the `types::HIGHLIGHT_*`
    /// codes.
    pub fn highlight_cells(&self) -> [u8; BOARD_SIZE * BOARD_SIZE] {
        let mut cells = [0u8; BOARD_SIZE * BOARD_SIZE];
        for space in self.spaces() {
            cells[space.coordinate.index()] = highlight_code(space.highlight);
        }
        cells
    }

    /// CRC32 of the piece layer. Equal checksums mean the same pieces
    /// stand on the same squares.
    pub fn checksum(&self) -> u32 {
        crc32fast::hash(&self.cells())
    }

    pub fn spaces(&self) -> impl Iterator<Item = &Space> {
        self.spaces.iter().flatten()
    }

    fn spaces_mut(&mut self) -> impl Iterator<Item = &mut Space> {
        self.spaces.iter_mut().flatten()
    }

    fn space_mut(&mut self, coordinate: Coordinate) -> &mut Space {
        &mut self.spaces[coordinate.rank as usize][coordinate.file as usize]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_code(piece: Option<Piece>) -> u8 {
    match piece {
        None => crate::types::CELL_EMPTY,
        Some(piece) => match (piece.side, piece.king) {
            (Side::Top, false) => crate::types::CELL_TOP_MAN,
            (Side::Top, true) => crate::types::CELL_TOP_KING,
            (Side::Bottom, false) => crate::types::CELL_BOTTOM_MAN,
            (Side::Bottom, true) => crate::types::CELL_BOTTOM_KING,
        },
    }
}

fn highlight_code(highlight: Highlight) -> u8 {
    match highlight {
        Highlight::None => crate::types::HIGHLIGHT_NONE,
        Highlight::Selected => crate::types::HIGHLIGHT_SELECTED,
        Highlight::Occupiable => crate::types::HIGHLIGHT_OCCUPIABLE,
        Highlight::OccupiableByJump => crate::types::HIGHLIGHT_OCCUPIABLE_BY_JUMP,
    }
}
