use crate::board::{Board, Piece, Side};
use crate::coord::{Coordinate, Direction};

/// A single diagonal displacement: a step into an adjacent empty space,
/// or a jump over `captured` into the empty space beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Step,
    Jump { captured: Coordinate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Coordinate,
    pub direction: Direction,
    pub kind: MoveKind,
}

impl Move {
    pub fn is_jump(self) -> bool {
        matches!(self.kind, MoveKind::Jump { .. })
    }

    /// Square the move ends on. In bounds for every move the search
    /// produces.
    pub fn landing(self) -> Option<Coordinate> {
        let magnitude = if self.is_jump() { 2 } else { 1 };
        self.from.step(self.direction, magnitude)
    }
}

/// An ordered move sequence a player may commit in one turn: a single
/// step, or one or more chained jumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    moves: Vec<Move>,
}

impl Path {
    fn single(mv: Move) -> Self {
        Self { moves: vec![mv] }
    }

    fn extended(&self, mv: Move) -> Self {
        let mut moves = self.moves.clone();
        moves.push(mv);
        Self { moves }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn is_jumps(&self) -> bool {
        self.moves.first().is_some_and(|mv| mv.is_jump())
    }

    /// Square the mover finally ends on.
    pub fn landing(&self) -> Option<Coordinate> {
        self.moves.last().and_then(|mv| mv.landing())
    }

    /// Coordinates captured along the path, in hop order.
    pub fn captures(&self) -> Vec<Coordinate> {
        self.moves
            .iter()
            .filter_map(|mv| match mv.kind {
                MoveKind::Jump { captured } => Some(captured),
                MoveKind::Step => None,
            })
            .collect()
    }

    fn contains_capture(&self, coordinate: Coordinate) -> bool {
        self.moves.iter().any(|mv| {
            mv.kind
                == MoveKind::Jump {
                    captured: coordinate,
                }
        })
    }
}

/// Directions a piece may move in: the two forward diagonals for men,
/// all four for kings.
pub fn available_directions(side: Side, king: bool) -> &'static [Direction] {
    match (king, side) {
        (true, _) => &Direction::ALL,
        (false, Side::Top) => &[Direction::LowerLeft, Direction::LowerRight],
        (false, Side::Bottom) => &[Direction::UpperLeft, Direction::UpperRight],
    }
}

/// Legal single displacements for `piece` as the board stands, with no
/// chaining.
pub fn steps(piece: &Piece, board: &Board) -> Vec<Move> {
    steps_from(
        piece.coordinate,
        piece.side,
        piece.king,
        board,
        piece.coordinate,
        None,
        &[],
        false,
    )
}

/// Every move reachable by `piece` this turn: its immediate steps and
/// jumps, then each jump's continuations, discovered depth first. A
/// continuation never reverses the hop that produced it and never takes
/// the same piece twice. King status is the piece's status now; a man
/// crowned by the move gains nothing until the next turn.
pub fn moves(piece: &Piece, board: &Board) -> Vec<Move> {
    collect_moves(piece, board, false)
}

/// Jump-only variant of `moves`, used to continue a chain mid-turn.
pub fn jump_moves(piece: &Piece, board: &Board) -> Vec<Move> {
    collect_moves(piece, board, true)
}

/// Stitches a move tree back into the selectable paths it describes.
/// A jump continuation extends every compatible chain ending where it
/// starts; the unextended chain stays listed, so stopping a multi-jump
/// early is always on offer.
pub fn paths(moves: &[Move]) -> Vec<Path> {
    let Some(origin) = moves.first().map(|mv| mv.from) else {
        return Vec::new();
    };
    let mut paths: Vec<Path> = Vec::new();
    for &mv in moves {
        let mut extended: Vec<Path> = Vec::new();
        if let MoveKind::Jump { captured } = mv.kind {
            for path in &paths {
                let reversal = path
                    .moves
                    .last()
                    .is_some_and(|last| last.direction.opposite() == mv.direction);
                if path.is_jumps()
                    && path.landing() == Some(mv.from)
                    && !reversal
                    && !path.contains_capture(captured)
                {
                    extended.push(path.extended(mv));
                }
            }
        }
        // Moves leaving the origin always open a chain of their own.
        if mv.from == origin || extended.is_empty() {
            paths.push(Path::single(mv));
        }
        paths.append(&mut extended);
    }
    paths
}

/// Copy of `board` with `can_move` set on exactly the pieces of `side`
/// that have at least one legal move.
pub fn mark_playable(side: Side, board: &Board) -> Board {
    let mut next = board.clone();
    next.clear_can_move();
    for piece in board.pieces(side) {
        if !steps(&piece, board).is_empty() {
            next.set_can_move(piece.coordinate, true);
        }
    }
    next
}

/// Whether `side` has any piece with a legal move.
pub fn side_can_move(side: Side, board: &Board) -> bool {
    board
        .pieces(side)
        .iter()
        .any(|piece| !steps(piece, board).is_empty())
}

fn collect_moves(piece: &Piece, board: &Board, jumps_only: bool) -> Vec<Move> {
    let origin = piece.coordinate;
    let first = steps_from(
        origin, piece.side, piece.king, board, origin, None, &[], jumps_only,
    );
    let mut moves = Vec::new();
    let mut captured = Vec::new();
    for mv in first {
        moves.push(mv);
        if let MoveKind::Jump { captured: taken } = mv.kind {
            let Some(landing) = mv.landing() else {
                continue;
            };
            captured.push(taken);
            extend_jumps(
                landing,
                piece.side,
                piece.king,
                board,
                origin,
                mv.direction,
                &mut captured,
                &mut moves,
            );
            captured.pop();
        }
    }
    dedupe(moves)
}

#[allow(clippy::too_many_arguments)]
fn extend_jumps(
    from: Coordinate,
    side: Side,
    king: bool,
    board: &Board,
    origin: Coordinate,
    arrived: Direction,
    captured: &mut Vec<Coordinate>,
    moves: &mut Vec<Move>,
) {
    let continuations = steps_from(
        from,
        side,
        king,
        board,
        origin,
        Some(arrived.opposite()),
        captured,
        true,
    );
    for mv in continuations {
        moves.push(mv);
        let MoveKind::Jump { captured: taken } = mv.kind else {
            continue;
        };
        let Some(landing) = mv.landing() else {
            continue;
        };
        captured.push(taken);
        extend_jumps(landing, side, king, board, origin, mv.direction, captured, moves);
        captured.pop();
    }
}

#[allow(clippy::too_many_arguments)]
fn steps_from(
    from: Coordinate,
    side: Side,
    king: bool,
    board: &Board,
    origin: Coordinate,
    exclude: Option<Direction>,
    captured: &[Coordinate],
    jumps_only: bool,
) -> Vec<Move> {
    let mut moves = Vec::new();
    for &direction in available_directions(side, king) {
        if Some(direction) == exclude {
            continue;
        }
        let Some(adjacent) = from.step(direction, 1) else {
            continue;
        };
        match occupant(board, adjacent, origin) {
            None => {
                if !jumps_only {
                    moves.push(Move {
                        from,
                        direction,
                        kind: MoveKind::Step,
                    });
                }
            }
            Some(blocker) if blocker.side != side => {
                if captured.contains(&adjacent) {
                    continue;
                }
                let Some(landing) = from.step(direction, 2) else {
                    continue;
                };
                if occupant(board, landing, origin).is_none() {
                    moves.push(Move {
                        from,
                        direction,
                        kind: MoveKind::Jump { captured: adjacent },
                    });
                }
            }
            Some(_) => {}
        }
    }
    moves
}

/// Occupant of `coordinate` during a chain search. Jumped pieces stay
/// on the board until the turn commits, so their squares still block;
/// only the chain's own origin counts as vacated.
fn occupant(board: &Board, coordinate: Coordinate, vacated: Coordinate) -> Option<Piece> {
    if coordinate == vacated {
        None
    } else {
        board.piece(coordinate)
    }
}

fn dedupe(moves: Vec<Move>) -> Vec<Move> {
    let mut unique = Vec::with_capacity(moves.len());
    for mv in moves {
        if !unique.contains(&mv) {
            unique.push(mv);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Direction::{LowerLeft, LowerRight, UpperLeft, UpperRight};

    fn at(file: u8, rank: u8) -> Coordinate {
        Coordinate::new(file, rank)
    }

    fn piece_at(board: &Board, file: u8, rank: u8) -> Piece {
        board.piece(at(file, rank)).unwrap()
    }

    #[test]
    fn men_move_forward_only_and_kings_all_four_ways() {
        assert_eq!(
            available_directions(Side::Top, false),
            &[LowerLeft, LowerRight]
        );
        assert_eq!(
            available_directions(Side::Bottom, false),
            &[UpperLeft, UpperRight]
        );
        assert_eq!(available_directions(Side::Top, true), &Direction::ALL);
        assert_eq!(available_directions(Side::Bottom, true), &Direction::ALL);
    }

    #[test]
    fn t11_corner_man_on_a_fresh_board_has_one_step() {
        let board = Board::new();
        let moves = moves(&piece_at(&board, 0, 5), &board);
        assert_eq!(
            moves,
            vec![Move {
                from: at(0, 5),
                direction: UpperRight,
                kind: MoveKind::Step,
            }]
        );
        assert_eq!(moves[0].landing(), Some(at(1, 4)));
    }

    #[test]
    fn t12_fresh_board_offers_seven_steps_and_no_jumps() {
        let board = Board::new();
        for side in [Side::Top, Side::Bottom] {
            let mut total = 0;
            for piece in board.pieces(side) {
                let moves = moves(&piece, &board);
                assert!(moves.iter().all(|mv| !mv.is_jump()));
                total += moves.len();
            }
            assert_eq!(total, 7);
        }
    }

    #[test]
    fn t13_adjacent_opponent_with_an_empty_square_beyond_is_jumped() {
        let mut board = Board::empty();
        board.set_piece(at(2, 5), Side::Bottom, false);
        board.set_piece(at(3, 4), Side::Top, false);
        let moves = moves(&piece_at(&board, 2, 5), &board);
        let jumps: Vec<_> = moves.iter().filter(|mv| mv.is_jump()).collect();
        assert_eq!(jumps.len(), 1);
        assert_eq!(
            jumps[0].kind,
            MoveKind::Jump { captured: at(3, 4) }
        );
        assert_eq!(jumps[0].landing(), Some(at(4, 3)));
        // The other forward diagonal is open, so the step is still there.
        assert!(moves.iter().any(|mv| {
            mv.kind == MoveKind::Step && mv.direction == UpperLeft
        }));
    }

    #[test]
    fn blocked_landings_and_edge_departures_yield_no_jump() {
        let mut board = Board::empty();
        board.set_piece(at(2, 5), Side::Bottom, false);
        board.set_piece(at(3, 4), Side::Top, false);
        board.set_piece(at(4, 3), Side::Top, false);
        let moves_blocked = moves(&piece_at(&board, 2, 5), &board);
        assert!(moves_blocked.iter().all(|mv| !mv.is_jump()));

        let mut board = Board::empty();
        board.set_piece(at(1, 4), Side::Bottom, false);
        board.set_piece(at(0, 3), Side::Top, false);
        let moves_edge = moves(&piece_at(&board, 1, 4), &board);
        assert!(
            moves_edge.iter().all(|mv| !mv.is_jump()),
            "jump would land off the board"
        );
    }

    #[test]
    fn own_pieces_block_and_are_never_jumped() {
        let mut board = Board::empty();
        board.set_piece(at(2, 5), Side::Bottom, false);
        board.set_piece(at(3, 4), Side::Bottom, false);
        let moves = moves(&piece_at(&board, 2, 5), &board);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].direction, UpperLeft);
        assert_eq!(moves[0].kind, MoveKind::Step);
    }

    #[test]
    fn men_never_step_or_jump_backward() {
        let mut board = Board::empty();
        board.set_piece(at(3, 4), Side::Bottom, false);
        board.set_piece(at(2, 5), Side::Top, false);
        let moves = moves(&piece_at(&board, 3, 4), &board);
        assert!(moves.iter().all(|mv| {
            mv.direction == UpperLeft || mv.direction == UpperRight
        }));
    }

    #[test]
    fn t14_double_jump_produces_the_full_chain_and_its_prefix() {
        let mut board = Board::empty();
        board.set_piece(at(5, 6), Side::Bottom, false);
        board.set_piece(at(4, 5), Side::Top, false);
        board.set_piece(at(2, 3), Side::Top, false);
        let moves = moves(&piece_at(&board, 5, 6), &board);
        let jumps: Vec<_> = moves.iter().filter(|mv| mv.is_jump()).collect();
        assert_eq!(jumps.len(), 2);

        let paths = paths(&moves);
        let jump_paths: Vec<_> = paths.iter().filter(|path| path.is_jumps()).collect();
        assert_eq!(jump_paths.len(), 2, "full chain plus its prefix");
        let full = jump_paths
            .iter()
            .find(|path| path.moves().len() == 2)
            .unwrap();
        assert_eq!(full.landing(), Some(at(1, 2)));
        assert_eq!(full.captures(), vec![at(4, 5), at(2, 3)]);
        let prefix = jump_paths
            .iter()
            .find(|path| path.moves().len() == 1)
            .unwrap();
        assert_eq!(prefix.landing(), Some(at(3, 4)));
    }

    #[test]
    fn forked_continuations_become_separate_paths() {
        let mut board = Board::empty();
        board.set_piece(at(5, 6), Side::Bottom, false);
        board.set_piece(at(4, 5), Side::Top, false);
        board.set_piece(at(2, 3), Side::Top, false);
        board.set_piece(at(4, 3), Side::Top, false);
        let moves = moves(&piece_at(&board, 5, 6), &board);
        let paths = paths(&moves);
        let landings: Vec<_> = paths
            .iter()
            .filter(|path| path.moves().len() == 2)
            .map(|path| path.landing().unwrap())
            .collect();
        assert_eq!(landings.len(), 2);
        assert!(landings.contains(&at(1, 2)));
        assert!(landings.contains(&at(5, 2)));
    }

    #[test]
    fn a_chain_never_reverses_onto_the_piece_it_just_took() {
        let mut board = Board::empty();
        board.set_piece(at(5, 6), Side::Bottom, true);
        board.set_piece(at(4, 5), Side::Top, false);
        board.set_piece(at(2, 5), Side::Top, false);
        let moves = moves(&piece_at(&board, 5, 6), &board);
        // The king jumps to (3,4) and may continue over (2,5), but never
        // back over the piece standing on (4,5).
        let over_again = moves
            .iter()
            .filter(|mv| mv.kind == MoveKind::Jump { captured: at(4, 5) })
            .count();
        assert_eq!(over_again, 1);
        let paths = paths(&moves);
        assert!(
            paths
                .iter()
                .any(|path| path.captures() == vec![at(4, 5), at(2, 5)])
        );
        assert!(paths.iter().all(|path| path.landing() != Some(at(5, 6))));
    }

    #[test]
    fn a_king_may_circle_back_to_its_vacated_origin() {
        let mut board = Board::empty();
        board.set_piece(at(1, 2), Side::Bottom, true);
        for (file, rank) in [(2, 3), (4, 3), (4, 1), (2, 1)] {
            board.set_piece(at(file, rank), Side::Top, false);
        }
        let moves = moves(&piece_at(&board, 1, 2), &board);
        let paths = paths(&moves);
        let rings: Vec<_> = paths
            .iter()
            .filter(|path| path.moves().len() == 4)
            .collect();
        assert_eq!(rings.len(), 2, "one full circle each way round");
        for ring in rings {
            assert_eq!(ring.landing(), Some(at(1, 2)));
            let mut captures = ring.captures();
            captures.sort_unstable_by_key(|c| c.index());
            assert_eq!(captures, vec![at(2, 1), at(4, 1), at(2, 3), at(4, 3)]);
        }
        // Two open diagonals also offer plain steps.
        assert_eq!(paths.len(), 10);
    }

    #[test]
    fn t15_playable_pieces_are_flagged_at_the_right_moment() {
        let board = Board::new();
        let marked = mark_playable(Side::Bottom, &board);
        for piece in marked.pieces(Side::Bottom) {
            assert_eq!(
                piece.can_move,
                piece.coordinate.rank == 5,
                "only the front row can move at the start"
            );
        }
        for piece in marked.pieces(Side::Top) {
            assert!(!piece.can_move);
        }
    }

    #[test]
    fn a_fully_blocked_side_reports_no_moves() {
        let mut board = Board::empty();
        // Bottom man wedged in the corner behind top men.
        board.set_piece(at(0, 7), Side::Bottom, false);
        board.set_piece(at(1, 6), Side::Top, false);
        board.set_piece(at(2, 5), Side::Top, false);
        assert!(!side_can_move(Side::Bottom, &board));
        assert!(side_can_move(Side::Top, &board));
    }
}
