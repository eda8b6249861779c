use std::fmt;

pub const BOARD_SIZE: usize = 8;

/// A board coordinate. `file` runs left to right, `rank` top to bottom,
/// both in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub file: u8,
    pub rank: u8,
}

impl Coordinate {
    pub fn new(file: u8, rank: u8) -> Self {
        debug_assert!(in_bounds(file as i16) && in_bounds(rank as i16));
        Self { file, rank }
    }

    /// Rank-major index into the flat 64-cell layer.
    pub fn index(self) -> usize {
        (self.rank as usize) * BOARD_SIZE + self.file as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= BOARD_SIZE * BOARD_SIZE {
            return None;
        }
        Some(Self {
            file: (index % BOARD_SIZE) as u8,
            rank: (index / BOARD_SIZE) as u8,
        })
    }

    /// Whether this square is dark, and therefore in play.
    pub fn playable(self) -> bool {
        (self.file + self.rank) % 2 == 1
    }

    /// The coordinate `magnitude` diagonal steps away, or `None` when
    /// either axis would leave the board.
    pub fn step(self, direction: Direction, magnitude: u8) -> Option<Coordinate> {
        let (df, dr) = direction.delta();
        let file = self.file as i16 + df * magnitude as i16;
        let rank = self.rank as i16 + dr * magnitude as i16;
        if !in_bounds(file) || !in_bounds(rank) {
            return None;
        }
        Some(Coordinate {
            file: file as u8,
            rank: rank as u8,
        })
    }

    /// Parses the text form produced by `Display`: a file letter `A`-`H`
    /// (either case) followed by a rank digit `1`-`8`, e.g. `"C4"`.
    pub fn parse(text: &str) -> Option<Coordinate> {
        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_uppercase().wrapping_sub(b'A');
        let rank = bytes[1].wrapping_sub(b'1');
        if file as usize >= BOARD_SIZE || rank as usize >= BOARD_SIZE {
            return None;
        }
        Some(Coordinate { file, rank })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.file) as char, self.rank + 1)
    }
}

/// The four diagonal directions. "Upper" decreases rank, "left"
/// decreases file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::UpperLeft,
        Direction::UpperRight,
        Direction::LowerLeft,
        Direction::LowerRight,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::UpperLeft => Direction::LowerRight,
            Direction::UpperRight => Direction::LowerLeft,
            Direction::LowerLeft => Direction::UpperRight,
            Direction::LowerRight => Direction::UpperLeft,
        }
    }

    fn delta(self) -> (i16, i16) {
        match self {
            Direction::UpperLeft => (-1, -1),
            Direction::UpperRight => (1, -1),
            Direction::LowerLeft => (-1, 1),
            Direction::LowerRight => (1, 1),
        }
    }
}

fn in_bounds(value: i16) -> bool {
    value >= 0 && value < BOARD_SIZE as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_round_trip_every_coordinate() {
        for rank in 0..BOARD_SIZE as u8 {
            for file in 0..BOARD_SIZE as u8 {
                let coordinate = Coordinate::new(file, rank);
                let text = coordinate.to_string();
                assert_eq!(Coordinate::parse(&text), Some(coordinate));
            }
        }
    }

    #[test]
    fn display_uses_letter_then_one_based_rank() {
        assert_eq!(Coordinate::new(0, 0).to_string(), "A1");
        assert_eq!(Coordinate::new(2, 3).to_string(), "C4");
        assert_eq!(Coordinate::new(7, 7).to_string(), "H8");
    }

    #[test]
    fn parse_accepts_lowercase_files() {
        assert_eq!(Coordinate::parse("c4"), Some(Coordinate::new(2, 3)));
    }

    #[test]
    fn parse_rejects_malformed_text() {
        for text in ["", "C", "C44", "I1", "A9", "A0", "4C", "??"] {
            assert_eq!(Coordinate::parse(text), None, "accepted {text:?}");
        }
    }

    #[test]
    fn index_round_trips_and_is_rank_major() {
        assert_eq!(Coordinate::new(0, 0).index(), 0);
        assert_eq!(Coordinate::new(7, 0).index(), 7);
        assert_eq!(Coordinate::new(0, 1).index(), 8);
        for index in 0..64 {
            assert_eq!(Coordinate::from_index(index).unwrap().index(), index);
        }
        assert_eq!(Coordinate::from_index(64), None);
    }

    #[test]
    fn step_applies_direction_and_magnitude() {
        let from = Coordinate::new(2, 4);
        assert_eq!(
            from.step(Direction::UpperRight, 1),
            Some(Coordinate::new(3, 3))
        );
        assert_eq!(
            from.step(Direction::UpperRight, 2),
            Some(Coordinate::new(4, 2))
        );
        assert_eq!(
            from.step(Direction::LowerLeft, 1),
            Some(Coordinate::new(1, 5))
        );
    }

    #[test]
    fn step_rejects_every_edge_departure() {
        assert_eq!(Coordinate::new(0, 0).step(Direction::UpperLeft, 1), None);
        assert_eq!(Coordinate::new(7, 0).step(Direction::UpperRight, 1), None);
        assert_eq!(Coordinate::new(0, 7).step(Direction::LowerLeft, 1), None);
        assert_eq!(Coordinate::new(7, 7).step(Direction::LowerRight, 1), None);
        // A jump can leave the board even when the single step would not.
        assert_eq!(Coordinate::new(1, 1).step(Direction::UpperLeft, 2), None);
        assert_eq!(Coordinate::new(0, 5).step(Direction::UpperLeft, 1), None);
    }

    #[test]
    fn opposite_pairs_upper_left_with_lower_right() {
        assert_eq!(Direction::UpperLeft.opposite(), Direction::LowerRight);
        assert_eq!(Direction::UpperRight.opposite(), Direction::LowerLeft);
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }
}
