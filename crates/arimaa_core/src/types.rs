use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Gold,
    Silver,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::Gold, Color::Silver];

    pub fn other(self) -> Color {
        match self {
            Color::Gold => Color::Silver,
            Color::Silver => Color::Gold,
        }
    }

    pub fn idx(self) -> usize {
        match self {
            Color::Gold => 0,
            Color::Silver => 1,
        }
    }

    /// Accepts both the internal (`g`/`s`) and the database (`w`/`b`) side letters.
    pub fn from_side_char(c: char) -> Option<Color> {
        match c.to_ascii_lowercase() {
            'g' | 'w' => Some(Color::Gold),
            's' | 'b' => Some(Color::Silver),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Color::Gold => 'g',
            Color::Silver => 's',
        }
    }

    /// Rank index (0..7) a rabbit of this color has to reach.
    pub fn goal_rank(self) -> i8 {
        match self {
            Color::Gold => 7,
            Color::Silver => 0,
        }
    }

    /// Rank delta of a forward step.
    pub fn forward(self) -> i8 {
        match self {
            Color::Gold => 1,
            Color::Silver => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Gold => write!(f, "gold"),
            Color::Silver => write!(f, "silver"),
        }
    }
}

/// Piece kinds ordered by strength: a piece can push, pull and freeze
/// any strictly weaker enemy piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieceKind {
    Rabbit,
    Cat,
    Dog,
    Horse,
    Camel,
    Elephant,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Rabbit,
        PieceKind::Cat,
        PieceKind::Dog,
        PieceKind::Horse,
        PieceKind::Camel,
        PieceKind::Elephant,
    ];

    pub fn idx(self) -> usize {
        self as usize
    }

    /// Gold (upper case) notation letter.
    pub fn letter(self) -> char {
        match self {
            PieceKind::Rabbit => 'R',
            PieceKind::Cat => 'C',
            PieceKind::Dog => 'D',
            PieceKind::Horse => 'H',
            PieceKind::Camel => 'M',
            PieceKind::Elephant => 'E',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    pub fn to_char(self) -> char {
        let c = self.kind.letter();
        match self.color {
            Color::Gold => c,
            Color::Silver => c.to_ascii_lowercase(),
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = match c.to_ascii_uppercase() {
            'R' => PieceKind::Rabbit,
            'C' => PieceKind::Cat,
            'D' => PieceKind::Dog,
            'H' => PieceKind::Horse,
            'M' => PieceKind::Camel,
            'E' => PieceKind::Elephant,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() {
            Color::Gold
        } else {
            Color::Silver
        };
        Some(Piece { color, kind })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn to_char(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
        }
    }

    pub fn from_char(c: char) -> Option<Direction> {
        match c {
            'n' => Some(Direction::North),
            's' => Some(Direction::South),
            'e' => Some(Direction::East),
            'w' => Some(Direction::West),
            _ => None,
        }
    }

    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Direction of a single orthogonal step, if `from -> to` is one.
    pub fn between(from: u8, to: u8) -> Option<Direction> {
        let df = file_of(to) - file_of(from);
        let dr = rank_of(to) - rank_of(from);
        match (df, dr) {
            (0, 1) => Some(Direction::North),
            (0, -1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}

/// A single step of one piece to an orthogonally adjacent square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    pub from: u8, // 0..63
    pub to: u8,   // 0..63
}

impl Step {
    pub fn new(from: u8, to: u8) -> Self {
        Self { from, to }
    }
}

pub const TRAP_C3: u8 = 18;
pub const TRAP_F3: u8 = 21;
pub const TRAP_C6: u8 = 42;
pub const TRAP_F6: u8 = 45;
pub const TRAPS: [u8; 4] = [TRAP_C3, TRAP_F3, TRAP_C6, TRAP_F6];

// Helpers
pub fn file_of(sq: u8) -> i8 {
    (sq % 8) as i8
}
pub fn rank_of(sq: u8) -> i8 {
    (sq / 8) as i8
}
pub fn sq(file: i8, rank: i8) -> Option<u8> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some((rank as u8) * 8 + (file as u8))
    } else {
        None
    }
}

pub fn step_toward(from: u8, dir: Direction) -> Option<u8> {
    let (df, dr) = dir.delta();
    sq(file_of(from) + df, rank_of(from) + dr)
}

pub fn sq_to_coord(sq: u8) -> String {
    let f = (b'a' + (sq % 8)) as char;
    let r = (b'1' + (sq / 8)) as char;
    format!("{f}{r}")
}

pub fn coord_to_sq(c: &str) -> Option<u8> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0];
    let r = b[1];
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    let file = f - b'a';
    let rank = r - b'1';
    Some(rank * 8 + file)
}
