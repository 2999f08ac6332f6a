#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
    /// Forward rank direction: +1 for White, -1 for Black.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
    /// Rank index of this color's own back rank.
    pub fn back_rank(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
    /// Rank index of the promotion / enemy back rank.
    pub fn far_rank(self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    Commander,
    Hero,
    Infiltrator,
}

impl PieceKind {
    pub fn idx(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
            PieceKind::Commander => 6,
            PieceKind::Hero => 7,
            PieceKind::Infiltrator => 8,
        }
    }

    /// Pawn-class pieces share pawn geometry and pawn-directed immunities.
    pub fn is_pawn_class(self) -> bool {
        matches!(self, PieceKind::Pawn | PieceKind::Commander)
    }
}

/// Stable piece identity. The low bits carry the origin slot the piece was
/// created on; the high byte counts metamorphosis events (promotion,
/// infiltration, conversion, nomination, resurrection), so a morphed piece is
/// distinguishable from its former self while staying traceable to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PieceId(pub u32);

impl PieceId {
    pub fn new(origin: u32) -> Self {
        PieceId(origin & 0x00FF_FFFF)
    }
    /// Rewrite the id for a metamorphosis event.
    pub fn morphed(self) -> Self {
        let generation = (self.0 >> 24).wrapping_add(1);
        PieceId((generation << 24) | (self.0 & 0x00FF_FFFF))
    }

    /// True if both ids trace back to the same original piece, metamorphosis
    /// aside.
    pub fn same_origin(self, other: PieceId) -> bool {
        self.0 & 0x00FF_FFFF == other.0 & 0x00FF_FFFF
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    /// Experience level, >= 1. Unbounded except queens (capped at 7).
    pub level: u8,
    pub has_moved: bool,
    /// Turns of outright attack immunity remaining.
    pub invulnerable_turns: u8,
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceKind, color: Color) -> Self {
        Piece {
            id,
            kind,
            color,
            level: 1,
            has_moved: false,
            invulnerable_turns: 0,
        }
    }
}

/// Non-piece board occupant. Blocks occupation and ordinary attacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item {
    Anvil,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Move,
    Capture,
    Promotion { to: PieceKind },
    Castle,
    SelfDestruct,
    Swap,
    EnPassant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: u8, // 0..63
    pub to: u8,   // 0..63
    pub kind: MoveKind,
}

impl Move {
    pub fn new(from: u8, to: u8, kind: MoveKind) -> Self {
        Self { from, to, kind }
    }

    pub fn promotion_kind(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion { to } => Some(to),
            _ => None,
        }
    }
}

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

/// Chebyshev distance between two squares.
pub fn king_distance(a: u8, b: u8) -> i8 {
    let df = (file_of(a) - file_of(b)).abs();
    let dr = (rank_of(a) - rank_of(b)).abs();
    df.max(dr)
}
