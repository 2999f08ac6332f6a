use crate::types::*;

/// One board cell: at most one piece and at most one item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SquareContent {
    pub piece: Option<Piece>,
    pub item: Option<Item>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl Winner {
    pub fn from_color(c: Color) -> Self {
        match c {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Winner::White => Some(Color::White),
            Winner::Black => Some(Color::Black),
            Winner::Draw => None,
        }
    }
}

/// Full engine-internal game state. Created once per ply by the transition
/// function as a snapshot; never mutated afterwards by the search.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub board: [SquareContent; 64],
    pub current_player: Color,
    /// Pieces captured BY each color. Color X's list holds opponent pieces X
    /// has taken; it is the pool X's opponent resurrects from.
    pub captured: [Vec<Piece>; 2],
    /// Consecutive-capture counters per color.
    pub kill_streaks: [u8; 2],
    /// Whether the side that just moved repeats its turn.
    pub extra_turn: bool,
    /// Monotonic half-move counter; drives periodic hazard spawning.
    pub move_counter: u32,
    pub game_over: bool,
    pub winner: Option<Winner>,
    /// True when the game ended by checkmate delivered on an extra turn.
    pub auto_checkmate: bool,
    /// Owner of the game's first capture, set once and never cleared.
    pub first_blood: Option<Color>,
    /// Transient en-passant target square, cleared every move unless set.
    pub en_passant: Option<u8>,
    /// Seed for the random post-move effects of the next transition. Part of
    /// the state so probing a candidate and applying it roll identically;
    /// each transition rewrites it for the successor.
    pub rng_salt: u64,
}

impl GameState {
    pub fn startpos() -> Self {
        let mut state = GameState {
            board: [SquareContent::default(); 64],
            current_player: Color::White,
            captured: [Vec::new(), Vec::new()],
            kill_streaks: [0, 0],
            extra_turn: false,
            move_counter: 0,
            game_over: false,
            winner: None,
            auto_checkmate: false,
            first_blood: None,
            en_passant: None,
            rng_salt: 0,
        };

        for f in 0..8u32 {
            state.board[8 + f as usize].piece = Some(Piece::new(
                PieceId::new(8 + f),
                PieceKind::Pawn,
                Color::White,
            ));
            state.board[48 + f as usize].piece = Some(Piece::new(
                PieceId::new(48 + f),
                PieceKind::Pawn,
                Color::Black,
            ));
        }
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            state.board[f].piece = Some(Piece::new(PieceId::new(f as u32), kind, Color::White));
            state.board[56 + f].piece = Some(Piece::new(
                PieceId::new(56 + f as u32),
                kind,
                Color::Black,
            ));
        }
        state
    }

    /// An empty board with all bookkeeping zeroed. Test scaffolding.
    pub fn empty() -> Self {
        GameState {
            board: [SquareContent::default(); 64],
            current_player: Color::White,
            captured: [Vec::new(), Vec::new()],
            kill_streaks: [0, 0],
            extra_turn: false,
            move_counter: 0,
            game_over: false,
            winner: None,
            auto_checkmate: false,
            first_blood: None,
            en_passant: None,
            rng_salt: 0,
        }
    }

    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board.get(sq as usize).and_then(|s| s.piece)
    }

    pub fn item_at(&self, sq: u8) -> Option<Item> {
        self.board.get(sq as usize).and_then(|s| s.item)
    }

    pub fn set_piece(&mut self, sq: u8, pc: Option<Piece>) {
        if let Some(s) = self.board.get_mut(sq as usize) {
            s.piece = pc;
        }
    }

    pub fn set_item(&mut self, sq: u8, item: Option<Item>) {
        if let Some(s) = self.board.get_mut(sq as usize) {
            s.item = item;
        }
    }

    /// A square is free for occupation if it holds neither piece nor item.
    pub fn is_free(&self, sq: u8) -> bool {
        self.piece_at(sq).is_none() && self.item_at(sq).is_none()
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        for i in 0..64u8 {
            if let Some(pc) = self.piece_at(i)
                && pc.color == c
                && pc.kind == PieceKind::King
            {
                return Some(i);
            }
        }
        None
    }

    pub fn piece_count(&self) -> usize {
        self.board.iter().filter(|s| s.piece.is_some()).count()
    }

    /// Squares holding a piece of the given color, with the piece.
    pub fn pieces_of(&self, c: Color) -> impl Iterator<Item = (u8, Piece)> + '_ {
        (0..64u8).filter_map(move |i| {
            self.piece_at(i)
                .filter(|pc| pc.color == c)
                .map(|pc| (i, pc))
        })
    }

    /// Resurrection pool for `c`: the opponent's captured-list, which holds
    /// pieces the opponent took from `c`.
    pub fn resurrection_pool(&self, c: Color) -> &[Piece] {
        &self.captured[c.other().idx()]
    }

    /// Terminal check independent of move availability: a side missing its
    /// king, or an infiltrator camped on the enemy back rank, ends the game.
    pub fn detect_terminal(&mut self) {
        if self.game_over {
            return;
        }
        for c in [Color::White, Color::Black] {
            if self.king_sq(c).is_none() {
                self.game_over = true;
                self.winner = Some(Winner::from_color(c.other()));
                return;
            }
        }
        for i in 0..64u8 {
            if let Some(pc) = self.piece_at(i)
                && pc.kind == PieceKind::Infiltrator
                && rank_of(i) == pc.color.far_rank()
            {
                self.game_over = true;
                self.winner = Some(Winner::from_color(pc.color));
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
