use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::debug;

use crate::{bitboard::Bitboard, types::*, zobrist::ZOBRIST};

/// How many random walks `random_step_move` tries before enumerating moves.
const RANDOM_MOVE_ATTEMPTS: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("short position must be wrapped in brackets: {0:?}")]
    MissingBrackets(String),
    #[error("short position must describe 64 squares, got {0}")]
    BadLength(usize),
    #[error("invalid piece character {0:?}")]
    BadPiece(char),
    #[error("invalid placement token {0:?}")]
    BadPlacement(String),
    #[error("steps left must be within 1..=4, got {0}")]
    BadStepsLeft(u8),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("empty move")]
    Empty,
    #[error("malformed token {0:?}")]
    BadToken(String),
    #[error("mixes placements and steps: {0:?}")]
    MixedTokens(String),
    #[error("token {0} does not match the piece on the board")]
    PieceMismatch(String),
    #[error("step {0} moves onto an occupied square")]
    Occupied(String),
    #[error("step {0} moves a frozen piece")]
    Frozen(String),
    #[error("step {0} moves a rabbit backward")]
    RabbitBackward(String),
    #[error("step {0} displaces an enemy piece that nothing stronger can push or pull")]
    IllegalDisplacement(String),
    #[error("push of {0} was not completed")]
    IncompletePush(String),
    #[error("move needs more steps than the {0} left")]
    TooManySteps(u8),
    #[error("move does not change the position")]
    NoChange,
    #[error("illegal setup placement {0}")]
    BadSetup(String),
    #[error("step {from}->{to} is not a step between adjacent squares")]
    NotAdjacent { from: u8, to: u8 },
}

/// Atomic decision available to the side to move: a plain step, or a
/// two-step push or pull of a weaker enemy piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Step(Step),
    /// Enemy step first, then the pusher into the vacated square.
    Push([Step; 2]),
    /// Puller step first, then the enemy into the vacated square.
    Pull([Step; 2]),
}

impl Action {
    pub fn steps(&self) -> &[Step] {
        match self {
            Action::Step(s) => std::slice::from_ref(s),
            Action::Push(s) | Action::Pull(s) => &s[..],
        }
    }

    pub fn cost(&self) -> u8 {
        self.steps().len() as u8
    }
}

#[derive(Clone, Debug)]
pub struct Position {
    /// Indexed by [color][piece_kind]
    pub pieces: [[Bitboard; 6]; 2],
    /// All pieces of each color
    pub placement: [Bitboard; 2],
    pub side_to_move: Color,
    pub steps_left: u8,
    hash: u64,
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.side_to_move == other.side_to_move
            && self.steps_left == other.steps_left
    }
}

impl Eq for Position {}

#[derive(Clone, Copy, Debug)]
enum Token {
    Placement(Piece, u8),
    Step(Piece, u8, Direction),
    Capture,
}

impl Position {
    pub fn empty(side_to_move: Color, steps_left: u8) -> Self {
        let mut hash = ZOBRIST.steps_key(steps_left);
        if side_to_move == Color::Silver {
            hash ^= ZOBRIST.side_to_move;
        }
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            placement: [Bitboard::EMPTY; 2],
            side_to_move,
            steps_left,
            hash,
        }
    }

    /// The customary opening setup with gold to move.
    pub fn basic_setup() -> Self {
        let mut p = Position::empty(Color::Gold, 4);
        let gold_second = "DHCMECHD";
        let silver_second = "dhcemchd";
        for f in 0..8u8 {
            p.put_piece(f, Piece::new(Color::Gold, PieceKind::Rabbit));
            p.put_piece(56 + f, Piece::new(Color::Silver, PieceKind::Rabbit));
        }
        for (f, (g, s)) in gold_second.chars().zip(silver_second.chars()).enumerate() {
            if let (Some(gp), Some(sp)) = (Piece::from_char(g), Piece::from_char(s)) {
                p.put_piece(8 + f as u8, gp);
                p.put_piece(48 + f as u8, sp);
            }
        }
        p
    }

    /// Build a position from placement tokens such as `"Ed4 rd5 Ra1"`.
    pub fn from_placement_str(
        side_to_move: Color,
        steps_left: u8,
        text: &str,
    ) -> Result<Self, PositionError> {
        if !(1..=4).contains(&steps_left) {
            return Err(PositionError::BadStepsLeft(steps_left));
        }
        let mut p = Position::empty(side_to_move, steps_left);
        for tok in text.split_whitespace() {
            let mut chars = tok.chars();
            let piece = chars
                .next()
                .and_then(Piece::from_char)
                .ok_or_else(|| PositionError::BadPlacement(tok.to_string()))?;
            let sq = coord_to_sq(chars.as_str())
                .ok_or_else(|| PositionError::BadPlacement(tok.to_string()))?;
            p.set_piece(sq, Some(piece));
        }
        Ok(p)
    }

    /// Parse the bracketed 64-square short notation used by AEI `setposition`.
    /// Squares are listed from a8 to h8, then rank 7, down to rank 1.
    pub fn parse_short(
        side_to_move: Color,
        steps_left: u8,
        text: &str,
    ) -> Result<Self, PositionError> {
        if !(1..=4).contains(&steps_left) {
            return Err(PositionError::BadStepsLeft(steps_left));
        }
        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| PositionError::MissingBrackets(trimmed.to_string()))?;
        let chars: Vec<char> = inner.chars().collect();
        if chars.len() != 64 {
            return Err(PositionError::BadLength(chars.len()));
        }

        let mut p = Position::empty(side_to_move, steps_left);
        for (i, &ch) in chars.iter().enumerate() {
            let rank = 7 - (i / 8) as i8;
            let file = (i % 8) as i8;
            if matches!(ch, ' ' | 'x' | 'X' | '.') {
                continue;
            }
            let piece = Piece::from_char(ch).ok_or(PositionError::BadPiece(ch))?;
            if let Some(s) = sq(file, rank) {
                p.put_piece(s, piece);
            }
        }
        Ok(p)
    }

    pub fn to_short_str(&self) -> String {
        let mut s = String::with_capacity(66);
        s.push('[');
        for rank in (0..8).rev() {
            for file in 0..8 {
                let ch = sq(file, rank)
                    .and_then(|s| self.piece_at(s))
                    .map_or(' ', Piece::to_char);
                s.push(ch);
            }
        }
        s.push(']');
        s
    }

    /// Multi-line board diagram; empty traps are shown as `x`.
    pub fn to_long_str(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.side_to_move.to_char()));
        out.push_str(" +-----------------+\n");
        for rank in (0..8i8).rev() {
            out.push_str(&format!("{}|", rank + 1));
            for file in 0..8i8 {
                let s = (rank * 8 + file) as u8;
                let ch = match self.piece_at(s) {
                    Some(pc) => pc.to_char(),
                    None if Bitboard::TRAPS.contains(s) => 'x',
                    None => ' ',
                };
                out.push(' ');
                out.push(ch);
            }
            out.push_str(" |\n");
        }
        out.push_str(" +-----------------+\n");
        out.push_str("   a b c d e f g h\n");
        out
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// The same board with `side` to move and the step budget unchanged.
    pub fn with_side_to_move(&self, side: Color) -> Position {
        let mut p = self.clone();
        if p.side_to_move != side {
            p.side_to_move = side;
            p.hash ^= ZOBRIST.side_to_move;
        }
        p
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.idx()][kind.idx()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.placement[0] | self.placement[1]
    }

    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied()
    }

    pub fn is_empty(&self, s: u8) -> bool {
        !self.occupied().contains(s)
    }

    /// True when both positions have the same pieces on the same squares.
    pub fn same_board(&self, other: &Position) -> bool {
        self.pieces == other.pieces
    }

    pub fn piece_at(&self, s: u8) -> Option<Piece> {
        let color = if self.placement[0].contains(s) {
            Color::Gold
        } else if self.placement[1].contains(s) {
            Color::Silver
        } else {
            return None;
        };
        PieceKind::ALL
            .into_iter()
            .find(|&k| self.pieces[color.idx()][k.idx()].contains(s))
            .map(|kind| Piece { color, kind })
    }

    pub fn set_piece(&mut self, s: u8, pc: Option<Piece>) {
        self.remove_piece(s);
        if let Some(pc) = pc {
            self.put_piece(s, pc);
        }
    }

    fn put_piece(&mut self, s: u8, pc: Piece) {
        self.pieces[pc.color.idx()][pc.kind.idx()].set(s);
        self.placement[pc.color.idx()].set(s);
        self.hash ^= ZOBRIST.piece_key(pc, s);
    }

    fn remove_piece(&mut self, s: u8) -> Option<Piece> {
        let pc = self.piece_at(s)?;
        self.pieces[pc.color.idx()][pc.kind.idx()].clear(s);
        self.placement[pc.color.idx()].clear(s);
        self.hash ^= ZOBRIST.piece_key(pc, s);
        Some(pc)
    }

    fn set_steps_left(&mut self, steps_left: u8) {
        self.hash ^= ZOBRIST.steps_key(self.steps_left) ^ ZOBRIST.steps_key(steps_left);
        self.steps_left = steps_left;
    }

    /// Enemy pieces of `color`'s opponent that are stronger than `kind`.
    fn stronger_enemies(&self, color: Color, kind: PieceKind) -> Bitboard {
        let enemy = color.other().idx();
        PieceKind::ALL
            .into_iter()
            .filter(|&k| k > kind)
            .fold(Bitboard::EMPTY, |acc, k| acc | self.pieces[enemy][k.idx()])
    }

    /// Own pieces of `color` that are stronger than `kind`.
    fn stronger_friends(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.stronger_enemies(color.other(), kind)
    }

    /// A piece is frozen when a stronger enemy is adjacent and no friendly piece is.
    pub fn is_frozen_at(&self, s: u8) -> bool {
        let Some(pc) = self.piece_at(s) else {
            return false;
        };
        let around = Bitboard::from_square(s).neighbors();
        if !(around & self.placement[pc.color.idx()]).is_empty() {
            return false;
        }
        !(around & self.stronger_enemies(pc.color, pc.kind)).is_empty()
    }

    fn is_rabbit_backward(pc: Piece, from: u8, to: u8) -> bool {
        pc.kind == PieceKind::Rabbit && rank_of(to) - rank_of(from) == -pc.color.forward()
    }

    /// Move the piece on `step.from`, spend one step, then remove any trap
    /// occupant left without a friendly neighbour. At most one piece can be
    /// captured by a single step; it is returned with its square.
    pub fn apply_step(&mut self, step: Step) -> Option<(u8, Piece)> {
        if let Some(pc) = self.remove_piece(step.from) {
            self.put_piece(step.to, pc);
        }
        self.set_steps_left(self.steps_left.saturating_sub(1));

        let mut captured = None;
        for trap in TRAPS {
            let Some(pc) = self.piece_at(trap) else {
                continue;
            };
            let guards = Bitboard::from_square(trap).neighbors() & self.placement[pc.color.idx()];
            if guards.is_empty() {
                self.remove_piece(trap);
                captured = Some((trap, pc));
            }
        }
        captured
    }

    pub fn apply_action(&mut self, action: Action) {
        for &s in action.steps() {
            self.apply_step(s);
        }
    }

    /// End the current turn: the other side moves next with a fresh step budget.
    pub fn pass_turn(&mut self) {
        self.side_to_move = self.side_to_move.other();
        self.hash ^= ZOBRIST.side_to_move;
        self.set_steps_left(4);
    }

    /// All actions the side to move can take with the steps it has left.
    pub fn actions(&self) -> Vec<Action> {
        let mut out = Vec::with_capacity(64);
        let me = self.side_to_move;
        let opp = me.other();
        let empty = self.empty_squares();

        for kind in PieceKind::ALL {
            for from in self.pieces_of(me, kind) {
                if self.is_frozen_at(from) {
                    continue;
                }
                let pc = Piece::new(me, kind);
                let from_bb = Bitboard::from_square(from);

                for to in from_bb.neighbors() & empty {
                    if !Self::is_rabbit_backward(pc, from, to) {
                        out.push(Action::Step(Step::new(from, to)));
                    }
                }

                if self.steps_left < 2 || kind == PieceKind::Rabbit {
                    continue;
                }
                for weaker in PieceKind::ALL.into_iter().filter(|&k| k < kind) {
                    for victim in self.pieces_of(opp, weaker) & from_bb.neighbors() {
                        for dest in Bitboard::from_square(victim).neighbors() & empty {
                            out.push(Action::Push([
                                Step::new(victim, dest),
                                Step::new(from, victim),
                            ]));
                        }
                        for dest in from_bb.neighbors() & empty {
                            out.push(Action::Pull([
                                Step::new(from, dest),
                                Step::new(victim, from),
                            ]));
                        }
                    }
                }
            }
        }
        out
    }

    /// Number of actions available to the side to move.
    pub fn legal_step_count(&self) -> usize {
        self.actions().len()
    }

    pub fn is_immobilized(&self) -> bool {
        self.actions().is_empty()
    }

    /// Every distinct position reachable by a full turn, with one step
    /// sequence leading to it. Results have already passed the turn.
    /// Moves that leave the board unchanged are excluded.
    pub fn get_moves(&self) -> Vec<(Vec<Step>, Position)> {
        let mut results = Vec::new();
        let mut finals = HashSet::new();
        let mut seen = HashSet::new();
        let mut path = Vec::with_capacity(4);
        self.collect_moves(self, &mut path, &mut seen, &mut finals, &mut results);
        results
    }

    fn collect_moves(
        &self,
        start: &Position,
        path: &mut Vec<Step>,
        seen: &mut HashSet<u64>,
        finals: &mut HashSet<[[Bitboard; 6]; 2]>,
        results: &mut Vec<(Vec<Step>, Position)>,
    ) {
        for action in self.actions() {
            let mut next = self.clone();
            next.apply_action(action);
            if !seen.insert(next.hash) {
                continue;
            }
            let len = path.len();
            path.extend_from_slice(action.steps());

            if !next.same_board(start) && finals.insert(next.pieces) {
                let mut done = next.clone();
                done.pass_turn();
                results.push((path.clone(), done));
            }
            if next.steps_left > 0 {
                next.collect_moves(start, path, seen, finals, results);
            }
            path.truncate(len);
        }
    }

    /// A random full-turn move found by walking random actions, without
    /// enumerating the move list. `None` when the side to move is immobilized.
    pub fn random_step_move<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Option<(Vec<Step>, Position)> {
        let first = self.actions();
        if first.is_empty() {
            return None;
        }

        for _ in 0..RANDOM_MOVE_ATTEMPTS {
            let mut pos = self.clone();
            let mut steps = Vec::with_capacity(4);
            let mut actions = first.clone();
            loop {
                let Some(&action) = actions.choose(rng) else {
                    break;
                };
                pos.apply_action(action);
                steps.extend_from_slice(action.steps());
                if pos.steps_left == 0 {
                    break;
                }
                actions = pos.actions();
                // Stopping early competes with every action on equal terms.
                if !pos.same_board(self) && rng.gen_range(0..=actions.len()) == 0 {
                    break;
                }
            }
            if !pos.same_board(self) {
                pos.pass_turn();
                return Some((steps, pos));
            }
        }

        debug!("random walks kept returning to the start position, enumerating moves");
        self.get_moves().choose(rng).cloned()
    }

    /// Winner of a position at the start of a turn, if the game is over.
    ///
    /// Checked in order: goal, elimination of all rabbits, immobilization.
    /// When both sides reached goal (or both lost all rabbits) the player who
    /// just moved wins.
    pub fn end_state(&self) -> Option<Color> {
        let last_mover = self.side_to_move.other();

        let gold_goal = !(self.pieces_of(Color::Gold, PieceKind::Rabbit)
            & Bitboard::rank(Color::Gold.goal_rank()))
        .is_empty();
        let silver_goal = !(self.pieces_of(Color::Silver, PieceKind::Rabbit)
            & Bitboard::rank(Color::Silver.goal_rank()))
        .is_empty();
        match (gold_goal, silver_goal) {
            (true, true) => return Some(last_mover),
            (true, false) => return Some(Color::Gold),
            (false, true) => return Some(Color::Silver),
            (false, false) => {}
        }

        let gold_out = self.pieces_of(Color::Gold, PieceKind::Rabbit).is_empty();
        let silver_out = self.pieces_of(Color::Silver, PieceKind::Rabbit).is_empty();
        match (gold_out, silver_out) {
            (true, true) => return Some(last_mover),
            (true, false) => return Some(Color::Silver),
            (false, true) => return Some(Color::Gold),
            (false, false) => {}
        }

        if self.is_immobilized() {
            return Some(last_mover);
        }
        None
    }

    /// Render steps played from this position in Arimaa notation, including
    /// capture tokens such as `Rc3x`.
    pub fn steps_to_str(&self, steps: &[Step]) -> Result<String, MoveError> {
        let mut pos = self.clone();
        let mut tokens = Vec::with_capacity(steps.len() + 1);
        for &s in steps {
            let dir = Direction::between(s.from, s.to).ok_or(MoveError::NotAdjacent {
                from: s.from,
                to: s.to,
            })?;
            let pc = pos
                .piece_at(s.from)
                .ok_or_else(|| MoveError::PieceMismatch(sq_to_coord(s.from)))?;
            tokens.push(format!("{}{}{}", pc.to_char(), sq_to_coord(s.from), dir.to_char()));
            if let Some((csq, cpc)) = pos.apply_step(s) {
                tokens.push(format!("{}{}x", cpc.to_char(), sq_to_coord(csq)));
            }
        }
        Ok(tokens.join(" "))
    }

    /// Render every piece of `color` as a setup move (`Ra1 Rb1 ...`).
    pub fn placing_move(&self, color: Color) -> String {
        self.placement[color.idx()]
            .filter_map(|s| {
                self.piece_at(s)
                    .map(|pc| format!("{}{}", pc.to_char(), sq_to_coord(s)))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn parse_token(tok: &str) -> Result<Token, MoveError> {
        let bad = || MoveError::BadToken(tok.to_string());
        let chars: Vec<char> = tok.chars().collect();
        if !(3..=4).contains(&chars.len()) {
            return Err(bad());
        }
        let piece = Piece::from_char(chars[0]).ok_or_else(bad)?;
        let coord: String = chars[1..3].iter().collect();
        let s = coord_to_sq(&coord).ok_or_else(bad)?;
        match chars.get(3) {
            None => Ok(Token::Placement(piece, s)),
            Some('x') => Ok(Token::Capture),
            Some(&c) => Direction::from_char(c)
                .map(|d| Token::Step(piece, s, d))
                .ok_or_else(bad),
        }
    }

    /// Play a move given in Arimaa notation and pass the turn.
    ///
    /// Placement-only moves (`Ra1 Rb1 ...`) are setup moves. With `strict`,
    /// every step is checked against the rules; otherwise steps are only
    /// required to move an existing piece to an adjacent empty square.
    pub fn do_move_str(&self, text: &str, strict: bool) -> Result<Position, MoveError> {
        let tokens = text
            .split_whitespace()
            .map(Self::parse_token)
            .collect::<Result<Vec<_>, _>>()?;
        if tokens.is_empty() {
            return Err(MoveError::Empty);
        }

        let placements = tokens
            .iter()
            .filter(|t| matches!(t, Token::Placement(..)))
            .count();
        if placements == tokens.len() {
            return self.do_placement(&tokens, strict);
        }
        if placements > 0 {
            return Err(MoveError::MixedTokens(text.to_string()));
        }

        let mut pos = self.clone();
        let mut checker = StepChecker::default();
        let mut used = 0u8;
        for tok in tokens {
            let Token::Step(piece, from, dir) = tok else {
                continue;
            };
            let label = format!("{}{}{}", piece.to_char(), sq_to_coord(from), dir.to_char());
            let to = step_toward(from, dir).ok_or_else(|| MoveError::BadToken(label.clone()))?;
            if pos.piece_at(from) != Some(piece) {
                return Err(MoveError::PieceMismatch(label));
            }
            used += 1;
            if used > self.steps_left {
                return Err(MoveError::TooManySteps(self.steps_left));
            }
            if strict {
                checker.check(&pos, piece, from, to, &label)?;
            } else if !pos.is_empty(to) {
                return Err(MoveError::Occupied(label));
            }
            pos.apply_step(Step::new(from, to));
        }

        if strict {
            if let Some(pending) = checker.pending_push {
                return Err(MoveError::IncompletePush(sq_to_coord(pending.vacated)));
            }
            if pos.same_board(self) {
                return Err(MoveError::NoChange);
            }
        }
        pos.pass_turn();
        Ok(pos)
    }

    /// The steps of a move in Arimaa notation, capture tokens dropped.
    /// Nothing is checked against a position.
    pub fn parse_steps(text: &str) -> Result<Vec<Step>, MoveError> {
        let mut steps = Vec::with_capacity(4);
        for tok in text.split_whitespace() {
            match Self::parse_token(tok)? {
                Token::Step(_, from, dir) => {
                    let to = step_toward(from, dir)
                        .ok_or_else(|| MoveError::BadToken(tok.to_string()))?;
                    steps.push(Step::new(from, to));
                }
                Token::Capture => {}
                Token::Placement(..) => return Err(MoveError::MixedTokens(text.to_string())),
            }
        }
        if steps.is_empty() {
            return Err(MoveError::Empty);
        }
        Ok(steps)
    }

    fn do_placement(&self, tokens: &[Token], strict: bool) -> Result<Position, MoveError> {
        let mover = self.side_to_move;
        let mut pos = self.clone();
        for tok in tokens {
            let Token::Placement(piece, s) = *tok else {
                continue;
            };
            let label = format!("{}{}", piece.to_char(), sq_to_coord(s));
            if strict {
                let home = match mover {
                    Color::Gold => 0..=1,
                    Color::Silver => 6..=7,
                };
                if piece.color != mover || !home.contains(&rank_of(s)) || !pos.is_empty(s) {
                    return Err(MoveError::BadSetup(label));
                }
            }
            pos.set_piece(s, Some(piece));
        }

        if strict {
            const ARMY: [(PieceKind, u32); 6] = [
                (PieceKind::Rabbit, 8),
                (PieceKind::Cat, 2),
                (PieceKind::Dog, 2),
                (PieceKind::Horse, 2),
                (PieceKind::Camel, 1),
                (PieceKind::Elephant, 1),
            ];
            for (kind, count) in ARMY {
                if pos.pieces_of(mover, kind).popcount() != count {
                    return Err(MoveError::BadSetup(format!(
                        "{} {:?} pieces",
                        pos.pieces_of(mover, kind).popcount(),
                        kind
                    )));
                }
            }
        }
        pos.pass_turn();
        Ok(pos)
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingPush {
    vacated: u8,
    victim: PieceKind,
    pushers: Bitboard,
}

/// Tracks push/pull context while validating a step sequence.
#[derive(Default)]
struct StepChecker {
    pending_push: Option<PendingPush>,
    /// Square and kind of the previous own step, which may be followed by a pull.
    last_own: Option<(u8, PieceKind)>,
}

impl StepChecker {
    fn check(
        &mut self,
        pos: &Position,
        piece: Piece,
        from: u8,
        to: u8,
        label: &str,
    ) -> Result<(), MoveError> {
        if !pos.is_empty(to) {
            return Err(MoveError::Occupied(label.to_string()));
        }
        let previous_own = self.last_own.take();

        if piece.color == pos.side_to_move {
            if let Some(push) = self.pending_push.take() {
                if to != push.vacated || !push.pushers.contains(from) || piece.kind <= push.victim {
                    return Err(MoveError::IncompletePush(sq_to_coord(push.vacated)));
                }
                return Ok(());
            }
            if pos.is_frozen_at(from) {
                return Err(MoveError::Frozen(label.to_string()));
            }
            if Position::is_rabbit_backward(piece, from, to) {
                return Err(MoveError::RabbitBackward(label.to_string()));
            }
            self.last_own = Some((from, piece.kind));
            return Ok(());
        }

        if let Some(push) = self.pending_push {
            return Err(MoveError::IncompletePush(sq_to_coord(push.vacated)));
        }
        if let Some((puller_from, puller)) = previous_own {
            if to == puller_from && puller > piece.kind {
                return Ok(());
            }
        }

        let mover = pos.side_to_move;
        let pushers = (pos.stronger_friends(mover, piece.kind)
            & Bitboard::from_square(from).neighbors())
        .filter(|&s| !pos.is_frozen_at(s));
        let pushers = Bitboard::from_squares(pushers);
        if pushers.is_empty() {
            return Err(MoveError::IllegalDisplacement(label.to_string()));
        }
        self.pending_push = Some(PendingPush {
            vacated: from,
            victim: piece.kind,
            pushers,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
