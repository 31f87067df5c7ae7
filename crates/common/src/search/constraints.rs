//! Constraints restricting which moves a sampler may return.

use std::collections::HashSet;

use arimaa_core::{Bitboard, Piece, Position, Step};

/// A filter on candidate moves. `None` fields do not restrict anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveConstraints {
    /// Every moved piece must be one of these (identified by colour and kind).
    pub only_pieces: Option<HashSet<Piece>>,
    /// Every step must start and end inside this region.
    pub only_squares: Option<Bitboard>,
}

impl MoveConstraints {
    pub fn unconstrained() -> Self {
        Self::default()
    }

    pub fn pieces<I: IntoIterator<Item = Piece>>(pieces: I) -> Self {
        Self {
            only_pieces: Some(pieces.into_iter().collect()),
            only_squares: None,
        }
    }

    pub fn squares(region: Bitboard) -> Self {
        Self {
            only_pieces: None,
            only_squares: Some(region),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.only_pieces.is_none() && self.only_squares.is_none()
    }

    /// Whether `steps`, played from `start`, satisfy the constraints.
    ///
    /// Each step's piece is the one standing on its source square in `start`.
    /// A step starting on a square that was empty at the start of the turn
    /// fails the piece check.
    pub fn matches(&self, start: &Position, steps: &[Step]) -> bool {
        steps.iter().all(|s| {
            let squares_ok = self
                .only_squares
                .map_or(true, |region| region.contains(s.from) && region.contains(s.to));
            let piece_ok = match &self.only_pieces {
                None => true,
                Some(allowed) => start.piece_at(s.from).is_some_and(|pc| allowed.contains(&pc)),
            };
            squares_ok && piece_ok
        })
    }
}
