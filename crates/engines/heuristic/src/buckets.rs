//! Constraint buckets the heuristic engine cycles through while sampling.

use arimaa_common::MoveConstraints;
use arimaa_core::{Bitboard, Color, Piece, PieceKind, Position};

/// Trap squares and their neighbours.
pub fn trap_region() -> Bitboard {
    Bitboard::TRAPS | Bitboard::TRAPS.neighbors()
}

/// The two ranks nearest the goal line `side` is attacking.
pub fn goal_region(side: Color) -> Bitboard {
    match side {
        Color::Gold => Bitboard::RANK_7 | Bitboard::RANK_8,
        Color::Silver => Bitboard::RANK_1 | Bitboard::RANK_2,
    }
}

pub fn big_pieces(side: Color) -> [Piece; 3] {
    [PieceKind::Elephant, PieceKind::Camel, PieceKind::Horse].map(|k| Piece::new(side, k))
}

/// Buckets in the order they are sampled. The first one is always
/// unconstrained so every legal move stays reachable.
pub fn build_constraint_buckets(pos: &Position) -> Vec<MoveConstraints> {
    let side = pos.side_to_move;
    vec![
        MoveConstraints::unconstrained(),
        MoveConstraints::pieces(big_pieces(side)),
        MoveConstraints::squares(trap_region()),
        MoveConstraints::squares(goal_region(side)),
    ]
}

#[cfg(test)]
#[path = "buckets_tests.rs"]
mod buckets_tests;
