pub mod bitboard;
pub mod board;
pub mod notation;
pub mod time_control;
pub mod types;
pub mod zobrist;

// Re-export core game logic (not engine-specific)
pub use bitboard::*;
pub use board::*;
pub use notation::*;
pub use time_control::*;
pub use types::*;
pub use zobrist::ZOBRIST;

// =============================================================================
// Engine trait: implemented by every Arimaa engine in the workspace
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Steps of the chosen move (None if the side to move is immobilized)
    pub best_move: Option<Vec<Step>>,
    /// Position after the chosen move, turn already passed
    pub result: Option<Position>,
    /// Evaluation of the chosen move from the mover's perspective
    pub score: f64,
    /// Number of candidate moves scored
    pub samples: u64,
    /// Whether the search ended because the clock ran out
    pub stopped: bool,
}

impl SearchResult {
    /// A result for a side that cannot move.
    pub fn immobilized() -> Self {
        Self::default()
    }
}

/// Trait that all Arimaa engines implement.
///
/// The AEI server, the tournament runner and self-play generation only talk
/// to engines through this trait, so builtin engines and AEI subprocesses are
/// interchangeable.
pub trait Engine: Send {
    /// Choose a move for the side to move in `pos` within `limits`.
    ///
    /// `pos` is always at the start of a turn (four steps left) and past the
    /// setup phase.
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult;

    /// Returns the engine's name for AEI identification
    fn name(&self) -> &str;

    fn author(&self) -> &str {
        "Arimaa-lab"
    }

    /// Reset internal state for a new game.
    fn new_game(&mut self) {}

    /// Set an engine option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> bool {
        false
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult {
        (**self).search(pos, limits)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn author(&self) -> &str {
        (**self).author()
    }

    fn new_game(&mut self) {
        (**self).new_game()
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        (**self).set_option(name, value)
    }
}
