//! Client-side game controller: grid generation, target validation and timing.

/// Time sources for the session timer.
pub mod clock;
/// Supported grid sizes and their game-mode labels.
pub mod grid;
/// Session state machine driving a single play-through.
pub mod session;

pub use clock::{Clock, MonotonicClock};
pub use grid::{GridSize, InvalidGridSize};
pub use session::{ClickOutcome, GameSession, Score, SessionPhase};
