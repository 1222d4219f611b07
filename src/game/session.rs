use std::time::{Duration, Instant};

use rand::{Rng, seq::SliceRandom};
use tracing::debug;

use super::{
    clock::{Clock, MonotonicClock},
    grid::GridSize,
};

/// How long a correctly clicked square stays highlighted.
pub const ACKNOWLEDGMENT_DURATION: Duration = Duration::from_millis(500);

/// Linear progression of a play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Board is laid out but the timer is not running.
    Idle,
    /// Timer running; clicks are accepted.
    Active {
        /// Instant the timer was started.
        started_at: Instant,
    },
    /// Every number was found; the elapsed time is frozen.
    Complete {
        /// Final time.
        elapsed: Duration,
        /// Whether the completion prompt is still displayed.
        prompt_open: bool,
    },
}

/// Result of a click on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Wrong number, or the session is not running.
    Ignored,
    /// Correct number; `next` is the new target.
    Advanced {
        /// Number to find next.
        next: u32,
    },
    /// The last number was found and the session ended.
    Completed {
        /// Final time.
        elapsed: Duration,
    },
}

/// Submission payload for a finished session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Board the score was achieved on.
    pub grid: GridSize,
    /// Completion time in seconds with millisecond resolution.
    pub time_secs: f64,
}

/// Single-owner state for one play-through of the game.
///
/// The board is always populated, even while idle, so a caller can render it
/// before the first `start`. Only [`GameSession::start`] arms the timer.
#[derive(Debug)]
pub struct GameSession<C: Clock = MonotonicClock> {
    clock: C,
    grid: GridSize,
    numbers: Vec<u32>,
    target: u32,
    elapsed: Duration,
    phase: SessionPhase,
    acknowledgments: Vec<(u32, Instant)>,
}

impl GameSession<MonotonicClock> {
    /// Create an idle session on the given board using the system monotonic clock.
    pub fn new(grid: GridSize) -> Self {
        Self::with_clock(grid, MonotonicClock)
    }
}

impl<C: Clock> GameSession<C> {
    /// Create an idle session driven by a custom clock.
    pub fn with_clock(grid: GridSize, clock: C) -> Self {
        let mut session = Self {
            clock,
            grid,
            numbers: Vec::new(),
            target: 1,
            elapsed: Duration::ZERO,
            phase: SessionPhase::Idle,
            acknowledgments: Vec::new(),
        };
        session.shuffle_board(&mut rand::rng());
        session
    }

    /// Switch to another board size, discarding any run in progress.
    pub fn configure(&mut self, grid: GridSize) {
        debug!(grid = %grid, "configuring game session");
        self.grid = grid;
        self.reset();
        self.shuffle_board(&mut rand::rng());
    }

    /// Start (or restart) a run with a freshly shuffled board.
    pub fn start(&mut self) {
        self.start_with_rng(&mut rand::rng());
    }

    /// Start a run shuffling the board with the provided generator.
    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.reset();
        self.shuffle_board(rng);
        self.phase = SessionPhase::Active {
            started_at: self.clock.now(),
        };
        debug!(grid = %self.grid, "game session started");
    }

    /// Sample the timer, dropping expired acknowledgments, and return the elapsed time.
    pub fn tick(&mut self) -> Duration {
        if let SessionPhase::Active { started_at } = self.phase {
            self.elapsed = self.clock.now().saturating_duration_since(started_at);
        }
        self.prune_acknowledgments();
        self.elapsed
    }

    /// Handle a click on the square holding `value`.
    pub fn click(&mut self, value: u32) -> ClickOutcome {
        if !self.is_active() || value != self.target {
            return ClickOutcome::Ignored;
        }

        self.acknowledgments.push((value, self.clock.now()));

        if self.target == self.grid.squares() {
            let elapsed = self.end();
            return ClickOutcome::Completed { elapsed };
        }

        self.target += 1;
        ClickOutcome::Advanced { next: self.target }
    }

    /// Stop the timer, freeze the elapsed time and open the completion prompt.
    ///
    /// Calling this outside of an active run leaves the session untouched.
    pub fn end(&mut self) -> Duration {
        let SessionPhase::Active { started_at } = self.phase else {
            return self.elapsed;
        };

        self.elapsed = self.clock.now().saturating_duration_since(started_at);
        self.phase = SessionPhase::Complete {
            elapsed: self.elapsed,
            prompt_open: true,
        };
        debug!(grid = %self.grid, elapsed_ms = self.elapsed.as_millis() as u64, "game session complete");
        self.elapsed
    }

    /// Values still highlighted after a correct click.
    pub fn acknowledged(&mut self) -> Vec<u32> {
        self.prune_acknowledgments();
        self.acknowledgments.iter().map(|(value, _)| *value).collect()
    }

    /// Close the completion prompt without starting a new run.
    pub fn dismiss_prompt(&mut self) {
        if let SessionPhase::Complete { prompt_open, .. } = &mut self.phase {
            *prompt_open = false;
        }
    }

    /// Close the completion prompt and immediately start a new run.
    pub fn play_again(&mut self) {
        self.dismiss_prompt();
        self.start();
    }

    /// Leave the game (e.g. to browse rankings); any running timer is discarded.
    pub fn abandon(&mut self) {
        if self.is_active() {
            self.reset();
        }
    }

    /// Score to submit, available once the run is complete.
    pub fn score(&self) -> Option<Score> {
        match self.phase {
            SessionPhase::Complete { elapsed, .. } => Some(Score {
                grid: self.grid,
                time_secs: elapsed.as_millis() as f64 / 1000.0,
            }),
            _ => None,
        }
    }

    /// Current board size.
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Board contents in display order (row-major).
    pub fn numbers(&self) -> &[u32] {
        &self.numbers
    }

    /// Next number to find.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Elapsed time as of the last sample.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, SessionPhase::Active { .. })
    }

    pub fn prompt_open(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Complete {
                prompt_open: true,
                ..
            }
        )
    }

    fn reset(&mut self) {
        self.target = 1;
        self.elapsed = Duration::ZERO;
        self.phase = SessionPhase::Idle;
        self.acknowledgments.clear();
    }

    fn shuffle_board<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.numbers = (1..=self.grid.squares()).collect();
        self.numbers.shuffle(rng);
    }

    fn prune_acknowledgments(&mut self) {
        let now = self.clock.now();
        self.acknowledgments
            .retain(|(_, at)| now.saturating_duration_since(*at) < ACKNOWLEDGMENT_DURATION);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::game::clock::manual::ManualClock;

    fn started(grid: GridSize, clock: &ManualClock) -> GameSession<&ManualClock> {
        let mut session = GameSession::with_clock(grid, clock);
        session.start_with_rng(&mut StdRng::seed_from_u64(7));
        session
    }

    #[test]
    fn start_produces_a_permutation_for_every_size() {
        let clock = ManualClock::new();
        for grid in GridSize::ALL {
            let session = started(grid, &clock);
            let values: HashSet<u32> = session.numbers().iter().copied().collect();
            let expected: HashSet<u32> = (1..=grid.squares()).collect();

            assert_eq!(session.numbers().len(), grid.squares() as usize);
            assert_eq!(values, expected);
            assert_eq!(session.target(), 1);
            assert!(session.is_active());
        }
    }

    #[test]
    fn new_session_is_idle_with_a_board() {
        let session = GameSession::new(GridSize::Five);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.numbers().len(), 25);
    }

    #[test]
    fn clicking_in_order_completes_the_session() {
        let clock = ManualClock::new();
        let mut session = started(GridSize::Four, &clock);

        for value in 1..16 {
            clock.advance(Duration::from_millis(100));
            assert_eq!(
                session.click(value),
                ClickOutcome::Advanced { next: value + 1 }
            );
        }
        clock.advance(Duration::from_millis(100));

        assert_eq!(
            session.click(16),
            ClickOutcome::Completed {
                elapsed: Duration::from_millis(1_600)
            }
        );
        assert!(session.prompt_open());
        assert_eq!(
            session.score(),
            Some(Score {
                grid: GridSize::Four,
                time_secs: 1.6
            })
        );
    }

    #[test]
    fn out_of_order_clicks_never_advance() {
        let clock = ManualClock::new();
        let mut session = started(GridSize::Six, &clock);

        assert_eq!(session.click(2), ClickOutcome::Ignored);
        assert_eq!(session.click(36), ClickOutcome::Ignored);
        assert_eq!(session.target(), 1);

        session.click(1);
        assert_eq!(session.click(1), ClickOutcome::Ignored);
        assert_eq!(session.target(), 2);
    }

    #[test]
    fn clicks_are_ignored_while_idle_or_complete() {
        let clock = ManualClock::new();
        let mut session = GameSession::with_clock(GridSize::Four, &clock);
        assert_eq!(session.click(1), ClickOutcome::Ignored);

        session.start_with_rng(&mut StdRng::seed_from_u64(1));
        for value in 1..=16 {
            session.click(value);
        }
        assert!(matches!(session.phase(), SessionPhase::Complete { .. }));
        assert_eq!(session.click(1), ClickOutcome::Ignored);
    }

    #[test]
    fn timer_freezes_on_completion() {
        let clock = ManualClock::new();
        let mut session = started(GridSize::Four, &clock);

        clock.advance(Duration::from_millis(250));
        assert_eq!(session.tick(), Duration::from_millis(250));

        for value in 1..=16 {
            session.click(value);
        }
        clock.advance(Duration::from_secs(5));
        assert_eq!(session.tick(), Duration::from_millis(250));
        assert_eq!(session.end(), Duration::from_millis(250));
    }

    #[test]
    fn acknowledgments_clear_after_delay() {
        let clock = ManualClock::new();
        let mut session = started(GridSize::Four, &clock);

        session.click(1);
        clock.advance(Duration::from_millis(300));
        session.click(2);
        assert_eq!(session.acknowledged(), vec![1, 2]);

        clock.advance(Duration::from_millis(250));
        assert_eq!(session.acknowledged(), vec![2]);

        clock.advance(Duration::from_millis(250));
        assert!(session.acknowledged().is_empty());
    }

    #[test]
    fn configure_resets_progress() {
        let clock = ManualClock::new();
        let mut session = started(GridSize::Four, &clock);
        session.click(1);

        session.configure(GridSize::Six);

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.target(), 1);
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert_eq!(session.numbers().len(), 36);
        assert_eq!(session.score(), None);
    }

    #[test]
    fn restart_discards_the_previous_run() {
        let clock = ManualClock::new();
        let mut session = started(GridSize::Four, &clock);
        session.click(1);
        clock.advance(Duration::from_secs(3));

        session.start_with_rng(&mut StdRng::seed_from_u64(9));
        clock.advance(Duration::from_millis(10));

        assert_eq!(session.target(), 1);
        assert_eq!(session.tick(), Duration::from_millis(10));
    }

    #[test]
    fn play_again_closes_prompt_and_restarts() {
        let clock = ManualClock::new();
        let mut session = started(GridSize::Four, &clock);
        for value in 1..=16 {
            session.click(value);
        }

        session.play_again();

        assert!(!session.prompt_open());
        assert!(session.is_active());
        assert_eq!(session.target(), 1);
    }

    #[test]
    fn abandon_stops_an_active_run_but_keeps_a_result() {
        let clock = ManualClock::new();
        let mut session = started(GridSize::Four, &clock);
        session.abandon();
        assert_eq!(session.phase(), SessionPhase::Idle);

        session.start_with_rng(&mut StdRng::seed_from_u64(3));
        for value in 1..=16 {
            session.click(value);
        }
        session.abandon();
        assert!(session.score().is_some());
    }
}
