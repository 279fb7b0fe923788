use crate::evaluator::{evaluate, MatchResult};
use crate::grid::{Grid, Position, Selection};
use serde::{Deserialize, Serialize};

/// Time budget for a round, in seconds
pub const GAME_TIME_SECS: u32 = 60;

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    NotStarted,
    Running,
    Over,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// The countdown hit zero with apples still on the board
    TimedOut,
    /// Every apple was cleared before the countdown ran out
    Cleared,
}

/// The once-per-round report handed to the persistence collaborator
///
/// `final_score` is always `match_count + time_remaining`; on timeout the
/// remaining time is zero, so the bonus only pays out on a cleared board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub final_score: u32,
    pub match_count: u32,
    pub time_remaining: u32,
    pub reason: GameOverReason,
}

/// Orchestrates one round: owns the grid, the countdown, and the score
///
/// All mutation is driven by discrete external events (one `tick` per
/// second, pointer gestures); the session never blocks and never runs
/// its own timer. The caller owns the tick cadence and must restart it
/// on replay so a stale cadence cannot tick a superseded round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    grid: Grid,
    state: SessionState,
    score: u32,
    time_remaining: u32,
    time_limit: u32,
    drag_anchor: Option<Position>,
    current_selection: Option<Selection>,
    summary: Option<GameSummary>,
}

impl Session {
    /// Create a session over a freshly generated grid, not yet started
    pub fn new(grid: Grid) -> Self {
        Self::with_time_limit(grid, GAME_TIME_SECS)
    }

    pub fn with_time_limit(grid: Grid, time_limit: u32) -> Self {
        Self {
            grid,
            state: SessionState::NotStarted,
            score: 0,
            time_remaining: time_limit,
            time_limit,
            drag_anchor: None,
            current_selection: None,
            summary: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Matches found so far (one point per cleared combination)
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds left on the countdown, never negative
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn is_over(&self) -> bool {
        self.state == SessionState::Over
    }

    /// Begin the round: full countdown, zero score
    pub fn start(&mut self) {
        if self.state != SessionState::NotStarted {
            return;
        }
        self.state = SessionState::Running;
        self.score = 0;
        self.time_remaining = self.time_limit;
    }

    /// Advance the countdown by one second
    ///
    /// Reaching zero ends the round; the time bonus is gone, so the final
    /// score is just the match count. Ticks outside Running are ignored.
    pub fn tick(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.finish(GameOverReason::TimedOut);
        }
    }

    /// Evaluate a selection rectangle against the board
    ///
    /// Returns None unless the round is running. A match scores one point
    /// regardless of how many cells it cleared; clearing the last live
    /// cell ends the round with the remaining time as a bonus.
    pub fn select(&mut self, selection: Selection) -> Option<MatchResult> {
        if self.state != SessionState::Running {
            return None;
        }

        let result = evaluate(&mut self.grid, selection);
        if result.is_match() {
            self.score += 1;
            if self.grid.is_cleared() {
                self.finish(GameOverReason::Cleared);
            }
        }
        Some(result)
    }

    /// Anchor a new drag at (row, col)
    pub fn selection_start(&mut self, row: usize, col: usize) {
        if !self.is_running() {
            return;
        }
        let pos = Position::new(row, col);
        self.drag_anchor = Some(pos);
        self.current_selection = Some(Selection::single(pos));
    }

    /// Extend the drag to (row, col), keeping the rectangle normalized
    pub fn selection_update(&mut self, row: usize, col: usize) {
        if !self.is_running() {
            return;
        }
        if let Some(anchor) = self.drag_anchor {
            self.current_selection = Some(Selection::from_corners(anchor, Position::new(row, col)));
        }
    }

    /// The in-flight drag rectangle, if any
    pub fn current_selection(&self) -> Option<Selection> {
        self.current_selection
    }

    /// Finish the drag and evaluate whatever rectangle it spanned
    pub fn selection_end(&mut self) -> Option<MatchResult> {
        self.drag_anchor = None;
        let selection = self.current_selection.take()?;
        self.select(selection)
    }

    /// Abandon the drag without evaluating it
    pub fn selection_cancel(&mut self) {
        self.drag_anchor = None;
        self.current_selection = None;
    }

    /// Drain the game-over report; yields a value exactly once per round
    pub fn take_summary(&mut self) -> Option<GameSummary> {
        self.summary.take()
    }

    /// Start a fresh round on a regenerated grid
    pub fn replay(&mut self, grid: Grid) {
        self.grid = grid;
        self.state = SessionState::Running;
        self.score = 0;
        self.time_remaining = self.time_limit;
        self.drag_anchor = None;
        self.current_selection = None;
        self.summary = None;
    }

    fn finish(&mut self, reason: GameOverReason) {
        if self.state == SessionState::Over {
            return;
        }
        self.state = SessionState::Over;
        self.drag_anchor = None;
        self.current_selection = None;
        self.summary = Some(GameSummary {
            final_score: self.score + self.time_remaining,
            match_count: self.score,
            time_remaining: self.time_remaining,
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;

    /// 4x4 board with five clearable pairs in the top rows and a residue
    /// of nines that can never combine to ten
    fn five_pair_grid() -> Grid {
        Grid::from_values(
            4,
            &[
                1, 9, 2, 8, //
                3, 7, 4, 6, //
                5, 5, 9, 9, //
                9, 9, 9, 9,
            ],
        )
    }

    fn running_session(grid: Grid) -> Session {
        let mut session = Session::new(grid);
        session.start();
        session
    }

    #[test]
    fn test_start_initializes_timer_and_score() {
        let mut session = Session::new(five_pair_grid());
        assert_eq!(session.state(), SessionState::NotStarted);

        session.start();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_remaining(), GAME_TIME_SECS);
    }

    #[test]
    fn test_selection_before_start_is_ignored() {
        let mut session = Session::new(five_pair_grid());
        assert!(session.select(Selection::new(0, 0, 0, 1)).is_none());
        assert_eq!(session.grid().live_count(), 16);
    }

    #[test]
    fn test_match_scores_one_point_per_combination() {
        let mut session = running_session(five_pair_grid());

        let result = session.select(Selection::new(0, 0, 0, 1));
        assert!(matches!(result, Some(MatchResult::Matched { .. })));
        assert_eq!(session.score(), 1);

        // A failed attempt scores nothing and mutates nothing
        let live_before = session.grid().live_count();
        let result = session.select(Selection::new(2, 2, 3, 3));
        assert!(matches!(result, Some(MatchResult::NoMatch { .. })));
        assert_eq!(session.score(), 1);
        assert_eq!(session.grid().live_count(), live_before);
    }

    #[test]
    fn test_timeout_with_score_five_reports_five() {
        let mut session = running_session(five_pair_grid());

        let pairs = [
            Selection::new(0, 0, 0, 1),
            Selection::new(0, 2, 0, 3),
            Selection::new(1, 0, 1, 1),
            Selection::new(1, 2, 1, 3),
            Selection::new(2, 0, 2, 1),
        ];
        for pair in pairs {
            assert!(session.select(pair).map(|r| r.is_match()).unwrap_or(false));
        }
        assert_eq!(session.score(), 5);

        for _ in 0..GAME_TIME_SECS {
            session.tick();
        }

        assert!(session.is_over());
        let summary = session.take_summary().expect("summary on timeout");
        assert_eq!(summary.reason, GameOverReason::TimedOut);
        assert_eq!(summary.match_count, 5);
        assert_eq!(summary.time_remaining, 0);
        assert_eq!(summary.final_score, 5);
    }

    #[test]
    fn test_full_clearance_pays_the_time_bonus() {
        // 5x5 board clearable in exactly nine matches: four rows holding a
        // pair plus a triple, and one row that clears as a single run of five
        let grid = Grid::from_values(
            5,
            &[
                1, 9, 2, 3, 5, //
                2, 8, 1, 4, 5, //
                3, 7, 2, 6, 2, //
                4, 6, 5, 2, 3, //
                1, 2, 3, 2, 2,
            ],
        );
        let mut session = running_session(grid);

        // Burn the clock down to 23 seconds before clearing the board
        for _ in 0..(GAME_TIME_SECS - 23) {
            session.tick();
        }
        assert_eq!(session.time_remaining(), 23);

        for row in 0..4 {
            assert!(session
                .select(Selection::new(row, 0, row, 1))
                .map(|r| r.is_match())
                .unwrap_or(false));
            assert!(session
                .select(Selection::new(row, 2, row, 4))
                .map(|r| r.is_match())
                .unwrap_or(false));
        }
        assert!(session
            .select(Selection::new(4, 0, 4, 4))
            .map(|r| r.is_match())
            .unwrap_or(false));

        assert!(session.grid().is_cleared());
        assert!(session.is_over());

        let summary = session.take_summary().expect("summary on clearance");
        assert_eq!(summary.reason, GameOverReason::Cleared);
        assert_eq!(summary.match_count, 9);
        assert_eq!(summary.time_remaining, 23);
        assert_eq!(summary.final_score, 32);
    }

    #[test]
    fn test_generated_board_pair_scores_on_a_fresh_session() {
        // Scan a few seeds for an axis-adjacent pair summing to ten, then
        // clear it through a fresh session
        for seed in 0..10 {
            let grid = Generator::with_seed(seed).generate();
            let size = grid.size();

            let mut pair = None;
            'scan: for row in 0..size {
                for col in 0..size {
                    let a = grid.value(Position::new(row, col));
                    if col + 1 < size {
                        let b = grid.value(Position::new(row, col + 1));
                        if a + b == 10 {
                            pair = Some(Selection::new(row, col, row, col + 1));
                            break 'scan;
                        }
                    }
                    if row + 1 < size {
                        let b = grid.value(Position::new(row + 1, col));
                        if a + b == 10 {
                            pair = Some(Selection::new(row, col, row + 1, col));
                            break 'scan;
                        }
                    }
                }
            }

            if let Some(selection) = pair {
                let mut session = running_session(grid);
                let result = session.select(selection);
                assert!(matches!(result, Some(MatchResult::Matched { .. })));
                assert_eq!(session.score(), 1);
                assert_eq!(session.grid().live_count(), size * size - 2);
                return;
            }
        }
        panic!("no axis-adjacent pair summing to ten across ten seeds");
    }

    #[test]
    fn test_summary_is_drained_exactly_once() {
        let mut session = running_session(five_pair_grid());
        for _ in 0..GAME_TIME_SECS {
            session.tick();
        }

        assert!(session.take_summary().is_some());
        assert!(session.take_summary().is_none());

        // Further ticks never resurrect the report
        session.tick();
        assert!(session.take_summary().is_none());
    }

    #[test]
    fn test_clearance_on_the_last_second_terminates_once() {
        let grid = Grid::from_values(2, &[5, 5, 1, 9]);
        let mut session = running_session(grid);

        for _ in 0..(GAME_TIME_SECS - 1) {
            session.tick();
        }
        assert_eq!(session.time_remaining(), 1);

        assert!(session
            .select(Selection::new(0, 0, 0, 1))
            .map(|r| r.is_match())
            .unwrap_or(false));
        assert!(session
            .select(Selection::new(1, 0, 1, 1))
            .map(|r| r.is_match())
            .unwrap_or(false));

        assert!(session.is_over());
        let summary = session.take_summary().expect("summary on clearance");
        assert_eq!(summary.reason, GameOverReason::Cleared);
        assert_eq!(summary.final_score, 2 + 1);

        // A straggling tick after game over must not double-report
        session.tick();
        assert!(session.take_summary().is_none());
    }

    #[test]
    fn test_ticks_after_game_over_are_ignored() {
        let mut session = running_session(five_pair_grid());
        for _ in 0..(GAME_TIME_SECS + 10) {
            session.tick();
        }
        assert_eq!(session.time_remaining(), 0);
        assert!(session.is_over());
    }

    #[test]
    fn test_drag_gesture_resolves_like_a_direct_selection() {
        let mut session = running_session(five_pair_grid());

        // Drag from (0,1) back to (0,0): anchor normalization flips it
        session.selection_start(0, 1);
        session.selection_update(0, 0);
        assert_eq!(
            session.current_selection(),
            Some(Selection::new(0, 0, 0, 1))
        );

        let result = session.selection_end();
        assert!(matches!(result, Some(MatchResult::Matched { .. })));
        assert_eq!(session.score(), 1);
        assert!(session.current_selection().is_none());
    }

    #[test]
    fn test_cancelled_drag_never_evaluates() {
        let mut session = running_session(five_pair_grid());

        session.selection_start(0, 0);
        session.selection_update(0, 1);
        session.selection_cancel();

        assert!(session.selection_end().is_none());
        assert_eq!(session.score(), 0);
        assert_eq!(session.grid().live_count(), 16);
    }

    #[test]
    fn test_replay_resets_everything() {
        let mut session = running_session(five_pair_grid());
        session.select(Selection::new(0, 0, 0, 1));
        for _ in 0..GAME_TIME_SECS {
            session.tick();
        }
        assert!(session.is_over());

        session.replay(five_pair_grid());
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_remaining(), GAME_TIME_SECS);
        assert_eq!(session.grid().live_count(), 16);
        // Any undrained summary from the previous round is gone
        assert!(session.take_summary().is_none());
    }

    #[test]
    fn test_session_survives_a_save_round_trip() {
        let mut session = running_session(five_pair_grid());
        session.select(Selection::new(0, 0, 0, 1));
        session.tick();

        let json = serde_json::to_string(&session).expect("serialize");
        let restored: Session = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(restored.state(), SessionState::Running);
        assert_eq!(restored.score(), 1);
        assert_eq!(restored.time_remaining(), session.time_remaining());
        assert_eq!(restored.grid().live_count(), 14);
    }

    #[test]
    fn test_custom_time_limit() {
        let mut session = Session::with_time_limit(five_pair_grid(), 5);
        session.start();
        for _ in 0..5 {
            session.tick();
        }
        assert!(session.is_over());
    }
}
