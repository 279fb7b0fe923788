use crate::grid::{Grid, Position, Selection};
use serde::{Deserialize, Serialize};

/// The sum a selection's live cells must hit to clear
pub const TARGET_SUM: u32 = 10;

/// Outcome of evaluating a selection rectangle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    /// The live cells summed to exactly ten and were all removed
    Matched { cleared: Vec<Position> },
    /// The live cells summed to something else; the grid is untouched
    NoMatch { sum: u32 },
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }
}

/// Evaluate a selection rectangle against the current grid state
///
/// The rectangle is normalized before filtering, so unordered corner
/// pairs from the input layer are accepted. Removal is all-or-nothing:
/// either every collected live cell is removed, or nothing mutates.
/// An empty selection sums to zero and is an ordinary NoMatch, and a
/// single cell can never match since values top out at nine.
pub fn evaluate(grid: &mut Grid, selection: Selection) -> MatchResult {
    let (selected, sum) = {
        let live = grid.live_cells_in(selection);
        let sum: u32 = live.iter().map(|c| c.value() as u32).sum();
        let positions: Vec<Position> = live.iter().map(|c| c.position()).collect();
        (positions, sum)
    };

    if sum == TARGET_SUM {
        for &pos in &selected {
            grid.remove(pos);
        }
        MatchResult::Matched { cleared: selected }
    } else {
        MatchResult::NoMatch { sum }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3x3 board:
    //   1 9 2
    //   3 7 4
    //   5 5 7
    fn grid_3x3() -> Grid {
        Grid::from_values(3, &[1, 9, 2, 3, 7, 4, 5, 5, 7])
    }

    #[test]
    fn test_pair_match_removes_exactly_selection() {
        let mut grid = grid_3x3();
        let result = evaluate(&mut grid, Selection::new(0, 0, 0, 1));

        match result {
            MatchResult::Matched { cleared } => {
                assert_eq!(cleared.len(), 2);
                assert!(cleared.contains(&Position::new(0, 0)));
                assert!(cleared.contains(&Position::new(0, 1)));
            }
            MatchResult::NoMatch { sum } => panic!("expected match, got sum {}", sum),
        }

        assert!(grid.is_removed(Position::new(0, 0)));
        assert!(grid.is_removed(Position::new(0, 1)));
        assert_eq!(grid.live_count(), 7);
    }

    #[test]
    fn test_no_match_leaves_grid_untouched() {
        let mut grid = grid_3x3();
        let before = grid.clone();

        // 1 + 9 + 2 = 12
        let result = evaluate(&mut grid, Selection::new(0, 0, 0, 2));
        assert_eq!(result, MatchResult::NoMatch { sum: 12 });
        assert_eq!(grid, before);
    }

    #[test]
    fn test_single_cell_never_matches() {
        let mut grid = grid_3x3();
        let result = evaluate(&mut grid, Selection::single(Position::new(1, 1)));
        assert_eq!(result, MatchResult::NoMatch { sum: 7 });
        assert_eq!(grid.live_count(), 9);
    }

    #[test]
    fn test_empty_selection_sums_to_zero() {
        let mut grid = grid_3x3();
        grid.remove(Position::new(0, 0));
        grid.remove(Position::new(0, 1));

        let result = evaluate(&mut grid, Selection::new(0, 0, 0, 1));
        assert_eq!(result, MatchResult::NoMatch { sum: 0 });
    }

    #[test]
    fn test_removed_cells_are_excluded_from_the_sum() {
        let mut grid = grid_3x3();
        grid.remove(Position::new(0, 1));

        // Live cells in the top row now sum to 1 + 2 = 3
        let result = evaluate(&mut grid, Selection::new(0, 0, 0, 2));
        assert_eq!(result, MatchResult::NoMatch { sum: 3 });
    }

    #[test]
    fn test_unnormalized_selection_is_accepted() {
        let mut grid = grid_3x3();
        // Corners in reverse order still describe the (0,0)-(0,1) pair
        let result = evaluate(&mut grid, Selection::new(0, 1, 0, 0));
        assert!(result.is_match());
    }

    #[test]
    fn test_triple_and_quad_matches_score_like_pairs() {
        // 2x2 board where all four cells sum to ten
        let mut grid = Grid::from_values(2, &[1, 2, 3, 4]);
        let result = evaluate(&mut grid, Selection::new(0, 0, 1, 1));

        match result {
            MatchResult::Matched { cleared } => assert_eq!(cleared.len(), 4),
            MatchResult::NoMatch { sum } => panic!("expected match, got sum {}", sum),
        }
        assert!(grid.is_cleared());
    }
}
