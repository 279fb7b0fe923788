//! Basic example of using the apple-game engine

use apple_core::{evaluate, Generator, MatchResult, Position, Selection, Session};

fn main() {
    // Generate a board
    println!("Generating a 10x10 board...\n");
    let mut generator = Generator::new();
    let mut grid = generator.generate();

    println!("Generated board:");
    println!("{}", grid);
    println!("Live cells: {}", grid.live_count());

    // Hunt for a horizontally adjacent pair summing to ten
    let size = grid.size();
    let mut pair = None;
    'outer: for row in 0..size {
        for col in 0..size - 1 {
            let a = grid.value(Position::new(row, col));
            let b = grid.value(Position::new(row, col + 1));
            if a + b == 10 {
                pair = Some(Selection::new(row, col, row, col + 1));
                break 'outer;
            }
        }
    }

    // Clear it
    if let Some(selection) = pair {
        println!(
            "\nFound a pair at rows {}..={}, cols {}..={}",
            selection.start_row, selection.end_row, selection.start_col, selection.end_col
        );
        match evaluate(&mut grid, selection) {
            MatchResult::Matched { cleared } => {
                println!("Matched! Cleared {} cells:", cleared.len());
                println!("{}", grid);
            }
            MatchResult::NoMatch { sum } => {
                println!("No match (sum {})", sum);
            }
        }
    } else {
        println!("\nNo adjacent pair on this board (rare, but legal)");
    }

    // Drive a short session
    println!("--- Session flow ---\n");
    let mut session = Session::new(generator.generate());
    session.start();

    session.selection_start(0, 0);
    session.selection_update(0, 1);
    match session.selection_end() {
        Some(MatchResult::Matched { .. }) => println!("Top-left pair cleared, score 1"),
        Some(MatchResult::NoMatch { sum }) => println!("Top-left pair summed to {}", sum),
        None => println!("Session was not running"),
    }

    for _ in 0..3 {
        session.tick();
    }
    println!(
        "Score {}, {} seconds left",
        session.score(),
        session.time_remaining()
    );
}
