use crate::app::{App, ScreenState};
use apple_core::{GameOverReason, Position};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;

/// Terminal columns per grid cell
pub const CELL_W: u16 = 4;
/// Terminal rows per grid cell
pub const CELL_H: u16 = 2;

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, Clear(ClearType::All))?;

    match app.screen_state {
        ScreenState::Title => render_title_screen(stdout, app, term_width, term_height)?,
        ScreenState::Playing => render_game_screen(stdout, app, term_width, term_height)?,
        ScreenState::GameOver => render_game_over_screen(stdout, app, term_width, term_height)?,
        ScreenState::Leaderboard => render_leaderboard_screen(stdout, app, term_width, term_height)?,
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn centered_x(term_width: u16, text_len: usize) -> u16 {
    let len = text_len as u16;
    if term_width > len {
        (term_width - len) / 2
    } else {
        0
    }
}

fn render_title_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let mid_y = term_height / 2;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let title = "A P P L E   G A M E";
    execute!(
        stdout,
        MoveTo(centered_x(term_width, title.len()), mid_y.saturating_sub(6)),
        SetForegroundColor(theme.apple),
        Print(title)
    )?;

    let rules = [
        "Drag rectangles of apples whose numbers sum to exactly 10.",
        "Each cleared rectangle scores one point. Clear the whole board",
        "before the clock runs out to bank the remaining seconds.",
    ];
    for (i, line) in rules.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(
                centered_x(term_width, line.len()),
                mid_y.saturating_sub(4) + i as u16
            ),
            SetForegroundColor(theme.info),
            Print(line)
        )?;
    }

    let prompt = format!("Nickname: {}_", app.nickname);
    execute!(
        stdout,
        MoveTo(centered_x(term_width, prompt.len()), mid_y + 1),
        SetForegroundColor(theme.fg),
        Print(&prompt)
    )?;

    let keys = "[Enter] start   [Tab] ranking   [Esc] quit";
    execute!(
        stdout,
        MoveTo(centered_x(term_width, keys.len()), mid_y + 3),
        SetForegroundColor(theme.key),
        Print(keys)
    )?;

    if let Some(ref msg) = app.message {
        execute!(
            stdout,
            MoveTo(centered_x(term_width, msg.len()), mid_y + 5),
            SetForegroundColor(theme.timer_low),
            Print(msg)
        )?;
    }

    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &mut App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let size = app.session.grid().size() as u16;
    let grid_width = size * CELL_W + 2; // interior plus borders
    let grid_height = size * CELL_H + 1;

    let total_width = grid_width + 24; // grid + gap + info panel
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > grid_height + 4 { 2 } else { 0 };

    // The mouse handler needs the interior origin to map clicks to cells
    app.grid_origin = Some((start_x + 1, start_y + 1));

    render_grid(stdout, app, start_x, start_y)?;

    let info_x = start_x + grid_width + 3;
    render_info_panel(stdout, app, info_x, start_y + 1)?;

    let controls_y = start_y + grid_height + 1;
    let controls = "drag/space: select   r: restart   t: theme   q: quit";
    execute!(
        stdout,
        MoveTo(start_x, controls_y),
        SetForegroundColor(app.theme.key),
        Print(controls)
    )?;

    if let Some(ref msg) = app.message {
        execute!(
            stdout,
            MoveTo(start_x, controls_y + 1),
            SetForegroundColor(app.theme.info),
            Print(msg)
        )?;
    }

    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let size = app.session.grid().size();
    let interior = size as u16 * CELL_W;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let horizontal = format!("+{}+", "-".repeat(interior as usize));
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.border),
        Print(&horizontal)
    )?;

    for row in 0..size {
        for line in 0..CELL_H {
            let line_y = y + 1 + row as u16 * CELL_H + line;
            execute!(
                stdout,
                MoveTo(x, line_y),
                SetForegroundColor(theme.border),
                Print("|")
            )?;

            for col in 0..size {
                let pos = Position::new(row, col);
                if line == 0 {
                    render_cell(stdout, app, pos)?;
                } else {
                    render_cell_gap(stdout, app, pos)?;
                }
            }

            execute!(
                stdout,
                SetBackgroundColor(theme.bg),
                SetForegroundColor(theme.border),
                Print("|")
            )?;
        }
    }

    execute!(
        stdout,
        MoveTo(x, y + 1 + size as u16 * CELL_H),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.border),
        Print(&horizontal)
    )?;

    Ok(())
}

fn render_cell(stdout: &mut io::Stdout, app: &App, pos: Position) -> io::Result<()> {
    let theme = &app.theme;
    let grid = app.session.grid();
    let cell = grid.cell(pos);

    let selected = app
        .session
        .current_selection()
        .map(|s| s.contains(pos))
        .unwrap_or(false);
    let is_cursor = app.cursor == pos;

    let (open, close) = if is_cursor { ('[', ']') } else { (' ', ' ') };

    if cell.is_removed() {
        let bg = if selected { theme.selection_bg } else { theme.bg };
        execute!(
            stdout,
            SetBackgroundColor(bg),
            SetForegroundColor(theme.cleared),
            Print(format!("{}.{}", open, close)),
            SetBackgroundColor(theme.bg),
            Print(" ")
        )?;
    } else {
        let bg = if selected { theme.selection_bg } else { theme.apple };
        let gap_bg = if selected { theme.selection_bg } else { theme.bg };
        execute!(
            stdout,
            SetBackgroundColor(bg),
            SetForegroundColor(theme.apple_text),
            Print(format!("{}{}{}", open, cell.value(), close)),
            SetBackgroundColor(gap_bg),
            Print(" ")
        )?;
    }

    Ok(())
}

/// The spacing line under a cell row; carries the selection tint so the
/// drag rectangle reads as a solid block
fn render_cell_gap(stdout: &mut io::Stdout, app: &App, pos: Position) -> io::Result<()> {
    let theme = &app.theme;
    let selected = app
        .session
        .current_selection()
        .map(|s| s.contains(pos))
        .unwrap_or(false);

    let bg = if selected { theme.selection_bg } else { theme.bg };
    execute!(stdout, SetBackgroundColor(bg), Print("    "))?;
    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = &app.session;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.fg),
        Print(format!("Player  {}", app.nickname))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.score),
        Print(format!("Score   {}", session.score()))
    )?;

    let time = session.time_remaining();
    let (time_color, suffix) = if time <= 10 {
        (theme.timer_low, " !")
    } else {
        (theme.timer, "")
    };
    execute!(
        stdout,
        MoveTo(x, y + 4),
        SetForegroundColor(time_color),
        Print(format!("Time    {}s{}", time, suffix))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 6),
        SetForegroundColor(theme.info),
        Print(format!("Apples  {}", session.grid().live_count()))
    )?;

    Ok(())
}

fn render_game_over_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let mid_y = term_height / 2;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let Some(summary) = app.last_summary else {
        return Ok(());
    };

    let headline = match summary.reason {
        GameOverReason::TimedOut => "TIME'S UP!",
        GameOverReason::Cleared => "BOARD CLEARED!",
    };
    execute!(
        stdout,
        MoveTo(centered_x(term_width, headline.len()), mid_y.saturating_sub(5)),
        SetForegroundColor(theme.apple),
        Print(headline)
    )?;

    let score_line = format!("Final score: {}", summary.final_score);
    execute!(
        stdout,
        MoveTo(centered_x(term_width, score_line.len()), mid_y.saturating_sub(3)),
        SetForegroundColor(theme.score),
        Print(&score_line)
    )?;

    let breakdown = format!(
        "(matches {} + time left {})",
        summary.match_count, summary.time_remaining
    );
    execute!(
        stdout,
        MoveTo(centered_x(term_width, breakdown.len()), mid_y.saturating_sub(2)),
        SetForegroundColor(theme.info),
        Print(&breakdown)
    )?;

    if let Some(ref status) = app.submit_status {
        execute!(
            stdout,
            MoveTo(centered_x(term_width, status.len()), mid_y),
            SetForegroundColor(theme.timer_low),
            Print(status)
        )?;
    }

    let keys = "[Enter] play again   [l] ranking   [q] quit";
    execute!(
        stdout,
        MoveTo(centered_x(term_width, keys.len()), mid_y + 2),
        SetForegroundColor(theme.key),
        Print(keys)
    )?;

    Ok(())
}

fn render_leaderboard_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    _term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let title = format!("RANKING - TOP {}", crate::leaderboard::RANKING_LIMIT);
    execute!(
        stdout,
        MoveTo(centered_x(term_width, title.len()), 1),
        SetForegroundColor(theme.apple),
        Print(&title)
    )?;

    let header = format!(
        "{:>4}  {:<12}  {:>6}  {:>8}  {:>10}",
        "#", "nickname", "score", "matches", "time left"
    );
    let table_x = centered_x(term_width, header.len());
    execute!(
        stdout,
        MoveTo(table_x, 3),
        SetForegroundColor(theme.info),
        Print(&header)
    )?;

    if let Some(ref err) = app.ranking_error {
        execute!(
            stdout,
            MoveTo(table_x, 5),
            SetForegroundColor(theme.timer_low),
            Print(err)
        )?;
    } else if app.ranking.is_empty() {
        execute!(
            stdout,
            MoveTo(table_x, 5),
            SetForegroundColor(theme.info),
            Print("No scores yet - go clear some apples!")
        )?;
    } else {
        for (i, entry) in app.ranking.iter().enumerate() {
            let rank = entry.rank.unwrap_or(i + 1);
            // The podium gets the accent color
            let color = if rank <= 3 { theme.key } else { theme.fg };
            let line = format!(
                "{:>4}  {:<12}  {:>6}  {:>8}  {:>9}s",
                rank, entry.nickname, entry.final_score, entry.match_count, entry.time_remaining
            );
            execute!(
                stdout,
                MoveTo(table_x, 5 + i as u16),
                SetForegroundColor(color),
                Print(&line)
            )?;
        }
    }

    let keys = "[Esc] back   [q] quit";
    let keys_y = 5 + app.ranking.len().max(1) as u16 + 2;
    execute!(
        stdout,
        MoveTo(centered_x(term_width, keys.len()), keys_y),
        SetForegroundColor(theme.key),
        Print(keys)
    )?;

    Ok(())
}
