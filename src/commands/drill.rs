//! Interactive drill-down command.
//!
//! All records are loaded once up front; every keystroke just recomputes
//! the view from the in-memory list and the navigation state.

use std::path::Path;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::commands::{fast_mode_ready, load_records};
use crate::drilldown::{Dimension, DrillState};
use crate::models::FeedbackRecord;
use crate::visualization::{render_period_cards, render_row_table};


const MAX_CARDS: usize = 9;


/// Run the drill command.
pub fn run(fast: bool, dimension: Dimension, data_dir: &Path) -> Result<()> {
    if !fast_mode_ready(fast) {
        return Ok(());
    }

    let (feedback, _) = load_records(fast, data_dir)?;

    if feedback.is_empty() {
        println!(
            "No feedback data found in {}. Run 'tki update' or check --data-dir.",
            data_dir.display()
        );
        return Ok(());
    }

    let mut state = DrillState::Years;

    loop {
        render(&state, &feedback, dimension);

        match read_key()? {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Left => {
                state = state.ascend();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                let cards = state.cards(&feedback, dimension);
                if let Some(card) = cards.get(idx) {
                    state = state.descend(card.start.date_naive());
                }
            }
            _ => {}
        }
    }

    Ok(())
}


/// Render the current view: cards above the terminal row table.
fn render(state: &DrillState, feedback: &[FeedbackRecord], dimension: Dimension) {
    print!("\x1b[2J\x1b[H"); // Clear screen and move cursor to top

    println!("TourKita feedback drill-down ({} ranking)", dimension.label());
    println!();

    if matches!(state, DrillState::Rows { .. }) {
        println!("\x1b[1m{}\x1b[0m", state.title());
        println!();
        render_row_table(&state.rows(feedback));
    } else {
        let mut cards = state.cards(feedback, dimension);
        if cards.len() > MAX_CARDS {
            println!(
                "\x1b[2mShowing first {} of {} periods\x1b[0m",
                MAX_CARDS,
                cards.len()
            );
            cards.truncate(MAX_CARDS);
        }
        render_period_cards(&state.title(), &cards);
    }

    println!();
    println!("\x1b[2m[1-9] open period   [b] back   [q] quit\x1b[0m");
}


/// Block until a key press; raw mode is held only around the read so the
/// rendering above keeps normal line discipline.
fn read_key() -> Result<KeyCode> {
    enable_raw_mode()?;
    let code = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(key.code),
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };
    disable_raw_mode()?;
    Ok(code?)
}
