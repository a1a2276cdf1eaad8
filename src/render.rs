//! Plain-text rendering of the battle board, standings and growth table.

use arena_core::growth::Projection;
use arena_core::scoring::Standings;
use arena_core::{Board, Entity, EntityState, Status};
use std::fmt::Write;

const CURSOR: char = '▊';

pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Idle => "⏸️",
        Status::Running => "⚡",
        Status::Complete => "✅",
    }
}

pub fn card_body(state: &EntityState) -> String {
    match state.status {
        Status::Idle => "Awaiting battle...".to_string(),
        Status::Running if state.partial.is_empty() => format!("Thinking...{}", CURSOR),
        Status::Running => format!("{}{}", state.partial, CURSOR),
        Status::Complete => state.accumulated.clone(),
    }
}

pub fn render_card(entity: Entity, state: &EntityState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "── {} {} ──", entity.display_name(), status_icon(state.status));
    let _ = writeln!(out, "{}", card_body(state));
    out
}

pub fn render_board(board: &Board) -> String {
    board
        .iter()
        .map(|(entity, state)| render_card(entity, state))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_standings(standings: &Standings) -> String {
    let mut out = String::new();
    for (rank, entry) in standings.entries().iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {:<7} {:>3} pts  ({} words)",
            rank + 1,
            entry.entity.display_name(),
            entry.score,
            entry.words
        );
    }
    if let Some(knockout) = standings.knockout() {
        out.push('\n');
        out.push_str(&knockout.explanation(standings));
        out.push('\n');
    }
    out
}

pub fn render_growth(rows: &[Projection]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:>9} {:>12}", "Month", "Traffic %", "Conversion %");
    for row in rows {
        let _ = writeln!(
            out,
            "{:<10} {:>9.1} {:>12.1}",
            row.month, row.traffic, row.conversions
        );
    }
    out
}
