use std::collections::VecDeque;

use crate::dataset::Table;
use crate::roster::{self, CompetitorSummary};
use crate::sort::{self, SortState};

pub const SELECTION_SLOTS: usize = 2;
pub const HIGHLIGHT_CAP: usize = 3;
const LOG_CAP: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Table,
    Compare,
}

/// Every discrete input the core consumes, decoupled from whatever input
/// surface raised it.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SortRequested(String),
    SelectionChanged { slot: usize, name: Option<String> },
    HighlightAdded { name: String, color: String },
    HighlightRemoved(String),
    HighlightColorChanged { name: String, color: String },
    HighlightsCleared,
}

/// The one mutable state bundle. All derived views (table model, chart
/// models) are recomputed from this on each change rather than patched.
#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub table: Table,
    pub sort: SortState,
    /// Current ordered view over `table.records`.
    pub order: Vec<usize>,
    /// Selection-menu candidates, already in menu order.
    pub candidates: Vec<CompetitorSummary>,
    /// The two comparison slots driving the chart view.
    pub slots: [Option<String>; SELECTION_SLOTS],
    /// Up to [`HIGHLIGHT_CAP`] (name, color) pairs, insertion-ordered.
    pub highlights: Vec<(String, String)>,
    pub selected_row: usize,
    pub active_column: usize,
    pub candidate_cursor: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    /// Terminal acquisition/parse failure for this load, reported once.
    pub load_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Table,
            table: Table::default(),
            sort: SortState::default(),
            order: Vec::new(),
            candidates: Vec::new(),
            slots: [const { None }; SELECTION_SLOTS],
            highlights: Vec::new(),
            selected_row: 0,
            active_column: 0,
            candidate_cursor: 0,
            logs: VecDeque::with_capacity(LOG_CAP),
            help_overlay: false,
            load_error: None,
        }
    }

    /// Install a freshly parsed dataset: natural record order, candidates
    /// rebuilt, the top-ranked competitors auto-selected into the comparison
    /// slots, highlights and sort cleared.
    pub fn load_table(&mut self, table: Table) {
        self.table = table;
        self.sort = SortState::default();
        self.order = (0..self.table.records.len()).collect();
        self.candidates = roster::competitor_summaries(&self.table);
        self.slots = std::array::from_fn(|i| self.candidates.get(i).map(|c| c.name.clone()));
        self.highlights.clear();
        self.selected_row = 0;
        self.active_column = 0;
        self.candidate_cursor = 0;
        self.load_error = None;
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() >= LOG_CAP {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    pub fn knows_competitor(&self, name: &str) -> bool {
        self.candidates.iter().any(|c| c.name == name)
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Table => Screen::Compare,
            Screen::Compare => Screen::Table,
        };
    }

    pub fn select_next_row(&mut self) {
        step_wrapping(&mut self.selected_row, self.order.len(), 1);
    }

    pub fn select_prev_row(&mut self) {
        step_wrapping(&mut self.selected_row, self.order.len(), -1);
    }

    pub fn next_column(&mut self) {
        step_wrapping(&mut self.active_column, self.table.headers.len(), 1);
    }

    pub fn prev_column(&mut self) {
        step_wrapping(&mut self.active_column, self.table.headers.len(), -1);
    }

    pub fn next_candidate(&mut self) {
        step_wrapping(&mut self.candidate_cursor, self.candidates.len(), 1);
    }

    pub fn prev_candidate(&mut self) {
        step_wrapping(&mut self.candidate_cursor, self.candidates.len(), -1);
    }

    pub fn active_header(&self) -> Option<&str> {
        self.table.headers.get(self.active_column).map(String::as_str)
    }

    pub fn hovered_candidate(&self) -> Option<&CompetitorSummary> {
        self.candidates.get(self.candidate_cursor)
    }
}

fn step_wrapping(cursor: &mut usize, total: usize, delta: isize) {
    if total == 0 {
        *cursor = 0;
        return;
    }
    let total = total as isize;
    *cursor = (*cursor as isize + delta).rem_euclid(total) as usize;
}

/// Single update function: validates the event against the current state,
/// mutates the bundle, and records a notice for every rejection. Rendering
/// picks the changes up on the next draw.
pub fn apply_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::SortRequested(column) => {
            state.sort.activate(&column);
            state.order = sort::current_order(&state.table, &state.sort);
            state.selected_row = 0;
        }
        AppEvent::SelectionChanged { slot, name } => {
            if slot >= SELECTION_SLOTS {
                state.push_log(format!("[WARN] No such comparison slot: {slot}"));
                return;
            }
            if let Some(name) = &name
                && !state.knows_competitor(name)
            {
                state.push_log(format!("[WARN] Unknown competitor: {name}"));
                return;
            }
            state.slots[slot] = name;
        }
        AppEvent::HighlightAdded { name, color } => {
            if !state.knows_competitor(&name) {
                state.push_log(format!("[WARN] Unknown competitor: {name}"));
                return;
            }
            if let Some(entry) = state.highlights.iter_mut().find(|(n, _)| *n == name) {
                entry.1 = color;
                return;
            }
            if state.highlights.len() >= HIGHLIGHT_CAP {
                state.push_log(format!(
                    "[WARN] Highlight limit is {HIGHLIGHT_CAP}; remove one first"
                ));
                return;
            }
            state.highlights.push((name, color));
        }
        AppEvent::HighlightRemoved(name) => {
            state.highlights.retain(|(n, _)| *n != name);
        }
        AppEvent::HighlightColorChanged { name, color } => {
            match state.highlights.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = color,
                None => state.push_log(format!("[WARN] Not highlighted: {name}")),
            }
        }
        AppEvent::HighlightsCleared => {
            state.highlights.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_steps() {
        let mut cursor = 0usize;
        step_wrapping(&mut cursor, 3, -1);
        assert_eq!(cursor, 2);
        step_wrapping(&mut cursor, 3, 1);
        assert_eq!(cursor, 0);
        step_wrapping(&mut cursor, 0, 1);
        assert_eq!(cursor, 0);
    }
}
