use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use sb26_rankings::acquire;
use sb26_rankings::dataset::parse_table;
use sb26_rankings::render_model::{
    ChartModel, TableModel, build_section_chart, build_table_model, build_totals_chart,
};
use sb26_rankings::state::{
    AppEvent, AppState, HIGHLIGHT_CAP, Screen, apply_event,
};

const HIGHLIGHT_PALETTE: [&str; HIGHLIGHT_CAP] = ["yellow", "cyan", "magenta"];
const SLOT_COLORS: [Color; 2] = [Color::Green, Color::Magenta];

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
        }
    }

    /// Acquisition and parse failures land in the state as a one-shot notice;
    /// the app keeps running with an empty table either way.
    fn load_dataset(&mut self) {
        let raw = match acquire::load_raw_table() {
            Ok(raw) => raw,
            Err(err) => {
                self.state.load_error = Some(format!("Could not load rankings: {err:#}"));
                self.state.push_log("[WARN] Dataset acquisition failed");
                return;
            }
        };
        match parse_table(&raw) {
            Ok(table) => {
                self.state.load_table(table);
                self.state.push_log(format!(
                    "[INFO] Loaded {} records, {} competitors",
                    self.state.table.records.len(),
                    self.state.candidates.len()
                ));
            }
            Err(err) => {
                self.state.load_error = Some(format!("Could not parse rankings: {err:#}"));
                self.state.push_log("[WARN] Dataset parse failed");
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Tab | KeyCode::Char('v') => self.state.toggle_screen(),
            _ => match self.state.screen {
                Screen::Table => self.on_table_key(key),
                Screen::Compare => self.on_compare_key(key),
            },
        }
    }

    fn on_table_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next_row(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev_row(),
            KeyCode::Char('l') | KeyCode::Right => self.state.next_column(),
            KeyCode::Char('h') | KeyCode::Left => self.state.prev_column(),
            KeyCode::Char('s') | KeyCode::Enter => {
                if let Some(column) = self.state.active_header().map(str::to_string) {
                    apply_event(&mut self.state, AppEvent::SortRequested(column));
                }
            }
            KeyCode::Char('H') => {
                if let Some(name) = self.selected_competitor() {
                    let color =
                        HIGHLIGHT_PALETTE[self.state.highlights.len() % HIGHLIGHT_PALETTE.len()];
                    apply_event(
                        &mut self.state,
                        AppEvent::HighlightAdded {
                            name,
                            color: color.to_string(),
                        },
                    );
                }
            }
            KeyCode::Char('r') => {
                if let Some(name) = self.selected_competitor() {
                    apply_event(&mut self.state, AppEvent::HighlightRemoved(name));
                }
            }
            KeyCode::Char('C') => apply_event(&mut self.state, AppEvent::HighlightsCleared),
            _ => {}
        }
    }

    fn on_compare_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.next_candidate(),
            KeyCode::Char('k') | KeyCode::Up => self.state.prev_candidate(),
            KeyCode::Char('1') => self.toggle_slot(0),
            KeyCode::Char('2') => self.toggle_slot(1),
            _ => {}
        }
    }

    /// Assign the hovered candidate to a slot; assigning the same name again
    /// empties the slot.
    fn toggle_slot(&mut self, slot: usize) {
        let Some(hovered) = self.state.hovered_candidate().map(|c| c.name.clone()) else {
            return;
        };
        let name = if self.state.slots.get(slot).and_then(|s| s.as_deref()) == Some(hovered.as_str()) {
            None
        } else {
            Some(hovered)
        };
        apply_event(&mut self.state, AppEvent::SelectionChanged { slot, name });
    }

    /// Competitor named on the overall column of the selected row.
    fn selected_competitor(&self) -> Option<String> {
        let record_idx = *self.state.order.get(self.state.selected_row)?;
        let record = self.state.table.records.get(record_idx)?;
        let name = self
            .state
            .table
            .value(record, sb26_rankings::dataset::OVERALL_NAME);
        (!name.is_empty()).then(|| name.to_string())
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut app = App::new();
    app.load_dataset();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Table => render_table_screen(frame, chunks[1], &app.state),
        Screen::Compare => render_compare_screen(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let view = match state.screen {
        Screen::Table => "TABLE",
        Screen::Compare => "COMPARE",
    };
    let sort = match &state.sort.key {
        Some(key) => format!("{key} {}", state.sort.dir.indicator()),
        None => "file order".to_string(),
    };
    format!("SB26 RANKINGS | {view} | Sort: {sort}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Table => {
            "Tab Compare | j/k Row | h/l Column | Enter/s Sort | H Highlight | r Remove | C Clear | ? Help | q Quit"
                .to_string()
        }
        Screen::Compare => {
            "Tab Table | j/k Move | 1/2 Assign slot | ? Help | q Quit".to_string()
        }
    }
}

fn console_text(state: &AppState) -> String {
    if let Some(err) = &state.load_error {
        return err.clone();
    }
    if state.logs.is_empty() {
        return "No notices yet".to_string();
    }
    let start = state.logs.len().saturating_sub(2);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table_screen(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.table.is_empty() {
        let notice = match &state.load_error {
            Some(err) => err.as_str(),
            None => "No rankings loaded",
        };
        let empty = Paragraph::new(notice).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let model = build_table_model(
        &state.table,
        &state.sort,
        &state.order,
        &state.highlights,
        &state.slots,
    );

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(2)])
        .split(area);

    let widths = column_widths(&model);
    render_table_header(frame, sections[0], state, &model, &widths);
    render_table_body(frame, sections[1], state, &model, &widths);
    render_tooltip_strip(frame, sections[2], state, &model);
}

fn column_widths(model: &TableModel) -> Vec<Constraint> {
    model
        .columns
        .iter()
        .map(|col| {
            let min = col.title.chars().count() as u16 + 2;
            let width = if col.numeric { 8 } else { 12 };
            Constraint::Length(width.max(min))
        })
        .collect()
}

fn render_table_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    model: &TableModel,
    widths: &[Constraint],
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths.to_vec())
        .split(area);

    for (idx, col) in model.columns.iter().enumerate() {
        let Some(cell_area) = cols.get(idx).copied() else {
            break;
        };
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if col.sortable {
            style = style.fg(Color::Cyan);
        }
        if idx == state.active_column {
            style = style.bg(Color::DarkGray);
        }
        let text = match col.sort {
            Some(dir) => format!("{} {}", col.title, dir.indicator()),
            None => col.title.clone(),
        };
        frame.render_widget(Paragraph::new(text).style(style), cell_area);
    }
}

fn render_table_body(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    model: &TableModel,
    widths: &[Constraint],
) {
    if area.height == 0 {
        return;
    }
    let visible = area.height as usize;
    let (start, end) = visible_range(state.selected_row, model.rows.len(), visible);

    for (i, row_idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + i as u16,
            width: area.width,
            height: 1,
        };
        let selected = row_idx == state.selected_row;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths.to_vec())
            .split(row_area);

        let row = &model.rows[row_idx];
        for (col_idx, cell) in row.cells.iter().enumerate() {
            let Some(cell_area) = cols.get(col_idx).copied() else {
                break;
            };
            let mut style = row_style;
            if let Some(color) = &cell.highlight {
                style = style
                    .fg(palette_color(color))
                    .add_modifier(Modifier::BOLD);
            }
            if let Some(slot) = cell.slot {
                style = style
                    .fg(SLOT_COLORS[slot % SLOT_COLORS.len()])
                    .add_modifier(Modifier::UNDERLINED);
            }
            frame.render_widget(Paragraph::new(cell.text.clone()).style(style), cell_area);
        }
    }
}

fn render_tooltip_strip(frame: &mut Frame, area: Rect, state: &AppState, model: &TableModel) {
    let tooltip = model
        .rows
        .get(state.selected_row)
        .and_then(|row| row.cells.get(state.active_column))
        .and_then(|cell| cell.tooltip.as_ref());
    let text = match tooltip {
        Some(gloss) if !gloss.gloss.is_empty() => {
            format!("{}\n{}", gloss.gloss, gloss.breakdown)
        }
        Some(gloss) => gloss.breakdown.clone(),
        None => String::new(),
    };
    let strip = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(strip, area);
}

fn render_compare_screen(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(30)])
        .split(area);

    let candidates = Paragraph::new(candidate_list_text(state))
        .block(Block::default().title("Competitors").borders(Borders::ALL));
    frame.render_widget(candidates, columns[0]);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[1]);

    let section_chart = build_section_chart(&state.table, &state.slots);
    render_chart(frame, charts[0], "Section best scores", &section_chart);
    let totals_chart = build_totals_chart(&state.table, &state.slots);
    render_chart(frame, charts[1], "Composite totals", &totals_chart);
}

fn candidate_list_text(state: &AppState) -> String {
    if state.candidates.is_empty() {
        return "No competitors".to_string();
    }
    let mut lines = Vec::with_capacity(state.candidates.len());
    for (idx, candidate) in state.candidates.iter().enumerate() {
        let prefix = if idx == state.candidate_cursor { "> " } else { "  " };
        let slot_tag = state
            .slots
            .iter()
            .position(|slot| slot.as_deref() == Some(candidate.name.as_str()))
            .map(|slot| format!(" [{}]", slot + 1))
            .unwrap_or_default();
        lines.push(format!("{prefix}{}{slot_tag}", candidate.label()));
    }
    lines.join("\n")
}

fn render_chart(frame: &mut Frame, area: Rect, title: &str, model: &ChartModel) {
    let block = Block::default()
        .title(format!("{title} (0..{:.0})", model.y_max))
        .borders(Borders::ALL);
    if model.groups.iter().all(|g| g.bars.is_empty()) {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let empty = Paragraph::new("Select competitors with 1 and 2")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let groups: Vec<BarGroup> = model
        .groups
        .iter()
        .map(|group| {
            let bars: Vec<Bar> = group
                .bars
                .iter()
                .map(|bar| {
                    Bar::default()
                        .value(bar.value.round() as u64)
                        .text_value(format!("{:.1}", bar.value))
                        .style(
                            Style::default().fg(SLOT_COLORS[bar.series % SLOT_COLORS.len()]),
                        )
                })
                .collect();
            BarGroup::default()
                .label(Line::from(group.label.clone()))
                .bars(&bars)
        })
        .collect();

    let mut chart = BarChart::default()
        .block(block)
        .bar_width(7)
        .bar_gap(1)
        .group_gap(3)
        .max(model.y_max.ceil() as u64);
    for group in groups {
        chart = chart.data(group);
    }
    frame.render_widget(chart, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }
    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn palette_color(name: &str) -> Color {
    match name {
        "yellow" => Color::Yellow,
        "cyan" => Color::Cyan,
        "magenta" => Color::Magenta,
        "red" => Color::Red,
        "green" => Color::Green,
        "blue" => Color::Blue,
        _ => Color::White,
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "SB26 Rankings - Help",
        "",
        "Global:",
        "  Tab / v      Switch table/compare view",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Table:",
        "  j/k or ↑/↓   Move row",
        "  h/l or ←/→   Move column",
        "  Enter / s    Sort by column (toggle direction)",
        "  H            Highlight competitor on this row",
        "  r            Remove that highlight",
        "  C            Clear highlights",
        "",
        "Compare:",
        "  j/k or ↑/↓   Move through competitors",
        "  1 / 2        Assign to comparison slot (again to clear)",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
