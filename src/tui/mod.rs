//! Ratatui-based terminal UI.
//!
//! Two tabs pick what to fetch: a list of quick presets, or an editable date
//! range / day count. The body renders the prediction bar chart and a summary
//! panel for the latest run.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Days, Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
};

use crate::app::pipeline::{self, PredictionRun};
use crate::config::ApiConfig;
use crate::data::{PredictionClient, PredictionSource};
use crate::domain::{DateRange, PredictionQuery, QuickPreset, next_days};
use crate::error::{AppError, ErrorReason};
use crate::report::fmt_volume;
use crate::stats::extreme_indices;

mod bar_chart;

use bar_chart::{BAR_RGB, MAX_RGB, MIN_RGB, PredictionBarChart};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_DAYS: u32 = 7;

/// Start the TUI.
pub fn run(config: &ApiConfig) -> Result<(), AppError> {
    let client = PredictionClient::new(config)?;
    tracing::info!(base_url = client.base_url(), "starting tui");

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(Box::new(client), Box::new(|| Local::now().date_naive()));
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Quick,
    Range,
}

impl Tab {
    const TITLES: [&'static str; 2] = ["Quick Options", "Date Range"];

    fn index(self) -> usize {
        match self {
            Tab::Quick => 0,
            Tab::Range => 1,
        }
    }

    fn toggle(self) -> Self {
        match self {
            Tab::Quick => Tab::Range,
            Tab::Range => Tab::Quick,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeField {
    Start,
    End,
    Days,
}

impl RangeField {
    fn index(self) -> usize {
        match self {
            RangeField::Start => 0,
            RangeField::End => 1,
            RangeField::Days => 2,
        }
    }

    fn up(self) -> Self {
        match self {
            RangeField::Start | RangeField::End => RangeField::Start,
            RangeField::Days => RangeField::End,
        }
    }

    fn down(self) -> Self {
        match self {
            RangeField::Start => RangeField::End,
            RangeField::End | RangeField::Days => RangeField::Days,
        }
    }
}

/// Source of "today"; read on every fetch so a long session follows the calendar.
type Clock = Box<dyn Fn() -> NaiveDate>;

struct App {
    source: Box<dyn PredictionSource>,
    clock: Clock,
    tab: Tab,
    preset: QuickPreset,
    field: RangeField,
    start_input: String,
    end_input: String,
    days_input: String,
    editing: bool,
    status: String,
    run: Option<PredictionRun>,
    export_dir: PathBuf,
}

impl App {
    fn new(source: Box<dyn PredictionSource>, clock: Clock) -> Self {
        let today = clock();
        let end = today.checked_add_days(Days::new(u64::from(DEFAULT_DAYS))).unwrap_or(today);
        Self {
            source,
            clock,
            tab: Tab::Quick,
            preset: QuickPreset::Tomorrow,
            field: RangeField::Start,
            start_input: today.format(DATE_FORMAT).to_string(),
            end_input: end.format(DATE_FORMAT).to_string(),
            days_input: DEFAULT_DAYS.to_string(),
            editing: false,
            status: "Pick a preset and press Enter.".to_string(),
            run: None,
            export_dir: PathBuf::from("."),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_field_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.tab = self.tab.toggle();
            }
            KeyCode::Up => match self.tab {
                Tab::Quick => self.preset = self.preset.prev(),
                Tab::Range => self.field = self.field.up(),
            },
            KeyCode::Down => match self.tab {
                Tab::Quick => self.preset = self.preset.next(),
                Tab::Range => self.field = self.field.down(),
            },
            KeyCode::Enter => match self.tab {
                Tab::Quick => self.fetch(PredictionQuery::Preset(self.preset)),
                Tab::Range => {
                    self.editing = true;
                    self.status = "Editing (Enter to apply, Esc to stop).".to_string();
                }
            },
            KeyCode::Char('g') => match self.range_from_inputs() {
                Ok(range) => self.fetch(PredictionQuery::Range(range)),
                Err(reason) => self.show_error(&reason),
            },
            KeyCode::Char('n') => self.fetch_next_days(),
            KeyCode::Char('e') => self.export_csv(),
            KeyCode::Char('d') => self.write_debug(),
            _ => {}
        }

        false
    }

    fn handle_field_edit(&mut self, code: KeyCode) {
        let field = self.field;
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Edit finished.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                if field == RangeField::Days {
                    self.fetch_next_days();
                } else {
                    self.status = "Press g to fetch the range.".to_string();
                }
            }
            KeyCode::Backspace => {
                self.input_mut(field).pop();
            }
            KeyCode::Char(c) => {
                let accepted = c.is_ascii_digit() || (c == '-' && field != RangeField::Days);
                if accepted {
                    self.input_mut(field).push(c);
                }
            }
            _ => {}
        }
    }

    fn input_mut(&mut self, field: RangeField) -> &mut String {
        match field {
            RangeField::Start => &mut self.start_input,
            RangeField::End => &mut self.end_input,
            RangeField::Days => &mut self.days_input,
        }
    }

    fn range_from_inputs(&self) -> Result<DateRange, ErrorReason> {
        let start = parse_input_date("start", &self.start_input)?;
        let end = parse_input_date("end", &self.end_input)?;
        DateRange::new(start, end)
    }

    fn fetch_next_days(&mut self) {
        let days = match self.days_input.trim().parse::<u32>() {
            Ok(days) => days,
            Err(_) => {
                let reason =
                    ErrorReason::InvalidDateRange(format!("Invalid day count '{}'", self.days_input.trim()));
                self.show_error(&reason);
                return;
            }
        };
        match next_days(days, (self.clock)()) {
            Ok(range) => self.fetch(PredictionQuery::Range(range)),
            Err(reason) => self.show_error(&reason),
        }
    }

    fn fetch(&mut self, query: PredictionQuery) {
        match pipeline::run_query(self.source.as_ref(), &query, (self.clock)()) {
            Ok(run) => {
                self.status = if run.has_data() {
                    let skipped = run.series.skipped_count();
                    let mut status = format!("{}: {} points", run.title, run.series.len());
                    if skipped > 0 {
                        status.push_str(&format!(" ({skipped} skipped)"));
                    }
                    status
                } else {
                    format!("{}: No prediction data to plot", run.title)
                };
                self.run = Some(run);
            }
            Err(reason) => {
                self.run = None;
                self.show_error(&reason);
            }
        }
    }

    fn show_error(&mut self, reason: &ErrorReason) {
        tracing::warn!(error = %reason, "tui action failed");
        self.status = format!("Error: {reason}");
    }

    fn export_csv(&mut self) {
        let Some(run) = self.run.as_ref().filter(|r| r.has_data()) else {
            self.status = "Nothing to export.".to_string();
            return;
        };
        let ts = Local::now().format("%Y%m%d_%H%M%S");
        let path = self.export_dir.join(format!("tickets_{ts}.csv"));
        self.status = match crate::io::write_series_csv(&path, &run.series) {
            Ok(()) => format!("Exported {}", path.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn write_debug(&mut self) {
        let Some(run) = &self.run else {
            self.status = "No prediction run to debug.".to_string();
            return;
        };
        self.status = match crate::debug::write_debug_bundle(run, Path::new(crate::debug::DEBUG_DIR)) {
            Ok(path) => format!("Wrote debug bundle: {}", path.display()),
            Err(err) => format!("Debug write failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tabs = Tabs::new(Tab::TITLES)
            .select(self.tab.index())
            .block(
                Block::default()
                    .title("tickets - Ticket Volume Predictions")
                    .borders(Borders::ALL),
            )
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(area);

        self.draw_controls(frame, columns[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(9)])
            .split(columns[1]);

        self.draw_chart(frame, rows[0]);
        self.draw_summary(frame, rows[1]);
    }

    fn draw_controls(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (items, selected, title) = match self.tab {
            Tab::Quick => {
                let items: Vec<ListItem> = QuickPreset::ALL
                    .iter()
                    .map(|p| ListItem::new(p.display_name()))
                    .collect();
                (items, self.preset.index(), "Presets")
            }
            Tab::Range => {
                let items = vec![
                    ListItem::new(format!("Start: {}", self.start_input)),
                    ListItem::new(format!("End:   {}", self.end_input)),
                    ListItem::new(format!("Days:  {}", self.days_input)),
                ];
                (items, self.field.index(), "Range")
            }
        };

        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(selected));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing {
            let hint = Paragraph::new("Editing…")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self.run.as_ref().map(|r| r.title.as_str()).unwrap_or("Predictions");
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let run = match &self.run {
            Some(run) if run.has_data() => run,
            Some(_) => {
                let msg = Paragraph::new("No prediction data to plot").style(Style::default().fg(Color::Yellow));
                frame.render_widget(msg, inner);
                return;
            }
            None => {
                let msg = Paragraph::new("Waiting for a query...").style(Style::default().fg(Color::Yellow));
                frame.render_widget(msg, inner);
                return;
            }
        };

        let Some((max_idx, min_idx)) = extreme_indices(&run.series) else {
            return;
        };
        let values: Vec<f64> = run.series.values().collect();
        let labels: Vec<String> = run
            .series
            .dates()
            .map(|d| d.format("%m-%d").to_string())
            .collect();

        let widget = PredictionBarChart {
            values: &values,
            labels: &labels,
            max_idx,
            min_idx,
            y_label: "tickets",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_summary(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Summary").borders(Borders::ALL);

        let Some(summary) = self.run.as_ref().and_then(|r| r.summary.as_ref()) else {
            frame.render_widget(Paragraph::new("-").block(block), area);
            return;
        };

        let gray = Style::default().fg(Color::Gray);
        let lines = vec![
            Line::from(vec![
                Span::styled("Total Tickets: ", gray),
                Span::raw(fmt_volume(summary.total)),
                Span::styled("   Mean: ", gray),
                Span::raw(format!("{:.2}", summary.mean)),
            ]),
            Line::from(vec![
                Span::styled("Max Tickets:   ", gray),
                Span::raw(format!("{} on {}", fmt_volume(summary.max.value), summary.max.date)),
            ]),
            Line::from(vec![
                Span::styled("Min Tickets:   ", gray),
                Span::raw(format!("{} on {}", fmt_volume(summary.min.value), summary.min.date)),
            ]),
            Line::raw(""),
            Line::from(vec![
                legend_swatch(MAX_RGB),
                Span::raw(" Max  "),
                legend_swatch(MIN_RGB),
                Span::raw(" Min  "),
                legend_swatch(BAR_RGB),
                Span::raw(" Other days"),
            ]),
        ];

        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab switch  ↑/↓ select  Enter fetch/edit  g range  n days  e csv  d debug  q quit";
        let status_style = if self.status.starts_with("Error:") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, status_style),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn parse_input_date(name: &str, input: &str) -> Result<NaiveDate, ErrorReason> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ErrorReason::InvalidDateRange(format!("Invalid {name} date '{trimmed}' (expected YYYY-MM-DD)")))
}

fn legend_swatch((r, g, b): (u8, u8, u8)) -> Span<'static> {
    Span::styled("■", Style::default().fg(Color::Rgb(r, g, b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use serde_json::{Value, json};

    use crate::domain::ApiRequest;

    struct FakeSource {
        payload: Value,
        requests: RefCell<Vec<ApiRequest>>,
    }

    impl PredictionSource for FakeSource {
        fn fetch(&self, request: &ApiRequest) -> Value {
            self.requests.borrow_mut().push(request.clone());
            self.payload.clone()
        }
    }

    fn source(payload: Value) -> Box<FakeSource> {
        Box::new(FakeSource {
            payload,
            requests: RefCell::new(Vec::new()),
        })
    }

    fn app(payload: Value) -> App {
        App::new(source(payload), Box::new(|| NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()))
    }

    fn press(app: &mut App, codes: &[KeyCode]) {
        for code in codes {
            assert!(!app.handle_key(*code));
        }
    }

    #[test]
    fn defaults_cover_the_coming_week() {
        let app = app(json!({}));
        assert_eq!(app.start_input, "2024-06-12");
        assert_eq!(app.end_input, "2024-06-19");
        assert_eq!(app.days_input, "7");
        assert_eq!(app.tab, Tab::Quick);
    }

    #[test]
    fn enter_on_quick_tab_fetches_selected_preset() {
        let mut app = app(json!({"2024-06-13": 12}));
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);

        assert_eq!(app.preset, QuickPreset::Next2Days);
        let run = app.run.as_ref().unwrap();
        assert_eq!(run.series.len(), 1);
        assert!(app.status.contains("1 points"));
    }

    #[test]
    fn upstream_error_lands_in_status_bar() {
        let mut app = app(json!({"error": "Prediction service unavailable"}));
        press(&mut app, &[KeyCode::Enter]);

        assert!(app.run.is_none());
        assert_eq!(app.status, "Error: Prediction service unavailable");
    }

    #[test]
    fn reversed_range_is_rejected_before_fetch() {
        let mut app = app(json!({"2024-06-13": 12}));
        app.start_input = "2024-06-20".to_string();
        app.end_input = "2024-06-10".to_string();
        press(&mut app, &[KeyCode::Char('g')]);

        assert!(app.run.is_none());
        assert_eq!(app.status, "Error: End date must be after start date");
    }

    #[test]
    fn editing_days_then_enter_fetches_next_days() {
        let mut app = app(json!([1, 2, 3]));
        press(
            &mut app,
            &[
                KeyCode::Tab,
                KeyCode::Down,
                KeyCode::Down,
                KeyCode::Enter,
                KeyCode::Backspace,
                KeyCode::Char('3'),
                KeyCode::Char('-'),
                KeyCode::Enter,
            ],
        );

        assert!(!app.editing);
        assert_eq!(app.days_input, "3");
        let run = app.run.as_ref().unwrap();
        assert_eq!(run.range.unwrap().end, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    }

    #[test]
    fn day_count_out_of_bounds_is_an_error() {
        let mut app = app(json!([1]));
        app.days_input = "0".to_string();
        press(&mut app, &[KeyCode::Char('n')]);
        assert!(app.status.starts_with("Error:"));
    }

    #[test]
    fn empty_series_reports_no_data() {
        let mut app = app(json!({"predictions": {}}));
        press(&mut app, &[KeyCode::Enter]);
        assert!(app.status.ends_with("No prediction data to plot"));
        assert!(!app.run.as_ref().unwrap().has_data());
    }

    #[test]
    fn export_writes_csv_for_loaded_run() {
        let dir = std::env::temp_dir().join(format!("tickets_tui_export_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut app = app(json!({"2024-06-13": 12}));
        app.export_dir = dir.clone();
        press(&mut app, &[KeyCode::Char('e')]);
        assert_eq!(app.status, "Nothing to export.");

        press(&mut app, &[KeyCode::Enter, KeyCode::Char('e')]);
        assert!(app.status.starts_with("Exported"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn fetches_follow_the_calendar_past_midnight() {
        let today = Rc::new(Cell::new(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()));
        let clock = Rc::clone(&today);
        let mut app = App::new(source(json!([1, 2])), Box::new(move || clock.get()));

        press(&mut app, &[KeyCode::Enter]);
        let first = app.run.as_ref().unwrap().range.unwrap();
        assert_eq!(first.start, NaiveDate::from_ymd_opt(2024, 6, 13).unwrap());

        today.set(NaiveDate::from_ymd_opt(2024, 6, 13).unwrap());
        press(&mut app, &[KeyCode::Enter]);
        let run = app.run.as_ref().unwrap();
        assert_eq!(run.range.unwrap().start, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap());
        // Bare numbers are dated from the new day too.
        assert_eq!(run.series.points[0].date, NaiveDate::from_ymd_opt(2024, 6, 13).unwrap());
    }

    #[test]
    fn q_quits() {
        let mut app = app(json!({}));
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
