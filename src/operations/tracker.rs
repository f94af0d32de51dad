use crate::error::LedgerError;
use crate::models::display_row::{DisplayRow, RowStyle};
use crate::models::transaction::TransactionKind;
use crate::operations::form::{EntryForm, Field};
use crate::operations::ledger_view::LedgerViewModel;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};
use std::io;
use std::path::Path;
use tracing::debug;

const ABOUT_TEXT: &str =
    "Finance Tracker records your daily income and expenses in a local ledger.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Modal {
    Warning(String),
    Error(String),
    About,
}

struct TrackerState {
    form: EntryForm,
    table_state: TableState,
    modal: Option<Modal>,
    status: String,
    db_label: String,
}

impl TrackerState {
    fn new(db_path: &Path, status: String) -> Self {
        Self {
            form: EntryForm::new(Local::now().date_naive()),
            table_state: TableState::default(),
            modal: None,
            status,
            db_label: db_path.display().to_string(),
        }
    }

    fn sync_selection(&mut self, row_count: usize) {
        if row_count == 0 {
            self.table_state.select(None);
        } else {
            let selected = self.table_state.selected().unwrap_or(0).min(row_count - 1);
            self.table_state.select(Some(selected));
        }
    }

    fn move_selection(&mut self, delta: i32, row_count: usize) {
        if row_count == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i32;
        let next = (current + delta).clamp(0, row_count as i32 - 1) as usize;
        self.table_state.select(Some(next));
    }

    /// Runs one "record income" / "record expense" action.
    fn record(&mut self, view_model: &mut LedgerViewModel, kind: TransactionKind) {
        let amount = match self.form.amount() {
            Ok(amount) => amount,
            Err(message) => {
                self.modal = Some(Modal::Warning(message));
                return;
            }
        };

        let result = view_model.submit_entry(
            kind,
            self.form.date,
            self.form.category(),
            amount,
            &self.form.description,
        );

        match result {
            Ok(id) => {
                self.form.reset_transient();
                self.table_state.select(Some(0));
                self.status = format!("{} #{} recorded", kind.label(), id);
            }
            Err(LedgerError::Validation(message)) => {
                self.modal = Some(Modal::Warning(message));
            }
            Err(err @ LedgerError::SavedNotReloaded { .. }) => {
                self.form.reset_transient();
                self.status = format!("{} saved, table not reloaded", kind.label());
                self.modal = Some(Modal::Error(err.to_string()));
            }
            Err(err) => {
                self.status = "Last action failed".to_string();
                self.modal = Some(Modal::Error(err.to_string()));
            }
        }
    }
}

pub fn run_tracker(view_model: &mut LedgerViewModel, db_path: &Path) -> Result<(), String> {
    let initial_status = match view_model.refresh() {
        Ok(rows) => format!("Loaded {} transactions", rows.len()),
        Err(err) => format!("Failed to load transactions: {}", err),
    };

    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;

    let result = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| format!("Failed to initialize terminal: {}", e))?;

        let mut state = TrackerState::new(db_path, initial_status);

        loop {
            state.sync_selection(view_model.rows().len());
            terminal
                .draw(|frame| {
                    let size = frame.area();
                    let layout = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([
                            Constraint::Length(3),
                            Constraint::Length(6),
                            Constraint::Min(5),
                            Constraint::Length(3),
                        ])
                        .split(size);

                    render_header(frame, layout[0]);
                    render_form(frame, layout[1], &state.form);
                    render_table(frame, layout[2], view_model.rows(), &mut state.table_state);
                    render_status(frame, layout[3], &state.db_label, &state.status, view_model.rows().len());

                    if let Some(ref modal) = state.modal {
                        render_modal(frame, size, modal);
                    }
                })
                .map_err(|e| format!("Failed to draw terminal UI: {}", e))?;

            if event::poll(std::time::Duration::from_millis(200))
                .map_err(|e| format!("Failed to poll input: {}", e))?
            {
                let event = event::read().map_err(|e| format!("Failed to read input: {}", e))?;
                if let Event::Key(key) = event {
                    if handle_key(view_model, &mut state, key) {
                        break;
                    }
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;

    result
}

/// Returns true when the user asked to quit.
fn handle_key(view_model: &mut LedgerViewModel, state: &mut TrackerState, key: KeyEvent) -> bool {
    // Many terminals emit both a Press and a Release event. Only act on Press/Repeat.
    if key.kind == KeyEventKind::Release {
        return false;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    // Modals block everything else until acknowledged.
    if state.modal.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.modal = None;
        }
        return false;
    }

    match key.code {
        KeyCode::Esc => return true,
        KeyCode::F(1) => state.modal = Some(Modal::About),
        KeyCode::F(2) => state.record(view_model, TransactionKind::Income),
        KeyCode::F(3) => state.record(view_model, TransactionKind::Expense),
        KeyCode::F(5) => match view_model.refresh() {
            Ok(rows) => state.status = format!("Reloaded {} transactions", rows.len()),
            Err(err) => state.modal = Some(Modal::Error(err.to_string())),
        },
        KeyCode::Tab => state.form.focus = state.form.focus.next(),
        KeyCode::BackTab => state.form.focus = state.form.focus.previous(),
        KeyCode::PageUp => state.move_selection(-10, view_model.rows().len()),
        KeyCode::PageDown => state.move_selection(10, view_model.rows().len()),
        code => handle_field_key(view_model, state, code),
    }

    false
}

fn handle_field_key(view_model: &LedgerViewModel, state: &mut TrackerState, code: KeyCode) {
    let form = &mut state.form;
    match (form.focus, code) {
        (Field::Date, KeyCode::Left) => form.shift_days(-1),
        (Field::Date, KeyCode::Right) => form.shift_days(1),
        (Field::Date, KeyCode::Up) => form.shift_months(true),
        (Field::Date, KeyCode::Down) => form.shift_months(false),
        (Field::Category, KeyCode::Left) => form.cycle_category(false),
        (Field::Category, KeyCode::Right) => form.cycle_category(true),
        (Field::Amount, KeyCode::Char(ch)) => form.push_amount_char(ch),
        (Field::Amount, KeyCode::Backspace) => {
            form.amount_input.pop();
        }
        (Field::Description, KeyCode::Char(ch)) => form.description.push(ch),
        (Field::Description, KeyCode::Backspace) => {
            form.description.pop();
        }
        (_, KeyCode::Up) => state.move_selection(-1, view_model.rows().len()),
        (_, KeyCode::Down) => state.move_selection(1, view_model.rows().len()),
        (focus, other) => debug!(?focus, ?other, "unhandled key"),
    }
}

fn render_header(frame: &mut ratatui::Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled("Personal Finance Tracker", Style::default().fg(Color::Cyan).bold()),
        Span::raw("  "),
        Span::styled(
            "F2 income  F3 expense  F5 reload  F1 about  Esc exit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block).alignment(Alignment::Left), area);
}

fn field_span(label: &str, value: String, focused: bool) -> Vec<Span<'static>> {
    let value_style = if focused {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    vec![
        Span::styled(format!("{:<13}", label), Style::default().bold()),
        Span::styled(format!(" {} ", value), value_style),
    ]
}

fn render_form(frame: &mut ratatui::Frame, area: Rect, form: &EntryForm) {
    let mut first = field_span("Date:", form.date.format("%Y-%m-%d").to_string(), form.focus == Field::Date);
    first.push(Span::raw("    "));
    first.extend(field_span("Category:", form.category().to_string(), form.focus == Field::Category));

    let mut second = field_span(
        "Amount:",
        format!("Rp {}", form.amount_display()),
        form.focus == Field::Amount,
    );
    second.push(Span::raw("    "));
    second.extend(field_span("Description:", form.description.clone(), form.focus == Field::Description));

    let lines = vec![
        Line::from(first),
        Line::from(second),
        Line::from(""),
        Line::from(vec![
            Span::styled(" F2 Record Income ", Style::default().fg(Color::White).bg(Color::Green).bold()),
            Span::raw("  "),
            Span::styled(" F3 Record Expense ", Style::default().fg(Color::White).bg(Color::Red).bold()),
            Span::styled("   Tab next field, ←/→ adjust", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let block = Block::default().title("New Entry").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn style_color(style: RowStyle) -> Color {
    match style {
        RowStyle::Positive => Color::Green,
        RowStyle::Negative => Color::Red,
    }
}

fn render_table(frame: &mut ratatui::Frame, area: Rect, rows: &[DisplayRow], table_state: &mut TableState) {
    let block = Block::default().title("Transactions").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Row::new([
        Cell::from("ID").style(Style::default().bold()),
        Cell::from("Date").style(Style::default().bold()),
        Cell::from("Type").style(Style::default().bold()),
        Cell::from("Category").style(Style::default().bold()),
        Cell::from("Amount").style(Style::default().bold()),
        Cell::from("Description").style(Style::default().bold()),
    ])
    .style(Style::default().fg(Color::White).bg(Color::Blue));

    let table_rows = rows.iter().map(|row| {
        Row::new([
            Cell::from(row.id.clone()),
            Cell::from(row.date.clone()),
            Cell::from(row.kind.clone()).style(Style::default().fg(style_color(row.style))),
            Cell::from(row.category.clone()),
            Cell::from(Line::from(row.amount.clone()).alignment(Alignment::Right)),
            Cell::from(row.description.clone()),
        ])
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(20),
        Constraint::Min(10),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White).bold())
        .highlight_symbol("➤ ")
        .column_spacing(1);

    frame.render_stateful_widget(table, inner, table_state);

    if rows.is_empty() {
        let empty = Paragraph::new("No transactions recorded yet")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    }
}

fn render_status(frame: &mut ratatui::Frame, area: Rect, db_label: &str, status: &str, row_count: usize) {
    let line = Line::from(vec![
        Span::raw(format!("DB: {}", db_label)),
        Span::raw("  |  "),
        Span::raw(format!("Rows: {}", row_count)),
        Span::raw("  |  "),
        Span::styled(status.to_string(), Style::default().fg(Color::Yellow)),
    ]);

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(line)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_modal(frame: &mut ratatui::Frame, area: Rect, modal: &Modal) {
    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);

    let (title, message, color) = match modal {
        Modal::Warning(message) => ("Invalid Input", message.as_str(), Color::Yellow),
        Modal::Error(message) => ("Storage Error", message.as_str(), Color::Red),
        Modal::About => ("About", ABOUT_TEXT, Color::Cyan),
    };

    let lines = vec![
        Line::from(vec![Span::styled(title, Style::default().fg(color).bold())]),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled("Enter/Esc to close", Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false }),
        popup_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
