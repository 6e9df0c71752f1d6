use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use product_registry::{Product, ProductStore};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(3);
const TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Price,
    Category,
}

impl Field {
    pub fn next(&self) -> Self {
        match self {
            Field::Name => Field::Price,
            Field::Price => Field::Category,
            Field::Category => Field::Name,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Field::Name => Field::Category,
            Field::Price => Field::Name,
            Field::Category => Field::Price,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Field::Name => "Name",
            Field::Price => "Price",
            Field::Category => "Category",
        }
    }
}

/// Raw text the user is typing, exactly as entered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub category: String,
}

impl ProductForm {
    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Price => &mut self.price,
            Field::Category => &mut self.category,
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Price => &self.price,
            Field::Category => &self.category,
        }
    }

    pub fn clear(&mut self) {
        *self = ProductForm::default();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

pub struct App {
    pub store: ProductStore,
    pub state: TableState,
    pub mode: Mode,
    pub focus: Field,
    pub form: ProductForm,
    pub toast: Option<Toast>,
}

impl App {
    pub fn new(store: ProductStore) -> Self {
        let mut state = TableState::default();
        if !store.is_empty() {
            state.select(Some(0));
        }

        Self {
            store,
            state,
            mode: Mode::Browse,
            focus: Field::Name,
            form: ProductForm::default(),
            toast: None,
        }
    }

    pub fn selected_product(&self) -> Option<Product> {
        let products = self.store.list();
        self.state.selected().and_then(|i| products.get(i).cloned())
    }

    fn notify(&mut self, kind: ToastKind, message: String) {
        self.toast = Some(Toast {
            kind,
            message,
            shown_at: Instant::now(),
        });
    }

    /// Drop the notification once it has been visible long enough
    pub fn expire_toast(&mut self, now: Instant) {
        if let Some(toast) = &self.toast {
            if now.duration_since(toast.shown_at) >= TOAST_TTL {
                self.toast = None;
            }
        }
    }

    /// Hand the form to the store; fields are cleared only when it accepts them
    pub fn submit(&mut self) {
        match self
            .store
            .try_add(&self.form.name, &self.form.price, &self.form.category)
        {
            Ok(product) => {
                self.notify(ToastKind::Info, format!("Added {}", product.name));
                self.form.clear();
                self.focus = Field::Name;
                self.state.select(Some(self.store.len() - 1));
            }
            Err(err) => {
                self.notify(ToastKind::Error, format!("Invalid input - {}", err));
            }
        }
    }

    pub fn remove_selected(&mut self) {
        let Some(product) = self.selected_product() else {
            return;
        };

        self.store.remove(product.id);
        self.notify(ToastKind::Info, format!("Removed {}", product.name));

        let len = self.store.len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn next(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Apply one key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode {
            Mode::Browse => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return true,
                KeyCode::Char('a') => self.mode = Mode::Form,
                KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::Home if !self.store.is_empty() => self.state.select(Some(0)),
                KeyCode::End if !self.store.is_empty() => {
                    self.state.select(Some(self.store.len() - 1));
                }
                _ => {}
            },
            Mode::Form => match key.code {
                KeyCode::Esc => self.mode = Mode::Browse,
                KeyCode::Enter => self.submit(),
                KeyCode::BackTab => self.focus = self.focus.previous(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        self.focus = self.focus.previous();
                    } else {
                        self.focus = self.focus.next();
                    }
                }
                KeyCode::Backspace => {
                    self.form.field_mut(self.focus).pop();
                }
                KeyCode::Char(c) => self.form.field_mut(self.focus).push(c),
                _ => {}
            },
        }

        false
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(%err, "ui loop failed");
        return Err(err.into());
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.expire_toast(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Product table
            Constraint::Length(3), // Input form
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_table(f, chunks[1], app);
    render_form(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(
            " Product Registry ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(
            format!("{} products", app.store.len()),
            Style::default().fg(Color::White),
        ),
    ]);

    let header = Paragraph::new(vec![line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["ID", "Name", "Price", "Category"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells).height(1);

    let products = app.store.list();
    let rows = products.iter().map(|p| {
        Row::new(vec![
            Cell::from(p.id.to_string()),
            Cell::from(truncate(&p.name, 40)),
            Cell::from(format!("{:.2}", p.price)),
            Cell::from(truncate(&p.category, 30)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(30),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Products "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];
    for (i, field) in [Field::Name, Field::Price, Field::Category].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }

        let focused = app.mode == Mode::Form && app.focus == *field;
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        spans.push(Span::styled(format!("{}: ", field.title()), label_style));
        spans.push(Span::raw(app.form.field(*field).to_string()));
        if focused {
            spans.push(Span::styled("_", Style::default().fg(Color::Cyan)));
        }
    }

    let border = if app.mode == Mode::Form {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let form = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" New Product "),
    );

    f.render_widget(form, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(toast) = &app.toast {
        let color = match toast.kind {
            ToastKind::Info => Color::Green,
            ToastKind::Error => Color::Red,
        };
        status_spans.push(Span::styled(
            format!(" {} ", toast.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        status_spans.push(Span::raw("| "));
    }

    match app.mode {
        Mode::Browse => {
            status_spans.push(Span::styled("a", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Add | "));
            status_spans.push(Span::styled("d", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Delete | "));
            status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Nav | "));
            status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" Quit"));
        }
        Mode::Form => {
            status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Field | "));
            status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Save | "));
            status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" Back"));
        }
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
