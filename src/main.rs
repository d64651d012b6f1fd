use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use roster_terminal::config::Config;
use roster_terminal::events::{cursor_action, dispatch, remove_action, settle_form};
use roster_terminal::form::NewPlayerForm;
use roster_terminal::provider::spawn_provider;
use roster_terminal::roster_fetch::RosterClient;
use roster_terminal::state::{Delta, ProviderCommand, RosterState, apply_delta};
use roster_terminal::view::{self, Action, FORM_ID, LINEUP_ID, SELECTED_ID, Tag, ViewNode};

struct App {
    state: RosterState,
    form: NewPlayerForm,
    view: ViewNode,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        let state = RosterState::new();
        let form = NewPlayerForm::new();
        let view = view::render_all(&state, &form);
        Self {
            state,
            form,
            view,
            should_quit: false,
            cmd_tx,
        }
    }

    fn rerender(&mut self) {
        self.view = view::render_all(&self.state, &self.form);
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.form.active {
            self.on_form_key(key);
        } else {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
                KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
                KeyCode::Enter => {
                    if let Some(action) = cursor_action(&self.state) {
                        self.fire(action);
                    }
                }
                KeyCode::Char('x') | KeyCode::Delete => match remove_action(&self.state) {
                    Some(action) => self.fire(action),
                    None => self.state.push_log("[INFO] No player selected to remove"),
                },
                KeyCode::Char('n') | KeyCode::Tab => self.form.active = true,
                KeyCode::Char('r') => self.fire(Action::Refresh),
                KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
                _ => {}
            }
        }
        self.rerender();
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.form.active = false,
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Enter => self.fire(Action::SubmitNewPlayer),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => self.form.push_char(c),
            _ => {}
        }
    }

    fn fire(&mut self, action: Action) {
        if let Some(cmd) = dispatch(action, &mut self.form, &mut self.state) {
            self.send(cmd);
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Roster provider unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Roster request failed to send");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = Config::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(RosterClient::from_config(&config), tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx));
    app.state
        .push_log(format!("[INFO] Roster endpoint {}", config.collection_url));
    app.fire(Action::Refresh);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        let mut changed = false;
        while let Ok(delta) = rx.try_recv() {
            settle_form(&delta, &mut app.form);
            apply_delta(&mut app.state, delta);
            changed = true;
        }
        if changed {
            app.rerender();
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
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
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let title = app
        .view
        .find_all(|node| node.tag == Tag::Heading(1))
        .first()
        .and_then(|node| node.text.clone())
        .unwrap_or_default();
    let header = Paragraph::new(format!(" {title} | {} players", app.state.players.len()))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(7)])
        .split(columns[0]);

    render_lineup(frame, left[0], app);
    render_form(frame, left[1], app);
    render_details(frame, columns[1], app);

    let console = Paragraph::new(console_text(&app.state))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn render_lineup(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Lineup").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(section) = app.view.find_by_id(LINEUP_ID) else {
        return;
    };
    let links = section.find_all(|node| node.tag == Tag::Link);
    if links.is_empty() {
        let empty = section
            .find_all(|node| node.has_class("empty"))
            .first()
            .and_then(|node| node.text.clone())
            .unwrap_or_default();
        let empty = Paragraph::new(empty).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let (start, end) = visible_range(app.state.cursor, links.len(), inner.height as usize);
    let selected_id = app.state.selected_id();
    let lines = (start..end)
        .map(|idx| {
            let link = links[idx];
            let name = link.text.clone().unwrap_or_default();
            let marker = match link.action {
                Some(Action::SelectPlayer(id)) if Some(id) == selected_id => "*",
                _ => " ",
            };
            let style = if idx == app.state.cursor && !app.form.active {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("{marker} {name}"), style))
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let border = if app.form.active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title("Invite a new Player")
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(form) = app.view.find_by_id(FORM_ID) else {
        return;
    };
    let mut lines = Vec::new();
    for label in form.find_all(|node| node.tag == Tag::Label) {
        let Some(input) = label.children.iter().find(|node| node.tag == Tag::Input) else {
            continue;
        };
        let focused = input.has_class("focused");
        let value = input.attr("value").unwrap_or_default();
        let cursor = if focused { "_" } else { "" };
        let style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<16}", label.text.clone().unwrap_or_default()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("{value}{cursor}"), style),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_details(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Player Details").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(section) = app.view.find_by_id(SELECTED_ID) else {
        return;
    };
    let mut lines = Vec::new();
    // The first child is the section heading, already shown as the block title.
    for node in section.children.iter().skip(1) {
        node_lines(node, &mut lines);
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn node_lines(node: &ViewNode, out: &mut Vec<Line<'static>>) {
    let text = node.text.clone().unwrap_or_default();
    match node.tag {
        Tag::Heading(_) => out.push(Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        Tag::Paragraph if node.has_class("placeholder") => out.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        ))),
        Tag::Paragraph | Tag::Link => out.push(Line::from(text)),
        Tag::Image => out.push(Line::from(Span::styled(
            format!(
                "[{}] {}",
                node.attr("alt").unwrap_or_default(),
                node.attr("src").unwrap_or_default()
            ),
            Style::default().fg(Color::Cyan),
        ))),
        Tag::Button => {
            out.push(Line::default());
            out.push(Line::from(Span::styled(
                format!("[ {text} ] (x)"),
                Style::default().fg(Color::Red),
            )));
        }
        _ => {
            for child in &node.children {
                node_lines(child, out);
            }
        }
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
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

fn console_text(state: &RosterState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(4)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn footer_text(app: &App) -> String {
    if app.form.active {
        "Tab/Shift-Tab Field | Enter Invite | Backspace Delete | Esc Back".to_string()
    } else {
        "j/k/↑/↓ Move | Enter Details | x Remove | n New player | r Refresh | ? Help | q Quit"
            .to_string()
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Roster Terminal - Help",
        "",
        "Lineup:",
        "  j/k or ↑/↓   Move",
        "  Enter        Show player details",
        "  x / Delete   Remove the selected player",
        "  r            Refresh the roster",
        "  n / Tab      Invite a new player",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Invite form:",
        "  Tab/Shift-Tab  Next/previous field",
        "  Enter          Submit",
        "  Esc            Back to lineup",
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
