//! Terminal viewer of an overlay, one row per overlay line.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markdown_overlay_engine::output::{NodeId, OutputNode, OutputTree};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io::{Stdout, stdout};
use std::path::Path;

struct App {
    title: String,
    lines: Vec<Line<'static>>,
    scroll: usize,
}

impl App {
    fn new(title: String, tree: &OutputTree) -> Self {
        Self {
            title,
            lines: styled_lines(tree),
            scroll: 0,
        }
    }

    fn scroll_down(&mut self) {
        if self.scroll + 1 < self.lines.len() {
            self.scroll += 1;
        }
    }

    fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

pub fn run(file: &Path, tree: &OutputTree) -> Result<()> {
    let title = file
        .file_name()
        .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned());
    let mut app = App::new(title, tree);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let visible: Vec<Line> = app.lines.iter().skip(app.scroll).cloned().collect();
    let content = Paragraph::new(visible).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({} lines)", app.title, app.lines.len())),
    );
    f.render_widget(content, chunks[0]);

    let help = Paragraph::new(Line::from("q/Esc: Quit | ↑/k: Up | ↓/j: Down"));
    f.render_widget(help, chunks[1]);
}

/// One terminal line per overlay line, styled from the classes on the path
/// to every text run.
pub(crate) fn styled_lines(tree: &OutputTree) -> Vec<Line<'static>> {
    tree.all_lines()
        .into_iter()
        .map(|line| {
            let mut spans = Vec::new();
            collect_spans(tree, line, Style::default(), &mut spans);
            Line::from(spans)
        })
        .collect()
}

fn collect_spans(tree: &OutputTree, id: NodeId, inherited: Style, out: &mut Vec<Span<'static>>) {
    match tree.node(id) {
        Some(OutputNode::Element(el)) => {
            let style = el
                .classes
                .iter()
                .fold(inherited, |style, class| style.patch(class_style(class)));
            for &child in &el.children {
                collect_spans(tree, child, style, out);
            }
        }
        Some(OutputNode::Text(text)) => out.push(Span::styled(text.clone(), inherited)),
        Some(OutputNode::Marker) | None => {}
    }
}

fn class_style(class: &str) -> Style {
    let name = class.strip_prefix("md-").unwrap_or(class);
    match name {
        "delimiter" => Style::default().fg(Color::DarkGray),
        "heading" => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        "strong" => Style::default().add_modifier(Modifier::BOLD),
        "emphasis" => Style::default().add_modifier(Modifier::ITALIC),
        "delete" => Style::default().add_modifier(Modifier::CROSSED_OUT),
        "code" | "inlineCode" => Style::default().fg(Color::Cyan),
        "math" | "inlineMath" => Style::default().fg(Color::LightBlue),
        "html" => Style::default().fg(Color::Magenta),
        "blockquote" => Style::default().fg(Color::Green),
        "link" | "linkReference" => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED),
        _ => Style::default(),
    }
}
