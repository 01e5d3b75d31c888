use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::domain::todo::{Counts, Filter, Todo, MAX_TEXT_LEN};

use super::app::{App, Mode};

/// Character count past which the input shows how much room is left.
const COUNTER_THRESHOLD: usize = 80;

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.size());

    let store = app.service().store();
    let counts = store.counts();

    render_header(f, chunks[0], counts);
    render_tabs(f, chunks[1], store.filter(), counts);
    render_input(f, chunks[2], app);

    let visible = store.visible();
    if visible.is_empty() {
        let (title, subtitle) = empty_state(store.filter(), counts);
        let body = Paragraph::new(vec![
            Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(subtitle, Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(body, chunks[3]);
    } else {
        let items: Vec<ListItem> = visible.iter().map(|todo| todo_row(todo)).collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
            .highlight_symbol(">> ");
        let mut state = ListState::default().with_selected(Some(app.selected()));
        f.render_stateful_widget(list, chunks[3], &mut state);
    }

    f.render_widget(Paragraph::new(key_help(app.mode())).style(Style::default().fg(Color::DarkGray)), chunks[4]);

    match app.mode() {
        Mode::Confirm(confirmation) => {
            let hint = format!("y: {}   n: Cancel", confirmation.action_label());
            render_popup(f, confirmation.title(), &confirmation.message(), &hint);
        }
        Mode::Notice(notice) => render_popup(f, notice.title(), notice.message(), "press any key"),
        Mode::Browse | Mode::Insert => {}
    }
}

/// Placeholder drawn while the stored list is being read.
pub fn render_loading(f: &mut Frame) {
    let loading = Paragraph::new("Loading todos...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title("todos"));
    f.render_widget(loading, f.size());
}

/// Title and subtitle shown when the current filter has nothing to list.
pub fn empty_state(filter: Filter, counts: Counts) -> (&'static str, &'static str) {
    match filter {
        Filter::Active if counts.all > 0 => ("No active todos", "All your todos are completed!"),
        Filter::Completed => ("No completed todos", "Complete some todos to see them here"),
        Filter::All | Filter::Active => ("No todos yet", "Add your first todo above!"),
    }
}

pub fn format_timestamp(todo: &Todo) -> String {
    let label = if todo.completed { "Completed" } else { "Created" };
    let at = todo.display_time().with_timezone(&Local);
    format!("{label} {}", at.format("%b %-d, %I:%M %p"))
}

fn render_header(f: &mut Frame, area: Rect, counts: Counts) {
    let mut spans = vec![Span::styled("My Todos", Style::default().add_modifier(Modifier::BOLD))];
    if counts.completed > 0 {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("c: Clear Completed", Style::default().fg(Color::Red)));
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title("todos"));
    f.render_widget(header, area);
}

fn render_tabs(f: &mut Frame, area: Rect, active: Filter, counts: Counts) {
    let titles: Vec<String> = Filter::ALL
        .iter()
        .map(|filter| format!("{} ({})", filter.label(), counts.for_filter(*filter)))
        .collect();
    let selected = Filter::ALL.iter().position(|f| *f == active).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let len = app.draft().chars().count();
    let mut title = match app.mode() {
        Mode::Insert => "New todo (Enter: add, Esc: cancel)".to_string(),
        _ => "Add a new todo (a)".to_string(),
    };
    if len > COUNTER_THRESHOLD {
        title.push_str(&format!(" | {len}/{MAX_TEXT_LEN} characters"));
    }
    let style = if *app.mode() == Mode::Insert { Style::default().fg(Color::Yellow) } else { Style::default() };
    let text = if *app.mode() == Mode::Insert { format!("{}_", app.draft()) } else { app.draft().to_string() };
    let input = Paragraph::new(text).block(Block::default().borders(Borders::ALL).border_style(style).title(title));
    f.render_widget(input, area);
}

fn todo_row(todo: &Todo) -> ListItem<'static> {
    let (mark, text_style) = if todo.completed {
        ("[x] ", Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT))
    } else {
        ("[ ] ", Style::default())
    };
    ListItem::new(Line::from(vec![
        Span::raw(mark),
        Span::styled(todo.text.clone(), text_style),
        Span::raw("  "),
        Span::styled(format_timestamp(todo), Style::default().fg(Color::DarkGray)),
    ]))
}

fn key_help(mode: &Mode) -> &'static str {
    match mode {
        Mode::Browse => "a: add  enter: toggle  d: delete  c: clear completed  tab: filter  q: quit",
        Mode::Insert => "type the todo, enter to add, esc to cancel",
        Mode::Confirm(_) => "y: confirm  n: cancel",
        Mode::Notice(_) => "press any key to continue",
    }
}

fn render_popup(f: &mut Frame, title: &str, message: &str, hint: &str) {
    let area = centered_rect(60, 7, f.size());
    let body = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::DarkGray))),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let width = (u32::from(r.width) * u32::from(percent_x) / 100) as u16;
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
