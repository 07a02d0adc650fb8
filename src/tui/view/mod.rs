// Shared widgets for the two screens
pub mod collection;
pub mod detail;

use crate::tui::input::TextInput;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, ListState, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub use collection::CollectionView;
pub use detail::DetailView;

/// Rendered at the right edge of every deletable row.
pub const DELETE_CONTROL: &str = " [del]";
pub const DELETE_WIDTH: u16 = 6;

/// Latest status or error shown in the footer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Where the last frame put the clickable parts of a screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hitboxes {
    pub list: Rect,
    pub input: Rect,
    pub button: Rect,
    pub back: Rect,
}

/// Left-aligned text padded so the delete control lands on the right border.
/// Widths are terminal columns, so wide (CJK) glyphs count twice.
pub fn row_text(left: &str, inner_width: u16) -> String {
    let room = inner_width.saturating_sub(DELETE_WIDTH) as usize;
    if room == 0 {
        return left.to_string();
    }
    let mut text = String::with_capacity(left.len() + DELETE_CONTROL.len());
    let mut used = 0;
    for c in left.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > room {
            break;
        }
        text.push(c);
        used += w;
    }
    text.push_str(&" ".repeat(room - used));
    text.push_str(DELETE_CONTROL);
    text
}

pub fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if i >= len - 1 => 0,
        Some(i) => i + 1,
        None => 0,
    };
    state.select(Some(i));
}

pub fn select_previous(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(0) => len - 1,
        Some(i) => i - 1,
        None => 0,
    };
    state.select(Some(i));
}

/// Clamped, unlike `select_next` which wraps.
pub fn jump_forward(state: &mut ListState, len: usize, step: usize) {
    if len == 0 {
        return;
    }
    let current = state.selected().unwrap_or(0);
    state.select(Some((current + step).min(len - 1)));
}

pub fn jump_backward(state: &mut ListState, len: usize, step: usize) {
    if len == 0 {
        return;
    }
    let current = state.selected().unwrap_or(0);
    state.select(Some(current.saturating_sub(step)));
}

/// Keeps the highlight on a valid row after a snapshot replaced the data.
pub fn clamp_selection(state: &mut ListState, len: usize) {
    match (state.selected(), len) {
        (_, 0) => state.select(None),
        (None, _) => state.select(Some(0)),
        (Some(i), len) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}

/// Input field plus its submit button. Returns `(input, button)` areas.
pub fn render_input(
    f: &mut Frame,
    area: Rect,
    input: &TextInput,
    title: &str,
    button_label: &str,
) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(button_label.width() as u16 + 4),
        ])
        .split(area);

    let color = if input.is_focused() {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let field = Paragraph::new(format!("> {}", input.value()))
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(field, chunks[0]);

    let button = Paragraph::new(format!("[{}]", button_label))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, chunks[1]);

    if input.is_focused() {
        let column: usize = input
            .value()
            .chars()
            .take(input.cursor())
            .map(|c| c.width().unwrap_or(0))
            .sum();
        let cursor_x = chunks[0].x + 3 + column as u16;
        let cursor_y = chunks[0].y + 1;
        f.set_cursor_position((cursor_x, cursor_y));
    }
    (chunks[0], chunks[1])
}

pub fn render_footer(f: &mut Frame, area: Rect, status: &StatusLine, help: &str) {
    let f_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let status_color = if status.is_error {
        Color::Red
    } else {
        Color::Cyan
    };
    let status = Paragraph::new(status.text.clone())
        .style(Style::default().fg(status_color))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(" Status "),
        );
    let help = Paragraph::new(help.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, f_chunks[0]);
    f.render_widget(help, f_chunks[1]);
}

/// Modal popup; the controller swallows input until it is dismissed.
pub fn render_alert(f: &mut Frame, area: Rect, message: &str) {
    let width = area.width.saturating_mul(3) / 5;
    let height = 7.min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    let body = Paragraph::new(format!("{}\n\nPress Enter to dismiss.", message))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Error ")
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(Clear, popup);
    f.render_widget(body, popup);
}
