use crate::model::ToDoList;
use crate::tui::action::Command;
use crate::tui::dispatch::{Propagation, RowPart, RowTarget, contains, dispatch_row, hit_row};
use crate::tui::input::{InputOutcome, TextInput};
use crate::tui::view::{
    DELETE_WIDTH, Hitboxes, clamp_selection, jump_backward, jump_forward, render_input, row_text,
    select_next, select_previous,
};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

pub const EMPTY_ITEMS: &str = "This list is empty. Press 'a' to add an item.";
pub const LOADING_LIST: &str = "Loading list...";

/// One list with its items. Owns the snapshot for `list_id` only; any other
/// list handed to [`DetailView::apply_server_snapshot`] is refused.
pub struct DetailView {
    list_id: String,
    list: Option<ToDoList>,
    input: TextInput,
    list_state: ListState,
    hitboxes: Hitboxes,
}

impl DetailView {
    pub fn new(list_id: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            list: None,
            input: TextInput::new(false),
            list_state: ListState::default(),
            hitboxes: Hitboxes::default(),
        }
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }
    pub fn list(&self) -> Option<&ToDoList> {
        self.list.as_ref()
    }
    pub fn is_loading(&self) -> bool {
        self.list.is_none()
    }
    pub fn input(&self) -> &TextInput {
        &self.input
    }
    pub fn input_mut(&mut self) -> &mut TextInput {
        &mut self.input
    }
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Replaces the local list wholesale. Returns `false` (and keeps the current
    /// state) when the snapshot belongs to another list.
    pub fn apply_server_snapshot(&mut self, list: ToDoList) -> bool {
        if list.id != self.list_id {
            return false;
        }
        let len = list.items.len();
        self.list = Some(list);
        clamp_selection(&mut self.list_state, len);
        true
    }

    fn len(&self) -> usize {
        self.list.as_ref().map_or(0, |l| l.items.len())
    }

    pub fn submit(&mut self) -> Option<Command> {
        let label = self.input.submit()?;
        Some(Command::CreateItem {
            list_id: self.list_id.clone(),
            label,
        })
    }

    /// Delete control first; only an unhandled click toggles the item.
    pub fn activate(&self, target: RowTarget) -> Option<Command> {
        let item = self.list.as_ref()?.item(target.index)?;
        let list_id = &self.list_id;
        dispatch_row(
            target,
            |t| match t.part {
                RowPart::Delete => Propagation::Stop(Command::DeleteItem {
                    list_id: list_id.clone(),
                    item_id: item.id.clone(),
                }),
                RowPart::Body => Propagation::Continue,
            },
            |_| {
                Some(Command::ToggleItem {
                    list_id: list_id.clone(),
                    item_id: item.id.clone(),
                    checked: !item.checked,
                })
            },
        )
    }

    fn activate_selected(&self, part: RowPart) -> Option<Command> {
        let index = self.list_state.selected()?;
        self.activate(RowTarget { index, part })
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if self.input.is_focused() {
            return match key.code {
                KeyCode::Esc | KeyCode::Tab => {
                    self.input.blur();
                    None
                }
                _ => match self.input.handle_key(key) {
                    InputOutcome::Submitted(label) => Some(Command::CreateItem {
                        list_id: self.list_id.clone(),
                        label,
                    }),
                    _ => None,
                },
            };
        }

        let len = self.len();
        match key.code {
            KeyCode::Tab | KeyCode::Char('a') | KeyCode::Char('i') => {
                self.input.focus();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                select_next(&mut self.list_state, len);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                select_previous(&mut self.list_state, len);
                None
            }
            KeyCode::PageDown => {
                jump_forward(&mut self.list_state, len, 10);
                None
            }
            KeyCode::PageUp => {
                jump_backward(&mut self.list_state, len, 10);
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.activate_selected(RowPart::Body),
            KeyCode::Char('d') | KeyCode::Delete => self.activate_selected(RowPart::Delete),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => Some(Command::BackToList),
            KeyCode::Char('r') => Some(Command::Refresh),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<Command> {
        let len = self.len();
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                select_next(&mut self.list_state, len);
                None
            }
            MouseEventKind::ScrollUp => {
                select_previous(&mut self.list_state, len);
                None
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let (col, row) = (mouse.column, mouse.row);
                if contains(self.hitboxes.back, col, row) {
                    return Some(Command::BackToList);
                }
                if contains(self.hitboxes.button, col, row) {
                    return self.submit();
                }
                if contains(self.hitboxes.input, col, row) {
                    self.input.focus();
                    return None;
                }
                let target = hit_row(
                    self.hitboxes.list,
                    self.list_state.offset(),
                    len,
                    col,
                    row,
                    DELETE_WIDTH,
                )?;
                self.input.blur();
                self.list_state.select(Some(target.index));
                self.activate(target)
            }
            _ => None,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);
        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(10)])
            .split(chunks[0]);

        let heading = match &self.list {
            None => LOADING_LIST.to_string(),
            Some(l) => format!("{}  ({}/{} done)", l.name, l.checked_count(), l.items.len()),
        };
        f.render_widget(
            Paragraph::new(heading)
                .style(Style::default().add_modifier(Modifier::BOLD))
                .block(Block::default().borders(Borders::ALL).title(" List ")),
            header[0],
        );
        f.render_widget(
            Paragraph::new("[back]")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            header[1],
        );

        let border = if self.input.is_focused() {
            Style::default()
        } else {
            Style::default().fg(Color::Yellow)
        };
        let title = match &self.list {
            None => " Items (Loading...) ".to_string(),
            Some(l) => format!(" Items ({}) ", l.items.len()),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border);

        match &self.list {
            None => f.render_widget(Paragraph::new(LOADING_LIST).block(block), chunks[1]),
            Some(l) if l.items.is_empty() => {
                f.render_widget(Paragraph::new(EMPTY_ITEMS).block(block), chunks[1])
            }
            Some(l) => {
                let inner_width = chunks[1].width.saturating_sub(2);
                let items: Vec<ListItem> = l
                    .items
                    .iter()
                    .map(|item| {
                        let glyph = if item.checked { "[x]" } else { "[ ]" };
                        let style = if item.checked {
                            Style::default()
                                .fg(Color::DarkGray)
                                .add_modifier(Modifier::CROSSED_OUT)
                        } else {
                            Style::default().fg(Color::White)
                        };
                        let text = row_text(&format!("{} {}", glyph, item.label), inner_width);
                        ListItem::new(Line::from(vec![Span::styled(text, style)]))
                    })
                    .collect();
                let list = List::new(items).block(block).highlight_style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .bg(Color::DarkGray),
                );
                f.render_stateful_widget(list, chunks[1], &mut self.list_state);
            }
        }

        let (input, button) = render_input(f, chunks[2], &self.input, " New item ", "add");
        self.hitboxes = Hitboxes {
            list: chunks[1],
            input,
            button,
            back: header[1],
        };
    }
}
