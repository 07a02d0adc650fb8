use crate::model::ListSummary;
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
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

pub const EMPTY_LISTS: &str = "No lists yet. Press 'a' and type a name to create one.";
pub const LOADING_LISTS: &str = "Loading lists...";

/// Home screen: every list summary, plus the "new list" field.
///
/// `summaries` is `None` until the first snapshot arrives.
pub struct CollectionView {
    summaries: Option<Vec<ListSummary>>,
    input: TextInput,
    list_state: ListState,
    hitboxes: Hitboxes,
}

impl Default for CollectionView {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionView {
    pub fn new() -> Self {
        Self {
            summaries: None,
            input: TextInput::new(false),
            list_state: ListState::default(),
            hitboxes: Hitboxes::default(),
        }
    }

    pub fn summaries(&self) -> Option<&[ListSummary]> {
        self.summaries.as_deref()
    }
    pub fn is_loading(&self) -> bool {
        self.summaries.is_none()
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

    /// Replaces the whole collection with what the backend sent.
    pub fn apply_server_snapshot(&mut self, summaries: Vec<ListSummary>) {
        let len = summaries.len();
        self.summaries = Some(summaries);
        clamp_selection(&mut self.list_state, len);
    }

    fn len(&self) -> usize {
        self.summaries.as_ref().map_or(0, Vec::len)
    }

    /// The `[add]` button and Enter in the field both end up here.
    pub fn submit(&mut self) -> Option<Command> {
        self.input.submit().map(Command::CreateList)
    }

    /// Delete control first; only an unhandled click selects the list.
    pub fn activate(&self, target: RowTarget) -> Option<Command> {
        let id = &self.summaries.as_ref()?.get(target.index)?.id;
        dispatch_row(
            target,
            |t| match t.part {
                RowPart::Delete => Propagation::Stop(Command::DeleteList(id.clone())),
                RowPart::Body => Propagation::Continue,
            },
            |_| Some(Command::SelectList(id.clone())),
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
                    InputOutcome::Submitted(name) => Some(Command::CreateList(name)),
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
            KeyCode::Enter => self.activate_selected(RowPart::Body),
            KeyCode::Char('d') | KeyCode::Delete => self.activate_selected(RowPart::Delete),
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
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let border = if self.input.is_focused() {
            Style::default()
        } else {
            Style::default().fg(Color::Yellow)
        };
        let title = match &self.summaries {
            None => " Lists (Loading...) ".to_string(),
            Some(s) => format!(" Lists ({}) ", s.len()),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border);

        match &self.summaries {
            None => f.render_widget(Paragraph::new(LOADING_LISTS).block(block), chunks[0]),
            Some(s) if s.is_empty() => {
                f.render_widget(Paragraph::new(EMPTY_LISTS).block(block), chunks[0])
            }
            Some(s) => {
                let inner_width = chunks[0].width.saturating_sub(2);
                let items: Vec<ListItem> = s
                    .iter()
                    .map(|l| {
                        let left = format!("{} ({})", l.name, l.item_count);
                        ListItem::new(Line::from(row_text(&left, inner_width)))
                    })
                    .collect();
                let list = List::new(items).block(block).highlight_style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .bg(Color::DarkGray),
                );
                f.render_stateful_widget(list, chunks[0], &mut self.list_state);
            }
        }

        let (input, button) = render_input(f, chunks[1], &self.input, " New list ", "add");
        self.hitboxes = Hitboxes {
            list: chunks[0],
            input,
            button,
            back: Rect::default(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::view::test_support::screen;
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn summary(id: &str, name: &str, count: u32) -> ListSummary {
        ListSummary {
            id: id.to_string(),
            name: name.to_string(),
            item_count: count,
        }
    }

    fn rendered(view: &mut CollectionView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| view.render(f, f.area())).unwrap();
        screen(terminal.backend().buffer())
    }

    #[test]
    fn shows_loading_until_first_snapshot() {
        let mut view = CollectionView::new();
        assert!(view.is_loading());
        let out = rendered(&mut view);
        assert!(out.contains(LOADING_LISTS));
    }

    #[test]
    fn empty_collection_renders_message_and_no_rows() {
        let mut view = CollectionView::new();
        view.apply_server_snapshot(vec![]);
        let out = rendered(&mut view);
        assert!(out.contains("No lists yet."));
        assert!(!out.contains("[del]"));
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn renders_one_row_per_summary_with_count() {
        let mut view = CollectionView::new();
        view.apply_server_snapshot(vec![
            summary("1", "Chores", 0),
            summary("2", "Groceries", 2),
        ]);
        let out = rendered(&mut view);
        assert!(out.contains("Chores (0)"));
        assert!(out.contains("Groceries (2)"));
        assert_eq!(out.matches("[del]").count(), 2);
        assert!(out.contains(" Lists (2) "));
    }

    #[test]
    fn enter_in_field_creates_list_and_clears() {
        let mut view = CollectionView::new();
        view.handle_key(key(KeyCode::Char('a')));
        for c in " Chores ".chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)),
            Some(Command::CreateList("Chores".to_string()))
        );
        assert_eq!(view.input().value(), "");
        assert!(view.input().is_focused());
    }

    #[test]
    fn blank_submission_emits_nothing_and_keeps_focus() {
        let mut view = CollectionView::new();
        view.handle_key(key(KeyCode::Char('a')));
        view.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(view.handle_key(key(KeyCode::Enter)), None);
        assert!(view.input().is_focused());

        view.input_mut().blur();
        assert_eq!(view.submit(), None);
        assert!(view.input().is_focused());
    }

    #[test]
    fn add_button_click_submits() {
        let mut view = CollectionView::new();
        view.apply_server_snapshot(vec![]);
        view.input_mut().focus();
        for c in "Chores".chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
        rendered(&mut view);
        // button occupies the last 7 columns of the bottom three rows
        assert_eq!(
            view.handle_mouse(click(56, 10)),
            Some(Command::CreateList("Chores".to_string()))
        );
    }

    #[test]
    fn cursor_follows_display_width_of_wide_input() {
        let mut view = CollectionView::new();
        view.apply_server_snapshot(vec![]);
        view.input_mut().focus();
        for c in "買い".chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| view.render(f, f.area())).unwrap();
        // "> " plus two double-width glyphs after the left border
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!((cursor.x, cursor.y), (7, 10));
    }

    #[test]
    fn row_keys_select_and_delete_exclusively() {
        let mut view = CollectionView::new();
        view.apply_server_snapshot(vec![summary("1", "Chores", 0), summary("2", "Work", 3)]);
        view.handle_key(key(KeyCode::Down));
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)),
            Some(Command::SelectList("2".to_string()))
        );
        assert_eq!(
            view.handle_key(key(KeyCode::Char('d'))),
            Some(Command::DeleteList("2".to_string()))
        );
    }

    #[test]
    fn clicking_delete_control_never_selects() {
        let mut view = CollectionView::new();
        view.apply_server_snapshot(vec![summary("1", "Groceries", 2)]);
        rendered(&mut view);
        // row 0 sits at y = 1; inner area ends at x = 59
        assert_eq!(
            view.handle_mouse(click(57, 1)),
            Some(Command::DeleteList("1".to_string()))
        );
        assert_eq!(
            view.handle_mouse(click(5, 1)),
            Some(Command::SelectList("1".to_string()))
        );
        assert_eq!(view.handle_mouse(click(5, 4)), None);
    }

    #[test]
    fn quit_and_refresh_only_outside_the_field() {
        let mut view = CollectionView::new();
        assert_eq!(view.handle_key(key(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(view.handle_key(key(KeyCode::Char('r'))), Some(Command::Refresh));
        view.handle_key(key(KeyCode::Tab));
        assert_eq!(view.handle_key(key(KeyCode::Char('q'))), None);
        assert_eq!(view.input().value(), "q");
    }
}
