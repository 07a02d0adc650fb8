use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of feeding a key to a [`TextInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Enter on a non-blank value. Carries the trimmed text; the field is cleared.
    Submitted(String),
    /// Enter on a blank value. Nothing is sent, focus stays on the field.
    Rejected,
    Edited,
    Ignored,
}

/// Single-line text field with a char-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
    focused: bool,
}

impl TextInput {
    pub fn new(focused: bool) -> Self {
        Self {
            focused,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn is_focused(&self) -> bool {
        self.focused
    }
    pub fn focus(&mut self) {
        self.focused = true;
    }
    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.clamp_cursor(self.cursor.saturating_sub(1));
    }
    pub fn move_cursor_right(&mut self) {
        self.cursor = self.clamp_cursor(self.cursor.saturating_add(1));
    }
    pub fn enter_char(&mut self, new_char: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, new_char);
        self.move_cursor_right();
    }
    /// Backspace.
    pub fn delete_char(&mut self) {
        if self.cursor != 0 {
            let before = self.value.chars().take(self.cursor - 1);
            let after = self.value.chars().skip(self.cursor);
            self.value = before.chain(after).collect();
            self.move_cursor_left();
        }
    }
    pub fn delete_forward(&mut self) {
        if self.cursor < self.value.chars().count() {
            let before = self.value.chars().take(self.cursor);
            let after = self.value.chars().skip(self.cursor + 1);
            self.value = before.chain(after).collect();
        }
    }
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Trim-based validation shared by list and item creation. The field keeps
    /// focus in both outcomes.
    pub fn submit(&mut self) -> Option<String> {
        self.focus();
        let trimmed = self.value.trim();
        if trimmed.is_empty() {
            return None;
        }
        let submitted = trimmed.to_string();
        self.clear();
        Some(submitted)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputOutcome {
        match key.code {
            KeyCode::Enter => match self.submit() {
                Some(value) => InputOutcome::Submitted(value),
                None => InputOutcome::Rejected,
            },
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
                InputOutcome::Edited
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.enter_char(c);
                InputOutcome::Edited
            }
            KeyCode::Backspace => {
                self.delete_char();
                InputOutcome::Edited
            }
            KeyCode::Delete => {
                self.delete_forward();
                InputOutcome::Edited
            }
            KeyCode::Left => {
                self.move_cursor_left();
                InputOutcome::Edited
            }
            KeyCode::Right => {
                self.move_cursor_right();
                InputOutcome::Edited
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputOutcome::Edited
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                InputOutcome::Edited
            }
            _ => InputOutcome::Ignored,
        }
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.value.chars().count())
    }
    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .map(|(i, _)| i)
            .nth(char_index)
            .unwrap_or(self.value.len())
    }
}
