use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::util::unicode;

/// Which form field an input edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    Name,
    Description,
    DueAt,
    NewTag,
}

/// What a key press did to an input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The value changed
    Changed { name: FieldName, value: String },
    /// Enter was pressed
    Submit,
    /// Esc was pressed
    Blur,
    /// Cursor moved or the key isn't handled here
    Ignored,
}

/// A labelled single-line text input
#[derive(Debug, Clone)]
pub struct InputField {
    pub name: FieldName,
    pub label: String,
    value: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub icon: Option<char>,
    /// Byte offset into `value`, always on a grapheme boundary
    cursor: usize,
}

impl InputField {
    pub fn new(name: FieldName, label: &str, value: &str) -> Self {
        InputField {
            name,
            label: label.to_string(),
            value: value.to_string(),
            required: true,
            placeholder: None,
            icon: None,
            cursor: value.len(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_icon(mut self, icon: char) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display column of the cursor
    pub fn cursor_col(&self) -> usize {
        unicode::display_width(&self.value[..self.cursor])
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.len();
    }

    /// Required but blank
    pub fn is_missing(&self) -> bool {
        self.required && self.value.trim().is_empty()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputEvent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Enter => InputEvent::Submit,
            KeyCode::Esc => InputEvent::Blur,
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                InputEvent::Ignored
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.value.len();
                InputEvent::Ignored
            }
            KeyCode::Char('u') if ctrl => {
                self.value.replace_range(..self.cursor, "");
                self.cursor = 0;
                self.changed()
            }
            KeyCode::Char('w') if ctrl => {
                let start = unicode::word_boundary_left(&self.value, self.cursor);
                self.value.replace_range(start..self.cursor, "");
                self.cursor = start;
                self.changed()
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                self.changed()
            }
            KeyCode::Backspace => match unicode::prev_grapheme_boundary(&self.value, self.cursor) {
                Some(prev) => {
                    self.value.replace_range(prev..self.cursor, "");
                    self.cursor = prev;
                    self.changed()
                }
                None => InputEvent::Ignored,
            },
            KeyCode::Delete => match unicode::next_grapheme_boundary(&self.value, self.cursor) {
                Some(next) => {
                    self.value.replace_range(self.cursor..next, "");
                    self.changed()
                }
                None => InputEvent::Ignored,
            },
            KeyCode::Left if ctrl || alt => {
                self.cursor = unicode::word_boundary_left(&self.value, self.cursor);
                InputEvent::Ignored
            }
            KeyCode::Right if ctrl || alt => {
                self.cursor = unicode::word_boundary_right(&self.value, self.cursor);
                InputEvent::Ignored
            }
            KeyCode::Left => {
                if let Some(prev) = unicode::prev_grapheme_boundary(&self.value, self.cursor) {
                    self.cursor = prev;
                }
                InputEvent::Ignored
            }
            KeyCode::Right => {
                if let Some(next) = unicode::next_grapheme_boundary(&self.value, self.cursor) {
                    self.cursor = next;
                }
                InputEvent::Ignored
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputEvent::Ignored
            }
            KeyCode::End => {
                self.cursor = self.value.len();
                InputEvent::Ignored
            }
            _ => InputEvent::Ignored,
        }
    }

    fn changed(&self) -> InputEvent {
        InputEvent::Changed {
            name: self.name,
            value: self.value.clone(),
        }
    }
}
