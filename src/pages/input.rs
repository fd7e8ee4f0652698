//! Cursor-aware text field used by the form-style pages.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// An editable text buffer with a character-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    /// Cursor position in characters, `0..=len`.
    cursor: usize,
    multiline: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn multiline() -> Self {
        Self {
            multiline: true,
            ..Self::default()
        }
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Insert `s` at the cursor and move the cursor past it.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index(self.cursor);
        self.text.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.text.chars().count() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Apply an editing key. Returns `true` if the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(c);
            }
            KeyCode::Enter if self.multiline => self.insert_char('\n'),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_at_cursor() {
        let mut field = TextField::new().with_text("hello world");
        for _ in 0..5 {
            field.move_left();
        }
        field.insert_str("big ");
        assert_eq!(field.text(), "hello big world");
        assert_eq!(field.cursor(), 10);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut field = TextField::new().with_text("abc");
        field.backspace();
        assert_eq!(field.text(), "ab");
        field.move_home();
        field.delete();
        assert_eq!(field.text(), "b");
        field.backspace();
        assert_eq!(field.text(), "b");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut field = TextField::new().with_text("héllo");
        field.move_home();
        field.move_right();
        field.move_right();
        field.backspace();
        assert_eq!(field.text(), "hllo");
    }

    #[test]
    fn test_enter_only_in_multiline() {
        let mut single = TextField::new();
        assert!(!single.handle_key(key(KeyCode::Enter)));

        let mut multi = TextField::multiline();
        assert!(multi.handle_key(key(KeyCode::Char('a'))));
        assert!(multi.handle_key(key(KeyCode::Enter)));
        assert_eq!(multi.text(), "a\n");
    }

    #[test]
    fn test_control_chars_not_inserted() {
        let mut field = TextField::new();
        let consumed = field.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!consumed);
        assert!(field.is_empty());
    }
}
