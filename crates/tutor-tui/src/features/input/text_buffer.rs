//! Minimal text buffer for the question, answer and scratchboard fields.
//!
//! Lines are stored separately with a (row, col) cursor in char units.
//! Single-line fields never receive a newline; the reducer intercepts Enter.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Up,
    Down,
    Forward,
    Back,
    Head,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
        }
    }
}

impl TextBuffer {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor position as (row, col) in char units.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// Full contents joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.lines.push(String::new());
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    /// Inserts a string at the cursor, splitting lines on `\n`.
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let row = self.cursor_row;

        if !text.contains('\n') {
            let line = &mut self.lines[row];
            let byte_idx = char_to_byte_index(line, self.cursor_col);
            line.insert_str(byte_idx, text);
            self.cursor_col += text.chars().count();
            return;
        }

        let current = self.lines[row].clone();
        let byte_idx = char_to_byte_index(&current, self.cursor_col);
        let (prefix, suffix) = current.split_at(byte_idx);
        let parts: Vec<&str> = text.split('\n').collect();
        let last = parts[parts.len() - 1];

        let mut new_lines: Vec<String> = Vec::with_capacity(parts.len());
        new_lines.push(format!("{prefix}{}", parts[0]));
        new_lines.extend(parts[1..parts.len() - 1].iter().map(|p| (*p).to_string()));
        new_lines.push(format!("{last}{suffix}"));

        self.lines.splice(row..=row, new_lines);
        self.cursor_row = row + parts.len() - 1;
        self.cursor_col = last.chars().count();
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    pub fn insert_newline(&mut self) {
        self.insert_str("\n");
    }

    /// Backspace.
    pub fn delete_prev_char(&mut self) {
        if self.cursor_col > 0 {
            let col = self.cursor_col - 1;
            let line = &mut self.lines[self.cursor_row];
            let start = char_to_byte_index(line, col);
            let end = char_to_byte_index(line, col + 1);
            line.replace_range(start..end, "");
            self.cursor_col = col;
            return;
        }
        if self.cursor_row == 0 {
            return;
        }
        let current = self.lines.remove(self.cursor_row);
        self.cursor_row -= 1;
        self.cursor_col = line_char_len(&self.lines[self.cursor_row]);
        self.lines[self.cursor_row].push_str(&current);
    }

    /// Delete.
    pub fn delete_next_char(&mut self) {
        let row = self.cursor_row;
        if self.cursor_col >= line_char_len(&self.lines[row]) {
            if row + 1 < self.lines.len() {
                let next = self.lines.remove(row + 1);
                self.lines[row].push_str(&next);
            }
            return;
        }
        let line = &mut self.lines[row];
        let start = char_to_byte_index(line, self.cursor_col);
        let end = char_to_byte_index(line, self.cursor_col + 1);
        line.replace_range(start..end, "");
    }

    /// Deletes the word (or run of punctuation/whitespace) left of the cursor
    /// on the current line.
    pub fn delete_word_left(&mut self) {
        if self.cursor_col == 0 {
            self.delete_prev_char();
            return;
        }
        let line = &mut self.lines[self.cursor_row];
        let chars: Vec<char> = line.chars().collect();
        let start_col = scan_left_segment(&chars, self.cursor_col.min(chars.len()));
        let start = char_to_byte_index(line, start_col);
        let end = char_to_byte_index(line, self.cursor_col);
        line.replace_range(start..end, "");
        self.cursor_col = start_col;
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        match movement {
            CursorMove::Up if self.cursor_row > 0 => {
                self.cursor_row -= 1;
                self.clamp_col();
            }
            CursorMove::Down if self.cursor_row + 1 < self.lines.len() => {
                self.cursor_row += 1;
                self.clamp_col();
            }
            CursorMove::Forward => {
                if self.cursor_col < line_char_len(&self.lines[self.cursor_row]) {
                    self.cursor_col += 1;
                } else if self.cursor_row + 1 < self.lines.len() {
                    self.cursor_row += 1;
                    self.cursor_col = 0;
                }
            }
            CursorMove::Back => {
                if self.cursor_col > 0 {
                    self.cursor_col -= 1;
                } else if self.cursor_row > 0 {
                    self.cursor_row -= 1;
                    self.cursor_col = line_char_len(&self.lines[self.cursor_row]);
                }
            }
            CursorMove::Head => self.cursor_col = 0,
            CursorMove::End => self.cursor_col = line_char_len(&self.lines[self.cursor_row]),
            CursorMove::Up | CursorMove::Down => {}
        }
    }

    /// Applies a basic editing key. Returns true if the contents changed.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        if matches!(key.kind, KeyEventKind::Release) {
            return false;
        }
        let before = self.lines.clone();

        match key.code {
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.delete_word_left();
            }
            KeyCode::Backspace if key.modifiers.contains(KeyModifiers::ALT) => {
                self.delete_word_left();
            }
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(ch);
            }
            KeyCode::Backspace => self.delete_prev_char(),
            KeyCode::Delete => self.delete_next_char(),
            KeyCode::Left => self.move_cursor(CursorMove::Back),
            KeyCode::Right => self.move_cursor(CursorMove::Forward),
            KeyCode::Up => self.move_cursor(CursorMove::Up),
            KeyCode::Down => self.move_cursor(CursorMove::Down),
            KeyCode::Home => self.move_cursor(CursorMove::Head),
            KeyCode::End => self.move_cursor(CursorMove::End),
            _ => {}
        }

        self.lines != before
    }

    fn clamp_col(&mut self) {
        self.cursor_col = self
            .cursor_col
            .min(line_char_len(&self.lines[self.cursor_row]));
    }
}

fn line_char_len(line: &str) -> usize {
    line.chars().count()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CharClass {
    Whitespace,
    Word,
    Punct,
}

fn char_class(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

fn scan_left_segment(chars: &[char], mut idx: usize) -> usize {
    if idx == 0 {
        return 0;
    }
    let class = char_class(chars[idx - 1]);
    while idx > 0 && char_class(chars[idx - 1]) == class {
        idx -= 1;
    }
    idx
}

fn char_to_byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(i, _)| i)
}
