/// Minimal multi-line edit buffer: a `String` plus a cursor kept on a char
/// boundary. Enough for the input editor and the create-tone modal fields;
/// no undo, no selection.
#[derive(Clone, Debug, Default)]
pub(crate) struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub(crate) fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub(crate) fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(ch) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
            self.text.remove(self.cursor);
        }
    }

    pub(crate) fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub(crate) fn move_left(&mut self) {
        if let Some(ch) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
        }
    }

    pub(crate) fn move_right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub(crate) fn move_line_start(&mut self) {
        self.cursor = self.line_start(self.cursor);
    }

    pub(crate) fn move_line_end(&mut self) {
        self.cursor = self.text[self.cursor..]
            .find('\n')
            .map(|offset| self.cursor + offset)
            .unwrap_or(self.text.len());
    }

    pub(crate) fn move_up(&mut self) {
        let (row, col) = self.cursor_row_col();
        if row > 0 {
            self.cursor = self.offset_at(row - 1, col);
        }
    }

    pub(crate) fn move_down(&mut self) {
        let (row, col) = self.cursor_row_col();
        if row + 1 < self.text.split('\n').count() {
            self.cursor = self.offset_at(row + 1, col);
        }
    }

    /// Cursor position as (line index, char column within the line).
    pub(crate) fn cursor_row_col(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let row = before.matches('\n').count();
        let line_start = self.line_start(self.cursor);
        let col = self.text[line_start..self.cursor].chars().count();
        (row, col)
    }

    fn line_start(&self, offset: usize) -> usize {
        self.text[..offset].rfind('\n').map_or(0, |pos| pos + 1)
    }

    fn offset_at(&self, row: usize, col: usize) -> usize {
        let mut offset = 0;
        for (idx, line) in self.text.split('\n').enumerate() {
            if idx == row {
                let clamped: usize = line.chars().take(col).map(char::len_utf8).sum();
                return offset + clamped;
            }
            offset += line.len() + 1;
        }
        self.text.len()
    }
}
