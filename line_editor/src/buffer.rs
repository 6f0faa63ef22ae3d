//! Line buffer with an edit cursor

use alloc::string::String;
use alloc::vec::Vec;

/// One line being edited
///
/// Holds units (one `char` each) and an edit cursor in `0..=len`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    units: Vec<char>,
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when the edit cursor sits past the last unit
    pub fn at_end(&self) -> bool {
        self.cursor == self.units.len()
    }

    pub fn units(&self) -> &[char] {
        &self.units
    }

    /// Units from the edit cursor to the end
    pub fn suffix(&self) -> &[char] {
        &self.units[self.cursor..]
    }

    /// Inserts at the edit cursor and moves past the new unit
    pub fn insert(&mut self, ch: char) {
        self.units.insert(self.cursor, ch);
        self.cursor += 1;
    }

    /// Removes the unit under the edit cursor (Delete)
    pub fn remove_at_cursor(&mut self) -> Option<char> {
        (self.cursor < self.units.len()).then(|| self.units.remove(self.cursor))
    }

    /// Removes the unit before the edit cursor (Backspace)
    pub fn remove_before_cursor(&mut self) -> Option<char> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.units.remove(self.cursor))
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Removes up to `count` units from the front
    pub fn drain_front(&mut self, count: usize) {
        let count = count.min(self.units.len());
        self.units.drain(..count);
        self.cursor = self.cursor.saturating_sub(count);
    }

    /// Appends a unit without moving the edit cursor
    pub fn push(&mut self, ch: char) {
        self.units.push(ch);
    }

    pub fn clear(&mut self) {
        self.units.clear();
        self.cursor = 0;
    }

    pub fn as_string(&self) -> String {
        self.units.iter().collect()
    }

    /// Returns the line and leaves the buffer empty
    pub fn take_string(&mut self) -> String {
        let line = self.as_string();
        self.clear();
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> LineBuffer {
        let mut line = LineBuffer::new();
        text.chars().for_each(|ch| line.insert(ch));
        line
    }

    #[test]
    fn test_insert_in_middle() {
        let mut line = typed("hllo");
        line.move_left();
        line.move_left();
        line.move_left();
        line.insert('e');

        assert_eq!(line.as_string(), "hello");
        assert_eq!(line.cursor(), 2);
        assert_eq!(line.suffix(), &['l', 'l', 'o']);
    }

    #[test]
    fn test_remove_at_and_before_cursor() {
        let mut line = typed("abc");
        assert_eq!(line.remove_at_cursor(), None);
        assert_eq!(line.remove_before_cursor(), Some('c'));

        line.move_left();
        assert_eq!(line.remove_at_cursor(), Some('a'));
        assert_eq!(line.as_string(), "b");
        assert_eq!(line.cursor(), 0);
        assert_eq!(line.remove_before_cursor(), None);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut line = typed("ab");
        assert!(!line.move_right());
        assert!(line.move_left());
        assert!(line.move_left());
        assert!(!line.move_left());
        assert_eq!(line.cursor(), 0);
    }

    #[test]
    fn test_drain_front() {
        let mut line = typed("abcde");
        line.drain_front(3);
        assert_eq!(line.as_string(), "de");
        assert_eq!(line.cursor(), 2);

        line.drain_front(10);
        assert!(line.is_empty());
        assert_eq!(line.cursor(), 0);
    }

    #[test]
    fn test_take_string_clears() {
        let mut line = typed("done");
        assert_eq!(line.take_string(), "done");
        assert!(line.is_empty());
        assert!(line.at_end());
    }
}
