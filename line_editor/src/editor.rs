//! Line editor over a key source
//!
//! Reads key events, applies them to a [`LineBuffer`] and echoes the result
//! through a borrowed [`DisplayWriter`].
//!
//! An event is either *fresh* (straight from the key source) or *replayed*
//! (from the [`ReplayQueue`], already echoed by an earlier speculative
//! scan). Only fresh events touch the screen.

use alloc::string::String;
use console_text::{ConsoleError, ConsoleResult, DisplayWriter, TextEncoding};
use hal::key_source::KeySource;
use hal::text_grid::TextGrid;
use input_types::{ConsoleKey, KeyEvent};

use crate::buffer::LineBuffer;
use crate::replay::{ReplayQueue, Speculation};

/// A key handed out by [`LineEditor::read_key`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRead {
    pub event: KeyEvent,
    /// True when the event was replayed after a speculative scan
    pub previously_processed: bool,
}

/// Interactive line editor
pub struct LineEditor<K: KeySource> {
    keys: K,
    replay: ReplayQueue,
    line: LineBuffer,
    /// Materialized line not yet handed out by `read_line_into`
    unread: LineBuffer,
    input_encoding: TextEncoding,
}

impl<K: KeySource> LineEditor<K> {
    pub fn new(keys: K, input_encoding: TextEncoding) -> Self {
        Self {
            keys,
            replay: ReplayQueue::new(),
            line: LineBuffer::new(),
            unread: LineBuffer::new(),
            input_encoding,
        }
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut K {
        &mut self.keys
    }

    /// Events waiting to be replayed
    pub fn pending(&self) -> usize {
        self.replay.len()
    }

    pub fn input_encoding(&self) -> TextEncoding {
        self.input_encoding
    }

    pub fn set_input_encoding(&mut self, encoding: TextEncoding) {
        self.input_encoding = encoding;
    }

    /// Scans one line
    ///
    /// Returns `true` when the line ended with Enter and `false` when the key
    /// source closed first. A consuming scan edits the editor's own line; a
    /// speculative one edits a scratch line and folds every surviving event
    /// back into the replay queue, whether or not it succeeds.
    pub fn read_line_core<G: TextGrid>(
        &mut self,
        out: &mut DisplayWriter<G>,
        consume: bool,
    ) -> ConsoleResult<bool> {
        let Self {
            keys, replay, line, ..
        } = self;

        if consume {
            line.clear();
            scan_line(keys, replay, line, None, out)
        } else {
            let mut scratch = LineBuffer::new();
            let result = replay.speculate(|replay, speculation| {
                scan_line(keys, replay, &mut scratch, Some(speculation), out)
            });

            // The replay rebuilds the line with its edit cursor at the end,
            // so an unterminated scan leaves the screen cursor there too.
            if !matches!(result, Ok(true)) {
                for _ in scratch.cursor()..scratch.len() {
                    out.step_forward();
                }
            }
            result
        }
    }

    /// Reads one edited line
    ///
    /// `None` means the key source closed with nothing typed.
    pub fn read_line<G: TextGrid>(
        &mut self,
        out: &mut DisplayWriter<G>,
    ) -> ConsoleResult<Option<String>> {
        let entered = self.read_line_core(out, true)?;
        if entered || !self.line.is_empty() {
            Ok(Some(self.line.take_string()))
        } else {
            Ok(None)
        }
    }

    /// Reads encoded line bytes into `buf`
    ///
    /// Hands out whole chars from the current line (plus `'\n'` if it ended
    /// with Enter) until the next one does not fit; the rest waits for the
    /// next call. A new line is scanned only once the previous one is used
    /// up. Returns 0 for an empty `buf` or a closed key source.
    pub fn read_line_into<G: TextGrid>(
        &mut self,
        out: &mut DisplayWriter<G>,
        buf: &mut [u8],
    ) -> ConsoleResult<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if self.unread.is_empty() {
            let entered = self.read_line_core(out, true)?;
            for &ch in self.line.units() {
                self.unread.push(ch);
            }
            self.line.clear();
            if entered {
                self.unread.push('\n');
            }
        }

        let mut written = 0;
        let mut taken = 0;
        for &ch in self.unread.units() {
            match self.input_encoding.encode_char(ch, &mut buf[written..]) {
                Some(len) => {
                    written += len;
                    taken += 1;
                }
                None => break,
            }
        }

        if taken == 0 && !self.unread.is_empty() {
            return Err(ConsoleError::InvalidState(
                "read buffer smaller than one encoded char",
            ));
        }
        self.unread.drain_front(taken);
        Ok(written)
    }

    /// Reads one key, replayed events first
    pub fn read_key(&mut self) -> ConsoleResult<Option<KeyRead>> {
        if let Some(event) = self.replay.pop() {
            return Ok(Some(KeyRead {
                event,
                previously_processed: true,
            }));
        }

        let event = self.keys.next_key_blocking()?;
        Ok(event.map(|event| KeyRead {
            event,
            previously_processed: false,
        }))
    }

    /// First unit of the next line, without consuming it
    ///
    /// With nothing pending this scans a line speculatively (echoing it), so
    /// a following `read_line` returns that line without echoing it again.
    /// An empty line peeks as `None`, like a closed source.
    pub fn peek<G: TextGrid>(&mut self, out: &mut DisplayWriter<G>) -> ConsoleResult<Option<char>> {
        if self.replay.is_empty() {
            self.read_line_core(out, false)?;
        }
        Ok(self
            .replay
            .front()
            .filter(|event| !event.is_null() && !is_line_end(event))
            .map(|event| event.ch))
    }

    /// Unit of the next available key, without waiting
    ///
    /// `None` when no key is available.
    pub fn read_unit(&mut self) -> ConsoleResult<Option<char>> {
        Ok(self.keys.try_next_key()?.map(|event| event.ch))
    }

    /// True if a replayed or fresh key can be read without waiting
    pub fn key_available(&mut self) -> bool {
        !self.replay.is_empty() || self.keys.has_key_available()
    }
}

fn scan_line<K: KeySource, G: TextGrid>(
    keys: &mut K,
    replay: &mut ReplayQueue,
    line: &mut LineBuffer,
    mut speculation: Option<&mut Speculation>,
    out: &mut DisplayWriter<G>,
) -> ConsoleResult<bool> {
    loop {
        let (event, fresh) = match replay.pop() {
            Some(event) => (event, false),
            None => match keys.next_key_blocking()? {
                Some(event) => (event, true),
                None => return Ok(false),
            },
        };

        match event.key {
            _ if is_line_end(&event) => {
                if let Some(speculation) = speculation.as_deref_mut() {
                    speculation.terminate(event);
                }
                if fresh {
                    out.echo('\n');
                }
                return Ok(true);
            }
            ConsoleKey::Delete => {
                if line.remove_at_cursor().is_some() {
                    if let Some(speculation) = speculation.as_deref_mut() {
                        speculation.erase_unit(line.cursor());
                    }
                    if fresh {
                        redraw(out, line.suffix(), true);
                    }
                }
            }
            ConsoleKey::Backspace => {
                if line.remove_before_cursor().is_some() {
                    if let Some(speculation) = speculation.as_deref_mut() {
                        speculation.erase_unit(line.cursor());
                    }
                    if fresh {
                        out.step_back();
                        redraw(out, line.suffix(), true);
                    }
                }
            }
            ConsoleKey::LeftArrow => {
                if line.move_left() && fresh {
                    out.step_back();
                }
            }
            ConsoleKey::RightArrow => {
                if line.move_right() && fresh {
                    out.step_forward();
                }
            }
            _ if event.is_null() => {}
            _ => {
                let at = line.cursor();
                let append = line.at_end();
                line.insert(event.ch);
                if let Some(speculation) = speculation.as_deref_mut() {
                    speculation.record_unit(at, event);
                }
                if fresh {
                    if append {
                        echo_unit(out, event.ch);
                    } else {
                        redraw(out, &line.units()[at..], false);
                        out.step_forward();
                    }
                }
            }
        }
    }
}

fn is_line_end(event: &KeyEvent) -> bool {
    matches!(event.key, ConsoleKey::Enter | ConsoleKey::NumpadEnter)
}

/// One typed unit is always exactly one cell
fn echo_unit<G: TextGrid>(out: &mut DisplayWriter<G>, ch: char) {
    let glyph = out.encoding().glyph(ch);
    out.write_char(glyph);
}

/// Rewrites `units` from the screen cursor, then puts the cursor back
///
/// The saved row moves up by however many times the rewrite scrolled.
fn redraw<G: TextGrid>(out: &mut DisplayWriter<G>, units: &[char], trailing_blank: bool) {
    let (col, row) = out.cursor();
    let scrolls = out.scroll_count();

    for &ch in units {
        echo_unit(out, ch);
    }
    if trailing_blank {
        out.write_char(b' ');
    }

    let scrolled = (out.scroll_count() - scrolls) as usize;
    out.set_cursor(col, row.saturating_sub(scrolled));
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use hal::fake::{FakeKeySource, FakeTextGrid};
    use hal::keyboard::KeyboardError;

    fn key(key: ConsoleKey) -> KeyEvent {
        KeyEvent::special(key)
    }

    fn typed(text: &str) -> Vec<KeyEvent> {
        text.chars().map(KeyEvent::char).collect()
    }

    fn setup(keys: FakeKeySource) -> (LineEditor<FakeKeySource>, DisplayWriter<FakeTextGrid>) {
        (
            LineEditor::new(keys, TextEncoding::Ascii),
            DisplayWriter::new(FakeTextGrid::new(80, 25), TextEncoding::Ascii),
        )
    }

    fn setup_events(events: Vec<KeyEvent>) -> (LineEditor<FakeKeySource>, DisplayWriter<FakeTextGrid>) {
        setup(FakeKeySource::from_events(events))
    }

    #[test]
    fn test_plain_line() {
        let (mut editor, mut out) = setup(FakeKeySource::from_text("hello\n"));

        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("hello"));
        assert_eq!(out.grid().row_text(0), "hello");
        assert_eq!(out.cursor(), (0, 1));
    }

    #[test]
    fn test_insert_in_middle_shifts_suffix() {
        let mut events = typed("hello");
        events.extend([key(ConsoleKey::LeftArrow), key(ConsoleKey::LeftArrow)]);
        events.push(KeyEvent::char('x'));
        events.push(key(ConsoleKey::Enter));
        let (mut editor, mut out) = setup_events(events);

        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("helxlo"));
        assert_eq!(out.grid().row_text(0), "helxlo");
        // one newline echoed
        assert_eq!(out.cursor(), (0, 1));
        assert_eq!(out.grid().row_text(1), "");
    }

    #[test]
    fn test_insert_cursor_lands_after_new_unit() {
        let mut events = typed("ac");
        events.push(key(ConsoleKey::LeftArrow));
        events.push(KeyEvent::char('b'));
        let (mut editor, mut out) = setup_events(events);

        // source closes without Enter
        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("abc"));
        assert_eq!(out.grid().row_text(0), "abc");
        assert_eq!(out.cursor(), (2, 0));
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let (mut editor, mut out) = setup_events(vec![key(ConsoleKey::Backspace)]);
        out.set_cursor(5, 2);

        assert_eq!(editor.read_line(&mut out).unwrap(), None);
        assert_eq!(out.cursor(), (5, 2));
        assert_eq!(out.grid().row_text(2), "");

        editor.keys_mut().type_text("a\n");
        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("a"));
        assert_eq!(out.grid().row_text(2), "     a");
    }

    #[test]
    fn test_backspace_removes_unit_and_moves_left() {
        let mut events = typed("abc");
        events.push(key(ConsoleKey::LeftArrow));
        events.push(key(ConsoleKey::Backspace));
        let (mut editor, mut out) = setup_events(events);

        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("ac"));
        assert_eq!(out.grid().row_text(0), "ac");
        assert_eq!(out.cursor(), (1, 0));
    }

    #[test]
    fn test_delete_under_cursor() {
        let mut events = typed("abc");
        events.extend([key(ConsoleKey::LeftArrow), key(ConsoleKey::LeftArrow)]);
        events.extend([key(ConsoleKey::Delete), key(ConsoleKey::Delete), key(ConsoleKey::Delete)]);
        events.push(key(ConsoleKey::Enter));
        let (mut editor, mut out) = setup_events(events);

        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("a"));
        assert_eq!(out.grid().row_text(0), "a");
    }

    #[test]
    fn test_arrows_stay_in_bounds() {
        let mut events = vec![key(ConsoleKey::LeftArrow), key(ConsoleKey::RightArrow)];
        events.extend(typed("ab"));
        events.extend([key(ConsoleKey::RightArrow), key(ConsoleKey::RightArrow)]);
        events.push(KeyEvent::char('c'));
        let (mut editor, mut out) = setup_events(events);

        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("abc"));
        assert_eq!(out.cursor(), (3, 0));
    }

    #[test]
    fn test_null_units_ignored() {
        let events = vec![key(ConsoleKey::F1), KeyEvent::char('z'), key(ConsoleKey::Home)];
        let (mut editor, mut out) = setup_events(events);

        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("z"));
        assert_eq!(out.cursor(), (1, 0));
    }

    #[test]
    fn test_closed_source_with_nothing_typed() {
        let (mut editor, mut out) = setup(FakeKeySource::new());
        assert_eq!(editor.read_line(&mut out).unwrap(), None);
    }

    #[test]
    fn test_empty_line_with_enter() {
        let (mut editor, mut out) = setup_events(vec![key(ConsoleKey::NumpadEnter)]);
        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_redraw_wrapping_past_last_row() {
        let mut editor = LineEditor::new(FakeKeySource::from_text("abc"), TextEncoding::Ascii);
        let mut out = DisplayWriter::new(FakeTextGrid::new(4, 2), TextEncoding::Ascii);
        out.set_cursor(0, 1);
        editor.keys_mut().push(key(ConsoleKey::LeftArrow));
        editor.keys_mut().push(key(ConsoleKey::LeftArrow));
        editor.keys_mut().push(KeyEvent::char('X'));

        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("aXbc"));
        // the suffix rewrite filled the last row and scrolled once
        assert_eq!(out.scroll_count(), 1);
        assert_eq!(out.grid().row_text(0), "aXbc");
        assert_eq!(out.cursor(), (2, 0));
    }

    #[test]
    fn test_peek_then_read_line_matches() {
        let mut events = typed("hello");
        events.extend([key(ConsoleKey::LeftArrow), key(ConsoleKey::LeftArrow)]);
        events.push(KeyEvent::char('x'));
        events.push(key(ConsoleKey::Enter));

        let (mut direct, mut direct_out) = setup_events(events.clone());
        let expected = direct.read_line(&mut direct_out).unwrap();

        let (mut editor, mut out) = setup_events(events);
        assert_eq!(editor.peek(&mut out).unwrap(), Some('h'));
        assert_eq!(editor.peek(&mut out).unwrap(), Some('h'));
        assert_eq!(editor.read_line(&mut out).unwrap(), expected);

        // echoed once, by the speculative scan
        assert_eq!(out.grid().row_text(0), direct_out.grid().row_text(0));
        assert_eq!(out.cursor(), direct_out.cursor());
        assert_eq!(editor.pending(), 0);
    }

    #[test]
    fn test_peek_with_erasures() {
        let mut events = typed("abc");
        events.push(key(ConsoleKey::LeftArrow));
        events.push(key(ConsoleKey::Backspace));
        events.push(key(ConsoleKey::Delete));
        events.push(KeyEvent::char('z'));
        events.push(key(ConsoleKey::Enter));
        let (mut editor, mut out) = setup_events(events);

        assert_eq!(editor.peek(&mut out).unwrap(), Some('a'));
        assert_eq!(editor.pending(), 3);
        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("az"));
        assert_eq!(out.grid().row_text(0), "az");
    }

    #[test]
    fn test_peek_empty_line_has_no_data() {
        let (mut editor, mut out) = setup(FakeKeySource::from_text("\n"));
        assert_eq!(editor.peek(&mut out).unwrap(), None);
        assert_eq!(editor.pending(), 1);
        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_unterminated_peek_leaves_cursor_at_line_end() {
        let mut events = typed("ab");
        events.push(key(ConsoleKey::LeftArrow));
        let (mut editor, mut out) = setup_events(events);

        // source runs dry mid-line
        assert_eq!(editor.peek(&mut out).unwrap(), Some('a'));
        assert_eq!(out.cursor(), (2, 0));

        editor.keys_mut().type_text("X\n");
        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("abX"));
        assert_eq!(out.grid().row_text(0), "abX");
        assert_eq!(out.cursor(), (0, 1));
    }

    #[test]
    fn test_failed_speculation_keeps_screen_in_step() {
        let mut events = typed("abc");
        events.extend([key(ConsoleKey::LeftArrow), key(ConsoleKey::LeftArrow)]);
        let (mut editor, mut out) = setup_events(events);
        editor.read_line_core(&mut out, false).unwrap();
        assert_eq!(editor.pending(), 3);

        editor.keys_mut().fail_next(KeyboardError::Overrun);
        assert_eq!(
            editor.read_line_core(&mut out, false),
            Err(ConsoleError::Keyboard(KeyboardError::Overrun))
        );
        assert_eq!(out.cursor(), (3, 0));

        editor.keys_mut().type_text("d\n");
        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("abcd"));
        assert_eq!(out.grid().row_text(0), "abcd");
    }

    #[test]
    fn test_peek_closed_source() {
        let (mut editor, mut out) = setup(FakeKeySource::new());
        assert_eq!(editor.peek(&mut out).unwrap(), None);
    }

    #[test]
    fn test_speculation_survives_device_error() {
        let (mut editor, mut out) = setup(FakeKeySource::from_text("xy"));
        assert_eq!(editor.read_line_core(&mut out, false), Ok(false));
        assert_eq!(editor.pending(), 2);

        // pending events replay, then the device error surfaces
        editor.keys_mut().fail_next(KeyboardError::Device("unplugged"));
        assert_eq!(
            editor.read_line_core(&mut out, false),
            Err(ConsoleError::Keyboard(KeyboardError::Device("unplugged")))
        );
        assert_eq!(editor.pending(), 2);
        assert_eq!(editor.read_line(&mut out).unwrap().as_deref(), Some("xy"));
    }

    #[test]
    fn test_read_line_into_splits_across_calls() {
        let (mut editor, mut out) = setup(FakeKeySource::from_text("abcde\n"));
        let mut buf = [0u8; 3];

        assert_eq!(editor.read_line_into(&mut out, &mut buf).unwrap(), 3);
        assert_eq!(&buf, b"abc");
        assert_eq!(editor.read_line_into(&mut out, &mut buf).unwrap(), 3);
        assert_eq!(&buf, b"de\n");
        assert_eq!(editor.read_line_into(&mut out, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_read_line_into_empty_buffer() {
        let (mut editor, mut out) = setup(FakeKeySource::from_text("a"));
        assert_eq!(editor.read_line_into(&mut out, &mut []).unwrap(), 0);
        assert_eq!(editor.keys().remaining(), 1);
    }

    #[test]
    fn test_read_line_into_whole_chars_only() {
        let mut editor = LineEditor::new(FakeKeySource::from_text("é€\n"), TextEncoding::Utf8);
        let mut out = DisplayWriter::new(FakeTextGrid::new(80, 25), TextEncoding::Ascii);
        let mut buf = [0u8; 4];

        // 'é' is 2 bytes and '€' is 3, so only 'é' fits
        assert_eq!(editor.read_line_into(&mut out, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], "é".as_bytes());
        assert_eq!(editor.read_line_into(&mut out, &mut buf).unwrap(), 4);
        assert_eq!(&buf[..], "€\n".as_bytes());

        let mut small = [0u8; 2];
        editor.keys_mut().type_text("€\n");
        assert!(matches!(
            editor.read_line_into(&mut out, &mut small),
            Err(ConsoleError::InvalidState(_))
        ));
    }

    #[test]
    fn test_read_key_prefers_replayed() {
        let (mut editor, mut out) = setup(FakeKeySource::from_text("a\nb"));
        editor.peek(&mut out).unwrap();

        let first = editor.read_key().unwrap().unwrap();
        assert_eq!(first.event.ch, 'a');
        assert!(first.previously_processed);
        let enter = editor.read_key().unwrap().unwrap();
        assert_eq!(enter.event.key, ConsoleKey::Enter);
        assert!(enter.previously_processed);

        let fresh = editor.read_key().unwrap().unwrap();
        assert_eq!(fresh.event.ch, 'b');
        assert!(!fresh.previously_processed);
        assert_eq!(editor.read_key().unwrap(), None);
    }

    #[test]
    fn test_read_unit_and_key_available() {
        let (mut editor, _out) = setup(FakeKeySource::from_text("q"));
        assert!(editor.key_available());
        assert_eq!(editor.read_unit().unwrap(), Some('q'));
        assert!(!editor.key_available());
        assert_eq!(editor.read_unit().unwrap(), None);
        assert_eq!(editor.keys().blocking_reads(), 0);
    }
}
