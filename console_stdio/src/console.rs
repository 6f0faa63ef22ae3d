//! Console facade
//!
//! One [`Console`] per machine, created at boot. It owns the display
//! writer, the line editor, the standard stream bindings and the speaker,
//! and is the only way the rest of the system reaches any of them.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use console_text::{ConsoleConfig, ConsoleError, ConsoleResult, DisplayWriter, TextEncoding};
use hal::key_source::KeySource;
use hal::speaker::{Speaker, DEFAULT_DURATION_MS, DEFAULT_FREQUENCY_HZ};
use hal::text_grid::{Color, TextGrid, TextMode};
use input_types::KeyEvent;
use line_editor::LineEditor;

use crate::redirect::{InputBinding, OutputBinding, StdStreams};
use crate::stream::{ConsoleStream, StdStream};

/// Lowest and highest tone `beep_with` accepts, in Hz
pub const BEEP_FREQUENCY_MIN: u32 = 37;
pub const BEEP_FREQUENCY_MAX: u32 = 32767;

/// Interactive text console
pub struct Console<G: TextGrid, K: KeySource> {
    writer: DisplayWriter<G>,
    editor: LineEditor<K>,
    streams: StdStreams,
    config: ConsoleConfig,
    speaker: Option<Box<dyn Speaker>>,
}

impl<G: TextGrid, K: KeySource> Console<G, K> {
    /// Brings up a console on `grid` and `keys` as described by `config`
    ///
    /// The grid is switched to the configured mode only if its dimensions
    /// differ, so whatever is already on screen survives.
    pub fn new(grid: G, keys: K, config: ConsoleConfig) -> ConsoleResult<Self> {
        config.validate()?;

        let mut writer = DisplayWriter::new(grid, config.output_encoding);
        if (writer.cols(), writer.rows()) != (config.mode.cols(), config.mode.rows()) {
            writer.set_mode(config.mode);
        }
        writer.grid_mut().set_colors(config.foreground, config.background);
        writer.set_cursor_size(config.cursor_size as usize)?;
        writer.set_cursor_visible(config.cursor_visible);

        Ok(Self {
            writer,
            editor: LineEditor::new(keys, config.input_encoding),
            streams: StdStreams::new(),
            config,
            speaker: None,
        })
    }

    /// Attaches a speaker for `beep`
    pub fn with_speaker(mut self, speaker: impl Speaker + 'static) -> Self {
        self.speaker = Some(Box::new(speaker));
        self
    }

    pub fn writer(&self) -> &DisplayWriter<G> {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut DisplayWriter<G> {
        &mut self.writer
    }

    pub fn editor(&self) -> &LineEditor<K> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut LineEditor<K> {
        &mut self.editor
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    // -- Standard streams --

    pub fn open_standard_input(&mut self) -> ConsoleStream<'_, G, K> {
        ConsoleStream::new(self, StdStream::Input)
    }

    pub fn open_standard_output(&mut self) -> ConsoleStream<'_, G, K> {
        ConsoleStream::new(self, StdStream::Output)
    }

    pub fn open_standard_error(&mut self) -> ConsoleStream<'_, G, K> {
        ConsoleStream::new(self, StdStream::Error)
    }

    pub fn is_input_redirected(&self) -> bool {
        self.streams.is_input_redirected()
    }

    pub fn is_output_redirected(&self) -> bool {
        self.streams.is_output_redirected()
    }

    pub fn is_error_redirected(&self) -> bool {
        self.streams.is_error_redirected()
    }

    pub fn set_in(&mut self, binding: InputBinding) -> InputBinding {
        self.streams.set_in(binding)
    }

    pub fn set_out(&mut self, binding: OutputBinding) -> OutputBinding {
        self.streams.set_out(binding)
    }

    pub fn set_error(&mut self, binding: OutputBinding) -> OutputBinding {
        self.streams.set_error(binding)
    }

    /// Reads a line from standard input
    pub fn stdin_read_line(&mut self) -> ConsoleResult<Option<String>> {
        match self.streams.input_mut() {
            InputBinding::Redirected(source) => Ok(source.read_line()),
            InputBinding::Console => self.editor.read_line(&mut self.writer),
        }
    }

    /// Reads encoded bytes from standard input
    pub fn stdin_read(&mut self, buf: &mut [u8]) -> ConsoleResult<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.streams.input_mut() {
            InputBinding::Redirected(source) => Ok(source.read(buf)),
            InputBinding::Console => self.editor.read_line_into(&mut self.writer, buf),
        }
    }

    /// Next unit of standard input without waiting; `None` if nothing is ready
    pub fn stdin_read_unit(&mut self) -> ConsoleResult<Option<char>> {
        match self.streams.input_mut() {
            InputBinding::Redirected(source) => {
                let mut byte = [0u8; 1];
                Ok((source.read(&mut byte) == 1).then(|| byte[0] as char))
            }
            InputBinding::Console => self.editor.read_unit(),
        }
    }

    /// First unit of the next line of standard input, without consuming it
    pub fn peek(&mut self) -> ConsoleResult<Option<char>> {
        match self.streams.input_mut() {
            InputBinding::Redirected(source) => Ok(source.peek()),
            InputBinding::Console => self.editor.peek(&mut self.writer),
        }
    }

    pub fn stdout_write(&mut self, bytes: &[u8]) -> ConsoleResult<usize> {
        self.write_to(StdStream::Output, bytes)
    }

    pub fn stderr_write(&mut self, bytes: &[u8]) -> ConsoleResult<usize> {
        self.write_to(StdStream::Error, bytes)
    }

    pub(crate) fn write_to(&mut self, stream: StdStream, bytes: &[u8]) -> ConsoleResult<usize> {
        if bytes.is_empty() {
            return Ok(0);
        }
        match output_binding(&mut self.streams, stream)? {
            OutputBinding::Redirected(sink) => Ok(sink.write(bytes)),
            OutputBinding::Console => {
                self.writer.write(bytes);
                Ok(bytes.len())
            }
        }
    }

    pub(crate) fn flush(&mut self, stream: StdStream) -> ConsoleResult<()> {
        match output_binding(&mut self.streams, stream)? {
            OutputBinding::Redirected(sink) => sink.flush(),
            OutputBinding::Console => self.writer.flush(),
        }
        Ok(())
    }

    // -- Keys --

    /// Reads one key straight from the keyboard
    ///
    /// Keys already read ahead by `peek` come first. A fresh renderable key
    /// is echoed unless `intercept` is set.
    pub fn read_key(&mut self, intercept: bool) -> ConsoleResult<Option<KeyEvent>> {
        if self.streams.is_input_redirected() {
            return Err(ConsoleError::InvalidState(
                "cannot read keys while input is redirected",
            ));
        }

        let Some(read) = self.editor.read_key()? else {
            return Ok(None);
        };
        if !intercept && !read.previously_processed && !read.event.is_null() {
            self.writer.echo(read.event.ch);
        }
        Ok(Some(read.event))
    }

    pub fn key_available(&mut self) -> bool {
        self.editor.key_available()
    }

    pub fn caps_lock(&self) -> bool {
        self.editor.keys().caps_lock()
    }

    pub fn num_lock(&self) -> bool {
        self.editor.keys().num_lock()
    }

    // -- Cursor --

    pub fn cursor_left(&self) -> usize {
        self.writer.cursor().0
    }

    pub fn cursor_top(&self) -> usize {
        self.writer.cursor().1
    }

    pub fn cursor_position(&self) -> (usize, usize) {
        self.writer.cursor()
    }

    pub fn set_cursor_left(&mut self, left: usize) -> ConsoleResult<()> {
        ConsoleError::check_range("cursor left", left, 0, self.window_width() - 1)?;
        let top = self.cursor_top();
        self.writer.set_cursor(left, top);
        Ok(())
    }

    pub fn set_cursor_top(&mut self, top: usize) -> ConsoleResult<()> {
        ConsoleError::check_range("cursor top", top, 0, self.window_height() - 1)?;
        let left = self.cursor_left();
        self.writer.set_cursor(left, top);
        Ok(())
    }

    /// Moves the cursor; neither coordinate changes if either is out of range
    pub fn set_cursor_position(&mut self, left: usize, top: usize) -> ConsoleResult<()> {
        ConsoleError::check_range("cursor left", left, 0, self.window_width() - 1)?;
        ConsoleError::check_range("cursor top", top, 0, self.window_height() - 1)?;
        self.writer.set_cursor(left, top);
        Ok(())
    }

    pub fn cursor_size(&self) -> u8 {
        self.writer.cursor_size()
    }

    pub fn set_cursor_size(&mut self, percent: usize) -> ConsoleResult<()> {
        self.writer.set_cursor_size(percent)
    }

    pub fn cursor_visible(&self) -> bool {
        self.writer.cursor_visible()
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.writer.set_cursor_visible(visible);
    }

    // -- Colors --

    pub fn foreground(&self) -> Color {
        self.writer.foreground()
    }

    pub fn set_foreground(&mut self, color: Color) {
        self.writer.set_foreground(color);
    }

    pub fn background(&self) -> Color {
        self.writer.background()
    }

    pub fn set_background(&mut self, color: Color) {
        self.writer.set_background(color);
    }

    /// Back to the configured colors (white on black by default)
    pub fn reset_color(&mut self) {
        self.writer.set_foreground(self.config.foreground);
        self.writer.set_background(self.config.background);
    }

    // -- Window --

    pub fn window_width(&self) -> usize {
        self.writer.cols()
    }

    pub fn window_height(&self) -> usize {
        self.writer.rows()
    }

    /// Switches to the text mode preset of exactly `width` x `height`, then
    /// clears the screen
    pub fn set_window_size(&mut self, width: usize, height: usize) -> ConsoleResult<()> {
        let mode = TextMode::from_dimensions(width, height)
            .ok_or(ConsoleError::UnsupportedWindowSize { width, height })?;
        self.writer.set_mode(mode);
        self.writer.clear();
        Ok(())
    }

    /// Blanks the screen and homes the cursor; does nothing while standard
    /// output is redirected
    pub fn clear(&mut self) {
        if self.streams.is_output_redirected() {
            log::debug!("clear skipped, stdout redirected");
            return;
        }
        self.writer.clear();
    }

    pub fn set_buffer_size(&mut self, _width: usize, _height: usize) -> ConsoleResult<()> {
        Err(unsupported("set_buffer_size"))
    }

    pub fn move_buffer_area(
        &mut self,
        _source_left: usize,
        _source_top: usize,
        _source_width: usize,
        _source_height: usize,
        _target_left: usize,
        _target_top: usize,
    ) -> ConsoleResult<()> {
        Err(unsupported("move_buffer_area"))
    }

    pub fn set_window_position(&mut self, _left: usize, _top: usize) -> ConsoleResult<()> {
        Err(unsupported("set_window_position"))
    }

    pub fn title(&self) -> ConsoleResult<String> {
        Err(unsupported("title"))
    }

    pub fn set_title(&mut self, _title: &str) -> ConsoleResult<()> {
        Err(unsupported("set_title"))
    }

    // -- Encodings --

    pub fn input_encoding(&self) -> TextEncoding {
        self.editor.input_encoding()
    }

    pub fn set_input_encoding(&mut self, encoding: TextEncoding) {
        self.editor.set_input_encoding(encoding);
    }

    pub fn output_encoding(&self) -> TextEncoding {
        self.writer.encoding()
    }

    pub fn set_output_encoding(&mut self, encoding: TextEncoding) {
        self.writer.set_encoding(encoding);
    }

    // -- Speaker --

    /// 800 Hz for 200 ms
    pub fn beep(&mut self) -> ConsoleResult<()> {
        self.beep_with(DEFAULT_FREQUENCY_HZ, DEFAULT_DURATION_MS)
    }

    /// Sounds a tone; silently does nothing without a speaker
    pub fn beep_with(&mut self, frequency_hz: u32, duration_ms: u32) -> ConsoleResult<()> {
        ConsoleError::check_range(
            "beep frequency",
            frequency_hz as usize,
            BEEP_FREQUENCY_MIN as usize,
            BEEP_FREQUENCY_MAX as usize,
        )?;
        ConsoleError::check_range("beep duration", duration_ms as usize, 1, u32::MAX as usize)?;

        match self.speaker.as_mut() {
            Some(speaker) => speaker.beep(frequency_hz, duration_ms),
            None => log::debug!("beep with no speaker attached"),
        }
        Ok(())
    }
}

/// Formatted text goes to standard output in the output encoding
impl<G: TextGrid, K: KeySource> fmt::Write for Console<G, K> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = self.writer.encoding().encode_str(s);
        self.stdout_write(&bytes).map(|_| ()).map_err(|_| fmt::Error)
    }
}

fn output_binding(streams: &mut StdStreams, stream: StdStream) -> ConsoleResult<&mut OutputBinding> {
    match stream {
        StdStream::Output => Ok(streams.output_mut()),
        StdStream::Error => Ok(streams.error_mut()),
        StdStream::Input => Err(ConsoleError::Unsupported("writing to standard input")),
    }
}

fn unsupported(operation: &'static str) -> ConsoleError {
    log::warn!("unsupported console operation: {}", operation);
    ConsoleError::Unsupported(operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::{SharedSink, TextInput};
    use hal::fake::{FakeKeySource, FakeTextGrid, RecordingSpeaker};
    use input_types::ConsoleKey;

    fn console(keys: &str) -> Console<FakeTextGrid, FakeKeySource> {
        Console::new(
            FakeTextGrid::new(80, 25),
            FakeKeySource::from_text(keys),
            ConsoleConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_applies_config() {
        let config = ConsoleConfig {
            foreground: Color::Green,
            cursor_size: 50,
            cursor_visible: false,
            mode: TextMode::Text40x25,
            ..ConsoleConfig::default()
        };
        let console = Console::new(FakeTextGrid::new(80, 25), FakeKeySource::new(), config).unwrap();

        assert_eq!(console.window_width(), 40);
        assert_eq!(console.foreground(), Color::Green);
        assert_eq!(console.background(), Color::Black);
        assert_eq!(console.cursor_size(), 50);
        assert!(!console.cursor_visible());
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = ConsoleConfig {
            cursor_size: 0,
            ..ConsoleConfig::default()
        };
        let result = Console::new(FakeTextGrid::new(80, 25), FakeKeySource::new(), config);
        assert!(matches!(result, Err(ConsoleError::Config(_))));
    }

    #[test]
    fn test_read_key_echo() {
        let mut console = console("ab");

        let event = console.read_key(false).unwrap().unwrap();
        assert_eq!(event.ch, 'a');
        assert_eq!(console.cursor_position(), (1, 0));

        let event = console.read_key(true).unwrap().unwrap();
        assert_eq!(event.ch, 'b');
        assert_eq!(console.cursor_position(), (1, 0));
        assert_eq!(console.writer().grid().row_text(0), "a");
    }

    #[test]
    fn test_read_key_null_unit_not_echoed() {
        let mut console = console("");
        console.editor_mut().keys_mut().push(KeyEvent::special(ConsoleKey::F5));

        let event = console.read_key(false).unwrap().unwrap();
        assert_eq!(event.key, ConsoleKey::F5);
        assert_eq!(console.cursor_position(), (0, 0));
    }

    #[test]
    fn test_read_key_replayed_not_echoed() {
        let mut console = console("x\n");
        assert_eq!(console.peek().unwrap(), Some('x'));
        assert_eq!(console.cursor_position(), (0, 1));

        let event = console.read_key(false).unwrap().unwrap();
        assert_eq!(event.ch, 'x');
        assert_eq!(console.cursor_position(), (0, 1));
    }

    #[test]
    fn test_read_key_rejected_when_redirected() {
        let mut console = console("a");
        console.set_in(InputBinding::redirected(TextInput::new("line\n")));

        assert!(matches!(
            console.read_key(false),
            Err(ConsoleError::InvalidState(_))
        ));
        assert_eq!(console.editor().keys().remaining(), 1);
    }

    #[test]
    fn test_cursor_setters_validate() {
        let mut console = console("");
        console.set_cursor_position(79, 24).unwrap();
        assert_eq!(console.cursor_position(), (79, 24));

        assert!(matches!(
            console.set_cursor_left(80),
            Err(ConsoleError::OutOfRange { what: "cursor left", value: 80, min: 0, max: 79 })
        ));
        assert!(console.set_cursor_top(25).is_err());
        assert!(console.set_cursor_position(0, 25).is_err());
        assert_eq!(console.cursor_position(), (79, 24));

        console.set_cursor_left(3).unwrap();
        console.set_cursor_top(4).unwrap();
        assert_eq!((console.cursor_left(), console.cursor_top()), (3, 4));
    }

    #[test]
    fn test_colors_and_reset() {
        let mut console = console("");
        console.set_foreground(Color::Red);
        console.set_background(Color::DarkBlue);
        assert_eq!(console.foreground(), Color::Red);

        console.reset_color();
        assert_eq!(console.foreground(), Color::White);
        assert_eq!(console.background(), Color::Black);
    }

    #[test]
    fn test_window_size_presets() {
        let mut console = console("");
        console.stdout_write(b"keep").unwrap();

        let err = console.set_window_size(100, 40).unwrap_err();
        assert_eq!(err, ConsoleError::UnsupportedWindowSize { width: 100, height: 40 });
        assert_eq!(console.writer().grid().row_text(0), "keep");

        console.set_window_size(90, 30).unwrap();
        assert_eq!((console.window_width(), console.window_height()), (90, 30));
        assert_eq!(console.cursor_position(), (0, 0));
    }

    #[test]
    fn test_unsupported_operations() {
        let mut console = console("");
        assert_eq!(
            console.set_buffer_size(80, 25),
            Err(ConsoleError::Unsupported("set_buffer_size"))
        );
        assert!(console.move_buffer_area(0, 0, 1, 1, 2, 2).is_err());
        assert!(console.set_window_position(0, 0).is_err());
        assert!(console.title().is_err());
        assert!(console.set_title("panda").is_err());
    }

    #[test]
    fn test_beep() {
        let mut console = console("");
        assert!(console.beep().is_ok());

        let speaker = RecordingSpeaker::new();
        let mut console = console.with_speaker(speaker.clone());
        console.beep().unwrap();
        console.beep_with(440, 50).unwrap();
        assert!(console.beep_with(20, 50).is_err());
        assert!(console.beep_with(440, 0).is_err());

        assert_eq!(speaker.tones(), [(800, 200), (440, 50)]);
    }

    #[test]
    fn test_fmt_write_goes_to_stdout() {
        use core::fmt::Write;

        let mut console = console("");
        write!(console, "{} + {}", 1, 2).unwrap();
        assert_eq!(console.writer().grid().row_text(0), "1 + 2");

        let sink = SharedSink::new();
        console.set_out(OutputBinding::redirected(sink.clone()));
        writeln!(console, "elsewhere").unwrap();
        assert_eq!(sink.text(), "elsewhere\n");
        assert_eq!(console.writer().grid().row_text(1), "");
    }
}
