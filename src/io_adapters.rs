use crate::error::SessionError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, Result as IoResult, Write};
use std::rc::Rc;

/// A blocking source of input lines.
///
/// `next_line` shows `prompt`, waits for one line and returns it without the
/// line terminator. `Ok(None)` means the source is exhausted; a source that
/// cannot be read any more reports [`SessionError::StreamFailure`].
pub trait LineSource {
    fn next_line(&mut self, prompt: &str, out: &mut dyn Write) -> Result<Option<String>, SessionError>;
}

/// Line source over any buffered reader (standard input, a file, a byte slice).
///
/// The prompt is written to the console before each read.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self, prompt: &str, out: &mut dyn Write) -> Result<Option<String>, SessionError> {
        write!(out, "{}", prompt)?;
        out.flush()?;

        read_lossy_line(&mut self.reader)
    }
}

/// Read one line from `reader`, without its terminator.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// garbled line still reaches the parser and is reported as an invalid
/// command. Only a failing reader is a [`SessionError::StreamFailure`].
pub fn read_lossy_line<R: BufRead + ?Sized>(reader: &mut R) -> Result<Option<String>, SessionError> {
    let mut raw = Vec::new();
    match reader.read_until(b'\n', &mut raw) {
        Ok(0) => Ok(None),
        Ok(_) => {
            while matches!(raw.last(), Some(b'\n' | b'\r')) {
                raw.pop();
            }
            Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
        }
        Err(e) => Err(SessionError::StreamFailure(e.to_string())),
    }
}

/// Interactive line source backed by `rustyline`, with history.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self, SessionError> {
        let editor = DefaultEditor::new().map_err(|e| SessionError::StreamFailure(e.to_string()))?;
        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn next_line(&mut self, prompt: &str, out: &mut dyn Write) -> Result<Option<String>, SessionError> {
        // Anything buffered must reach the terminal before the editor draws.
        out.flush()?;
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    // History is a convenience; failing to record it is not fatal.
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(err) => Err(SessionError::StreamFailure(err.to_string())),
        }
    }
}

/// Pre-recorded lines, handed out one per read. Used to drive sessions in tests
/// and by embedders that feed commands programmatically.
pub struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedSource {
    fn next_line(&mut self, prompt: &str, out: &mut dyn Write) -> Result<Option<String>, SessionError> {
        write!(out, "{}", prompt)?;
        Ok(self.lines.pop_front())
    }
}

/// Memory-backed writer for capturing console output.
#[derive(Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// Public constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    #[test]
    fn test_reader_source_strips_terminators_and_writes_prompt() {
        let mut src = ReaderSource::new(Cursor::new(b"first\r\nsecond\n".to_vec()));
        let mut out = Vec::new();
        assert_eq!(src.next_line("> ", &mut out).unwrap(), Some("first".to_string()));
        assert_eq!(src.next_line("> ", &mut out).unwrap(), Some("second".to_string()));
        assert_eq!(src.next_line("> ", &mut out).unwrap(), None);
        assert_eq!(String::from_utf8(out).unwrap(), "> > > ");
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device gone"))
        }
    }

    #[test]
    fn test_reader_source_reports_stream_failure() {
        let mut src = ReaderSource::new(io::BufReader::new(Broken));
        let err = src.next_line("", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, SessionError::StreamFailure(_)));
    }

    #[test]
    fn test_invalid_utf8_line_is_decoded_lossily() {
        let mut src = ReaderSource::new(Cursor::new(b"add element root caf\xe9\nnext\n".to_vec()));
        let mut out = Vec::new();
        assert_eq!(
            src.next_line("", &mut out).unwrap(),
            Some("add element root caf\u{FFFD}".to_string())
        );
        assert_eq!(src.next_line("", &mut out).unwrap(), Some("next".to_string()));
    }

    #[test]
    fn test_read_lossy_line_without_trailing_newline() {
        let mut reader: &[u8] = b"last";
        assert_eq!(read_lossy_line(&mut reader).unwrap(), Some("last".to_string()));
        assert_eq!(read_lossy_line(&mut reader).unwrap(), None);
    }

    #[test]
    fn test_scripted_source_hands_out_lines_in_order() {
        let mut src = ScriptedSource::new(["a", "b"]);
        let mut out = Vec::new();
        assert_eq!(src.next_line("", &mut out).unwrap().as_deref(), Some("a"));
        assert_eq!(src.next_line("", &mut out).unwrap().as_deref(), Some("b"));
        assert_eq!(src.next_line("", &mut out).unwrap(), None);
    }

    #[test]
    fn test_mem_writer_shares_buffer() {
        let (mut w, handle) = MemWriter::with_handle();
        write!(w, "hello").unwrap();
        assert_eq!(handle.borrow().as_slice(), b"hello");
    }
}
