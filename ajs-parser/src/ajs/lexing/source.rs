//! Line sources
//!
//! A [`LineSource`] hands out one physical line at a time, split off its terminator.
//! `\r\n`, a bare `\r` and a bare `\n` all end a line; the terminator is kept so the
//! stream can report the rest of a line exactly as written.

use encoding_rs::{Encoding, UTF_8};
use std::collections::VecDeque;
use std::io::{self, BufRead};

/// One physical line and the terminator that ended it (empty on the last line of a
/// source that does not end with a line break)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub content: String,
    pub terminator: &'static str,
}

impl SourceLine {
    pub fn new(content: impl Into<String>, terminator: &'static str) -> Self {
        Self {
            content: content.into(),
            terminator,
        }
    }
}

/// Something that yields source text line by line
pub trait LineSource {
    /// The next line, or `None` once the source is exhausted.
    fn next_line(&mut self) -> io::Result<Option<SourceLine>>;
}

fn is_line_break(ch: char) -> bool {
    ch == '\r' || ch == '\n'
}

/// Lines of text already held in memory
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        Self { text, offset: 0 }
    }
}

impl LineSource for StrSource<'_> {
    fn next_line(&mut self) -> io::Result<Option<SourceLine>> {
        if self.offset >= self.text.len() {
            return Ok(None);
        }
        let rest = &self.text[self.offset..];
        let line = match rest.find(is_line_break) {
            None => {
                self.offset = self.text.len();
                SourceLine::new(rest, "")
            }
            Some(end) => {
                let terminator = if rest[end..].starts_with("\r\n") {
                    "\r\n"
                } else if rest[end..].starts_with('\r') {
                    "\r"
                } else {
                    "\n"
                };
                self.offset += end + terminator.len();
                SourceLine::new(&rest[..end], terminator)
            }
        };
        Ok(Some(line))
    }
}

/// Lines read from a byte stream and decoded with an explicit encoding
///
/// Only ASCII-compatible encodings are accepted (UTF-8, Shift_JIS, EUC-JP, the
/// single-byte code pages): their line break bytes never occur inside a multi-byte
/// character, so lines can be split before decoding. Each line is decoded when it is
/// handed out, so a decoding failure belongs to the line that holds the bad bytes.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    encoding: &'static Encoding,
    pending: VecDeque<(Vec<u8>, &'static str)>,
    buffer: Vec<u8>,
    at_start: bool,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R, encoding: &'static Encoding) -> io::Result<Self> {
        if !encoding.is_ascii_compatible() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("encoding {} is not ASCII-compatible", encoding.name()),
            ));
        }
        Ok(Self {
            reader,
            encoding,
            pending: VecDeque::new(),
            buffer: Vec::new(),
            at_start: true,
        })
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Read one `\n`-terminated chunk and split it at every line break it holds.
    fn fill(&mut self) -> io::Result<bool> {
        let mut buffer = std::mem::take(&mut self.buffer);
        buffer.clear();
        let result = self.split_chunk(&mut buffer);
        self.buffer = buffer;
        result
    }

    fn split_chunk(&mut self, buffer: &mut Vec<u8>) -> io::Result<bool> {
        if self.reader.read_until(b'\n', buffer)? == 0 {
            return Ok(false);
        }
        let mut bytes = buffer.as_slice();
        if self.at_start {
            self.at_start = false;
            if self.encoding == UTF_8 {
                bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            }
        }
        let mut start = 0;
        let mut index = 0;
        while index < bytes.len() {
            let terminator = match bytes[index] {
                b'\r' if bytes.get(index + 1) == Some(&b'\n') => "\r\n",
                b'\r' => "\r",
                b'\n' => "\n",
                _ => {
                    index += 1;
                    continue;
                }
            };
            self.pending.push_back((bytes[start..index].to_vec(), terminator));
            index += terminator.len();
            start = index;
        }
        if start < bytes.len() {
            self.pending.push_back((bytes[start..].to_vec(), ""));
        }
        Ok(true)
    }
}

fn decode(encoding: &'static Encoding, bytes: &[u8]) -> io::Result<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("input is not valid {}", encoding.name()),
            )
        })
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> io::Result<Option<SourceLine>> {
        loop {
            if let Some((bytes, terminator)) = self.pending.pop_front() {
                let content = decode(self.encoding, &bytes)?;
                return Ok(Some(SourceLine::new(content, terminator)));
            }
            if !self.fill()? {
                return Ok(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, UTF_16LE};
    use std::io::Cursor;

    fn collect<S: LineSource>(mut source: S) -> Vec<SourceLine> {
        let mut lines = Vec::new();
        while let Some(line) = source.next_line().unwrap() {
            lines.push(line);
        }
        lines
    }

    fn expected() -> Vec<SourceLine> {
        vec![
            SourceLine::new("a", "\r\n"),
            SourceLine::new("b", "\r"),
            SourceLine::new("c", "\n"),
            SourceLine::new("d", ""),
        ]
    }

    #[test]
    fn test_str_source_splits_every_break_form() {
        assert_eq!(collect(StrSource::new("a\r\nb\rc\nd")), expected());
        assert_eq!(collect(StrSource::new("x\n\n")).len(), 2);
        assert!(collect(StrSource::new("")).is_empty());
    }

    #[test]
    fn test_reader_source_matches_str_source() {
        let source = ReaderSource::new(Cursor::new(b"a\r\nb\rc\nd".to_vec()), UTF_8).unwrap();
        assert_eq!(collect(source), expected());
    }

    #[test]
    fn test_reader_source_strips_utf8_bom() {
        let source = ReaderSource::new(Cursor::new(b"\xEF\xBB\xBFty=n;\n".to_vec()), UTF_8).unwrap();
        assert_eq!(collect(source), vec![SourceLine::new("ty=n;", "\n")]);
    }

    #[test]
    fn test_reader_source_decodes_shift_jis() {
        let (bytes, _, _) = SHIFT_JIS.encode("cm=\"日次バッチ\";\n");
        let source = ReaderSource::new(Cursor::new(bytes.into_owned()), SHIFT_JIS).unwrap();
        assert_eq!(collect(source), vec![SourceLine::new("cm=\"日次バッチ\";", "\n")]);
    }

    #[test]
    fn test_reader_source_rejects_invalid_bytes_and_wide_encodings() {
        let mut source = ReaderSource::new(Cursor::new(vec![0xFF, 0xFE, b'\n']), UTF_8).unwrap();
        let err = source.next_line().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err = ReaderSource::new(Cursor::new(Vec::new()), UTF_16LE).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_invalid_bytes_fail_on_their_own_line() {
        let bytes = b"unit=A,,,;{\rty=\xFF;}\n".to_vec();
        let mut source = ReaderSource::new(Cursor::new(bytes), UTF_8).unwrap();
        assert_eq!(
            source.next_line().unwrap(),
            Some(SourceLine::new("unit=A,,,;{", "\r"))
        );
        let err = source.next_line().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
