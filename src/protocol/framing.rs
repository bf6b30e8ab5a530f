//! Line framing
//!
//! Splits the raw inbound byte stream of a connection into text lines.

use crate::error::FramingError;

/// Accumulates raw bytes and yields complete newline-terminated lines.
///
/// A trailing `\r` is stripped, blank lines are skipped and invalid UTF-8 is
/// replaced rather than rejected. A line longer than `max_line_length` bytes
/// (terminator excluded) is a framing error.
pub struct LineFramer {
    buffer: Vec<u8>,
    max_line_length: usize,
}

impl LineFramer {
    pub fn new(max_line_length: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(max_line_length),
            max_line_length,
        }
    }

    /// Appends freshly read bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Returns the next complete line, or `None` if more bytes are needed.
    pub fn next_line(&mut self) -> Result<Option<String>, FramingError> {
        loop {
            let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') else {
                // A trailing `\r` may still be followed by its `\n`.
                self.check_length(strip_line_ending(&self.buffer).len())?;
                return Ok(None);
            };

            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let content = strip_line_ending(&raw);
            self.check_length(content.len())?;

            if let Some(line) = decode(content) {
                return Ok(Some(line));
            }
        }
    }

    /// Drains whatever unterminated text is left once the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        let content = strip_line_ending(&rest);
        if content.len() > self.max_line_length {
            return None;
        }
        decode(content)
    }

    /// Number of buffered bytes not yet returned as a line.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn check_length(&self, length: usize) -> Result<(), FramingError> {
        if length > self.max_line_length {
            return Err(FramingError::LineTooLong {
                limit: self.max_line_length,
                length,
            });
        }
        Ok(())
    }
}

fn strip_line_ending(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

fn decode(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    if text.trim().is_empty() {
        None
    } else {
        Some(text.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(framer: &mut LineFramer) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = framer.next_line().unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_splits_lines_across_reads() {
        let mut framer = LineFramer::new(64);

        framer.extend(b"hel");
        assert_eq!(framer.next_line().unwrap(), None);

        framer.extend(b"lo\r\nworld\nand");
        assert_eq!(drain(&mut framer), vec!["hello", "world"]);
        assert_eq!(framer.pending(), 3);
        assert_eq!(framer.finish(), Some("and".to_string()));
        assert_eq!(framer.pending(), 0);
    }

    #[test]
    fn test_skips_blank_lines() {
        let mut framer = LineFramer::new(64);
        framer.extend(b"\n\r\n   \nhi\n");
        assert_eq!(drain(&mut framer), vec!["hi"]);
        assert_eq!(framer.finish(), None);
    }

    #[test]
    fn test_rejects_oversized_line() {
        let mut framer = LineFramer::new(4);
        framer.extend(b"ok\ntoolong\n");

        assert_eq!(framer.next_line().unwrap(), Some("ok".to_string()));
        assert_eq!(
            framer.next_line(),
            Err(FramingError::LineTooLong {
                limit: 4,
                length: 7
            })
        );
    }

    #[test]
    fn test_rejects_unterminated_overflow() {
        let mut framer = LineFramer::new(4);
        framer.extend(b"abcdef");
        assert!(framer.next_line().is_err());
    }

    #[test]
    fn test_carriage_return_split_across_reads() {
        let mut framer = LineFramer::new(4);

        framer.extend(b"abcd\r");
        assert_eq!(framer.next_line(), Ok(None));

        framer.extend(b"\n");
        assert_eq!(framer.next_line(), Ok(Some("abcd".to_string())));
    }

    #[test]
    fn test_finish_strips_carriage_return_before_limit() {
        let mut framer = LineFramer::new(4);
        framer.extend(b"abcd\r");
        assert_eq!(framer.finish(), Some("abcd".to_string()));
    }

    #[test]
    fn test_replaces_invalid_utf8() {
        let mut framer = LineFramer::new(64);
        framer.extend(b"caf\xff\n");
        assert_eq!(framer.next_line().unwrap(), Some("caf\u{fffd}".to_string()));
    }
}
