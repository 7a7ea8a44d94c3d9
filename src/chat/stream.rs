//! Incremental decoder for the backend's `data: `-prefixed record stream.
//!
//! Reads arrive in arbitrary byte chunks. Complete lines are decoded as soon
//! as their newline arrives; a trailing partial line waits in the buffer
//! for the next chunk (or for [`RecordDecoder::finish`] at end of stream).

use log::debug;

use super::types::StreamRecord;

/// Marker that makes a line a candidate record.
pub const DATA_PREFIX: &str = "data: ";

/// Parses one line. Returns `None` for lines without the `data: ` prefix and
/// for payloads that aren't a valid record.
pub fn parse_line(line: &str) -> Option<StreamRecord> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let payload = line.strip_prefix(DATA_PREFIX)?;

    match serde_json::from_str::<StreamRecord>(payload) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!("Discarding malformed record ({}): {}", e, payload);
            None
        }
    }
}

/// Buffers raw bytes and yields records for every completed line.
#[derive(Debug, Default)]
pub struct RecordDecoder {
    // Bytes, not String: a chunk may end in the middle of a UTF-8 sequence.
    buffer: Vec<u8>,
}

impl RecordDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns the records completed by it, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamRecord> {
        self.buffer.extend_from_slice(chunk);

        let mut records = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..pos]);
            records.extend(parse_line(&line));
        }
        records
    }

    /// Flushes a final line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<StreamRecord> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        parse_line(&String::from_utf8_lossy(&rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(text: &str) -> StreamRecord {
        StreamRecord::Content {
            content: text.into(),
        }
    }

    #[test]
    fn parse_line_requires_prefix() {
        assert_eq!(parse_line(r#"{"type":"done"}"#), None);
        assert_eq!(parse_line(r#"event: {"type":"done"}"#), None);
        assert_eq!(parse_line(r#"data:{"type":"done"}"#), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line(r#"data: {"type":"done"}"#), Some(StreamRecord::Done));
    }

    #[test]
    fn parse_line_tolerates_crlf() {
        assert_eq!(
            parse_line("data: {\"type\":\"done\"}\r"),
            Some(StreamRecord::Done)
        );
    }

    #[test]
    fn parse_line_discards_invalid_json() {
        assert_eq!(parse_line(r#"data: {"type":"content","content":"#), None);
        assert_eq!(parse_line("data: not json"), None);
    }

    #[test]
    fn decoder_yields_records_in_order() {
        let mut decoder = RecordDecoder::new();
        let records = decoder.push(
            b"data: {\"type\":\"content\",\"content\":\"Hello\"}\n\n\
              data: {\"type\":\"content\",\"content\":\" world\"}\n\n",
        );
        assert_eq!(records, vec![content("Hello"), content(" world")]);
    }

    #[test]
    fn decoder_reassembles_lines_split_across_reads() {
        let mut decoder = RecordDecoder::new();
        assert!(decoder.push(b"data: {\"type\":\"content\",").is_empty());
        assert_eq!(
            decoder.push(b"\"content\":\"Hi\"}\ndata: {\"type\":\"do"),
            vec![content("Hi")]
        );
        assert_eq!(decoder.push(b"ne\"}\n"), vec![StreamRecord::Done]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn decoder_handles_multibyte_split() {
        let line = "data: {\"type\":\"content\",\"content\":\"café\"}\n".as_bytes();
        // Split inside the two-byte 'é'
        let split = line.iter().position(|&b| b == 0xC3).unwrap() + 1;
        let mut decoder = RecordDecoder::new();
        assert!(decoder.push(&line[..split]).is_empty());
        assert_eq!(decoder.push(&line[split..]), vec![content("café")]);
    }

    #[test]
    fn malformed_line_does_not_stop_later_lines() {
        let mut decoder = RecordDecoder::new();
        let records = decoder.push(
            b"data: {broken\n\
              data: {\"type\":\"content\",\"content\":\"ok\"}\n",
        );
        assert_eq!(records, vec![content("ok")]);
    }

    #[test]
    fn finish_flushes_unterminated_line() {
        let mut decoder = RecordDecoder::new();
        assert!(decoder.push(b"data: {\"type\":\"done\"}").is_empty());
        assert_eq!(decoder.finish(), Some(StreamRecord::Done));
        assert_eq!(decoder.finish(), None);
    }
}
