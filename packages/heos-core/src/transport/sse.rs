//! Incremental `text/event-stream` decoder.
//!
//! Bytes arrive in arbitrary chunks; only complete lines are interpreted.
//! `data:` lines accumulate until a blank line dispatches them as one message.

/// Stateful decoder for one event-stream connection.
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the current, not yet terminated line.
    line: Vec<u8>,
    /// `data` field values of the event being assembled.
    data: Vec<String>,
    /// `event` field of the event being assembled.
    event_type: Option<String>,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every message it completed, in order.
    ///
    /// Only unnamed and `message` events are returned. CRLF line endings are
    /// accepted.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut messages = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                let mut line = std::mem::take(&mut self.line);
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                if let Some(message) = self.process_line(&String::from_utf8_lossy(&line)) {
                    messages.push(message);
                }
            } else {
                self.line.push(byte);
            }
        }
        messages
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event_type = Some(value.to_string()),
            // id and retry only matter to a reconnecting browser
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        let event_type = self.event_type.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        match event_type.as_deref() {
            None | Some("") | Some("message") => Some(data),
            Some(other) => {
                log::trace!("[EventStream] Skipping '{}' event", other);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_blank_line() {
        let mut d = SseDecoder::new();
        assert!(d.push(b"data: {\"a\":1}\n").is_empty());
        assert_eq!(d.push(b"\n"), vec![r#"{"a":1}"#.to_string()]);
    }

    #[test]
    fn joins_multiline_data() {
        let mut d = SseDecoder::new();
        let out = d.push(b"data: first\ndata:second\n\n");
        assert_eq!(out, vec!["first\nsecond".to_string()]);
    }

    #[test]
    fn handles_split_chunks_and_crlf() {
        let mut d = SseDecoder::new();
        assert!(d.push(b"da").is_empty());
        assert!(d.push(b"ta: he").is_empty());
        assert!(d.push(b"llo\r").is_empty());
        assert_eq!(d.push(b"\n\r\n"), vec!["hello".to_string()]);
    }

    #[test]
    fn keeps_multibyte_characters_split_across_chunks() {
        let mut d = SseDecoder::new();
        let text = "data: Sigur Rós\n\n".as_bytes();
        let (a, b) = text.split_at(14);
        assert!(d.push(a).is_empty());
        assert_eq!(d.push(b), vec!["Sigur Rós".to_string()]);
    }

    #[test]
    fn ignores_comments_and_empty_events() {
        let mut d = SseDecoder::new();
        let out = d.push(b": keep-alive\n\nid: 4\nretry: 100\n\ndata: x\n\n");
        assert_eq!(out, vec!["x".to_string()]);
    }

    #[test]
    fn skips_named_events() {
        let mut d = SseDecoder::new();
        let out = d.push(b"event: ping\ndata: 1\n\nevent: message\ndata: 2\n\ndata: 3\n\n");
        assert_eq!(out, vec!["2".to_string(), "3".to_string()]);
    }
}
