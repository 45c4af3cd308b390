//! The scrolling text shown to the user: received lines and inline errors.

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Data,
    Error,
}

/// One visible line with the time it was appended.
#[derive(Debug, Clone)]
pub struct DisplayLine {
    pub when: DateTime<Local>,
    pub kind: LineKind,
    pub text: String,
}

impl DisplayLine {
    pub fn data(text: impl Into<String>) -> Self {
        Self {
            when: Local::now(),
            kind: LineKind::Data,
            text: text.into(),
        }
    }

    /// An inline error, rendered as `Error: <message>`.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            when: Local::now(),
            kind: LineKind::Error,
            text: format!("Error: {message}"),
        }
    }
}

/// Append-only line buffer. Without a cap it grows for the whole session;
/// with one, the oldest lines are evicted.
#[derive(Debug, Default)]
pub struct DisplayBuffer {
    lines: Vec<DisplayLine>,
    max_lines: Option<usize>,
    evicted: usize,
}

impl DisplayBuffer {
    pub fn new(max_lines: Option<usize>) -> Self {
        Self {
            lines: Vec::new(),
            max_lines: max_lines.filter(|&n| n > 0),
            evicted: 0,
        }
    }

    pub fn push(&mut self, line: DisplayLine) {
        self.lines.push(line);

        if let Some(max) = self.max_lines {
            if self.lines.len() > max {
                let excess = self.lines.len() - max;
                self.lines.drain(0..excess);
                self.evicted += excess;
            }
        }
    }

    pub fn push_data(&mut self, text: impl Into<String>) {
        self.push(DisplayLine::data(text));
    }

    pub fn push_error(&mut self, message: impl std::fmt::Display) {
        self.push(DisplayLine::error(message));
    }

    pub fn lines(&self) -> &[DisplayLine] {
        &self.lines
    }

    /// Just the text, oldest first.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    pub fn last(&self) -> Option<&DisplayLine> {
        self.lines.last()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines dropped by the cap so far.
    pub fn evicted(&self) -> usize {
        self.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_buffer_keeps_everything_in_order() {
        let mut buf = DisplayBuffer::new(None);
        for i in 0..500 {
            buf.push_data(format!("line {i}"));
        }
        assert_eq!(buf.len(), 500);
        assert_eq!(buf.lines()[0].text, "line 0");
        assert_eq!(buf.last().unwrap().text, "line 499");
        assert_eq!(buf.evicted(), 0);
    }

    #[test]
    fn cap_evicts_oldest() {
        let mut buf = DisplayBuffer::new(Some(3));
        for text in ["a", "b", "c", "d", "e"] {
            buf.push_data(text);
        }
        assert_eq!(buf.texts(), vec!["c", "d", "e"]);
        assert_eq!(buf.evicted(), 2);
    }

    #[test]
    fn zero_cap_means_uncapped() {
        let mut buf = DisplayBuffer::new(Some(0));
        buf.push_data("x");
        buf.push_data("y");
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn errors_are_prefixed() {
        let mut buf = DisplayBuffer::new(None);
        buf.push_error("no such device");
        let line = buf.last().unwrap();
        assert_eq!(line.kind, LineKind::Error);
        assert_eq!(line.text, "Error: no such device");
    }
}
