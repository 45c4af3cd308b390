/// Longest line kept pending before it is emitted without a terminator.
pub const MAX_PENDING_LINE: usize = 64 * 1024;

/// Splits a raw byte stream into newline-terminated text lines.
///
/// Lines are decoded as UTF-8 with invalid sequences replaced by U+FFFD, and
/// trailing whitespace (including the `\r` of CRLF devices) is stripped.
/// Bytes after the last `\n` stay pending until more data arrives.
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(256),
        }
    }

    /// Feed a chunk and return the lines it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                lines.push(decode_line(&self.pending));
                self.pending.clear();
            } else {
                self.pending.push(byte);
                if self.pending.len() >= MAX_PENDING_LINE {
                    log::warn!(
                        "line exceeded {MAX_PENDING_LINE} bytes without a terminator, emitting it as-is"
                    );
                    let cut = self.pending.len() - incomplete_tail(&self.pending);
                    lines.push(decode_line(&self.pending[..cut]));
                    self.pending.drain(..cut);
                }
            }
        }
        lines
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Bytes at the end of `buf` that start a UTF-8 sequence still missing its
/// continuation bytes. A forced cut happens before them.
fn incomplete_tail(buf: &[u8]) -> usize {
    for back in 1..=buf.len().min(3) {
        let byte = buf[buf.len() - back];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let needed = match byte {
            0xF0..=0xFF => 4,
            0xE0..=0xEF => 3,
            0xC0..=0xDF => 2,
            _ => 1,
        };
        return if needed > back { back } else { 0 };
    }
    0
}

fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_newline_and_strips_crlf() {
        let mut asm = LineAssembler::new();
        assert_eq!(asm.push(b"hello\r\nworld\n"), vec!["hello", "world"]);
        assert_eq!(asm.pending_len(), 0);
    }

    #[test]
    fn keeps_partial_line_until_terminated() {
        let mut asm = LineAssembler::new();
        assert!(asm.push(b"tem").is_empty());
        assert!(asm.push(b"p=21.5").is_empty());
        assert_eq!(asm.pending_len(), 9);
        assert_eq!(asm.push(b"\nnext"), vec!["temp=21.5"]);
        assert_eq!(asm.pending_len(), 4);
    }

    #[test]
    fn empty_lines_are_kept() {
        let mut asm = LineAssembler::new();
        assert_eq!(asm.push(b"\n  \n"), vec!["", ""]);
    }

    #[test]
    fn leading_whitespace_is_preserved() {
        let mut asm = LineAssembler::new();
        assert_eq!(asm.push(b"  indented \t\n"), vec!["  indented"]);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_dropped() {
        let mut asm = LineAssembler::new();
        let lines = asm.push(b"ok\xff\xfeend\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("ok"));
        assert!(lines[0].ends_with("end"));
        assert!(lines[0].contains('\u{FFFD}'));
    }

    #[test]
    fn overlong_line_is_flushed() {
        let mut asm = LineAssembler::new();
        let chunk = vec![b'x'; MAX_PENDING_LINE + 10];
        let lines = asm.push(&chunk);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), MAX_PENDING_LINE);
        assert_eq!(asm.pending_len(), 10);
    }

    #[test]
    fn forced_cut_keeps_multibyte_char_whole() {
        let mut asm = LineAssembler::new();
        let mut chunk = vec![b'x'; MAX_PENDING_LINE - 1];
        chunk.extend_from_slice("é\n".as_bytes());
        let lines = asm.push(&chunk);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), MAX_PENDING_LINE - 1);
        assert!(!lines[0].contains('\u{FFFD}'));
        assert_eq!(lines[1], "é");
        assert_eq!(asm.pending_len(), 0);
    }

    #[test]
    fn forced_cut_with_four_byte_char() {
        let mut asm = LineAssembler::new();
        let mut chunk = vec![b'x'; MAX_PENDING_LINE - 2];
        chunk.extend_from_slice("🦀ok\n".as_bytes());
        let lines = asm.push(&chunk);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "x".repeat(MAX_PENDING_LINE - 2));
        assert_eq!(lines[1], "🦀ok");
    }
}
