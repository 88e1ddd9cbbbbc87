//! Byte-exact line splitting with universal-newline semantics.
//!
//! Lines end at CRLF, LF or a lone CR; the final line may be
//! unterminated. Terminators stay attached to the yielded bytes so a
//! consumer can write the stream back out unchanged.

use std::collections::VecDeque;
use std::io::{self, BufRead};

/// End-of-line marker of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    CrLf,
    Lf,
    Cr,
    None,
}

impl LineEnding {
    /// Detect the terminator of a raw line
    pub fn detect(line: &[u8]) -> Self {
        if line.ends_with(b"\r\n") {
            LineEnding::CrLf
        } else if line.ends_with(b"\n") {
            LineEnding::Lf
        } else if line.ends_with(b"\r") {
            LineEnding::Cr
        } else {
            LineEnding::None
        }
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::CrLf => b"\r\n",
            LineEnding::Lf => b"\n",
            LineEnding::Cr => b"\r",
            LineEnding::None => b"",
        }
    }
}

/// Split a raw line into its body and terminator
pub fn split_line_ending(line: &[u8]) -> (&[u8], LineEnding) {
    let ending = LineEnding::detect(line);
    let body = &line[..line.len() - ending.as_bytes().len()];
    (body, ending)
}

/// Iterator over raw lines of a reader, terminators included
pub struct RawLines<R> {
    reader: R,
    pending: VecDeque<Vec<u8>>,
    done: bool,
}

impl<R: BufRead> RawLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Pull the next LF-terminated chunk and split it at lone CRs
    fn fill(&mut self) -> io::Result<()> {
        let mut chunk = Vec::new();
        if self.reader.read_until(b'\n', &mut chunk)? == 0 {
            self.done = true;
            return Ok(());
        }

        // read_until stops only at LF or EOF, so a CR followed by LF can
        // only sit at the very end of the chunk.
        let mut start = 0;
        for (i, &byte) in chunk.iter().enumerate() {
            if byte == b'\r' && chunk.get(i + 1) != Some(&b'\n') {
                self.pending.push_back(chunk[start..=i].to_vec());
                start = i + 1;
            }
        }
        if start < chunk.len() {
            self.pending.push_back(chunk[start..].to_vec());
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pending.is_empty() && !self.done {
            if let Err(e) = self.fill() {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.pending.pop_front().map(Ok)
    }
}

/// Split decoded text into lines without terminators.
///
/// Same boundaries as [`RawLines`], for text that is already in memory.
pub fn text_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}
