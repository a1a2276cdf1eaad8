//! Line reassembly across chunk boundaries
//!
//! Chunks arrive with no alignment to lines, or to UTF-8 character
//! boundaries. Bytes are carried over until a `\n` completes the line.
//! A line longer than the buffer's limit is discarded up to its `\n`.

use tracing::warn;

/// Upper bound on one buffered line.
pub const DEFAULT_MAX_LINE: usize = 1024 * 1024;

#[derive(Debug)]
pub struct LineBuffer {
    carry: Vec<u8>,
    max_line: usize,
    /// Inside an oversized line, dropping bytes until the next `\n`.
    discarding: bool,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_max_line(DEFAULT_MAX_LINE)
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            carry: Vec::new(),
            max_line,
            discarding: false,
        }
    }

    /// Append a chunk and drain every complete line, without its `\n` or a
    /// trailing `\r`. The incomplete tail stays buffered.
    ///
    /// Only the new chunk is scanned, so a line spread over many chunks
    /// costs time linear in its length.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let head = &rest[..pos];
            rest = &rest[pos + 1..];

            if self.discarding {
                self.discarding = false;
                continue;
            }
            if self.carry.len() + head.len() > self.max_line {
                warn!(
                    "dropping oversized line ({} bytes)",
                    self.carry.len() + head.len()
                );
                self.carry.clear();
                continue;
            }
            self.carry.extend_from_slice(head);
            lines.push(decode_line(&self.carry));
            self.carry.clear();
        }

        if !self.discarding {
            if self.carry.len() + rest.len() > self.max_line {
                warn!("dropping oversized line (over {} bytes)", self.max_line);
                self.carry = Vec::new();
                self.discarding = true;
            } else {
                self.carry.extend_from_slice(rest);
            }
        }

        lines
    }

    /// Take the unterminated tail at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        self.discarding = false;
        if self.carry.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.carry);
        Some(decode_line(&rest))
    }

    pub fn pending(&self) -> usize {
        self.carry.len()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
