/// Cursor over an already buffered command line.
///
/// The compiler never blocks on a source: everything it can read is already
/// there, and `None` means the line is over.
pub trait CharSource {
    /// Returns the character `offset` positions ahead without consuming it.
    fn peek(&self, offset: usize) -> Option<char>;

    /// Drops the next `n` characters.
    fn discard(&mut self, n: usize);

    /// Consumes and returns the next character.
    fn remove(&mut self) -> Option<char>;

    /// Number of characters consumed so far.
    fn position(&self) -> usize;
}

/// [`CharSource`] over a string slice.
#[derive(Debug, Clone)]
pub struct LineCursor {
    chars: Vec<char>,
    index: usize,
}

impl LineCursor {
    pub fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            index: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// The part of the line not consumed yet.
    pub fn rest(&self) -> String {
        self.chars[self.index..].iter().collect()
    }
}

impl CharSource for LineCursor {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn discard(&mut self, n: usize) {
        self.index = (self.index + n).min(self.chars.len());
    }

    fn remove(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.index += 1;
        Some(c)
    }

    fn position(&self) -> usize {
        self.index
    }
}
