/// Characters typed after `:` in ex mode. The `:` prompt itself is not stored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExLineBuffer {
    buf: String,
}

impl ExLineBuffer {
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn push(&mut self, ch: char) {
        self.buf.push(ch);
    }

    /// Remove the last character. Returns false when there was nothing to remove.
    pub fn backspace(&mut self) -> bool {
        self.buf.pop().is_some()
    }

    /// Hand over the completed command, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Text shown on the command line: the prompt plus what was typed.
    pub fn display(&self) -> String {
        format!(":{}", self.buf)
    }
}
