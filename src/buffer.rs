use std::fmt;

pub const BUF_SIZE: usize = 500;

/// Fixed-capacity text buffer. Holds at most `BUF_SIZE - 1` bytes; anything
/// written past that is dropped without error.
pub struct MessageBuffer {
    data: [u8; BUF_SIZE],
    len: usize,
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self {
            data: [0; BUF_SIZE],
            len: 0,
        }
    }

    pub fn format(args: fmt::Arguments<'_>) -> Self {
        let mut buf = Self::new();
        // Never fails, but a Display impl may still return Err midway.
        let _ = fmt::write(&mut buf, args);
        buf
    }

    pub fn capacity(&self) -> usize {
        BUF_SIZE - 1
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.as_ref()).unwrap_or_default()
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for MessageBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl fmt::Write for MessageBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.capacity() - self.len;
        let mut end = s.len().min(room);
        while !s.is_char_boundary(end) {
            end -= 1;
        }

        self.data[self.len..self.len + end].copy_from_slice(&s.as_bytes()[..end]);
        self.len += end;
        Ok(())
    }
}

impl fmt::Display for MessageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for MessageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageBuffer").field(&self.as_str()).finish()
    }
}
