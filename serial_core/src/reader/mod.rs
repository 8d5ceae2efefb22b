//! Byte-at-a-time line accumulation for serial input.

use core::fmt;
use heapless::Vec;

/// Problems detected while assembling a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// The line did not fit the buffer; it is dropped up to the next terminator.
    BufferOverflow,

    /// The completed line is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::BufferOverflow => f.write_str("ERROR: Buffer overflow"),
            ReadError::InvalidUtf8 => f.write_str("ERROR: Invalid UTF-8"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReadError {}

/// Collects bytes into lines of at most `N` bytes.
///
/// A byte matching the termination predicate completes the pending line;
/// empty lines (for example the `\n` of a `\r\n` pair) are skipped. Only ASCII
/// bytes are offered to the predicate, so a terminator never splits a UTF-8
/// sequence.
pub struct LineReader<const N: usize> {
    buffer: Vec<u8, N>,
    termination: fn(char) -> bool,
    complete: bool,
    overflowed: bool,
}

impl<const N: usize> LineReader<N> {
    pub fn new(termination: fn(char) -> bool) -> Self {
        Self {
            buffer: Vec::new(),
            termination,
            complete: false,
            overflowed: false,
        }
    }

    /// Feeds one byte. Returns the finished line when `byte` terminates it.
    ///
    /// The returned line stays valid until the next call.
    pub fn feed(&mut self, byte: u8) -> Result<Option<&str>, ReadError> {
        if self.complete {
            self.buffer.clear();
            self.complete = false;
        }

        if byte.is_ascii() && (self.termination)(byte as char) {
            if self.overflowed {
                self.overflowed = false;
                return Ok(None);
            }
            if self.buffer.is_empty() {
                return Ok(None);
            }
            self.complete = true;
            return core::str::from_utf8(&self.buffer)
                .map(Some)
                .map_err(|_| ReadError::InvalidUtf8);
        }

        if self.overflowed {
            return Ok(None);
        }
        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.overflowed = true;
            return Err(ReadError::BufferOverflow);
        }
        Ok(None)
    }

    /// Bytes of the line collected so far.
    pub fn pending(&self) -> &[u8] {
        if self.complete { &[] } else { self.buffer.as_slice() }
    }

    /// Drops any partial line.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.complete = false;
        self.overflowed = false;
    }
}

// ==================== TESTS =======================
