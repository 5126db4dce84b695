//! Core utilities and shared types

pub mod errors;

use minus::Pager;
use std::io::{self, Write};

/// `Write` adapter feeding the minus pager
///
/// The pager only takes text, while writes may split a multi-byte character.
/// Bytes of an unfinished character are held back until the rest arrives;
/// `flush` pushes whatever is left, invalid sequences included, as
/// replacement characters.
pub struct PagerWriter {
    pager: Pager,
    pending: Vec<u8>,
}

impl PagerWriter {
    pub fn new(pager: Pager) -> Self {
        PagerWriter {
            pager,
            pending: Vec::new(),
        }
    }

    fn push_pending(&mut self, len: usize) -> io::Result<()> {
        if len == 0 {
            return Ok(());
        }

        let text = self.pending.drain(..len).collect::<Vec<_>>();
        self.pager
            .push_str(&*String::from_utf8_lossy(&text))
            .map_err(io::Error::other)
    }
}

/// Length of the prefix of `bytes` that can be shown now
///
/// Only a trailing incomplete character is held back.
fn displayable_len(bytes: &[u8]) -> usize {
    match std::str::from_utf8(bytes) {
        Ok(_) => bytes.len(),
        Err(error) if error.error_len().is_none() => error.valid_up_to(),
        Err(_) => bytes.len(),
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.push_pending(displayable_len(&self.pending))?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.push_pending(self.pending.len())
    }
}
