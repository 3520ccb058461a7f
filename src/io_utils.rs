use std::io::Read;

use crate::error::{Result, SavError};

/// Byte order used for fixed-width integer and double reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// The host's native byte order; the default assumption for new readers.
    pub fn native() -> Endian {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

/// In-memory region that replaces the upstream stream once bound.
#[derive(Debug)]
struct Block {
    buf: Vec<u8>,
    pos: usize,
}

/// Endian-aware cursor over a byte stream.
///
/// Reads draw from the upstream `Read` until an in-memory block is bound
/// (after DEFLATE materialization), at which point all subsequent reads
/// come from the block. Supports non-consuming lookahead on the upstream
/// via an internal stash, which the record classifier relies on.
#[derive(Debug)]
pub struct ByteSource<R: Read> {
    inner: R,
    /// Bytes fetched from `inner` for lookahead but not yet consumed.
    lookahead: Vec<u8>,
    block: Option<Block>,
    endian: Endian,
    /// Count of bytes consumed from the upstream stream.
    position: u64,
}

impl<R: Read> ByteSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_endian(inner, Endian::native())
    }

    pub fn with_endian(inner: R, endian: Endian) -> Self {
        ByteSource {
            inner,
            lookahead: Vec::new(),
            block: None,
            endian,
            position: 0,
        }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Byte offset of the next unconsumed upstream byte.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Rebind all subsequent reads to an in-memory buffer.
    pub fn bind_block(&mut self, buf: Vec<u8>) {
        self.block = Some(Block { buf, pos: 0 });
    }

    /// Read exactly `buf.len()` bytes from the active source.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if let Some(block) = &mut self.block {
            let end = block.pos + buf.len();
            if end > block.buf.len() {
                return Err(SavError::UnexpectedEof);
            }
            buf.copy_from_slice(&block.buf[block.pos..end]);
            block.pos = end;
            return Ok(());
        }

        let stashed = buf.len().min(self.lookahead.len());
        buf[..stashed].copy_from_slice(&self.lookahead[..stashed]);
        self.lookahead.drain(..stashed);
        if stashed < buf.len() {
            self.inner.read_exact(&mut buf[stashed..])?;
        }
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Read exactly `n` bytes into a new Vec.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read a 4-byte signed integer under the active byte order.
    pub fn read_i32(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(match self.endian {
            Endian::Little => i32::from_le_bytes(buf),
            Endian::Big => i32::from_be_bytes(buf),
        })
    }

    /// Read an 8-byte signed integer under the active byte order.
    pub fn read_i64(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(match self.endian {
            Endian::Little => i64::from_le_bytes(buf),
            Endian::Big => i64::from_be_bytes(buf),
        })
    }

    /// Read an 8-byte double under the active byte order.
    pub fn read_f64(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(match self.endian {
            Endian::Little => f64::from_le_bytes(buf),
            Endian::Big => f64::from_be_bytes(buf),
        })
    }

    /// Read 8 raw bytes (no endian interpretation).
    pub fn read_8_bytes(&mut self) -> Result<[u8; 8]> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read `n` bytes as a bytestring. No character-set conversion is
    /// applied; non-UTF-8 bytes decode lossily.
    pub fn read_string(&mut self, n: usize) -> Result<String> {
        let buf = self.read_bytes(n)?;
        Ok(bytes_to_string_lossy(&buf))
    }

    /// Non-consuming lookahead. Returns up to `n` bytes; fewer only when
    /// the stream ends first.
    pub fn peek(&mut self, n: usize) -> Result<&[u8]> {
        if self.block.is_none() {
            self.fill_lookahead(n)?;
        }
        match &self.block {
            Some(block) => {
                let end = (block.pos + n).min(block.buf.len());
                Ok(&block.buf[block.pos..end])
            }
            None => Ok(&self.lookahead[..n.min(self.lookahead.len())]),
        }
    }

    /// Pull upstream bytes into the lookahead stash until it holds `n`
    /// bytes or the stream ends.
    fn fill_lookahead(&mut self, n: usize) -> Result<()> {
        while self.lookahead.len() < n {
            let mut chunk = [0u8; 256];
            let want = (n - self.lookahead.len()).min(chunk.len());
            match self.inner.read(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(got) => self.lookahead.extend_from_slice(&chunk[..got]),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Compare the next `4 * tag.len()` bytes against the encoding of
    /// `tag` under the active byte order, without consuming them.
    pub fn is_next(&mut self, tag: &[i32]) -> Result<bool> {
        let mut expect = Vec::with_capacity(tag.len() * 4);
        for &word in tag {
            match self.endian {
                Endian::Little => expect.extend_from_slice(&word.to_le_bytes()),
                Endian::Big => expect.extend_from_slice(&word.to_be_bytes()),
            }
        }
        let ahead = self.peek(expect.len())?;
        Ok(ahead == expect.as_slice())
    }

    /// Advance the active source by `n` bytes.
    pub fn discard(&mut self, n: usize) -> Result<()> {
        if let Some(block) = &mut self.block {
            let end = block.pos + n;
            if end > block.buf.len() {
                return Err(SavError::UnexpectedEof);
            }
            block.pos = end;
            return Ok(());
        }

        let stashed = n.min(self.lookahead.len());
        self.lookahead.drain(..stashed);
        let mut remaining = n - stashed;
        let mut scratch = [0u8; 4096];
        while remaining > 0 {
            let want = remaining.min(scratch.len());
            self.inner.read_exact(&mut scratch[..want])?;
            remaining -= want;
        }
        self.position += n as u64;
        Ok(())
    }
}

/// Trim trailing spaces (0x20) and NUL bytes from a byte slice.
pub fn trim_trailing_padding(buf: &[u8]) -> &[u8] {
    let mut end = buf.len();
    while end > 0 && (buf[end - 1] == b' ' || buf[end - 1] == 0) {
        end -= 1;
    }
    &buf[..end]
}

/// Trim trailing spaces only. Cell emission uses this; NUL bytes in case
/// data are significant.
pub fn trim_trailing_spaces(buf: &[u8]) -> &[u8] {
    let mut end = buf.len();
    while end > 0 && buf[end - 1] == b' ' {
        end -= 1;
    }
    &buf[..end]
}

/// Round a length up to the next multiple of `alignment`.
pub fn round_up(len: usize, alignment: usize) -> usize {
    if alignment == 0 {
        return len;
    }
    let remainder = len % alignment;
    if remainder == 0 {
        len
    } else {
        len + alignment - remainder
    }
}

/// Convert a byte slice to a string, trying UTF-8 first and falling back to lossy.
pub fn bytes_to_string_lossy(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
}
