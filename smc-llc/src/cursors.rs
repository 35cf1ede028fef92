use bytes::Buf;

/// A read cursor over a byte slice.
///
/// Decoders consume their input strictly front to back through a `Cursor`.
/// Unlike a plain `&[u8]`, the cursor remembers the full buffer, so the
/// number of consumed bytes stays observable after parsing.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the first byte of `buf`.
    #[inline]
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// Consume the next `N` bytes into an array.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `N` bytes remain.
    #[inline]
    pub fn take_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0; N];
        self.copy_to_slice(&mut out);
        out
    }

    /// Consume a 24-bit big-endian integer.
    #[inline]
    pub fn get_u24(&mut self) -> u32 {
        self.get_uint(3) as u32
    }
}

impl<'a> Buf for Cursor<'a> {
    #[inline]
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    fn chunk(&self) -> &[u8] {
        &self.buf[self.pos..]
    }

    #[inline]
    fn advance(&mut self, cnt: usize) {
        assert!(cnt <= self.remaining());
        self.pos += cnt;
    }
}
