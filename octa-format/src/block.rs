//! Byte-block accessor
//!
//! Every record in a bank is a fixed-layout byte range. [`Block`] wraps a borrowed or owned
//! byte buffer and offers typed reads and writes at offsets within it. Views over records
//! hold a `Block` whose buffer is exactly the record's span, so offsets are always
//! record-relative and the borrow checker enforces that one bank has a single writer.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{OctaError, Result};

/// Byte value meaning "not locked" / "inherit"
pub const SENTINEL: u8 = 255;

/// Typed accessor over a byte span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<B> {
    buf: B,
}

impl<B: AsRef<[u8]>> Block<B> {
    /// Wrap a buffer without checking its size
    pub fn new(buf: B) -> Self {
        Self { buf }
    }

    /// Wrap a buffer, requiring it to be exactly `len` bytes
    pub fn with_len(buf: B, record: &'static str, len: usize) -> Result<Self> {
        let actual = buf.as_ref().len();
        if actual != len {
            return Err(OctaError::SizeMismatch {
                record,
                expected: len,
                actual,
            });
        }
        Ok(Self { buf })
    }

    /// Raw bytes of the whole span
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }

    pub fn len(&self) -> usize {
        self.buf.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.as_ref().is_empty()
    }

    /// Unwrap the inner buffer
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Read one byte
    pub fn u8(&self, offset: usize) -> u8 {
        self.buf.as_ref()[offset]
    }

    /// Read a big-endian u16
    pub fn u16_be(&self, offset: usize) -> u16 {
        BigEndian::read_u16(&self.buf.as_ref()[offset..offset + 2])
    }

    /// Read a big-endian u32
    pub fn u32_be(&self, offset: usize) -> u32 {
        BigEndian::read_u32(&self.buf.as_ref()[offset..offset + 4])
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.buf.as_ref()[offset..offset + len]
    }

    /// Copy `N` bytes starting at `offset`
    pub fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(offset, N));
        out
    }

    /// Test a single bit
    pub fn bit(&self, offset: usize, bit: u8) -> bool {
        self.u8(offset) & (1 << bit) != 0
    }

    /// Read the bit range `shift..shift + width` of a byte
    pub fn bits(&self, offset: usize, shift: u8, width: u8) -> u8 {
        (self.u8(offset) >> shift) & low_mask(width)
    }

    /// Read a sentinel-encoded byte
    pub fn lock(&self, offset: usize) -> Option<u8> {
        match self.u8(offset) {
            SENTINEL => None,
            v => Some(v),
        }
    }

    /// Borrow a sub-span as its own block
    pub fn sub(&self, offset: usize, len: usize) -> Block<&[u8]> {
        Block::new(self.bytes(offset, len))
    }

    /// True when every byte in the span equals `value`
    pub fn all(&self, offset: usize, len: usize, value: u8) -> bool {
        self.bytes(offset, len).iter().all(|&b| b == value)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Block<B> {
    /// Mutable raw bytes of the whole span
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut()
    }

    pub fn set_u8(&mut self, offset: usize, value: u8) {
        self.buf.as_mut()[offset] = value;
    }

    pub fn set_u16_be(&mut self, offset: usize, value: u16) {
        BigEndian::write_u16(&mut self.buf.as_mut()[offset..offset + 2], value);
    }

    pub fn set_u32_be(&mut self, offset: usize, value: u32) {
        BigEndian::write_u32(&mut self.buf.as_mut()[offset..offset + 4], value);
    }

    /// Mutably borrow `len` bytes starting at `offset`
    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.buf.as_mut()[offset..offset + len]
    }

    /// Overwrite bytes starting at `offset`
    pub fn write(&mut self, offset: usize, data: &[u8]) {
        self.bytes_mut(offset, data.len()).copy_from_slice(data);
    }

    pub fn fill(&mut self, offset: usize, len: usize, value: u8) {
        self.bytes_mut(offset, len).fill(value);
    }

    pub fn set_bit(&mut self, offset: usize, bit: u8, on: bool) {
        let byte = &mut self.buf.as_mut()[offset];
        if on {
            *byte |= 1 << bit;
        } else {
            *byte &= !(1 << bit);
        }
    }

    /// Write `value` into the bit range `shift..shift + width`, keeping the other bits
    pub fn set_bits(&mut self, offset: usize, shift: u8, width: u8, value: u8) {
        let mask = low_mask(width) << shift;
        let byte = &mut self.buf.as_mut()[offset];
        *byte = (*byte & !mask) | ((value << shift) & mask);
    }

    /// Write a sentinel-encoded byte; `None` writes the sentinel
    pub fn set_lock(&mut self, offset: usize, value: Option<u8>) {
        self.set_u8(offset, value.unwrap_or(SENTINEL));
    }

    /// Mutably borrow a sub-span as its own block
    pub fn sub_mut(&mut self, offset: usize, len: usize) -> Block<&mut [u8]> {
        Block::new(self.bytes_mut(offset, len))
    }
}

impl Block<Vec<u8>> {
    /// Owned block of `len` bytes, all set to `value`
    pub fn filled(len: usize, value: u8) -> Self {
        Self::new(vec![value; len])
    }

    /// Reborrow an owned block as a read-only view
    pub fn view(&self) -> Block<&[u8]> {
        Block::new(self.buf.as_slice())
    }

    /// Reborrow an owned block as a mutable view
    pub fn view_mut(&mut self) -> Block<&mut [u8]> {
        Block::new(self.buf.as_mut_slice())
    }
}

fn low_mask(width: u8) -> u8 {
    if width >= 8 { 0xFF } else { (1u8 << width) - 1 }
}
