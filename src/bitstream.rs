//! Bit accumulator for the incoming downstream sample stream
//!
//! The stream arrives in arbitrarily sized chunks with no frame alignment,
//! so the assembler buffers everything it has not yet consumed here. The
//! buffer is append-only apart from [`BitStream::drop_prefix`], which
//! discards bits once a frame (or a false sync match) has been consumed.

use crate::error::{ParseError, Result};

/// Unpack bytes into bits, most significant bit first
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1 != 0);
        }
    }
    bits
}

/// Pack bits into bytes, most significant bit first
///
/// A trailing group of fewer than 8 bits is zero-padded on the right.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((bits.len() + 7) / 8);
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            if bit {
                byte |= 1 << (7 - i);
            }
        }
        bytes.push(byte);
    }
    bytes
}

/// Interpret up to 64 bits as a big-endian unsigned integer
pub(crate) fn bits_to_u64(bits: &[bool]) -> u64 {
    debug_assert!(bits.len() <= 64);
    bits.iter().fold(0u64, |acc, &bit| (acc << 1) | bit as u64)
}

/// Append-only accumulator of pending wire bits
///
/// Owned exclusively by one [`crate::assembler::FrameAssembler`]; all
/// operations are synchronous and none blocks. The unconsumed tail is
/// always a valid continuation of the wire stream.
#[derive(Debug, Default)]
pub struct BitStream {
    bits: Vec<bool>,
}

impl BitStream {
    /// Create an empty stream buffer
    pub fn new() -> Self {
        BitStream { bits: Vec::new() }
    }

    /// Append raw bits to the end of the buffer
    pub fn push_bits(&mut self, bits: &[bool]) {
        self.bits.extend_from_slice(bits);
    }

    /// Append bytes to the end of the buffer, unpacked MSB-first
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.bits.reserve(bytes.len() * 8);
        for &byte in bytes {
            for shift in (0..8).rev() {
                self.bits.push((byte >> shift) & 1 != 0);
            }
        }
    }

    /// Number of buffered bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// View of every buffered bit, oldest first
    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    /// Read-only view of `count` bits starting at `offset`
    pub fn slice(&self, offset: usize, count: usize) -> Result<&[bool]> {
        let end = offset.checked_add(count).ok_or_else(|| {
            ParseError::out_of_range(format!("slice {}+{} overflows", offset, count))
        })?;
        if end > self.bits.len() {
            return Err(ParseError::out_of_range(format!(
                "slice {}..{} exceeds buffered length {}",
                offset,
                end,
                self.bits.len()
            )));
        }
        Ok(&self.bits[offset..end])
    }

    /// Discard the first `n` bits
    pub fn drop_prefix(&mut self, n: usize) -> Result<()> {
        if n > self.bits.len() {
            return Err(ParseError::out_of_range(format!(
                "cannot drop {} bits from a buffer of {}",
                n,
                self.bits.len()
            )));
        }
        self.bits.drain(..n);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_bits_msb_first() {
        let bits = bytes_to_bits(&[0xA0]);
        assert_eq!(
            bits,
            vec![true, false, true, false, false, false, false, false]
        );
    }

    #[test]
    fn test_bits_bytes_roundtrip() {
        let bytes = [0xCA, 0xFE, 0x55, 0xB6, 0xAB, 0x31, 0xE0];
        assert_eq!(bits_to_bytes(&bytes_to_bits(&bytes)), bytes);
    }

    #[test]
    fn test_bits_to_u64() {
        let bits = bytes_to_bits(&[0x01, 0x02]);
        assert_eq!(bits_to_u64(&bits), 0x0102);
        assert_eq!(bits_to_u64(&[true, false, true]), 0b101);
    }

    #[test]
    fn test_push_and_slice() {
        let mut stream = BitStream::new();
        stream.push_bytes(&[0xFF, 0x00]);
        assert_eq!(stream.len(), 16);

        let head = stream.slice(0, 8).unwrap();
        assert!(head.iter().all(|&b| b));
        let tail = stream.slice(8, 8).unwrap();
        assert!(tail.iter().all(|&b| !b));
    }

    #[test]
    fn test_slice_out_of_range() {
        let mut stream = BitStream::new();
        stream.push_bits(&[true; 10]);
        assert!(stream.slice(0, 10).is_ok());
        assert!(matches!(
            stream.slice(4, 7),
            Err(ParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_drop_prefix() {
        let mut stream = BitStream::new();
        stream.push_bits(&[true, true, false, false]);
        stream.drop_prefix(2).unwrap();
        assert_eq!(stream.as_bits(), &[false, false]);
        assert!(matches!(
            stream.drop_prefix(3),
            Err(ParseError::OutOfRange(_))
        ));
    }
}
