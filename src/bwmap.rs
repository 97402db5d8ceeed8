//! Bandwidth map decoding
//!
//! The BWmap region follows the fixed header and consists of consecutive
//! 64-bit allocation records; its length in records comes from Plend1. The
//! caller verifies the whole declared span is buffered before decoding, so
//! record decode itself never needs per-record fault recovery.

use bitfield::bitfield;

use crate::bitstream::bits_to_u64;
use crate::error::{ParseError, Result};
use crate::wire;

bitfield! {
    /// Wire layout of one 64-bit allocation record
    struct RawAllocation(u64);
    impl Debug;
    u16, alloc_id, _: 63, 52;
    u16, flags, _: 51, 40;
    u16, start_time, _: 39, 24;
    u16, stop_time, _: 23, 8;
    u8, crc, _: 7, 0;
}

/// One upstream bandwidth grant from the BWmap
///
/// `start_time <= stop_time` holds for well-formed grants but is a
/// consumer-side invariant; decoding never rejects a record for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationStructure {
    /// Alloc-ID of the granted T-CONT (12 bits)
    pub alloc_id: u16,
    /// Flags field (12 bits)
    pub flags: u16,
    /// Grant start time (16 bits)
    pub start_time: u16,
    /// Grant stop time (16 bits)
    pub stop_time: u16,
    /// Trailing CRC byte, passed through unverified
    pub crc: u8,
}

impl AllocationStructure {
    /// Record width in bits
    pub const BITS: usize = wire::ALLOCATION_BITS;

    /// Decode one record from a 64-bit span
    ///
    /// # Example
    ///
    /// ```
    /// use gpon_bwmap_parser::AllocationStructure;
    ///
    /// let mut bits = [false; 64];
    /// bits[11] = true; // Alloc-ID 1 in the top 12-bit field
    /// let alloc = AllocationStructure::decode(&bits)?;
    /// assert_eq!(alloc.alloc_id, 1);
    /// # Ok::<(), gpon_bwmap_parser::ParseError>(())
    /// ```
    pub fn decode(bits: &[bool]) -> Result<Self> {
        if bits.len() < Self::BITS {
            return Err(ParseError::insufficient_data(format!(
                "allocation record needs {} bits, have {}",
                Self::BITS,
                bits.len()
            )));
        }
        Ok(Self::from_raw(bits_to_u64(&bits[..Self::BITS])))
    }

    fn from_raw(raw: u64) -> Self {
        let record = RawAllocation(raw);
        AllocationStructure {
            alloc_id: record.alloc_id(),
            flags: record.flags(),
            start_time: record.start_time(),
            stop_time: record.stop_time(),
            crc: record.crc(),
        }
    }

    /// Whether the grant window is ordered (`start_time <= stop_time`)
    pub fn is_well_ordered(&self) -> bool {
        self.start_time <= self.stop_time
    }
}

impl std::fmt::Display for AllocationStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\n        Alloc-ID: {}\n        Flags: {:012b}\n        StartTime: {}\n        StopTime: {}\n        CRC: 0x{:02x}",
            self.alloc_id, self.flags, self.start_time, self.stop_time, self.crc
        )
    }
}

/// Decoder for the variable-length BWmap region
pub struct BwmapDecoder;

impl BwmapDecoder {
    /// Decode every complete 64-bit record in the span, in wire order
    ///
    /// A trailing partial record is silently discarded; the length gate in
    /// the assembler makes that unreachable for well-formed frames.
    pub fn decode(bits: &[bool]) -> Vec<AllocationStructure> {
        bits.chunks_exact(AllocationStructure::BITS)
            .map(|window| AllocationStructure::from_raw(bits_to_u64(window)))
            .collect()
    }
}
