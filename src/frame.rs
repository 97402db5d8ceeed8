//! PCBd header structures and the decoded downstream frame
//!
//! The fixed 208-bit PCBd header follows the sync word and, once
//! descrambled, is sliced positionally: Ident (4 bytes), PLOAMd (13 bytes),
//! BIP (1 byte), then Plend twice (4 bytes each). Plend1 carries the BWmap
//! length, which is the only field the assembler needs before it can gate
//! on the rest of the frame.

use crate::bitstream::bits_to_u64;
use crate::bwmap::AllocationStructure;
use crate::error::{ParseError, Result};
use crate::wire;

/// Ident field: FEC indicator, reserved bit and the superframe counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ident {
    /// Downstream FEC enabled indicator
    pub fec_indicator: bool,
    /// Reserved bit, carried through unmodified
    pub reserved: bool,
    /// 30-bit superframe counter
    pub superframe_counter: u32,
}

impl Ident {
    /// Field width in bits
    pub const BITS: usize = 32;

    fn decode(bits: &[bool]) -> Self {
        Ident {
            fec_indicator: bits[0],
            reserved: bits[1],
            superframe_counter: bits_to_u64(&bits[2..32]) as u32,
        }
    }

    /// The field as transmitted, as a 32-bit value
    pub fn raw(&self) -> u32 {
        ((self.fec_indicator as u32) << 31)
            | ((self.reserved as u32) << 30)
            | self.superframe_counter
    }
}

/// PLOAMd field: one downstream PLOAM message
///
/// Message semantics are not interpreted here; the payload is exposed as
/// raw bytes for an ONU-side consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ploamd {
    /// Addressed ONU
    pub onu_id: u8,
    /// Message type identifier
    pub message_id: u8,
    /// 10-byte message payload, opaque at this layer
    pub data: [u8; 10],
    /// Trailing CRC byte, passed through unverified
    pub crc: u8,
}

impl Ploamd {
    /// Field width in bits
    pub const BITS: usize = 104;

    fn decode(bits: &[bool]) -> Self {
        let mut data = [0u8; 10];
        for (i, chunk) in bits[16..96].chunks(8).enumerate() {
            data[i] = bits_to_u64(chunk) as u8;
        }
        Ploamd {
            onu_id: bits_to_u64(&bits[0..8]) as u8,
            message_id: bits_to_u64(&bits[8..16]) as u8,
            data,
            crc: bits_to_u64(&bits[96..104]) as u8,
        }
    }

    /// The field as transmitted, as 13 bytes
    pub fn raw(&self) -> [u8; 13] {
        let mut bytes = [0u8; 13];
        bytes[0] = self.onu_id;
        bytes[1] = self.message_id;
        bytes[2..12].copy_from_slice(&self.data);
        bytes[12] = self.crc;
        bytes
    }
}

/// Payload length field, transmitted twice for redundancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plend {
    /// BWmap length in 8-byte allocation records (upper 12 bits)
    pub bwmap_records: u16,
    /// ATM partition length (next 12 bits); zero on current deployments
    pub alen: u16,
    /// CRC over the field (trailing 8 bits), passed through unverified
    pub crc: u8,
    /// The full 32-bit field as transmitted
    pub raw: u32,
}

impl Plend {
    /// Field width in bits
    pub const BITS: usize = 32;

    fn decode(bits: &[bool]) -> Self {
        let raw = bits_to_u64(bits) as u32;
        Plend {
            bwmap_records: (raw >> 20) as u16,
            alen: ((raw >> 8) & 0xFFF) as u16,
            crc: (raw & 0xFF) as u8,
            raw,
        }
    }
}

/// Decoded PCBd header of one downstream frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameHeader {
    /// Frame identifier block
    pub ident: Ident,
    /// Downstream PLOAM message
    pub ploamd: Ploamd,
    /// Bit-interleaved parity byte, opaque at this layer
    pub bip: u8,
    /// First payload length field
    pub plend1: Plend,
    /// Redundant second payload length field
    pub plend2: Plend,
}

impl FrameHeader {
    /// Fixed header width in bits: Ident + PLOAMd + BIP + Plend1 + Plend2
    pub const BITS: usize = wire::HEADER_BITS;

    /// Decode the fixed header from a descrambled post-sync bit span
    ///
    /// Pure positional slicing; fails only when the span is shorter than
    /// the 208-bit header, which the caller treats as "wait for more
    /// input" rather than an error to surface.
    pub fn decode(bits: &[bool]) -> Result<Self> {
        if bits.len() < Self::BITS {
            return Err(ParseError::insufficient_data(format!(
                "header needs {} bits, have {}",
                Self::BITS,
                bits.len()
            )));
        }

        Ok(FrameHeader {
            ident: Ident::decode(&bits[0..32]),
            ploamd: Ploamd::decode(&bits[32..136]),
            bip: bits_to_u64(&bits[136..144]) as u8,
            plend1: Plend::decode(&bits[144..176]),
            plend2: Plend::decode(&bits[176..208]),
        })
    }

    /// BWmap length in bits, derived from Plend1
    pub fn bwmap_length_bits(&self) -> usize {
        self.plend1.bwmap_records as usize * wire::ALLOCATION_BITS
    }

    /// Whether the redundant Plend copies agree
    ///
    /// Legitimate downstream frames carry the same value twice; a mismatch
    /// means the sync match was false or the header is corrupt.
    pub fn plend_consistent(&self) -> bool {
        self.plend1.raw == self.plend2.raw
    }

    /// Total frame length in bits: sync word, fixed header and BWmap
    pub fn total_length_bits(&self) -> usize {
        wire::SYNC_BITS + Self::BITS + self.bwmap_length_bits()
    }
}

/// One fully decoded downstream frame
///
/// Immutable once built; handed off to the host and not retained by the
/// decoder. Allocations appear in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Decoded PCBd header
    pub header: FrameHeader,
    /// BWmap allocation records, ascending offset within the BWmap
    pub allocations: Vec<AllocationStructure>,
}

impl Frame {
    /// Total frame length in bits, including the sync word
    pub fn total_length_bits(&self) -> usize {
        self.header.total_length_bits()
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ploamd_hex: String = self
            .header
            .ploamd
            .raw()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        writeln!(f, "GPON Frame:")?;
        writeln!(f, "  IDENT: {:08x}", self.header.ident.raw())?;
        writeln!(f, "  PLOAMd: {}", ploamd_hex)?;
        writeln!(f, "  BIP: {:02x}", self.header.bip)?;
        writeln!(
            f,
            "  Plend1: {:08x} (BWmap length: {} bits)",
            self.header.plend1.raw,
            self.header.bwmap_length_bits()
        )?;
        writeln!(f, "  Plend2: {:08x}", self.header.plend2.raw)?;
        write!(f, "  BWmap:")?;
        for (i, alloc) in self.allocations.iter().enumerate() {
            write!(f, "\n    Allocation {}:{}", i + 1, alloc)?;
        }
        Ok(())
    }
}
