//! # GPON BWmap Parser
//!
//! A streaming decoder for GPON (G.984.3) downstream frames, turning an
//! unaligned bit/byte stream from a demodulation layer into structured
//! bandwidth-map (BWmap) allocation records.
//!
//! The decoder locates frame boundaries by sync word, reverses the
//! frame-synchronous x^7 + x^6 + 1 payload scrambling, extracts the fixed
//! PCBd header fields and decodes the variable-length BWmap. This library
//! provides:
//!
//! - Incremental buffering of arbitrarily sized input chunks
//! - Bit-granular sync-word acquisition with skip-and-rescan recovery
//! - Frame-synchronous descrambling
//! - Strongly typed header and allocation record decoding
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization support
//!
//! ## Example
//!
//! ```
//! use gpon_bwmap_parser::FrameAssembler;
//!
//! let mut assembler = FrameAssembler::new();
//!
//! // Chunks arrive from the demodulator in arbitrary sizes
//! if let Some(frame) = assembler.push_bytes(&[0u8; 32])? {
//!     for alloc in &frame.allocations {
//!         println!("grant for Alloc-ID {}", alloc.alloc_id);
//!     }
//! }
//! # Ok::<(), gpon_bwmap_parser::ParseError>(())
//! ```

pub mod assembler;
pub mod bitstream;
pub mod bwmap;
pub mod error;
pub mod frame;
pub mod scramble;
pub mod sync;

pub use assembler::{AssemblerState, FrameAssembler};
pub use bitstream::BitStream;
pub use bwmap::{AllocationStructure, BwmapDecoder};
pub use error::{ParseError, Result};
pub use frame::{Frame, FrameHeader, Ident, Plend, Ploamd};
pub use scramble::Descrambler;
pub use sync::SyncLocator;

/// Wire-level constants of the downstream framing
pub mod wire {
    /// Downstream synchronization pattern, matched on the raw
    /// (pre-descramble) stream
    pub const SYNC_WORD: [u8; 7] = [0xCA, 0xFE, 0x55, 0xB6, 0xAB, 0x31, 0xE0];

    /// Sync word length in bits
    pub const SYNC_BITS: usize = 56;

    /// Fixed PCBd header length in bits:
    /// Ident (4) + PLOAMd (13) + BIP (1) + Plend1 (4) + Plend2 (4) bytes
    pub const HEADER_BITS: usize = 208;

    /// BWmap allocation record length in bits
    pub const ALLOCATION_BITS: usize = 64;

    /// Fixed skip distance past a false or corrupt sync match, in bits
    pub const RESYNC_SKIP_BITS: usize = 64;

    /// Minimum buffered span needed to attempt a header decode
    pub const MIN_FRAME_BITS: usize = SYNC_BITS + HEADER_BITS;
}
