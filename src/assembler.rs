//! Streaming frame assembly
//!
//! [`FrameAssembler`] owns the bit buffer and drives one scan-decode cycle
//! per ingestion call: locate the sync word, gate on enough buffered data,
//! descramble, decode the header and BWmap, then either emit a [`Frame`]
//! and drop the consumed prefix or skip a fixed distance past a false or
//! corrupt sync match. At most one frame is emitted per call, which bounds
//! per-call work; an empty push drives another cycle on already buffered
//! data.

use log::{debug, trace};

use crate::bitstream::BitStream;
use crate::bwmap::BwmapDecoder;
use crate::error::{ParseError, Result};
use crate::frame::{Frame, FrameHeader};
use crate::scramble::Descrambler;
use crate::sync::SyncLocator;
use crate::wire;

/// Observable assembler state between ingestion calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssemblerState {
    /// Searching for a sync word from the start of the buffer
    Scanning,
    /// Sync located but the frame is not fully buffered yet; the host
    /// should push more input before expecting a frame
    AwaitingData,
}

/// State machine turning an unaligned chunk stream into decoded frames
///
/// Single-threaded and call-driven: the buffer is owned exclusively by
/// this instance and every operation completes synchronously. Hosts with
/// multiple producers must serialize their ingestion calls externally.
#[derive(Debug)]
pub struct FrameAssembler {
    stream: BitStream,
    locator: SyncLocator,
    state: AssemblerState,
}

impl FrameAssembler {
    /// Create an assembler synchronized to the standard downstream sync word
    pub fn new() -> Self {
        FrameAssembler {
            stream: BitStream::new(),
            locator: SyncLocator::new(),
            state: AssemblerState::Scanning,
        }
    }

    /// Current state
    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Number of buffered, not yet consumed bits
    pub fn buffered_bits(&self) -> usize {
        self.stream.len()
    }

    /// Ingest a chunk of bytes (MSB-first) and attempt one decode cycle
    ///
    /// Returns `Ok(Some(frame))` when a complete frame was decoded and
    /// consumed, `Ok(None)` when more input is needed or a corrupt match
    /// was skipped. The only error is `OutOfRange`, which indicates an
    /// internal bookkeeping bug rather than bad input.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>> {
        self.stream.push_bytes(bytes);
        self.try_assemble()
    }

    /// Ingest a chunk of raw bits and attempt one decode cycle
    pub fn push_bits(&mut self, bits: &[bool]) -> Result<Option<Frame>> {
        self.stream.push_bits(bits);
        self.try_assemble()
    }

    fn try_assemble(&mut self) -> Result<Option<Frame>> {
        let p = match self.locator.find(&self.stream, 0) {
            Some(p) => p,
            None => {
                self.state = AssemblerState::Scanning;
                return Ok(None);
            }
        };

        let available = self.stream.len() - p;
        if available < wire::MIN_FRAME_BITS {
            trace!(
                "sync at bit {}, header incomplete ({} of {} bits)",
                p,
                available,
                wire::MIN_FRAME_BITS
            );
            self.state = AssemblerState::AwaitingData;
            return Ok(None);
        }

        // The register restarts at the sync boundary and runs continuously
        // across the header and the BWmap region.
        let post_sync = p + wire::SYNC_BITS;
        let mut descrambler = Descrambler::new();
        let header_span = self.stream.slice(post_sync, wire::HEADER_BITS)?;
        let header_bits = descrambler.run(header_span);

        let header = match FrameHeader::decode(&header_bits) {
            Ok(header) => header,
            Err(ParseError::InsufficientData(_)) => {
                self.state = AssemblerState::AwaitingData;
                return Ok(None);
            }
            Err(cause) => return self.resync(p, cause),
        };

        // Legitimate downstream frames carry Plend twice; a mismatch means
        // a false sync match (e.g. upstream traffic) or a corrupt header,
        // including one whose claimed BWmap length can never arrive.
        if !header.plend_consistent() {
            return self.resync(
                p,
                ParseError::malformed_frame(format!(
                    "Plend copies disagree: {:08x} != {:08x}",
                    header.plend1.raw, header.plend2.raw
                )),
            );
        }

        let total = header.total_length_bits();
        if available < total {
            trace!(
                "sync at bit {}, BWmap incomplete ({} of {} bits)",
                p,
                available,
                total
            );
            self.state = AssemblerState::AwaitingData;
            return Ok(None);
        }

        let bwmap_span = self
            .stream
            .slice(post_sync + wire::HEADER_BITS, header.bwmap_length_bits())?;
        let allocations = BwmapDecoder::decode(&descrambler.run(bwmap_span));

        self.stream.drop_prefix(p + total)?;
        self.state = AssemblerState::Scanning;
        debug!(
            "frame at bit {}: superframe {}, {} allocation(s)",
            p,
            header.ident.superframe_counter,
            allocations.len()
        );
        Ok(Some(Frame {
            header,
            allocations,
        }))
    }

    /// Skip a fixed distance past a corrupt or spoofed sync match
    ///
    /// The conservative skip keeps any frame that starts beyond it intact
    /// and guarantees forward progress through garbage.
    fn resync(&mut self, p: usize, cause: ParseError) -> Result<Option<Frame>> {
        debug!(
            "corrupt framing at bit {} ({}), skipping {} bits",
            p,
            cause,
            wire::RESYNC_SKIP_BITS
        );
        self.stream.drop_prefix(p + wire::RESYNC_SKIP_BITS)?;
        self.state = AssemblerState::Scanning;
        Ok(None)
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}
