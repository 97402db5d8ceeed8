//! Sync-word location within the accumulated stream
//!
//! The downstream sync word is matched on the raw wire bits, before
//! descrambling. The search is bit-granular because nothing guarantees the
//! pattern lands on a byte boundary in the sampled stream.

use crate::bitstream::{bytes_to_bits, BitStream};
use crate::wire;

/// Locator for the fixed downstream synchronization pattern
#[derive(Debug, Clone)]
pub struct SyncLocator {
    pattern: Vec<bool>,
}

impl SyncLocator {
    /// Create a locator for the standard 56-bit downstream sync word
    pub fn new() -> Self {
        SyncLocator {
            pattern: bytes_to_bits(&wire::SYNC_WORD),
        }
    }

    /// Create a locator for an arbitrary bit pattern
    pub fn with_pattern(pattern: Vec<bool>) -> Self {
        SyncLocator { pattern }
    }

    /// Length of the pattern in bits
    pub fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    /// Find the leftmost occurrence of the pattern at or after `start_offset`
    ///
    /// Returns the bit position of the first match, or `None` when the
    /// buffered stream contains no match. Downstream logic re-invokes the
    /// locator after skipping past false positives, so leftmost (not best)
    /// is the contract.
    pub fn find(&self, stream: &BitStream, start_offset: usize) -> Option<usize> {
        let bits = stream.as_bits();
        if self.pattern.is_empty() || start_offset >= bits.len() {
            return None;
        }
        bits[start_offset..]
            .windows(self.pattern.len())
            .position(|window| window == self.pattern.as_slice())
            .map(|pos| start_offset + pos)
    }
}

impl Default for SyncLocator {
    fn default() -> Self {
        Self::new()
    }
}
