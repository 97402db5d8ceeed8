//! Frame-synchronous descrambling for the downstream payload
//!
//! Everything after the sync word is scrambled with the x^7 + x^6 + 1
//! pattern generator of G.984.3. The generator is additive: the keystream
//! depends only on the register, never on the data, so the same transform
//! both scrambles and descrambles. The register restarts at all-ones on
//! every frame, which is what makes the stream self-synchronizing at frame
//! granularity.

/// x^7 + x^6 + 1 keystream generator, seeded all-ones per frame
///
/// The register is scoped to the instance; create a fresh one for each
/// frame rather than carrying state across frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descrambler {
    reg: [bool; 7],
}

impl Descrambler {
    /// Create a descrambler with the frame-start register value
    pub fn new() -> Self {
        Descrambler { reg: [true; 7] }
    }

    /// XOR `input` against the keystream, advancing the register
    ///
    /// Returns one output bit per input bit. May be called repeatedly on
    /// consecutive spans of the same frame; the register carries over
    /// between calls.
    pub fn run(&mut self, input: &[bool]) -> Vec<bool> {
        let mut output = Vec::with_capacity(input.len());
        for &bit in input {
            output.push(bit ^ self.reg[6]);

            let feedback = self.reg[6] ^ self.reg[5];
            self.reg.copy_within(0..6, 1);
            self.reg[0] = feedback;
        }
        output
    }

    /// Descramble one complete span with a fresh register
    pub fn descramble(input: &[bool]) -> Vec<bool> {
        Descrambler::new().run(input)
    }
}

impl Default for Descrambler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_with_fresh_registers() {
        let original: Vec<bool> = (0..300).map(|i| i % 3 == 0).collect();
        let scrambled = Descrambler::descramble(&original);
        let recovered = Descrambler::descramble(&scrambled);
        assert_eq!(recovered, original);
    }

    #[test]
    fn test_keystream_is_not_identity() {
        let zeros = vec![false; 64];
        let scrambled = Descrambler::descramble(&zeros);
        assert_ne!(scrambled, zeros);
        // All-ones seed makes the very first keystream bit a one
        assert!(scrambled[0]);
    }

    #[test]
    fn test_deterministic() {
        let input: Vec<bool> = (0..100).map(|i| i % 7 < 3).collect();
        assert_eq!(
            Descrambler::descramble(&input),
            Descrambler::descramble(&input)
        );
    }

    #[test]
    fn test_split_run_matches_single_run() {
        let input: Vec<bool> = (0..208).map(|i| i % 5 == 1).collect();
        let whole = Descrambler::descramble(&input);

        let mut d = Descrambler::new();
        let mut split = d.run(&input[..77]);
        split.extend(d.run(&input[77..]));
        assert_eq!(split, whole);
    }

    #[test]
    fn test_register_matches_reference_update() {
        // First keystream bits computed by hand from the all-ones seed:
        // out_k = reg[6], reg <- [reg[6]^reg[5], reg[0..6]]
        let mut reference_reg = [1u8; 7];
        let mut reference_keystream = Vec::new();
        for _ in 0..32 {
            reference_keystream.push(reference_reg[6] != 0);
            let feedback = reference_reg[6] ^ reference_reg[5];
            let mut next = [0u8; 7];
            next[0] = feedback;
            next[1..].copy_from_slice(&reference_reg[..6]);
            reference_reg = next;
        }

        let keystream = Descrambler::descramble(&vec![false; 32]);
        assert_eq!(keystream, reference_keystream);
    }
}
