//! Deterministic PRNG and hash used to derive preamble secrets (§4.7).
//!
//! Neither component has a teacher-crate analogue (the teacher has no notion of a keyed
//! preamble); both are small owned-state structs with `new`/`reset` in the style the teacher
//! favors for its own stateful coders (`LZWCoder`, `AdaptiveHuffman`).

/// Seeded 32-bit multiplicative congruential generator.
#[derive(Clone, Copy)]
pub struct LehmerPrng {
    seed: u32,
    state: u32,
}

const MULTIPLIER: u64 = 279470273;
const MODULUS: u64 = 0xFFFFFFFB;

impl LehmerPrng {
    pub fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// Advances the generator and returns the new state.
    pub fn next(&mut self) -> u32 {
        self.state = ((self.state as u64 * MULTIPLIER) % MODULUS) as u32;
        self.state
    }

    /// Restores the generator to its original seed.
    pub fn reset(&mut self) {
        self.state = self.seed;
    }
}

/// 32-bit-masked FNV-1a. Both the offset basis and the prime are masked to 32 bits before use,
/// per spec — the nominal FNV-1a prime is a 64-bit constant, so masking it collapses to a much
/// smaller effective multiplier. This is preserved exactly rather than "corrected" to the
/// standard 32-bit FNV prime, since any deviation desynchronizes the preamble between encoder
/// and decoder.
pub struct FnvHash {
    state: u32,
}

impl FnvHash {
    const OFFSET_BASIS: u32 = 2166136261;
    const PRIME: u32 = (1099511628211u64 & 0xFFFF_FFFF) as u32;

    pub fn new() -> Self {
        Self { state: Self::OFFSET_BASIS }
    }

    pub fn reset(&mut self) {
        self.state = Self::OFFSET_BASIS;
    }

    /// Returns the masked hash of `bytes`, after an implicit reset.
    pub fn compute_hash(&mut self, bytes: &[u8]) -> u32 {
        self.reset();
        for &b in bytes {
            self.state ^= b as u32;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
        self.state
    }
}

impl Default for FnvHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prng_reset_reproduces_sequence() {
        let mut prng = LehmerPrng::new(42);
        let first: Vec<u32> = (0..5).map(|_| prng.next()).collect();
        prng.reset();
        let second: Vec<u32> = (0..5).map(|_| prng.next()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn hash_is_deterministic_and_sensitive() {
        let mut h = FnvHash::new();
        let a = h.compute_hash(b"secret");
        let b = h.compute_hash(b"secret");
        let c = h.compute_hash(b"Secret");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
